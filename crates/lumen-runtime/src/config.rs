use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuntimeConfig {
    /// Lighting worker threads. Zero derives a count from the host.
    #[serde(default)]
    pub light_workers: usize,
}

impl RuntimeConfig {
    pub fn resolved_workers(&self) -> usize {
        if self.light_workers > 0 {
            return self.light_workers;
        }
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        (n / 2).max(1)
    }
}
