use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use lumen_lighting::MergerConfig;
use lumen_runtime::RuntimeConfig;
use lumen_world::WorldConfig;

/// Top-level `lumen.toml`. Every table is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LumenConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub merger: MergerConfig,
}

impl LumenConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: LumenConfig = toml::from_str(toml_str)?;
        cfg.world.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_world::ChunkDims;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = LumenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.world.dims(), ChunkDims::cube(16));
        assert_eq!(cfg.runtime.light_workers, 0);
        assert_eq!(cfg.merger.shutdown_timeout_ms, 10_000);
    }

    #[test]
    fn tables_parse() {
        let cfg = LumenConfig::from_toml_str(
            r#"
            [world]
            chunk_size = [8, 32, 8]

            [runtime]
            light_workers = 2

            [merger]
            shutdown_timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.world.dims(), ChunkDims::new(8, 32, 8));
        assert_eq!(cfg.runtime.resolved_workers(), 2);
        assert_eq!(cfg.merger.shutdown_timeout_ms, 500);
    }

    #[test]
    fn bad_world_is_rejected() {
        assert!(LumenConfig::from_toml_str("[world]\nchunk_size = [0, 8, 8]").is_err());
    }
}
