use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::ChunkDims;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: [usize; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> [usize; 3] {
    [16, 16, 16]
}

impl WorldConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.chunk_size.iter().any(|&s| s == 0) {
            return Err(format!("chunk_size must be non-zero on every axis, got {:?}", self.chunk_size).into());
        }
        Ok(())
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        let [sx, sy, sz] = self.chunk_size;
        ChunkDims::new(sx, sy, sz)
    }
}
