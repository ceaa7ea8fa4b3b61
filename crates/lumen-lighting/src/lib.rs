//! Light propagation across chunk boundaries and the asynchronous light merger.
#![forbid(unsafe_code)]

mod config;
mod error;
pub mod internal;
mod merge;
mod merger;
mod neighborhood;
pub mod pipeline;
pub mod propagator;
pub mod rules;
mod view;

pub use config::MergerConfig;
pub use error::MergeError;
pub use internal::{SkyExposure, light_chunk_interior};
pub use merge::{MergeReport, merge_chunk};
pub use merger::LightMerger;
pub use neighborhood::{CENTER_INDEX, Neighborhood, SlotKind};
pub use pipeline::{MergePropagators, PipelineStats, Stage};
pub use propagator::{
    BatchPropagator, ChunkFace, PropagationStats, StandardBatchPropagator, SunlightRegenPropagator,
};
pub use rules::{BlockLightRules, PropagationRules, SunlightRegenRules, SunlightRules};
pub use view::LocalChunkView;
