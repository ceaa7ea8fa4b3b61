use std::sync::Arc;
use std::time::{Duration, Instant};

use lumen_chunk::{Chunk, ChunkGuard, ChunkProvider};
use lumen_runtime::CancelToken;
use lumen_world::{ChunkCoord, Side};

use crate::{
    CENTER_INDEX, ChunkFace, MergeError, MergePropagators, Neighborhood, PipelineStats, SlotKind,
    Stage,
};

#[derive(Clone, Copy, Debug)]
pub struct MergeReport {
    pub coord: ChunkCoord,
    /// Slots filled, center included.
    pub present: usize,
    pub pull_only: usize,
    pub stats: PipelineStats,
    pub elapsed: Duration,
}

/// Reconcile light between `chunk` and its 26 neighbors, blocking until done.
pub fn merge_chunk(provider: &dyn ChunkProvider, chunk: &Arc<Chunk>) -> Result<MergeReport, MergeError> {
    merge_with_cancel(provider, chunk, None)
}

fn is_face(idx: usize) -> bool {
    let (dx, dy, dz) = Neighborhood::offset_of(idx);
    dx.abs() + dy.abs() + dz.abs() == 1
}

/// Ready neighbors are visible. A face neighbor that is still generating can be
/// pulled from but is never written.
fn assemble(
    provider: &dyn ChunkProvider,
    chunk: &Arc<Chunk>,
) -> Vec<(usize, SlotKind, Arc<Chunk>)> {
    let center = chunk.coord();
    let mut entries = Vec::with_capacity(27);
    for idx in 0..27 {
        if idx == CENTER_INDEX {
            entries.push((idx, SlotKind::Visible, chunk.clone()));
            continue;
        }
        let (dx, dy, dz) = Neighborhood::offset_of(idx);
        let coord = center.offset(dx, dy, dz);
        let found = match provider.chunk(coord) {
            Some(c) => Some((SlotKind::Visible, c)),
            None if is_face(idx) => provider.chunk_unready(coord).map(|c| (SlotKind::PullOnly, c)),
            None => None,
        };
        if let Some((kind, c)) = found {
            if c.coord() != coord {
                log::warn!(
                    target: "lighting",
                    "provider returned {:?} for {:?}; skipping",
                    c.coord(),
                    coord
                );
                continue;
            }
            entries.push((idx, kind, c));
        }
    }
    entries
}

pub(crate) fn merge_with_cancel(
    provider: &dyn ChunkProvider,
    chunk: &Arc<Chunk>,
    cancel: Option<&CancelToken>,
) -> Result<MergeReport, MergeError> {
    let t0 = Instant::now();
    let center = chunk.coord();
    let mut entries = assemble(provider, chunk);
    if cancel.is_some_and(|c| c.is_cancelled()) {
        return Err(MergeError::Cancelled);
    }

    // One global order for every merge, so overlapping merges cannot deadlock.
    entries.sort_by_key(|(_, _, c)| c.coord());
    let mut guards: Vec<(usize, SlotKind, ChunkGuard<'_>)> = Vec::with_capacity(entries.len());
    for (idx, kind, c) in &entries {
        guards.push((*idx, *kind, c.lock()?));
    }

    let mut center_guard = None;
    let mut rest = Vec::with_capacity(guards.len());
    for (idx, kind, guard) in guards.iter_mut() {
        if *idx == CENTER_INDEX {
            center_guard = Some(&mut **guard);
        } else {
            rest.push((*kind, &mut **guard));
        }
    }
    let Some(center_data) = center_guard else {
        return Err(MergeError::Lost);
    };

    let mut hood = Neighborhood::new(center_data);
    for (kind, data) in rest {
        hood.insert(data, kind);
    }
    let present = hood.present();
    let pull_only = hood.pull_only();

    let mut props = MergePropagators::new(&hood);
    for stage in Stage::ORDER {
        let prop = props.stage_mut(stage);
        for side in Side::ALL {
            let n = Neighborhood::index_of_side(side);
            if hood.is_present(n) {
                prop.propagate_between(ChunkFace::inward(side), false);
            }
            if hood.is_visible(n) {
                prop.propagate_between(ChunkFace::outward(side), true);
            }
        }
        // edits inside the center or a face neighbor only show up here
        prop.relax_chunk(CENTER_INDEX);
        for side in Side::ALL {
            prop.relax_chunk(Neighborhood::index_of_side(side));
        }
    }
    let stats = props.finalize();

    for (idx, _, guard) in guards.iter_mut() {
        if *idx == CENTER_INDEX {
            guard.deflate_sunlight();
        }
    }
    drop(guards);

    let report = MergeReport {
        coord: center,
        present,
        pull_only,
        stats,
        elapsed: t0.elapsed(),
    };
    log::debug!(
        target: "lighting",
        "merged {:?} in {:.2?}: {} chunks ({} pull-only), {}",
        center,
        report.elapsed,
        present,
        pull_only,
        stats
    );
    Ok(report)
}
