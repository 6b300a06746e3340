use crate::contour::StateCounts;
use crate::site::SearchPhase;
use serde::Serialize;

/// Summary of one tracking pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
    pub phase: SearchPhase,
    /// Model size at the end of the pass (after pruning, if enabled).
    pub total: usize,
    /// Sites in `Valid` state at the end of the pass.
    pub good: usize,
    /// Per-state counts before pruning.
    pub counts: StateCounts,
    /// Sites whose search faulted and were isolated as robust rejections.
    pub faulted: usize,
    /// Sites removed by the prune-after-pass policy.
    pub pruned: usize,
    /// Mean displacement of the valid sites (pixels).
    pub mean_displacement: f32,
    pub max_displacement: f32,
    pub elapsed_ms: f64,
}

impl PassReport {
    /// Fraction of the contour still trusted; 0 for an empty model.
    pub fn good_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.good as f32 / self.total as f32
        }
    }
}
