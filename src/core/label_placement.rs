//! Overlap-free tic label selection with frame-to-frame stability.

use serde::{Deserialize, Serialize};

/// Axis-aligned label bounds in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl LabelBox {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Grows the box by `dx` on the left and right and `dy` on top and bottom.
    #[must_use]
    pub fn expanded(self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left - dx,
            top: self.top - dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Interiors intersect. Boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// One tic label competing for space on an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCandidate<T> {
    /// Collision box, already grown by the inter-label margin.
    pub bounds: LabelBox,
    pub decimation_level: u32,
    pub quant: i64,
    pub payload: T,
}

/// Remembers which grid indices were labelled last frame on one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPlacer {
    drawn_quants: Vec<i64>,
}

impl LabelPlacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the previous frame, e.g. after a zoom changed the grid.
    pub fn reset(&mut self) {
        self.drawn_quants.clear();
    }

    #[must_use]
    pub fn drawn_quants(&self) -> &[i64] {
        &self.drawn_quants
    }

    /// Selects the labels to draw, in commit order.
    ///
    /// Candidates are ranked by decimation level. Within a level, labels shown
    /// last frame are tried before the others, and a label is committed only
    /// if its box misses every box committed so far.
    pub fn place<T>(&mut self, mut candidates: Vec<LabelCandidate<T>>) -> Vec<LabelCandidate<T>> {
        let previous = std::mem::take(&mut self.drawn_quants);
        candidates.sort_by(|a, b| b.decimation_level.cmp(&a.decimation_level));

        let mut slots: Vec<Option<LabelCandidate<T>>> = candidates.into_iter().map(Some).collect();
        let mut committed: Vec<LabelCandidate<T>> = Vec::new();

        let mut block_start = 0;
        while block_start < slots.len() {
            let level = slots[block_start]
                .as_ref()
                .map_or(0, |candidate| candidate.decimation_level);
            let block_end = slots[block_start..]
                .iter()
                .position(|slot| {
                    slot.as_ref()
                        .is_some_and(|candidate| candidate.decimation_level != level)
                })
                .map_or(slots.len(), |offset| block_start + offset);

            for shown_last_frame in [true, false] {
                for slot in &mut slots[block_start..block_end] {
                    let Some(candidate) = slot.as_ref() else {
                        continue;
                    };
                    if previous.contains(&candidate.quant) != shown_last_frame {
                        continue;
                    }
                    let collides = committed
                        .iter()
                        .any(|drawn| drawn.bounds.overlaps(&candidate.bounds));
                    if !collides {
                        if let Some(candidate) = slot.take() {
                            self.drawn_quants.push(candidate.quant);
                            committed.push(candidate);
                        }
                    }
                }
            }
            block_start = block_end;
        }

        committed
    }
}
