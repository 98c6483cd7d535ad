use serde::{Deserialize, Serialize};

/// Pointer buttons the plot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Drag pans the view.
    Primary,
    /// Drag selects a zoom rectangle.
    Secondary,
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
}

/// Host input translated into plot terms. Positions are widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        x: i32,
        y: i32,
        button: PointerButton,
    },
    PointerUp {
        x: i32,
        y: i32,
        button: PointerButton,
    },
    PointerMove {
        x: i32,
        y: i32,
    },
    /// Positive `delta` zooms out, negative zooms in.
    Wheel {
        x: i32,
        y: i32,
        delta: i32,
        modifiers: Modifiers,
    },
    Key {
        key: char,
        modifiers: Modifiers,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
    ZoomSelecting,
}

/// Pointer drag bookkeeping between input events.
///
/// Anchors are kept in data coordinates so they stay meaningful while the
/// viewport moves underneath the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pointer: Option<(i32, i32)>,
    panning: bool,
    pan_anchor: (f64, f64),
    zoom_select: Option<ZoomSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomSelection {
    anchor: (f64, f64),
    current: (f64, f64),
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            pointer: None,
            panning: false,
            pan_anchor: (0.0, 0.0),
            zoom_select: None,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.zoom_select.is_some() {
            InteractionMode::ZoomSelecting
        } else if self.panning {
            InteractionMode::Panning
        } else {
            InteractionMode::Idle
        }
    }

    /// Last pointer position seen, in widget pixels.
    #[must_use]
    pub fn pointer(&self) -> Option<(i32, i32)> {
        self.pointer
    }

    /// Records the pointer position; returns whether it moved.
    pub fn on_pointer_move(&mut self, x: i32, y: i32) -> bool {
        let moved = self.pointer != Some((x, y));
        self.pointer = Some((x, y));
        moved
    }

    pub fn on_pan_start(&mut self, data_x: f64, data_y: f64) {
        self.panning = true;
        self.pan_anchor = (data_x, data_y);
    }

    /// Data delta between the pointer and the grabbed point, if panning.
    ///
    /// The anchor is left in place: once the view shifts by the delta the
    /// pointer maps back onto it.
    #[must_use]
    pub fn pan_delta(&self, data_x: f64, data_y: f64) -> Option<(f64, f64)> {
        self.panning
            .then(|| (data_x - self.pan_anchor.0, data_y - self.pan_anchor.1))
    }

    pub fn on_pan_end(&mut self) {
        self.panning = false;
    }

    pub fn on_zoom_select_start(&mut self, data_x: f64, data_y: f64) {
        self.zoom_select = Some(ZoomSelection {
            anchor: (data_x, data_y),
            current: (data_x, data_y),
        });
    }

    /// Moves the free corner of the selection; returns whether one is active.
    pub fn on_zoom_select_move(&mut self, data_x: f64, data_y: f64) -> bool {
        match self.zoom_select.as_mut() {
            Some(selection) => {
                selection.current = (data_x, data_y);
                true
            }
            None => false,
        }
    }

    /// Ends the selection at `(data_x, data_y)` and returns both corners.
    pub fn on_zoom_select_end(&mut self, data_x: f64, data_y: f64) -> Option<[f64; 4]> {
        let selection = self.zoom_select.take()?;
        Some([selection.anchor.0, selection.anchor.1, data_x, data_y])
    }

    /// Corners `[ax, ay, bx, by]` of the selection in progress.
    #[must_use]
    pub fn zoom_rect(&self) -> Option<[f64; 4]> {
        self.zoom_select.map(|selection| {
            [
                selection.anchor.0,
                selection.anchor.1,
                selection.current.0,
                selection.current.1,
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionMode, InteractionState};

    #[test]
    fn pan_delta_is_relative_to_anchor() {
        let mut state = InteractionState::default();
        assert_eq!(state.pan_delta(1.0, 1.0), None);
        state.on_pan_start(2.0, 3.0);
        assert_eq!(state.mode(), InteractionMode::Panning);
        assert_eq!(state.pan_delta(2.5, 2.0), Some((0.5, -1.0)));
        state.on_pan_end();
        assert_eq!(state.mode(), InteractionMode::Idle);
    }

    #[test]
    fn zoom_selection_tracks_free_corner() {
        let mut state = InteractionState::default();
        assert!(!state.on_zoom_select_move(1.0, 1.0));
        state.on_zoom_select_start(1.0, 2.0);
        assert!(state.on_zoom_select_move(3.0, 4.0));
        assert_eq!(state.zoom_rect(), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(state.on_zoom_select_end(5.0, 6.0), Some([1.0, 2.0, 5.0, 6.0]));
        assert_eq!(state.zoom_rect(), None);
    }

    #[test]
    fn repeated_position_is_not_a_move() {
        let mut state = InteractionState::default();
        assert!(state.on_pointer_move(3, 4));
        assert!(!state.on_pointer_move(3, 4));
        assert_eq!(state.pointer(), Some((3, 4)));
    }
}
