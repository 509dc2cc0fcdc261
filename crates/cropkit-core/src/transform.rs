//! User-adjustable pan and zoom state, plus the input state machine.
//!
//! [`TransformState`] is pure data: a pan offset in viewport pixels and
//! a clamped zoom scalar. Mutation happens only through
//! [`InputState::apply`], a pure reducer over [`Input`] events, so drag
//! gestures can be unit-tested without simulating real pointer events.
//!
//! Events are last-write-wins and applied in delivery order; there is no
//! other ordering requirement.

use serde::{Deserialize, Serialize};

/// Minimum zoom factor.
pub const ZOOM_MIN: f64 = 0.5;
/// Maximum zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Pan offset and zoom factor for the displayed image.
///
/// Pan is unclamped: the user may drag the image far enough that the
/// crop frame leaves the image entirely. The extraction pipeline handles
/// the resulting out-of-range sampling rather than this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// Horizontal pan in viewport pixels.
    pub pan_x: f64,
    /// Vertical pan in viewport pixels.
    pub pan_y: f64,
    /// Zoom factor, always within [`ZOOM_MIN`]..=[`ZOOM_MAX`].
    pub zoom: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl TransformState {
    /// Create the default transform (no pan, zoom 1.0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the zoom factor, clamping to the legal range.
    ///
    /// Out-of-range values are clamped, never rejected. Changing zoom
    /// does not re-center pan.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }
}

/// A pointer or control event delivered to the cropper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Input {
    /// Pointer pressed at viewport coordinates.
    PointerDown { x: f64, y: f64 },
    /// Pointer moved to viewport coordinates.
    PointerMove { x: f64, y: f64 },
    /// Pointer released.
    PointerUp,
    /// Zoom control changed.
    SetZoom(f64),
}

/// The drag state machine: `Idle -> Panning -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    ///
    /// The anchor is the pointer position minus the pan at drag start,
    /// so the grabbed image point stays under the pointer as it moves.
    Panning { anchor_x: f64, anchor_y: f64 },
}

impl InputState {
    /// Reduce one input event into a new `(InputState, TransformState)`.
    ///
    /// Pure function of its inputs: no interior mutation, no I/O.
    /// `PointerMove` while `Idle` is ignored; `SetZoom` is legal in any
    /// state and clamps rather than rejects.
    pub fn apply(self, transform: TransformState, event: Input) -> (Self, TransformState) {
        match (self, event) {
            (_, Input::PointerDown { x, y }) => (
                InputState::Panning {
                    anchor_x: x - transform.pan_x,
                    anchor_y: y - transform.pan_y,
                },
                transform,
            ),
            (InputState::Panning { anchor_x, anchor_y }, Input::PointerMove { x, y }) => (
                self,
                TransformState {
                    pan_x: x - anchor_x,
                    pan_y: y - anchor_y,
                    ..transform
                },
            ),
            (InputState::Idle, Input::PointerMove { .. }) => (self, transform),
            (_, Input::PointerUp) => (InputState::Idle, transform),
            (_, Input::SetZoom(z)) => {
                let mut next = transform;
                next.set_zoom(z);
                (self, next)
            }
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn event_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            (-2000.0f64..=2000.0, -2000.0f64..=2000.0)
                .prop_map(|(x, y)| Input::PointerDown { x, y }),
            (-2000.0f64..=2000.0, -2000.0f64..=2000.0)
                .prop_map(|(x, y)| Input::PointerMove { x, y }),
            Just(Input::PointerUp),
            (-10.0f64..=10.0).prop_map(Input::SetZoom),
        ]
    }

    proptest! {
        /// Property: zoom stays within bounds under any event sequence.
        #[test]
        fn prop_zoom_always_in_bounds(events in prop::collection::vec(event_strategy(), 0..50)) {
            let mut state = InputState::default();
            let mut transform = TransformState::new();

            for event in events {
                let (next_state, next_transform) = state.apply(transform, event);
                state = next_state;
                transform = next_transform;

                prop_assert!(transform.zoom >= ZOOM_MIN);
                prop_assert!(transform.zoom <= ZOOM_MAX);
            }
        }

        /// Property: the reducer is a pure function (same inputs, same outputs).
        #[test]
        fn prop_reducer_deterministic(
            event in event_strategy(),
            pan_x in -500.0f64..=500.0,
            pan_y in -500.0f64..=500.0,
        ) {
            let state = InputState::Panning { anchor_x: 3.0, anchor_y: 7.0 };
            let transform = TransformState { pan_x, pan_y, zoom: 1.5 };

            let a = state.apply(transform, event);
            let b = state.apply(transform, event);
            prop_assert_eq!(a, b);
        }

        /// Property: during a drag the grabbed point follows the pointer.
        #[test]
        fn prop_drag_tracks_pointer(
            (down_x, down_y) in (-1000.0f64..=1000.0, -1000.0f64..=1000.0),
            (move_x, move_y) in (-1000.0f64..=1000.0, -1000.0f64..=1000.0),
            pan_x in -500.0f64..=500.0,
            pan_y in -500.0f64..=500.0,
        ) {
            let transform = TransformState { pan_x, pan_y, zoom: 1.0 };
            let (state, transform) =
                InputState::Idle.apply(transform, Input::PointerDown { x: down_x, y: down_y });
            let (_, transform) =
                state.apply(transform, Input::PointerMove { x: move_x, y: move_y });

            // Pan changed by exactly the pointer delta
            prop_assert!((transform.pan_x - (pan_x + move_x - down_x)).abs() < 1e-9);
            prop_assert!((transform.pan_y - (pan_y + move_y - down_y)).abs() < 1e-9);
        }
    }
}
