//! Pan/zoom state machine driven by pointer and touch input.

use crate::viewport::model::{Point, ViewTransform, ViewportState, ZOOM_STEP};

/// Drag tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `origin` is the pointer position minus the offset at drag start.
    Dragging { origin: Point },
}

/// Raw input delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput<'a> {
    MouseDown(Point),
    MouseMove(Point),
    MouseUp,
    MouseLeave,
    /// Active touch points; only the first one drives the pan.
    TouchStart(&'a [Point]),
    TouchMove(&'a [Point]),
    TouchEnd,
}

/// Whether the host should run its default handling for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    Default,
    /// Suppress page scrolling and scroll bounce.
    PreventDefault,
}

/// Interactive viewport: owns [`ViewportState`] and the drag state machine.
///
/// Two states, `Idle` and `Dragging`. Only [`Viewport::begin_drag`] enters
/// `Dragging` and only [`Viewport::end_drag`] leaves it.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    state: ViewportState,
    drag: DragState,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.transform()
    }

    pub fn zoom_in(&mut self) {
        self.state.step_scale(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.state.step_scale(-ZOOM_STEP);
    }

    /// Restores scale 1 and offset (0, 0). The drag state is left as is.
    pub fn reset(&mut self) {
        self.state = ViewportState::default();
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag = DragState::Dragging {
            origin: pointer - self.state.offset(),
        };
    }

    /// Moves the offset with the pointer. No-op when idle.
    pub fn continue_drag(&mut self, pointer: Point) -> bool {
        match self.drag {
            DragState::Dragging { origin } => {
                self.state.set_offset(pointer - origin);
                true
            }
            DragState::Idle => false,
        }
    }

    /// Leaves the dragging state. Safe to call when idle.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Dispatches host input onto the drag operations.
    pub fn handle_input(&mut self, input: PointerInput<'_>) -> InputDisposition {
        match input {
            PointerInput::MouseDown(p) => self.begin_drag(p),
            PointerInput::MouseMove(p) => {
                self.continue_drag(p);
            }
            PointerInput::MouseUp | PointerInput::MouseLeave | PointerInput::TouchEnd => {
                self.end_drag()
            }
            PointerInput::TouchStart(touches) => {
                if let Some(first) = touches.first() {
                    self.begin_drag(*first);
                }
            }
            PointerInput::TouchMove(touches) => {
                if let Some(first) = touches.first()
                    && self.continue_drag(*first)
                {
                    return InputDisposition::PreventDefault;
                }
            }
        }
        InputDisposition::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::model::{MAX_SCALE, MIN_SCALE};

    #[test]
    fn test_zoom_saturates_at_bounds() {
        let mut viewport = Viewport::new();
        for _ in 0..100 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.state().scale(), MAX_SCALE);

        for _ in 0..100 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.state().scale(), MIN_SCALE);
    }

    #[test]
    fn test_zoom_stays_in_bounds_for_mixed_sequences() {
        let mut viewport = Viewport::new();
        for i in 0..200 {
            if (i * 7) % 3 == 0 {
                viewport.zoom_out();
            } else {
                viewport.zoom_in();
            }
            let scale = viewport.state().scale();
            assert!((MIN_SCALE..=MAX_SCALE).contains(&scale));
        }
    }

    #[test]
    fn test_zoom_step_is_additive() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        assert!((viewport.state().scale() - 1.2).abs() < 1e-9);
        viewport.zoom_out();
        viewport.zoom_out();
        assert!((viewport.state().scale() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut viewport = Viewport::new();
        viewport.zoom_in();
        viewport.begin_drag(Point::new(10.0, 10.0));
        viewport.continue_drag(Point::new(50.0, 70.0));
        viewport.end_drag();

        viewport.reset();
        assert_eq!(viewport.state(), ViewportState::default());
    }

    #[test]
    fn test_drag_moves_offset_relative_to_start() {
        let mut viewport = Viewport::new();
        viewport.begin_drag(Point::new(100.0, 100.0));
        viewport.continue_drag(Point::new(130.0, 90.0));
        assert_eq!(viewport.state().offset(), Point::new(30.0, -10.0));
        viewport.end_drag();

        // Second drag continues from the current offset.
        viewport.begin_drag(Point::new(0.0, 0.0));
        viewport.continue_drag(Point::new(5.0, 5.0));
        assert_eq!(viewport.state().offset(), Point::new(35.0, -5.0));
    }

    #[test]
    fn test_pan_speed_ignores_zoom() {
        let mut viewport = Viewport::new();
        for _ in 0..5 {
            viewport.zoom_in();
        }
        viewport.begin_drag(Point::new(0.0, 0.0));
        viewport.continue_drag(Point::new(40.0, 0.0));
        assert_eq!(viewport.state().offset(), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_continue_drag_when_idle_is_noop() {
        let mut viewport = Viewport::new();
        assert!(!viewport.continue_drag(Point::new(10.0, 10.0)));
        assert_eq!(viewport.state().offset(), Point::ORIGIN);
    }

    #[test]
    fn test_end_drag_without_begin_stays_idle() {
        let mut viewport = Viewport::new();
        viewport.end_drag();
        viewport.end_drag();
        assert_eq!(viewport.drag_state(), DragState::Idle);
        assert_eq!(viewport.state(), ViewportState::default());
    }

    #[test]
    fn test_touch_move_while_dragging_prevents_default() {
        let mut viewport = Viewport::new();
        let start = [Point::new(1.0, 1.0), Point::new(300.0, 300.0)];
        let moved = [Point::new(11.0, 21.0)];

        assert_eq!(
            viewport.handle_input(PointerInput::TouchMove(&moved)),
            InputDisposition::Default
        );
        viewport.handle_input(PointerInput::TouchStart(&start));
        assert_eq!(
            viewport.handle_input(PointerInput::TouchMove(&moved)),
            InputDisposition::PreventDefault
        );
        assert_eq!(viewport.state().offset(), Point::new(10.0, 20.0));

        viewport.handle_input(PointerInput::TouchEnd);
        assert!(!viewport.is_dragging());
    }

    #[test]
    fn test_empty_touch_list_is_ignored() {
        let mut viewport = Viewport::new();
        viewport.handle_input(PointerInput::TouchStart(&[]));
        assert!(!viewport.is_dragging());
    }

    #[test]
    fn test_mouse_leave_ends_drag() {
        let mut viewport = Viewport::new();
        viewport.handle_input(PointerInput::MouseDown(Point::new(0.0, 0.0)));
        assert_eq!(
            viewport.handle_input(PointerInput::MouseMove(Point::new(3.0, 4.0))),
            InputDisposition::Default
        );
        viewport.handle_input(PointerInput::MouseLeave);
        viewport.handle_input(PointerInput::MouseMove(Point::new(100.0, 100.0)));
        assert_eq!(viewport.state().offset(), Point::new(3.0, 4.0));
    }
}
