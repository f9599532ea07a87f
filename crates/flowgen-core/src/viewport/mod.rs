//! Interactive diagram viewport.

pub mod engine;
pub mod model;

pub use engine::{DragState, InputDisposition, PointerInput, Viewport};
pub use model::{MAX_SCALE, MIN_SCALE, Point, ViewTransform, ViewportState, ZOOM_STEP};
