pub mod config;
pub mod diagram;
pub mod error;
pub mod generation;
pub mod messages;
pub mod render;
pub mod secret;
pub mod viewport;

// Re-export common error type
pub use error::FlowgenError;

pub use diagram::{DiagramRecord, DiagramResponse, DiagramType, History, HistoryRepository, ViewMode};
pub use generation::DiagramGenerator;
pub use render::{DiagramRenderer, RenderedGraphic};
pub use viewport::{InputDisposition, Point, PointerInput, ViewTransform, Viewport, ViewportState};
