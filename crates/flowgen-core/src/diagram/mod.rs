pub mod history;
pub mod model;
pub mod repository;

pub use history::History;
pub use model::{DiagramRecord, DiagramResponse, DiagramType, ViewMode};
pub use repository::HistoryRepository;
