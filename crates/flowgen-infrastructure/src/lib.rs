pub mod config_service;
pub mod history_repository;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::history_repository::{HISTORY_KEY, JsonHistoryRepository};
pub use crate::paths::FlowgenPaths;
pub use crate::secret_service::SecretServiceImpl;
