pub mod display;
pub mod export;
pub mod history;
pub mod target;
