use flowgen_core::FlowgenError;
use flowgen_core::messages;
use thiserror::Error;

/// Failures of the export pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The offscreen raster surface could not be allocated
    #[error("Raster surface of {width}x{height} could not be allocated")]
    SurfaceUnavailable { width: u32, height: u32 },

    /// The markup could not be loaded into the raster surface
    #[error("Failed to load graphic into raster surface: {0}")]
    ImageLoad(String),

    /// The document could not be assembled or encoded
    #[error("Failed to assemble document: {0}")]
    Assembly(String),

    /// The markup is not a well-formed `<svg>` document
    #[error("Invalid vector markup: {0}")]
    InvalidMarkup(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ExportError {
    /// Fixed notice shown to the user, if this failure is surfaced at all.
    ///
    /// Surface allocation failures are only logged.
    pub fn user_notice(&self) -> Option<&'static str> {
        match self {
            Self::SurfaceUnavailable { .. } => None,
            Self::ImageLoad(_) | Self::InvalidMarkup(_) => Some(messages::EXPORT_IMAGE_LOAD_FAILED),
            Self::Assembly(_) | Self::Io(_) => Some(messages::EXPORT_DOCUMENT_FAILED),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<ExportError> for FlowgenError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Io(message) => FlowgenError::io(message),
            other => FlowgenError::Export(other.to_string()),
        }
    }
}
