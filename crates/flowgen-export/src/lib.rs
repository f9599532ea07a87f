//! Export pipeline: standalone vector files and rasterized A4 documents.

pub mod artifact;
pub mod dimensions;
pub mod document;
pub mod error;
pub mod markup;
pub mod pipeline;
pub mod raster;

pub use artifact::{ExportArtifact, sanitize_filename};
pub use dimensions::{DimensionSource, RasterSize, SvgDimensions};
pub use document::{Orientation, PageLayout};
pub use error::ExportError;
pub use pipeline::{DocumentExporter, PreparedRaster, export_vector};
pub use raster::RasterImage;
