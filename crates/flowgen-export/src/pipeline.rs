//! The two export paths: verbatim vector file and rasterized document.

use flowgen_core::RenderedGraphic;
use flowgen_core::config::ExportConfig;

use crate::artifact::ExportArtifact;
use crate::dimensions::{RasterSize, SvgDimensions};
use crate::document::assemble_document;
use crate::error::ExportError;
use crate::markup::{encode_data_uri, rewrite_root_size, with_xml_declaration};
use crate::raster::{RasterImage, rasterize};

/// Wraps the markup unchanged as an `.svg` artifact.
pub fn export_vector(title: &str, graphic: &RenderedGraphic) -> ExportArtifact {
    ExportArtifact::svg(title, graphic.markup())
}

/// Markup ready to be loaded into a raster surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRaster {
    pub dimensions: SvgDimensions,
    pub size: RasterSize,
    pub data_uri: String,
}

/// Produces the A4 document export.
#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    config: ExportConfig,
}

impl DocumentExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Sizes the graphic to the target width and encodes it as a data URI.
    ///
    /// A size outside the surface limits fails with
    /// [`ExportError::SurfaceUnavailable`] before the markup is touched.
    pub fn prepare(&self, markup: &str) -> Result<PreparedRaster, ExportError> {
        let dimensions =
            SvgDimensions::parse(markup, self.config.default_width, self.config.default_height)?;
        let (width, height) = dimensions.scaled(self.config.target_width);
        let size = dimensions.raster_size(self.config.target_width);
        size.ensure_allocatable()?;

        let rewritten = rewrite_root_size(markup, width, height)?;
        let data_uri = encode_data_uri(&with_xml_declaration(rewritten));

        tracing::debug!(
            "[Export] {:?} size {}x{} scaled to {}x{}",
            dimensions.source,
            dimensions.width,
            dimensions.height,
            size.width,
            size.height
        );

        Ok(PreparedRaster {
            dimensions,
            size,
            data_uri,
        })
    }

    /// Loads the prepared markup into a white raster surface off the async
    /// runtime. Resolves to exactly one of the image or the load failure.
    pub async fn load_raster(&self, prepared: PreparedRaster) -> Result<RasterImage, ExportError> {
        tokio::task::spawn_blocking(move || rasterize(&prepared.data_uri, prepared.size))
            .await
            .map_err(|e| ExportError::ImageLoad(format!("raster task failed: {e}")))?
    }

    /// Runs the full document export.
    ///
    /// Returns `Ok(None)` when the raster surface cannot be acquired; that
    /// case is only logged.
    pub async fn export(
        &self,
        title: &str,
        graphic: &RenderedGraphic,
    ) -> Result<Option<ExportArtifact>, ExportError> {
        let prepared = match self.prepare(graphic.markup()) {
            Ok(prepared) => prepared,
            Err(ExportError::SurfaceUnavailable { width, height }) => {
                return Ok(surface_unavailable(width, height));
            }
            Err(e) => {
                tracing::warn!("[Export] Could not prepare graphic: {}", e);
                return Err(e);
            }
        };

        let image = match self.load_raster(prepared).await {
            Ok(image) => image,
            Err(ExportError::SurfaceUnavailable { width, height }) => {
                return Ok(surface_unavailable(width, height));
            }
            Err(e) => {
                tracing::warn!("[Export] {}", e);
                return Err(e);
            }
        };

        let doc_title = title.to_string();
        let bytes = tokio::task::spawn_blocking(move || assemble_document(&doc_title, &image))
            .await
            .map_err(|e| ExportError::Assembly(format!("document task failed: {e}")))?
            .inspect_err(|e| tracing::warn!("[Export] {}", e))?;

        Ok(Some(ExportArtifact::pdf(title, bytes)))
    }
}

fn surface_unavailable(width: u32, height: u32) -> Option<ExportArtifact> {
    tracing::error!("[Export] No raster surface for {}x{}, aborting", width, height);
    None
}
