//! A4 page layout and PDF assembly around a single raster image.

use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

use crate::error::ExportError;
use crate::raster::RasterImage;

pub const A4_SHORT_MM: f64 = 210.0;
pub const A4_LONG_MM: f64 = 297.0;

/// At this resolution one image pixel is one millimetre before scaling.
const PIXEL_PER_MM_DPI: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Placement of an image on a page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub orientation: Orientation,
    pub page_width: f64,
    pub page_height: f64,
    /// Uniform millimetres-per-pixel factor
    pub ratio: f64,
    pub image_width: f64,
    pub image_height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl PageLayout {
    /// Fits an image of `width` × `height` pixels onto an A4 page, landscape
    /// when the image is wider than tall, centered without distortion.
    pub fn fit(width: u32, height: u32) -> Self {
        let orientation = if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let (page_width, page_height) = match orientation {
            Orientation::Landscape => (A4_LONG_MM, A4_SHORT_MM),
            Orientation::Portrait => (A4_SHORT_MM, A4_LONG_MM),
        };

        let width = f64::from(width.max(1));
        let height = f64::from(height.max(1));
        let ratio = (page_width / width).min(page_height / height);
        let image_width = width * ratio;
        let image_height = height * ratio;

        Self {
            orientation,
            page_width,
            page_height,
            ratio,
            image_width,
            image_height,
            margin_x: (page_width - image_width) / 2.0,
            margin_y: (page_height - image_height) / 2.0,
        }
    }
}

/// Builds a one-page PDF holding `image` laid out by [`PageLayout::fit`].
pub fn assemble_document(title: &str, image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let layout = PageLayout::fit(image.width, image.height);
    tracing::debug!(
        "[Export] {:?} page, image {:.1}x{:.1} mm at ({:.1}, {:.1})",
        layout.orientation,
        layout.image_width,
        layout.image_height,
        layout.margin_x,
        layout.margin_y
    );

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(layout.page_width as f32),
        Mm(layout.page_height as f32),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let decoder = PngDecoder::new(Cursor::new(image.png.as_slice()))
        .map_err(|e| ExportError::Assembly(format!("PNG decode: {e}")))?;
    let pdf_image =
        Image::try_from(decoder).map_err(|e| ExportError::Assembly(format!("PDF image: {e}")))?;

    // The layout is symmetric, so the bottom-left origin needs no flip.
    pdf_image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(layout.margin_x as f32)),
            translate_y: Some(Mm(layout.margin_y as f32)),
            scale_x: Some(layout.ratio as f32),
            scale_y: Some(layout.ratio as f32),
            dpi: Some(PIXEL_PER_MM_DPI),
            ..Default::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| ExportError::Assembly(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_wide_image_is_landscape_and_width_bound() {
        let layout = PageLayout::fit(3000, 1500);
        assert_eq!(layout.orientation, Orientation::Landscape);
        assert_eq!((layout.page_width, layout.page_height), (297.0, 210.0));
        assert!(close(layout.ratio, 0.099));
        assert!(close(layout.image_width, 297.0));
        assert!(close(layout.image_height, 148.5));
        assert!(close(layout.margin_x, 0.0));
        assert!(close(layout.margin_y, 30.75));
    }

    #[test]
    fn test_square_image_is_portrait_and_centered_vertically() {
        let layout = PageLayout::fit(3000, 3000);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert!(close(layout.image_width, 210.0));
        assert!(close(layout.margin_y, (297.0 - 210.0) / 2.0));
    }

    #[test]
    fn test_tall_image_is_height_bound() {
        let layout = PageLayout::fit(3000, 9000);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert!(close(layout.image_height, 297.0));
        assert!(close(layout.image_width, 99.0));
        assert!(close(layout.margin_x, 55.5));
    }

    #[test]
    fn test_assembles_pdf_bytes() {
        let png = crate::raster::encode_png(&crate::raster::acquire_surface(
            crate::dimensions::RasterSize {
                width: 30,
                height: 15,
            },
        ).unwrap())
        .unwrap();
        let image = RasterImage {
            width: 30,
            height: 15,
            png,
        };

        let bytes = assemble_document("Login Flow", &image).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_corrupt_png_is_assembly_error() {
        let image = RasterImage {
            width: 1,
            height: 1,
            png: b"not a png".to_vec(),
        };
        let err = assemble_document("x", &image).unwrap_err();
        assert!(matches!(err, ExportError::Assembly(_)));
    }
}
