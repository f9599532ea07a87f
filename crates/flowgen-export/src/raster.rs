//! Rasterization of the rewritten markup onto an opaque white surface.

use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg;

use crate::dimensions::RasterSize;
use crate::error::ExportError;
use crate::markup::decode_data_uri;

/// Lossless raster image ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// PNG-encoded RGB pixels
    pub png: Vec<u8>,
}

/// Allocates an opaque white surface of `size`.
///
/// Sizes outside the surface limits are refused before any allocation.
pub fn acquire_surface(size: RasterSize) -> Result<Pixmap, ExportError> {
    size.ensure_allocatable()?;
    let mut pixmap = Pixmap::new(size.width, size.height).ok_or(ExportError::SurfaceUnavailable {
        width: size.width,
        height: size.height,
    })?;
    pixmap.fill(Color::WHITE);
    Ok(pixmap)
}

/// Loads the graphic behind `data_uri` and draws it over `surface`,
/// stretched to the surface size.
pub fn draw_data_uri(surface: &mut Pixmap, data_uri: &str) -> Result<(), ExportError> {
    let markup = decode_data_uri(data_uri)?;

    let mut options = usvg::Options::default();
    if markup.contains("<text") || markup.contains("font-family") {
        options.fontdb_mut().load_system_fonts();
    }

    let tree = usvg::Tree::from_str(&markup, &options)
        .map_err(|e| ExportError::ImageLoad(e.to_string()))?;

    let size = tree.size();
    let scale_x = surface.width() as f32 / size.width();
    let scale_y = surface.height() as f32 / size.height();
    resvg::render(&tree, Transform::from_scale(scale_x, scale_y), &mut surface.as_mut());
    Ok(())
}

/// Encodes the surface as an 8-bit RGB PNG.
///
/// The surface is fully opaque, so dropping alpha loses nothing and keeps
/// the document free of soft masks.
pub fn encode_png(surface: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let rgb: Vec<u8> = surface
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Assembly(format!("PNG header: {e}")))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| ExportError::Assembly(format!("PNG data: {e}")))?;
        writer
            .finish()
            .map_err(|e| ExportError::Assembly(format!("PNG trailer: {e}")))?;
    }
    Ok(bytes)
}

/// Runs the whole raster step: surface, load, encode.
pub fn rasterize(data_uri: &str, size: RasterSize) -> Result<RasterImage, ExportError> {
    let mut surface = acquire_surface(size)?;
    draw_data_uri(&mut surface, data_uri)?;
    let png = encode_png(&surface)?;
    Ok(RasterImage {
        width: size.width,
        height: size.height,
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::encode_data_uri;

    fn decode(png_bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(png_bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn test_transparent_graphic_rasterizes_on_white() {
        let uri = encode_data_uri(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="40px" height="20px" viewBox="0 0 4 2"></svg>"#,
        );
        let image = rasterize(&uri, RasterSize { width: 40, height: 20 }).unwrap();
        assert_eq!((image.width, image.height), (40, 20));

        let (info, pixels) = decode(&image.png);
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!((info.width, info.height), (40, 20));
        assert!(pixels.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_shapes_are_drawn_scaled() {
        let uri = encode_data_uri(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="30px" height="10px" viewBox="0 0 3 1"><rect x="0" y="0" width="1" height="1" fill="#000000"/></svg>"##,
        );
        let image = rasterize(&uri, RasterSize { width: 30, height: 10 }).unwrap();
        let (_, pixels) = decode(&image.png);

        // Row 5: left third black, right third white.
        let row = 5 * 30 * 3;
        assert_eq!(&pixels[row + 3 * 3..row + 3 * 3 + 3], &[0, 0, 0]);
        assert_eq!(&pixels[row + 25 * 3..row + 25 * 3 + 3], &[255, 255, 255]);
    }

    #[test]
    fn test_malformed_markup_is_image_load_error() {
        let uri = encode_data_uri("<svg><g></svg>");
        let err = rasterize(&uri, RasterSize { width: 10, height: 10 }).unwrap_err();
        assert!(matches!(err, ExportError::ImageLoad(_)));
    }

    #[test]
    fn test_zero_sized_surface_is_unavailable() {
        let err = acquire_surface(RasterSize { width: 0, height: 10 }).unwrap_err();
        assert_eq!(
            err,
            ExportError::SurfaceUnavailable {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_oversized_surface_is_refused_without_allocating() {
        let err = acquire_surface(RasterSize {
            width: 3000,
            height: 3_000_000_000,
        })
        .unwrap_err();
        assert!(matches!(err, ExportError::SurfaceUnavailable { .. }));
    }
}
