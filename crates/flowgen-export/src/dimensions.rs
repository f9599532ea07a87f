//! Intrinsic size of a vector graphic and its high-resolution raster size.

use crate::error::ExportError;
use crate::markup::{RootAttributes, root_attributes};

/// Where the intrinsic size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionSource {
    ViewBox,
    Attributes,
    Default,
}

/// Intrinsic bounding box of a graphic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgDimensions {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
    pub source: DimensionSource,
}

/// Longest side a raster surface may have.
pub const MAX_SURFACE_SIDE: u32 = 16_384;
/// Largest pixel count a raster surface may have.
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Whole-pixel size of the raster surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: u32,
    pub height: u32,
}

impl RasterSize {
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Whether a surface of this size may be allocated at all.
    pub fn is_allocatable(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.width <= MAX_SURFACE_SIDE
            && self.height <= MAX_SURFACE_SIDE
            && u64::from(self.width) * u64::from(self.height) <= MAX_SURFACE_AREA
    }

    /// Fails with [`ExportError::SurfaceUnavailable`] when the size is
    /// outside the surface limits.
    pub fn ensure_allocatable(&self) -> Result<(), ExportError> {
        if self.is_allocatable() {
            Ok(())
        } else {
            Err(ExportError::SurfaceUnavailable {
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl SvgDimensions {
    /// Parses the root element of `markup`.
    pub fn parse(markup: &str, default_width: f64, default_height: f64) -> Result<Self, ExportError> {
        let attrs = root_attributes(markup)?;
        Ok(Self::from_attributes(&attrs, default_width, default_height))
    }

    /// Resolves the size in order: a usable `viewBox`, then `width`/`height`
    /// (each falling back to its default on its own), then the defaults.
    pub fn from_attributes(attrs: &RootAttributes, default_width: f64, default_height: f64) -> Self {
        if let Some([min_x, min_y, width, height]) = attrs.view_box.as_deref().and_then(parse_view_box)
            && is_usable(width)
            && is_usable(height)
        {
            return Self {
                min_x,
                min_y,
                width,
                height,
                source: DimensionSource::ViewBox,
            };
        }

        let width = attrs.width.as_deref().and_then(parse_length);
        let height = attrs.height.as_deref().and_then(parse_length);
        let source = if width.is_some() || height.is_some() {
            DimensionSource::Attributes
        } else {
            DimensionSource::Default
        };

        Self {
            min_x: 0.0,
            min_y: 0.0,
            width: width.unwrap_or(default_width),
            height: height.unwrap_or(default_height),
            source,
        }
    }

    /// Uniform factor that brings the width to `target_width`.
    pub fn scale_factor(&self, target_width: f64) -> f64 {
        target_width / self.width
    }

    /// Scaled size with the aspect ratio preserved.
    pub fn scaled(&self, target_width: f64) -> (f64, f64) {
        (target_width, self.height * self.scale_factor(target_width))
    }

    /// Raster surface size: the scaled size truncated to whole pixels,
    /// at least one pixel on each side. Sizes that overflow saturate.
    pub fn raster_size(&self, target_width: f64) -> RasterSize {
        let (width, height) = self.scaled(target_width);
        RasterSize {
            width: to_pixels(width),
            height: to_pixels(height),
        }
    }
}

fn parse_view_box(value: &str) -> Option<[f64; 4]> {
    let mut numbers = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok());

    let mut parsed = [0.0; 4];
    for slot in parsed.iter_mut() {
        *slot = numbers.next()??;
    }
    if numbers.next().is_some() {
        return None;
    }
    Some(parsed)
}

/// Accepts a plain number or a `px` length; other units are rejected.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| is_usable(*n))
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn to_pixels(value: f64) -> u32 {
    if !value.is_finite() {
        return u32::MAX;
    }
    (value.floor() as u32).max(1)
}
