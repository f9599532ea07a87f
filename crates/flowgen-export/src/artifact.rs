//! Downloadable export artifacts and their file names.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExportError;

pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

const FALLBACK_STEM: &str = "diagram";
const MAX_STEM_CHARS: usize = 200;

static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).expect("Failed to compile invalid filename regex")
});
static RESERVED_NAMES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])$")
        .expect("Failed to compile reserved filename regex")
});

/// A finished export: bytes plus the name and media type to save them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn svg(title: &str, markup: &str) -> Self {
        Self {
            file_name: format!("{}.svg", sanitize_filename(title)),
            media_type: SVG_MEDIA_TYPE,
            bytes: markup.as_bytes().to_vec(),
        }
    }

    pub fn pdf(title: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: format!("{}.pdf", sanitize_filename(title)),
            media_type: PDF_MEDIA_TYPE,
            bytes,
        }
    }

    /// Writes the artifact into `dir`, creating it if needed, and returns the
    /// full path. An existing file of the same name is replaced.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!("[Export] Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Turns a diagram title into a portable file stem.
///
/// Characters invalid on common filesystems become `_`; an empty result
/// falls back to `diagram`.
pub fn sanitize_filename(title: &str) -> String {
    let replaced = INVALID_CHARS.replace_all(title, "_");
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return FALLBACK_STEM.to_string();
    }

    if RESERVED_NAMES.is_match(trimmed) {
        return format!("_{trimmed}");
    }

    trimmed.chars().take(MAX_STEM_CHARS).collect()
}
