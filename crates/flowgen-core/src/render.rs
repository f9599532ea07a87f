//! Rendering collaborator trait and its output type.

use async_trait::async_trait;

use crate::error::Result;

/// Serialized vector graphic produced from a diagram source.
///
/// Treated as immutable output of the renderer; a new value is produced
/// whenever the source changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGraphic {
    markup: String,
}

impl RenderedGraphic {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }

    /// Embedded foreign markup taints rasterization, so the renderer is
    /// configured to never emit it. This reports when it slipped through.
    pub fn has_foreign_object(&self) -> bool {
        self.markup.contains("<foreignObject")
    }
}

/// Converts diagram source into vector markup.
///
/// An invalid source yields `FlowgenError::Render`.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, source: &str) -> Result<RenderedGraphic>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_object_detection() {
        let clean = RenderedGraphic::new("<svg><text>a</text></svg>");
        let tainted = RenderedGraphic::new("<svg><foreignObject><div/></foreignObject></svg>");
        assert!(!clean.has_foreign_object());
        assert!(tainted.has_foreign_object());
    }
}
