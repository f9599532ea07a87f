//! Displays the selected diagram: rendering, pan/zoom, and exports.

use std::sync::Arc;

use flowgen_core::messages;
use flowgen_core::{
    DiagramRecord, DiagramRenderer, InputDisposition, Point, PointerInput, RenderedGraphic,
    ViewTransform, Viewport, ViewportState,
};
use flowgen_export::{DocumentExporter, ExportArtifact, export_vector};
use tokio::sync::RwLock;

/// What the preview area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    /// No diagram selected
    Empty,
    Graphic(RenderedGraphic),
    /// The renderer rejected the source; the record itself is untouched
    InvalidSyntax {
        message: &'static str,
        hint: &'static str,
    },
}

/// Outcome of a document export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentExport {
    /// No rendered diagram to export
    NothingToExport,
    /// The raster surface was unavailable; logged only
    Aborted,
    Ready(ExportArtifact),
    /// Fixed notice for the user; no file was produced
    Failed(&'static str),
}

#[derive(Debug, Default)]
struct ViewerState {
    viewport: Viewport,
    record_id: Option<String>,
    title: String,
    graphic: Option<RenderedGraphic>,
    invalid: bool,
}

/// Binds the renderer, the viewport and the export pipeline to the record
/// currently on display.
pub struct DiagramViewer {
    renderer: Arc<dyn DiagramRenderer>,
    exporter: DocumentExporter,
    state: RwLock<ViewerState>,
}

impl DiagramViewer {
    pub fn new(renderer: Arc<dyn DiagramRenderer>, exporter: DocumentExporter) -> Self {
        Self {
            renderer,
            exporter,
            state: RwLock::new(ViewerState::default()),
        }
    }

    /// Renders `record` (or clears the display for `None`).
    ///
    /// A successful render resets the viewport. A failed one clears the
    /// previous graphic and shows the invalid-syntax placeholder.
    pub async fn show(&self, record: Option<&DiagramRecord>) -> RenderedView {
        let Some(record) = record else {
            let mut state = self.state.write().await;
            state.record_id = None;
            state.title.clear();
            state.graphic = None;
            state.invalid = false;
            return RenderedView::Empty;
        };

        let rendered = self.renderer.render(&record.diagram_source).await;

        let mut state = self.state.write().await;
        state.record_id = Some(record.id.clone());
        state.title = record.title.clone();
        match rendered {
            Ok(graphic) => {
                tracing::debug!("[Viewer] Rendered '{}'", record.title);
                state.graphic = Some(graphic.clone());
                state.invalid = false;
                state.viewport.reset();
                RenderedView::Graphic(graphic)
            }
            Err(e) => {
                tracing::warn!("[Viewer] Render failed for '{}': {}", record.title, e);
                state.graphic = None;
                state.invalid = true;
                invalid_syntax()
            }
        }
    }

    /// Current display without re-rendering.
    pub async fn view(&self) -> RenderedView {
        let state = self.state.read().await;
        match (&state.graphic, state.invalid) {
            (Some(graphic), _) => RenderedView::Graphic(graphic.clone()),
            (None, true) => invalid_syntax(),
            (None, false) => RenderedView::Empty,
        }
    }

    pub async fn record_id(&self) -> Option<String> {
        self.state.read().await.record_id.clone()
    }

    pub async fn viewport_state(&self) -> ViewportState {
        self.state.read().await.viewport.state()
    }

    pub async fn transform(&self) -> ViewTransform {
        self.state.read().await.viewport.transform()
    }

    pub async fn is_dragging(&self) -> bool {
        self.state.read().await.viewport.is_dragging()
    }

    pub async fn zoom_in(&self) -> ViewportState {
        let mut state = self.state.write().await;
        state.viewport.zoom_in();
        state.viewport.state()
    }

    pub async fn zoom_out(&self) -> ViewportState {
        let mut state = self.state.write().await;
        state.viewport.zoom_out();
        state.viewport.state()
    }

    pub async fn reset_view(&self) -> ViewportState {
        let mut state = self.state.write().await;
        state.viewport.reset();
        state.viewport.state()
    }

    pub async fn begin_drag(&self, pointer: Point) {
        self.state.write().await.viewport.begin_drag(pointer);
    }

    pub async fn continue_drag(&self, pointer: Point) -> bool {
        self.state.write().await.viewport.continue_drag(pointer)
    }

    pub async fn end_drag(&self) {
        self.state.write().await.viewport.end_drag();
    }

    pub async fn handle_input(&self, input: PointerInput<'_>) -> InputDisposition {
        self.state.write().await.viewport.handle_input(input)
    }

    /// The current graphic as an `.svg` artifact, byte for byte.
    pub async fn export_vector(&self) -> Option<ExportArtifact> {
        let state = self.state.read().await;
        let graphic = state.graphic.as_ref()?;
        Some(export_vector(&state.title, graphic))
    }

    /// Rasterizes the current graphic into an A4 document.
    pub async fn export_document(&self) -> DocumentExport {
        let (title, graphic) = {
            let state = self.state.read().await;
            match &state.graphic {
                Some(graphic) => (state.title.clone(), graphic.clone()),
                None => return DocumentExport::NothingToExport,
            }
        };

        match self.exporter.export(&title, &graphic).await {
            Ok(Some(artifact)) => DocumentExport::Ready(artifact),
            Ok(None) => DocumentExport::Aborted,
            Err(e) => match e.user_notice() {
                Some(notice) => DocumentExport::Failed(notice),
                None => DocumentExport::Aborted,
            },
        }
    }
}

fn invalid_syntax() -> RenderedView {
    RenderedView::InvalidSyntax {
        message: messages::RENDER_INVALID_SYNTAX,
        hint: messages::RENDER_INVALID_HINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowgen_core::FlowgenError;
    use flowgen_core::error::Result;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 40 20"><rect width="10" height="10"/></svg>"#;

    /// Renders anything except sources containing "invalid".
    struct MockRenderer;

    #[async_trait]
    impl DiagramRenderer for MockRenderer {
        async fn render(&self, source: &str) -> Result<RenderedGraphic> {
            if source.contains("invalid") {
                Err(FlowgenError::render("Parse error on line 1"))
            } else {
                Ok(RenderedGraphic::new(SVG))
            }
        }
    }

    fn record(id: &str, source: &str) -> DiagramRecord {
        DiagramRecord {
            id: id.to_string(),
            title: "Login Flow".to_string(),
            diagram_source: source.to_string(),
            explanation: String::new(),
            created_at: 0,
        }
    }

    fn viewer() -> DiagramViewer {
        DiagramViewer::new(Arc::new(MockRenderer), DocumentExporter::default())
    }

    #[tokio::test]
    async fn test_render_resets_viewport() {
        let viewer = viewer();
        viewer.zoom_in().await;
        viewer.begin_drag(Point::new(10.0, 10.0)).await;
        viewer.continue_drag(Point::new(40.0, 30.0)).await;
        viewer.end_drag().await;

        let view = viewer.show(Some(&record("a", "graph TD\nA-->B"))).await;
        assert!(matches!(view, RenderedView::Graphic(_)));

        let state = viewer.viewport_state().await;
        assert_eq!(state.scale(), 1.0);
        assert_eq!(state.offset(), Point::ORIGIN);
    }

    #[tokio::test]
    async fn test_render_failure_shows_placeholder_and_clears_graphic() {
        let viewer = viewer();
        viewer.show(Some(&record("a", "graph TD\nA-->B"))).await;

        let view = viewer.show(Some(&record("b", "invalid"))).await;
        assert_eq!(
            view,
            RenderedView::InvalidSyntax {
                message: "Erro na sintaxe do diagrama.",
                hint: "A IA gerou um código inválido. Tente novamente.",
            }
        );
        assert_eq!(viewer.view().await, view);
        assert!(viewer.export_vector().await.is_none());
        assert_eq!(viewer.export_document().await, DocumentExport::NothingToExport);
    }

    #[tokio::test]
    async fn test_exports_are_noops_without_diagram() {
        let viewer = viewer();
        assert_eq!(viewer.view().await, RenderedView::Empty);
        assert!(viewer.export_vector().await.is_none());
        assert_eq!(viewer.export_document().await, DocumentExport::NothingToExport);
    }

    #[tokio::test]
    async fn test_vector_export_uses_title_and_markup() {
        let viewer = viewer();
        viewer.show(Some(&record("a", "graph TD\nA-->B"))).await;

        let artifact = viewer.export_vector().await.unwrap();
        assert_eq!(artifact.file_name, "Login Flow.svg");
        assert_eq!(artifact.bytes, SVG.as_bytes());
    }

    #[tokio::test]
    async fn test_touch_move_while_dragging_prevents_default() {
        let viewer = viewer();
        let touches = [Point::new(5.0, 5.0)];
        assert_eq!(
            viewer.handle_input(PointerInput::TouchStart(&touches)).await,
            InputDisposition::Default
        );
        assert_eq!(
            viewer.handle_input(PointerInput::TouchMove(&touches)).await,
            InputDisposition::PreventDefault
        );
        viewer.handle_input(PointerInput::TouchEnd).await;
        assert!(!viewer.is_dragging().await);
    }

    #[tokio::test]
    async fn test_clearing_selection_empties_view() {
        let viewer = viewer();
        viewer.show(Some(&record("a", "graph TD\nA-->B"))).await;
        assert_eq!(viewer.record_id().await.as_deref(), Some("a"));

        assert_eq!(viewer.show(None).await, RenderedView::Empty);
        assert_eq!(viewer.record_id().await, None);
    }
}
