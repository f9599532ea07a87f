//! Wires the configured collaborators into a running application.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use flowgen_core::config::FlowgenConfig;
use flowgen_core::error::Result;
use flowgen_core::secret::SecretService;
use flowgen_core::{
    DiagramGenerator, DiagramRecord, DiagramRenderer, DiagramResponse, HistoryRepository,
};
use flowgen_export::{DocumentExporter, ExportArtifact};
use flowgen_infrastructure::{
    ConfigService, FlowgenPaths, JsonHistoryRepository, SecretServiceImpl,
};
use flowgen_interaction::{GeminiDiagramGenerator, GenerationError, MermaidCliRenderer};

use crate::session::{DiagramSession, GenerateOutcome};
use crate::viewer::{DiagramViewer, RenderedView};

/// Stands in for the generator when no API key is configured, so history
/// browsing and exports still work.
struct UnconfiguredGenerator;

#[async_trait]
impl DiagramGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> Result<DiagramResponse> {
        Err(GenerationError::MissingApiKey.into())
    }
}

/// The session, the viewer and the directory exports are written to.
///
/// Operations that change the selection re-render the viewer so the two
/// never disagree about which diagram is on display.
pub struct FlowgenApp {
    config: FlowgenConfig,
    session: DiagramSession,
    viewer: DiagramViewer,
    output_dir: PathBuf,
}

impl FlowgenApp {
    /// Loads `config.toml`, the secrets and the stored history under `paths`.
    ///
    /// `output_dir` overrides the configured export directory.
    pub async fn bootstrap(paths: &FlowgenPaths, output_dir: Option<PathBuf>) -> Result<Self> {
        let config = ConfigService::new(paths.config_file()).get_config()?;
        tracing::debug!("[Factory] Loaded config from {}", paths.config_file().display());

        let secrets = SecretServiceImpl::new(paths.secret_file())
            .load_secrets()
            .await?;

        let generator: Arc<dyn DiagramGenerator> =
            match GeminiDiagramGenerator::from_config(&secrets, &config.generation) {
                Ok(generator) => {
                    tracing::info!("[Factory] Using Gemini model {}", generator.model());
                    Arc::new(generator)
                }
                Err(GenerationError::MissingApiKey) => {
                    tracing::warn!(
                        "[Factory] No Gemini API key in {} or environment; generation disabled",
                        paths.secret_file().display()
                    );
                    Arc::new(UnconfiguredGenerator)
                }
                Err(e) => return Err(e.into()),
            };

        let renderer = Arc::new(MermaidCliRenderer::new(config.renderer.clone()));
        let repository = Arc::new(JsonHistoryRepository::new(paths.history_file()));

        let mut app = Self::from_parts(config, generator, renderer, repository).await;
        if let Some(dir) = output_dir {
            app.output_dir = dir;
        }
        Ok(app)
    }

    /// Assembles the application from already-built collaborators.
    pub async fn from_parts(
        config: FlowgenConfig,
        generator: Arc<dyn DiagramGenerator>,
        renderer: Arc<dyn DiagramRenderer>,
        repository: Arc<dyn HistoryRepository>,
    ) -> Self {
        let session = DiagramSession::load(generator, repository).await;
        let viewer = DiagramViewer::new(renderer, DocumentExporter::new(config.export.clone()));
        let output_dir = config
            .export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            config,
            session,
            viewer,
            output_dir,
        }
    }

    pub fn config(&self) -> &FlowgenConfig {
        &self.config
    }

    pub fn session(&self) -> &DiagramSession {
        &self.session
    }

    pub fn viewer(&self) -> &DiagramViewer {
        &self.viewer
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generates from `prompt` and displays the new diagram on success.
    pub async fn generate(&self, prompt: &str) -> GenerateOutcome {
        let outcome = self.session.generate(prompt).await;
        if let GenerateOutcome::Created(record) = &outcome {
            self.viewer.show(Some(record)).await;
        }
        outcome
    }

    /// Selects by id and displays the result; a stale id empties the view.
    pub async fn select(&self, id: &str) -> RenderedView {
        let record = self.session.select(id).await;
        self.viewer.show(record.as_ref()).await
    }

    pub async fn select_index(&self, index: usize) -> RenderedView {
        let record = self.session.select_index(index).await;
        self.viewer.show(record.as_ref()).await
    }

    /// Deletes by id, emptying the view if the displayed diagram went away.
    pub async fn delete(&self, id: &str) -> Option<DiagramRecord> {
        let removed = self.session.delete(id).await?;
        if self.viewer.record_id().await.as_deref() == Some(id) {
            self.viewer.show(None).await;
        }
        Some(removed)
    }

    pub async fn new_diagram(&self) {
        self.session.new_diagram().await;
        self.viewer.show(None).await;
    }

    /// Writes `artifact` into the output directory.
    pub async fn save(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        let path = artifact.write_to(&self.output_dir).await?;
        tracing::info!("[Factory] Wrote {}", path.display());
        Ok(path)
    }
}
