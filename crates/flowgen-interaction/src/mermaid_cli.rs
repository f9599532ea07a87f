//! Renders diagram source to SVG by invoking the Mermaid CLI (`mmdc`).

use async_trait::async_trait;
use flowgen_core::config::RendererConfig;
use flowgen_core::error::Result;
use flowgen_core::{DiagramRenderer, FlowgenError, RenderedGraphic};
use serde_json::{Value, json};
use tokio::process::Command;

const INPUT_FILE: &str = "diagram.mmd";
const OUTPUT_FILE: &str = "diagram.svg";
const CONFIG_FILE: &str = "mermaid-config.json";

/// Renderer backed by an external `mmdc` process.
///
/// Each call works in its own temporary directory, so concurrent renders do
/// not share files.
#[derive(Debug, Clone)]
pub struct MermaidCliRenderer {
    config: RendererConfig,
}

impl MermaidCliRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn command(&self) -> &str {
        &self.config.command
    }

    /// Mermaid configuration written next to the input.
    ///
    /// HTML labels are disabled so text is emitted as plain SVG `<text>`
    /// rather than `<foreignObject>`, which rasterizers cannot draw.
    pub fn mermaid_config(&self) -> Value {
        json!({
            "startOnLoad": false,
            "theme": self.config.theme,
            "securityLevel": "loose",
            "fontFamily": self.config.font_family,
            "htmlLabels": false,
            "themeVariables": {
                "primaryColor": "#e0e5ec",
                "primaryTextColor": "#4d5561",
                "primaryBorderColor": "#a3b1c6",
                "lineColor": "#6d5dfc",
                "secondaryColor": "#e0e5ec",
                "tertiaryColor": "#e0e5ec",
                "fontFamily": self.config.font_family,
            },
            "flowchart": {
                "htmlLabels": false,
                "curve": "basis",
            },
        })
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCliRenderer {
    async fn render(&self, source: &str) -> Result<RenderedGraphic> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        let output = workdir.path().join(OUTPUT_FILE);
        let config_path = workdir.path().join(CONFIG_FILE);

        tokio::fs::write(&input, source).await?;
        tokio::fs::write(&config_path, serde_json::to_vec(&self.mermaid_config())?).await?;

        tracing::debug!("[Renderer] Running {} in {:?}", self.config.command, workdir.path());
        let result = Command::new(&self.config.command)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-c")
            .arg(&config_path)
            .arg("-b")
            .arg(&self.config.background)
            .output()
            .await;

        let process_output = match result {
            Ok(output) => output,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FlowgenError::render(format!(
                    "Mermaid CLI '{}' not found. Install @mermaid-js/mermaid-cli or set [renderer].command",
                    self.config.command
                )));
            }
            Err(err) => {
                return Err(FlowgenError::render(format!(
                    "Failed to run '{}': {}",
                    self.config.command, err
                )));
            }
        };

        if !process_output.status.success() {
            let stderr = String::from_utf8_lossy(&process_output.stderr);
            let stderr = stderr.trim();
            tracing::warn!("[Renderer] Mermaid CLI rejected the diagram: {}", stderr);
            return Err(FlowgenError::render(if stderr.is_empty() {
                format!("Mermaid CLI exited with {}", process_output.status)
            } else {
                stderr.to_string()
            }));
        }

        let markup = tokio::fs::read_to_string(&output).await.map_err(|e| {
            FlowgenError::render(format!("Mermaid CLI produced no output: {}", e))
        })?;
        if markup.trim().is_empty() {
            return Err(FlowgenError::render("Mermaid CLI produced an empty graphic"));
        }

        let graphic = RenderedGraphic::new(markup);
        if graphic.has_foreign_object() {
            tracing::warn!(
                "[Renderer] Graphic contains <foreignObject>; document export may lose labels"
            );
        }
        Ok(graphic)
    }
}
