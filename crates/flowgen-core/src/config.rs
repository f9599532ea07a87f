use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FlowgenConfig {
    pub generation: GenerationConfig,
    pub renderer: RendererConfig,
    pub export: ExportConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Gemini model used for diagram generation
    pub model: String,
    /// Low temperature keeps the generated source deterministic
    pub temperature: f32,
    /// Language of the generated title and explanation
    pub language: String,
    /// Advisory prompt length shown in the prompt counter
    pub prompt_char_budget: usize,
    /// Optional HTTP timeout; `None` waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: 0.2,
            language: "Portuguese".to_string(),
            prompt_char_budget: crate::generation::PROMPT_CHAR_BUDGET,
            request_timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RendererConfig {
    /// Mermaid CLI executable
    pub command: String,
    pub theme: String,
    pub font_family: String,
    /// Background passed to the renderer
    pub background: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            theme: "base".to_string(),
            font_family: "Nunito, sans-serif".to_string(),
            background: "transparent".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Raster width the document export scales the graphic to
    pub target_width: f64,
    /// Used when the markup carries neither a viewBox nor width/height
    pub default_width: f64,
    pub default_height: f64,
    /// Directory exported files are written to; current directory if unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            target_width: 3000.0,
            default_width: 1000.0,
            default_height: 1000.0,
            output_dir: None,
        }
    }
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SecretConfig {
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: FlowgenConfig = toml::from_str("").unwrap();
        assert_eq!(config, FlowgenConfig::default());
        assert_eq!(config.generation.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.export.target_width, 3000.0);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: FlowgenConfig = toml::from_str(
            r#"
            [renderer]
            command = "/opt/mermaid/bin/mmdc"
            "#,
        )
        .unwrap();
        assert_eq!(config.renderer.command, "/opt/mermaid/bin/mmdc");
        assert_eq!(config.renderer.theme, "base");
        assert_eq!(config.generation.temperature, 0.2);
    }
}
