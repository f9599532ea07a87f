//! Diagram domain models.
//!
//! Contains the records produced by a successful generation and the
//! structured response shape expected from the generation collaborator.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

/// A generated diagram kept in the history.
///
/// Records are immutable once created. The serialized form keeps the
/// camelCase keys the history slot has always used, so a stored history
/// round-trips without migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecord {
    /// Unique record identifier (UUID v4 format)
    pub id: String,
    /// Short, human-readable title
    pub title: String,
    /// Diagram source in the Mermaid description language
    #[serde(rename = "mermaidCode")]
    pub diagram_source: String,
    /// Short explanation of what the diagram shows
    pub explanation: String,
    /// Creation time as Unix timestamp in milliseconds
    pub created_at: i64,
}

impl DiagramRecord {
    /// Creates a new record from a generation response with a fresh id and
    /// the current timestamp.
    pub fn from_response(response: DiagramResponse) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: response.title,
            diagram_source: response.diagram_source,
            explanation: response.explanation,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Returns the creation time as a UTC datetime.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at).single()
    }
}

/// Structured response returned by the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramResponse {
    pub title: String,
    #[serde(rename = "mermaidCode")]
    pub diagram_source: String,
    pub explanation: String,
}

/// Diagram families the generator is asked to support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    #[strum(to_string = "Entity Relationship")]
    EntityRelationship,
    Gantt,
    #[strum(to_string = "User Journey")]
    UserJourney,
    Mindmap,
}

/// Which representation of the current diagram is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewMode {
    /// Rendered vector graphic with pan/zoom
    #[default]
    Preview,
    /// Raw diagram source
    Code,
}

impl ViewMode {
    /// Returns the other mode.
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Preview => ViewMode::Code,
            ViewMode::Code => ViewMode::Preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn response() -> DiagramResponse {
        DiagramResponse {
            title: "Login Flow".to_string(),
            diagram_source: "graph TD\nA-->B".to_string(),
            explanation: "Fluxo de login".to_string(),
        }
    }

    #[test]
    fn test_from_response_assigns_unique_ids() {
        let a = DiagramRecord::from_response(response());
        let b = DiagramRecord::from_response(response());
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "Login Flow");
        assert!(a.created_at > 0);
        assert!(a.created_at_utc().is_some());
    }

    #[test]
    fn test_record_uses_stored_key_names() {
        let record = DiagramRecord {
            id: "id-1".to_string(),
            title: "T".to_string(),
            diagram_source: "graph LR\nA-->B".to_string(),
            explanation: "E".to_string(),
            created_at: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["mermaidCode"], "graph LR\nA-->B");
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert!(json.get("diagram_source").is_none());
    }

    #[test]
    fn test_response_requires_all_fields() {
        let missing = r#"{"title":"x","explanation":"y"}"#;
        assert!(serde_json::from_str::<DiagramResponse>(missing).is_err());
    }

    #[test]
    fn test_diagram_type_display_names() {
        let names: Vec<String> = DiagramType::iter().map(|t| t.to_string()).collect();
        assert!(names.contains(&"Entity Relationship".to_string()));
        assert!(names.contains(&"Flowchart".to_string()));
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_view_mode_toggle() {
        assert_eq!(ViewMode::default(), ViewMode::Preview);
        assert_eq!(ViewMode::Preview.toggle(), ViewMode::Code);
        assert_eq!(ViewMode::Code.toggle(), ViewMode::Preview);
    }
}
