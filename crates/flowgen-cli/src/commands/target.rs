use flowgen_core::DiagramRecord;

/// Minimum id prefix accepted in place of a full id.
const MIN_PREFIX_LEN: usize = 4;

/// Resolves a user-typed reference to a record id.
///
/// Accepts a 1-based list position, a full id, or an unambiguous id prefix.
pub fn resolve(history: &[DiagramRecord], token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Ok(position) = token.parse::<usize>()
        && position >= 1
        && let Some(record) = history.get(position - 1)
    {
        return Some(record.id.clone());
    }

    if let Some(record) = history.iter().find(|r| r.id == token) {
        return Some(record.id.clone());
    }

    if token.len() < MIN_PREFIX_LEN {
        return None;
    }
    let mut matches = history.iter().filter(|r| r.id.starts_with(token));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Some(record.id.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> DiagramRecord {
        DiagramRecord {
            id: id.to_string(),
            title: id.to_string(),
            diagram_source: "graph TD\nA-->B".to_string(),
            explanation: String::new(),
            created_at: 0,
        }
    }

    fn history() -> Vec<DiagramRecord> {
        vec![
            record("3f2a9c10-aaaa"),
            record("3f2b0000-bbbb"),
            record("9d1e7777-cccc"),
        ]
    }

    #[test]
    fn test_positions_are_one_based() {
        let history = history();
        assert_eq!(resolve(&history, "1").as_deref(), Some("3f2a9c10-aaaa"));
        assert_eq!(resolve(&history, "3").as_deref(), Some("9d1e7777-cccc"));
        assert_eq!(resolve(&history, "0"), None);
        assert_eq!(resolve(&history, "4"), None);
    }

    #[test]
    fn test_full_id_and_unique_prefix() {
        let history = history();
        assert_eq!(resolve(&history, "3f2b0000-bbbb").as_deref(), Some("3f2b0000-bbbb"));
        assert_eq!(resolve(&history, "9d1e").as_deref(), Some("9d1e7777-cccc"));
        assert_eq!(resolve(&history, "3f2a").as_deref(), Some("3f2a9c10-aaaa"));
        // Too short to count as a prefix
        assert_eq!(resolve(&history, "3f2"), None);
    }

    #[test]
    fn test_ambiguous_or_unknown_prefix() {
        let history = vec![record("abcd-1"), record("abcd-2")];
        assert_eq!(resolve(&history, "abcd"), None);
        assert_eq!(resolve(&history, "zzzz"), None);
        assert_eq!(resolve(&history, "  "), None);
    }
}
