#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::ChatError;
use super::Role;

/// Role and content of a prior message, sent as model context on every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Deserialize)]
struct RawHistoryEntry {
    #[serde(default)]
    role: String,
    content: String,
}

/// Parses the `history` form field. A blank payload is the same as no
/// history at all.
pub fn parse_history(payload: &str) -> Result<Vec<HistoryEntry>, ChatError> {
    if payload.trim().is_empty() {
        return Ok(vec![]);
    }

    let raw: Vec<RawHistoryEntry> = serde_json::from_str(payload).map_err(|err| {
        tracing::debug!(error = ?err, "Rejected history payload");
        return ChatError::Validation(
            "History must be a JSON array of objects with role and content.".to_string(),
        );
    })?;

    let entries = raw
        .into_iter()
        .map(|entry| {
            return HistoryEntry {
                role: Role::coerce(&entry.role),
                content: entry.content,
            };
        })
        .collect::<Vec<HistoryEntry>>();

    return Ok(entries);
}
