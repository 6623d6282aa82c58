use serde::{Deserialize, Serialize};

/// Store names whose records feed the history list.
pub const TRACKED_KINDS: [&str; 2] = ["history", "history-requests"];

pub fn is_tracked_kind(kind: &str) -> bool {
    TRACKED_KINDS.contains(&kind)
}

/// A record as delivered by the external store, before normalization.
///
/// `created`/`updated` are millisecond timestamps. Absent or non-positive
/// values are treated as invalid and repaired at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, created: Option<i64>, updated: Option<i64>) -> Self {
        Self {
            id: id.into(),
            created,
            updated,
            payload: serde_json::Value::Null,
        }
    }
}

/// An annotated record in the ordered sequence.
///
/// `has_header`/`header_label`/`today` are positional: they describe the
/// record's place in the sequence, not the record itself, and are repaired
/// whenever a neighboring record changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub day_key: i64,
    pub time_label: String,
    pub has_header: bool,
    pub header_label: Option<String>,
    pub today: bool,
    pub payload: serde_json::Value,
}

impl HistoryEntry {
    pub fn clear_header(&mut self) {
        self.has_header = false;
        self.header_label = None;
        self.today = false;
    }
}

/// Pagination options for the next page query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    pub limit: u32,
    pub descending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_key: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRow {
    pub key: i64,
    pub doc: RawRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub rows: Vec<PageRow>,
}

/// Payload of a "record changed" notification from the record source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChange {
    pub kind: String,
    pub record: RawRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryListConfig {
    /// Single page query limit.
    pub page_size: u32,
    /// When false the caller must invoke `load_next` explicitly after attach.
    pub auto_load: bool,
}

impl Default for HistoryListConfig {
    fn default() -> Self {
        Self {
            page_size: 150,
            auto_load: true,
        }
    }
}

/// Full-sequence snapshot delivered to observers after every mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    pub searching: bool,
}
