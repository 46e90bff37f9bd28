use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::query::state::{QueryState, SortDirection};

/// Text payload of a message. Chat exports store either a plain string or
/// an array of entity fragments (plain strings mixed with typed objects
/// carrying a `text` field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextPayload {
    Plain(String),
    Fragments(Vec<TextFragment>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextFragment {
    Plain(String),
    Entity { text: String },
    // Fragments without a text field contribute nothing
    Other(Value),
}

impl Default for TextPayload {
    fn default() -> Self {
        TextPayload::Plain(String::new())
    }
}

impl TextPayload {
    /// Flatten to plain text, concatenating fragment texts in order.
    pub fn flatten(&self) -> String {
        match self {
            TextPayload::Plain(text) => text.clone(),
            TextPayload::Fragments(fragments) => {
                let mut out = String::new();
                for fragment in fragments {
                    match fragment {
                        TextFragment::Plain(text) => out.push_str(text),
                        TextFragment::Entity { text } => out.push_str(text),
                        TextFragment::Other(_) => {}
                    }
                }
                out
            }
        }
    }
}

/// One message as returned by the search API. Field names vary between the
/// current and legacy exports (`from_id` vs `user_id`, `text` vs `content`),
/// so the aliases accept both; missing fields fail closed to empty values
/// instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSummary {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "content")]
    pub text: TextPayload,
    #[serde(default, alias = "user_id")]
    pub from_id: String,
    #[serde(default, alias = "user_name")]
    pub from_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub forwards: u64,
    #[serde(default)]
    pub replies: u64,
}

/// One page of search results plus the total match count for the whole
/// query. Both fields tolerate being absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    #[serde(default)]
    pub messages: Vec<MessageSummary>,
    #[serde(default, alias = "total_count")]
    pub total: u64,
}

/// Flattened request shape accepted by the remote search endpoint.
/// Unset filters are omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: &'static str,
    pub sort_order: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_forwarded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_reply: Option<bool>,
}

impl From<&QueryState> for SearchParams {
    fn from(state: &QueryState) -> Self {
        let flag = |set: bool| if set { Some(true) } else { None };
        Self {
            page: state.page,
            page_size: crate::query::state::PAGE_SIZE,
            sort_by: state.sort_key.as_encoded(),
            sort_order: match state.sort_direction {
                SortDirection::Ascending => "asc",
                SortDirection::Descending => "desc",
            },
            search_text: state.text.clone(),
            user_id: state.author_id.clone(),
            date_from: state.date_from.map(|d| d.format("%Y-%m-%d").to_string()),
            date_to: state.date_to.map(|d| d.format("%Y-%m-%d").to_string()),
            has_media: flag(state.has_media),
            is_forwarded: flag(state.is_forwarded),
            has_reply: flag(state.has_reply),
        }
    }
}

/// Message ids are opaque; exports carry them as numbers or strings.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
