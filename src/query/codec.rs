use chrono::NaiveDate;
use url::form_urlencoded;

use crate::query::state::{QueryState, SortDirection, SortKey};

const KEY_TEXT: &str = "q";
const KEY_AUTHOR: &str = "user";
const KEY_FROM: &str = "from";
const KEY_TO: &str = "to";
const KEY_SORT: &str = "sort";
const KEY_ORDER: &str = "order";
const KEY_HAS_MEDIA: &str = "has_media";
const KEY_IS_FORWARDED: &str = "is_forwarded";
const KEY_HAS_REPLY: &str = "has_reply";
const KEY_PAGE: &str = "page";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Maps a [`QueryState`] to and from the flat key/value representation the
/// host binds to a URL (or a test harness). The core never touches a
/// location object itself.
///
/// Encoding omits every default-valued field, so the default query encodes
/// to an empty mapping. Decoding never fails: unknown values fall back to
/// defaults, so `decode(encode(q)) == q` for any well-formed state.
pub struct QueryCodec;

impl QueryCodec {
    pub fn encode(state: &QueryState) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_string(), value));

        if let Some(text) = &state.text {
            push(KEY_TEXT, text.clone());
        }
        if let Some(author) = &state.author_id {
            push(KEY_AUTHOR, author.clone());
        }
        if let Some(from) = state.date_from {
            push(KEY_FROM, from.format(DATE_FORMAT).to_string());
        }
        if let Some(to) = state.date_to {
            push(KEY_TO, to.format(DATE_FORMAT).to_string());
        }
        if state.has_media {
            push(KEY_HAS_MEDIA, "true".to_string());
        }
        if state.is_forwarded {
            push(KEY_IS_FORWARDED, "true".to_string());
        }
        if state.has_reply {
            push(KEY_HAS_REPLY, "true".to_string());
        }
        if state.sort_key != SortKey::default() {
            push(KEY_SORT, state.sort_key.as_encoded().to_string());
        }
        if state.sort_direction != SortDirection::default() {
            push(KEY_ORDER, state.sort_direction.as_encoded().to_string());
        }
        if state.page != 1 {
            push(KEY_PAGE, state.page.to_string());
        }
        pairs
    }

    pub fn decode(pairs: &[(String, String)]) -> QueryState {
        let mut state = QueryState::new();
        for (key, value) in pairs {
            match key.as_str() {
                KEY_TEXT => state.text = non_empty(value),
                KEY_AUTHOR => state.author_id = non_empty(value),
                // Unparsable dates decode as absent rather than failing.
                KEY_FROM => state.date_from = parse_date(value),
                KEY_TO => state.date_to = parse_date(value),
                // Flags accept only the literal "true"; anything else is false.
                KEY_HAS_MEDIA => state.has_media = value == "true",
                KEY_IS_FORWARDED => state.is_forwarded = value == "true",
                KEY_HAS_REPLY => state.has_reply = value == "true",
                KEY_SORT => state.sort_key = SortKey::parse(value).unwrap_or_default(),
                KEY_ORDER => {
                    state.sort_direction = SortDirection::parse(value).unwrap_or_default();
                }
                KEY_PAGE => state.page = value.parse::<u32>().unwrap_or(1).max(1),
                _ => {} // unknown keys belong to the host, not the query
            }
        }
        state
    }

    /// The shareable representation as a percent-encoded query string,
    /// suitable for bookmarking. The default query yields "".
    pub fn to_query_string(state: &QueryState) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in Self::encode(state) {
            serializer.append_pair(&key, &value);
        }
        serializer.finish()
    }

    pub fn from_query_string(raw: &str) -> QueryState {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self::decode(&pairs)
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
