use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::query::state::{PAGE_SIZE, QueryState};
use crate::schemas::{MessageSummary, ResultPage};
use crate::view::highlight::{MatchSpan, match_spans};

/// One message ready for rendering: flattened text plus the query-term
/// match spans inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentedMessage {
    pub message: MessageSummary,
    pub text: String,
    pub spans: Vec<MatchSpan>,
}

/// All messages sharing one calendar date, in arrival order. `date` is
/// `None` for the trailing bucket of messages whose timestamp has no
/// parsable date portion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: Option<NaiveDate>,
    pub messages: Vec<PresentedMessage>,
}

/// 1-based window of absolute result indices shown on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    pub window_start: u64,
    pub window_end: u64,
}

/// Day-grouped, highlight-annotated rendition of one result page. Purely
/// derived - recomputed from scratch whenever the page changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedView {
    pub days: Vec<DayBucket>,
    pub window: PageWindow,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Bucket messages by the date portion of their timestamp, most recent day
/// first, keeping the server's ordering within a day. An empty or absent
/// result set presents as an empty view, never an error.
pub fn present(page: &ResultPage, query: &QueryState) -> GroupedView {
    let term = query.text.as_deref().unwrap_or("");

    let mut dated: BTreeMap<NaiveDate, Vec<PresentedMessage>> = BTreeMap::new();
    let mut undated: Vec<PresentedMessage> = Vec::new();

    for message in &page.messages {
        let presented = present_message(message, term);
        match date_of(&message.date) {
            Some(date) => dated.entry(date).or_default().push(presented),
            None => undated.push(presented),
        }
    }

    let mut days: Vec<DayBucket> = dated
        .into_iter()
        .rev()
        .map(|(date, messages)| DayBucket {
            date: Some(date),
            messages,
        })
        .collect();
    if !undated.is_empty() {
        days.push(DayBucket {
            date: None,
            messages: undated,
        });
    }

    GroupedView {
        days,
        window: page_window(page.total, query.page),
    }
}

fn present_message(message: &MessageSummary, term: &str) -> PresentedMessage {
    let text = message.text.flatten();
    let spans = match_spans(&text, term);
    PresentedMessage {
        message: message.clone(),
        text,
        spans,
    }
}

/// The date portion of an ISO-8601 timestamp; lenient about everything
/// after the first ten characters.
fn date_of(timestamp: &str) -> Option<NaiveDate> {
    let head = timestamp.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

pub fn page_window(total: u64, page: u32) -> PageWindow {
    let page_size = u64::from(PAGE_SIZE);
    let total_pages = total.div_ceil(page_size);
    let (window_start, window_end) = if total == 0 {
        (0, 0)
    } else {
        let start = (u64::from(page) - 1) * page_size + 1;
        (start, (u64::from(page) * page_size).min(total))
    };
    PageWindow {
        total,
        page,
        total_pages,
        window_start,
        window_end,
    }
}
