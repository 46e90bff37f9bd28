use chrono::NaiveDate;

/// Fixed page size for every result page.
pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Author,
    Length,
}

impl SortKey {
    /// Encoded form used by both the shareable representation and the
    /// remote API (`sort` / `sort_by`). Author sorts are keyed `user`
    /// for compatibility with the dashboard's historical links.
    pub fn as_encoded(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Author => "user",
            SortKey::Length => "length",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(SortKey::Date),
            "user" => Some(SortKey::Author),
            "length" => Some(SortKey::Length),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending, // Default - newest first
}

impl SortDirection {
    pub fn as_encoded(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// One search intent: free text, filters, sort and page position.
///
/// Immutable value type - every `with_*` builder returns a new state, and
/// every builder except `with_page` resets the page back to 1 so a page
/// number is never applied to a different query's results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub text: Option<String>,
    pub author_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub has_media: bool,
    pub is_forwarded: bool,
    pub has_reply: bool,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() { None } else { Some(value) }
}

impl QueryState {
    pub fn new() -> Self {
        Self {
            text: None,
            author_id: None,
            date_from: None,
            date_to: None,
            has_media: false,
            is_forwarded: false,
            has_reply: false,
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page: 1,
        }
    }

    fn page_reset(mut self) -> Self {
        self.page = 1;
        self
    }

    /// Empty string normalizes to no text filter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = non_empty(text);
        self.page_reset()
    }

    pub fn with_author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = non_empty(author_id);
        self.page_reset()
    }

    pub fn with_date_from(mut self, date_from: Option<NaiveDate>) -> Self {
        self.date_from = date_from;
        self.page_reset()
    }

    pub fn with_date_to(mut self, date_to: Option<NaiveDate>) -> Self {
        self.date_to = date_to;
        self.page_reset()
    }

    pub fn with_has_media(mut self, has_media: bool) -> Self {
        self.has_media = has_media;
        self.page_reset()
    }

    pub fn with_is_forwarded(mut self, is_forwarded: bool) -> Self {
        self.is_forwarded = is_forwarded;
        self.page_reset()
    }

    pub fn with_has_reply(mut self, has_reply: bool) -> Self {
        self.has_reply = has_reply;
        self.page_reset()
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self.page_reset()
    }

    pub fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self {
        self.sort_direction = sort_direction;
        self.page_reset()
    }

    /// The one field change that keeps the rest of the query intact.
    /// Page numbers are 1-based; 0 clamps to 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// True iff every field is at its default. Used to suppress redundant
    /// entries in the shareable representation.
    pub fn is_default(&self) -> bool {
        *self == Self::new()
    }

    /// True when the query actually filters something: free text, author,
    /// a date bound or a content flag. Sort and page alone do not count -
    /// a controller with no criteria stays idle instead of fetching the
    /// whole corpus.
    pub fn has_criteria(&self) -> bool {
        self.text.is_some()
            || self.author_id.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.has_media
            || self.is_forwarded
            || self.has_reply
    }
}
