pub mod query;
pub mod schemas;
pub mod search;
pub mod view;

pub use query::{PAGE_SIZE, QueryCodec, QueryState, SortDirection, SortKey};
pub use schemas::{MessageSummary, ResultPage, SearchParams, TextPayload};
pub use search::{
    FetchTicket, HttpSearchClient, RemoteSearchClient, SearchController, SearchError, SearchStatus,
};
pub use view::{DayBucket, GroupedView, MatchSpan, PageWindow, PresentedMessage, present};
