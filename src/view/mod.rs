pub mod highlight;
pub mod presenter;

pub use highlight::{MatchSpan, match_spans, split_spans};
pub use presenter::{DayBucket, GroupedView, PageWindow, PresentedMessage, present};
