pub mod message;

pub use message::{MessageSummary, ResultPage, SearchParams, TextFragment, TextPayload};
