pub mod client;
pub mod controller;
pub mod error;

pub use client::{HttpSearchClient, RemoteSearchClient};
pub use controller::{FetchTicket, SearchController, SearchStatus};
pub use error::SearchError;
