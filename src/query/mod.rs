pub mod codec;
pub mod state;

pub use codec::QueryCodec;
pub use state::{PAGE_SIZE, QueryState, SortDirection, SortKey};
