//! Client-side query cache: keyed slots, in-flight deduplication and
//! stale-while-revalidate display.

pub mod cache;
pub mod client;

pub use cache::{QueryCache, QueryOptions, QuerySnapshot};
pub use client::{use_query, QueryClient, QueryResult};
