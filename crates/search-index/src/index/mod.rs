//! Index store and background crawler.

mod crawler;
mod store;

pub(crate) use crawler::Crawler;
pub use crawler::{INITIAL_CRAWL_DEPTH, REFRESH_CRAWL_DEPTH};
pub use store::IndexStore;
