pub mod feed_fetcher;
pub mod node_manager;
pub mod resume;
