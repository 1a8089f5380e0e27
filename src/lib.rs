pub mod aggregator;
pub mod config;
pub mod error;
pub mod http_client;
pub mod merge;
pub mod model;
pub mod news_fetch;
pub mod official_fetch;
pub mod provider;
pub mod rankings;
pub mod scrape_fetch;
pub mod snapshot;
pub mod ttl_cache;
