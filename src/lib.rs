pub mod config;
pub mod currency;
pub mod data_models;
pub mod fetcher;
pub mod filters;
pub mod level;
pub mod persist;
pub mod stats;
pub mod worker_pool;
