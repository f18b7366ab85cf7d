pub mod app;
pub mod config;
pub mod curate;
pub mod domain;
pub mod error;
pub mod geo;
pub mod matrix;
pub mod output;
pub mod soft;
pub mod store;
