// Library target shared by the binary, integration tests and benchmarks.
pub mod admin;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod feed;
pub mod session;
pub mod store;
pub mod ui;
pub mod vocab;
