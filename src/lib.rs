pub mod app;
pub mod config;
pub mod infrastructure;
pub mod registry;
pub mod ui;
