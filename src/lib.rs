pub mod config;
pub mod state;
pub mod ui;
