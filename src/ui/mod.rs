mod app;
pub mod components;
pub(crate) mod key_handler;
mod layout;

pub use app::{App, FetchMessage};
pub use layout::{Layout, LayoutAreas, Visibility};
