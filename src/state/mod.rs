mod store;

pub use store::{AppState, SPINNER_FRAMES};
