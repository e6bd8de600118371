mod settings;

pub use settings::{ApiSettings, Config, Settings, StoreSettings, UiSettings};
