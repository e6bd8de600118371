mod error_banner;
mod flow_details;
mod help_popup;
mod input_widget;
mod liquid_gauge;
mod status_bar;

pub use error_banner::ErrorBanner;
pub use flow_details::FlowDetails;
pub use help_popup::HelpPopup;
pub use input_widget::InputWidget;
pub use liquid_gauge::LiquidGauge;
pub use status_bar::StatusBar;
