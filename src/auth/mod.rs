pub mod config;
pub mod connector;
pub mod popup;
pub mod query;
pub mod ui;
pub mod window;

#[cfg(test)]
pub mod tests;

pub use config::{AuthConfig, SuccessCallback, DEFAULT_BASE_URL, DEFAULT_SCOPE};
pub use connector::OAuthConnector;
pub use popup::{FlowState, PopupFlow};
pub use ui::{ClickBinding, ClickEvent, AUTHENTICATE_VALUE, MARKER_ATTRIBUTE};
pub use window::{AuthWindow, CrossOriginError, Screen, WindowFeatures, WindowOpener};
