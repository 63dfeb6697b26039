//! Client helper for Metry's OAuth2 authorization-code popup flow.
//!
//! The crate re-expresses the original browser library's primitives as
//! injectable seams: `window.open` becomes the [`WindowOpener`] /
//! [`AuthWindow`] traits, the document-level `CustomEvent` becomes a
//! broadcast [`EventBus`], and the document click listener becomes a
//! [`ClickEvent`] subscription held by a disposable [`ClickBinding`].
//!
//! A typical host wires everything up in one call:
//!
//! ```ignore
//! let config = AuthConfig::new(client_id, client_secret, redirect_uri)
//!     .with_on_success(|token| println!("got {token}"));
//! let (connector, binding) = OAuthConnector::connect(config, opener, clicks);
//! let mut tokens = connector.events().subscribe();
//! ```
//!
//! Every click on an element carrying `data-metry="authenticate"` then opens
//! a centered popup, polls it for the redirected `code` parameter, exchanges
//! the code at the token endpoint, and publishes a `Metry:GotToken` event.

// Export modules
pub mod auth;
pub mod error;
pub mod events;

pub use auth::{
    AuthConfig, AuthWindow, ClickBinding, ClickEvent, CrossOriginError, FlowState, OAuthConnector,
    PopupFlow, Screen, SuccessCallback, WindowFeatures, WindowOpener,
};
pub use error::ConnectorError;
pub use events::{EventBus, TokenEvent, GOT_TOKEN_EVENT};
