use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::auth::config::AuthConfig;
use crate::auth::connector::OAuthConnector;
use crate::auth::window::WindowOpener;

/// Attribute marking an element as an authentication trigger.
pub const MARKER_ATTRIBUTE: &str = "data-metry";

/// Marker value that starts the popup flow when clicked.
pub const AUTHENTICATE_VALUE: &str = "authenticate";

/// A click on some element of the host UI, carrying the element's attributes.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    attributes: HashMap<String, String>,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an attribute of the clicked element.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute of the clicked element.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether this click carries `data-metry="authenticate"`.
    pub fn is_authenticate(&self) -> bool {
        self.attribute(MARKER_ATTRIBUTE) == Some(AUTHENTICATE_VALUE)
    }
}

/// Handle to the connector's click subscription.
///
/// Replaces the permanently attached document listener of the browser
/// version: the subscription lives exactly as long as this guard. Dropping or
/// [`detach`]ing it stops the connector from reacting to further clicks;
/// popup flows already in flight are unaffected.
///
/// [`detach`]: ClickBinding::detach
pub struct ClickBinding {
    task: JoinHandle<()>,
}

impl ClickBinding {
    /// Stop listening for clicks.
    pub fn detach(self) {
        // Drop does the work
    }
}

impl Drop for ClickBinding {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl OAuthConnector {
    /// Subscribe the connector to a stream of UI clicks.
    ///
    /// Every click whose element carries `data-metry="authenticate"` spawns
    /// one independent popup flow; all other clicks are ignored. Returns the
    /// disposable subscription guard.
    pub fn attach_to_buttons(
        self: &Arc<Self>,
        mut clicks: broadcast::Receiver<ClickEvent>,
    ) -> ClickBinding {
        let connector = Arc::clone(self);

        let task = tokio::spawn(async move {
            loop {
                match clicks.recv().await {
                    Ok(click) => {
                        if !click.is_authenticate() {
                            continue;
                        }

                        debug!("Authenticate element clicked, starting popup flow");
                        let connector = Arc::clone(&connector);
                        tokio::spawn(async move {
                            if let Err(e) = connector.open_authenticate_popup().await {
                                error!(error = %e, "Failed to open authentication popup");
                            }
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Click listener lagged, clicks dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        ClickBinding { task }
    }

    /// Build a connector and wire it to the click stream in one call.
    ///
    /// Mirrors the browser version, where constructing the connector
    /// immediately attached its click listener, while keeping the
    /// subscription explicit so the host can unmount it deterministically.
    pub fn connect(
        config: AuthConfig,
        opener: Arc<dyn WindowOpener>,
        clicks: broadcast::Receiver<ClickEvent>,
    ) -> (Arc<OAuthConnector>, ClickBinding) {
        let connector = Arc::new(OAuthConnector::new(config, opener));
        let binding = connector.attach_to_buttons(clicks);

        (connector, binding)
    }
}
