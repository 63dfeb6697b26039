use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::auth::query::extract_param;
use crate::auth::window::AuthWindow;

/// Name the popup window is opened under.
pub const AUTH_WINDOW_NAME: &str = "mryAuthWindow";

/// Fixed popup size.
pub const POPUP_WIDTH: u32 = 500;
pub const POPUP_HEIGHT: u32 = 700;

/// How often the popup's location is inspected for a code.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// State of one authorization popup flow.
///
/// `Resolved` and `Closed` are terminal: at most one of them occurs per flow,
/// and no further polling happens once either is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// No window has been opened yet.
    Idle,
    /// The popup is open and being polled for a redirect carrying a code.
    PopupOpen,
    /// A non-empty `code` parameter was found; the popup has been closed.
    Resolved { code: String },
    /// The user closed the popup before a code appeared.
    Closed,
}

impl FlowState {
    /// Whether the flow has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Resolved { .. } | FlowState::Closed)
    }
}

/// Poll-based state machine over one authentication popup.
///
/// Owns the window handle for the duration of the flow. Each [`tick`] call is
/// one poll: cheap, synchronous, and side-effect free except for closing the
/// window when a code is found, which makes the machine easy to drive from a
/// timer or, in tests, by hand.
///
/// [`tick`]: PopupFlow::tick
pub struct PopupFlow {
    window: Arc<dyn AuthWindow>,
    state: FlowState,
}

impl PopupFlow {
    /// Start tracking an already-opened popup window.
    pub fn new(window: Arc<dyn AuthWindow>) -> Self {
        Self {
            window,
            state: FlowState::PopupOpen,
        }
    }

    /// The current flow state.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Inspect the popup once and advance the state machine.
    ///
    /// The closed flag is checked before the location so a window closed by
    /// the user never resolves. A location read that fails is a cross-origin
    /// read and is suppressed; the flow stays pending. Terminal states are
    /// sticky: ticking a finished flow returns it unchanged.
    pub fn tick(&mut self) -> FlowState {
        if self.state.is_terminal() {
            return self.state.clone();
        }

        if self.window.is_closed() {
            debug!("Authentication popup closed before a code was found");
            self.state = FlowState::Closed;
            return self.state.clone();
        }

        if let Ok(url) = self.window.current_url() {
            match extract_param("code", &url) {
                Some(code) if !code.is_empty() => {
                    debug!("Authorization code found in popup location");
                    self.window.close();
                    self.state = FlowState::Resolved { code };
                }
                _ => {}
            }
        }

        self.state.clone()
    }
}
