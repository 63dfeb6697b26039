use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ConnectorError;

/// Dimensions of the screen the popup is centered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

/// Geometry and chrome flags for the authentication popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFeatures {
    pub width: u32,
    pub height: u32,
    pub top: i32,
    pub left: i32,
}

impl WindowFeatures {
    /// Compute a popup of the given size centered on the screen.
    pub fn centered(screen: Screen, width: u32, height: u32) -> Self {
        let top = (screen.height as i32 - height as i32) / 2;
        let left = (screen.width as i32 - width as i32) / 2;

        Self {
            width,
            height,
            top,
            left,
        }
    }
}

impl fmt::Display for WindowFeatures {
    /// Render the feature string passed to the window opener.
    ///
    /// Format matches the browser version's `window.open` features argument,
    /// including the fixed chrome-suppression flags.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width={},height={},top={},left={},status=0,menubar=0,toolbar=0,personalbar=0",
            self.width, self.height, self.top, self.left
        )
    }
}

/// The window's location cannot be read from this origin.
///
/// Expected on every poll tick while the popup is still on the provider's
/// origin; callers suppress it unconditionally.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("window location is not readable from this origin")]
pub struct CrossOriginError;

/// Handle to an open authentication window.
///
/// Held only for the duration of one authorization flow and released when a
/// code is found or the user closes the window.
pub trait AuthWindow: Send + Sync {
    /// Whether the window has been closed.
    fn is_closed(&self) -> bool;

    /// Read the window's current URL.
    ///
    /// Fails with [`CrossOriginError`] while the window is on a foreign
    /// origin; the read only succeeds once the provider has redirected back
    /// to the configured redirect URI.
    fn current_url(&self) -> Result<String, CrossOriginError>;

    /// Close the window.
    fn close(&self);
}

/// Seam for opening authentication windows.
///
/// A real embedder backs this with whatever windowing it has; tests use a
/// scripted fake to drive the popup flow deterministically.
#[async_trait]
pub trait WindowOpener: Send + Sync {
    /// Dimensions of the screen popups are centered on.
    fn screen(&self) -> Screen;

    /// Open a named window at the given URL.
    async fn open(
        &self,
        url: &str,
        name: &str,
        features: &WindowFeatures,
    ) -> Result<Arc<dyn AuthWindow>, ConnectorError>;
}
