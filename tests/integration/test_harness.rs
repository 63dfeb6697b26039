//! Window doubles for integration tests. The library's own test fakes are
//! compiled out of the published crate, so the integration suite carries its
//! own scriptable window and opener.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use metry_oauth_connect::{
    AuthWindow, ConnectorError, CrossOriginError, Screen, WindowFeatures, WindowOpener,
};

/// A popup window scripted by the test.
pub struct ScriptedWindow {
    url: Mutex<Result<String, CrossOriginError>>,
    closed: AtomicBool,
}

impl ScriptedWindow {
    /// Starts unreadable, as if still on the provider's origin.
    pub fn cross_origin() -> Arc<Self> {
        Arc::new(Self {
            url: Mutex::new(Err(CrossOriginError)),
            closed: AtomicBool::new(false),
        })
    }

    /// Simulate the provider redirecting back to the host origin.
    pub fn redirect_to(&self, url: impl Into<String>) {
        *self.url.lock().unwrap() = Ok(url.into());
    }

    /// Simulate the user closing the window.
    pub fn user_close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl AuthWindow for ScriptedWindow {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn current_url(&self) -> Result<String, CrossOriginError> {
        self.url.lock().unwrap().clone()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Opener handing out one scripted window per test.
pub struct ScriptedOpener {
    window: Arc<ScriptedWindow>,
    opens: AtomicUsize,
}

impl ScriptedOpener {
    pub fn new(window: Arc<ScriptedWindow>) -> Arc<Self> {
        Arc::new(Self {
            window,
            opens: AtomicUsize::new(0),
        })
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WindowOpener for ScriptedOpener {
    fn screen(&self) -> Screen {
        Screen {
            width: 1920,
            height: 1080,
        }
    }

    async fn open(
        &self,
        _url: &str,
        _name: &str,
        _features: &WindowFeatures,
    ) -> Result<Arc<dyn AuthWindow>, ConnectorError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(self.window.clone())
    }
}

/// Install a tracing subscriber for test output, once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
