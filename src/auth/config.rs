use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Base URL of the Metry OAuth provider.
pub const DEFAULT_BASE_URL: &str = "https://app.metry.io/";

/// Scope requested when the configuration does not name one.
pub const DEFAULT_SCOPE: &str = "basic";

/// Callback invoked with the parsed token response after a successful
/// authorization-code exchange.
pub type SuccessCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Connector configuration, supplied at construction and never mutated.
///
/// No field is validated up front; a missing client id simply manifests as a
/// malformed request rejected by the provider.
#[derive(Clone)]
pub struct AuthConfig {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scope: Option<String>,
    on_success: Option<SuccessCallback>,
    base_url: String,
}

impl AuthConfig {
    /// Create a configuration for the given OAuth client.
    ///
    /// `redirect_uri` must match the value registered with the provider.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scope: None,
            on_success: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Request a scope other than the default `basic`.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Register a callback invoked with the token response on success.
    pub fn with_on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Point the connector at a different provider base URL.
    ///
    /// Intended for tests and self-hosted deployments; production use keeps
    /// the fixed [`DEFAULT_BASE_URL`].
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// The configured scope, or `basic` when none was given.
    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    pub fn on_success(&self) -> Option<&SuccessCallback> {
        self.on_success.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secret and callback are deliberately left out
        f.debug_struct("AuthConfig")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope())
            .field("base_url", &self.base_url)
            .field("has_on_success", &self.on_success.is_some())
            .finish()
    }
}
