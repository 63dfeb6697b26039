use std::sync::Arc;

use reqwest::multipart::Form;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, error, info};
use url::form_urlencoded;

use crate::auth::config::AuthConfig;
use crate::auth::popup::{FlowState, PopupFlow, AUTH_WINDOW_NAME, POLL_INTERVAL, POPUP_HEIGHT, POPUP_WIDTH};
use crate::auth::window::{WindowFeatures, WindowOpener};
use crate::error::ConnectorError;
use crate::events::{EventBus, TokenEvent, EVENT_BUS_CAPACITY};

const PATH_AUTHORIZE: &str = "oauth/authorize";
const PATH_TOKEN: &str = "oauth/token";

// Fixed literal, not a per-request nonce. Provides no CSRF protection; kept
// for wire parity with the provider's existing integrations.
const AUTHORIZE_STATE: &str = "emAuth";

const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Client for Metry's OAuth2 authorization-code popup flow.
///
/// One connector handles the entire flow: it builds the authorize URL, opens
/// and polls the popup, exchanges the harvested code for tokens, publishes a
/// [`TokenEvent`] on success, and can refresh tokens later. Construction does
/// no network activity.
pub struct OAuthConnector {
    config: AuthConfig,
    http: reqwest::Client,
    opener: Arc<dyn WindowOpener>,
    events: EventBus,
}

impl OAuthConnector {
    /// Create a connector over the given window opener.
    pub fn new(config: AuthConfig, opener: Arc<dyn WindowOpener>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            opener,
            events: EventBus::new(EVENT_BUS_CAPACITY),
        }
    }

    /// The connector's configuration.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// The bus on which `Metry:GotToken` events are published.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Join the configured base URL with an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url().trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// Build the authorization URL the popup navigates to.
    ///
    /// Pure function of the configuration: fixed parameter order, values
    /// percent-encoded. The `state` value is the fixed `emAuth` literal.
    pub fn authorize_url(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("client_secret", self.config.client_secret());
        query.append_pair("client_id", self.config.client_id());
        query.append_pair("redirect_uri", self.config.redirect_uri());
        query.append_pair("grant_type", GRANT_AUTHORIZATION_CODE);
        query.append_pair("response_type", "code");
        query.append_pair("state", AUTHORIZE_STATE);
        query.append_pair("scope", self.config.scope());

        format!("{}?{}", self.endpoint(PATH_AUTHORIZE), query.finish())
    }

    /// Open the authentication popup and drive it to completion.
    ///
    /// Computes centered geometry for the fixed 500x700 popup, opens it via
    /// the window opener, then polls its location every 200 ms. Finding a
    /// code closes the popup and hands the code to the token exchange; a
    /// popup closed by the user ends the flow silently. There is no overall
    /// timeout, and nothing prevents a caller from running several flows
    /// concurrently; each invocation owns its window and poll loop.
    pub async fn open_authenticate_popup(&self) -> Result<(), ConnectorError> {
        let auth_url = self.authorize_url();
        let features = WindowFeatures::centered(self.opener.screen(), POPUP_WIDTH, POPUP_HEIGHT);

        debug!(features = %features, "Opening authentication popup");
        let window = self.opener.open(&auth_url, AUTH_WINDOW_NAME, &features).await?;

        let mut flow = PopupFlow::new(window);
        loop {
            sleep(POLL_INTERVAL).await;

            match flow.tick() {
                FlowState::Resolved { code } => {
                    self.handle_auth_code(&code).await;
                    return Ok(());
                }
                FlowState::Closed => return Ok(()),
                FlowState::Idle | FlowState::PopupOpen => {}
            }
        }
    }

    /// Exchange an authorization code for tokens, fire-and-forget.
    ///
    /// On success the configured callback is invoked and a `Metry:GotToken`
    /// event is published, each exactly once with the same payload. Failure
    /// is logged and otherwise swallowed: no retry, no callback, no event.
    pub async fn handle_auth_code(&self, code: &str) {
        let form = Form::new()
            .text("grant_type", GRANT_AUTHORIZATION_CODE)
            .text("code", code.to_string())
            .text("client_id", self.config.client_id().to_string())
            .text("client_secret", self.config.client_secret().to_string())
            .text("state", "")
            .text("scope", self.config.scope().to_string())
            .text("redirect_uri", self.config.redirect_uri().to_string());

        match self.request_token(form).await {
            Ok(data) => {
                info!("Authorization code exchanged for token");

                if let Some(on_success) = self.config.on_success() {
                    on_success(&data);
                }
                self.events.publish(TokenEvent::got_token(data));
            }
            Err(e) => {
                error!(error = %e, "Authorization code exchange failed");
            }
        }
    }

    /// Fetch a fresh access token from a refresh token.
    ///
    /// Unlike [`handle_auth_code`], failures are the caller's problem: the
    /// underlying network or parse error is returned unchanged, and neither
    /// the callback nor the event bus is touched.
    ///
    /// [`handle_auth_code`]: OAuthConnector::handle_auth_code
    pub async fn fetch_access_token(&self, refresh_token: &str) -> Result<Value, ConnectorError> {
        let form = Form::new()
            .text("client_id", self.config.client_id().to_string())
            .text("client_secret", self.config.client_secret().to_string())
            .text("grant_type", GRANT_REFRESH_TOKEN)
            .text("scope", self.config.scope().to_string())
            .text("refresh_token", refresh_token.to_string());

        self.request_token(form).await
    }

    /// POST a multipart form to the token endpoint and parse the body.
    ///
    /// The HTTP status is deliberately not consulted: the browser version
    /// parsed whatever body came back, so an error response with a JSON body
    /// flows through like a success.
    async fn request_token(&self, form: Form) -> Result<Value, ConnectorError> {
        let response = self
            .http
            .post(self.endpoint(PATH_TOKEN))
            .multipart(form)
            .send()
            .await?;

        let data = response.json::<Value>().await?;
        Ok(data)
    }
}
