//! Queue router client implementation.

use bookchain_core::{token, AuthPayload, BookchainError, QueueMessage, RegisterResponse, Result};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default request timeout.
///
/// Router calls are short; a stalled call must not delay the next scheduled
/// poll cycle by more than a few seconds.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Client for the remote queue router.
///
/// Holds the node's identity and session token once [`register`] has
/// succeeded. One client belongs to one node; identity is stable for the
/// process lifetime.
///
/// [`register`]: RouterClient::register
pub struct RouterClient {
    http: HttpClient,
    base_url: Url,
    identity: Option<String>,
    token: Option<String>,
    auth: Option<AuthPayload>,
}

impl RouterClient {
    /// Create a client for the router at `base_url` using default settings
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        RouterClientBuilder::new(base_url).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(base_url: impl AsRef<str>) -> RouterClientBuilder {
        RouterClientBuilder::new(base_url)
    }

    /// The router-issued identity, if registration has succeeded
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Register with the router and derive the session token.
    ///
    /// `GET /register` returns `{identity, epoch}`; the token is
    /// `sha256("{identity}-{epoch}")`. On a non-success status the node is
    /// left unregistered and the error carries the status code — callers log
    /// it and carry on, authenticated calls will fail with
    /// [`BookchainError::NotRegistered`] until a later attempt succeeds.
    pub async fn register(&mut self) -> Result<()> {
        let url = self.endpoint("register");
        debug!(url = %url, "GET register");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BookchainError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookchainError::Registration {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BookchainError::Http(e.to_string()))?;
        let registered: RegisterResponse = serde_json::from_str(&body)?;

        self.token = Some(token::generate(&registered.identity, registered.epoch));
        info!(identity = %registered.identity, "registered with router");
        self.identity = Some(registered.identity);
        Ok(())
    }

    /// Poll the router for one pending message.
    ///
    /// `Ok(Some(_))` is a message addressed to this node, `Ok(None)` means
    /// the queue is empty (the router answers 404, which is informational,
    /// not a failure). Any other status is a transport error for this cycle.
    pub async fn dequeue(&mut self) -> Result<Option<QueueMessage>> {
        let auth = self.auth_payload()?.clone();
        let url = self.endpoint("dequeue");
        debug!(url = %url, identity = %auth.identity, "GET dequeue");

        let response = self
            .http
            .get(url)
            .query(&[("identity", &auth.identity), ("token", &auth.token)])
            .send()
            .await
            .map_err(|e| BookchainError::Http(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BookchainError::Dequeue {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BookchainError::Http(e.to_string()))?;
        let message: QueueMessage = serde_json::from_str(&body)?;
        Ok(Some(message))
    }

    /// Submit a message addressed to `address`.
    ///
    /// The body is an urlencoded form of the auth payload plus `address` and
    /// `data`, where `data` is the JSON-encoded message.
    pub async fn enqueue(&mut self, address: &str, message: &QueueMessage) -> Result<()> {
        let auth = self.auth_payload()?.clone();
        let data = serde_json::to_string(message)?;
        let url = self.endpoint("enqueue");
        debug!(url = %url, address, "POST enqueue");

        let response = self
            .http
            .post(url)
            .form(&[
                ("identity", auth.identity.as_str()),
                ("token", auth.token.as_str()),
                ("address", address),
                ("data", data.as_str()),
            ])
            .send()
            .await
            .map_err(|e| BookchainError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BookchainError::Enqueue {
                status: status.as_u16(),
            })
        }
    }

    /// The memoized auth payload, built once from identity and token.
    fn auth_payload(&mut self) -> Result<&AuthPayload> {
        if self.auth.is_none() {
            let (Some(identity), Some(token)) = (self.identity.clone(), self.token.clone())
            else {
                return Err(BookchainError::NotRegistered);
            };
            self.auth = Some(AuthPayload { identity, token });
        }
        // Populated just above.
        self.auth.as_ref().ok_or(BookchainError::NotRegistered)
    }

    fn endpoint(&self, path: &str) -> Url {
        // base_url always ends in "/" (normalized by the builder), so join
        // cannot fail for a plain path segment.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Builder for configuring a [`RouterClient`]
pub struct RouterClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl RouterClientBuilder {
    /// Create a new builder for the router at `base_url`
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("bookchain-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RouterClient> {
        let mut normalized = self.base_url;
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|e| BookchainError::Config(format!("invalid router url: {e}")))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| BookchainError::Http(e.to_string()))?;

        Ok(RouterClient {
            http,
            base_url,
            identity: None,
            token: None,
            auth: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_trailing_slash() {
        let client = RouterClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("dequeue").as_str(),
            "http://localhost:8000/dequeue"
        );
    }

    #[test]
    fn builder_rejects_garbage_url() {
        assert!(matches!(
            RouterClient::new("not a url"),
            Err(BookchainError::Config(_))
        ));
    }

    #[tokio::test]
    async fn unregistered_client_cannot_dequeue() {
        let mut client = RouterClient::new("http://localhost:8000").unwrap();
        assert!(matches!(
            client.dequeue().await,
            Err(BookchainError::NotRegistered)
        ));
    }
}
