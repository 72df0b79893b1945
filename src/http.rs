use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::session::Session;
use crate::ClientError;

/// Thin wrapper over `reqwest::Client` bound to one API root and one session
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Option<Duration>,
        user_agent: &str,
        session: Session,
    ) -> Result<Self, ClientError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BuilderError(format!(
                "Base URL cannot hold paths: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn from_config(config: &ClientConfig, session: Session) -> Result<Self, ClientError> {
        Self::new(
            &config.base_url,
            Some(config.timeout_duration()),
            &config.user_agent,
            session,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Scheme, host and port of the API, e.g. `http://localhost:5000`
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::BuilderError("Base URL cannot hold paths".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the session token when there is one
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Start a request that is meaningless without a signed-in session
    pub(crate) fn authorized(&self, method: Method, url: Url) -> Result<RequestBuilder, ClientError> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Send and fail on any non-2xx status
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        debug!("{} {}", status, response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::StatusError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Send and decode the JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
