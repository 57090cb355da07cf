//!
//! `gateway` is a typed client for the Pinstack API gateway, speaking the
//! gateway's REST + JSON interface.
//!
//! The client holds no session state: every operation takes the [`Credentials`]
//! to present for that single request, so one [`Gateway`] may be shared between
//! any number of concurrently running tasks acting as different users.
use log::{debug, warn};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

mod auth;
pub mod builder;
pub mod config;
pub mod error;
pub mod models;
mod notifications;
mod posts;
mod relations;
mod users;

pub use builder::{GatewayBuilder, GatewayBuilderError};
pub use error::{ApiErrorKind, GatewayError};
pub use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Query string parameters, in the order they are appended to the URL
pub type Query<'a> = [(&'a str, String)];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Credentials {
    #[default]
    Anonymous,
    Bearer(String),
}

impl Credentials {
    /// Bearer credentials for `token`. An empty token means no credentials at all.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            Credentials::Anonymous
        } else {
            Credentials::Bearer(token)
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Credentials::Anonymous => None,
            Credentials::Bearer(token) => Some(token),
        }
    }

    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Credentials::Anonymous => request,
            Credentials::Bearer(ref token) => request.bearer_auth(token),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Gateway {
    base_url: Url,
    pub client: Client,
}

impl Gateway {
    /// Creates a client for the gateway rooted at `base_url`, e.g. `http://localhost:8080/api`
    #[allow(clippy::missing_errors_doc)]
    pub fn new<H>(base_url: H) -> Result<Gateway>
    where
        H: Into<String>,
    {
        let base_url = Url::parse(&base_url.into())?;
        Ok(Gateway {
            base_url,
            client: Client::new(),
        })
    }

    pub(crate) fn with_client(base_url: Url, client: Client) -> Gateway {
        Gateway { base_url, client }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        // Url::join() would drop the last path segment of the base, i.e. the "/api" part
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{endpoint}"))?)
    }

    /// `endpoint` followed by one more path segment. Only what a path segment cannot
    /// carry literally (`/`, `?`, `#`, `%`, spaces, ...) is escaped, so `alice@example.com`
    /// stays as is.
    fn endpoint_url_with_segment(&self, endpoint: &str, segment: &str) -> Result<Url> {
        let mut url = self.endpoint_url(endpoint)?;
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(segment);
        Ok(url)
    }

    async fn request<D>(
        &self,
        credentials: &Credentials,
        method: Method,
        url: Url,
        query: &Query<'_>,
        body: Option<Vec<u8>>,
    ) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        request = credentials.apply(request);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        debug!("request {method} '{url}'");

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("status {status:?} body '{body}'");

        if status.is_client_error() || status.is_server_error() {
            let err = GatewayError::from_response(status, &body);
            warn!("{method} {} failed: {err}", url.path());
            return Err(err);
        }

        let data = if body.trim().is_empty() { "null" } else { &body };
        Ok(serde_json::from_str::<D>(data)?)
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn get<D>(&self, credentials: &Credentials, endpoint: &str, query: &Query<'_>) -> Result<D>
    where
        D: DeserializeOwned,
    {
        self.request::<D>(credentials, Method::GET, self.endpoint_url(endpoint)?, query, None)
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn delete<D>(&self, credentials: &Credentials, endpoint: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        self.request::<D>(credentials, Method::DELETE, self.endpoint_url(endpoint)?, &[], None)
            .await
    }

    #[allow(clippy::missing_errors_doc)]
    pub async fn post<D, S>(&self, credentials: &Credentials, endpoint: &str, body: &S) -> Result<D>
    where
        D: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(body)?;
        self.request::<D>(credentials, Method::POST, self.endpoint_url(endpoint)?, &[], Some(data))
            .await
    }

    /// PUT with an optional body; some gateway endpoints (mark as read) take none
    #[allow(clippy::missing_errors_doc)]
    pub async fn put<D, S>(
        &self,
        credentials: &Credentials,
        endpoint: &str,
        body: Option<&S>,
    ) -> Result<D>
    where
        D: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let data = body.map(serde_json::to_vec).transpose()?;
        self.request::<D>(credentials, Method::PUT, self.endpoint_url(endpoint)?, &[], data)
            .await
    }
}
