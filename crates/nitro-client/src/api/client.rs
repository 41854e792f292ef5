//! # HTTP Adapter
//!
//! HTTP client for the account service, with one cookie jar for its lifetime.

use chrono::{Months, Utc};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::error::{ApiError, ApiResult};
use super::stream::ProgressStream;
use super::types::{LoginForm, TokenResponse, WhoAmI};
use crate::config::Config;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Body of an outbound request.
#[derive(Debug)]
pub enum RequestBody {
    /// No body; sent as a JSON call.
    None,
    /// URL-encoded form fields.
    Form(Vec<(String, String)>),
    /// Multipart body; the transport sets the boundary content type.
    Multipart(Form),
}

/// A single outbound call. Built per request and never retained.
#[derive(Debug)]
pub struct RequestDescriptor {
    /// Path relative to the service URL.
    pub path: String,
    /// HTTP method.
    pub method: Method,
    /// Request body.
    pub body: RequestBody,
}

impl RequestDescriptor {
    /// A bodiless request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: RequestBody::None,
        }
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

/// HTTP adapter for the account service.
///
/// Every request carries the configured `User-Agent` and shares the same
/// cookie jar. Non-2xx responses become [`ApiError::Status`]; nothing is
/// retried.
///
/// # Examples
///
/// ```rust,ignore
/// use nitro_client::{Config, HttpAdapter};
///
/// let adapter = HttpAdapter::new(&Config::default())?;
/// adapter.install_cookie("access_token", "abc");
/// let me = adapter.whoami().await?;
/// println!("Signed in as user {}", me.user_id);
/// ```
#[derive(Clone)]
pub struct HttpAdapter {
    base_url: Url,
    cookie_url: Url,
    cookie_domain: String,
    jar: Arc<Jar>,
    http: Client,
}

impl HttpAdapter {
    /// Creates an adapter with a fresh, empty cookie jar.
    ///
    /// # Errors
    ///
    /// * [`ApiError::InvalidUrl`] - A configured URL does not parse
    /// * [`ApiError::Network`] - The HTTP client could not be built
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url =
            Url::parse(&config.base_url()).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let cookie_url =
            Url::parse(&config.cookie_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let jar = Arc::new(Jar::default());

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self {
            base_url,
            cookie_url,
            cookie_domain: config.cookie_domain.clone(),
            jar,
            http,
        })
    }

    /// Returns the service base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sets a long-lived (10 year), HTTP-only cookie for the service domain.
    pub fn install_cookie(&self, name: &str, value: &str) {
        let expires = Utc::now()
            .checked_add_months(Months::new(120))
            .unwrap_or_else(Utc::now);
        let cookie = format!(
            "{name}={value}; Expires={}; Domain={}; Path=/; HttpOnly",
            expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.cookie_domain,
        );
        self.jar.add_cookie_str(&cookie, &self.cookie_url);
        tracing::debug!(cookie = name, domain = %self.cookie_domain, "Installed cookie");
    }

    /// Returns the `Cookie` header the jar would send to `url`.
    #[must_use]
    pub fn cookies_for(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|v| v.to_str().ok().map(str::to_string))
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Sends a request and parses the response body as JSON.
    ///
    /// An empty body parses to `null`; a body that is not JSON is returned
    /// as a JSON string.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - The request could not be sent
    /// * [`ApiError::Status`] - The service answered with a non-2xx status
    pub async fn call(&self, request: RequestDescriptor) -> ApiResult<Value> {
        let url = self.url(&request.path)?;
        tracing::debug!(method = %request.method, path = %request.path, "Sending request");

        let builder = self.http.request(request.method, url);
        let builder = match request.body {
            RequestBody::None => builder.header(CONTENT_TYPE, "application/json"),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let res = builder.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        let body = parse_body(&bytes);

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), path = %request.path, "Request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn call_json<T: DeserializeOwned>(&self, request: RequestDescriptor) -> ApiResult<T> {
        let body = self.call(request).await?;
        serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Exchanges a username and password for an access token.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Status`] - 401 for bad credentials, or another status
    /// * [`ApiError::InvalidResponse`] - The response lacks id or token
    pub async fn request_token(&self, form: &LoginForm) -> ApiResult<TokenResponse> {
        let fields = vec![
            ("password".to_string(), form.password.clone()),
            ("username".to_string(), form.username.clone()),
        ];
        self.call_json(
            RequestDescriptor::new(Method::POST, "auth/token").with_body(RequestBody::Form(fields)),
        )
        .await
    }

    /// Asks the service who the current cookie belongs to.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Status`] - 401 if there is no valid credential
    pub async fn whoami(&self) -> ApiResult<WhoAmI> {
        self.call_json(RequestDescriptor::new(Method::GET, "whoami"))
            .await
    }

    /// Streams `path` to the user's avatar endpoint as the multipart field
    /// `file`.
    ///
    /// `on_flushed` receives the cumulative number of file bytes handed to
    /// the transport's write queue.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Io`] - The file could not be opened
    /// * [`ApiError::Status`] - The service rejected the upload
    pub async fn upload_avatar<F>(
        &self,
        user_id: u64,
        path: &Path,
        size: u64,
        on_flushed: F,
    ) -> ApiResult<Value>
    where
        F: FnMut(u64) + Send + Sync + Unpin + 'static,
    {
        let file = tokio::fs::File::open(path).await?;
        let stream = ProgressStream::new(ReaderStream::new(file), on_flushed);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let part = Part::stream_with_length(Body::wrap_stream(stream), size)
            .file_name(file_name)
            .mime_str(mime.essence_str())?;
        let form = Form::new().part("file", part);

        self.call(
            RequestDescriptor::new(Method::PUT, format!("user-avatar/user/{user_id}/avatar"))
                .with_body(RequestBody::Multipart(form)),
        )
        .await
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
