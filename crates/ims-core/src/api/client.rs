use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::query::query_pairs;
use super::transport::{CurlTransport, HttpRequest, HttpResponse, HttpTransport, Method};
use super::ApiError;
use crate::config::ImsConfig;
use crate::session::SessionStore;
use crate::validation::{FieldError, FieldErrors, ValidationError};

/// How a 401 is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Main app: refresh the token pair once and replay the request.
    #[default]
    Refreshing,
    /// Customer/vendor portal: no refresh path; clear the session and require login.
    Portal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    #[serde(default)]
    pub user: Option<Value>,
}

struct Inner {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: SessionStore,
    mode: AuthMode,
    /// Serializes refreshes so concurrent 401s trigger one refresh call.
    refresh_lock: tokio::sync::Mutex<()>,
}

/// Cloneable handle to the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("mode", &self.inner.mode)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        session: SessionStore,
        mode: AuthMode,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: base_url.into(),
                transport,
                session,
                mode,
                refresh_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// libcurl transport with the configured timeouts; portal mode from config.
    pub fn from_config(cfg: &ImsConfig, session: SessionStore) -> Self {
        let transport = CurlTransport::new(cfg.connect_timeout(), cfg.request_timeout());
        let mode = if cfg.portal_mode {
            AuthMode::Portal
        } else {
            AuthMode::Refreshing
        };
        Self::new(cfg.api_base_url.clone(), Arc::new(transport), session, mode)
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub fn mode(&self) -> AuthMode {
        self.inner.mode
    }

    /// Absolute URL for `path` under the base URL, with optional query pairs.
    pub fn url(&self, path: &str, query: &[(String, String)]) -> Result<String, ApiError> {
        let joined = format!(
            "{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = url::Url::parse(&joined)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url.to_string())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path, &[])?;
        decode(&self.execute(Method::Get, url, None).await?)
    }

    /// GET with a filter struct serialized into the query string.
    pub async fn get_with<T, F>(&self, path: &str, filter: &F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let url = self.url(path, &query_pairs(filter)?)?;
        decode(&self.execute(Method::Get, url, None).await?)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.with_body(Method::Post, path, body).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.with_body(Method::Put, path, body).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.with_body(Method::Patch, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path, &[])?;
        self.execute(Method::Delete, url, None).await?;
        Ok(())
    }

    async fn with_body<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let payload = serde_json::to_vec(body)?;
        decode(&self.execute(method, url, Some(payload)).await?)
    }

    /// Authenticate and persist the returned tokens and user.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.url("auth/login", &[])?;
        let body = serde_json::to_vec(&json!({ "email": email, "password": password }))?;
        let resp = self.send(Method::Post, &url, Some(body), None).await?;
        let login: LoginResponse = decode(&into_body(resp)?)?;

        let session = &self.inner.session;
        session.set_tokens(&login.tokens.access_token, login.tokens.refresh_token.as_deref())?;
        if let Some(user) = &login.user {
            session.set_user(user.clone())?;
        }
        tracing::info!(email, "logged in");
        Ok(login)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.inner.session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ApiError> {
        let token = self.inner.session.access_token()?;
        let resp = self
            .send(method, &url, body.clone(), token.as_deref())
            .await?;
        if resp.status != 401 {
            return into_body(resp);
        }

        match self.inner.mode {
            AuthMode::Portal => {
                tracing::info!(%method, %url, "unauthorized in portal session, login required");
                self.inner.session.clear()?;
                Err(ApiError::LoginRequired)
            }
            AuthMode::Refreshing => {
                self.refresh(token.as_deref()).await?;
                let token = self.inner.session.access_token()?;
                let resp = self.send(method, &url, body, token.as_deref()).await?;
                if resp.status == 401 {
                    tracing::warn!(%method, %url, "still unauthorized after token refresh");
                    self.inner.session.clear()?;
                    return Err(ApiError::LoginRequired);
                }
                into_body(resp)
            }
        }
    }

    /// Exchange the refresh token for a new pair. `stale` is the access token the
    /// failed request used; if another request already replaced it, nothing is sent.
    async fn refresh(&self, stale: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;
        let session = &self.inner.session;

        let current = session.access_token()?;
        if current.is_some() && current.as_deref() != stale {
            tracing::debug!("token already refreshed by a concurrent request");
            return Ok(());
        }

        let Some(refresh_token) = session.refresh_token()? else {
            tracing::info!("no refresh token, login required");
            session.clear()?;
            return Err(ApiError::LoginRequired);
        };

        let url = self.url("auth/refresh", &[])?;
        let body = serde_json::to_vec(&json!({ "refreshToken": refresh_token }))?;
        let resp = self.send(Method::Post, &url, Some(body), None).await?;
        if !resp.is_success() {
            tracing::warn!(status = resp.status, "token refresh rejected, login required");
            session.clear()?;
            return Err(ApiError::LoginRequired);
        }

        let pair: TokenPair = decode(&resp.body)?;
        session.set_tokens(&pair.access_token, pair.refresh_token.as_deref())?;
        tracing::debug!("access token refreshed");
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let request = HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        };
        let transport = Arc::clone(&self.inner.transport);
        let response = tokio::task::spawn_blocking(move || transport.send(&request)).await??;
        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(body)?)
}

fn into_body(resp: HttpResponse) -> Result<Vec<u8>, ApiError> {
    if resp.is_success() {
        Ok(resp.body)
    } else {
        Err(error_from_response(&resp))
    }
}

/// Map an error response onto `ApiError`.
///
/// Field errors (`errors: [{field, message}]`) on a 400 become `Validation`;
/// otherwise the `message` (string or list of strings) is carried in `Status`.
fn error_from_response(resp: &HttpResponse) -> ApiError {
    let parsed: Option<Value> = serde_json::from_slice(&resp.body).ok();

    if resp.status == 400 {
        let field_errors = parsed
            .as_ref()
            .and_then(|v| v.get("errors"))
            .and_then(|v| serde_json::from_value::<Vec<FieldError>>(v.clone()).ok())
            .filter(|errors| !errors.is_empty());
        if let Some(errors) = field_errors {
            return ApiError::Validation(ValidationError(FieldErrors::from(errors)));
        }
    }

    let message = parsed
        .as_ref()
        .and_then(|v| match v.get("message") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => v.get("error").and_then(Value::as_str).map(str::to_string),
        })
        .or_else(|| {
            let text = String::from_utf8_lossy(&resp.body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| "request failed".to_string());

    ApiError::Status {
        status: resp.status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u32, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn field_errors_become_validation() {
        let err = error_from_response(&resp(
            400,
            r#"{"statusCode":400,"errors":[{"field":"sstRegistrationNumber","message":"bad format"}]}"#,
        ));
        match err {
            ApiError::Validation(v) => assert!(v.errors().has_field("sstRegistrationNumber")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn message_list_is_joined() {
        let err = error_from_response(&resp(
            400,
            r#"{"statusCode":400,"message":["name should not be empty","sku must be a string"]}"#,
        ));
        assert_eq!(
            err.to_string(),
            "HTTP 400: name should not be empty; sku must be a string"
        );
    }

    #[test]
    fn plain_text_and_empty_bodies() {
        assert_eq!(
            error_from_response(&resp(502, "Bad Gateway")).to_string(),
            "HTTP 502: Bad Gateway"
        );
        let err = error_from_response(&resp(404, ""));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404: request failed");
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let _: () = decode(b"").unwrap();
        let v: Option<u32> = decode(b"  ").unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn url_joins_base_and_query() {
        struct Never;
        impl HttpTransport for Never {
            fn send(&self, _: &HttpRequest) -> Result<HttpResponse, super::super::TransportError> {
                unreachable!()
            }
        }
        let client = ApiClient::new(
            "http://localhost:3001/api/",
            Arc::new(Never),
            SessionStore::in_memory(),
            AuthMode::Refreshing,
        );
        assert_eq!(
            client.url("/inventory/items", &[]).unwrap(),
            "http://localhost:3001/api/inventory/items"
        );
        assert_eq!(
            client
                .url("inventory/items", &[("search".to_string(), "teh tarik".to_string())])
                .unwrap(),
            "http://localhost:3001/api/inventory/items?search=teh+tarik"
        );
    }
}
