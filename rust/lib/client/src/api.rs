use std::sync::Arc;

use fmconsole_core::{ConsoleConfig, ConsoleError, Envelope};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::retry::RetryPolicy;
use crate::token::TokenSource;

/// HTTP client for the console backend.
///
/// Every call goes through the same pipeline:
/// 1. attach the bearer token from the [`TokenSource`]
/// 2. send with the fixed request timeout
/// 3. map non-2xx HTTP status to [`ConsoleError`]
/// 4. read the `{code, message, data}` envelope; a failure `code` is a
///    [`ConsoleError::Business`]
/// 5. retry network, timeout and 5xx failures per [`RetryPolicy`]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn from_config(
        config: &ConsoleConfig,
        token_source: Arc<dyn TokenSource>,
    ) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            token_source,
            retry: RetryPolicy::from_config(config),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ── Verbs ───────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        self.call(Method::GET, path, &[], None).await?.into_data()
    }

    /// GET with query parameters taken from a serializable struct.
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ConsoleError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let pairs = query_pairs(query)?;
        self.call(Method::GET, path, &pairs, None).await?.into_data()
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::POST, path, &[], Some(&body)).await?.into_data()
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ConsoleError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.call(Method::PUT, path, &[], Some(&body)).await?.into_data()
    }

    /// DELETE; any `data` in the envelope is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ConsoleError> {
        self.call::<Value>(Method::DELETE, path, &[], None)
            .await?
            .into_result()
            .map(|_| ())
    }

    // ── Pipeline ────────────────────────────────────────────────────

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Envelope<T>, ConsoleError> {
        let url = self.url(path);
        let mut attempt = 1;
        loop {
            match self.send_once(method.clone(), &url, query, body).await {
                Ok(envelope) => return Ok(envelope),
                Err(err) if self.retry.should_retry(attempt, &err) => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        %method, path, attempt, delay_ms = delay.as_millis() as u64,
                        error = %err, "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!(%method, path, attempt, code = err.error_code(), "request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Envelope<T>, ConsoleError> {
        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = self.token_source.token().await? {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = failure_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ConsoleError::from_status(status.as_u16(), message));
        }

        serde_json::from_str::<Envelope<T>>(&text)
            .map_err(|e| ConsoleError::Decode(format!("response body: {}", e)))
    }
}

fn transport_error(e: reqwest::Error) -> ConsoleError {
    if e.is_timeout() {
        ConsoleError::Timeout(e.to_string())
    } else if e.is_decode() {
        ConsoleError::Decode(e.to_string())
    } else {
        ConsoleError::Network(e.to_string())
    }
}

/// Pull `message` out of an error body, falling back to the raw text.
fn failure_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(v) => v
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        Err(_) => Some(body.to_string()),
    }
}

/// Flatten a serializable struct into query pairs. Nulls are dropped.
fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>, ConsoleError> {
    let value = serde_json::to_value(query)?;
    let Value::Object(map) = value else {
        return Err(ConsoleError::Decode("query must serialize to an object".into()));
    };
    Ok(map
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| match v {
            Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{delete, get, post};
    use axum::Json;
    use serde_json::json;

    use crate::token::SharedToken;

    /// Serve `app` on an ephemeral port and return its base URL.
    pub(crate) async fn serve(app: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    pub(crate) fn test_config(base: &str) -> ConsoleConfig {
        ConsoleConfig {
            api_base: base.to_string(),
            request_timeout: Duration::from_secs(2),
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
            backoff_max: Duration::from_millis(5),
            ..Default::default()
        }
    }

    fn client(base: &str) -> ApiClient {
        ApiClient::from_config(&test_config(base), Arc::new(SharedToken::new())).unwrap()
    }

    type Calls = Arc<AtomicU32>;

    fn counted(calls: &Calls) -> u32 {
        calls.load(Ordering::SeqCst)
    }

    // ========================================================================
    // Retry
    // ========================================================================

    #[tokio::test]
    async fn retries_5xx_until_success() {
        async fn flaky(State(calls): State<Calls>) -> (StatusCode, Json<Value>) {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"code": 503, "message": "busy"})))
            } else {
                (StatusCode::OK, Json(json!({"code": 200, "message": "ok", "data": "north-tower"})))
            }
        }

        let calls = Calls::default();
        let app = axum::Router::new().route("/sites/1", get(flaky)).with_state(calls.clone());
        let base = serve(app).await;

        let site: String = client(&base).get("/sites/1").await.unwrap();
        assert_eq!(site, "north-tower");
        assert_eq!(counted(&calls), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        async fn down(State(calls): State<Calls>) -> StatusCode {
            calls.fetch_add(1, Ordering::SeqCst);
            StatusCode::BAD_GATEWAY
        }

        let calls = Calls::default();
        let app = axum::Router::new().route("/meters", get(down)).with_state(calls.clone());
        let base = serve(app).await;

        let err = client(&base).get::<Value>("/meters").await.unwrap_err();
        assert_eq!(err, ConsoleError::Server { status: 502, message: "Bad Gateway".into() });
        assert_eq!(counted(&calls), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        async fn missing(State(calls): State<Calls>) -> (StatusCode, Json<Value>) {
            calls.fetch_add(1, Ordering::SeqCst);
            (StatusCode::NOT_FOUND, Json(json!({"code": 404, "message": "tenant 9 not found"})))
        }

        let calls = Calls::default();
        let app = axum::Router::new().route("/tenants/9", get(missing)).with_state(calls.clone());
        let base = serve(app).await;

        let err = client(&base).get::<Value>("/tenants/9").await.unwrap_err();
        assert_eq!(
            err,
            ConsoleError::Client { status: 404, message: "tenant 9 not found".into() }
        );
        assert_eq!(counted(&calls), 1);
    }

    #[tokio::test]
    async fn network_failure_is_retried_then_surfaced() {
        // Bind and drop to get a port nobody listens on.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let base = format!("http://127.0.0.1:{}", port);

        let err = client(&base).get::<Value>("/anything").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        async fn slow() -> Json<Value> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Json(json!({"code": 200, "data": 1}))
        }

        let base = serve(axum::Router::new().route("/slow", get(slow))).await;
        let mut config = test_config(&base);
        config.request_timeout = Duration::from_millis(50);
        let api = ApiClient::from_config(&config, Arc::new(SharedToken::new()))
            .unwrap()
            .with_retry(RetryPolicy::none());

        let err = api.get::<u32>("/slow").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Timeout(_)), "got {:?}", err);
    }

    // ========================================================================
    // Status / envelope normalization
    // ========================================================================

    #[tokio::test]
    async fn envelope_failure_code_is_business_error() {
        async fn create() -> Json<Value> {
            Json(json!({"code": 4001, "message": "tenant already onboarded"}))
        }

        let base = serve(axum::Router::new().route("/tenants", post(create))).await;
        let err = client(&base)
            .post::<Value, _>("/tenants", &json!({"name": "acme"}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConsoleError::Business { code: 4001, message: "tenant already onboarded".into() }
        );
    }

    #[tokio::test]
    async fn status_401_and_403_are_typed() {
        async fn expired() -> StatusCode {
            StatusCode::UNAUTHORIZED
        }
        async fn forbidden() -> (StatusCode, Json<Value>) {
            (StatusCode::FORBIDDEN, Json(json!({"code": 403, "message": "roles.write required"})))
        }

        let app = axum::Router::new()
            .route("/me", get(expired))
            .route("/roles", get(forbidden));
        let base = serve(app).await;
        let api = client(&base);

        assert!(api.get::<Value>("/me").await.unwrap_err().is_auth_expired());
        assert_eq!(
            api.get::<Value>("/roles").await.unwrap_err(),
            ConsoleError::PermissionDenied("roles.write required".into())
        );
    }

    #[tokio::test]
    async fn unreadable_body_is_decode_error() {
        async fn html() -> &'static str {
            "<html>maintenance</html>"
        }

        let base = serve(axum::Router::new().route("/x", get(html))).await;
        let err = client(&base).get::<Value>("/x").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)));
    }

    #[tokio::test]
    async fn delete_ignores_data() {
        async fn remove() -> Json<Value> {
            Json(json!({"code": 200, "message": "deleted"}))
        }

        let base = serve(axum::Router::new().route("/roles/3", delete(remove))).await;
        client(&base).delete("/roles/3").await.unwrap();
    }

    // ========================================================================
    // Token and query
    // ========================================================================

    #[tokio::test]
    async fn bearer_token_is_attached() {
        async fn whoami(headers: HeaderMap) -> Json<Value> {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({"code": 200, "data": auth}))
        }

        let base = serve(axum::Router::new().route("/whoami", get(whoami))).await;
        let api = ApiClient::from_config(&test_config(&base), Arc::new(SharedToken::with_token("jwt-1")))
            .unwrap();
        let seen: String = api.get("/whoami").await.unwrap();
        assert_eq!(seen, "Bearer jwt-1");
    }

    #[tokio::test]
    async fn query_pairs_are_sent() {
        async fn echo(Query(q): Query<std::collections::HashMap<String, String>>) -> Json<Value> {
            Json(json!({"code": 200, "data": q}))
        }

        let base = serve(axum::Router::new().route("/users", get(echo))).await;
        let seen: std::collections::HashMap<String, String> = client(&base)
            .get_query("/users", &fmconsole_core::ListParams::default())
            .await
            .unwrap();
        assert_eq!(seen.get("page").map(String::as_str), Some("1"));
        assert_eq!(seen.get("page_size").map(String::as_str), Some("20"));
        assert!(!seen.contains_key("keyword"));
    }
}
