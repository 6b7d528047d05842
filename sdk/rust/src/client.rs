use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// A gateway reply: status, CORS origin header (if any) and decoded body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub allow_origin: Option<String>,
    pub request_id: Option<String>,
    pub body: Value,
}

impl ApiResponse {
    /// The `success` flag of the envelope, `false` when absent.
    pub fn success(&self) -> bool {
        self.body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `error` message of a failure envelope.
    pub fn error(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }

    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/api/health").await
    }

    pub async fn info(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/api/info").await
    }

    pub async fn stats(&self) -> Result<ApiResponse, reqwest::Error> {
        self.get("/api/stats").await
    }

    /// List a resource collection, e.g. `users` or `messages`.
    /// `conversation_id` only applies to `messages`.
    pub async fn list(
        &self,
        resource: &str,
        conversation_id: Option<&str>,
    ) -> Result<ApiResponse, reqwest::Error> {
        let mut request = self.client.get(self.url(&format!("/api/{}", resource)));
        if let Some(id) = conversation_id {
            request = request.query(&[("conversationId", id)]);
        }
        Self::decode(request.send().await?).await
    }

    /// Create a record in a resource collection.
    pub async fn create(&self, resource: &str, body: &Value) -> Result<ApiResponse, reqwest::Error> {
        let response = self
            .client
            .post(self.url(&format!("/api/{}", resource)))
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST a raw, possibly malformed, body.
    pub async fn post_raw(&self, path: &str, body: &str) -> Result<ApiResponse, reqwest::Error> {
        let response = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Send any method to any path. Used for preflight and unknown routes.
    pub async fn request(&self, method: Method, path: &str) -> Result<ApiResponse, reqwest::Error> {
        Self::decode(self.client.request(method, self.url(path)).send().await?).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, reqwest::Error> {
        self.request(Method::GET, path).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode(response: reqwest::Response) -> Result<ApiResponse, reqwest::Error> {
        let status = response.status();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let allow_origin = header("access-control-allow-origin");
        let request_id = header("x-request-id");

        let text = response.text().await?;
        // Non-JSON bodies (the preflight "ok") are kept as a string.
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ApiResponse {
            status,
            allow_origin,
            request_id,
            body,
        })
    }
}
