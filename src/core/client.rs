use crate::domain::model::{Credentials, ServiceRequest};
use crate::domain::ports::ServiceClient;
use crate::domain::resource::{Resource, ServiceNaming};
use crate::utils::error::{AcrewityError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.acrewity.com";
pub const EXECUTE_PATH: &str = "/api/services/execute";

/// Acrewity `/api/services/execute` 的 HTTP 客戶端
pub struct AcrewityClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    timeout: Option<Duration>,
}

impl AcrewityClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EXECUTE_PATH)
    }

    /// 以產生一個 v4 UUID 驗證 API key
    /// 服務名稱沿用節點設定的命名方式，確保驗證打到與實際執行相同的服務；
    /// 舊部署只接受底線名稱時傳入 `ServiceNaming::Underscored`
    pub async fn test_credentials(&self, naming: ServiceNaming) -> Result<Value> {
        let mut parameters = Map::new();
        parameters.insert("version".to_string(), json!("v4"));
        parameters.insert("count".to_string(), json!(1));

        let request = ServiceRequest {
            service: Resource::UuidGenerator.service_name(naming),
            operation: "generate_uuid".to_string(),
            parameters,
        };

        tracing::debug!("🔑 Testing Acrewity credentials against {}", self.endpoint());
        self.execute(&request).await
    }
}

#[async_trait]
impl ServiceClient for AcrewityClient {
    async fn execute(&self, request: &ServiceRequest) -> Result<Value> {
        let endpoint = self.endpoint();
        tracing::debug!(
            "📡 POST {} service={} operation={}",
            endpoint,
            request.service,
            request.operation
        );

        let mut builder = self
            .client
            .post(&endpoint)
            .header(AUTHORIZATION, self.credentials.bearer())
            .header(CONTENT_TYPE, "application/json")
            .json(request);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("📡 API response status: {}", status);

        let body = response.text().await?;

        if !status.is_success() {
            return Err(AcrewityError::RemoteError {
                status: status.as_u16(),
                message: remote_message(&body, status.canonical_reason()),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        // 非 JSON 回應原樣以字串回傳
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

/// 從錯誤回應中取出 `error` / `message`，否則使用原始內容
fn remote_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            match obj.get(key) {
                Some(Value::String(message)) => return message.clone(),
                Some(Value::Object(inner)) => {
                    if let Some(Value::String(message)) = inner.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("no response body").to_string()
    } else {
        body.to_string()
    }
}
