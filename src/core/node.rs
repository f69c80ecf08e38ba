use crate::core::parameters::{build_parameters, resolve_operation, ItemParameters};
use crate::domain::model::{Item, OutputItem, ServiceRequest};
use crate::domain::ports::ServiceClient;
use crate::domain::resource::{Resource, ServiceNaming};
use crate::domain::schema::resource_spec;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 單一項目失敗時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// 第一個錯誤即中止整批，錯誤附上項目索引
    #[default]
    FailFast,
    /// 失敗項目輸出 `{error: ...}`，繼續處理後續項目
    ContinueOnFail,
}

#[derive(Debug, Clone, Default)]
pub struct NodeSettings {
    pub resource: String,
    pub operation: Option<String>,
    pub parameters: Map<String, Value>,
    pub service_naming: ServiceNaming,
    pub error_policy: ErrorPolicy,
}

pub struct AcrewityNode<C: ServiceClient> {
    client: C,
    settings: NodeSettings,
}

impl<C: ServiceClient> AcrewityNode<C> {
    pub fn new(client: C, settings: NodeSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    /// 組出第 `index` 個項目要送出的請求
    pub fn build_request(&self, items: &[Item], index: usize) -> Result<ServiceRequest> {
        let resource: Resource = self.settings.resource.parse()?;
        let operation = resolve_operation(resource, self.settings.operation.as_deref())?;
        let source = ItemParameters::new(&self.settings.parameters, items);
        let parameters = build_parameters(resource, operation, &source, index)?;

        Ok(ServiceRequest {
            service: resource.service_name(self.settings.service_naming),
            operation: operation.to_string(),
            parameters,
        })
    }

    /// 依序處理每個項目，每個項目一次 API 呼叫
    pub async fn execute(&self, items: &[Item]) -> Result<Vec<OutputItem>> {
        let mut outputs = Vec::with_capacity(items.len());
        let mut failed = 0usize;

        tracing::info!(
            "🚀 Executing {} ({}) for {} items",
            self.settings.resource,
            self.settings.operation.as_deref().unwrap_or("default operation"),
            items.len()
        );

        for index in 0..items.len() {
            match self.execute_item(items, index).await {
                Ok(response) => {
                    tracing::debug!("✅ Item {} processed", index);
                    outputs.push(OutputItem::success(response, index));
                }
                Err(e) => match self.settings.error_policy {
                    ErrorPolicy::ContinueOnFail => {
                        tracing::warn!("⚠️ Item {} failed, continuing: {}", index, e);
                        failed += 1;
                        outputs.push(OutputItem::failure(e.item_message(), index));
                    }
                    ErrorPolicy::FailFast => {
                        tracing::error!("❌ Item {} failed, aborting: {}", index, e);
                        return Err(e.at_item(index));
                    }
                },
            }
        }

        tracing::info!(
            "📦 Processed {} items ({} succeeded, {} failed)",
            outputs.len(),
            outputs.len() - failed,
            failed
        );
        Ok(outputs)
    }

    async fn execute_item(&self, items: &[Item], index: usize) -> Result<Value> {
        let request = self.build_request(items, index)?;
        self.client.execute(&request).await
    }

    /// 不發送請求，只回傳每個項目會送出的內容 (密碼欄位遮蔽)
    pub fn preview(&self, items: &[Item]) -> Vec<Result<ServiceRequest>> {
        (0..items.len())
            .map(|index| -> Result<ServiceRequest> {
                let mut request = self.build_request(items, index)?;
                redact_secrets(&self.settings.resource, &mut request);
                Ok(request)
            })
            .collect()
    }
}

fn redact_secrets(resource: &str, request: &mut ServiceRequest) {
    let Ok(resource) = resource.parse::<Resource>() else {
        return;
    };

    for field in resource_spec(resource).fields.iter().filter(|f| f.secret) {
        if let Some(value) = request.parameters.get_mut(field.name) {
            *value = Value::String("***".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AcrewityError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 記錄收到的請求並回傳固定回應
    struct RecordingClient {
        requests: Mutex<Vec<ServiceRequest>>,
        fail_on: Option<usize>,
    }

    impl RecordingClient {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on: Some(call),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ServiceClient for RecordingClient {
        async fn execute(&self, request: &ServiceRequest) -> Result<Value> {
            let mut requests = self.requests.lock().unwrap();
            let call = requests.len();
            requests.push(request.clone());

            if self.fail_on == Some(call) {
                return Err(AcrewityError::RemoteError {
                    status: 500,
                    message: "service unavailable".to_string(),
                });
            }
            Ok(json!({"call": call}))
        }
    }

    fn settings(resource: &str, parameters: Value, policy: ErrorPolicy) -> NodeSettings {
        NodeSettings {
            resource: resource.to_string(),
            operation: None,
            parameters: parameters.as_object().cloned().unwrap_or_default(),
            service_naming: ServiceNaming::Hyphenated,
            error_policy: policy,
        }
    }

    fn items(values: Vec<Value>) -> Vec<Item> {
        values.into_iter().map(Item::new).collect()
    }

    #[tokio::test]
    async fn test_one_output_per_item_in_order() {
        let node = AcrewityNode::new(
            RecordingClient::new(),
            settings("uuid_generator", json!({"count": 2}), ErrorPolicy::FailFast),
        );
        let input = items(vec![json!({}), json!({}), json!({})]);

        let outputs = node.execute(&input).await.unwrap();

        assert_eq!(outputs.len(), 3);
        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.paired_item.item, i);
            assert_eq!(output.json, json!({"call": i}));
        }

        let requests = node.client.requests.lock().unwrap();
        assert_eq!(requests[0].service, "uuid-generator");
        assert_eq!(requests[0].operation, "generate_uuid");
        assert_eq!(Value::Object(requests[0].parameters.clone()), json!({"version": "v4", "count": 2}));
    }

    #[tokio::test]
    async fn test_continue_on_fail_records_error_and_proceeds() {
        let node = AcrewityNode::new(
            RecordingClient::new(),
            settings(
                "markdown_table_generator",
                json!({"headers": "{{ $json.headers }}", "rows": "[]"}),
                ErrorPolicy::ContinueOnFail,
            ),
        );
        let input = items(vec![
            json!({"headers": "[\"a\"]"}),
            json!({"headers": "[\"broken"}),
            json!({"headers": "[\"c\"]"}),
        ]);

        let outputs = node.execute(&input).await.unwrap();

        assert_eq!(outputs.len(), 3);
        assert!(!outputs[0].is_error());
        assert!(outputs[1].is_error());
        assert!(outputs[1].json["error"].as_str().unwrap().contains("headers"));
        assert_eq!(outputs[1].paired_item.item, 1);
        assert!(!outputs[2].is_error());
        assert_eq!(node.client.calls(), 2);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_error() {
        let node = AcrewityNode::new(
            RecordingClient::failing_on(1),
            settings("url_encoder_decoder", json!({"text": "a b"}), ErrorPolicy::FailFast),
        );
        let input = items(vec![json!({}), json!({}), json!({})]);

        let err = node.execute(&input).await.unwrap_err();

        assert!(matches!(err, AcrewityError::ItemFailed { index: 1, .. }));
        assert_eq!(node.client.calls(), 2);
    }

    #[tokio::test]
    async fn test_remote_failure_message_is_kept_under_continue() {
        let node = AcrewityNode::new(
            RecordingClient::failing_on(0),
            settings("url_encoder_decoder", json!({"text": "a b"}), ErrorPolicy::ContinueOnFail),
        );

        let outputs = node.execute(&items(vec![json!({}), json!({})])).await.unwrap();

        assert_eq!(
            outputs[0].json,
            json!({"error": "Request failed with status code 500: service unavailable"})
        );
        assert_eq!(outputs[1].json, json!({"call": 1}));
    }

    #[tokio::test]
    async fn test_unknown_resource_fails_every_item_under_continue() {
        let node = AcrewityNode::new(
            RecordingClient::new(),
            settings("fax_machine", json!({}), ErrorPolicy::ContinueOnFail),
        );

        let outputs = node.execute(&items(vec![json!({}), json!({})])).await.unwrap();

        assert!(outputs.iter().all(OutputItem::is_error));
        assert_eq!(node.client.calls(), 0);
    }

    #[test]
    fn test_legacy_naming_and_preview_redaction() {
        let mut node_settings = settings(
            "email_access",
            json!({
                "to": "a@example.com",
                "subject": "Hi",
                "smtp_host": "smtp.example.com",
                "smtp_user": "me",
                "smtp_pass": "hunter2",
                "from": "me@example.com"
            }),
            ErrorPolicy::FailFast,
        );
        node_settings.service_naming = ServiceNaming::Underscored;
        let node = AcrewityNode::new(RecordingClient::new(), node_settings);

        let previews = node.preview(&items(vec![json!({})]));
        let request = previews[0].as_ref().unwrap();

        assert_eq!(request.service, "email_access");
        assert_eq!(request.operation, "send_email");
        assert_eq!(request.parameters["smtp_pass"], json!("***"));
        assert_eq!(request.parameters["smtp_port"], json!(587));
        assert_eq!(request.parameters["text"], json!(""));
    }
}
