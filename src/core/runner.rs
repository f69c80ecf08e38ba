use crate::core::node::AcrewityNode;
use crate::domain::model::{Item, OutputItem};
use crate::domain::ports::{ServiceClient, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: String,
    pub items: usize,
    pub failed: usize,
}

/// 讀取輸入項目 → 執行節點 → 寫出輸出項目
pub struct NodeRunner<S: Storage, C: ServiceClient> {
    storage: S,
    node: AcrewityNode<C>,
    monitor: SystemMonitor,
}

impl<S: Storage, C: ServiceClient> NodeRunner<S, C> {
    pub fn new(storage: S, node: AcrewityNode<C>) -> Self {
        Self::new_with_monitoring(storage, node, false)
    }

    pub fn new_with_monitoring(storage: S, node: AcrewityNode<C>, monitor_enabled: bool) -> Self {
        Self {
            storage,
            node,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn node(&self) -> &AcrewityNode<C> {
        &self.node
    }

    pub async fn load_items(&self, input: &str) -> Result<Vec<Item>> {
        let data = self.storage.read_file(input).await?;
        let items = Item::parse_items(&data)?;
        tracing::info!("📥 Loaded {} items from {}", items.len(), input);
        Ok(items)
    }

    pub async fn run(&self, input: &str, output: &str) -> Result<RunSummary> {
        self.monitor.log_stats("Start");

        let items = self.load_items(input).await?;
        let outputs = self.node.execute(&items).await?;
        self.monitor.log_stats("Execute");

        let failed = outputs.iter().filter(|o| o.is_error()).count();
        self.write_outputs(output, &outputs).await?;

        self.monitor.log_final_stats(items.len());

        Ok(RunSummary {
            output_path: output.to_string(),
            items: outputs.len(),
            failed,
        })
    }

    async fn write_outputs(&self, output: &str, outputs: &[OutputItem]) -> Result<()> {
        let json = serde_json::to_vec_pretty(outputs)?;
        tracing::debug!("Writing {} output items ({} bytes) to {}", outputs.len(), json.len(), output);
        self.storage.write_file(output, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::{ErrorPolicy, NodeSettings};
    use crate::domain::model::ServiceRequest;
    use crate::utils::error::AcrewityError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AcrewityError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct EchoClient;

    #[async_trait]
    impl ServiceClient for EchoClient {
        async fn execute(&self, request: &ServiceRequest) -> Result<Value> {
            Ok(json!({"echo": request.parameters}))
        }
    }

    fn node(policy: ErrorPolicy) -> AcrewityNode<EchoClient> {
        AcrewityNode::new(
            EchoClient,
            NodeSettings {
                resource: "url_to_markdown".to_string(),
                operation: None,
                parameters: json!({"url": "{{ $json.url }}"}).as_object().cloned().unwrap(),
                error_policy: policy,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_run_writes_paired_outputs() {
        let storage = MockStorage::with_file(
            "items.json",
            br#"[{"url": "https://a.example"}, {"json": {"url": "https://b.example"}}]"#,
        );
        let runner = NodeRunner::new(storage.clone(), node(ErrorPolicy::FailFast));

        let summary = runner.run("items.json", "output.json").await.unwrap();

        assert_eq!(summary.items, 2);
        assert_eq!(summary.failed, 0);

        let written: Value = serde_json::from_slice(&storage.get_file("output.json").await.unwrap()).unwrap();
        assert_eq!(
            written,
            json!([
                {"json": {"echo": {"url": "https://a.example"}}, "pairedItem": {"item": 0}},
                {"json": {"echo": {"url": "https://b.example"}}, "pairedItem": {"item": 1}}
            ])
        );
    }

    #[tokio::test]
    async fn test_run_counts_failed_items() {
        let storage = MockStorage::with_file("items.json", br#"[{"url": "https://a.example"}, {}]"#);
        let runner = NodeRunner::new(storage, node(ErrorPolicy::ContinueOnFail));

        let summary = runner.run("items.json", "output.json").await.unwrap();

        assert_eq!(summary.items, 2);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_run_reports_missing_input() {
        let storage = MockStorage::with_file("other.json", b"[]");
        let runner = NodeRunner::new(storage, node(ErrorPolicy::FailFast));

        let err = runner.run("items.json", "output.json").await.unwrap_err();
        assert!(matches!(err, AcrewityError::IoError(_)));
    }
}
