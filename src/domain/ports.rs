use crate::domain::model::ServiceRequest;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 節點欄位值的來源 (對應工作流程主機的 node parameter 取值)
///
/// 回傳 `None` 表示使用者未設定此欄位，由欄位宣告的預設值補上。
pub trait ParameterSource: Send + Sync {
    fn get(&self, name: &str, item_index: usize) -> Result<Option<Value>>;
}

/// 對遠端 Acrewity API 的單次呼叫
#[async_trait]
pub trait ServiceClient: Send + Sync {
    async fn execute(&self, request: &ServiceRequest) -> Result<Value>;
}
