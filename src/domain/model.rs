use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 工作流程中的一筆輸入資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub json: Value,
}

impl Item {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    fn from_raw(raw: Value) -> Self {
        match raw {
            Value::Object(mut obj) if obj.get("json").map(Value::is_object).unwrap_or(false) => {
                Item::new(obj.remove("json").unwrap_or(Value::Null))
            }
            other => Item::new(other),
        }
    }

    /// 解析輸入檔案：JSON 陣列 (或單一值)，元素可為 `{"json": ...}` 包裝或裸值
    pub fn parse_items(data: &[u8]) -> serde_json::Result<Vec<Item>> {
        let value: Value = serde_json::from_slice(data)?;
        let raw_items = match value {
            Value::Array(values) => values,
            other => vec![other],
        };

        Ok(raw_items.into_iter().map(Item::from_raw).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

/// 節點輸出：API 回應或 `{error: ...}`，並標記來源項目索引
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputItem {
    pub json: Value,
    pub paired_item: PairedItem,
}

impl OutputItem {
    pub fn success(json: Value, index: usize) -> Self {
        Self {
            json,
            paired_item: PairedItem { item: index },
        }
    }

    pub fn failure(message: impl Into<String>, index: usize) -> Self {
        let mut error = Map::new();
        error.insert("error".to_string(), Value::String(message.into()));
        Self {
            json: Value::Object(error),
            paired_item: PairedItem { item: index },
        }
    }

    pub fn is_error(&self) -> bool {
        self.json
            .as_object()
            .map(|obj| obj.len() == 1 && obj.contains_key("error"))
            .unwrap_or(false)
    }
}

/// POST 到 `/api/services/execute` 的請求內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub service: String,
    pub operation: String,
    pub parameters: Map<String, Value>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .finish()
    }
}
