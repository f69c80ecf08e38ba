use crate::core::client::{AcrewityClient, DEFAULT_BASE_URL};
use crate::core::node::{ErrorPolicy, NodeSettings};
use crate::core::parameters::resolve_operation;
use crate::domain::model::Credentials;
use crate::domain::resource::{Resource, ServiceNaming};
use crate::utils::error::{AcrewityError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;

pub const API_KEY_ENV: &str = "ACREWITY_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub node: NodeSection,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub api: Option<ApiConfig>,
    pub parameters: Option<Map<String, Value>>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSection {
    pub name: Option<String>,
    pub resource: String,
    pub operation: Option<String>,
    pub continue_on_fail: Option<bool>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub service_naming: Option<ServiceNaming>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl NodeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| AcrewityError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${ACREWITY_API_KEY})，未設定者保留原字串
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn resource(&self) -> Result<Resource> {
        self.node.resource.parse()
    }

    /// `[credentials].api_key`，未設定時讀取 ACREWITY_API_KEY
    pub fn api_key(&self) -> Option<String> {
        self.credentials
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let api_key = self.api_key();
        let api_key = validate_required_field("credentials.api_key", &api_key)?;
        validate_non_empty_string("credentials.api_key", api_key)?;

        if api_key.starts_with("${") {
            return Err(AcrewityError::InvalidConfigValueError {
                field: "credentials.api_key".to_string(),
                value: api_key.clone(),
                reason: "environment variable is not set".to_string(),
            });
        }

        Ok(Credentials::new(api_key.clone()))
    }

    pub fn base_url(&self) -> &str {
        self.api
            .as_ref()
            .and_then(|api| api.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn service_naming(&self) -> ServiceNaming {
        self.api
            .as_ref()
            .and_then(|api| api.service_naming)
            .unwrap_or_default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.api
            .as_ref()
            .and_then(|api| api.timeout_seconds)
            .map(Duration::from_secs)
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        if self.node.continue_on_fail.unwrap_or(false) {
            ErrorPolicy::ContinueOnFail
        } else {
            ErrorPolicy::FailFast
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn settings(&self) -> NodeSettings {
        NodeSettings {
            resource: self.node.resource.clone(),
            operation: self.node.operation.clone(),
            parameters: self.parameters.clone().unwrap_or_default(),
            service_naming: self.service_naming(),
            error_policy: self.error_policy(),
        }
    }

    pub fn build_client(&self) -> Result<AcrewityClient> {
        Ok(AcrewityClient::new(self.credentials()?)
            .with_base_url(self.base_url())
            .with_timeout(self.timeout()))
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", self.base_url())?;
        self.credentials()?;

        let resource = self.resource()?;
        resolve_operation(resource, self.node.operation.as_deref())?;

        if let Some(timeout) = self.api.as_ref().and_then(|api| api.timeout_seconds) {
            validate_range("api.timeout_seconds", timeout, Some(1), Some(3600))?;
        }

        Ok(())
    }
}

impl Validate for NodeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
