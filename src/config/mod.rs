pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::NodeConfig;
#[cfg(feature = "cli")]
use crate::domain::resource::ServiceNaming;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_extension, validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "acrewity-node")]
#[command(about = "Run the Acrewity utility API node over a file of workflow items")]
pub struct CliConfig {
    /// Path to the node TOML configuration
    #[arg(short, long, default_value = "acrewity.toml")]
    pub config: String,

    /// JSON file with the input items (array of objects or {"json": ...} envelopes)
    #[arg(short, long, default_value = "items.json")]
    pub input: String,

    /// Where the output items are written
    #[arg(short, long, default_value = "./output/output.json")]
    pub output: String,

    /// Record failing items as {"error": ...} instead of aborting
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Override the service naming convention from config
    #[arg(long, value_enum)]
    pub service_naming: Option<ServiceNaming>,

    /// Override the API base URL from config
    #[arg(long)]
    pub base_url: Option<String>,

    /// Print the requests that would be sent without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Log memory/CPU usage around the run
    #[arg(long)]
    pub monitor: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut NodeConfig) {
        if self.continue_on_fail {
            config.node.continue_on_fail = Some(true);
        }

        if self.service_naming.is_some() || self.base_url.is_some() {
            let api = config.api.get_or_insert_with(Default::default);
            if let Some(naming) = self.service_naming {
                api.service_naming = Some(naming);
            }
            if let Some(base_url) = &self.base_url {
                api.base_url = Some(base_url.clone());
            }
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;
        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["json"])?;
        validate_path("output", &self.output)?;

        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }

        Ok(())
    }
}
