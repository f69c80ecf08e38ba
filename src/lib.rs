pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::NodeConfig};
pub use core::{
    client::AcrewityClient,
    node::{AcrewityNode, ErrorPolicy, NodeSettings},
    runner::{NodeRunner, RunSummary},
};
pub use domain::resource::{Resource, ServiceNaming};
pub use utils::error::{AcrewityError, Result};
