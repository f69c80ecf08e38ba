pub mod client;
pub mod node;
pub mod parameters;
pub mod runner;
pub mod template;

pub use crate::domain::model::{Credentials, Item, OutputItem, ServiceRequest};
pub use crate::domain::ports::{ParameterSource, ServiceClient, Storage};
pub use crate::utils::error::Result;
