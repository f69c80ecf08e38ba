// Domain layer: node models, ports (interfaces) and the declarative resource schema.

pub mod model;
pub mod ports;
pub mod resource;
pub mod schema;
