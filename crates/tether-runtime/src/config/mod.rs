//! Typed configuration: schema, layered loading and validation.

mod loader;
mod schema;
mod validation;

pub use loader::{ConfigLoader, Profile};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, Mode, ScoutingConfig, TetherConfig,
};
pub use validation::validate;
