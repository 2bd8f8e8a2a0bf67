pub mod config;
pub mod error;
pub mod identity;
pub mod logging;

pub use config::{ChatConfig, ColloquyConfig};
pub use error::{ColloquyError, Result};
pub use identity::SessionIdentity;
