pub mod config;
pub mod errors;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use errors::{DeliveryError, DispatchError, RegistrationError, RouteKind};
