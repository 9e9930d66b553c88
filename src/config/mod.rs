pub mod settings;

pub use settings::{Credentials, ServerConfig, Settings, UpstreamConfig};
