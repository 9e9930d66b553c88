pub mod upstream;

pub use upstream::{AttemptError, ChatMessage, UpstreamClient};
