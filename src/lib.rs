// Public modules
pub mod chat;
pub mod client;
pub mod complete;
pub mod error;
pub mod history;
pub mod logging;
pub mod render;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::{CompletionClient, OpenAi};
pub use error::{Error, Result};
pub use history::LineHistory;
pub use render::{PlainTextRenderer, Renderer};
pub use transcript::Transcript;
pub use types::*;
