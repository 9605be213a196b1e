//! Core data types: messages, the model allow-list, and wire formats.

mod message;
mod model;
mod wire;

pub use message::{Message, Role};
pub use model::KnownModel;
pub use wire::{ChatCompletion, ChatRequest, Choice, ErrorDetail, ErrorEnvelope, ReplyMessage, Usage};
