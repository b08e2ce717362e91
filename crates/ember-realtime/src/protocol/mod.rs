//! Realtime wire protocol

mod close_codes;
mod events;

pub use close_codes::CloseCode;
pub use events::{ClientEvent, ConversationRef, EventKind, ReadReceipt, ServerEvent};
