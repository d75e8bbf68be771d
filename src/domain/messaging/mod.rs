//! Messaging module - chat-side value types.

mod bot_account;
mod inbound;

pub use bot_account::{BotAccount, BotType, OutboundMessage};
pub use inbound::{optional_message_id, sender_of, InboundMessage, MessageContent};
