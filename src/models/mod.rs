pub mod card;
pub mod chat;
