mod attachment;
mod chat;
mod chat_client;
mod envelope;
mod errors;
mod history;
mod message;
mod modality;
mod provider;
mod role;
mod slash_commands;

pub use attachment::*;
pub use chat::*;
pub use chat_client::*;
pub use envelope::*;
pub use errors::*;
pub use history::*;
pub use message::*;
pub use modality::*;
pub use provider::*;
pub use role::*;
pub use slash_commands::*;
