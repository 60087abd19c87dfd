//! AI chatbot module - answers mentions of the configured identity and
//! records everything else as conversation context.

mod handler;
mod mention;
mod prompt;

pub use handler::handle_message;
