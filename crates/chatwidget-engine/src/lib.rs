pub mod chat;
pub mod formatting;
pub mod session;
pub mod webhook;

// Re-export key types for easier usage
pub use chat::*;
pub use formatting::{Rendered, build_markup, format_reply, parse_markup};
pub use session::*;
pub use webhook::*;
