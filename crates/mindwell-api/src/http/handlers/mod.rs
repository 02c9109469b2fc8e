//! HTTP request handlers, one module per resource.

pub mod backend;
pub mod background;
pub mod chat;
pub mod session;
pub mod wellness;
