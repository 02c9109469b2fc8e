//! Conversation state: the append-only turn store, the streaming response
//! accumulator, the request context window, and the session manager that ties
//! them to a generation backend.

pub mod accumulator;
pub mod session;
pub mod store;
pub mod window;
