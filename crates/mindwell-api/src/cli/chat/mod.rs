//! Interactive terminal chat.
//!
//! Streams replies with full-replace rendering, shows a spinner until the
//! first fragment arrives, and handles slash commands for moods, quick
//! prompts, voice clips and sentiment. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
