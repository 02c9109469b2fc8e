//! Display surface port.
//!
//! The session manager never prints. It hands text to a `DisplaySurface`,
//! which may be a terminal, an SSE channel, or a test recorder.

use mindwell_types::chat::Role;

use crate::chat::session::SessionError;

/// Where conversation text is shown.
///
/// `render` always receives the *entire* text of a message, never a delta.
/// Rendering the same text twice must leave the surface in the same state,
/// so a surface that missed an update simply shows the newer full text.
pub trait DisplaySurface: Send {
    /// Show `text` as the current content of a message from `role`.
    ///
    /// `is_new` is true for freshly generated content and false when replaying
    /// history.
    fn render(&mut self, role: Role, text: &str, is_new: bool);

    /// Show an informational or warning line that is not conversation
    /// content (speech capture errors, missing assets).
    fn notice(&mut self, message: &str);

    /// Report a failed turn.
    fn report_failure(&mut self, error: &SessionError) {
        self.notice(&error.to_string());
    }
}
