//! Copying code blocks to the system clipboard.
//!
//! Failures (no display server, permission denied) are swallowed: the caller just does not get
//! a confirmation.

/// Somewhere copied text can go.
pub trait Clipboard {
    /// Places `text` on the clipboard, returning whether it worked.
    fn copy(&mut self, text: &str) -> bool;
}

#[derive(Default)]
/// The operating system clipboard, opened lazily on first use.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> bool {
        if self.inner.is_none() {
            match arboard::Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(e) => {
                    tracing::debug!(error = %e, "clipboard unavailable");
                    return false;
                }
            }
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return false;
        };
        match clipboard.set_text(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "copy failed");
                false
            }
        }
    }
}
