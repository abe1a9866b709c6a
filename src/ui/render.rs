//! Rendering contract and its default terminal binding.

pub use crate::tui::progress::ProgressHandle;
pub use crate::tui::renderer::Renderer;

/// Injectable rendering interface used by orchestration code.
///
/// `Renderer` is the terminal implementation; tests substitute a recording
/// sink without touching stderr.
pub trait RenderSink: Send + Sync {
    /// Render one assistant reply.
    fn assistant_message(&self, content: &str);
    /// Start a progress indicator for a long-running step.
    fn progress(&self, label: &str) -> ProgressHandle;
    /// Render the app/model banner.
    fn header(&self, model: &str);
    fn warn(&self, msg: &str);
    fn section(&self, title: &str);
    fn activity(&self, text: &str);
    fn field(&self, key: &str, value: &str);
    fn detail(&self, text: &str);
    fn error(&self, msg: &str);
}

impl RenderSink for Renderer {
    fn assistant_message(&self, content: &str) {
        self.assistant_message(content);
    }

    fn progress(&self, label: &str) -> ProgressHandle {
        self.progress(label)
    }

    fn header(&self, model: &str) {
        self.header(model);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn section(&self, title: &str) {
        self.section(title);
    }

    fn activity(&self, text: &str) {
        self.activity(text);
    }

    fn field(&self, key: &str, value: &str) {
        self.field(key, value);
    }

    fn detail(&self, text: &str) {
        self.detail(text);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }
}
