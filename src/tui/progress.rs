//! Spinner shown on stderr while a tunnel or model call is in flight.

use crate::tui::settings;
use crossterm::style::Stylize;
use std::io::{self, IsTerminal, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

static PROGRESS_ENABLED: AtomicBool = AtomicBool::new(true);

/// RAII handle for an active spinner. Dropping it clears the line.
pub struct ProgressHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ProgressHandle {
    /// A handle that draws nothing.
    pub fn disabled() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(true)),
            thread: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.thread.is_some()
    }

    /// Stop the spinner thread and wait for it to clear its line.
    pub fn finish(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Globally enable/disable spinners (off for `--no-color` pipes and tests).
pub fn set_progress_enabled(enabled: bool) {
    PROGRESS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Start a spinner with `label`, or a disabled handle when stderr is not a
/// terminal.
pub fn start_progress(label: impl Into<String>, color: bool) -> ProgressHandle {
    if !PROGRESS_ENABLED.load(Ordering::Relaxed) || !io::stderr().is_terminal() {
        return ProgressHandle::disabled();
    }

    let label = label.into();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::spawn(move || {
        let start = Instant::now();
        let frames = settings::PROGRESS_FRAMES.iter().cycle();
        for frame in frames {
            if stop_flag.load(Ordering::Relaxed) {
                break;
            }
            let mut err = io::stderr();
            let _ = write!(err, "{}", progress_line(*frame, &label, start.elapsed(), color));
            let _ = err.flush();
            thread::sleep(Duration::from_millis(settings::PROGRESS_TICK_MS));
        }
        let mut err = io::stderr();
        let _ = write!(err, "{}", settings::PROGRESS_CLEAR_LINE);
        let _ = err.flush();
    });

    ProgressHandle {
        stop,
        thread: Some(thread),
    }
}

fn progress_line(frame: char, label: &str, elapsed: Duration, color: bool) -> String {
    let elapsed_s = elapsed.as_millis() as f64 / 1000.0;
    if color {
        format!(
            "{}{} {} {}",
            settings::PROGRESS_CLEAR_LINE,
            format!("[{frame}]").with(settings::COLOR_PROGRESS_FRAME),
            label.with(settings::COLOR_PROGRESS_LABEL),
            format!("({elapsed_s:.1}s)").with(settings::COLOR_PROGRESS_ELAPSED),
        )
    } else {
        format!(
            "{}[{frame}] {label} ({elapsed_s:.1}s)",
            settings::PROGRESS_CLEAR_LINE
        )
    }
}
