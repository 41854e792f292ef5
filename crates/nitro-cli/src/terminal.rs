//! Terminal rendering of busy state, status messages and upload progress.

use nitro_client::{Channel, Presenter, StatusKind};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::i18n;

/// Prints localized messages; progress is redrawn in place on stderr.
pub struct TerminalPresenter {
    locale: String,
    progress_line: AtomicBool,
}

impl TerminalPresenter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            progress_line: AtomicBool::new(false),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolves `key` in this presenter's locale.
    pub fn text(&self, key: &str) -> String {
        i18n::resolve(key, &self.locale)
    }

    fn end_progress_line(&self) {
        if self.progress_line.swap(false, Ordering::AcqRel) {
            eprintln!();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn show_busy(&self) {
        self.end_progress_line();
        eprintln!("{}...", self.text("busy"));
    }

    fn hide_busy(&self) {
        self.end_progress_line();
    }

    fn report_status(&self, channel: Channel, kind: StatusKind, message_key: &str) {
        self.end_progress_line();
        let text = self.text(message_key);
        match kind {
            StatusKind::Success => println!("[{channel}] {text}"),
            StatusKind::Error => eprintln!("[{channel}] {text}"),
        }
    }

    fn report_progress(&self, percent: u8) {
        self.progress_line.store(true, Ordering::Release);
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r{percent:>3}%");
        let _ = stderr.flush();
    }
}
