//! # Presentation Binder
//!
//! The interface the core drives to render busy state, status messages and
//! upload progress. Rendering and localization live on the other side.

use std::fmt;

/// Form a status message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The login/logout form.
    Login,
    /// The avatar upload form.
    Upload,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Upload => f.write_str("upload"),
        }
    }
}

/// Whether a status message reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// UI surface consumed by the session manager and the upload coordinator.
///
/// Message keys are localization keys such as `login-success` or
/// `upload-badsize`; resolving them is the implementor's job.
pub trait Presenter: Send + Sync {
    /// Shows the busy indicator and clears any previous progress.
    fn show_busy(&self);

    /// Hides the busy indicator.
    fn hide_busy(&self);

    /// Puts a status message below the given form, replacing the opposite kind.
    fn report_status(&self, channel: Channel, kind: StatusKind, message_key: &str);

    /// Reports upload progress as a rounded percentage.
    fn report_progress(&self, percent: u8);
}

/// A presenter that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {
    fn show_busy(&self) {}

    fn hide_busy(&self) {}

    fn report_status(&self, _channel: Channel, _kind: StatusKind, _message_key: &str) {}

    fn report_progress(&self, _percent: u8) {}
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording presenter shared by the unit tests.

    use super::{Channel, Presenter, StatusKind};
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        ShowBusy,
        HideBusy,
        Status(Channel, StatusKind, String),
        Progress(u8),
    }

    #[derive(Default)]
    pub struct RecordingPresenter {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingPresenter {
        pub fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }

        pub fn count(&self, event: &Event) -> usize {
            self.events.lock().iter().filter(|e| *e == event).count()
        }

        pub fn statuses(&self) -> Vec<(Channel, StatusKind, String)> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    Event::Status(c, k, m) => Some((*c, *k, m.clone())),
                    _ => None,
                })
                .collect()
        }

        pub fn progress(&self) -> Vec<u8> {
            self.events
                .lock()
                .iter()
                .filter_map(|e| match e {
                    Event::Progress(p) => Some(*p),
                    _ => None,
                })
                .collect()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_busy(&self) {
            self.events.lock().push(Event::ShowBusy);
        }

        fn hide_busy(&self) {
            self.events.lock().push(Event::HideBusy);
        }

        fn report_status(&self, channel: Channel, kind: StatusKind, message_key: &str) {
            self.events
                .lock()
                .push(Event::Status(channel, kind, message_key.to_string()));
        }

        fn report_progress(&self, percent: u8) {
            self.events.lock().push(Event::Progress(percent));
        }
    }
}
