//! Navigation side effect triggered after registering a payment mean.
//!
//! Registering a PayPal agreement or a credit card returns a URL where the
//! customer completes the registration. The adapter hands that URL to a
//! [`Navigate`] implementation supplied by the host application.

use std::sync::{Mutex, PoisonError};

/// How a URL should be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationMode {
    /// Open in a new browsing context (`_blank`).
    NewContext,
    /// Replace the current context.
    Redirect,
}

/// Opens URLs on behalf of the adapter.
pub trait Navigate: Send + Sync {
    /// Opens `url` with the given mode.
    fn navigate(&self, url: &str, mode: NavigationMode);
}

impl<F> Navigate for F
where
    F: Fn(&str, NavigationMode) + Send + Sync,
{
    fn navigate(&self, url: &str, mode: NavigationMode) {
        self(url, mode);
    }
}

/// Navigator that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNavigation;

impl Navigate for NoNavigation {
    fn navigate(&self, _url: &str, _mode: NavigationMode) {}
}

/// Navigator that records every request, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(String, NavigationMode)>>,
}

impl RecordingNavigator {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded requests.
    #[must_use]
    pub fn visits(&self) -> Vec<(String, NavigationMode)> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigate for RecordingNavigator {
    fn navigate(&self, url: &str, mode: NavigationMode) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_owned(), mode));
    }
}
