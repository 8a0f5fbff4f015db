//! Loading overlay for the command-line interface
//!
//! Shows a spinner while route fetches are in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates the spinner shown while routes load
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create spinner style"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Spinner that follows the session's loading flag
#[derive(Default)]
pub struct LoadingOverlay {
    pb: Option<ProgressBar>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide the spinner to match `loading`
    pub fn sync(&mut self, loading: bool, in_flight: usize) {
        if !loading {
            if let Some(pb) = self.pb.take() {
                pb.finish_and_clear();
            }
        } else if let Some(pb) = &self.pb {
            pb.set_message(Self::message(in_flight));
        } else {
            let pb = create_spinner(&Self::message(in_flight));
            pb.enable_steady_tick(Duration::from_millis(100));
            self.pb = Some(pb);
        }
    }

    #[cfg(test)]
    fn is_visible(&self) -> bool {
        self.pb.is_some()
    }

    fn message(in_flight: usize) -> String {
        if in_flight > 1 {
            format!("Loading routes ({in_flight} requests)...")
        } else {
            "Loading routes...".to_string()
        }
    }
}
