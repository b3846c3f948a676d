use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a dataset is being read. Silent reporters do nothing.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new_spinner(message: &str, silent: bool) -> Self {
        if silent {
            return Self::silent();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            progress_bar: Some(pb),
        }
    }

    pub fn silent() -> Self {
        Self { progress_bar: None }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    pub fn finish_with_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(ref pb) = self.progress_bar {
            clear_if_unfinished(pb);
        }
    }
}

/// Clear a bar that was never finished. A finished bar keeps its final message.
fn clear_if_unfinished(pb: &ProgressBar) -> bool {
    if pb.is_finished() {
        return false;
    }
    pb.finish_and_clear();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_reporter_ignores_updates() {
        let progress = ProgressReporter::new_spinner("Reading...", true);
        assert!(progress.progress_bar.is_none());
        progress.set_message("Read 100000 lines");
        progress.finish_with_message("done");
    }

    #[test]
    fn test_drop_keeps_finished_message() {
        let progress = ProgressReporter {
            progress_bar: Some(ProgressBar::hidden()),
        };
        progress.finish_with_message("Read 3 lines, 2 records matched");

        let pb = progress.progress_bar.clone().unwrap();
        drop(progress);
        assert!(!clear_if_unfinished(&pb));
        assert_eq!(pb.message(), "Read 3 lines, 2 records matched");

        // A bar abandoned mid-read is still cleared
        assert!(clear_if_unfinished(&ProgressBar::hidden()));
    }
}
