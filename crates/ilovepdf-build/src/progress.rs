use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a short preparatory step runs.
pub struct BuildProgress {
    progress_bar: ProgressBar,
}

impl BuildProgress {
    pub fn new(message: &str) -> Self {
        let progress = Self::with_bar(ProgressBar::new_spinner(), message);
        progress
            .progress_bar
            .enable_steady_tick(std::time::Duration::from_millis(100));
        progress
    }

    /// Spinner that draws nothing, for dry runs and non-interactive output.
    pub fn hidden(message: &str) -> Self {
        Self::with_bar(ProgressBar::hidden(), message)
    }

    fn with_bar(pb: ProgressBar, message: &str) -> Self {
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());

        Self { progress_bar: pb }
    }

    pub fn finish_success(&self, message: &str) {
        self.progress_bar
            .finish_with_message(format!("{} {}", "✓".green(), message));
    }

    pub fn finish_warning(&self, message: &str) {
        self.progress_bar
            .finish_with_message(format!("{} {}", "⚠".yellow(), message));
    }
}
