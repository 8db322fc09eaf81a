//! Download spinner with CI fallback

use super::context::UiContext;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while the released bundle downloads
///
/// Draws nothing in non-interactive mode.
pub struct DownloadSpinner {
    bar: Option<ProgressBar>,
}

impl DownloadSpinner {
    /// Start spinning (interactive mode only)
    pub fn start(ctx: &UiContext, url: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} Downloading {msg:.dim}  {elapsed:.dim}")
            {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
            }
            bar.set_message(url.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Stop and clear the spinner
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}
