//! Progress indicators with CI fallback

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A task spinner that degrades to plain lines when stderr is not an
/// interactive terminal, keeping CI logs readable.
pub struct TaskSpinner {
    bar: Option<ProgressBar>,
}

impl TaskSpinner {
    /// Start a spinner with a message
    pub fn start(message: &str) -> Self {
        let bar = if console::Term::stderr().is_term() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap()
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
            );
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("{} {}", style("...").dim(), message);
            None
        };

        Self { bar }
    }

    /// Stop with a success message
    pub fn stop(self, message: &str) {
        match self.bar {
            Some(bar) => {
                bar.finish_and_clear();
                println!("{} {}", style("✓").green(), message);
            }
            None => println!("{} {}", style("[OK]").green(), message),
        }
    }

    /// Clear the spinner without any message
    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
