use indicatif::{ProgressBar, ProgressStyle};

use crate::output;

/// A terminal progress bar counting completed files.
///
/// Renders to stderr, is hidden in quiet mode, and clears itself when
/// dropped (RAII pattern).
#[derive(Clone)]
pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    /// Creates a bar expecting `total` file outcomes.
    #[allow(clippy::unwrap_used)]
    pub fn new(total: u64) -> Self {
        let bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };
        // unwrap is safe: template string is a compile-time constant
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.set_message("translating");

        Self { bar }
    }

    /// Moves the bar to an absolute completed-file count.
    pub fn set_position(&self, completed: u64) {
        self.bar.set_position(completed);
    }

    /// Stops the bar and clears it from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for FileProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
