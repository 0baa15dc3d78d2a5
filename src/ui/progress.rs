//! Progress indicators for network-bound work
//!
//! Uses `linya`; bars draw to stderr so `--json` output on stdout stays clean.

use linya::{Bar, Progress};

/// Single progress bar over a known number of steps
pub struct StepProgress {
  progress: Progress,
  bar: Bar,
}

impl StepProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
