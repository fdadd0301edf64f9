//! Phase timing for the checker, reported at debug level.

use std::time::{Duration, Instant};

use colored::Colorize;

/// Guard that reports how long a phase took once it goes out of scope.
pub struct Profile {
  start: Instant,
  phase: String,
  items: Option<usize>
}

impl Profile {
  pub fn new(phase: impl Into<String>) -> Self {
    Self { start: Instant::now(), phase: phase.into(), items: None }
  }

  /// Records how many items the phase handled, for a per-item rate.
  pub fn items(mut self, count: usize) -> Self {
    self.items = Some(count);
    self
  }

  pub fn elapsed(&self) -> Duration {
    self.start.elapsed()
  }

  /// Elapsed time, with the per-item rate when items were recorded.
  pub fn summary(&self) -> String {
    let elapsed = self.elapsed();
    match self.items {
      Some(0) | None => format!("{:.2?}", elapsed),
      Some(count) => format!("{:.2?} ({count} items, {:.2?}/item)", elapsed, elapsed.div_f64(count as f64))
    }
  }
}

impl Drop for Profile {
  fn drop(&mut self) {
    if log::log_enabled!(log::Level::Debug) {
      eprintln!("{}: {}", self.phase.blue(), self.summary());
    }
  }
}

/// Times the rest of the enclosing scope.
#[macro_export]
macro_rules! profile {
  ($phase:expr) => {
    let _profile = $crate::Profile::new($phase);
  };
  ($phase:expr, $items:expr) => {
    let _profile = $crate::Profile::new($phase).items($items);
  };
}
