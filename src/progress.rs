// src/progress.rs
/// Lightweight progress reporting for the long shift-page pass.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (one shift page read).
    fn item_done(&mut self, _index: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Reports through the log macros every `every` items.
pub struct LogProgress {
    total: usize,
    every: usize,
}

impl LogProgress {
    pub fn new(every: usize) -> Self { Self { total: 0, every: every.max(1) } }
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        logf!("Processing {} shift pages", total);
    }

    fn log(&mut self, msg: &str) {
        logf!("{}", msg);
    }

    fn item_done(&mut self, index: usize) {
        let done = index + 1;
        if done % self.every == 0 || done == self.total {
            logf!("… {}/{} shift pages", done, self.total);
        }
    }
}
