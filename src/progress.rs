// src/progress.rs
/// Lightweight progress reporting for the longer loops (snapshot loading, figure assembly).
/// Frontends implement this to surface status; the library never prints on its own.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (a snapshot, a jurisdiction).
    fn item_done(&mut self, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Forwards progress to the log at debug level, with a running count.
#[derive(Default)]
pub struct LogProgress {
    done: usize,
    total: usize,
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.done = 0;
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        logi!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        logd!("{label} ({}/{})", self.done, self.total);
    }
    fn finish(&mut self) {
        logd!("Done ({}/{})", self.done, self.total);
    }
}
