/// Receives per-item progress of the detail-page loops.
pub trait ProgressSink: Send + Sync {
    fn begin(&self, label: &str, total: usize);
    fn advance(&self);
    fn finish(&self);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn begin(&self, _label: &str, _total: usize) {}
    fn advance(&self) {}
    fn finish(&self) {}
}
