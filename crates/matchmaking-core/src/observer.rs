//! Telemetry hook for queue depth.

/// Notified with the number of pending entries after every structural
/// change to the pending queue.
pub trait QueueObserver: Send {
    fn queue_size_changed(&self, depth: usize);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl QueueObserver for NoopObserver {
    fn queue_size_changed(&self, _depth: usize) {}
}

impl<F> QueueObserver for F
where
    F: Fn(usize) + Send,
{
    fn queue_size_changed(&self, depth: usize) {
        self(depth)
    }
}
