//! Render lifecycle flags shared between the renderer and its controller.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Cancellation token and lifecycle state for one renderer.
///
/// The controller polls `is_active` / `is_ready_to_finish` and may call
/// `request_stop` at any time; tracing checks `is_stop_requested` at the top
/// of every recursive call, so a stop takes effect within one ray.
#[derive(Debug)]
pub struct RenderControl {
    render_active: AtomicBool,
    stop_requested: AtomicBool,
    ready_to_finish: AtomicBool,
    next_row: AtomicUsize,
}

impl Default for RenderControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderControl {
    pub fn new() -> Self {
        Self {
            render_active: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            ready_to_finish: AtomicBool::new(true),
            next_row: AtomicUsize::new(0),
        }
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn reset_stop(&self) {
        self.stop_requested.store(false, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Relaxed)
    }

    pub fn is_active(&self) -> bool {
        self.render_active.load(Ordering::SeqCst)
    }

    pub fn is_ready_to_finish(&self) -> bool {
        self.ready_to_finish.load(Ordering::SeqCst)
    }

    /// Mark a render as started. Fails if one is already running.
    ///
    /// The render stays active until the returned guard is dropped, which
    /// also happens when a worker panics.
    pub(crate) fn begin(&self) -> Option<ActiveRender<'_>> {
        self.render_active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        self.ready_to_finish.store(false, Ordering::SeqCst);
        self.next_row.store(0, Ordering::SeqCst);
        Some(ActiveRender { control: self })
    }

    fn finish(&self) {
        self.ready_to_finish.store(true, Ordering::SeqCst);
        self.render_active.store(false, Ordering::SeqCst);
    }

    /// Claim the next unrendered row.
    pub(crate) fn claim_row(&self) -> usize {
        self.next_row.fetch_add(1, Ordering::Relaxed)
    }
}

/// A running render; restores the idle flags when dropped.
#[must_use]
pub(crate) struct ActiveRender<'a> {
    control: &'a RenderControl,
}

impl Drop for ActiveRender<'_> {
    fn drop(&mut self) {
        self.control.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let control = RenderControl::new();
        assert!(!control.is_active());
        assert!(!control.is_stop_requested());
        assert!(control.is_ready_to_finish());
    }

    #[test]
    fn test_lifecycle() {
        let control = RenderControl::new();
        let active = control.begin();
        assert!(active.is_some());
        assert!(control.is_active());
        assert!(!control.is_ready_to_finish());
        assert!(control.begin().is_none());

        assert_eq!(control.claim_row(), 0);
        assert_eq!(control.claim_row(), 1);

        drop(active);
        assert!(!control.is_active());
        assert!(control.is_ready_to_finish());
        let _again = control.begin().unwrap();
        assert_eq!(control.claim_row(), 0);
    }

    #[test]
    fn test_panic_releases_render() {
        let control = RenderControl::new();
        let result = std::panic::catch_unwind(|| {
            let _active = control.begin();
            panic!("worker failed");
        });

        assert!(result.is_err());
        assert!(!control.is_active());
        assert!(control.is_ready_to_finish());
    }

    #[test]
    fn test_stop_flag() {
        let control = RenderControl::new();
        control.request_stop();
        assert!(control.is_stop_requested());
        control.reset_stop();
        assert!(!control.is_stop_requested());
    }
}
