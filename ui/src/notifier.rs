//! Single progress toast for backend preview generation.

use std::time::Duration;

/// Time a finished toast stays on screen.
pub const DISMISS_DELAY: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub progress: f32,
    pub complete: bool,
}

#[derive(Debug, Default)]
pub struct PreviewNotifier {
    active: Option<Toast>,
    next_id: u64,
}

impl PreviewNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The running toast. A finished toast still waiting for dismissal is
    /// replaced so its pending timer no longer applies.
    fn ensure_toast(&mut self) -> &mut Toast {
        if self.active.as_ref().map_or(false, |t| t.complete) {
            self.active = None;
        }
        if self.active.is_none() {
            self.next_id += 1;
            tracing::debug!(id = self.next_id, "showing preview toast");
        }
        let id = self.next_id;
        self.active.get_or_insert(Toast {
            id,
            progress: 0.0,
            complete: false,
        })
    }

    /// Show the toast if none is active. Returns its id.
    pub fn on_start(&mut self) -> u64 {
        self.ensure_toast().id
    }

    /// Update the percentage, creating the toast if needed.
    pub fn on_progress(&mut self, progress: f32) -> u64 {
        let toast = self.ensure_toast();
        toast.progress = progress.clamp(0.0, 100.0);
        toast.id
    }

    /// Mark the toast complete. Returns the id to dismiss after
    /// [`DISMISS_DELAY`], or `None` when nothing was showing.
    pub fn on_end(&mut self) -> Option<u64> {
        let toast = self.active.as_mut()?;
        toast.progress = 100.0;
        toast.complete = true;
        Some(toast.id)
    }

    /// Remove the toast if it is still the one with `id`.
    pub fn dismiss(&mut self, id: u64) -> bool {
        if self.active.as_ref().map(|t| t.id) == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&Toast> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_toast_per_cycle() {
        let mut n = PreviewNotifier::new();
        assert!(n.active().is_none());
        let id = n.on_start();
        assert_eq!(n.on_start(), id);
        assert_eq!(n.on_progress(40.0), id);
        assert_eq!(n.on_progress(80.0), id);
        assert_eq!(n.active().unwrap().progress, 80.0);

        assert_eq!(n.on_end(), Some(id));
        assert!(n.active().unwrap().complete);
        assert!(n.dismiss(id));
        assert!(n.active().is_none());

        let next = n.on_start();
        assert_ne!(next, id);
    }

    #[test]
    fn test_progress_without_start_creates_toast() {
        let mut n = PreviewNotifier::new();
        let id = n.on_progress(150.0);
        assert_eq!(n.active().unwrap().id, id);
        assert_eq!(n.active().unwrap().progress, 100.0);
    }

    #[test]
    fn test_stale_dismiss_keeps_new_toast() {
        let mut n = PreviewNotifier::new();
        let first = n.on_start();
        n.on_end();
        n.dismiss(first);
        let second = n.on_start();
        assert!(!n.dismiss(first));
        assert_eq!(n.active().unwrap().id, second);
    }

    #[test]
    fn test_restart_before_dismissal_starts_fresh_toast() {
        let mut n = PreviewNotifier::new();
        let first = n.on_start();
        n.on_progress(60.0);
        assert_eq!(n.on_end(), Some(first));

        let second = n.on_start();
        assert_ne!(second, first);
        let toast = n.active().unwrap();
        assert!(!toast.complete);
        assert_eq!(toast.progress, 0.0);

        assert!(!n.dismiss(first));
        assert_eq!(n.active().unwrap().id, second);
    }

    #[test]
    fn test_end_without_toast() {
        let mut n = PreviewNotifier::new();
        assert_eq!(n.on_end(), None);
    }
}
