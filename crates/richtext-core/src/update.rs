//! "Update in progress" indicator.
//!
//! Every mutator of an [`EditableStyledDocument`](crate::EditableStyledDocument) holds an
//! [`UpdateGuard`] while it applies the edit and notifies subscribers. Collaborators reading
//! the indicator from inside a callback can tell a nested, programmatic change (for example an
//! undo replay) from a fresh user edit.
//!
//! The indicator is a counter, not a lock: acquiring it never blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared nesting counter. Clones observe the same counter.
///
/// ```rust
/// use richtext_core::UpdateIndicator;
///
/// let indicator = UpdateIndicator::new();
/// assert!(!indicator.is_on());
/// {
///     let _outer = indicator.on();
///     let _inner = indicator.on();
///     assert_eq!(indicator.depth(), 2);
/// }
/// assert!(!indicator.is_on());
/// ```
#[derive(Debug, Clone, Default)]
pub struct UpdateIndicator {
    depth: Arc<AtomicUsize>,
}

impl UpdateIndicator {
    /// Create an indicator in the "off" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the indicator on until the returned guard is dropped.
    #[must_use = "the indicator turns off again as soon as the guard is dropped"]
    pub fn on(&self) -> UpdateGuard {
        self.depth.fetch_add(1, Ordering::AcqRel);
        UpdateGuard {
            depth: Arc::clone(&self.depth),
        }
    }

    /// Returns `true` while at least one guard is alive.
    pub fn is_on(&self) -> bool {
        self.depth() > 0
    }

    /// Number of live guards.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }
}

/// Scope token returned by [`UpdateIndicator::on`]. Dropping it releases one level.
#[derive(Debug)]
pub struct UpdateGuard {
    depth: Arc<AtomicUsize>,
}

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let indicator = UpdateIndicator::new();
        let guard = indicator.on();
        assert!(indicator.is_on());
        drop(guard);
        assert!(!indicator.is_on());
        assert_eq!(indicator.depth(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let indicator = UpdateIndicator::new();
        let observer = indicator.clone();
        let _guard = indicator.on();
        assert!(observer.is_on());
    }

    #[test]
    fn test_early_return_releases() {
        fn validate(ok: bool) -> Result<(), ()> {
            if ok { Ok(()) } else { Err(()) }
        }

        fn fails(indicator: &UpdateIndicator) -> Result<(), ()> {
            let _guard = indicator.on();
            validate(false)?;
            Ok(())
        }

        let indicator = UpdateIndicator::new();
        assert!(fails(&indicator).is_err());
        assert!(!indicator.is_on());
    }
}
