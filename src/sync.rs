use std::cell::Cell;

use tracing::trace;

use crate::selection::SelectionSet;

/// Side a selection change is being pushed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncDirection {
    /// Host property changed; the tree view follows.
    HostToUi,
    /// The user changed the tree selection; the host follows.
    UiToHost,
}

/// Result of a synchronization request.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The change was pushed to the other side.
    Applied,
    /// Another propagation was in flight; the request was dropped.
    Suppressed,
}

/// Single-threaded guard against host <-> view selection feedback loops.
///
/// While one propagation runs, every nested request (in either direction) is
/// dropped rather than queued. The latch is private and released on all exit
/// paths, unwinding included.
#[derive(Debug, Default)]
pub struct SelectionSynchronizer {
    propagating: Cell<bool>,
}

struct PropagationGuard<'a> {
    latch: &'a Cell<bool>,
}

impl Drop for PropagationGuard<'_> {
    fn drop(&mut self) {
        self.latch.set(false);
    }
}

impl SelectionSynchronizer {
    pub const fn new() -> Self {
        Self {
            propagating: Cell::new(false),
        }
    }

    /// Returns `true` while a propagation is in flight.
    #[inline]
    pub fn is_propagating(&self) -> bool {
        self.propagating.get()
    }

    /// Pushes a host-side selection into the view via `apply_to_ui`.
    pub fn on_host_selection_changed<F>(
        &self,
        selection: &SelectionSet,
        apply_to_ui: F,
    ) -> SyncOutcome
    where
        F: FnOnce(&SelectionSet),
    {
        self.propagate(SyncDirection::HostToUi, selection, apply_to_ui)
    }

    /// Pushes a view-side selection into the host via `write_to_host`.
    pub fn on_ui_selection_changed<F>(
        &self,
        selection: &SelectionSet,
        write_to_host: F,
    ) -> SyncOutcome
    where
        F: FnOnce(&SelectionSet),
    {
        self.propagate(SyncDirection::UiToHost, selection, write_to_host)
    }

    fn begin(&self) -> Option<PropagationGuard<'_>> {
        if self.propagating.replace(true) {
            return None;
        }
        Some(PropagationGuard {
            latch: &self.propagating,
        })
    }

    fn propagate<F>(
        &self,
        direction: SyncDirection,
        selection: &SelectionSet,
        action: F,
    ) -> SyncOutcome
    where
        F: FnOnce(&SelectionSet),
    {
        let Some(_guard) = self.begin() else {
            trace!(?direction, len = selection.len(), "dropped nested selection update");
            return SyncOutcome::Suppressed;
        };
        action(selection);
        trace!(?direction, len = selection.len(), "propagated selection");
        SyncOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    use super::*;
    use crate::selection::{ObservableSelection, SelectionHost};

    fn selection(ids: &[&str]) -> SelectionSet {
        ids.iter().copied().collect()
    }

    // Host property and view wired to each other through one synchronizer,
    // both notifying synchronously on write.
    struct Wiring {
        sync: Rc<SelectionSynchronizer>,
        host: Rc<ObservableSelection>,
        ui: Rc<RefCell<SelectionSet>>,
        ui_writes: Rc<Cell<usize>>,
    }

    impl Wiring {
        fn new() -> Self {
            let sync = Rc::new(SelectionSynchronizer::new());
            let host = Rc::new(ObservableSelection::default());
            let ui = Rc::new(RefCell::new(SelectionSet::new()));
            let ui_writes = Rc::new(Cell::new(0));

            let listener_sync = Rc::clone(&sync);
            let listener_ui = Rc::clone(&ui);
            let listener_writes = Rc::clone(&ui_writes);
            let weak_host = Rc::downgrade(&host);
            host.subscribe(move |changed| {
                let _ = listener_sync.on_host_selection_changed(changed, |sel| {
                    Self::write_ui(&listener_sync, &listener_ui, &listener_writes, &weak_host, sel);
                });
            });

            Self {
                sync,
                host,
                ui,
                ui_writes,
            }
        }

        // Writing the view fires its own change event, which pushes back to the host.
        fn write_ui(
            sync: &SelectionSynchronizer,
            ui: &RefCell<SelectionSet>,
            writes: &Cell<usize>,
            host: &std::rc::Weak<ObservableSelection>,
            sel: &SelectionSet,
        ) {
            ui.replace(sel.clone());
            writes.set(writes.get() + 1);
            let _ = sync.on_ui_selection_changed(sel, |sel| {
                if let Some(host) = host.upgrade() {
                    host.set_selected(sel.clone());
                }
            });
        }
    }

    #[test]
    fn host_change_writes_ui_once_and_never_echoes() {
        let wiring = Wiring::new();
        let weak_host = Rc::downgrade(&wiring.host);

        let outcome = wiring.sync.on_host_selection_changed(&selection(&["a/b"]), |sel| {
            Wiring::write_ui(&wiring.sync, &wiring.ui, &wiring.ui_writes, &weak_host, sel);
        });

        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(wiring.ui_writes.get(), 1);
        assert_eq!(wiring.host.write_count(), 0);
        assert_eq!(*wiring.ui.borrow(), selection(&["a/b"]));
        assert!(!wiring.sync.is_propagating());
    }

    #[test]
    fn ui_change_writes_host_once_and_never_echoes() {
        let wiring = Wiring::new();
        let host = Rc::clone(&wiring.host);

        let outcome = wiring
            .sync
            .on_ui_selection_changed(&selection(&["x", "y"]), |sel| host.set_selected(sel.clone()));

        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(wiring.host.write_count(), 1);
        assert_eq!(wiring.host.selected(), selection(&["x", "y"]));
        assert_eq!(wiring.ui_writes.get(), 0);
    }

    #[test]
    fn external_host_write_reaches_ui_through_listener() {
        let wiring = Wiring::new();

        wiring.host.set_selected(selection(&["p/q"]));

        assert_eq!(wiring.ui_writes.get(), 1);
        assert_eq!(*wiring.ui.borrow(), selection(&["p/q"]));
        // Only the external write itself; the view's echo was dropped.
        assert_eq!(wiring.host.write_count(), 1);
    }

    #[test]
    fn sequential_updates_are_all_applied() {
        let sync = SelectionSynchronizer::new();
        let mut applied = Vec::new();

        for ids in [&["a"][..], &["b", "c"][..], &[][..]] {
            let outcome = sync.on_host_selection_changed(&selection(ids), |sel| {
                applied.push(sel.clone());
            });
            assert_eq!(outcome, SyncOutcome::Applied);
        }

        assert_eq!(applied.len(), 3);
    }

    #[test]
    fn nested_same_direction_request_is_dropped() {
        let sync = SelectionSynchronizer::new();
        let mut inner = None;

        let outer = sync.on_host_selection_changed(&selection(&["a"]), |sel| {
            inner = Some(sync.on_host_selection_changed(sel, |_| {}));
        });

        assert_eq!(outer, SyncOutcome::Applied);
        assert_eq!(inner, Some(SyncOutcome::Suppressed));
    }

    #[test]
    fn latch_is_released_when_the_action_panics() {
        let sync = SelectionSynchronizer::new();

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _ = sync.on_ui_selection_changed(&selection(&["a"]), |_| panic!("host write failed"));
        }));

        assert!(result.is_err());
        assert!(!sync.is_propagating());
        let outcome = sync.on_ui_selection_changed(&selection(&["a"]), |_| {});
        assert_eq!(outcome, SyncOutcome::Applied);
    }

    #[test]
    fn unknown_ids_are_passed_through() {
        let sync = SelectionSynchronizer::new();
        let mut seen = SelectionSet::new();

        let outcome = sync.on_host_selection_changed(&selection(&["no/such/node"]), |sel| {
            seen = sel.clone();
        });

        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(seen, selection(&["no/such/node"]));
    }
}
