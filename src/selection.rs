use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of selected node ids.
///
/// Ids are not checked against any tree; unknown ids are carried as-is.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionSet(Vec<String>);

impl SelectionSet {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `id` unless already present. Returns `true` if it was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|item| item == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl IntoIterator for SelectionSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Owner of the authoritative `selected` property.
///
/// Writes take `&self`: a host may notify observers synchronously from
/// inside `set_selected`, and those observers may call back into the host.
pub trait SelectionHost {
    /// Current selection.
    fn selected(&self) -> SelectionSet;
    /// Replaces the selection.
    fn set_selected(&self, selection: SelectionSet);
}

/// Plain host without change notification.
impl SelectionHost for RefCell<SelectionSet> {
    fn selected(&self) -> SelectionSet {
        self.borrow().clone()
    }

    fn set_selected(&self, selection: SelectionSet) {
        self.replace(selection);
    }
}

type Listener = Rc<dyn Fn(&SelectionSet)>;

/// Selection property that notifies listeners synchronously on every write.
#[derive(Default)]
pub struct ObservableSelection {
    value: RefCell<SelectionSet>,
    listeners: RefCell<Vec<Listener>>,
    writes: Cell<usize>,
}

impl ObservableSelection {
    pub fn new(initial: SelectionSet) -> Self {
        Self {
            value: RefCell::new(initial),
            ..Self::default()
        }
    }

    /// Registers a change listener, called after each write.
    pub fn subscribe(&self, listener: impl Fn(&SelectionSet) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Number of writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl SelectionHost for ObservableSelection {
    fn selected(&self) -> SelectionSet {
        self.value.borrow().clone()
    }

    fn set_selected(&self, selection: SelectionSet) {
        self.value.replace(selection.clone());
        self.writes.set(self.writes.get() + 1);
        // Snapshot so listeners may subscribe or write back.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in &listeners {
            listener(&selection);
        }
    }
}

impl fmt::Debug for ObservableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableSelection")
            .field("value", &self.value.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .field("writes", &self.writes.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_set_keeps_first_occurrence_order() {
        let set: SelectionSet = ["b", "a", "b", "c"].into_iter().collect();

        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert!(set.contains("a"));
        assert!(!set.contains("d"));
    }

    #[test]
    fn observable_selection_notifies_on_write() {
        let host = ObservableSelection::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        host.subscribe(move |selection| sink.borrow_mut().push(selection.clone()));

        let selection: SelectionSet = ["x/y"].into_iter().collect();
        host.set_selected(selection.clone());

        assert_eq!(host.selected(), selection);
        assert_eq!(host.write_count(), 1);
        assert_eq!(*seen.borrow(), vec![selection]);
    }
}
