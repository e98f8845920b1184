//! Ordered, de-duplicated set of medications the user has chosen.
//!
//! Views never query each other for selection state. They subscribe here
//! and receive the full ordered snapshot synchronously on every change, so
//! tags, the hidden form field and the check button cannot drift apart.

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{MedicationId, SelectedMedication};

/// Anything derived from the current selection.
pub trait SelectionObserver {
    fn selection_changed(&mut self, selection: &[SelectedMedication]);
}

/// Shared handle to a subscribed view. The widget keeps a typed clone to
/// read the view back.
pub type ObserverHandle = Rc<RefCell<dyn SelectionObserver>>;

#[derive(Default)]
pub struct SelectionSet {
    items: Vec<SelectedMedication>,
    observers: Vec<ObserverHandle>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view and bring it up to date immediately.
    pub fn subscribe(&mut self, observer: ObserverHandle) {
        observer.borrow_mut().selection_changed(&self.items);
        self.observers.push(observer);
    }

    /// Append `medication` unless its id is already selected.
    /// Returns whether the set changed.
    pub fn add(&mut self, medication: SelectedMedication) -> bool {
        if self.contains(&medication.id) {
            return false;
        }
        self.items.push(medication);
        self.notify();
        true
    }

    /// Remove by id. Absent ids are a no-op and notify nobody.
    pub fn remove(&mut self, id: &MedicationId) -> Option<SelectedMedication> {
        let index = self.items.iter().position(|m| &m.id == id)?;
        let removed = self.items.remove(index);
        self.notify();
        Some(removed)
    }

    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.notify();
    }

    pub fn contains(&self, id: &MedicationId) -> bool {
        self.items.iter().any(|m| &m.id == id)
    }

    pub fn get(&self, id: &MedicationId) -> Option<&SelectedMedication> {
        self.items.iter().find(|m| &m.id == id)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SelectedMedication] {
        &self.items
    }

    /// Ids in insertion order, as submitted with the form.
    pub fn serialize(&self) -> Vec<MedicationId> {
        self.items.iter().map(|m| m.id.clone()).collect()
    }

    /// Value of the hidden form field for the current selection.
    pub fn hidden_field_value(&self) -> String {
        encode_ids(&self.serialize())
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.borrow_mut().selection_changed(&self.items);
        }
    }
}

/// JSON encoding of the id list carried by the hidden form field.
pub fn encode_ids(ids: &[MedicationId]) -> String {
    // A Vec<String> newtype list cannot fail to serialize.
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: usize,
        last: Vec<MedicationId>,
    }

    impl SelectionObserver for Recorder {
        fn selection_changed(&mut self, selection: &[SelectedMedication]) {
            self.calls += 1;
            self.last = selection.iter().map(|m| m.id.clone()).collect();
        }
    }

    fn med(id: &str, name: &str) -> SelectedMedication {
        SelectedMedication::new(id, name)
    }

    fn ids(list: &[&str]) -> Vec<MedicationId> {
        list.iter().map(|s| MedicationId::new(*s)).collect()
    }

    #[test]
    fn add_is_idempotent_per_id() {
        let mut set = SelectionSet::new();
        assert!(set.add(med("d1", "Ibuprofen")));
        assert!(!set.add(med("d1", "Ibuprofen (Advil)")));
        assert!(set.add(med("d2", "Aspirin")));
        assert!(!set.add(med("d2", "Aspirin")));
        assert_eq!(set.count(), 2);
        assert_eq!(set.items()[0].display_name, "Ibuprofen");
    }

    #[test]
    fn arbitrary_add_sequences_never_duplicate() {
        let sequence = ["d3", "d1", "d3", "d2", "d1", "d1", "d4", "d2", "d3"];
        let mut set = SelectionSet::new();
        for id in sequence {
            set.add(med(id, id));
        }
        assert_eq!(set.serialize(), ids(&["d3", "d1", "d2", "d4"]));
    }

    #[test]
    fn remove_then_add_restores_single_entry() {
        let mut set = SelectionSet::new();
        set.add(med("d1", "Ibuprofen"));
        set.add(med("d2", "Aspirin"));
        assert!(set.remove(&MedicationId::new("d1")).is_some());
        set.add(med("d1", "Ibuprofen"));
        assert_eq!(set.serialize(), ids(&["d2", "d1"]));
    }

    #[test]
    fn removing_absent_id_changes_nothing() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut set = SelectionSet::new();
        set.add(med("d1", "Ibuprofen"));
        set.subscribe(recorder.clone());
        assert!(set.remove(&MedicationId::new("d9")).is_none());
        assert!(set.remove(&MedicationId::new("d9")).is_none());
        assert_eq!(set.serialize(), ids(&["d1"]));
        assert_eq!(recorder.borrow().calls, 1);
    }

    #[test]
    fn serialize_round_trips_through_json() {
        let mut set = SelectionSet::new();
        for id in ["d2", "d1", "d3"] {
            set.add(med(id, id));
        }
        let json = encode_ids(&set.serialize());
        let parsed: Vec<MedicationId> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set.serialize());
    }

    #[test]
    fn observers_get_snapshot_on_subscribe_and_each_change() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut set = SelectionSet::new();
        set.add(med("d1", "Ibuprofen"));
        set.subscribe(recorder.clone());
        assert_eq!(recorder.borrow().last, ids(&["d1"]));

        set.add(med("d2", "Aspirin"));
        set.add(med("d2", "Aspirin"));
        assert_eq!(recorder.borrow().calls, 2);
        assert_eq!(recorder.borrow().last, ids(&["d1", "d2"]));

        set.clear();
        set.clear();
        assert_eq!(recorder.borrow().calls, 3);
        assert!(recorder.borrow().last.is_empty());
    }

    #[test]
    fn example_single_selection_serializes() {
        let mut set = SelectionSet::new();
        set.add(med("d1", "Ibuprofen"));
        assert_eq!(set.items(), &[med("d1", "Ibuprofen")]);
        assert_eq!(set.hidden_field_value(), r#"["d1"]"#);
    }
}
