//! The object carousel: the live set of advertised objects.
//!
//! A keyed, insertion-ordered collection of [`MotObject`] records with
//! mark-and-sweep lifecycle semantics. Each directory cycle marks every
//! record obsolete, reactivates the ones the new directory still
//! advertises, and sweeps the rest. There is no timeout-based expiry;
//! directory republication is the sole eviction mechanism.

use crate::object::MotObject;
use crate::types::TransportId;

/// Insertion-ordered collection of objects keyed by transport id.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    objects: Vec<MotObject>,
}

impl Carousel {
    /// Creates an empty carousel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an object by transport id.
    #[must_use]
    pub fn find(&self, id: TransportId) -> Option<&MotObject> {
        self.objects.iter().find(|object| object.id() == id)
    }

    /// Looks up an object by transport id, mutably.
    pub fn find_mut(&mut self, id: TransportId) -> Option<&mut MotObject> {
        self.objects.iter_mut().find(|object| object.id() == id)
    }

    /// Inserts an object and returns a reference to the stored record.
    pub fn insert(&mut self, object: MotObject) -> &mut MotObject {
        let index = self.objects.len();
        self.objects.push(object);
        &mut self.objects[index]
    }

    /// Marks every record as pending eviction.
    pub fn mark_all_obsolete(&mut self) {
        for object in &mut self.objects {
            object.set_obsolete(true);
        }
    }

    /// Clears the pending-eviction bit on one record.
    ///
    /// Returns whether the record was found.
    pub fn mark_active(&mut self, id: TransportId) -> bool {
        match self.find_mut(id) {
            Some(object) => {
                object.set_obsolete(false);
                true
            }
            None => false,
        }
    }

    /// Removes every record still marked obsolete; returns how many.
    pub fn sweep_obsolete(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|object| !object.is_obsolete());
        before - self.objects.len()
    }

    /// Removes one record by transport id; returns whether it existed.
    pub fn remove(&mut self, id: TransportId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|object| object.id() != id);
        before != self.objects.len()
    }

    /// Removes all records.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the carousel holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MotObject> {
        self.objects.iter()
    }
}

impl<'a> IntoIterator for &'a Carousel {
    type Item = &'a MotObject;
    type IntoIter = std::slice::Iter<'a, MotObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> TransportId {
        TransportId::new(n)
    }

    #[test]
    fn insert_and_find() {
        let mut carousel = Carousel::new();
        assert!(carousel.is_empty());
        carousel.insert(MotObject::new(id(1)));
        carousel.insert(MotObject::new(id(2)));
        assert_eq!(carousel.len(), 2);
        assert!(carousel.find(id(1)).is_some());
        assert!(carousel.find(id(3)).is_none());
    }

    #[test]
    fn insertion_order_preserved() {
        let mut carousel = Carousel::new();
        for n in [5, 3, 9] {
            carousel.insert(MotObject::new(id(n)));
        }
        let order: Vec<u32> = carousel.iter().map(|o| o.id().as_u32()).collect();
        assert_eq!(order, vec![5, 3, 9]);
    }

    #[test]
    fn mark_and_sweep_cycle() {
        let mut carousel = Carousel::new();
        carousel.insert(MotObject::new(id(1)));
        carousel.insert(MotObject::new(id(2)));
        carousel.insert(MotObject::new(id(3)));

        carousel.mark_all_obsolete();
        assert!(carousel.mark_active(id(2)));
        assert!(!carousel.mark_active(id(7)));

        assert_eq!(carousel.sweep_obsolete(), 2);
        assert_eq!(carousel.len(), 1);
        assert!(carousel.find(id(2)).is_some());
    }

    #[test]
    fn sweep_on_clean_carousel_removes_nothing() {
        let mut carousel = Carousel::new();
        carousel.insert(MotObject::new(id(1)));
        assert_eq!(carousel.sweep_obsolete(), 0);
        assert_eq!(carousel.len(), 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut carousel = Carousel::new();
        carousel.insert(MotObject::new(id(1)));
        carousel.insert(MotObject::new(id(2)));
        assert!(carousel.remove(id(1)));
        assert!(!carousel.remove(id(1)));
        carousel.clear();
        assert!(carousel.is_empty());
    }
}
