// src/tracking/object_table.rs
//
// Explicit per-id lifecycle. An entry is created on the first sighting of an
// id, receives one box per frame it is observed, and is removed by the prune
// step at the end of any frame in which the id was not seen.

use super::position_history::PositionHistory;
use crate::types::BoundingBox;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: u32,
    pub class_label: String,
    pub history: PositionHistory,
}

impl TrackedObject {
    pub fn new(id: u32, class_label: impl Into<String>, capacity: usize) -> Self {
        Self {
            id,
            class_label: class_label.into(),
            history: PositionHistory::new(capacity),
        }
    }
}

pub struct ObjectTable {
    objects: HashMap<u32, TrackedObject>,
    capacity: usize,
}

impl ObjectTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            objects: HashMap::with_capacity(32),
            capacity,
        }
    }

    /// Record this frame's box for `id`. The class label is fixed at the
    /// first sighting; the upstream tracker owns identity.
    pub fn observe(
        &mut self,
        id: u32,
        class_label: &str,
        bbox: BoundingBox,
    ) -> &TrackedObject {
        let capacity = self.capacity;
        let obj = self.objects.entry(id).or_insert_with(|| {
            debug!("New object {} ({})", id, class_label);
            TrackedObject::new(id, class_label, capacity)
        });
        obj.history.add(bbox);
        obj
    }

    /// Drop every entry whose id is absent from `seen`. Returns the removed
    /// ids in ascending order.
    pub fn prune(&mut self, seen: &HashSet<u32>) -> Vec<u32> {
        let mut removed: Vec<u32> = self
            .objects
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        removed.sort_unstable();

        let table = std::mem::take(&mut self.objects);
        self.objects = retain_seen(table, seen);

        if !removed.is_empty() {
            debug!("Pruned {} object(s): {:?}", removed.len(), removed);
        }
        removed
    }

    pub fn get(&self, id: u32) -> Option<&TrackedObject> {
        self.objects.get(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Frame-to-frame transition of the object map: keeps exactly the entries
/// seen this frame.
pub fn retain_seen(
    mut objects: HashMap<u32, TrackedObject>,
    seen: &HashSet<u32>,
) -> HashMap<u32, TrackedObject> {
    objects.retain(|id, _| seen.contains(id));
    objects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: f32) -> BoundingBox {
        BoundingBox::new(x, 0.0, x + 20.0, 20.0)
    }

    #[test]
    fn test_observe_creates_then_appends() {
        let mut table = ObjectTable::new(6);
        table.observe(3, "car", bbox(0.0));
        table.observe(3, "truck", bbox(5.0));

        let obj = table.get(3).unwrap();
        assert_eq!(obj.class_label, "car");
        assert_eq!(obj.history.total_count(), 2);
        assert_eq!(obj.history.capacity(), 6);
    }

    #[test]
    fn test_prune_removes_unseen_ids() {
        let mut table = ObjectTable::new(6);
        for id in [1, 2, 3] {
            table.observe(id, "person", bbox(id as f32));
        }
        let seen: HashSet<u32> = [2].into_iter().collect();
        assert_eq!(table.prune(&seen), vec![1, 3]);
        assert_eq!(table.len(), 1);
        assert!(table.get(2).is_some());
    }

    #[test]
    fn test_reappearing_id_starts_fresh_history() {
        let mut table = ObjectTable::new(6);
        table.observe(7, "dog", bbox(0.0));
        table.observe(7, "dog", bbox(1.0));
        table.prune(&HashSet::new());
        assert!(table.is_empty());

        table.observe(7, "dog", bbox(2.0));
        assert_eq!(table.get(7).unwrap().history.total_count(), 1);
    }

    #[test]
    fn test_retain_seen_is_pure_transition() {
        let mut objects = HashMap::new();
        objects.insert(1, TrackedObject::new(1, "car", 4));
        objects.insert(2, TrackedObject::new(2, "bus", 4));
        let seen: HashSet<u32> = [1, 99].into_iter().collect();

        let next = retain_seen(objects, &seen);
        assert_eq!(next.len(), 1);
        assert!(next.contains_key(&1));
    }
}
