//! Generational arena holding every live copy record.
//!
//! Slots are addressed by [`CopyId`]. Removing a record frees its slot for
//! reuse and bumps the slot's generation, which kills every handle issued for
//! the old occupant. A slot whose generation is exhausted is retired for good
//! instead of wrapping back to a generation an old handle may still carry.

use crate::copy::{CopyId, CopyRecord};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    record: Option<CopyRecord>,
}

#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    len: usize,
}

impl Arena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity), free: Vec::new(), len: 0 }
    }

    /// Number of live records.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, record: CopyRecord) -> CopyId {
        self.len += 1;
        if let Some(index) = self.free.pop()
            && let Some(slot) = self.slots.get_mut(index)
        {
            slot.record = Some(record);
            return CopyId { index, generation: slot.generation };
        }
        let index = self.slots.len();
        self.slots.push(Slot { generation: 0, record: Some(record) });
        CopyId { index, generation: 0 }
    }

    fn slot(&self, id: CopyId) -> Option<&Slot> {
        self.slots.get(id.index).filter(|slot| slot.generation == id.generation)
    }

    pub(crate) fn get(&self, id: CopyId) -> Option<&CopyRecord> {
        self.slot(id)?.record.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: CopyId) -> Option<&mut CopyRecord> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .record
            .as_mut()
    }

    pub(crate) fn contains(&self, id: CopyId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn remove(&mut self, id: CopyId) -> Option<CopyRecord> {
        let slot = self.slots.get_mut(id.index).filter(|slot| slot.generation == id.generation)?;
        let record = slot.record.take()?;
        match slot.generation.checked_add(1) {
            Some(generation) => {
                slot.generation = generation;
                self.free.push(id.index);
            },
            None => tracing::debug!(index = id.index, "slot generations exhausted; retiring slot"),
        }
        self.len -= 1;
        Some(record)
    }

    /// Every live record with its handle, in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (CopyId, &CopyRecord)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.record.as_ref().map(|record| (CopyId { index, generation: slot.generation }, record))
        })
    }
}
