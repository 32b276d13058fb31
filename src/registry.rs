//! Slot registry handing out [`NodeId`]s for host-owned nodes.
//!
//! Hosts whose elements carry no numeric identity (the browser) register each
//! element once and address it by the returned id afterwards. Releasing an id
//! drops the held value and tombstones its slot. Ids are never reissued, so a
//! stale id held by a pending timer can only miss, never alias a newer node.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use crate::dom::NodeId;

#[derive(Debug)]
pub struct NodeRegistry<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for NodeRegistry<T> {
    fn default() -> Self {
        Self { slots: Vec::new(), live: 0 }
    }
}

impl<T> NodeRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under a fresh id.
    pub fn insert(&mut self, value: T) -> NodeId {
        let id = NodeId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.slots.push(Some(value));
        self.live += 1;
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Drop the value behind `id`. Releasing twice is a no-op.
    pub fn release(&mut self, id: NodeId) -> Option<T> {
        let value = self.slots.get_mut(id.0 as usize).and_then(Option::take);
        if value.is_some() {
            self.live -= 1;
        }
        value
    }

    /// Number of values still held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
