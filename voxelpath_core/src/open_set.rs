// Binary min-heap over search nodes with decrease-key.
//
// `std::collections::BinaryHeap` has no way to lower the key of an entry
// that is already queued, so A* built on it has to push duplicates and skip
// stale entries on pop. This heap instead stores `NodeId`s and writes each
// node's current slot back into `SearchNode::heap_index` on every move, which
// lets `decrease_key` sift a node up in place from its known slot.
//
// Ordering key is `(f, sequence)`: lowest f-cost first, and among equal
// f-costs the node queued earliest. `sequence` is stamped on every
// `insert`, so expansion order is fully reproducible for a given grid.
//
// The arena itself lives in `NodeTable`; every operation borrows it as a
// `&mut [SearchNode]` for the duration of the call.
//
// See also: `node_table.rs` for the arena and the relaxation step that
// drives `insert` / `decrease_key`.

use crate::node_table::{NodeId, SearchNode};
use std::cmp::Ordering;

/// Heap of open (not yet expanded) search nodes.
#[derive(Clone, Debug, Default)]
pub struct OpenSet {
    heap: Vec<NodeId>,
    /// Monotonic counter for FIFO tie-breaking between equal f-costs.
    next_sequence: u64,
}

/// Whether `a` should be expanded before `b`.
#[inline]
fn precedes(a: &SearchNode, b: &SearchNode) -> bool {
    a.f.total_cmp(&b.f).then(a.sequence.cmp(&b.sequence)) == Ordering::Less
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queue a node that is not currently in the heap.
    pub fn insert(&mut self, nodes: &mut [SearchNode], id: NodeId) {
        debug_assert!(nodes[id.index()].heap_index.is_none(), "node already queued");
        nodes[id.index()].sequence = self.next_sequence;
        self.next_sequence += 1;
        let slot = self.heap.len();
        self.heap.push(id);
        self.sift_up(nodes, slot);
    }

    /// Remove and return the node with the lowest f-cost. The returned node's
    /// `heap_index` is cleared, marking it closed.
    pub fn pop_min(&mut self, nodes: &mut [SearchNode]) -> Option<NodeId> {
        let last = self.heap.pop()?;
        let min = if self.heap.is_empty() {
            last
        } else {
            let min = self.heap[0];
            self.heap[0] = last;
            nodes[last.index()].heap_index = Some(0);
            self.sift_down(nodes, 0);
            min
        };
        nodes[min.index()].heap_index = None;
        Some(min)
    }

    /// Restore heap order after the node's f-cost was lowered in place.
    ///
    /// The node must currently be queued. Calling this when f did not
    /// change is harmless.
    pub fn decrease_key(&mut self, nodes: &mut [SearchNode], id: NodeId) {
        debug_assert!(
            nodes[id.index()].heap_index.is_some(),
            "decrease_key on a node that is not in the open set"
        );
        if let Some(slot) = nodes[id.index()].heap_index {
            self.sift_up(nodes, slot);
        }
    }

    fn sift_up(&mut self, nodes: &mut [SearchNode], mut slot: usize) {
        let id = self.heap[slot];
        while slot > 0 {
            let parent_slot = (slot - 1) / 2;
            let parent = self.heap[parent_slot];
            if !precedes(&nodes[id.index()], &nodes[parent.index()]) {
                break;
            }
            self.heap[slot] = parent;
            nodes[parent.index()].heap_index = Some(slot);
            slot = parent_slot;
        }
        self.heap[slot] = id;
        nodes[id.index()].heap_index = Some(slot);
    }

    fn sift_down(&mut self, nodes: &mut [SearchNode], mut slot: usize) {
        let id = self.heap[slot];
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len
                && precedes(
                    &nodes[self.heap[right].index()],
                    &nodes[self.heap[left].index()],
                )
            {
                child = right;
            }
            let child_id = self.heap[child];
            if !precedes(&nodes[child_id.index()], &nodes[id.index()]) {
                break;
            }
            self.heap[slot] = child_id;
            nodes[child_id.index()].heap_index = Some(slot);
            slot = child;
        }
        self.heap[slot] = id;
        nodes[id.index()].heap_index = Some(slot);
    }

    /// Check the heap property and slot bookkeeping. Test-only.
    #[cfg(test)]
    fn assert_valid(&self, nodes: &[SearchNode]) {
        for (slot, &id) in self.heap.iter().enumerate() {
            assert_eq!(nodes[id.index()].heap_index, Some(slot), "stale heap_index");
            if slot > 0 {
                let parent = self.heap[(slot - 1) / 2];
                assert!(
                    nodes[parent.index()].f <= nodes[id.index()].f,
                    "parent f {} > child f {}",
                    nodes[parent.index()].f,
                    nodes[id.index()].f
                );
            }
        }
    }
}
