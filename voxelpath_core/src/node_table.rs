// Search-node arena and the packed-key index over it.
//
// Every cell the search discovers gets exactly one `SearchNode`, stored in a
// flat `Vec` and referenced everywhere by `NodeId` (an index into that
// `Vec`): the open set's heap slots, the parent links used for path
// reconstruction, and the `FxHashMap<u64, NodeId>` that maps a packed cell
// key back to its node. No node ever holds a reference to another node, so
// the cross-links (heap slot, parent, table entry) are plain integers and
// the whole arena is dropped in one go when the search returns.
//
// `relax()` implements the edge-relaxation step of A*: discover a new cell,
// improve an existing one (decrease-key if it is still open, re-insert if it
// was already closed), or discard the candidate edge.
//
// See also: `open_set.rs` for the heap that orders nodes by f-cost,
// `coord_key.rs` for the key packing, `search.rs` for the driver.

use crate::coord_key;
use crate::open_set::OpenSet;
use crate::types::VoxelCoord;
use rustc_hash::FxHashMap;

/// Compact identifier for a search node: its index in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-cell search state.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Packed cell coordinate (see `coord_key::pack`).
    pub key: u64,
    /// Cost of the best known path from the start.
    pub g: f64,
    /// `g` plus the goal heuristic; the open set's ordering key.
    pub f: f64,
    /// Predecessor on the best known path. `None` only for the start node.
    pub parent: Option<NodeId>,
    /// Slot in the open set's heap, or `None` when the node is not queued.
    pub heap_index: Option<usize>,
    /// Insertion stamp assigned by the open set; breaks f-cost ties FIFO.
    pub sequence: u64,
}

impl SearchNode {
    pub fn coord(&self) -> VoxelCoord {
        coord_key::unpack(self.key)
    }

    /// Whether the node is currently resident in the open set.
    pub fn is_open(&self) -> bool {
        self.heap_index.is_some()
    }
}

/// What `NodeTable::relax` did with a candidate edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxation {
    /// First time this cell was seen; a node was created and queued.
    Discovered,
    /// Cheaper path to a node still in the open set; its key was decreased.
    Improved,
    /// Cheaper path to an already-expanded node; it was queued again.
    Reopened,
    /// The existing path is at least as cheap; nothing changed.
    Discarded,
}

/// Arena of search nodes plus the packed-key index.
#[derive(Debug, Default)]
pub struct NodeTable {
    nodes: Vec<SearchNode>,
    index: FxHashMap<u64, NodeId>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut index = FxHashMap::default();
        index.reserve(capacity);
        Self {
            nodes: Vec::with_capacity(capacity),
            index,
        }
    }

    /// Number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up the node for a cell, if the search has discovered it.
    pub fn get(&self, coord: VoxelCoord) -> Option<NodeId> {
        self.index.get(&coord_key::pack(coord)).copied()
    }

    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    /// The whole arena, mutably. The open set needs this to keep each
    /// node's `heap_index` in sync as it moves entries around.
    pub fn nodes_mut(&mut self) -> &mut [SearchNode] {
        &mut self.nodes
    }

    /// Create the node for a not-yet-seen cell. The caller is responsible
    /// for queueing it.
    pub fn insert(&mut self, coord: VoxelCoord, g: f64, f: f64, parent: Option<NodeId>) -> NodeId {
        let key = coord_key::pack(coord);
        debug_assert!(
            !self.index.contains_key(&key),
            "cell {coord} already has a node"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SearchNode {
            key,
            g,
            f,
            parent,
            heap_index: None,
            sequence: 0,
        });
        self.index.insert(key, id);
        id
    }

    /// Offer a path to `coord` with cost `g` via `parent`.
    ///
    /// `heuristic` is only evaluated when the cell's f-cost actually needs
    /// computing. An existing node is updated only on a strictly lower `g`;
    /// equal-cost alternatives are discarded so closed nodes are never
    /// reopened without a real improvement.
    pub fn relax(
        &mut self,
        open: &mut OpenSet,
        coord: VoxelCoord,
        g: f64,
        parent: NodeId,
        heuristic: impl FnOnce(VoxelCoord) -> f64,
    ) -> Relaxation {
        match self.get(coord) {
            None => {
                let f = g + heuristic(coord);
                let id = self.insert(coord, g, f, Some(parent));
                open.insert(&mut self.nodes, id);
                Relaxation::Discovered
            }
            Some(id) => {
                let node = &mut self.nodes[id.index()];
                if g >= node.g {
                    return Relaxation::Discarded;
                }
                node.g = g;
                node.f = g + heuristic(coord);
                node.parent = Some(parent);
                if node.is_open() {
                    open.decrease_key(&mut self.nodes, id);
                    Relaxation::Improved
                } else {
                    open.insert(&mut self.nodes, id);
                    Relaxation::Reopened
                }
            }
        }
    }
}
