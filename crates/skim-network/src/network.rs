//! Road network representation and builder.
//!
//! # Data layout
//!
//! Links live in an arena indexed by [`LinkId`] in insertion order, so ids
//! handed out by the builder stay valid after `build()`.  Adjacency is stored
//! as two **Compressed Sparse Row (CSR)** index lists, one for outgoing and
//! one for incoming links.  Given a `NodeId n`, its outgoing links are:
//!
//! ```text
//! out_links[ out_start[n] .. out_start[n+1] ]
//! ```
//!
//! and its incoming links are the same slice of `in_links` / `in_start`.
//! Nodes never own links and links never own nodes; every relation is an
//! index, so there are no ownership cycles.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps an `(x, y)` coordinate to the nearest
//! `NodeId`.  Used to snap zone sampling points to the network.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use skim_core::{Coord, LinkId, ModeSet, NodeId, TransportMode};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── LinkSpec ──────────────────────────────────────────────────────────────────

/// Static attributes of a directed link.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkSpec {
    /// Physical length in metres.
    pub length_m: f64,
    /// Free-flow speed in metres per second.
    pub freespeed: f64,
    /// Flow capacity in vehicles per hour.
    pub capacity: f64,
    /// Modes allowed to use the link.
    pub modes: ModeSet,
}

impl LinkSpec {
    /// A car link with a nominal single-lane capacity.
    pub fn car(length_m: f64, freespeed: f64) -> Self {
        Self {
            length_m,
            freespeed,
            capacity: 1_800.0,
            modes: ModeSet::single(TransportMode::Car),
        }
    }

    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed road graph with CSR adjacency plus a spatial index.
///
/// Immutable once built; shared by reference across all skim workers.
/// Do not construct directly; use [`NetworkBuilder`].
pub struct Network {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_coord: Vec<Coord>,

    // ── Link arena (indexed by LinkId) ────────────────────────────────────
    pub link_from: Vec<NodeId>,
    pub link_to: Vec<NodeId>,
    pub link_length_m: Vec<f64>,
    pub link_freespeed: Vec<f64>,
    pub link_capacity: Vec<f64>,
    pub link_modes: Vec<ModeSet>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Length = `node_count + 1`.
    out_start: Vec<u32>,
    out_links: Vec<LinkId>,
    /// Length = `node_count + 1`.
    in_start: Vec<u32>,
    in_links: Vec<LinkId>,

    spatial_idx: RTree<NodeEntry>,
}

impl Network {
    /// Construct an empty network with no nodes or links.
    pub fn empty() -> Self {
        NetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_coord.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_coord.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing links of `node`, ascending by `LinkId`.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        let start = self.out_start[node.index()] as usize;
        let end = self.out_start[node.index() + 1] as usize;
        &self.out_links[start..end]
    }

    /// Incoming links of `node`, ascending by `LinkId`.
    #[inline]
    pub fn in_links(&self, node: NodeId) -> &[LinkId] {
        let start = self.in_start[node.index()] as usize;
        let end = self.in_start[node.index() + 1] as usize;
        &self.in_links[start..end]
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_links(node).len()
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_links(node).len()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `coord`, or `None` for an empty network.
    pub fn nearest_node(&self, coord: Coord) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&coord.to_array())
            .map(|e| e.id)
    }

    /// The node nearest to `coord` if it lies within `max_distance` metres.
    pub fn nearest_node_within(&self, coord: Coord, max_distance: f64) -> Option<NodeId> {
        self.nearest_node(coord)
            .filter(|&n| self.node_coord[n.index()].distance(coord) <= max_distance)
    }

    // ── Derived networks ──────────────────────────────────────────────────

    /// A network with the same nodes (same `NodeId`s) but only the links
    /// that allow `mode`.  Link ids are renumbered densely in their original
    /// order.
    pub fn filter_modes(&self, mode: TransportMode) -> Network {
        let mut b = NetworkBuilder::with_capacity(self.node_count(), self.link_count());
        for &coord in &self.node_coord {
            b.add_node(coord);
        }
        for l in 0..self.link_count() {
            if self.link_modes[l].contains(mode) {
                b.add_link(
                    self.link_from[l],
                    self.link_to[l],
                    LinkSpec {
                        length_m: self.link_length_m[l],
                        freespeed: self.link_freespeed[l],
                        capacity: self.link_capacity[l],
                        modes: self.link_modes[l],
                    },
                );
            }
        }
        b.build()
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use skim_core::Coord;
/// use skim_network::{LinkSpec, NetworkBuilder};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Coord::new(0.0, 0.0));
/// let c = b.add_node(Coord::new(1_200.0, 0.0));
/// b.add_road(a, c, LinkSpec::car(1_200.0, 13.9));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.link_count(), 2); // bidirectional
/// ```
pub struct NetworkBuilder {
    nodes: Vec<Coord>,
    links: Vec<(NodeId, NodeId, LinkSpec)>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), links: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            links: Vec::with_capacity(links),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(coord);
        id
    }

    /// Add a **directed** link and return its `LinkId` (sequential from 0).
    pub fn add_link(&mut self, from: NodeId, to: NodeId, spec: LinkSpec) -> LinkId {
        let id = LinkId(self.links.len() as u32);
        self.links.push((from, to, spec));
        id
    }

    /// Add links in **both directions** and return `(a→b, b→a)`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, spec: LinkSpec) -> (LinkId, LinkId) {
        (self.add_link(a, b, spec), self.add_link(b, a, spec))
    }

    pub fn node_coord(&self, id: NodeId) -> Coord {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`Network`].
    ///
    /// Time complexity: O(E log E) for the adjacency sorts + O(N log N) for
    /// the R-tree bulk load.
    ///
    /// # Panics
    /// Panics if a link references a node that was never added.
    pub fn build(self) -> Network {
        let node_count = self.nodes.len();
        for (i, (from, to, _)) in self.links.iter().enumerate() {
            assert!(
                from.index() < node_count && to.index() < node_count,
                "link {i} references a node outside the network"
            );
        }

        let link_from: Vec<NodeId> = self.links.iter().map(|l| l.0).collect();
        let link_to: Vec<NodeId> = self.links.iter().map(|l| l.1).collect();

        let (out_start, out_links) = csr(node_count, &link_from);
        let (in_start, in_links) = csr(node_count, &link_to);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, c)| NodeEntry { point: c.to_array(), id: NodeId(i as u32) })
            .collect();

        Network {
            link_length_m: self.links.iter().map(|l| l.2.length_m).collect(),
            link_freespeed: self.links.iter().map(|l| l.2.freespeed).collect(),
            link_capacity: self.links.iter().map(|l| l.2.capacity).collect(),
            link_modes: self.links.iter().map(|l| l.2.modes).collect(),
            node_coord: self.nodes,
            link_from,
            link_to,
            out_start,
            out_links,
            in_start,
            in_links,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a CSR row pointer and index list grouping link ids by `key[link]`.
/// Within one node the links stay in ascending `LinkId` order.
fn csr(node_count: usize, key: &[NodeId]) -> (Vec<u32>, Vec<LinkId>) {
    let mut start = vec![0u32; node_count + 1];
    for n in key {
        start[n.index() + 1] += 1;
    }
    for i in 1..=node_count {
        start[i] += start[i - 1];
    }
    debug_assert_eq!(start[node_count] as usize, key.len());

    let mut fill = start.clone();
    let mut links = vec![LinkId::INVALID; key.len()];
    for (l, n) in key.iter().enumerate() {
        let slot = &mut fill[n.index()];
        links[*slot as usize] = LinkId(l as u32);
        *slot += 1;
    }
    (start, links)
}
