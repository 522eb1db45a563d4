//! Time-dependent label-setting shortest-path search.
//!
//! # Algorithm
//!
//! Classic Dijkstra over the CSR network.  The frontier is a binary min-heap
//! keyed by `(cost, NodeId)`; the secondary key makes the settle order, and
//! therefore every tie-break, reproducible across runs.  Stale heap entries
//! are skipped on pop instead of being removed on update.
//!
//! Each label carries three accumulators: generalized cost (the ordering
//! key), time of day and distance.  Link functions are evaluated at the
//! label's time of day, so a tree rooted at 08:00 and one rooted at 17:00
//! differ when the [`TravelTime`] is congestion-aware.
//!
//! # Faults
//!
//! A link function returning a non-finite or negative value aborts the
//! search with [`NetworkError::NonFiniteCost`] / [`NetworkError::NegativeCost`].
//! A relaxation that would lower the cost of an already settled node aborts
//! with [`NetworkError::SettledLabelDecreased`].  Neither is retried.
//!
//! # Search state
//!
//! Labels and frontier are allocated per query and owned by the returned
//! [`SearchTree`].  A `LabelSettingSearch` only holds shared references, so
//! one instance per worker thread (or one shared instance) is fine.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use skim_core::{LinkId, NodeId};

use crate::disutility::TravelDisutility;
use crate::error::CostKind;
use crate::network::Network;
use crate::travel_time::TravelTime;
use crate::{NetworkError, NetworkResult};

// ── Labels ────────────────────────────────────────────────────────────────────

/// Per-node search state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchLabel {
    /// Tentative (or, once settled, final) generalized cost from the root.
    pub cost: f64,
    /// Time of day at this node: arrival time for forward searches,
    /// latest departure time for backward searches.
    pub time: f64,
    /// Metres travelled between the root and this node.
    pub distance: f64,
    /// `true` once the node has been popped from the frontier.
    pub settled: bool,
    /// Link over which the label was last improved; `LinkId::INVALID` for
    /// the root and for unreached nodes.
    pub pred_link: LinkId,
}

impl SearchLabel {
    const UNREACHED: SearchLabel = SearchLabel {
        cost: f64::INFINITY,
        time: f64::NAN,
        distance: f64::INFINITY,
        settled: false,
        pred_link: LinkId::INVALID,
    };
}

/// Which adjacency a search expands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchDirection {
    /// One-to-all over outgoing links.
    Forward,
    /// All-to-one over incoming links, time running backwards.
    Backward,
}

/// Stop criterion for a search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchBound {
    /// Nodes whose cost exceeds this are left unsettled.
    pub max_cost: f64,
}

impl SearchBound {
    pub const UNBOUNDED: SearchBound = SearchBound { max_cost: f64::INFINITY };

    pub fn max_cost(max_cost: f64) -> Self {
        Self { max_cost }
    }
}

impl Default for SearchBound {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

// ── Frontier ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct FrontierEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.node.cmp(&other.node))
    }
}

// ── SearchTree ────────────────────────────────────────────────────────────────

/// Result of a one-to-all or all-to-one search.
///
/// Only settled nodes count as reached.  A node without a label is either
/// disconnected from the root or lies beyond the [`SearchBound`].
#[derive(Debug, Clone)]
pub struct SearchTree {
    pub root: NodeId,
    pub direction: SearchDirection,
    /// Time of day at the root.
    pub root_time: f64,
    labels: Vec<SearchLabel>,
    settled: usize,
}

impl SearchTree {
    /// Final label of `node`, or `None` if it was never settled.
    #[inline]
    pub fn label(&self, node: NodeId) -> Option<&SearchLabel> {
        self.labels.get(node.index()).filter(|l| l.settled)
    }

    pub fn cost(&self, node: NodeId) -> Option<f64> {
        self.label(node).map(|l| l.cost)
    }

    /// Time of day at `node` (see [`SearchLabel::time`]).
    pub fn time(&self, node: NodeId) -> Option<f64> {
        self.label(node).map(|l| l.time)
    }

    /// Seconds between the root and `node`, regardless of direction.
    pub fn travel_time(&self, node: NodeId) -> Option<f64> {
        self.label(node).map(|l| (l.time - self.root_time).abs())
    }

    pub fn distance(&self, node: NodeId) -> Option<f64> {
        self.label(node).map(|l| l.distance)
    }

    /// Number of settled nodes, root included.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    /// Links of the tree path between the root and `node`, in travel order
    /// (root → node for forward trees, node → root for backward trees).
    pub fn path_to(&self, network: &Network, node: NodeId) -> Option<Vec<LinkId>> {
        self.label(node)?;
        let mut links = Vec::new();
        let mut cur = node;
        loop {
            let link = self.labels[cur.index()].pred_link;
            if link == LinkId::INVALID {
                break;
            }
            links.push(link);
            cur = match self.direction {
                SearchDirection::Forward => network.link_from[link.index()],
                SearchDirection::Backward => network.link_to[link.index()],
            };
        }
        if self.direction == SearchDirection::Forward {
            links.reverse();
        }
        Some(links)
    }
}

/// Result of a point-to-point query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Links in travel order, empty when source equals destination.
    pub links: Vec<LinkId>,
    pub cost: f64,
    pub travel_time: f64,
    pub distance: f64,
}

impl Path {
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── LabelSettingSearch ────────────────────────────────────────────────────────

/// Label-setting search over a [`Network`] with pluggable link functions.
///
/// Holds only shared references; cheap to construct per worker.
pub struct LabelSettingSearch<'a, TT: ?Sized, TD: ?Sized> {
    network: &'a Network,
    travel_time: &'a TT,
    disutility: &'a TD,
}

impl<'a, TT, TD> LabelSettingSearch<'a, TT, TD>
where
    TT: TravelTime + ?Sized,
    TD: TravelDisutility + ?Sized,
{
    pub fn new(network: &'a Network, travel_time: &'a TT, disutility: &'a TD) -> Self {
        Self { network, travel_time, disutility }
    }

    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// Least-cost labels from `source` to every reachable node, departing
    /// at `departure_time`.
    pub fn one_to_all(
        &self,
        source: NodeId,
        departure_time: f64,
        bound: SearchBound,
    ) -> NetworkResult<SearchTree> {
        self.run(source, departure_time, SearchDirection::Forward, bound, None)
    }

    /// Least-cost labels from every node that can reach `target`, arriving
    /// at `arrival_time`.  Link functions are evaluated at the time the
    /// link is left, which is exact for time-invariant functions.
    pub fn all_to_one(
        &self,
        target: NodeId,
        arrival_time: f64,
        bound: SearchBound,
    ) -> NetworkResult<SearchTree> {
        self.run(target, arrival_time, SearchDirection::Backward, bound, None)
    }

    /// Least-cost path from `source` to `target`.  Stops as soon as `target`
    /// is settled.  `Ok(None)` means `target` is unreachable.
    pub fn point_to_point(
        &self,
        source: NodeId,
        target: NodeId,
        departure_time: f64,
    ) -> NetworkResult<Option<Path>> {
        if !self.network.contains_node(target) {
            return Err(NetworkError::NodeNotFound(target));
        }
        let tree = self.run(
            source,
            departure_time,
            SearchDirection::Forward,
            SearchBound::UNBOUNDED,
            Some(target),
        )?;
        let Some(label) = tree.label(target) else {
            return Ok(None);
        };
        let links = tree.path_to(self.network, target).unwrap_or_default();
        Ok(Some(Path {
            links,
            cost: label.cost,
            travel_time: label.time - departure_time,
            distance: label.distance,
        }))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Travel time and disutility of `link` at `time`, both validated.
    #[inline]
    fn link_costs(&self, link: LinkId, time: f64) -> NetworkResult<(f64, f64)> {
        let tt = self.travel_time.link_travel_time(self.network, link, time);
        check_cost(CostKind::TravelTime, link, time, tt)?;
        let cost = self.disutility.link_disutility(self.network, link, time);
        check_cost(CostKind::Disutility, link, time, cost)?;
        Ok((tt, cost))
    }

    fn run(
        &self,
        root: NodeId,
        root_time: f64,
        direction: SearchDirection,
        bound: SearchBound,
        target: Option<NodeId>,
    ) -> NetworkResult<SearchTree> {
        let network = self.network;
        if !network.contains_node(root) {
            return Err(NetworkError::NodeNotFound(root));
        }

        let mut labels = vec![SearchLabel::UNREACHED; network.node_count()];
        labels[root.index()] = SearchLabel {
            cost: 0.0,
            time: root_time,
            distance: 0.0,
            settled: false,
            pred_link: LinkId::INVALID,
        };
        let mut settled = 0usize;

        let mut frontier: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
        frontier.push(Reverse(FrontierEntry { cost: 0.0, node: root }));

        while let Some(Reverse(FrontierEntry { cost, node })) = frontier.pop() {
            let current = labels[node.index()];
            // Skip stale heap entries.
            if current.settled || cost > current.cost {
                continue;
            }
            if cost > bound.max_cost {
                break;
            }
            labels[node.index()].settled = true;
            settled += 1;
            if target == Some(node) {
                break;
            }

            let links = match direction {
                SearchDirection::Forward => network.out_links(node),
                SearchDirection::Backward => network.in_links(node),
            };
            for &link in links {
                let next = match direction {
                    SearchDirection::Forward => network.link_to[link.index()],
                    SearchDirection::Backward => network.link_from[link.index()],
                };
                let (tt, link_cost) = self.link_costs(link, current.time)?;
                let candidate = current.cost + link_cost;

                let next_label = &mut labels[next.index()];
                if next_label.settled {
                    if candidate < next_label.cost {
                        return Err(NetworkError::SettledLabelDecreased {
                            node: next,
                            link,
                            settled: next_label.cost,
                            candidate,
                        });
                    }
                    continue;
                }
                if candidate < next_label.cost {
                    *next_label = SearchLabel {
                        cost: candidate,
                        time: match direction {
                            SearchDirection::Forward => current.time + tt,
                            SearchDirection::Backward => current.time - tt,
                        },
                        distance: current.distance + network.link_length_m[link.index()],
                        settled: false,
                        pred_link: link,
                    };
                    frontier.push(Reverse(FrontierEntry { cost: candidate, node: next }));
                }
            }
        }

        Ok(SearchTree { root, direction, root_time, labels, settled })
    }
}

#[inline]
fn check_cost(kind: CostKind, link: LinkId, time: f64, value: f64) -> NetworkResult<()> {
    if !value.is_finite() {
        return Err(NetworkError::NonFiniteCost { kind, link, time, value });
    }
    if value < 0.0 {
        return Err(NetworkError::NegativeCost { kind, link, time, value });
    }
    Ok(())
}
