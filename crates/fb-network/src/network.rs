//! Link network representation and builder.
//!
//! # Data layout
//!
//! Links are stored in insertion order, so a `LinkId` is a direct index into
//! `links`.  Outgoing links per node use **Compressed Sparse Row (CSR)**
//! format over a separate, source-sorted index:
//!
//! ```text
//! out_links[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Iteration over a node's outgoing links is a contiguous memory scan, which
//! keeps the router's inner loop tight.

use fb_core::{LinkId, NodeId};

use crate::{NetworkError, NetworkResult};

// ── Link ──────────────────────────────────────────────────────────────────────

/// A directed network link.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub id:            LinkId,
    pub from:          NodeId,
    pub to:            NodeId,
    /// Physical length in metres.
    pub length_m:      f64,
    /// Free-flow speed in metres per second.
    pub freespeed_mps: f64,
}

impl Link {
    /// Travel time in seconds at free-flow speed.
    #[inline]
    pub fn freespeed_travel_time(&self) -> f64 {
        self.length_m / self.freespeed_mps
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed link graph plus a CSR out-link index.
///
/// Do not construct directly; use [`NetworkBuilder`] or the CSV loader.
pub struct Network {
    links:          Vec<Link>,
    node_count:     usize,
    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    /// Link ids sorted by source node.
    out_links:      Vec<LinkId>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Look up a link by id.
    #[inline]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.index())
    }

    /// Like [`link`](Self::link) but with a typed error for unknown ids.
    pub fn require_link(&self, id: LinkId) -> NetworkResult<&Link> {
        self.link(id).ok_or(NetworkError::LinkNotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: LinkId) -> bool {
        id.index() < self.links.len()
    }

    /// Every link in the network, in id order.
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    /// Outgoing links of `node`.  Empty for unknown nodes.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[LinkId] {
        if node.index() >= self.node_count {
            return &[];
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        &self.out_links[start..end]
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use fb_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node();
/// let c = b.add_node();
/// b.add_road(a, c, 1_200.0, 13.9);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.link_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    node_count: usize,
    links:      Vec<Link>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(links: usize) -> Self {
        Self { node_count: 0, links: Vec::with_capacity(links) }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.node_count as u32);
        self.node_count += 1;
        id
    }

    /// Grow the node set so that `node` is a valid id.
    pub fn ensure_node(&mut self, node: NodeId) {
        self.node_count = self.node_count.max(node.index() + 1);
    }

    /// Add a **directed** link and return its id (sequential from 0).
    pub fn add_link(&mut self, from: NodeId, to: NodeId, length_m: f64, freespeed_mps: f64) -> LinkId {
        debug_assert!(freespeed_mps > 0.0, "freespeed must be positive");
        self.ensure_node(from);
        self.ensure_node(to);
        let id = LinkId(self.links.len() as u32);
        self.links.push(Link { id, from, to, length_m, freespeed_mps });
        id
    }

    /// Add links in **both directions**; returns `(a→b, b→a)`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, freespeed_mps: f64) -> (LinkId, LinkId) {
        (
            self.add_link(a, b, length_m, freespeed_mps),
            self.add_link(b, a, length_m, freespeed_mps),
        )
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Consume the builder and produce a [`Network`].
    pub fn build(self) -> Network {
        let node_count = self.node_count;

        let mut out_links: Vec<LinkId> = self.links.iter().map(|l| l.id).collect();
        out_links.sort_unstable_by_key(|id| (self.links[id.index()].from, *id));

        let mut node_out_start = vec![0u32; node_count + 1];
        for link in &self.links {
            node_out_start[link.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, self.links.len());

        Network { links: self.links, node_count, node_out_start, out_links }
    }
}
