//! The executable circuit graph.
//!
//! A [`Circuit`] owns one bit [`Arena`] and a tree of [`Graph`] levels. Every
//! pin and signal is a sequence of [`BitId`]s into that arena, so a wire read
//! by many nodes is a single shared bit. Nodes of custom chips own their
//! subgraph, whose boundary pins are the node's own pins.

use std::collections::BTreeMap;

use nandsim_ir::{Arena, BitId, NodeId, Primitive};
use serde::{Deserialize, Serialize};

use crate::state::SequentialState;

/// Named bit sequences, least significant bit first.
pub type PinMap = BTreeMap<String, Vec<BitId>>;

/// One instantiated part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// The instantiated chip's name.
    pub chip: String,
    /// Set for built-in chips.
    pub primitive: Option<Primitive>,
    /// Input pins by name.
    pub input_pins: PinMap,
    /// Output pins by name.
    pub output_pins: PinMap,
    /// The chip's own graph, present only for custom chips.
    pub subgraph: Option<Box<Graph>>,
    /// Clocked storage, present only for sequential built-ins.
    pub state: Option<SequentialState>,
}

impl Node {
    /// Returns `true` for a node of a sequential built-in.
    pub fn is_sequential(&self) -> bool {
        self.primitive.is_some_and(Primitive::is_sequential)
    }
}

/// One level of the circuit: the parts of a single chip definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes in evaluation order.
    pub nodes: Vec<Node>,
    /// Boundary inputs.
    pub input_pins: PinMap,
    /// Boundary outputs.
    pub output_pins: PinMap,
    /// Internal signals.
    pub internal_signals: PinMap,
    /// Driver-to-reader adjacency that excludes signals driven from
    /// sequential state, as positions in `nodes`.
    pub edges: Vec<(NodeId, NodeId)>,
}

impl Graph {
    /// Total node count of this level and every level below it.
    pub fn total_nodes(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| 1 + n.subgraph.as_ref().map_or(0, |g| g.total_nodes()))
            .sum()
    }

    /// Calls `f` on every node at this level and below, parents first.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        for node in &self.nodes {
            f(node);
            if let Some(sub) = &node.subgraph {
                sub.walk(f);
            }
        }
    }
}

/// A fully wired chip ready for simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// The top-level graph.
    pub graph: Graph,
    /// Backing store for every wire bit.
    pub bits: Arena<BitId, bool>,
}

impl Circuit {
    /// Reads the bits of `ids` in order.
    pub fn read(&self, ids: &[BitId]) -> Vec<bool> {
        self.bits.read_all(ids)
    }
}
