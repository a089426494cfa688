//! Wiring resolved chip definitions into a [`Circuit`].
//!
//! Construction runs in three passes:
//!
//! 1. **Allocate.** Every pin and signal at every level gets fresh
//!    provisional bits, and every connection records which provisional bits
//!    are the same wire. A custom part's subgraph reuses the part's own pin
//!    bits as its boundary.
//! 2. **Canonicalize.** A union-find over the recorded links collapses each
//!    wire to one dense [`BitId`] in the circuit's arena. Because aliasing is
//!    settled after every connection is known, the result does not depend on
//!    the order parts are written in.
//! 3. **Order.** Each level sorts its nodes topologically over the
//!    driver-to-reader adjacency. Wires driven from registered state are
//!    ignored, as are the `in` and `load` inputs of a RAM. A RAM's output
//!    still follows its `address`. A cycle that remains is a combinational
//!    loop and is fatal.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use nandsim_config::SimulatorSettings;
use nandsim_ir::{
    Arena, BitId, BitRange, NodeId, Part, PinBinding, Primitive, ResolvedChipDefinition,
    SignalBinding, SignalKind,
};
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;

use crate::error::GraphError;
use crate::graph::{Circuit, Graph, Node, PinMap};
use crate::state::SequentialState;

/// Provisional bits reserved for the constants `false` and `true`.
const CONSTANT_BITS: [u32; 2] = [0, 1];

/// Builds circuits from a set of resolved definitions.
pub struct GraphBuilder<'d> {
    definitions: &'d BTreeMap<String, ResolvedChipDefinition>,
    settings: SimulatorSettings,
    next_bit: u32,
    links: Vec<(u32, u32)>,
    registered: Vec<u32>,
}

impl<'d> GraphBuilder<'d> {
    /// Creates a builder over `definitions`, which must contain the chip to
    /// build and every custom chip it uses.
    pub fn new(
        definitions: &'d BTreeMap<String, ResolvedChipDefinition>,
        settings: SimulatorSettings,
    ) -> Self {
        Self {
            definitions,
            settings,
            next_bit: CONSTANT_BITS.len() as u32,
            links: Vec::new(),
            registered: Vec::new(),
        }
    }

    /// Builds the circuit for `chip`, allocating fresh boundary pins.
    pub fn build_graph(mut self, chip: &str) -> Result<Circuit, GraphError> {
        let def = self.definition(chip)?;
        let inputs = self.fresh_pins(def.inputs.iter().map(|(n, w)| (n.as_str(), *w)));
        let outputs = self.fresh_pins(def.outputs.iter().map(|(n, w)| (n.as_str(), *w)));
        let mut graph = self.build_level(def, inputs, outputs)?;

        let (canonical, bits, registered) = self.canonicalize();
        remap(&mut graph, &canonical);
        order(&mut graph, &registered, self.settings.sequential_ordering_hints)?;

        info!(
            "built circuit '{}': {} nodes, {} bits",
            chip,
            graph.total_nodes(),
            bits.len()
        );
        Ok(Circuit { graph, bits })
    }

    fn definition(&self, name: &str) -> Result<&'d ResolvedChipDefinition, GraphError> {
        let definitions: &'d BTreeMap<String, ResolvedChipDefinition> = self.definitions;
        definitions
            .get(name)
            .ok_or_else(|| GraphError::UnknownChip(name.to_string()))
    }

    fn fresh(&mut self, width: u32) -> Vec<BitId> {
        let start = self.next_bit;
        self.next_bit += width;
        (start..self.next_bit).map(BitId::from_raw).collect()
    }

    fn fresh_pins<'n>(&mut self, shape: impl Iterator<Item = (&'n str, u32)>) -> PinMap {
        shape
            .map(|(name, width)| (name.to_string(), self.fresh(width)))
            .collect()
    }

    fn link(&mut self, a: &[BitId], b: &[BitId]) {
        self.links
            .extend(a.iter().zip(b).map(|(x, y)| (x.as_raw(), y.as_raw())));
    }

    fn build_level(
        &mut self,
        def: &'d ResolvedChipDefinition,
        input_pins: PinMap,
        output_pins: PinMap,
    ) -> Result<Graph, GraphError> {
        debug!("wiring chip '{}' ({} parts)", def.name, def.parts.len());
        let internal_signals =
            self.fresh_pins(def.internal_signals.iter().map(|(n, w)| (n.as_str(), *w)));
        let mut level = Graph {
            nodes: Vec::with_capacity(def.parts.len()),
            input_pins,
            output_pins,
            internal_signals,
            edges: Vec::new(),
        };
        for part in &def.parts {
            let node = self.build_node(def, part, &level)?;
            level.nodes.push(node);
        }
        Ok(level)
    }

    fn build_node(
        &mut self,
        parent: &ResolvedChipDefinition,
        part: &'d Part,
        level: &Graph,
    ) -> Result<Node, GraphError> {
        let custom = match part.primitive {
            Some(_) => None,
            None => Some(self.definition(&part.chip)?),
        };
        let (input_pins, output_pins) = match (part.primitive, custom) {
            (Some(prim), _) => (
                self.fresh_pins(prim.inputs().iter().map(|p| (p.name, p.width))),
                self.fresh_pins(prim.outputs().iter().map(|p| (p.name, p.width))),
            ),
            (None, Some(def)) => (
                self.fresh_pins(def.inputs.iter().map(|(n, w)| (n.as_str(), *w))),
                self.fresh_pins(def.outputs.iter().map(|(n, w)| (n.as_str(), *w))),
            ),
            (None, None) => return Err(GraphError::UnknownChip(part.chip.clone())),
        };

        if part.primitive.is_some_and(Primitive::is_registered) {
            self.registered
                .extend(output_pins.values().flatten().map(|b| b.as_raw()));
        }

        for conn in &part.input_connections {
            let pin = pin_bits(&input_pins, &part.chip, &conn.pin)?;
            match conn.signal.kind {
                SignalKind::Constant(value) => {
                    let constant = CONSTANT_BITS[usize::from(value)];
                    self.links
                        .extend(pin.iter().map(|b| (b.as_raw(), constant)));
                }
                _ => {
                    let signal = signal_bits(level, &parent.name, &conn.signal)?;
                    self.link(pin, signal);
                }
            }
        }
        for conn in &part.output_connections {
            let pin = pin_bits(&output_pins, &part.chip, &conn.pin)?;
            let signal = signal_bits(level, &parent.name, &conn.signal)?;
            self.link(pin, signal);
        }

        let subgraph = match custom {
            Some(def) => Some(Box::new(self.build_level(
                def,
                input_pins.clone(),
                output_pins.clone(),
            )?)),
            None => None,
        };

        Ok(Node {
            chip: part.chip.clone(),
            primitive: part.primitive,
            input_pins,
            output_pins,
            subgraph,
            state: part.primitive.and_then(SequentialState::for_primitive),
        })
    }

    /// Collapses linked provisional bits into dense arena bits.
    ///
    /// Returns the canonical bit of every provisional bit, the arena with
    /// constant wires preset, and a per-bit flag marking wires driven from
    /// registered state.
    fn canonicalize(&self) -> (Vec<BitId>, Arena<BitId, bool>, Vec<bool>) {
        let total = self.next_bit as usize;
        let mut sets: UnionFind<u32> = UnionFind::new(total);
        for &(a, b) in &self.links {
            sets.union(a, b);
        }

        let mut dense: Vec<Option<BitId>> = vec![None; total];
        let mut bits = Arena::with_capacity(total);
        let mut canonical = Vec::with_capacity(total);
        for raw in 0..self.next_bit {
            let root = sets.find(raw) as usize;
            let id = *dense[root].get_or_insert_with(|| bits.alloc(false));
            canonical.push(id);
        }
        bits[canonical[CONSTANT_BITS[1] as usize]] = true;

        let mut registered = vec![false; bits.len()];
        for &raw in &self.registered {
            registered[canonical[raw as usize].as_raw() as usize] = true;
        }
        debug!(
            "canonicalized {} provisional bits into {} wires",
            total,
            bits.len()
        );
        (canonical, bits, registered)
    }
}

/// Builds the circuit for `top`, whose custom parts are defined in
/// `dependencies`.
pub fn build_circuit(
    top: &ResolvedChipDefinition,
    dependencies: &BTreeMap<String, ResolvedChipDefinition>,
    settings: SimulatorSettings,
) -> Result<Circuit, GraphError> {
    let mut definitions = dependencies.clone();
    definitions.insert(top.name.clone(), top.clone());
    GraphBuilder::new(&definitions, settings).build_graph(&top.name)
}

fn slice<'b>(bits: &'b [BitId], range: BitRange) -> Option<&'b [BitId]> {
    bits.get(range.start as usize..=range.end as usize)
}

fn pin_bits<'p>(
    pins: &'p PinMap,
    chip: &str,
    pin: &PinBinding,
) -> Result<&'p [BitId], GraphError> {
    pins.get(&pin.name)
        .and_then(|bits| slice(bits, pin.range))
        .ok_or_else(|| GraphError::UnknownPin {
            chip: chip.to_string(),
            pin: pin.name.clone(),
        })
}

fn signal_bits<'g>(
    level: &'g Graph,
    chip: &str,
    signal: &SignalBinding,
) -> Result<&'g [BitId], GraphError> {
    let pins = match signal.kind {
        SignalKind::Input => Some(&level.input_pins),
        SignalKind::Output => Some(&level.output_pins),
        SignalKind::Internal => Some(&level.internal_signals),
        SignalKind::Constant(_) => None,
    };
    pins.and_then(|p| p.get(&signal.name))
        .and_then(|bits| slice(bits, signal.range))
        .ok_or_else(|| GraphError::UnknownSignal {
            chip: chip.to_string(),
            signal: signal.name.clone(),
            start: signal.range.start,
            end: signal.range.end,
        })
}

fn remap_pins(pins: &mut PinMap, canonical: &[BitId]) {
    for bit in pins.values_mut().flatten() {
        *bit = canonical[bit.as_raw() as usize];
    }
}

fn remap(graph: &mut Graph, canonical: &[BitId]) {
    remap_pins(&mut graph.input_pins, canonical);
    remap_pins(&mut graph.output_pins, canonical);
    remap_pins(&mut graph.internal_signals, canonical);
    for node in &mut graph.nodes {
        remap_pins(&mut node.input_pins, canonical);
        remap_pins(&mut node.output_pins, canonical);
        if let Some(sub) = node.subgraph.as_deref_mut() {
            remap(sub, canonical);
        }
    }
}

/// Sorts every level into evaluation order, innermost levels first.
///
/// With `hints` set, skipped edges are added back wherever they do not close
/// a cycle, so a reader of a flip-flop follows it whenever that is possible.
fn order(graph: &mut Graph, registered: &[bool], hints: bool) -> Result<(), GraphError> {
    for node in &mut graph.nodes {
        if let Some(sub) = node.subgraph.as_deref_mut() {
            order(sub, registered, hints)?;
        }
    }

    let count = graph.nodes.len();
    let mut drivers: HashMap<BitId, usize> = HashMap::new();
    for (index, node) in graph.nodes.iter().enumerate() {
        for &bit in node.output_pins.values().flatten() {
            drivers.insert(bit, index);
        }
    }

    let mut combinational = BTreeSet::new();
    let mut clocked = BTreeSet::new();
    for (reader, node) in graph.nodes.iter().enumerate() {
        for (pin, bits) in &node.input_pins {
            let sampled = node.primitive.is_some_and(|p| p.is_clocked_input(pin));
            for bit in bits {
                let Some(&driver) = drivers.get(bit) else {
                    continue;
                };
                if sampled || registered[bit.as_raw() as usize] {
                    clocked.insert((driver, reader));
                } else {
                    combinational.insert((driver, reader));
                }
            }
        }
    }

    let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(count, combinational.len());
    for _ in 0..count {
        dag.add_node(());
    }
    for &(driver, reader) in &combinational {
        dag.add_edge(NodeIndex::new(driver), NodeIndex::new(reader), ());
    }
    if toposort(&dag, None).is_err() {
        return Err(GraphError::Cycle);
    }

    let mut hinted = 0;
    if hints {
        for &(driver, reader) in &clocked {
            if driver == reader || combinational.contains(&(driver, reader)) {
                continue;
            }
            let (from, to) = (NodeIndex::new(driver), NodeIndex::new(reader));
            if !has_path_connecting(&dag, to, from, None) {
                dag.add_edge(from, to, ());
                hinted += 1;
            }
        }
    }
    let sorted = toposort(&dag, None).map_err(|_| GraphError::Cycle)?;

    let mut position = vec![0usize; count];
    let mut slots: Vec<Option<Node>> = graph.nodes.drain(..).map(Some).collect();
    let mut nodes = Vec::with_capacity(count);
    for (new, old) in sorted.iter().enumerate() {
        position[old.index()] = new;
        if let Some(node) = slots[old.index()].take() {
            nodes.push(node);
        }
    }
    graph.nodes = nodes;
    graph.edges = combinational
        .iter()
        .map(|&(d, r)| {
            (
                NodeId::from_raw(position[d] as u32),
                NodeId::from_raw(position[r] as u32),
            )
        })
        .collect();
    debug!(
        "ordered {} nodes over {} edges, {} ordering hints",
        count,
        graph.edges.len(),
        hinted
    );
    Ok(())
}
