//! Clocked evaluation of a built circuit.
//!
//! An [`Evaluator`] owns one [`Circuit`] and exposes the clock protocol:
//!
//! - [`Evaluator::set_inputs`] writes boundary inputs without propagating.
//! - [`Evaluator::evaluate`] recomputes every wire from the inputs and the
//!   committed sequential state.
//! - [`Evaluator::apply`] stages next state from the current wires.
//! - [`Evaluator::commit`] makes staged state visible and re-evaluates.
//!
//! [`Evaluator::tick`] and [`Evaluator::tock`] bundle these into the two
//! halves of a clock cycle. None of these operations can fail.

use std::collections::BTreeMap;

use log::warn;
use nandsim_graph::{Circuit, Graph, PinMap};
use nandsim_ir::{Arena, BitId};
use serde::{Deserialize, Serialize};

use crate::primitives;

/// Bit values keyed by pin or signal name, least significant bit first.
pub type Values = BTreeMap<String, Vec<bool>>;

/// The externally visible wires of a chip at one moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Boundary outputs.
    pub outputs: Values,
    /// Internal signals of the top-level chip.
    pub internals: Values,
}

/// Runs the clock protocol over one circuit.
#[derive(Debug, Clone)]
pub struct Evaluator {
    circuit: Circuit,
}

impl Evaluator {
    /// Wraps a built circuit. Wires start low and state starts zeroed.
    pub fn new(circuit: Circuit) -> Self {
        Self { circuit }
    }

    /// The circuit being simulated.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Overwrites the named boundary inputs.
    ///
    /// Inputs not named keep their value. Unknown names are skipped, and a
    /// value of the wrong width is truncated or zero-extended.
    pub fn set_inputs(&mut self, inputs: &Values) {
        let Circuit { graph, bits } = &mut self.circuit;
        for (name, values) in inputs {
            let Some(ids) = graph.input_pins.get(name) else {
                warn!("ignoring unknown input '{name}'");
                continue;
            };
            if ids.len() != values.len() {
                warn!(
                    "input '{name}' is {} bits wide, got {} values",
                    ids.len(),
                    values.len()
                );
            }
            for (i, &id) in ids.iter().enumerate() {
                bits[id] = values.get(i).copied().unwrap_or(false);
            }
        }
    }

    /// Recomputes every wire in evaluation order.
    ///
    /// Sequential outputs are refreshed from committed state before the
    /// ordered pass, so no reader sees a value left over from earlier state.
    pub fn evaluate(&mut self) {
        let Circuit { graph, bits } = &mut self.circuit;
        drive_sequential(graph, bits);
        evaluate_level(graph, bits);
    }

    /// Stages the next state of every sequential built-in from the current
    /// wires. Outputs are untouched.
    pub fn apply(&mut self) {
        let Circuit { graph, bits } = &mut self.circuit;
        apply_level(graph, bits);
    }

    /// Makes staged state visible, then re-evaluates.
    pub fn commit(&mut self) {
        commit_level(&mut self.circuit.graph);
        self.evaluate();
    }

    /// The rising clock edge: evaluates under `inputs`, latches the result
    /// into sequential state and returns the wires after the new state is
    /// visible.
    pub fn tick(&mut self, inputs: &Values) -> Snapshot {
        self.set_inputs(inputs);
        self.evaluate();
        self.apply();
        self.commit();
        self.outputs_and_internal_pins()
    }

    /// The falling clock edge: evaluates under `inputs` without any state
    /// transition.
    pub fn tock(&mut self, inputs: &Values) -> Snapshot {
        self.set_inputs(inputs);
        self.evaluate();
        self.outputs_and_internal_pins()
    }

    /// Reads the boundary outputs and top-level internal signals.
    pub fn outputs_and_internal_pins(&self) -> Snapshot {
        let graph = &self.circuit.graph;
        Snapshot {
            outputs: read_pins(&graph.output_pins, &self.circuit.bits),
            internals: read_pins(&graph.internal_signals, &self.circuit.bits),
        }
    }
}

fn read_pins(pins: &PinMap, bits: &Arena<BitId, bool>) -> Values {
    pins.iter()
        .map(|(name, ids)| (name.clone(), bits.read_all(ids)))
        .collect()
}

fn drive_sequential(graph: &Graph, bits: &mut Arena<BitId, bool>) {
    graph.walk(&mut |node| {
        if let Some(primitive) = node.primitive.filter(|p| p.is_sequential()) {
            primitives::evaluate(primitive, node, bits);
        }
    });
}

fn evaluate_level(graph: &Graph, bits: &mut Arena<BitId, bool>) {
    for node in &graph.nodes {
        match (node.primitive, node.subgraph.as_deref()) {
            (Some(primitive), _) => primitives::evaluate(primitive, node, bits),
            (None, Some(sub)) => evaluate_level(sub, bits),
            (None, None) => {}
        }
    }
}

fn apply_level(graph: &mut Graph, bits: &Arena<BitId, bool>) {
    for node in &mut graph.nodes {
        if let Some(sub) = node.subgraph.as_deref_mut() {
            apply_level(sub, bits);
        } else if let Some(primitive) = node.primitive.filter(|p| p.is_sequential()) {
            primitives::apply(primitive, node, bits);
        }
    }
}

fn commit_level(graph: &mut Graph) {
    for node in &mut graph.nodes {
        if let Some(state) = node.state.as_mut() {
            state.commit();
        }
        if let Some(sub) = node.subgraph.as_deref_mut() {
            commit_level(sub);
        }
    }
}
