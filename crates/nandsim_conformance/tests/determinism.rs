//! Loading the same sources twice yields the same definitions, the same
//! graph layout and the same behaviour.

use nandsim_config::{ResolverLimits, SimulatorSettings};
use nandsim_conformance::{fixture_names, fixtures, inputs, load, word};
use nandsim_graph::{build_circuit, Circuit, PinMap};
use nandsim_ir::ResolvedChipDefinition;
use nandsim_resolve::{resolve_chip, Resolved};

fn resolve(name: &str) -> (ResolvedChipDefinition, Resolved) {
    resolve_chip(name, &fixtures(), ResolverLimits::default()).unwrap()
}

/// Chip names and pin wiring of every node, parents first.
fn layout(circuit: &Circuit) -> Vec<(String, PinMap, PinMap)> {
    let mut nodes = Vec::new();
    circuit.graph.walk(&mut |node| {
        nodes.push((
            node.chip.clone(),
            node.input_pins.clone(),
            node.output_pins.clone(),
        ))
    });
    nodes
}

#[test]
fn resolution_is_repeatable() {
    for name in fixture_names() {
        assert_eq!(resolve(&name), resolve(&name), "{name}");
    }
}

#[test]
fn graph_layout_is_repeatable() {
    for name in ["CustomXor", "CustomAlu", "CustomRam8", "CustomPc", "CustomCpu"] {
        let (top, deps) = resolve(name);
        let first = build_circuit(&top, &deps, SimulatorSettings::default()).unwrap();
        let second = build_circuit(&top, &deps, SimulatorSettings::default()).unwrap();
        assert_eq!(first.graph.total_nodes(), second.graph.total_nodes(), "{name}");
        assert_eq!(first.bits.len(), second.bits.len(), "{name}");
        assert_eq!(layout(&first), layout(&second), "{name}");
        assert_eq!(first.graph.edges, second.graph.edges, "{name}");
    }
}

#[test]
fn identical_sessions_agree_cycle_by_cycle() {
    let mut a = load("CustomPc").unwrap();
    let mut b = load("CustomPc").unwrap();
    for i in 0..20u16 {
        let values = inputs([
            ("in", word(i * 3)),
            ("load", vec![i % 7 == 0]),
            ("inc", vec![i % 2 == 0]),
            ("reset", vec![i == 13]),
        ]);
        assert_eq!(a.tick(&values).unwrap(), b.tick(&values).unwrap(), "tick {i}");
        assert_eq!(a.tock(&values).unwrap(), b.tock(&values).unwrap(), "tock {i}");
    }
}
