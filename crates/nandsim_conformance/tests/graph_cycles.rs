//! Combinational loops are rejected at build time; clocked loops are not.

use nandsim_config::SimulatorSettings;
use nandsim_conformance::{fixtures, load};
use nandsim_graph::{build_circuit, GraphError};
use nandsim_resolve::{resolve_chip, source_map};
use nandsim_sim::{HardwareSimulator, SimError};

fn build(name: &str, src: &str) -> Result<nandsim_graph::Circuit, GraphError> {
    let sources = source_map([(name, src)]);
    let (top, deps) = resolve_chip(name, &sources, Default::default()).unwrap();
    build_circuit(&top, &deps, SimulatorSettings::default())
}

#[test]
fn nand_feedback_is_rejected() {
    let src = "CHIP CustomChip {
                    IN a, b;
                    OUT out;

                    PARTS:
                    Nand(a=nandout2, b=b, out=nandout1);
                    Nand(a=a, b=nandout1, out=nandout2);
                }";
    let err = build("CustomChip", src).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Graph has cycles, cannot determine topological order"
    );
}

#[test]
fn dff_feedback_builds_two_nodes() {
    let src = "CHIP CustomChip {
                    IN a, b;
                    OUT out;

                    PARTS:
                    Nand(a=nandout2, b=b, out=nandout1);
                    DFF(in=nandout1, out=nandout2);
                }";
    let circuit = build("CustomChip", src).unwrap();
    assert_eq!(circuit.graph.nodes.len(), 2);
}

#[test]
fn loop_through_custom_chips_is_rejected() {
    let mut sources = fixtures();
    sources.insert(
        "Ring".into(),
        "CHIP Ring {
    IN a;
    OUT out;

    PARTS:
    CustomAnd(a=a, b=back, out=forward);
    CustomNot(in=forward, out=back);
    CustomOr(a=forward, b=false, out=out);
}"
        .into(),
    );
    let mut sim = HardwareSimulator::new();
    sim.set_sources(sources);
    let err = sim.process("Ring").unwrap_err();
    assert!(matches!(err, SimError::Graph(GraphError::Cycle)));
}

#[test]
fn every_fixture_builds() {
    for name in nandsim_conformance::fixture_names() {
        if let Err(err) = load(&name) {
            panic!("{name}: {err}");
        }
    }
}
