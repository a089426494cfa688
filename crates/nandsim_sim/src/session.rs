//! The host-facing simulator session.
//!
//! A [`HardwareSimulator`] holds the HDL sources of a project and at most one
//! loaded chip. [`HardwareSimulator::process`] runs the whole load pipeline
//! (parse, resolve, build) and replaces the loaded chip; the clock methods
//! then drive it.

use std::collections::BTreeMap;

use log::info;
use nandsim_config::SimConfig;
use nandsim_graph::build_circuit;
use nandsim_resolve::{resolve_chip, SourceMap};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::evaluator::{Evaluator, Snapshot, Values};

/// Boundary shape of a loaded chip: pin name to bit width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipInterface {
    /// Input pins.
    pub inputs: BTreeMap<String, u32>,
    /// Output pins.
    pub outputs: BTreeMap<String, u32>,
}

/// A simulation session over a set of HDL sources.
#[derive(Debug, Clone, Default)]
pub struct HardwareSimulator {
    sources: SourceMap,
    config: SimConfig,
    evaluator: Option<Evaluator>,
}

impl HardwareSimulator {
    /// Creates an empty session with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with the given configuration.
    pub fn with_config(config: SimConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replaces the source map. The loaded chip, if any, keeps running.
    pub fn set_sources(&mut self, sources: SourceMap) {
        self.sources = sources;
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns `true` once a chip has been loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.evaluator.is_some()
    }

    /// Loads `chip`, replacing any previously loaded chip.
    ///
    /// On failure nothing is loaded afterwards.
    pub fn process(&mut self, chip: &str) -> Result<ChipInterface, SimError> {
        self.evaluator = None;
        if !self.sources.contains_key(chip) {
            return Err(SimError::ChipNotFound(chip.to_string()));
        }
        let (top, dependencies) = resolve_chip(chip, &self.sources, self.config.limits)?;
        let circuit = build_circuit(&top, &dependencies, self.config.simulator)?;
        let mut evaluator = Evaluator::new(circuit);
        evaluator.evaluate();
        self.evaluator = Some(evaluator);
        info!(
            "loaded chip '{}' ({} custom dependencies)",
            chip,
            dependencies.len()
        );
        Ok(ChipInterface {
            inputs: top.inputs,
            outputs: top.outputs,
        })
    }

    fn loaded(&mut self) -> Result<&mut Evaluator, SimError> {
        self.evaluator.as_mut().ok_or(SimError::NoChipLoaded)
    }

    /// Sets `inputs` and evaluates without a clock edge.
    pub fn evaluate(&mut self, inputs: &Values) -> Result<Snapshot, SimError> {
        let evaluator = self.loaded()?;
        evaluator.set_inputs(inputs);
        evaluator.evaluate();
        Ok(evaluator.outputs_and_internal_pins())
    }

    /// Runs the rising clock edge under `inputs`.
    pub fn tick(&mut self, inputs: &Values) -> Result<Snapshot, SimError> {
        Ok(self.loaded()?.tick(inputs))
    }

    /// Runs the falling clock edge under `inputs`.
    pub fn tock(&mut self, inputs: &Values) -> Result<Snapshot, SimError> {
        Ok(self.loaded()?.tock(inputs))
    }

    /// The current wires of the loaded chip.
    pub fn snapshot(&self) -> Result<Snapshot, SimError> {
        self.evaluator
            .as_ref()
            .map(Evaluator::outputs_and_internal_pins)
            .ok_or(SimError::NoChipLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nandsim_resolve::source_map;

    const NOT: &str = "CHIP Not { IN in; OUT out; PARTS: Nand(a=in, b=in, out=out); }";

    fn values(pairs: &[(&str, bool)]) -> Values {
        pairs
            .iter()
            .map(|&(name, bit)| (name.to_string(), vec![bit]))
            .collect()
    }

    #[test]
    fn simulation_requires_a_loaded_chip() {
        let mut sim = HardwareSimulator::new();
        assert!(matches!(sim.tick(&Values::new()), Err(SimError::NoChipLoaded)));
        assert!(matches!(sim.snapshot(), Err(SimError::NoChipLoaded)));
    }

    #[test]
    fn process_reports_interface() {
        let mut sim = HardwareSimulator::new();
        sim.set_sources(source_map([("Not", NOT)]));
        let interface = sim.process("Not").unwrap();
        assert_eq!(interface.inputs.get("in"), Some(&1));
        assert_eq!(interface.outputs.get("out"), Some(&1));

        let snap = sim.evaluate(&values(&[("in", true)])).unwrap();
        assert_eq!(snap.outputs["out"], vec![false]);
    }

    #[test]
    fn failed_load_unloads_previous_chip() {
        let mut sim = HardwareSimulator::new();
        sim.set_sources(source_map([("Not", NOT), ("Broken", "CHIP Broken {")]));
        sim.process("Not").unwrap();
        assert!(sim.is_loaded());

        let err = sim.process("Missing").unwrap_err();
        assert_eq!(err.to_string(), "Chip 'Missing' not found");
        assert!(!sim.is_loaded());

        sim.process("Not").unwrap();
        assert!(matches!(sim.process("Broken"), Err(SimError::Resolve(_))));
        assert!(!sim.is_loaded());
    }

    #[test]
    fn configured_limits_apply() {
        let config = nandsim_config::load_config_from_str("[limits]\nmax_parts = 1\n").unwrap();
        let src = "CHIP Two { IN a; OUT o; PARTS: Not(in=a, out=x); Not(in=x, out=o); }";
        let mut sim = HardwareSimulator::with_config(config);
        sim.set_sources(source_map([("Two", src)]));
        let err = sim.process("Two").unwrap_err();
        assert!(err.to_string().contains("Number of parts exceeds maximum allowed"), "{err}");
    }

    #[test]
    fn session_keeps_its_config() {
        let config =
            nandsim_config::load_config_from_str("[simulator]\nsequential_ordering_hints = false\n")
                .unwrap();
        let mut sim = HardwareSimulator::with_config(config);
        assert!(!sim.config().simulator.sequential_ordering_hints);
        sim.set_sources(source_map([("Not", NOT)]));
        sim.process("Not").unwrap();
        let snap = sim.tock(&values(&[("in", false)])).unwrap();
        assert_eq!(snap.outputs["out"], vec![true]);
    }

    #[test]
    fn config_errors_convert() {
        let err = nandsim_config::load_config_from_str("[limits]\nmin_io_width = 0\n").unwrap_err();
        assert!(matches!(SimError::from(err), SimError::Config(_)));
    }
}
