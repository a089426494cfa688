//! Resolved chip definitions.
//!
//! A [`ResolvedChipDefinition`] is the validated form of a parsed chip: every
//! connection names a concrete pin range and a concrete signal range of equal
//! width, and every signal is classified as a chip input, chip output,
//! internal wire or constant. Definitions are immutable once produced.

use crate::primitive::Primitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// An inclusive range of bit indices, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitRange {
    /// First bit index.
    pub start: u32,
    /// Last bit index.
    pub end: u32,
}

impl BitRange {
    /// Creates a range; callers guarantee `start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// The range covering every bit of a `width`-bit value.
    pub fn full(width: u32) -> Self {
        Self::new(0, width.saturating_sub(1))
    }

    /// Number of bits in the range.
    pub fn width(self) -> u32 {
        self.end - self.start + 1
    }

    /// The bit indices in ascending order.
    pub fn indices(self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

/// What a connection's signal name refers to in the enclosing chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A boundary input of the enclosing chip.
    Input,
    /// A boundary output of the enclosing chip.
    Output,
    /// A wire declared implicitly by the first part output driving it.
    Internal,
    /// The literal `true` or `false`, replicated across the range.
    Constant(bool),
}

/// The part-local side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinBinding {
    /// Pin name on the instantiated chip.
    pub name: String,
    /// Bits of the pin being bound.
    pub range: BitRange,
}

/// The enclosing-chip side of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalBinding {
    /// Signal name (`true`/`false` for constants).
    pub name: String,
    /// What the name refers to.
    pub kind: SignalKind,
    /// Bits of the signal being bound.
    pub range: BitRange,
}

/// A width-matched pin-to-signal binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The pin side.
    pub pin: PinBinding,
    /// The signal side.
    pub signal: SignalBinding,
}

/// One instantiated part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Name of the instantiated chip.
    pub chip: String,
    /// Set when the chip is a built-in.
    pub primitive: Option<Primitive>,
    /// Connections to the part's input pins, in source order.
    pub input_connections: Vec<Connection>,
    /// Connections from the part's output pins, in source order.
    pub output_connections: Vec<Connection>,
}

/// A fully validated chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChipDefinition {
    /// The chip name.
    pub name: String,
    /// Boundary inputs, name to width.
    pub inputs: BTreeMap<String, u32>,
    /// Boundary outputs, name to width.
    pub outputs: BTreeMap<String, u32>,
    /// Internal wires, name to width.
    pub internal_signals: BTreeMap<String, u32>,
    /// Parts in source order.
    pub parts: Vec<Part>,
}

impl ResolvedChipDefinition {
    /// Distinct custom (non-built-in) chip names used by parts, in
    /// first-use order.
    pub fn custom_dependencies(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for part in self.parts.iter().filter(|p| p.primitive.is_none()) {
            if !names.contains(&part.chip.as_str()) {
                names.push(&part.chip);
            }
        }
        names
    }
}
