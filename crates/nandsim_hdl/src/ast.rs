//! AST node types produced by the chip HDL parser.
//!
//! The tree mirrors the surface syntax one-to-one: a chip name, ordered input
//! and output declarations, and ordered parts with their `pin = signal`
//! connections. Every node keeps the [`Loc`] of its first token so later
//! stages can report errors against the source text.

use serde::{Deserialize, Serialize};

/// A 1-based line/column position in HDL source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Loc {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1. Tabs advance it by 4.
    pub column: u32,
}

impl Loc {
    /// Creates a location from a line and column.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A parsed `CHIP` definition.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ParsedChipDefinition {
    /// The declared chip name.
    pub name: ChipName,
    /// Input declarations in source order.
    pub inputs: Vec<IoDecl>,
    /// Output declarations in source order.
    pub outputs: Vec<IoDecl>,
    /// Part instantiations in source order.
    pub parts: Vec<PartDecl>,
}

impl ParsedChipDefinition {
    /// Returns the distinct chip names used by parts, in first-use order.
    pub fn used_chip_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for part in &self.parts {
            if !names.contains(&part.name.as_str()) {
                names.push(&part.name);
            }
        }
        names
    }
}

/// The chip name following the `CHIP` keyword.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChipName {
    /// The name text.
    pub name: String,
    /// Location of the name token.
    pub loc: Loc,
}

/// One entry of an `IN` or `OUT` list, e.g. `a` or `in[16]`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IoDecl {
    /// The pin name.
    pub name: String,
    /// Declared width; 1 when no `[n]` suffix is given.
    pub width: u32,
    /// Location of the name token.
    pub loc: Loc,
}

/// A part instantiation such as `Nand(a=x, b=y, out=z);`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PartDecl {
    /// Name of the instantiated chip.
    pub name: String,
    /// Location of the chip name token.
    pub loc: Loc,
    /// Connections in source order.
    pub connections: Vec<ConnectionDecl>,
}

/// A single `pin = signal` binding inside a part.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ConnectionDecl {
    /// The part-local pin side.
    pub pin: PinRef,
    /// The enclosing-chip signal side.
    pub signal: SignalRef,
    /// Location of the pin name token.
    pub loc: Loc,
}

/// An inclusive bit range written as `[n]` or `[n..m]`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RangeDecl {
    /// First bit index.
    pub start: u32,
    /// Last bit index (equal to `start` for the `[n]` form).
    pub end: u32,
    /// Location of the first number inside the brackets.
    pub loc: Loc,
}

/// The pin side of a connection.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PinRef {
    /// The pin name on the instantiated part.
    pub name: String,
    /// Optional sub-range of the pin.
    pub range: Option<RangeDecl>,
    /// Location of the pin name token.
    pub loc: Loc,
}

impl PinRef {
    /// Location used when reporting range problems: the range itself when
    /// one is written, otherwise the pin name.
    pub fn range_loc(&self) -> Loc {
        self.range.map_or(self.loc, |r| r.loc)
    }
}

/// The signal side of a connection.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignalRef {
    /// Signal name, or `true` / `false` for constants.
    pub name: String,
    /// Optional sub-range of the signal.
    pub range: Option<RangeDecl>,
    /// Location of the signal name token.
    pub loc: Loc,
}

impl SignalRef {
    /// Returns `true` for the constant signals `true` and `false`.
    pub fn is_constant(&self) -> bool {
        self.name == "true" || self.name == "false"
    }

    /// Location used when reporting range problems.
    pub fn range_loc(&self) -> Loc {
        self.range.map_or(self.loc, |r| r.loc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(name: &str) -> PartDecl {
        PartDecl {
            name: name.into(),
            loc: Loc::new(1, 1),
            connections: Vec::new(),
        }
    }

    #[test]
    fn used_chip_names_are_distinct_and_ordered() {
        let chip = ParsedChipDefinition {
            name: ChipName {
                name: "Top".into(),
                loc: Loc::new(1, 6),
            },
            inputs: Vec::new(),
            outputs: Vec::new(),
            parts: vec![part("Nand"), part("Not"), part("Nand"), part("DFF")],
        };
        assert_eq!(chip.used_chip_names(), vec!["Nand", "Not", "DFF"]);
    }

    #[test]
    fn range_loc_falls_back_to_name() {
        let pin = PinRef {
            name: "a".into(),
            range: None,
            loc: Loc::new(2, 9),
        };
        assert_eq!(pin.range_loc(), Loc::new(2, 9));

        let sig = SignalRef {
            name: "x".into(),
            range: Some(RangeDecl {
                start: 0,
                end: 3,
                loc: Loc::new(2, 14),
            }),
            loc: Loc::new(2, 12),
        };
        assert_eq!(sig.range_loc(), Loc::new(2, 14));
        assert!(!sig.is_constant());
    }

    #[test]
    fn serde_roundtrip() {
        let io = IoDecl {
            name: "in".into(),
            width: 16,
            loc: Loc::new(2, 8),
        };
        let json = serde_json::to_string(&io).unwrap();
        let restored: IoDecl = serde_json::from_str(&json).unwrap();
        assert_eq!(io, restored);
    }
}
