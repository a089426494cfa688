//! The closed set of built-in chips.
//!
//! A [`Primitive`] is a chip the simulator implements natively rather than
//! by composing other chips. Its IO shape lives in static [`PinSpec`]
//! tables so the resolver and graph builder can size pins without any
//! runtime registration step.

use serde::{Deserialize, Serialize};

/// Name and width of one built-in pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    /// The pin name as written in HDL.
    pub name: &'static str,
    /// Width in bits.
    pub width: u32,
}

const fn pin(name: &'static str, width: u32) -> PinSpec {
    PinSpec { name, width }
}

/// Word width of every register and RAM bank.
pub const WORD_WIDTH: u32 = 16;

/// State slot holding the value of single-cell storage (DFF, Bit, Register, PC).
pub const OUT_SLOT: &str = "out";

/// Returns the state slot that holds RAM word `address`.
pub fn ram_slot(address: usize) -> String {
    format!("out_{address}")
}

const AB_OUT: &[PinSpec] = &[pin("a", 1), pin("b", 1)];
const OUT1: &[PinSpec] = &[pin("out", 1)];
const IN1: &[PinSpec] = &[pin("in", 1)];
const IN16: &[PinSpec] = &[pin("in", 16)];
const OUT16: &[PinSpec] = &[pin("out", 16)];
const AB16: &[PinSpec] = &[pin("a", 16), pin("b", 16)];
const SUM_CARRY: &[PinSpec] = &[pin("sum", 1), pin("carry", 1)];
const IN8: &[PinSpec] = &[pin("in", 8)];
const ABC: &[PinSpec] = &[pin("a", 1), pin("b", 1), pin("c", 1)];
const MUX_IN: &[PinSpec] = &[pin("a", 1), pin("b", 1), pin("sel", 1)];
const DMUX_IN: &[PinSpec] = &[pin("in", 1), pin("sel", 1)];
const DMUX4_IN: &[PinSpec] = &[pin("in", 1), pin("sel", 2)];
const DMUX8_IN: &[PinSpec] = &[pin("in", 1), pin("sel", 3)];
const WAYS4_OUT: &[PinSpec] = &[pin("a", 1), pin("b", 1), pin("c", 1), pin("d", 1)];
const WAYS8_OUT: &[PinSpec] = &[
    pin("a", 1),
    pin("b", 1),
    pin("c", 1),
    pin("d", 1),
    pin("e", 1),
    pin("f", 1),
    pin("g", 1),
    pin("h", 1),
];
const MUX16_IN: &[PinSpec] = &[pin("a", 16), pin("b", 16), pin("sel", 1)];
const MUX4_16_IN: &[PinSpec] = &[
    pin("a", 16),
    pin("b", 16),
    pin("c", 16),
    pin("d", 16),
    pin("sel", 2),
];
const MUX8_16_IN: &[PinSpec] = &[
    pin("a", 16),
    pin("b", 16),
    pin("c", 16),
    pin("d", 16),
    pin("e", 16),
    pin("f", 16),
    pin("g", 16),
    pin("h", 16),
    pin("sel", 3),
];
const BIT_IN: &[PinSpec] = &[pin("in", 1), pin("load", 1)];
const REGISTER_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1)];
const PC_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("inc", 1), pin("reset", 1)];
const RAM8_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("address", 3)];
const RAM64_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("address", 6)];
const RAM512_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("address", 9)];
const RAM4K_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("address", 12)];
const RAM16K_IN: &[PinSpec] = &[pin("in", 16), pin("load", 1), pin("address", 14)];

/// A built-in chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primitive {
    // --- Combinational gates ---
    /// `out = !(a & b)`.
    Nand,
    /// `out = a & b`.
    And,
    /// `out = a | b`.
    Or,
    /// `out = a ^ b`.
    Xor,
    /// `out = !in`.
    Not,
    /// `out = sel ? b : a`.
    Mux,
    /// Routes `in` to `a` or `b`.
    DMux,
    /// Routes `in` to one of `a..d`.
    DMux4Way,
    /// Routes `in` to one of `a..h`.
    DMux8Way,
    /// 16-bit NOT.
    Not16,
    /// 16-bit AND.
    And16,
    /// 16-bit OR.
    Or16,
    /// OR-reduction of 8 bits.
    Or8Way,
    /// 16-bit two-way multiplexer.
    Mux16,
    /// 16-bit four-way multiplexer.
    Mux4Way16,
    /// 16-bit eight-way multiplexer.
    Mux8Way16,
    /// Adds two bits.
    HalfAdder,
    /// Adds three bits.
    FullAdder,
    /// 16-bit increment.
    Inc16,
    /// 16-bit ripple-carry adder.
    Add16,

    // --- Sequential storage ---
    /// Data flip-flop.
    Dff,
    /// Load-gated single bit.
    Bit,
    /// Load-gated 16-bit word.
    Register,
    /// Program counter with reset, load and increment.
    Pc,
    /// 8 words of RAM.
    Ram8,
    /// 64 words of RAM.
    Ram64,
    /// 512 words of RAM.
    Ram512,
    /// 4096 words of RAM.
    Ram4K,
    /// 16384 words of RAM.
    Ram16K,
}

impl Primitive {
    /// Every built-in, in declaration order.
    pub const ALL: [Primitive; 29] = [
        Primitive::Nand,
        Primitive::And,
        Primitive::Or,
        Primitive::Xor,
        Primitive::Not,
        Primitive::Mux,
        Primitive::DMux,
        Primitive::DMux4Way,
        Primitive::DMux8Way,
        Primitive::Not16,
        Primitive::And16,
        Primitive::Or16,
        Primitive::Or8Way,
        Primitive::Mux16,
        Primitive::Mux4Way16,
        Primitive::Mux8Way16,
        Primitive::HalfAdder,
        Primitive::FullAdder,
        Primitive::Inc16,
        Primitive::Add16,
        Primitive::Dff,
        Primitive::Bit,
        Primitive::Register,
        Primitive::Pc,
        Primitive::Ram8,
        Primitive::Ram64,
        Primitive::Ram512,
        Primitive::Ram4K,
        Primitive::Ram16K,
    ];

    /// Looks up a built-in by its HDL chip name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|prim| prim.name() == name)
    }

    /// The HDL chip name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nand => "Nand",
            Self::And => "And",
            Self::Or => "Or",
            Self::Xor => "Xor",
            Self::Not => "Not",
            Self::Mux => "Mux",
            Self::DMux => "DMux",
            Self::DMux4Way => "DMux4Way",
            Self::DMux8Way => "DMux8Way",
            Self::Not16 => "Not16",
            Self::And16 => "And16",
            Self::Or16 => "Or16",
            Self::Or8Way => "Or8Way",
            Self::Mux16 => "Mux16",
            Self::Mux4Way16 => "Mux4Way16",
            Self::Mux8Way16 => "Mux8Way16",
            Self::HalfAdder => "HalfAdder",
            Self::FullAdder => "FullAdder",
            Self::Inc16 => "Inc16",
            Self::Add16 => "Add16",
            Self::Dff => "DFF",
            Self::Bit => "Bit",
            Self::Register => "Register",
            Self::Pc => "PC",
            Self::Ram8 => "RAM8",
            Self::Ram64 => "RAM64",
            Self::Ram512 => "RAM512",
            Self::Ram4K => "RAM4K",
            Self::Ram16K => "RAM16K",
        }
    }

    /// Input pins in declaration order.
    pub fn inputs(self) -> &'static [PinSpec] {
        match self {
            Self::Nand | Self::And | Self::Or | Self::Xor | Self::HalfAdder => AB_OUT,
            Self::Not | Self::Dff => IN1,
            Self::Mux => MUX_IN,
            Self::DMux => DMUX_IN,
            Self::DMux4Way => DMUX4_IN,
            Self::DMux8Way => DMUX8_IN,
            Self::Not16 | Self::Inc16 => IN16,
            Self::And16 | Self::Or16 | Self::Add16 => AB16,
            Self::Or8Way => IN8,
            Self::Mux16 => MUX16_IN,
            Self::Mux4Way16 => MUX4_16_IN,
            Self::Mux8Way16 => MUX8_16_IN,
            Self::FullAdder => ABC,
            Self::Bit => BIT_IN,
            Self::Register => REGISTER_IN,
            Self::Pc => PC_IN,
            Self::Ram8 => RAM8_IN,
            Self::Ram64 => RAM64_IN,
            Self::Ram512 => RAM512_IN,
            Self::Ram4K => RAM4K_IN,
            Self::Ram16K => RAM16K_IN,
        }
    }

    /// Output pins in declaration order.
    pub fn outputs(self) -> &'static [PinSpec] {
        match self {
            Self::Nand
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Not
            | Self::Mux
            | Self::Or8Way
            | Self::Dff
            | Self::Bit => OUT1,
            Self::DMux => AB_OUT,
            Self::DMux4Way => WAYS4_OUT,
            Self::DMux8Way => WAYS8_OUT,
            Self::HalfAdder | Self::FullAdder => SUM_CARRY,
            Self::Not16
            | Self::And16
            | Self::Or16
            | Self::Mux16
            | Self::Mux4Way16
            | Self::Mux8Way16
            | Self::Inc16
            | Self::Add16
            | Self::Register
            | Self::Pc
            | Self::Ram8
            | Self::Ram64
            | Self::Ram512
            | Self::Ram4K
            | Self::Ram16K => OUT16,
        }
    }

    /// Width of the named input pin, if it exists.
    pub fn input_width(self, name: &str) -> Option<u32> {
        find(self.inputs(), name)
    }

    /// Width of the named output pin, if it exists.
    pub fn output_width(self, name: &str) -> Option<u32> {
        find(self.outputs(), name)
    }

    /// Returns `true` for clocked storage. Every output of a sequential
    /// built-in is driven from committed state.
    pub fn is_sequential(self) -> bool {
        matches!(
            self,
            Self::Dff
                | Self::Bit
                | Self::Register
                | Self::Pc
                | Self::Ram8
                | Self::Ram64
                | Self::Ram512
                | Self::Ram4K
                | Self::Ram16K
        )
    }

    /// Returns `true` when the outputs depend on committed state alone.
    ///
    /// A RAM is sequential but not registered: the word it presents is
    /// selected by its current `address`.
    pub fn is_registered(self) -> bool {
        self.is_sequential() && self.ram_words().is_none()
    }

    /// Returns `true` for an input that is only sampled on the clock edge
    /// and never reaches an output within the same evaluation.
    pub fn is_clocked_input(self, pin: &str) -> bool {
        self.ram_words().is_some() && matches!(pin, "in" | "load")
    }

    /// Number of addressable words for RAM banks.
    pub fn ram_words(self) -> Option<usize> {
        match self {
            Self::Ram8 => Some(8),
            Self::Ram64 => Some(64),
            Self::Ram512 => Some(512),
            Self::Ram4K => Some(4096),
            Self::Ram16K => Some(16384),
            _ => None,
        }
    }

    /// Width of the value stored per state slot, or `None` for
    /// combinational built-ins.
    pub fn state_width(self) -> Option<u32> {
        match self {
            Self::Dff | Self::Bit => Some(1),
            s if s.is_sequential() => Some(WORD_WIDTH),
            _ => None,
        }
    }

    /// Names of every state slot, in address order for RAM banks.
    pub fn state_slots(self) -> Vec<String> {
        match (self.ram_words(), self.is_sequential()) {
            (Some(words), _) => (0..words).map(ram_slot).collect(),
            (None, true) => vec![OUT_SLOT.to_string()],
            (None, false) => Vec::new(),
        }
    }
}

fn find(pins: &[PinSpec], name: &str) -> Option<u32> {
    pins.iter().find(|p| p.name == name).map(|p| p.width)
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for prim in Primitive::ALL {
            assert_eq!(Primitive::from_name(prim.name()), Some(prim));
        }
        assert_eq!(Primitive::from_name("Dff"), None);
        assert_eq!(Primitive::from_name("CustomAnd"), None);
    }

    #[test]
    fn pin_widths() {
        assert_eq!(Primitive::Nand.input_width("a"), Some(1));
        assert_eq!(Primitive::Nand.input_width("in"), None);
        assert_eq!(Primitive::Mux8Way16.input_width("sel"), Some(3));
        assert_eq!(Primitive::Or8Way.input_width("in"), Some(8));
        assert_eq!(Primitive::Ram16K.input_width("address"), Some(14));
        assert_eq!(Primitive::DMux8Way.output_width("h"), Some(1));
        assert_eq!(Primitive::FullAdder.output_width("carry"), Some(1));
        assert_eq!(Primitive::Pc.output_width("out"), Some(16));
    }

    #[test]
    fn pin_tables_are_static() {
        fn shape(pins: &'static [PinSpec]) -> Vec<(&'static str, u32)> {
            pins.iter().map(|p| (p.name, p.width)).collect()
        }
        assert_eq!(shape(Primitive::Mux.inputs()), vec![("a", 1), ("b", 1), ("sel", 1)]);
        assert_eq!(
            shape(Primitive::Pc.inputs()),
            vec![("in", 16), ("load", 1), ("inc", 1), ("reset", 1)]
        );
        assert_eq!(
            shape(Primitive::Ram4K.inputs()),
            vec![("in", 16), ("load", 1), ("address", 12)]
        );
        assert_eq!(Primitive::Mux8Way16.inputs().len(), 9);
        assert_eq!(Primitive::DMux4Way.outputs().len(), 4);
        assert_eq!(Primitive::DMux8Way.outputs().last().map(|p| p.name), Some("h"));
    }

    #[test]
    fn pin_names_are_unique_per_chip() {
        for prim in Primitive::ALL {
            let mut names: Vec<&str> = prim
                .inputs()
                .iter()
                .chain(prim.outputs())
                .map(|p| p.name)
                .collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total, "{prim} repeats a pin name");
        }
    }

    #[test]
    fn ram_address_width_matches_word_count() {
        for prim in Primitive::ALL {
            if let Some(words) = prim.ram_words() {
                let width = prim.input_width("address").unwrap();
                assert_eq!(1usize << width, words, "{prim}");
            }
        }
    }

    #[test]
    fn sequential_state_layout() {
        assert!(Primitive::Dff.is_sequential());
        assert!(!Primitive::Add16.is_sequential());
        assert_eq!(Primitive::Dff.state_slots(), vec!["out"]);
        assert_eq!(Primitive::Register.state_width(), Some(16));
        assert_eq!(Primitive::Bit.state_width(), Some(1));
        assert_eq!(Primitive::Not.state_width(), None);
        assert!(Primitive::Xor.state_slots().is_empty());

        assert!(Primitive::Pc.is_registered());
        assert!(!Primitive::Ram64.is_registered());
        assert!(Primitive::Ram64.is_clocked_input("load"));
        assert!(!Primitive::Ram64.is_clocked_input("address"));
        assert!(!Primitive::Dff.is_clocked_input("in"));

        let slots = Primitive::Ram8.state_slots();
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0], "out_0");
        assert_eq!(slots[7], "out_7");
        assert_eq!(Primitive::Ram16K.state_slots().len(), 16384);
    }
}
