//! Behaviour of the built-in chips.
//!
//! [`evaluate`] drives a built-in's outputs from its current inputs, or from
//! committed state for sequential chips. [`apply`] stages a sequential
//! chip's next state. Both dispatch on [`Primitive`] with a single `match`.

use nandsim_graph::{Node, PinMap};
use nandsim_ir::primitive::{ram_slot, OUT_SLOT, WORD_WIDTH};
use nandsim_ir::{Arena, BitId, Primitive};

type Bits = Arena<BitId, bool>;

/// Read access to one node's input pins.
struct Inputs<'a> {
    pins: &'a PinMap,
    bits: &'a Bits,
}

impl<'a> Inputs<'a> {
    fn new(node: &'a Node, bits: &'a Bits) -> Self {
        Self {
            pins: &node.input_pins,
            bits,
        }
    }

    fn word(&self, name: &str) -> Vec<bool> {
        self.pins
            .get(name)
            .map_or_else(Vec::new, |ids| self.bits.read_all(ids))
    }

    fn bit(&self, name: &str) -> bool {
        self.pins
            .get(name)
            .and_then(|ids| ids.first())
            .is_some_and(|&id| self.bits[id])
    }

    fn address(&self, name: &str) -> usize {
        self.pins.get(name).map_or(0, |ids| {
            ids.iter()
                .enumerate()
                .filter(|&(_, &id)| self.bits[id])
                .map(|(i, _)| 1usize << i)
                .sum()
        })
    }
}

fn drive(node: &Node, bits: &mut Bits, name: &str, values: &[bool]) {
    if let Some(ids) = node.output_pins.get(name) {
        for (&id, &value) in ids.iter().zip(values) {
            bits[id] = value;
        }
    }
}

fn bitwise(a: &[bool], b: &[bool], op: impl Fn(bool, bool) -> bool) -> Vec<bool> {
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

/// Ripple-carry sum of `a` and `b`, truncated to the width of `a`.
fn ripple_add(a: &[bool], b: &[bool], carry_in: bool) -> Vec<bool> {
    let mut carry = carry_in;
    a.iter()
        .zip(b.iter().chain(std::iter::repeat(&false)))
        .map(|(&x, &y)| {
            let sum = x ^ y ^ carry;
            carry = (x && y) || (carry && (x ^ y));
            sum
        })
        .collect()
}

fn increment(word: &[bool]) -> Vec<bool> {
    ripple_add(word, &[], true)
}

/// Name of the `index`-th pin, or `None` past the end.
fn nth_name(pins: &'static [nandsim_ir::PinSpec], index: usize) -> Option<&'static str> {
    pins.get(index).map(|p| p.name)
}

/// The committed value a sequential node presents on `out`, given the
/// address currently on its inputs.
fn committed_output(primitive: Primitive, node: &Node, inputs: &Inputs<'_>) -> Vec<bool> {
    let Some(state) = node.state.as_ref() else {
        return Vec::new();
    };
    let value = if primitive.ram_words().is_some() {
        state.get(&ram_slot(inputs.address("address")))
    } else {
        state.get(OUT_SLOT)
    };
    value.map(<[bool]>::to_vec).unwrap_or_default()
}

/// Drives the outputs of a built-in node.
///
/// Sequential chips present committed state and never modify it.
pub(crate) fn evaluate(primitive: Primitive, node: &Node, bits: &mut Bits) {
    let outputs: Vec<(&'static str, Vec<bool>)> = {
        let i = Inputs::new(node, bits);
        match primitive {
            Primitive::Nand => vec![("out", vec![!(i.bit("a") && i.bit("b"))])],
            Primitive::And => vec![("out", vec![i.bit("a") && i.bit("b")])],
            Primitive::Or => vec![("out", vec![i.bit("a") || i.bit("b")])],
            Primitive::Xor => vec![("out", vec![i.bit("a") ^ i.bit("b")])],
            Primitive::Not => vec![("out", vec![!i.bit("in")])],
            Primitive::Mux => {
                let out = if i.bit("sel") { i.bit("b") } else { i.bit("a") };
                vec![("out", vec![out])]
            }
            Primitive::DMux | Primitive::DMux4Way | Primitive::DMux8Way => {
                let selected = i.address("sel");
                let input = i.bit("in");
                primitive
                    .outputs()
                    .iter()
                    .enumerate()
                    .map(|(n, pin)| (pin.name, vec![n == selected && input]))
                    .collect()
            }
            Primitive::Not16 => vec![("out", i.word("in").iter().map(|b| !b).collect())],
            Primitive::And16 => vec![("out", bitwise(&i.word("a"), &i.word("b"), |x, y| x && y))],
            Primitive::Or16 => vec![("out", bitwise(&i.word("a"), &i.word("b"), |x, y| x || y))],
            Primitive::Or8Way => vec![("out", vec![i.word("in").contains(&true)])],
            Primitive::Mux16 | Primitive::Mux4Way16 | Primitive::Mux8Way16 => {
                let out = nth_name(primitive.inputs(), i.address("sel"))
                    .map(|name| i.word(name))
                    .unwrap_or_default();
                vec![("out", out)]
            }
            Primitive::HalfAdder => {
                let (a, b) = (i.bit("a"), i.bit("b"));
                vec![("sum", vec![a ^ b]), ("carry", vec![a && b])]
            }
            Primitive::FullAdder => {
                let (a, b, c) = (i.bit("a"), i.bit("b"), i.bit("c"));
                vec![
                    ("sum", vec![a ^ b ^ c]),
                    ("carry", vec![(a && b) || (c && (a ^ b))]),
                ]
            }
            Primitive::Inc16 => vec![("out", increment(&i.word("in")))],
            Primitive::Add16 => vec![("out", ripple_add(&i.word("a"), &i.word("b"), false))],
            Primitive::Dff
            | Primitive::Bit
            | Primitive::Register
            | Primitive::Pc
            | Primitive::Ram8
            | Primitive::Ram64
            | Primitive::Ram512
            | Primitive::Ram4K
            | Primitive::Ram16K => vec![("out", committed_output(primitive, node, &i))],
        }
    };
    for (name, values) in &outputs {
        drive(node, bits, name, values);
    }
}

/// Stages the next state of a sequential node from its current inputs.
///
/// Any earlier staged write is discarded first, so repeated calls without a
/// commit stage only the latest inputs. Combinational chips are ignored.
pub(crate) fn apply(primitive: Primitive, node: &mut Node, bits: &Bits) {
    let staged: Option<(String, Vec<bool>)> = {
        let i = Inputs::new(node, bits);
        match primitive {
            Primitive::Dff => Some((OUT_SLOT.to_string(), i.word("in"))),
            Primitive::Bit | Primitive::Register => i
                .bit("load")
                .then(|| (OUT_SLOT.to_string(), i.word("in"))),
            Primitive::Pc => {
                let next = if i.bit("reset") {
                    Some(vec![false; WORD_WIDTH as usize])
                } else if i.bit("load") {
                    Some(i.word("in"))
                } else if i.bit("inc") {
                    node.state
                        .as_ref()
                        .and_then(|s| s.get(OUT_SLOT))
                        .map(increment)
                } else {
                    None
                };
                next.map(|word| (OUT_SLOT.to_string(), word))
            }
            Primitive::Ram8
            | Primitive::Ram64
            | Primitive::Ram512
            | Primitive::Ram4K
            | Primitive::Ram16K => i
                .bit("load")
                .then(|| (ram_slot(i.address("address")), i.word("in"))),
            _ => None,
        }
    };
    if let Some(state) = node.state.as_mut() {
        state.discard_pending();
        if let Some((slot, value)) = staged {
            state.stage(slot, value);
        }
    }
}
