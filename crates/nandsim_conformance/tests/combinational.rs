//! Truth tables of the combinational fixture chips, evaluated through the
//! full load pipeline.

use nandsim_conformance::{bits, inputs, load, unsigned, value, word};
use nandsim_sim::{HardwareSimulator, Values};

fn eval(sim: &mut HardwareSimulator, values: Values) -> Values {
    sim.evaluate(&values).unwrap().outputs
}

fn out(sim: &mut HardwareSimulator, values: Values) -> u64 {
    value(&eval(sim, values)["out"])
}

#[test]
fn not_gate_is_repeatable() {
    let mut sim = load("CustomNot").unwrap();
    for (input, expected) in [(false, true), (true, false), (false, true)] {
        let outputs = eval(&mut sim, inputs([("in", vec![input])]));
        assert_eq!(outputs["out"], vec![expected]);
    }
}

#[test]
fn two_input_gates() {
    let tables = [
        ("CustomAnd", [0, 0, 0, 1]),
        ("CustomOr", [0, 1, 1, 1]),
        ("CustomXor", [0, 1, 1, 0]),
    ];
    for (chip, expected) in tables {
        let mut sim = load(chip).unwrap();
        for (row, want) in expected.into_iter().enumerate() {
            let (a, b) = (row >> 1 & 1 == 1, row & 1 == 1);
            let got = out(&mut sim, inputs([("a", vec![a]), ("b", vec![b])]));
            assert_eq!(got, want, "{chip}({a}, {b})");
        }
    }
}

#[test]
fn mux_and_dmux() {
    let mut mux = load("CustomMux").unwrap();
    for row in 0..8u32 {
        let (a, b, sel) = (row & 1 == 1, row & 2 == 2, row & 4 == 4);
        let got = out(&mut mux, inputs([("a", vec![a]), ("b", vec![b]), ("sel", vec![sel])]));
        assert_eq!(got == 1, if sel { b } else { a }, "row {row}");
    }

    let mut dmux = load("CustomDMux").unwrap();
    let outputs = eval(&mut dmux, inputs([("in", vec![true]), ("sel", vec![false])]));
    assert_eq!((outputs["a"][0], outputs["b"][0]), (true, false));
    let outputs = eval(&mut dmux, inputs([("in", vec![true]), ("sel", vec![true])]));
    assert_eq!((outputs["a"][0], outputs["b"][0]), (false, true));
    let outputs = eval(&mut dmux, inputs([("in", vec![false]), ("sel", vec![true])]));
    assert_eq!((outputs["a"][0], outputs["b"][0]), (false, false));
}

#[test]
fn sixteen_bit_gates() {
    let a = bits("0011110011000011");
    let b = bits("0000111111110000");

    let mut sim = load("CustomNot16").unwrap();
    assert_eq!(eval(&mut sim, inputs([("in", a.clone())]))["out"], bits("1100001100111100"));

    let mut sim = load("CustomAnd16").unwrap();
    let outputs = eval(&mut sim, inputs([("a", a.clone()), ("b", b.clone())]));
    assert_eq!(outputs["out"], bits("0000110011000000"));

    let mut sim = load("CustomOr16").unwrap();
    let outputs = eval(&mut sim, inputs([("a", a.clone()), ("b", b.clone())]));
    assert_eq!(outputs["out"], bits("0011111111110011"));

    let mut sim = load("CustomMux16").unwrap();
    let pick = |sim: &mut HardwareSimulator, sel| {
        eval(sim, inputs([("a", a.clone()), ("b", b.clone()), ("sel", vec![sel])]))["out"].clone()
    };
    assert_eq!(pick(&mut sim, false), a);
    assert_eq!(pick(&mut sim, true), b);
}

#[test]
fn or8way() {
    let mut sim = load("CustomOr8Way").unwrap();
    assert_eq!(out(&mut sim, inputs([("in", bits("00000000"))])), 0);
    for i in 0..8 {
        assert_eq!(out(&mut sim, inputs([("in", unsigned(1 << i, 8))])), 1, "bit {i}");
    }
}

#[test]
fn wide_multiplexors() {
    let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
    let mut sim = load("CustomMux4Way16").unwrap();
    for sel in 0..4u64 {
        let mut values: Values = names[..4]
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), word(0x1111 * (i as u16 + 1))))
            .collect();
        values.insert("sel".into(), unsigned(sel, 2));
        assert_eq!(out(&mut sim, values), 0x1111 * (sel + 1));
    }

    let mut sim = load("CustomMux8Way16").unwrap();
    for sel in 0..8u64 {
        let mut values: Values = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), word(1000 + i as u16)))
            .collect();
        values.insert("sel".into(), unsigned(sel, 3));
        assert_eq!(out(&mut sim, values), 1000 + sel);
    }
}

#[test]
fn wide_demultiplexors() {
    for (chip, ways, width) in [("CustomDMux4Way", 4, 2), ("CustomDMux8Way", 8, 3)] {
        let mut sim = load(chip).unwrap();
        let names = &["a", "b", "c", "d", "e", "f", "g", "h"][..ways];
        for sel in 0..ways {
            let outputs = eval(
                &mut sim,
                inputs([("in", vec![true]), ("sel", unsigned(sel as u64, width))]),
            );
            for (i, name) in names.iter().enumerate() {
                assert_eq!(outputs[*name], vec![i == sel], "{chip} sel={sel} {name}");
            }
        }
    }
}

#[test]
fn adders() {
    let mut half = load("CustomHalfAdder").unwrap();
    let outputs = eval(&mut half, inputs([("a", vec![true]), ("b", vec![true])]));
    assert_eq!((outputs["sum"][0], outputs["carry"][0]), (false, true));

    let mut full = load("CustomFullAdder").unwrap();
    for row in 0..8u32 {
        let (a, b, c) = (row & 1 == 1, row & 2 == 2, row & 4 == 4);
        let outputs = eval(&mut full, inputs([("a", vec![a]), ("b", vec![b]), ("c", vec![c])]));
        let total = u32::from(a) + u32::from(b) + u32::from(c);
        assert_eq!(outputs["sum"][0], total & 1 == 1, "row {row}");
        assert_eq!(outputs["carry"][0], total >= 2, "row {row}");
    }

    let mut add = load("CustomAdd16").unwrap();
    for (a, b) in [(0u16, 0u16), (1, 1), (1234, 4321), (0xFFFF, 1), (0x8000, 0x8000), (0xABCD, 0x1234)] {
        let got = out(&mut add, inputs([("a", word(a)), ("b", word(b))]));
        assert_eq!(got, u64::from(a.wrapping_add(b)), "{a} + {b}");
    }

    let mut inc = load("CustomInc16").unwrap();
    for x in [0u16, 5, 0x7FFF, 0xFFFF] {
        assert_eq!(out(&mut inc, inputs([("in", word(x))])), u64::from(x.wrapping_add(1)));
    }
}

/// Reference ALU over 16-bit words.
fn alu(x: u16, y: u16, flags: [bool; 6]) -> u16 {
    let [zx, nx, zy, ny, f, no] = flags;
    let x = if zx { 0 } else { x };
    let x = if nx { !x } else { x };
    let y = if zy { 0 } else { y };
    let y = if ny { !y } else { y };
    let out = if f { x.wrapping_add(y) } else { x & y };
    if no {
        !out
    } else {
        out
    }
}

#[test]
fn alu_computes_every_hack_function() {
    // zx nx zy ny f no for 0, 1, -1, x, y, !x, !y, -x, -y, x+1, y+1, x-1, y-1,
    // x+y, x-y, y-x, x&y, x|y.
    let functions = [
        "101010", "111111", "111010", "001100", "110000", "001101", "110001", "001111",
        "110011", "011111", "110111", "001110", "110010", "000010", "010011", "000111",
        "000000", "010101",
    ];
    let names = ["zx", "nx", "zy", "ny", "f", "no"];
    let mut sim = load("CustomAlu").unwrap();
    for (x, y) in [(0u16, 0xFFFFu16), (17, 3), (3, 17), (0x8000, 1)] {
        for code in functions {
            let flags: Vec<bool> = code.chars().map(|c| c == '1').collect();
            let mut values = inputs([("x", word(x)), ("y", word(y))]);
            for (name, &flag) in names.iter().zip(&flags) {
                values.insert(name.to_string(), vec![flag]);
            }
            let expected = alu(
                x,
                y,
                [flags[0], flags[1], flags[2], flags[3], flags[4], flags[5]],
            );
            let outputs = eval(&mut sim, values);
            assert_eq!(value(&outputs["out"]), u64::from(expected), "{code} x={x} y={y}");
            assert_eq!(outputs["zr"], vec![expected == 0], "{code} zr");
            assert_eq!(outputs["ng"], vec![expected & 0x8000 != 0], "{code} ng");
        }
    }
}

#[test]
fn internal_signals_are_reported() {
    let mut sim = load("CustomXor").unwrap();
    let snapshot = sim
        .evaluate(&inputs([("a", vec![true]), ("b", vec![true])]))
        .unwrap();
    assert_eq!(snapshot.internals["either"], vec![true]);
    assert_eq!(snapshot.internals["notBoth"], vec![false]);
    assert_eq!(snapshot.outputs["out"], vec![false]);
}
