//! Fixture chips and helpers for end-to-end simulator tests.
//!
//! [`fixtures`] returns a source map holding the classic gate, arithmetic,
//! memory and CPU chips, each written as a custom chip named with a
//! `Custom` prefix so it never collides with the built-in of the same role.
//! Larger chips compose smaller fixtures, so loading one exercises deep
//! nesting through the whole pipeline.
//!
//! Bit helpers follow the simulator's convention: index 0 is the least
//! significant bit.

#![warn(missing_docs)]

use nandsim_resolve::SourceMap;
use nandsim_sim::{HardwareSimulator, SimError, Values};

/// Parses an MSB-first binary string such as `"0101"` into LSB-first bits.
///
/// Characters other than `0` and `1` are skipped, so `"1010_0000"` works.
pub fn bits(s: &str) -> Vec<bool> {
    s.chars()
        .rev()
        .filter_map(|c| match c {
            '0' => Some(false),
            '1' => Some(true),
            _ => None,
        })
        .collect()
}

/// `n` copies of `bit`.
pub fn repeat(bit: bool, n: usize) -> Vec<bool> {
    vec![bit; n]
}

/// A 16-bit word as LSB-first bits.
pub fn word(value: u16) -> Vec<bool> {
    (0..16).map(|i| value >> i & 1 == 1).collect()
}

/// The `width` low bits of `value` as LSB-first bits.
pub fn unsigned(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| value >> i & 1 == 1).collect()
}

/// Reads LSB-first bits as an unsigned number.
pub fn value(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .map(|(i, &b)| u64::from(b) << i)
        .sum()
}

/// Builds an input map from `(name, bits)` pairs.
pub fn inputs<const N: usize>(pairs: [(&str, Vec<bool>); N]) -> Values {
    pairs
        .into_iter()
        .map(|(name, bits)| (name.to_string(), bits))
        .collect()
}

/// A session over [`fixtures`] with `chip` loaded.
pub fn load(chip: &str) -> Result<HardwareSimulator, SimError> {
    let mut sim = HardwareSimulator::new();
    sim.set_sources(fixtures());
    sim.process(chip)?;
    Ok(sim)
}

/// Lays out a chip definition from its IO lines and parts.
fn chip(name: &str, ios: &[&str], parts: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("CHIP {name} {{\n");
    for io in ios {
        out.push_str(&format!("    {io}\n"));
    }
    out.push_str("\n    PARTS:\n");
    for part in parts {
        out.push_str(&format!("    {part}\n"));
    }
    out.push_str("}\n");
    out
}

fn lines(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

fn per_bit(width: u32, f: impl Fn(u32) -> String) -> Vec<String> {
    (0..width).map(f).collect()
}

fn gates() -> Vec<(&'static str, String)> {
    vec![
        (
            "CustomNot",
            chip("CustomNot", &["IN in;", "OUT out;"], lines(&["Nand(a=in, b=in, out=out);"])),
        ),
        (
            "CustomAnd",
            chip(
                "CustomAnd",
                &["IN a, b;", "OUT out;"],
                lines(&["Nand(a=a, b=b, out=n);", "CustomNot(in=n, out=out);"]),
            ),
        ),
        (
            "CustomOr",
            chip(
                "CustomOr",
                &["IN a, b;", "OUT out;"],
                lines(&[
                    "CustomNot(in=a, out=na);",
                    "CustomNot(in=b, out=nb);",
                    "Nand(a=na, b=nb, out=out);",
                ]),
            ),
        ),
        (
            "CustomXor",
            chip(
                "CustomXor",
                &["IN a, b;", "OUT out;"],
                lines(&[
                    "CustomOr(a=a, b=b, out=either);",
                    "Nand(a=a, b=b, out=notBoth);",
                    "CustomAnd(a=either, b=notBoth, out=out);",
                ]),
            ),
        ),
        (
            "CustomMux",
            chip(
                "CustomMux",
                &["IN a, b, sel;", "OUT out;"],
                lines(&[
                    "CustomNot(in=sel, out=nsel);",
                    "CustomAnd(a=a, b=nsel, out=pickA);",
                    "CustomAnd(a=b, b=sel, out=pickB);",
                    "CustomOr(a=pickA, b=pickB, out=out);",
                ]),
            ),
        ),
        (
            "CustomDMux",
            chip(
                "CustomDMux",
                &["IN in, sel;", "OUT a, b;"],
                lines(&[
                    "CustomNot(in=sel, out=nsel);",
                    "CustomAnd(a=in, b=nsel, out=a);",
                    "CustomAnd(a=in, b=sel, out=b);",
                ]),
            ),
        ),
        (
            "CustomNot16",
            chip(
                "CustomNot16",
                &["IN in[16];", "OUT out[16];"],
                per_bit(16, |i| format!("CustomNot(in=in[{i}], out=out[{i}]);")),
            ),
        ),
        (
            "CustomAnd16",
            chip(
                "CustomAnd16",
                &["IN a[16], b[16];", "OUT out[16];"],
                per_bit(16, |i| format!("CustomAnd(a=a[{i}], b=b[{i}], out=out[{i}]);")),
            ),
        ),
        (
            "CustomOr16",
            chip(
                "CustomOr16",
                &["IN a[16], b[16];", "OUT out[16];"],
                per_bit(16, |i| format!("CustomOr(a=a[{i}], b=b[{i}], out=out[{i}]);")),
            ),
        ),
        (
            "CustomMux16",
            chip(
                "CustomMux16",
                &["IN a[16], b[16], sel;", "OUT out[16];"],
                per_bit(16, |i| {
                    format!("CustomMux(a=a[{i}], b=b[{i}], sel=sel, out=out[{i}]);")
                }),
            ),
        ),
        (
            "CustomOr8Way",
            chip("CustomOr8Way", &["IN in[8];", "OUT out;"], {
                let mut parts = vec!["CustomOr(a=in[0], b=in[1], out=acc1);".to_string()];
                parts.extend((2..7).map(|i| format!("CustomOr(a=acc{}, b=in[{i}], out=acc{i});", i - 1)));
                parts.push("CustomOr(a=acc6, b=in[7], out=out);".to_string());
                parts
            }),
        ),
        (
            "CustomMux4Way16",
            chip(
                "CustomMux4Way16",
                &["IN a[16], b[16], c[16], d[16], sel[2];", "OUT out[16];"],
                lines(&[
                    "CustomMux16(a=a, b=b, sel=sel[0], out=ab);",
                    "CustomMux16(a=c, b=d, sel=sel[0], out=cd);",
                    "CustomMux16(a=ab, b=cd, sel=sel[1], out=out);",
                ]),
            ),
        ),
        (
            "CustomMux8Way16",
            chip(
                "CustomMux8Way16",
                &[
                    "IN a[16], b[16], c[16], d[16],",
                    "   e[16], f[16], g[16], h[16], sel[3];",
                    "OUT out[16];",
                ],
                lines(&[
                    "CustomMux4Way16(a=a, b=b, c=c, d=d, sel=sel[0..1], out=low);",
                    "CustomMux4Way16(a=e, b=f, c=g, d=h, sel=sel[0..1], out=high);",
                    "CustomMux16(a=low, b=high, sel=sel[2], out=out);",
                ]),
            ),
        ),
        (
            "CustomDMux4Way",
            chip(
                "CustomDMux4Way",
                &["IN in, sel[2];", "OUT a, b, c, d;"],
                lines(&[
                    "CustomDMux(in=in, sel=sel[1], a=low, b=high);",
                    "CustomDMux(in=low, sel=sel[0], a=a, b=b);",
                    "CustomDMux(in=high, sel=sel[0], a=c, b=d);",
                ]),
            ),
        ),
        (
            "CustomDMux8Way",
            chip(
                "CustomDMux8Way",
                &["IN in, sel[3];", "OUT a, b, c, d, e, f, g, h;"],
                lines(&[
                    "CustomDMux(in=in, sel=sel[2], a=low, b=high);",
                    "CustomDMux4Way(in=low, sel=sel[0..1], a=a, b=b, c=c, d=d);",
                    "CustomDMux4Way(in=high, sel=sel[0..1], a=e, b=f, c=g, d=h);",
                ]),
            ),
        ),
    ]
}

fn arithmetic() -> Vec<(&'static str, String)> {
    vec![
        (
            "CustomHalfAdder",
            chip(
                "CustomHalfAdder",
                &["IN a, b;", "OUT sum, carry;"],
                lines(&[
                    "CustomXor(a=a, b=b, out=sum);",
                    "CustomAnd(a=a, b=b, out=carry);",
                ]),
            ),
        ),
        (
            "CustomFullAdder",
            chip(
                "CustomFullAdder",
                &["IN a, b, c;", "OUT sum, carry;"],
                lines(&[
                    "CustomHalfAdder(a=a, b=b, sum=partial, carry=first);",
                    "CustomHalfAdder(a=partial, b=c, sum=sum, carry=second);",
                    "CustomOr(a=first, b=second, out=carry);",
                ]),
            ),
        ),
        (
            "CustomAdd16",
            chip("CustomAdd16", &["IN a[16], b[16];", "OUT out[16];"], {
                let mut parts =
                    vec!["CustomHalfAdder(a=a[0], b=b[0], sum=out[0], carry=c0);".to_string()];
                parts.extend((1..16).map(|i| {
                    format!(
                        "CustomFullAdder(a=a[{i}], b=b[{i}], c=c{}, sum=out[{i}], carry=c{i});",
                        i - 1
                    )
                }));
                parts
            }),
        ),
        (
            "CustomInc16",
            chip(
                "CustomInc16",
                &["IN in[16];", "OUT out[16];"],
                lines(&["CustomAdd16(a=in, b[0]=true, b[1..15]=false, out=out);"]),
            ),
        ),
        (
            "CustomAlu",
            chip(
                "CustomAlu",
                &[
                    "IN x[16], y[16],",
                    "   zx, nx, zy, ny, f, no;",
                    "OUT out[16], zr, ng;",
                ],
                lines(&[
                    "// x pre-processing",
                    "CustomMux16(a=x, b=false, sel=zx, out=x1);",
                    "CustomNot16(in=x1, out=notx1);",
                    "CustomMux16(a=x1, b=notx1, sel=nx, out=x2);",
                    "// y pre-processing",
                    "CustomMux16(a=y, b=false, sel=zy, out=y1);",
                    "CustomNot16(in=y1, out=noty1);",
                    "CustomMux16(a=y1, b=noty1, sel=ny, out=y2);",
                    "CustomAdd16(a=x2, b=y2, out=sum);",
                    "CustomAnd16(a=x2, b=y2, out=conj);",
                    "CustomMux16(a=conj, b=sum, sel=f, out=result);",
                    "CustomNot16(in=result, out=notResult);",
                    "CustomMux16(a=result, b=notResult, sel=no, out=out, out[15]=ng, out[0..7]=low, out[8..15]=high);",
                    "CustomOr8Way(in=low, out=anyLow);",
                    "CustomOr8Way(in=high, out=anyHigh);",
                    "CustomOr(a=anyLow, b=anyHigh, out=nonZero);",
                    "CustomNot(in=nonZero, out=zr);",
                ]),
            ),
        ),
    ]
}

fn memory() -> Vec<(&'static str, String)> {
    let banks = |inner: &str, low: &str, high: &str| {
        let mut parts = vec![format!(
            "DMux8Way(in=load, sel=address[{high}], a=l0, b=l1, c=l2, d=l3, e=l4, f=l5, g=l6, h=l7);"
        )];
        parts.extend((0..8).map(|i| {
            format!("{inner}(in=in, load=l{i}, address=address[{low}], out=r{i});")
        }));
        parts.push(format!(
            "Mux8Way16(a=r0, b=r1, c=r2, d=r3, e=r4, f=r5, g=r6, h=r7, sel=address[{high}], out=out);"
        ));
        parts
    };
    let address = |width: u32| format!("IN in[16], load, address[{width}];");

    vec![
        (
            "DoubleDff",
            chip(
                "DoubleDff",
                &["IN in;", "OUT out;"],
                lines(&["DFF(in=in, out=middle);", "DFF(in=middle, out=out);"]),
            ),
        ),
        (
            "CustomBit",
            chip(
                "CustomBit",
                &["IN in, load;", "OUT out;"],
                lines(&[
                    "CustomMux(a=held, b=in, sel=load, out=next);",
                    "DFF(in=next, out=held, out=out);",
                ]),
            ),
        ),
        (
            "CustomRegister",
            chip(
                "CustomRegister",
                &["IN in[16], load;", "OUT out[16];"],
                per_bit(16, |i| format!("CustomBit(in=in[{i}], load=load, out=out[{i}]);")),
            ),
        ),
        (
            "CustomRam8",
            chip("CustomRam8", &[address(3).as_str(), "OUT out[16];"], {
                let mut parts = vec![
                    "CustomDMux8Way(in=load, sel=address, a=l0, b=l1, c=l2, d=l3, e=l4, f=l5, g=l6, h=l7);"
                        .to_string(),
                ];
                parts.extend(
                    (0..8).map(|i| format!("CustomRegister(in=in, load=l{i}, out=r{i});")),
                );
                parts.push(
                    "CustomMux8Way16(a=r0, b=r1, c=r2, d=r3, e=r4, f=r5, g=r6, h=r7, sel=address, out=out);"
                        .to_string(),
                );
                parts
            }),
        ),
        (
            "CustomRam64",
            chip("CustomRam64", &[address(6).as_str(), "OUT out[16];"], banks("RAM8", "0..2", "3..5")),
        ),
        (
            "CustomRam512",
            chip("CustomRam512", &[address(9).as_str(), "OUT out[16];"], banks("RAM64", "0..5", "6..8")),
        ),
        (
            "CustomRam4K",
            chip("CustomRam4K", &[address(12).as_str(), "OUT out[16];"], banks("RAM512", "0..8", "9..11")),
        ),
        (
            "CustomRam16K",
            chip(
                "CustomRam16K",
                &[address(14).as_str(), "OUT out[16];"],
                lines(&[
                    "DMux4Way(in=load, sel=address[12..13], a=l0, b=l1, c=l2, d=l3);",
                    "RAM4K(in=in, load=l0, address=address[0..11], out=r0);",
                    "RAM4K(in=in, load=l1, address=address[0..11], out=r1);",
                    "RAM4K(in=in, load=l2, address=address[0..11], out=r2);",
                    "RAM4K(in=in, load=l3, address=address[0..11], out=r3);",
                    "Mux4Way16(a=r0, b=r1, c=r2, d=r3, sel=address[12..13], out=out);",
                ]),
            ),
        ),
        (
            "CustomPc",
            chip(
                "CustomPc",
                &["IN in[16], load, inc, reset;", "OUT out[16];"],
                lines(&[
                    "CustomInc16(in=current, out=next);",
                    "CustomMux16(a=current, b=next, sel=inc, out=counted);",
                    "CustomMux16(a=counted, b=in, sel=load, out=loaded);",
                    "CustomMux16(a=loaded, b=false, sel=reset, out=chosen);",
                    "CustomRegister(in=chosen, load=true, out=current, out=out);",
                ]),
            ),
        ),
    ]
}

fn cpu() -> (&'static str, String) {
    (
        "CustomCpu",
        chip(
            "CustomCpu",
            &[
                "IN inM[16], instruction[16], reset;",
                "OUT outM[16], writeM, addressM[15], pc[15];",
            ],
            lines(&[
                "CustomNot(in=instruction[15], out=isA);",
                "CustomNot(in=isA, out=isC);",
                "// A register",
                "CustomAnd(a=isC, b=instruction[5], out=aluToA);",
                "CustomMux16(a=instruction, b=aluOut, sel=aluToA, out=aIn);",
                "CustomOr(a=isA, b=aluToA, out=loadA);",
                "Register(in=aIn, load=loadA, out=aOut, out[0..14]=addressM);",
                "// D register",
                "CustomAnd(a=isC, b=instruction[4], out=loadD);",
                "Register(in=aluOut, load=loadD, out=dOut);",
                "CustomAnd(a=isC, b=instruction[12], out=useM);",
                "CustomMux16(a=aOut, b=inM, sel=useM, out=operand);",
                "CustomAlu(x=dOut, y=operand, zx=instruction[11], nx=instruction[10],",
                "          zy=instruction[9], ny=instruction[8], f=instruction[7],",
                "          no=instruction[6], out=aluOut, out=outM, zr=zr, ng=ng);",
                "CustomAnd(a=isC, b=instruction[3], out=writeM);",
                "// jump",
                "CustomOr(a=zr, b=ng, out=notPositive);",
                "CustomNot(in=notPositive, out=positive);",
                "CustomAnd(a=instruction[2], b=ng, out=jumpLt);",
                "CustomAnd(a=instruction[1], b=zr, out=jumpEq);",
                "CustomAnd(a=instruction[0], b=positive, out=jumpGt);",
                "CustomOr(a=jumpLt, b=jumpEq, out=jumpLe);",
                "CustomOr(a=jumpLe, b=jumpGt, out=jump);",
                "CustomAnd(a=isC, b=jump, out=loadPc);",
                "PC(in=aOut, load=loadPc, inc=true, reset=reset, out[0..14]=pc);",
            ]),
        ),
    )
}

/// Every fixture chip keyed by name.
pub fn fixtures() -> SourceMap {
    gates()
        .into_iter()
        .chain(arithmetic())
        .chain(memory())
        .chain([cpu()])
        .map(|(name, text)| (name.to_string(), text))
        .collect()
}

/// Names of all fixture chips, sorted.
pub fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = fixtures().into_keys().collect();
    names.sort();
    names
}
