//! Semantic resolution of one parsed chip definition.
//!
//! [`Resolver::resolve`] validates a [`ParsedChipDefinition`] in a fixed
//! order and stops at the first violation:
//!
//! 1. the chip name matches the key it was loaded under;
//! 2. IO counts, widths and name uniqueness;
//! 3. the part count;
//! 4. every used chip is a built-in or a known source, with custom chips
//!    resolved recursively and circular uses rejected;
//! 5. every connection names an existing pin;
//! 6. output connections, which establish internal signals;
//! 7. input connections, which may only read established signals.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use nandsim_config::ResolverLimits;
use nandsim_hdl::{ConnectionDecl, IoDecl, Loc, ParsedChipDefinition, RangeDecl};
use nandsim_ir::{
    BitRange, Connection, Part, PinBinding, Primitive, ResolvedChipDefinition, SignalBinding,
    SignalKind,
};

use crate::coverage::Coverage;
use crate::error::{ResolutionError, ResolveError};
use crate::SourceMap;

/// Resolved definitions shared across one top-level resolution, by name.
pub type Resolved = BTreeMap<String, ResolvedChipDefinition>;

/// A connection paired with the part it belongs to and its pin's width.
struct PendingConnection<'p> {
    part_index: usize,
    part_name: &'p str,
    pin_width: u32,
    decl: &'p ConnectionDecl,
}

/// Resolves a single chip, recursing into the custom chips it uses.
pub struct Resolver<'a> {
    parsed: ParsedChipDefinition,
    file_name: String,
    sources: &'a SourceMap,
    limits: ResolverLimits,
    inputs: BTreeMap<String, u32>,
    outputs: BTreeMap<String, u32>,
    internal_signals: BTreeMap<String, u32>,
    output_coverage: Coverage<String>,
    pin_coverage: Coverage<(usize, String)>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver for `parsed`, which was loaded under `file_name`.
    pub fn new(
        parsed: ParsedChipDefinition,
        file_name: impl Into<String>,
        sources: &'a SourceMap,
        limits: ResolverLimits,
    ) -> Self {
        Self {
            parsed,
            file_name: file_name.into(),
            sources,
            limits,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            internal_signals: BTreeMap::new(),
            output_coverage: Coverage::new(),
            pin_coverage: Coverage::new(),
        }
    }

    /// Resolves the chip.
    ///
    /// `resolved` memoizes every definition produced so far in this
    /// top-level resolution and is extended with each newly resolved
    /// dependency. `resolving` is the chain of chips whose resolution is in
    /// progress. Returns the definition and its transitive closure of
    /// custom dependencies.
    pub fn resolve(
        mut self,
        resolved: &mut Resolved,
        resolving: &[String],
    ) -> Result<(ResolvedChipDefinition, Resolved), ResolveError> {
        debug!("resolving chip '{}'", self.file_name);
        let mut chain = resolving.to_vec();
        chain.push(self.file_name.clone());

        self.check_name()?;
        self.resolve_io()?;
        self.check_part_count()?;
        self.resolve_used_chips(resolved, &chain)?;

        let mut parts: Vec<Part> = self
            .parsed
            .parts
            .iter()
            .map(|p| Part {
                chip: p.name.clone(),
                primitive: Primitive::from_name(&p.name),
                input_connections: Vec::new(),
                output_connections: Vec::new(),
            })
            .collect();

        let parsed = std::mem::take(&mut self.parsed.parts);
        let (inputs, outputs) = self.split_connections(&parsed, resolved)?;

        for pending in &outputs {
            let conn = self.resolve_output(pending)?;
            parts[pending.part_index].output_connections.push(conn);
        }
        for pending in &inputs {
            let conn = self.resolve_input(pending)?;
            parts[pending.part_index].input_connections.push(conn);
        }

        let definition = ResolvedChipDefinition {
            name: self.file_name.clone(),
            inputs: self.inputs,
            outputs: self.outputs,
            internal_signals: self.internal_signals,
            parts,
        };
        let closure = closure_of(&definition, resolved);
        debug!(
            "resolved chip '{}': {} parts, {} internal signals, {} dependencies",
            definition.name,
            definition.parts.len(),
            definition.internal_signals.len(),
            closure.len()
        );
        Ok((definition, closure))
    }

    fn error(&self, loc: Loc, message: impl Into<String>) -> ResolveError {
        ResolutionError::at(&self.file_name, loc, message).into()
    }

    fn check_name(&self) -> Result<(), ResolveError> {
        if self.parsed.name.name != self.file_name {
            return Err(self.error(
                self.parsed.name.loc,
                "File name does not match the chip name",
            ));
        }
        Ok(())
    }

    fn resolve_io(&mut self) -> Result<(), ResolveError> {
        let limits = self.limits;
        if let Some(last) = over_limit(&self.parsed.inputs, limits.max_ios) {
            return Err(self.error(last.loc, "Number of inputs exceeds maximum allowed"));
        }
        if let Some(last) = over_limit(&self.parsed.outputs, limits.max_ios) {
            return Err(self.error(last.loc, "Number of outputs exceeds maximum allowed"));
        }

        let width_ok = |io: &IoDecl| (limits.min_io_width..=limits.max_io_width).contains(&io.width);
        if let Some(io) = self.parsed.inputs.iter().find(|io| !width_ok(io)) {
            return Err(self.error(io.loc, format!("Input '{}' width out of bounds", io.name)));
        }
        if let Some(io) = self.parsed.outputs.iter().find(|io| !width_ok(io)) {
            return Err(self.error(io.loc, format!("Output '{}' width out of bounds", io.name)));
        }

        for io in &self.parsed.inputs {
            if self.inputs.insert(io.name.clone(), io.width).is_some() {
                return Err(self.error(io.loc, format!("Duplicate input name '{}'", io.name)));
            }
        }
        for io in &self.parsed.outputs {
            if self.inputs.contains_key(&io.name)
                || self.outputs.insert(io.name.clone(), io.width).is_some()
            {
                return Err(self.error(io.loc, format!("Duplicate output name '{}'", io.name)));
            }
        }
        Ok(())
    }

    fn check_part_count(&self) -> Result<(), ResolveError> {
        if self.parsed.parts.len() > self.limits.max_parts {
            if let Some(last) = self.parsed.parts.last() {
                return Err(self.error(last.loc, "Number of parts exceeds maximum allowed"));
            }
        }
        Ok(())
    }

    fn resolve_used_chips(
        &self,
        resolved: &mut Resolved,
        chain: &[String],
    ) -> Result<(), ResolveError> {
        let used = self.parsed.used_chip_names();

        let mut custom = Vec::new();
        for name in used {
            if Primitive::from_name(name).is_some() {
                continue;
            }
            if !self.sources.contains_key(name) {
                return Err(self.error(
                    Loc::default(),
                    format!("Used chip '{name}' is neither a built-in chip nor a custom chip"),
                ));
            }
            custom.push(name);
        }

        for name in custom {
            if chain.iter().any(|c| c == name) {
                let mut cycle = chain.to_vec();
                cycle.push(name.to_string());
                return Err(self.error(
                    Loc::default(),
                    format!("Circular dependency detected: [{}]", cycle.join(" ")),
                ));
            }
            if resolved.contains_key(name) {
                debug!("chip '{name}' already resolved");
                continue;
            }

            let source = self
                .sources
                .get(name)
                .ok_or_else(|| ResolveError::ChipNotFound(name.to_string()))?;
            let parsed = nandsim_hdl::parse_chip(source)?;
            let (definition, _) =
                Resolver::new(parsed, name, self.sources, self.limits).resolve(resolved, chain)?;
            resolved.insert(name.to_string(), definition);
        }
        Ok(())
    }

    /// Sorts every connection into the input or output pass by looking its
    /// pin up on the part, failing on the first unknown pin.
    fn split_connections<'p>(
        &self,
        parts: &'p [nandsim_hdl::PartDecl],
        resolved: &Resolved,
    ) -> Result<(Vec<PendingConnection<'p>>, Vec<PendingConnection<'p>>), ResolveError> {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for (part_index, part) in parts.iter().enumerate() {
            let lookup = PartShape::of(&part.name, resolved);
            for decl in &part.connections {
                let pin = &decl.pin.name;
                let (bucket, width) = match (lookup.input(pin), lookup.output(pin)) {
                    (Some(w), _) => (&mut inputs, w),
                    (None, Some(w)) => (&mut outputs, w),
                    (None, None) => {
                        return Err(self.error(
                            decl.pin.loc,
                            format!("Pin '{}' not found in part '{}'", pin, part.name),
                        ))
                    }
                };
                bucket.push(PendingConnection {
                    part_index,
                    part_name: &part.name,
                    pin_width: width,
                    decl,
                });
            }
        }
        Ok((inputs, outputs))
    }

    fn resolve_pin(&self, pending: &PendingConnection<'_>) -> Result<PinBinding, ResolveError> {
        let pin = &pending.decl.pin;
        let range = match pin.range {
            Some(r) if r.start > r.end || r.end >= pending.pin_width => {
                return Err(self.error(
                    r.loc,
                    format!(
                        "Pin '{}' range out of bounds for part '{}'",
                        pin.name, pending.part_name
                    ),
                ));
            }
            Some(r) => BitRange::new(r.start, r.end),
            None => BitRange::full(pending.pin_width),
        };
        Ok(PinBinding {
            name: pin.name.clone(),
            range,
        })
    }

    fn resolve_output(&mut self, pending: &PendingConnection<'_>) -> Result<Connection, ResolveError> {
        let pin = self.resolve_pin(pending)?;
        let signal = &pending.decl.signal;
        let name = &signal.name;

        if signal.is_constant() {
            return Err(self.error(signal.loc, format!("Constant signal '{name}' cannot be driven")));
        }
        if self.inputs.contains_key(name) {
            return Err(self.error(signal.loc, format!("Chip input '{name}' cannot be driven")));
        }

        let output_width = self.outputs.get(name).copied();
        let (kind, range) = match (signal.range, output_width) {
            (Some(_), None) => {
                return Err(self.error(
                    signal.loc,
                    format!("Internal output signal '{name}' cannot be partially defined"),
                ));
            }
            (Some(r), Some(width)) => {
                let range = self.check_signal_range(r, name, width, &pin)?;
                if !self.output_coverage.claim(name.clone(), range) {
                    return Err(self.error(
                        r.loc,
                        format!("Signal '{name}' range overlaps with existing ranges"),
                    ));
                }
                (SignalKind::Output, range)
            }
            (None, Some(width)) => {
                if width != pin.range.width() {
                    return Err(self.error(
                        signal.loc,
                        format!("Signal '{name}' width does not match pin '{}' width", pin.name),
                    ));
                }
                let range = BitRange::full(width);
                if !self.output_coverage.claim(name.clone(), range) {
                    return Err(self.error(
                        signal.loc,
                        format!("Signal '{name}' range overlaps with existing ranges"),
                    ));
                }
                (SignalKind::Output, range)
            }
            (None, None) => {
                let width = pin.range.width();
                if self.internal_signals.insert(name.clone(), width).is_some() {
                    return Err(self.error(
                        signal.loc,
                        format!("Internal signal '{name}' already defined"),
                    ));
                }
                (SignalKind::Internal, BitRange::full(width))
            }
        };

        Ok(Connection {
            pin,
            signal: SignalBinding {
                name: name.clone(),
                kind,
                range,
            },
        })
    }

    fn resolve_input(&mut self, pending: &PendingConnection<'_>) -> Result<Connection, ResolveError> {
        let pin = self.resolve_pin(pending)?;
        let decl_pin = &pending.decl.pin;
        if !self
            .pin_coverage
            .claim((pending.part_index, pin.name.clone()), pin.range)
        {
            return Err(self.error(
                decl_pin.range_loc(),
                format!("Pin '{}' range overlaps with existing ranges", pin.name),
            ));
        }

        let signal = &pending.decl.signal;
        let name = &signal.name;

        let (kind, width) = if signal.is_constant() {
            (SignalKind::Constant(name == "true"), None)
        } else if let Some(&w) = self.internal_signals.get(name) {
            (SignalKind::Internal, Some(w))
        } else if let Some(&w) = self.inputs.get(name) {
            (SignalKind::Input, Some(w))
        } else {
            return Err(self.error(
                signal.loc,
                format!("Signal '{name}' is neither an internal signal nor a chip input"),
            ));
        };

        let range = match (signal.range, width) {
            (Some(r), Some(width)) => self.check_signal_range(r, name, width, &pin)?,
            (Some(r), None) => self.check_signal_range(r, name, u32::MAX, &pin)?,
            (None, Some(width)) => {
                if width != pin.range.width() {
                    return Err(self.error(
                        signal.loc,
                        format!("Signal '{name}' width does not match pin '{}' width", pin.name),
                    ));
                }
                BitRange::full(width)
            }
            (None, None) => BitRange::full(pin.range.width()),
        };

        Ok(Connection {
            pin,
            signal: SignalBinding {
                name: name.clone(),
                kind,
                range,
            },
        })
    }

    /// Validates an explicit signal range against the signal's width and
    /// the already-resolved pin range.
    fn check_signal_range(
        &self,
        r: RangeDecl,
        name: &str,
        width: u32,
        pin: &PinBinding,
    ) -> Result<BitRange, ResolveError> {
        if r.start > r.end {
            return Err(self.error(r.loc, format!("Signal '{name}' range is invalid")));
        }
        if r.end >= width {
            return Err(self.error(r.loc, format!("Signal '{name}' range out of bounds")));
        }
        let range = BitRange::new(r.start, r.end);
        if range.width() != pin.range.width() {
            return Err(self.error(
                r.loc,
                format!(
                    "Signal '{name}' range width does not match pin '{}' range width",
                    pin.name
                ),
            ));
        }
        Ok(range)
    }
}

/// Returns the last declaration when there are more than `max` of them.
fn over_limit(decls: &[IoDecl], max: usize) -> Option<&IoDecl> {
    if decls.len() > max {
        decls.last()
    } else {
        None
    }
}

/// Pin widths of a used chip, from the built-in table or its resolved
/// definition.
enum PartShape<'r> {
    Builtin(Option<Primitive>),
    Custom(&'r ResolvedChipDefinition),
}

impl<'r> PartShape<'r> {
    fn of(name: &str, resolved: &'r Resolved) -> Self {
        match Primitive::from_name(name) {
            Some(prim) => PartShape::Builtin(Some(prim)),
            None => resolved
                .get(name)
                .map_or(PartShape::Builtin(None), PartShape::Custom),
        }
    }

    fn input(&self, pin: &str) -> Option<u32> {
        match self {
            PartShape::Builtin(prim) => prim.and_then(|p| p.input_width(pin)),
            PartShape::Custom(def) => def.inputs.get(pin).copied(),
        }
    }

    fn output(&self, pin: &str) -> Option<u32> {
        match self {
            PartShape::Builtin(prim) => prim.and_then(|p| p.output_width(pin)),
            PartShape::Custom(def) => def.outputs.get(pin).copied(),
        }
    }
}

/// Collects every custom chip reachable from `definition`.
fn closure_of(definition: &ResolvedChipDefinition, resolved: &Resolved) -> Resolved {
    let mut closure = Resolved::new();
    let mut stack: Vec<&str> = definition.custom_dependencies();
    while let Some(name) = stack.pop() {
        if closure.contains_key(name) {
            continue;
        }
        if let Some(def) = resolved.get(name) {
            stack.extend(def.custom_dependencies());
            closure.insert(name.to_string(), def.clone());
        }
    }
    closure
}

/// Parses and resolves the chip stored under `name` in `sources`.
pub fn resolve_chip(
    name: &str,
    sources: &SourceMap,
    limits: ResolverLimits,
) -> Result<(ResolvedChipDefinition, Resolved), ResolveError> {
    let source = sources
        .get(name)
        .ok_or_else(|| ResolveError::ChipNotFound(name.to_string()))?;
    let parsed = nandsim_hdl::parse_chip(source)?;
    let mut resolved = Resolved::new();
    Resolver::new(parsed, name, sources, limits).resolve(&mut resolved, &[])
}

/// Builds a source map from `(name, text)` pairs.
pub fn source_map<'s>(entries: impl IntoIterator<Item = (&'s str, &'s str)>) -> SourceMap {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT: &str = "CHIP CustomNot {
    IN in;
    OUT out;

    PARTS:
    Nand(a=in, b=in, out=out);
}";

    fn resolve(name: &str, entries: &[(&str, &str)]) -> Result<(ResolvedChipDefinition, Resolved), ResolveError> {
        resolve_chip(name, &source_map(entries.iter().copied()), ResolverLimits::default())
    }

    fn message(name: &str, entries: &[(&str, &str)]) -> String {
        resolve(name, entries).unwrap_err().to_string()
    }

    #[test]
    fn and_with_custom_not() {
        let and = "CHIP And {
    IN a, b;
    OUT out;

    PARTS:
    Nand(a=a, b=b, out=nandOut);
    CustomNot(in=nandOut, out=out);
}";
        let (def, closure) = resolve("And", &[("And", and), ("CustomNot", NOT)]).unwrap();
        assert_eq!(def.name, "And");
        assert_eq!(def.internal_signals.get("nandOut"), Some(&1));
        assert_eq!(closure.keys().collect::<Vec<_>>(), vec!["CustomNot"]);

        let nand = &def.parts[0];
        assert_eq!(nand.primitive, Some(Primitive::Nand));
        assert_eq!(nand.input_connections.len(), 2);
        assert_eq!(nand.output_connections[0].signal.kind, SignalKind::Internal);
        let not = &def.parts[1];
        assert_eq!(not.primitive, None);
        assert_eq!(not.output_connections[0].signal.kind, SignalKind::Output);
    }

    #[test]
    fn internal_signal_takes_pin_range_width() {
        let src = "CHIP Split {
    IN in[16];
    OUT low[8], any;

    PARTS:
    Not16(in=in, out[0..7]=lo, out[8..15]=low);
    Or8Way(in=lo, out=any);
}";
        let (def, _) = resolve("Split", &[("Split", src)]).unwrap();
        assert_eq!(def.internal_signals.get("lo"), Some(&8));
    }

    #[test]
    fn constants_take_pin_width() {
        let src = "CHIP Zero {
    IN a[16];
    OUT out[16];

    PARTS:
    And16(a=a, b=false, out=out);
}";
        let (def, _) = resolve("Zero", &[("Zero", src)]).unwrap();
        let conn = &def.parts[0].input_connections[1];
        assert_eq!(conn.signal.kind, SignalKind::Constant(false));
        assert_eq!(conn.signal.range.width(), 16);
    }

    #[test]
    fn constant_range_must_match_pin() {
        let src = "CHIP Zero {
    IN a[16];
    OUT out[16];

    PARTS:
    And16(a=a, b[0..3]=true[0..1], out=out);
}";
        let err = message("Zero", &[("Zero", src)]);
        assert!(err.ends_with("Signal 'true' range width does not match pin 'b' range width"));
    }

    #[test]
    fn constant_cannot_be_driven() {
        let src = "CHIP Bad {
    IN a;
    OUT out;

    PARTS:
    Not(in=a, out=true);
}";
        assert_eq!(
            message("Bad", &[("Bad", src)]),
            "Resolution error at line 6, column 19: Constant signal 'true' cannot be driven"
        );
    }

    #[test]
    fn chip_input_cannot_be_driven() {
        let src = "CHIP Bad {
    IN a;
    OUT out;

    PARTS:
    Not(in=a, out=a);
}";
        assert_eq!(
            message("Bad", &[("Bad", src)]),
            "Resolution error at line 6, column 19: Chip input 'a' cannot be driven"
        );
    }

    #[test]
    fn diamond_dependency_is_resolved_once() {
        let top = "CHIP Top {
    IN a;
    OUT x, y;

    PARTS:
    Left(in=a, out=x);
    Right(in=a, out=y);
}";
        let left = "CHIP Left { IN in; OUT out; PARTS: CustomNot(in=in, out=out); }";
        let right = "CHIP Right { IN in; OUT out; PARTS: CustomNot(in=in, out=out); }";
        let (_, closure) = resolve(
            "Top",
            &[("Top", top), ("Left", left), ("Right", right), ("CustomNot", NOT)],
        )
        .unwrap();
        assert_eq!(
            closure.keys().collect::<Vec<_>>(),
            vec!["CustomNot", "Left", "Right"]
        );
    }

    #[test]
    fn missing_top_level_source() {
        let err = resolve("Nope", &[]).unwrap_err();
        assert_eq!(err, ResolveError::ChipNotFound("Nope".into()));
    }

    #[test]
    fn dependency_syntax_error_propagates() {
        let top = "CHIP Top { IN a; OUT out; PARTS: Broken(in=a, out=out); }";
        let broken = "CHIP Broken { IN in OUT out; }";
        let err = resolve("Top", &[("Top", top), ("Broken", broken)]).unwrap_err();
        assert!(matches!(err, ResolveError::Syntax(_)));
    }

    #[test]
    fn limits_are_configurable() {
        let src = "CHIP Two {
    IN a;
    OUT out;

    PARTS:
    Not(in=a, out=x);
    Not(in=x, out=out);
}";
        let limits = ResolverLimits {
            max_parts: 1,
            ..ResolverLimits::default()
        };
        let err = resolve_chip("Two", &source_map([("Two", src)]), limits).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Resolution error at line 7, column 5: Number of parts exceeds maximum allowed"
        );
    }

    #[test]
    fn deterministic_output() {
        let entries = [("CustomNot", NOT)];
        let a = resolve("CustomNot", &entries).unwrap();
        let b = resolve("CustomNot", &entries).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a.0).unwrap(),
            serde_json::to_string(&b.0).unwrap()
        );
    }
}
