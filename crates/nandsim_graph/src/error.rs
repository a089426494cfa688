//! Error types for graph construction.

/// A failure while wiring a resolved chip into an executable graph.
///
/// Only [`GraphError::Cycle`] can arise from a definition the resolver
/// accepted. The other variants report a definition set that was not
/// produced by one resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Parts feed each other through purely combinational signals.
    #[error("Graph has cycles, cannot determine topological order")]
    Cycle,

    /// A part names a chip with no definition in the set being built.
    #[error("no resolved definition for chip '{0}'")]
    UnknownChip(String),

    /// A connection names a pin the part does not have.
    #[error("chip '{chip}' has no pin '{pin}'")]
    UnknownPin {
        /// The part's chip name.
        chip: String,
        /// The missing pin.
        pin: String,
    },

    /// A connection names a signal the enclosing chip does not declare,
    /// or addresses bits beyond its width.
    #[error("chip '{chip}' has no signal bits '{signal}[{start}..{end}]'")]
    UnknownSignal {
        /// The enclosing chip name.
        chip: String,
        /// The signal name.
        signal: String,
        /// First requested bit.
        start: u32,
        /// Last requested bit.
        end: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message() {
        assert_eq!(
            GraphError::Cycle.to_string(),
            "Graph has cycles, cannot determine topological order"
        );
    }

    #[test]
    fn unknown_signal_message() {
        let err = GraphError::UnknownSignal {
            chip: "Top".into(),
            signal: "x".into(),
            start: 0,
            end: 3,
        };
        assert_eq!(err.to_string(), "chip 'Top' has no signal bits 'x[0..3]'");
    }
}
