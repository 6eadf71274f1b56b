//! The closed set of gate kinds and their evaluation function.
//!
//! Evaluation is the hottest loop of the engine, so the kinds form a
//! `Copy` enum dispatched through a single `match` in
//! [`GateKind::evaluate`] rather than a trait object.

use std::fmt;

/// Kind of a simulated gate.
///
/// Every logic kind with zero inputs evaluates to `false`, regardless of
/// whether its classical truth table would yield `true` for an empty
/// input set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// `true` iff every input is `true`.
    And,
    /// `true` iff any input is `true`.
    Or,
    /// `true` iff an odd number of inputs are `true`.
    Xor,
    /// Negated [`And`](Self::And).
    Nand,
    /// Negated [`Or`](Self::Or).
    Nor,
    /// Negated [`Xor`](Self::Xor).
    Xnor,
    /// Pass-through wire node: `true` iff any input is `true`.
    ///
    /// Junctions add no delay. A tick settles them from the current states
    /// before any other gate is evaluated.
    Junction,
    /// Constant high source.
    ConstantOn,
    /// Constant low source.
    ConstantOff,
    /// Externally driven source that holds the last value written to it.
    Switch,
    /// Externally driven source that falls back to `false` every tick,
    /// so a written `true` is visible for exactly one tick.
    Pulse,
}

impl GateKind {
    /// Every kind, in declaration order.
    pub const ALL: [GateKind; 11] = [
        GateKind::And,
        GateKind::Or,
        GateKind::Xor,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xnor,
        GateKind::Junction,
        GateKind::ConstantOn,
        GateKind::ConstantOff,
        GateKind::Switch,
        GateKind::Pulse,
    ];

    /// State a freshly allocated (or reset) gate of this kind starts in.
    pub fn reset_state(self) -> bool {
        matches!(self, GateKind::ConstantOn)
    }

    /// Whether this kind reads its inputs at all.
    ///
    /// Sources may still be wired as inputs in the net list; their
    /// evaluation simply ignores them.
    pub fn accepts_inputs(self) -> bool {
        !self.is_source()
    }

    /// Whether this kind is a source (constant or externally driven).
    pub fn is_source(self) -> bool {
        matches!(
            self,
            GateKind::ConstantOn | GateKind::ConstantOff | GateKind::Switch | GateKind::Pulse
        )
    }

    /// Whether external callers are expected to drive this kind with
    /// `set_state`. Writes to other kinds are allowed but get overwritten
    /// on the next tick.
    pub fn is_externally_driven(self) -> bool {
        matches!(self, GateKind::Switch | GateKind::Pulse)
    }

    /// Compute the next state of a gate of this kind.
    ///
    /// `current` is the gate's own current state; `inputs` yields the
    /// current state of every input in order.
    #[inline]
    pub fn evaluate<I>(self, current: bool, inputs: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        match self {
            GateKind::ConstantOn => true,
            GateKind::ConstantOff | GateKind::Pulse => false,
            GateKind::Switch => current,
            GateKind::And => {
                let (total, high) = tally(inputs);
                total > 0 && high == total
            }
            GateKind::Or | GateKind::Junction => tally(inputs).1 > 0,
            GateKind::Xor => tally(inputs).1 % 2 == 1,
            GateKind::Nand => {
                let (total, high) = tally(inputs);
                total > 0 && high != total
            }
            GateKind::Nor => {
                let (total, high) = tally(inputs);
                total > 0 && high == 0
            }
            GateKind::Xnor => {
                let (total, high) = tally(inputs);
                total > 0 && high % 2 == 0
            }
        }
    }
}

/// `(input count, high input count)`.
#[inline]
fn tally<I: IntoIterator<Item = bool>>(inputs: I) -> (usize, usize) {
    inputs
        .into_iter()
        .fold((0, 0), |(total, high), s| (total + 1, high + s as usize))
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Xor => "XOR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xnor => "XNOR",
            GateKind::Junction => "JUNCTION",
            GateKind::ConstantOn => "CONSTANT_ON",
            GateKind::ConstantOff => "CONSTANT_OFF",
            GateKind::Switch => "SWITCH",
            GateKind::Pulse => "PULSE",
        };
        f.write_str(name)
    }
}
