use thiserror::Error;

/// Why a SMILES string was rejected. Positions are character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("unknown element symbol '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    /// `[` with no matching `]`.
    #[error("bracket atom at position {pos} is never closed")]
    UnclosedBracket { pos: usize },
    #[error("ring label {digit} is opened but never closed")]
    UnclosedRing { digit: u16 },
    #[error("unbalanced parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    /// Charge magnitude does not fit in an `i8`.
    #[error("charge out of range in bracket atom at position {pos}")]
    InvalidCharge { pos: usize },
    #[error("isotope out of range at position {pos}")]
    InvalidIsotope { pos: usize },
    /// `:` with no digits, or a class beyond `u32`.
    #[error("bad atom-map class at position {pos}")]
    InvalidAtomClass { pos: usize },
    /// A ring label with no atom before it.
    #[error("ring label {digit} at position {pos} has no atom to attach to")]
    InvalidRingBond { digit: u16, pos: usize },
    #[error("atoms {a} and {b} are bonded twice")]
    DuplicateBond { a: usize, b: usize },
    #[error("ring label {digit} closes onto the atom that opened it")]
    SelfBond { digit: u16 },
    #[error("empty SMILES string")]
    EmptyInput,
    /// Both ends of a ring closure name a bond and they disagree.
    #[error("ring label {digit} has conflicting bond orders")]
    RingBondConflict { digit: u16 },
}
