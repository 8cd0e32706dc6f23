use thiserror::Error;

use super::Side;

/// Error returned when a reaction triplet cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactionParseError {
    /// The metadata line has fewer than seven whitespace-separated fields.
    #[error("metadata line has {fields} fields, reversibility flag expected in field 7")]
    MissingReversibility { fields: usize },
    /// The reversibility field is neither `True` nor `False`.
    #[error("invalid reversibility flag '{token}'")]
    InvalidReversibility { token: String },
    /// The equation line has no standalone `=`.
    #[error("no '=' separator in equation")]
    MissingEquationSeparator,
    /// The mapped line has no `>>`.
    #[error("no '>>' separator in mapped reaction")]
    MissingArrow,
    /// One side of the equation or of the mapped reaction is empty.
    #[error("{side} side is empty")]
    EmptySide { side: Side },
}
