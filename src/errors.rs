//! Validation errors

use std::fmt::Display;

/// All the possible validation issues we might encounter
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (TooFewPoints) A face has fewer than the minimal #points
    TooFewPoints(usize),
    /// (IndexOutOfRange) A face refers to a vertex index past the end of the point list
    IndexOutOfRange { index: usize, len: usize },
    /// (FragmentBudget) A BSP operation produced more polygon fragments than allowed
    FragmentBudget { limit: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TooFewPoints(n) => {
                write!(f, "(TooFewPoints) A face has fewer than 3 points: {}", n)
            },
            ValidationError::IndexOutOfRange { index, len } => {
                write!(
                    f,
                    "(IndexOutOfRange) Face index {} is out of range (points.len = {})",
                    index, len
                )
            },
            ValidationError::FragmentBudget { limit } => {
                write!(
                    f,
                    "(FragmentBudget) BSP operation exceeded the fragment budget of {}",
                    limit
                )
            },
        }
    }
}
