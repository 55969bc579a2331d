//! Error types for the perception toolkit.

use crate::model::types::Element;
use thiserror::Error;

/// Errors raised while reading line notations or perceiving structure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed SMILES string.
    #[error("invalid SMILES at position {position}: {detail}")]
    Smiles {
        /// Byte offset of the offending character.
        position: usize,
        /// Description of the problem.
        detail: String,
    },

    /// Malformed SELFIES string.
    #[error("invalid SELFIES symbol '{symbol}': {detail}")]
    Selfies {
        /// The symbol that could not be decoded.
        symbol: String,
        /// Description of the problem.
        detail: String,
    },

    /// Malformed or unsupported SMARTS pattern.
    #[error("invalid SMARTS pattern '{pattern}': {detail}")]
    Smarts {
        /// The full pattern.
        pattern: String,
        /// Description of the problem.
        detail: String,
    },

    /// An atom exceeds every allowed valence of its element.
    #[error("explicit valence {valence} for atom {index} ({element}) is greater than permitted")]
    Valence {
        /// Atom index in the parsed graph.
        index: usize,
        /// Element of the atom.
        element: Element,
        /// Observed bond valence including hydrogens.
        valence: usize,
    },

    /// The input contains no atoms.
    #[error("molecule is empty: at least one atom is required")]
    EmptyMolecule,

    /// Distance-geometry embedding failed for every attempted seed.
    #[error("conformer embedding failed after {attempts} attempts: {detail}")]
    Embedding {
        /// Number of attempts made.
        attempts: usize,
        /// Reason reported by the last attempt.
        detail: String,
    },

    /// Coordinates do not match the explicit-hydrogen graph.
    #[error("conformer has {found} positions but the molecule has {expected} atoms")]
    ConformerMismatch {
        /// Atom count of the explicit-hydrogen graph.
        expected: usize,
        /// Number of supplied positions.
        found: usize,
    },
}

impl Error {
    /// Creates a [`Smiles`](Error::Smiles) error.
    ///
    /// # Arguments
    ///
    /// * `position` — Byte offset in the input
    /// * `details` — Description of the problem
    pub fn smiles(position: usize, details: impl Into<String>) -> Self {
        Self::Smiles {
            position,
            detail: details.into(),
        }
    }

    /// Creates a [`Selfies`](Error::Selfies) error.
    ///
    /// # Arguments
    ///
    /// * `symbol` — The offending symbol
    /// * `details` — Description of the problem
    pub fn selfies(symbol: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Selfies {
            symbol: symbol.into(),
            detail: details.into(),
        }
    }

    /// Creates a [`Smarts`](Error::Smarts) error.
    ///
    /// # Arguments
    ///
    /// * `pattern` — The pattern being parsed
    /// * `details` — Description of the problem
    pub fn smarts(pattern: &str, details: impl Into<String>) -> Self {
        Self::Smarts {
            pattern: pattern.to_string(),
            detail: details.into(),
        }
    }

    /// Creates an [`Embedding`](Error::Embedding) error.
    ///
    /// # Arguments
    ///
    /// * `attempts` — Number of attempts made
    /// * `details` — Reason reported by the last attempt
    pub fn embedding(attempts: usize, details: impl Into<String>) -> Self {
        Self::Embedding {
            attempts,
            detail: details.into(),
        }
    }
}
