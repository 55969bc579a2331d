//! Error types for featurization and prompt rendering.

use thiserror::Error;

/// Errors raised by featurizers, comparators and prompt helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor or call received an argument outside its domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested part of speech has no phrase for this featurizer.
    #[error("unknown part of speech '{pos}'; available: {available}")]
    UnknownPartOfSpeech {
        /// Requested part-of-speech key.
        pos: String,
        /// Comma-separated keys that are available.
        available: String,
    },

    /// Two parallel inputs have different lengths.
    #[error("length mismatch: {left} {left_name} but {right} {right_name}")]
    LengthMismatch {
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    },

    /// A per-atom featurizer received a molecule wider than its row.
    #[error("molecule has {atoms} atoms but at most {max_atoms} are supported")]
    TooManyAtoms {
        /// Atoms in the featurized graph.
        atoms: usize,
        /// Configured row width.
        max_atoms: usize,
    },

    /// A per-bond featurizer received a molecule with more bonds than its row.
    #[error("molecule has {bonds} bonds but at most {max_bonds} are supported")]
    TooManyBonds {
        /// Bonds in the featurized graph.
        bonds: usize,
        /// Configured row width.
        max_bonds: usize,
    },

    /// Structure perception or embedding failed.
    #[error(transparent)]
    Chem(#[from] crate::chem::Error),

    /// The quantum-chemistry engine failed.
    #[error(transparent)]
    Engine(#[from] crate::engine::Error),
}

impl Error {
    /// Creates an [`InvalidArgument`](Error::InvalidArgument) error.
    ///
    /// # Arguments
    ///
    /// * `detail` — Description of the offending argument
    pub fn invalid_argument(detail: impl Into<String>) -> Self {
        Self::InvalidArgument(detail.into())
    }

    /// Creates a [`LengthMismatch`](Error::LengthMismatch) error.
    ///
    /// # Arguments
    ///
    /// * `left_name`, `left` — Name and length of the first input
    /// * `right_name`, `right` — Name and length of the second input
    pub fn length_mismatch(
        left_name: &'static str,
        left: usize,
        right_name: &'static str,
        right: usize,
    ) -> Self {
        Self::LengthMismatch {
            left_name,
            left,
            right_name,
            right,
        }
    }
}
