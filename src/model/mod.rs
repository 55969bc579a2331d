//! Core data structures representing molecules.
//!
//! - [`types`] – Periodic table elements and the bond type vocabulary.
//! - [`atom`] – Graph atoms with charge, isotope, aromaticity and hydrogen counts.
//! - [`graph`] – Molecular graphs with adjacency lists and hydrogen expansion.
//! - [`conformer`] – Cartesian coordinates for the explicit-hydrogen graph.
//!
//! The graph carries no coordinates; a [`Conformer`](conformer::Conformer)
//! is attached separately so that purely topological features never pay for
//! an embedding.

pub mod atom;
pub mod conformer;
pub mod graph;
pub mod types;
