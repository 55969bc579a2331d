//! Quantum-chemistry engines.
//!
//! Electronic properties are never computed in-crate. A [`QuantumEngine`]
//! turns a [`Molecule`] into a [`QuantumResult`]; the shipped implementation
//! is [`XtbEngine`], which drives the `xtb` executable as a subprocess.
//! Featurizers hold engines behind `Arc<dyn QuantumEngine>`, so tests and
//! callers can substitute their own.
//!
//! Per-atom arrays in a result follow the atoms of
//! [`Molecule::graph_with_hydrogens`].

mod error;
pub mod reactivity;
pub mod xtb;

pub use error::Error;
pub use xtb::XtbEngine;

use crate::molecule::Molecule;
use std::fmt;
use std::sync::{Arc, OnceLock};

static DEFAULT_ENGINE: OnceLock<Arc<XtbEngine>> = OnceLock::new();

/// Process-wide [`XtbEngine`] shared by featurizers built with `new()`,
/// so its result cache is shared too.
pub fn default_engine() -> Arc<dyn QuantumEngine> {
    DEFAULT_ENGINE.get_or_init(|| Arc::new(XtbEngine::new())).clone()
}

/// Electronic structure of one molecule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuantumResult {
    /// HOMO energy in eV.
    pub homo: f64,
    /// LUMO energy in eV.
    pub lumo: f64,
    /// Vertical ionization potential in eV.
    pub ionization_potential: f64,
    /// Vertical electron affinity in eV.
    pub electron_affinity: f64,
    /// Partial charge per atom.
    pub charges: Vec<f64>,
    /// Fukui index f⁺ per atom.
    pub fukui_plus: Vec<f64>,
    /// Fukui index f⁻ per atom.
    pub fukui_minus: Vec<f64>,
    /// Dipole vector in Debye.
    pub dipole: [f64; 3],
    /// Wiberg bond orders as `(i, j, order)` with zero-based atom indices.
    pub wiberg_bond_orders: Vec<(usize, usize, f64)>,
}

impl QuantumResult {
    /// Global electrophilicity index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveGap`] when the ionization potential does
    /// not exceed the electron affinity.
    pub fn electrophilicity(&self) -> Result<f64, Error> {
        reactivity::electrophilicity(self.ionization_potential, self.electron_affinity)
    }

    pub fn nucleophilicity(&self) -> f64 {
        reactivity::nucleophilicity(self.ionization_potential)
    }

    pub fn electrofugality(&self) -> Result<f64, Error> {
        reactivity::electrofugality(self.ionization_potential, self.electron_affinity)
    }

    pub fn nucleofugality(&self) -> Result<f64, Error> {
        reactivity::nucleofugality(self.ionization_potential, self.electron_affinity)
    }

    pub fn atomic_electrophilicity(&self) -> Result<Vec<f64>, Error> {
        reactivity::atomic_electrophilicity(
            &self.fukui_plus,
            self.ionization_potential,
            self.electron_affinity,
        )
    }

    pub fn atomic_nucleophilicity(&self) -> Vec<f64> {
        reactivity::atomic_nucleophilicity(&self.fukui_minus, self.ionization_potential)
    }

    /// Norm of the dipole vector in Debye.
    pub fn dipole_magnitude(&self) -> f64 {
        self.dipole.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}

/// A backend that computes electronic properties of a molecule.
pub trait QuantumEngine: Send + Sync + fmt::Debug {
    /// Short name used in logs and feature metadata.
    fn name(&self) -> &str;

    /// Computes the electronic structure of `molecule`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the backend cannot be run or its output
    /// cannot be read.
    fn calculate(&self, molecule: &Molecule) -> Result<QuantumResult, Error>;
}
