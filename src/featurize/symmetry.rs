//! Molecular point group and rotational symmetry number.

use super::base::{FeatureName, Featurizer, noun};
use super::text::Value;
use super::Error;
use crate::chem::pointgroup::{PointGroup, point_group};
use crate::config;
use crate::molecule::Molecule;

fn detect(molecule: &Molecule, tolerance: f64) -> Result<PointGroup, Error> {
    let conformer = molecule.conformer()?;
    Ok(point_group(molecule.graph_with_hydrogens(), conformer, tolerance))
}

/// Schoenflies symbol of the conformer's point group.
#[derive(Debug, Clone)]
pub struct PointGroupFeaturizer {
    tolerance: f64,
}

impl Default for PointGroupFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PointGroupFeaturizer {
    pub fn new() -> Self {
        Self::with_tolerance(config::settings().symmetry.tolerance)
    }

    /// Matches atoms under a symmetry operation within `tolerance` Å.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Featurizer for PointGroupFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Text(detect(molecule, self.tolerance)?.symbol)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["point_group".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("point group")]
    }
}

/// Number of proper rotations of the point group.
#[derive(Debug, Clone)]
pub struct RotationalSymmetryNumberFeaturizer {
    tolerance: f64,
}

impl Default for RotationalSymmetryNumberFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationalSymmetryNumberFeaturizer {
    pub fn new() -> Self {
        Self::with_tolerance(config::settings().symmetry.tolerance)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Featurizer for RotationalSymmetryNumberFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::from(detect(molecule, self.tolerance)?.symmetry_number)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["rotational_symmetry_number".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("rotational symmetry number")]
    }
}
