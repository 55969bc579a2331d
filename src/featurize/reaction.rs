//! Solvent accessibility of the embedded conformer.

use super::base::{FeatureName, Featurizer, indexed_labels, noun, pad_atom_row};
use super::text::Value;
use super::Error;
use crate::chem::surface::{Surface, solvent_accessible_surface};
use crate::config::{self, SasaSettings};
use crate::molecule::Molecule;

fn surface(molecule: &Molecule, settings: &SasaSettings) -> Result<Surface, Error> {
    let conformer = molecule.conformer()?;
    Ok(solvent_accessible_surface(
        molecule.graph_with_hydrogens(),
        conformer,
        settings,
    ))
}

/// Total solvent accessible surface area in Å².
#[derive(Debug, Clone)]
pub struct SolventAccessibleSurfaceAreaFeaturizer {
    settings: SasaSettings,
}

impl Default for SolventAccessibleSurfaceAreaFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SolventAccessibleSurfaceAreaFeaturizer {
    pub fn new() -> Self {
        Self::with_settings(config::settings().sasa.clone())
    }

    pub fn with_settings(settings: SasaSettings) -> Self {
        Self { settings }
    }
}

impl Featurizer for SolventAccessibleSurfaceAreaFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Float(surface(molecule, &self.settings)?.total_area)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["solvent_accessible_surface_area".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("solvent accessible surface area")]
    }
}

/// Volume enclosed by the solvent accessible surface in Å³.
#[derive(Debug, Clone)]
pub struct SolventAccessibleVolumeFeaturizer {
    settings: SasaSettings,
}

impl Default for SolventAccessibleVolumeFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SolventAccessibleVolumeFeaturizer {
    pub fn new() -> Self {
        Self::with_settings(config::settings().sasa.clone())
    }

    pub fn with_settings(settings: SasaSettings) -> Self {
        Self { settings }
    }
}

impl Featurizer for SolventAccessibleVolumeFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Float(surface(molecule, &self.settings)?.volume)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["solvent_accessible_volume".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("solvent accessible volume")]
    }
}

/// Accessible area of every atom, hydrogens included, zero-padded to `max_atoms`.
#[derive(Debug, Clone)]
pub struct SolventAccessibleAtomAreaFeaturizer {
    settings: SasaSettings,
    max_atoms: usize,
}

impl Default for SolventAccessibleAtomAreaFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SolventAccessibleAtomAreaFeaturizer {
    pub fn new() -> Self {
        Self::with_settings(config::settings().sasa.clone())
    }

    pub fn with_settings(settings: SasaSettings) -> Self {
        Self {
            settings,
            max_atoms: config::settings().text.max_atoms,
        }
    }

    pub fn with_max_atoms(mut self, max_atoms: usize) -> Self {
        self.max_atoms = max_atoms;
        self
    }
}

impl Featurizer for SolventAccessibleAtomAreaFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let atoms = molecule.graph_with_hydrogens().atom_count();
        if atoms > self.max_atoms {
            return Err(Error::TooManyAtoms {
                atoms,
                max_atoms: self.max_atoms,
            });
        }
        pad_atom_row(surface(molecule, &self.settings)?.atom_areas, self.max_atoms)
    }

    fn feature_labels(&self) -> Vec<String> {
        indexed_labels("solvent_accessible_atom_area", self.max_atoms)
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("solvent accessible atomic areas")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        Molecule::from_smiles("O").unwrap()
    }

    #[test]
    fn surface_area_and_volume_of_water() {
        let area = SolventAccessibleSurfaceAreaFeaturizer::new().featurize(&water()).unwrap();
        assert_eq!(area.len(), 1);
        let a = area[0].as_f64().unwrap();
        assert!(a > 50.0 && a < 300.0, "{a}");

        let volume = SolventAccessibleVolumeFeaturizer::new().featurize(&water()).unwrap();
        assert!(volume[0].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn atom_areas_sum_to_total() {
        let f = SolventAccessibleAtomAreaFeaturizer::new();
        let row = f.featurize(&water()).unwrap();
        assert_eq!(row.len(), f.feature_labels().len());
        let sum: f64 = row.iter().filter_map(Value::as_f64).sum();
        let total = SolventAccessibleSurfaceAreaFeaturizer::new().featurize(&water()).unwrap()[0]
            .as_f64()
            .unwrap();
        assert!((sum - total).abs() < 1e-9);
    }
}
