//! Electronic properties.
//!
//! Hydrogen-bond donor/acceptor and valence electron counts are
//! topological. Everything else comes from a [`QuantumEngine`]: frontier
//! orbital energies, vertical IP and EA, partial charges and the
//! conceptual-DFT reactivity descriptors derived from them. Per-atom rows
//! follow the explicit-hydrogen graph and are zero-padded to `max_atoms`.

use super::base::{FeatureName, Featurizer, default_implementors, indexed_labels, noun, pad_atom_row};
use super::text::Value;
use super::Error;
use crate::chem::descriptors;
use crate::config;
use crate::engine::{self, QuantumEngine, QuantumResult};
use crate::molecule::Molecule;
use std::sync::Arc;

/// Number of Lipinski hydrogen bond acceptors (N and O atoms).
#[derive(Debug, Clone, Default)]
pub struct HydrogenAcceptorCountFeaturizer;

impl HydrogenAcceptorCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for HydrogenAcceptorCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::from(descriptors::hba_count(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_hydrogen_bond_acceptors".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of hydrogen bond acceptors")]
    }
}

/// Number of Lipinski hydrogen bond donors (N and O atoms bearing hydrogen).
#[derive(Debug, Clone, Default)]
pub struct HydrogenDonorCountFeaturizer;

impl HydrogenDonorCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for HydrogenDonorCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::from(descriptors::hbd_count(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_hydrogen_bond_donors".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of hydrogen bond donors")]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValenceElectronCountFeaturizer;

impl ValenceElectronCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for ValenceElectronCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Int(descriptors::valence_electrons(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_valence_electrons".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of valence electrons")]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Homo,
    Lumo,
    IonizationPotential,
    ElectronAffinity,
    Electrophilicity,
    Nucleophilicity,
    Electrofugality,
    Nucleofugality,
    AtomCharges,
    AtomElectrophilicity,
    AtomNucleophilicity,
}

impl Quantity {
    fn per_atom(self) -> bool {
        matches!(
            self,
            Quantity::AtomCharges | Quantity::AtomElectrophilicity | Quantity::AtomNucleophilicity
        )
    }

    fn label(self) -> &'static str {
        match self {
            Quantity::Homo => "homo_energy",
            Quantity::Lumo => "lumo_energy",
            Quantity::IonizationPotential => "ionization_potential",
            Quantity::ElectronAffinity => "electron_affinity",
            Quantity::Electrophilicity => "electrophilicity_index",
            Quantity::Nucleophilicity => "nucleophilicity_index",
            Quantity::Electrofugality => "electrofugality",
            Quantity::Nucleofugality => "nucleofugality",
            Quantity::AtomCharges => "atom_charge",
            Quantity::AtomElectrophilicity => "atom_electrophilicity",
            Quantity::AtomNucleophilicity => "atom_nucleophilicity",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Quantity::Homo => "energy of the highest occupied molecular orbital (HOMO)",
            Quantity::Lumo => "energy of the lowest unoccupied molecular orbital (LUMO)",
            Quantity::IonizationPotential => "ionization potential",
            Quantity::ElectronAffinity => "electron affinity",
            Quantity::Electrophilicity => "electrophilicity index",
            Quantity::Nucleophilicity => "nucleophilicity index",
            Quantity::Electrofugality => "electrofugality",
            Quantity::Nucleofugality => "nucleofugality",
            Quantity::AtomCharges => "partial charges of the atoms",
            Quantity::AtomElectrophilicity => "atomic electrophilicities",
            Quantity::AtomNucleophilicity => "atomic nucleophilicities",
        }
    }

    fn scalar(self, result: &QuantumResult) -> Result<f64, engine::Error> {
        Ok(match self {
            Quantity::Homo => result.homo,
            Quantity::Lumo => result.lumo,
            Quantity::IonizationPotential => result.ionization_potential,
            Quantity::ElectronAffinity => result.electron_affinity,
            Quantity::Electrophilicity => result.electrophilicity()?,
            Quantity::Nucleophilicity => result.nucleophilicity(),
            Quantity::Electrofugality => result.electrofugality()?,
            Quantity::Nucleofugality => result.nucleofugality()?,
            _ => f64::NAN,
        })
    }

    fn per_atom_values(self, result: &QuantumResult) -> Result<Vec<f64>, engine::Error> {
        Ok(match self {
            Quantity::AtomCharges => result.charges.clone(),
            Quantity::AtomElectrophilicity => result.atomic_electrophilicity()?,
            Quantity::AtomNucleophilicity => result.atomic_nucleophilicity(),
            _ => Vec::new(),
        })
    }
}

#[derive(Debug, Clone)]
struct EngineProperty {
    quantity: Quantity,
    engine: Arc<dyn QuantumEngine>,
    max_atoms: usize,
}

impl EngineProperty {
    fn new(quantity: Quantity, engine: Arc<dyn QuantumEngine>) -> Self {
        Self {
            quantity,
            engine,
            max_atoms: config::settings().text.max_atoms,
        }
    }

    fn row(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        if !self.quantity.per_atom() {
            let result = self.engine.calculate(molecule)?;
            return Ok(vec![Value::Float(self.quantity.scalar(&result)?)]);
        }
        let atoms = molecule.graph_with_hydrogens().atom_count();
        if atoms > self.max_atoms {
            return Err(Error::TooManyAtoms {
                atoms,
                max_atoms: self.max_atoms,
            });
        }
        let result = self.engine.calculate(molecule)?;
        pad_atom_row(self.quantity.per_atom_values(&result)?, self.max_atoms)
    }

    fn labels(&self) -> Vec<String> {
        if self.quantity.per_atom() {
            indexed_labels(self.quantity.label(), self.max_atoms)
        } else {
            vec![self.quantity.label().to_string()]
        }
    }

    fn implementors(&self) -> Vec<String> {
        let mut out = default_implementors();
        out.push(format!("{} engine", self.engine.name()));
        out
    }
}

macro_rules! engine_featurizer {
    ($(#[$doc:meta])* $name:ident, $quantity:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(EngineProperty);

        impl $name {
            /// Uses the shared default engine.
            pub fn new() -> Self {
                Self::with_engine(engine::default_engine())
            }

            pub fn with_engine(engine: Arc<dyn QuantumEngine>) -> Self {
                Self(EngineProperty::new($quantity, engine))
            }

            /// Sets the width of per-atom rows; scalar featurizers ignore it.
            pub fn with_max_atoms(mut self, max_atoms: usize) -> Self {
                self.0.max_atoms = max_atoms;
                self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Featurizer for $name {
            fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
                self.0.row(molecule)
            }

            fn feature_labels(&self) -> Vec<String> {
                self.0.labels()
            }

            fn feature_names(&self) -> Vec<FeatureName> {
                vec![noun(self.0.quantity.noun())]
            }

            fn implementors(&self) -> Vec<String> {
                self.0.implementors()
            }
        }
    };
}

engine_featurizer!(
    /// HOMO energy in eV.
    HOMOEnergyFeaturizer,
    Quantity::Homo
);
engine_featurizer!(
    /// LUMO energy in eV.
    LUMOEnergyFeaturizer,
    Quantity::Lumo
);
engine_featurizer!(
    /// Vertical ionization potential in eV.
    IonizationPotentialFeaturizer,
    Quantity::IonizationPotential
);
engine_featurizer!(
    /// Vertical electron affinity in eV.
    ElectronAffinityFeaturizer,
    Quantity::ElectronAffinity
);
engine_featurizer!(
    /// Global electrophilicity index `(IP + EA)² / (8 (IP − EA))`.
    MoleculeElectrophilicityFeaturizer,
    Quantity::Electrophilicity
);
engine_featurizer!(
    /// Global nucleophilicity `−IP`.
    MoleculeNucleophilicityFeaturizer,
    Quantity::Nucleophilicity
);
engine_featurizer!(MoleculeElectrofugalityFeaturizer, Quantity::Electrofugality);
engine_featurizer!(MoleculeNucleofugalityFeaturizer, Quantity::Nucleofugality);
engine_featurizer!(
    /// Partial charge of every atom.
    AtomChargeFeaturizer,
    Quantity::AtomCharges
);
engine_featurizer!(
    /// Local electrophilicity `f⁺ · ω` of every atom.
    AtomElectrophilicityFeaturizer,
    Quantity::AtomElectrophilicity
);
engine_featurizer!(
    /// Local nucleophilicity `f⁻ · (−IP)` of every atom.
    AtomNucleophilicityFeaturizer,
    Quantity::AtomNucleophilicity
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FixedEngine;

    impl QuantumEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn calculate(&self, molecule: &Molecule) -> Result<QuantumResult, engine::Error> {
            let n = molecule.graph_with_hydrogens().atom_count();
            Ok(QuantumResult {
                homo: -10.5,
                lumo: 1.25,
                ionization_potential: 10.0,
                electron_affinity: 2.0,
                charges: vec![0.1; n],
                fukui_plus: vec![0.5; n],
                fukui_minus: vec![0.25; n],
                ..Default::default()
            })
        }
    }

    fn quinone_acid() -> Molecule {
        Molecule::from_smiles("O=C1C=CC(=O)C=C1C(=O)O").unwrap()
    }

    #[test]
    fn topological_counts() {
        let mol = quinone_acid();
        assert_eq!(HydrogenAcceptorCountFeaturizer::new().featurize(&mol).unwrap(), vec![Value::Int(4)]);
        assert_eq!(HydrogenDonorCountFeaturizer::new().featurize(&mol).unwrap(), vec![Value::Int(1)]);
        assert_eq!(ValenceElectronCountFeaturizer::new().featurize(&mol).unwrap(), vec![Value::Int(56)]);
    }

    #[test]
    fn scalar_engine_properties() {
        let engine: Arc<dyn QuantumEngine> = Arc::new(FixedEngine);
        let mol = quinone_acid();
        let homo = HOMOEnergyFeaturizer::with_engine(engine.clone());
        assert_eq!(homo.featurize(&mol).unwrap(), vec![Value::Float(-10.5)]);
        assert_eq!(homo.feature_labels().len(), 1);
        let omega = MoleculeElectrophilicityFeaturizer::with_engine(engine.clone());
        assert_eq!(omega.featurize(&mol).unwrap(), vec![Value::Float(2.25)]);
        assert!(homo.implementors().iter().any(|i| i == "fixed engine"));
    }

    #[test]
    fn per_atom_engine_properties_are_padded() {
        let engine: Arc<dyn QuantumEngine> = Arc::new(FixedEngine);
        let mol = quinone_acid();
        let charges = AtomChargeFeaturizer::with_engine(engine.clone());
        let row = charges.featurize(&mol).unwrap();
        assert_eq!(row.len(), charges.feature_labels().len());
        assert_eq!(row.len(), 30);
        assert_eq!(row[0], Value::Float(0.1));
        assert_eq!(row[29], Value::Float(0.0));

        let nucleophilicity = AtomNucleophilicityFeaturizer::with_engine(engine.clone());
        assert_eq!(nucleophilicity.featurize(&mol).unwrap()[0], Value::Float(-2.5));

        let narrow = AtomElectrophilicityFeaturizer::with_engine(engine).with_max_atoms(5);
        assert!(matches!(narrow.featurize(&mol), Err(Error::TooManyAtoms { atoms: 15, max_atoms: 5 })));
    }
}
