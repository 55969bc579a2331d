//! Drug-likeness filters reported as violation counts.

use super::base::{FeatureName, Featurizer, noun};
use super::text::Value;
use super::Error;
use crate::chem::druglikeness;
use crate::molecule::Molecule;

/// Violations of Lipinski's rule of five.
#[derive(Debug, Clone, Default)]
pub struct LipinskiFilterFeaturizer;

impl LipinskiFilterFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for LipinskiFilterFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let count = druglikeness::lipinski_violations(molecule.graph(), molecule.rings());
        Ok(vec![Value::from(count)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_lipinski_violations".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of Lipinski rule violations")]
    }
}

/// Violations of the Ghose filter.
#[derive(Debug, Clone, Default)]
pub struct GhoseFilterFeaturizer;

impl GhoseFilterFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for GhoseFilterFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let count = druglikeness::ghose_violations(molecule.graph(), molecule.rings());
        Ok(vec![Value::from(count)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_ghose_violations".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of Ghose filter violations")]
    }
}

/// Violations of the lead-likeness rules.
#[derive(Debug, Clone, Default)]
pub struct LeadLikenessFilterFeaturizer;

impl LeadLikenessFilterFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for LeadLikenessFilterFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let count = druglikeness::lead_likeness_violations(molecule.graph(), molecule.rings());
        Ok(vec![Value::from(count)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_lead_likeness_violations".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of lead-likeness filter violations")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_molecules_pass_lipinski() {
        let aspirin = Molecule::from_smiles("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(LipinskiFilterFeaturizer::new().featurize(&aspirin).unwrap(), vec![Value::Int(0)]);
    }

    #[test]
    fn water_fails_ghose_and_lead_likeness() {
        let water = Molecule::from_smiles("O").unwrap();
        let ghose = GhoseFilterFeaturizer::new().featurize(&water).unwrap()[0].as_f64().unwrap();
        assert!(ghose >= 3.0);
        let lead = LeadLikenessFilterFeaturizer::new().featurize(&water).unwrap();
        assert_eq!(lead, vec![Value::Int(1)]);
    }
}
