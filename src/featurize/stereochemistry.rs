//! Stereochemistry.

use super::base::{FeatureName, Featurizer, noun};
use super::text::Value;
use super::Error;
use crate::chem::stereo;
use crate::molecule::Molecule;

/// Number of chiral centers, tagged or topologically possible.
#[derive(Debug, Clone, Default)]
pub struct ChiralCenterCountFeaturizer;

impl ChiralCenterCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for ChiralCenterCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::from(stereo::chiral_centers(molecule.graph()).len())])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_chiral_centers".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of chiral centers")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_centers() {
        let f = ChiralCenterCountFeaturizer::new();
        let butanol = Molecule::from_smiles("CC(O)CC").unwrap();
        assert_eq!(f.featurize(&butanol).unwrap(), vec![Value::Int(1)]);
        let butane = Molecule::from_smiles("CCCC").unwrap();
        assert_eq!(f.featurize(&butane).unwrap(), vec![Value::Int(0)]);
    }
}
