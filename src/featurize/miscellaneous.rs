//! Depiction.

use super::base::{FeatureName, Featurizer, noun};
use super::text::Value;
use super::Error;
use crate::chem::depict;
use crate::molecule::Molecule;

const DEFAULT_SIZE: u32 = 300;

/// SVG drawing of the molecule as a text value.
#[derive(Debug, Clone)]
pub struct SVGFeaturizer {
    size: u32,
}

impl Default for SVGFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SVGFeaturizer {
    pub fn new() -> Self {
        Self { size: DEFAULT_SIZE }
    }

    /// Canvas edge length in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a zero size.
    pub fn with_size(size: u32) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::invalid_argument("SVG size must be positive"));
        }
        Ok(Self { size })
    }
}

impl Featurizer for SVGFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let conformer = molecule.conformer()?;
        Ok(vec![Value::Text(depict::svg(
            molecule.graph_with_hydrogens(),
            conformer,
            self.size,
        ))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["svg_string".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("SVG depiction")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featurizes_to_an_svg_document() {
        let mol = Molecule::from_selfies("[C][C][O]").unwrap();
        let row = SVGFeaturizer::new().featurize(&mol).unwrap();
        let Value::Text(svg) = &row[0] else {
            panic!("expected text, got {:?}", row[0]);
        };
        assert!(svg.starts_with("<?xml version='1.0' encoding='iso-8859-1'?>\n<svg"));
        assert!(SVGFeaturizer::with_size(0).is_err());
    }
}
