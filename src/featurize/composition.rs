//! Elemental composition: formula, masses, element counts and unsaturation.

use super::base::{FeatureName, Featurizer, noun};
use super::text::{Value, join_english};
use super::Error;
use crate::chem::descriptors;
use crate::model::types::Element;
use crate::molecule::Molecule;

const DEFAULT_ELEMENTS: [Element; 10] = [
    Element::C,
    Element::H,
    Element::N,
    Element::O,
    Element::S,
    Element::F,
    Element::Cl,
    Element::Br,
    Element::I,
    Element::P,
];

fn parse_elements(symbols: &[&str]) -> Result<Vec<Element>, Error> {
    if symbols.is_empty() {
        return Err(Error::invalid_argument("at least one element is required"));
    }
    symbols
        .iter()
        .map(|s| {
            s.parse::<Element>()
                .map_err(|_| Error::invalid_argument(format!("unknown element '{s}'")))
        })
        .collect()
}

fn element_phrase(elements: &[Element]) -> String {
    let names: Vec<String> = elements.iter().map(|e| e.name().to_lowercase()).collect();
    join_english(&names)
}

/// Molecular formula in Hill order, as text.
#[derive(Debug, Clone, Default)]
pub struct MolecularFormulaFeaturizer;

impl MolecularFormulaFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for MolecularFormulaFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Text(descriptors::molecular_formula(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["molecular_formula".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("molecular formula")]
    }
}

/// Average molecular mass in daltons.
#[derive(Debug, Clone, Default)]
pub struct MolecularMassFeaturizer;

impl MolecularMassFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for MolecularMassFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Float(descriptors::molecular_weight(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["molecular_mass".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("molecular mass")]
    }
}

/// Monoisotopic mass in daltons.
#[derive(Debug, Clone, Default)]
pub struct MonoisotopicMolecularMassFeaturizer;

impl MonoisotopicMolecularMassFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for MonoisotopicMolecularMassFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Float(descriptors::monoisotopic_mass(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["monoisotopic_molecular_mass".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("monoisotopic molecular mass")]
    }
}

/// What an [`ElementFeaturizer`] reports for each selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementQuantity {
    Mass,
    MassProportion,
    Count,
    CountProportion,
}

/// Per-element masses or counts, hydrogens included.
#[derive(Debug, Clone)]
struct ElementFeaturizer {
    quantity: ElementQuantity,
    elements: Vec<Element>,
}

impl ElementFeaturizer {
    fn row(&self, molecule: &Molecule) -> Vec<Value> {
        let graph = molecule.graph();
        match self.quantity {
            ElementQuantity::Mass => self
                .elements
                .iter()
                .map(|&e| Value::Float(descriptors::element_mass(graph, e)))
                .collect(),
            ElementQuantity::MassProportion => {
                let total = descriptors::molecular_weight(graph);
                self.elements
                    .iter()
                    .map(|&e| Value::Float(descriptors::element_mass(graph, e) / total))
                    .collect()
            }
            ElementQuantity::Count => self
                .elements
                .iter()
                .map(|&e| Value::from(descriptors::element_count(graph, e)))
                .collect(),
            ElementQuantity::CountProportion => {
                let total = descriptors::atom_count(graph) as f64;
                self.elements
                    .iter()
                    .map(|&e| Value::Float(descriptors::element_count(graph, e) as f64 / total))
                    .collect()
            }
        }
    }

    fn labels(&self) -> Vec<String> {
        self.elements
            .iter()
            .map(|e| {
                let symbol = e.symbol().to_lowercase();
                match self.quantity {
                    ElementQuantity::Mass => format!("{symbol}_mass"),
                    ElementQuantity::MassProportion => format!("{symbol}_mass_ratio"),
                    ElementQuantity::Count => format!("num_{symbol}_atoms"),
                    ElementQuantity::CountProportion => format!("{symbol}_atom_ratio"),
                }
            })
            .collect()
    }

    fn names(&self) -> Vec<FeatureName> {
        let elements = element_phrase(&self.elements);
        let phrase = match self.quantity {
            ElementQuantity::Mass => format!("total masses of the {elements} atoms"),
            ElementQuantity::MassProportion => format!("mass proportions of the {elements} atoms"),
            ElementQuantity::Count => format!("numbers of the {elements} atoms"),
            ElementQuantity::CountProportion => format!("proportions of the {elements} atoms"),
        };
        vec![noun(phrase)]
    }
}

macro_rules! element_featurizer {
    ($(#[$doc:meta])* $name:ident, $quantity:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(ElementFeaturizer);

        impl $name {
            /// Reports C, H, N, O, S, F, Cl, Br, I and P.
            pub fn new() -> Self {
                Self(ElementFeaturizer {
                    quantity: $quantity,
                    elements: DEFAULT_ELEMENTS.to_vec(),
                })
            }

            /// Reports the elements named by `symbols`, in order.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidArgument`] for an empty list or an unknown symbol.
            pub fn with_elements(symbols: &[&str]) -> Result<Self, Error> {
                Ok(Self(ElementFeaturizer {
                    quantity: $quantity,
                    elements: parse_elements(symbols)?,
                }))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Featurizer for $name {
            fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
                Ok(self.0.row(molecule))
            }

            fn feature_labels(&self) -> Vec<String> {
                self.0.labels()
            }

            fn feature_names(&self) -> Vec<FeatureName> {
                self.0.names()
            }
        }
    };
}

element_featurizer!(
    /// Total mass contributed by each selected element.
    ElementMassFeaturizer,
    ElementQuantity::Mass
);
element_featurizer!(
    /// Share of the molecular mass contributed by each selected element.
    ElementMassProportionFeaturizer,
    ElementQuantity::MassProportion
);
element_featurizer!(
    /// Number of atoms of each selected element.
    ElementCountFeaturizer,
    ElementQuantity::Count
);
element_featurizer!(
    /// Share of all atoms belonging to each selected element.
    ElementCountProportionFeaturizer,
    ElementQuantity::CountProportion
);

/// Number of atoms, hydrogens included.
#[derive(Debug, Clone, Default)]
pub struct AtomCountFeaturizer;

impl AtomCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for AtomCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::from(descriptors::atom_count(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_atoms".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of atoms")]
    }
}

/// Degree of unsaturation (rings plus π bonds).
#[derive(Debug, Clone, Default)]
pub struct DegreeOfUnsaturationFeaturizer;

impl DegreeOfUnsaturationFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for DegreeOfUnsaturationFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Float(descriptors::degree_of_unsaturation(molecule.graph()))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["degree_of_unsaturation".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("degree of unsaturation")]
    }
}
