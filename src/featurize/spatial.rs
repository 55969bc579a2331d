//! Shape descriptors of the embedded conformer.
//!
//! All descriptors use the explicit-hydrogen graph and mass-weighted
//! coordinates, except the spherocity index, which is unweighted.

use super::base::{FeatureName, Featurizer, indexed_labels, noun, pad_atom_row};
use super::text::{Value, join_english};
use super::Error;
use crate::chem::geometry;
use crate::config;
use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use crate::molecule::Molecule;

const ORDINALS: [&str; 3] = ["first", "second", "third"];

fn parse_variants(variants: &[usize], max: usize) -> Result<Vec<usize>, Error> {
    if variants.is_empty() {
        return Err(Error::invalid_argument("at least one variant is required"));
    }
    if let Some(bad) = variants.iter().find(|v| !(1..=max).contains(*v)) {
        return Err(Error::invalid_argument(format!(
            "variant must be between 1 and {max}, got {bad}"
        )));
    }
    let mut selected = variants.to_vec();
    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

fn ordinal_phrase(variants: &[usize]) -> String {
    let words: Vec<&str> = variants.iter().map(|v| ORDINALS[v - 1]).collect();
    join_english(&words)
}

/// Principal moments of inertia in amu·Å², ascending.
///
/// # Examples
///
/// ```
/// use chemcaption::featurize::Featurizer;
/// use chemcaption::featurize::spatial::PMIFeaturizer;
///
/// assert_eq!(PMIFeaturizer::new().feature_labels().len(), 3);
/// assert_eq!(PMIFeaturizer::with_variant(2)?.feature_labels(), vec!["pmi_2"]);
/// assert!(PMIFeaturizer::with_variant(420).is_err());
/// # Ok::<(), chemcaption::featurize::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PMIFeaturizer {
    variants: Vec<usize>,
}

impl Default for PMIFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PMIFeaturizer {
    /// All three moments.
    pub fn new() -> Self {
        Self {
            variants: vec![1, 2, 3],
        }
    }

    /// A single moment, 1 to 3.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `variant` is out of range.
    pub fn with_variant(variant: usize) -> Result<Self, Error> {
        Self::with_variants(&[variant])
    }

    pub fn with_variants(variants: &[usize]) -> Result<Self, Error> {
        Ok(Self {
            variants: parse_variants(variants, 3)?,
        })
    }
}

impl Featurizer for PMIFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let moments = geometry::principal_moments(molecule.graph_with_hydrogens(), molecule.conformer()?);
        Ok(self.variants.iter().map(|v| Value::Float(moments[v - 1])).collect())
    }

    fn feature_labels(&self) -> Vec<String> {
        self.variants.iter().map(|v| format!("pmi_{v}")).collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        let moments = if self.variants.len() == 1 { "moment" } else { "moments" };
        vec![noun(format!(
            "{} principal {moments} of inertia (PMI)",
            ordinal_phrase(&self.variants)
        ))]
    }
}

/// Normalized principal moments ratios `I₁/I₃` and `I₂/I₃`.
#[derive(Debug, Clone)]
pub struct NPRFeaturizer {
    variants: Vec<usize>,
}

impl Default for NPRFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NPRFeaturizer {
    /// Both ratios.
    pub fn new() -> Self {
        Self {
            variants: vec![1, 2],
        }
    }

    /// A single ratio, 1 or 2.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `variant` is out of range.
    pub fn with_variant(variant: usize) -> Result<Self, Error> {
        Ok(Self {
            variants: parse_variants(&[variant], 2)?,
        })
    }
}

impl Featurizer for NPRFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let ratios = geometry::npr(molecule.graph_with_hydrogens(), molecule.conformer()?);
        Ok(self.variants.iter().map(|v| Value::Float(ratios[v - 1])).collect())
    }

    fn feature_labels(&self) -> Vec<String> {
        self.variants.iter().map(|v| format!("npr_{v}")).collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun(format!(
            "{} normalized principal moments ratio (NPR)",
            ordinal_phrase(&self.variants)
        ))]
    }
}

macro_rules! shape_featurizer {
    ($(#[$doc:meta])* $name:ident, $label:literal, $noun:literal, $compute:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        impl Featurizer for $name {
            fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
                let compute: fn(&MolGraph, &Conformer) -> f64 = $compute;
                let value = compute(molecule.graph_with_hydrogens(), molecule.conformer()?);
                Ok(vec![Value::Float(value)])
            }

            fn feature_labels(&self) -> Vec<String> {
                vec![$label.to_string()]
            }

            fn feature_names(&self) -> Vec<FeatureName> {
                vec![noun($noun)]
            }
        }
    };
}

shape_featurizer!(
    /// Deviation from a spherical mass distribution, 0 for a sphere.
    AsphericityFeaturizer,
    "asphericity",
    "asphericity",
    geometry::asphericity
);
shape_featurizer!(
    EccentricityFeaturizer,
    "eccentricity",
    "eccentricity",
    geometry::eccentricity
);
shape_featurizer!(
    /// `I₂ / (I₁ · I₃)`.
    InertialShapeFactorFeaturizer,
    "inertial_shape_factor",
    "inertial shape factor",
    geometry::inertial_shape_factor
);
shape_featurizer!(
    /// Mass-weighted radius of gyration in Å.
    RadiusOfGyrationFeaturizer,
    "radius_of_gyration",
    "radius of gyration",
    geometry::radius_of_gyration
);
shape_featurizer!(
    SpherocityIndexFeaturizer,
    "spherocity_index",
    "spherocity index",
    |_, conformer| geometry::spherocity_index(conformer)
);

/// Volume of every atom's sphere not shared with its bonded neighbours, in Å³.
#[derive(Debug, Clone)]
pub struct AtomVolumeFeaturizer {
    max_atoms: usize,
}

impl Default for AtomVolumeFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomVolumeFeaturizer {
    pub fn new() -> Self {
        Self::with_max_atoms(config::settings().text.max_atoms)
    }

    pub fn with_max_atoms(max_atoms: usize) -> Self {
        Self { max_atoms }
    }
}

impl Featurizer for AtomVolumeFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let graph = molecule.graph_with_hydrogens();
        if graph.atom_count() > self.max_atoms {
            return Err(Error::TooManyAtoms {
                atoms: graph.atom_count(),
                max_atoms: self.max_atoms,
            });
        }
        pad_atom_row(geometry::atom_volumes(graph, molecule.conformer()?), self.max_atoms)
    }

    fn feature_labels(&self) -> Vec<String> {
        indexed_labels("atom_volume", self.max_atoms)
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("atomic volumes")]
    }
}
