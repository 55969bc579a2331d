//! Featurizers, comparators and prompt rendering.
//!
//! A [`Featurizer`] turns one [`Molecule`](crate::Molecule) into a
//! fixed-width row of [`Value`]s with a label per entry, and renders that row
//! as a question/answer [`Prompt`]. A [`Comparison`] does the same for a set
//! of molecules, answering whether they agree on a property.
//!
//! Concrete featurizers are grouped by the kind of property they compute:
//!
//! - [`bonds`] – bond type counts and proportions, rotatable bonds, bond orders, bond dipoles
//! - [`composition`] – formula, masses, element counts and proportions, unsaturation
//! - [`electronicity`] – hydrogen bonding, valence electrons and engine-derived reactivity
//! - [`reaction`] – solvent accessible surface and volume
//! - [`rules`] – drug-likeness filter violations
//! - [`spatial`] – moments of inertia and 3-D shape descriptors
//! - [`stereochemistry`] – chiral centers
//! - [`substructure`] – SMARTS fragments, topology counts and graph hashes
//! - [`symmetry`] – point group and rotational symmetry number
//! - [`miscellaneous`] – SVG depiction
//! - [`adaptor`] – wrapping a closure as a featurizer
//!
//! [`registry`] builds every default featurizer of a group at once.
//!
//! # Examples
//!
//! ```
//! use chemcaption::Molecule;
//! use chemcaption::featurize::{Comparison, Featurizer, Value};
//! use chemcaption::featurize::comparator::IsomerismComparator;
//! use chemcaption::featurize::composition::MolecularFormulaFeaturizer;
//!
//! let ethanol = Molecule::from_smiles("CCO")?;
//! let ether = Molecule::from_smiles("COC")?;
//!
//! let formula = MolecularFormulaFeaturizer::new();
//! assert_eq!(formula.featurize(&ethanol)?, vec![Value::Text("C2H6O".into())]);
//!
//! let isomers = IsomerismComparator::new().compare(&[ethanol, ether])?;
//! assert_eq!(isomers, vec![Value::Int(1)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adaptor;
pub mod base;
pub mod bonds;
pub mod comparator;
pub mod composition;
pub mod electronicity;
pub mod miscellaneous;
pub mod reaction;
pub mod registry;
pub mod rules;
pub mod spatial;
pub mod stereochemistry;
pub mod substructure;
pub mod symmetry;
pub mod text;
pub mod text_utils;

mod error;

pub use base::{FeatureName, Featurizer, MultipleFeaturizer};
pub use comparator::{Comparator, Comparison, MultipleComparator};
pub use error::Error;
pub use text::{Prompt, PromptRecord, Value};
