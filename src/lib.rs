//! Natural-language captions for molecular properties.
//!
//! `chemcaption` reads molecules from SMILES or SELFIES, computes
//! fixed-shape property vectors with a catalogue of featurizers, and renders
//! each vector as a question/answer prompt suitable for training or
//! evaluating language models on chemistry.
//!
//! # Features
//!
//! - **Perception** – SMILES and SELFIES readers, valence and aromaticity
//!   perception, ring finding, SMARTS matching and canonical symmetry classes,
//!   all in [`chem`]
//! - **Geometry** – distance-geometry embedding, inertia and shape
//!   descriptors, point groups and solvent accessible surfaces
//! - **Electronic structure** – frontier orbitals, charges and Fukui indices
//!   from the `xtb` program through the [`engine::QuantumEngine`] trait
//! - **Featurizers** – more than fifty property computations grouped in
//!   [`featurize`], with comparators across molecules
//! - **Prompts** – question templates with English-style joining, optional
//!   constraints and seeded template variants
//!
//! # Quick Start
//!
//! ```
//! use chemcaption::Molecule;
//! use chemcaption::featurize::{Featurizer, MultipleFeaturizer};
//! use chemcaption::featurize::composition::{AtomCountFeaturizer, MolecularMassFeaturizer};
//! use chemcaption::featurize::rules::LipinskiFilterFeaturizer;
//!
//! let aspirin = Molecule::from_smiles("CC(=O)OC1=CC=CC=C1C(=O)O")?;
//!
//! let featurizer = MultipleFeaturizer::new(vec![
//!     Box::new(AtomCountFeaturizer::new()),
//!     Box::new(MolecularMassFeaturizer::new()),
//!     Box::new(LipinskiFilterFeaturizer::new()),
//! ]);
//!
//! let labeled = featurizer.labeled_featurize(&aspirin)?;
//! assert_eq!(labeled["num_atoms"].as_f64(), Some(21.0));
//! assert_eq!(labeled["num_lipinski_violations"].as_f64(), Some(0.0));
//!
//! for prompt in featurizer.text_featurize(None, &aspirin)? {
//!     println!("{}\n{}", prompt.fill_prompt(), prompt.fill_completion());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`model`] – Atoms, bonds, graphs and conformers
//! - [`chem`] – Perception, descriptors and geometry
//! - [`engine`] – Quantum-chemistry engines
//! - [`featurize`] – Featurizers, comparators and prompts
//! - [`io`] – Structure file output
//! - [`config`] – Settings and embedded resource tables
//!
//! # Logging
//!
//! Diagnostics are emitted through [`tracing`]. The crate installs no
//! subscriber; applications choose their own.

pub mod chem;
pub mod config;
pub mod engine;
pub mod featurize;
pub mod io;
pub mod model;

mod molecule;

pub use config::Settings;
pub use model::atom::Atom;
pub use model::conformer::Conformer;
pub use model::graph::{Bond, MolGraph};
pub use model::types::{BondOrder, Element};
pub use molecule::{Molecule, Representation};
