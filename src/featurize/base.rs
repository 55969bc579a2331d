//! The [`Featurizer`] trait and the [`MultipleFeaturizer`] composite.

use super::Error;
use super::text::{Prompt, Value, join_english};
use super::text_utils::{generate_template, inspect_template, inspect_template_with};
use crate::config::TextSettings;
use crate::molecule::Molecule;
use rand::RngCore;
use std::collections::BTreeMap;
use std::fmt;

/// Part-of-speech key → phrase naming one feature (or one group of features).
pub type FeatureName = BTreeMap<String, String>;

/// Part of speech used when a caller does not ask for one.
pub const DEFAULT_POS: &str = "noun";

const IMPLEMENTORS: &[&str] = &["chemcaption contributors"];

/// A [`FeatureName`] carrying only a noun phrase.
pub fn noun(phrase: impl Into<String>) -> FeatureName {
    BTreeMap::from([(DEFAULT_POS.to_string(), phrase.into())])
}

pub(crate) fn default_implementors() -> Vec<String> {
    IMPLEMENTORS.iter().map(|s| s.to_string()).collect()
}

/// Looks up `pos` in every name, failing on the first name without it.
pub(crate) fn resolve_names(names: &[FeatureName], pos: &str) -> Result<Vec<String>, Error> {
    names
        .iter()
        .map(|name| {
            name.get(pos).cloned().ok_or_else(|| Error::UnknownPartOfSpeech {
                pos: pos.to_string(),
                available: name.keys().cloned().collect::<Vec<_>>().join(", "),
            })
        })
        .collect()
}

fn pad(values: Vec<f64>, width: usize) -> Vec<Value> {
    let mut row: Vec<Value> = values.into_iter().map(Value::Float).collect();
    row.resize(width, Value::Float(0.0));
    row
}

/// Pads a per-atom row with zeros to `width` entries.
///
/// # Errors
///
/// Returns [`Error::TooManyAtoms`] when `values` is already wider than `width`.
pub(crate) fn pad_atom_row(values: Vec<f64>, width: usize) -> Result<Vec<Value>, Error> {
    if values.len() > width {
        return Err(Error::TooManyAtoms {
            atoms: values.len(),
            max_atoms: width,
        });
    }
    Ok(pad(values, width))
}

/// Pads a per-bond row with zeros to `width` entries.
///
/// # Errors
///
/// Returns [`Error::TooManyBonds`] when `values` is already wider than `width`.
pub(crate) fn pad_bond_row(values: Vec<f64>, width: usize) -> Result<Vec<Value>, Error> {
    if values.len() > width {
        return Err(Error::TooManyBonds {
            bonds: values.len(),
            max_bonds: width,
        });
    }
    Ok(pad(values, width))
}

/// `prefix_0`, `prefix_1`, … for a padded row.
pub(crate) fn indexed_labels(prefix: &str, width: usize) -> Vec<String> {
    (0..width).map(|i| format!("{prefix}_{i}")).collect()
}

fn build_prompt<F: Featurizer + ?Sized>(
    featurizer: &F,
    pos_key: Option<&str>,
    molecule: &Molecule,
    template: String,
) -> Result<Prompt, Error> {
    let completion_names = resolve_names(&featurizer.feature_names(), pos_key.unwrap_or(DEFAULT_POS))?;
    Ok(Prompt {
        completion: featurizer.featurize(molecule)?,
        representation: vec![molecule.representation_string().to_string()],
        representation_type: molecule.representation_system().to_string(),
        completion_names,
        completion_labels: featurizer.feature_labels(),
        template,
        constraint: featurizer.completion_constraint(),
    })
}

fn check_pos_keys(pos_keys: Option<&[&str]>, molecules: usize) -> Result<(), Error> {
    match pos_keys {
        Some(keys) if keys.len() != molecules => {
            Err(Error::length_mismatch("part-of-speech keys", keys.len(), "molecules", molecules))
        }
        _ => Ok(()),
    }
}

/// A stateless computation of one fixed-shape feature row per molecule.
///
/// Implementors provide [`featurize`](Featurizer::featurize),
/// [`feature_labels`](Featurizer::feature_labels) and
/// [`feature_names`](Featurizer::feature_names); the rest of the interface,
/// prompt rendering included, comes from default methods.
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
/// use chemcaption::featurize::Featurizer;
/// use chemcaption::featurize::bonds::RotableBondCountFeaturizer;
///
/// let featurizer = RotableBondCountFeaturizer::new();
/// let prompt = featurizer.text_featurize(None, &Molecule::from_smiles("c1ccccc1")?)?;
/// assert_eq!(
///     prompt.fill_prompt(),
///     "Question: What is the number of rotatable bonds of the molecule with SMILES c1ccccc1?"
/// );
/// assert_eq!(prompt.fill_completion(), "Answer: 0");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Featurizer: Send + Sync + fmt::Debug {
    /// Computes the feature row of one molecule.
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error>;

    /// One label per entry of the feature row.
    fn feature_labels(&self) -> Vec<String>;

    /// Phrases naming the features, keyed by part of speech.
    fn feature_names(&self) -> Vec<FeatureName>;

    fn implementors(&self) -> Vec<String> {
        default_implementors()
    }

    /// Question template rendered by [`text_featurize`](Featurizer::text_featurize).
    fn prompt_template(&self) -> String {
        generate_template()
    }

    /// Instruction appended to the question, if any.
    fn completion_constraint(&self) -> Option<String> {
        None
    }

    /// Computes one row per molecule, in order.
    fn featurize_many(&self, molecules: &[Molecule]) -> Result<Vec<Vec<Value>>, Error> {
        molecules.iter().map(|m| self.featurize(m)).collect()
    }

    /// Feature row keyed by label.
    fn labeled_featurize(&self, molecule: &Molecule) -> Result<BTreeMap<String, Value>, Error> {
        let values = self.featurize(molecule)?;
        let labels = self.feature_labels();
        if labels.len() != values.len() {
            return Err(Error::length_mismatch("labels", labels.len(), "values", values.len()));
        }
        Ok(labels.into_iter().zip(values).collect())
    }

    /// Renders the canonical prompt for `molecule`.
    ///
    /// `pos_key` selects the part of speech of the property name; `None`
    /// means [`DEFAULT_POS`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPartOfSpeech`] when a feature name has no
    /// phrase for `pos_key`, or any error of [`featurize`](Featurizer::featurize).
    fn text_featurize(&self, pos_key: Option<&str>, molecule: &Molecule) -> Result<Prompt, Error> {
        build_prompt(self, pos_key, molecule, self.prompt_template())
    }

    /// Like [`text_featurize`](Featurizer::text_featurize) but lets `rng`
    /// pick a template variant.
    fn text_featurize_with_rng(
        &self,
        pos_key: Option<&str>,
        molecule: &Molecule,
        rng: &mut dyn RngCore,
    ) -> Result<Prompt, Error> {
        let template = inspect_template(&self.prompt_template(), rng);
        build_prompt(self, pos_key, molecule, template)
    }

    /// Like [`text_featurize_with_rng`](Featurizer::text_featurize_with_rng)
    /// with the variant probability read from `settings`.
    fn text_featurize_with_settings(
        &self,
        pos_key: Option<&str>,
        molecule: &Molecule,
        settings: &TextSettings,
        rng: &mut dyn RngCore,
    ) -> Result<Prompt, Error> {
        let template = inspect_template_with(&self.prompt_template(), settings, rng);
        build_prompt(self, pos_key, molecule, template)
    }

    /// Renders one prompt per molecule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when `pos_keys` is given and its
    /// length differs from `molecules`.
    fn text_featurize_many(
        &self,
        pos_keys: Option<&[&str]>,
        molecules: &[Molecule],
    ) -> Result<Vec<Prompt>, Error> {
        check_pos_keys(pos_keys, molecules.len())?;
        molecules
            .iter()
            .enumerate()
            .map(|(i, m)| self.text_featurize(pos_keys.map(|k| k[i]), m))
            .collect()
    }
}

/// An ordered collection of featurizers acting as one.
///
/// The row of a molecule is the concatenation of the members' rows, and so
/// are the labels. Text featurization yields one prompt per member.
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
/// use chemcaption::featurize::MultipleFeaturizer;
/// use chemcaption::featurize::electronicity::HydrogenAcceptorCountFeaturizer;
/// use chemcaption::featurize::stereochemistry::ChiralCenterCountFeaturizer;
///
/// let featurizer = MultipleFeaturizer::new(vec![
///     Box::new(HydrogenAcceptorCountFeaturizer::new()),
///     Box::new(ChiralCenterCountFeaturizer::new()),
/// ]);
/// let row = featurizer.featurize(&Molecule::from_smiles("CCCC")?)?;
/// assert_eq!(row.len(), featurizer.feature_labels().len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct MultipleFeaturizer {
    featurizers: Vec<Box<dyn Featurizer>>,
}

impl MultipleFeaturizer {
    pub fn new(featurizers: Vec<Box<dyn Featurizer>>) -> Self {
        Self { featurizers }
    }

    pub fn featurizers(&self) -> &[Box<dyn Featurizer>] {
        &self.featurizers
    }

    /// Replaces the members; `None` leaves the composite empty.
    pub fn fit_on_featurizers(mut self, featurizers: Option<Vec<Box<dyn Featurizer>>>) -> Self {
        self.featurizers = featurizers.unwrap_or_default();
        self
    }

    pub fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let mut row = Vec::new();
        for featurizer in &self.featurizers {
            row.extend(featurizer.featurize(molecule)?);
        }
        Ok(row)
    }

    pub fn featurize_many(&self, molecules: &[Molecule]) -> Result<Vec<Vec<Value>>, Error> {
        molecules.iter().map(|m| self.featurize(m)).collect()
    }

    pub fn feature_labels(&self) -> Vec<String> {
        self.featurizers.iter().flat_map(|f| f.feature_labels()).collect()
    }

    pub fn feature_names(&self) -> Vec<FeatureName> {
        self.featurizers.iter().flat_map(|f| f.feature_names()).collect()
    }

    pub fn labeled_featurize(&self, molecule: &Molecule) -> Result<BTreeMap<String, Value>, Error> {
        let mut out = BTreeMap::new();
        for featurizer in &self.featurizers {
            out.extend(featurizer.labeled_featurize(molecule)?);
        }
        Ok(out)
    }

    /// Union of the members' implementors in first-seen order.
    pub fn implementors(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.featurizers.iter().flat_map(|f| f.implementors()) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// One prompt per member.
    pub fn text_featurize(&self, pos_key: Option<&str>, molecule: &Molecule) -> Result<Vec<Prompt>, Error> {
        self.featurizers
            .iter()
            .map(|f| f.text_featurize(pos_key, molecule))
            .collect()
    }

    pub fn text_featurize_with_rng(
        &self,
        pos_key: Option<&str>,
        molecule: &Molecule,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Prompt>, Error> {
        self.featurizers
            .iter()
            .map(|f| f.text_featurize_with_rng(pos_key, molecule, rng))
            .collect()
    }

    pub fn text_featurize_with_settings(
        &self,
        pos_key: Option<&str>,
        molecule: &Molecule,
        settings: &TextSettings,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Prompt>, Error> {
        self.featurizers
            .iter()
            .map(|f| f.text_featurize_with_settings(pos_key, molecule, settings, rng))
            .collect()
    }

    /// One list of prompts per molecule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when `pos_keys` is given and its
    /// length differs from `molecules`.
    pub fn text_featurize_many(
        &self,
        pos_keys: Option<&[&str]>,
        molecules: &[Molecule],
    ) -> Result<Vec<Vec<Prompt>>, Error> {
        check_pos_keys(pos_keys, molecules.len())?;
        molecules
            .iter()
            .enumerate()
            .map(|(i, m)| self.text_featurize(pos_keys.map(|k| k[i]), m))
            .collect()
    }
}

/// Summary phrase for a list of names, used where one name must stand for many.
pub(crate) fn combined_name(names: &[FeatureName]) -> FeatureName {
    let mut keys: Vec<&String> = names.iter().flat_map(|n| n.keys()).collect();
    keys.sort();
    keys.dedup();
    keys.into_iter()
        .filter_map(|key| {
            let phrases: Vec<&str> = names.iter().filter_map(|n| n.get(key).map(String::as_str)).collect();
            (phrases.len() == names.len()).then(|| (key.clone(), join_english(&phrases)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Constant(i64);

    impl Featurizer for Constant {
        fn featurize(&self, _: &Molecule) -> Result<Vec<Value>, Error> {
            Ok(vec![Value::Int(self.0)])
        }

        fn feature_labels(&self) -> Vec<String> {
            vec![format!("constant_{}", self.0)]
        }

        fn feature_names(&self) -> Vec<FeatureName> {
            vec![noun(format!("constant {}", self.0))]
        }
    }

    fn molecule() -> Molecule {
        Molecule::from_smiles("CCO").unwrap()
    }

    #[test]
    fn labeled_featurize_zips_labels_and_values() {
        let map = Constant(3).labeled_featurize(&molecule()).unwrap();
        assert_eq!(map["constant_3"], Value::Int(3));
    }

    #[test]
    fn unknown_part_of_speech_is_rejected() {
        let err = Constant(1).text_featurize(Some("verb"), &molecule()).unwrap_err();
        assert!(matches!(err, Error::UnknownPartOfSpeech { ref pos, .. } if pos == "verb"));
    }

    #[test]
    fn pos_keys_must_match_molecules() {
        let mols = vec![molecule(), Molecule::from_smiles("O").unwrap()];
        let err = Constant(1).text_featurize_many(Some(&["noun"]), &mols).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 1, right: 2, .. }));
        assert_eq!(Constant(1).text_featurize_many(None, &mols).unwrap().len(), 2);
    }

    #[test]
    fn composite_concatenates_members() {
        let composite = MultipleFeaturizer::new(vec![Box::new(Constant(1)), Box::new(Constant(2))]);
        let mol = molecule();
        assert_eq!(composite.featurize(&mol).unwrap(), vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(composite.feature_labels(), vec!["constant_1", "constant_2"]);
        assert_eq!(composite.text_featurize(None, &mol).unwrap().len(), 2);
        assert_eq!(composite.implementors(), default_implementors());

        let many = composite
            .text_featurize_many(None, &[mol.clone(), Molecule::from_smiles("O").unwrap()])
            .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[0].len(), 2);
    }

    #[test]
    fn refitting_replaces_members() {
        let composite = MultipleFeaturizer::new(vec![Box::new(Constant(1))]);
        let composite = composite.fit_on_featurizers(None);
        assert!(composite.featurizers().is_empty());
        let composite = composite.fit_on_featurizers(Some(vec![Box::new(Constant(5)), Box::new(Constant(6))]));
        assert_eq!(composite.featurizers().len(), 2);
    }

    #[test]
    fn padding_rejects_wide_rows() {
        assert_eq!(
            pad_atom_row(vec![1.0], 3).unwrap(),
            vec![Value::Float(1.0), Value::Float(0.0), Value::Float(0.0)]
        );
        assert!(matches!(
            pad_atom_row(vec![0.0; 4], 3),
            Err(Error::TooManyAtoms { atoms: 4, max_atoms: 3 })
        ));
        assert!(matches!(
            pad_bond_row(vec![0.0; 4], 3),
            Err(Error::TooManyBonds { bonds: 4, max_bonds: 3 })
        ));
    }

    #[test]
    fn combined_names_join_each_part_of_speech() {
        let names = vec![noun("first"), noun("second")];
        assert_eq!(combined_name(&names)["noun"], "first and second");
    }
}
