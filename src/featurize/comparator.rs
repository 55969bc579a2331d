//! Lifting featurizers to comparisons across several molecules.
//!
//! A [`Comparator`] runs each of its featurizers on every molecule and
//! reports `1` when all rows are identical and `0` otherwise. The built-in
//! comparators wrap a fixed featurizer; [`MultipleComparator`] concatenates
//! the rows of several comparators.

use super::base::{FeatureName, Featurizer, combined_name, default_implementors, resolve_names, DEFAULT_POS};
use super::bonds::RotableBondCountFeaturizer;
use super::composition::{AtomCountFeaturizer, MolecularFormulaFeaturizer};
use super::electronicity::ValenceElectronCountFeaturizer;
use super::rules::LipinskiFilterFeaturizer;
use super::stereochemistry::ChiralCenterCountFeaturizer;
use super::symmetry::PointGroupFeaturizer;
use super::text::{Prompt, Value};
use super::text_utils::{generate_comparison_template, inspect_template, inspect_template_with};
use super::Error;
use crate::config::TextSettings;
use crate::molecule::Molecule;
use rand::RngCore;
use std::fmt;

/// A comparison of one or more properties across a set of molecules.
pub trait Comparison: Send + Sync + fmt::Debug {
    /// One value per compared property: `1` when all molecules agree, else `0`.
    fn compare(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error>;

    fn feature_labels(&self) -> Vec<String>;

    fn feature_names(&self) -> Vec<FeatureName>;

    /// Alias of [`compare`](Comparison::compare).
    fn featurize(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error> {
        self.compare(molecules)
    }

    fn implementors(&self) -> Vec<String> {
        default_implementors()
    }

    fn prompt_template(&self) -> String {
        generate_comparison_template()
    }

    /// Renders "Do the molecules with … have the same …?".
    fn text_featurize(&self, pos_key: Option<&str>, molecules: &[Molecule]) -> Result<Prompt, Error> {
        comparison_prompt(self, pos_key, molecules, self.prompt_template())
    }

    fn text_featurize_with_rng(
        &self,
        pos_key: Option<&str>,
        molecules: &[Molecule],
        rng: &mut dyn RngCore,
    ) -> Result<Prompt, Error> {
        let template = inspect_template(&self.prompt_template(), rng);
        comparison_prompt(self, pos_key, molecules, template)
    }

    fn text_featurize_with_settings(
        &self,
        pos_key: Option<&str>,
        molecules: &[Molecule],
        settings: &TextSettings,
        rng: &mut dyn RngCore,
    ) -> Result<Prompt, Error> {
        let template = inspect_template_with(&self.prompt_template(), settings, rng);
        comparison_prompt(self, pos_key, molecules, template)
    }
}

fn comparison_prompt<C: Comparison + ?Sized>(
    comparison: &C,
    pos_key: Option<&str>,
    molecules: &[Molecule],
    template: String,
) -> Result<Prompt, Error> {
    let completion_names = resolve_names(&comparison.feature_names(), pos_key.unwrap_or(DEFAULT_POS))?;
    let completion = comparison.compare(molecules)?;
    let representation_type = molecules
        .first()
        .map(|m| m.representation_system().to_string())
        .unwrap_or_default();
    Ok(Prompt {
        completion,
        representation: molecules
            .iter()
            .map(|m| m.representation_string().to_string())
            .collect(),
        representation_type,
        completion_names,
        completion_labels: comparison.feature_labels(),
        template,
        constraint: Some("Return a list of comma separated integer indicators i.e., 1 for identical, 0 otherwise.".to_string()),
    })
}

/// Compares molecules featurizer by featurizer.
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
/// use chemcaption::featurize::{Comparator, Comparison, Value};
/// use chemcaption::featurize::composition::AtomCountFeaturizer;
///
/// let comparator = Comparator::new(vec![Box::new(AtomCountFeaturizer::new())]);
/// let molecules = [Molecule::from_smiles("N#N")?, Molecule::from_smiles("[C-]#[O+]")?];
/// assert_eq!(comparator.compare(&molecules)?, vec![Value::Int(1)]);
/// assert_eq!(comparator.feature_labels(), vec!["num_atoms_similarity"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct Comparator {
    featurizers: Option<Vec<Box<dyn Featurizer>>>,
}

impl Comparator {
    pub fn new(featurizers: Vec<Box<dyn Featurizer>>) -> Self {
        Self {
            featurizers: Some(featurizers),
        }
    }

    pub fn featurizers(&self) -> Option<&[Box<dyn Featurizer>]> {
        self.featurizers.as_deref()
    }

    /// Replaces the featurizers; `None` clears them.
    pub fn fit_on_featurizers(mut self, featurizers: Option<Vec<Box<dyn Featurizer>>>) -> Self {
        self.featurizers = featurizers;
        self
    }

    fn members(&self) -> Result<&[Box<dyn Featurizer>], Error> {
        match self.featurizers.as_deref() {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(Error::invalid_argument("comparator has no featurizers")),
        }
    }
}

impl Comparison for Comparator {
    fn compare(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error> {
        let members = self.members()?;
        if molecules.is_empty() {
            return Err(Error::invalid_argument("at least one molecule is required for a comparison"));
        }
        members
            .iter()
            .map(|featurizer| {
                let rows = featurizer.featurize_many(molecules)?;
                let same = rows.windows(2).all(|w| w[0] == w[1]);
                Ok(Value::Int(i64::from(same)))
            })
            .collect()
    }

    fn feature_labels(&self) -> Vec<String> {
        self.featurizers
            .iter()
            .flatten()
            .map(|f| {
                let first = f.feature_labels().into_iter().next().unwrap_or_else(|| "feature".to_string());
                format!("{first}_similarity")
            })
            .collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        self.featurizers
            .iter()
            .flatten()
            .map(|f| combined_name(&f.feature_names()))
            .collect()
    }

    fn implementors(&self) -> Vec<String> {
        let mut out: Vec<String> = default_implementors();
        for name in self.featurizers.iter().flatten().flat_map(|f| f.implementors()) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

/// Concatenation of several comparisons.
#[derive(Debug, Default)]
pub struct MultipleComparator {
    comparators: Option<Vec<Box<dyn Comparison>>>,
}

impl MultipleComparator {
    pub fn new(comparators: Vec<Box<dyn Comparison>>) -> Self {
        Self {
            comparators: Some(comparators),
        }
    }

    pub fn comparators(&self) -> Option<&[Box<dyn Comparison>]> {
        self.comparators.as_deref()
    }

    /// Replaces the comparators; `None` clears them.
    pub fn fit_on_comparators(mut self, comparators: Option<Vec<Box<dyn Comparison>>>) -> Self {
        self.comparators = comparators;
        self
    }
}

impl Comparison for MultipleComparator {
    fn compare(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error> {
        let comparators = match self.comparators.as_deref() {
            Some(list) if !list.is_empty() => list,
            _ => return Err(Error::invalid_argument("multiple comparator has no comparators")),
        };
        let mut row = Vec::new();
        for comparator in comparators {
            row.extend(comparator.compare(molecules)?);
        }
        Ok(row)
    }

    fn feature_labels(&self) -> Vec<String> {
        self.comparators.iter().flatten().flat_map(|c| c.feature_labels()).collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        self.comparators.iter().flatten().flat_map(|c| c.feature_names()).collect()
    }

    fn implementors(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.comparators.iter().flatten().flat_map(|c| c.implementors()) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

macro_rules! single_property_comparator {
    ($(#[$doc:meta])* $name:ident, $featurizer:ty) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            inner: Comparator,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    inner: Comparator::new(vec![Box::new(<$featurizer>::new())]),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Comparison for $name {
            fn compare(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error> {
                self.inner.compare(molecules)
            }

            fn feature_labels(&self) -> Vec<String> {
                self.inner.feature_labels()
            }

            fn feature_names(&self) -> Vec<FeatureName> {
                self.inner.feature_names()
            }
        }
    };
}

single_property_comparator!(
    /// Do the molecules have the same number of atoms (hydrogens included)?
    AtomCountComparator,
    AtomCountFeaturizer
);
single_property_comparator!(
    /// Do the molecules share a molecular formula?
    IsomerismComparator,
    MolecularFormulaFeaturizer
);
single_property_comparator!(ValenceElectronCountComparator, ValenceElectronCountFeaturizer);
single_property_comparator!(LipinskiViolationCountComparator, LipinskiFilterFeaturizer);
single_property_comparator!(PointGroupComparator, PointGroupFeaturizer);
single_property_comparator!(ChiralCenterCountComparator, ChiralCenterCountFeaturizer);
single_property_comparator!(RotableBondCountComparator, RotableBondCountFeaturizer);

/// Are the molecules isoelectronic, i.e. equal in valence electrons and in atoms?
#[derive(Debug)]
pub struct IsoelectronicComparator {
    inner: Comparator,
}

impl IsoelectronicComparator {
    pub fn new() -> Self {
        Self {
            inner: Comparator::new(vec![
                Box::new(ValenceElectronCountFeaturizer::new()),
                Box::new(AtomCountFeaturizer::new()),
            ]),
        }
    }
}

impl Default for IsoelectronicComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison for IsoelectronicComparator {
    fn compare(&self, molecules: &[Molecule]) -> Result<Vec<Value>, Error> {
        let all = self.inner.compare(molecules)?.iter().all(|v| *v == Value::Int(1));
        Ok(vec![Value::Int(i64::from(all))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["isoelectronic_similarity".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![combined_name(&self.inner.feature_names())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::featurize::electronicity::HydrogenAcceptorCountFeaturizer;

    fn isoelectronic_set() -> Vec<Molecule> {
        ["[C-]#[O+]", "N#N", "N#[O+]", "[C-]#N"]
            .iter()
            .map(|s| Molecule::from_smiles(s).unwrap())
            .collect()
    }

    #[test]
    fn comparator_emits_one_value_per_featurizer() {
        let comparator = Comparator::new(vec![
            Box::new(HydrogenAcceptorCountFeaturizer::new()),
            Box::new(ChiralCenterCountFeaturizer::new()),
        ]);
        let molecules = isoelectronic_set();
        let row = comparator.compare(&molecules).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row[1], Value::Int(1));
        assert_eq!(comparator.featurize(&molecules).unwrap(), row);
        assert_eq!(comparator.feature_labels().len(), 2);
        assert!(comparator.feature_labels()[0].ends_with("_similarity"));
    }

    #[test]
    fn refitting_a_comparator() {
        let comparator = Comparator::new(vec![Box::new(AtomCountFeaturizer::new())]);
        let comparator = comparator.fit_on_featurizers(None);
        assert!(comparator.featurizers().is_none());
        assert!(matches!(
            comparator.compare(&isoelectronic_set()),
            Err(Error::InvalidArgument(_))
        ));
        let comparator = comparator.fit_on_featurizers(Some(vec![Box::new(AtomCountFeaturizer::new())]));
        assert_eq!(comparator.featurizers().map(<[_]>::len), Some(1));
    }

    #[test]
    fn empty_molecule_list_is_rejected() {
        let comparator = AtomCountComparator::new();
        assert!(matches!(comparator.compare(&[]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn multiple_comparator_concatenates() {
        let molecules = isoelectronic_set();
        let comparator = MultipleComparator::new(vec![
            Box::new(AtomCountComparator::new()),
            Box::new(IsomerismComparator::new()),
        ]);
        let row = comparator.compare(&molecules).unwrap();
        assert_eq!(row, vec![Value::Int(1), Value::Int(0)]);
        assert_eq!(comparator.feature_labels().len(), 2);
        assert!(!comparator.implementors().is_empty());

        let comparator = comparator.fit_on_comparators(None);
        assert!(comparator.comparators().is_none());
        let comparator = comparator.fit_on_comparators(Some(vec![Box::new(AtomCountComparator::new())]));
        assert_eq!(comparator.comparators().map(<[_]>::len), Some(1));
    }

    #[test]
    fn isoelectronic_species() {
        let comparator = IsoelectronicComparator::new();
        assert_eq!(comparator.compare(&isoelectronic_set()).unwrap(), vec![Value::Int(1)]);
        let different = [Molecule::from_smiles("N#N").unwrap(), Molecule::from_smiles("O=O").unwrap()];
        assert_eq!(comparator.compare(&different).unwrap(), vec![Value::Int(0)]);
    }

    #[test]
    fn comparison_prompt_lists_every_molecule() {
        let molecules = vec![
            Molecule::from_smiles("CCO").unwrap(),
            Molecule::from_smiles("OCC").unwrap(),
            Molecule::from_smiles("COC").unwrap(),
        ];
        let prompt = AtomCountComparator::new().text_featurize(None, &molecules).unwrap();
        assert_eq!(
            prompt.fill_prompt().lines().next().unwrap(),
            "Question: Do the molecules with SMILES CCO, CCO, and COC have the same number of atoms?"
        );
        assert_eq!(prompt.fill_completion(), "Answer: 1");
    }
}
