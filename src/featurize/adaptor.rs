//! Adapts a plain function into a [`Featurizer`].

use super::base::{FeatureName, Featurizer, noun};
use super::text::Value;
use super::Error;
use crate::molecule::Molecule;
use std::fmt;

type ValueFn = dyn Fn(&Molecule) -> Result<Vec<Value>, Error> + Send + Sync;

/// A featurizer backed by a closure plus the prompt metadata it needs.
///
/// The closure must return exactly one value per label.
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
/// use chemcaption::featurize::{Featurizer, Value};
/// use chemcaption::featurize::adaptor::ValueFeaturizer;
///
/// let rings = ValueFeaturizer::new(
///     |m: &Molecule| Ok(vec![Value::from(m.rings().num_rings())]),
///     &["num_rings"],
///     "number of rings",
/// );
/// let prompt = rings.text_featurize(None, &Molecule::from_smiles("c1ccccc1")?)?;
/// assert_eq!(prompt.fill_completion(), "Answer: 1");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ValueFeaturizer {
    function: Box<ValueFn>,
    labels: Vec<String>,
    names: Vec<FeatureName>,
    template: Option<String>,
    constraint: Option<String>,
}

impl ValueFeaturizer {
    pub fn new<F>(function: F, labels: &[&str], name: &str) -> Self
    where
        F: Fn(&Molecule) -> Result<Vec<Value>, Error> + Send + Sync + 'static,
    {
        Self {
            function: Box::new(function),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            names: vec![noun(name)],
            template: None,
            constraint: None,
        }
    }

    /// Replaces the part-of-speech map used for prompts.
    pub fn with_names(mut self, names: FeatureName) -> Self {
        self.names = vec![names];
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

impl fmt::Debug for ValueFeaturizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFeaturizer")
            .field("labels", &self.labels)
            .field("names", &self.names)
            .field("template", &self.template)
            .field("constraint", &self.constraint)
            .finish_non_exhaustive()
    }
}

impl Featurizer for ValueFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let row = (self.function)(molecule)?;
        if row.len() != self.labels.len() {
            return Err(Error::length_mismatch("values", row.len(), "labels", self.labels.len()));
        }
        Ok(row)
    }

    fn feature_labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        self.names.clone()
    }

    fn prompt_template(&self) -> String {
        match &self.template {
            Some(template) => template.clone(),
            None => super::text_utils::generate_template(),
        }
    }

    fn completion_constraint(&self) -> Option<String> {
        self.constraint.clone()
    }
}
