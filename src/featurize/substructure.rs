//! Substructure searches, per-element topology counts and graph hashing.

use super::base::{FeatureName, Featurizer, noun};
use super::text::{Value, join_english};
use super::Error;
use crate::chem::{canon, smarts};
use crate::config;
use crate::model::types::Element;
use crate::molecule::Molecule;

const DEFAULT_PRESET: &str = "organic";
const DEFAULT_TOPOLOGY_ELEMENTS: [u8; 10] = [6, 1, 7, 8, 9, 15, 16, 17, 35, 53];
const WL_ITERATIONS: usize = 3;

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Matches a list of named SMARTS patterns.
///
/// With `count` set each entry is the number of unique matches; otherwise
/// it is a 0/1 presence indicator.
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
/// use chemcaption::featurize::{Featurizer, Value};
/// use chemcaption::featurize::substructure::FragmentSearchFeaturizer;
///
/// let f = FragmentSearchFeaturizer::with_patterns(&[("hydroxyl", "[OX2H]")], true)?;
/// let row = f.featurize(&Molecule::from_smiles("OCCO")?)?;
/// assert_eq!(row, vec![Value::Int(2)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FragmentSearchFeaturizer {
    names: Vec<String>,
    patterns: Vec<smarts::Pattern>,
    count: bool,
}

impl FragmentSearchFeaturizer {
    /// Presence indicators for the `organic` preset.
    pub fn new() -> Result<Self, Error> {
        Self::from_preset(DEFAULT_PRESET, false)
    }

    /// Uses a preset from `resources/fragments.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unknown preset and
    /// [`Error::Chem`] when a preset pattern does not parse.
    pub fn from_preset(preset: &str, count: bool) -> Result<Self, Error> {
        let presets = &config::fragment_presets().presets;
        let found = presets.get(preset).ok_or_else(|| {
            Error::invalid_argument(format!(
                "unknown fragment preset '{preset}'; available: {}",
                presets.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;
        let pairs: Vec<(&str, &str)> = found
            .names
            .iter()
            .map(String::as_str)
            .zip(found.smarts.iter().map(String::as_str))
            .collect();
        Self::with_patterns(&pairs, count)
    }

    /// Uses caller-supplied `(name, SMARTS)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty list and
    /// [`Error::Chem`] when a pattern does not parse.
    pub fn with_patterns(patterns: &[(&str, &str)], count: bool) -> Result<Self, Error> {
        if patterns.is_empty() {
            return Err(Error::invalid_argument("at least one SMARTS pattern is required"));
        }
        let mut names = Vec::with_capacity(patterns.len());
        let mut parsed = Vec::with_capacity(patterns.len());
        for (name, source) in patterns {
            names.push(name.to_string());
            parsed.push(smarts::Pattern::parse(source)?);
        }
        Ok(Self {
            names,
            patterns: parsed,
            count,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Featurizer for FragmentSearchFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let (graph, rings) = (molecule.graph(), molecule.rings());
        Ok(self
            .patterns
            .iter()
            .map(|p| {
                if self.count {
                    Value::from(smarts::find_matches(p, graph, rings).len())
                } else {
                    Value::Int(i64::from(smarts::has_match(p, graph, rings)))
                }
            })
            .collect())
    }

    fn feature_labels(&self) -> Vec<String> {
        let suffix = if self.count { "count" } else { "presence" };
        self.names.iter().map(|n| format!("{}_{suffix}", slug(n))).collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        let groups = join_english(&self.names);
        if self.count {
            vec![noun(format!("numbers of {groups} groups"))]
        } else {
            vec![noun(format!("presence indicators of {groups} groups"))]
        }
    }

    fn completion_constraint(&self) -> Option<String> {
        Some(if self.count {
            "Return a list of comma separated integers.".to_string()
        } else {
            "Return a list of comma separated integer indicators i.e., 0 for absence, 1 for presence."
                .to_string()
        })
    }
}

/// Number of topologically distinct atoms of each selected element.
///
/// Atoms of the explicit-hydrogen graph are grouped by symmetry class; the
/// entry for an element is the number of classes among its atoms.
#[derive(Debug, Clone)]
pub struct TopologyCountFeaturizer {
    elements: Vec<Element>,
}

impl Default for TopologyCountFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyCountFeaturizer {
    /// C, H, N, O, F, P, S, Cl, Br and I.
    pub fn new() -> Self {
        Self {
            elements: DEFAULT_TOPOLOGY_ELEMENTS
                .iter()
                .filter_map(|&z| Element::from_atomic_number(z))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty list or an atomic
    /// number outside 1..=118.
    pub fn with_atomic_numbers(numbers: &[u8]) -> Result<Self, Error> {
        if numbers.is_empty() {
            return Err(Error::invalid_argument("at least one element is required"));
        }
        let elements = numbers
            .iter()
            .map(|&z| {
                Element::from_atomic_number(z)
                    .ok_or_else(|| Error::invalid_argument(format!("no element with atomic number {z}")))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { elements })
    }
}

impl Featurizer for TopologyCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let graph = molecule.graph_with_hydrogens();
        let classes = canon::symmetry_classes(graph);
        Ok(self
            .elements
            .iter()
            .map(|&element| {
                let of_element: Vec<usize> = graph
                    .atoms
                    .iter()
                    .zip(&classes)
                    .filter(|(a, _)| a.element == element)
                    .map(|(_, &c)| c)
                    .collect();
                Value::from(canon::class_count(&of_element))
            })
            .collect())
    }

    fn feature_labels(&self) -> Vec<String> {
        self.elements
            .iter()
            .map(|e| format!("topology_count_{}", e.atomic_number()))
            .collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        let names: Vec<String> = self.elements.iter().map(|e| e.name().to_lowercase()).collect();
        vec![noun(format!(
            "numbers of topologically unique {} atoms",
            join_english(&names)
        ))]
    }
}

/// Weisfeiler–Lehman hash of the heavy-atom graph; isomorphic molecules share it.
#[derive(Debug, Clone, Default)]
pub struct IsomorphismFeaturizer;

impl IsomorphismFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for IsomorphismFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        Ok(vec![Value::Text(canon::wl_hash(molecule.graph(), WL_ITERATIONS))])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["weisfeiler_lehman_hash".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("Weisfeiler-Lehman graph hash")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_presence() {
        let f = FragmentSearchFeaturizer::new().unwrap();
        let acid = Molecule::from_smiles("CC(=O)O").unwrap();
        let map = f.labeled_featurize(&acid).unwrap();
        assert_eq!(map["carboxylic_acid_presence"], Value::Int(1));
        assert_eq!(map["nitrile_presence"], Value::Int(0));
        assert_eq!(f.feature_labels().len(), f.names().len());
    }

    #[test]
    fn unknown_preset_and_bad_patterns_are_rejected() {
        assert!(matches!(
            FragmentSearchFeaturizer::from_preset("nope", true),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            FragmentSearchFeaturizer::with_patterns(&[("broken", "[C")], true),
            Err(Error::Chem(_))
        ));
        assert!(FragmentSearchFeaturizer::with_patterns(&[], true).is_err());
    }

    #[test]
    fn topology_counts() {
        let f = TopologyCountFeaturizer::new();
        assert_eq!(f.feature_labels()[0], "topology_count_6");
        let ethanol = Molecule::from_smiles("CCO").unwrap();
        let map = f.labeled_featurize(&ethanol).unwrap();
        assert_eq!(map["topology_count_6"], Value::Int(2));
        assert_eq!(map["topology_count_1"], Value::Int(3));
        assert_eq!(map["topology_count_8"], Value::Int(1));
        assert_eq!(map["topology_count_7"], Value::Int(0));
        assert!(TopologyCountFeaturizer::with_atomic_numbers(&[0]).is_err());
    }

    #[test]
    fn isomorphic_inputs_share_a_hash() {
        let f = IsomorphismFeaturizer::new();
        let a = f.featurize(&Molecule::from_smiles("OCC").unwrap()).unwrap();
        let b = f.featurize(&Molecule::from_smiles("CCO").unwrap()).unwrap();
        let c = f.featurize(&Molecule::from_smiles("COC").unwrap()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
