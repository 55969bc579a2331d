//! Bond statistics: type counts and proportions, rotatable bonds, bond
//! orders and per-bond dipoles.

use super::base::{FeatureName, Featurizer, indexed_labels, noun, pad_bond_row};
use super::text::{Value, join_english};
use super::Error;
use crate::chem::descriptors;
use crate::config;
use crate::engine::{self, QuantumEngine};
use crate::model::types::BondOrder;
use crate::molecule::Molecule;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Elementary charge times Å in Debye.
const E_ANGSTROM_TO_DEBYE: f64 = 4.803;

fn type_label(order: BondOrder) -> String {
    format!("num_{}_bonds", order.key().to_lowercase())
}

fn type_names(orders: &[BondOrder]) -> String {
    let names: Vec<&str> = orders.iter().map(|o| o.name()).collect();
    join_english(&names)
}

fn bond_type_counts(molecule: &Molecule, orders: &[BondOrder]) -> Vec<usize> {
    let graph = molecule.graph_with_hydrogens();
    orders
        .iter()
        .map(|order| graph.bonds.iter().filter(|b| b.order == *order).count())
        .collect()
}

/// Counts (or flags the presence of) each bond type, hydrogens included.
///
/// With every type selected and `count` set, the row holds one count per
/// type in canonical order followed by the total number of bonds. When
/// `count` is unset, or only a subset of types is selected, the row holds
/// one 0/1 presence indicator per selected type and no total.
#[derive(Debug, Clone)]
pub struct BondTypeCountFeaturizer {
    count: bool,
    bond_types: Vec<BondOrder>,
    all_types: bool,
}

impl Default for BondTypeCountFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BondTypeCountFeaturizer {
    pub fn new() -> Self {
        Self {
            count: true,
            bond_types: BondOrder::ALL.to_vec(),
            all_types: true,
        }
    }

    /// Presence indicators for every bond type.
    pub fn presence() -> Self {
        Self {
            count: false,
            ..Self::new()
        }
    }

    /// Restricts the row to `bond_types`, given as names or keys (`single`, `AROMATIC`, …).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty list or an unknown bond type.
    pub fn with_bond_types(bond_types: &[&str]) -> Result<Self, Error> {
        if bond_types.is_empty() {
            return Err(Error::invalid_argument("at least one bond type is required"));
        }
        let mut selected: Vec<BondOrder> = bond_types
            .iter()
            .map(|name| {
                name.parse::<BondOrder>()
                    .map_err(|_| Error::invalid_argument(format!("unknown bond type '{name}'")))
            })
            .collect::<Result<_, _>>()?;
        selected.sort();
        selected.dedup();
        Ok(Self {
            count: true,
            all_types: selected.len() == BondOrder::ALL.len(),
            bond_types: selected,
        })
    }

    fn reports_counts(&self) -> bool {
        self.count && self.all_types
    }

    /// Distinct bond types present in `molecule`, in canonical order.
    pub fn unique_bond_types(molecule: &Molecule) -> Vec<BondOrder> {
        molecule
            .graph_with_hydrogens()
            .bonds
            .iter()
            .map(|b| b.order)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Featurizer for BondTypeCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let counts = bond_type_counts(molecule, &self.bond_types);
        if self.reports_counts() {
            let total = molecule.graph_with_hydrogens().bond_count();
            Ok(counts.into_iter().chain([total]).map(Value::from).collect())
        } else {
            Ok(counts.into_iter().map(|c| Value::Int(i64::from(c > 0))).collect())
        }
    }

    fn feature_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.bond_types.iter().map(|o| type_label(*o)).collect();
        if self.reports_counts() {
            labels.push("num_bonds".to_string());
        }
        labels
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        let types = type_names(&self.bond_types);
        if self.reports_counts() {
            vec![noun(format!("numbers of the {types} bonds"))]
        } else {
            vec![noun(format!("{types} bond types"))]
        }
    }

    fn prompt_template(&self) -> String {
        if self.reports_counts() {
            super::text_utils::generate_template()
        } else {
            "Question: Are there any {PROPERTY_NAME} in the molecule with {REPR_SYSTEM} {REPR_STRING}?"
                .to_string()
        }
    }

    fn completion_constraint(&self) -> Option<String> {
        Some(if self.reports_counts() {
            "Return a list of comma separated integers.".to_string()
        } else {
            "Return a list of comma separated integer / boolean indicators i.e., \
             0 (or False) for absence, 1 (or True) for presence."
                .to_string()
        })
    }
}

/// Share of each bond type among all bonds, hydrogens included.
#[derive(Debug, Clone, Default)]
pub struct BondTypeProportionFeaturizer;

impl BondTypeProportionFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for BondTypeProportionFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let counts = bond_type_counts(molecule, &BondOrder::ALL);
        let total = molecule.graph_with_hydrogens().bond_count();
        Ok(counts
            .into_iter()
            .map(|c| Value::Float(if total == 0 { 0.0 } else { c as f64 / total as f64 }))
            .collect())
    }

    fn feature_labels(&self) -> Vec<String> {
        BondOrder::ALL
            .iter()
            .map(|o| format!("{}_bond_proportion", o.key().to_lowercase()))
            .collect()
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun(format!("proportions of the {} bond types", type_names(&BondOrder::ALL)))]
    }

    fn completion_constraint(&self) -> Option<String> {
        Some("Return a list of comma separated floats.".to_string())
    }
}

/// Number of rotatable bonds (strict definition).
#[derive(Debug, Clone, Default)]
pub struct RotableBondCountFeaturizer;

impl RotableBondCountFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for RotableBondCountFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let count = descriptors::rotatable_bond_count(molecule.graph(), molecule.rings());
        Ok(vec![Value::from(count)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["num_rotable_bonds".to_string()]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("number of rotatable bonds")]
    }
}

/// Shares of rotatable and non-rotatable bonds among the heavy-atom bonds.
#[derive(Debug, Clone, Default)]
pub struct RotableBondProportionFeaturizer;

impl RotableBondProportionFeaturizer {
    pub fn new() -> Self {
        Self
    }
}

impl Featurizer for RotableBondProportionFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let total = molecule.graph().bond_count();
        if total == 0 {
            return Ok(vec![Value::Float(0.0), Value::Float(0.0)]);
        }
        let rotatable = descriptors::rotatable_bond_count(molecule.graph(), molecule.rings()) as f64
            / total as f64;
        Ok(vec![Value::Float(rotatable), Value::Float(1.0 - rotatable)])
    }

    fn feature_labels(&self) -> Vec<String> {
        vec![
            "rotable_proportion".to_string(),
            "non_rotable_proportion".to_string(),
        ]
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("proportions of rotatable and non-rotatable bonds")]
    }
}

/// Order of every heavy-atom bond, zero-padded to `max_bonds`.
#[derive(Debug, Clone)]
pub struct BondOrderFeaturizer {
    max_bonds: usize,
}

impl Default for BondOrderFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BondOrderFeaturizer {
    pub fn new() -> Self {
        Self::with_max_bonds(config::settings().text.max_bonds)
    }

    pub fn with_max_bonds(max_bonds: usize) -> Self {
        Self { max_bonds }
    }
}

impl Featurizer for BondOrderFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let orders = molecule.graph().bonds.iter().map(|b| b.order.value()).collect();
        pad_bond_row(orders, self.max_bonds)
    }

    fn feature_labels(&self) -> Vec<String> {
        indexed_labels("bond_order", self.max_bonds)
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("bond orders")]
    }
}

/// Bond dipole `|qᵢ − qⱼ| · dᵢⱼ` in Debye for every bond, hydrogens included.
///
/// Partial charges come from the quantum-chemistry engine; distances from
/// the molecule's conformer. The row is zero-padded to `max_bonds`.
#[derive(Debug, Clone)]
pub struct DipoleMomentsFeaturizer {
    engine: Arc<dyn QuantumEngine>,
    max_bonds: usize,
}

impl Default for DipoleMomentsFeaturizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DipoleMomentsFeaturizer {
    pub fn new() -> Self {
        Self::with_engine(engine::default_engine())
    }

    pub fn with_engine(engine: Arc<dyn QuantumEngine>) -> Self {
        Self {
            engine,
            max_bonds: config::settings().text.max_bonds,
        }
    }

    pub fn with_max_bonds(mut self, max_bonds: usize) -> Self {
        self.max_bonds = max_bonds;
        self
    }
}

impl Featurizer for DipoleMomentsFeaturizer {
    fn featurize(&self, molecule: &Molecule) -> Result<Vec<Value>, Error> {
        let graph = molecule.graph_with_hydrogens();
        if graph.bond_count() > self.max_bonds {
            return Err(Error::TooManyBonds {
                bonds: graph.bond_count(),
                max_bonds: self.max_bonds,
            });
        }
        let conformer = molecule.conformer()?;
        let charges = self.engine.calculate(molecule)?.charges;
        let dipoles = graph
            .bonds
            .iter()
            .map(|b| {
                let dq = (charges.get(b.i).copied().unwrap_or(0.0) - charges.get(b.j).copied().unwrap_or(0.0)).abs();
                dq * conformer.distance(b.i, b.j) * E_ANGSTROM_TO_DEBYE
            })
            .collect();
        pad_bond_row(dipoles, self.max_bonds)
    }

    fn feature_labels(&self) -> Vec<String> {
        indexed_labels("dipole_moment", self.max_bonds)
    }

    fn feature_names(&self) -> Vec<FeatureName> {
        vec![noun("bond dipole moments")]
    }

    fn implementors(&self) -> Vec<String> {
        let mut out = super::base::default_implementors();
        out.push(format!("{} engine", self.engine.name()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benzene() -> Molecule {
        Molecule::from_smiles("C1=CC=CC=C1").unwrap()
    }

    #[test]
    fn bond_type_counts_include_hydrogens() {
        let f = BondTypeCountFeaturizer::new();
        let map = f.labeled_featurize(&benzene()).unwrap();
        assert_eq!(map["num_bonds"], Value::Int(12));
        assert_eq!(map["num_aromatic_bonds"], Value::Int(6));
        assert_eq!(map["num_single_bonds"], Value::Int(6));
        assert_eq!(f.feature_labels().len(), 21);
    }

    #[test]
    fn subset_reports_presence_without_total() {
        let f = BondTypeCountFeaturizer::with_bond_types(&["single", "double", "triple"]).unwrap();
        assert_eq!(
            f.featurize(&benzene()).unwrap(),
            vec![Value::Int(1), Value::Int(0), Value::Int(0)]
        );
        assert_eq!(f.feature_labels().len(), 3);
        assert!(BondTypeCountFeaturizer::with_bond_types(&["sextuple"]).is_err());
        assert!(BondTypeCountFeaturizer::with_bond_types(&[]).is_err());
    }

    #[test]
    fn unique_types_of_benzene() {
        assert_eq!(
            BondTypeCountFeaturizer::unique_bond_types(&benzene()),
            vec![BondOrder::Single, BondOrder::Aromatic]
        );
    }

    #[test]
    fn rotatable_bonds() {
        let propane_chain = Molecule::from_smiles("CCCC").unwrap();
        assert_eq!(
            RotableBondCountFeaturizer::new().featurize(&propane_chain).unwrap(),
            vec![Value::Int(1)]
        );
        let proportions = RotableBondProportionFeaturizer::new().featurize(&benzene()).unwrap();
        assert_eq!(proportions, vec![Value::Float(0.0), Value::Float(1.0)]);
        let water = Molecule::from_smiles("O").unwrap();
        assert_eq!(
            RotableBondProportionFeaturizer::new().featurize(&water).unwrap(),
            vec![Value::Float(0.0), Value::Float(0.0)]
        );
    }

    #[test]
    fn bond_orders_are_padded() {
        let f = BondOrderFeaturizer::new();
        let row = f.featurize(&Molecule::from_smiles("C=CC#N").unwrap()).unwrap();
        assert_eq!(row.len(), f.feature_labels().len());
        assert_eq!(&row[..4], &[Value::Float(2.0), Value::Float(1.0), Value::Float(3.0), Value::Float(0.0)]);
        assert_eq!(f.feature_names()[0]["noun"], "bond orders");
        let narrow = BondOrderFeaturizer::with_max_bonds(2);
        assert!(matches!(
            narrow.featurize(&benzene()),
            Err(Error::TooManyBonds { bonds: 6, max_bonds: 2 })
        ));
    }
}
