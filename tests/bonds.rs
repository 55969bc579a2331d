use chemcaption::Molecule;
use chemcaption::featurize::bonds::{
    BondTypeCountFeaturizer, BondTypeProportionFeaturizer, DipoleMomentsFeaturizer,
    RotableBondCountFeaturizer,
};
use chemcaption::featurize::{Featurizer, Value};
use chemcaption::engine::{self, QuantumEngine, QuantumResult};
use std::sync::Arc;

#[derive(Debug)]
struct AlternatingCharges;

impl QuantumEngine for AlternatingCharges {
    fn name(&self) -> &str {
        "alternating"
    }

    fn calculate(&self, molecule: &Molecule) -> Result<QuantumResult, engine::Error> {
        let n = molecule.graph_with_hydrogens().atom_count();
        Ok(QuantumResult {
            charges: (0..n).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect(),
            ..Default::default()
        })
    }
}

#[test]
fn presence_prompt_asks_a_yes_no_question() {
    let ethyne = Molecule::from_smiles("C#C").unwrap();
    let prompt = BondTypeCountFeaturizer::presence()
        .text_featurize(None, &ethyne)
        .unwrap();
    assert!(prompt.fill_prompt().starts_with("Question: Are there any "));
    assert!(prompt.fill_prompt().contains("SMILES C#C"));

    let row = BondTypeCountFeaturizer::presence().labeled_featurize(&ethyne).unwrap();
    assert_eq!(row["num_triple_bonds"], Value::Int(1));
    assert_eq!(row["num_double_bonds"], Value::Int(0));
    assert!(!row.contains_key("num_bonds"));
}

#[test]
fn proportions_sum_to_one() {
    let acid = Molecule::from_smiles("CC(=O)O").unwrap();
    let row = BondTypeProportionFeaturizer::new().featurize(&acid).unwrap();
    let total: f64 = row.iter().filter_map(Value::as_f64).sum();
    assert!((total - 1.0).abs() < 1e-3, "sum {total}");
}

#[test]
fn terminal_bonds_are_not_rotatable() {
    let ether = Molecule::from_smiles("CCOCC").unwrap();
    assert_eq!(
        RotableBondCountFeaturizer::new().featurize(&ether).unwrap(),
        vec![Value::Int(2)]
    );
}

#[test]
fn bond_dipoles_scale_with_charge_separation() {
    let engine: Arc<dyn QuantumEngine> = Arc::new(AlternatingCharges);
    let hcl = Molecule::from_smiles("Cl")
        .unwrap()
        .with_conformer(chemcaption::Conformer::new(vec![[0.0; 3], [1.0, 0.0, 0.0]]))
        .unwrap();
    let f = DipoleMomentsFeaturizer::with_engine(engine).with_max_bonds(4);
    let row = f.featurize(&hcl).unwrap();
    assert_eq!(row.len(), 4);
    let dipole = row[0].as_f64().unwrap();
    assert!((dipole - 4.803).abs() < 1e-3, "dipole {dipole}");
    assert_eq!(row[1], Value::Float(0.0));
}
