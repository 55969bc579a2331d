use chemcaption::Molecule;
use chemcaption::featurize::composition::{
    DegreeOfUnsaturationFeaturizer, ElementMassProportionFeaturizer,
};
use chemcaption::featurize::substructure::{FragmentSearchFeaturizer, IsomorphismFeaturizer};
use chemcaption::featurize::{Comparator, Comparison, Featurizer, Value};

#[test]
fn ring_preset_counts_each_ring_once() {
    let f = FragmentSearchFeaturizer::from_preset("rings", true).unwrap();
    let biphenyl = Molecule::from_smiles("c1ccccc1-c1ccccc1").unwrap();
    let map = f.labeled_featurize(&biphenyl).unwrap();
    assert_eq!(map["benzene_count"], Value::Int(2));
    assert_eq!(map["pyridine_count"], Value::Int(0));
    assert_eq!(map["cyclohexane_count"], Value::Int(0));
}

#[test]
fn heterocyclic_presence_prompt_carries_a_constraint() {
    let f = FragmentSearchFeaturizer::from_preset("heterocyclic", false).unwrap();
    let pyridine = Molecule::from_smiles("c1ccncc1").unwrap();
    let prompt = f.text_featurize(None, &pyridine).unwrap();
    assert!(prompt.fill_prompt().contains("\nConstraint: "));
    let map = f.labeled_featurize(&pyridine).unwrap();
    assert_eq!(map["aromatic_nitrogen_presence"], Value::Int(1));
    assert_eq!(map["aromatic_oxygen_presence"], Value::Int(0));
}

#[test]
fn isomorphism_hash_ignores_atom_order_in_comparisons() {
    let comparator = Comparator::new(vec![Box::new(IsomorphismFeaturizer::new())]);
    let same = [
        Molecule::from_smiles("c1ccccc1C(=O)O").unwrap(),
        Molecule::from_smiles("OC(=O)c1ccccc1").unwrap(),
    ];
    assert_eq!(comparator.compare(&same).unwrap(), vec![Value::Int(1)]);
    let different = [
        Molecule::from_smiles("Cc1ccccc1O").unwrap(),
        Molecule::from_smiles("Cc1ccc(O)cc1").unwrap(),
    ];
    assert_eq!(comparator.compare(&different).unwrap(), vec![Value::Int(0)]);
}

#[test]
fn composition_of_benzoic_acid() {
    let acid = Molecule::from_smiles("OC(=O)c1ccccc1").unwrap();
    assert_eq!(
        DegreeOfUnsaturationFeaturizer::new().featurize(&acid).unwrap()[0].as_f64(),
        Some(5.0)
    );
    let ratios = ElementMassProportionFeaturizer::with_elements(&["C", "H", "O"]).unwrap();
    let total: f64 = ratios
        .featurize(&acid)
        .unwrap()
        .iter()
        .filter_map(Value::as_f64)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}
