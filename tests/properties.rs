use chemcaption::Molecule;
use chemcaption::chem::{canon, descriptors};
use chemcaption::featurize::text::join_english;
use proptest::prelude::*;

/// Branched chains of organic-subset atoms with optional ring closures.
fn simple_smiles() -> impl Strategy<Value = String> {
    let atoms = prop_oneof![
        Just("C"),
        Just("N"),
        Just("O"),
        Just("S"),
        Just("Cl"),
        Just("C(C)"),
        Just("C(=O)"),
        Just("C1CC1"),
        Just("c1ccccc1"),
    ];
    proptest::collection::vec(atoms, 1..=12).prop_map(|parts| parts.join(""))
}

proptest! {
    #[test]
    fn readers_never_panic(s in "\\PC{0,60}") {
        let _ = Molecule::from_smiles(&s);
        let _ = Molecule::from_selfies(&s);
    }

    #[test]
    fn written_smiles_reads_back_to_the_same_graph(smiles in simple_smiles()) {
        if let Ok(mol) = Molecule::from_smiles(&smiles) {
            let written = mol.to_smiles();
            let reread = Molecule::from_smiles(&written).unwrap();
            prop_assert_eq!(
                descriptors::molecular_formula(mol.graph()),
                descriptors::molecular_formula(reread.graph())
            );
            prop_assert_eq!(
                canon::wl_hash(mol.graph(), 3),
                canon::wl_hash(reread.graph(), 3)
            );
        }
    }

    #[test]
    fn english_join_keeps_every_item(items in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
        let joined = join_english(&items);
        for item in &items {
            prop_assert!(joined.contains(item.as_str()));
        }
        prop_assert_eq!(joined.contains(", and "), items.len() >= 3);
        prop_assert_eq!(joined.is_empty(), items.is_empty());
    }
}
