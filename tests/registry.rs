use chemcaption::Molecule;
use chemcaption::featurize::registry::{Group, init_all_comparators, init_all_featurizers};
use chemcaption::featurize::{Featurizer, MultipleFeaturizer};

fn needs_engine(featurizer: &dyn Featurizer) -> bool {
    featurizer.implementors().iter().any(|i| i.ends_with(" engine"))
}

fn molecules() -> Vec<Molecule> {
    ["CCO", "c1ccccc1O", "CC(=O)Nc1ccc(O)cc1", "C[C@H](N)C(=O)O"]
        .iter()
        .map(|s| Molecule::from_smiles(s).unwrap())
        .collect()
}

#[test]
fn every_offline_featurizer_fills_its_labels() {
    let molecules = molecules();
    for group in Group::ALL {
        for featurizer in init_all_featurizers(group) {
            if needs_engine(featurizer.as_ref()) {
                continue;
            }
            let labels = featurizer.feature_labels();
            for mol in &molecules {
                let row = featurizer
                    .featurize(mol)
                    .unwrap_or_else(|e| panic!("{featurizer:?} on {mol}: {e}"));
                assert_eq!(row.len(), labels.len(), "{featurizer:?}");
            }
            let prompt = featurizer.text_featurize(None, &molecules[0]).unwrap();
            assert!(prompt.fill_prompt().starts_with("Question: "));
        }
    }
}

#[test]
fn engine_featurizers_are_only_in_bonds_and_electronicity() {
    for group in Group::ALL {
        let any = init_all_featurizers(group).iter().any(|f| needs_engine(f.as_ref()));
        assert_eq!(any, matches!(group, Group::Bonds | Group::Electronicity), "{group}");
    }
}

#[test]
fn whole_groups_compose() {
    let composite = MultipleFeaturizer::new(init_all_featurizers(Group::Composition))
        .fit_on_featurizers(Some(init_all_featurizers(Group::Rules)));
    let row = composite.featurize(&molecules()[2]).unwrap();
    assert_eq!(row.len(), composite.feature_labels().len());
    assert_eq!(row.len(), 3);
}

#[test]
fn built_in_comparators_agree_on_identical_inputs() {
    let pair = [Molecule::from_smiles("CCO").unwrap(), Molecule::from_smiles("CCO").unwrap()];
    for comparator in init_all_comparators() {
        let row = comparator.compare(&pair).unwrap();
        assert!(row.iter().all(|v| v.as_f64() == Some(1.0)), "{comparator:?}");
    }
}
