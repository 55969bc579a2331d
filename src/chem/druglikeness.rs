//! Drug-likeness filters expressed as violation counts.

use super::descriptors::{
    atom_count, crippen, hba_count, hbd_count, molecular_weight, rotatable_bond_count,
};
use super::rings::RingInfo;
use crate::model::graph::MolGraph;

/// Lipinski's rule of five: MW ≤ 500, logP ≤ 5, HBD ≤ 5, HBA ≤ 10.
pub fn lipinski_violations(graph: &MolGraph, rings: &RingInfo) -> usize {
    let (logp, _) = crippen(graph, rings);
    [
        molecular_weight(graph) > 500.0,
        logp > 5.0,
        hbd_count(graph) > 5,
        hba_count(graph) > 10,
    ]
    .into_iter()
    .filter(|&v| v)
    .count()
}

/// Ghose filter: MW 160–480, logP −0.4–5.6, 20–70 atoms, molar refractivity 40–130.
pub fn ghose_violations(graph: &MolGraph, rings: &RingInfo) -> usize {
    let (logp, mr) = crippen(graph, rings);
    let atoms = atom_count(graph);
    [
        !(160.0..=480.0).contains(&molecular_weight(graph)),
        !(-0.4..=5.6).contains(&logp),
        !(20..=70).contains(&atoms),
        !(40.0..=130.0).contains(&mr),
    ]
    .into_iter()
    .filter(|&v| v)
    .count()
}

/// Lead-likeness: MW 250–350, logP ≤ 3.5, at most 7 rotatable bonds and 3 rings.
pub fn lead_likeness_violations(graph: &MolGraph, rings: &RingInfo) -> usize {
    let (logp, _) = crippen(graph, rings);
    [
        !(250.0..=350.0).contains(&molecular_weight(graph)),
        logp > 3.5,
        rotatable_bond_count(graph, rings) > 7,
        rings.num_rings() > 3,
    ]
    .into_iter()
    .filter(|&v| v)
    .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn mol(smi: &str) -> (MolGraph, RingInfo) {
        sanitize(smiles::parse(smi).unwrap()).unwrap()
    }

    #[test]
    fn small_molecules_pass_lipinski() {
        let (g, r) = mol("O");
        assert_eq!(lipinski_violations(&g, &r), 0);
        let (g, r) = mol("CC(=O)Oc1ccccc1C(=O)O");
        assert_eq!(lipinski_violations(&g, &r), 0);
    }

    #[test]
    fn long_alkane_violates_logp_and_weight() {
        let smi = "C".repeat(40);
        let (g, r) = mol(&smi);
        assert_eq!(lipinski_violations(&g, &r), 2);
    }

    #[test]
    fn polyol_violates_hydrogen_bond_rules() {
        let smi = "OCC(O)C(O)C(O)C(O)C(O)C(O)C(O)CO";
        let (g, r) = mol(smi);
        assert!(lipinski_violations(&g, &r) >= 1);
    }

    #[test]
    fn water_fails_ghose_on_size() {
        let (g, r) = mol("O");
        assert!(ghose_violations(&g, &r) >= 3);
    }

    #[test]
    fn water_fails_lead_likeness_on_weight_only() {
        let (g, r) = mol("O");
        assert_eq!(lead_likeness_violations(&g, &r), 1);
    }
}
