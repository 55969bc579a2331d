//! Tetrahedral stereocenter detection.

use super::canon::symmetry_classes;
use crate::model::atom::Chirality;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};

/// Class assigned to implicit hydrogens when comparing substituents.
const IMPLICIT_H: usize = usize::MAX;

fn is_tetrahedral_candidate(graph: &MolGraph, atom: usize) -> bool {
    let a = &graph.atoms[atom];
    let element_ok = match a.element {
        Element::C | Element::Si | Element::Ge => a.formal_charge == 0,
        Element::N | Element::P => a.formal_charge == 1,
        _ => false,
    };
    element_ok
        && !a.aromatic
        && graph.degree(atom) + a.hydrogens as usize == 4
        && graph
            .incident(atom)
            .iter()
            .all(|&(_, bi)| graph.bonds[bi].order == BondOrder::Single)
}

/// Indices of the chiral centers of `graph`, in ascending order.
///
/// An atom counts when it carries an explicit chirality tag, or when it is a
/// tetrahedral atom whose four substituents all fall into different
/// topological symmetry classes. Implicit hydrogens share a single class,
/// so an atom with two of them is never a center.
pub fn chiral_centers(graph: &MolGraph) -> Vec<usize> {
    let classes = symmetry_classes(graph);
    (0..graph.atom_count())
        .filter(|&atom| {
            if graph.atoms[atom].chirality != Chirality::None {
                return true;
            }
            if !is_tetrahedral_candidate(graph, atom) {
                return false;
            }
            let mut substituents: Vec<usize> = graph
                .neighbors(atom)
                .map(|nb| {
                    if graph.atoms[nb].is_hydrogen() {
                        IMPLICIT_H
                    } else {
                        classes[nb]
                    }
                })
                .collect();
            substituents.extend(std::iter::repeat_n(
                IMPLICIT_H,
                graph.atoms[atom].hydrogens as usize,
            ));
            substituents.sort_unstable();
            substituents.windows(2).all(|w| w[0] != w[1])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn centers(smi: &str) -> Vec<usize> {
        let (g, _) = sanitize(smiles::parse(smi).unwrap()).unwrap();
        chiral_centers(&g)
    }

    #[test]
    fn butan_2_ol_has_one_center() {
        assert_eq!(centers("CC(O)CC"), vec![1]);
    }

    #[test]
    fn symmetric_carbons_are_not_centers() {
        assert!(centers("CC(O)C").is_empty());
        assert!(centers("CCO").is_empty());
        assert!(centers("C1CCCCC1").is_empty());
    }

    #[test]
    fn tagged_atoms_are_counted() {
        assert_eq!(centers("C[C@H](N)C(=O)O"), vec![1]);
        assert_eq!(centers("N[C@@H](C)C(=O)O"), vec![1]);
    }

    #[test]
    fn untagged_alanine_is_detected_topologically() {
        assert_eq!(centers("CC(N)C(=O)O"), vec![1]);
    }

    #[test]
    fn multiple_centers_in_a_sugar_like_chain() {
        assert_eq!(centers("OCC(O)C(O)C=O"), vec![2, 4]);
    }

    #[test]
    fn double_bonded_carbon_is_not_a_center() {
        assert!(centers("CC(=C)CC").is_empty());
    }
}
