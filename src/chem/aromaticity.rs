//! Hückel aromaticity perception.

use super::rings::RingInfo;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use std::collections::BTreeSet;
use tracing::debug;

/// Marks atoms and bonds of 4n+2 π-electron ring systems as aromatic.
///
/// Single SSSR rings and pairs of rings sharing a bond are tested, repeating
/// until no new system qualifies so that rings fused to an already aromatic
/// ring are judged with the aromatic electron counts. Returns the number of
/// ring systems newly marked.
pub fn perceive(graph: &mut MolGraph, rings: &RingInfo) -> usize {
    let ring_bonds: Vec<Vec<usize>> = rings
        .rings
        .iter()
        .map(|r| rings.ring_bonds(graph, r))
        .collect();

    let mut systems: Vec<(BTreeSet<usize>, BTreeSet<usize>)> = Vec::new();
    for (k, ring) in rings.rings.iter().enumerate() {
        systems.push((ring.iter().copied().collect(), ring_bonds[k].iter().copied().collect()));
    }
    for a in 0..rings.rings.len() {
        for b in (a + 1)..rings.rings.len() {
            if ring_bonds[a].iter().any(|bi| ring_bonds[b].contains(bi)) {
                let atoms = rings.rings[a].iter().chain(&rings.rings[b]).copied().collect();
                let bonds = ring_bonds[a].iter().chain(&ring_bonds[b]).copied().collect();
                systems.push((atoms, bonds));
            }
        }
    }

    let mut marked = 0;
    loop {
        let mut changed = false;
        for (atoms, bonds) in &systems {
            let done = atoms.iter().all(|&a| graph.atoms[a].aromatic)
                && bonds.iter().all(|&b| graph.bonds[b].order == BondOrder::Aromatic);
            if done {
                continue;
            }
            let Some(electrons) = pi_electrons(graph, atoms) else {
                continue;
            };
            if electrons % 4 == 2 {
                for &a in atoms {
                    graph.atoms[a].aromatic = true;
                }
                for &b in bonds {
                    graph.bonds[b].order = BondOrder::Aromatic;
                }
                debug!(atoms = ?atoms, electrons, "aromatic ring system");
                marked += 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    marked
}

fn pi_electrons(graph: &MolGraph, system: &BTreeSet<usize>) -> Option<usize> {
    system
        .iter()
        .map(|&a| contribution(graph, a, system))
        .sum::<Option<usize>>()
}

/// π electrons donated by `atom` to the ring system, or `None` if it cannot take part.
fn contribution(graph: &MolGraph, atom: usize, system: &BTreeSet<usize>) -> Option<usize> {
    let data = &graph.atoms[atom];
    let connections = graph.degree(atom) + data.hydrogens as usize;

    let mut internal_double = 0;
    let mut exocyclic_hetero_double = false;
    for &(nb, bi) in graph.incident(atom) {
        match graph.bonds[bi].order {
            BondOrder::Double if system.contains(&nb) => internal_double += 1,
            BondOrder::Double => {
                let partner = &graph.atoms[nb];
                if matches!(partner.element, Element::O | Element::N | Element::S) && !partner.aromatic {
                    exocyclic_hetero_double = true;
                } else if partner.aromatic {
                    internal_double += 1;
                } else {
                    return None;
                }
            }
            BondOrder::Triple | BondOrder::Quadruple => return None,
            _ => {}
        }
    }
    if internal_double > 1 {
        return None;
    }
    if exocyclic_hetero_double {
        return Some(0);
    }
    if internal_double == 1 {
        return Some(1);
    }

    let charge = data.formal_charge;
    if data.aromatic {
        return match data.element {
            Element::C => Some(match charge {
                -1 => 2,
                1 => 0,
                _ => 1,
            }),
            Element::N | Element::P => Some(match charge {
                1 => 1,
                -1 => 2,
                _ if data.hydrogens > 0 || graph.degree(atom) == 3 => 2,
                _ => 1,
            }),
            Element::O | Element::S | Element::Se | Element::Te => Some(if charge == 1 { 1 } else { 2 }),
            Element::B => Some(0),
            _ => None,
        };
    }

    match (data.element, charge) {
        (Element::C, -1) if connections == 3 => Some(2),
        (Element::C, 1) if connections == 3 => Some(0),
        (Element::B, 0) if connections == 3 => Some(0),
        (Element::N | Element::P, 0) if connections == 3 => Some(2),
        (Element::N, -1) if connections == 2 => Some(2),
        (Element::O | Element::S | Element::Se | Element::Te, 0) if connections == 2 => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::chem;
    use crate::model::types::BondOrder;

    fn aromatic_atoms(smiles: &str) -> Vec<bool> {
        let (g, _) = chem::sanitize(chem::smiles::parse(smiles).unwrap()).unwrap();
        g.atoms.iter().map(|a| a.aromatic).collect()
    }

    #[test]
    fn kekule_benzene_becomes_aromatic() {
        let (g, _) = chem::sanitize(chem::smiles::parse("C1=CC=CC=C1").unwrap()).unwrap();
        assert!(g.atoms.iter().all(|a| a.aromatic));
        assert!(g.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(g.atoms.iter().all(|a| a.hydrogens == 1));
    }

    #[test]
    fn five_membered_heterocycles() {
        assert!(aromatic_atoms("C1=CNC=C1").iter().all(|&a| a));
        assert!(aromatic_atoms("C1=COC=C1").iter().all(|&a| a));
        assert!(aromatic_atoms("C1=CSC=C1").iter().all(|&a| a));
    }

    #[test]
    fn non_aromatic_rings_stay_aliphatic() {
        assert!(aromatic_atoms("C1=CCC=C1").iter().all(|&a| !a));
        assert!(aromatic_atoms("C1CCCCC1").iter().all(|&a| !a));
        assert!(aromatic_atoms("C1=CC=CC=CC=C1").iter().all(|&a| !a));
    }

    #[test]
    fn quinone_ring_is_not_aromatic() {
        let flags = aromatic_atoms("O=C1C=CC(=O)C=C1C(=O)O");
        assert!(flags.iter().all(|&a| !a));
    }

    #[test]
    fn fused_kekule_naphthalene() {
        assert!(aromatic_atoms("C1=CC=C2C=CC=CC2=C1").iter().all(|&a| a));
    }

    #[test]
    fn pyridone_ring_is_aromatic() {
        let flags = aromatic_atoms("O=C1C=CC=CN1");
        assert!(!flags[0]);
        assert!(flags[1..].iter().all(|&a| a));
    }
}
