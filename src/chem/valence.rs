//! Default valences and implicit hydrogen assignment.

use super::error::Error;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};

/// Allowed valences of the neutral organic-subset elements, smallest first.
pub fn default_valences(element: Element) -> &'static [u8] {
    match element {
        Element::B => &[3],
        Element::C => &[4],
        Element::N => &[3, 5],
        Element::O => &[2],
        Element::P => &[3, 5],
        Element::S => &[2, 4, 6],
        Element::F => &[1],
        Element::Cl | Element::Br | Element::I => &[1, 3, 5, 7],
        Element::H => &[1],
        _ => &[],
    }
}

/// Allowed valences after applying the formal charge.
///
/// A charged atom takes the valences of its isoelectronic neighbour in the
/// period, so `[N+]` behaves like carbon and `[O-]` like fluorine.
pub fn charged_valences(element: Element, charge: i8) -> Vec<u8> {
    if charge == 0 {
        return default_valences(element).to_vec();
    }
    let shifted = element.atomic_number() as i16 - charge as i16;
    let Some(iso) = u8::try_from(shifted).ok().and_then(Element::from_atomic_number) else {
        return Vec::new();
    };
    // Boron-like cations and carbon anions keep three bonds.
    match (element, charge) {
        (Element::C, 1) | (Element::C, -1) => vec![3],
        _ => default_valences(iso).to_vec(),
    }
}

/// Assigns implicit hydrogens to every atom whose count is not fixed by the input
/// and checks that no atom exceeds its permitted valence.
pub fn assign_implicit_hydrogens(graph: &mut MolGraph) -> Result<(), Error> {
    for idx in 0..graph.atom_count() {
        let atom = &graph.atoms[idx];
        let valences = charged_valences(atom.element, atom.formal_charge);

        if atom.aromatic {
            if !atom.fixed_hydrogens {
                let target = valences.first().copied().unwrap_or(0) as usize;
                let used: usize = graph
                    .incident(idx)
                    .iter()
                    .map(|&(_, bi)| match graph.bonds[bi].order {
                        BondOrder::Aromatic => 1,
                        other => other.valence_contribution() as usize,
                    })
                    .sum();
                let h = target.saturating_sub(1).saturating_sub(used);
                graph.atoms[idx].hydrogens = h as u8;
            }
            continue;
        }

        let used = graph.bond_valence(idx);
        if atom.fixed_hydrogens {
            let total = used + atom.hydrogens as usize;
            if let Some(&max) = valences.last() {
                if total > max as usize {
                    return Err(Error::Valence {
                        index: idx,
                        element: atom.element,
                        valence: total,
                    });
                }
            }
            continue;
        }

        match valences.iter().find(|&&v| v as usize >= used) {
            Some(&target) => graph.atoms[idx].hydrogens = (target as usize - used) as u8,
            None if valences.is_empty() => graph.atoms[idx].hydrogens = 0,
            None => {
                return Err(Error::Valence {
                    index: idx,
                    element: atom.element,
                    valence: used,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    #[test]
    fn charged_nitrogen_is_carbon_like() {
        assert_eq!(charged_valences(Element::N, 1), vec![4]);
        assert_eq!(charged_valences(Element::O, -1), vec![1]);
        assert_eq!(charged_valences(Element::C, -1), vec![3]);
        assert!(charged_valences(Element::Fe, 0).is_empty());
    }

    #[test]
    fn fills_lowest_sufficient_valence() {
        let mut g = MolGraph::new();
        let s = g.add_atom(Atom::new(Element::S));
        let o1 = g.add_atom(Atom::new(Element::O));
        let o2 = g.add_atom(Atom::new(Element::O));
        g.add_bond(s, o1, BondOrder::Double);
        g.add_bond(s, o2, BondOrder::Double);
        assign_implicit_hydrogens(&mut g).unwrap();
        assert_eq!(g.atoms[s].hydrogens, 0);
        assert_eq!(g.atoms[o1].hydrogens, 0);
    }

    #[test]
    fn pentavalent_carbon_is_rejected() {
        let mut g = MolGraph::new();
        let c = g.add_atom(Atom::new(Element::C));
        for _ in 0..5 {
            let f = g.add_atom(Atom::new(Element::F));
            g.add_bond(c, f, BondOrder::Single);
        }
        let err = assign_implicit_hydrogens(&mut g).unwrap_err();
        assert!(matches!(err, Error::Valence { index: 0, valence: 5, .. }));
    }

    #[test]
    fn aromatic_carbon_keeps_one_electron_for_pi() {
        let mut g = MolGraph::new();
        let a = g.add_atom(Atom::new(Element::C).aromatic());
        let b = g.add_atom(Atom::new(Element::C).aromatic());
        let c = g.add_atom(Atom::new(Element::C));
        g.add_bond(a, b, BondOrder::Aromatic);
        g.add_bond(a, c, BondOrder::Single);
        assign_implicit_hydrogens(&mut g).unwrap();
        assert_eq!(g.atoms[a].hydrogens, 1);
        assert_eq!(g.atoms[b].hydrogens, 2);
        assert_eq!(g.atoms[c].hydrogens, 3);
    }
}
