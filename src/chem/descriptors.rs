//! Topological descriptors of sanitized molecular graphs.
//!
//! Hydrogens are counted whether they are implicit or explicit atoms, so
//! every function gives the same answer on a heavy-atom graph and on its
//! explicit-hydrogen expansion.

use super::rings::RingInfo;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use std::collections::BTreeMap;

fn count_by_element(graph: &MolGraph) -> BTreeMap<Element, usize> {
    let mut counts = BTreeMap::new();
    for atom in &graph.atoms {
        *counts.entry(atom.element).or_insert(0) += 1;
        if atom.hydrogens > 0 {
            *counts.entry(Element::H).or_insert(0) += atom.hydrogens as usize;
        }
    }
    counts
}

fn push_count(formula: &mut String, symbol: &str, count: usize) {
    formula.push_str(symbol);
    if count > 1 {
        formula.push_str(&count.to_string());
    }
}

/// Molecular formula in Hill order.
///
/// Carbon comes first and hydrogen second when carbon is present; all other
/// elements follow alphabetically. A net charge is appended as `+`, `-`,
/// `+2` and so on.
pub fn molecular_formula(graph: &MolGraph) -> String {
    let mut counts: BTreeMap<&'static str, usize> = count_by_element(graph)
        .into_iter()
        .map(|(el, n)| (el.symbol(), n))
        .collect();

    let mut formula = String::new();
    if let Some(c) = counts.remove("C") {
        push_count(&mut formula, "C", c);
        if let Some(h) = counts.remove("H") {
            push_count(&mut formula, "H", h);
        }
    }
    for (symbol, count) in counts {
        push_count(&mut formula, symbol, count);
    }

    let charge = net_charge(graph);
    match charge {
        0 => {}
        1 => formula.push('+'),
        -1 => formula.push('-'),
        c if c > 0 => formula.push_str(&format!("+{c}")),
        c => formula.push_str(&format!("-{}", -c)),
    }
    formula
}

/// Sum of formal charges.
pub fn net_charge(graph: &MolGraph) -> i32 {
    graph.atoms.iter().map(|a| a.formal_charge as i32).sum()
}

/// Average molecular weight in daltons.
pub fn molecular_weight(graph: &MolGraph) -> f64 {
    count_by_element(graph)
        .into_iter()
        .map(|(el, n)| el.atomic_mass() * n as f64)
        .sum()
}

/// Monoisotopic mass in daltons, using the most abundant isotope of each element.
pub fn monoisotopic_mass(graph: &MolGraph) -> f64 {
    count_by_element(graph)
        .into_iter()
        .map(|(el, n)| el.monoisotopic_mass() * n as f64)
        .sum()
}

/// Number of atoms of `element`, hydrogens included.
pub fn element_count(graph: &MolGraph, element: Element) -> usize {
    count_by_element(graph).get(&element).copied().unwrap_or(0)
}

/// Total mass contributed by atoms of `element`.
pub fn element_mass(graph: &MolGraph, element: Element) -> f64 {
    element_count(graph, element) as f64 * element.atomic_mass()
}

/// Number of atoms, hydrogens included.
pub fn atom_count(graph: &MolGraph) -> usize {
    graph.atom_count()
        + graph
            .atoms
            .iter()
            .map(|a| a.hydrogens as usize)
            .sum::<usize>()
}

/// Lipinski hydrogen bond acceptors: the number of nitrogen and oxygen atoms.
pub fn hba_count(graph: &MolGraph) -> usize {
    graph
        .atoms
        .iter()
        .filter(|a| matches!(a.element, Element::N | Element::O))
        .count()
}

/// Lipinski hydrogen bond donors: nitrogen and oxygen atoms bearing a hydrogen.
pub fn hbd_count(graph: &MolGraph) -> usize {
    (0..graph.atom_count())
        .filter(|&i| {
            matches!(graph.atoms[i].element, Element::N | Element::O)
                && graph.total_hydrogens(i) > 0
        })
        .count()
}

fn has_triple_bond(graph: &MolGraph, atom: usize) -> bool {
    graph
        .incident(atom)
        .iter()
        .any(|&(_, bi)| graph.bonds[bi].order == BondOrder::Triple)
}

/// Whether bond `bond` is rotatable under the strict definition.
///
/// The bond must be a non-ring single bond between two heavy atoms that each
/// have another heavy neighbour, and neither end may carry a triple bond.
pub fn is_rotatable(graph: &MolGraph, rings: &RingInfo, bond: usize) -> bool {
    let b = &graph.bonds[bond];
    b.order == BondOrder::Single
        && !rings.is_bond_in_ring(bond)
        && [b.i, b.j].into_iter().all(|a| {
            !graph.atoms[a].is_hydrogen()
                && graph.heavy_degree(a) > 1
                && !has_triple_bond(graph, a)
        })
}

pub fn rotatable_bond_count(graph: &MolGraph, rings: &RingInfo) -> usize {
    (0..graph.bond_count())
        .filter(|&bi| is_rotatable(graph, rings, bi))
        .count()
}

/// Number of valence electrons, corrected for the net charge.
pub fn valence_electrons(graph: &MolGraph) -> i64 {
    let neutral: i64 = count_by_element(graph)
        .into_iter()
        .map(|(el, n)| el.valence_electrons() as i64 * n as i64)
        .sum();
    neutral - net_charge(graph) as i64
}

/// Degree of unsaturation `(2C + 2 + N - H - X) / 2`.
///
/// Halogens count as hydrogens and divalent atoms are ignored.
pub fn degree_of_unsaturation(graph: &MolGraph) -> f64 {
    let counts = count_by_element(graph);
    let get = |el: Element| counts.get(&el).copied().unwrap_or(0) as f64;
    let carbon = get(Element::C) + get(Element::Si);
    let nitrogen = get(Element::N) + get(Element::P);
    let hydrogen = get(Element::H);
    let halogen = get(Element::F) + get(Element::Cl) + get(Element::Br) + get(Element::I);
    (2.0 * carbon + 2.0 + nitrogen - hydrogen - halogen) / 2.0
}

fn has_double_bond(graph: &MolGraph, atom: usize) -> bool {
    graph
        .incident(atom)
        .iter()
        .any(|&(_, bi)| graph.bonds[bi].order == BondOrder::Double)
}

/// Topological polar surface area (Ertl 2000) in Å².
///
/// Only nitrogen, oxygen, sulfur and phosphorus contribute.
pub fn tpsa(graph: &MolGraph) -> f64 {
    (0..graph.atom_count())
        .map(|i| tpsa_contribution(graph, i))
        .sum()
}

fn tpsa_contribution(graph: &MolGraph, atom: usize) -> f64 {
    let a = &graph.atoms[atom];
    let h = graph.total_hydrogens(atom);
    let degree = graph.heavy_degree(atom);
    let double = has_double_bond(graph, atom);

    match a.element {
        Element::N => {
            if a.formal_charge > 0 {
                return match h {
                    0 => 0.0,
                    1 => 23.47,
                    2 => 25.59,
                    _ => 27.64,
                };
            }
            if a.aromatic {
                return if h >= 1 { 15.79 } else { 12.89 };
            }
            match (degree, h, double) {
                (1, 2, _) => 26.02,
                (2, 1, false) => 19.15,
                (2, 1, true) => 23.85,
                (2, 0, true) => 12.36,
                (2, 0, false) => 19.15,
                (3, 0, _) => 3.24,
                (1, 0, _) if has_triple_bond(graph, atom) => 23.79,
                (1, 1, true) => 23.85,
                _ if h >= 2 => 26.02,
                _ if h == 1 => 19.15,
                _ => 3.24,
            }
        }
        Element::O => {
            if a.formal_charge < 0 {
                return 23.06;
            }
            if a.aromatic {
                return 13.14;
            }
            match (degree, h, double) {
                (_, h, _) if h >= 1 => 20.23,
                (1, 0, true) => 17.07,
                (2, 0, false) => 9.23,
                (1, 0, false) => 17.07,
                (_, _, true) => 17.07,
                _ => 9.23,
            }
        }
        Element::S => {
            if h >= 1 {
                38.80
            } else if double || degree >= 2 {
                25.30
            } else {
                0.0
            }
        }
        Element::P => {
            if double {
                34.14
            } else if h >= 1 {
                23.47
            } else {
                9.81
            }
        }
        _ => 0.0,
    }
}

/// Wildman–Crippen `(logP, molar refractivity)` estimate.
pub fn crippen(graph: &MolGraph, rings: &RingInfo) -> (f64, f64) {
    let mut logp = 0.0;
    let mut mr = 0.0;
    for atom in 0..graph.atom_count() {
        if graph.atoms[atom].is_hydrogen() {
            continue;
        }
        let (lp, m) = crippen_contribution(graph, rings, atom);
        logp += lp;
        mr += m;

        let h = graph.total_hydrogens(atom) as f64;
        if graph.atoms[atom].element == Element::C {
            logp += h * 0.1230;
        } else {
            logp += h * -0.2677;
        }
        mr += h * 1.057;
    }
    (logp, mr)
}

fn crippen_contribution(graph: &MolGraph, rings: &RingInfo, atom: usize) -> (f64, f64) {
    let a = &graph.atoms[atom];
    let degree = graph.heavy_degree(atom);
    let double = has_double_bond(graph, atom);
    let hetero_neighbor = graph
        .neighbors(atom)
        .any(|n| !matches!(graph.atoms[n].element, Element::C | Element::H));

    match a.element {
        Element::C => {
            if a.aromatic {
                if hetero_neighbor { (-0.14, 3.509) } else { (0.296, 3.509) }
            } else if double {
                if hetero_neighbor { (-0.03, 3.509) } else { (0.08, 3.509) }
            } else if rings.is_atom_in_ring(atom) {
                (0.1441, 3.509)
            } else {
                match degree {
                    0..=2 => (0.1441, 3.509),
                    3 => (0.0, 3.509),
                    _ => (-0.04, 3.509),
                }
            }
        }
        Element::N => {
            if a.aromatic {
                (-0.3187, 2.188)
            } else if a.formal_charge > 0 {
                (-1.0190, 2.188)
            } else if double {
                (-0.5262, 2.188)
            } else {
                (-0.4458, 2.262)
            }
        }
        Element::O => {
            if a.formal_charge < 0 {
                (-1.189, 1.476)
            } else if double {
                (-0.3339, 1.476)
            } else if degree >= 2 {
                (-0.2893, 1.476)
            } else {
                (-0.3567, 1.476)
            }
        }
        Element::F => (0.4118, 1.108),
        Element::P => (0.2836, 6.920),
        Element::S => {
            if double {
                (-0.1084, 7.365)
            } else if a.formal_charge != 0 {
                (-0.5188, 7.365)
            } else {
                (0.6237, 7.365)
            }
        }
        Element::Cl => (0.6895, 5.853),
        Element::Br => (0.8813, 8.927),
        Element::I => (1.050, 13.940),
        _ => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn mol(smi: &str) -> (MolGraph, RingInfo) {
        sanitize(smiles::parse(smi).unwrap()).unwrap()
    }

    #[test]
    fn formula_follows_hill_order() {
        assert_eq!(molecular_formula(&mol("CCO").0), "C2H6O");
        assert_eq!(molecular_formula(&mol("c1ccccc1").0), "C6H6");
        assert_eq!(molecular_formula(&mol("O").0), "H2O");
        assert_eq!(molecular_formula(&mol("ClCBr").0), "CH2BrCl");
    }

    #[test]
    fn formula_reports_charge() {
        assert_eq!(molecular_formula(&mol("[NH4+]").0), "H4N+");
        assert_eq!(molecular_formula(&mol("CC(=O)[O-]").0), "C2H3O2-");
    }

    #[test]
    fn formula_is_identical_with_explicit_hydrogens() {
        let (g, _) = mol("CC(=O)O");
        assert_eq!(
            molecular_formula(&g),
            molecular_formula(&g.with_explicit_hydrogens())
        );
    }

    #[test]
    fn masses_of_water() {
        let (g, _) = mol("O");
        assert!((molecular_weight(&g) - 18.015).abs() < 0.01);
        assert!((monoisotopic_mass(&g) - 18.0106).abs() < 0.001);
        assert!((element_mass(&g, Element::H) - 2.016).abs() < 0.01);
    }

    #[test]
    fn counts_include_hydrogens() {
        let (g, _) = mol("CCO");
        assert_eq!(atom_count(&g), 9);
        assert_eq!(element_count(&g, Element::H), 6);
        assert_eq!(element_count(&g, Element::N), 0);
    }

    #[test]
    fn hydrogen_bond_counts() {
        let (g, _) = mol("O=C1C=CC(=O)C=C1C(=O)O");
        assert_eq!(hba_count(&g), 4);
        assert_eq!(hbd_count(&g), 1);
        assert_eq!(valence_electrons(&g), 56);
    }

    #[test]
    fn valence_electrons_account_for_charge() {
        assert_eq!(valence_electrons(&mol("[NH4+]").0), 8);
        assert_eq!(valence_electrons(&mol("[OH-]").0), 8);
    }

    #[test]
    fn rotatable_bonds_strict() {
        let (g, r) = mol("CCCC");
        assert_eq!(rotatable_bond_count(&g, &r), 1);
        let (g, r) = mol("c1ccccc1");
        assert_eq!(rotatable_bond_count(&g, &r), 0);
        let (g, r) = mol("CC#CC");
        assert_eq!(rotatable_bond_count(&g, &r), 0);
        let (g, r) = mol("c1ccccc1-c1ccccc1");
        assert_eq!(rotatable_bond_count(&g, &r), 1);
    }

    #[test]
    fn unsaturation_of_common_molecules() {
        assert_eq!(degree_of_unsaturation(&mol("CC").0), 0.0);
        assert_eq!(degree_of_unsaturation(&mol("c1ccccc1").0), 4.0);
        assert_eq!(degree_of_unsaturation(&mol("C#N").0), 2.0);
    }

    #[test]
    fn tpsa_of_aspirin_is_plausible() {
        let (g, _) = mol("CC(=O)Oc1ccccc1C(=O)O");
        let t = tpsa(&g);
        assert!(t > 50.0 && t < 80.0, "tpsa={t}");
    }

    #[test]
    fn crippen_orders_polarity() {
        let (hexane, r1) = mol("CCCCCC");
        let (glycol, r2) = mol("OCCO");
        assert!(crippen(&hexane, &r1).0 > crippen(&glycol, &r2).0);
        assert!(crippen(&hexane, &r1).1 > 0.0);
    }
}
