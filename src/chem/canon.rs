//! Symmetry classes, canonical atom ranks and graph hashing.
//!
//! Atoms are partitioned by iterative invariant refinement: each round
//! re-ranks atoms by their current class together with the sorted multiset
//! of `(bond, neighbour class)` pairs, until the partition stops splitting.
//! Canonical ranks break the remaining ties one at a time.

use crate::model::graph::MolGraph;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

type Invariant = (u8, i8, u16, bool, usize, usize);

fn initial_invariant(graph: &MolGraph, atom: usize) -> Invariant {
    let a = &graph.atoms[atom];
    (
        a.atomic_number(),
        a.formal_charge,
        a.isotope.unwrap_or(0),
        a.aromatic,
        graph.degree(atom),
        graph.total_hydrogens(atom),
    )
}

/// Dense rank of each key, ordered by the keys.
fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut sorted: Vec<&K> = keys.iter().collect();
    sorted.sort();
    sorted.dedup();
    keys.iter()
        .map(|k| sorted.binary_search(&k).unwrap_or_default())
        .collect()
}

/// Refines `classes` until the partition stops splitting.
fn refine(graph: &MolGraph, mut classes: Vec<usize>) -> Vec<usize> {
    let n = graph.atom_count();
    let mut count = class_count(&classes);
    loop {
        let keys: Vec<(usize, Vec<(u8, usize)>)> = (0..n)
            .map(|a| {
                let mut env: Vec<(u8, usize)> = graph
                    .incident(a)
                    .iter()
                    .map(|&(nb, bi)| (graph.bonds[bi].order as u8, classes[nb]))
                    .collect();
                env.sort_unstable();
                (classes[a], env)
            })
            .collect();
        let refined = dense_ranks(&keys);
        let refined_count = class_count(&refined);
        if refined_count == count {
            return classes;
        }
        classes = refined;
        count = refined_count;
    }
}

/// Topological symmetry class of every atom; equivalent atoms share a class.
///
/// Class numbers are dense and ordered by atom invariants, so they are
/// comparable across molecules only through [`class_count`].
pub fn symmetry_classes(graph: &MolGraph) -> Vec<usize> {
    let initial: Vec<Invariant> = (0..graph.atom_count())
        .map(|a| initial_invariant(graph, a))
        .collect();
    refine(graph, dense_ranks(&initial))
}

/// A total canonical order of the atoms, as a rank per atom.
///
/// Starts from the symmetry classes and repeatedly breaks the lowest tied
/// class by promoting its first member, refining after every split. Atoms
/// that end up tied before a split are symmetry equivalent, so the choice
/// of member does not change anything written from the ranks.
pub fn canonical_ranks(graph: &MolGraph) -> Vec<usize> {
    let n = graph.atom_count();
    let mut ranks = symmetry_classes(graph);
    while class_count(&ranks) < n {
        let mut seen = vec![0usize; n];
        for &r in &ranks {
            seen[r] += 1;
        }
        let Some(tied) = (0..n).find(|&r| seen[r] > 1) else {
            break;
        };
        let Some(chosen) = ranks.iter().position(|&r| r == tied) else {
            break;
        };
        let split: Vec<(usize, bool)> = ranks
            .iter()
            .enumerate()
            .map(|(a, &r)| (r, r == tied && a != chosen))
            .collect();
        ranks = refine(graph, dense_ranks(&split));
    }
    ranks
}

/// Number of distinct symmetry classes.
pub fn class_count(classes: &[usize]) -> usize {
    let mut unique = classes.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique.len()
}

/// Weisfeiler–Lehman graph hash as a SHA-256 hex digest.
///
/// Node labels start from element symbols (lowercase when aromatic) and
/// are relabelled `iterations` times from the sorted labels of their
/// neighbours joined with the bond key. The digest covers the sorted
/// histogram of every label seen across all rounds, so isomorphic graphs
/// hash identically regardless of atom order.
pub fn wl_hash(graph: &MolGraph, iterations: usize) -> String {
    let n = graph.atom_count();
    let mut labels: Vec<String> = graph
        .atoms
        .iter()
        .map(|a| {
            if a.aromatic {
                a.element.symbol().to_lowercase()
            } else {
                a.element.symbol().to_string()
            }
        })
        .collect();

    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..iterations {
        let next: Vec<String> = (0..n)
            .map(|a| {
                let mut env: Vec<String> = graph
                    .incident(a)
                    .iter()
                    .map(|&(nb, bi)| format!("{}{}", graph.bonds[bi].order.key(), labels[nb]))
                    .collect();
                env.sort_unstable();
                let digest = Sha256::digest(format!("{}|{}", labels[a], env.join(",")));
                hex::encode(&digest[..16])
            })
            .collect();
        for label in &next {
            *histogram.entry(label.clone()).or_default() += 1;
        }
        labels = next;
    }
    if iterations == 0 {
        for label in &labels {
            *histogram.entry(label.clone()).or_default() += 1;
        }
    }

    let mut hasher = Sha256::new();
    for (label, count) in &histogram {
        hasher.update(format!("{label}:{count};"));
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn graph(s: &str) -> MolGraph {
        sanitize(smiles::parse(s).unwrap()).unwrap().0
    }

    #[test]
    fn benzene_atoms_are_equivalent() {
        let classes = symmetry_classes(&graph("c1ccccc1"));
        assert_eq!(class_count(&classes), 1);
    }

    #[test]
    fn propane_has_two_carbon_classes() {
        let classes = symmetry_classes(&graph("CCC"));
        assert_eq!(classes[0], classes[2]);
        assert_ne!(classes[0], classes[1]);
    }

    #[test]
    fn refinement_separates_distant_differences() {
        let classes = symmetry_classes(&graph("OCCCCC"));
        assert_eq!(class_count(&classes), 6);
    }

    #[test]
    fn canonical_ranks_are_a_permutation() {
        for smiles in ["c1ccccc1", "CC(C)O", "C12C3C4C1C5C2C3C45"] {
            let mut ranks = canonical_ranks(&graph(smiles));
            ranks.sort_unstable();
            assert_eq!(ranks, (0..ranks.len()).collect::<Vec<_>>(), "{smiles}");
        }
    }

    #[test]
    fn canonical_ranks_follow_the_atoms_not_their_order() {
        let forward = graph("OCC(=O)N");
        let backward = graph("NC(=O)CO");
        let elements_by_rank = |g: &MolGraph| {
            let ranks = canonical_ranks(g);
            let mut atoms: Vec<(usize, u8, usize)> = (0..g.atom_count())
                .map(|a| (ranks[a], g.atoms[a].atomic_number(), g.degree(a)))
                .collect();
            atoms.sort_unstable();
            atoms.into_iter().map(|(_, z, d)| (z, d)).collect::<Vec<_>>()
        };
        assert_eq!(elements_by_rank(&forward), elements_by_rank(&backward));
    }

    #[test]
    fn wl_hash_is_order_independent() {
        let a = wl_hash(&graph("CCO"), 3);
        let b = wl_hash(&graph("OCC"), 3);
        let c = wl_hash(&graph("COC"), 3);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
