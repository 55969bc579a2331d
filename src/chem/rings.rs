//! Ring perception via the smallest set of smallest rings (SSSR).

use crate::model::graph::MolGraph;
use std::collections::VecDeque;

/// Ring membership of a molecular graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingInfo {
    /// SSSR rings as ordered atom cycles.
    pub rings: Vec<Vec<usize>>,
    atom_membership: Vec<usize>,
    bond_membership: Vec<usize>,
}

impl RingInfo {
    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_atom_in_ring(&self, atom: usize) -> bool {
        self.atom_membership.get(atom).is_some_and(|&n| n > 0)
    }

    /// Bonds not present in the ring graph (for example hydrogen bonds) are never in a ring.
    pub fn is_bond_in_ring(&self, bond: usize) -> bool {
        self.bond_membership.get(bond).is_some_and(|&n| n > 0)
    }

    pub fn atom_ring_count(&self, atom: usize) -> usize {
        self.atom_membership.get(atom).copied().unwrap_or(0)
    }

    /// Bond indices of `ring`, in cycle order.
    pub fn ring_bonds(&self, graph: &MolGraph, ring: &[usize]) -> Vec<usize> {
        (0..ring.len())
            .filter_map(|k| graph.bond_between(ring[k], ring[(k + 1) % ring.len()]))
            .collect()
    }

    /// Size of the smallest SSSR ring containing `atom`.
    pub fn smallest_ring_size(&self, atom: usize) -> Option<usize> {
        self.rings
            .iter()
            .filter(|r| r.contains(&atom))
            .map(Vec::len)
            .min()
    }
}

/// Finds the SSSR of `graph`.
///
/// Candidate cycles come from breadth-first trees rooted at every ring atom
/// (Horton's construction); they are taken smallest first and kept only when linearly independent (over GF(2))
/// of the rings already chosen, until the cyclomatic number is reached.
pub fn find_sssr(graph: &MolGraph) -> RingInfo {
    let n = graph.atom_count();
    let m = graph.bond_count();
    let mut info = RingInfo {
        rings: Vec::new(),
        atom_membership: vec![0; n],
        bond_membership: vec![0; m],
    };
    let expected = (m + graph.component_count()).saturating_sub(n);
    if expected == 0 {
        return info;
    }

    let ring_atoms = ring_atoms(graph);
    let mut candidates: Vec<Vec<usize>> = Vec::new();
    for root in (0..n).filter(|&a| ring_atoms[a]) {
        for mut ring in horton_cycles(graph, root, &ring_atoms) {
            normalize(&mut ring);
            if !candidates.contains(&ring) {
                candidates.push(ring);
            }
        }
    }
    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let words = m.div_ceil(64);
    let mut basis: Vec<(usize, Vec<u64>)> = Vec::new();
    for ring in candidates {
        if info.rings.len() == expected {
            break;
        }
        let mut vector = vec![0u64; words];
        for bi in info.ring_bonds(graph, &ring) {
            vector[bi / 64] ^= 1 << (bi % 64);
        }
        if reduce_into_basis(&mut basis, vector) {
            info.rings.push(ring);
        }
    }

    for ring in &info.rings {
        for &a in ring {
            info.atom_membership[a] += 1;
        }
    }
    let rings = info.rings.clone();
    for ring in &rings {
        for bi in info.ring_bonds(graph, ring) {
            info.bond_membership[bi] += 1;
        }
    }
    info
}

/// Gaussian elimination step; returns `true` and extends the basis when
/// `vector` is independent of it.
fn reduce_into_basis(basis: &mut Vec<(usize, Vec<u64>)>, mut vector: Vec<u64>) -> bool {
    for (pivot, row) in basis.iter() {
        if vector[pivot / 64] & (1 << (pivot % 64)) != 0 {
            for (v, r) in vector.iter_mut().zip(row) {
                *v ^= r;
            }
        }
    }
    let pivot = vector
        .iter()
        .enumerate()
        .find(|(_, w)| **w != 0)
        .map(|(k, w)| k * 64 + w.trailing_zeros() as usize);
    match pivot {
        Some(p) => {
            basis.push((p, vector));
            true
        }
        None => false,
    }
}

/// Atoms left after repeatedly pruning atoms of degree one or less.
fn ring_atoms(graph: &MolGraph) -> Vec<bool> {
    let n = graph.atom_count();
    let mut degree: Vec<usize> = (0..n).map(|a| graph.degree(a)).collect();
    let mut removed = vec![false; n];
    let mut queue: VecDeque<usize> = (0..n).filter(|&a| degree[a] <= 1).collect();
    while let Some(a) = queue.pop_front() {
        if removed[a] {
            continue;
        }
        removed[a] = true;
        for nb in graph.neighbors(a) {
            if !removed[nb] {
                degree[nb] -= 1;
                if degree[nb] <= 1 {
                    queue.push_back(nb);
                }
            }
        }
    }
    removed.into_iter().map(|r| !r).collect()
}

/// Cycles formed by closing each non-tree edge of the BFS tree rooted at `root`
/// whose two tree paths meet only at the root.
fn horton_cycles(graph: &MolGraph, root: usize, ring_atoms: &[bool]) -> Vec<Vec<usize>> {
    let n = graph.atom_count();
    let mut parent = vec![usize::MAX; n];
    parent[root] = root;
    let mut queue = VecDeque::from([root]);
    while let Some(curr) = queue.pop_front() {
        for nb in graph.neighbors(curr) {
            if ring_atoms[nb] && parent[nb] == usize::MAX {
                parent[nb] = curr;
                queue.push_back(nb);
            }
        }
    }

    let path_to_root = |mut node: usize| {
        let mut path = vec![node];
        while node != root {
            node = parent[node];
            path.push(node);
        }
        path
    };

    let mut cycles = Vec::new();
    for bond in &graph.bonds {
        let (u, v) = (bond.i, bond.j);
        if parent[u] == usize::MAX || parent[v] == usize::MAX {
            continue;
        }
        if parent[u] == v || parent[v] == u {
            continue;
        }
        let pu = path_to_root(u);
        let pv = path_to_root(v);
        let shared = pu.iter().filter(|a| pv.contains(a)).count();
        if shared != 1 {
            continue;
        }
        // root .. u, then v .. back to the root
        let mut cycle: Vec<usize> = pu.into_iter().rev().collect();
        cycle.extend(pv.into_iter().take_while(|&a| a != root));
        cycles.push(cycle);
    }
    cycles
}

/// Rotates the cycle to start at its smallest atom and picks the direction
/// with the smaller second atom.
fn normalize(ring: &mut [usize]) {
    let Some(min_pos) = ring.iter().enumerate().min_by_key(|&(_, v)| *v).map(|(k, _)| k) else {
        return;
    };
    ring.rotate_left(min_pos);
    let n = ring.len();
    if n > 2 && ring[n - 1] < ring[1] {
        ring[1..].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::smiles;

    fn rings_of(s: &str) -> (MolGraph, RingInfo) {
        let g = smiles::parse(s).unwrap();
        let info = find_sssr(&g);
        (g, info)
    }

    #[test]
    fn benzene_has_one_six_ring() {
        let (_, info) = rings_of("c1ccccc1");
        assert_eq!(info.num_rings(), 1);
        assert_eq!(info.rings[0].len(), 6);
        assert!(info.is_atom_in_ring(3));
    }

    #[test]
    fn naphthalene_has_two_rings_and_shared_atoms() {
        let (_, info) = rings_of("c1ccc2ccccc2c1");
        assert_eq!(info.num_rings(), 2);
        assert!(info.rings.iter().all(|r| r.len() == 6));
        assert_eq!(info.atom_ring_count(3), 2);
        assert_eq!(info.atom_ring_count(0), 1);
    }

    #[test]
    fn cubane_has_five_independent_four_rings() {
        let (_, info) = rings_of("C12C3C4C1C5C2C3C45");
        assert_eq!(info.num_rings(), 5);
        assert!(info.rings.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn substituent_bonds_are_not_ring_bonds() {
        let (g, info) = rings_of("C1CC1C");
        assert_eq!(info.num_rings(), 1);
        let exo = g.bond_between(2, 3).unwrap();
        assert!(!info.is_bond_in_ring(exo));
        assert!(!info.is_atom_in_ring(3));
        assert_eq!(info.smallest_ring_size(0), Some(3));
    }

    #[test]
    fn chains_have_no_rings() {
        let (_, info) = rings_of("CCCC.O");
        assert_eq!(info.num_rings(), 0);
    }
}
