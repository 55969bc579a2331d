use super::atom::Atom;
use super::types::{BondOrder, Element};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// Returns the endpoint opposite to `atom`, or `None` if `atom` is not an endpoint.
    #[inline]
    pub fn other(&self, atom: usize) -> Option<usize> {
        if atom == self.i {
            Some(self.j)
        } else if atom == self.j {
            Some(self.i)
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, atom: usize) -> bool {
        self.i == atom || self.j == atom
    }
}

/// Molecular graph with atoms, bonds and per-atom adjacency lists.
///
/// `adjacency[a]` holds `(neighbor, bond_index)` pairs in insertion order,
/// which is the order the neighbours were written in the input notation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolGraph {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl MolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from atoms and bonds, deriving the adjacency lists.
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.i].push((bond.j, bi));
            adjacency[bond.j].push((bond.i, bi));
        }
        Self {
            atoms,
            bonds,
            adjacency,
        }
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) -> usize {
        let bi = self.bonds.len();
        self.bonds.push(Bond::new(a, b, order));
        self.adjacency[a].push((b, bi));
        self.adjacency[b].push((a, bi));
        bi
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
    }

    /// `(neighbor, bond_index)` pairs of `atom`.
    #[inline]
    pub fn incident(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[atom].iter().map(|&(n, _)| n)
    }

    #[inline]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Number of non-hydrogen neighbours.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .filter(|&n| !self.atoms[n].is_hydrogen())
            .count()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|&&(n, _)| n == b)
            .map(|&(_, bi)| bi)
    }

    /// Implicit plus explicit hydrogens attached to `atom`.
    pub fn total_hydrogens(&self, atom: usize) -> usize {
        let explicit = self
            .neighbors(atom)
            .filter(|&n| self.atoms[n].is_hydrogen())
            .count();
        self.atoms[atom].hydrogens as usize + explicit
    }

    /// Total hydrogen count of the molecule, implicit and explicit.
    pub fn hydrogen_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|a| a.hydrogens as usize + usize::from(a.is_hydrogen()))
            .sum()
    }

    /// Sum of bond multiplicities of `atom`, excluding implicit hydrogens.
    pub fn bond_valence(&self, atom: usize) -> usize {
        self.adjacency[atom]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.valence_contribution() as usize)
            .sum()
    }

    /// Returns a copy of the graph in which every implicit hydrogen is a separate atom.
    ///
    /// Existing atoms and bonds keep their indices; new hydrogens are appended
    /// in atom order, each joined to its parent by a single bond.
    pub fn with_explicit_hydrogens(&self) -> MolGraph {
        let mut expanded = self.clone();
        for idx in 0..self.atoms.len() {
            let count = self.atoms[idx].hydrogens;
            expanded.atoms[idx].hydrogens = 0;
            for _ in 0..count {
                let mut h = Atom::new(Element::H);
                h.fixed_hydrogens = true;
                let hi = expanded.add_atom(h);
                expanded.add_bond(idx, hi, BondOrder::Single);
            }
        }
        expanded
    }

    /// Connected-component label per atom, numbered in order of first appearance.
    pub fn components(&self) -> Vec<usize> {
        let n = self.atom_count();
        let mut label = vec![usize::MAX; n];
        let mut next = 0;
        for start in 0..n {
            if label[start] != usize::MAX {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            label[start] = next;
            while let Some(curr) = queue.pop_front() {
                for nb in self.neighbors(curr) {
                    if label[nb] == usize::MAX {
                        label[nb] = next;
                        queue.push_back(nb);
                    }
                }
            }
            next += 1;
        }
        label
    }

    pub fn component_count(&self) -> usize {
        self.components().into_iter().max().map_or(0, |m| m + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethanol() -> MolGraph {
        let mut g = MolGraph::new();
        let c1 = g.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let c2 = g.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let o = g.add_atom(Atom::new(Element::O).with_hydrogens(1));
        g.add_bond(c1, c2, BondOrder::Single);
        g.add_bond(c2, o, BondOrder::Single);
        g
    }

    #[test]
    fn bond_new_normalizes_indices() {
        let b = Bond::new(5, 2, BondOrder::Double);
        assert_eq!((b.i, b.j), (2, 5));
        assert_eq!(b.other(2), Some(5));
        assert_eq!(b.other(7), None);
    }

    #[test]
    fn adjacency_and_lookup() {
        let g = ethanol();
        assert_eq!(g.degree(1), 2);
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(g.bond_between(2, 1), Some(1));
        assert_eq!(g.bond_between(0, 2), None);
        assert_eq!(g.hydrogen_count(), 6);
    }

    #[test]
    fn explicit_hydrogens_preserve_heavy_indices() {
        let g = ethanol();
        let h = g.with_explicit_hydrogens();
        assert_eq!(h.atom_count(), 9);
        assert_eq!(h.bond_count(), 8);
        assert_eq!(h.bonds[0], g.bonds[0]);
        assert_eq!(h.bonds[1], g.bonds[1]);
        assert_eq!(h.total_hydrogens(0), 3);
        assert_eq!(h.heavy_degree(1), 2);
        assert_eq!(h.heavy_atom_count(), 3);
        assert!(h.atoms.iter().all(|a| a.hydrogens == 0));
    }

    #[test]
    fn components_are_labelled() {
        let mut g = ethanol();
        g.add_atom(Atom::new(Element::Na));
        assert_eq!(g.components(), vec![0, 0, 0, 1]);
        assert_eq!(g.component_count(), 2);
    }
}
