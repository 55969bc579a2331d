//! Canonical depth-first SMILES writer.

use super::{canon, valence};
use crate::model::atom::{Atom, Chirality};
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};

/// Writes `graph` as canonical SMILES.
///
/// Atoms are ordered by [`canon::canonical_ranks`]: each connected
/// component starts at its lowest-ranked atom and neighbours are visited in
/// rank order, so two spellings of the same molecule produce the same
/// string. Ring-closure digits are allocated lowest-first and reused once
/// closed; the bond symbol of a ring bond is written at the opening digit.
///
/// # Examples
///
/// ```
/// use chemcaption::chem::{sanitize, smiles, writer};
///
/// let kekule = sanitize(smiles::parse("C1=CC=CC=C1")?)?.0;
/// let aromatic = sanitize(smiles::parse("c1ccccc1")?)?.0;
/// assert_eq!(writer::write(&kekule), "c1ccccc1");
/// assert_eq!(writer::write(&kekule), writer::write(&aromatic));
/// # Ok::<(), chemcaption::chem::Error>(())
/// ```
pub fn write(graph: &MolGraph) -> String {
    let n = graph.atom_count();
    let canonical = canon::canonical_ranks(graph);
    let incident: Vec<Vec<(usize, usize)>> = (0..n)
        .map(|a| {
            let mut list = graph.incident(a).to_vec();
            list.sort_by_key(|&(nb, _)| canonical[nb]);
            list
        })
        .collect();
    let mut by_rank: Vec<usize> = (0..n).collect();
    by_rank.sort_by_key(|&a| canonical[a]);

    let mut visited = vec![false; n];
    let mut tree_bond = vec![false; graph.bond_count()];
    let mut order = Vec::with_capacity(n);
    let mut starts = Vec::new();

    for &start in &by_rank {
        if visited[start] {
            continue;
        }
        starts.push(start);
        let mut stack = vec![start];
        visited[start] = true;
        order.push(start);
        // Iterative preorder DFS mirroring the recursive writer.
        let mut cursor = vec![0usize; n];
        while let Some(&atom) = stack.last() {
            if cursor[atom] < incident[atom].len() {
                let (nb, bi) = incident[atom][cursor[atom]];
                cursor[atom] += 1;
                if !visited[nb] {
                    visited[nb] = true;
                    tree_bond[bi] = true;
                    order.push(nb);
                    stack.push(nb);
                }
            } else {
                stack.pop();
            }
        }
    }

    let mut rank = vec![0usize; n];
    for (r, &a) in order.iter().enumerate() {
        rank[a] = r;
    }

    let mut writer = Writer {
        graph,
        incident: &incident,
        tree_bond: &tree_bond,
        rank: &rank,
        ring_digit: vec![None; graph.bond_count()],
        in_use: Vec::new(),
        out: String::new(),
    };
    for (k, &start) in starts.iter().enumerate() {
        if k > 0 {
            writer.out.push('.');
        }
        writer.visit(start, None);
    }
    writer.out
}

struct Writer<'a> {
    graph: &'a MolGraph,
    /// Incident bonds of every atom in canonical neighbour order.
    incident: &'a [Vec<(usize, usize)>],
    tree_bond: &'a [bool],
    rank: &'a [usize],
    ring_digit: Vec<Option<usize>>,
    in_use: Vec<bool>,
    out: String,
}

impl Writer<'_> {
    fn visit(&mut self, atom: usize, via: Option<usize>) {
        self.out.push_str(&atom_token(self.graph, atom));

        for &(nb, bi) in &self.incident[atom] {
            if self.tree_bond[bi] || Some(bi) == via {
                continue;
            }
            match self.ring_digit[bi] {
                Some(digit) => {
                    self.push_digit(digit);
                    self.in_use[digit] = false;
                }
                None if self.rank[nb] > self.rank[atom] => {
                    let digit = self.allocate_digit();
                    self.ring_digit[bi] = Some(digit);
                    self.out.push_str(bond_token(self.graph, bi));
                    self.push_digit(digit);
                }
                None => {}
            }
        }

        let children: Vec<(usize, usize)> = self.incident[atom]
            .iter()
            .copied()
            .filter(|&(nb, bi)| self.tree_bond[bi] && Some(bi) != via && self.rank[nb] > self.rank[atom])
            .collect();
        for (k, &(child, bi)) in children.iter().enumerate() {
            let branch = k + 1 < children.len();
            if branch {
                self.out.push('(');
            }
            self.out.push_str(bond_token(self.graph, bi));
            self.visit(child, Some(bi));
            if branch {
                self.out.push(')');
            }
        }
    }

    fn allocate_digit(&mut self) -> usize {
        match self.in_use.iter().skip(1).position(|used| !used) {
            Some(p) => {
                self.in_use[p + 1] = true;
                p + 1
            }
            None => {
                if self.in_use.is_empty() {
                    self.in_use.push(true);
                }
                self.in_use.push(true);
                self.in_use.len() - 1
            }
        }
    }

    fn push_digit(&mut self, digit: usize) {
        if digit < 10 {
            self.out.push_str(&digit.to_string());
        } else {
            self.out.push_str(&format!("%{digit:02}"));
        }
    }
}

fn bond_token(graph: &MolGraph, bond: usize) -> &'static str {
    let b = &graph.bonds[bond];
    let both_aromatic = graph.atoms[b.i].aromatic && graph.atoms[b.j].aromatic;
    match b.order {
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
        BondOrder::Quadruple => "$",
        BondOrder::Aromatic if !both_aromatic => ":",
        BondOrder::Single if both_aromatic => "-",
        _ => "",
    }
}

fn atom_token(graph: &MolGraph, idx: usize) -> String {
    let atom = &graph.atoms[idx];
    if let Some(symbol) = organic_symbol(graph, idx, atom) {
        return symbol.to_string();
    }

    let mut token = String::from("[");
    if let Some(isotope) = atom.isotope {
        token.push_str(&isotope.to_string());
    }
    if atom.aromatic {
        token.push_str(&atom.element.symbol().to_lowercase());
    } else {
        token.push_str(atom.element.symbol());
    }
    match atom.chirality {
        Chirality::CounterClockwise => token.push('@'),
        Chirality::Clockwise => token.push_str("@@"),
        Chirality::None => {}
    }
    match atom.hydrogens {
        0 => {}
        1 => token.push('H'),
        h => token.push_str(&format!("H{h}")),
    }
    match atom.formal_charge {
        0 => {}
        1 => token.push('+'),
        -1 => token.push('-'),
        c if c > 0 => token.push_str(&format!("+{c}")),
        c => token.push_str(&format!("-{}", -c)),
    }
    token.push(']');
    token
}

/// Bare organic-subset symbol when the atom's state is fully implied by it.
fn organic_symbol(graph: &MolGraph, idx: usize, atom: &Atom) -> Option<&'static str> {
    if atom.formal_charge != 0 || atom.isotope.is_some() || atom.chirality != Chirality::None {
        return None;
    }
    let symbol = match (atom.element, atom.aromatic) {
        (Element::B, false) => "B",
        (Element::C, false) => "C",
        (Element::N, false) => "N",
        (Element::O, false) => "O",
        (Element::P, false) => "P",
        (Element::S, false) => "S",
        (Element::F, false) => "F",
        (Element::Cl, false) => "Cl",
        (Element::Br, false) => "Br",
        (Element::I, false) => "I",
        (Element::B, true) => "b",
        (Element::C, true) => "c",
        (Element::N, true) => "n",
        (Element::O, true) => "o",
        (Element::P, true) => "p",
        (Element::S, true) => "s",
        _ => return None,
    };
    (implied_hydrogens(graph, idx, atom) == Some(atom.hydrogens as usize)).then_some(symbol)
}

fn implied_hydrogens(graph: &MolGraph, idx: usize, atom: &Atom) -> Option<usize> {
    let valences = valence::default_valences(atom.element);
    if atom.aromatic {
        let used: usize = graph
            .incident(idx)
            .iter()
            .map(|&(_, bi)| match graph.bonds[bi].order {
                BondOrder::Aromatic => 1,
                other => other.valence_contribution() as usize,
            })
            .sum();
        let target = *valences.first()? as usize;
        return Some(target.saturating_sub(1).saturating_sub(used));
    }
    let used = graph.bond_valence(idx);
    valences
        .iter()
        .find(|&&v| v as usize >= used)
        .map(|&v| v as usize - used)
        .or(Some(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn roundtrip(input: &str) -> String {
        let (g, _) = sanitize(smiles::parse(input).unwrap()).unwrap();
        write(&g)
    }

    #[test]
    fn writes_simple_chains() {
        assert_eq!(roundtrip("CCO"), "CCO");
        assert_eq!(roundtrip("CC(C)O"), "CC(C)O");
        assert_eq!(roundtrip("C=CC#N"), "C=CC#N");
    }

    #[test]
    fn writes_rings_with_digits() {
        assert_eq!(roundtrip("C1CCCCC1"), "C1CCCCC1");
        assert_eq!(roundtrip("C1=CC=CC=C1"), "c1ccccc1");
    }

    #[test]
    fn writes_bracket_atoms_when_needed() {
        assert_eq!(roundtrip("[NH4+]"), "[NH4+]");
        assert_eq!(roundtrip("[Na+].[Cl-]"), "[Na+].[Cl-]");
        assert_eq!(roundtrip("c1cc[nH]c1"), "c1cc[nH]c1");
        assert_eq!(roundtrip("[13CH4]"), "[13CH4]");
    }

    #[test]
    fn spellings_of_one_molecule_write_the_same_string() {
        for group in [
            &["CCO", "OCC", "C(O)C"][..],
            &["C1=CC=CC=C1", "c1ccccc1", "C1C=CC=CC=1"][..],
            &["CC(=O)Nc1ccc(O)cc1", "Oc1ccc(NC(C)=O)cc1", "c1cc(O)ccc1NC(=O)C"][..],
            &["O=C1C=CC(=O)C(C(=O)O)=C1", "OC(=O)C1=CC(=O)C=CC1=O"][..],
        ] {
            let first = roundtrip(group[0]);
            for other in &group[1..] {
                assert_eq!(roundtrip(other), first, "{other} vs {}", group[0]);
            }
        }
    }

    #[test]
    fn output_reparses_to_same_graph_size() {
        for input in ["O=C1C=CC(=O)C=C1C(=O)O", "c1ccc2ccccc2c1", "CC(=O)Nc1ccc(O)cc1", "C12C3C4C1C5C2C3C45"] {
            let (g, _) = sanitize(smiles::parse(input).unwrap()).unwrap();
            let (back, _) = sanitize(smiles::parse(&write(&g)).unwrap()).unwrap();
            assert_eq!(back.atom_count(), g.atom_count(), "{input}");
            assert_eq!(back.bond_count(), g.bond_count(), "{input}");
            assert_eq!(back.hydrogen_count(), g.hydrogen_count(), "{input}");
        }
    }
}
