//! SMILES reader.
//!
//! Produces a raw [`MolGraph`]: implicit hydrogens, rings and aromaticity
//! are assigned afterwards by [`sanitize`](super::sanitize).

use super::error::Error;
use crate::model::atom::{Atom, Chirality};
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Parses a SMILES string into an unsanitized graph.
pub fn parse(smiles: &str) -> Result<MolGraph, Error> {
    let mut parser = Parser::new(smiles);
    parser.run()?;
    parser.finish()
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    graph: MolGraph,
    /// ring number -> (atom, bond order written at the opening digit)
    open_rings: BTreeMap<u16, (usize, Option<BondOrder>)>,
    branches: Vec<usize>,
    prev: Option<usize>,
    pending: Option<BondOrder>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            graph: MolGraph::new(),
            open_rings: BTreeMap::new(),
            branches: Vec::new(),
            prev: None,
            pending: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn err(&self, details: impl Into<String>) -> Error {
        Error::smiles(self.pos, details)
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    self.bump();
                    let prev = self.prev.ok_or_else(|| self.err("branch without preceding atom"))?;
                    self.branches.push(prev);
                }
                b')' => {
                    self.bump();
                    self.prev = Some(self.branches.pop().ok_or_else(|| self.err("unmatched ')'"))?);
                    self.pending = None;
                }
                b'-' | b'/' | b'\\' => self.set_bond(BondOrder::Single)?,
                b'=' => self.set_bond(BondOrder::Double)?,
                b'#' => self.set_bond(BondOrder::Triple)?,
                b'$' => self.set_bond(BondOrder::Quadruple)?,
                b':' => self.set_bond(BondOrder::Aromatic)?,
                b'.' => {
                    self.bump();
                    if self.pending.is_some() {
                        return Err(self.err("bond symbol before '.'"));
                    }
                    self.prev = None;
                }
                b'%' => {
                    self.bump();
                    let number = self.ring_number_two_digit()?;
                    self.ring_closure(number)?;
                }
                b'0'..=b'9' => {
                    self.bump();
                    self.ring_closure((ch - b'0') as u16)?;
                }
                b'[' => self.bracket_atom()?,
                _ if is_organic_start(ch) => self.organic_atom()?,
                _ => return Err(self.err(format!("unexpected character '{}'", ch as char))),
            }
        }
        Ok(())
    }

    fn set_bond(&mut self, order: BondOrder) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(self.err("two consecutive bond symbols"));
        }
        self.bump();
        self.pending = Some(order);
        Ok(())
    }

    fn finish(self) -> Result<MolGraph, Error> {
        if let Some(number) = self.open_rings.keys().next() {
            return Err(Error::smiles(self.pos, format!("unclosed ring bond {number}")));
        }
        if !self.branches.is_empty() {
            return Err(Error::smiles(self.pos, "unclosed branch"));
        }
        if self.pending.is_some() {
            return Err(Error::smiles(self.pos, "dangling bond symbol"));
        }
        if self.graph.atom_count() == 0 {
            return Err(Error::EmptyMolecule);
        }
        Ok(self.graph)
    }

    fn organic_atom(&mut self) -> Result<(), Error> {
        let start = self.pos;
        let ch = self.bump().ok_or_else(|| self.err("unexpected end of input"))?;
        let aromatic = ch.is_ascii_lowercase();
        let element = match (ch, self.peek()) {
            (b'C', Some(b'l')) => {
                self.bump();
                Element::Cl
            }
            (b'B', Some(b'r')) => {
                self.bump();
                Element::Br
            }
            (b'B' | b'b', _) => Element::B,
            (b'C' | b'c', _) => Element::C,
            (b'N' | b'n', _) => Element::N,
            (b'O' | b'o', _) => Element::O,
            (b'P' | b'p', _) => Element::P,
            (b'S' | b's', _) => Element::S,
            (b'F', _) => Element::F,
            (b'I', _) => Element::I,
            _ => return Err(Error::smiles(start, format!("unknown atom '{}'", ch as char))),
        };
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        self.push_atom(atom)
    }

    fn bracket_atom(&mut self) -> Result<(), Error> {
        self.bump();
        let isotope = self.number().map(|n| n as u16);

        let first = self.bump().ok_or_else(|| self.err("unterminated bracket atom"))?;
        if !first.is_ascii_alphabetic() {
            return Err(self.err(format!("expected element symbol, found '{}'", first as char)));
        }
        let aromatic = first.is_ascii_lowercase();
        let mut symbol = String::from(first.to_ascii_uppercase() as char);
        if let Some(next) = self.peek() {
            if next.is_ascii_lowercase() {
                let candidate = format!("{symbol}{}", next as char);
                if Element::from_str(&candidate).is_ok() {
                    self.bump();
                    symbol = candidate;
                }
            }
        }
        let element =
            Element::from_str(&symbol).map_err(|_| self.err(format!("unknown element '{symbol}'")))?;

        let mut chirality = Chirality::None;
        if self.peek() == Some(b'@') {
            self.bump();
            chirality = Chirality::CounterClockwise;
            if self.peek() == Some(b'@') {
                self.bump();
                chirality = Chirality::Clockwise;
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.bump();
            hydrogens = self.number().map_or(1, |n| n as u8);
        }

        let mut charge: i8 = 0;
        if let Some(sign @ (b'+' | b'-')) = self.peek() {
            self.bump();
            let unit: i8 = if sign == b'+' { 1 } else { -1 };
            charge = match self.number() {
                Some(n) => unit * n as i8,
                None => {
                    let mut c = unit;
                    while self.peek() == Some(sign) {
                        self.bump();
                        c += unit;
                    }
                    c
                }
            };
        }

        // Atom class, accepted and discarded.
        if self.peek() == Some(b':') {
            self.bump();
            if self.number().is_none() {
                return Err(self.err("expected atom class number"));
            }
        }

        if self.bump() != Some(b']') {
            return Err(self.err("expected ']'"));
        }

        let mut atom = Atom::new(element).with_charge(charge).with_hydrogens(hydrogens);
        atom.isotope = isotope;
        atom.aromatic = aromatic;
        atom.chirality = chirality;
        self.push_atom(atom)
    }

    fn push_atom(&mut self, atom: Atom) -> Result<(), Error> {
        let idx = self.graph.add_atom(atom);
        if let Some(prev) = self.prev {
            let order = self.pending.take().unwrap_or_else(|| self.implicit_order(prev, idx));
            self.graph.add_bond(prev, idx, order);
        }
        self.pending = None;
        self.prev = Some(idx);
        Ok(())
    }

    fn implicit_order(&self, a: usize, b: usize) -> BondOrder {
        if self.graph.atoms[a].aromatic && self.graph.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn number(&mut self) -> Option<u32> {
        let mut value: Option<u32> = None;
        while let Some(ch @ b'0'..=b'9') = self.peek() {
            self.bump();
            value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add((ch - b'0') as u32));
        }
        value
    }

    fn ring_number_two_digit(&mut self) -> Result<u16, Error> {
        let d1 = self.bump().filter(u8::is_ascii_digit);
        let d2 = self.bump().filter(u8::is_ascii_digit);
        match (d1, d2) {
            (Some(a), Some(b)) => Ok((a - b'0') as u16 * 10 + (b - b'0') as u16),
            _ => Err(self.err("expected two digits after '%'")),
        }
    }

    fn ring_closure(&mut self, number: u16) -> Result<(), Error> {
        let current = self.prev.ok_or_else(|| self.err("ring bond without preceding atom"))?;
        match self.open_rings.remove(&number) {
            Some((open, open_order)) => {
                if open == current {
                    return Err(self.err("ring bond to itself"));
                }
                if self.graph.bond_between(open, current).is_some() {
                    return Err(self.err("duplicate bond created by ring closure"));
                }
                let close_order = self.pending.take();
                let order = match (open_order, close_order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(self.err("conflicting ring bond orders"));
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.implicit_order(open, current),
                };
                self.graph.add_bond(open, current, order);
            }
            None => {
                let order = self.pending.take();
                self.open_rings.insert(number, (current, order));
            }
        }
        Ok(())
    }
}

fn is_organic_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chain_with_branch() {
        let g = parse("CC(C)O").unwrap();
        assert_eq!(g.atom_count(), 4);
        assert_eq!(g.bond_count(), 3);
        assert_eq!(g.degree(1), 3);
        assert_eq!(g.atoms[3].element, Element::O);
    }

    #[test]
    fn parses_bond_symbols() {
        let g = parse("C=C#N").unwrap();
        assert_eq!(g.bonds[0].order, BondOrder::Double);
        assert_eq!(g.bonds[1].order, BondOrder::Triple);
        let g = parse("F/C=C\\F").unwrap();
        assert_eq!(g.bonds[0].order, BondOrder::Single);
        assert_eq!(g.bonds[1].order, BondOrder::Double);
    }

    #[test]
    fn aromatic_ring_bonds_are_aromatic() {
        let g = parse("c1ccccc1").unwrap();
        assert_eq!(g.bond_count(), 6);
        assert!(g.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert!(g.atoms.iter().all(|a| a.aromatic));
    }

    #[test]
    fn ring_bond_order_written_at_opening_digit() {
        let g = parse("C=1CCCCC1").unwrap();
        let closure = g.bond_between(0, 5).unwrap();
        assert_eq!(g.bonds[closure].order, BondOrder::Double);
    }

    #[test]
    fn parses_bracket_atoms() {
        let g = parse("[13CH3][C@@H](N)[O-]").unwrap();
        assert_eq!(g.atoms[0].isotope, Some(13));
        assert_eq!(g.atoms[0].hydrogens, 3);
        assert!(g.atoms[0].fixed_hydrogens);
        assert_eq!(g.atoms[1].chirality, Chirality::Clockwise);
        assert_eq!(g.atoms[1].hydrogens, 1);
        assert_eq!(g.atoms[3].formal_charge, -1);
        let g = parse("[Fe++]").unwrap();
        assert_eq!(g.atoms[0].formal_charge, 2);
        let g = parse("[NH4+:1]").unwrap();
        assert_eq!(g.atoms[0].hydrogens, 4);
        assert_eq!(g.atoms[0].formal_charge, 1);
    }

    #[test]
    fn two_letter_bracket_symbols() {
        let g = parse("[Na+].[Cl-]").unwrap();
        assert_eq!(g.atoms[0].element, Element::Na);
        assert_eq!(g.atoms[1].element, Element::Cl);
        assert_eq!(g.bond_count(), 0);
        let g = parse("[se]1cccc1").unwrap();
        assert_eq!(g.atoms[0].element, Element::Se);
        assert!(g.atoms[0].aromatic);
    }

    #[test]
    fn percent_ring_numbers() {
        let g = parse("C%10CCCCCCCCC%10").unwrap();
        assert_eq!(g.atom_count(), 10);
        assert_eq!(g.bond_count(), 10);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        for bad in ["", "C(", "C)", "C1CC", "[", "[Xx]", "C==C", "C-", "1C", "Q", "C11"] {
            assert!(parse(bad).is_err(), "{bad:?} should fail");
        }
    }
}
