//! SELFIES decoder.
//!
//! Symbols are consumed left to right while a derivation state tracks the
//! remaining bonding capacity of the previous atom. Branch and ring symbols
//! read their length or offset from the following index symbols, and ring
//! bonds are formed after the whole string has been derived.

use super::error::Error;
use crate::model::atom::{Atom, Chirality};
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use std::str::FromStr;

const INDEX_ALPHABET: [&str; 16] = [
    "[C]", "[Ring1]", "[Ring2]", "[Branch1]", "[=Branch1]", "[#Branch1]", "[Branch2]", "[=Branch2]",
    "[#Branch2]", "[O]", "[N]", "[=N]", "[=C]", "[#C]", "[S]", "[P]",
];

/// Decodes a SELFIES string into an unsanitized graph.
pub fn parse(selfies: &str) -> Result<MolGraph, Error> {
    let mut decoder = Decoder {
        graph: MolGraph::new(),
        capacity: Vec::new(),
        rings: Vec::new(),
    };
    for fragment in selfies.split('.') {
        let symbols = tokenize(fragment)?;
        let mut iter = symbols.iter().map(String::as_str);
        decoder.derive(&mut iter, usize::MAX, None, None)?;
    }
    decoder.close_rings();
    if decoder.graph.atom_count() == 0 {
        return Err(Error::EmptyMolecule);
    }
    Ok(decoder.graph)
}

/// Splits one fragment into `[...]` symbols.
pub fn tokenize(fragment: &str) -> Result<Vec<String>, Error> {
    let mut symbols = Vec::new();
    let mut rest = fragment;
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(Error::selfies(rest, "symbols must be enclosed in brackets"));
        }
        let end = rest
            .find(']')
            .ok_or_else(|| Error::selfies(rest, "unterminated symbol"))?;
        symbols.push(rest[..=end].to_string());
        rest = &rest[end + 1..];
    }
    Ok(symbols)
}

struct Decoder {
    graph: MolGraph,
    capacity: Vec<u8>,
    rings: Vec<(usize, usize, u8)>,
}

impl Decoder {
    /// Derives symbols until the state is exhausted or `max_derive` symbols
    /// have been consumed; returns the number consumed.
    fn derive<'s>(
        &mut self,
        symbols: &mut impl Iterator<Item = &'s str>,
        max_derive: usize,
        init_state: Option<u8>,
        root: Option<usize>,
    ) -> Result<usize, Error> {
        let mut derived = 0usize;
        let mut state = init_state;
        let mut prev = root;

        while state.is_none_or(|s| s > 0) && derived < max_derive {
            let Some(symbol) = symbols.next() else {
                break;
            };
            derived += 1;
            let current = state.unwrap_or(0);

            let next_state: Option<u8> = if let Some((btype, n)) = branch_symbol(symbol) {
                if current <= 1 {
                    state
                } else {
                    let branch_state = (current - 1).min(btype);
                    let q = read_index(symbols, n);
                    derived += n;
                    derived += self.derive(symbols, q + 1, Some(branch_state), prev)?;
                    Some(current - branch_state)
                }
            } else if let Some((rtype, n)) = ring_symbol(symbol) {
                match prev {
                    Some(right) if current > 0 => {
                        let order = current.min(rtype);
                        let q = read_index(symbols, n);
                        derived += n;
                        let left = right.saturating_sub(q + 1);
                        self.rings.push((left, right, order));
                        Some(current - order)
                    }
                    _ => state,
                }
            } else if symbol == "[nop]" {
                state
            } else if symbol.contains("eps") {
                if state.is_none() { Some(0) } else { break }
            } else {
                let (requested, atom, cap) = atom_symbol(symbol)?;
                let idx = self.graph.add_atom(atom);
                self.capacity.push(cap);
                let next = match (state, prev) {
                    (Some(s), Some(p)) => {
                        let order = requested.min(s).min(cap);
                        if order > 0 {
                            self.graph.add_bond(p, idx, bond_order(order));
                        }
                        Some(cap - order)
                    }
                    _ => Some(cap),
                };
                prev = Some(idx);
                next
            };
            state = next_state;
        }
        Ok(derived)
    }

    /// Forms the deferred ring bonds, limited by the free valence of both ends.
    fn close_rings(&mut self) {
        let rings = std::mem::take(&mut self.rings);
        for (left, right, order) in rings {
            if left == right {
                continue;
            }
            let free_left = self.capacity[left].saturating_sub(self.graph.bond_valence(left) as u8);
            let free_right = self.capacity[right].saturating_sub(self.graph.bond_valence(right) as u8);
            let order = order.min(free_left).min(free_right);
            if order == 0 {
                continue;
            }
            match self.graph.bond_between(left, right) {
                Some(bi) => {
                    let existing = self.graph.bonds[bi].order.valence_contribution();
                    self.graph.bonds[bi].order = bond_order((existing + order).min(3));
                }
                None => {
                    self.graph.add_bond(left, right, bond_order(order));
                }
            }
        }
    }
}

fn bond_order(order: u8) -> BondOrder {
    match order {
        2 => BondOrder::Double,
        3 => BondOrder::Triple,
        _ => BondOrder::Single,
    }
}

fn read_index<'s>(symbols: &mut impl Iterator<Item = &'s str>, n: usize) -> usize {
    (0..n).fold(0, |acc, _| {
        let value = symbols
            .next()
            .and_then(|s| INDEX_ALPHABET.iter().position(|&a| a == s))
            .unwrap_or(0);
        acc * 16 + value
    })
}

fn prefix_order(prefix: &str) -> u8 {
    match prefix {
        "=" => 2,
        "#" => 3,
        _ => 1,
    }
}

/// `(bond type, index length)` of `[Branch1]`, `[=Branch2]`, ...
fn branch_symbol(symbol: &str) -> Option<(u8, usize)> {
    let inner = symbol.strip_prefix('[')?.strip_suffix(']')?;
    let pos = inner.find("Branch")?;
    let n = inner[pos + 6..].parse::<usize>().ok().filter(|n| (1..=3).contains(n))?;
    Some((prefix_order(&inner[..pos]), n))
}

/// `(bond type, index length)` of `[Ring1]`, `[=Ring2]`, `[-/Ring1]`, ...
fn ring_symbol(symbol: &str) -> Option<(u8, usize)> {
    let inner = symbol.strip_prefix('[')?.strip_suffix(']')?;
    let pos = inner.find("Ring")?;
    let n = inner[pos + 4..].parse::<usize>().ok().filter(|n| (1..=3).contains(n))?;
    Some((prefix_order(&inner[..pos]), n))
}

/// Parses an atom symbol into its requested bond order, the atom, and its bonding capacity.
fn atom_symbol(symbol: &str) -> Result<(u8, Atom, u8), Error> {
    let invalid = |detail: &str| Error::selfies(symbol, detail.to_string());
    let inner = symbol
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| invalid("not a bracketed symbol"))?;
    let bytes = inner.as_bytes();
    let mut pos = 0;

    let requested = match bytes.first() {
        Some(b'=') => 2,
        Some(b'#') => 3,
        Some(b'/') | Some(b'\\') => 1,
        _ => 0,
    };
    if requested > 0 {
        pos += 1;
    }
    let requested = requested.max(1);

    let digits_end = pos + bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
    let isotope = inner[pos..digits_end].parse::<u16>().ok();
    pos = digits_end;

    if !bytes.get(pos).is_some_and(u8::is_ascii_uppercase) {
        return Err(invalid("missing element"));
    }
    let mut symbol_len = 1;
    if bytes.get(pos + 1).is_some_and(u8::is_ascii_lowercase)
        && Element::from_str(&inner[pos..pos + 2]).is_ok()
    {
        symbol_len = 2;
    }
    let element = Element::from_str(&inner[pos..pos + symbol_len]).map_err(|_| invalid("unknown element"))?;
    pos += symbol_len;

    let mut chirality = Chirality::None;
    if bytes.get(pos) == Some(&b'@') {
        pos += 1;
        chirality = Chirality::CounterClockwise;
        if bytes.get(pos) == Some(&b'@') {
            pos += 1;
            chirality = Chirality::Clockwise;
        }
    }

    let mut hydrogens: Option<u8> = None;
    if bytes.get(pos) == Some(&b'H') {
        pos += 1;
        let end = pos + bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        hydrogens = Some(inner[pos..end].parse::<u8>().unwrap_or(1));
        pos = end;
    }

    let mut charge: i8 = 0;
    if let Some(&sign @ (b'+' | b'-')) = bytes.get(pos) {
        pos += 1;
        let unit: i8 = if sign == b'+' { 1 } else { -1 };
        let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits > 0 {
            let magnitude = inner[pos..pos + digits]
                .parse::<i8>()
                .map_err(|_| invalid("charge out of range"))?;
            charge = unit * magnitude;
            pos += digits;
        } else {
            charge = unit;
            while bytes.get(pos) == Some(&sign) {
                charge += unit;
                pos += 1;
            }
        }
    }
    if pos != bytes.len() {
        return Err(invalid("unrecognized trailing characters"));
    }

    let base = capacity(element, charge) as i16;
    let cap = base - hydrogens.unwrap_or(0) as i16;
    if cap < 0 {
        return Err(invalid("hydrogen count exceeds bonding capacity"));
    }

    let mut atom = Atom::new(element);
    atom.formal_charge = charge;
    atom.isotope = isotope;
    atom.chirality = chirality;
    let bracketed =
        hydrogens.is_some() || charge != 0 || isotope.is_some() || chirality != Chirality::None;
    if bracketed {
        atom = atom.with_hydrogens(hydrogens.unwrap_or(0));
    }
    Ok((requested, atom, cap as u8))
}

/// Default bonding capacity of an element in a given charge state.
fn capacity(element: Element, charge: i8) -> u8 {
    match (element, charge) {
        (Element::H | Element::F | Element::Cl | Element::Br | Element::I, 0) => 1,
        (Element::B, 0) => 3,
        (Element::B, 1) => 2,
        (Element::B, -1) => 4,
        (Element::O, 0) => 2,
        (Element::O, 1) => 3,
        (Element::O, -1) => 1,
        (Element::N, 0) => 3,
        (Element::N, 1) => 4,
        (Element::N, -1) => 2,
        (Element::C, 0) => 4,
        (Element::C, 1) => 5,
        (Element::C, -1) => 3,
        (Element::P, 0) => 5,
        (Element::P, 1) => 4,
        (Element::P, -1) => 6,
        (Element::S, 0) => 6,
        (Element::S, 1) | (Element::S, -1) => 5,
        _ => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, writer};

    fn decode(s: &str) -> String {
        let (g, _) = sanitize(parse(s).unwrap()).unwrap();
        writer::write(&g)
    }

    #[test]
    fn decodes_chain() {
        assert_eq!(decode("[C][C][O]"), "CCO");
        assert_eq!(decode("[C][=C][C][#N]"), "C=CC#N");
    }

    #[test]
    fn decodes_branch() {
        assert_eq!(decode("[C][C][Branch1][C][O][C]"), "CC(C)O");
    }

    #[test]
    fn decodes_ring() {
        assert_eq!(decode("[C][=C][C][=C][C][=C][Ring1][=Branch1]"), "c1ccccc1");
        assert_eq!(decode("[C][C][C][C][C][C][Ring1][=Branch1]"), "C1CCCCC1");
    }

    #[test]
    fn saturated_atom_ends_derivation() {
        assert_eq!(decode("[C][F][C]"), "CF");
    }

    #[test]
    fn bond_order_is_capped_by_state() {
        assert_eq!(decode("[O][#C]"), "C=O");
    }

    #[test]
    fn charged_atoms_and_fragments() {
        assert_eq!(decode("[NH4+1].[Cl-1]"), "[NH4+].[Cl-]");
        assert_eq!(decode("[C][nop][O]"), "CO");
    }

    #[test]
    fn malformed_symbols_are_rejected() {
        assert!(parse("C").is_err());
        assert!(parse("[C").is_err());
        assert!(parse("[Xy]").is_err());
        assert!(parse("[CH5]").is_err());
        assert!(parse("").is_err());
    }
}
