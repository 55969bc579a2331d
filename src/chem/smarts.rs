//! SMARTS patterns and substructure matching.
//!
//! Supports the commonly used subset: atomic primitives (`#n`, element
//! symbols, `a`, `A`, `*`, `H`, `D`, `X`, `R`, `r`, charges), the logical
//! operators `!`, `&`, `,` and `;`, bond primitives `- = # : ~ @` with
//! optional `!`, branches, ring closures and `.` separated components.

use super::error::Error;
use super::rings::RingInfo;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
enum AtomPrimitive {
    AtomicNumber(u8),
    Aromatic,
    Aliphatic,
    Any,
    TotalH(u8),
    Degree(u8),
    Connectivity(u8),
    /// `R` alone means "in any ring", `Rn` "in exactly n SSSR rings".
    RingCount(Option<u8>),
    SmallestRing(u8),
    Charge(i8),
}

#[derive(Debug, Clone, PartialEq)]
enum AtomExpr {
    Prim(AtomPrimitive),
    Not(Box<AtomExpr>),
    And(Vec<AtomExpr>),
    Or(Vec<AtomExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BondPrimitive {
    /// Unwritten bond: single or aromatic.
    Implicit,
    Single,
    Double,
    Triple,
    Aromatic,
    Any,
    Ring,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BondExpr {
    primitive: BondPrimitive,
    negated: bool,
}

impl BondExpr {
    const IMPLICIT: BondExpr = BondExpr {
        primitive: BondPrimitive::Implicit,
        negated: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
struct PatternBond {
    a: usize,
    b: usize,
    expr: BondExpr,
}

/// A parsed SMARTS query.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    source: String,
    atoms: Vec<AtomExpr>,
    bonds: Vec<PatternBond>,
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Pattern {
    /// Parses `smarts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Smarts`] for empty input, unknown primitives,
    /// unbalanced brackets or branches, and unclosed ring bonds.
    pub fn parse(smarts: &str) -> Result<Self, Error> {
        if smarts.trim().is_empty() {
            return Err(Error::smarts(smarts, "empty pattern"));
        }
        let mut parser = Parser::new(smarts);
        parser.run()?;
        let Parser { atoms, bonds, .. } = parser;
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.a].push((bond.b, bi));
            adjacency[bond.b].push((bond.a, bi));
        }
        Ok(Self {
            source: smarts.to_string(),
            atoms,
            bonds,
            adjacency,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

struct Parser<'a> {
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    atoms: Vec<AtomExpr>,
    bonds: Vec<PatternBond>,
    branches: Vec<usize>,
    open_rings: BTreeMap<u16, (usize, Option<BondExpr>)>,
    prev: Option<usize>,
    pending: Option<BondExpr>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            input: source.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            branches: Vec::new(),
            open_rings: BTreeMap::new(),
            prev: None,
            pending: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn err(&self, detail: impl Into<String>) -> Error {
        Error::smarts(self.source, format!("{} at position {}", detail.into(), self.pos))
    }

    fn run(&mut self) -> Result<(), Error> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    let prev = self.prev.ok_or_else(|| self.err("branch without a preceding atom"))?;
                    self.bump();
                    self.branches.push(prev);
                }
                b')' => {
                    self.bump();
                    self.prev = Some(self.branches.pop().ok_or_else(|| self.err("unmatched ')'"))?);
                    self.pending = None;
                }
                b'.' => {
                    self.bump();
                    self.prev = None;
                    self.pending = None;
                }
                b'-' | b'=' | b'#' | b':' | b'~' | b'@' | b'!' => {
                    let expr = self.parse_bond()?;
                    self.pending = Some(expr);
                }
                b'%' => {
                    self.bump();
                    let hi = self.bump().filter(u8::is_ascii_digit);
                    let lo = self.bump().filter(u8::is_ascii_digit);
                    match (hi, lo) {
                        (Some(h), Some(l)) => {
                            self.ring_closure(u16::from(h - b'0') * 10 + u16::from(l - b'0'))?
                        }
                        _ => return Err(self.err("expected two digits after '%'")),
                    }
                }
                b'0'..=b'9' => {
                    self.bump();
                    self.ring_closure(u16::from(ch - b'0'))?;
                }
                b'[' => {
                    self.bump();
                    let expr = self.parse_low_and()?;
                    if self.bump() != Some(b']') {
                        return Err(self.err("expected ']'"));
                    }
                    self.push_atom(expr);
                }
                b'*' => {
                    self.bump();
                    self.push_atom(AtomExpr::Prim(AtomPrimitive::Any));
                }
                _ => {
                    let expr = self.parse_organic()?;
                    self.push_atom(expr);
                }
            }
        }
        if !self.branches.is_empty() {
            return Err(self.err("unclosed branch"));
        }
        if let Some(ring) = self.open_rings.keys().next() {
            return Err(self.err(format!("unclosed ring bond {ring}")));
        }
        if self.atoms.is_empty() {
            return Err(self.err("pattern has no atoms"));
        }
        Ok(())
    }

    fn push_atom(&mut self, expr: AtomExpr) {
        let idx = self.atoms.len();
        self.atoms.push(expr);
        if let Some(prev) = self.prev {
            let expr = self.pending.take().unwrap_or(BondExpr::IMPLICIT);
            self.bonds.push(PatternBond { a: prev, b: idx, expr });
        }
        self.pending = None;
        self.prev = Some(idx);
    }

    fn ring_closure(&mut self, number: u16) -> Result<(), Error> {
        let current = self.prev.ok_or_else(|| self.err("ring bond without a preceding atom"))?;
        let pending = self.pending.take();
        match self.open_rings.remove(&number) {
            Some((open, opening_expr)) => {
                if open == current {
                    return Err(self.err("ring bond to itself"));
                }
                let expr = pending.or(opening_expr).unwrap_or(BondExpr::IMPLICIT);
                self.bonds.push(PatternBond { a: open, b: current, expr });
            }
            None => {
                self.open_rings.insert(number, (current, pending));
            }
        }
        Ok(())
    }

    fn parse_bond(&mut self) -> Result<BondExpr, Error> {
        let negated = if self.peek() == Some(b'!') {
            self.bump();
            true
        } else {
            false
        };
        let primitive = match self.bump() {
            Some(b'-') => BondPrimitive::Single,
            Some(b'=') => BondPrimitive::Double,
            Some(b'#') => BondPrimitive::Triple,
            Some(b':') => BondPrimitive::Aromatic,
            Some(b'~') => BondPrimitive::Any,
            Some(b'@') => BondPrimitive::Ring,
            _ => return Err(self.err("expected a bond primitive")),
        };
        Ok(BondExpr { primitive, negated })
    }

    fn parse_organic(&mut self) -> Result<AtomExpr, Error> {
        let two = (self.peek(), self.peek_at(1));
        let (element, aromatic, len) = match two {
            (Some(b'C'), Some(b'l')) => (Element::Cl, false, 2),
            (Some(b'B'), Some(b'r')) => (Element::Br, false, 2),
            (Some(b'B'), _) => (Element::B, false, 1),
            (Some(b'C'), _) => (Element::C, false, 1),
            (Some(b'N'), _) => (Element::N, false, 1),
            (Some(b'O'), _) => (Element::O, false, 1),
            (Some(b'P'), _) => (Element::P, false, 1),
            (Some(b'S'), _) => (Element::S, false, 1),
            (Some(b'F'), _) => (Element::F, false, 1),
            (Some(b'I'), _) => (Element::I, false, 1),
            (Some(b'b'), _) => (Element::B, true, 1),
            (Some(b'c'), _) => (Element::C, true, 1),
            (Some(b'n'), _) => (Element::N, true, 1),
            (Some(b'o'), _) => (Element::O, true, 1),
            (Some(b'p'), _) => (Element::P, true, 1),
            (Some(b's'), _) => (Element::S, true, 1),
            (Some(c), _) => return Err(self.err(format!("unexpected character '{}'", c as char))),
            (None, _) => return Err(self.err("unexpected end of pattern")),
        };
        self.pos += len;
        Ok(element_expr(element, Some(aromatic)))
    }

    /// `;` separated conjunction, the lowest precedence.
    fn parse_low_and(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.parse_or()?];
        while self.peek() == Some(b';') {
            self.bump();
            terms.push(self.parse_or()?);
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_or(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.parse_high_and()?];
        while self.peek() == Some(b',') {
            self.bump();
            terms.push(self.parse_high_and()?);
        }
        Ok(collapse(terms, AtomExpr::Or))
    }

    fn parse_high_and(&mut self) -> Result<AtomExpr, Error> {
        let mut terms = vec![self.parse_not()?];
        loop {
            match self.peek() {
                Some(b'&') => {
                    self.bump();
                    terms.push(self.parse_not()?);
                }
                Some(b']' | b',' | b';') | None => break,
                Some(_) => terms.push(self.parse_not()?),
            }
        }
        Ok(collapse(terms, AtomExpr::And))
    }

    fn parse_not(&mut self) -> Result<AtomExpr, Error> {
        if self.peek() == Some(b'!') {
            self.bump();
            return Ok(AtomExpr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_primitive()
    }

    fn number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.input[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
    }

    fn small_number(&mut self, default: u8) -> Result<u8, Error> {
        match self.number() {
            None => Ok(default),
            Some(n) => u8::try_from(n).map_err(|_| self.err("count out of range")),
        }
    }

    fn parse_primitive(&mut self) -> Result<AtomExpr, Error> {
        let Some(ch) = self.peek() else {
            return Err(self.err("unexpected end of atom expression"));
        };
        // A lone `H` is the hydrogen atom rather than a hydrogen count.
        if ch == b'H' && self.atom_expr_is_bare_hydrogen() {
            self.bump();
            return Ok(element_expr(Element::H, None));
        }
        let prim = match ch {
            b'#' => {
                self.bump();
                let n = self.number().ok_or_else(|| self.err("expected atomic number after '#'"))?;
                let n = u8::try_from(n)
                    .ok()
                    .filter(|&n| Element::from_atomic_number(n).is_some())
                    .ok_or_else(|| self.err(format!("unknown atomic number {n}")))?;
                AtomPrimitive::AtomicNumber(n)
            }
            b'*' => {
                self.bump();
                AtomPrimitive::Any
            }
            b'a' if self.peek_at(1) != Some(b's') => {
                self.bump();
                AtomPrimitive::Aromatic
            }
            b'A' if !self.peek_at(1).is_some_and(|c| c.is_ascii_lowercase()) => {
                self.bump();
                AtomPrimitive::Aliphatic
            }
            b'H' => {
                self.bump();
                AtomPrimitive::TotalH(self.small_number(1)?)
            }
            b'D' if !self.peek_at(1).is_some_and(|c| c.is_ascii_lowercase()) => {
                self.bump();
                AtomPrimitive::Degree(self.small_number(1)?)
            }
            b'X' => {
                self.bump();
                AtomPrimitive::Connectivity(self.small_number(1)?)
            }
            b'R' if !self.peek_at(1).is_some_and(|c| c.is_ascii_lowercase()) => {
                self.bump();
                match self.number() {
                    None => AtomPrimitive::RingCount(None),
                    Some(n) => AtomPrimitive::RingCount(Some(
                        u8::try_from(n).map_err(|_| self.err("ring count out of range"))?,
                    )),
                }
            }
            b'r' => {
                self.bump();
                match self.number() {
                    None => AtomPrimitive::RingCount(None),
                    Some(n) => AtomPrimitive::SmallestRing(
                        u8::try_from(n).map_err(|_| self.err("ring size out of range"))?,
                    ),
                }
            }
            b'+' | b'-' => {
                self.bump();
                let sign: i8 = if ch == b'+' { 1 } else { -1 };
                let mut magnitude: i8 = 1;
                if let Some(n) = self.number() {
                    magnitude = i8::try_from(n).map_err(|_| self.err("charge out of range"))?;
                } else {
                    while self.peek() == Some(ch) {
                        self.bump();
                        magnitude += 1;
                    }
                }
                AtomPrimitive::Charge(sign * magnitude)
            }
            c if c.is_ascii_alphabetic() => return self.parse_element(),
            c => return Err(self.err(format!("unexpected character '{}'", c as char))),
        };
        Ok(AtomExpr::Prim(prim))
    }

    fn atom_expr_is_bare_hydrogen(&self) -> bool {
        let before = self.pos.checked_sub(1).and_then(|p| self.input.get(p)).copied();
        let after = self.peek_at(1);
        before == Some(b'[') && matches!(after, Some(b']' | b'+' | b'-' | b';' | b','))
    }

    fn parse_element(&mut self) -> Result<AtomExpr, Error> {
        let first = self.peek().unwrap_or(b' ');
        if first.is_ascii_lowercase() {
            for (sym, el) in [("se", Element::Se), ("as", Element::As)] {
                if self.input[self.pos..].starts_with(sym.as_bytes()) {
                    self.pos += 2;
                    return Ok(element_expr(el, Some(true)));
                }
            }
            let el = match first {
                b'b' => Element::B,
                b'c' => Element::C,
                b'n' => Element::N,
                b'o' => Element::O,
                b'p' => Element::P,
                b's' => Element::S,
                _ => return Err(self.err(format!("unknown aromatic symbol '{}'", first as char))),
            };
            self.bump();
            return Ok(element_expr(el, Some(true)));
        }

        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let symbol = [first, second];
            if let Some(el) = std::str::from_utf8(&symbol)
                .ok()
                .and_then(|s| Element::from_str(s).ok())
            {
                self.pos += 2;
                return Ok(element_expr(el, None));
            }
        }
        let el = std::str::from_utf8(&[first])
            .ok()
            .and_then(|s| Element::from_str(s).ok())
            .ok_or_else(|| self.err(format!("unknown element '{}'", first as char)))?;
        self.bump();
        Ok(element_expr(el, if el == Element::H { None } else { Some(false) }))
    }
}

fn element_expr(element: Element, aromatic: Option<bool>) -> AtomExpr {
    let number = AtomExpr::Prim(AtomPrimitive::AtomicNumber(element.atomic_number()));
    match aromatic {
        None => number,
        Some(true) => AtomExpr::And(vec![number, AtomExpr::Prim(AtomPrimitive::Aromatic)]),
        Some(false) => AtomExpr::And(vec![number, AtomExpr::Prim(AtomPrimitive::Aliphatic)]),
    }
}

fn collapse(mut terms: Vec<AtomExpr>, wrap: fn(Vec<AtomExpr>) -> AtomExpr) -> AtomExpr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        wrap(terms)
    }
}

struct Target<'a> {
    graph: &'a MolGraph,
    rings: &'a RingInfo,
}

impl Target<'_> {
    fn atom_matches(&self, expr: &AtomExpr, atom: usize) -> bool {
        match expr {
            AtomExpr::Prim(p) => self.primitive_matches(p, atom),
            AtomExpr::Not(inner) => !self.atom_matches(inner, atom),
            AtomExpr::And(terms) => terms.iter().all(|t| self.atom_matches(t, atom)),
            AtomExpr::Or(terms) => terms.iter().any(|t| self.atom_matches(t, atom)),
        }
    }

    fn primitive_matches(&self, prim: &AtomPrimitive, atom: usize) -> bool {
        let a = &self.graph.atoms[atom];
        match *prim {
            AtomPrimitive::AtomicNumber(n) => a.atomic_number() == n,
            AtomPrimitive::Aromatic => a.aromatic,
            AtomPrimitive::Aliphatic => !a.aromatic,
            AtomPrimitive::Any => true,
            AtomPrimitive::TotalH(n) => self.graph.total_hydrogens(atom) == n as usize,
            AtomPrimitive::Degree(n) => self.graph.degree(atom) == n as usize,
            AtomPrimitive::Connectivity(n) => {
                self.graph.degree(atom) + a.hydrogens as usize == n as usize
            }
            AtomPrimitive::RingCount(None) => self.rings.is_atom_in_ring(atom),
            AtomPrimitive::RingCount(Some(n)) => self.rings.atom_ring_count(atom) == n as usize,
            AtomPrimitive::SmallestRing(n) => self.rings.smallest_ring_size(atom) == Some(n as usize),
            AtomPrimitive::Charge(c) => a.formal_charge == c,
        }
    }

    fn bond_matches(&self, expr: BondExpr, bond: usize) -> bool {
        let order = self.graph.bonds[bond].order;
        let hit = match expr.primitive {
            BondPrimitive::Implicit => matches!(order, BondOrder::Single | BondOrder::Aromatic),
            BondPrimitive::Single => order == BondOrder::Single,
            BondPrimitive::Double => order == BondOrder::Double,
            BondPrimitive::Triple => order == BondOrder::Triple,
            BondPrimitive::Aromatic => order == BondOrder::Aromatic,
            BondPrimitive::Any => true,
            BondPrimitive::Ring => self.rings.is_bond_in_ring(bond),
        };
        hit != expr.negated
    }
}

/// Pattern atoms in an order where every atom after the first of its
/// component is bonded to an earlier one.
fn search_order(pattern: &Pattern) -> Vec<usize> {
    let n = pattern.atoms.len();
    let mut seen = vec![false; n];
    let mut order = Vec::with_capacity(n);
    for root in 0..n {
        if seen[root] {
            continue;
        }
        seen[root] = true;
        let mut queue = std::collections::VecDeque::from([root]);
        while let Some(curr) = queue.pop_front() {
            order.push(curr);
            for &(nb, _) in &pattern.adjacency[curr] {
                if !seen[nb] {
                    seen[nb] = true;
                    queue.push_back(nb);
                }
            }
        }
    }
    order
}

struct Matcher<'a> {
    pattern: &'a Pattern,
    target: Target<'a>,
    order: Vec<usize>,
    mapping: Vec<Option<usize>>,
    used: Vec<bool>,
    found: Vec<Vec<usize>>,
    seen_sets: BTreeSet<Vec<usize>>,
    limit: Option<usize>,
}

impl<'a> Matcher<'a> {
    fn done(&self) -> bool {
        self.limit.is_some_and(|l| self.found.len() >= l)
    }

    fn extend(&mut self, depth: usize) {
        if self.done() {
            return;
        }
        if depth == self.order.len() {
            let mapping: Vec<usize> = self.mapping.iter().flatten().copied().collect();
            let mut key = mapping.clone();
            key.sort_unstable();
            if self.seen_sets.insert(key) {
                self.found.push(mapping);
            }
            return;
        }
        let pattern: &'a Pattern = self.pattern;
        let p = self.order[depth];
        let expr = &pattern.atoms[p];
        for t in 0..self.target.graph.atom_count() {
            if self.used[t] || !self.target.atom_matches(expr, t) {
                continue;
            }
            let bonds_ok = pattern.adjacency[p].iter().all(|&(pn, pb)| match self.mapping[pn] {
                None => true,
                Some(tn) => self
                    .target
                    .graph
                    .bond_between(t, tn)
                    .is_some_and(|tb| self.target.bond_matches(pattern.bonds[pb].expr, tb)),
            });
            if !bonds_ok {
                continue;
            }
            self.mapping[p] = Some(t);
            self.used[t] = true;
            self.extend(depth + 1);
            self.mapping[p] = None;
            self.used[t] = false;
            if self.done() {
                return;
            }
        }
    }
}

fn run_matcher(
    pattern: &Pattern,
    graph: &MolGraph,
    rings: &RingInfo,
    limit: Option<usize>,
) -> Vec<Vec<usize>> {
    let mut matcher = Matcher {
        pattern,
        target: Target { graph, rings },
        order: search_order(pattern),
        mapping: vec![None; pattern.atoms.len()],
        used: vec![false; graph.atom_count()],
        found: Vec::new(),
        seen_sets: BTreeSet::new(),
        limit,
    };
    matcher.extend(0);
    matcher.found
}

/// All matches of `pattern` in `graph`, one per distinct set of target atoms.
///
/// Each match lists the target atom for every pattern atom, in pattern order.
pub fn find_matches(pattern: &Pattern, graph: &MolGraph, rings: &RingInfo) -> Vec<Vec<usize>> {
    run_matcher(pattern, graph, rings, None)
}

pub fn has_match(pattern: &Pattern, graph: &MolGraph, rings: &RingInfo) -> bool {
    !run_matcher(pattern, graph, rings, Some(1)).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn count(smarts: &str, smi: &str) -> usize {
        let pattern = Pattern::parse(smarts).unwrap();
        let (g, r) = sanitize(smiles::parse(smi).unwrap()).unwrap();
        find_matches(&pattern, &g, &r).len()
    }

    #[test]
    fn carboxylic_acid_pattern() {
        assert_eq!(count("[CX3](=O)[OX2H1]", "CC(=O)O"), 1);
        assert_eq!(count("[CX3](=O)[OX2H1]", "CC(=O)OC"), 0);
        assert_eq!(count("[CX3](=O)[OX2H1]", "OC(=O)CCC(=O)O"), 2);
    }

    #[test]
    fn matches_are_unique_by_atom_set() {
        assert_eq!(count("c1ccccc1", "c1ccccc1"), 1);
        assert_eq!(count("CC", "CCC"), 2);
        assert_eq!(count("C~C", "C=C"), 1);
    }

    #[test]
    fn aromatic_and_aliphatic_are_distinguished() {
        assert_eq!(count("c", "c1ccccc1C"), 6);
        assert_eq!(count("C", "c1ccccc1C"), 1);
        assert_eq!(count("[#6]", "c1ccccc1C"), 7);
        assert_eq!(count("a", "c1ccncc1"), 6);
    }

    #[test]
    fn halogen_list_and_negation() {
        assert_eq!(count("[F,Cl,Br,I]", "FC(Cl)Br"), 3);
        assert_eq!(count("[!#6]", "CCO"), 1);
        assert_eq!(count("[#6;!R]", "C1CC1C"), 1);
    }

    #[test]
    fn ring_primitives_and_bonds() {
        assert_eq!(count("[#7;R]", "C1CCNCC1N"), 1);
        assert_eq!(count("[r5]", "C1CCCC1C"), 5);
        assert_eq!(count("C@C", "C1CC1CC"), 3);
        assert_eq!(count("C!@C", "C1CC1CC"), 2);
        assert_eq!(count("[R2]", "c1ccc2ccccc2c1"), 2);
    }

    #[test]
    fn hydrogen_and_charge_primitives() {
        assert_eq!(count("[NX3;H2][#6]", "NCC"), 1);
        assert_eq!(count("[nH]1cccc1", "c1cc[nH]c1"), 1);
        assert_eq!(count("[N+]", "C[N+](C)(C)C"), 1);
        assert_eq!(count("[O-]", "CC(=O)[O-]"), 1);
        assert_eq!(count("[OH]", "CCO"), 1);
    }

    #[test]
    fn bare_hydrogen_atom() {
        let pattern = Pattern::parse("[H]").unwrap();
        let (g, r) = sanitize(smiles::parse("O").unwrap()).unwrap();
        let explicit = g.with_explicit_hydrogens();
        assert_eq!(find_matches(&pattern, &explicit, &r).len(), 2);
        assert!(!has_match(&pattern, &g, &r));
    }

    #[test]
    fn disconnected_patterns() {
        assert_eq!(count("O.O", "OCCO"), 1);
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        for bad in ["", "C(", "C1CC", "[C", "[Xx]", "C)", "Q", "[#999]"] {
            assert!(
                matches!(Pattern::parse(bad), Err(Error::Smarts { .. })),
                "{bad} should fail"
            );
        }
    }
}
