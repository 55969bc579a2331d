use super::types::Element;

/// Tetrahedral chirality tag as written in a line notation.
///
/// The tag is relative to the order in which the neighbours of the atom
/// appear in the input, with implicit hydrogens first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    #[default]
    None,
    /// `@` in SMILES.
    CounterClockwise,
    /// `@@` in SMILES.
    Clockwise,
}

/// A node of the molecular graph.
///
/// Hydrogens may either be attached implicitly through [`hydrogens`](Atom::hydrogens)
/// or be present as separate [`Element::H`] atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    /// Number of implicit hydrogens carried by this atom.
    pub hydrogens: u8,
    /// `true` when the hydrogen count was fixed by the input (bracket atoms).
    pub fixed_hydrogens: bool,
    pub chirality: Chirality,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: None,
            aromatic: false,
            hydrogens: 0,
            fixed_hydrogens: false,
            chirality: Chirality::None,
        }
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn with_hydrogens(mut self, hydrogens: u8) -> Self {
        self.hydrogens = hydrogens;
        self.fixed_hydrogens = true;
        self
    }

    pub fn aromatic(mut self) -> Self {
        self.aromatic = true;
        self
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number()
    }

    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        self.element.is_hydrogen()
    }
}
