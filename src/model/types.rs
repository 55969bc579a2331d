use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond order string: '{0}'")]
pub struct ParseBondOrderError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1, He, Li, Be, B, C, N, O, F, Ne,
    Na, Mg, Al, Si, P, S, Cl, Ar, K, Ca,
    Sc, Ti, V, Cr, Mn, Fe, Co, Ni, Cu, Zn,
    Ga, Ge, As, Se, Br, Kr, Rb, Sr, Y, Zr,
    Nb, Mo, Tc, Ru, Rh, Pd, Ag, Cd, In, Sn,
    Sb, Te, I, Xe, Cs, Ba, La, Ce, Pr, Nd,
    Pm, Sm, Eu, Gd, Tb, Dy, Ho, Er, Tm, Yb,
    Lu, Hf, Ta, W, Re, Os, Ir, Pt, Au, Hg,
    Tl, Pb, Bi, Po, At, Rn, Fr, Ra, Ac, Th,
    Pa, U, Np, Pu, Am, Cm, Bk, Cf, Es, Fm,
    Md, No, Lr, Rf, Db, Sg, Bh, Hs, Mt, Ds,
    Rg, Cn, Nh, Fl, Mc, Lv, Ts, Og,
}

impl Element {
    /// Standard atomic weight in daltons.
    pub fn atomic_mass(&self) -> f64 {
        ATOMIC_MASSES[self.index()]
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.index()]
    }
}


impl Element {
    /// Looks up an element by its atomic number (1..=118).
    pub fn from_atomic_number(number: u8) -> Option<Element> {
        number
            .checked_sub(1)
            .and_then(|idx| ALL_ELEMENTS.get(idx as usize))
            .copied()
    }

    /// English element name, e.g. `"Carbon"`.
    pub fn name(&self) -> &'static str {
        ELEMENT_NAMES[self.index()]
    }

    /// Mass of the most abundant isotope in daltons.
    pub fn monoisotopic_mass(&self) -> f64 {
        MONOISOTOPIC_MASSES[self.index()]
    }

    /// Covalent radius in Å (Alvarez 2008, 1.60 Å beyond curium).
    pub fn covalent_radius(&self) -> f64 {
        COVALENT_RADII[self.index()]
    }

    /// Bondi van der Waals radius in Å; elements without a tabulated value use 2.0 Å.
    pub fn vdw_radius(&self) -> f64 {
        BONDI_RADII[self.index()]
    }

    /// Number of valence (outer shell) electrons of the neutral atom.
    ///
    /// Filled d and f sub-shells are not counted, so zinc reports 2 and lead 4.
    pub fn valence_electrons(&self) -> u8 {
        let z = self.atomic_number();
        let core = match z {
            1..=2 => 0,
            3..=10 => 2,
            11..=18 => 10,
            19..=36 => 18,
            37..=54 => 36,
            55..=86 => 54,
            _ => 86,
        };
        let outer = z - core;
        match core {
            0 | 2 | 10 => outer,
            18 | 36 => match outer {
                0..=10 => outer,
                _ => outer - 10,
            },
            _ => match outer {
                0..=2 => outer,
                3..=17 => 3,
                18..=24 => outer - 14,
                _ => outer - 24,
            },
        }
    }

    /// Returns `true` for hydrogen.
    #[inline]
    pub fn is_hydrogen(&self) -> bool {
        matches!(self, Element::H)
    }

    #[inline]
    fn index(&self) -> usize {
        self.atomic_number() as usize - 1
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    /// Parses a symbol, normalizing case so that `"cl"` and `"CL"` read as chlorine.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let normalized: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => return Err(ParseElementError(s.to_string())),
        };
        ALL_ELEMENTS
            .iter()
            .find(|el| el.symbol() == normalized)
            .copied()
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

/// Bond types of the reference cheminformatics model, in its canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Unspecified,
    Single,
    Double,
    Triple,
    Quadruple,
    Quintuple,
    Hextuple,
    OneAndAHalf,
    TwoAndAHalf,
    ThreeAndAHalf,
    FourAndAHalf,
    FiveAndAHalf,
    Aromatic,
    Ionic,
    Hydrogen,
    ThreeCenter,
    DativeOne,
    Dative,
    Other,
    Zero,
}

impl BondOrder {
    /// All bond types in canonical order.
    pub const ALL: [BondOrder; 20] = [
        BondOrder::Unspecified,
        BondOrder::Single,
        BondOrder::Double,
        BondOrder::Triple,
        BondOrder::Quadruple,
        BondOrder::Quintuple,
        BondOrder::Hextuple,
        BondOrder::OneAndAHalf,
        BondOrder::TwoAndAHalf,
        BondOrder::ThreeAndAHalf,
        BondOrder::FourAndAHalf,
        BondOrder::FiveAndAHalf,
        BondOrder::Aromatic,
        BondOrder::Ionic,
        BondOrder::Hydrogen,
        BondOrder::ThreeCenter,
        BondOrder::DativeOne,
        BondOrder::Dative,
        BondOrder::Other,
        BondOrder::Zero,
    ];

    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Unspecified => 0.0,
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Quadruple => 4.0,
            BondOrder::Quintuple => 5.0,
            BondOrder::Hextuple => 6.0,
            BondOrder::OneAndAHalf => 1.5,
            BondOrder::TwoAndAHalf => 2.5,
            BondOrder::ThreeAndAHalf => 3.5,
            BondOrder::FourAndAHalf => 4.5,
            BondOrder::FiveAndAHalf => 5.5,
            BondOrder::Aromatic => 1.5,
            BondOrder::Ionic => 0.0,
            BondOrder::Hydrogen => 0.0,
            BondOrder::ThreeCenter => 0.0,
            BondOrder::DativeOne => 0.5,
            BondOrder::Dative => 1.0,
            BondOrder::Other => 0.0,
            BondOrder::Zero => 0.0,
        }
    }

    /// Upper-case key such as `SINGLE` or `DATIVEONE`.
    pub fn key(&self) -> &'static str {
        match self {
            BondOrder::Unspecified => "UNSPECIFIED",
            BondOrder::Single => "SINGLE",
            BondOrder::Double => "DOUBLE",
            BondOrder::Triple => "TRIPLE",
            BondOrder::Quadruple => "QUADRUPLE",
            BondOrder::Quintuple => "QUINTUPLE",
            BondOrder::Hextuple => "HEXTUPLE",
            BondOrder::OneAndAHalf => "ONEANDAHALF",
            BondOrder::TwoAndAHalf => "TWOANDAHALF",
            BondOrder::ThreeAndAHalf => "THREEANDAHALF",
            BondOrder::FourAndAHalf => "FOURANDAHALF",
            BondOrder::FiveAndAHalf => "FIVEANDAHALF",
            BondOrder::Aromatic => "AROMATIC",
            BondOrder::Ionic => "IONIC",
            BondOrder::Hydrogen => "HYDROGEN",
            BondOrder::ThreeCenter => "THREECENTER",
            BondOrder::DativeOne => "DATIVEONE",
            BondOrder::Dative => "DATIVE",
            BondOrder::Other => "OTHER",
            BondOrder::Zero => "ZERO",
        }
    }

    /// Human-readable name used in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            BondOrder::Unspecified => "unspecified",
            BondOrder::Single => "single",
            BondOrder::Double => "double",
            BondOrder::Triple => "triple",
            BondOrder::Quadruple => "quadruple",
            BondOrder::Quintuple => "quintuple",
            BondOrder::Hextuple => "hextuple",
            BondOrder::OneAndAHalf => "one-and-a-half",
            BondOrder::TwoAndAHalf => "two-and-a-half",
            BondOrder::ThreeAndAHalf => "three-and-a-half",
            BondOrder::FourAndAHalf => "four-and-a-half",
            BondOrder::FiveAndAHalf => "five-and-a-half",
            BondOrder::Aromatic => "aromatic",
            BondOrder::Ionic => "ionic",
            BondOrder::Hydrogen => "hydrogen",
            BondOrder::ThreeCenter => "three-center",
            BondOrder::DativeOne => "dative one-electron",
            BondOrder::Dative => "dative two-electron",
            BondOrder::Other => "other",
            BondOrder::Zero => "zero-order",
        }
    }

    /// Integer bond multiplicity used for valence bookkeeping; aromatic bonds count as one.
    pub fn valence_contribution(&self) -> u8 {
        match self {
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
            BondOrder::Quintuple => 5,
            BondOrder::Hextuple => 6,
            BondOrder::Ionic
            | BondOrder::Hydrogen
            | BondOrder::Zero
            | BondOrder::Other
            | BondOrder::DativeOne => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        match lowered.as_str() {
            "1" => return Ok(BondOrder::Single),
            "2" => return Ok(BondOrder::Double),
            "3" => return Ok(BondOrder::Triple),
            "ar" => return Ok(BondOrder::Aromatic),
            _ => {}
        }
        BondOrder::ALL
            .iter()
            .find(|order| order.key().eq_ignore_ascii_case(&lowered) || order.name() == lowered)
            .copied()
            .ok_or_else(|| ParseBondOrderError(s.to_string()))
    }
}

const ALL_ELEMENTS: [Element; 118] = [
    Element::H, Element::He, Element::Li, Element::Be, Element::B, Element::C, Element::N, Element::O, Element::F, Element::Ne,
    Element::Na, Element::Mg, Element::Al, Element::Si, Element::P, Element::S, Element::Cl, Element::Ar, Element::K, Element::Ca,
    Element::Sc, Element::Ti, Element::V, Element::Cr, Element::Mn, Element::Fe, Element::Co, Element::Ni, Element::Cu, Element::Zn,
    Element::Ga, Element::Ge, Element::As, Element::Se, Element::Br, Element::Kr, Element::Rb, Element::Sr, Element::Y, Element::Zr,
    Element::Nb, Element::Mo, Element::Tc, Element::Ru, Element::Rh, Element::Pd, Element::Ag, Element::Cd, Element::In, Element::Sn,
    Element::Sb, Element::Te, Element::I, Element::Xe, Element::Cs, Element::Ba, Element::La, Element::Ce, Element::Pr, Element::Nd,
    Element::Pm, Element::Sm, Element::Eu, Element::Gd, Element::Tb, Element::Dy, Element::Ho, Element::Er, Element::Tm, Element::Yb,
    Element::Lu, Element::Hf, Element::Ta, Element::W, Element::Re, Element::Os, Element::Ir, Element::Pt, Element::Au, Element::Hg,
    Element::Tl, Element::Pb, Element::Bi, Element::Po, Element::At, Element::Rn, Element::Fr, Element::Ra, Element::Ac, Element::Th,
    Element::Pa, Element::U, Element::Np, Element::Pu, Element::Am, Element::Cm, Element::Bk, Element::Cf, Element::Es, Element::Fm,
    Element::Md, Element::No, Element::Lr, Element::Rf, Element::Db, Element::Sg, Element::Bh, Element::Hs, Element::Mt, Element::Ds,
    Element::Rg, Element::Cn, Element::Nh, Element::Fl, Element::Mc, Element::Lv, Element::Ts, Element::Og,
];

const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si",
    "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni",
    "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo",
    "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po",
    "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
    "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

const ATOMIC_MASSES: [f64; 118] = [
    1.008, 4.0026, 6.94, 9.0122, 10.81, 12.011, 14.007, 15.999, 18.998, 20.18,
    22.99, 24.305, 26.982, 28.085, 30.974, 32.06, 35.45, 39.948, 39.098, 40.078,
    44.956, 47.867, 50.942, 51.996, 54.938, 55.845, 58.933, 58.693, 63.546, 65.38,
    69.723, 72.63, 74.922, 78.971, 79.904, 83.798, 85.468, 87.62, 88.906, 91.224,
    92.906, 95.96, 98.0, 101.07, 102.91, 106.42, 107.87, 112.41, 114.82, 118.71,
    121.76, 127.6, 126.9, 131.29, 132.91, 137.33, 138.91, 140.12, 140.91, 144.24,
    145.0, 150.36, 151.96, 157.25, 158.93, 162.5, 164.93, 167.26, 168.93, 173.05,
    174.97, 178.49, 180.95, 183.84, 186.21, 190.23, 192.22, 195.08, 196.97, 200.59,
    204.38, 207.2, 208.98, 209.0, 210.0, 222.0, 223.0, 226.0, 227.0, 232.04,
    231.04, 238.03, 237.0, 244.0, 243.0, 247.0, 247.0, 251.0, 252.0, 257.0,
    258.0, 259.0, 262.0, 267.0, 270.0, 271.0, 270.0, 277.0, 276.0, 281.0,
    280.0, 285.0, 284.0, 289.0, 288.0, 293.0, 294.0, 294.0,
];

const ELEMENT_NAMES: [&str; 118] = [
    "Hydrogen", "Helium", "Lithium", "Beryllium", "Boron", "Carbon", "Nitrogen", "Oxygen",
    "Fluorine", "Neon", "Sodium", "Magnesium", "Aluminium", "Silicon", "Phosphorus", "Sulfur",
    "Chlorine", "Argon", "Potassium", "Calcium", "Scandium", "Titanium", "Vanadium", "Chromium",
    "Manganese", "Iron", "Cobalt", "Nickel", "Copper", "Zinc", "Gallium", "Germanium",
    "Arsenic", "Selenium", "Bromine", "Krypton", "Rubidium", "Strontium", "Yttrium", "Zirconium",
    "Niobium", "Molybdenum", "Technetium", "Ruthenium", "Rhodium", "Palladium", "Silver", "Cadmium",
    "Indium", "Tin", "Antimony", "Tellurium", "Iodine", "Xenon", "Caesium", "Barium",
    "Lanthanum", "Cerium", "Praseodymium", "Neodymium", "Promethium", "Samarium", "Europium", "Gadolinium",
    "Terbium", "Dysprosium", "Holmium", "Erbium", "Thulium", "Ytterbium", "Lutetium", "Hafnium",
    "Tantalum", "Tungsten", "Rhenium", "Osmium", "Iridium", "Platinum", "Gold", "Mercury",
    "Thallium", "Lead", "Bismuth", "Polonium", "Astatine", "Radon", "Francium", "Radium",
    "Actinium", "Thorium", "Protactinium", "Uranium", "Neptunium", "Plutonium", "Americium", "Curium",
    "Berkelium", "Californium", "Einsteinium", "Fermium", "Mendelevium", "Nobelium", "Lawrencium", "Rutherfordium",
    "Dubnium", "Seaborgium", "Bohrium", "Hassium", "Meitnerium", "Darmstadtium", "Roentgenium", "Copernicium",
    "Nihonium", "Flerovium", "Moscovium", "Livermorium", "Tennessine", "Oganesson",
];

const MONOISOTOPIC_MASSES: [f64; 118] = [
    1.007825, 4.002603, 7.016004, 9.012182, 11.009305, 12.000000,
    14.003074, 15.994915, 18.998403, 19.992440, 22.989770, 23.985042,
    26.981538, 27.976927, 30.973762, 31.972071, 34.968853, 39.962383,
    38.963707, 39.962591, 44.955910, 47.947947, 50.943964, 51.940512,
    54.938050, 55.934942, 58.933200, 57.935348, 62.929601, 63.929147,
    68.925581, 73.921178, 74.921596, 79.916522, 78.918338, 83.911507,
    84.911789, 87.905614, 88.905848, 89.904704, 92.906378, 97.905408,
    97.907216, 101.904350, 102.905504, 105.903483, 106.905093, 113.903358,
    114.903878, 119.902197, 120.903818, 129.906223, 126.904468, 131.904154,
    132.905447, 137.905241, 138.906348, 139.905435, 140.907648, 141.907719,
    144.912744, 151.919729, 152.921227, 157.924101, 158.925343, 163.929171,
    164.930319, 165.930290, 168.934211, 173.938858, 174.940768, 179.946549,
    180.947996, 183.950933, 186.955751, 191.961479, 192.962924, 194.964774,
    196.966552, 201.970626, 204.974412, 207.976636, 208.980383, 208.982416,
    209.987131, 222.017570, 223.019731, 226.025403, 227.027747, 232.038050,
    231.035879, 238.050783, 237.048167, 244.064198, 243.061373, 247.070347,
    247.070299, 251.079580, 252.082970, 257.095099, 258.098425, 259.101024,
    262.109692, 267.121790, 268.125670, 271.133930, 272.138260, 270.134290,
    276.151590, 281.164510, 280.165140, 285.177120, 284.178730, 289.190420,
    288.192740, 293.204490, 292.207460, 294.213920,
];

const COVALENT_RADII: [f64; 118] = [
    0.31, 0.28, 1.28, 0.96, 0.84, 0.76, 0.71, 0.66, 0.57, 0.58, 1.66, 1.41,
    1.21, 1.11, 1.07, 1.05, 1.02, 1.06, 2.03, 1.76, 1.70, 1.60, 1.53, 1.39,
    1.39, 1.32, 1.26, 1.24, 1.32, 1.22, 1.22, 1.20, 1.19, 1.20, 1.20, 1.16,
    2.20, 1.95, 1.90, 1.75, 1.64, 1.54, 1.47, 1.46, 1.42, 1.39, 1.45, 1.44,
    1.42, 1.39, 1.39, 1.38, 1.39, 1.40, 2.44, 2.15, 2.07, 2.04, 2.03, 2.01,
    1.99, 1.98, 1.98, 1.96, 1.94, 1.92, 1.92, 1.89, 1.90, 1.87, 1.87, 1.75,
    1.70, 1.62, 1.51, 1.44, 1.41, 1.36, 1.36, 1.32, 1.45, 1.46, 1.48, 1.40,
    1.50, 1.50, 2.60, 2.21, 2.15, 2.06, 2.00, 1.96, 1.90, 1.87, 1.80, 1.69,
    1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60,
    1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60, 1.60,
];

const BONDI_RADII: [f64; 118] = [
    1.20, 1.40, 1.82, 2.00, 1.92, 1.70, 1.55, 1.52, 1.47, 1.54, 2.27, 1.73,
    1.84, 2.10, 1.80, 1.80, 1.75, 1.88, 2.75, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 1.63, 1.40, 1.39, 1.87, 2.11, 1.85, 1.90, 1.85, 2.02,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 1.63, 1.72, 1.58,
    1.93, 2.17, 2.06, 2.06, 1.98, 2.16, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 1.75, 1.66, 1.55, 1.96, 2.02, 2.07, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 1.86, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
    2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00, 2.00,
];
