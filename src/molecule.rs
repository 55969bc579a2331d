use crate::chem::{self, RingInfo};
use crate::config;
use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use std::fmt;
use std::sync::OnceLock;

/// Line notation a [`Molecule`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Smiles,
    Selfies,
}

impl Representation {
    /// Name of the notation as rendered in prompts.
    pub fn system(&self) -> &'static str {
        match self {
            Representation::Smiles => "SMILES",
            Representation::Selfies => "SELFIES",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.system())
    }
}

/// A sanitized molecule together with the string it was read from.
///
/// Molecules read from SMILES are presented through their canonical SMILES,
/// so different spellings of one structure render identical prompts; the
/// caller's string stays available through [`input`](Molecule::input).
/// SELFIES input is presented as given.
///
/// The heavy-atom graph and its rings are computed eagerly. The
/// explicit-hydrogen graph and the 3-D conformer are derived on first use
/// and cached; the conformer rows follow the atoms of
/// [`graph_with_hydrogens`](Molecule::graph_with_hydrogens), whose first
/// atoms are exactly those of [`graph`](Molecule::graph).
///
/// # Examples
///
/// ```
/// use chemcaption::Molecule;
///
/// let ethanol = Molecule::from_smiles("OCC")?;
/// assert_eq!(ethanol.representation_system(), "SMILES");
/// assert_eq!(ethanol.representation_string(), "CCO");
/// assert_eq!(ethanol.input(), "OCC");
/// assert_eq!(ethanol.graph().atom_count(), 3);
/// assert_eq!(ethanol.graph_with_hydrogens().atom_count(), 9);
/// # Ok::<(), chemcaption::chem::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Molecule {
    representation: Representation,
    input: String,
    presented: String,
    graph: MolGraph,
    rings: RingInfo,
    explicit: OnceLock<MolGraph>,
    conformer: OnceLock<Conformer>,
}

impl Molecule {
    fn from_graph(representation: Representation, input: &str, raw: MolGraph) -> Result<Self, chem::Error> {
        let (graph, rings) = chem::sanitize(raw)?;
        let presented = match representation {
            Representation::Smiles => chem::writer::write(&graph),
            Representation::Selfies => input.to_string(),
        };
        Ok(Self {
            representation,
            input: input.to_string(),
            presented,
            graph,
            rings,
            explicit: OnceLock::new(),
            conformer: OnceLock::new(),
        })
    }

    /// Reads a SMILES string.
    ///
    /// # Errors
    ///
    /// Returns a [`chem::Error`] when the string is malformed or violates valence rules.
    pub fn from_smiles(smiles: &str) -> Result<Self, chem::Error> {
        Self::from_graph(Representation::Smiles, smiles, chem::smiles::parse(smiles)?)
    }

    /// Reads a SELFIES string.
    ///
    /// # Errors
    ///
    /// Returns a [`chem::Error`] when a symbol cannot be decoded or the
    /// decoded graph is empty.
    pub fn from_selfies(selfies: &str) -> Result<Self, chem::Error> {
        Self::from_graph(Representation::Selfies, selfies, chem::selfies::parse(selfies)?)
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// The string shown in prompts: canonical SMILES for SMILES input, the
    /// caller's string for SELFIES input.
    pub fn representation_string(&self) -> &str {
        &self.presented
    }

    /// The string given by the caller, unchanged.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn representation_system(&self) -> &'static str {
        self.representation.system()
    }

    /// Heavy-atom graph with implicit hydrogen counts.
    pub fn graph(&self) -> &MolGraph {
        &self.graph
    }

    /// SSSR of the heavy-atom graph; indices are valid for both graphs.
    pub fn rings(&self) -> &RingInfo {
        &self.rings
    }

    /// Graph with every hydrogen as an explicit atom.
    pub fn graph_with_hydrogens(&self) -> &MolGraph {
        self.explicit.get_or_init(|| self.graph.with_explicit_hydrogens())
    }

    /// Canonical SMILES written from the parsed graph.
    pub fn to_smiles(&self) -> String {
        match self.representation {
            Representation::Smiles => self.presented.clone(),
            Representation::Selfies => chem::writer::write(&self.graph),
        }
    }

    /// 3-D coordinates for [`graph_with_hydrogens`](Molecule::graph_with_hydrogens).
    ///
    /// Embedded with the process-wide embedding settings on first call.
    ///
    /// # Errors
    ///
    /// Returns [`chem::Error::Embedding`] when no attempt produced valid coordinates.
    pub fn conformer(&self) -> Result<&Conformer, chem::Error> {
        if let Some(conformer) = self.conformer.get() {
            return Ok(conformer);
        }
        let embedded = chem::embed::embed(self.graph_with_hydrogens(), &config::settings().embedding)?;
        Ok(self.conformer.get_or_init(|| embedded))
    }

    /// Attaches caller-provided coordinates instead of embedding.
    ///
    /// # Errors
    ///
    /// Returns [`chem::Error::ConformerMismatch`] when the number of
    /// positions differs from the explicit-hydrogen atom count.
    pub fn with_conformer(self, conformer: Conformer) -> Result<Self, chem::Error> {
        let expected = self.graph_with_hydrogens().atom_count();
        if conformer.len() != expected {
            return Err(chem::Error::ConformerMismatch {
                expected,
                found: conformer.len(),
            });
        }
        let cell = OnceLock::new();
        let _ = cell.set(conformer);
        Ok(Self {
            conformer: cell,
            ..self
        })
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.representation, self.presented)
    }
}
