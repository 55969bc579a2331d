//! In-crate perception toolkit.
//!
//! Line-notation readers produce a raw [`MolGraph`]; [`sanitize`] then
//! assigns implicit hydrogens, finds rings and perceives aromaticity. The
//! remaining submodules compute descriptors and geometry on sanitized graphs.
//!
//! - [`smiles`] / [`selfies`] / [`writer`] — line notation input and output
//! - [`rings`] / [`aromaticity`] / [`valence`] — structure perception
//! - [`canon`] — symmetry classes and graph hashing
//! - [`stereo`] — chiral center detection
//! - [`descriptors`] / [`druglikeness`] — topological descriptors and filters
//! - [`smarts`] — substructure patterns and matching
//! - [`embed`] — distance-geometry conformer generation
//! - [`forcefield`] — valence force field for geometry cleanup
//! - [`geometry`] — inertia tensors, shape descriptors and atomic volumes
//! - [`pointgroup`] — Schoenflies point group detection
//! - [`surface`] — solvent accessible surface and volume
//! - [`depict`] — SVG depiction

pub mod aromaticity;
pub mod canon;
pub mod depict;
pub mod descriptors;
pub mod druglikeness;
pub mod embed;
pub mod forcefield;
pub mod geometry;
pub mod pointgroup;
pub mod rings;
pub mod selfies;
pub mod smarts;
pub mod smiles;
pub mod stereo;
pub mod surface;
pub mod valence;
pub mod writer;

mod error;

pub use error::Error;
pub use rings::RingInfo;

use crate::model::graph::MolGraph;
use crate::model::types::BondOrder;
use tracing::debug;

/// Completes a freshly parsed graph.
///
/// Implicit hydrogens are assigned, the SSSR is computed and Hückel
/// aromaticity is perceived. Aromatic bonds outside rings are demoted to
/// single bonds and aromatic flags on acyclic atoms are cleared.
///
/// # Errors
///
/// Returns [`Error::EmptyMolecule`] for a graph without atoms and
/// [`Error::Valence`] when an atom exceeds its permitted valence.
pub fn sanitize(mut graph: MolGraph) -> Result<(MolGraph, RingInfo), Error> {
    if graph.atom_count() == 0 {
        return Err(Error::EmptyMolecule);
    }
    valence::assign_implicit_hydrogens(&mut graph)?;
    let rings = rings::find_sssr(&graph);
    let systems = aromaticity::perceive(&mut graph, &rings);

    for (bi, bond) in graph.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic && !rings.is_bond_in_ring(bi) {
            bond.order = BondOrder::Single;
        }
    }
    for (ai, atom) in graph.atoms.iter_mut().enumerate() {
        if atom.aromatic && !rings.is_atom_in_ring(ai) {
            atom.aromatic = false;
        }
    }

    debug!(
        atoms = graph.atom_count(),
        bonds = graph.bond_count(),
        rings = rings.num_rings(),
        aromatic_systems = systems,
        "sanitized molecular graph"
    );
    Ok((graph, rings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_assigns_hydrogens_and_rings() {
        let (g, rings) = sanitize(smiles::parse("c1ccccc1-c1ccccc1").unwrap()).unwrap();
        assert_eq!(rings.num_rings(), 2);
        let link = g.bond_between(0, 6).unwrap();
        assert_eq!(g.bonds[link].order, BondOrder::Single);
        assert_eq!(g.hydrogen_count(), 10);
    }

    #[test]
    fn sanitize_rejects_empty_graph() {
        assert_eq!(sanitize(MolGraph::new()).unwrap_err(), Error::EmptyMolecule);
    }
}
