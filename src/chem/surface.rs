//! Solvent accessible surface (Shrake–Rupley).

use crate::config::SasaSettings;
use crate::model::conformer::{Conformer, distance};
use crate::model::graph::MolGraph;
use std::f64::consts::PI;

/// Solvent accessible surface of a conformer.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Accessible area of each atom in Å².
    pub atom_areas: Vec<f64>,
    /// Sum of the atomic areas in Å².
    pub total_area: f64,
    /// Volume enclosed by the accessible surface in Å³.
    pub volume: f64,
}

/// `count` points spread evenly over the unit sphere along a golden-angle spiral.
pub fn sphere_points(count: usize) -> Vec<[f64; 3]> {
    let golden = PI * (3.0 - 5f64.sqrt());
    (0..count)
        .map(|k| {
            let z = 1.0 - (2.0 * k as f64 + 1.0) / count as f64;
            let r = (1.0 - z * z).max(0.0).sqrt();
            let phi = golden * k as f64;
            [r * phi.cos(), r * phi.sin(), z]
        })
        .collect()
}

/// Computes the accessible surface with Bondi radii enlarged by the solvent radius.
///
/// The enclosed volume follows from the divergence theorem, summing
/// `p · n dA / 3` over the accessible points.
pub fn solvent_accessible_surface(
    graph: &MolGraph,
    conformer: &Conformer,
    settings: &SasaSettings,
) -> Surface {
    let n = graph.atom_count().min(conformer.len());
    let points = sphere_points(settings.points.max(1));
    let radii: Vec<f64> = graph.atoms[..n]
        .iter()
        .map(|a| a.element.vdw_radius() + settings.solvent_radius)
        .collect();
    let centers = &conformer.positions;

    let mut atom_areas = Vec::with_capacity(n);
    let mut volume = 0.0;
    for i in 0..n {
        let ri = radii[i];
        let near: Vec<usize> = (0..n)
            .filter(|&j| j != i && distance(&centers[i], &centers[j]) < ri + radii[j])
            .collect();
        let patch = 4.0 * PI * ri * ri / points.len() as f64;

        let mut exposed = 0usize;
        for unit in &points {
            let p = [
                centers[i][0] + ri * unit[0],
                centers[i][1] + ri * unit[1],
                centers[i][2] + ri * unit[2],
            ];
            if near.iter().all(|&j| distance(&p, &centers[j]) >= radii[j]) {
                exposed += 1;
                volume += (p[0] * unit[0] + p[1] * unit[1] + p[2] * unit[2]) * patch / 3.0;
            }
        }
        atom_areas.push(exposed as f64 * patch);
    }

    Surface {
        total_area: atom_areas.iter().sum(),
        atom_areas,
        volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::Element;

    fn atoms(positions: &[[f64; 3]]) -> (MolGraph, Conformer) {
        let g = MolGraph::from_parts(
            positions.iter().map(|_| Atom::new(Element::O)).collect(),
            vec![],
        );
        (g, Conformer::new(positions.to_vec()))
    }

    #[test]
    fn isolated_atom_is_a_full_sphere() {
        let (g, c) = atoms(&[[1.0, -2.0, 0.5]]);
        let s = solvent_accessible_surface(&g, &c, &SasaSettings::default());
        let r: f64 = 1.52 + 1.4;
        assert!((s.total_area - 4.0 * PI * r * r).abs() < 1e-6);
        let expected = 4.0 / 3.0 * PI * r.powi(3);
        assert!((s.volume - expected).abs() / expected < 0.02, "volume {}", s.volume);
    }

    #[test]
    fn distant_atoms_are_additive() {
        let (g, c) = atoms(&[[0.0; 3], [20.0, 0.0, 0.0]]);
        let s = solvent_accessible_surface(&g, &c, &SasaSettings::default());
        assert!((s.atom_areas[0] - s.atom_areas[1]).abs() < 1e-9);
        assert!((s.total_area - 2.0 * s.atom_areas[0]).abs() < 1e-9);
    }

    #[test]
    fn overlapping_atoms_bury_surface() {
        let (g, far) = atoms(&[[0.0; 3], [20.0, 0.0, 0.0]]);
        let (_, near) = atoms(&[[0.0; 3], [1.2, 0.0, 0.0]]);
        let settings = SasaSettings::default();
        let apart = solvent_accessible_surface(&g, &far, &settings);
        let close = solvent_accessible_surface(&g, &near, &settings);
        assert!(close.total_area < apart.total_area);
        assert!(close.volume < apart.volume);
        assert!(close.volume > apart.volume / 2.0);
    }

    #[test]
    fn spiral_points_are_unit_vectors() {
        for p in sphere_points(100) {
            let norm = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }
}
