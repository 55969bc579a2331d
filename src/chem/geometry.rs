//! Shape descriptors of a conformer.
//!
//! Moments follow the usual definitions: the inertia tensor is mass
//! weighted and taken about the center of mass, principal moments are its
//! eigenvalues in ascending order. Ratios whose denominator vanishes (a
//! single atom, or a linear molecule for some descriptors) are reported as 0.

use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use std::f64::consts::PI;

fn masses(graph: &MolGraph) -> Vec<f64> {
    graph.atoms.iter().map(|a| a.element.atomic_mass()).collect()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den.abs() < 1e-12 { 0.0 } else { num / den }
}

fn sorted_eigenvalues(tensor: Matrix3<f64>) -> [f64; 3] {
    let eigen = SymmetricEigen::new(tensor);
    let mut values = [
        eigen.eigenvalues[0].max(0.0),
        eigen.eigenvalues[1].max(0.0),
        eigen.eigenvalues[2].max(0.0),
    ];
    values.sort_by(f64::total_cmp);
    values
}

/// Mass-weighted inertia tensor about the center of mass, in amu·Å².
pub fn inertia_tensor(graph: &MolGraph, conformer: &Conformer) -> Matrix3<f64> {
    let weights = masses(graph);
    let center = conformer.weighted_center(&weights);
    let mut tensor = Matrix3::zeros();
    for (p, &m) in conformer.centered_on(center).iter().zip(&weights) {
        let r = Vector3::from(*p);
        tensor += m * (Matrix3::identity() * r.dot(&r) - r * r.transpose());
    }
    tensor
}

/// Principal moments of inertia in ascending order.
pub fn principal_moments(graph: &MolGraph, conformer: &Conformer) -> [f64; 3] {
    sorted_eigenvalues(inertia_tensor(graph, conformer))
}

/// Normalized principal moment ratios `I1/I3` and `I2/I3`.
pub fn npr(graph: &MolGraph, conformer: &Conformer) -> [f64; 2] {
    let [i1, i2, i3] = principal_moments(graph, conformer);
    [ratio(i1, i3), ratio(i2, i3)]
}

/// Mass-weighted radius of gyration in Å.
pub fn radius_of_gyration(graph: &MolGraph, conformer: &Conformer) -> f64 {
    let weights = masses(graph);
    let total: f64 = weights.iter().sum();
    let center = conformer.weighted_center(&weights);
    let moment: f64 = conformer
        .centered_on(center)
        .iter()
        .zip(&weights)
        .map(|(p, m)| m * (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]))
        .sum();
    ratio(moment, total).sqrt()
}

/// `I2 / (I1 · I3)`.
pub fn inertial_shape_factor(graph: &MolGraph, conformer: &Conformer) -> f64 {
    let [i1, i2, i3] = principal_moments(graph, conformer);
    ratio(i2, i1 * i3)
}

/// `sqrt(I3² − I1²) / I3`.
pub fn eccentricity(graph: &MolGraph, conformer: &Conformer) -> f64 {
    let [i1, _, i3] = principal_moments(graph, conformer);
    ratio((i3 * i3 - i1 * i1).max(0.0).sqrt(), i3)
}

/// Deviation of the principal moments from a sphere, in `[0, 1]`.
pub fn asphericity(graph: &MolGraph, conformer: &Conformer) -> f64 {
    let [i1, i2, i3] = principal_moments(graph, conformer);
    let spread = (i3 - i2).powi(2) + (i3 - i1).powi(2) + (i2 - i1).powi(2);
    ratio(0.5 * spread, i1 * i1 + i2 * i2 + i3 * i3)
}

/// Spherocity index `3·λmin / Σλ` of the unweighted covariance matrix.
pub fn spherocity_index(conformer: &Conformer) -> f64 {
    let n = conformer.len();
    if n == 0 {
        return 0.0;
    }
    let mut cov = Matrix3::zeros();
    for p in conformer.centered_on(conformer.centroid()) {
        let r = Vector3::from(p);
        cov += r * r.transpose();
    }
    cov /= n as f64;
    let [l1, l2, l3] = sorted_eigenvalues(cov);
    ratio(3.0 * l1, l1 + l2 + l3)
}

/// Van der Waals volume of every atom in Å³.
///
/// Each atom is a sphere of its Bondi radius, less the caps cut off by the
/// spheres of its bonded neighbours.
pub fn atom_volumes(graph: &MolGraph, conformer: &Conformer) -> Vec<f64> {
    (0..graph.atom_count())
        .map(|i| {
            let ri = graph.atoms[i].element.vdw_radius();
            let sphere = 4.0 / 3.0 * PI * ri.powi(3);
            let caps: f64 = graph
                .neighbors(i)
                .map(|j| {
                    let rj = graph.atoms[j].element.vdw_radius();
                    let d = conformer.distance(i, j);
                    if d >= ri + rj || d <= 1e-9 {
                        return 0.0;
                    }
                    let h = (ri - (d * d + ri * ri - rj * rj) / (2.0 * d)).clamp(0.0, 2.0 * ri);
                    PI * h * h * (3.0 * ri - h) / 3.0
                })
                .sum();
            (sphere - caps).max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{BondOrder, Element};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// Octahedral SF6-like arrangement: a spherical top.
    fn octahedron() -> (MolGraph, Conformer) {
        let mut g = MolGraph::new();
        let s = g.add_atom(Atom::new(Element::S));
        let mut positions = vec![[0.0; 3]];
        for axis in 0..3 {
            for sign in [1.0, -1.0] {
                let f = g.add_atom(Atom::new(Element::F));
                g.add_bond(s, f, BondOrder::Single);
                let mut p = [0.0; 3];
                p[axis] = sign * 1.56;
                positions.push(p);
            }
        }
        (g, Conformer::new(positions))
    }

    /// Linear CO2.
    fn linear() -> (MolGraph, Conformer) {
        let mut g = MolGraph::new();
        let c = g.add_atom(Atom::new(Element::C));
        let o1 = g.add_atom(Atom::new(Element::O));
        let o2 = g.add_atom(Atom::new(Element::O));
        g.add_bond(c, o1, BondOrder::Double);
        g.add_bond(c, o2, BondOrder::Double);
        (g, Conformer::new(vec![[0.0; 3], [1.16, 0.0, 0.0], [-1.16, 0.0, 0.0]]))
    }

    #[test]
    fn spherical_top_has_equal_moments() {
        let (g, c) = octahedron();
        let [i1, i2, i3] = principal_moments(&g, &c);
        assert!(approx(i1, i2) && approx(i2, i3));
        assert!(approx(asphericity(&g, &c), 0.0));
        assert!(approx(eccentricity(&g, &c), 0.0));
        let [npr1, npr2] = npr(&g, &c);
        assert!(approx(npr1, 1.0) && approx(npr2, 1.0));
        assert!(approx(spherocity_index(&c), 1.0));
    }

    #[test]
    fn linear_molecule_moments() {
        let (g, c) = linear();
        let [i1, i2, i3] = principal_moments(&g, &c);
        assert!(approx(i1, 0.0));
        assert!(approx(i2, i3));
        let expected = 2.0 * Element::O.atomic_mass() * 1.16 * 1.16;
        assert!((i3 - expected).abs() < 1e-6);
        assert!(approx(eccentricity(&g, &c), 1.0));
        assert!(approx(asphericity(&g, &c), 0.5));
        assert!(approx(spherocity_index(&c), 0.0));
    }

    #[test]
    fn radius_of_gyration_of_linear_molecule() {
        let (g, c) = linear();
        let m_o = Element::O.atomic_mass();
        let total = m_o * 2.0 + Element::C.atomic_mass();
        let expected = (2.0 * m_o * 1.16 * 1.16 / total).sqrt();
        assert!(approx(radius_of_gyration(&g, &c), expected));
    }

    #[test]
    fn single_atom_ratios_are_zero() {
        let g = MolGraph::from_parts(vec![Atom::new(Element::O)], vec![]);
        let c = Conformer::new(vec![[0.0; 3]]);
        assert_eq!(npr(&g, &c), [0.0, 0.0]);
        assert_eq!(inertial_shape_factor(&g, &c), 0.0);
        assert_eq!(radius_of_gyration(&g, &c), 0.0);
    }

    #[test]
    fn bonded_atoms_lose_volume() {
        let (g, c) = linear();
        let volumes = atom_volumes(&g, &c);
        let free_c = 4.0 / 3.0 * PI * Element::C.vdw_radius().powi(3);
        assert_eq!(volumes.len(), 3);
        assert!(volumes[0] < free_c && volumes[0] > 0.0);
        assert!(approx(volumes[1], volumes[2]));
    }
}
