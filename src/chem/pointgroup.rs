//! Schoenflies point group detection.
//!
//! The conformer is centered on its center of mass and classified from its
//! principal moments. Candidate symmetry elements are generated from the
//! principal axes, atom positions, and the midpoints, differences and
//! normals of pairs of like atoms; an operation is accepted when it maps
//! every atom onto an atom of the same element within the distance
//! tolerance.

use super::geometry::inertia_tensor;
use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use crate::model::types::Element;
use nalgebra::{Matrix3, Rotation3, SymmetricEigen, Unit, Vector3};
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Relative tolerance when comparing principal moments.
const MOMENT_TOLERANCE: f64 = 0.01;
const PARALLEL: f64 = 0.999;
const MAX_ORDER: usize = 6;

/// A Schoenflies point group with its rotational symmetry number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointGroup {
    pub symbol: String,
    /// Number of proper rotations in the group, the identity included.
    pub symmetry_number: usize,
}

impl PointGroup {
    fn new(symbol: impl Into<String>, symmetry_number: usize) -> Self {
        Self {
            symbol: symbol.into(),
            symmetry_number,
        }
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

struct Frame {
    elements: Vec<Element>,
    positions: Vec<Vector3<f64>>,
    tolerance: f64,
}

impl Frame {
    fn is_symmetry(&self, op: &Matrix3<f64>) -> bool {
        self.positions.iter().zip(&self.elements).all(|(p, el)| {
            let image = op * p;
            self.positions
                .iter()
                .zip(&self.elements)
                .any(|(q, other)| other == el && (image - q).norm() < self.tolerance)
        })
    }

    fn has_rotation(&self, axis: &Unit<Vector3<f64>>, order: usize) -> bool {
        self.is_symmetry(&rotation(axis, order))
    }

    fn has_mirror(&self, normal: &Unit<Vector3<f64>>) -> bool {
        self.is_symmetry(&reflection(normal))
    }

    fn has_improper(&self, axis: &Unit<Vector3<f64>>, order: usize) -> bool {
        self.is_symmetry(&(reflection(axis) * rotation(axis, order)))
    }

    fn has_inversion(&self) -> bool {
        self.is_symmetry(&(-Matrix3::identity()))
    }

    /// Highest rotation order found on any candidate axis.
    fn highest_rotation(&self, axes: &[Unit<Vector3<f64>>]) -> Option<(usize, Unit<Vector3<f64>>)> {
        (2..=MAX_ORDER).rev().find_map(|order| {
            axes.iter()
                .find(|axis| self.has_rotation(axis, order))
                .map(|axis| (order, *axis))
        })
    }
}

fn rotation(axis: &Unit<Vector3<f64>>, order: usize) -> Matrix3<f64> {
    Rotation3::from_axis_angle(axis, 2.0 * PI / order as f64).into_inner()
}

fn reflection(normal: &Unit<Vector3<f64>>) -> Matrix3<f64> {
    let n = normal.into_inner();
    Matrix3::identity() - 2.0 * n * n.transpose()
}

fn push_axis(axes: &mut Vec<Unit<Vector3<f64>>>, v: Vector3<f64>) {
    if v.norm() < 1e-3 {
        return;
    }
    let unit = Unit::new_normalize(v);
    if !axes.iter().any(|a| a.dot(&unit).abs() > PARALLEL) {
        axes.push(unit);
    }
}

fn candidate_axes(frame: &Frame, principal: &[Vector3<f64>; 3]) -> Vec<Unit<Vector3<f64>>> {
    let mut axes = Vec::new();
    for v in principal {
        push_axis(&mut axes, *v);
    }
    let n = frame.positions.len();
    for i in 0..n {
        push_axis(&mut axes, frame.positions[i]);
        for j in (i + 1)..n {
            if frame.elements[i] != frame.elements[j] {
                continue;
            }
            let (a, b) = (frame.positions[i], frame.positions[j]);
            push_axis(&mut axes, a + b);
            push_axis(&mut axes, a - b);
            push_axis(&mut axes, a.cross(&b));
        }
    }
    axes
}

fn perpendicular(axes: &[Unit<Vector3<f64>>], main: &Unit<Vector3<f64>>) -> Vec<Unit<Vector3<f64>>> {
    axes.iter()
        .filter(|a| a.dot(main).abs() < 1.0 - PARALLEL)
        .copied()
        .collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= MOMENT_TOLERANCE * a.abs().max(b.abs()).max(1e-9)
}

fn classify_linear(frame: &Frame) -> PointGroup {
    if frame.has_inversion() {
        PointGroup::new("D*h", 2)
    } else {
        PointGroup::new("C*v", 1)
    }
}

fn classify_spherical(frame: &Frame, axes: &[Unit<Vector3<f64>>]) -> PointGroup {
    let inversion = frame.has_inversion();
    if axes.iter().any(|a| frame.has_rotation(a, 5)) {
        return if inversion { PointGroup::new("Ih", 60) } else { PointGroup::new("I", 60) };
    }
    if axes.iter().any(|a| frame.has_rotation(a, 4)) {
        return if inversion { PointGroup::new("Oh", 24) } else { PointGroup::new("O", 24) };
    }
    if inversion {
        PointGroup::new("Th", 12)
    } else if axes.iter().any(|a| frame.has_mirror(a)) {
        PointGroup::new("Td", 12)
    } else {
        PointGroup::new("T", 12)
    }
}

fn classify_axial(frame: &Frame, axes: &[Unit<Vector3<f64>>], order: usize, main: Unit<Vector3<f64>>) -> PointGroup {
    let side = perpendicular(axes, &main);
    let horizontal = frame.has_mirror(&main);
    let dihedral = side.iter().filter(|a| frame.has_rotation(a, 2)).count() >= order;

    if dihedral {
        if horizontal {
            PointGroup::new(format!("D{order}h"), 2 * order)
        } else if side.iter().any(|a| frame.has_mirror(a)) {
            PointGroup::new(format!("D{order}d"), 2 * order)
        } else {
            PointGroup::new(format!("D{order}"), 2 * order)
        }
    } else if horizontal {
        PointGroup::new(format!("C{order}h"), order)
    } else if side.iter().any(|a| frame.has_mirror(a)) {
        PointGroup::new(format!("C{order}v"), order)
    } else if frame.has_improper(&main, 2 * order) {
        PointGroup::new(format!("S{}", 2 * order), order)
    } else {
        PointGroup::new(format!("C{order}"), order)
    }
}

fn classify_asymmetric(frame: &Frame, axes: &[Unit<Vector3<f64>>]) -> PointGroup {
    if axes.iter().any(|a| frame.has_mirror(a)) {
        PointGroup::new("Cs", 1)
    } else if frame.has_inversion() {
        PointGroup::new("Ci", 1)
    } else {
        PointGroup::new("C1", 1)
    }
}

/// Point group of `conformer`, whose rows follow the atoms of `graph`.
///
/// `tolerance` is the largest distance in Å between an atom's image and a
/// matching atom.
pub fn point_group(graph: &MolGraph, conformer: &Conformer, tolerance: f64) -> PointGroup {
    if graph.atom_count() <= 1 {
        return PointGroup::new("Kh", 1);
    }
    let weights: Vec<f64> = graph.atoms.iter().map(|a| a.element.atomic_mass()).collect();
    let center = conformer.weighted_center(&weights);
    let frame = Frame {
        elements: graph.atoms.iter().map(|a| a.element).collect(),
        positions: conformer.centered_on(center).into_iter().map(Vector3::from).collect(),
        tolerance,
    };

    let eigen = SymmetricEigen::new(inertia_tensor(graph, conformer));
    let mut order = [0, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
    let moments = order.map(|k| eigen.eigenvalues[k].max(0.0));
    let principal = order.map(|k| eigen.eigenvectors.column(k).into_owned());

    let group = if moments[0] < MOMENT_TOLERANCE * moments[2].max(1e-9) && close(moments[1], moments[2]) {
        classify_linear(&frame)
    } else {
        let axes = candidate_axes(&frame, &principal);
        if close(moments[0], moments[1]) && close(moments[1], moments[2]) {
            classify_spherical(&frame, &axes)
        } else {
            match frame.highest_rotation(&axes) {
                Some((n, main)) => classify_axial(&frame, &axes, n, main),
                None => classify_asymmetric(&frame, &axes),
            }
        }
    };
    debug!(symbol = %group.symbol, symmetry_number = group.symmetry_number, "assigned point group");
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::BondOrder;

    fn build(atoms: &[(Element, [f64; 3])]) -> (MolGraph, Conformer) {
        let mut g = MolGraph::new();
        for (el, _) in atoms {
            g.add_atom(Atom::new(*el));
        }
        for j in 1..atoms.len() {
            g.add_bond(0, j, BondOrder::Single);
        }
        (g, Conformer::new(atoms.iter().map(|(_, p)| *p).collect()))
    }

    fn group(atoms: &[(Element, [f64; 3])]) -> PointGroup {
        let (g, c) = build(atoms);
        point_group(&g, &c, 0.3)
    }

    #[test]
    fn water_is_c2v() {
        let pg = group(&[
            (Element::O, [0.0, 0.0, 0.1173]),
            (Element::H, [0.0, 0.7572, -0.4692]),
            (Element::H, [0.0, -0.7572, -0.4692]),
        ]);
        assert_eq!(pg, PointGroup::new("C2v", 2));
    }

    #[test]
    fn ammonia_is_c3v() {
        let r = 0.94;
        let mut atoms = vec![(Element::N, [0.0, 0.0, 0.38])];
        for k in 0..3 {
            let t = 2.0 * PI * k as f64 / 3.0;
            atoms.push((Element::H, [r * t.cos(), r * t.sin(), 0.0]));
        }
        assert_eq!(group(&atoms), PointGroup::new("C3v", 3));
    }

    #[test]
    fn methane_is_td() {
        let s = 0.629;
        let pg = group(&[
            (Element::C, [0.0; 3]),
            (Element::H, [s, s, s]),
            (Element::H, [s, -s, -s]),
            (Element::H, [-s, s, -s]),
            (Element::H, [-s, -s, s]),
        ]);
        assert_eq!(pg, PointGroup::new("Td", 12));
    }

    #[test]
    fn octahedron_is_oh() {
        let mut atoms = vec![(Element::S, [0.0; 3])];
        for axis in 0..3 {
            for sign in [1.56, -1.56] {
                let mut p = [0.0; 3];
                p[axis] = sign;
                atoms.push((Element::F, p));
            }
        }
        assert_eq!(group(&atoms), PointGroup::new("Oh", 24));
    }

    #[test]
    fn benzene_is_d6h() {
        let mut g = MolGraph::new();
        let mut positions = Vec::new();
        for k in 0..6 {
            let t = PI * k as f64 / 3.0;
            g.add_atom(Atom::new(Element::C));
            positions.push([1.39 * t.cos(), 1.39 * t.sin(), 0.0]);
        }
        for k in 0..6 {
            let t = PI * k as f64 / 3.0;
            let h = g.add_atom(Atom::new(Element::H));
            g.add_bond(k, h, BondOrder::Single);
            positions.push([2.47 * t.cos(), 2.47 * t.sin(), 0.0]);
        }
        let pg = point_group(&g, &Conformer::new(positions), 0.3);
        assert_eq!(pg, PointGroup::new("D6h", 12));
    }

    #[test]
    fn linear_molecules() {
        let co2 = group(&[
            (Element::C, [0.0; 3]),
            (Element::O, [1.16, 0.0, 0.0]),
            (Element::O, [-1.16, 0.0, 0.0]),
        ]);
        assert_eq!(co2, PointGroup::new("D*h", 2));
        let hcn = group(&[
            (Element::C, [0.0; 3]),
            (Element::H, [-1.07, 0.0, 0.0]),
            (Element::N, [1.16, 0.0, 0.0]),
        ]);
        assert_eq!(hcn, PointGroup::new("C*v", 1));
    }

    #[test]
    fn asymmetric_molecule_is_c1() {
        let pg = group(&[
            (Element::C, [0.0; 3]),
            (Element::F, [0.0, 0.0, 1.35]),
            (Element::Cl, [1.7, 0.0, -0.6]),
            (Element::Br, [-0.9, 1.6, -0.6]),
            (Element::H, [-0.5, -0.9, -0.4]),
        ]);
        assert_eq!(pg, PointGroup::new("C1", 1));
    }

    #[test]
    fn single_atom() {
        assert_eq!(group(&[(Element::He, [0.0; 3])]).symbol, "Kh");
    }
}
