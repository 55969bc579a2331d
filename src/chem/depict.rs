//! SVG depiction of a conformer.
//!
//! Heavy atoms are projected onto the plane spanned by the two largest
//! principal axes of their coordinates, scaled into the canvas and drawn as
//! a line drawing. Carbon atoms are unlabelled; other elements show their
//! symbol, hydrogen count and charge.

use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use std::fmt::Write;

const MARGIN: f64 = 30.0;
const DOUBLE_OFFSET: f64 = 3.0;

fn project(points: &[Vector3<f64>]) -> Vec<[f64; 2]> {
    if points.is_empty() {
        return Vec::new();
    }
    let center = points.iter().sum::<Vector3<f64>>() / points.len() as f64;
    let mut cov = Matrix3::zeros();
    for p in points {
        let r = p - center;
        cov += r * r.transpose();
    }
    let eigen = SymmetricEigen::new(cov);
    let mut order = [0, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let u = eigen.eigenvectors.column(order[0]).into_owned();
    let v = eigen.eigenvectors.column(order[1]).into_owned();
    points
        .iter()
        .map(|p| {
            let r = p - center;
            [r.dot(&u), r.dot(&v)]
        })
        .collect()
}

fn label(graph: &MolGraph, atom: usize) -> Option<String> {
    let a = &graph.atoms[atom];
    if a.element == Element::C && a.formal_charge == 0 {
        return None;
    }
    let mut text = a.element.symbol().to_string();
    match graph.total_hydrogens(atom) {
        0 => {}
        1 => text.push('H'),
        h => {
            let _ = write!(text, "H{h}");
        }
    }
    match a.formal_charge {
        0 => {}
        1 => text.push('+'),
        -1 => text.push('-'),
        c if c > 0 => {
            let _ = write!(text, "{c}+");
        }
        c => {
            let _ = write!(text, "{}-", -c);
        }
    }
    Some(text)
}

fn color(element: Element) -> &'static str {
    match element {
        Element::N => "#0000FF",
        Element::O => "#FF0000",
        Element::S => "#CCCC00",
        Element::F | Element::Cl => "#00CC00",
        Element::Br => "#A52A2A",
        Element::I => "#940094",
        Element::P => "#FF8000",
        _ => "#000000",
    }
}

/// Renders `graph` with coordinates from `conformer` as a `size` × `size` SVG document.
pub fn svg(graph: &MolGraph, conformer: &Conformer, size: u32) -> String {
    let heavy: Vec<usize> = (0..graph.atom_count().min(conformer.len()))
        .filter(|&i| !graph.atoms[i].is_hydrogen())
        .collect();
    let points: Vec<Vector3<f64>> = heavy
        .iter()
        .map(|&i| Vector3::from(conformer.positions[i]))
        .collect();
    let flat = project(&points);

    let side = f64::from(size);
    let (min_x, max_x, min_y, max_y) = flat.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(a, b, c, d), p| (a.min(p[0]), b.max(p[0]), c.min(p[1]), d.max(p[1])),
    );
    let span = (max_x - min_x).max(max_y - min_y).max(1e-6);
    let scale = ((side - 2.0 * MARGIN) / span).min(40.0);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    let mut canvas = vec![[0.0; 2]; graph.atom_count()];
    for (k, &i) in heavy.iter().enumerate() {
        let p = flat[k];
        canvas[i] = [side / 2.0 + scale * (p[0] - mid_x), side / 2.0 - scale * (p[1] - mid_y)];
    }
    let is_heavy = |i: usize| !graph.atoms[i].is_hydrogen();

    let mut out = String::new();
    out.push_str("<?xml version='1.0' encoding='iso-8859-1'?>\n");
    let _ = writeln!(
        out,
        "<svg version='1.1' baseProfile='full' xmlns='http://www.w3.org/2000/svg' \
         xml:space='preserve' width='{size}px' height='{size}px' viewBox='0 0 {size} {size}'>"
    );
    let _ = writeln!(
        out,
        "<rect style='opacity:1.0;fill:#FFFFFF;stroke:none' width='{size}' height='{size}' x='0' y='0'> </rect>"
    );

    for b in graph.bonds.iter().filter(|b| is_heavy(b.i) && is_heavy(b.j)) {
        let (p, q) = (canvas[b.i], canvas[b.j]);
        let lines = match b.order {
            BondOrder::Double | BondOrder::Aromatic => 2,
            BondOrder::Triple => 3,
            _ => 1,
        };
        let (dx, dy) = (q[0] - p[0], q[1] - p[1]);
        let len = (dx * dx + dy * dy).sqrt().max(1e-6);
        let (nx, ny) = (-dy / len, dx / len);
        for k in 0..lines {
            let shift = (k as f64 - (lines - 1) as f64 / 2.0) * DOUBLE_OFFSET;
            let dash = if b.order == BondOrder::Aromatic && k == 1 {
                ";stroke-dasharray:4,2"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "<path class='bond-{}-{}' d='M {:.1},{:.1} L {:.1},{:.1}' style='fill:none;stroke:#000000;stroke-width:2.0px{dash}' />",
                b.i,
                b.j,
                p[0] + nx * shift,
                p[1] + ny * shift,
                q[0] + nx * shift,
                q[1] + ny * shift,
            );
        }
    }

    for &i in &heavy {
        if let Some(text) = label(graph, i) {
            let [x, y] = canvas[i];
            let _ = writeln!(
                out,
                "<text class='atom-{i}' x='{x:.1}' y='{:.1}' text-anchor='middle' \
                 style='font-size:14px;font-family:sans-serif;fill:{};stroke:#FFFFFF;stroke-width:3px;paint-order:stroke'>{text}</text>",
                y + 5.0,
                color(graph.atoms[i].element),
            );
        }
    }
    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    fn ethanol() -> (MolGraph, Conformer) {
        let mut g = MolGraph::new();
        let c1 = g.add_atom(Atom::new(Element::C));
        let c2 = g.add_atom(Atom::new(Element::C));
        let o = g.add_atom(Atom::new(Element::O));
        let h = g.add_atom(Atom::new(Element::H));
        g.add_bond(c1, c2, BondOrder::Single);
        g.add_bond(c2, o, BondOrder::Single);
        g.add_bond(o, h, BondOrder::Single);
        let conf = Conformer::new(vec![
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [2.0, 1.4, 0.0],
            [2.9, 1.5, 0.0],
        ]);
        (g, conf)
    }

    #[test]
    fn document_is_an_svg() {
        let (g, c) = ethanol();
        let doc = svg(&g, &c, 300);
        assert!(doc.starts_with("<?xml version='1.0' encoding='iso-8859-1'?>\n<svg"));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn only_heavy_bonds_are_drawn() {
        let (g, c) = ethanol();
        let doc = svg(&g, &c, 300);
        assert_eq!(doc.matches("<path").count(), 2);
        assert!(doc.contains(">OH</text>"));
        assert!(!doc.contains(">C</text>"));
    }

    #[test]
    fn drawing_fits_the_canvas() {
        let (g, c) = ethanol();
        let doc = svg(&g, &c, 200);
        for token in doc.split(['M', 'L', ',', ' ']) {
            if let Ok(v) = token.trim().parse::<f64>() {
                assert!((0.0..=200.0).contains(&v), "coordinate {v} off canvas");
            }
        }
    }
}
