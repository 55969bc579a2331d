//! Distance-geometry conformer embedding.
//!
//! Bounds on interatomic distances come from covalent radii (bonded pairs),
//! bond angles implied by hybridization (1-3 pairs) and van der Waals
//! radii (everything else). The bounds are smoothed with the triangle
//! inequality, a distance matrix is sampled within them, and the metric
//! matrix is eigendecomposed into 3-D coordinates. The coordinates are then
//! refined by gradient descent on the bound violations and finally relaxed
//! in the valence force field of [`super::forcefield`], which restores
//! planar, linear and tetrahedral centres and staggers torsions.

use super::error::Error;
use super::forcefield::{ForceField, Hybridization, bond_length};
use crate::config::EmbeddingSettings;
use crate::model::conformer::Conformer;
use crate::model::graph::MolGraph;
use nalgebra::{DMatrix, SymmetricEigen};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

const BOND_TOLERANCE: f64 = 0.01;
const ANGLE_TOLERANCE: f64 = 0.04;
/// Largest accepted deviation of a bond length from its target after refinement.
const MAX_BOND_ERROR: f64 = 0.3;

struct Bounds {
    n: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    fn lower(&self, i: usize, j: usize) -> f64 {
        self.lower[self.idx(i, j)]
    }

    fn upper(&self, i: usize, j: usize) -> f64 {
        self.upper[self.idx(i, j)]
    }

    fn set(&mut self, i: usize, j: usize, lo: f64, hi: f64) {
        let (a, b) = (self.idx(i, j), self.idx(j, i));
        self.lower[a] = lo;
        self.lower[b] = lo;
        self.upper[a] = hi;
        self.upper[b] = hi;
    }

    fn set_lower(&mut self, i: usize, j: usize, lo: f64) {
        let (a, b) = (self.idx(i, j), self.idx(j, i));
        self.lower[a] = lo;
        self.lower[b] = lo;
    }

    fn set_upper(&mut self, i: usize, j: usize, hi: f64) {
        let (a, b) = (self.idx(i, j), self.idx(j, i));
        self.upper[a] = hi;
        self.upper[b] = hi;
    }
}

fn build_bounds(graph: &MolGraph) -> Bounds {
    let n = graph.atom_count();
    let far = 3.0 + 1.6 * n as f64;
    let mut bounds = Bounds {
        n,
        lower: vec![0.0; n * n],
        upper: vec![far; n * n],
    };
    for i in 0..n {
        bounds.set(i, i, 0.0, 0.0);
        for j in (i + 1)..n {
            let vdw = graph.atoms[i].element.vdw_radius() + graph.atoms[j].element.vdw_radius();
            bounds.set(i, j, 0.6 * vdw, far);
        }
    }

    let mut fixed = vec![false; n * n];
    let mut lengths = vec![0.0; n * n];
    for (bi, b) in graph.bonds.iter().enumerate() {
        let d = bond_length(graph, bi);
        bounds.set(b.i, b.j, d - BOND_TOLERANCE, d + BOND_TOLERANCE);
        lengths[b.i * n + b.j] = d;
        lengths[b.j * n + b.i] = d;
        fixed[b.i * n + b.j] = true;
        fixed[b.j * n + b.i] = true;
    }

    for center in 0..n {
        let Some(theta) = Hybridization::perceive(graph, center).ideal_angle() else {
            continue;
        };
        let nbs: Vec<usize> = graph.neighbors(center).collect();
        for (k, &a) in nbs.iter().enumerate() {
            for &c in &nbs[k + 1..] {
                if fixed[a * n + c] {
                    continue;
                }
                let (da, dc) = (lengths[a * n + center], lengths[c * n + center]);
                let d = (da * da + dc * dc - 2.0 * da * dc * theta.cos()).sqrt();
                bounds.set(a, c, d - ANGLE_TOLERANCE, d + ANGLE_TOLERANCE);
                fixed[a * n + c] = true;
                fixed[c * n + a] = true;
            }
        }
    }
    bounds
}

/// Floyd-style triangle smoothing of the bounds.
fn smooth(bounds: &mut Bounds) {
    let n = bounds.n;
    for k in 0..n {
        for i in 0..n {
            for j in (i + 1)..n {
                if i == k || j == k {
                    continue;
                }
                let via = bounds.upper(i, k) + bounds.upper(k, j);
                if via < bounds.upper(i, j) {
                    bounds.set_upper(i, j, via);
                }
                let lo = (bounds.lower(i, k) - bounds.upper(k, j))
                    .max(bounds.lower(j, k) - bounds.upper(k, i));
                if lo > bounds.lower(i, j) {
                    bounds.set_lower(i, j, lo);
                }
                if bounds.lower(i, j) > bounds.upper(i, j) {
                    let hi = bounds.upper(i, j);
                    bounds.set_lower(i, j, hi);
                }
            }
        }
    }
}

fn sample_distances(bounds: &Bounds, rng: &mut StdRng) -> DMatrix<f64> {
    let n = bounds.n;
    let mut d = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (lo, hi) = (bounds.lower(i, j), bounds.upper(i, j));
            let value = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
            d[(i, j)] = value;
            d[(j, i)] = value;
        }
    }
    d
}

/// Coordinates from the three largest eigenpairs of the metric matrix.
fn metric_coordinates(distances: &DMatrix<f64>) -> Vec<[f64; 3]> {
    let n = distances.nrows();
    let sq = distances.map(|x| x * x);
    let total: f64 = (0..n)
        .flat_map(|j| ((j + 1)..n).map(move |k| (j, k)))
        .map(|(j, k)| sq[(j, k)])
        .sum();
    let origin: Vec<f64> = (0..n)
        .map(|i| sq.row(i).sum() / n as f64 - total / (n * n) as f64)
        .collect();
    let metric = DMatrix::from_fn(n, n, |i, j| 0.5 * (origin[i] + origin[j] - sq[(i, j)]));

    let eigen = SymmetricEigen::new(metric);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let mut coords = vec![[0.0; 3]; n];
    for (axis, &k) in order.iter().take(3).enumerate() {
        let scale = eigen.eigenvalues[k].max(0.0).sqrt();
        for (i, c) in coords.iter_mut().enumerate() {
            c[axis] = eigen.eigenvectors[(i, k)] * scale;
        }
    }
    coords
}

fn violation_gradient(bounds: &Bounds, coords: &[[f64; 3]]) -> (f64, Vec<[f64; 3]>) {
    let n = coords.len();
    let mut error = 0.0;
    let mut grad = vec![[0.0; 3]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = [
                coords[i][0] - coords[j][0],
                coords[i][1] - coords[j][1],
                coords[i][2] - coords[j][2],
            ];
            let d = (delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2])
                .sqrt()
                .max(1e-6);
            let (lo, hi) = (bounds.lower(i, j), bounds.upper(i, j));
            let excess = if d > hi {
                d - hi
            } else if d < lo {
                d - lo
            } else {
                continue;
            };
            error += excess * excess;
            let factor = 2.0 * excess / d;
            for k in 0..3 {
                grad[i][k] += factor * delta[k];
                grad[j][k] -= factor * delta[k];
            }
        }
    }
    (error, grad)
}

fn refine(bounds: &Bounds, coords: &mut [[f64; 3]], iterations: usize, rate: f64) -> f64 {
    let mut error = f64::INFINITY;
    for _ in 0..iterations {
        let (e, grad) = violation_gradient(bounds, coords);
        error = e;
        if e < 1e-6 {
            break;
        }
        for (c, g) in coords.iter_mut().zip(&grad) {
            for k in 0..3 {
                c[k] -= rate * g[k].clamp(-1.0, 1.0);
            }
        }
    }
    error
}

fn check(graph: &MolGraph, conformer: &Conformer) -> Result<(), String> {
    if conformer.positions.iter().flatten().any(|x| !x.is_finite()) {
        return Err("non-finite coordinates".to_string());
    }
    for (bi, b) in graph.bonds.iter().enumerate() {
        let deviation = (conformer.distance(b.i, b.j) - bond_length(graph, bi)).abs();
        if deviation > MAX_BOND_ERROR {
            return Err(format!(
                "bond {}-{} deviates by {deviation:.3} Å from its target length",
                b.i, b.j
            ));
        }
    }
    Ok(())
}

fn attempt(
    graph: &MolGraph,
    bounds: &Bounds,
    field: &ForceField,
    seed: u64,
    settings: &EmbeddingSettings,
) -> Result<Conformer, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distances = sample_distances(bounds, &mut rng);
    let mut coords = metric_coordinates(&distances);
    let error = refine(bounds, &mut coords, settings.refine_iterations, settings.learning_rate);
    let energy = field.minimize(&mut coords, settings.cleanup_iterations);
    debug!(seed, error, energy, "refined embedded coordinates");
    let conformer = Conformer::new(coords);
    check(graph, &conformer)?;
    let center = conformer.centroid();
    Ok(Conformer::new(conformer.centered_on(center)))
}

/// Embeds `graph` (normally the explicit-hydrogen graph) in three dimensions.
///
/// Attempts use seeds `settings.seed`, `settings.seed + 1`, … so the result
/// is reproducible for a given configuration.
///
/// # Errors
///
/// Returns [`Error::EmptyMolecule`] for an empty graph and
/// [`Error::Embedding`] when every attempt fails validation.
pub fn embed(graph: &MolGraph, settings: &EmbeddingSettings) -> Result<Conformer, Error> {
    let n = graph.atom_count();
    match n {
        0 => return Err(Error::EmptyMolecule),
        1 => return Ok(Conformer::new(vec![[0.0; 3]])),
        _ => {}
    }

    let mut bounds = build_bounds(graph);
    smooth(&mut bounds);
    let field = ForceField::new(graph);

    let attempts = settings.max_attempts.max(1);
    let mut last = String::new();
    for k in 0..attempts {
        let seed = settings.seed.wrapping_add(k as u64);
        match attempt(graph, &bounds, &field, seed, settings) {
            Ok(conformer) => {
                debug!(atoms = n, seed, "embedded conformer");
                return Ok(conformer);
            }
            Err(reason) => {
                warn!(seed, %reason, "embedding attempt failed, retrying with next seed");
                last = reason;
            }
        }
    }
    Err(Error::embedding(attempts, last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn explicit(smi: &str) -> MolGraph {
        let (g, _) = sanitize(smiles::parse(smi).unwrap()).unwrap();
        g.with_explicit_hydrogens()
    }

    #[test]
    fn single_atom_sits_at_origin() {
        let g = MolGraph::from_parts(vec![crate::model::atom::Atom::new(crate::model::types::Element::Ne)], vec![]);
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        assert_eq!(conf.positions, vec![[0.0; 3]]);
    }

    #[test]
    fn water_has_sensible_geometry() {
        let g = explicit("O");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        assert_eq!(conf.len(), 3);
        for h in [1, 2] {
            let d = conf.distance(0, h);
            assert!((d - 0.97).abs() < 0.3, "O-H distance {d}");
        }
        let hh = conf.distance(1, 2);
        assert!(hh > 1.2 && hh < 1.9, "H-H distance {hh}");
    }

    #[test]
    fn embedding_is_reproducible() {
        let g = explicit("CCO");
        let a = embed(&g, &EmbeddingSettings::default()).unwrap();
        let b = embed(&g, &EmbeddingSettings::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn benzene_ring_bonds_are_close_to_target() {
        let g = explicit("c1ccccc1");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        for bi in 0..6 {
            let b = &g.bonds[bi];
            let d = conf.distance(b.i, b.j);
            assert!((d - bond_length(&g, bi)).abs() < MAX_BOND_ERROR, "bond {bi}: {d}");
        }
    }

    #[test]
    fn coordinates_are_centered() {
        let conf = embed(&explicit("CC(=O)O"), &EmbeddingSettings::default()).unwrap();
        let c = conf.centroid();
        assert!(c.iter().all(|x| x.abs() < 1e-9));
    }

    fn volume(conf: &Conformer, o: usize, a: usize, b: usize, c: usize) -> f64 {
        let p = |i: usize| nalgebra::Vector3::from(conf.positions[i]) - nalgebra::Vector3::from(conf.positions[o]);
        p(a).dot(&p(b).cross(&p(c)))
    }

    #[test]
    fn trigonal_centres_come_out_flat() {
        let g = explicit("C=C");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        // Every atom of ethylene lies in the plane of C0 and its neighbours.
        for far in 3..6 {
            let v = volume(&conf, 0, 1, 2, far).abs();
            assert!(v < 1e-2, "out-of-plane volume {v} for atom {far}");
        }
        let g = explicit("c1ccccc1");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        for atom in 0..g.atom_count() {
            let v = volume(&conf, 0, 1, 2, atom).abs();
            assert!(v < 1e-2, "atom {atom} sits {v} out of the ring plane");
        }
    }

    #[test]
    fn triple_bonds_are_linear() {
        let g = explicit("CC#N");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        let span = conf.distance(0, 2);
        let path = conf.distance(0, 1) + conf.distance(1, 2);
        assert!((path - span).abs() < 1e-3, "C-C#N bends: {span} vs {path}");
    }

    #[test]
    fn tetrahedral_angles_are_restored() {
        let g = explicit("C");
        let conf = embed(&g, &EmbeddingSettings::default()).unwrap();
        let ch = conf.distance(0, 1);
        for (a, b) in [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)] {
            let cos = 1.0 - conf.distance(a, b).powi(2) / (2.0 * ch * ch);
            assert!((cos + 1.0 / 3.0).abs() < 1e-3, "H{a}-C-H{b} cosine {cos}");
        }
    }

    #[test]
    fn smoothing_tightens_upper_bounds() {
        let g = explicit("CCCC");
        let mut bounds = build_bounds(&g);
        let before = bounds.upper(0, 3);
        smooth(&mut bounds);
        assert!(bounds.upper(0, 3) < before);
        assert!(bounds.lower(0, 3) <= bounds.upper(0, 3));
    }
}
