//! Valence force field used to clean up embedded coordinates.
//!
//! Terms follow the DREIDING functional forms: harmonic bond stretches,
//! cosine-harmonic angle bends (with the `K(1 + cos θ)` form for linear
//! centres), periodic torsions whose barrier and multiplicity depend on the
//! hybridization of the central bond, planar inversions at trigonal centres
//! and a soft repulsion between atoms more than two bonds apart. The total
//! energy is minimized with limited-memory BFGS.

use crate::model::graph::MolGraph;
use crate::model::types::{BondOrder, Element};
use nalgebra::{DVector, Vector3};
use std::collections::{HashSet, VecDeque};
use std::f64::consts::PI;

const BOND_K: f64 = 700.0;
const ANGLE_K: f64 = 100.0;
const INVERSION_K: f64 = 40.0;
const REPULSION_K: f64 = 50.0;
/// Fraction of the van der Waals contact distance below which atoms repel.
const REPULSION_SCALE: f64 = 0.75;

const HISTORY: usize = 8;
const ARMIJO: f64 = 1e-4;
/// Largest single-coordinate displacement of one line-search step, in Å.
const MAX_STEP: f64 = 0.3;
const GRADIENT_TOLERANCE: f64 = 1e-6;

/// Ideal length in Å of bond `bond`, from covalent radii scaled by bond order.
pub fn bond_length(graph: &MolGraph, bond: usize) -> f64 {
    let b = &graph.bonds[bond];
    let sum = graph.atoms[b.i].element.covalent_radius() + graph.atoms[b.j].element.covalent_radius();
    let scale = match b.order {
        BondOrder::Double => 0.87,
        BondOrder::Triple => 0.78,
        BondOrder::Aromatic | BondOrder::OneAndAHalf => 0.91,
        _ => 1.0,
    };
    sum * scale
}

/// Geometry class of an atom as seen by the force field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hybridization {
    /// Two neighbours on a line: triple bonds and cumulated double bonds.
    Linear,
    /// Planar centre with a localized double bond.
    Trigonal,
    /// Planar centre in an aromatic system.
    Resonant,
    Tetrahedral,
    /// Hypervalent centres without a single ideal angle.
    Unknown,
}

impl Hybridization {
    /// Perceives the hybridization of `atom` from its bonds and hydrogens.
    pub fn perceive(graph: &MolGraph, atom: usize) -> Self {
        let a = &graph.atoms[atom];
        let steric = graph.degree(atom) + a.hydrogens as usize;
        let mut doubles = 0;
        let mut triple = false;
        for &(_, bi) in graph.incident(atom) {
            match graph.bonds[bi].order {
                BondOrder::Double => doubles += 1,
                BondOrder::Triple | BondOrder::Quadruple => triple = true,
                _ => {}
            }
        }
        let second_period = matches!(a.element, Element::C | Element::N);

        if a.aromatic {
            Self::Resonant
        } else if steric > 4 {
            Self::Unknown
        } else if steric <= 2 && (triple || (doubles >= 2 && second_period)) {
            Self::Linear
        } else if doubles >= 1 && steric <= 3 {
            Self::Trigonal
        } else {
            Self::Tetrahedral
        }
    }

    /// Ideal bond angle in radians, if the centre has one.
    pub fn ideal_angle(self) -> Option<f64> {
        match self {
            Self::Linear => Some(PI),
            Self::Trigonal | Self::Resonant => Some(f64::to_radians(120.0)),
            Self::Tetrahedral => Some(f64::to_radians(109.471)),
            Self::Unknown => None,
        }
    }

    fn is_planar(self) -> bool {
        matches!(self, Self::Trigonal | Self::Resonant)
    }
}

fn is_oxygen_column(element: Element) -> bool {
    matches!(element, Element::O | Element::S | Element::Se | Element::Te)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TorsionParams {
    v_barrier: f64,
    periodicity: u32,
    phase_offset: f64,
}

/// Torsion profile about the bond `j`-`k`; `conjugated` is set when a planar
/// end of the bond carries another planar neighbour.
fn torsion_params(
    order: BondOrder,
    (j_hyb, j_el): (Hybridization, Element),
    (k_hyb, k_el): (Hybridization, Element),
    conjugated: bool,
) -> Option<TorsionParams> {
    use Hybridization::{Linear, Tetrahedral, Unknown};
    let params = |v_barrier, periodicity, phase_offset| {
        Some(TorsionParams {
            v_barrier,
            periodicity,
            phase_offset,
        })
    };
    match (j_hyb, k_hyb) {
        (Linear | Unknown, _) | (_, Linear | Unknown) => None,
        (Tetrahedral, Tetrahedral) => {
            if is_oxygen_column(j_el) && is_oxygen_column(k_el) {
                params(2.0, 2, 90.0)
            } else {
                params(2.0, 3, 180.0)
            }
        }
        (Tetrahedral, _) | (_, Tetrahedral) => {
            let sp3_el = if j_hyb == Tetrahedral { j_el } else { k_el };
            if is_oxygen_column(sp3_el) {
                params(2.0, 2, 180.0)
            } else if conjugated {
                params(1.0, 6, 0.0)
            } else {
                params(2.0, 3, 180.0)
            }
        }
        _ => match order {
            BondOrder::Double => params(45.0, 2, 180.0),
            BondOrder::Aromatic | BondOrder::OneAndAHalf => params(25.0, 2, 180.0),
            _ => params(5.0, 2, 180.0),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Bond {
        i: usize,
        j: usize,
        r0: f64,
    },
    /// Bend of `i`-`j`-`k` about the centre `j`.
    Angle {
        i: usize,
        j: usize,
        k: usize,
        k_force: f64,
        cos0: f64,
        linear: bool,
    },
    /// `V/2 [1 - sign · cos(n φ)]`, where `sign` folds in the phase offset.
    Torsion {
        i: usize,
        j: usize,
        k: usize,
        l: usize,
        v_barrier: f64,
        periodicity: u32,
        sign: f64,
    },
    /// Squared signed volume spanned by the three bonds of a planar centre.
    Inversion {
        center: usize,
        p1: usize,
        p2: usize,
        p3: usize,
    },
    Repulsion {
        i: usize,
        j: usize,
        r0: f64,
    },
}

/// A force field instantiated for one molecular graph.
#[derive(Debug, Clone)]
pub struct ForceField {
    terms: Vec<Term>,
    atoms: usize,
}

impl ForceField {
    /// Builds every term for `graph`, normally the explicit-hydrogen graph.
    pub fn new(graph: &MolGraph) -> Self {
        let n = graph.atom_count();
        let hybrid: Vec<Hybridization> = (0..n).map(|a| Hybridization::perceive(graph, a)).collect();
        let mut terms = Vec::new();

        for (bi, b) in graph.bonds.iter().enumerate() {
            terms.push(Term::Bond {
                i: b.i,
                j: b.j,
                r0: bond_length(graph, bi),
            });
        }

        let mut near: HashSet<(usize, usize)> = graph.bonds.iter().map(|b| (b.i.min(b.j), b.i.max(b.j))).collect();
        for center in 0..n {
            let nbs: Vec<usize> = graph.neighbors(center).collect();
            for (x, &a) in nbs.iter().enumerate() {
                for &c in &nbs[x + 1..] {
                    near.insert((a.min(c), a.max(c)));
                    let Some(theta0) = hybrid[center].ideal_angle() else {
                        continue;
                    };
                    let linear = hybrid[center] == Hybridization::Linear;
                    let k_force = if linear { ANGLE_K } else { ANGLE_K / theta0.sin().powi(2) };
                    terms.push(Term::Angle {
                        i: a,
                        j: center,
                        k: c,
                        k_force,
                        cos0: theta0.cos(),
                        linear,
                    });
                }
            }
            if hybrid[center].is_planar() && nbs.len() == 3 {
                terms.push(Term::Inversion {
                    center,
                    p1: nbs[0],
                    p2: nbs[1],
                    p3: nbs[2],
                });
            }
        }

        for b in &graph.bonds {
            let (j, k) = (b.i, b.j);
            let outer_j: Vec<usize> = graph.neighbors(j).filter(|&x| x != k).collect();
            let outer_k: Vec<usize> = graph.neighbors(k).filter(|&x| x != j).collect();
            if outer_j.is_empty() || outer_k.is_empty() {
                continue;
            }
            let planar_neighbour = |centre: usize, other: usize| {
                hybrid[centre].is_planar()
                    && graph.neighbors(centre).any(|x| x != other && hybrid[x].is_planar())
            };
            let conjugated = planar_neighbour(j, k) || planar_neighbour(k, j);
            let Some(params) = torsion_params(
                b.order,
                (hybrid[j], graph.atoms[j].element),
                (hybrid[k], graph.atoms[k].element),
                conjugated,
            ) else {
                continue;
            };
            let n_phase = f64::from(params.periodicity) * params.phase_offset.to_radians();
            let sign = n_phase.cos().round();
            let share = params.v_barrier / (outer_j.len() * outer_k.len()) as f64;
            for &i in &outer_j {
                for &l in &outer_k {
                    if i == l {
                        continue;
                    }
                    terms.push(Term::Torsion {
                        i,
                        j,
                        k,
                        l,
                        v_barrier: share,
                        periodicity: params.periodicity,
                        sign,
                    });
                }
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                if near.contains(&(i, j)) {
                    continue;
                }
                let contact = graph.atoms[i].element.vdw_radius() + graph.atoms[j].element.vdw_radius();
                terms.push(Term::Repulsion {
                    i,
                    j,
                    r0: REPULSION_SCALE * contact,
                });
            }
        }

        Self { terms, atoms: n }
    }

    /// Total energy of flattened coordinates `x`; the gradient is written to `grad`.
    fn evaluate(&self, x: &DVector<f64>, grad: &mut DVector<f64>) -> f64 {
        grad.fill(0.0);
        let mut energy = 0.0;
        for term in &self.terms {
            energy += match *term {
                Term::Bond { i, j, r0 } => {
                    let delta = point(x, i) - point(x, j);
                    let d = delta.norm();
                    if d < 1e-8 {
                        continue;
                    }
                    let g = delta * (BOND_K * (d - r0) / d);
                    accumulate(grad, i, &g);
                    accumulate(grad, j, &-g);
                    0.5 * BOND_K * (d - r0).powi(2)
                }
                Term::Angle {
                    i,
                    j,
                    k,
                    k_force,
                    cos0,
                    linear,
                } => {
                    let u = point(x, i) - point(x, j);
                    let v = point(x, k) - point(x, j);
                    let (lu, lv) = (u.norm(), v.norm());
                    if lu < 1e-8 || lv < 1e-8 {
                        continue;
                    }
                    let c = (u.dot(&v) / (lu * lv)).clamp(-1.0, 1.0);
                    let (e, de_dc) = if linear {
                        (k_force * (1.0 + c), k_force)
                    } else {
                        (0.5 * k_force * (c - cos0).powi(2), k_force * (c - cos0))
                    };
                    let gu = (v / (lu * lv) - u * (c / (lu * lu))) * de_dc;
                    let gv = (u / (lu * lv) - v * (c / (lv * lv))) * de_dc;
                    accumulate(grad, i, &gu);
                    accumulate(grad, k, &gv);
                    accumulate(grad, j, &-(gu + gv));
                    e
                }
                Term::Torsion {
                    i,
                    j,
                    k,
                    l,
                    v_barrier,
                    periodicity,
                    sign,
                } => {
                    let b1 = point(x, j) - point(x, i);
                    let b2 = point(x, k) - point(x, j);
                    let b3 = point(x, l) - point(x, k);
                    let a = b1.cross(&b2);
                    let b = b2.cross(&b3);
                    let (la, lb) = (a.norm(), b.norm());
                    if la < 1e-8 || lb < 1e-8 {
                        continue;
                    }
                    let c = (a.dot(&b) / (la * lb)).clamp(-1.0, 1.0);
                    let (t, dt) = chebyshev(periodicity, c);
                    let de_dc = -0.5 * v_barrier * sign * dt;
                    let ga = (b / (la * lb) - a * (c / (la * la))) * de_dc;
                    let gb = (a / (la * lb) - b * (c / (lb * lb))) * de_dc;
                    let g1 = b2.cross(&ga);
                    let g2 = ga.cross(&b1) + b3.cross(&gb);
                    let g3 = gb.cross(&b2);
                    accumulate(grad, i, &-g1);
                    accumulate(grad, j, &(g1 - g2));
                    accumulate(grad, k, &(g2 - g3));
                    accumulate(grad, l, &g3);
                    0.5 * v_barrier * (1.0 - sign * t)
                }
                Term::Inversion { center, p1, p2, p3 } => {
                    let o = point(x, center);
                    let (u, v, w) = (point(x, p1) - o, point(x, p2) - o, point(x, p3) - o);
                    let volume = u.dot(&v.cross(&w));
                    let scale = INVERSION_K * volume;
                    let (g1, g2, g3) = (v.cross(&w) * scale, w.cross(&u) * scale, u.cross(&v) * scale);
                    accumulate(grad, p1, &g1);
                    accumulate(grad, p2, &g2);
                    accumulate(grad, p3, &g3);
                    accumulate(grad, center, &-(g1 + g2 + g3));
                    0.5 * INVERSION_K * volume * volume
                }
                Term::Repulsion { i, j, r0 } => {
                    let delta = point(x, i) - point(x, j);
                    let d = delta.norm();
                    if d >= r0 || d < 1e-8 {
                        continue;
                    }
                    let g = delta * (-REPULSION_K * (r0 - d) / d);
                    accumulate(grad, i, &g);
                    accumulate(grad, j, &-g);
                    0.5 * REPULSION_K * (r0 - d).powi(2)
                }
            };
        }
        energy
    }

    /// Energy of `coords` in kcal/mol-like units.
    pub fn energy(&self, coords: &[[f64; 3]]) -> f64 {
        let x = flatten(coords);
        let mut grad = DVector::zeros(x.len());
        self.evaluate(&x, &mut grad)
    }

    /// Relaxes `coords` in place and returns the final energy.
    ///
    /// Stops after `max_iterations` L-BFGS steps, when the largest gradient
    /// component falls below the convergence threshold, or when the line
    /// search can make no further progress.
    pub fn minimize(&self, coords: &mut [[f64; 3]], max_iterations: usize) -> f64 {
        debug_assert_eq!(coords.len(), self.atoms);
        let mut x = flatten(coords);
        let mut grad = DVector::zeros(x.len());
        let mut energy = self.evaluate(&x, &mut grad);
        let mut history: VecDeque<(DVector<f64>, DVector<f64>, f64)> = VecDeque::with_capacity(HISTORY);

        for _ in 0..max_iterations {
            if grad.amax() < GRADIENT_TOLERANCE {
                break;
            }
            let mut direction = -two_loop(&grad, &history);
            let mut slope = grad.dot(&direction);
            if slope >= 0.0 {
                history.clear();
                direction = -grad.clone();
                slope = -grad.norm_squared();
            }
            let longest = direction.amax();
            if longest > MAX_STEP {
                direction *= MAX_STEP / longest;
                slope *= MAX_STEP / longest;
            }

            let mut step = 1.0;
            let mut trial_grad = DVector::zeros(x.len());
            let accepted = loop {
                let trial = &x + &direction * step;
                let trial_energy = self.evaluate(&trial, &mut trial_grad);
                if trial_energy <= energy + ARMIJO * step * slope {
                    break Some((trial, trial_energy));
                }
                step *= 0.5;
                if step < 1e-10 {
                    break None;
                }
            };
            let Some((next, next_energy)) = accepted else {
                break;
            };

            let s = &next - &x;
            let y = &trial_grad - &grad;
            let sy = s.dot(&y);
            if sy > 1e-12 {
                if history.len() == HISTORY {
                    history.pop_front();
                }
                history.push_back((s, y, 1.0 / sy));
            }
            x = next;
            energy = next_energy;
            grad = trial_grad;
        }

        for (i, c) in coords.iter_mut().enumerate() {
            *c = [x[3 * i], x[3 * i + 1], x[3 * i + 2]];
        }
        energy
    }
}

/// L-BFGS two-loop recursion: approximate inverse Hessian times `grad`.
fn two_loop(grad: &DVector<f64>, history: &VecDeque<(DVector<f64>, DVector<f64>, f64)>) -> DVector<f64> {
    let mut q = grad.clone();
    let mut alphas = Vec::with_capacity(history.len());
    for (s, y, rho) in history.iter().rev() {
        let alpha = rho * s.dot(&q);
        q.axpy(-alpha, y, 1.0);
        alphas.push(alpha);
    }
    if let Some((s, y, _)) = history.back() {
        q *= s.dot(y) / y.norm_squared();
    }
    for ((s, y, rho), alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = rho * y.dot(&q);
        q.axpy(alpha - beta, s, 1.0);
    }
    q
}

/// Chebyshev polynomial `T_n(c)` and its derivative, so `cos(nφ)` follows from `cos φ`.
fn chebyshev(n: u32, c: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let (mut t0, mut t1) = (1.0, c);
    let (mut d0, mut d1) = (0.0, 1.0);
    for _ in 1..n {
        let t2 = 2.0 * c * t1 - t0;
        let d2 = 2.0 * t1 + 2.0 * c * d1 - d0;
        (t0, t1, d0, d1) = (t1, t2, d1, d2);
    }
    (t1, d1)
}

fn flatten(coords: &[[f64; 3]]) -> DVector<f64> {
    DVector::from_iterator(coords.len() * 3, coords.iter().flatten().copied())
}

fn point(x: &DVector<f64>, atom: usize) -> Vector3<f64> {
    Vector3::new(x[3 * atom], x[3 * atom + 1], x[3 * atom + 2])
}

fn accumulate(grad: &mut DVector<f64>, atom: usize, g: &Vector3<f64>) {
    for k in 0..3 {
        grad[3 * atom + k] += g[k];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chem::{sanitize, smiles};

    fn explicit(smi: &str) -> MolGraph {
        let (g, _) = sanitize(smiles::parse(smi).unwrap()).unwrap();
        g.with_explicit_hydrogens()
    }

    fn jittered(n: usize) -> Vec<[f64; 3]> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                [1.3 * t.cos() + 0.1 * t, 1.1 * (1.7 * t).sin(), 0.4 * (0.9 * t).cos()]
            })
            .collect()
    }

    #[test]
    fn hybridization_follows_bond_orders() {
        let g = explicit("C=CC#N");
        assert_eq!(Hybridization::perceive(&g, 0), Hybridization::Trigonal);
        assert_eq!(Hybridization::perceive(&g, 2), Hybridization::Linear);
        assert_eq!(Hybridization::perceive(&explicit("O=C=O"), 1), Hybridization::Linear);
        assert_eq!(Hybridization::perceive(&explicit("O=S=O"), 1), Hybridization::Trigonal);
        assert_eq!(Hybridization::perceive(&explicit("CS(=O)(=O)C"), 1), Hybridization::Tetrahedral);
        assert_eq!(Hybridization::perceive(&explicit("c1ccccc1"), 0), Hybridization::Resonant);
        assert_eq!(Hybridization::perceive(&explicit("FS(F)(F)(F)(F)F"), 1), Hybridization::Unknown);
    }

    #[test]
    fn chebyshev_matches_multiple_angle_cosines() {
        for phi in [0.0, 0.4, 1.3, 2.9] {
            for n in 1..=6 {
                let (t, _) = chebyshev(n, f64::cos(phi));
                assert!((t - (n as f64 * phi).cos()).abs() < 1e-12);
            }
        }
        assert_eq!(chebyshev(2, 0.5).1, 2.0);
    }

    #[test]
    fn analytic_gradient_matches_finite_differences() {
        let g = explicit("CC=CC(=O)O");
        let ff = ForceField::new(&g);
        let x = flatten(&jittered(g.atom_count()));
        let mut grad = DVector::zeros(x.len());
        ff.evaluate(&x, &mut grad);

        let h = 1e-6;
        let mut scratch = DVector::zeros(x.len());
        for k in 0..x.len() {
            let mut plus = x.clone();
            plus[k] += h;
            let mut minus = x.clone();
            minus[k] -= h;
            let numeric = (ff.evaluate(&plus, &mut scratch) - ff.evaluate(&minus, &mut scratch)) / (2.0 * h);
            assert!(
                (numeric - grad[k]).abs() < 1e-3 * numeric.abs().max(1.0),
                "coordinate {k}: analytic {} vs numeric {numeric}",
                grad[k]
            );
        }
    }

    #[test]
    fn minimization_lowers_the_energy() {
        let g = explicit("CCO");
        let ff = ForceField::new(&g);
        let mut coords = jittered(g.atom_count());
        let before = ff.energy(&coords);
        let after = ff.minimize(&mut coords, 500);
        assert!(after < before, "{after} >= {before}");
        assert!((ff.energy(&coords) - after).abs() < 1e-9);
        for (bi, b) in g.bonds.iter().enumerate() {
            let d = crate::model::conformer::distance(&coords[b.i], &coords[b.j]);
            assert!((d - bond_length(&g, bi)).abs() < 0.05, "bond {bi}: {d}");
        }
    }

    #[test]
    fn double_bond_torsions_are_stiffer_than_single_bond_ones() {
        let c = (Hybridization::Trigonal, Element::C);
        let double = torsion_params(BondOrder::Double, c, c, true).unwrap();
        let single = torsion_params(BondOrder::Single, c, c, true).unwrap();
        assert!(double.v_barrier > single.v_barrier);
        let sp3 = torsion_params(
            BondOrder::Single,
            (Hybridization::Tetrahedral, Element::C),
            (Hybridization::Tetrahedral, Element::C),
            false,
        )
        .unwrap();
        assert_eq!(sp3.periodicity, 3);
        assert!(torsion_params(BondOrder::Triple, (Hybridization::Linear, Element::C), c, false).is_none());
    }
}
