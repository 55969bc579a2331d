/// Cartesian coordinates in Ångströms, one row per atom of the explicit-hydrogen graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conformer {
    pub positions: Vec<[f64; 3]>,
}

impl Conformer {
    pub fn new(positions: Vec<[f64; 3]>) -> Self {
        Self { positions }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        distance(&self.positions[a], &self.positions[b])
    }

    /// Weighted centre; `weights` must have one entry per atom.
    pub fn weighted_center(&self, weights: &[f64]) -> [f64; 3] {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return [0.0; 3];
        }
        let mut c = [0.0; 3];
        for (p, w) in self.positions.iter().zip(weights) {
            for k in 0..3 {
                c[k] += p[k] * w;
            }
        }
        c.map(|v| v / total)
    }

    pub fn centroid(&self) -> [f64; 3] {
        self.weighted_center(&vec![1.0; self.len()])
    }

    /// Returns the coordinates translated so that `center` sits at the origin.
    pub fn centered_on(&self, center: [f64; 3]) -> Vec<[f64; 3]> {
        self.positions
            .iter()
            .map(|p| [p[0] - center[0], p[1] - center[1], p[2] - center[2]])
            .collect()
    }
}

#[inline]
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
