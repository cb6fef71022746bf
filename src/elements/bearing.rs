use faer::Mat;
use itertools::izip;
use serde::{Deserialize, Serialize};

/// A dynamic coefficient, either constant or tabulated against excitation
/// frequency (rad/s) with linear interpolation and clamped ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coefficient {
    Constant(f64),
    Table { frequency: Vec<f64>, value: Vec<f64> },
}

impl Coefficient {
    pub fn at(&self, frequency: f64) -> f64 {
        match self {
            Coefficient::Constant(v) => *v,
            Coefficient::Table {
                frequency: f,
                value: v,
            } => {
                if f.is_empty() || v.is_empty() {
                    return 0.;
                }
                if frequency <= f[0] {
                    return v[0];
                }
                if frequency >= f[f.len() - 1] {
                    return v[v.len() - 1];
                }
                for (f0, f1, v0, v1) in izip!(f.iter(), f[1..].iter(), v.iter(), v[1..].iter()) {
                    if frequency <= *f1 {
                        let t = (frequency - f0) / (f1 - f0);
                        return v0 + t * (v1 - v0);
                    }
                }
                v[v.len() - 1]
            }
        }
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Coefficient::Constant(0.)
    }
}

/// A linear bearing acting on the lateral (x, y) DOFs of its node. When
/// `link_node` is set, the bearing connects the node to the link node
/// instead of ground.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearingElement {
    pub node: usize,
    pub kxx: Coefficient,
    pub kyy: Coefficient,
    #[serde(default)]
    pub kxy: Coefficient,
    #[serde(default)]
    pub kyx: Coefficient,
    pub cxx: Coefficient,
    pub cyy: Coefficient,
    #[serde(default)]
    pub cxy: Coefficient,
    #[serde(default)]
    pub cyx: Coefficient,
    /// Bearing inertia coefficients, usually zero.
    #[serde(default)]
    pub mxx: Coefficient,
    #[serde(default)]
    pub myy: Coefficient,
    #[serde(default)]
    pub link_node: Option<usize>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl BearingElement {
    /// Creates a grounded bearing with constant direct coefficients and no
    /// cross-coupling.
    pub fn new(node: usize, kxx: f64, kyy: f64, cxx: f64, cyy: f64) -> Self {
        Self {
            node,
            kxx: Coefficient::Constant(kxx),
            kyy: Coefficient::Constant(kyy),
            kxy: Coefficient::default(),
            kyx: Coefficient::default(),
            cxx: Coefficient::Constant(cxx),
            cyy: Coefficient::Constant(cyy),
            cxy: Coefficient::default(),
            cyx: Coefficient::default(),
            mxx: Coefficient::default(),
            myy: Coefficient::default(),
            link_node: None,
            tag: None,
        }
    }

    /// Stiffness contribution at `frequency`. Returns a 2x2 matrix on the
    /// node's (x, y) DOFs, or 4x4 on (node x, y, link x, y) when linked.
    pub fn k(&self, frequency: f64) -> Mat<f64> {
        self.paired(
            self.kxx.at(frequency),
            self.kxy.at(frequency),
            self.kyx.at(frequency),
            self.kyy.at(frequency),
        )
    }

    /// Damping contribution at `frequency`, same layout as `k`.
    pub fn c(&self, frequency: f64) -> Mat<f64> {
        self.paired(
            self.cxx.at(frequency),
            self.cxy.at(frequency),
            self.cyx.at(frequency),
            self.cyy.at(frequency),
        )
    }

    /// Inertia contribution at `frequency`, same layout as `k`.
    pub fn m(&self, frequency: f64) -> Mat<f64> {
        self.paired(self.mxx.at(frequency), 0., 0., self.myy.at(frequency))
    }

    fn paired(&self, xx: f64, xy: f64, yx: f64, yy: f64) -> Mat<f64> {
        let mut local = Mat::<f64>::zeros(2, 2);
        local[(0, 0)] = xx;
        local[(0, 1)] = xy;
        local[(1, 0)] = yx;
        local[(1, 1)] = yy;

        match self.link_node {
            None => local,
            // [ K -K; -K K ] between the node and the link node
            Some(_) => {
                let mut full = Mat::<f64>::zeros(4, 4);
                for i in 0..2 {
                    for j in 0..2 {
                        full[(i, j)] = local[(i, j)];
                        full[(i + 2, j + 2)] = local[(i, j)];
                        full[(i, j + 2)] = -local[(i, j)];
                        full[(i + 2, j)] = -local[(i, j)];
                    }
                }
                full
            }
        }
    }
}
