use faer::Mat;
use serde::{Deserialize, Serialize};

/// A lumped mass on the lateral DOFs of a node, typically a bearing
/// pedestal attached through a link node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointMassElement {
    pub node: usize,
    pub mx: f64,
    pub my: f64,
    #[serde(default)]
    pub tag: Option<String>,
}

impl PointMassElement {
    pub fn new(node: usize, mass: f64) -> Self {
        Self {
            node,
            mx: mass,
            my: mass,
            tag: None,
        }
    }

    /// 2x2 mass contribution on the node's (x, y) DOFs.
    pub fn m(&self) -> Mat<f64> {
        let mut m = Mat::<f64>::zeros(2, 2);
        m[(0, 0)] = self.mx;
        m[(1, 1)] = self.my;
        m
    }
}
