use serde::{Deserialize, Serialize};

/// Isotropic shaft/disk material.
///
/// `rho` is the density, `e` the Young's modulus and `g_s` the shear
/// modulus, all in SI units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub rho: f64,
    pub e: f64,
    pub g_s: f64,
}

impl Material {
    pub fn new(name: &str, rho: f64, e: f64, g_s: f64) -> Self {
        Self {
            name: name.to_string(),
            rho,
            e,
            g_s,
        }
    }

    /// AISI 4140 steel, the usual default for shaft sections.
    pub fn steel() -> Self {
        Self::new("steel", 7810., 211e9, 81.2e9)
    }

    /// Poisson's ratio derived from the elastic moduli.
    pub fn poisson(&self) -> f64 {
        self.e / (2. * self.g_s) - 1.
    }
}
