use std::f64::consts::PI;

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::error::RotorError;
use crate::material::Material;

fn default_scale_factor() -> f64 {
    1.
}

/// A rigid disk mounted on a shaft node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskElement {
    pub node: usize,
    pub mass: f64,
    pub diametral_inertia: f64,
    pub polar_inertia: f64,
    #[serde(default)]
    pub tag: Option<String>,
    /// Scales the drawn patch, not the physics.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

impl DiskElement {
    pub fn new(node: usize, mass: f64, diametral_inertia: f64, polar_inertia: f64) -> Self {
        Self {
            node,
            mass,
            diametral_inertia,
            polar_inertia,
            tag: None,
            scale_factor: 1.,
        }
    }

    /// Creates a disk from hollow-cylinder geometry (Friswell et al.,
    /// appendix 1):
    ///
    /// `m = rho pi w (d_o^2 - d_i^2) / 4`
    /// `Ip = m (d_o^2 + d_i^2) / 8`
    /// `Id = Ip / 2 + m w^2 / 12`
    pub fn from_geometry(
        node: usize,
        material: &Material,
        width: f64,
        inner_diameter: f64,
        outer_diameter: f64,
    ) -> Self {
        let (mass, id_, ip) = hollow_cylinder_inertia(material, width, inner_diameter, outer_diameter);
        Self::new(node, mass, id_, ip)
    }

    pub fn m(&self) -> Mat<f64> {
        inertia_matrix(self.mass, self.diametral_inertia, self.polar_inertia)
    }

    pub fn g(&self) -> Mat<f64> {
        gyroscopic_matrix(self.polar_inertia)
    }

    pub fn kst(&self) -> Mat<f64> {
        transient_stiffness_matrix(self.polar_inertia)
    }
}

/// A gear: a disk carrying the mesh-coupling geometry, used as the
/// attachment point when two rotors are joined through a gear mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GearElement {
    pub node: usize,
    pub mass: f64,
    pub diametral_inertia: f64,
    pub polar_inertia: f64,
    /// Base-circle radius, the mesh-force lever arm.
    pub base_radius: f64,
    /// Pressure angle in radians, must lie in (0, pi/2).
    pub pressure_angle: f64,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

impl GearElement {
    /// Creates a gear from inertia data and pitch geometry. The base radius
    /// is derived as `pitch_diameter * cos(pressure_angle) / 2`.
    pub fn new(
        node: usize,
        mass: f64,
        diametral_inertia: f64,
        polar_inertia: f64,
        pitch_diameter: f64,
        pressure_angle: f64,
    ) -> Result<Self, RotorError> {
        if !(pressure_angle > 0. && pressure_angle < PI / 2.) {
            return Err(RotorError::InvalidPressureAngle(pressure_angle));
        }
        Ok(Self {
            node,
            mass,
            diametral_inertia,
            polar_inertia,
            base_radius: pitch_diameter * pressure_angle.cos() / 2.,
            pressure_angle,
            tag: None,
            scale_factor: 1.,
        })
    }

    /// Creates a gear from hollow-cylinder geometry, with the outer diameter
    /// taken as the pitch diameter.
    pub fn from_geometry(
        node: usize,
        material: &Material,
        width: f64,
        inner_diameter: f64,
        outer_diameter: f64,
        pressure_angle: f64,
    ) -> Result<Self, RotorError> {
        let (mass, id_, ip) = hollow_cylinder_inertia(material, width, inner_diameter, outer_diameter);
        Self::new(node, mass, id_, ip, outer_diameter, pressure_angle)
    }

    pub fn m(&self) -> Mat<f64> {
        inertia_matrix(self.mass, self.diametral_inertia, self.polar_inertia)
    }

    pub fn g(&self) -> Mat<f64> {
        gyroscopic_matrix(self.polar_inertia)
    }

    pub fn kst(&self) -> Mat<f64> {
        transient_stiffness_matrix(self.polar_inertia)
    }
}

fn hollow_cylinder_inertia(
    material: &Material,
    width: f64,
    inner_diameter: f64,
    outer_diameter: f64,
) -> (f64, f64, f64) {
    let mass = material.rho * PI * width * (outer_diameter.powi(2) - inner_diameter.powi(2)) / 4.;
    let ip = mass * (outer_diameter.powi(2) + inner_diameter.powi(2)) / 8.;
    let id_ = ip / 2. + mass * width.powi(2) / 12.;
    (mass, id_, ip)
}

/// Lumped 6x6 mass matrix `diag(m, m, m, Id, Id, Ip)`.
fn inertia_matrix(mass: f64, diametral_inertia: f64, polar_inertia: f64) -> Mat<f64> {
    let mut m = Mat::<f64>::zeros(6, 6);
    m[(0, 0)] = mass;
    m[(1, 1)] = mass;
    m[(2, 2)] = mass;
    m[(3, 3)] = diametral_inertia;
    m[(4, 4)] = diametral_inertia;
    m[(5, 5)] = polar_inertia;
    m
}

/// Gyroscopic coupling of the two tilt DOFs through the polar inertia,
/// to be multiplied by the rotor speed externally.
fn gyroscopic_matrix(polar_inertia: f64) -> Mat<f64> {
    let mut g = Mat::<f64>::zeros(6, 6);
    g[(3, 4)] = polar_inertia;
    g[(4, 3)] = -polar_inertia;
    g
}

/// Stiffness contribution under transient (accelerating) motion, to be
/// multiplied by the angular acceleration externally.
fn transient_stiffness_matrix(polar_inertia: f64) -> Mat<f64> {
    let mut kst = Mat::<f64>::zeros(6, 6);
    kst[(3, 4)] = polar_inertia;
    kst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_geometry() {
        let steel = Material::steel();
        let disk = DiskElement::from_geometry(2, &steel, 0.07, 0.05, 0.28);
        let expected_mass = steel.rho * PI * 0.07 * (0.28f64.powi(2) - 0.05f64.powi(2)) / 4.;
        assert!((disk.mass - expected_mass).abs() < 1e-9 * expected_mass);
        let expected_ip = expected_mass * (0.28f64.powi(2) + 0.05f64.powi(2)) / 8.;
        assert!((disk.polar_inertia - expected_ip).abs() < 1e-9 * expected_ip);
        let expected_id = expected_ip / 2. + expected_mass * 0.07f64.powi(2) / 12.;
        assert!((disk.diametral_inertia - expected_id).abs() < 1e-9 * expected_id);
    }

    #[test]
    fn test_gear_base_radius() {
        let beta = 20f64.to_radians();
        let gear = GearElement::new(3, 5., 0.002, 0.004, 0.1, beta).unwrap();
        assert!((gear.base_radius - 0.05 * beta.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_gear_rejects_bad_pressure_angle() {
        assert!(GearElement::new(0, 1., 1., 1., 0.1, 0.).is_err());
        assert!(GearElement::new(0, 1., 1., 1., 0.1, PI / 2.).is_err());
        assert!(GearElement::new(0, 1., 1., 1., 0.1, -0.3).is_err());
    }

    #[test]
    fn test_disk_matrices() {
        let disk = DiskElement::new(0, 32.6, 0.178, 0.329);
        let m = disk.m();
        assert_eq!(m[(0, 0)], 32.6);
        assert_eq!(m[(5, 5)], 0.329);
        let g = disk.g();
        assert_eq!(g[(3, 4)], 0.329);
        assert_eq!(g[(4, 3)], -0.329);
        assert_eq!(g[(0, 0)], 0.);
    }
}
