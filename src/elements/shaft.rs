use std::f64::consts::PI;

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::material::Material;

/// Local DOF order per node is `[x, y, z, theta_x, theta_y, theta_z]`, with
/// the shaft axis along z. A shaft element spans nodes `node` and `node + 1`
/// and contributes 12x12 matrices.
pub const DOF_PER_NODE: usize = 6;

/// Lateral plane x / theta_y within the 12 element DOFs.
const PLANE_X: [usize; 4] = [0, 4, 6, 10];
/// Lateral plane y / theta_x within the 12 element DOFs.
const PLANE_Y: [usize; 4] = [1, 3, 7, 9];
/// Sign of the y-plane DOFs relative to the x-plane convention
/// (theta_x = -dv/dz).
const S_Y: [f64; 4] = [1., -1., 1., -1.];
const S_X: [f64; 4] = [1., 1., 1., 1.];

/// A cylindrical (possibly hollow) shaft segment, Timoshenko bending plus
/// axial and torsional terms, consistent mass and gyroscopic matrices as per
/// Friswell et al., Dynamics of Rotating Machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaftElement {
    /// Left node id.
    pub node: usize,
    pub length: f64,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    pub material: Material,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ShaftElement {
    pub fn new(
        node: usize,
        length: f64,
        inner_diameter: f64,
        outer_diameter: f64,
        material: Material,
    ) -> Self {
        Self {
            node,
            length,
            inner_diameter,
            outer_diameter,
            material,
            tag: None,
        }
    }

    /// Cross-section area.
    pub fn area(&self) -> f64 {
        PI * (self.outer_diameter.powi(2) - self.inner_diameter.powi(2)) / 4.
    }

    /// Second moment of area about a diameter.
    pub fn second_moment(&self) -> f64 {
        PI * (self.outer_diameter.powi(4) - self.inner_diameter.powi(4)) / 64.
    }

    /// Shear deflection parameter for the Timoshenko stiffness.
    fn phi(&self) -> f64 {
        let nu = self.material.poisson();
        // Shear coefficient for a circular section
        let kappa = 6. * (1. + nu) / (7. + 6. * nu);
        12. * self.material.e * self.second_moment()
            / (self.material.g_s * kappa * self.area() * self.length.powi(2))
    }

    /// Element stiffness matrix, 12x12.
    pub fn k(&self) -> Mat<f64> {
        let l = self.length;
        let phi = self.phi();
        let ie = self.second_moment();
        let c = self.material.e * ie / ((1. + phi) * l.powi(3));

        #[rustfmt::skip]
        let pattern = [
            [     12.,            6. * l,     -12.,            6. * l],
            [ 6. * l, (4. + phi) * l * l, -6. * l, (2. - phi) * l * l],
            [    -12.,           -6. * l,      12.,           -6. * l],
            [ 6. * l, (2. - phi) * l * l, -6. * l, (4. + phi) * l * l],
        ];

        let mut k = Mat::<f64>::zeros(12, 12);
        add_plane(&mut k, &pattern, c, &PLANE_X, &S_X);
        add_plane(&mut k, &pattern, c, &PLANE_Y, &S_Y);

        // Axial
        let ca = self.material.e * self.area() / l;
        add_pair(&mut k, ca, 2, 8);

        // Torsion (polar area moment is twice the diametral one)
        let ct = self.material.g_s * 2. * ie / l;
        add_pair(&mut k, ct, 5, 11);

        k
    }

    /// Element mass matrix, 12x12 (consistent translational plus rotary
    /// inertia, axial and torsional terms).
    pub fn m(&self) -> Mat<f64> {
        let l = self.length;
        let rho = self.material.rho;
        let a = self.area();
        let ie = self.second_moment();

        #[rustfmt::skip]
        let translation = [
            [    156.,      22. * l,      54.,     -13. * l],
            [ 22. * l,   4. * l * l, 13. * l,  -3. * l * l],
            [     54.,      13. * l,    156.,     -22. * l],
            [-13. * l,  -3. * l * l, -22. * l,  4. * l * l],
        ];
        #[rustfmt::skip]
        let rotary = [
            [    36.,      3. * l,    -36.,     3. * l],
            [ 3. * l,  4. * l * l, -3. * l,     -l * l],
            [   -36.,     -3. * l,     36.,    -3. * l],
            [ 3. * l,      -l * l, -3. * l, 4. * l * l],
        ];

        let ct = rho * a * l / 420.;
        let cr = rho * ie / (30. * l);

        let mut m = Mat::<f64>::zeros(12, 12);
        add_plane(&mut m, &translation, ct, &PLANE_X, &S_X);
        add_plane(&mut m, &translation, ct, &PLANE_Y, &S_Y);
        add_plane(&mut m, &rotary, cr, &PLANE_X, &S_X);
        add_plane(&mut m, &rotary, cr, &PLANE_Y, &S_Y);

        // Axial: rho A L / 6 * [2 1; 1 2]
        let ca = rho * a * l / 6.;
        m[(2, 2)] += 2. * ca;
        m[(8, 8)] += 2. * ca;
        m[(2, 8)] += ca;
        m[(8, 2)] += ca;

        // Torsional inertia: rho Jp L / 6 * [2 1; 1 2]
        let cj = rho * 2. * ie * l / 6.;
        m[(5, 5)] += 2. * cj;
        m[(11, 11)] += 2. * cj;
        m[(5, 11)] += cj;
        m[(11, 5)] += cj;

        m
    }

    /// Consistent gyroscopic matrix, 12x12, skew-symmetric. Must be
    /// multiplied by the rotor speed externally.
    pub fn g(&self) -> Mat<f64> {
        let mut g = Mat::<f64>::zeros(12, 12);
        let pattern = self.rotary_pattern();
        let c = self.material.rho * 2. * self.second_moment() / (30. * self.length);

        for i in 0..4 {
            for j in 0..4 {
                let v = c * S_X[i] * S_Y[j] * pattern[i][j];
                g[(PLANE_X[i], PLANE_Y[j])] += v;
                g[(PLANE_Y[j], PLANE_X[i])] -= v;
            }
        }
        g
    }

    /// Transient-motion stiffness matrix, 12x12. Must be multiplied by the
    /// angular acceleration externally.
    pub fn kst(&self) -> Mat<f64> {
        let mut kst = Mat::<f64>::zeros(12, 12);
        let pattern = self.rotary_pattern();
        let c = self.material.rho * 2. * self.second_moment() / (30. * self.length);

        for i in 0..4 {
            for j in 0..4 {
                kst[(PLANE_X[i], PLANE_Y[j])] += c * S_X[i] * S_Y[j] * pattern[i][j];
            }
        }
        kst
    }

    fn rotary_pattern(&self) -> [[f64; 4]; 4] {
        let l = self.length;
        [
            [36., 3. * l, -36., 3. * l],
            [3. * l, 4. * l * l, -3. * l, -l * l],
            [-36., -3. * l, 36., -3. * l],
            [3. * l, -l * l, -3. * l, 4. * l * l],
        ]
    }
}

/// Scatters a symmetric 4x4 lateral-plane pattern into the 12x12 element
/// matrix, applying the plane's DOF sign convention.
fn add_plane(m: &mut Mat<f64>, pattern: &[[f64; 4]; 4], c: f64, dofs: &[usize; 4], s: &[f64; 4]) {
    for i in 0..4 {
        for j in 0..4 {
            m[(dofs[i], dofs[j])] += c * s[i] * s[j] * pattern[i][j];
        }
    }
}

/// Adds a `c * [1 -1; -1 1]` pair coupling between two DOFs.
fn add_pair(m: &mut Mat<f64>, c: f64, i: usize, j: usize) {
    m[(i, i)] += c;
    m[(j, j)] += c;
    m[(i, j)] -= c;
    m[(j, i)] -= c;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> ShaftElement {
        ShaftElement::new(0, 0.25, 0., 0.05, Material::steel())
    }

    #[test]
    fn test_stiffness_symmetric() {
        let k = element().k();
        for i in 0..12 {
            for j in 0..12 {
                assert!((k[(i, j)] - k[(j, i)]).abs() <= 1e-6 * k[(i, i)].abs().max(1.));
            }
        }
    }

    #[test]
    fn test_mass_symmetric_positive_diagonal() {
        let m = element().m();
        for i in 0..12 {
            assert!(m[(i, i)] > 0.);
            for j in 0..12 {
                assert!((m[(i, j)] - m[(j, i)]).abs() <= 1e-12 * m[(i, i)].abs().max(1.));
            }
        }
    }

    #[test]
    fn test_gyroscopic_skew_symmetric() {
        let g = element().g();
        for i in 0..12 {
            for j in 0..12 {
                assert!((g[(i, j)] + g[(j, i)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rigid_body_translation_has_no_stiffness_force() {
        // Uniform lateral translation of both nodes produces zero elastic force
        let k = element().k();
        for row in 0..12 {
            let f: f64 = k[(row, 0)] + k[(row, 6)];
            assert!(f.abs() < 1e-3, "row {row}: {f}");
        }
    }

    #[test]
    fn test_total_mass() {
        let e = element();
        let m = e.m();
        // Sum of x-translation mass terms recovers the element mass
        let total = m[(0, 0)] + m[(0, 6)] + m[(6, 0)] + m[(6, 6)];
        let expected = e.material.rho * e.area() * e.length;
        assert!((total - expected).abs() < 1e-9 * expected);
    }
}
