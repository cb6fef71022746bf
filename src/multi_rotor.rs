use faer::{mat, Mat, Scale};
use itertools::Itertools;

use crate::elements::disk::GearElement;
use crate::elements::Element;
use crate::error::RotorError;
use crate::figure::{Trace, GEARS_GROUP};
use crate::RotorModel;

/// Side of the primary rotor on which the secondary rotor is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Above,
    Below,
}

/// Two rotors coupled through a gear mesh.
///
/// The drive (primary) rotor keeps its node numbering; the driven
/// (secondary) rotor's nodes are renumbered to stay globally unique, its
/// geometry is shifted so that the two gear patches sit tangent at the same
/// axial station, and its frequency/speed-dependent matrices are evaluated
/// at `gear_ratio` times the drive rotor's argument. The gear mesh itself
/// enters the stiffness matrix as a 12x12 block over the two gears' DOFs.
///
/// The input rotors are copied; the caller's originals are never mutated.
#[derive(Debug, Clone)]
pub struct MultiRotor<R1: RotorModel, R2: RotorModel> {
    pub rotors: (R1, R2),
    /// Coupling gears, with node ids in the combined numbering. The gear at
    /// the drive rotor's coupling node is always gear 1.
    pub gears: (GearElement, GearElement),
    /// Speed ratio of the driven rotor relative to the drive rotor.
    pub gear_ratio: f64,
    pub gear_mesh_stiffness: f64,
    /// Offset added to every driven-rotor node id, zero when the id ranges
    /// are already disjoint.
    pub node_offset: usize,
    /// Axial shift aligning the two gears at the same station.
    pub dz_pos: f64,
    /// Lateral shift placing the driven rotor tangent to the drive rotor.
    pub dy_pos: f64,
    /// Combined element list, driven-rotor elements renumbered.
    pub elements: Vec<Element>,
    pub nodes: Vec<usize>,
    pub link_nodes: Vec<usize>,
    pub nodes_pos: Vec<f64>,
    pub center_line_pos: Vec<f64>,
    pub ndof: usize,
    pub tag: Option<String>,
    /// Global DOFs of [gear 1, gear 2], in element DOF order.
    gear_dofs: [usize; 12],
}

impl<R1: RotorModel, R2: RotorModel> MultiRotor<R1, R2> {
    pub fn new(
        drive_rotor: R1,
        driven_rotor: R2,
        coupled_nodes: (usize, usize),
        gear_ratio: f64,
        gear_mesh_stiffness: f64,
        position: Position,
    ) -> Result<Self, RotorError> {
        if drive_rotor.number_dof() != 6 {
            return Err(RotorError::WrongDofCount(drive_rotor.number_dof()));
        }
        if driven_rotor.number_dof() != 6 {
            return Err(RotorError::WrongDofCount(driven_rotor.number_dof()));
        }
        if !(gear_ratio > 0.) {
            return Err(RotorError::InvalidGearRatio(gear_ratio));
        }
        if !(gear_mesh_stiffness >= 0.) {
            return Err(RotorError::InvalidMeshStiffness(gear_mesh_stiffness));
        }

        let gear_1 = find_gear(drive_rotor.elements(), coupled_nodes.0)?;
        let gear_2 = find_gear(driven_rotor.elements(), coupled_nodes.1)?;

        // Patch extents from each rotor's own rendered diagram
        let gear1_trace = find_gear_trace(&drive_rotor.traces(), coupled_nodes.0)?;
        let gear2_trace = find_gear_trace(&driven_rotor.traces(), coupled_nodes.1)?;

        // Tangent placement regardless of the two radii
        let dy_pos = match position {
            Position::Above => (gear1_trace.y_max() - gear2_trace.y_min()).abs(),
            Position::Below => -(gear2_trace.y_max() - gear1_trace.y_min()).abs(),
        };

        let z1 = axial_position(&drive_rotor, coupled_nodes.0)?;
        let z2 = axial_position(&driven_rotor, coupled_nodes.1)?;
        let dz_pos = z1 - z2;

        // Renumber the driven rotor's nodes before capturing any coupling
        // indices
        let r1_max_node = drive_rotor
            .nodes()
            .iter()
            .chain(drive_rotor.link_nodes())
            .copied()
            .max()
            .ok_or(RotorError::EmptyRotor)?;
        let r2_min_node = driven_rotor
            .nodes()
            .iter()
            .chain(driven_rotor.link_nodes())
            .copied()
            .min()
            .ok_or(RotorError::EmptyRotor)?;
        let node_offset = if r1_max_node >= r2_min_node {
            r1_max_node + 1
        } else {
            0
        };

        let elements = drive_rotor
            .elements()
            .iter()
            .cloned()
            .chain(
                driven_rotor
                    .elements()
                    .iter()
                    .map(|e| e.with_node_offset(node_offset)),
            )
            .collect_vec();

        let nodes = drive_rotor
            .nodes()
            .iter()
            .copied()
            .chain(driven_rotor.nodes().iter().map(|n| n + node_offset))
            .collect_vec();
        debug_assert!(nodes.iter().duplicates().next().is_none());

        let link_nodes = drive_rotor
            .link_nodes()
            .iter()
            .copied()
            .chain(driven_rotor.link_nodes().iter().map(|n| n + node_offset))
            .collect_vec();

        let nodes_pos = drive_rotor
            .nodes_pos()
            .iter()
            .copied()
            .chain(driven_rotor.nodes_pos().iter().map(|z| z + dz_pos))
            .collect_vec();

        let center_line_pos = drive_rotor
            .center_line_pos()
            .iter()
            .copied()
            .chain(driven_rotor.center_line_pos().iter().map(|y| y + dy_pos))
            .collect_vec();

        let ndof = drive_rotor.ndof() + driven_rotor.ndof();

        // Coupling DOFs in the combined numbering: the driven rotor's block
        // starts right after the drive rotor's DOFs
        let dofs_1 = drive_rotor
            .dof_indices(coupled_nodes.0)
            .ok_or(RotorError::UnknownNode(coupled_nodes.0))?;
        let dofs_2 = driven_rotor
            .dof_indices(coupled_nodes.1)
            .ok_or(RotorError::UnknownNode(coupled_nodes.1))?;
        let mut gear_dofs = [0; 12];
        for i in 0..6 {
            gear_dofs[i] = dofs_1[i];
            gear_dofs[i + 6] = dofs_2[i] + drive_rotor.ndof();
        }

        let gear_2 = GearElement {
            node: gear_2.node + node_offset,
            ..gear_2
        };

        Ok(Self {
            rotors: (drive_rotor, driven_rotor),
            gears: (gear_1, gear_2),
            gear_ratio,
            gear_mesh_stiffness,
            node_offset,
            dz_pos,
            dy_pos,
            elements,
            nodes,
            link_nodes,
            nodes_pos,
            center_line_pos,
            ndof,
            tag: None,
            gear_dofs,
        })
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// Places the two rotors' matrices as diagonal blocks of the combined
    /// system matrix; cross blocks stay zero.
    fn join_matrices(&self, drive_matrix: Mat<f64>, driven_matrix: Mat<f64>) -> Mat<f64> {
        let first_ndof = self.rotors.0.ndof();
        let mut global = Mat::<f64>::zeros(self.ndof, self.ndof);
        for i in 0..first_ndof {
            for j in 0..first_ndof {
                global[(i, j)] = drive_matrix[(i, j)];
            }
        }
        for i in 0..driven_matrix.nrows() {
            for j in 0..driven_matrix.ncols() {
                global[(first_ndof + i, first_ndof + j)] = driven_matrix[(i, j)];
            }
        }
        global
    }

    /// Mass matrix. The driven rotor spins at `gear_ratio` times the drive
    /// rotor's speed, so its accessor sees the pre-scaled frequency.
    pub fn m(&self, frequency: f64, synchronous: bool) -> Mat<f64> {
        self.join_matrices(
            self.rotors.0.m(frequency, synchronous),
            self.rotors.1.m(frequency * self.gear_ratio, synchronous),
        )
    }

    /// Stiffness matrix: block join of the two rotors plus the gear-mesh
    /// coupling block at the two gears' DOFs.
    pub fn k(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        let mut k0 = self.join_matrices(
            self.rotors.0.k(frequency, ignore),
            self.rotors.1.k(frequency * self.gear_ratio, ignore),
        );

        let coupling = mesh_coupling_matrix(&self.gears.0, &self.gears.1, self.gear_mesh_stiffness);
        for (i, &gi) in self.gear_dofs.iter().enumerate() {
            for (j, &gj) in self.gear_dofs.iter().enumerate() {
                k0[(gi, gj)] += coupling[(i, j)];
            }
        }

        k0
    }

    /// Damping matrix.
    pub fn c(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        self.join_matrices(
            self.rotors.0.c(frequency, ignore),
            self.rotors.1.c(frequency * self.gear_ratio, ignore),
        )
    }

    /// Gyroscopic matrix. The result is later multiplied by the drive
    /// rotor's speed, so the driven block is scaled by the gear ratio here.
    pub fn g(&self) -> Mat<f64> {
        self.join_matrices(self.rotors.0.g(), self.rotors.1.g() * Scale(self.gear_ratio))
    }

    /// Transient-motion stiffness matrix. The result is later multiplied by
    /// the drive rotor's angular acceleration, so the driven block is scaled
    /// by the gear ratio here.
    pub fn ksdt(&self) -> Mat<f64> {
        self.join_matrices(
            self.rotors.0.ksdt(),
            self.rotors.1.ksdt() * Scale(self.gear_ratio),
        )
    }
}

impl<R1: RotorModel, R2: RotorModel> RotorModel for MultiRotor<R1, R2> {
    fn number_dof(&self) -> usize {
        self.rotors.0.number_dof()
    }
    fn ndof(&self) -> usize {
        self.ndof
    }
    fn nodes(&self) -> &[usize] {
        &self.nodes
    }
    fn link_nodes(&self) -> &[usize] {
        &self.link_nodes
    }
    fn nodes_pos(&self) -> &[f64] {
        &self.nodes_pos
    }
    fn center_line_pos(&self) -> &[f64] {
        &self.center_line_pos
    }
    fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn dof_indices(&self, node: usize) -> Option<[usize; 6]> {
        if let Some(dofs) = self.rotors.0.dof_indices(node) {
            return Some(dofs);
        }
        let shifted = node.checked_sub(self.node_offset)?;
        let dofs = self.rotors.1.dof_indices(shifted)?;
        Some(dofs.map(|d| d + self.rotors.0.ndof()))
    }

    fn traces(&self) -> Vec<Trace> {
        self.rotors
            .0
            .traces()
            .into_iter()
            .chain(
                self.rotors
                    .1
                    .traces()
                    .into_iter()
                    .map(|t| t.shifted(self.dz_pos, self.dy_pos, self.node_offset)),
            )
            .collect_vec()
    }

    fn m(&self, frequency: f64, synchronous: bool) -> Mat<f64> {
        MultiRotor::m(self, frequency, synchronous)
    }
    fn k(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        MultiRotor::k(self, frequency, ignore)
    }
    fn c(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        MultiRotor::c(self, frequency, ignore)
    }
    fn g(&self) -> Mat<f64> {
        MultiRotor::g(self)
    }
    fn ksdt(&self) -> Mat<f64> {
        MultiRotor::ksdt(self)
    }
}

/// The exactly-one gear element at `node`.
fn find_gear(elements: &[Element], node: usize) -> Result<GearElement, RotorError> {
    let mut gears = elements.iter().filter_map(|e| match e {
        Element::Gear(g) if g.node == node => Some(g.clone()),
        _ => None,
    });
    let gear = gears.next().ok_or(RotorError::MissingGear(node))?;
    if gears.next().is_some() {
        return Err(RotorError::AmbiguousGear(node));
    }
    Ok(gear)
}

/// The rendered gear patch for `node`, which must exist and be non-empty.
fn find_gear_trace(traces: &[Trace], node: usize) -> Result<Trace, RotorError> {
    traces
        .iter()
        .find(|t| t.legend_group == GEARS_GROUP && t.node == Some(node) && !t.y.is_empty())
        .cloned()
        .ok_or(RotorError::MissingGearTrace(node))
}

fn axial_position<R: RotorModel>(rotor: &R, node: usize) -> Result<f64, RotorError> {
    rotor
        .nodes()
        .iter()
        .position(|&n| n == node)
        .map(|i| rotor.nodes_pos()[i])
        .ok_or(RotorError::UnknownNode(node))
}

/// Gear-mesh coupling stiffness block, 12x12 over [gear 1, gear 2] DOFs.
///
/// Encodes a linear spring of stiffness `k_g` along the line of action: the
/// lateral DOFs couple through the pressure-angle direction cosines while
/// the torsional DOFs couple through the base-circle lever arms. Swapping
/// the gear order negates the off-diagonal coupling terms, so the gear
/// order fixed at construction must be kept.
pub fn mesh_coupling_matrix(gear_1: &GearElement, gear_2: &GearElement, k_g: f64) -> Mat<f64> {
    let beta = gear_1.pressure_angle;
    let r1 = gear_1.base_radius;
    let r2 = gear_2.base_radius;

    let s = beta.sin();
    let c = beta.cos();

    #[rustfmt::skip]
    let coupling = mat![
        [  s * s,  s * c, 0., 0., 0.,  r1 * s,  -s * s, -s * c, 0., 0., 0.,  r2 * s],
        [  s * c,  c * c, 0., 0., 0.,  r1 * c,  -s * c, -c * c, 0., 0., 0.,  r2 * c],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [ r1 * s, r1 * c, 0., 0., 0., r1 * r1, -r1 * s, -r1 * c, 0., 0., 0., r1 * r2],
        [ -s * s, -s * c, 0., 0., 0., -r1 * s,   s * s,  s * c, 0., 0., 0., -r2 * s],
        [ -s * c, -c * c, 0., 0., 0., -r1 * c,   s * c,  c * c, 0., 0., 0., -r2 * c],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [     0.,     0., 0., 0., 0.,      0.,      0.,     0., 0., 0., 0.,      0.],
        [ r2 * s, r2 * c, 0., 0., 0., r1 * r2, -r2 * s, -r2 * c, 0., 0., 0., r2 * r2],
    ];

    coupling * Scale(k_g)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gear(node: usize, pitch_diameter: f64) -> GearElement {
        GearElement::new(node, 5., 0.002, 0.004, pitch_diameter, 22.5f64.to_radians()).unwrap()
    }

    #[test]
    fn test_coupling_matrix_symmetric() {
        let m = mesh_coupling_matrix(&gear(0, 0.1), &gear(1, 0.2), 1e8);
        for i in 0..12 {
            for j in 0..12 {
                assert!(
                    (m[(i, j)] - m[(j, i)]).abs() < 1e-3,
                    "asymmetric at ({i}, {j})"
                );
            }
        }
    }

    #[test]
    fn test_coupling_matrix_entries() {
        let g1 = gear(0, 0.1);
        let g2 = gear(1, 0.2);
        let k_g = 1e7;
        let m = mesh_coupling_matrix(&g1, &g2, k_g);

        let beta = 22.5f64.to_radians();
        let (s, c) = (beta.sin(), beta.cos());
        assert!((m[(0, 0)] - k_g * s * s).abs() < 1e-6);
        assert!((m[(1, 1)] - k_g * c * c).abs() < 1e-6);
        assert!((m[(0, 6)] + k_g * s * s).abs() < 1e-6);
        assert!((m[(5, 11)] - k_g * g1.base_radius * g2.base_radius).abs() < 1e-6);
        assert!((m[(11, 11)] - k_g * g2.base_radius * g2.base_radius).abs() < 1e-6);
        // Out-of-plane DOFs carry no coupling
        for &i in &[2, 3, 4, 8, 9, 10] {
            for j in 0..12 {
                assert_eq!(m[(i, j)], 0.);
            }
        }
    }

    #[test]
    fn test_zero_mesh_stiffness_decouples() {
        let m = mesh_coupling_matrix(&gear(0, 0.1), &gear(1, 0.2), 0.);
        for i in 0..12 {
            for j in 0..12 {
                assert_eq!(m[(i, j)], 0.);
            }
        }
    }
}
