use std::collections::BTreeMap;

use faer::Mat;
use itertools::Itertools;

use crate::elements::shaft::DOF_PER_NODE;
use crate::elements::Element;
use crate::error::RotorError;
use crate::figure::{rotor_traces, Trace};
use crate::RotorModel;

/// A single-rotor finite-element assembly with 6 DOF per node.
///
/// Shaft elements define the node chain and axial positions; disks, gears,
/// bearings and point masses attach to it. Global matrices are assembled
/// dense and recomputed on every call since they depend on the excitation
/// frequency.
#[derive(Debug, Clone)]
pub struct Rotor {
    pub elements: Vec<Element>,
    /// Shaft node ids, ascending.
    pub nodes: Vec<usize>,
    /// Nodes referenced only through bearing links or point masses.
    pub link_nodes: Vec<usize>,
    /// Axial position of each shaft node.
    pub nodes_pos: Vec<f64>,
    /// Lateral position of the centerline at each shaft node.
    pub center_line_pos: Vec<f64>,
    pub number_dof: usize,
    pub ndof: usize,
    pub tag: Option<String>,
    /// First global DOF of each node (shaft nodes first, then link nodes).
    dof_base: BTreeMap<usize, usize>,
}

impl Rotor {
    pub fn new(elements: Vec<Element>) -> Result<Self, RotorError> {
        let shafts = elements
            .iter()
            .filter_map(|e| match e {
                Element::Shaft(s) => Some(s),
                _ => None,
            })
            .sorted_by_key(|s| s.node)
            .collect_vec();

        if shafts.is_empty() {
            return Err(RotorError::EmptyRotor);
        }

        // Axial positions follow the shaft chain
        let mut pos = BTreeMap::new();
        pos.insert(shafts[0].node, 0.);
        for s in &shafts {
            let left = *pos.get(&s.node).ok_or(RotorError::DisconnectedShaft(s.node))?;
            pos.insert(s.node + 1, left + s.length);
        }

        let nodes = pos.keys().copied().collect_vec();
        let nodes_pos = pos.values().copied().collect_vec();

        let link_nodes = elements
            .iter()
            .filter_map(|e| match e {
                Element::Bearing(b) => b.link_node,
                Element::PointMass(p) => Some(p.node),
                _ => None,
            })
            .filter(|n| !pos.contains_key(n))
            .sorted()
            .dedup()
            .collect_vec();

        // Everything except links must sit on a shaft node
        for e in &elements {
            let n = e.node();
            let known = pos.contains_key(&n) || link_nodes.contains(&n);
            if !known {
                return Err(RotorError::UnknownNode(n));
            }
        }

        let mut dof_base = BTreeMap::new();
        for (i, &n) in nodes.iter().enumerate() {
            dof_base.insert(n, DOF_PER_NODE * i);
        }
        for (j, &n) in link_nodes.iter().enumerate() {
            dof_base.insert(n, DOF_PER_NODE * (nodes.len() + j));
        }

        let ndof = DOF_PER_NODE * (nodes.len() + link_nodes.len());
        let center_line_pos = vec![0.; nodes.len()];

        Ok(Self {
            elements,
            nodes,
            link_nodes,
            nodes_pos,
            center_line_pos,
            number_dof: DOF_PER_NODE,
            ndof,
            tag: None,
            dof_base,
        })
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    /// The 6 global DOF indices of `node`, or None if the node is not part
    /// of this rotor.
    pub fn dof_indices(&self, node: usize) -> Option<[usize; 6]> {
        let base = *self.dof_base.get(&node)?;
        Some([base, base + 1, base + 2, base + 3, base + 4, base + 5])
    }

    fn node_dofs(&self, node: usize) -> [usize; 6] {
        let base = self.dof_base[&node];
        [base, base + 1, base + 2, base + 3, base + 4, base + 5]
    }

    fn shaft_dofs(&self, node: usize) -> [usize; 12] {
        let left = self.dof_base[&node];
        let right = self.dof_base[&(node + 1)];
        [
            left,
            left + 1,
            left + 2,
            left + 3,
            left + 4,
            left + 5,
            right,
            right + 1,
            right + 2,
            right + 3,
            right + 4,
            right + 5,
        ]
    }

    /// Lateral DOFs (x, y) of a bearing, including the link node pair when
    /// the bearing is not grounded.
    fn bearing_dofs(&self, node: usize, link_node: Option<usize>) -> Vec<usize> {
        let base = self.dof_base[&node];
        let mut dofs = vec![base, base + 1];
        if let Some(l) = link_node {
            let lbase = self.dof_base[&l];
            dofs.push(lbase);
            dofs.push(lbase + 1);
        }
        dofs
    }

    fn skipped(&self, e: &Element, ignore: &[&str]) -> bool {
        matches!(e.tag(), Some(t) if ignore.contains(&t))
    }

    /// Global mass matrix. `synchronous` selects synchronous analysis and is
    /// accepted for interface compatibility; the element formulas used here
    /// are identical in both cases.
    pub fn m(&self, frequency: f64, _synchronous: bool) -> Mat<f64> {
        let mut m0 = Mat::<f64>::zeros(self.ndof, self.ndof);
        for e in &self.elements {
            match e {
                Element::Shaft(s) => add_at(&mut m0, &s.m(), &self.shaft_dofs(s.node)),
                Element::Disk(d) => add_at(&mut m0, &d.m(), &self.node_dofs(d.node)),
                Element::Gear(g) => add_at(&mut m0, &g.m(), &self.node_dofs(g.node)),
                Element::Bearing(b) => add_at(
                    &mut m0,
                    &b.m(frequency),
                    &self.bearing_dofs(b.node, b.link_node),
                ),
                Element::PointMass(p) => {
                    let base = self.dof_base[&p.node];
                    add_at(&mut m0, &p.m(), &[base, base + 1]);
                }
            }
        }
        m0
    }

    /// Global stiffness matrix at `frequency`. Elements whose tag is listed
    /// in `ignore` are left out.
    pub fn k(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        let mut k0 = Mat::<f64>::zeros(self.ndof, self.ndof);
        for e in &self.elements {
            if self.skipped(e, ignore) {
                continue;
            }
            match e {
                Element::Shaft(s) => add_at(&mut k0, &s.k(), &self.shaft_dofs(s.node)),
                Element::Bearing(b) => add_at(
                    &mut k0,
                    &b.k(frequency),
                    &self.bearing_dofs(b.node, b.link_node),
                ),
                _ => {}
            }
        }
        k0
    }

    /// Global damping matrix at `frequency`. Elements whose tag is listed in
    /// `ignore` are left out.
    pub fn c(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        let mut c0 = Mat::<f64>::zeros(self.ndof, self.ndof);
        for e in &self.elements {
            if self.skipped(e, ignore) {
                continue;
            }
            if let Element::Bearing(b) = e {
                add_at(
                    &mut c0,
                    &b.c(frequency),
                    &self.bearing_dofs(b.node, b.link_node),
                );
            }
        }
        c0
    }

    /// Global gyroscopic matrix. Multiplied by the rotor speed externally.
    pub fn g(&self) -> Mat<f64> {
        let mut g0 = Mat::<f64>::zeros(self.ndof, self.ndof);
        for e in &self.elements {
            match e {
                Element::Shaft(s) => add_at(&mut g0, &s.g(), &self.shaft_dofs(s.node)),
                Element::Disk(d) => add_at(&mut g0, &d.g(), &self.node_dofs(d.node)),
                Element::Gear(g) => add_at(&mut g0, &g.g(), &self.node_dofs(g.node)),
                _ => {}
            }
        }
        g0
    }

    /// Global transient-motion stiffness matrix. Multiplied by the angular
    /// acceleration externally.
    pub fn ksdt(&self) -> Mat<f64> {
        let mut k0 = Mat::<f64>::zeros(self.ndof, self.ndof);
        for e in &self.elements {
            match e {
                Element::Shaft(s) => add_at(&mut k0, &s.kst(), &self.shaft_dofs(s.node)),
                Element::Disk(d) => add_at(&mut k0, &d.kst(), &self.node_dofs(d.node)),
                Element::Gear(g) => add_at(&mut k0, &g.kst(), &self.node_dofs(g.node)),
                _ => {}
            }
        }
        k0
    }
}

impl RotorModel for Rotor {
    fn number_dof(&self) -> usize {
        self.number_dof
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
        Rotor::dof_indices(self, node)
    }
    fn traces(&self) -> Vec<Trace> {
        rotor_traces(self)
    }
    fn m(&self, frequency: f64, synchronous: bool) -> Mat<f64> {
        Rotor::m(self, frequency, synchronous)
    }
    fn k(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        Rotor::k(self, frequency, ignore)
    }
    fn c(&self, frequency: f64, ignore: &[&str]) -> Mat<f64> {
        Rotor::c(self, frequency, ignore)
    }
    fn g(&self) -> Mat<f64> {
        Rotor::g(self)
    }
    fn ksdt(&self) -> Mat<f64> {
        Rotor::ksdt(self)
    }
}

/// Scatter-adds an element matrix into the global matrix at `dofs`.
fn add_at(global: &mut Mat<f64>, local: &Mat<f64>, dofs: &[usize]) {
    for (i, &gi) in dofs.iter().enumerate() {
        for (j, &gj) in dofs.iter().enumerate() {
            global[(gi, gj)] += local[(i, j)];
        }
    }
}
