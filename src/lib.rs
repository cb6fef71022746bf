//! Rotor dynamics finite-element modeling: single rotors assembled from
//! shaft, disk, gear, bearing and point-mass elements, and gear-coupled
//! multi-rotor systems built on top of them.

pub mod elements;
pub mod error;
pub mod figure;
pub mod io;
pub mod material;
pub mod multi_rotor;
pub mod rotor;

pub use error::RotorError;
pub use multi_rotor::{MultiRotor, Position};
pub use rotor::Rotor;

use faer::Mat;

use elements::Element;
use figure::Trace;

/// The rotor accessor contract.
///
/// Implemented by both `Rotor` and `MultiRotor`, so a multi-rotor can be
/// used wherever a single rotor is expected, including as one side of
/// another multi-rotor. All matrix accessors return square matrices of size
/// `ndof` and are pure: repeated calls never mutate the model.
pub trait RotorModel: Clone {
    /// Degrees of freedom per node.
    fn number_dof(&self) -> usize;
    /// Total degrees of freedom.
    fn ndof(&self) -> usize;
    /// Shaft node ids, ascending.
    fn nodes(&self) -> &[usize];
    /// Nodes referenced only through links (bearing pedestals, point masses).
    fn link_nodes(&self) -> &[usize];
    /// Axial position of each shaft node.
    fn nodes_pos(&self) -> &[f64];
    /// Lateral centerline position at each shaft node.
    fn center_line_pos(&self) -> &[f64];
    fn elements(&self) -> &[Element];
    /// The 6 global DOF indices of `node`, if the node belongs to the model.
    fn dof_indices(&self, node: usize) -> Option<[usize; 6]>;
    /// Drawable traces of the rotor diagram.
    fn traces(&self) -> Vec<Trace>;

    /// Mass matrix at the excitation `frequency`.
    fn m(&self, frequency: f64, synchronous: bool) -> Mat<f64>;
    /// Stiffness matrix at the excitation `frequency`, skipping elements
    /// whose tag is listed in `ignore`.
    fn k(&self, frequency: f64, ignore: &[&str]) -> Mat<f64>;
    /// Damping matrix at the excitation `frequency`, skipping elements whose
    /// tag is listed in `ignore`.
    fn c(&self, frequency: f64, ignore: &[&str]) -> Mat<f64>;
    /// Gyroscopic matrix, to be multiplied by the rotor speed externally.
    fn g(&self) -> Mat<f64>;
    /// Transient-motion stiffness matrix, to be multiplied by the angular
    /// acceleration externally.
    fn ksdt(&self) -> Mat<f64>;
}
