use faer::Mat;

use rotordyn::elements::bearing::BearingElement;
use rotordyn::elements::disk::DiskElement;
use rotordyn::elements::point_mass::PointMassElement;
use rotordyn::elements::shaft::ShaftElement;
use rotordyn::elements::Element;
use rotordyn::material::Material;
use rotordyn::{Rotor, RotorError};

fn assert_symmetric(m: &Mat<f64>, tol: f64) {
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            assert!(
                (m[(i, j)] - m[(j, i)]).abs() <= tol,
                "asymmetric at ({i}, {j}): {} vs {}",
                m[(i, j)],
                m[(j, i)]
            );
        }
    }
}

fn assert_skew_symmetric(m: &Mat<f64>, tol: f64) {
    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            assert!(
                (m[(i, j)] + m[(j, i)]).abs() <= tol,
                "not skew at ({i}, {j})"
            );
        }
    }
}

/// Two disks on a six-element shaft, supported at both ends.
fn two_disk_rotor() -> Rotor {
    let steel = Material::steel();
    let mut elements = (0..6)
        .map(|i| Element::Shaft(ShaftElement::new(i, 0.25, 0., 0.05, steel.clone())))
        .collect::<Vec<_>>();
    elements.push(Element::Disk(DiskElement::from_geometry(
        2, &steel, 0.07, 0.05, 0.28,
    )));
    elements.push(Element::Disk(DiskElement::from_geometry(
        4, &steel, 0.07, 0.05, 0.28,
    )));
    elements.push(Element::Bearing(BearingElement::new(0, 1e6, 0.8e6, 10., 10.)));
    elements.push(Element::Bearing(BearingElement::new(6, 1e6, 0.8e6, 10., 10.)));
    Rotor::new(elements).unwrap()
}

#[test]
fn test_rotor_layout() {
    let rotor = two_disk_rotor();
    assert_eq!(rotor.nodes, vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(rotor.number_dof, 6);
    assert_eq!(rotor.ndof, 42);
    assert!(rotor.link_nodes.is_empty());

    assert_eq!(rotor.nodes_pos[0], 0.);
    assert!((rotor.nodes_pos[6] - 1.5).abs() < 1e-12);
    assert!(rotor.center_line_pos.iter().all(|&y| y == 0.));

    assert_eq!(rotor.dof_indices(0), Some([0, 1, 2, 3, 4, 5]));
    assert_eq!(rotor.dof_indices(3), Some([18, 19, 20, 21, 22, 23]));
    assert_eq!(rotor.dof_indices(7), None);
}

#[test]
fn test_global_matrices() {
    let rotor = two_disk_rotor();

    let m = rotor.m(0., false);
    let k = rotor.k(0., &[]);
    let c = rotor.c(0., &[]);
    let g = rotor.g();
    let ksdt = rotor.ksdt();

    for mat in [&m, &k, &c, &g, &ksdt] {
        assert_eq!(mat.nrows(), 42);
        assert_eq!(mat.ncols(), 42);
    }

    assert_symmetric(&m, 1e-6);
    assert_symmetric(&k, 1e-3);
    assert_symmetric(&c, 1e-12);
    assert_skew_symmetric(&g, 1e-12);

    // Disk mass shows up on its node's lateral DOFs
    let steel = Material::steel();
    let disk_mass = steel.rho * std::f64::consts::PI * 0.07 * (0.28f64.powi(2) - 0.05f64.powi(2)) / 4.;
    let i = rotor.dof_indices(2).unwrap()[0];
    assert!(m[(i, i)] > disk_mass);

    // Bearing stiffness on the support nodes
    let j = rotor.dof_indices(0).unwrap()[0];
    assert!(k[(j, j)] > 1e6);
    assert!((c[(j, j)] - 10.).abs() < 1e-12);
}

#[test]
fn test_ignore_drops_tagged_element() {
    let steel = Material::steel();
    let mut bearing = BearingElement::new(0, 1e6, 1e6, 10., 10.);
    bearing.tag = Some("support".to_string());
    let elements = vec![
        Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel)),
        Element::Bearing(bearing),
    ];
    let rotor = Rotor::new(elements).unwrap();

    let k_all = rotor.k(0., &[]);
    let k_free = rotor.k(0., &["support"]);
    let c_free = rotor.c(0., &["support"]);

    let i = rotor.dof_indices(0).unwrap()[0];
    assert!((k_all[(i, i)] - k_free[(i, i)] - 1e6).abs() < 1.);
    assert_eq!(c_free[(i, i)], 0.);
}

#[test]
fn test_linked_bearing_and_point_mass() {
    let steel = Material::steel();
    let mut bearing = BearingElement::new(1, 1e7, 1e7, 0., 0.);
    bearing.link_node = Some(5);
    let elements = vec![
        Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel.clone())),
        Element::Shaft(ShaftElement::new(1, 0.25, 0., 0.05, steel)),
        Element::Bearing(bearing),
        Element::PointMass(PointMassElement::new(5, 20.)),
    ];
    let rotor = Rotor::new(elements).unwrap();

    assert_eq!(rotor.nodes, vec![0, 1, 2]);
    assert_eq!(rotor.link_nodes, vec![5]);
    // 3 shaft nodes + 1 link node
    assert_eq!(rotor.ndof, 24);

    let k = rotor.k(0., &[]);
    let m = rotor.m(0., false);
    let i = rotor.dof_indices(1).unwrap()[0];
    let l = rotor.dof_indices(5).unwrap()[0];
    assert!((k[(i, l)] + 1e7).abs() < 1.);
    assert!((k[(l, l)] - 1e7).abs() < 1.);
    assert!((m[(l, l)] - 20.).abs() < 1e-9);

    assert_symmetric(&k, 1e-3);
}

#[test]
fn test_frequency_dependent_bearing() {
    let steel = Material::steel();
    let mut bearing = BearingElement::new(0, 0., 0., 0., 0.);
    bearing.kxx = rotordyn::elements::bearing::Coefficient::Table {
        frequency: vec![0., 100.],
        value: vec![1e6, 3e6],
    };
    let elements = vec![
        Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel)),
        Element::Bearing(bearing),
    ];
    let rotor = Rotor::new(elements).unwrap();

    let i = rotor.dof_indices(0).unwrap()[0];
    let dk = rotor.k(100., &[])[(i, i)] - rotor.k(0., &[])[(i, i)];
    assert!((dk - 2e6).abs() < 1.);
}

#[test]
fn test_construction_errors() {
    let steel = Material::steel();

    assert!(matches!(Rotor::new(vec![]), Err(RotorError::EmptyRotor)));

    // Gap in the shaft chain
    let disconnected = vec![
        Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel.clone())),
        Element::Shaft(ShaftElement::new(2, 0.25, 0., 0.05, steel.clone())),
    ];
    assert!(matches!(
        Rotor::new(disconnected),
        Err(RotorError::DisconnectedShaft(2))
    ));

    // Disk on a node that does not exist
    let dangling = vec![
        Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel)),
        Element::Disk(DiskElement::new(99, 1., 1., 1.)),
    ];
    assert!(matches!(
        Rotor::new(dangling),
        Err(RotorError::UnknownNode(99))
    ));
}
