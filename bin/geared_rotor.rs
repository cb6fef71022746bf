use std::process;

use rotordyn::elements::disk::GearElement;
use rotordyn::elements::shaft::ShaftElement;
use rotordyn::elements::{bearing::BearingElement, Element};
use rotordyn::material::Material;
use rotordyn::{MultiRotor, Position, Rotor};

/// Builds a two-node-supported rotor with a gear at `gear_node`.
fn rotor(n_elem: usize, pitch_diameter: f64, gear_node: usize) -> Rotor {
    let steel = Material::steel();

    let mut elements = (0..n_elem)
        .map(|i| Element::Shaft(ShaftElement::new(i, 0.25, 0., 0.05, steel.clone())))
        .collect::<Vec<_>>();

    let gear = match GearElement::from_geometry(
        gear_node,
        &steel,
        0.05,
        0.05,
        pitch_diameter,
        20f64.to_radians(),
    ) {
        Ok(g) => g,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    elements.push(Element::Gear(gear));

    elements.push(Element::Bearing(BearingElement::new(0, 1e6, 0.8e6, 10., 10.)));
    elements.push(Element::Bearing(BearingElement::new(
        n_elem, 1e6, 0.8e6, 10., 10.,
    )));

    match Rotor::new(elements) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn main() {
    let drive = rotor(6, 0.3, 3);
    let driven = rotor(4, 0.15, 0);

    let geared = match MultiRotor::new(drive, driven, (3, 0), 2., 1e8, Position::Above) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    println!("combined ndof:  {}", geared.ndof);
    println!("node offset:    {}", geared.node_offset);
    println!("dz, dy:         {:.4}, {:.4}", geared.dz_pos, geared.dy_pos);
    println!("nodes:          {:?}", geared.nodes);

    let speed = 100.;
    let k = geared.k(speed, &[]);
    let m = geared.m(speed, false);
    let g = geared.g();
    println!("K: {}x{}   M: {}x{}   G: {}x{}",
        k.nrows(), k.ncols(), m.nrows(), m.ncols(), g.nrows(), g.ncols());

    // Largest mesh-coupling term for a quick sanity check
    let kg = geared.gear_mesh_stiffness;
    let r1 = geared.gears.0.base_radius;
    println!("mesh stiffness: {kg:.3e}, gear 1 base radius: {r1:.4}");
}
