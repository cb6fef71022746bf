use itertools::Itertools;

use crate::elements::Element;
use crate::rotor::Rotor;

pub const SHAFT_GROUP: &str = "shaft";
pub const DISKS_GROUP: &str = "disks";
pub const GEARS_GROUP: &str = "gears";
pub const BEARINGS_GROUP: &str = "bearings";

/// A drawable polygon trace of a rotor diagram.
///
/// The structured `node` and y-extent fields are the authoritative geometry
/// consumed by the multi-rotor merge; `text` is the hover annotation shown
/// by the visualization layer.
#[derive(Debug, Clone)]
pub struct Trace {
    pub legend_group: &'static str,
    pub name: Option<String>,
    /// Hosting node for element patches that identify one (gears).
    pub node: Option<usize>,
    pub z: Vec<f64>,
    pub y: Vec<f64>,
    pub text: String,
}

impl Trace {
    pub fn y_max(&self) -> f64 {
        self.y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn y_min(&self) -> f64 {
        self.y.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Shifts the trace geometry and node id, used when placing a secondary
    /// rotor in a combined diagram. The hover text is display-only and is
    /// kept as rendered by the owning rotor.
    pub fn shifted(&self, dz: f64, dy: f64, node_offset: usize) -> Trace {
        Trace {
            legend_group: self.legend_group,
            name: self.name.clone(),
            node: self.node.map(|n| n + node_offset),
            z: self.z.iter().map(|z| z + dz).collect_vec(),
            y: self.y.iter().map(|y| y + dy).collect_vec(),
            text: self.text.clone(),
        }
    }
}

/// Renders a rotor into a collection of traces: shaft rectangles, disk and
/// gear patches above/below the centerline, bearing markers.
pub fn rotor_traces(rotor: &Rotor) -> Vec<Trace> {
    let mut traces = vec![];

    for e in &rotor.elements {
        match e {
            Element::Shaft(s) => {
                let z0 = axial_position(rotor, s.node);
                let r = s.outer_diameter / 2.;
                let yc = centerline(rotor, s.node);
                traces.push(Trace {
                    legend_group: SHAFT_GROUP,
                    name: s.tag.clone(),
                    node: None,
                    z: vec![z0, z0 + s.length, z0 + s.length, z0],
                    y: vec![yc - r, yc - r, yc + r, yc + r],
                    text: format!("Shaft Node: {}<br>Length: {:.3}<br>", s.node, s.length),
                });
            }
            Element::Disk(d) => {
                let zpos = axial_position(rotor, d.node);
                let ypos = shaft_radius_at(rotor, d.node);
                let yc = centerline(rotor, d.node);
                let height = 0.3 * d.scale_factor;
                let half_z = d.scale_factor * 1.3 / 25.;
                let (z, y) = two_lobe_patch(zpos, ypos, yc, half_z, height);
                traces.push(Trace {
                    legend_group: DISKS_GROUP,
                    name: d.tag.clone(),
                    node: Some(d.node),
                    z,
                    y,
                    text: format!(
                        "Disk Node: {}<br>Polar Inertia: {:.3e}<br>Diametral Inertia: {:.3e}<br>Disk Mass: {:.3}<br>",
                        d.node, d.polar_inertia, d.diametral_inertia, d.mass
                    ),
                });
            }
            Element::Gear(g) => {
                let zpos = axial_position(rotor, g.node);
                let ypos = shaft_radius_at(rotor, g.node);
                let yc = centerline(rotor, g.node);
                // Patch radius contract: the lobes span
                // y in +-[ypos, ypos + base_radius * 1.1 + 0.05]
                let radius = g.base_radius * 1.1 + 0.05;
                let half_z = g.scale_factor * 1.3 / 25.;
                let (z, y) = two_lobe_patch(zpos, ypos, yc, half_z, radius);
                traces.push(Trace {
                    legend_group: GEARS_GROUP,
                    name: g.tag.clone(),
                    node: Some(g.node),
                    z,
                    y,
                    text: format!(
                        "Gear Node: {}<br>Polar Inertia: {:.3e}<br>Diametral Inertia: {:.3e}<br>Gear Mass: {:.3}<br>Gear Base Diam.: {:.3}<br>",
                        g.node, g.polar_inertia, g.diametral_inertia, g.mass, 2. * g.base_radius
                    ),
                });
            }
            Element::Bearing(b) => {
                let zpos = axial_position(rotor, b.node);
                let ypos = shaft_radius_at(rotor, b.node);
                let yc = centerline(rotor, b.node);
                traces.push(Trace {
                    legend_group: BEARINGS_GROUP,
                    name: b.tag.clone(),
                    node: Some(b.node),
                    z: vec![zpos - 0.02, zpos + 0.02, zpos + 0.02, zpos - 0.02],
                    y: vec![yc - ypos - 0.1, yc - ypos - 0.1, yc - ypos, yc - ypos],
                    text: format!("Bearing Node: {}<br>", b.node),
                });
            }
            Element::PointMass(_) => {}
        }
    }

    traces
}

/// Upper and lower lobes of an element patch, one polygon each, appended
/// into a single trace.
fn two_lobe_patch(
    zpos: f64,
    ypos: f64,
    yc_pos: f64,
    half_z: f64,
    height: f64,
) -> (Vec<f64>, Vec<f64>) {
    let z = vec![
        zpos + half_z,
        zpos + half_z,
        zpos - half_z,
        zpos - half_z,
        zpos + half_z,
        zpos + half_z,
        zpos - half_z,
        zpos - half_z,
    ];
    let y = vec![
        yc_pos + ypos,
        yc_pos + ypos + height,
        yc_pos + ypos + height,
        yc_pos + ypos,
        yc_pos - ypos,
        yc_pos - ypos - height,
        yc_pos - ypos - height,
        yc_pos - ypos,
    ];
    (z, y)
}

fn axial_position(rotor: &Rotor, node: usize) -> f64 {
    match rotor.nodes.iter().position(|&n| n == node) {
        Some(i) => rotor.nodes_pos[i],
        None => 0.,
    }
}

fn centerline(rotor: &Rotor, node: usize) -> f64 {
    match rotor.nodes.iter().position(|&n| n == node) {
        Some(i) => rotor.center_line_pos[i],
        None => 0.,
    }
}

/// Shaft surface radius at a node, the base y offset for mounted patches.
fn shaft_radius_at(rotor: &Rotor, node: usize) -> f64 {
    rotor
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Shaft(s) if s.node == node || s.node + 1 == node => {
                Some(s.outer_diameter / 2.)
            }
            _ => None,
        })
        .fold(0., f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::disk::GearElement;
    use crate::elements::shaft::ShaftElement;
    use crate::material::Material;

    fn rotor_with_gear(base_radius_pitch: f64) -> Rotor {
        let steel = Material::steel();
        let elements = vec![
            Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, steel.clone())),
            Element::Gear(
                GearElement::new(1, 5., 0.002, 0.004, base_radius_pitch, 20f64.to_radians())
                    .unwrap(),
            ),
        ];
        Rotor::new(elements).unwrap()
    }

    #[test]
    fn test_gear_patch_extent() {
        let rotor = rotor_with_gear(0.1);
        let traces = rotor_traces(&rotor);
        let gear = traces
            .iter()
            .find(|t| t.legend_group == GEARS_GROUP)
            .unwrap();
        assert_eq!(gear.node, Some(1));

        let base_radius = 0.05 * 20f64.to_radians().cos();
        let expected = 0.025 + base_radius * 1.1 + 0.05;
        assert!((gear.y_max() - expected).abs() < 1e-12);
        assert!((gear.y_min() + expected).abs() < 1e-12);
        assert!(gear.text.contains("Gear Node: 1"));
    }

    #[test]
    fn test_shifted_trace() {
        let rotor = rotor_with_gear(0.1);
        let traces = rotor_traces(&rotor);
        let gear = traces
            .iter()
            .find(|t| t.legend_group == GEARS_GROUP)
            .unwrap();
        let moved = gear.shifted(1.5, 0.4, 10);
        assert_eq!(moved.node, Some(11));
        assert!((moved.y_max() - gear.y_max() - 0.4).abs() < 1e-12);
        assert!((moved.z[0] - gear.z[0] - 1.5).abs() < 1e-12);
    }
}
