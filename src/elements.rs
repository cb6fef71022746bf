pub mod bearing;
pub mod disk;
pub mod point_mass;
pub mod shaft;

use serde::{Deserialize, Serialize};

use bearing::BearingElement;
use disk::{DiskElement, GearElement};
use point_mass::PointMassElement;
use shaft::ShaftElement;

/// A rotor element, tagged by kind.
///
/// Matrix contributions are dispatched by matching on the variant during
/// assembly; each record carries only the fields relevant to its kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Shaft(ShaftElement),
    Disk(DiskElement),
    Gear(GearElement),
    Bearing(BearingElement),
    PointMass(PointMassElement),
}

impl Element {
    /// Node the element is attached to. For shaft elements this is the left
    /// node; the right node is `node() + 1`.
    pub fn node(&self) -> usize {
        match self {
            Element::Shaft(e) => e.node,
            Element::Disk(e) => e.node,
            Element::Gear(e) => e.node,
            Element::Bearing(e) => e.node,
            Element::PointMass(e) => e.node,
        }
    }

    /// Cross-referenced node, if any (bearing far side).
    pub fn link_node(&self) -> Option<usize> {
        match self {
            Element::Bearing(e) => e.link_node,
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Element::Shaft(e) => e.tag.as_deref(),
            Element::Disk(e) => e.tag.as_deref(),
            Element::Gear(e) => e.tag.as_deref(),
            Element::Bearing(e) => e.tag.as_deref(),
            Element::PointMass(e) => e.tag.as_deref(),
        }
    }

    /// Returns a copy of the element with every node id (own and linked)
    /// shifted by `offset`. The original element is left untouched.
    pub fn with_node_offset(&self, offset: usize) -> Element {
        let mut elm = self.clone();
        match &mut elm {
            Element::Shaft(e) => e.node += offset,
            Element::Disk(e) => e.node += offset,
            Element::Gear(e) => e.node += offset,
            Element::Bearing(e) => {
                e.node += offset;
                if let Some(n) = e.link_node.as_mut() {
                    *n += offset;
                }
            }
            Element::PointMass(e) => e.node += offset,
        }
        elm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    #[test]
    fn test_node_offset_is_pure() {
        let mut bearing = BearingElement::new(2, 1e6, 1e6, 10., 10.);
        bearing.link_node = Some(7);
        let elm = Element::Bearing(bearing);
        let shifted = elm.with_node_offset(5);
        assert_eq!(elm.node(), 2);
        assert_eq!(elm.link_node(), Some(7));
        assert_eq!(shifted.node(), 7);
        assert_eq!(shifted.link_node(), Some(12));
    }

    #[test]
    fn test_shaft_offset() {
        let elm = Element::Shaft(ShaftElement::new(0, 0.25, 0., 0.05, Material::steel()));
        assert_eq!(elm.with_node_offset(4).node(), 4);
        assert_eq!(elm.link_node(), None);
    }
}
