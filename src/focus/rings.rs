use std::f32::consts::TAU;

use crate::config::LayoutConfig;
use crate::geometry::{Polar, Vec2, Viewport};

use super::Neighborhood;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ring {
    /// Theorems and problems of the focused concept, at `inner_ring_factor * R`.
    SubElement,
    /// Direct prerequisites and dependents, at `R`.
    Prerequisite,
    /// Sub-concepts and related concepts, at `outer_ring_factor * R`.
    Outer,
}

impl Ring {
    pub const ALL: [Ring; 3] = [Ring::SubElement, Ring::Prerequisite, Ring::Outer];

    pub fn factor(self, config: &LayoutConfig) -> f32 {
        match self {
            Self::SubElement => config.inner_ring_factor,
            Self::Prerequisite => 1.0,
            Self::Outer => config.outer_ring_factor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RingSlot {
    pub id: String,
    pub ring: Ring,
}

pub fn ring_radius(ring: Ring, base_radius: f32, config: &LayoutConfig) -> f32 {
    base_radius * ring.factor(config)
}

/// `R`, shrunk so the widest occupied ring stays inside the viewport bounds
/// around `center`. Empty rings do not constrain it.
pub fn effective_ring_radius(
    neighborhood: &Neighborhood,
    viewport: Viewport,
    center: Vec2,
    config: &LayoutConfig,
) -> f32 {
    let margin = config.node_radius;
    let room = (center.x - margin)
        .min(viewport.width() - margin - center.x)
        .min(center.y - margin)
        .min(viewport.height() - margin - center.y)
        .max(0.0);
    let widest = neighborhood
        .rings
        .iter()
        .map(|slot| slot.ring.factor(config))
        .fold(0.0_f32, f32::max);
    if widest <= 0.0 {
        return config.ring_radius;
    }
    config.ring_radius.min(room / widest)
}

/// Deterministic `(radius, angle)` for every ring member: member `k` of `n`
/// on a ring sits at angle `2πk/n`, in neighborhood order.
pub fn place_rings(
    neighborhood: &Neighborhood,
    base_radius: f32,
    config: &LayoutConfig,
) -> Vec<(String, Polar)> {
    let mut placements = Vec::with_capacity(neighborhood.rings.len());
    for ring in Ring::ALL {
        let members = neighborhood
            .rings
            .iter()
            .filter(|slot| slot.ring == ring)
            .collect::<Vec<_>>();
        let count = members.len();
        let radius = ring_radius(ring, base_radius, config);
        for (index, slot) in members.into_iter().enumerate() {
            let angle = TAU * index as f32 / count as f32;
            placements.push((slot.id.clone(), Polar { radius, angle }));
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighborhood(slots: &[(&str, Ring)]) -> Neighborhood {
        let mut visible_nodes = vec!["focus".to_owned()];
        visible_nodes.extend(slots.iter().map(|(id, _)| (*id).to_owned()));
        Neighborhood {
            focused: "focus".into(),
            visible_nodes,
            visible_edges: Vec::new(),
            rings: slots
                .iter()
                .map(|(id, ring)| RingSlot {
                    id: (*id).to_owned(),
                    ring: *ring,
                })
                .collect(),
        }
    }

    #[test]
    fn rings_space_members_evenly_per_ring() {
        let config = LayoutConfig::default();
        let placements = place_rings(
            &neighborhood(&[
                ("a", Ring::Prerequisite),
                ("t", Ring::SubElement),
                ("b", Ring::Prerequisite),
                ("r", Ring::Outer),
            ]),
            100.0,
            &config,
        );

        let find = |id: &str| placements.iter().find(|(slot, _)| slot == id).unwrap().1;
        assert_eq!(find("t"), Polar { radius: 50.0, angle: 0.0 });
        assert_eq!(find("a"), Polar { radius: 100.0, angle: 0.0 });
        assert_eq!(find("b").radius, 100.0);
        assert!((find("b").angle - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(find("r").radius, 150.0);
    }

    #[test]
    fn ring_radius_shrinks_to_fit_viewport() {
        let config = LayoutConfig::default();
        let full = neighborhood(&[("a", Ring::Prerequisite), ("r", Ring::Outer)]);
        let viewport = Viewport::new(600.0, 400.0).unwrap();
        let radius = effective_ring_radius(&full, viewport, viewport.center(), &config);
        assert!((radius - (200.0 - 28.0) / 1.5).abs() < 1e-4);

        let roomy = Viewport::new(2000.0, 2000.0).unwrap();
        assert_eq!(effective_ring_radius(&full, roomy, roomy.center(), &config), 180.0);
    }

    #[test]
    fn empty_outer_ring_does_not_shrink_radius() {
        let config = LayoutConfig::default();
        let viewport = Viewport::new(400.0, 360.0).unwrap();
        let center = viewport.center();

        let prerequisites_only = neighborhood(&[("a", Ring::Prerequisite), ("b", Ring::Prerequisite)]);
        let radius = effective_ring_radius(&prerequisites_only, viewport, center, &config);
        assert!((radius - (180.0 - 28.0)).abs() < 1e-4);

        let theorems_only = neighborhood(&[("t", Ring::SubElement)]);
        assert_eq!(effective_ring_radius(&theorems_only, viewport, center, &config), 180.0);

        assert_eq!(effective_ring_radius(&neighborhood(&[]), viewport, center, &config), 180.0);
    }
}
