use std::f32::consts::TAU;

use crate::config::SpringConfig;
use crate::geometry::{DISTANCE_EPSILON, Vec2, distance, pair_direction};

#[derive(Clone, Copy, Debug)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) distance_min: f32,
    pub(super) distance_max: f32,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct CollisionParams {
    pub(super) radius: f32,
    pub(super) strength: f32,
}

fn direction_between(point_a: Vec2, point_b: Vec2, fallback: Vec2) -> (Vec2, f32) {
    let delta = point_a - point_b;
    let distance = distance(point_a, point_b);
    if delta.length_sq() > DISTANCE_EPSILON * DISTANCE_EPSILON {
        (delta / distance, distance)
    } else {
        (fallback, distance)
    }
}

/// Charge force on `point_a` pushed away from `point_b`.
pub(super) fn repulsion_between(
    point_a: Vec2,
    point_b: Vec2,
    fallback: Vec2,
    params: RepulsionParams,
) -> Vec2 {
    let (direction, distance) = direction_between(point_a, point_b, fallback);
    if distance > params.distance_max {
        return Vec2::ZERO;
    }

    let floored = distance.max(params.distance_min).max(DISTANCE_EPSILON);
    direction * (params.strength / (floored * floored))
}

pub(super) fn accumulate_pairwise(
    positions: &[Vec2],
    repulsion: RepulsionParams,
    collision: CollisionParams,
    forces: &mut [Vec2],
) {
    let min_distance = collision.radius * 2.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let fallback = pair_direction(i, j);
            let force = repulsion_between(positions[i], positions[j], fallback, repulsion);
            forces[i] += force;
            forces[j] -= force;

            if collision.strength <= 0.0 || min_distance <= 0.0 {
                continue;
            }
            let (direction, distance) = direction_between(positions[i], positions[j], fallback);
            if distance < min_distance {
                let overlap_push = (min_distance - distance) * collision.strength * 0.5;
                forces[i] += direction * overlap_push;
                forces[j] -= direction * overlap_push;
            }
        }
    }
}

/// Spring correction `(source_force, target_force)` for one edge.
///
/// `bias` is the share of the correction carried by the target, so the
/// lower-degree endpoint moves further.
pub(super) fn spring_between(
    source: Vec2,
    target: Vec2,
    spring: SpringConfig,
    bias: f32,
    fallback: Vec2,
) -> (Vec2, Vec2) {
    let (direction, distance) = direction_between(target, source, fallback);
    let stretch = (distance - spring.rest_length) * spring.strength;
    let correction = direction * stretch;
    (correction * (1.0 - bias), -correction * bias)
}

pub(super) fn centering(position: Vec2, center: Vec2, strength: f32) -> Vec2 {
    (center - position) * strength
}

/// Pull along the ray from `center` so the node settles at `target_radius`.
pub(super) fn radial_bias(
    position: Vec2,
    center: Vec2,
    target_radius: f32,
    strength: f32,
    index: usize,
) -> Vec2 {
    let offset = position - center;
    let radius = offset.length();
    let direction = if radius > DISTANCE_EPSILON {
        offset / radius
    } else {
        Vec2::angled(((index as f32) * 0.618_034 + 0.37) * TAU)
    };
    direction * ((target_radius - radius) * strength)
}
