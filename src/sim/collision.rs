//! Overlap tests between bounding shapes
//!
//! Circles and axis-aligned boxes only. Touching counts as overlapping, so a
//! bullet grazing an enemy still connects.

use glam::Vec2;

use super::entity::{Entity, Shape};

/// Circle vs circle
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

/// Box vs box (both centered, axis-aligned)
#[inline]
pub fn boxes_overlap(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> bool {
    let delta = (a_pos - b_pos).abs();
    let reach = a_half + b_half;
    delta.x <= reach.x && delta.y <= reach.y
}

/// Circle vs box: clamp the circle center onto the box and measure
#[inline]
pub fn circle_box_overlap(c_pos: Vec2, radius: f32, b_pos: Vec2, b_half: Vec2) -> bool {
    let closest = c_pos.clamp(b_pos - b_half, b_pos + b_half);
    c_pos.distance_squared(closest) <= radius * radius
}

/// Shape vs shape at the given positions
pub fn shapes_overlap(a_pos: Vec2, a: &Shape, b_pos: Vec2, b: &Shape) -> bool {
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circles_overlap(a_pos, ra, b_pos, rb)
        }
        (Shape::Aabb { half_extents: ha }, Shape::Aabb { half_extents: hb }) => {
            boxes_overlap(a_pos, ha, b_pos, hb)
        }
        (Shape::Circle { radius }, Shape::Aabb { half_extents }) => {
            circle_box_overlap(a_pos, radius, b_pos, half_extents)
        }
        (Shape::Aabb { half_extents }, Shape::Circle { radius }) => {
            circle_box_overlap(b_pos, radius, a_pos, half_extents)
        }
    }
}

/// Whether two entities' bounding shapes overlap
#[inline]
pub fn entities_overlap(a: &Entity, b: &Entity) -> bool {
    shapes_overlap(a.pos, &a.shape, b.pos, &b.shape)
}

/// Whether a point lies inside `[0, width] × [0, height]` (edges included)
#[inline]
pub fn in_bounds(pos: Vec2, width: f32, height: f32) -> bool {
    (0.0..=width).contains(&pos.x) && (0.0..=height).contains(&pos.y)
}
