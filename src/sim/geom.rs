//! Geometry kernel shared by every other simulation component
//!
//! Axis-aligned rectangles, safe normalization, point-to-segment distance,
//! sampled line of sight and beam raycasts against static walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Half-open containment (left/top edges inside, right/bottom outside)
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}

/// Normalize a vector, mapping the zero vector to exactly zero
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Shortest distance from `p` to the segment `a`-`b`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// True if `probe` overlaps any rectangle in `walls`
#[inline]
pub fn hits_any<'a>(probe: &Rect, walls: impl IntoIterator<Item = &'a Rect>) -> bool {
    walls.into_iter().any(|w| probe.overlaps(w))
}

/// Sampled line-of-sight test from `to` (the observer) toward `from`
///
/// The segment is split into `min(dist, LOS_MAX_DISTANCE) / LOS_STEP` pieces
/// (at least one); each sample point is tested as a small probe square.
pub fn line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    let delta = from - to;
    let dist = delta.length();
    if dist <= 1e-6 {
        return true;
    }

    let steps = ((dist.min(LOS_MAX_DISTANCE) / LOS_STEP) as usize).max(1);
    let step = delta / steps as f32;
    let mut probe_pos = to;

    for _ in 0..steps {
        probe_pos += step;
        let probe = Rect::new(
            probe_pos.x.floor() - LOS_PROBE_SIZE / 2.0,
            probe_pos.y.floor() - LOS_PROBE_SIZE / 2.0,
            LOS_PROBE_SIZE,
            LOS_PROBE_SIZE,
        );
        if hits_any(&probe, walls) {
            return false;
        }
    }
    true
}

/// March along a fixed heading and return the first sample that touches a wall,
/// or the full-length endpoint when nothing is hit
pub fn raycast(origin: Vec2, angle: f32, length: f32, walls: &[Rect]) -> Vec2 {
    let dir = unit_from_angle(angle);
    let full = origin + dir * length;
    let steps = (length / BEAM_RAY_STEP) as usize;

    for i in 1..=steps {
        let sample = origin + dir * (length * i as f32 / steps as f32);
        let probe = Rect::centered(sample, BEAM_PROBE_SIZE, BEAM_PROBE_SIZE);
        if hits_any(&probe, walls) {
            return sample;
        }
    }
    full
}

/// Center of the wall nearest to `from`, if any
pub fn nearest_wall_center(from: Vec2, walls: &[Rect]) -> Option<Vec2> {
    walls
        .iter()
        .map(|w| w.center())
        .min_by(|a, b| {
            a.distance_squared(from)
                .partial_cmp(&b.distance_squared(from))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Directions fanned around `base` heading, `count` rays `spread` radians apart
pub fn fan_dirs(base: f32, count: usize, spread: f32) -> Vec<Vec2> {
    let mid = (count as f32 - 1.0) / 2.0;
    (0..count)
        .map(|i| unit_from_angle(base + (i as f32 - mid) * spread))
        .collect()
}

/// `count` directions evenly spaced over a full turn, starting at +x
pub fn ring_dirs(count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| unit_from_angle(i as f32 * std::f32::consts::TAU / count as f32))
        .collect()
}

/// Move `body` by `delta`, one axis at a time, pushing it back out of any collider
pub fn move_and_slide<'a, I>(body: &mut Rect, delta: Vec2, colliders: I)
where
    I: IntoIterator<Item = &'a Rect> + Clone,
{
    body.x += delta.x;
    for wall in colliders.clone() {
        if body.overlaps(wall) {
            if delta.x > 0.0 {
                body.x = body.x.min(wall.left() - body.w);
            } else if delta.x < 0.0 {
                body.x = body.x.max(wall.right());
            }
        }
    }

    body.y += delta.y;
    for wall in colliders {
        if body.overlaps(wall) {
            if delta.y > 0.0 {
                body.y = body.y.min(wall.top() - body.h);
            } else if delta.y < 0.0 {
                body.y = body.y.max(wall.bottom());
            }
        }
    }
}
