//! Half-open rectangle arithmetic: `[a, b)` with `a <= b` componentwise.

use glam::Vec2;

/// An axis-aligned rectangle `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
  pub min: Vec2,
  pub max: Vec2,
}

impl Aabb {
  #[inline]
  pub fn new(min: Vec2, max: Vec2) -> Self {
    debug_assert!(min.x <= max.x && min.y <= max.y, "Aabb min must be <= max");
    Self { min, max }
  }

  #[inline]
  pub fn from_point(p: Vec2) -> Self {
    Self { min: p, max: p }
  }

  /// Smallest rectangle containing both `self` and `other`.
  #[inline]
  pub fn combine(self, other: Self) -> Self {
    Self {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Uniformly inflates every side by `v`. A negative `v` that would invert
  /// an axis instead collapses both corners of that axis to its midpoint —
  /// preserved intentionally, not a bug.
  pub fn expand(self, v: f32) -> Self {
    let mut min = self.min - Vec2::splat(v);
    let mut max = self.max + Vec2::splat(v);
    if min.x > max.x {
      let mid = (self.min.x + self.max.x) * 0.5;
      min.x = mid;
      max.x = mid;
    }
    if min.y > max.y {
      let mid = (self.min.y + self.max.y) * 0.5;
      min.y = mid;
      max.y = mid;
    }
    Self { min, max }
  }

  /// Asymmetric inflation toward a direction `v`: on each axis, the near
  /// side extends if `v`'s component is negative, the far side if positive.
  pub fn expand_in_dir(self, v: Vec2) -> Self {
    let mut min = self.min;
    let mut max = self.max;
    if v.x < 0.0 {
      min.x += v.x;
    } else {
      max.x += v.x;
    }
    if v.y < 0.0 {
      min.y += v.y;
    } else {
      max.y += v.y;
    }
    Self { min, max }
  }

  /// Inclusive containment: every point of `other` lies within `self`.
  #[inline]
  pub fn contains(self, other: Self) -> bool {
    self.min.x <= other.min.x
      && self.min.y <= other.min.y
      && self.max.x >= other.max.x
      && self.max.y >= other.max.y
  }

  /// `a <= p < b`, per axis.
  #[inline]
  pub fn contains_point(self, p: Vec2) -> bool {
    p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
  }

  /// Strict-inequality overlap test on both sides.
  #[inline]
  pub fn intersects(self, other: Self) -> bool {
    self.min.x < other.max.x && self.max.x > other.min.x && self.min.y < other.max.y && self.max.y > other.min.y
  }

  /// `2 * sum(extent)` — the surface-area heuristic cost proxy.
  #[inline]
  pub fn perimeter(self) -> f32 {
    let extent = self.max - self.min;
    2.0 * (extent.x + extent.y)
  }
}
