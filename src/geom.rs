//! Geometry and math helpers
//!
//! Pure functions over axis-aligned rectangles and scalars. Callers own the
//! finiteness of their inputs; NaN in, garbage out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zero or negative extent on either axis
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Half-open AABB overlap test. Degenerate rectangles never overlap anything.
#[inline]
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    if a.is_degenerate() || b.is_degenerate() {
        return false;
    }
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Point inside rectangle (edges inclusive on the top/left, exclusive on the bottom/right)
#[inline]
pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.x && point.x < rect.right() && point.y >= rect.y && point.y < rect.bottom()
}

/// Euclidean distance
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Clamp without panicking on inverted bounds (`min` wins)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Uniform float in `[min, max)`; returns `min` when the range is empty
pub fn random_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}

/// Uniform integer in `[min, max]`
pub fn random_int<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(rects_intersect(&a, &b), rects_intersect(&b, &a));
        }

        #[test]
        fn degenerate_rects_never_overlap(a in rect_strategy(), x in -100.0f32..100.0, y in -100.0f32..100.0) {
            let flat = Rect::new(x, y, 0.0, 50.0);
            prop_assert!(!rects_intersect(&flat, &a));
            prop_assert!(!rects_intersect(&flat, &flat));
        }

        #[test]
        fn lerp_hits_endpoints(start in -1000.0f32..1000.0, end in -1000.0f32..1000.0) {
            prop_assert_eq!(lerp(start, end, 0.0), start);
            prop_assert!((lerp(start, end, 1.0) - end).abs() < 1e-3);
        }

        #[test]
        fn clamp_stays_in_bounds(v in -1e6f32..1e6, lo in -100.0f32..0.0, hi in 0.0f32..100.0) {
            let c = clamp(v, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!rects_intersect(&a, &b));
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(rects_intersect(&a, &c));
    }

    #[test]
    fn test_non_degenerate_rect_overlaps_itself() {
        let a = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert!(rects_intersect(&a, &a));
    }

    #[test]
    fn test_point_in_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Vec2::new(0.0, 0.0), &r));
        assert!(point_in_rect(Vec2::new(5.0, 9.9), &r));
        assert!(!point_in_rect(Vec2::new(10.0, 5.0), &r));
    }

    #[test]
    fn test_distance() {
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_random_helpers_respect_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let f = random_range(&mut rng, -2.0, 3.0);
            assert!((-2.0..3.0).contains(&f));
            let i = random_int(&mut rng, 1, 4);
            assert!((1..=4).contains(&i));
        }
        assert_eq!(random_range(&mut rng, 5.0, 5.0), 5.0);
        assert_eq!(random_int(&mut rng, 9, 2), 9);
    }
}
