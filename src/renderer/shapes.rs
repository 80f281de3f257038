//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::geom::Rect;

pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Arbitrary quad, corners in winding order
pub fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    let [a, b, c, d] = corners;
    triangle(out, a, b, c, color);
    triangle(out, a, c, d, color);
}

pub fn rect(out: &mut Vec<Vertex>, r: Rect, color: [f32; 4]) {
    rect_gradient(out, r, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn rect_gradient(out: &mut Vec<Vertex>, r: Rect, top: [f32; 4], bottom: [f32; 4]) {
    if r.width <= 0.0 || r.height <= 0.0 {
        return;
    }
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    out.push(Vertex::new(x0, y0, top));
    out.push(Vertex::new(x1, y0, top));
    out.push(Vertex::new(x1, y1, bottom));

    out.push(Vertex::new(x0, y0, top));
    out.push(Vertex::new(x1, y1, bottom));
    out.push(Vertex::new(x0, y1, bottom));
}

/// Rectangle of `size` rotated by `angle` around `pivot`, hanging from the
/// pivot's local origin at `offset`
pub fn rotated_rect(
    out: &mut Vec<Vertex>,
    pivot: Vec2,
    offset: Vec2,
    size: Vec2,
    angle: f32,
    color: [f32; 4],
) {
    let rot = Vec2::from_angle(angle);
    let corners = [
        offset,
        offset + Vec2::new(size.x, 0.0),
        offset + size,
        offset + Vec2::new(0.0, size.y),
    ]
    .map(|c| pivot + rot.rotate(c));
    quad(out, corners, color);
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(out, [from + perp, to + perp, to - perp, from - perp], color);
}

/// Filled circle fading from `inner` at the center to `outer` at the rim
pub fn circle_gradient(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let p1 = center + Vec2::from_angle(theta1) * radius;
        let p2 = center + Vec2::from_angle(theta2) * radius;

        out.push(Vertex::new(center.x, center.y, inner));
        out.push(Vertex::new(p1.x, p1.y, outer));
        out.push(Vertex::new(p2.x, p2.y, outer));
    }
}

pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    circle_gradient(out, center, radius, color, color, segments);
}

/// Row of triangular teeth along one edge of `r`, pointing toward `tip_dir`
pub fn spikes(out: &mut Vec<Vertex>, r: Rect, tip_dir: Vec2, tooth: f32, color: [f32; 4]) {
    if tip_dir.x == 0.0 {
        // Teeth along the horizontal edge
        let count = (r.width / tooth).floor().max(1.0) as u32;
        let w = r.width / count as f32;
        let (base_y, tip_y) = if tip_dir.y < 0.0 {
            (r.bottom(), r.y)
        } else {
            (r.y, r.bottom())
        };
        for i in 0..count {
            let x = r.x + i as f32 * w;
            triangle(
                out,
                Vec2::new(x, base_y),
                Vec2::new(x + w, base_y),
                Vec2::new(x + w / 2.0, tip_y),
                color,
            );
        }
    } else {
        let count = (r.height / tooth).floor().max(1.0) as u32;
        let h = r.height / count as f32;
        let (base_x, tip_x) = if tip_dir.x > 0.0 {
            (r.x, r.right())
        } else {
            (r.right(), r.x)
        };
        for i in 0..count {
            let y = r.y + i as f32 * h;
            triangle(
                out,
                Vec2::new(base_x, y),
                Vec2::new(base_x, y + h),
                Vec2::new(tip_x, y + h / 2.0),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_rect_emits_nothing() {
        let mut out = Vec::new();
        rect(&mut out, Rect::new(0.0, 0.0, 0.0, 10.0), [1.0; 4]);
        assert!(out.is_empty());
        rect(&mut out, Rect::new(0.0, 0.0, 5.0, 10.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
    }

    #[test]
    fn test_floor_spikes_point_up() {
        let mut out = Vec::new();
        spikes(&mut out, Rect::new(0.0, 80.0, 40.0, 20.0), Vec2::NEG_Y, 10.0, [1.0; 4]);
        assert_eq!(out.len(), 4 * 3);
        // Every third vertex is a tip at the top edge
        assert!(out.chunks(3).all(|t| t[2].position[1] == 80.0));
        assert!(out.chunks(3).all(|t| t[0].position[1] == 100.0));
    }

    #[test]
    fn test_rotated_rect_quarter_turn() {
        let mut out = Vec::new();
        rotated_rect(
            &mut out,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            std::f32::consts::FRAC_PI_2,
            [1.0; 4],
        );
        // (10, 0) rotated a quarter turn lands straight below the pivot
        let p = out[1].position;
        assert!((p[0] - 100.0).abs() < 1e-4);
        assert!((p[1] - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_vertex_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 8);
        assert_eq!(out.len(), 24);
        for v in &out {
            let d = Vec2::from(v.position).length();
            assert!(d < 5.0 + 1e-4);
        }
    }
}
