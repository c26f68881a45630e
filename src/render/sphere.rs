//! Sphere layout: golden-angle lattice.
//!
//! Spreads `n` points quasi-uniformly over a sphere in O(n):
//!   y_i     = i * (2/n) - 1 + 1/n        (even spacing along the axis)
//!   r_i     = sqrt(max(0, 1 - y_i²))
//!   theta_i = i * GOLDEN_ANGLE           (π (3 - √5))
//!   p_i     = (cos θ_i · r_i, y_i, sin θ_i · r_i) * radius
//!
//! Items are placed in input order, not rank order. Popularity is carried
//! by size and color only, so the top items are not bunched into one cap.

/// π (3 - √5) ≈ 2.39996 rad
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// One placed item, index-aligned with the input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub position: [f32; 3],
}

/// Position of item `i` of `n` on a sphere of `radius`.
#[inline]
pub fn lattice_point(i: usize, n: usize, radius: f32) -> [f32; 3] {
    let inv_n = 1.0 / n.max(1) as f32;
    let y = i as f32 * (2.0 * inv_n) - 1.0 + inv_n;
    let r = (1.0 - y * y).max(0.0).sqrt();
    let theta = i as f32 * GOLDEN_ANGLE;
    [theta.cos() * r * radius, y * radius, theta.sin() * r * radius]
}

/// Lay out `n` items. Empty for `n == 0`.
pub fn layout(n: usize, radius: f32) -> Vec<Placement> {
    (0..n)
        .map(|index| Placement {
            index,
            position: lattice_point(index, n, radius),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn test_golden_angle_constant() {
        let exact = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
        assert!((GOLDEN_ANGLE as f64 - exact).abs() < 1e-6);
    }

    #[test]
    fn test_empty_layout() {
        assert!(layout(0, 10.0).is_empty());
    }

    #[test]
    fn test_single_item_on_equator() {
        let p = layout(1, 10.0);
        assert_eq!(p.len(), 1);
        // y = 0 - 1 + 1 = 0, theta = 0
        assert!((p[0].position[0] - 10.0).abs() < 1e-5);
        assert!(p[0].position[1].abs() < 1e-5);
        assert!(p[0].position[2].abs() < 1e-5);
    }

    #[test]
    fn test_points_lie_on_sphere() {
        for p in layout(200, 20.0) {
            assert!((norm(p.position) - 20.0).abs() < 1e-3, "{:?}", p);
        }
    }

    #[test]
    fn test_y_spacing_is_even_and_symmetric() {
        let n = 10;
        let p = layout(n, 1.0);
        for w in p.windows(2) {
            assert!((w[1].position[1] - w[0].position[1] - 0.2).abs() < 1e-5);
        }
        assert!((p[0].position[1] + p[n - 1].position[1]).abs() < 1e-5);
    }

    #[test]
    fn test_index_correlated_and_deterministic() {
        let a = layout(57, 20.0);
        let b = layout(57, 20.0);
        assert_eq!(a, b);
        for (i, p) in a.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.position.map(f32::to_bits), lattice_point(i, 57, 20.0).map(f32::to_bits));
        }
    }

    #[test]
    fn test_no_clumping() {
        // Minimum pairwise distance stays well away from zero
        let p = layout(100, 1.0);
        let mut min_d = f32::MAX;
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                let a = p[i].position;
                let b = p[j].position;
                let d = norm([a[0] - b[0], a[1] - b[1], a[2] - b[2]]);
                min_d = min_d.min(d);
            }
        }
        assert!(min_d > 0.1, "min distance {}", min_d);
    }
}
