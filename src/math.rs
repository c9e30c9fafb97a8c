use crate::state::Viewport;

/// Smallest zoom factor the wheel can reach
pub const ZOOM_MIN: f64 = 0.2;
/// Largest zoom factor the wheel can reach
pub const ZOOM_MAX: f64 = 2.5;
/// Zoom change per unit of wheel delta
pub const ZOOM_SENSITIVITY: f64 = 0.001;
/// Ratio between the body's critical radius and its on-screen diameter
pub const BODY_RADIUS_FRACTION: f64 = 0.25;

/// Euclidean distance between two points
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    (dx * dx + dy * dy).sqrt()
}

/// Critical radius in world pixels for a body drawn with the given diameter
pub fn body_radius(body_diameter: f64) -> f64 {
    body_diameter * BODY_RADIUS_FRACTION
}

/// Maps a world point (body-centric, unzoomed) to screen pixels
pub fn world_to_screen(p: [f64; 2], viewport: &Viewport) -> [f64; 2] {
    let center = viewport.center();
    [
        p[0] * viewport.zoom + center[0] + viewport.pan[0],
        p[1] * viewport.zoom + center[1] + viewport.pan[1],
    ]
}

/// Maps screen pixels back to a world point; inverse of [`world_to_screen`]
pub fn screen_to_world(p: [f64; 2], viewport: &Viewport) -> [f64; 2] {
    let center = viewport.center();
    [
        (p[0] - center[0] - viewport.pan[0]) / viewport.zoom,
        (p[1] - center[1] - viewport.pan[1]) / viewport.zoom,
    ]
}

/// Expresses a world point in multiples of the body radius, keeping screen axes
pub fn physical_units(p: [f64; 2], body_radius: f64) -> [f64; 2] {
    [p[0] / body_radius, p[1] / body_radius]
}

/// Physical units with +y pointing up, as shown to the user
pub fn physics_display(p: [f64; 2], body_radius: f64) -> [f64; 2] {
    let [x, y] = physical_units(p, body_radius);
    [x, -y]
}

/// Inverse of [`physics_display`]
pub fn from_physics_display(p: [f64; 2], body_radius: f64) -> [f64; 2] {
    [p[0] * body_radius, -p[1] * body_radius]
}

/// Wraps an angle in degrees into [0, 360)
pub fn normalize_angle_degrees(a: f64) -> f64 {
    ((a % 360.0) + 360.0) % 360.0
}

/// Wraps an angle in degrees into (-180, 180]
pub fn normalize_angle_180(a: f64) -> f64 {
    let a = normalize_angle_degrees(a);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Applies one wheel step to a zoom factor, clamped to the allowed range
pub fn zoom_after_wheel(zoom: f64, wheel_delta: f64) -> f64 {
    (zoom - wheel_delta * ZOOM_SENSITIVITY).clamp(ZOOM_MIN, ZOOM_MAX)
}

/// Unit vector for an angle in degrees (screen convention, +y down)
pub fn direction_vector(angle_degrees: f64) -> [f64; 2] {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    [cos, sin]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn viewport(zoom: f64, pan: [f64; 2]) -> Viewport {
        let mut vp = Viewport::new(800.0, 600.0);
        vp.zoom = zoom;
        vp.pan = pan;
        vp
    }

    #[test]
    fn test_world_origin_maps_to_canvas_center() {
        let vp = viewport(1.0, [0.0, 0.0]);
        assert_eq!(world_to_screen([0.0, 0.0], &vp), [400.0, 300.0]);
    }

    #[test]
    fn test_world_to_screen_applies_zoom_and_pan() {
        let vp = viewport(2.0, [10.0, -5.0]);
        let s = world_to_screen([10.0, 20.0], &vp);
        assert_relative_eq!(s[0], 430.0);
        assert_relative_eq!(s[1], 335.0);
    }

    #[test]
    fn test_viewport_inverse() {
        let pans = [[0.0, 0.0], [123.5, -77.25], [-400.0, 1000.0]];
        let points = [[0.0, 0.0], [12.5, -3.75], [-640.0, 480.0], [1e4, -1e4]];
        for zoom in [ZOOM_MIN, 0.5, 1.0, 1.7, ZOOM_MAX] {
            for pan in pans {
                let vp = viewport(zoom, pan);
                for p in points {
                    let back = screen_to_world(world_to_screen(p, &vp), &vp);
                    assert_abs_diff_eq!(back[0], p[0], epsilon = 1e-9 * p[0].abs().max(1.0));
                    assert_abs_diff_eq!(back[1], p[1], epsilon = 1e-9 * p[1].abs().max(1.0));
                }
            }
        }
    }

    #[test]
    fn test_physics_display_flips_y() {
        let p = physics_display([20.0, 10.0], 10.0);
        assert_eq!(p, [2.0, -1.0]);
        assert_eq!(from_physics_display(p, 10.0), [20.0, 10.0]);
    }

    #[test]
    fn test_normalize_angle_range() {
        for a in [-1080.5, -360.0, -90.0, -0.0, 0.0, 45.0, 359.999, 360.0, 721.0, 1e9] {
            let n = normalize_angle_degrees(a);
            assert!((0.0..360.0).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn test_normalize_angle_periodic() {
        for a in [-271.0, -45.0, 0.0, 12.5, 300.0] {
            for k in -3..=3 {
                let shifted = a + 360.0 * k as f64;
                assert_abs_diff_eq!(
                    normalize_angle_degrees(shifted),
                    normalize_angle_degrees(a),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_normalize_angle_180() {
        assert_eq!(normalize_angle_180(0.0), 0.0);
        assert_eq!(normalize_angle_180(180.0), 180.0);
        assert_eq!(normalize_angle_180(270.0), -90.0);
        assert_eq!(normalize_angle_180(-90.0), -90.0);
        assert_eq!(normalize_angle_180(-180.0), 180.0);
    }

    #[test]
    fn test_zoom_clamped() {
        assert_relative_eq!(zoom_after_wheel(1.0, 100.0), 0.9);
        assert_relative_eq!(zoom_after_wheel(1.0, -100.0), 1.1);
        assert_eq!(zoom_after_wheel(1.0, 10_000.0), ZOOM_MIN);
        assert_eq!(zoom_after_wheel(1.0, -10_000.0), ZOOM_MAX);
    }

    #[test]
    fn test_body_radius_is_quarter_diameter() {
        assert_eq!(body_radius(40.0), 10.0);
    }

    #[test]
    fn test_direction_vector_screen_convention() {
        let down = direction_vector(90.0);
        assert_abs_diff_eq!(down[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(down[1], 1.0, epsilon = 1e-12);
    }
}
