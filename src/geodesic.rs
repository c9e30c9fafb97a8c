//! Light paths in the equatorial plane of a Schwarzschild-like body.
//!
//! A path is integrated in polar form `(r, φ, p_r)` with fixed-step RK4. The
//! angular momentum `L` is fixed by the starting direction and stays constant
//! for the whole path. With gravity disabled the same equations describe a
//! straight line, so both cases share one integrator.

use serde::{Deserialize, Serialize};

use crate::math::{direction_vector, world_to_screen};
use crate::state::Viewport;

/// Integration step as a fraction of the body radius
pub const STEP_FRACTION: f64 = 0.01;
/// Capture happens at this multiple of the critical radius
pub const CAPTURE_FACTOR: f64 = 1.001;
/// Escape radius as a multiple of the larger canvas side
pub const ESCAPE_FACTOR: f64 = 1.5;
/// Screen margin around the canvas, in pixels at zoom 1
pub const ESCAPE_MARGIN: f64 = 50.0;
/// Hard cap on integration steps
pub const MAX_STEPS: usize = 4000;
/// Largest `L·h³/r⁴` a step may have. Past it the fixed step can no longer
/// follow the turn near the center and the path stops as degenerate.
pub const STEP_RESOLUTION_LIMIT: f64 = 1e-4;

/// Tunable solver constants
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub step_fraction: f64,
    pub capture_factor: f64,
    pub escape_factor: f64,
    pub escape_margin: f64,
    pub max_steps: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            step_fraction: STEP_FRACTION,
            capture_factor: CAPTURE_FACTOR,
            escape_factor: ESCAPE_FACTOR,
            escape_margin: ESCAPE_MARGIN,
            max_steps: MAX_STEPS,
        }
    }
}

/// One sample along a computed path
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryPoint {
    /// World position (body-centric pixels at zoom 1)
    pub position: [f64; 2],
    pub screen_position: [f64; 2],
    /// Distance from the body center in body radii
    pub distance: f64,
}

/// Why integration stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Fell within the capture radius
    Captured,
    /// Left the escape radius or the padded canvas
    Escaped,
    /// Ran out of steps
    StepBudget,
    /// Non-finite state or unusable input
    Degenerate,
}

/// A computed light path, ordered from the source outward
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub termination: Termination,
}

/// Polar state `[r, φ, p_r]`
type State = [f64; 3];

/// Right-hand side of the orbit equations for fixed `l` and effective radius `rs`
fn derivatives(s: State, l: f64, rs: f64) -> State {
    let r = s[0];
    let r2 = r * r;
    let r3 = r2 * r;
    let r4 = r3 * r;
    [s[2], l / r2, -0.5 * l * l * (-2.0 / r3 + 3.0 * rs / r4)]
}

/// Classic fourth-order Runge-Kutta step
fn rk4_step(s: State, h: f64, l: f64, rs: f64) -> State {
    let f = |s: State| derivatives(s, l, rs);
    let offset = |s: State, k: State, scale: f64| {
        [s[0] + scale * k[0], s[1] + scale * k[1], s[2] + scale * k[2]]
    };
    let k1 = f(s);
    let k2 = f(offset(s, k1, h / 2.0));
    let k3 = f(offset(s, k2, h / 2.0));
    let k4 = f(offset(s, k3, h));
    let mut next = s;
    for i in 0..3 {
        next[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// Projects the emission direction onto the radial/tangential basis at `origin`.
/// Returns the initial state and the conserved angular momentum.
fn initial_conditions(origin: [f64; 2], angle_degrees: f64) -> (State, f64) {
    let r = (origin[0] * origin[0] + origin[1] * origin[1]).sqrt();
    let phi = origin[1].atan2(origin[0]);
    let (sin_phi, cos_phi) = phi.sin_cos();
    let d = direction_vector(angle_degrees);
    let p_r = d[0] * cos_phi + d[1] * sin_phi;
    let tangential = -d[0] * sin_phi + d[1] * cos_phi;
    ([r, phi, p_r], r * tangential)
}

/// Whether a screen point lies outside the canvas grown by `margin` on every side
fn outside_canvas(p: [f64; 2], size: [f64; 2], margin: f64) -> bool {
    p[0] < -margin || p[1] < -margin || p[0] > size[0] + margin || p[1] > size[1] + margin
}

/// Traces the light emitted at `origin` (world pixels) in direction
/// `angle_degrees` using the default solver constants.
pub fn compute_path(
    origin: [f64; 2],
    angle_degrees: f64,
    body_radius: f64,
    viewport: &Viewport,
    gravity: bool,
) -> Trajectory {
    compute_path_with(
        &SolverParams::default(),
        origin,
        angle_degrees,
        body_radius,
        viewport,
        gravity,
    )
}

/// [`compute_path`] with explicit solver constants
pub fn compute_path_with(
    params: &SolverParams,
    origin: [f64; 2],
    angle_degrees: f64,
    body_radius: f64,
    viewport: &Viewport,
    gravity: bool,
) -> Trajectory {
    let mut points = Vec::new();
    if !(body_radius > 0.0 && body_radius.is_finite()) || !angle_degrees.is_finite() {
        return Trajectory {
            points,
            termination: Termination::Degenerate,
        };
    }

    let rs = if gravity { body_radius } else { 0.0 };
    let h = body_radius * params.step_fraction;
    let capture_radius = rs * params.capture_factor;
    let escape_radius = viewport.size[0].max(viewport.size[1]) * params.escape_factor / viewport.zoom;
    let margin = params.escape_margin * viewport.zoom;

    let (mut state, l) = initial_conditions(origin, angle_degrees);
    let mut termination = Termination::StepBudget;

    for _ in 0..params.max_steps {
        let [r, phi, p_r] = state;
        if !(r.is_finite() && phi.is_finite() && p_r.is_finite()) {
            termination = Termination::Degenerate;
            break;
        }
        if gravity && r <= capture_radius {
            termination = Termination::Captured;
            break;
        }

        let (sin_phi, cos_phi) = phi.sin_cos();
        let position = [r * cos_phi, r * sin_phi];
        let screen_position = world_to_screen(position, viewport);
        if r.abs() > escape_radius || outside_canvas(screen_position, viewport.size, margin) {
            termination = Termination::Escaped;
            break;
        }

        points.push(TrajectoryPoint {
            position,
            screen_position,
            distance: r.abs() / body_radius,
        });
        // Only reachable without gravity, where a ray may graze the center
        if l.abs() * h.powi(3) > STEP_RESOLUTION_LIMIT * r.powi(4) {
            termination = Termination::Degenerate;
            break;
        }
        state = rk4_step(state, h, l, rs);
    }

    log::trace!(
        "path from ({:.1}, {:.1}) at {:.1}°: {:?} after {} points",
        origin[0],
        origin[1],
        angle_degrees,
        termination,
        points.len()
    );
    Trajectory {
        points,
        termination,
    }
}
