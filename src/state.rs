use serde::{Deserialize, Serialize};

use crate::controller::Mode;
use crate::edit::EditSession;
use crate::geodesic::{compute_path_with, SolverParams, Trajectory};
use crate::math::{self, body_radius, zoom_after_wheel};
use crate::scene::{RaySource, Scene};

/// Pan/zoom transform between world pixels and the canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zoom factor, kept within [`math::ZOOM_MIN`, `math::ZOOM_MAX`]
    pub zoom: f64,
    /// Screen offset applied after zooming
    pub pan: [f64; 2],
    /// Canvas width and height in screen pixels
    pub size: [f64; 2],
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport {
            zoom: 1.0,
            pan: [0.0, 0.0],
            size: [width, height],
        }
    }

    /// Screen position of the unpanned canvas center
    pub fn center(&self) -> [f64; 2] {
        [self.size[0] / 2.0, self.size[1] / 2.0]
    }

    pub fn world_to_screen(&self, p: [f64; 2]) -> [f64; 2] {
        math::world_to_screen(p, self)
    }

    pub fn screen_to_world(&self, p: [f64; 2]) -> [f64; 2] {
        math::screen_to_world(p, self)
    }

    pub fn apply_wheel(&mut self, delta: f64) {
        self.zoom = zoom_after_wheel(self.zoom, delta);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = [width, height];
    }

    /// Back to zoom 1 with no pan
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = [0.0, 0.0];
    }
}

/// Everything the engine knows; the presentation layer only reads it and
/// feeds events back through [`crate::controller::handle`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub scene: Scene,
    pub viewport: Viewport,
    pub edit: Option<EditSession>,
    /// Current gesture
    pub mode: Mode,
    /// On-screen diameter of the central body in world pixels
    pub body_diameter: f64,
    pub gravity: bool,
    /// Pick distance around a ray marker, in screen pixels
    pub hit_radius: f64,
    pub solver: SolverParams,
    /// Set when a pan ends so the trailing click does not place a ray
    pub suppress_click: bool,
}

impl EngineState {
    pub fn new(width: f64, height: f64, body_diameter: f64) -> Self {
        EngineState {
            scene: Scene::new(),
            viewport: Viewport::new(width, height),
            edit: None,
            mode: Mode::Idle,
            body_diameter,
            gravity: true,
            hit_radius: 10.0,
            solver: SolverParams::default(),
            suppress_click: false,
        }
    }

    /// Critical radius in world pixels
    pub fn body_radius(&self) -> f64 {
        body_radius(self.body_diameter)
    }

    /// Top-most ray whose marker is within the hit radius of a screen point
    pub fn ray_at(&self, screen: [f64; 2]) -> Option<u32> {
        self.scene
            .list()
            .iter()
            .rev()
            .find(|ray| {
                let marker = self.viewport.world_to_screen(ray.position);
                math::distance(marker, screen) <= self.hit_radius
            })
            .map(|ray| ray.id())
    }

    /// Path for a single ray under the current viewport and gravity setting
    pub fn path_for(&self, id: u32) -> Option<Trajectory> {
        self.scene.get(id).map(|ray| self.trace(ray))
    }

    /// Paths for every fired ray, in scene order
    pub fn paths(&self) -> Vec<(u32, Trajectory)> {
        self.scene
            .list()
            .iter()
            .filter(|ray| ray.fired)
            .map(|ray| (ray.id(), self.trace(ray)))
            .collect()
    }

    fn trace(&self, ray: &RaySource) -> Trajectory {
        compute_path_with(
            &self.solver,
            ray.position,
            ray.angle,
            self.body_radius(),
            &self.viewport,
            self.gravity,
        )
    }
}
