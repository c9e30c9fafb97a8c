//! Direct numeric entry of one ray's coordinates and angle.
//!
//! Values are shown in physical units with +y up and angles counter-clockwise
//! from +x, the way a physics sketch would label them. Each field keeps the
//! raw text the user typed; only text that parses as a finite number reaches
//! the scene.

use serde::{Deserialize, Serialize};

use crate::math::{
    from_physics_display, normalize_angle_180, normalize_angle_degrees, physics_display,
};
use crate::scene::{RaySource, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditField {
    X,
    Y,
    Angle,
}

impl EditField {
    /// Next field in tab order
    pub fn next(self) -> Self {
        match self {
            EditField::X => EditField::Y,
            EditField::Y => EditField::Angle,
            EditField::Angle => EditField::X,
        }
    }
}

/// Display values `[x, y, angle]` for a ray in physical units
pub fn display_values(ray: &RaySource, body_radius: f64) -> [f64; 3] {
    let [x, y] = physics_display(ray.position, body_radius);
    // Adding zero turns -0.0 into 0.0 so it never prints as "-0.00"
    [x + 0.0, y + 0.0, normalize_angle_180(-ray.angle) + 0.0]
}

/// Staged text for the ray being edited
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditSession {
    pub target: u32,
    pub x: String,
    pub y: String,
    pub angle: String,
}

impl EditSession {
    /// Opens a session pre-filled with the ray's current display values
    pub fn open(ray: &RaySource, body_radius: f64) -> Self {
        let [x, y, angle] = display_values(ray, body_radius);
        EditSession {
            target: ray.id(),
            x: format!("{:.2}", x),
            y: format!("{:.2}", y),
            angle: format!("{:.1}", angle),
        }
    }

    pub fn text(&self, field: EditField) -> &str {
        match field {
            EditField::X => &self.x,
            EditField::Y => &self.y,
            EditField::Angle => &self.angle,
        }
    }

    /// Stages `text` for `field` and commits it when it is a finite number.
    /// Returns whether the scene was changed.
    pub fn set_field(
        &mut self,
        field: EditField,
        text: &str,
        scene: &mut Scene,
        body_radius: f64,
    ) -> bool {
        match field {
            EditField::X => self.x = text.to_string(),
            EditField::Y => self.y = text.to_string(),
            EditField::Angle => self.angle = text.to_string(),
        }

        let value = match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => return false,
        };

        scene.update(self.target, |ray| match field {
            EditField::X => ray.position[0] = from_physics_display([value, 0.0], body_radius)[0],
            EditField::Y => ray.position[1] = from_physics_display([0.0, value], body_radius)[1],
            EditField::Angle => ray.angle = normalize_angle_degrees(-value),
        })
    }
}
