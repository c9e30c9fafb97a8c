use serde::{Deserialize, Serialize};

use crate::math::{distance, normalize_angle_degrees};

/// Side a ray source emits toward. Kept for display only, never used by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Left when the angle points into the left half-plane
    pub fn from_angle(angle: f64) -> Self {
        let a = normalize_angle_degrees(angle);
        if a > 90.0 && a < 270.0 {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// A user-placed point emitter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaySource {
    id: u32,
    /// Offset from the body center in world pixels (+y down)
    pub position: [f64; 2],
    /// Emission angle in degrees, screen convention, in [0, 360)
    pub angle: f64,
    /// Whether the path is computed and shown
    pub fired: bool,
    pub direction: Direction,
}

impl RaySource {
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Ordered ray sources; insertion order is draw order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    rays: Vec<RaySource>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fired ray at `position` unless it falls within `body_radius / zoom`
    /// of the center. A rejected placement consumes no id.
    pub fn create(
        &mut self,
        position: [f64; 2],
        angle: f64,
        body_radius: f64,
        zoom: f64,
    ) -> Option<u32> {
        if distance(position, [0.0, 0.0]) <= body_radius / zoom {
            log::debug!(
                "placement at ({:.1}, {:.1}) rejected: inside body",
                position[0],
                position[1]
            );
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let angle = normalize_angle_degrees(angle);
        self.rays.push(RaySource {
            id,
            position,
            angle,
            fired: true,
            direction: Direction::from_angle(angle),
        });
        log::debug!("ray {} placed at ({:.1}, {:.1})", id, position[0], position[1]);
        Some(id)
    }

    /// Removes a ray; returns whether it existed
    pub fn delete(&mut self, id: u32) -> bool {
        let before = self.rays.len();
        self.rays.retain(|ray| ray.id != id);
        let removed = self.rays.len() != before;
        if removed {
            log::debug!("ray {} deleted", id);
        }
        removed
    }

    /// Applies `mutator` to the ray with `id`, then restores the angle and
    /// direction invariants. Returns whether the ray existed.
    pub fn update<F>(&mut self, id: u32, mutator: F) -> bool
    where
        F: FnOnce(&mut RaySource),
    {
        match self.rays.iter_mut().find(|ray| ray.id == id) {
            Some(ray) => {
                let mut next = ray.clone();
                mutator(&mut next);
                next.angle = normalize_angle_degrees(next.angle);
                next.direction = Direction::from_angle(next.angle);
                *ray = next;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u32) -> Option<&RaySource> {
        self.rays.iter().find(|ray| ray.id == id)
    }

    pub fn list(&self) -> &[RaySource] {
        &self.rays
    }

    /// Drops every ray. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.rays.clear();
    }

    pub fn len(&self) -> usize {
        self.rays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut scene = Scene::new();
        let a = scene.create([100.0, 0.0], 0.0, 10.0, 1.0).unwrap();
        let b = scene.create([0.0, 100.0], 0.0, 10.0, 1.0).unwrap();
        assert!(b > a);
        assert_eq!(scene.len(), 2);
        assert!(scene.list().iter().all(|ray| ray.fired));
    }

    #[test]
    fn test_create_inside_body_rejected() {
        let mut scene = Scene::new();
        assert_eq!(scene.create([5.0, 5.0], 0.0, 10.0, 1.0), None);
        assert_eq!(scene.create([10.0, 0.0], 0.0, 10.0, 1.0), None);
        assert!(scene.is_empty());
        // No id was consumed by the rejected attempts
        assert_eq!(scene.create([50.0, 0.0], 0.0, 10.0, 1.0), Some(0));
    }

    #[test]
    fn test_create_threshold_folds_in_zoom() {
        let mut scene = Scene::new();
        // At zoom 2 the threshold shrinks to 5 world pixels
        assert!(scene.create([6.0, 0.0], 0.0, 10.0, 2.0).is_some());
        // At zoom 0.5 it grows to 20
        assert!(scene.create([15.0, 0.0], 0.0, 10.0, 0.5).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_delete_never_reuses_ids() {
        let mut scene = Scene::new();
        let a = scene.create([100.0, 0.0], 0.0, 10.0, 1.0).unwrap();
        assert!(scene.delete(a));
        assert!(!scene.delete(a));
        let b = scene.create([100.0, 0.0], 0.0, 10.0, 1.0).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut scene = Scene::new();
        scene.create([100.0, 0.0], 0.0, 10.0, 1.0);
        scene.create([200.0, 0.0], 0.0, 10.0, 1.0);
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.create([100.0, 0.0], 0.0, 10.0, 1.0), Some(2));
    }

    #[test]
    fn test_update_normalizes_angle_and_direction() {
        let mut scene = Scene::new();
        let id = scene.create([100.0, 0.0], 0.0, 10.0, 1.0).unwrap();
        assert_eq!(scene.get(id).unwrap().direction, Direction::Right);
        assert!(scene.update(id, |ray| ray.angle = -180.0));
        let ray = scene.get(id).unwrap();
        assert_eq!(ray.angle, 180.0);
        assert_eq!(ray.direction, Direction::Left);
        assert!(!scene.update(99, |ray| ray.angle = 1.0));
    }

    #[test]
    fn test_update_may_move_inside_body() {
        let mut scene = Scene::new();
        let id = scene.create([100.0, 0.0], 0.0, 10.0, 1.0).unwrap();
        scene.update(id, |ray| ray.position = [0.0, 1.0]);
        assert_eq!(scene.get(id).unwrap().position, [0.0, 1.0]);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut scene = Scene::new();
        let ids: Vec<u32> = [[100.0, 0.0], [0.0, 100.0], [-100.0, 0.0]]
            .iter()
            .filter_map(|&p| scene.create(p, 0.0, 10.0, 1.0))
            .collect();
        scene.delete(ids[1]);
        let listed: Vec<u32> = scene.list().iter().map(RaySource::id).collect();
        assert_eq!(listed, vec![ids[0], ids[2]]);
    }
}
