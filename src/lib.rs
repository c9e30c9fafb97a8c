//! Light rays bent by a compact mass, traced on a pannable, zoomable canvas.
//!
//! The engine is presentation-free: a host feeds pointer events to
//! [`controller::handle`], reads [`state::EngineState`], and draws the
//! trajectories returned by [`state::EngineState::paths`].

pub mod config;
pub mod controller;
pub mod edit;
pub mod geodesic;
pub mod math;
pub mod scene;
pub mod state;

pub use controller::{handle, reduce, Button, Command, InputEvent, Modifiers, Mode};
pub use edit::{EditField, EditSession};
pub use geodesic::{compute_path, Termination, Trajectory, TrajectoryPoint};
pub use scene::{Direction, RaySource, Scene};
pub use state::{EngineState, Viewport};
