//! Pointer gestures to scene and viewport changes.
//!
//! [`handle`] is the only writer of [`EngineState`]. It runs one event to
//! completion, so a gesture never observes a half-applied mutation.

use serde::{Deserialize, Serialize};

use crate::edit::{EditField, EditSession};
use crate::state::EngineState;

/// Degrees of rotation per screen pixel of horizontal drag
pub const ROTATE_SENSITIVITY: f64 = 0.5;
/// Angle given to rays placed with the vertical-placement modifier held
pub const VERTICAL_ANGLE: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys held when an event fired.
/// Shift pans with the primary button and opens the editor with the secondary
/// one; Alt places rays pointing down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Remove every ray
    ClearAll,
    ToggleGravity,
    /// Zoom 1, no pan
    ResetView,
}

/// Input from the presentation layer, positions in screen pixels
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        button: Button,
        pos: [f64; 2],
        modifiers: Modifiers,
    },
    PointerMove {
        pos: [f64; 2],
    },
    PointerUp {
        button: Button,
        pos: [f64; 2],
    },
    /// Primary press and release; follows the matching `PointerUp`
    Click {
        pos: [f64; 2],
        modifiers: Modifiers,
    },
    DoubleClick {
        pos: [f64; 2],
    },
    Wheel {
        delta: f64,
    },
    /// New full text of one edit field
    EditText {
        field: EditField,
        text: String,
    },
    CloseEdit,
    Command(Command),
}

/// Gesture in progress. Idle also covers waiting for a placement click.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Idle,
    Dragging(u32),
    Rotating {
        id: u32,
        last_x: f64,
    },
    Panning {
        button: Button,
        start: [f64; 2],
        start_pan: [f64; 2],
    },
    Editing(u32),
}

fn enter(state: &mut EngineState, mode: Mode) {
    if state.mode != mode {
        log::debug!("{:?} -> {:?}", state.mode, mode);
    }
    state.mode = mode;
}

/// Applies one input event to the engine state
pub fn handle(state: &mut EngineState, event: InputEvent) {
    match event {
        InputEvent::PointerDown {
            button,
            pos,
            modifiers,
        } => pointer_down(state, button, pos, modifiers),
        InputEvent::PointerMove { pos } => pointer_move(state, pos),
        InputEvent::PointerUp { button, .. } => pointer_up(state, button),
        InputEvent::Click { pos, modifiers } => click(state, pos, modifiers),
        InputEvent::DoubleClick { pos } => {
            if state.mode == Mode::Idle {
                if let Some(id) = state.ray_at(pos) {
                    state.scene.delete(id);
                }
            }
        }
        // Zoom works in every mode
        InputEvent::Wheel { delta } => state.viewport.apply_wheel(delta),
        InputEvent::EditText { field, text } => {
            let body_radius = state.body_radius();
            if let Some(session) = state.edit.as_mut() {
                session.set_field(field, &text, &mut state.scene, body_radius);
            }
        }
        InputEvent::CloseEdit => {
            state.edit = None;
            if matches!(state.mode, Mode::Editing(_)) {
                enter(state, Mode::Idle);
            }
        }
        InputEvent::Command(command) => run_command(state, command),
    }
}

/// By-value form of [`handle`]
pub fn reduce(mut state: EngineState, event: InputEvent) -> EngineState {
    handle(&mut state, event);
    state
}

fn pointer_down(state: &mut EngineState, button: Button, pos: [f64; 2], modifiers: Modifiers) {
    if state.mode != Mode::Idle {
        return;
    }
    // A new gesture starts, so a latch left by a pan without a trailing click is stale
    state.suppress_click = false;

    let pan = Mode::Panning {
        button,
        start: pos,
        start_pan: state.viewport.pan,
    };
    match button {
        Button::Middle => enter(state, pan),
        Button::Primary if modifiers.shift => enter(state, pan),
        Button::Primary => {
            if let Some(id) = state.ray_at(pos) {
                enter(state, Mode::Dragging(id));
            }
        }
        Button::Secondary => {
            let Some(id) = state.ray_at(pos) else {
                return;
            };
            if modifiers.shift {
                let body_radius = state.body_radius();
                if let Some(ray) = state.scene.get(id) {
                    state.edit = Some(EditSession::open(ray, body_radius));
                    enter(state, Mode::Editing(id));
                }
            } else {
                enter(state, Mode::Rotating { id, last_x: pos[0] });
            }
        }
    }
}

fn pointer_move(state: &mut EngineState, pos: [f64; 2]) {
    match state.mode.clone() {
        Mode::Dragging(id) => {
            let world = state.viewport.screen_to_world(pos);
            state.scene.update(id, |ray| ray.position = world);
        }
        Mode::Rotating { id, last_x } => {
            let delta = pos[0] - last_x;
            state
                .scene
                .update(id, |ray| ray.angle += delta * ROTATE_SENSITIVITY);
            state.mode = Mode::Rotating { id, last_x: pos[0] };
        }
        Mode::Panning {
            start, start_pan, ..
        } => {
            state.viewport.pan = [
                start_pan[0] + pos[0] - start[0],
                start_pan[1] + pos[1] - start[1],
            ];
        }
        Mode::Idle | Mode::Editing(_) => {}
    }
}

fn pointer_up(state: &mut EngineState, button: Button) {
    match state.mode {
        Mode::Dragging(_) if button == Button::Primary => enter(state, Mode::Idle),
        Mode::Rotating { .. } if button == Button::Secondary => enter(state, Mode::Idle),
        Mode::Panning { button: held, .. } if button == held => {
            enter(state, Mode::Idle);
            state.suppress_click = true;
        }
        _ => {}
    }
}

fn click(state: &mut EngineState, pos: [f64; 2], modifiers: Modifiers) {
    if state.suppress_click {
        state.suppress_click = false;
        return;
    }
    if state.mode != Mode::Idle || state.ray_at(pos).is_some() {
        return;
    }
    let world = state.viewport.screen_to_world(pos);
    let angle = if modifiers.alt { VERTICAL_ANGLE } else { 0.0 };
    let body_radius = state.body_radius();
    let zoom = state.viewport.zoom;
    state.scene.create(world, angle, body_radius, zoom);
}

fn run_command(state: &mut EngineState, command: Command) {
    match command {
        Command::ClearAll => {
            state.scene.clear();
            state.edit = None;
            state.suppress_click = false;
            enter(state, Mode::Idle);
        }
        Command::ToggleGravity => {
            state.gravity = !state.gravity;
            log::debug!("gravity {}", if state.gravity { "on" } else { "off" });
        }
        Command::ResetView => state.viewport.reset(),
    }
}
