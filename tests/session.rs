//! A full interactive session driven through the public engine API.

use approx::assert_abs_diff_eq;
use lightpath::{
    handle, reduce, Button, Command, EditField, EngineState, InputEvent, Mode, Modifiers,
    Termination,
};

const NONE: Modifiers = Modifiers {
    shift: false,
    alt: false,
};
const SHIFT: Modifiers = Modifiers {
    shift: true,
    alt: false,
};

/// 800x600 canvas with a body of critical radius 10
fn engine() -> EngineState {
    EngineState::new(800.0, 600.0, 40.0)
}

fn press(state: &mut EngineState, button: Button, pos: [f64; 2], modifiers: Modifiers) {
    handle(
        state,
        InputEvent::PointerDown {
            button,
            pos,
            modifiers,
        },
    );
}

fn release(state: &mut EngineState, button: Button, pos: [f64; 2], modifiers: Modifiers) {
    handle(state, InputEvent::PointerUp { button, pos });
    if button == Button::Primary {
        handle(state, InputEvent::Click { pos, modifiers });
    }
}

fn drag(state: &mut EngineState, button: Button, from: [f64; 2], to: [f64; 2]) {
    press(state, button, from, NONE);
    handle(state, InputEvent::PointerMove { pos: to });
    release(state, button, to, NONE);
}

#[test]
fn place_rotate_edit_move_delete() {
    let mut state = engine();

    // Place a ray 10 radii right of the body, pointing away from it
    press(&mut state, Button::Primary, [500.0, 300.0], NONE);
    release(&mut state, Button::Primary, [500.0, 300.0], NONE);
    assert_eq!(state.scene.len(), 1);
    let id = state.scene.list()[0].id();
    let outward = state.path_for(id).unwrap();
    assert_eq!(outward.termination, Termination::Escaped);
    assert_eq!(outward.points[0].position, [100.0, 0.0]);
    assert!(outward
        .points
        .windows(2)
        .all(|w| w[1].position[0] > w[0].position[0]));

    // Half a turn aims it straight at the body
    drag(&mut state, Button::Secondary, [500.0, 300.0], [860.0, 300.0]);
    assert_eq!(state.mode, Mode::Idle);
    assert_abs_diff_eq!(state.scene.get(id).unwrap().angle, 180.0, epsilon = 1e-9);
    let inward = state.path_for(id).unwrap();
    assert_eq!(inward.termination, Termination::Captured);
    let last = inward.points.last().unwrap();
    assert!(last.distance > 1.0 && last.distance < 1.02);

    // Type coordinates: y is up and angles are counter-clockwise in the editor
    press(&mut state, Button::Secondary, [500.0, 300.0], SHIFT);
    release(&mut state, Button::Secondary, [500.0, 300.0], SHIFT);
    assert_eq!(state.mode, Mode::Editing(id));
    assert_eq!(state.edit.as_ref().unwrap().angle, "180.0");
    for (field, text) in [(EditField::Y, "2"), (EditField::Angle, "90")] {
        handle(
            &mut state,
            InputEvent::EditText {
                field,
                text: text.to_string(),
            },
        );
    }
    handle(&mut state, InputEvent::CloseEdit);
    let ray = state.scene.get(id).unwrap();
    assert_abs_diff_eq!(ray.position[0], 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ray.position[1], -20.0, epsilon = 1e-9);
    assert_abs_diff_eq!(ray.angle, 270.0, epsilon = 1e-9);

    // Drag it to the other side; releasing over the ray places nothing new
    drag(&mut state, Button::Primary, [500.0, 280.0], [300.0, 300.0]);
    assert_eq!(state.scene.len(), 1);
    assert_eq!(state.scene.get(id).unwrap().position, [-100.0, 0.0]);
    let moved = state.path_for(id).unwrap();
    assert_abs_diff_eq!(moved.points[0].position[0], -100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(moved.points[0].position[1], 0.0, epsilon = 1e-9);

    // A pan ending on empty space does not place a ray
    drag(&mut state, Button::Middle, [100.0, 100.0], [120.0, 110.0]);
    handle(
        &mut state,
        InputEvent::Click {
            pos: [120.0, 110.0],
            modifiers: NONE,
        },
    );
    assert_eq!(state.scene.len(), 1);
    assert_eq!(state.viewport.pan, [20.0, 10.0]);

    // The ray marker moved with the pan
    handle(
        &mut state,
        InputEvent::DoubleClick {
            pos: [320.0, 310.0],
        },
    );
    assert!(state.scene.is_empty());
}

#[test]
fn paths_follow_gravity_toggle_and_zoom() {
    let mut state = engine();
    // Grazing ray passing 3 radii below the body
    press(&mut state, Button::Primary, [550.0, 330.0], NONE);
    release(&mut state, Button::Primary, [550.0, 330.0], NONE);
    let id = state.scene.list()[0].id();
    state.scene.update(id, |ray| ray.angle = 180.0);

    let bent = state.path_for(id).unwrap();
    handle(&mut state, InputEvent::Command(Command::ToggleGravity));
    let straight = state.path_for(id).unwrap();
    assert!(straight
        .points
        .iter()
        .all(|p| (p.position[1] - 30.0).abs() < 1e-6));
    // Gravity pulls the light toward the body (negative y)
    let n = bent.points.len().min(straight.points.len()).min(1500);
    assert!(bent.points[n - 1].position[1] < straight.points[n - 1].position[1]);

    // Zooming out keeps world positions but moves the drawn path
    handle(&mut state, InputEvent::Wheel { delta: 500.0 });
    let zoomed = state.path_for(id).unwrap();
    assert_eq!(zoomed.points[0].position, straight.points[0].position);
    assert_abs_diff_eq!(zoomed.points[0].screen_position[0], 475.0, epsilon = 1e-9);

    handle(&mut state, InputEvent::Command(Command::ResetView));
    assert_eq!(state.viewport.zoom, 1.0);
}

#[test]
fn replaying_events_is_deterministic() {
    let events = vec![
        InputEvent::Click {
            pos: [600.0, 200.0],
            modifiers: NONE,
        },
        InputEvent::Click {
            pos: [250.0, 420.0],
            modifiers: Modifiers {
                shift: false,
                alt: true,
            },
        },
        InputEvent::PointerDown {
            button: Button::Secondary,
            pos: [600.0, 200.0],
            modifiers: NONE,
        },
        InputEvent::PointerMove { pos: [640.0, 210.0] },
        InputEvent::PointerUp {
            button: Button::Secondary,
            pos: [640.0, 210.0],
        },
        InputEvent::Wheel { delta: -250.0 },
    ];
    let first = events.iter().cloned().fold(engine(), reduce);
    let second = events.into_iter().fold(engine(), reduce);
    assert_eq!(first, second);
    assert_eq!(first.paths(), second.paths());
    assert_eq!(first.scene.len(), 2);

    let cleared = reduce(first, InputEvent::Command(Command::ClearAll));
    assert!(cleared.scene.is_empty());
    assert!(cleared.paths().is_empty());
}
