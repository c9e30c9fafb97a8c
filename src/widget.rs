use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::{
    cursor, queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use lightpath::controller::{handle, Button, Command, InputEvent, Modifiers, Mode};
use lightpath::edit::EditField;
use lightpath::math::direction_vector;
use lightpath::state::EngineState;

use crate::graphics::{draw_line, fill_disk, path_color, Canvas, BACKGROUND};

/// Two presses on the same cell within this window form a double click
const DOUBLE_CLICK: Duration = Duration::from_millis(400);
/// Wheel delta reported per scroll notch
const WHEEL_STEP: f64 = 100.0;

const BODY_COLOR: Color = Color::Rgb { r: 40, g: 40, b: 48 };
const RAY_COLOR: Color = Color::Rgb { r: 80, g: 220, b: 255 };
const EDIT_COLOR: Color = Color::Rgb { r: 255, g: 80, b: 220 };
const TEXT_COLOR: Color = Color::Rgb { r: 230, g: 230, b: 230 };

/// What the event loop should do after an event
#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end: turns crossterm events into engine input and draws
/// the engine state.
pub struct RayWidget {
    canvas: Canvas,
    /// Time and cell of the last left press, for double-click detection
    last_press: Option<(Instant, u16, u16)>,
    /// Set when the current left press completes a double click
    pending_double: bool,
    /// Edit field receiving keystrokes
    focused: EditField,
    /// Show the debug overlay
    pub debug: bool,
}

impl RayWidget {
    pub fn new(cols: u16, rows: u16, debug: bool) -> Self {
        let (width, height) = canvas_size(cols, rows);
        RayWidget {
            canvas: Canvas::new(width, height),
            last_press: None,
            pending_double: false,
            focused: EditField::X,
            debug,
        }
    }

    /// Canvas width and height in pixels
    pub fn canvas_size(&self) -> (usize, usize) {
        (self.canvas.width, self.canvas.height)
    }

    /// Handle one terminal event
    pub fn event(&mut self, event: &Event, state: &mut EngineState) -> Flow {
        let was_editing = state.edit.is_some();
        let flow = match event {
            Event::Mouse(mouse) => {
                self.mouse(mouse, state);
                Flow::Continue
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => self.key(key, state),
            Event::Resize(cols, rows) => {
                let (width, height) = canvas_size(*cols, *rows);
                self.canvas = Canvas::new(width, height);
                state.viewport.resize(width as f64, height as f64);
                Flow::Continue
            }
            _ => Flow::Continue,
        };
        if !was_editing && state.edit.is_some() {
            self.focused = EditField::X;
        }
        flow
    }

    fn mouse(&mut self, mouse: &MouseEvent, state: &mut EngineState) {
        let pos = cell_to_screen(mouse.column, mouse.row);
        // Ctrl doubles as Shift: many terminals keep Shift+click for selection
        let modifiers = Modifiers {
            shift: mouse
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::CONTROL),
            alt: mouse.modifiers.contains(KeyModifiers::ALT),
        };
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if button == MouseButton::Left {
                    let now = Instant::now();
                    self.pending_double = matches!(
                        self.last_press,
                        Some((at, col, row))
                            if col == mouse.column
                                && row == mouse.row
                                && now.duration_since(at) <= DOUBLE_CLICK
                    );
                    self.last_press = if self.pending_double {
                        None
                    } else {
                        Some((now, mouse.column, mouse.row))
                    };
                }
                handle(
                    state,
                    InputEvent::PointerDown {
                        button: map_button(button),
                        pos,
                        modifiers,
                    },
                );
            }
            MouseEventKind::Up(button) => {
                handle(
                    state,
                    InputEvent::PointerUp {
                        button: map_button(button),
                        pos,
                    },
                );
                if button == MouseButton::Left {
                    handle(state, InputEvent::Click { pos, modifiers });
                    if std::mem::take(&mut self.pending_double) {
                        handle(state, InputEvent::DoubleClick { pos });
                    }
                }
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                handle(state, InputEvent::PointerMove { pos });
            }
            MouseEventKind::ScrollDown => handle(state, InputEvent::Wheel { delta: WHEEL_STEP }),
            MouseEventKind::ScrollUp => handle(state, InputEvent::Wheel { delta: -WHEEL_STEP }),
            _ => {}
        }
    }

    fn key(&mut self, key: &KeyEvent, state: &mut EngineState) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if let Some(session) = &state.edit {
            let mut text = session.text(self.focused).to_string();
            match key.code {
                KeyCode::Esc | KeyCode::Enter => handle(state, InputEvent::CloseEdit),
                KeyCode::Tab => self.focused = self.focused.next(),
                KeyCode::Backspace => {
                    text.pop();
                    self.edit_text(text, state);
                }
                KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e') => {
                    text.push(c);
                    self.edit_text(text, state);
                }
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => {
                handle(state, InputEvent::Command(Command::ClearAll))
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                handle(state, InputEvent::Command(Command::ToggleGravity))
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                handle(state, InputEvent::Command(Command::ResetView))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.debug = !self.debug,
            _ => {}
        }
        Flow::Continue
    }

    fn edit_text(&self, text: String, state: &mut EngineState) {
        handle(
            state,
            InputEvent::EditText {
                field: self.focused,
                text,
            },
        );
    }

    /// Draw the scene, paths and overlays
    pub fn paint<W: Write>(&mut self, out: &mut W, state: &EngineState) -> io::Result<()> {
        let viewport = &state.viewport;
        self.canvas.clear(BACKGROUND);

        let center = viewport.world_to_screen([0.0, 0.0]);
        fill_disk(
            center[0],
            center[1],
            state.body_radius() * viewport.zoom,
            &mut self.canvas,
            BODY_COLOR,
        );

        for (_, path) in state.paths() {
            for pair in path.points.windows(2) {
                let (a, b) = (pair[0].screen_position, pair[1].screen_position);
                draw_line(a[0], a[1], b[0], b[1], &mut self.canvas, path_color(pair[1].distance));
            }
        }

        let editing = match state.mode {
            Mode::Editing(id) => Some(id),
            _ => None,
        };
        for ray in state.scene.list() {
            let p = viewport.world_to_screen(ray.position);
            let color = if editing == Some(ray.id()) {
                EDIT_COLOR
            } else {
                RAY_COLOR
            };
            let d = direction_vector(ray.angle);
            draw_line(p[0], p[1], p[0] + d[0] * 4.0, p[1] + d[1] * 4.0, &mut self.canvas, color);
            fill_disk(p[0], p[1], 1.5, &mut self.canvas, color);
        }

        self.canvas.present(out)?;

        let rows = self.canvas.height.div_ceil(2) as u16;
        if self.debug {
            let lines = [
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("Zoom: {:.2}", viewport.zoom),
                format!("Pan: ({:.1}, {:.1})", viewport.pan[0], viewport.pan[1]),
                format!("Rays: {}", state.scene.len()),
                format!("Gravity: {}", if state.gravity { "on" } else { "off" }),
                format!("Mode: {:?}", state.mode),
            ];
            for (i, line) in lines.iter().enumerate() {
                print_line(out, i as u16, line)?;
            }
        }

        if let Some(session) = &state.edit {
            let field = |f: EditField, label: &str| {
                if f == self.focused {
                    format!("{}: [{}]", label, session.text(f))
                } else {
                    format!("{}:  {} ", label, session.text(f))
                }
            };
            let line = format!(
                "Ray #{}  {}  {}  {}   Tab next field, Enter close",
                session.target,
                field(EditField::X, "x"),
                field(EditField::Y, "y"),
                field(EditField::Angle, "angle"),
            );
            print_line(out, rows.saturating_sub(2), &line)?;
        }

        print_line(
            out,
            rows.saturating_sub(1),
            "click place | drag move | right-drag rotate | ctrl/shift+right edit | double-click delete | \
             middle/ctrl-drag pan | wheel zoom | g gravity | c clear | r reset | d debug | q quit",
        )?;
        out.flush()
    }
}

fn print_line<W: Write>(out: &mut W, row: u16, text: &str) -> io::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, row),
        SetForegroundColor(TEXT_COLOR),
        SetBackgroundColor(BACKGROUND),
        Print(text),
        Clear(ClearType::UntilNewLine)
    )
}

/// Pixel size of a canvas filling `cols` x `rows` cells
pub fn canvas_size(cols: u16, rows: u16) -> (usize, usize) {
    (cols as usize, rows as usize * 2)
}

/// Pixel at the center of a terminal cell
pub fn cell_to_screen(col: u16, row: u16) -> [f64; 2] {
    [col as f64 + 0.5, row as f64 * 2.0 + 1.0]
}

fn map_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Primary,
        MouseButton::Right => Button::Secondary,
        MouseButton::Middle => Button::Middle,
    }
}
