//! Command-line REPL driving the keyboard backend by hand

use ally_input::input::{KeyEventKind, Modifiers, NoGamepads};
use ally_input::{ButtonName, InputBackend, InputConfig, KeyEvent, StickName, UnifiedInput};
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const HELP: &str = "commands: down <key> | up <key> | tick [n] | state | stick <left|right> | controls | map | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Down(String),
    Up(String),
    Tick(u32),
    State,
    Stick(StickName),
    Controls,
    Map,
    Help,
    Quit,
}

/// Parse one REPL line
///
/// Key names are taken verbatim after the command word, so `down  ` (a
/// single space) presses the spacebar.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim_start();
    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed.trim_end(), ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "down" | "up" => {
            let key = if rest.trim().is_empty() { rest } else { rest.trim() };
            if key.is_empty() {
                return Err(format!("usage: {} <key>", word));
            }
            if word.eq_ignore_ascii_case("down") {
                Ok(Command::Down(key.to_string()))
            } else {
                Ok(Command::Up(key.to_string()))
            }
        },
        "tick" => match rest.trim() {
            "" => Ok(Command::Tick(1)),
            n => n
                .parse()
                .map(Command::Tick)
                .map_err(|_| format!("invalid tick count: {}", n)),
        },
        "state" => Ok(Command::State),
        "stick" => rest
            .trim()
            .parse()
            .map(Command::Stick)
            .map_err(|e| e.to_string()),
        "controls" => Ok(Command::Controls),
        "map" => Ok(Command::Map),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err(HELP.to_string()),
        other => Err(format!("unknown command: {}", other)),
    }
}

/// Build a key event from `ctrl+shift+d` style chord notation
///
/// Modifier prefixes are case-insensitive; whatever follows them is the key,
/// so `ctrl++` is Ctrl with the `+` key.
pub fn parse_chord(chord: &str, kind: KeyEventKind) -> KeyEvent {
    let mut modifiers = Modifiers::default();
    let mut key = chord;

    loop {
        let Some((prefix, rest)) = key.split_once('+') else {
            break;
        };
        if rest.is_empty() {
            break;
        }
        match prefix.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            "meta" | "cmd" => modifiers.meta = true,
            _ => break,
        }
        key = rest;
    }

    let event = match kind {
        KeyEventKind::Down => KeyEvent::down(key),
        KeyEventKind::Up => KeyEvent::up(key),
    };
    event.with_modifiers(modifiers)
}

/// Ctrl+D flips the live state overlay
fn is_overlay_toggle(event: &KeyEvent) -> bool {
    event.kind == KeyEventKind::Down && event.modifiers.ctrl && event.key.eq_ignore_ascii_case("d")
}

/// Input state behind the REPL; no gamepad is ever attached
pub struct Session {
    input: UnifiedInput<NoGamepads>,
    ticks: u64,
    /// Print pressed buttons and sticks after every tick
    overlay: bool,
}

impl Session {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            input: UnifiedInput::from_config(config, NoGamepads),
            ticks: 0,
            overlay: false,
        }
    }

    /// Apply a command and return the lines to print
    pub fn execute(&mut self, command: &Command) -> Vec<String> {
        match command {
            Command::Down(chord) => self.key_event(parse_chord(chord, KeyEventKind::Down)),
            Command::Up(chord) => self.key_event(parse_chord(chord, KeyEventKind::Up)),
            Command::Tick(n) => {
                for _ in 0..*n {
                    self.input.update();
                    self.ticks += 1;
                }
                let mut out = vec![format!("tick {}", self.ticks), self.edges()];
                if self.overlay {
                    out.push(format!("pressed: {}", join_buttons(&self.input.pressed_buttons())));
                    for stick in [StickName::Left, StickName::Right] {
                        let reading = self.input.stick(stick);
                        out.push(format!("{} stick: x={:.3} y={:.3}", stick, reading.x, reading.y));
                    }
                }
                out
            },
            Command::State => vec![
                format!("method: {}", self.input.active_input_method()),
                format!("pressed: {}", join_buttons(&self.input.pressed_buttons())),
                self.edges(),
                format!(
                    "triggers: LT={:.2} RT={:.2}",
                    self.input.trigger(ButtonName::Lt),
                    self.input.trigger(ButtonName::Rt)
                ),
            ],
            Command::Stick(stick) => {
                let reading = self.input.stick(*stick);
                vec![format!(
                    "{} stick: x={:.3} y={:.3} magnitude={:.3}",
                    stick, reading.x, reading.y, reading.magnitude
                )]
            },
            Command::Controls => legend(self.input.keyboard_controls()),
            Command::Map => legend(self.input.keyboard_map()),
            Command::Help => vec![HELP.to_string()],
            Command::Quit => Vec::new(),
        }
    }

    fn key_event(&mut self, event: KeyEvent) -> Vec<String> {
        self.input.keyboard_mut().handle_key_event(&event);
        let mut out = vec![self.describe_key(&event)];
        if is_overlay_toggle(&event) {
            self.overlay = !self.overlay;
            out.push(format!("state overlay {}", if self.overlay { "on" } else { "off" }));
        }
        out
    }

    fn describe_key(&self, event: &KeyEvent) -> String {
        let key = event.key.as_str();
        match self.input.keyboard().keymap().button_for(key) {
            Some(button) => format!("{} -> {}", event, button),
            None if self.input.keyboard().keymap().is_mapped(key) => {
                format!("{} -> stick/trigger", event)
            },
            None => format!("{} (unmapped)", event),
        }
    }

    fn edges(&self) -> String {
        let pressed: Vec<_> = ButtonName::ALL
            .into_iter()
            .filter(|b| self.input.just_pressed(*b))
            .collect();
        let released: Vec<_> = ButtonName::ALL
            .into_iter()
            .filter(|b| self.input.just_released(*b))
            .collect();
        format!(
            "just pressed: {} | just released: {}",
            join_buttons(&pressed),
            join_buttons(&released)
        )
    }
}

fn legend(entries: &[(&str, &str)]) -> Vec<String> {
    entries
        .iter()
        .map(|(section, keys)| format!("{}: {}", section, keys))
        .collect()
}

fn join_buttons(buttons: &[ButtonName]) -> String {
    if buttons.is_empty() {
        return "-".to_string();
    }
    buttons
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run_repl(config: &InputConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut session = Session::new(config);
    println!("{}", "Ally Input REPL".bold().cyan());
    println!("{}", HELP.dimmed());

    loop {
        let line = match rl.readline("ally> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                for output in session.execute(&command) {
                    println!("{}", output.green());
                }
            },
            Err(message) => println!("{}", message.yellow()),
        }
    }

    Ok(())
}
