//! Keyboard input mapping
//!
//! Raw key-down/key-up events with platform key codes become logical
//! actions. Held keys drive the movement direction; jump and restart are
//! one-shot and consumed by the next tick.

use serde::{Deserialize, Serialize};

use crate::sim::{TickInput, facing_for};

/// Logical actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
    /// Toggle the autopilot
    ToggleIdle,
    /// Handled by the host, never reaches the simulation
    Quit,
}

/// Key codes bound to each action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: Vec<u16>,
    pub right: Vec<u16>,
    pub jump: Vec<u16>,
    pub restart: Vec<u16>,
    pub toggle_idle: Vec<u16>,
    pub quit: Vec<u16>,
}

impl Default for KeyBindings {
    /// macOS virtual key codes: arrows, A/D, space, W/up, R, I, Q
    fn default() -> Self {
        Self {
            left: vec![123, 0],
            right: vec![124, 2],
            jump: vec![49, 13, 126],
            restart: vec![15],
            toggle_idle: vec![34],
            quit: vec![12],
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, code: u16) -> Option<Action> {
        let table = [
            (&self.left, Action::MoveLeft),
            (&self.right, Action::MoveRight),
            (&self.jump, Action::Jump),
            (&self.restart, Action::Restart),
            (&self.toggle_idle, Action::ToggleIdle),
            (&self.quit, Action::Quit),
        ];
        table
            .into_iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, action)| action)
    }
}

/// Turns key events into per-tick input
#[derive(Debug, Clone)]
pub struct InputMapper {
    bindings: KeyBindings,
    left_held: bool,
    right_held: bool,
    jump_held: bool,
    jump_requested: bool,
    restart_requested: bool,
    idle_mode: bool,
    facing: f32,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputMapper {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            left_held: false,
            right_held: false,
            jump_held: false,
            jump_requested: false,
            restart_requested: false,
            idle_mode: false,
            facing: 1.0,
        }
    }

    /// Feed a raw key event. Returns the action it was bound to, if any.
    pub fn handle_key(&mut self, code: u16, pressed: bool) -> Option<Action> {
        let action = self.bindings.action_for(code)?;
        match action {
            Action::MoveLeft => self.left_held = pressed,
            Action::MoveRight => self.right_held = pressed,
            Action::Jump => {
                // Auto-repeat downs while held do not re-trigger
                if pressed && !self.jump_held {
                    self.jump_requested = true;
                }
                self.jump_held = pressed;
            }
            Action::Restart => {
                if pressed {
                    self.restart_requested = true;
                }
            }
            Action::ToggleIdle => {
                if pressed {
                    self.idle_mode = !self.idle_mode;
                    log::info!("Idle mode: {}", self.idle_mode);
                }
            }
            Action::Quit => {}
        }
        self.facing = facing_for(self.facing, self.move_direction());
        Some(action)
    }

    /// Right minus left: -1, 0 or +1
    pub fn move_direction(&self) -> f32 {
        f32::from(u8::from(self.right_held)) - f32::from(u8::from(self.left_held))
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn idle_mode(&self) -> bool {
        self.idle_mode
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Input for the next tick; one-shot requests are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            move_direction: self.move_direction(),
            jump: std::mem::take(&mut self.jump_requested),
            restart: std::mem::take(&mut self.restart_requested),
            idle_mode: self.idle_mode,
        }
    }

    /// Drop all held keys and pending requests (after a respawn)
    pub fn clear(&mut self) {
        self.left_held = false;
        self.right_held = false;
        self.jump_held = false;
        self.jump_requested = false;
        self.restart_requested = false;
    }
}
