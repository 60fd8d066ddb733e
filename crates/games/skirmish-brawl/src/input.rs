use serde::{Deserialize, Serialize};

/// Abstract control roles a fighter responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Attack,
    Special,
    Ultimate,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Left,
        Control::Right,
        Control::Up,
        Control::Down,
        Control::Attack,
        Control::Special,
        Control::Ultimate,
    ];

    fn index(self) -> usize {
        match self {
            Control::Left => 0,
            Control::Right => 1,
            Control::Up => 2,
            Control::Down => 3,
            Control::Attack => 4,
            Control::Special => 5,
            Control::Ultimate => 6,
        }
    }
}

/// The set of controls held down during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFrame {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub attack: bool,
    pub special: bool,
    pub ultimate: bool,
}

impl ControlFrame {
    pub fn is_held(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Up => self.up,
            Control::Down => self.down,
            Control::Attack => self.attack,
            Control::Special => self.special,
            Control::Ultimate => self.ultimate,
        }
    }

    pub fn set(&mut self, control: Control, down: bool) {
        let slot = match control {
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Up => &mut self.up,
            Control::Down => &mut self.down,
            Control::Attack => &mut self.attack,
            Control::Special => &mut self.special,
            Control::Ultimate => &mut self.ultimate,
        };
        *slot = down;
    }

    /// Builder-style helper, mostly for tests and the scripted opponent.
    pub fn with(mut self, control: Control) -> Self {
        self.set(control, true);
        self
    }

    fn union(self, other: ControlFrame) -> ControlFrame {
        let mut out = self;
        for c in Control::ALL {
            if other.is_held(c) {
                out.set(c, true);
            }
        }
        out
    }
}

/// Key-code bindings for one fighter's control roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub attack: String,
    pub special: String,
    pub ultimate: String,
}

impl ControlScheme {
    /// WASD + F/G/H.
    pub fn player_one() -> Self {
        Self {
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            up: "KeyW".to_string(),
            down: "KeyS".to_string(),
            attack: "KeyF".to_string(),
            special: "KeyG".to_string(),
            ultimate: "KeyH".to_string(),
        }
    }

    /// Arrows + K/L/;.
    pub fn player_two() -> Self {
        Self {
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            attack: "KeyK".to_string(),
            special: "KeyL".to_string(),
            ultimate: "Semicolon".to_string(),
        }
    }

    /// Default scheme for a 0-based fighter slot.
    pub fn for_slot(slot: usize) -> Self {
        if slot == 0 {
            Self::player_one()
        } else {
            Self::player_two()
        }
    }

    pub fn control_for(&self, code: &str) -> Option<Control> {
        Control::ALL
            .into_iter()
            .find(|&c| self.code_for(c) == code)
    }

    pub fn code_for(&self, control: Control) -> &str {
        match control {
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Up => &self.up,
            Control::Down => &self.down,
            Control::Attack => &self.attack,
            Control::Special => &self.special,
            Control::Ultimate => &self.ultimate,
        }
    }
}

/// Per-fighter input state with edge detection.
///
/// The capture layer writes `press`/`release`/`set_frame` at any time; the
/// simulation samples once per tick with `begin_tick`. A press and release
/// that both land between two ticks still registers as one just-pressed tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    live: ControlFrame,
    taps: ControlFrame,
    held: ControlFrame,
    previous: ControlFrame,
    last_press: [Option<f32>; 7],
    prior_press: [Option<f32>; 7],
}

impl InputState {
    pub fn press(&mut self, control: Control) {
        self.live.set(control, true);
        self.taps.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.live.set(control, false);
    }

    /// Replace the live held set, latching any newly pressed controls.
    pub fn set_frame(&mut self, frame: ControlFrame) {
        for c in Control::ALL {
            if frame.is_held(c) && !self.live.is_held(c) {
                self.taps.set(c, true);
            }
        }
        self.live = frame;
    }

    /// Route a raw key event through a scheme. Returns whether the key was bound.
    pub fn apply_key(&mut self, scheme: &ControlScheme, code: &str, down: bool) -> bool {
        match scheme.control_for(code) {
            Some(c) if down => {
                self.press(c);
                true
            },
            Some(c) => {
                self.release(c);
                true
            },
            None => false,
        }
    }

    /// Sample the live state for a new tick at match-clock time `now`.
    pub fn begin_tick(&mut self, now: f32) {
        self.previous = self.held;
        self.held = self.live.union(self.taps);
        self.taps = ControlFrame::default();
        for c in Control::ALL {
            if self.was_just_pressed(c) {
                let i = c.index();
                self.prior_press[i] = self.last_press[i];
                self.last_press[i] = Some(now);
            }
        }
    }

    /// Drop everything held, e.g. on respawn or rematch.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_down(&self, control: Control) -> bool {
        self.held.is_held(control)
    }

    /// True for exactly one tick after the control goes down.
    pub fn was_just_pressed(&self, control: Control) -> bool {
        self.held.is_held(control) && !self.previous.is_held(control)
    }

    /// Just pressed, and the previous press was within `window_ms`.
    pub fn is_double_tap(&self, control: Control, window_ms: f32) -> bool {
        if !self.was_just_pressed(control) {
            return false;
        }
        let i = control.index();
        match (self.last_press[i], self.prior_press[i]) {
            (Some(last), Some(prior)) => (last - prior) * 1000.0 <= window_ms,
            _ => false,
        }
    }

    pub fn held(&self) -> ControlFrame {
        self.held
    }
}
