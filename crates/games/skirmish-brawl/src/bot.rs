use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::fighter::FighterState;
use crate::input::{Control, ControlFrame};
use crate::rng::roll;

/// Horizontal gap the bot closes before it stops walking.
const APPROACH_GAP: f32 = 60.0;
/// The target must be at least this far above before the bot jumps.
const JUMP_HEIGHT_GAP: f32 = 20.0;
const JUMP_RANGE: f32 = 160.0;
const ATTACK_RANGE: f32 = 80.0;
const SPECIAL_MIN_RANGE: f32 = 200.0;
const ULTIMATE_RANGE: f32 = 120.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Med,
    Hard,
}

/// Per-tick probability that the bot acts on an opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gates {
    pub jump: f32,
    pub attack: f32,
    pub special: f32,
    pub ultimate: f32,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Med => "med",
            Difficulty::Hard => "hard",
        }
    }

    pub fn gates(self) -> Gates {
        match self {
            Difficulty::Easy => Gates {
                jump: 0.02,
                attack: 0.03,
                special: 0.01,
                ultimate: 0.04,
            },
            Difficulty::Med => Gates {
                jump: 0.04,
                attack: 0.06,
                special: 0.02,
                ultimate: 0.08,
            },
            Difficulty::Hard => Gates {
                jump: 0.10,
                attack: 0.12,
                special: 0.03,
                ultimate: 0.12,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "med" | "medium" => Ok(Difficulty::Med),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Generate the scripted opponent's control frame for this tick.
///
/// The bot goes through the same input path as a human, so cooldowns, hitstun
/// and charge are enforced by the fighter itself. Exactly one draw is taken from
/// `rng_state` per call while the bot is alive.
pub fn generate_bot_input(
    me: &FighterState,
    target: &FighterState,
    rng_state: &mut u64,
    difficulty: Difficulty,
) -> ControlFrame {
    let mut frame = ControlFrame::default();
    if !me.alive {
        return frame;
    }

    let rolls: [f32; 4] = roll(rng_state, |rng| rng.random());
    let gates = difficulty.gates();
    let dx = target.x - me.x;
    let gap = dx.abs();

    if gap > APPROACH_GAP {
        frame.set(if dx < 0.0 { Control::Left } else { Control::Right }, true);
    }
    if target.y + JUMP_HEIGHT_GAP < me.y && gap < JUMP_RANGE && rolls[0] < gates.jump {
        frame.set(Control::Up, true);
    }
    if gap < ATTACK_RANGE && rolls[1] < gates.attack {
        frame.set(Control::Attack, true);
    }
    if gap > SPECIAL_MIN_RANGE && rolls[2] < gates.special {
        frame.set(Control::Special, true);
    }
    if me.has_full_charge() && gap < ULTIMATE_RANGE && rolls[3] < gates.ultimate {
        frame.set(Control::Ultimate, true);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FighterLoadout;
    use crate::stage::Stage;

    fn pair(gap: f32) -> (FighterState, FighterState) {
        let stage = Stage::default();
        let mut bot = FighterState::new(2, 1, &FighterLoadout::for_slot(1), &stage);
        let mut target = FighterState::new(1, 0, &FighterLoadout::for_slot(0), &stage);
        bot.x = 600.0;
        bot.y = 540.0;
        target.x = 600.0 + gap;
        target.y = 540.0;
        (bot, target)
    }

    #[test]
    fn approaches_distant_target() {
        let (bot, target) = pair(-300.0);
        let mut rng = 7;
        let frame = generate_bot_input(&bot, &target, &mut rng, Difficulty::Med);
        assert!(frame.left);
        assert!(!frame.right);
        assert!(!frame.attack);
    }

    #[test]
    fn holds_position_when_close() {
        let (bot, target) = pair(30.0);
        let mut rng = 7;
        let frame = generate_bot_input(&bot, &target, &mut rng, Difficulty::Hard);
        assert!(!frame.left && !frame.right);
    }

    #[test]
    fn dead_bot_idles_without_drawing() {
        let (mut bot, target) = pair(30.0);
        bot.alive = false;
        let mut rng = 7;
        assert_eq!(
            generate_bot_input(&bot, &target, &mut rng, Difficulty::Hard),
            ControlFrame::default()
        );
        assert_eq!(rng, 7);
    }

    #[test]
    fn attacks_sometimes_at_close_range() {
        let (bot, target) = pair(40.0);
        let mut rng = 1;
        let attacks = (0..2000)
            .filter(|_| generate_bot_input(&bot, &target, &mut rng, Difficulty::Hard).attack)
            .count();
        // 12% gate over 2000 draws.
        assert!(attacks > 120 && attacks < 400, "attacks = {attacks}");
    }

    #[test]
    fn never_ultimates_without_charge() {
        let (bot, target) = pair(40.0);
        let mut rng = 3;
        for _ in 0..500 {
            assert!(!generate_bot_input(&bot, &target, &mut rng, Difficulty::Hard).ultimate);
        }
    }

    #[test]
    fn same_seed_same_frames() {
        let (bot, target) = pair(100.0);
        let mut a = 11;
        let mut b = 11;
        for _ in 0..100 {
            assert_eq!(
                generate_bot_input(&bot, &target, &mut a, Difficulty::Easy),
                generate_bot_input(&bot, &target, &mut b, Difficulty::Easy)
            );
        }
    }

    #[test]
    fn difficulty_parses() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("med".parse::<Difficulty>(), Ok(Difficulty::Med));
        assert!("nightmare".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Med);
    }
}
