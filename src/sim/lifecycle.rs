/// Episode state machine.
///
/// ```text
///            pellets exhausted
///   Running ───────────────────▶ Won
///      │  last life lost
///      ├───────────────────────▶ Lost
///      │  step limit reached
///      └───────────────────────▶ Truncated
/// ```
///
/// Terminal states are sticky. When several inputs fire on the same tick
/// the order above decides: a cleared board beats a loss, a loss beats
/// truncation.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Running,
    Won,
    Lost,
    Truncated,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Running)
    }

    pub fn is_won(self) -> bool {
        matches!(self, Outcome::Won)
    }
}

/// What happened this tick, as seen by the lifecycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInputs {
    pub life_lost: bool,
    pub lives_remaining: u32,
    pub pellets_exhausted: bool,
    pub step_limit_reached: bool,
}

/// Next outcome from `current` and this tick's inputs.
pub fn transition(current: Outcome, t: TickInputs) -> Outcome {
    if current.is_terminal() {
        return current;
    }
    if t.pellets_exhausted {
        Outcome::Won
    } else if t.life_lost && t.lives_remaining == 0 {
        Outcome::Lost
    } else if t.step_limit_reached {
        Outcome::Truncated
    } else {
        Outcome::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(life_lost: bool, lives: u32, exhausted: bool, limit: bool) -> TickInputs {
        TickInputs {
            life_lost,
            lives_remaining: lives,
            pellets_exhausted: exhausted,
            step_limit_reached: limit,
        }
    }

    #[test]
    fn quiet_tick_keeps_running() {
        assert_eq!(transition(Outcome::Running, inputs(false, 3, false, false)), Outcome::Running);
    }

    #[test]
    fn life_lost_with_lives_left_keeps_running() {
        assert_eq!(transition(Outcome::Running, inputs(true, 2, false, false)), Outcome::Running);
    }

    #[test]
    fn priority_order() {
        // exhausted beats everything
        assert_eq!(transition(Outcome::Running, inputs(true, 0, true, true)), Outcome::Won);
        // loss beats truncation
        assert_eq!(transition(Outcome::Running, inputs(true, 0, false, true)), Outcome::Lost);
        assert_eq!(transition(Outcome::Running, inputs(false, 3, false, true)), Outcome::Truncated);
        // a survivable hit on the last step is still truncation
        assert_eq!(transition(Outcome::Running, inputs(true, 1, false, true)), Outcome::Truncated);
    }

    #[test]
    fn terminal_is_sticky() {
        for o in [Outcome::Won, Outcome::Lost, Outcome::Truncated] {
            assert!(o.is_terminal());
            assert_eq!(transition(o, inputs(false, 3, false, false)), o);
            assert_eq!(transition(o, inputs(true, 0, true, true)), o);
        }
        assert!(!Outcome::Running.is_terminal());
    }
}
