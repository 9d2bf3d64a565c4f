//! Persona phase definitions

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

/// The four escalating persona phases of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Pure utility, best prices (score 0-30)
    Consumer = 1,
    /// Time-cost analysis (score 31-55)
    Friction = 2,
    /// Supply chain exposure (score 56-80)
    Reveal = 3,
    /// Self-sufficiency (score 81+)
    Sovereign = 4,
}

impl Phase {
    /// All phases in ascending order
    pub const ALL: [Phase; 4] = [Phase::Consumer, Phase::Friction, Phase::Reveal, Phase::Sovereign];

    /// Ordinal used in prompts and logs (1-4)
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Phase> {
        match n {
            1 => Some(Phase::Consumer),
            2 => Some(Phase::Friction),
            3 => Some(Phase::Reveal),
            4 => Some(Phase::Sovereign),
            _ => None,
        }
    }

    /// Zero-based position for table lookups
    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }

    /// Upper-case name as shown to the model
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Consumer => "CONSUMER",
            Phase::Friction => "FRICTION",
            Phase::Reveal => "REVEAL",
            Phase::Sovereign => "SOVEREIGN",
        }
    }

    /// Title shown on the shadow monitor
    pub fn panel_title(&self) -> &'static str {
        match self {
            Phase::Consumer => "PHASE 1: CONSUMER PROXY",
            Phase::Friction => "PHASE 2: FRICTION INJECTION",
            Phase::Reveal => "PHASE 3: SYSTEM REVEAL",
            Phase::Sovereign => "PHASE 4: SOVEREIGN EXIT",
        }
    }

    /// Logic gate opens once the persona is past friction
    pub fn logic_gate(&self) -> &'static str {
        if *self > Phase::Friction {
            "OPEN"
        } else {
            "RESTRICTED"
        }
    }

    /// Paint text in this phase's terminal color
    pub fn paint(&self, text: &str) -> ColoredString {
        match self {
            Phase::Consumer => text.blue(),
            Phase::Friction => text.yellow(),
            Phase::Reveal => text.truecolor(255, 135, 0),
            Phase::Sovereign => text.red(),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    /// Accepts a phase name (any case) or its number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Phase::from_number(n).ok_or_else(|| format!("no phase numbered {}", n));
        }
        Phase::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown phase '{}'", s))
    }
}
