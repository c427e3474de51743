use std::fmt;

use log::warn;

/// A problem that was logged and skipped over without stopping the conversion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    UnknownVariable {
        name: String,
    },
    TruncatedValue {
        name: String,
        length: usize,
        value: String,
    },
    InvalidBirthDate {
        player: usize,
        value: String,
    },
    InvalidRound {
        player: usize,
        round: String,
    },
    NegativeOpponent {
        player: usize,
        round: u8,
        opponent: i64,
    },
    MissingSentinel {
        player: usize,
        round: u8,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVariable { name } => write!(f, "skipping invalid variable: {name}"),
            Self::TruncatedValue {
                name,
                length,
                value,
            } => write!(
                f,
                "trimmed {name} from {length} to {} characters: '{value}'",
                value.chars().count()
            ),
            Self::InvalidBirthDate { player, value } => write!(
                f,
                "invalid birth date for player {player}: {value} (expected DD/MM/YYYY)"
            ),
            Self::InvalidRound { player, round } => {
                write!(f, "invalid round number '{round}' for player {player}")
            }
            Self::NegativeOpponent {
                player,
                round,
                opponent,
            } => write!(
                f,
                "ignoring opponent {opponent} for player {player} in round {round}"
            ),
            Self::MissingSentinel { player, round } => write!(
                f,
                "no EXEMPT player to pair with player {player} in round {round}"
            ),
        }
    }
}

/// What a conversion did.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    pub variables: usize,
    pub players: usize,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}
