use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a conversion.
///
/// Anything recoverable is reported as a [`crate::report::Warning`] instead.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(
        "export: player {player} round {round} is paired against reference {opponent}, which is not a player"
    )]
    UnknownOpponent {
        player: usize,
        round: u8,
        opponent: usize,
    },
    #[error("import: player {player} round {round} is not a round object: {source}")]
    MalformedRound {
        player: usize,
        round: u8,
        source: serde_json::Error,
    },
    #[error("store: reference {0} does not fit in an integer column")]
    ReferenceRange(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}
