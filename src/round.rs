//! Per round columns of the player table.
//!
//! Round `n` of a player is stored in three columns, `RdnnCl` for the color,
//! `RdnnAdv` for the opponent's reference and `RdnnRes` for the result, with `nn`
//! the zero padded round number. A store holds exactly [`ROUNDS`] rounds.

use log::debug;
use serde_json::{Map, Value as JsonValue};

use crate::{
    document::Round,
    error::ConvertError,
    reference::{self, RefIndex, SENTINEL_REF},
    report::{Report, Warning},
    store::{Column, ColumnType, NamedRow, Row, Table, Value},
};

pub const ROUNDS: u8 = 24;

/// The result code of a bye.
pub const BYE: i64 = 6;

/// The color of a round that hasn't been paired.
pub const DEFAULT_COLOR: &str = "R";

/// The color written on the `EXEMPT` player's side of a bye.
pub const SENTINEL_COLOR: &str = "N";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundField {
    Color,
    Opponent,
    Result,
}

impl RoundField {
    const ALL: [Self; 3] = [Self::Color, Self::Opponent, Self::Result];

    fn suffix(self) -> &'static str {
        match self {
            Self::Color => "Cl",
            Self::Opponent => "Adv",
            Self::Result => "Res",
        }
    }

    fn kind(self) -> ColumnType {
        match self {
            Self::Color => ColumnType::Text,
            Self::Opponent | Self::Result => ColumnType::Int,
        }
    }
}

#[must_use]
pub fn column(round: u8, field: RoundField) -> String {
    format!("Rd{round:02}{}", field.suffix())
}

/// The round columns of the player table, in table order.
pub fn columns() -> impl Iterator<Item = Column> {
    (1..=ROUNDS).flat_map(|round| {
        RoundField::ALL
            .into_iter()
            .map(move |field| Column::new(&column(round, field), field.kind()))
    })
}

/// Marks every round as not played: default color, no opponent, no result.
pub fn set_defaults(row: &mut NamedRow) {
    for round in 1..=ROUNDS {
        row.insert(
            column(round, RoundField::Color),
            Value::Text(DEFAULT_COLOR.to_string()),
        );
        row.insert(column(round, RoundField::Opponent), Value::Null);
        row.insert(column(round, RoundField::Result), Value::Int(0));
    }
}

/// A player took a bye, so the `EXEMPT` player has to be paired back with
/// them in the same round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ByeClaim {
    pub round: u8,
    pub player: usize,
}

/// Parses a document round key, `None` unless it is a round the store holds.
#[must_use]
pub fn parse_round(key: &str) -> Option<u8> {
    key.trim()
        .parse::<u8>()
        .ok()
        .filter(|round| (1..=ROUNDS).contains(round))
}

/// Writes one round of `player` into `row`.
///
/// A bye without an opponent is paired with the `EXEMPT` player, and the
/// returned claim says which round of `EXEMPT` has to point back.
///
/// # Errors
///
/// If the opponent's reference is too large to store.
pub fn encode(
    round: u8,
    entry: &Round,
    player: usize,
    row: &mut NamedRow,
    report: &mut Report,
) -> Result<Option<ByeClaim>, ConvertError> {
    if let Some(color) = &entry.color {
        row.insert(column(round, RoundField::Color), Value::Text(color.clone()));
    }

    if let Some(result) = entry.result {
        row.insert(column(round, RoundField::Result), Value::Int(result));
    }

    match entry.opponent {
        Some(opponent) => match usize::try_from(opponent) {
            Ok(index) => {
                row.insert(
                    column(round, RoundField::Opponent),
                    reference::to_value(reference::index_to_ref(index))?,
                );
            }
            Err(_) => report.warn(Warning::NegativeOpponent {
                player,
                round,
                opponent,
            }),
        },
        None if entry.result == Some(BYE) => {
            row.insert(
                column(round, RoundField::Opponent),
                reference::to_value(SENTINEL_REF)?,
            );
            debug!("auto-detected bye for player {player} in round {round} (vs EXEMPT)");

            return Ok(Some(ByeClaim { round, player }));
        }
        None => {}
    }

    Ok(None)
}

/// Writes every round of a document player into `row`, skipping keys that
/// are not rounds the store holds.
///
/// # Errors
///
/// If a round is not a round object or holds an opponent too large to store.
pub fn encode_all(
    rounds: &Map<String, JsonValue>,
    player: usize,
    row: &mut NamedRow,
    report: &mut Report,
) -> Result<Vec<ByeClaim>, ConvertError> {
    let mut byes = Vec::new();

    for (key, value) in rounds {
        let Some(round) = parse_round(key) else {
            report.warn(Warning::InvalidRound {
                player,
                round: key.clone(),
            });
            continue;
        };

        let entry: Round = serde_json::from_value(value.clone()).map_err(|source| {
            ConvertError::MalformedRound {
                player,
                round,
                source,
            }
        })?;

        if let Some(bye) = encode(round, &entry, player, row, report)? {
            byes.push(bye);
        }
    }

    Ok(byes)
}

/// Reads one round of `player` back, `None` if it holds nothing but defaults.
///
/// # Errors
///
/// If the opponent is not a player of the store.
pub fn decode(
    table: &Table,
    row: &Row,
    round: u8,
    index: &RefIndex,
    player: usize,
) -> Result<Option<Round>, ConvertError> {
    let color = table
        .value(row, &column(round, RoundField::Color))
        .filter(|value| !value.is_null())
        .map(ToString::to_string)
        .filter(|color| color != DEFAULT_COLOR);

    let opponent = table
        .value(row, &column(round, RoundField::Opponent))
        .and_then(reference::from_value)
        .filter(|opponent| *opponent > SENTINEL_REF);

    let result = table
        .value(row, &column(round, RoundField::Result))
        .and_then(Value::as_int)
        .filter(|result| *result != 0);

    if color.is_none() && opponent.is_none() && result.is_none() {
        return Ok(None);
    }

    let opponent = opponent
        .map(|opponent| {
            let position = index
                .index_of(opponent)
                .ok_or(ConvertError::UnknownOpponent {
                    player,
                    round,
                    opponent,
                })?;
            i64::try_from(position).map_err(|_| ConvertError::ReferenceRange(position))
        })
        .transpose()?;

    Ok(Some(Round {
        color,
        opponent,
        result,
    }))
}

/// Reads every round of `player` that holds more than defaults.
///
/// # Errors
///
/// If an opponent is not a player of the store.
pub fn decode_all(
    table: &Table,
    row: &Row,
    index: &RefIndex,
    player: usize,
) -> Result<Map<String, JsonValue>, ConvertError> {
    let mut rounds = Map::new();

    for round in 1..=ROUNDS {
        if let Some(decoded) = decode(table, row, round, index, player)? {
            rounds.insert(round.to_string(), JsonValue::from(decoded));
        }
    }

    Ok(rounds)
}
