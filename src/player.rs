use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use serde_json::{Map, Number, Value as JsonValue};

use crate::{
    DATE_FORMAT,
    document::{PlayerDocument, as_integral},
    error::ConvertError,
    reference::{self, RefIndex, SENTINEL_REF},
    report::{Report, Warning},
    round::{self, ByeClaim, RoundField},
    store::{NamedRow, Row, Table, Value},
};

pub const REF_COLUMN: &str = "Ref";
pub const CLUB_REF_COLUMN: &str = "ClubRef";

const BIRTH_DATE: Field = Field::new("birthDate", "NeLe");
const CHECKED_IN: Field = Field::new("checkedIn", "Pointe");

/// A document key and the player table column it is stored in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub column: &'static str,
}

impl Field {
    const fn new(key: &'static str, column: &'static str) -> Self {
        Self { key, column }
    }
}

/// Every scalar player field, in document order.
pub const FIELDS: [Field; 29] = [
    Field::new("refFFE", "RefFFE"),
    Field::new("nr", "Nr"),
    Field::new("nrFFE", "NrFFE"),
    Field::new("lastName", "Nom"),
    Field::new("firstName", "Prenom"),
    Field::new("gender", "Sexe"),
    BIRTH_DATE,
    Field::new("category", "Cat"),
    Field::new("elo", "Elo"),
    Field::new("rapidElo", "Rapide"),
    Field::new("blitzElo", "Blitz"),
    Field::new("federation", "Federation"),
    Field::new("club", "Club"),
    Field::new("league", "Ligue"),
    Field::new("fideElo", "Fide"),
    Field::new("fideRapidElo", "RapideFide"),
    Field::new("fideBlitzElo", "BlitzFide"),
    Field::new("fideCode", "FideCode"),
    Field::new("fideTitle", "FideTitre"),
    Field::new("licenceType", "AffType"),
    Field::new("paid", "InscriptionRegle"),
    Field::new("owed", "InscriptionDu"),
    Field::new("fixedBoard", "Fixe"),
    CHECKED_IN,
    Field::new("address", "Adresse"),
    Field::new("postalCode", "CP"),
    Field::new("phone", "Tel"),
    Field::new("email", "EMail"),
    Field::new("comment", "Commentaire"),
];

/// The values every new player row starts with, rounds included.
///
/// The club link is always cleared; registration fields, the fixed board and
/// the licence type may still be set by the document.
#[must_use]
pub fn default_row() -> NamedRow {
    let mut row = NamedRow::default();

    row.insert(CLUB_REF_COLUMN.to_string(), Value::Int(0));
    row.insert("Fixe".to_string(), Value::Int(0));
    row.insert("InscriptionRegle".to_string(), Value::Int(0));
    row.insert("InscriptionDu".to_string(), Value::Int(0));
    row.insert("AffType".to_string(), Value::Text("N".to_string()));
    round::set_defaults(&mut row);

    row
}

/// Builds the row of the document player stored under `reference`.
///
/// Also returns the byes the player claims from the `EXEMPT` player.
///
/// # Errors
///
/// If a round is malformed or a reference is too large to store.
pub fn import_player(
    player: &PlayerDocument,
    reference: usize,
    report: &mut Report,
) -> Result<(NamedRow, Vec<ByeClaim>), ConvertError> {
    let mut row = default_row();

    for field in FIELDS {
        let Some(value) = player.fields.get(field.key) else {
            continue;
        };

        let value = if field == BIRTH_DATE {
            birth_date(value, reference, report)
        } else if field == CHECKED_IN {
            checked_in(value)
        } else {
            scalar(value)
        };

        if let Some(value) = value {
            row.insert(field.column.to_string(), value);
        }
    }

    for key in player.fields.keys() {
        if !FIELDS.iter().any(|field| field.key == key) {
            debug!("player {reference}: no column for {key}, skipping it");
        }
    }

    row.insert(CLUB_REF_COLUMN.to_string(), Value::Int(0));
    row.insert(REF_COLUMN.to_string(), reference::to_value(reference)?);

    let byes = round::encode_all(&player.rounds, reference, &mut row, report)?;

    Ok((row, byes))
}

fn scalar(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Number(number) => as_integral(number)
            .map(Value::Int)
            .or_else(|| number.as_f64().map(Value::Float)),
        JsonValue::String(string) if !string.is_empty() => Some(Value::Text(string.clone())),
        JsonValue::Bool(boolean) => Some(Value::Bool(*boolean)),
        _ => None,
    }
}

fn birth_date(value: &JsonValue, reference: usize, report: &mut Report) -> Option<Value> {
    let date = match value {
        JsonValue::Null => return None,
        JsonValue::String(string) if string.is_empty() => return None,
        JsonValue::String(string) => NaiveDate::parse_from_str(string, DATE_FORMAT).ok(),
        _ => None,
    };

    if date.is_none() {
        report.warn(Warning::InvalidBirthDate {
            player: reference,
            value: value.as_str().map_or_else(|| value.to_string(), ToString::to_string),
        });
    }

    date.map(Value::Date)
}

fn checked_in(value: &JsonValue) -> Option<Value> {
    let checked_in = match value {
        JsonValue::Null => return None,
        JsonValue::Bool(boolean) => *boolean,
        JsonValue::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        JsonValue::String(string) => string.trim().eq_ignore_ascii_case("true"),
        _ => false,
    };

    Some(Value::Bool(checked_in))
}

/// Builds the document player of a stored row.
///
/// Only fields holding something are written.
///
/// # Errors
///
/// If a round is paired against a reference that is not in `index`.
pub fn export_player(
    table: &Table,
    row: &Row,
    reference: usize,
    index: &RefIndex,
    report: &mut Report,
) -> Result<PlayerDocument, ConvertError> {
    let mut fields = Map::new();

    for field in FIELDS {
        let Some(value) = table.value(row, field.column) else {
            continue;
        };
        if value.is_blank() {
            continue;
        }

        let value = if field == BIRTH_DATE {
            if let Value::Date(date) = value {
                Some(JsonValue::String(date.format(DATE_FORMAT).to_string()))
            } else {
                report.warn(Warning::InvalidBirthDate {
                    player: reference,
                    value: value.to_string(),
                });
                None
            }
        } else {
            to_json(value)
        };

        if let Some(value) = value {
            fields.insert(field.key.to_string(), value);
        }
    }

    let rounds = round::decode_all(table, row, index, reference)?;

    Ok(PlayerDocument { fields, rounds })
}

fn to_json(value: &Value) -> Option<JsonValue> {
    match value {
        Value::Null => None,
        Value::Bool(boolean) => Some(JsonValue::Bool(*boolean)),
        Value::Date(date) => Some(JsonValue::String(date.format(DATE_FORMAT).to_string())),
        Value::Float(float) => Number::from_f64(*float).map(JsonValue::Number),
        Value::Int(int) => Some(JsonValue::from(*int)),
        Value::Text(text) => Some(JsonValue::String(text.clone())),
    }
}

/// How a player shows up in the log.
#[must_use]
pub fn display_name(player: &PlayerDocument, reference: usize) -> String {
    let name = |key: &str| player.fields.get(key).and_then(JsonValue::as_str);

    match (name("firstName"), name("lastName")) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(name), None) | (None, Some(name)) => name.to_string(),
        (None, None) => format!("Player {reference}"),
    }
}

/// The rows of one import, written to the player table together.
///
/// Byes are collected per round of the `EXEMPT` player. When two players take
/// a bye in the same round the later one wins.
#[derive(Debug, Default)]
pub struct PlayerWrites {
    rows: Vec<NamedRow>,
    byes: BTreeMap<u8, usize>,
}

impl PlayerWrites {
    pub fn stage(&mut self, row: NamedRow, byes: Vec<ByeClaim>) {
        self.rows.push(row);

        for bye in byes {
            if let Some(previous) = self.byes.insert(bye.round, bye.player) {
                debug!(
                    "round {}: player {} replaces player {previous} against EXEMPT",
                    bye.round, bye.player
                );
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replaces every player of `table` but `EXEMPT` with the staged rows and
    /// pairs `EXEMPT` with the players that took a bye.
    ///
    /// Returns the number of players written.
    ///
    /// # Errors
    ///
    /// If the table has no `Ref` column or a value doesn't fit its column.
    pub fn commit(self, table: &mut Table, report: &mut Report) -> Result<usize, ConvertError> {
        let ref_column = table.require_column(REF_COLUMN)?;

        let deleted = table.delete_where(|row| {
            row.get(ref_column)
                .and_then(reference::from_value)
                .is_some_and(|reference| reference > SENTINEL_REF)
        });
        debug!("deleted {deleted} players from {}", table.name());

        let sentinel = table.rows().position(|row| {
            row.get(ref_column).and_then(reference::from_value) == Some(SENTINEL_REF)
        });

        for (round, player) in self.byes {
            let Some(sentinel) = sentinel else {
                report.warn(Warning::MissingSentinel { player, round });
                continue;
            };

            table.update(
                sentinel,
                &round::column(round, RoundField::Color),
                &Value::Text(round::SENTINEL_COLOR.to_string()),
            )?;
            table.update(
                sentinel,
                &round::column(round, RoundField::Opponent),
                &reference::to_value(player)?,
            )?;
            table.update(
                sentinel,
                &round::column(round, RoundField::Result),
                &Value::Int(0),
            )?;
        }

        let written = self.rows.len();
        for row in &self.rows {
            table.insert(row)?;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{Column, ColumnType};

    fn player(value: JsonValue) -> PlayerDocument {
        serde_json::from_value(value).unwrap_or_default()
    }

    fn table() -> Table {
        let mut columns = vec![
            Column::new(REF_COLUMN, ColumnType::Int),
            Column::new("Nom", ColumnType::Text),
            Column::new("NeLe", ColumnType::Date),
            Column::new("Elo", ColumnType::Int),
            Column::new("InscriptionRegle", ColumnType::Float),
            Column::new("Pointe", ColumnType::Bool),
            Column::new("Commentaire", ColumnType::Text),
        ];
        columns.extend(round::columns());
        Table::new("JOUEUR", columns)
    }

    #[test]
    fn scalar_fields_keep_their_type() -> anyhow::Result<()> {
        let mut report = Report::default();
        let player = player(json!({
            "lastName": "Tal",
            "firstName": "",
            "elo": 2100,
            "rapidElo": 1900.0,
            "paid": 12.5,
            "checkedIn": true,
            "birthDate": "09/11/1936",
            "nickname": "the magician",
        }));

        let (row, byes) = import_player(&player, 2, &mut report)?;

        assert!(byes.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(row.get("Ref"), Some(&Value::Int(2)));
        assert_eq!(row.get("Nom"), Some(&Value::Text("Tal".to_string())));
        assert_eq!(row.get("Prenom"), None);
        assert_eq!(row.get("Elo"), Some(&Value::Int(2100)));
        assert_eq!(row.get("Rapide"), Some(&Value::Int(1900)));
        assert_eq!(row.get("InscriptionRegle"), Some(&Value::Float(12.5)));
        assert_eq!(row.get("Pointe"), Some(&Value::Bool(true)));
        assert_eq!(
            row.get("NeLe"),
            NaiveDate::from_ymd_opt(1936, 11, 9).map(Value::Date).as_ref()
        );

        Ok(())
    }

    #[test]
    fn fixed_defaults() -> anyhow::Result<()> {
        let mut report = Report::default();
        let (row, _) = import_player(&player(json!({ "owed": 5 })), 3, &mut report)?;

        assert_eq!(row.get(CLUB_REF_COLUMN), Some(&Value::Int(0)));
        assert_eq!(row.get("Fixe"), Some(&Value::Int(0)));
        assert_eq!(row.get("InscriptionRegle"), Some(&Value::Int(0)));
        assert_eq!(row.get("InscriptionDu"), Some(&Value::Int(5)));
        assert_eq!(row.get("AffType"), Some(&Value::Text("N".to_string())));
        assert_eq!(row.get("Rd24Cl"), Some(&Value::Text("R".to_string())));

        Ok(())
    }

    #[test]
    fn bad_birth_dates_are_left_unset() -> anyhow::Result<()> {
        let mut report = Report::default();
        let (row, _) = import_player(&player(json!({ "birthDate": "1936-11-09" })), 2, &mut report)?;

        assert_eq!(row.get("NeLe"), None);
        assert_eq!(
            report.warnings,
            vec![Warning::InvalidBirthDate {
                player: 2,
                value: "1936-11-09".to_string()
            }]
        );

        Ok(())
    }

    #[test]
    fn export_is_sparse() -> anyhow::Result<()> {
        let mut report = Report::default();
        let mut table = table();
        let (row, _) = import_player(
            &player(json!({
                "lastName": "Tal",
                "elo": 2100,
                "paid": 12.5,
                "checkedIn": false,
                "comment": "   ",
                "birthDate": "09/11/1936",
            })),
            2,
            &mut report,
        )?;
        table.insert(&row)?;

        let row = table.rows().next().cloned().unwrap_or_default();
        let exported = export_player(&table, &row, 2, &RefIndex::new([2]), &mut report)?;

        assert_eq!(
            JsonValue::Object(exported.fields),
            json!({
                "lastName": "Tal",
                "birthDate": "09/11/1936",
                "elo": 2100,
                "paid": 12.5,
                "checkedIn": false,
            })
        );
        assert!(exported.rounds.is_empty());

        Ok(())
    }

    #[test]
    fn stored_birth_dates_that_are_not_dates() -> anyhow::Result<()> {
        let mut report = Report::default();
        let mut table = Table::new(
            "JOUEUR",
            vec![
                Column::new(REF_COLUMN, ColumnType::Int),
                Column::new("Nom", ColumnType::Text),
                Column::new("NeLe", ColumnType::Text),
            ],
        );

        let mut row = NamedRow::default();
        row.insert(REF_COLUMN.to_string(), Value::Int(2));
        row.insert("Nom".to_string(), Value::Text("Tal".to_string()));
        row.insert("NeLe".to_string(), Value::Text("1936-11-09".to_string()));
        table.insert(&row)?;

        let row = table.rows().next().cloned().unwrap_or_default();
        let exported = export_player(&table, &row, 2, &RefIndex::new([2]), &mut report)?;

        assert_eq!(JsonValue::Object(exported.fields), json!({ "lastName": "Tal" }));
        assert_eq!(
            report.warnings,
            vec![Warning::InvalidBirthDate {
                player: 2,
                value: "1936-11-09".to_string()
            }]
        );

        Ok(())
    }

    #[test]
    fn names() {
        assert_eq!(
            display_name(&player(json!({ "firstName": "Mikhail", "lastName": "Tal" })), 2),
            "Mikhail Tal"
        );
        assert_eq!(display_name(&player(json!({ "lastName": "Tal" })), 2), "Tal");
        assert_eq!(display_name(&PlayerDocument::default(), 7), "Player 7");
    }

    #[test]
    fn commit_replaces_players_and_pairs_byes() -> anyhow::Result<()> {
        let mut report = Report::default();
        let mut table = table();

        for reference in [1, 2, 3] {
            let mut row = default_row();
            row.insert(REF_COLUMN.to_string(), reference::to_value(reference)?);
            table.insert(&row)?;
        }

        let mut writes = PlayerWrites::default();
        for index in [0, 1] {
            let reference = reference::index_to_ref(index);
            let document = player(json!({ "rounds": { "4": { "result": 6 } } }));
            let (row, byes) = import_player(&document, reference, &mut report)?;
            writes.stage(row, byes);
        }
        assert_eq!(writes.len(), 2);

        assert_eq!(writes.commit(&mut table, &mut report)?, 2);
        assert_eq!(table.len(), 3);

        let sentinel = table.rows().next().cloned().unwrap_or_default();
        assert_eq!(table.value(&sentinel, REF_COLUMN), Some(&Value::Int(1)));
        assert_eq!(
            table.value(&sentinel, "Rd04Cl"),
            Some(&Value::Text("N".to_string()))
        );
        // Both players took a bye in round 4, the last one is kept.
        assert_eq!(table.value(&sentinel, "Rd04Adv"), Some(&Value::Int(3)));
        assert_eq!(table.value(&sentinel, "Rd04Res"), Some(&Value::Int(0)));

        Ok(())
    }

    #[test]
    fn byes_without_a_sentinel_are_reported() -> anyhow::Result<()> {
        let mut report = Report::default();
        let mut table = table();
        let mut writes = PlayerWrites::default();

        let (row, byes) = import_player(
            &player(json!({ "rounds": { "1": { "result": 6 } } })),
            2,
            &mut report,
        )?;
        writes.stage(row, byes);
        writes.commit(&mut table, &mut report)?;

        assert_eq!(table.len(), 1);
        assert_eq!(
            report.warnings,
            vec![Warning::MissingSentinel {
                player: 2,
                round: 1
            }]
        );

        Ok(())
    }
}
