//! Whole tournament conversion between a [`Document`] and a [`Database`].
//!
//! Import writes the settings in place and replaces every player but
//! `EXEMPT`. Export only reads the store.

use log::{debug, info};
use serde_json::{Map, Value as JsonValue};

use crate::{
    document::Document,
    error::ConvertError,
    player::{self, CLUB_REF_COLUMN, PlayerWrites, REF_COLUMN},
    reference::{self, RefIndex, SENTINEL_REF},
    report::{Report, Warning},
    round,
    store::{Column, ColumnType, Database, NamedRow, Table, Value},
    variables,
};

pub const SETTINGS_TABLE: &str = "INFO";
pub const PLAYER_TABLE: &str = "JOUEUR";
pub const VARIABLE_COLUMN: &str = "Variable";
pub const VALUE_COLUMN: &str = "Value";

/// The last name of the player every bye is paired against.
pub const SENTINEL_NAME: &str = "EXEMPT";

/// The player columns before the rounds, in table order.
pub const PLAYER_COLUMNS: [(&str, ColumnType); 31] = [
    (REF_COLUMN, ColumnType::Int),
    ("RefFFE", ColumnType::Int),
    ("Nr", ColumnType::Int),
    ("NrFFE", ColumnType::Text),
    ("Nom", ColumnType::Text),
    ("Prenom", ColumnType::Text),
    ("Sexe", ColumnType::Text),
    ("NeLe", ColumnType::Date),
    ("Cat", ColumnType::Text),
    ("AffType", ColumnType::Text),
    ("Elo", ColumnType::Int),
    ("Rapide", ColumnType::Int),
    ("Blitz", ColumnType::Int),
    ("Federation", ColumnType::Text),
    (CLUB_REF_COLUMN, ColumnType::Int),
    ("Club", ColumnType::Text),
    ("Ligue", ColumnType::Text),
    ("Fide", ColumnType::Text),
    ("RapideFide", ColumnType::Text),
    ("BlitzFide", ColumnType::Text),
    ("FideCode", ColumnType::Text),
    ("FideTitre", ColumnType::Text),
    ("Fixe", ColumnType::Int),
    ("InscriptionRegle", ColumnType::Float),
    ("InscriptionDu", ColumnType::Float),
    ("Pointe", ColumnType::Bool),
    ("Adresse", ColumnType::Text),
    ("CP", ColumnType::Text),
    ("Tel", ColumnType::Text),
    ("EMail", ColumnType::Text),
    ("Commentaire", ColumnType::Text),
];

/// An empty tournament: no settings and only the `EXEMPT` player.
///
/// # Errors
///
/// Never, unless the player columns and the default row disagree.
pub fn template() -> Result<Database, ConvertError> {
    let settings = Table::new(
        SETTINGS_TABLE,
        vec![
            Column::new(VARIABLE_COLUMN, ColumnType::Text),
            Column::new(VALUE_COLUMN, ColumnType::Text),
        ],
    );

    let mut columns: Vec<_> = PLAYER_COLUMNS
        .iter()
        .map(|(name, kind)| Column::new(name, *kind))
        .collect();
    columns.extend(round::columns());
    let mut players = Table::new(PLAYER_TABLE, columns);

    let mut sentinel = player::default_row();
    sentinel.insert(REF_COLUMN.to_string(), reference::to_value(SENTINEL_REF)?);
    sentinel.insert("Nom".to_string(), Value::Text(SENTINEL_NAME.to_string()));
    players.insert(&sentinel)?;

    Ok(Database::new(vec![settings, players]))
}

fn check_tables(database: &Database) -> Result<(), ConvertError> {
    let settings = database.table(SETTINGS_TABLE)?;
    settings.require_column(VARIABLE_COLUMN)?;
    settings.require_column(VALUE_COLUMN)?;

    database.table(PLAYER_TABLE)?.require_column(REF_COLUMN)?;

    Ok(())
}

/// Writes `document` into `database`.
///
/// Settings are updated by name and unknown names skipped. When the document
/// has players, they replace every player of the store but `EXEMPT`, which is
/// paired back with each player that took a bye.
///
/// Nothing is written when a table or a required column is missing.
///
/// # Errors
///
/// If a table or column is missing, a round is malformed or a value doesn't
/// fit its column.
pub fn import(document: &Document, database: &mut Database) -> Result<Report, ConvertError> {
    check_tables(database)?;
    let mut report = Report::default();

    if let Some(settings) = &document.variables {
        let table = database.table_mut(SETTINGS_TABLE)?;
        let count = import_settings(settings, table, &mut report)?;
        report.variables = count;
    }

    if let Some(players) = &document.players {
        let mut writes = PlayerWrites::default();

        for (index, document_player) in players.iter().enumerate() {
            let reference = reference::index_to_ref(index);
            debug!(
                "importing {} as reference {reference}",
                player::display_name(document_player, reference)
            );

            let (row, byes) = player::import_player(document_player, reference, &mut report)?;
            writes.stage(row, byes);
        }

        let table = database.table_mut(PLAYER_TABLE)?;
        let count = writes.commit(table, &mut report)?;
        report.players = count;
    }

    info!(
        "imported {} variables and {} players, {} warnings",
        report.variables,
        report.players,
        report.warnings.len()
    );

    Ok(report)
}

fn import_settings(
    settings: &Map<String, JsonValue>,
    table: &mut Table,
    report: &mut Report,
) -> Result<usize, ConvertError> {
    let variable = table.require_column(VARIABLE_COLUMN)?;
    let mut count = 0;

    for (name, value) in settings {
        let Some(local) = variables::to_local(name).filter(|local| variables::is_recognized(local))
        else {
            report.warn(Warning::UnknownVariable { name: name.clone() });
            continue;
        };

        let mut text = setting_text(value);
        if let Some(truncated) = variables::truncate_value(&text) {
            report.warn(Warning::TruncatedValue {
                name: name.clone(),
                length: text.chars().count(),
                value: truncated.clone(),
            });
            text = truncated;
        }

        let existing = table.rows().position(|row| {
            matches!(row.get(variable), Some(Value::Text(stored)) if stored == local)
        });

        if let Some(row) = existing {
            table.update(row, VALUE_COLUMN, &Value::Text(text))?;
        } else {
            let mut row = NamedRow::default();
            row.insert(VARIABLE_COLUMN.to_string(), Value::Text(local.to_string()));
            row.insert(VALUE_COLUMN.to_string(), Value::Text(text));
            table.insert(&row)?;
        }

        count += 1;
    }

    Ok(count)
}

fn setting_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(string) => string.clone(),
        JsonValue::Number(number) => number.to_string(),
        JsonValue::Bool(boolean) => boolean.to_string(),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => String::new(),
    }
}

/// Reads `database` into a document.
///
/// Players come out sorted by reference and rounds refer to opponents by their
/// position in that order.
///
/// # Errors
///
/// If a table or column is missing, or a round is paired against a reference
/// that is not a player.
pub fn export(database: &Database) -> Result<(Document, Report), ConvertError> {
    check_tables(database)?;
    let mut report = Report::default();

    let info_table = database.table(SETTINGS_TABLE)?;
    let variable = info_table.require_column(VARIABLE_COLUMN)?;
    let value = info_table.require_column(VALUE_COLUMN)?;

    let mut settings = Map::new();
    for row in info_table.rows() {
        let Some(Value::Text(local)) = row.get(variable) else {
            continue;
        };
        if !variables::is_recognized(local) {
            debug!("{SETTINGS_TABLE}: skipping unknown variable {local}");
            continue;
        }
        let (Some(canonical), Some(stored)) = (variables::to_canonical(local), row.get(value))
        else {
            continue;
        };
        if stored.is_null() {
            debug!("{SETTINGS_TABLE}: skipping {local}, it has no value");
            continue;
        }

        settings.insert(canonical.to_string(), JsonValue::String(stored.to_string()));
    }
    report.variables = settings.len();

    let player_table = database.table(PLAYER_TABLE)?;
    let ref_column = player_table.require_column(REF_COLUMN)?;

    let mut rows: Vec<_> = player_table
        .rows()
        .filter_map(|row| {
            row.get(ref_column)
                .and_then(reference::from_value)
                .filter(|reference| *reference > SENTINEL_REF)
                .map(|reference| (reference, row))
        })
        .collect();
    rows.sort_by_key(|(reference, _)| *reference);

    let index = RefIndex::new(rows.iter().map(|(reference, _)| *reference));

    let mut players = Vec::with_capacity(rows.len());
    for (reference, row) in rows {
        players.push(player::export_player(
            player_table,
            row,
            reference,
            &index,
            &mut report,
        )?);
    }
    report.players = players.len();

    info!(
        "exported {} variables and {} players, {} warnings",
        report.variables,
        report.players,
        report.warnings.len()
    );

    let document = Document {
        variables: Some(settings),
        players: Some(players),
    };

    Ok((document, report))
}
