use std::fs;

use papi_converter::{
    assembler::{self, PLAYER_TABLE},
    convert::{convert, json_to_papi, papi_to_json},
    document::Document,
    store::Database,
};
use serde_json::{Value, json};

fn tournament() -> Value {
    json!({
        "variables": {
            "name": "Open de Paris",
            "rounds": "5",
            "arbiter": "Dupont",
            "sponsor": "ACME",
        },
        "players": [
            {
                "lastName": "Tal",
                "firstName": "Mikhail",
                "elo": 2100,
                "birthDate": "09/11/1936",
                "checkedIn": true,
                "paid": 15.5,
                "rounds": {
                    "1": { "color": "B", "opponent": 1, "result": 3 },
                    "2": { "result": 6 },
                },
            },
            {
                "lastName": "Petrosian",
                "elo": 2050,
                "rounds": {
                    "1": { "color": "N", "opponent": 0, "result": 1 },
                },
            },
        ],
    })
}

#[test]
fn json_to_papi_and_back() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("open.json");
    fs::write(&input, serde_json::to_string_pretty(&tournament())?)?;

    let (store, report) = convert(&input, None, None)?;
    assert_eq!(store, dir.path().join("open.papi"));
    assert_eq!(report.variables, 3);
    assert_eq!(report.players, 2);
    assert_eq!(report.warnings.len(), 1);

    let output = dir.path().join("exported").join("open.json");
    let (written, report) = convert(&store, Some(&output), None)?;
    assert_eq!(written, output);
    assert!(report.warnings.is_empty());

    let document: Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(
        document.pointer("/variables"),
        Some(&json!({ "name": "Open de Paris", "rounds": "5", "arbiter": "Dupont" }))
    );
    assert_eq!(document.pointer("/players/0/firstName"), Some(&json!("Mikhail")));
    assert_eq!(document.pointer("/players/0/birthDate"), Some(&json!("09/11/1936")));
    assert_eq!(document.pointer("/players/0/checkedIn"), Some(&json!(true)));
    assert_eq!(document.pointer("/players/0/paid"), Some(&json!(15.5)));
    assert_eq!(
        document.pointer("/players/0/rounds"),
        Some(&json!({
            "1": { "color": "B", "opponent": 1, "result": 3 },
            "2": { "result": 6 },
        }))
    );
    assert_eq!(
        document.pointer("/players/1/rounds"),
        Some(&json!({ "1": { "color": "N", "opponent": 0, "result": 1 } }))
    );

    Ok(())
}

#[test]
fn ron_stores_keep_the_bye() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("open.json");
    let store = dir.path().join("open.ron");
    fs::write(&input, tournament().to_string())?;

    json_to_papi(&input, &store, None)?;
    assert!(fs::read_to_string(&store)?.contains("EXEMPT"));

    let database = Database::load(&store)?;
    let players = database.table(PLAYER_TABLE)?;
    let sentinel = players.rows().next().cloned().unwrap_or_default();
    assert_eq!(
        players.value(&sentinel, "Rd02Adv").map(ToString::to_string),
        Some("2".to_string())
    );

    let output = dir.path().join("open.json");
    papi_to_json(&store, &output)?;
    let document = Document::from_json(&fs::read_to_string(&output)?)?;
    assert_eq!(document.players.as_ref().map(Vec::len), Some(2));

    Ok(())
}

#[test]
fn imports_start_from_the_template() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("template.papi");

    let mut database = assembler::template()?;
    assembler::import(
        &serde_json::from_value(json!({ "variables": { "venue": "Lyon", "rounds": "9" } }))?,
        &mut database,
    )?;
    database.save(&template)?;

    let input = dir.path().join("open.json");
    fs::write(&input, json!({ "variables": { "rounds": "7" } }).to_string())?;
    let store = dir.path().join("open.papi");
    convert(&input, Some(&store), Some(&template))?;

    let (document, _) = assembler::export(&Database::load(&store)?)?;
    assert_eq!(
        document.variables.map(Value::Object),
        Some(json!({ "venue": "Lyon", "rounds": "7" }))
    );

    Ok(())
}

#[test]
fn failed_imports_write_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("open.json");
    fs::write(
        &input,
        json!({ "players": [ { "lastName": "Tal", "rounds": { "1": [3] } } ] }).to_string(),
    )?;

    assert!(convert(&input, None, None).is_err());
    assert!(!dir.path().join("open.papi").exists());

    assert!(convert(&dir.path().join("open.txt"), None, None).is_err());

    Ok(())
}
