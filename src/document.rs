use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Number, Value};

use crate::store::float_to_int;

/// A tournament as exchanged in JSON.
///
/// ```json
/// {
///   "variables": { "name": "Open de Paris", "rounds": "7" },
///   "players": [
///     { "lastName": "Tal", "elo": 2100, "rounds": { "1": { "color": "B", "opponent": 1, "result": 3 } } },
///     { "lastName": "Petrosian", "elo": 2050 }
///   ]
/// }
/// ```
///
/// A missing `variables` object or `players` array leaves that part of the
/// store alone on import. A `null` player is an empty player.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, Value>>,
    #[serde(
        default,
        deserialize_with = "null_players_as_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub players: Option<Vec<PlayerDocument>>,
}

impl Document {
    /// # Errors
    ///
    /// If the string is not a JSON tournament.
    pub fn from_json(string: &str) -> serde_json::Result<Self> {
        serde_json::from_str(string)
    }

    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One entry of the `players` array.
///
/// The scalar fields are kept as raw JSON, the player mapper decides how each
/// one is stored. Rounds are keyed by their number as a string, `"1"` to `"24"`,
/// and `"rounds": null` is the same as no rounds.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PlayerDocument {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub rounds: Map<String, Value>,
}

/// One round of one player, every field is optional.
///
/// `opponent` and `result` take any integral number, `6.0` included.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Round {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Position of the opponent in the `players` array.
    #[serde(
        default,
        deserialize_with = "integral",
        skip_serializing_if = "Option::is_none"
    )]
    pub opponent: Option<i64>,
    #[serde(
        default,
        deserialize_with = "integral",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<i64>,
}

/// The integer a JSON number holds, `None` if it has a fractional part or
/// doesn't fit an `i64`.
#[must_use]
pub fn as_integral(number: &Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().and_then(float_to_int))
}

fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => as_integral(&number)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, found {number}"))),
        Some(other) => Err(de::Error::custom(format!(
            "expected an integer, found {other}"
        ))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_players_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<PlayerDocument>>, D::Error> {
    let players = Option::<Vec<Option<PlayerDocument>>>::deserialize(deserializer)?;

    Ok(players.map(|players| {
        players
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect()
    }))
}

impl From<Round> for Value {
    fn from(round: Round) -> Self {
        let mut map = Map::new();

        if let Some(color) = round.color {
            map.insert("color".to_string(), Value::String(color));
        }
        if let Some(opponent) = round.opponent {
            map.insert("opponent".to_string(), Value::from(opponent));
        }
        if let Some(result) = round.result {
            map.insert("result".to_string(), Value::from(result));
        }

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rounds_are_split_from_the_fields() -> anyhow::Result<()> {
        let document = Document::from_json(
            r#"{ "players": [ { "lastName": "Tal", "elo": 2100, "rounds": { "2": { "result": 6 } } } ] }"#,
        )?;

        assert_eq!(document.variables, None);
        let players = document.players.unwrap_or_default();
        let player = players.first().cloned().unwrap_or_default();

        assert_eq!(player.fields.get("lastName"), Some(&json!("Tal")));
        assert_eq!(player.fields.get("rounds"), None);
        assert_eq!(player.rounds.get("2"), Some(&json!({ "result": 6 })));

        Ok(())
    }

    #[test]
    fn empty_parts_are_left_out() -> anyhow::Result<()> {
        let round = serde_json::to_value(Round {
            result: Some(3),
            ..Round::default()
        })?;
        assert_eq!(round, json!({ "result": 3 }));

        let round = Value::from(Round {
            color: Some("B".to_string()),
            opponent: Some(4),
            result: None,
        });
        assert_eq!(round, json!({ "color": "B", "opponent": 4 }));

        let player = serde_json::to_value(PlayerDocument::default())?;
        assert_eq!(player, json!({}));

        Ok(())
    }

    #[test]
    fn nulls_are_empty() -> anyhow::Result<()> {
        let document = Document::from_json(
            r#"{ "players": [ { "lastName": "Tal", "rounds": null }, null ] }"#,
        )?;
        let players = document.players.unwrap_or_default();

        assert_eq!(players.len(), 2);
        assert!(players.iter().all(|player| player.rounds.is_empty()));
        assert_eq!(players.get(1), Some(&PlayerDocument::default()));

        let document = Document::from_json(r#"{ "players": null }"#)?;
        assert_eq!(document.players, None);

        Ok(())
    }

    #[test]
    fn integral_floats_are_integers() -> anyhow::Result<()> {
        let round: Round =
            serde_json::from_value(json!({ "opponent": 2.0, "result": 6.0, "color": null }))?;
        assert_eq!(
            round,
            Round {
                color: None,
                opponent: Some(2),
                result: Some(6),
            }
        );

        assert!(serde_json::from_value::<Round>(json!({ "result": 2.5 })).is_err());
        assert!(serde_json::from_value::<Round>(json!({ "result": "win" })).is_err());

        Ok(())
    }
}
