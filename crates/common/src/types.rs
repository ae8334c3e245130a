use serde::{Deserialize, Serialize};

/// Per-game box score payload from the live stats API.
///
/// A payload without a `Stats` array is the API's way of saying the game has
/// not been played yet; the fetcher treats it as a miss.
#[derive(Debug, Clone, Deserialize)]
pub struct BoxscoreResponse {
    #[serde(rename = "Stats")]
    pub stats: Option<Vec<TeamBoxscore>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamBoxscore {
    #[serde(rename = "Team")]
    pub team: Option<String>,
    #[serde(rename = "PlayersStats")]
    pub players_stats: Vec<PlayerBoxLine>,
}

/// One player line inside a team box score.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerBoxLine {
    #[serde(rename = "Player_ID")]
    pub player_id: Option<String>,
    #[serde(rename = "Player")]
    pub player: Option<String>,
    #[serde(rename = "Valuation")]
    pub valuation: Option<f64>,
    #[serde(rename = "Points")]
    pub points: Option<f64>,
    #[serde(rename = "TotalRebounds")]
    pub total_rebounds: Option<f64>,
    #[serde(rename = "Assistances")]
    pub assistances: Option<f64>,
    #[serde(rename = "Steals")]
    pub steals: Option<f64>,
    #[serde(rename = "BlocksFavour")]
    pub blocks_favour: Option<f64>,
    #[serde(rename = "Turnovers")]
    pub turnovers: Option<f64>,
    #[serde(rename = "Minutes")]
    pub minutes: Option<String>,
}

/// Player entry from the fantasy market stats endpoint.
///
/// The cost field arrives as either a JSON number or a formatted string
/// depending on the endpoint mood; keep the raw value and coerce later.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketPlayer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub cr: Option<serde_json::Value>,
    pub position: Option<serde_json::Value>,
}

/// Coerce a loosely-typed JSON scalar to f64. Invalid values map to None,
/// mirroring a to-numeric-with-coerce policy.
pub fn coerce_numeric(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Stringify a loosely-typed JSON scalar, dropping nulls.
pub fn coerce_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Injury report row as served upstream. Column names vary between feed
/// revisions; aliases normalize them to one schema.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInjuryRow {
    #[serde(alias = "Player", alias = "PlayerName", alias = "name")]
    pub player: Option<String>,
    #[serde(alias = "Team", alias = "team_name")]
    pub team: Option<String>,
    #[serde(alias = "Position", alias = "pos")]
    pub position: Option<String>,
    #[serde(alias = "Injury", alias = "InjuryDescription", alias = "description")]
    pub injury: Option<String>,
    #[serde(alias = "Status", alias = "InjuryStatus", alias = "injury_status")]
    pub status: Option<String>,
}

/// One player-game line in the stored season table.
///
/// Identity is (game_code, player_id); the merge step deduplicates on it
/// keeping the most recently fetched row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub season: String,
    pub game_code: u32,
    pub team: String,
    pub player_id: String,
    pub player_name: String,
    pub pir: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub minutes: Option<String>,
}

/// One row of a dated cost/position snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub player_name: String,
    pub cr: Option<f64>,
    pub position: String,
}

/// One row of the injury snapshot, normalized. Latest snapshot only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub player: String,
    pub team: String,
    pub position: String,
    pub injury: String,
    pub status: String,
}
