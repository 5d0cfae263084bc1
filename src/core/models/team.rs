use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TeamType {
    Transport,
    Expedition,
    Spot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub team_type: TeamType,
    #[serde(default, alias = "leadId")]
    pub lead_id: Option<Uuid>,
}

/// Body for creating or replacing a team
///
/// `type` is kept as a raw string so an unknown value becomes a 400 with a
/// readable message instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamInput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub team_type: String,
    #[serde(default, alias = "leadId")]
    pub lead_id: Option<Uuid>,
}

/// Row written to the `teams` table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTeam {
    pub name: String,
    #[serde(rename = "type")]
    pub team_type: TeamType,
    pub lead_id: Option<Uuid>,
}

impl TeamInput {
    pub fn validate(self) -> Result<NewTeam, AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Team name is required".to_string()));
        }
        let team_type: TeamType =
            serde_json::from_value(serde_json::Value::String(self.team_type.trim().to_lowercase()))
                .map_err(|_| {
                    AppError::BadRequest(format!(
                        "Invalid team type '{}': expected transport, expedition or spot",
                        self.team_type
                    ))
                })?;
        Ok(NewTeam {
            name: name.to_string(),
            team_type,
            lead_id: self.lead_id,
        })
    }
}
