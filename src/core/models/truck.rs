use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Truck {
    pub id: Uuid,
    pub plate: String,
    pub team: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TruckInput {
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub team: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTruck {
    pub plate: String,
    pub team: Uuid,
}

impl TruckInput {
    /// Plates are stored upper-cased without surrounding whitespace so the
    /// database uniqueness constraint sees one spelling per vehicle.
    pub fn validate(self) -> Result<NewTruck, AppError> {
        let plate = self.plate.trim().to_uppercase();
        if plate.is_empty() {
            return Err(AppError::BadRequest("Truck plate is required".to_string()));
        }
        let team = self
            .team
            .ok_or_else(|| AppError::BadRequest("Truck team is required".to_string()))?;
        Ok(NewTruck { plate, team })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_is_normalized() {
        let truck = TruckInput {
            plate: " ab 123 cd ".into(),
            team: Some(Uuid::new_v4()),
        }
        .validate()
        .unwrap();
        assert_eq!(truck.plate, "AB 123 CD");
    }

    #[test]
    fn test_team_is_required() {
        let result = TruckInput {
            plate: "AB123".into(),
            team: None,
        }
        .validate();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
