use crate::data::types::{PredictionPayload, PredictionRequest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required (missing {0})")]
    MissingField(&'static str),

    #[error("Batting and bowling teams must be different")]
    IdenticalTeams,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

/// Presence and team checks only. Range and plausibility checks are left to
/// the engine.
pub fn validate(payload: PredictionPayload) -> Result<PredictionRequest, ValidationError> {
    let batting_team = required_text(payload.batting_team, "battingTeam")?;
    let bowling_team = required_text(payload.bowling_team, "bowlingTeam")?;
    let city = required_text(payload.city, "city")?;
    let target = payload.target.ok_or(ValidationError::MissingField("target"))?;
    let score = payload.score.ok_or(ValidationError::MissingField("score"))?;
    let overs = payload.overs.ok_or(ValidationError::MissingField("overs"))?;
    let wickets = payload.wickets.ok_or(ValidationError::MissingField("wickets"))?;

    if batting_team == bowling_team {
        return Err(ValidationError::IdenticalTeams);
    }

    Ok(PredictionRequest {
        batting_team,
        bowling_team,
        city,
        target,
        score,
        overs,
        wickets,
    })
}

// Empty strings count as missing.
fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> PredictionPayload {
        PredictionPayload {
            batting_team: Some("Mumbai Indians".into()),
            bowling_team: Some("Chennai Super Kings".into()),
            city: Some("Mumbai".into()),
            target: Some(180.0),
            score: Some(90.0),
            overs: Some(10.0),
            wickets: Some(3),
        }
    }

    #[test]
    fn test_complete_payload_passes_verbatim() {
        let request = validate(complete()).unwrap();
        assert_eq!(request.batting_team, "Mumbai Indians");
        assert_eq!(request.city, "Mumbai");
        assert_eq!(request.target, 180.0);
        assert_eq!(request.wickets, 3);
    }

    #[test]
    fn test_zero_values_are_present() {
        let payload = PredictionPayload {
            target: Some(0.0),
            score: Some(0.0),
            overs: Some(0.0),
            wickets: Some(0),
            ..complete()
        };
        assert!(validate(payload).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in ["battingTeam", "bowlingTeam", "city", "target", "score", "overs", "wickets"] {
            let mut payload = complete();
            match field {
                "battingTeam" => payload.batting_team = None,
                "bowlingTeam" => payload.bowling_team = None,
                "city" => payload.city = None,
                "target" => payload.target = None,
                "score" => payload.score = None,
                "overs" => payload.overs = None,
                _ => payload.wickets = None,
            }
            assert_eq!(validate(payload), Err(ValidationError::MissingField(field)));
        }
    }

    #[test]
    fn test_empty_team_name_is_missing() {
        let payload = PredictionPayload {
            batting_team: Some(String::new()),
            ..complete()
        };
        assert_eq!(validate(payload), Err(ValidationError::MissingField("battingTeam")));
    }

    #[test]
    fn test_identical_teams_rejected() {
        let payload = PredictionPayload {
            bowling_team: Some("Mumbai Indians".into()),
            ..complete()
        };
        assert_eq!(validate(payload), Err(ValidationError::IdenticalTeams));
    }

    #[test]
    fn test_team_comparison_is_case_sensitive() {
        let payload = PredictionPayload {
            bowling_team: Some("mumbai indians".into()),
            ..complete()
        };
        assert!(validate(payload).is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_not_checked_here() {
        let payload = PredictionPayload {
            overs: Some(25.0),
            wickets: Some(12),
            ..complete()
        };
        assert!(validate(payload).is_ok());
    }
}
