use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;

/// Parses a `YYYY-MM-DD` date into a UTC timestamp at midnight. Dates are
/// date-only at the API boundary but stored with full precision.
fn parse_posted_at(raw: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        Error::BadRequest("posted_at must be in the format YYYY-MM-DD. Example: 2006-01-02".to_string())
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVacancyPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub posted_at: String,
    #[validate(length(min = 1))]
    pub location: String,
}

impl CreateVacancyPayload {
    pub fn into_entity(self) -> Result<Vacancy> {
        let posted_at = parse_posted_at(&self.posted_at)?;
        Ok(Vacancy::new(
            self.title,
            self.company,
            self.description,
            posted_at,
            self.location,
        ))
    }
}

/// Full update of a vacancy. `version` is the value previously read by the
/// client and is round-tripped for the optimistic concurrency check.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateVacancyPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub company: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub posted_at: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub version: i32,
}

impl UpdateVacancyPayload {
    pub fn into_entity(self, id: i64) -> Result<Vacancy> {
        let posted_at = parse_posted_at(&self.posted_at)?;
        Ok(Vacancy {
            id,
            title: self.title,
            company: self.company,
            description: self.description,
            posted_at,
            location: self.location,
            version: self.version,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyListQuery {
    pub title: Option<String>,
    pub company: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyResponse {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub posted_at: String,
    pub location: String,
    pub version: i32,
}

impl From<Vacancy> for VacancyResponse {
    fn from(vacancy: Vacancy) -> Self {
        Self {
            id: vacancy.id,
            title: vacancy.title,
            company: vacancy.company,
            description: vacancy.description,
            posted_at: vacancy.posted_at.format("%Y-%m-%d").to_string(),
            location: vacancy.location,
            version: vacancy.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacancyListResponse {
    pub items: Vec<VacancyResponse>,
}

impl From<Vec<Vacancy>> for VacancyListResponse {
    fn from(list: Vec<Vacancy>) -> Self {
        Self {
            items: list.into_iter().map(VacancyResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateVacancyPayload {
        CreateVacancyPayload {
            title: "Data Scientist".to_string(),
            company: "AI Corp".to_string(),
            description: "Model training and evaluation.".to_string(),
            posted_at: "2024-05-01".to_string(),
            location: "Remote".to_string(),
        }
    }

    #[test]
    fn create_payload_parses_date_only_posted_at() {
        let vacancy = payload().into_entity().unwrap();
        assert_eq!(vacancy.posted_at.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 00:00:00");
        assert_eq!(vacancy.id, 0);
        assert_eq!(vacancy.version, 0);
    }

    #[test]
    fn malformed_posted_at_is_a_bad_request() {
        let mut bad = payload();
        bad.posted_at = "01.05.2024".to_string();
        assert!(matches!(bad.into_entity(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn empty_title_fails_validation() {
        let mut bad = payload();
        bad.title = String::new();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn update_payload_round_trips_id_and_version() {
        let update = UpdateVacancyPayload {
            title: "Data Scientist".to_string(),
            company: "AI Corp".to_string(),
            description: "Model training and evaluation.".to_string(),
            posted_at: "2024-06-02".to_string(),
            location: "Remote".to_string(),
            version: 4,
        };
        let vacancy = update.into_entity(9).unwrap();
        assert_eq!(vacancy.id, 9);
        assert_eq!(vacancy.version, 4);
    }

    #[test]
    fn response_renders_date_only() {
        let vacancy = payload().into_entity().unwrap();
        let response = VacancyResponse::from(vacancy);
        assert_eq!(response.posted_at, "2024-05-01");
    }
}
