use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

mod meal_type;
mod month;

pub use meal_type::{MealType, UnknownMealType};
pub use month::MonthKey;

// ============================================================================
// Users
// ============================================================================

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(email(message = "Email address is invalid"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

// ============================================================================
// Food records
// ============================================================================

/// A dated meal entry owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_items: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both creating and replacing a food record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FoodRecordRequest {
    pub date: NaiveDate,
    pub meal_type: MealType,

    #[validate(length(min = 1, max = 2000, message = "Food description must be 1-2000 characters"))]
    pub food_items: String,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    #[serde(default)]
    pub notes: Option<String>,
}

impl FoodRecordRequest {
    /// Trim free text and collapse blank notes to `None`.
    ///
    /// Validation should run on the normalized request so that a
    /// whitespace-only description is rejected.
    pub fn normalized(mut self) -> Self {
        self.food_items = self.food_items.trim().to_string();
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

impl From<&FoodRecord> for FoodRecordRequest {
    fn from(record: &FoodRecord) -> Self {
        FoodRecordRequest {
            date: record.date,
            meal_type: record.meal_type,
            food_items: record.food_items.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Query parameters for listing food records.
///
/// `date` takes precedence over `month`; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecordQuery {
    pub month: Option<String>,
    pub date: Option<String>,
}

/// Parsed form of [`FoodRecordQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    Month(MonthKey),
    Day(NaiveDate),
}

impl FoodRecordQuery {
    pub fn for_month(month: MonthKey) -> Self {
        FoodRecordQuery {
            month: Some(month.to_string()),
            date: None,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        FoodRecordQuery {
            month: None,
            date: Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    pub fn filter(&self) -> Result<RecordFilter, String> {
        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty()) {
            return NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(RecordFilter::Day)
                .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date));
        }

        if let Some(month) = self.month.as_deref().filter(|m| !m.is_empty()) {
            return MonthKey::parse(month)
                .map(RecordFilter::Month)
                .ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", month));
        }

        Ok(RecordFilter::All)
    }

    /// Key/value pairs suitable for a URL query string.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(month) = &self.month {
            pairs.push(("month", month.clone()));
        }
        if let Some(date) = &self.date {
            pairs.push(("date", date.clone()));
        }
        pairs
    }
}

// ============================================================================
// Misc
// ============================================================================

/// API error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_request(food_items: &str, notes: Option<&str>) -> FoodRecordRequest {
        FoodRecordRequest {
            date: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            meal_type: MealType::Lunch,
            food_items: food_items.to_string(),
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "12345".to_string(),
            ..valid.clone()
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_normalized_trims_and_drops_blank_notes() {
        let request = record_request("  rice and beans \n", Some("   ")).normalized();
        assert_eq!(request.food_items, "rice and beans");
        assert_eq!(request.notes, None);

        let request = record_request("soup", Some(" spicy ")).normalized();
        assert_eq!(request.notes.as_deref(), Some("spicy"));
    }

    #[test]
    fn test_whitespace_only_food_items_rejected_after_normalizing() {
        let request = record_request("   ", None).normalized();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("food_items"));
    }

    #[test]
    fn test_food_record_request_wire_format() {
        let json = r#"{"date":"2024-05-17","meal_type":"lunch","food_items":"noodles"}"#;
        let request: FoodRecordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request, record_request("noodles", None));

        let bad = r#"{"date":"2024-02-30","meal_type":"lunch","food_items":"noodles"}"#;
        assert!(serde_json::from_str::<FoodRecordRequest>(bad).is_err());
    }

    #[test]
    fn test_query_filter_precedence() {
        let query = FoodRecordQuery {
            month: Some("2024-05".to_string()),
            date: Some("2024-06-01".to_string()),
        };
        assert_eq!(
            query.filter(),
            Ok(RecordFilter::Day(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );

        let query = FoodRecordQuery {
            month: Some("2024-05".to_string()),
            date: Some(String::new()),
        };
        assert_eq!(
            query.filter(),
            Ok(RecordFilter::Month(MonthKey::new(2024, 5).unwrap()))
        );

        assert_eq!(FoodRecordQuery::default().filter(), Ok(RecordFilter::All));
    }

    #[test]
    fn test_query_filter_rejects_malformed_values() {
        let query = FoodRecordQuery {
            month: Some("May 2024".to_string()),
            date: None,
        };
        assert!(query.filter().is_err());

        let query = FoodRecordQuery {
            month: None,
            date: Some("2024-13-01".to_string()),
        };
        assert!(query.filter().is_err());
    }

    #[test]
    fn test_query_pairs() {
        let month = MonthKey::new(2024, 7).unwrap();
        assert_eq!(
            FoodRecordQuery::for_month(month).to_pairs(),
            vec![("month", "2024-07".to_string())]
        );
    }
}
