// Database models for Diesel
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use shared_types::{FoodRecord, MealType, UserProfile};
use uuid::Uuid;

/// Database representation of users, including the password hash
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        UserProfile {
            user_id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}

/// Insertable struct for new users
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Database representation of food_records.
/// Soft-deleted rows carry a `deleted_at` timestamp and are never returned.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::food_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FoodRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_items: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FoodRecordRow> for FoodRecord {
    fn from(row: FoodRecordRow) -> Self {
        FoodRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            meal_type: row.meal_type,
            food_items: row.food_items,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for new food records
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::food_records)]
pub struct NewFoodRecord<'a> {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_items: &'a str,
    pub notes: Option<&'a str>,
}
