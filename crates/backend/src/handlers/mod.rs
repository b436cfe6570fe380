pub mod food_records;
pub mod health;
