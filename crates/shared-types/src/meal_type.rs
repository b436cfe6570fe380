//! Meal categories a food record can belong to.
//!
//! Stored as lowercase VARCHAR in the database and serialized the same way
//! on the wire, so `"breakfast"` round-trips unchanged between client,
//! server and storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "diesel", derive(diesel::AsExpression, diesel::FromSqlRow))]
#[cfg_attr(feature = "diesel", diesel(sql_type = diesel::sql_types::Text))]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All variants in the order they are offered in forms.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Human readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }

    /// Indicator colour used for calendar dots and record icons.
    pub fn color(&self) -> &'static str {
        match self {
            MealType::Breakfast => "#ff9500",
            MealType::Lunch => "#007aff",
            MealType::Dinner => "#5856d6",
            MealType::Snack => "#ff3b30",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known meal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMealType(pub String);

impl fmt::Display for UnknownMealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown meal type: {}", self.0)
    }
}

impl std::error::Error for UnknownMealType {}

impl FromStr for MealType {
    type Err = UnknownMealType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(UnknownMealType(other.to_string())),
        }
    }
}

// Diesel integration for MealType

#[cfg(feature = "diesel")]
mod sql {
    use super::MealType;
    use diesel::deserialize::FromSql;
    use diesel::pg::{Pg, PgValue};
    use diesel::serialize::{IsNull, Output, ToSql};
    use diesel::sql_types::Text;
    use std::io::Write;

    impl FromSql<Text, Pg> for MealType {
        fn from_sql(bytes: PgValue<'_>) -> diesel::deserialize::Result<Self> {
            let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
            s.parse::<MealType>()
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }
    }

    impl ToSql<Text, Pg> for MealType {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> diesel::serialize::Result {
            out.write_all(self.as_str().as_bytes())?;
            Ok(IsNull::No)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_meal_types() {
        for meal in MealType::ALL {
            assert_eq!(meal.as_str().parse::<MealType>(), Ok(meal));
        }
    }

    #[test]
    fn test_parse_unknown_meal_type() {
        let err = "brunch".parse::<MealType>().unwrap_err();
        assert_eq!(err, UnknownMealType("brunch".to_string()));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&MealType::Dinner).unwrap();
        assert_eq!(json, r#""dinner""#);

        let parsed: MealType = serde_json::from_str(r#""snack""#).unwrap();
        assert_eq!(parsed, MealType::Snack);
    }

    #[test]
    fn test_default_is_breakfast() {
        assert_eq!(MealType::default(), MealType::Breakfast);
    }

    #[test]
    fn test_each_meal_has_distinct_color() {
        let mut colors: Vec<_> = MealType::ALL.iter().map(|m| m.color()).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), 4);
    }
}
