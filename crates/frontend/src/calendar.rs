//! Month calendar view-model.
//!
//! Pure date arithmetic: given a month, today's date, the selected date and
//! the records loaded for that month, produce the 6×7 grid the dashboard
//! renders. Weeks start on Sunday.

use chrono::{Datelike, Duration, Local, NaiveDate};
use shared_types::{FoodRecord, MonthKey};
use std::collections::BTreeMap;

pub const WEEKS: usize = 6;
pub const DAYS_PER_WEEK: usize = 7;

/// Meal dots drawn per day before collapsing the rest into "+N".
pub const MAX_INDICATORS: usize = 3;

pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub records: Vec<FoodRecord>,
}

impl CalendarDay {
    /// Records shown as coloured dots.
    pub fn indicators(&self) -> &[FoodRecord] {
        &self.records[..self.records.len().min(MAX_INDICATORS)]
    }

    /// Number of records hidden behind the "+N" marker.
    pub fn overflow(&self) -> usize {
        self.records.len().saturating_sub(MAX_INDICATORS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: MonthKey,
    pub weeks: Vec<Vec<CalendarDay>>,
}

/// The Sunday on or before the first day of `month`.
pub fn grid_start(month: MonthKey) -> NaiveDate {
    let first = month.first_day();
    first - Duration::days(i64::from(first.weekday().num_days_from_sunday()))
}

impl MonthGrid {
    pub fn build(
        month: MonthKey,
        today: NaiveDate,
        selected: NaiveDate,
        records: &[FoodRecord],
    ) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<FoodRecord>> = BTreeMap::new();
        for record in records {
            by_date.entry(record.date).or_default().push(record.clone());
        }

        let mut current = grid_start(month);
        let mut weeks = Vec::with_capacity(WEEKS);
        for _ in 0..WEEKS {
            let mut week = Vec::with_capacity(DAYS_PER_WEEK);
            for _ in 0..DAYS_PER_WEEK {
                week.push(CalendarDay {
                    date: current,
                    in_current_month: month.contains(current),
                    is_today: current == today,
                    is_selected: current == selected,
                    records: by_date.remove(&current).unwrap_or_default(),
                });
                current += Duration::days(1);
            }
            weeks.push(week);
        }

        MonthGrid { month, weeks }
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }
}

/// Today in the browser's time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Records dated `date`, in the order they were loaded.
pub fn records_for_date(records: &[FoodRecord], date: NaiveDate) -> Vec<FoodRecord> {
    records.iter().filter(|r| r.date == date).cloned().collect()
}

/// Heading such as "May 2024".
pub fn month_title(month: MonthKey) -> String {
    format!("{} {}", MONTH_NAMES[month.month() as usize - 1], month.year())
}

/// Long date such as "Friday, May 17, 2024".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Utc, Weekday};
    use shared_types::MealType;
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: NaiveDate, meal_type: MealType) -> FoodRecord {
        FoodRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date,
            meal_type,
            food_items: "toast".to_string(),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_grid_is_six_by_seven_and_contiguous() {
        let month = MonthKey::new(2024, 5).unwrap();
        let grid = MonthGrid::build(month, ymd(2024, 5, 17), ymd(2024, 5, 17), &[]);

        assert_eq!(grid.weeks.len(), WEEKS);
        assert!(grid.weeks.iter().all(|w| w.len() == DAYS_PER_WEEK));

        let days: Vec<_> = grid.days().map(|d| d.date).collect();
        assert!(days.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
    }

    #[test]
    fn test_grid_starts_on_sunday_before_first() {
        // May 1st 2024 is a Wednesday.
        let month = MonthKey::new(2024, 5).unwrap();
        let grid = MonthGrid::build(month, ymd(2024, 5, 1), ymd(2024, 5, 1), &[]);

        let first_cell = &grid.weeks[0][0];
        assert_eq!(first_cell.date, ymd(2024, 4, 28));
        assert_eq!(first_cell.date.weekday(), Weekday::Sun);
        assert!(!first_cell.in_current_month);
        assert!(grid.weeks[0][3].in_current_month);
    }

    #[test]
    fn test_month_starting_on_sunday_begins_with_the_first() {
        // September 1st 2024 is a Sunday.
        let month = MonthKey::new(2024, 9).unwrap();
        assert_eq!(grid_start(month), ymd(2024, 9, 1));
    }

    #[test]
    fn test_current_month_flags_cover_every_day() {
        let month = MonthKey::new(2024, 2).unwrap();
        let grid = MonthGrid::build(month, ymd(2024, 2, 10), ymd(2024, 2, 10), &[]);

        let in_month = grid.days().filter(|d| d.in_current_month).count();
        assert_eq!(in_month as u32, month.days_in_month());
    }

    #[test]
    fn test_today_and_selected_flags() {
        let month = MonthKey::new(2024, 5).unwrap();
        let grid = MonthGrid::build(month, ymd(2024, 5, 17), ymd(2024, 5, 3), &[]);

        let today: Vec<_> = grid.days().filter(|d| d.is_today).map(|d| d.date).collect();
        let selected: Vec<_> = grid.days().filter(|d| d.is_selected).map(|d| d.date).collect();
        assert_eq!(today, vec![ymd(2024, 5, 17)]);
        assert_eq!(selected, vec![ymd(2024, 5, 3)]);
    }

    #[test]
    fn test_records_attached_to_their_day() {
        let month = MonthKey::new(2024, 5).unwrap();
        let records = vec![
            record(ymd(2024, 5, 17), MealType::Breakfast),
            record(ymd(2024, 5, 17), MealType::Lunch),
            record(ymd(2024, 5, 17), MealType::Dinner),
            record(ymd(2024, 5, 17), MealType::Snack),
            record(ymd(2024, 5, 18), MealType::Lunch),
        ];
        let grid = MonthGrid::build(month, ymd(2024, 5, 1), ymd(2024, 5, 1), &records);

        let day = grid.days().find(|d| d.date == ymd(2024, 5, 17)).unwrap();
        assert_eq!(day.records.len(), 4);
        assert_eq!(day.indicators().len(), MAX_INDICATORS);
        assert_eq!(day.overflow(), 1);

        let next = grid.days().find(|d| d.date == ymd(2024, 5, 18)).unwrap();
        assert_eq!(next.indicators().len(), 1);
        assert_eq!(next.overflow(), 0);
    }

    #[test]
    fn test_records_for_date_filters() {
        let records = vec![
            record(ymd(2024, 5, 17), MealType::Breakfast),
            record(ymd(2024, 5, 18), MealType::Lunch),
        ];
        let found = records_for_date(&records, ymd(2024, 5, 18));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].meal_type, MealType::Lunch);
        assert!(records_for_date(&records, ymd(2024, 5, 19)).is_empty());
    }

    #[test]
    fn test_titles() {
        assert_eq!(month_title(MonthKey::new(2024, 12).unwrap()), "December 2024");
        assert_eq!(long_date(ymd(2024, 5, 7)), "Tuesday, May 7, 2024");
    }
}
