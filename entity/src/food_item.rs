use chrono::NaiveDate;
use serde::Serialize;

/// A row of the `food_items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FoodItem {
    pub food_id: i64,
    /// Owner, references `users.user_id`.
    pub user_id: i64,
    pub name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
}

/// Column values for a `food_items` insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFoodItem {
    pub user_id: i64,
    pub name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_date_serializes_as_calendar_date() {
        let item = FoodItem {
            food_id: 3,
            user_id: 1,
            name: "apples".into(),
            quantity: 6,
            expiry_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["expiry_date"], "2025-01-31");
        assert_eq!(value["quantity"], 6);
    }
}
