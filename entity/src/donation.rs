use chrono::NaiveDateTime;
use serde::Serialize;

/// A donation joined with the names it refers to, as listed by `GET /donations`.
///
/// This is a projection over `donations`, `food_items` and `users` (twice, once as
/// donor and once as recipient), not a row of a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DonationRecord {
    pub donation_id: i64,
    /// Name of the donated food item.
    pub food_item: String,
    /// Name of the donating user.
    pub donor: String,
    /// Name of the receiving user.
    pub recipient: String,
    /// Set by the database when the donation is logged.
    pub donation_date: NaiveDateTime,
}

/// Column values for a `donations` insert. `donation_date` is left to the database default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDonation {
    pub food_id: i64,
    pub donor_id: i64,
    pub recipient_id: i64,
}
