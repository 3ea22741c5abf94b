//! Database models for the food waste tables.
//!
//! Note that these mirror an externally managed schema and have to be updated by hand.

pub mod donation;
pub mod food_item;
pub mod user;

pub use donation::{DonationRecord, NewDonation};
pub use food_item::{FoodItem, NewFoodItem};
pub use user::{NewUser, User};
