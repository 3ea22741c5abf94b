//! Data access.
//!
//! Handlers only see the [`Store`] trait. [`MySqlStore`] opens one connection per call and
//! closes it before returning.

use async_trait::async_trait;
use entity::{DonationRecord, FoodItem, NewDonation, NewFoodItem, NewUser, User};

use crate::pagination::{Listing, Window};

#[cfg(test)]
pub(crate) mod memory;
pub(crate) mod mysql;
pub(crate) mod query;

pub(crate) use mysql::MySqlStore;

pub(crate) type StoreResult<T> = Result<T, sqlx::Error>;

/// Optional predicates for `GET /food_items`. `None` means the predicate is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FoodItemFilter {
    /// Substring of the item name.
    pub(crate) name: Option<String>,
    pub(crate) min_quantity: Option<i64>,
    pub(crate) max_quantity: Option<i64>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub(crate) expiry_date: Option<String>,
}

/// Optional predicates for `GET /donations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DonationFilter {
    pub(crate) donor_id: Option<i64>,
    pub(crate) recipient_id: Option<i64>,
    /// Calendar day the donation was logged on, `YYYY-MM-DD`.
    pub(crate) donation_date: Option<String>,
}

#[async_trait]
pub(crate) trait Store: Send + Sync {
    async fn list_users(&self, window: Window) -> StoreResult<Listing<User>>;

    async fn list_food_items(
        &self,
        filter: &FoodItemFilter,
        window: Window,
    ) -> StoreResult<Listing<FoodItem>>;

    async fn list_donations(
        &self,
        filter: &DonationFilter,
        window: Window,
    ) -> StoreResult<Listing<DonationRecord>>;

    async fn create_user(&self, user: &NewUser) -> StoreResult<()>;

    async fn create_food_item(&self, item: &NewFoodItem) -> StoreResult<()>;

    async fn create_donation(&self, donation: &NewDonation) -> StoreResult<()>;
}
