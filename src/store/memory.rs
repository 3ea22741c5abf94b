//! In-memory [`Store`] for driving handlers in tests.
//!
//! Mirrors the constraints the real schema enforces: unique emails and foreign keys.

use std::io;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use entity::{DonationRecord, FoodItem, NewDonation, NewFoodItem, NewUser, User};
use tokio::sync::Mutex;

use super::{DonationFilter, FoodItemFilter, Store, StoreResult};
use crate::pagination::{Listing, Window};

#[derive(Debug, Clone)]
struct StoredDonation {
    donation_id: i64,
    food_id: i64,
    donor_id: i64,
    recipient_id: i64,
    donation_date: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    food_items: Vec<FoodItem>,
    donations: Vec<StoredDonation>,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<Tables>,
    offline: bool,
}

impl MemoryStore {
    /// A store whose every call fails as if the database were unreachable.
    pub(crate) fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline {
            return Err(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(())
    }
}

fn constraint_violation(message: &str) -> sqlx::Error {
    sqlx::Error::Protocol(message.to_owned())
}

fn paginate<T>(rows: Vec<T>, window: Window) -> StoreResult<Listing<T>> {
    let (Ok(skip), Ok(take)) = (
        usize::try_from(window.offset),
        usize::try_from(window.limit),
    ) else {
        return Err(constraint_violation("negative LIMIT or OFFSET"));
    };
    let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);

    Ok(Listing {
        total,
        rows: rows.into_iter().skip(skip).take(take).collect(),
    })
}

fn food_item_matches(item: &FoodItem, filter: &FoodItemFilter) -> bool {
    filter.name.as_ref().map_or(true, |name| item.name.contains(name.as_str()))
        && filter.min_quantity.map_or(true, |min| item.quantity >= min)
        && filter.max_quantity.map_or(true, |max| item.quantity <= max)
        && filter.expiry_date.as_ref().map_or(true, |date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_or(false, |bound| item.expiry_date <= bound)
        })
}

fn donation_matches(donation: &StoredDonation, filter: &DonationFilter) -> bool {
    filter.donor_id.map_or(true, |id| donation.donor_id == id)
        && filter.recipient_id.map_or(true, |id| donation.recipient_id == id)
        && filter.donation_date.as_ref().map_or(true, |date| {
            donation.donation_date.date().format("%Y-%m-%d").to_string() == *date
        })
}

impl Tables {
    fn user_name(&self, user_id: i64) -> Option<&str> {
        self.users
            .iter()
            .find(|user| user.user_id == user_id)
            .map(|user| user.name.as_str())
    }

    fn food_name(&self, food_id: i64) -> Option<&str> {
        self.food_items
            .iter()
            .find(|item| item.food_id == food_id)
            .map(|item| item.name.as_str())
    }

    fn record(&self, donation: &StoredDonation) -> Option<DonationRecord> {
        Some(DonationRecord {
            donation_id: donation.donation_id,
            food_item: self.food_name(donation.food_id)?.to_owned(),
            donor: self.user_name(donation.donor_id)?.to_owned(),
            recipient: self.user_name(donation.recipient_id)?.to_owned(),
            donation_date: donation.donation_date,
        })
    }
}

fn next_id(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX) + 1
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_users(&self, window: Window) -> StoreResult<Listing<User>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        paginate(tables.users.clone(), window)
    }

    async fn list_food_items(
        &self,
        filter: &FoodItemFilter,
        window: Window,
    ) -> StoreResult<Listing<FoodItem>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let matching = tables
            .food_items
            .iter()
            .filter(|item| food_item_matches(item, filter))
            .cloned()
            .collect();
        paginate(matching, window)
    }

    async fn list_donations(
        &self,
        filter: &DonationFilter,
        window: Window,
    ) -> StoreResult<Listing<DonationRecord>> {
        self.check_online()?;
        let tables = self.tables.lock().await;
        let matching = tables
            .donations
            .iter()
            .filter(|donation| donation_matches(donation, filter))
            .filter_map(|donation| tables.record(donation))
            .collect();
        paginate(matching, window)
    }

    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(constraint_violation(&format!(
                "Duplicate entry '{}' for key 'users.email'",
                user.email
            )));
        }

        let user_id = next_id(tables.users.len());
        tables.users.push(User {
            user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.clone(),
        });
        Ok(())
    }

    async fn create_food_item(&self, item: &NewFoodItem) -> StoreResult<()> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        if tables.user_name(item.user_id).is_none() {
            return Err(constraint_violation(
                "Cannot add or update a child row: a foreign key constraint fails (food_items.user_id)",
            ));
        }

        let food_id = next_id(tables.food_items.len());
        tables.food_items.push(FoodItem {
            food_id,
            user_id: item.user_id,
            name: item.name.clone(),
            quantity: item.quantity,
            expiry_date: item.expiry_date,
        });
        Ok(())
    }

    async fn create_donation(&self, donation: &NewDonation) -> StoreResult<()> {
        self.check_online()?;
        let mut tables = self.tables.lock().await;
        let references_exist = tables.food_name(donation.food_id).is_some()
            && tables.user_name(donation.donor_id).is_some()
            && tables.user_name(donation.recipient_id).is_some();
        if !references_exist {
            return Err(constraint_violation(
                "Cannot add or update a child row: a foreign key constraint fails (donations)",
            ));
        }

        let donation_id = next_id(tables.donations.len());
        tables.donations.push(StoredDonation {
            donation_id,
            food_id: donation.food_id,
            donor_id: donation.donor_id,
            recipient_id: donation.recipient_id,
            donation_date: Utc::now().naive_utc(),
        });
        Ok(())
    }
}
