//! SQL text for every statement the service runs.
//!
//! Listing queries are assembled with [`QueryBuilder`] so that each predicate and its bound
//! value are appended together. Count and page queries for the same listing share one
//! predicate function.

use sqlx::{Encode, MySql, QueryBuilder, Type};

use super::{DonationFilter, FoodItemFilter};
use crate::pagination::Window;

pub(crate) const INSERT_USER: &str =
    "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)";
pub(crate) const INSERT_FOOD_ITEM: &str =
    "INSERT INTO food_items (user_id, name, quantity, expiry_date) VALUES (?, ?, ?, ?)";
pub(crate) const INSERT_DONATION: &str =
    "INSERT INTO donations (food_id, donor_id, recipient_id) VALUES (?, ?, ?)";

const SELECT_USERS: &str = "SELECT user_id, name, email, password_hash, role FROM users";
const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

const SELECT_FOOD_ITEMS: &str =
    "SELECT food_id, user_id, name, quantity, expiry_date FROM food_items";
const COUNT_FOOD_ITEMS: &str = "SELECT COUNT(*) FROM food_items";

const SELECT_DONATIONS: &str = "SELECT d.donation_id, f.name AS food_item, \
     donor_user.name AS donor, recipient_user.name AS recipient, d.donation_date";
const COUNT_DONATIONS: &str = "SELECT COUNT(*)";
const DONATION_JOINS: &str = " FROM donations d \
     JOIN food_items f ON d.food_id = f.food_id \
     JOIN users donor_user ON d.donor_id = donor_user.user_id \
     JOIN users recipient_user ON d.recipient_id = recipient_user.user_id";

/// Appends `WHERE` for the first predicate and `AND` for the rest.
struct Predicates<'b, 'args> {
    builder: &'b mut QueryBuilder<'args, MySql>,
    started: bool,
}

impl<'b, 'args> Predicates<'b, 'args> {
    fn new(builder: &'b mut QueryBuilder<'args, MySql>) -> Self {
        Self {
            builder,
            started: false,
        }
    }

    /// `condition` is SQL ending where the bound value goes, e.g. `"quantity >= "`.
    fn push<T>(&mut self, condition: &str, value: T)
    where
        T: 'args + Encode<'args, MySql> + Send + Type<MySql>,
    {
        self.builder
            .push(if self.started { " AND " } else { " WHERE " });
        self.builder.push(condition).push_bind(value);
        self.started = true;
    }
}

fn push_window(builder: &mut QueryBuilder<'_, MySql>, order_by: &str, window: Window) {
    builder
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
}

pub(crate) fn users_count() -> QueryBuilder<'static, MySql> {
    QueryBuilder::new(COUNT_USERS)
}

pub(crate) fn users_page(window: Window) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(SELECT_USERS);
    push_window(&mut builder, "user_id", window);
    builder
}

/// Matches `name` anywhere in the column. `%` and `_` inside `name` keep their `LIKE` meaning.
fn like_pattern(name: &str) -> String {
    format!("%{name}%")
}

fn push_food_item_filter(builder: &mut QueryBuilder<'static, MySql>, filter: &FoodItemFilter) {
    let mut predicates = Predicates::new(builder);
    if let Some(name) = &filter.name {
        predicates.push("name LIKE ", like_pattern(name));
    }
    if let Some(min) = filter.min_quantity {
        predicates.push("quantity >= ", min);
    }
    if let Some(max) = filter.max_quantity {
        predicates.push("quantity <= ", max);
    }
    if let Some(expiry) = &filter.expiry_date {
        predicates.push("expiry_date <= ", expiry.clone());
    }
}

pub(crate) fn food_items_count(filter: &FoodItemFilter) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(COUNT_FOOD_ITEMS);
    push_food_item_filter(&mut builder, filter);
    builder
}

pub(crate) fn food_items_page(
    filter: &FoodItemFilter,
    window: Window,
) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(SELECT_FOOD_ITEMS);
    push_food_item_filter(&mut builder, filter);
    push_window(&mut builder, "food_id", window);
    builder
}

fn push_donation_filter(builder: &mut QueryBuilder<'static, MySql>, filter: &DonationFilter) {
    builder.push(DONATION_JOINS);

    let mut predicates = Predicates::new(builder);
    if let Some(donor_id) = filter.donor_id {
        predicates.push("d.donor_id = ", donor_id);
    }
    if let Some(recipient_id) = filter.recipient_id {
        predicates.push("d.recipient_id = ", recipient_id);
    }
    if let Some(date) = &filter.donation_date {
        predicates.push("DATE(d.donation_date) = ", date.clone());
    }
}

pub(crate) fn donations_count(filter: &DonationFilter) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(COUNT_DONATIONS);
    push_donation_filter(&mut builder, filter);
    builder
}

pub(crate) fn donations_page(
    filter: &DonationFilter,
    window: Window,
) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(SELECT_DONATIONS);
    push_donation_filter(&mut builder, filter);
    push_window(&mut builder, "d.donation_id", window);
    builder
}
