use async_trait::async_trait;
use entity::{DonationRecord, FoodItem, NewDonation, NewFoodItem, NewUser, User};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlRow},
    Connection, FromRow, MySql, MySqlConnection, QueryBuilder,
};

use super::{query, DonationFilter, FoodItemFilter, Store, StoreResult};
use crate::pagination::{Listing, Window};

/// A [`Store`] backed by MySQL.
///
/// There is no pool: every call connects, runs its statements and closes the connection
/// whether or not they succeeded.
pub(crate) struct MySqlStore {
    options: MySqlConnectOptions,
}

impl MySqlStore {
    pub(crate) fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }

    async fn connect(&self) -> StoreResult<MySqlConnection> {
        MySqlConnection::connect_with(&self.options).await
    }
}

/// Closes `conn`. A failed close is logged and otherwise ignored, the statement result stands.
async fn release(conn: MySqlConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("failed to close database connection: {e}");
    }
}

async fn fetch_listing<T>(
    conn: &mut MySqlConnection,
    mut count: QueryBuilder<'_, MySql>,
    mut page: QueryBuilder<'_, MySql>,
) -> StoreResult<Listing<T>>
where
    T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
{
    let total: i64 = count.build_query_scalar().fetch_one(&mut *conn).await?;
    let rows = page.build_query_as::<T>().fetch_all(&mut *conn).await?;

    Ok(Listing { total, rows })
}

#[async_trait]
impl Store for MySqlStore {
    async fn list_users(&self, window: Window) -> StoreResult<Listing<User>> {
        let mut conn = self.connect().await?;
        let listing =
            fetch_listing(&mut conn, query::users_count(), query::users_page(window)).await;
        release(conn).await;
        listing
    }

    async fn list_food_items(
        &self,
        filter: &FoodItemFilter,
        window: Window,
    ) -> StoreResult<Listing<FoodItem>> {
        let mut conn = self.connect().await?;
        let listing = fetch_listing(
            &mut conn,
            query::food_items_count(filter),
            query::food_items_page(filter, window),
        )
        .await;
        release(conn).await;
        listing
    }

    async fn list_donations(
        &self,
        filter: &DonationFilter,
        window: Window,
    ) -> StoreResult<Listing<DonationRecord>> {
        let mut conn = self.connect().await?;
        let listing = fetch_listing(
            &mut conn,
            query::donations_count(filter),
            query::donations_page(filter, window),
        )
        .await;
        release(conn).await;
        listing
    }

    async fn create_user(&self, user: &NewUser) -> StoreResult<()> {
        let mut conn = self.connect().await?;
        let inserted = sqlx::query(query::INSERT_USER)
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password_hash.as_str())
            .bind(user.role.as_str())
            .execute(&mut conn)
            .await;
        release(conn).await;
        inserted.map(drop)
    }

    async fn create_food_item(&self, item: &NewFoodItem) -> StoreResult<()> {
        let mut conn = self.connect().await?;
        let inserted = sqlx::query(query::INSERT_FOOD_ITEM)
            .bind(item.user_id)
            .bind(item.name.as_str())
            .bind(item.quantity)
            .bind(item.expiry_date)
            .execute(&mut conn)
            .await;
        release(conn).await;
        inserted.map(drop)
    }

    async fn create_donation(&self, donation: &NewDonation) -> StoreResult<()> {
        let mut conn = self.connect().await?;
        let inserted = sqlx::query(query::INSERT_DONATION)
            .bind(donation.food_id)
            .bind(donation.donor_id)
            .bind(donation.recipient_id)
            .execute(&mut conn)
            .await;
        release(conn).await;
        inserted.map(drop)
    }
}
