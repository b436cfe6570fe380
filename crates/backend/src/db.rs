use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection, RunQueryDsl,
};
use shared_types::{FoodRecord, FoodRecordRequest, RecordFilter};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{FoodRecordRow, NewFoodRecord, NewUser, UserRow};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection =
    diesel_async::pooled_connection::deadpool::Object<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Verify the server against the webpki (Mozilla) root set
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    AsyncPgConnection::try_from(client).await
}

/// Build the connection pool. No connection is opened until first use.
pub fn establish_connection_pool(config: &AppConfig) -> anyhow::Result<DbPool> {
    let manager = if config.database_tls {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup =
            Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            &config.database_url,
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url)
    };

    let pool = Pool::builder(manager).max_size(10).build()?;

    Ok(pool)
}

pub async fn get_conn(pool: &DbPool) -> Result<DbConnection, crate::error::ApiError> {
    Ok(pool.get().await?)
}

// User database operations
pub mod users {
    use super::*;

    pub async fn get_by_id(
        conn: &mut AsyncPgConnection,
        user_id: Uuid,
    ) -> anyhow::Result<Option<UserRow>> {
        use crate::schema::users::dsl::*;

        let user = users
            .filter(id.eq(user_id))
            .select(UserRow::as_select())
            .first(conn)
            .await
            .optional()?;

        Ok(user)
    }

    pub async fn get_by_username(
        conn: &mut AsyncPgConnection,
        name: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        use crate::schema::users::dsl::*;

        let user = users
            .filter(username.eq(name))
            .select(UserRow::as_select())
            .first(conn)
            .await
            .optional()?;

        Ok(user)
    }

    pub async fn username_exists(conn: &mut AsyncPgConnection, name: &str) -> QueryResult<bool> {
        use crate::schema::users::dsl::*;

        diesel::select(diesel::dsl::exists(users.filter(username.eq(name))))
            .get_result(conn)
            .await
    }

    pub async fn email_exists(conn: &mut AsyncPgConnection, address: &str) -> QueryResult<bool> {
        use crate::schema::users::dsl::*;

        diesel::select(diesel::dsl::exists(users.filter(email.eq(address))))
            .get_result(conn)
            .await
    }

    pub async fn create(conn: &mut AsyncPgConnection, new_user: NewUser<'_>) -> QueryResult<UserRow> {
        use crate::schema::users::dsl::*;

        diesel::insert_into(users)
            .values(&new_user)
            .returning(UserRow::as_returning())
            .get_result(conn)
            .await
    }
}

// Food record database operations
pub mod food_records {
    use super::*;
    use crate::schema::food_records as records;
    use diesel::dsl::{AsSelect, Eq, Filter, IsNull};
    use diesel::pg::Pg;

    type ListQuery = records::BoxedQuery<'static, Pg, AsSelect<FoodRecordRow, Pg>>;

    /// A single live record, matched only for its owner.
    type OwnedLive = Filter<
        Filter<Filter<records::table, Eq<records::id, Uuid>>, Eq<records::user_id, Uuid>>,
        IsNull<records::deleted_at>,
    >;

    fn list_query(owner: Uuid, filter: RecordFilter) -> ListQuery {
        use crate::schema::food_records::dsl::*;

        let mut query = food_records
            .filter(user_id.eq(owner))
            .filter(deleted_at.is_null())
            .select(FoodRecordRow::as_select())
            .order_by((date.desc(), created_at.desc()))
            .into_boxed();

        match filter {
            RecordFilter::All => {}
            RecordFilter::Day(day) => {
                query = query.filter(date.eq(day));
            }
            RecordFilter::Month(month) => {
                // Half-open so the last day of the month is included exactly once.
                let (start, end) = month.date_range();
                query = query.filter(date.ge(start)).filter(date.lt(end));
            }
        }

        query
    }

    fn owned_live(owner: Uuid, record_id: Uuid) -> OwnedLive {
        records::table
            .filter(records::id.eq(record_id))
            .filter(records::user_id.eq(owner))
            .filter(records::deleted_at.is_null())
    }

    /// List a user's live records, newest date first.
    pub async fn list_for_user(
        conn: &mut AsyncPgConnection,
        owner: Uuid,
        filter: RecordFilter,
    ) -> anyhow::Result<Vec<FoodRecord>> {
        let rows = list_query(owner, filter).load(conn).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        owner: Uuid,
        request: &FoodRecordRequest,
    ) -> anyhow::Result<FoodRecord> {
        use crate::schema::food_records::dsl::*;

        let row = diesel::insert_into(food_records)
            .values(NewFoodRecord {
                user_id: owner,
                date: request.date,
                meal_type: request.meal_type,
                food_items: &request.food_items,
                notes: request.notes.as_deref(),
            })
            .returning(FoodRecordRow::as_returning())
            .get_result(conn)
            .await?;

        Ok(row.into())
    }

    /// Replace the editable fields of a record owned by `owner`.
    ///
    /// Returns `None` when no live record with that id belongs to the user.
    pub async fn update(
        conn: &mut AsyncPgConnection,
        owner: Uuid,
        record_id: Uuid,
        request: &FoodRecordRequest,
    ) -> anyhow::Result<Option<FoodRecord>> {
        use crate::schema::food_records::dsl::*;

        let row = diesel::update(owned_live(owner, record_id))
            .set((
                date.eq(request.date),
                meal_type.eq(request.meal_type),
                food_items.eq(&request.food_items),
                notes.eq(request.notes.as_deref()),
                updated_at.eq(Utc::now()),
            ))
            .returning(FoodRecordRow::as_returning())
            .get_result(conn)
            .await
            .optional()?;

        Ok(row.map(Into::into))
    }

    /// Soft-delete a record owned by `owner`. Returns false if nothing matched.
    pub async fn delete(
        conn: &mut AsyncPgConnection,
        owner: Uuid,
        record_id: Uuid,
    ) -> anyhow::Result<bool> {
        use crate::schema::food_records::dsl::*;

        let affected = diesel::update(owned_live(owner, record_id))
            .set(deleted_at.eq(Some(Utc::now())))
            .execute(conn)
            .await?;

        Ok(affected > 0)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use diesel::debug_query;
        use shared_types::MonthKey;

        fn sql_of<T: diesel::query_builder::QueryFragment<Pg>>(query: &T) -> String {
            debug_query::<Pg, _>(query).to_string()
        }

        #[test]
        fn test_list_scoped_to_owner_and_live_rows() {
            let owner = Uuid::new_v4();
            let sql = sql_of(&list_query(owner, RecordFilter::All));

            assert!(sql.contains(r#""food_records"."user_id" = $1"#), "{}", sql);
            assert!(sql.contains(r#""food_records"."deleted_at" IS NULL"#), "{}", sql);
            assert!(sql.contains(&owner.to_string()), "{}", sql);
        }

        #[test]
        fn test_list_newest_date_then_newest_entry_first() {
            let sql = sql_of(&list_query(Uuid::new_v4(), RecordFilter::All));
            assert!(
                sql.contains(
                    r#"ORDER BY "food_records"."date" DESC, "food_records"."created_at" DESC"#
                ),
                "{}",
                sql
            );
        }

        #[test]
        fn test_month_filter_is_half_open() {
            let month = MonthKey::new(2024, 2).unwrap();
            let sql = sql_of(&list_query(Uuid::new_v4(), RecordFilter::Month(month)));

            assert!(sql.contains(r#""food_records"."date" >= $"#), "{}", sql);
            assert!(sql.contains(r#""food_records"."date" < $"#), "{}", sql);
            assert!(!sql.contains(r#""food_records"."date" <= $"#), "{}", sql);
            // Binds are the first of the month and the first of the next one.
            assert!(sql.contains("2024-02-01"), "{}", sql);
            assert!(sql.contains("2024-03-01"), "{}", sql);
            assert!(!sql.contains("2024-02-29"), "{}", sql);
        }

        #[test]
        fn test_day_filter_matches_one_date() {
            let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
            let sql = sql_of(&list_query(Uuid::new_v4(), RecordFilter::Day(day)));

            assert!(sql.contains(r#""food_records"."date" = $"#), "{}", sql);
            assert!(sql.contains("2024-05-17"), "{}", sql);
        }

        #[test]
        fn test_update_and_delete_scoped_to_owner_and_live_rows() {
            use crate::schema::food_records::dsl::*;

            let owner = Uuid::new_v4();
            let record = Uuid::new_v4();

            let update = diesel::update(owned_live(owner, record)).set(food_items.eq("Soup"));
            let delete =
                diesel::update(owned_live(owner, record)).set(deleted_at.eq(Some(Utc::now())));

            for sql in [sql_of(&update), sql_of(&delete)] {
                assert!(sql.starts_with(r#"UPDATE "food_records""#), "{}", sql);
                assert!(sql.contains(r#""food_records"."id" = $"#), "{}", sql);
                assert!(sql.contains(r#""food_records"."user_id" = $"#), "{}", sql);
                assert!(sql.contains(r#""food_records"."deleted_at" IS NULL"#), "{}", sql);
                assert!(sql.contains(&owner.to_string()), "{}", sql);
                assert!(sql.contains(&record.to_string()), "{}", sql);
            }
        }
    }
}

/// Round trips against a real database. Needs `DATABASE_URL` pointing at a
/// migrated Postgres; run with `cargo test -- --ignored`.
#[cfg(test)]
mod pg_tests {
    use super::*;
    use diesel_async::AsyncConnection;
    use shared_types::MealType;

    async fn connect() -> AsyncPgConnection {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        AsyncPgConnection::establish(&url)
            .await
            .expect("database should be reachable")
    }

    async fn make_user(conn: &mut AsyncPgConnection) -> UserRow {
        let tag = Uuid::new_v4().simple().to_string();
        let username = format!("u{}", &tag[..12]);
        let email = format!("{}@example.com", username);
        users::create(
            conn,
            NewUser {
                username: &username,
                email: &email,
                password_hash: "not-a-real-hash",
            },
        )
        .await
        .expect("user insert")
    }

    fn request(day: u32, items: &str) -> FoodRecordRequest {
        FoodRecordRequest {
            date: chrono::NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            meal_type: MealType::Lunch,
            food_items: items.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_other_users_record_is_invisible() {
        let mut conn = connect().await;
        let alice = make_user(&mut conn).await;
        let mallory = make_user(&mut conn).await;

        let record = food_records::create(&mut conn, alice.id, &request(10, "Soup"))
            .await
            .unwrap();

        let updated = food_records::update(&mut conn, mallory.id, record.id, &request(11, "Mine"))
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!food_records::delete(&mut conn, mallory.id, record.id)
            .await
            .unwrap());
        assert!(
            food_records::list_for_user(&mut conn, mallory.id, RecordFilter::All)
                .await
                .unwrap()
                .is_empty()
        );

        let listed = food_records::list_for_user(&mut conn, alice.id, RecordFilter::All)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].food_items, "Soup");
    }

    #[tokio::test]
    #[ignore]
    async fn test_delete_twice_misses_second_time() {
        let mut conn = connect().await;
        let alice = make_user(&mut conn).await;
        let record = food_records::create(&mut conn, alice.id, &request(12, "Toast"))
            .await
            .unwrap();

        assert!(food_records::delete(&mut conn, alice.id, record.id)
            .await
            .unwrap());
        assert!(!food_records::delete(&mut conn, alice.id, record.id)
            .await
            .unwrap());
        assert!(
            food_records::update(&mut conn, alice.id, record.id, &request(12, "Again"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            food_records::list_for_user(&mut conn, alice.id, RecordFilter::All)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    #[ignore]
    async fn test_month_listing_order_and_bounds() {
        let mut conn = connect().await;
        let alice = make_user(&mut conn).await;

        for (day, items) in [(1, "First"), (29, "Leap"), (29, "Leap later"), (15, "Middle")] {
            food_records::create(&mut conn, alice.id, &request(day, items))
                .await
                .unwrap();
        }
        let march = FoodRecordRequest {
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ..request(1, "March")
        };
        food_records::create(&mut conn, alice.id, &march).await.unwrap();

        let month = shared_types::MonthKey::new(2024, 2).unwrap();
        let listed = food_records::list_for_user(&mut conn, alice.id, RecordFilter::Month(month))
            .await
            .unwrap();
        let items: Vec<&str> = listed.iter().map(|r| r.food_items.as_str()).collect();

        assert_eq!(items, ["Leap later", "Leap", "Middle", "First"]);
    }
}
