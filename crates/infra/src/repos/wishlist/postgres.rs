use super::IWishlistRepo;
use anyhow::Context;
use gifting_domain::{Wishlist, WishlistItem, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresWishlistRepo {
    pool: PgPool,
}

impl PostgresWishlistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WishlistRaw {
    wishlist_uid: Uuid,
    name: String,
    deadline: i64,
    owner_uid: Uuid,
    owner_name: String,
    code: String,
    items: serde_json::Value,
    subscribers: Vec<Uuid>,
    created: i64,
}

impl TryFrom<WishlistRaw> for Wishlist {
    type Error = anyhow::Error;

    fn try_from(w: WishlistRaw) -> anyhow::Result<Self> {
        let items: Vec<WishlistItem> = serde_json::from_value(w.items)
            .with_context(|| format!("Malformed items of wishlist {}", w.wishlist_uid))?;

        Ok(Wishlist {
            id: w.wishlist_uid.into(),
            name: w.name,
            deadline: w.deadline,
            owner_id: w.owner_uid.into(),
            owner_name: w.owner_name,
            code: w.code,
            items,
            subscribers: w.subscribers.into_iter().map(ID::from).collect(),
            created: w.created,
        })
    }
}

#[async_trait::async_trait]
impl IWishlistRepo for PostgresWishlistRepo {
    async fn insert(&self, w: &Wishlist) -> anyhow::Result<()> {
        let subscribers = w
            .subscribers
            .iter()
            .map(|s| *s.inner_ref())
            .collect::<Vec<_>>();

        sqlx::query(
            r#"
            INSERT INTO wishlists(
                wishlist_uid,
                name,
                deadline,
                owner_uid,
                owner_name,
                code,
                items,
                subscribers,
                created
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(w.id.inner_ref())
        .bind(&w.name)
        .bind(w.deadline)
        .bind(w.owner_id.inner_ref())
        .bind(&w.owner_name)
        .bind(&w.code)
        .bind(Json(&w.items))
        .bind(&subscribers)
        .bind(w.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>> {
        let wishlist = sqlx::query_as::<_, WishlistRaw>(
            "SELECT * FROM wishlists WHERE wishlist_uid = $1",
        )
        .bind(wishlist_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        wishlist.map(Wishlist::try_from).transpose()
    }

    async fn find_by_code(&self, code: &str) -> anyhow::Result<Option<Wishlist>> {
        let wishlist = sqlx::query_as::<_, WishlistRaw>("SELECT * FROM wishlists WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        wishlist.map(Wishlist::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Wishlist>> {
        let wishlists = sqlx::query_as::<_, WishlistRaw>(
            r#"
            SELECT * FROM wishlists
            WHERE owner_uid = $1 OR $1 = ANY(subscribers)
            ORDER BY created DESC
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;
        wishlists.into_iter().map(Wishlist::try_from).collect()
    }

    async fn set_items(&self, wishlist_id: &ID, items: &[WishlistItem]) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE wishlists SET items = $2 WHERE wishlist_uid = $1")
            .bind(wishlist_id.inner_ref())
            .bind(Json(items))
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn add_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE wishlists SET subscribers = array_append(subscribers, $2)
            WHERE wishlist_uid = $1 AND owner_uid <> $2 AND NOT ($2 = ANY(subscribers))
            "#,
        )
        .bind(wishlist_id.inner_ref())
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn remove_subscriber(&self, wishlist_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE wishlists SET subscribers = array_remove(subscribers, $2)
            WHERE wishlist_uid = $1 AND $2 = ANY(subscribers)
            "#,
        )
        .bind(wishlist_id.inner_ref())
        .bind(user_id.inner_ref())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, wishlist_id: &ID) -> anyhow::Result<Option<Wishlist>> {
        let wishlist = sqlx::query_as::<_, WishlistRaw>(
            "DELETE FROM wishlists WHERE wishlist_uid = $1 RETURNING *",
        )
        .bind(wishlist_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;
        wishlist.map(Wishlist::try_from).transpose()
    }
}
