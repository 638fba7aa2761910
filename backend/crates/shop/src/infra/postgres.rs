//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{BookId, OrderId, UserId};
use kernel::pagination::{Page, PageRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::order::{Order, OrderFilter, OrderStatus};
use crate::domain::repository::OrderRepository;

const ORDER_COLUMNS: &str = r#"
    id,
    status,
    payment_intent_id,
    payment_method_id,
    book_id,
    user_id,
    total,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Order Repository Implementation
// ============================================================================

impl OrderRepository for PgOrderRepository {
    async fn save(&self, order: &Order) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id,
                status,
                payment_intent_id,
                payment_method_id,
                book_id,
                user_id,
                total,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.status.code())
        .bind(order.payment_intent_id.as_deref())
        .bind(order.payment_method_id.as_deref())
        .bind(order.book_id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.total)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::duplicate_key("paymentIntentId", "an order already uses this payment intent")
                    .with_source(e)
            } else {
                AppError::from(e)
            }
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .map(OrderRow::into_order)
        .transpose()
    }

    async fn find_by_payment_intent(&self, intent_id: &str) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_intent_id = $1"
        ))
        .bind(intent_id)
        .fetch_optional(&self.pool)
        .await?
        .map(OrderRow::into_order)
        .transpose()
    }

    async fn list(&self, filter: &OrderFilter, page: PageRequest) -> AppResult<Page<Order>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders WHERE TRUE");
        push_filter(&mut count, filter);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"
        ));
        push_filter(&mut select, filter);
        push_page(&mut select, page);

        let orders = select
            .build_query_as::<OrderRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(OrderRow::into_order)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Page::new(page, total.max(0) as u64, orders))
    }

    async fn settle(
        &self,
        id: &OrderId,
        status: OrderStatus,
        payment_method_id: Option<&str>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = $2,
                payment_method_id = COALESCE($3, payment_method_id),
                updated_at = now()
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.code())
        .bind(payment_method_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(user_id.into_uuid());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.code());
    }
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    builder
        .push(" ORDER BY created_at DESC, id ASC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    status: String,
    payment_intent_id: Option<String>,
    payment_method_id: Option<String>,
    book_id: Uuid,
    user_id: Uuid,
    total: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> AppResult<Order> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::internal(format!("corrupt order status: {}", e.cause())))?;

        Ok(Order {
            id: OrderId::from_uuid(self.id),
            status,
            payment_intent_id: self.payment_intent_id,
            payment_method_id: self.payment_method_id,
            book_id: BookId::from_uuid(self.book_id),
            user_id: UserId::from_uuid(self.user_id),
            total: self.total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
