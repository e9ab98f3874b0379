//! SeaORM adapter for payment records.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::payments::{self, PaymentMethod, PaymentStatus};

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub operator_id: i64,
    pub game_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
}

impl PaymentCreate {
    pub fn new(operator_id: i64, amount: f64, method: PaymentMethod) -> Self {
        Self {
            operator_id,
            game_id: None,
            amount,
            method,
        }
    }

    pub fn for_game(mut self, game_id: i64) -> Self {
        self.game_id = Some(game_id);
        self
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
) -> Result<Option<payments::Model>, sea_orm::DbErr> {
    payments::Entity::find_by_id(payment_id).one(conn).await
}

/// New payments always start out `PENDING`.
pub async fn create_payment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PaymentCreate,
) -> Result<payments::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    payments::ActiveModel {
        id: NotSet,
        operator_id: Set(dto.operator_id),
        game_id: Set(dto.game_id),
        amount: Set(dto.amount),
        method: Set(dto.method),
        status: Set(PaymentStatus::Pending),
        paid_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

/// Set `status`; `paid_at` is replaced only when `paid_at` is `Some`.
pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
    status: PaymentStatus,
    paid_at: Option<OffsetDateTime>,
) -> Result<payments::Model, sea_orm::DbErr> {
    let mut payment: payments::ActiveModel = payments::Entity::find_by_id(payment_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Payment not found".to_string()))?
        .into();
    payment.status = Set(status);
    if let Some(at) = paid_at {
        payment.paid_at = Set(Some(at));
    }
    payment.updated_at = Set(OffsetDateTime::now_utc());
    payment.update(conn).await
}

/// One page of all payments, newest first.
pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<payments::Model>, u64), sea_orm::DbErr> {
    let total = payments::Entity::find().count(conn).await?;
    let rows = payments::Entity::find()
        .order_by_desc(payments::Column::CreatedAt)
        .order_by_desc(payments::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn list_for_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Vec<payments::Model>, sea_orm::DbErr> {
    payments::Entity::find()
        .filter(payments::Column::OperatorId.eq(operator_id))
        .order_by_desc(payments::Column::CreatedAt)
        .order_by_desc(payments::Column::Id)
        .all(conn)
        .await
}

/// `(all, settled)` payment counts.
pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), sea_orm::DbErr> {
    let total = payments::Entity::find().count(conn).await?;
    let settled = payments::Entity::find()
        .filter(
            payments::Column::Status.is_in([PaymentStatus::Confirmed, PaymentStatus::Received]),
        )
        .count(conn)
        .await?;
    Ok((total, settled))
}
