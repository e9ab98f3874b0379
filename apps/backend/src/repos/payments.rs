//! Payment repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::payments_sea as payments_adapter;
use crate::entities::payments::{self, PaymentMethod, PaymentStatus};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub operator_id: i64,
    pub game_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            operator_id: model.operator_id,
            game_id: model.game_id,
            amount: model.amount,
            method: model.method,
            status: model.status,
            paid_at: model.paid_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn require_payment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
) -> Result<Payment, DomainError> {
    payments_adapter::find_by_id(conn, payment_id)
        .await?
        .map(Payment::from)
        .ok_or_else(|| DomainError::payment_not_found(payment_id))
}

pub async fn create_payment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: payments_adapter::PaymentCreate,
) -> Result<Payment, DomainError> {
    let payment = payments_adapter::create_payment(conn, dto).await?;
    Ok(Payment::from(payment))
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    payment_id: i64,
    status: PaymentStatus,
    paid_at: Option<OffsetDateTime>,
) -> Result<Payment, DomainError> {
    let payment = payments_adapter::update_status(conn, payment_id, status, paid_at).await?;
    Ok(Payment::from(payment))
}

pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Payment>, u64), DomainError> {
    let (rows, total) = payments_adapter::list_page(conn, offset, limit).await?;
    Ok((rows.into_iter().map(Payment::from).collect(), total))
}

pub async fn list_for_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    operator_id: i64,
) -> Result<Vec<Payment>, DomainError> {
    let rows = payments_adapter::list_for_operator(conn, operator_id).await?;
    Ok(rows.into_iter().map(Payment::from).collect())
}

pub async fn counts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<(u64, u64), DomainError> {
    Ok(payments_adapter::counts(conn).await?)
}
