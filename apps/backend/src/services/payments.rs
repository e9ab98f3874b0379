//! Payment records for game fees. No gateway is contacted: staff move a
//! payment through its statuses by hand.

use sea_orm::{ConnectionTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::info;

use crate::adapters::payments_sea::PaymentCreate;
use crate::db::txn::with_nested_txn;
use crate::domain::actor::Actor;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::entities::payments::{PaymentMethod, PaymentStatus};
use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};
use crate::repos::payments::{self, Payment};
use crate::repos::{games, operators};

pub const MIN_AMOUNT: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub operator_id: i64,
    pub game_id: Option<i64>,
    pub amount: f64,
    pub method: PaymentMethod,
}

fn validate_amount(amount: f64) -> Result<(), DomainError> {
    if !amount.is_finite() || amount < MIN_AMOUNT {
        return Err(DomainError::validation(
            ValidationKind::InvalidField,
            format!("amount must be at least {MIN_AMOUNT}"),
        ));
    }
    Ok(())
}

/// `paid_at` for a status change: stamped on first entry into a settled
/// status, kept while settled, cleared otherwise.
fn paid_at_for(
    status: PaymentStatus,
    previous: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    if status.is_settled() {
        Some(previous.unwrap_or(now))
    } else {
        None
    }
}

fn require_staff(actor: Actor) -> Result<(), DomainError> {
    if actor.is_staff() {
        return Ok(());
    }
    Err(DomainError::forbidden(
        ForbiddenKind::Other("staff only".into()),
        "Only admins and organizers may do this",
    ))
}

pub struct PaymentService;

impl PaymentService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_payment<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        input: NewPayment,
    ) -> Result<Payment, DomainError> {
        actor.ensure_self_or_staff(input.operator_id)?;
        validate_amount(input.amount)?;

        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                operators::require_active_operator(txn, input.operator_id).await?;
                let mut dto = PaymentCreate::new(input.operator_id, input.amount, input.method);
                if let Some(game_id) = input.game_id {
                    games::require_game(txn, game_id).await?;
                    dto = dto.for_game(game_id);
                }
                let payment = payments::create_payment(txn, dto).await?;
                info!(
                    payment_id = payment.id,
                    operator_id = payment.operator_id,
                    game_id = ?payment.game_id,
                    method = ?payment.method,
                    "Payment recorded"
                );
                Ok(payment)
            })
        })
        .await
    }

    pub async fn list_payments<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: Actor,
        request: PageRequest,
    ) -> Result<Page<Payment>, DomainError> {
        require_staff(actor)?;
        let (data, total) = payments::list_page(conn, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    pub async fn list_for_operator<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: Actor,
        operator_id: i64,
    ) -> Result<Vec<Payment>, DomainError> {
        actor.ensure_self_or_staff(operator_id)?;
        operators::require_operator(conn, operator_id).await?;
        payments::list_for_operator(conn, operator_id).await
    }

    pub async fn get_payment<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        actor: Actor,
        payment_id: i64,
    ) -> Result<Payment, DomainError> {
        let payment = payments::require_payment(conn, payment_id).await?;
        actor.ensure_self_or_staff(payment.operator_id)?;
        Ok(payment)
    }

    pub async fn update_status<C: TransactionTrait>(
        &self,
        conn: &C,
        actor: Actor,
        payment_id: i64,
        status: PaymentStatus,
    ) -> Result<Payment, DomainError> {
        require_staff(actor)?;
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let current = payments::require_payment(txn, payment_id).await?;
                let paid_at = paid_at_for(status, current.paid_at, OffsetDateTime::now_utc());
                let payment = payments::update_status(txn, payment_id, status, paid_at).await?;
                info!(
                    payment_id,
                    from = ?current.status,
                    to = ?payment.status,
                    changed_by = actor.id,
                    "Payment status changed"
                );
                Ok(payment)
            })
        })
        .await
    }
}

impl Default for PaymentService {
    fn default() -> Self {
        Self::new()
    }
}
