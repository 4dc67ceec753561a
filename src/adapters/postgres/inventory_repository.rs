//! PostgreSQL implementation of InventoryRepository.
//!
//! Every port call runs in one transaction. Seat uniqueness is enforced by
//! the `bank_ticket_partition_seat_key` index; a violation surfaces as
//! `SeatConflict` so the allocator can re-read and retry.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::inventory::{SeatBatch, ONLINE_TICKET_TYPE, PENDING_PAYMENT_STATUS};
use crate::ports::{HoldRelease, HoldSource, InventoryRepository, ProvisionOnlineCountry};

use super::rows::{db_error, to_i32, to_u32, SEAT_KEY_CONSTRAINT};

/// Rows per INSERT statement; keeps binds under the protocol's limit.
const INSERT_CHUNK: usize = 1000;

pub struct PostgresInventoryRepository {
    pool: PgPool,
}

impl PostgresInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))
    }
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| db_error("Failed to commit transaction", e))
}

fn insert_error(batch: &SeatBatch, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(SEAT_KEY_CONSTRAINT) || db_err.is_unique_violation() {
            return DomainError::new(
                ErrorCode::SeatConflict,
                format!("seat already taken in {}", batch.partition),
            )
            .with_detail("partition", batch.partition.to_string());
        }
    }
    db_error("Failed to insert bank tickets", err)
}

async fn insert_batch(
    tx: &mut Transaction<'_, Postgres>,
    batch: &SeatBatch,
) -> Result<(), DomainError> {
    for chunk in batch.tickets.chunks(INSERT_CHUNK) {
        let mut seats = Vec::with_capacity(chunk.len());
        for ticket in chunk {
            seats.push(to_i32("seat_number", ticket.seat_number)?);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO bank_ticket (ticket_number, seat_number, is_used, user_id, queue_id, \
             ticket_id, event_id, country_code, price, ticket_type, payment_status, \
             created_at, updated_at) ",
        );
        builder.push_values(chunk.iter().zip(seats), |mut row, (ticket, seat)| {
            row.push_bind(&ticket.ticket_number)
                .push_bind(seat)
                .push_bind(ticket.is_used)
                .push_bind(&ticket.user_id)
                .push_bind(&ticket.queue_id)
                .push_bind(&ticket.ticket_id)
                .push_bind(&ticket.event_id)
                .push_bind(&ticket.country_code)
                .push_bind(ticket.price)
                .push_bind(ticket.ticket_type.as_str())
                .push_bind(&ticket.payment_status)
                .push_bind(*ticket.created_at.as_datetime())
                .push_bind(*ticket.updated_at.as_datetime());
        });

        builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(|e| insert_error(batch, e))?;
    }
    Ok(())
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn insert_bank_tickets(&self, batch: &SeatBatch) -> Result<(), DomainError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut tx = self.begin().await?;
        insert_batch(&mut tx, batch).await?;
        commit(tx).await
    }

    async fn provision_online_country(
        &self,
        command: &ProvisionOnlineCountry,
    ) -> Result<(), DomainError> {
        let total_quota = to_i32("total_quota", command.total_quota)?;
        let total_remaining = to_i32("total_remaining", command.total_remaining)?;
        let now = Timestamp::now();
        let mut tx = self.begin().await?;

        insert_batch(&mut tx, &command.batch).await?;

        // First slot with this number, matching a positional array update
        let slot = sqlx::query(
            r#"
            UPDATE online_ticket_config_country
            SET country_code = $3
            WHERE tag = $1 AND position = (
                SELECT MIN(position) FROM online_ticket_config_country
                WHERE tag = $1 AND country_number = $2
            )
            "#,
        )
        .bind(&command.tag)
        .bind(i16::from(command.country_number))
        .bind(&command.country_code)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update online config", e))?;

        // A number with no slot is a 0% share; the detail is still rewritten
        if slot.rows_affected() == 0 {
            tracing::warn!(
                tag = %command.tag,
                country_number = command.country_number,
                "no config slot for country number"
            );
        }

        let config = sqlx::query("UPDATE online_ticket_config SET updated_at = $2 WHERE tag = $1")
            .bind(&command.tag)
            .bind(now.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to touch online config", e))?;

        if config.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::OnlineConfigNotFound, "ticket config not found")
                    .with_detail("tag", command.tag.clone()),
            );
        }

        let detail = sqlx::query(
            r#"
            UPDATE ticket_detail
            SET total_quota = $4, total_remaining = $5, updated_at = $6
            WHERE tag = $1 AND ticket_type = $2 AND country_code = $3
            "#,
        )
        .bind(&command.tag)
        .bind(ONLINE_TICKET_TYPE)
        .bind(&command.country_code)
        .bind(total_quota)
        .bind(total_remaining)
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to update online ticket detail", e))?;

        if detail.rows_affected() == 0 {
            return Err(
                DomainError::new(ErrorCode::TicketDetailNotFound, "ticket detail not found")
                    .with_detail("country_code", command.country_code.clone()),
            );
        }

        commit(tx).await
    }

    async fn release_hold(&self, command: &HoldRelease) -> Result<Option<u32>, DomainError> {
        let now = Timestamp::now();
        let mut tx = self.begin().await?;

        // Row lock serialises concurrent releases on the same detail
        let counts: Option<(i32, i32)> = sqlx::query_as(
            "SELECT total_remaining, total_quota FROM ticket_detail WHERE ticket_id = $1 FOR UPDATE",
        )
        .bind(&command.ticket_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to lock ticket detail", e))?;

        let Some((remaining, quota)) = counts else {
            return Err(
                DomainError::new(ErrorCode::TicketDetailNotFound, "ticket detail not found")
                    .with_detail("ticket_id", command.ticket_id.clone()),
            );
        };
        if remaining >= quota {
            return Err(DomainError::new(ErrorCode::QuotaExceeded, "totalRemaining full")
                .with_detail("ticket_id", command.ticket_id.clone()));
        }

        let released = match &command.source {
            HoldSource::Payment { payment_id } => {
                release_payment_hold(&mut tx, command, payment_id, now).await?
            }
            HoldSource::BankTicket => release_bank_ticket_hold(&mut tx, command, now).await?,
        };
        if !released {
            tx.rollback()
                .await
                .map_err(|e| db_error("Failed to roll back release", e))?;
            return Ok(None);
        }

        let (new_remaining,): (i32,) = sqlx::query_as(
            r#"
            UPDATE ticket_detail
            SET total_remaining = total_remaining + 1, updated_at = $2
            WHERE ticket_id = $1
            RETURNING total_remaining
            "#,
        )
        .bind(&command.ticket_id)
        .bind(now.as_datetime())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to increment remaining", e))?;

        commit(tx).await?;
        to_u32("total_remaining", new_remaining).map(Some)
    }
}

/// Invalidates a still-valid payment, deletes its order, and clears the seat.
///
/// Returns false when the payment was already invalidated.
async fn release_payment_hold(
    tx: &mut Transaction<'_, Postgres>,
    command: &HoldRelease,
    payment_id: &str,
    now: Timestamp,
) -> Result<bool, DomainError> {
    let payment = sqlx::query(
        r#"
        UPDATE payment_history SET is_valid_payment = FALSE, updated_at = $2
        WHERE payment_id = $1 AND is_valid_payment
        "#,
    )
    .bind(payment_id)
    .bind(now.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to invalidate payment", e))?;

    if payment.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM ticket_order WHERE ticket_number = $1")
        .bind(&command.ticket_number)
        .execute(&mut **tx)
        .await
        .map_err(|e| db_error("Failed to delete order", e))?;

    sqlx::query(
        r#"
        UPDATE bank_ticket
        SET is_used = FALSE, user_id = '', queue_id = '', payment_status = '',
            price = $2, updated_at = $3
        WHERE ticket_number = $1
        "#,
    )
    .bind(&command.ticket_number)
    .bind(command.price)
    .bind(now.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to clear bank ticket", e))?;

    Ok(true)
}

/// Clears a seat still pending with no valid payment behind it.
///
/// Returns false when the seat was already cleared or a payment now backs it.
async fn release_bank_ticket_hold(
    tx: &mut Transaction<'_, Postgres>,
    command: &HoldRelease,
    now: Timestamp,
) -> Result<bool, DomainError> {
    let cleared = sqlx::query(
        r#"
        UPDATE bank_ticket
        SET is_used = FALSE, user_id = '', queue_id = '', payment_status = '',
            price = $2, updated_at = $3
        WHERE ticket_number = $1
          AND payment_status = $4
          AND NOT EXISTS (
              SELECT 1 FROM payment_history
              WHERE ticket_number = $1 AND is_valid_payment
          )
        "#,
    )
    .bind(&command.ticket_number)
    .bind(command.price)
    .bind(now.as_datetime())
    .bind(PENDING_PAYMENT_STATUS)
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("Failed to clear bank ticket", e))?;

    Ok(cleared.rows_affected() > 0)
}
