//! PostgreSQL implementation of InventoryReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::distribution::{CountryAvailability, OnlineTicketConfig};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::inventory::{BankTicket, Partition, TicketDetail, ONLINE_TICKET_TYPE, PENDING_PAYMENT_STATUS};
use crate::domain::payment::{PaymentHistory, PENDING_TRANSACTION_STATUS};
use crate::ports::InventoryReader;

use super::rows::{
    db_error, online_config, to_u32, AvailabilityRow, BankTicketRow, CountrySlotRow,
    OnlineConfigRow, PaymentHistoryRow, TicketDetailRow, BANK_TICKET_COLUMNS,
    PAYMENT_HISTORY_COLUMNS, TICKET_DETAIL_COLUMNS,
};

/// PostgreSQL reader over the inventory tables.
pub struct PostgresInventoryReader {
    pool: PgPool,
}

impl PostgresInventoryReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ticket_detail_where(
        &self,
        clause: &str,
        binds: &[&str],
    ) -> Result<Option<TicketDetail>, DomainError> {
        let sql = format!(
            "SELECT {} FROM ticket_detail WHERE {} LIMIT 1",
            TICKET_DETAIL_COLUMNS, clause
        );
        let mut query = sqlx::query_as::<_, TicketDetailRow>(&sql);
        for value in binds {
            query = query.bind(*value);
        }
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find ticket detail", e))?;

        row.map(TicketDetail::try_from).transpose()
    }
}

fn page_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl InventoryReader for PostgresInventoryReader {
    async fn find_ticket_detail(
        &self,
        ticket_id: &str,
        event_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        self.ticket_detail_where("ticket_id = $1 AND event_id = $2", &[ticket_id, event_id])
            .await
    }

    async fn find_ticket_detail_by_id(
        &self,
        ticket_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        self.ticket_detail_where("ticket_id = $1", &[ticket_id]).await
    }

    async fn find_ticket_detail_by_tag(
        &self,
        tag: &str,
        ticket_type: &str,
        country_code: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        self.ticket_detail_where(
            "tag = $1 AND ticket_type = $2 AND country_code = $3",
            &[tag, ticket_type, country_code],
        )
        .await
    }

    async fn find_last_seat(&self, partition: &Partition) -> Result<Option<u32>, DomainError> {
        let (last,): (Option<i32>,) = sqlx::query_as(
            r#"
            SELECT MAX(seat_number)
            FROM bank_ticket
            WHERE country_code = $1 AND ticket_type = $2 AND event_id = $3
            "#,
        )
        .bind(&partition.country_code)
        .bind(partition.ticket_type.as_str())
        .bind(&partition.event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find last seat", e))?;

        last.map(|seat| to_u32("seat_number", seat)).transpose()
    }

    async fn find_online_config(
        &self,
        tag: &str,
    ) -> Result<Option<OnlineTicketConfig>, DomainError> {
        let row: Option<OnlineConfigRow> = sqlx::query_as(
            r#"
            SELECT tag, total_quota, created_by, updated_by, created_at, updated_at
            FROM online_ticket_config
            WHERE tag = $1
            "#,
        )
        .bind(tag)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find online config", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let slots: Vec<CountrySlotRow> = sqlx::query_as(
            r#"
            SELECT country_number, percentage, country_code
            FROM online_ticket_config_country
            WHERE tag = $1
            ORDER BY position ASC
            "#,
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load online config countries", e))?;

        online_config(row, slots).map(Some)
    }

    async fn find_country_availability(
        &self,
        tag: &str,
    ) -> Result<Vec<CountryAvailability>, DomainError> {
        let rows: Vec<AvailabilityRow> = sqlx::query_as(
            r#"
            SELECT country_code,
                   MIN(country_name) AS country_name,
                   SUM(total_remaining)::BIGINT AS total_available_ticket,
                   SUM(total_quota)::BIGINT AS total_ticket
            FROM ticket_detail
            WHERE tag = $1 AND ticket_type <> $2
            GROUP BY country_code
            ORDER BY total_available_ticket ASC, country_code ASC
            "#,
        )
        .bind(tag)
        .bind(ONLINE_TICKET_TYPE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to aggregate country availability", e))?;

        rows.into_iter().map(CountryAvailability::try_from).collect()
    }

    async fn find_expired_payments(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<PaymentHistory>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM payment_history
            WHERE is_valid_payment
              AND expiry_time <= $1
              AND payment->>'transactionStatus' = $2
            ORDER BY created_at ASC
            LIMIT $3
            "#,
            PAYMENT_HISTORY_COLUMNS
        );
        let rows: Vec<PaymentHistoryRow> = sqlx::query_as(&sql)
            .bind(cutoff.as_datetime())
            .bind(PENDING_TRANSACTION_STATUS)
            .bind(page_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find expired payments", e))?;

        rows.into_iter().map(PaymentHistory::try_from).collect()
    }

    async fn find_expired_bank_tickets(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<BankTicket>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM bank_ticket
            WHERE payment_status = $1 AND updated_at <= $2
            ORDER BY created_at ASC
            LIMIT $3
            "#,
            BANK_TICKET_COLUMNS
        );
        let rows: Vec<BankTicketRow> = sqlx::query_as(&sql)
            .bind(PENDING_PAYMENT_STATUS)
            .bind(cutoff.as_datetime())
            .bind(page_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find expired bank tickets", e))?;

        rows.into_iter().map(BankTicket::try_from).collect()
    }

    async fn find_valid_payment_by_ticket_number(
        &self,
        ticket_number: &str,
    ) -> Result<Option<PaymentHistory>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payment_history WHERE ticket_number = $1 AND is_valid_payment LIMIT 1",
            PAYMENT_HISTORY_COLUMNS
        );
        let row: Option<PaymentHistoryRow> = sqlx::query_as(&sql)
            .bind(ticket_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find payment", e))?;

        row.map(PaymentHistory::try_from).transpose()
    }

    async fn find_bank_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Option<BankTicket>, DomainError> {
        let sql = format!(
            "SELECT {} FROM bank_ticket WHERE ticket_number = $1",
            BANK_TICKET_COLUMNS
        );
        let row: Option<BankTicketRow> = sqlx::query_as(&sql)
            .bind(ticket_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find bank ticket", e))?;

        row.map(BankTicket::try_from).transpose()
    }
}
