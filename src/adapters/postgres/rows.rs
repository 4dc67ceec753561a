//! Row types and conversions shared by the inventory reader and repository.

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::domain::distribution::{CountryAvailability, CountrySlot, OnlineTicketConfig};
use crate::domain::foundation::{DomainError, ErrorCode, Percentage, Timestamp};
use crate::domain::inventory::{BankTicket, Country, TicketDetail, TicketType};
use crate::domain::payment::{PaymentHistory, PaymentSnapshot, TicketSnapshot};

pub(super) const SEAT_KEY_CONSTRAINT: &str = "bank_ticket_partition_seat_key";

pub(super) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::database(context, err)
}

/// Column values outside what the domain type can hold.
fn corrupt(field: &str, value: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", field, value),
    )
}

pub(super) fn to_u32(field: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt(field, value))
}

pub(super) fn to_i32(field: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::OutOfRange,
            format!("{} {} does not fit the store", field, value),
        )
    })
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct TicketDetailRow {
    ticket_id: String,
    event_id: String,
    ticket_type: String,
    ticket_price: i64,
    total_quota: i32,
    total_remaining: i32,
    continent_name: String,
    continent_code: String,
    country_name: String,
    country_code: String,
    country_city: String,
    country_place: String,
    tag: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(super) const TICKET_DETAIL_COLUMNS: &str = "ticket_id, event_id, ticket_type, ticket_price, \
     total_quota, total_remaining, continent_name, continent_code, country_name, country_code, \
     country_city, country_place, tag, created_at, updated_at";

impl TryFrom<TicketDetailRow> for TicketDetail {
    type Error = DomainError;

    fn try_from(row: TicketDetailRow) -> Result<Self, Self::Error> {
        Ok(TicketDetail {
            ticket_id: row.ticket_id,
            event_id: row.event_id,
            ticket_type: TicketType::from(row.ticket_type),
            ticket_price: row.ticket_price,
            total_quota: to_u32("total_quota", row.total_quota)?,
            total_remaining: to_u32("total_remaining", row.total_remaining)?,
            continent_name: row.continent_name,
            continent_code: row.continent_code,
            country: Country {
                name: row.country_name,
                code: row.country_code,
                city: row.country_city,
                place: row.country_place,
            },
            tag: row.tag,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct BankTicketRow {
    ticket_number: String,
    seat_number: i32,
    is_used: bool,
    user_id: String,
    queue_id: String,
    ticket_id: String,
    event_id: String,
    country_code: String,
    price: i64,
    ticket_type: String,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(super) const BANK_TICKET_COLUMNS: &str = "ticket_number, seat_number, is_used, user_id, \
     queue_id, ticket_id, event_id, country_code, price, ticket_type, payment_status, \
     created_at, updated_at";

impl TryFrom<BankTicketRow> for BankTicket {
    type Error = DomainError;

    fn try_from(row: BankTicketRow) -> Result<Self, Self::Error> {
        Ok(BankTicket {
            ticket_number: row.ticket_number,
            seat_number: to_u32("seat_number", row.seat_number)?,
            is_used: row.is_used,
            user_id: row.user_id,
            queue_id: row.queue_id,
            ticket_id: row.ticket_id,
            event_id: row.event_id,
            country_code: row.country_code,
            price: row.price,
            ticket_type: TicketType::from(row.ticket_type),
            payment_status: row.payment_status,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PaymentHistoryRow {
    payment_id: String,
    user_id: String,
    ticket_number: String,
    ticket_event_id: String,
    ticket_type: String,
    ticket_seat_number: i32,
    ticket_country_code: String,
    ticket_id: String,
    payment: Option<Json<PaymentSnapshot>>,
    is_valid_payment: bool,
    expiry_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(super) const PAYMENT_HISTORY_COLUMNS: &str = "payment_id, user_id, ticket_number, \
     ticket_event_id, ticket_type, ticket_seat_number, ticket_country_code, ticket_id, payment, \
     is_valid_payment, expiry_time, created_at, updated_at";

impl TryFrom<PaymentHistoryRow> for PaymentHistory {
    type Error = DomainError;

    fn try_from(row: PaymentHistoryRow) -> Result<Self, Self::Error> {
        Ok(PaymentHistory {
            payment_id: row.payment_id,
            user_id: row.user_id,
            ticket: TicketSnapshot {
                ticket_number: row.ticket_number,
                event_id: row.ticket_event_id,
                ticket_type: TicketType::from(row.ticket_type),
                seat_number: to_u32("ticket_seat_number", row.ticket_seat_number)?,
                country_code: row.ticket_country_code,
                ticket_id: row.ticket_id,
            },
            payment: row.payment.map(|Json(snapshot)| snapshot),
            is_valid_payment: row.is_valid_payment,
            expiry_time: Timestamp::from_datetime(row.expiry_time),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct OnlineConfigRow {
    tag: String,
    total_quota: i32,
    created_by: String,
    updated_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct CountrySlotRow {
    country_number: i16,
    percentage: i16,
    country_code: String,
}

impl TryFrom<CountrySlotRow> for CountrySlot {
    type Error = DomainError;

    fn try_from(row: CountrySlotRow) -> Result<Self, Self::Error> {
        let country_number =
            u8::try_from(row.country_number).map_err(|_| corrupt("country_number", row.country_number))?;
        let percentage = Percentage::try_new(i64::from(row.percentage))
            .map_err(|_| corrupt("percentage", row.percentage))?;
        Ok(CountrySlot {
            country_number,
            percentage,
            country_code: row.country_code,
        })
    }
}

pub(super) fn online_config(
    row: OnlineConfigRow,
    slots: Vec<CountrySlotRow>,
) -> Result<OnlineTicketConfig, DomainError> {
    Ok(OnlineTicketConfig {
        tag: row.tag,
        total_quota: to_u32("total_quota", row.total_quota)?,
        country_list: slots
            .into_iter()
            .map(CountrySlot::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        created_at: Timestamp::from_datetime(row.created_at),
        updated_at: Timestamp::from_datetime(row.updated_at),
        created_by: row.created_by,
        updated_by: row.updated_by,
    })
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AvailabilityRow {
    country_code: String,
    country_name: String,
    total_available_ticket: i64,
    total_ticket: i64,
}

impl TryFrom<AvailabilityRow> for CountryAvailability {
    type Error = DomainError;

    fn try_from(row: AvailabilityRow) -> Result<Self, Self::Error> {
        Ok(CountryAvailability {
            total_available_ticket: u64::try_from(row.total_available_ticket)
                .map_err(|_| corrupt("total_available_ticket", row.total_available_ticket))?,
            total_ticket: u64::try_from(row.total_ticket)
                .map_err(|_| corrupt("total_ticket", row.total_ticket))?,
            country_code: row.country_code,
            country_name: row.country_name,
        })
    }
}
