//! Shared builders for integration tests.

#![allow(dead_code)]

use ticket_worker::domain::distribution::{CountrySlot, OnlineTicketConfig};
use ticket_worker::domain::foundation::{Percentage, Timestamp};
use ticket_worker::domain::inventory::{
    BankTicket, Country, TicketDetail, TicketType, PENDING_PAYMENT_STATUS,
};
use ticket_worker::domain::payment::{
    PaymentHistory, PaymentSnapshot, TicketSnapshot, PENDING_TRANSACTION_STATUS,
};

pub const EVENT: &str = "evt-2024";
pub const TAG: &str = "jakarta-2024";

pub fn detail(ticket_id: &str, country: &str, ticket_type: &str, quota: u32, remaining: u32) -> TicketDetail {
    TicketDetail {
        ticket_id: ticket_id.to_string(),
        event_id: EVENT.to_string(),
        ticket_type: TicketType::from(ticket_type),
        ticket_price: 1_500_000,
        total_quota: quota,
        total_remaining: remaining,
        continent_name: "Asia".to_string(),
        continent_code: "AS".to_string(),
        country: Country {
            name: format!("Country {}", country),
            code: country.to_string(),
            city: String::new(),
            place: String::new(),
        },
        tag: TAG.to_string(),
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
    }
}

pub fn online_config(total_quota: u32, percentages: [u8; 4]) -> OnlineTicketConfig {
    OnlineTicketConfig {
        tag: TAG.to_string(),
        total_quota,
        country_list: percentages
            .iter()
            .enumerate()
            .map(|(i, p)| CountrySlot {
                country_number: i as u8 + 1,
                percentage: Percentage::new(*p),
                country_code: String::new(),
            })
            .collect(),
        created_at: Timestamp::now(),
        updated_at: Timestamp::now(),
        created_by: "ops".to_string(),
        updated_by: "ops".to_string(),
    }
}

/// Marks an issued seat as held by an unpaid checkout since `held_at`.
pub fn hold(mut ticket: BankTicket, held_at: Timestamp) -> BankTicket {
    ticket.is_used = true;
    ticket.user_id = "user-7".to_string();
    ticket.queue_id = "queue-7".to_string();
    ticket.payment_status = PENDING_PAYMENT_STATUS.to_string();
    ticket.price = 0;
    ticket.updated_at = held_at;
    ticket
}

pub fn pending_payment(payment_id: &str, ticket: &BankTicket, expiry_time: Timestamp) -> PaymentHistory {
    PaymentHistory {
        payment_id: payment_id.to_string(),
        user_id: "user-7".to_string(),
        ticket: TicketSnapshot {
            ticket_number: ticket.ticket_number.clone(),
            event_id: ticket.event_id.clone(),
            ticket_type: ticket.ticket_type.clone(),
            seat_number: ticket.seat_number,
            country_code: ticket.country_code.clone(),
            ticket_id: ticket.ticket_id.clone(),
        },
        payment: Some(PaymentSnapshot {
            transaction_id: format!("trx-{}", payment_id),
            transaction_status: PENDING_TRANSACTION_STATUS.to_string(),
            payment_type: "bank_transfer".to_string(),
            ..Default::default()
        }),
        is_valid_payment: true,
        expiry_time,
        created_at: expiry_time.minus_minutes(15),
        updated_at: expiry_time.minus_minutes(15),
    }
}
