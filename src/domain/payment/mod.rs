//! Payment history records written by the checkout service.
//!
//! The worker only reads them and flips `is_valid_payment` off when a hold
//! expires.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::inventory::TicketType;

/// Transaction status of a checkout that has not settled.
pub const PENDING_TRANSACTION_STATUS: &str = "pending";

/// Ticket snapshot taken when the payment was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    pub ticket_number: String,
    pub event_id: String,
    pub ticket_type: TicketType,
    pub seat_number: u32,
    pub country_code: String,
    pub ticket_id: String,
}

/// Virtual account assigned by the payment gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaNumber {
    pub bank: String,
    pub va_number: String,
}

/// Gateway transaction snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSnapshot {
    pub transaction_id: String,
    pub status_code: String,
    pub gross_amount: String,
    pub payment_type: String,
    pub transaction_status: String,
    pub fraud_status: String,
    pub status_message: String,
    pub merchant_id: String,
    pub permata_va_number: String,
    pub va_numbers: Vec<VaNumber>,
    pub payment_amounts: Vec<String>,
    pub transaction_time: String,
}

/// One payment attempt bound to a ticket number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistory {
    pub payment_id: String,
    pub user_id: String,
    pub ticket: TicketSnapshot,
    pub payment: Option<PaymentSnapshot>,
    pub is_valid_payment: bool,
    pub expiry_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PaymentHistory {
    /// Whether this payment still holds its seat past `cutoff` without settling.
    pub fn is_expired_hold(&self, cutoff: &Timestamp) -> bool {
        self.is_valid_payment
            && !self.expiry_time.is_after(cutoff)
            && self
                .payment
                .as_ref()
                .is_some_and(|p| p.transaction_status == PENDING_TRANSACTION_STATUS)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pending_payment;
    use super::*;

    #[test]
    fn expired_pending_payment_is_a_hold() {
        let now = Timestamp::now();
        let payment = pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(20));
        assert!(payment.is_expired_hold(&now.minus_minutes(15)));
    }

    #[test]
    fn settled_or_invalid_payments_are_not_holds() {
        let now = Timestamp::now();
        let cutoff = now.minus_minutes(15);

        let mut settled = pending_payment("p-1", "tn-1", "t-1", now.minus_minutes(20));
        if let Some(p) = settled.payment.as_mut() {
            p.transaction_status = "settlement".to_string();
        }
        assert!(!settled.is_expired_hold(&cutoff));

        let mut invalid = pending_payment("p-2", "tn-2", "t-1", now.minus_minutes(20));
        invalid.is_valid_payment = false;
        assert!(!invalid.is_expired_hold(&cutoff));

        let fresh = pending_payment("p-3", "tn-3", "t-1", now.minus_minutes(5));
        assert!(!fresh.is_expired_hold(&cutoff));
    }

    #[test]
    fn payment_history_deserializes_document_shape() {
        let json = serde_json::json!({
            "paymentId": "p-1",
            "userId": "u-1",
            "ticket": {
                "ticketNumber": "tn-1",
                "eventId": "evt-1",
                "ticketType": "Gold",
                "seatNumber": 4,
                "countryCode": "ID",
                "ticketId": "t-1"
            },
            "payment": { "transactionStatus": "pending" },
            "isValidPayment": true,
            "expiryTime": "2024-01-15T10:30:00Z",
            "createdAt": "2024-01-15T10:15:00Z",
            "updatedAt": "2024-01-15T10:15:00Z"
        });
        let payment: PaymentHistory = serde_json::from_value(json).unwrap();
        assert_eq!(payment.ticket.seat_number, 4);
        assert_eq!(
            payment.payment.unwrap().transaction_status,
            PENDING_TRANSACTION_STATUS
        );
    }
}
