//! In-memory inventory store for tests and local runs.
//!
//! Implements both inventory ports over one lock so every repository call is
//! atomic, and enforces the same seat uniqueness the Postgres schema does.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::distribution::{CountryAvailability, OnlineTicketConfig};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::inventory::{BankTicket, Partition, SeatBatch, TicketDetail, TicketType};
use crate::domain::payment::PaymentHistory;
use crate::ports::{
    HoldRelease, HoldSource, InventoryReader, InventoryRepository, ProvisionOnlineCountry,
};

#[derive(Debug, Default)]
struct InventoryState {
    ticket_details: Vec<TicketDetail>,
    bank_tickets: Vec<BankTicket>,
    payments: Vec<PaymentHistory>,
    configs: HashMap<String, OnlineTicketConfig>,
    orders: HashSet<String>,
}

impl InventoryState {
    fn check_seats_free(&self, batch: &SeatBatch) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for ticket in &batch.tickets {
            let taken = !seen.insert(ticket.seat_number)
                || self.bank_tickets.iter().any(|existing| {
                    existing.seat_number == ticket.seat_number
                        && existing.partition() == batch.partition
                });
            if taken {
                return Err(DomainError::new(
                    ErrorCode::SeatConflict,
                    format!("seat {} already issued in {}", ticket.seat_number, batch.partition),
                )
                .with_detail("seat_number", ticket.seat_number.to_string()));
            }
        }
        Ok(())
    }

    fn online_detail_index(&self, tag: &str, country_code: &str) -> Option<usize> {
        self.ticket_details.iter().position(|d| {
            d.tag == tag && d.ticket_type.is_online() && d.country.code == country_code
        })
    }
}

/// In-memory implementation of [`InventoryReader`] and [`InventoryRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryStore {
    state: Arc<RwLock<InventoryState>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding ===

    // Seeding replaces any record with the same key.

    pub async fn insert_ticket_detail(&self, detail: TicketDetail) {
        let mut state = self.state.write().await;
        state
            .ticket_details
            .retain(|d| !(d.ticket_id == detail.ticket_id && d.event_id == detail.event_id));
        state.ticket_details.push(detail);
    }

    pub async fn insert_bank_ticket(&self, ticket: BankTicket) {
        let mut state = self.state.write().await;
        state
            .bank_tickets
            .retain(|t| t.ticket_number != ticket.ticket_number);
        state.bank_tickets.push(ticket);
    }

    pub async fn insert_payment(&self, payment: PaymentHistory) {
        let mut state = self.state.write().await;
        state.payments.retain(|p| p.payment_id != payment.payment_id);
        state.payments.push(payment);
    }

    pub async fn insert_online_config(&self, config: OnlineTicketConfig) {
        self.state
            .write()
            .await
            .configs
            .insert(config.tag.clone(), config);
    }

    pub async fn insert_order(&self, ticket_number: &str) {
        self.state
            .write()
            .await
            .orders
            .insert(ticket_number.to_string());
    }

    // === Inspection ===

    pub async fn ticket_detail(&self, ticket_id: &str) -> Option<TicketDetail> {
        self.state
            .read()
            .await
            .ticket_details
            .iter()
            .find(|d| d.ticket_id == ticket_id)
            .cloned()
    }

    /// Seats of a partition ordered by seat number.
    pub async fn bank_tickets(&self, partition: &Partition) -> Vec<BankTicket> {
        let mut tickets: Vec<BankTicket> = self
            .state
            .read()
            .await
            .bank_tickets
            .iter()
            .filter(|t| &t.partition() == partition)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.seat_number);
        tickets
    }

    pub async fn bank_ticket_count(&self) -> usize {
        self.state.read().await.bank_tickets.len()
    }

    pub async fn payment(&self, payment_id: &str) -> Option<PaymentHistory> {
        self.state
            .read()
            .await
            .payments
            .iter()
            .find(|p| p.payment_id == payment_id)
            .cloned()
    }

    pub async fn online_config(&self, tag: &str) -> Option<OnlineTicketConfig> {
        self.state.read().await.configs.get(tag).cloned()
    }

    pub async fn has_order(&self, ticket_number: &str) -> bool {
        self.state.read().await.orders.contains(ticket_number)
    }
}

#[async_trait]
impl InventoryReader for InMemoryInventoryStore {
    async fn find_ticket_detail(
        &self,
        ticket_id: &str,
        event_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .ticket_details
            .iter()
            .find(|d| d.ticket_id == ticket_id && d.event_id == event_id)
            .cloned())
    }

    async fn find_ticket_detail_by_id(
        &self,
        ticket_id: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        Ok(self.ticket_detail(ticket_id).await)
    }

    async fn find_ticket_detail_by_tag(
        &self,
        tag: &str,
        ticket_type: &str,
        country_code: &str,
    ) -> Result<Option<TicketDetail>, DomainError> {
        let ticket_type = TicketType::from(ticket_type);
        Ok(self
            .state
            .read()
            .await
            .ticket_details
            .iter()
            .find(|d| d.tag == tag && d.ticket_type == ticket_type && d.country.code == country_code)
            .cloned())
    }

    async fn find_last_seat(&self, partition: &Partition) -> Result<Option<u32>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .bank_tickets
            .iter()
            .filter(|t| &t.partition() == partition)
            .map(|t| t.seat_number)
            .max())
    }

    async fn find_online_config(
        &self,
        tag: &str,
    ) -> Result<Option<OnlineTicketConfig>, DomainError> {
        Ok(self.online_config(tag).await)
    }

    async fn find_country_availability(
        &self,
        tag: &str,
    ) -> Result<Vec<CountryAvailability>, DomainError> {
        let state = self.state.read().await;

        let mut by_country: BTreeMap<&str, CountryAvailability> = BTreeMap::new();
        for detail in state
            .ticket_details
            .iter()
            .filter(|d| d.tag == tag && !d.ticket_type.is_online())
        {
            let row = by_country
                .entry(detail.country.code.as_str())
                .or_insert_with(|| CountryAvailability {
                    country_code: detail.country.code.clone(),
                    country_name: detail.country.name.clone(),
                    total_available_ticket: 0,
                    total_ticket: 0,
                });
            row.total_available_ticket += u64::from(detail.total_remaining);
            row.total_ticket += u64::from(detail.total_quota);
        }

        // BTreeMap order is by code; the stable sort keeps it for ties.
        let mut rows: Vec<CountryAvailability> = by_country.into_values().collect();
        rows.sort_by_key(|row| row.total_available_ticket);
        Ok(rows)
    }

    async fn find_expired_payments(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<PaymentHistory>, DomainError> {
        let mut expired: Vec<PaymentHistory> = self
            .state
            .read()
            .await
            .payments
            .iter()
            .filter(|p| p.is_expired_hold(&cutoff))
            .cloned()
            .collect();
        expired.sort_by_key(|p| p.created_at);
        expired.truncate(limit);
        Ok(expired)
    }

    async fn find_expired_bank_tickets(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> Result<Vec<BankTicket>, DomainError> {
        let mut expired: Vec<BankTicket> = self
            .state
            .read()
            .await
            .bank_tickets
            .iter()
            .filter(|t| t.is_payment_pending() && !t.updated_at.is_after(&cutoff))
            .cloned()
            .collect();
        expired.sort_by_key(|t| t.created_at);
        expired.truncate(limit);
        Ok(expired)
    }

    async fn find_valid_payment_by_ticket_number(
        &self,
        ticket_number: &str,
    ) -> Result<Option<PaymentHistory>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .payments
            .iter()
            .find(|p| p.is_valid_payment && p.ticket.ticket_number == ticket_number)
            .cloned())
    }

    async fn find_bank_ticket(
        &self,
        ticket_number: &str,
    ) -> Result<Option<BankTicket>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .bank_tickets
            .iter()
            .find(|t| t.ticket_number == ticket_number)
            .cloned())
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryStore {
    async fn insert_bank_tickets(&self, batch: &SeatBatch) -> Result<(), DomainError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().await;
        state.check_seats_free(batch)?;
        state.bank_tickets.extend(batch.tickets.iter().cloned());
        Ok(())
    }

    async fn provision_online_country(
        &self,
        command: &ProvisionOnlineCountry,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        // Validate everything before the first write.
        state.check_seats_free(&command.batch)?;
        if !state.configs.contains_key(&command.tag) {
            return Err(DomainError::new(
                ErrorCode::OnlineConfigNotFound,
                "ticket config not found",
            )
            .with_detail("tag", command.tag.clone()));
        }
        let detail_index = state
            .online_detail_index(&command.tag, &command.country_code)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::TicketDetailNotFound, "ticket detail not found")
                    .with_detail("country_code", command.country_code.clone())
            })?;

        let now = Timestamp::now();
        state
            .bank_tickets
            .extend(command.batch.tickets.iter().cloned());

        // A number with no slot is a 0% share; the detail is still rewritten
        if let Some(config) = state.configs.get_mut(&command.tag) {
            if let Some(slot) = config
                .country_list
                .iter_mut()
                .find(|slot| slot.country_number == command.country_number)
            {
                slot.country_code = command.country_code.clone();
            }
            config.updated_at = now;
        }

        let detail = &mut state.ticket_details[detail_index];
        detail.total_quota = command.total_quota;
        detail.total_remaining = command.total_remaining;
        detail.updated_at = now;
        Ok(())
    }

    async fn release_hold(&self, command: &HoldRelease) -> Result<Option<u32>, DomainError> {
        let mut state = self.state.write().await;

        let detail_index = state
            .ticket_details
            .iter()
            .position(|d| d.ticket_id == command.ticket_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::TicketDetailNotFound, "ticket detail not found")
                    .with_detail("ticket_id", command.ticket_id.clone())
            })?;
        {
            let detail = &state.ticket_details[detail_index];
            if detail.total_remaining >= detail.total_quota {
                return Err(DomainError::new(ErrorCode::QuotaExceeded, "totalRemaining full")
                    .with_detail("ticket_id", command.ticket_id.clone()));
            }
        }

        // Only a hold that is still in place gives its seat back
        let still_held = match &command.source {
            HoldSource::Payment { payment_id } => state
                .payments
                .iter()
                .any(|p| &p.payment_id == payment_id && p.is_valid_payment),
            HoldSource::BankTicket => {
                state.bank_tickets.iter().any(|t| {
                    t.ticket_number == command.ticket_number && t.is_payment_pending()
                }) && !state.payments.iter().any(|p| {
                    p.ticket.ticket_number == command.ticket_number && p.is_valid_payment
                })
            }
        };
        if !still_held {
            return Ok(None);
        }

        let now = Timestamp::now();
        if let HoldSource::Payment { payment_id } = &command.source {
            for payment in state
                .payments
                .iter_mut()
                .filter(|p| &p.payment_id == payment_id)
            {
                payment.is_valid_payment = false;
                payment.updated_at = now;
            }
            state.orders.remove(&command.ticket_number);
        }

        for ticket in state
            .bank_tickets
            .iter_mut()
            .filter(|t| t.ticket_number == command.ticket_number)
        {
            ticket.is_used = false;
            ticket.user_id.clear();
            ticket.queue_id.clear();
            ticket.payment_status.clear();
            ticket.price = command.price;
            ticket.updated_at = now;
        }

        let detail = &mut state.ticket_details[detail_index];
        detail.total_remaining += 1;
        detail.updated_at = now;
        Ok(Some(detail.total_remaining))
    }
}
