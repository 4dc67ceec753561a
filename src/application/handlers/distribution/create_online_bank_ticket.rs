//! CreateOnlineBankTicketHandler - Opens online sales for ranked countries.

use std::sync::Arc;

use crate::domain::distribution::{plan_online_distribution, CountryQuota};
use crate::domain::foundation::ValidationError;
use crate::domain::inventory::{InventoryError, SeatRange, TicketTemplate, ONLINE_TICKET_TYPE};
use crate::ports::{InventoryReader, InventoryRepository, ProvisionOnlineCountry};

use crate::application::handlers::allocation::SeatAllocator;

/// Command to distribute a tag's online quota.
///
/// `country_code` identifies the country whose offline sale triggered the
/// request; the countries actually opened come from the availability ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOnlineBankTicketCommand {
    pub tag: String,
    pub country_code: String,
}

impl CreateOnlineBankTicketCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tag.trim().is_empty() {
            return Err(ValidationError::empty_field("tag"));
        }
        Ok(())
    }
}

/// One country opened for online sales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedCountry {
    pub quota: CountryQuota,
    pub seats: SeatRange,
    pub total_remaining: u32,
}

/// Outcome of a distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOnlineBankTicketResult {
    /// Every ranked country was already provisioned, or none was available.
    NothingToProvision,
    Provisioned(Vec<ProvisionedCountry>),
}

impl CreateOnlineBankTicketResult {
    pub fn message(&self) -> &'static str {
        match self {
            CreateOnlineBankTicketResult::NothingToProvision => "update online ticket empty",
            CreateOnlineBankTicketResult::Provisioned(_) => "Success create bank ticket online",
        }
    }
}

/// Handler for online quota distribution.
///
/// Countries are processed one at a time in ranking order and the run stops
/// at the first failure. Each country is provisioned in a single repository
/// call, so a failed country leaves no partial writes behind.
pub struct CreateOnlineBankTicketHandler {
    reader: Arc<dyn InventoryReader>,
    repository: Arc<dyn InventoryRepository>,
    allocator: SeatAllocator,
}

impl CreateOnlineBankTicketHandler {
    pub fn new(
        reader: Arc<dyn InventoryReader>,
        repository: Arc<dyn InventoryRepository>,
        max_attempts: u32,
    ) -> Self {
        Self {
            allocator: SeatAllocator::new(Arc::clone(&reader), max_attempts),
            reader,
            repository,
        }
    }

    #[tracing::instrument(
        name = "create_online_bank_ticket",
        skip(self, cmd),
        fields(tag = %cmd.tag, country_code = %cmd.country_code)
    )]
    pub async fn handle(
        &self,
        cmd: CreateOnlineBankTicketCommand,
    ) -> Result<CreateOnlineBankTicketResult, InventoryError> {
        cmd.validate()?;

        let config = self
            .reader
            .find_online_config(&cmd.tag)
            .await?
            .ok_or_else(|| InventoryError::not_found("ticket config not found"))?;
        let availability = self.reader.find_country_availability(&cmd.tag).await?;

        let plan = plan_online_distribution(&config, &availability)?;
        if plan.is_empty() {
            tracing::info!("no country left to provision");
            return Ok(CreateOnlineBankTicketResult::NothingToProvision);
        }

        let mut provisioned = Vec::with_capacity(plan.len());
        for quota in plan {
            provisioned.push(self.provision(&cmd.tag, quota).await?);
        }

        Ok(CreateOnlineBankTicketResult::Provisioned(provisioned))
    }

    async fn provision(
        &self,
        tag: &str,
        quota: CountryQuota,
    ) -> Result<ProvisionedCountry, InventoryError> {
        let detail = self
            .reader
            .find_ticket_detail_by_tag(tag, ONLINE_TICKET_TYPE, &quota.country_code)
            .await?
            .ok_or_else(|| InventoryError::not_found("ticket detail not found"))?;

        // Checked before anything is written for this country.
        let total_remaining = detail.remaining_after_requota(quota.total_quota)?;

        let partition = detail.partition();
        let template = TicketTemplate::from(&detail);
        let repository = Arc::clone(&self.repository);
        let tag = tag.to_string();
        let country_code = quota.country_code.clone();
        let country_number = quota.country_number;
        let total_quota = quota.total_quota;

        let seats = self
            .allocator
            .allocate(&partition, quota.total_quota, &template, move |batch| {
                let repository = Arc::clone(&repository);
                let command = ProvisionOnlineCountry {
                    tag: tag.clone(),
                    country_number,
                    country_code: country_code.clone(),
                    batch,
                    total_quota,
                    total_remaining,
                };
                async move { repository.provision_online_country(&command).await }
            })
            .await?;

        tracing::info!(
            country_code = %quota.country_code,
            country_number = quota.country_number,
            total_quota = quota.total_quota,
            created = seats.len(),
            "online country provisioned"
        );

        Ok(ProvisionedCountry {
            quota,
            seats,
            total_remaining,
        })
    }
}
