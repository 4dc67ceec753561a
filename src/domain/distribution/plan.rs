//! Pure planning step of online distribution.
//!
//! Decides which countries receive an online batch and how large it is,
//! given the config and a snapshot of offline availability sorted ascending
//! by `total_available_ticket`.

use serde::Serialize;

use crate::domain::inventory::InventoryError;

use super::{CountryAvailability, OnlineTicketConfig, RANKED_SLOTS};

/// Online quota assigned to one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryQuota {
    pub country_code: String,
    pub country_number: u8,
    pub total_quota: u32,
}

/// Walks the availability snapshot by position and assigns ranked slots.
///
/// Position `i` (0-based) in the snapshot maps to slot `i + 1`. Countries
/// already present in the config are skipped but keep their position, so a
/// later country never moves up a rank. Positions past the last slot are
/// ignored. The country at position 0 must have sold out offline before
/// online sales may open.
///
/// An empty result means there is nothing to provision.
///
/// # Errors
///
/// `BadRequest("offline ticket still ready")` when position 0 is a candidate
/// with offline tickets left.
pub fn plan_online_distribution(
    config: &OnlineTicketConfig,
    availability: &[CountryAvailability],
) -> Result<Vec<CountryQuota>, InventoryError> {
    let mut plan = Vec::new();

    for (position, country) in availability.iter().enumerate().take(RANKED_SLOTS) {
        if config.is_provisioned(&country.country_code) {
            continue;
        }
        if position == 0 && country.total_available_ticket != 0 {
            return Err(InventoryError::bad_request("offline ticket still ready"));
        }

        let country_number = position as u8 + 1;
        plan.push(CountryQuota {
            country_code: country.country_code.clone(),
            country_number,
            total_quota: config
                .percentage_for(country_number)
                .share_of(config.total_quota),
        });
    }

    Ok(plan)
}
