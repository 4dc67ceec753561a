//! Online sales configuration and per-country availability snapshots.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, Timestamp};

/// Number of ranked country slots an online config can hold.
pub const RANKED_SLOTS: usize = 4;

/// One ranked slot of an online config.
///
/// `country_code` is empty until the distributor provisions the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySlot {
    pub country_number: u8,
    pub percentage: Percentage,
    #[serde(default)]
    pub country_code: String,
}

/// Per-tag online quota split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineTicketConfig {
    pub tag: String,
    pub total_quota: u32,
    pub country_list: Vec<CountrySlot>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
}

impl OnlineTicketConfig {
    /// Percentage configured for a ranked slot; absent slots count as 0%.
    ///
    /// When a number appears twice the later entry wins.
    pub fn percentage_for(&self, country_number: u8) -> Percentage {
        self.country_list
            .iter()
            .rev()
            .find(|slot| slot.country_number == country_number)
            .map(|slot| slot.percentage)
            .unwrap_or_default()
    }

    /// Whether a country already occupies one of the slots.
    pub fn is_provisioned(&self, country_code: &str) -> bool {
        self.country_list
            .iter()
            .any(|slot| slot.country_code == country_code)
    }
}

/// Offline availability rolled up per country for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAvailability {
    #[serde(rename = "_id")]
    pub country_code: String,
    pub country_name: String,
    pub total_available_ticket: u64,
    pub total_ticket: u64,
}
