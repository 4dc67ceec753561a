//! Distribution module - online sales configuration and quota planning.

mod online_config;
mod plan;

pub use online_config::{CountryAvailability, CountrySlot, OnlineTicketConfig, RANKED_SLOTS};
pub use plan::{plan_online_distribution, CountryQuota};

#[cfg(test)]
pub(crate) use online_config::fixtures;
