//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, percentages, errors, envelopes)
//! - `inventory` - Ticket details, partitions, seats, and seat batches
//! - `payment` - Payment history records bound to ticket numbers
//! - `distribution` - Online quota configuration and the planning step

pub mod distribution;
pub mod foundation;
pub mod inventory;
pub mod payment;
