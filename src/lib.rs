//! Ticket Worker - ticket inventory allocation and expiry reclamation
//!
//! Opens numbered seats for ticket details, distributes online quota across
//! ranked countries, and returns seats held by unpaid checkouts to the pool.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
