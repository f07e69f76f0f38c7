//! Boxoffice - Event Ticketing Backend
//!
//! This crate implements the booking-and-payment transaction flow for an
//! event-ticketing platform: event lookup, card charge through the payment
//! gateway, and the persisted booking ledger record, coordinated into one
//! logically-atomic outcome.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
