//! Core business logic for Saral.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `totals` - Line-item and document totals calculation
//! - `numbering` - Document number format and period keys
//! - `lifecycle` - Quotation and invoice status state machines
//! - `document` - Financial document aggregate and edit rules
//! - `payment` - Payment records and balance reconciliation math
//! - `contract` - AMC contracts, visit schedules, and renewal
//! - `offline` - Client-side offline mutation queue

pub mod contract;
pub mod document;
pub mod lifecycle;
pub mod numbering;
pub mod offline;
pub mod payment;
pub mod totals;
