//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: mutex-guarded tables backing every repository port
//! - **payment**: sandbox payment gateway with shared-secret signatures
//! - **notifications**: log-backed notification sink
//!
//! Adapters translate between storage and domain types. They contain no
//! business rules.

pub mod memory;
pub mod notifications;
pub mod payment;
