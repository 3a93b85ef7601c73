//! Mess discovery, subscription, rating and complaint engine.
//!
//! The crate is laid out hexagonally: [`domain`] holds the entities,
//! services and ports; [`outbound`] holds the adapters behind the driven
//! ports; [`state`] wires both into the driving ports an inbound adapter
//! would hold.

pub mod demo;
pub mod domain;
pub mod outbound;
pub mod settings;
pub mod state;
pub mod test_support;
