//! Analytics module for imessage-wrapped
//!
//! Turns classified message rows into per-year statistics:
//! - Totals and monthly volume of ordinary messages
//! - Tapback counts by kind, split by direction
//! - Custom emoji reaction counts
//! - Derived rankings for the report

pub mod wrapped;

pub use wrapped::{
    aggregate, aggregate_in, generate_wrapped, generate_wrapped_in, ReactionLabel,
    YearAccumulator, YearStats,
};
