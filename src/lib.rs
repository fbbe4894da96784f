//! Concierge — conversational assistant core with tiered memory.
//!
//! The crate assembles a single assistant worker, binds it to three durable
//! memory tiers, and exposes the one call the UI layer needs: prompt in,
//! display-ready text out. Task execution itself is delegated to an external
//! engine behind the [`engine::TaskEngine`] seam.

pub mod assembly;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod normalize;
pub mod session;
pub mod telemetry;
pub mod transcript;
