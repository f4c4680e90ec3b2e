//! Garden pricing library crate.
//!
//! This crate exposes the booking pricing engine and its HTTP API as
//! reusable modules.  Applications may depend on `garden_pricing` and
//! call [`engine::PricingEngine::price_booking`] directly or embed the
//! API via [`api::build_router`].

pub mod money;
pub mod error;
pub mod models;
pub mod weeks;
pub mod seasons;
pub mod duration;
pub mod accommodation;
pub mod food;
pub mod discount;
pub mod vat;
pub mod credits;
pub mod config;
pub mod engine;
pub mod extension;
pub mod record;
pub mod api;

pub use engine::PricingEngine;
pub use error::PricingError;
