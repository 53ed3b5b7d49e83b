//! Pokemon team builder - a step-by-step wizard over the PokeAPI catalog
//!
//! The library exposes the wizard's modules so the binary and the
//! integration tests share one reducer, one state and one UI.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod logging;
pub mod pagination;
pub mod reducer;
pub mod state;
pub mod step;
pub mod ui;
pub mod validation;
pub mod wizard;
