//! scorecard-core: rubric, scoring, validation, persistence and
//! import/export for interview score cards.
//!
//! The [`session::Session`] ties these together for a host UI that
//! implements [`traits::FormView`].

pub mod autosave;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod medium;
pub mod model;
pub mod rubric;
pub mod session;
pub mod store;
pub mod traits;
pub mod validation;
