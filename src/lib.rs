// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint-Tracker: travel CO₂ for Erasmus+ youth exchanges
//!
//! This crate provides the backend API where organizers record the baseline
//! travel of a project and participants report their own journeys through a
//! public questionnaire.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

use config::Config;
use db::Database;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
