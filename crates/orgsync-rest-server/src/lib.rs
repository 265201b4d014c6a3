// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! orgsync REST API server
//!
//! Serves the stored repository snapshot, triggers synchronization on
//! demand and exposes diagnostics for the upstream platforms.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::{ServerArgs, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::Server;
pub use state::AppState;
