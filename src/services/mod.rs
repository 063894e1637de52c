// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Services module - business logic layer.

pub mod imc;
pub mod token;

pub use imc::{classify as classify_imc, ImcCategory, ImcOutcome};
pub use token::{Claims, TokenError, TokenService};
