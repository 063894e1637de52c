// SPDX-License-Identifier: MIT
// Copyright 2026 complejos-backend contributors

//! Data models for the application.

pub mod complejo;
pub mod event;

pub use complejo::{Complejo, NewComplejo};
pub use event::{Event, EventDocument, NewEvent};
