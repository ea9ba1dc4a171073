// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Identifier: file identification worker
//!
//! Polls the pipeline coordinator for files nobody has identified yet, runs
//! libmagic, ssdeep, TRiD and exiftool against each one, and reports the
//! normalized results back.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod identify;
pub mod normalizers;
pub mod tools;
pub mod worker;

pub use config::AppConfig;
pub use error::{IdentifierError, Result};
