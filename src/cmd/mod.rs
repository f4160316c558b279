// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   run (run/clean/build/watch/serve/dev/package), list, plan, options
//! ```

pub mod config;
pub mod list;
pub mod run;
