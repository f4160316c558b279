// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!     core
//!      |
//!      v
//!   process
//!      |
//!   Builder (which-cached lookup)
//!   Output  (exit code, captured streams, interrupted)
//! ```

pub mod process;
