// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |            run / list / plan
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, layered, tasks.*   |
//!              '-------------+-------------'
//!                            v
//!                        pipeline
//!                 TaskSpec --> registry action
//!                            |
//!          +---------+-------+---------+
//!          v         v                 v
//!        task       step             watch
//!      registry   copy/clean/     coordinator
//!       (plan)     command          |     |
//!                                   v     v
//!                               bundle  notify
//!                              (graph)
//!
//!   +-----------------------------------------+
//!   |  core   process (spawn, cancel, output) |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod bundle;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod step;
pub mod task;
pub mod utility;
pub mod watch;
