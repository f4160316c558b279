// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   walk:    find_files(), compile_glob(), WalkOptions
//!   copy:    copy_preserving_structure()
//!   remove:  remove_dir_contents()
//!   write_atomic(), normalize_path(), glob_base()
//! ```

pub mod fs;
