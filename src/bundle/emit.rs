// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Artifact emission.
//!
//! ```text
//! (function () {
//!   <loader shim: __modules, __load, helpers>
//!   __modules[0] = ["js/util.js", function (require, module, exports) {
//!     ...
//!   }, {}];
//!   __modules[1] = ["js/app.js", function (require, module, exports) {
//!     ...
//!   }, {"./util": 0}];
//!   __load(1);
//! })();
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use super::graph::{ModuleGraph, ModuleId};
use super::transform::js_string;

pub(super) const LOADER_SHIM: &str = r#"(function () {
  var __modules = [];
  var __cache = {};
  function __load(index) {
    var cached = __cache[index];
    if (cached) return cached.exports;
    var record = __modules[index];
    var module = { exports: {} };
    __cache[index] = module;
    record[1].call(module.exports, function (specifier) {
      var target = record[2][specifier];
      if (target === undefined) {
        throw new Error("Cannot find module '" + specifier + "' from '" + record[0] + "'");
      }
      return __load(target);
    }, module, module.exports);
    return module.exports;
  }
  function __importDefault(mod) {
    return mod && mod.__esModule ? mod : { "default": mod };
  }
  function __exportStar(target, source) {
    for (var key in source) {
      if (key !== "default" && !Object.prototype.hasOwnProperty.call(target, key)) {
        target[key] = source[key];
      }
    }
  }
"#;

/// Renders the bundle: loader shim, one record per module in dependency
/// order, then a call loading the entry (the last record).
#[must_use]
pub fn emit(graph: &ModuleGraph, root: &Path) -> String {
    let order = graph.order();
    let index: BTreeMap<&ModuleId, usize> = order
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut out = String::from(LOADER_SHIM);

    for (i, id) in order.iter().enumerate() {
        let Some(module) = graph.get(id) else {
            continue;
        };

        let deps = module
            .deps
            .iter()
            .filter_map(|(specifier, target)| {
                index
                    .get(target)
                    .map(|idx| format!("{}: {idx}", js_string(specifier)))
            })
            .collect::<Vec<_>>()
            .join(", ");

        let _ = writeln!(
            out,
            "  __modules[{i}] = [{}, function (require, module, exports) {{",
            js_string(&id.record_name(root))
        );
        out.push_str(&module.code);
        if !module.code.ends_with('\n') {
            out.push('\n');
        }
        let _ = writeln!(out, "  }}, {{{deps}}}];");
    }

    if !order.is_empty() {
        let _ = writeln!(out, "  __load({});", order.len() - 1);
    }
    out.push_str("})();\n");
    out
}
