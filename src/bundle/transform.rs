// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source-to-source transforms.
//!
//! ```text
//! Script   ES module syntax lowered to require/exports
//!            import X from "m"        var X = __importDefault(require("m")).default;
//!            import * as ns from "m"  var ns = require("m");
//!            import { a, b as c }     var __import0 = require("m"); var a = ...
//!            import "m"               require("m");
//!            export default expr      exports.default = expr
//!            export const x = ...     const x = ...   (+ exports.x = x; at the end)
//!            export { a as b }        exports.b = a;  (at the end)
//!            export * from "m"        __exportStar(exports, require("m"));
//! Json     validated, module.exports = <document>;
//! Text     module.exports = "<escaped text>";
//! ```
//!
//! The lowering is line-anchored: statements must start a line. Patterns are
//! matched against [`code_view`], so text inside comments and literals is
//! never rewritten or scanned.

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::graph::ModuleKind;
use super::mask::code_view;

struct Patterns {
    import_from: Regex,
    import_bare: Regex,
    export_from: Regex,
    export_list: Regex,
    export_default: Regex,
    export_decl: Regex,
    require: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            import_from: Regex::new(
                r#"(?m)^[ \t]*import\s+([^;'"]+?)\s+from\s*["']([^"']+)["'][ \t]*;?"#,
            )?,
            import_bare: Regex::new(r#"(?m)^[ \t]*import\s*["']([^"']+)["'][ \t]*;?"#)?,
            export_from: Regex::new(
                r#"(?m)^[ \t]*export\s*(\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*["']([^"']+)["'][ \t]*;?"#,
            )?,
            export_list: Regex::new(r"(?m)^[ \t]*export\s*\{([^}]*)\}[ \t]*;?")?,
            export_default: Regex::new(r"(?m)^([ \t]*)export\s+default\s+")?,
            export_decl: Regex::new(
                r"(?m)^([ \t]*)export\s+((?:async\s+)?function\*?|class|const|let|var)\s+([\w$]+)",
            )?,
            require: Regex::new(r#"(?:^|[^.\w$])require\s*\(\s*["']([^"']+)["']\s*\)"#)?,
        })
    }
}

static PATTERNS: OnceLock<Result<Patterns, String>> = OnceLock::new();

fn patterns() -> Result<&'static Patterns, String> {
    PATTERNS
        .get_or_init(|| Patterns::compile().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

impl ModuleKind {
    /// Chooses the transform for a file by extension.
    #[must_use]
    pub fn detect(path: &Path, text_extensions: &[String]) -> Self {
        let ext = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        if ext == ".json" {
            Self::Json
        } else if text_extensions.contains(&ext) {
            Self::Text
        } else {
            Self::Script
        }
    }
}

/// Transforms module source into a module body.
///
/// # Errors
///
/// Returns a message describing why the source was rejected.
pub fn transform(kind: ModuleKind, source: &str) -> Result<String, String> {
    match kind {
        ModuleKind::Script => lower_esm(source),
        ModuleKind::Json => {
            serde_json::from_str::<serde_json::Value>(source)
                .map_err(|e| format!("invalid JSON: {e}"))?;
            Ok(format!("module.exports = {};", source.trim()))
        }
        ModuleKind::Text => Ok(format!("module.exports = {};", js_string(source))),
        ModuleKind::External => Ok(format!("module.exports = {};", source.trim())),
    }
}

/// Quotes `text` as a JavaScript string literal.
#[must_use]
pub fn js_string(text: &str) -> String {
    // A JSON string literal is a valid JavaScript string literal
    serde_json::Value::from(text).to_string()
}

/// `require` specifiers referenced by a script, in order of first use.
///
/// Calls inside comments and literals are ignored.
///
/// # Errors
///
/// Returns a message if the scanner patterns are unavailable.
pub fn scan_requires(code: &str) -> Result<Vec<String>, String> {
    let patterns = patterns()?;
    let view = code_view(code);
    let mut found: Vec<String> = Vec::new();

    for caps in patterns.require.captures_iter(&view) {
        let Some(group) = caps.get(1) else {
            continue;
        };
        let specifier = &code[group.range()];
        if !found.iter().any(|s| s == specifier) {
            found.push(specifier.to_string());
        }
    }
    Ok(found)
}

/// A pattern match in the code view, read back from the source.
struct Statement<'a> {
    source: &'a str,
    caps: Captures<'a>,
}

impl<'a> Statement<'a> {
    fn group(&self, i: usize) -> &'a str {
        self.caps.get(i).map_or("", |m| &self.source[m.range()])
    }
}

#[derive(Default)]
struct Lowering {
    temp: usize,
    trailer: Vec<String>,
    changed: bool,
    error: Option<String>,
}

impl Lowering {
    fn temp_name(&mut self, prefix: &str) -> String {
        let name = format!("__{prefix}{}", self.temp);
        self.temp += 1;
        name
    }

    fn fail(&mut self, message: String) -> String {
        self.error.get_or_insert(message);
        String::new()
    }

    fn import(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        let specifier = js_string(stmt.group(2));
        match parse_import_clause(stmt.group(1)) {
            Ok(clause) => self.import_statement(&clause, &specifier),
            Err(message) => self.fail(message),
        }
    }

    fn import_statement(&mut self, clause: &ImportClause, specifier: &str) -> String {
        let source = format!("require({specifier})");

        match (&clause.default, &clause.namespace, clause.named.is_empty()) {
            (None, Some(ns), true) => return format!("var {ns} = {source};"),
            (Some(default), None, true) => {
                return format!("var {default} = __importDefault({source}).default;");
            }
            _ => {}
        }

        let temp = self.temp_name("import");
        let mut parts = vec![format!("var {temp} = {source};")];
        if let Some(default) = &clause.default {
            parts.push(format!("var {default} = __importDefault({temp}).default;"));
        }
        if let Some(ns) = &clause.namespace {
            parts.push(format!("var {ns} = {temp};"));
        }
        for (imported, local) in &clause.named {
            parts.push(format!("var {local} = {temp}.{imported};"));
        }
        parts.join(" ")
    }

    fn import_bare(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        format!("require({});", js_string(stmt.group(1)))
    }

    fn export_from(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        let what = stmt.group(1).trim();
        let source = format!("require({})", js_string(stmt.group(2)));

        if what == "*" {
            return format!("__exportStar(exports, {source});");
        }
        if let Some(ns) = what.strip_prefix('*') {
            let ns = ns.trim().trim_start_matches("as").trim();
            return format!("exports.{ns} = {source};");
        }

        match parse_specifier_list(what) {
            Ok(list) => {
                let temp = self.temp_name("reexport");
                let mut parts = vec![format!("var {temp} = {source};")];
                parts.extend(
                    list.iter()
                        .map(|(local, exported)| format!("exports.{exported} = {temp}.{local};")),
                );
                parts.join(" ")
            }
            Err(message) => self.fail(message),
        }
    }

    fn export_list(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        match parse_specifier_list(&format!("{{{}}}", stmt.group(1))) {
            Ok(list) => {
                self.trailer.extend(
                    list.into_iter()
                        .map(|(local, exported)| format!("exports.{exported} = {local};")),
                );
                String::new()
            }
            Err(message) => self.fail(message),
        }
    }

    fn export_default(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        format!("{}exports.default = ", stmt.group(1))
    }

    fn export_decl(&mut self, stmt: &Statement<'_>) -> String {
        self.changed = true;
        let name = stmt.group(3);
        self.trailer.push(format!("exports.{name} = {name};"));
        format!("{}{} {name}", stmt.group(1), stmt.group(2))
    }

    /// Records a replacement for every match of `pattern` that does not
    /// overlap an earlier one.
    fn collect(
        &mut self,
        pattern: &Regex,
        source: &str,
        view: &str,
        edits: &mut Vec<(Range<usize>, String)>,
        lower: fn(&mut Self, &Statement<'_>) -> String,
    ) {
        for caps in pattern.captures_iter(view) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let range = whole.range();
            if edits
                .iter()
                .any(|(taken, _)| taken.start < range.end && range.start < taken.end)
            {
                continue;
            }
            let replacement = lower(self, &Statement { source, caps });
            edits.push((range, replacement));
        }
    }
}

/// Lowers ES module syntax to the loader's `require`/`exports` convention.
///
/// Sources without ES module syntax are returned unchanged.
///
/// # Errors
///
/// Returns a message for import or export lists that cannot be parsed.
pub fn lower_esm(source: &str) -> Result<String, String> {
    let patterns = patterns()?;
    let view = code_view(source);
    let mut state = Lowering::default();
    let mut edits = Vec::new();

    // Re-exports first: `export { a } from` also matches the export list
    let passes: [(&Regex, fn(&mut Lowering, &Statement<'_>) -> String); 6] = [
        (&patterns.export_from, Lowering::export_from),
        (&patterns.export_list, Lowering::export_list),
        (&patterns.import_from, Lowering::import),
        (&patterns.import_bare, Lowering::import_bare),
        (&patterns.export_default, Lowering::export_default),
        (&patterns.export_decl, Lowering::export_decl),
    ];
    for (pattern, lower) in passes {
        state.collect(pattern, source, &view, &mut edits, lower);
    }

    if let Some(error) = state.error {
        return Err(error);
    }
    if !state.changed {
        return Ok(source.to_string());
    }

    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(source.len() + 128);
    out.push_str("Object.defineProperty(exports, \"__esModule\", { value: true });\n");
    let mut cursor = 0;
    for (range, replacement) in &edits {
        out.push_str(&source[cursor..range.start]);
        out.push_str(replacement);
        cursor = range.end;
    }
    out.push_str(&source[cursor..]);
    if !state.trailer.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&state.trailer.join("\n"));
        out.push('\n');
    }
    Ok(out)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ImportClause {
    default: Option<String>,
    namespace: Option<String>,
    /// (imported name, local name)
    named: Vec<(String, String)>,
}

fn parse_import_clause(clause: &str) -> Result<ImportClause, String> {
    let mut result = ImportClause::default();
    let mut rest = clause.trim();

    if !rest.starts_with('{') && !rest.starts_with('*') {
        let (default, tail) = rest.split_once(',').unwrap_or((rest, ""));
        let default = default.trim();
        if !is_identifier(default) {
            return Err(format!("unsupported import clause '{clause}'"));
        }
        result.default = Some(default.to_string());
        rest = tail.trim();
    }

    if let Some(ns) = rest.strip_prefix('*') {
        let ns = ns.trim();
        let name = ns.strip_prefix("as").map(str::trim).unwrap_or_default();
        if !is_identifier(name) {
            return Err(format!("unsupported namespace import '{clause}'"));
        }
        result.namespace = Some(name.to_string());
    } else if rest.starts_with('{') {
        result.named = parse_specifier_list(rest)?;
    } else if !rest.is_empty() {
        return Err(format!("unsupported import clause '{clause}'"));
    }

    Ok(result)
}

/// Parses `{ a, b as c }` into `[(a, a), (b, c)]`.
fn parse_specifier_list(list: &str) -> Result<Vec<(String, String)>, String> {
    let inner = list
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| format!("malformed specifier list '{list}'"))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let mut words = item.split_whitespace();
            let (first, second) = match (words.next(), words.next(), words.next(), words.next()) {
                (Some(name), None, None, None) => (name, name),
                (Some(name), Some("as"), Some(alias), None) => (name, alias),
                _ => return Err(format!("malformed specifier '{item}'")),
            };
            if !is_identifier(first) || !is_identifier(second) {
                return Err(format!("malformed specifier '{item}'"));
            }
            Ok((first.to_string(), second.to_string()))
        })
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
