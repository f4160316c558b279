// frontline: Front-end Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use super::emit::LOADER_SHIM;
use super::graph::{ModuleId, ModuleKind};
use super::mask::code_view;
use super::resolve::Resolver;
use super::transform::{lower_esm, scan_requires, transform};
use super::{BundleArtifact, BundleBuilder, BundleOptions};
use crate::config::Config;
use crate::error::BundleError;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn options(root: &Path) -> BundleOptions {
    BundleOptions::builder()
        .with_root(root)
        .with_entry("src/app.js")
        .with_output("www/app.js")
        .build()
}

/// Bundle text after the loader shim.
fn records(text: &str) -> &str {
    text.strip_prefix(LOADER_SHIM).expect("bundle starts with the loader shim")
}

// --- transform ---

#[test]
fn test_lower_esm_default_namespace_side_effect_imports() {
    let source = "import $ from \"jquery\";\nimport * as util from './util';\nimport './polyfill';\n";
    let lowered = lower_esm(source).unwrap();
    insta::assert_snapshot!(lowered.trim_end(), @r#"
    Object.defineProperty(exports, "__esModule", { value: true });
    var $ = __importDefault(require("jquery")).default;
    var util = require("./util");
    require("./polyfill");
    "#);
}

#[test]
fn test_lower_esm_named_imports_and_exports() {
    let source = r#"import { get, post as send } from "./http";
export const VERSION = "1.0";
export function start() {
  return get("/");
}
export default start;
"#;
    let lowered = lower_esm(source).unwrap();
    insta::assert_snapshot!(lowered.trim_end(), @r#"
    Object.defineProperty(exports, "__esModule", { value: true });
    var __import0 = require("./http"); var get = __import0.get; var send = __import0.post;
    const VERSION = "1.0";
    function start() {
      return get("/");
    }
    exports.default = start;
    exports.VERSION = VERSION;
    exports.start = start;
    "#);
}

#[test]
fn test_lower_esm_reexports_and_export_list() {
    let source = "export * from \"./a\";\nexport { b, c as d } from \"./b\";\nconst e = 1;\nexport { e as default };\n";
    let lowered = lower_esm(source).unwrap();
    insta::assert_snapshot!(lowered.trim_end(), @r#"
    Object.defineProperty(exports, "__esModule", { value: true });
    __exportStar(exports, require("./a"));
    var __reexport0 = require("./b"); exports.b = __reexport0.b; exports.d = __reexport0.c;
    const e = 1;

    exports.default = e;
    "#);
}

#[test]
fn test_lower_esm_multiline_import() {
    let source = "import {\n  a,\n  b\n} from \"./ab\";\na(b);\n";
    let lowered = lower_esm(source).unwrap();
    assert!(lowered.contains("var a = __import0.a; var b = __import0.b;"));
    assert!(lowered.ends_with("a(b);\n"));
}

#[test]
fn test_lower_esm_commonjs_untouched() {
    let source = "var a = require(\"./a\");\nmodule.exports = a;\n";
    assert_eq!(lower_esm(source).unwrap(), source);
}

#[test]
fn test_lower_esm_malformed_specifier() {
    let err = lower_esm("import { a as } from \"./a\";\n").unwrap_err();
    insta::assert_snapshot!(err, @"malformed specifier 'a as'");
}

#[test]
fn test_scan_requires_skips_comments_and_members() {
    let code = r#"var a = require("./a");
// var b = require("./b");
var c = obj.require("./c");
var d = require('./d'), a2 = require("./a");
"#;
    assert_eq!(scan_requires(code).unwrap(), ["./a", "./d"]);
}

#[test]
fn test_scan_requires_ignores_comments_and_literals() {
    let code = r#"var x = 1; // was: require('./old')
console.log("call require('./gone') to load");
var help = `run require("./tpl") ${require("./inside")}`;
/* require("./block")
   require("./block2") */
var re = /require\('\.\/re'\)/;
var util = require('./util');
"#;
    assert_eq!(scan_requires(code).unwrap(), ["./inside", "./util"]);
}

#[test]
fn test_code_view_keeps_offsets() {
    let source = "let s = 'é/*'; // note\nlet t = `a${b}c`; /* x */ let r = 4 / 2;\n";
    let view = code_view(source);
    assert_eq!(view.len(), source.len());
    assert_eq!(
        view,
        "let s = '    ';        \nlet t = ` ${b} `;         let r = 4 / 2;\n"
    );
}

#[test]
fn test_lower_esm_leaves_template_literals_and_comments() {
    let source = "const doc = `\nexport default broken\nimport a from \"./a\"\n`;\n/*\nexport const hidden = 1;\n*/\nmodule.exports = doc;\n";
    assert_eq!(lower_esm(source).unwrap(), source);

    let source = "const doc = `\nexport default broken\n`;\nexport default doc;\n";
    insta::assert_snapshot!(lower_esm(source).unwrap().trim_end(), @r#"
    Object.defineProperty(exports, "__esModule", { value: true });
    const doc = `
    export default broken
    `;
    exports.default = doc;
    "#);
}

#[test]
fn test_transform_json_and_text() {
    insta::assert_snapshot!(
        transform(ModuleKind::Json, "{\"a\": 1}\n").unwrap(),
        @r#"module.exports = {"a": 1};"#
    );
    insta::assert_snapshot!(
        transform(ModuleKind::Text, "<p>\"hi\"</p>\n").unwrap(),
        @r#"module.exports = "<p>\"hi\"</p>\n";"#
    );

    let err = transform(ModuleKind::Json, "{").unwrap_err();
    assert!(err.starts_with("invalid JSON"), "{err}");
}

#[test]
fn test_module_kind_detect() {
    let text = [".html".to_string()];
    assert_eq!(ModuleKind::detect(Path::new("a/b.json"), &text), ModuleKind::Json);
    assert_eq!(ModuleKind::detect(Path::new("a/t.html"), &text), ModuleKind::Text);
    assert_eq!(ModuleKind::detect(Path::new("a/x.jsx"), &text), ModuleKind::Script);
    assert_eq!(ModuleKind::detect(Path::new("a/README"), &text), ModuleKind::Script);
}

// --- resolve ---

#[test]
fn test_resolver_candidates() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let app = write(root, "src/app.js", "");
    let util = write(root, "src/util.js", "");
    let index = write(root, "src/lib/index.js", "");
    let data = write(root, "src/data.json", "{}");
    let main = write(root, "node_modules/lodash/lib/lodash.js", "");
    write(root, "node_modules/lodash/package.json", r#"{"main": "lib/lodash.js"}"#);
    let plain = write(root, "node_modules/plain/index.js", "");

    let mut externals = BTreeMap::new();
    externals.insert("xmlhttprequest".to_string(), "{}".to_string());
    let options = BundleOptions::builder()
        .with_root(root)
        .with_entry("src/app.js")
        .with_output("www/app.js")
        .with_externals(externals)
        .build();
    let resolver = Resolver::new(&options);

    let file = |p: &PathBuf| Some(ModuleId::File(p.clone()));
    assert_eq!(resolver.resolve(&app, "./util"), file(&util));
    assert_eq!(resolver.resolve(&app, "./util.js"), file(&util));
    assert_eq!(resolver.resolve(&app, "./lib"), file(&index));
    assert_eq!(resolver.resolve(&app, "./data.json"), file(&data));
    assert_eq!(resolver.resolve(&index, "../util"), file(&util));
    assert_eq!(resolver.resolve(&index, "/src/util"), file(&util));
    assert_eq!(resolver.resolve(&app, "lodash"), file(&main));
    assert_eq!(resolver.resolve(&app, "plain"), file(&plain));
    assert_eq!(
        resolver.resolve(&app, "xmlhttprequest"),
        Some(ModuleId::External("xmlhttprequest".to_string()))
    );
    assert_eq!(resolver.resolve(&app, "./missing"), None);
    assert_eq!(resolver.resolve(&app, "missing-package"), None);
}

// --- build ---

#[test]
fn test_build_single_module_has_one_record() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(root, "src/app.js", "console.log(\"hi\");\n");

    let builder = BundleBuilder::new(options(root));
    let artifact = builder.build(&entry).unwrap();

    assert_eq!(artifact.modules, 1);
    assert_eq!(artifact.path, root.join("www/app.js"));

    let text = fs::read_to_string(&artifact.path).unwrap();
    assert_eq!(artifact.size, text.len() as u64);
    insta::assert_snapshot!(records(&text), @r#"
      __modules[0] = ["src/app.js", function (require, module, exports) {
    console.log("hi");
      }, {}];
      __load(0);
    })();
    "#);
}

#[test]
fn test_build_diamond_shared_dependency_once() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(root, "src/app.js", "var a = require(\"./a\");\nvar b = require(\"./b\");\n");
    write(root, "src/a.js", "module.exports = require(\"./shared\") + 1;\n");
    write(root, "src/b.js", "module.exports = require(\"./shared\") + 2;\n");
    write(root, "src/shared.js", "module.exports = 40;\n");

    let artifact = BundleBuilder::new(options(root)).build(&entry).unwrap();
    assert_eq!(artifact.modules, 4);

    let text = fs::read_to_string(&artifact.path).unwrap();
    insta::assert_snapshot!(records(&text), @r#"
      __modules[0] = ["src/shared.js", function (require, module, exports) {
    module.exports = 40;
      }, {}];
      __modules[1] = ["src/a.js", function (require, module, exports) {
    module.exports = require("./shared") + 1;
      }, {"./shared": 0}];
      __modules[2] = ["src/b.js", function (require, module, exports) {
    module.exports = require("./shared") + 2;
      }, {"./shared": 0}];
      __modules[3] = ["src/app.js", function (require, module, exports) {
    var a = require("./a");
    var b = require("./b");
      }, {"./a": 1, "./b": 2}];
      __load(3);
    })();
    "#);
}

#[test]
fn test_build_externals_json_and_text_modules() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(
        root,
        "src/app.js",
        "import XHR from \"xmlhttprequest\";\nvar cfg = require(\"./config.json\");\nvar tpl = require(\"./tpl.html\");\n",
    );
    write(root, "src/config.json", "{\"api\": \"/v1\"}");
    write(root, "src/tpl.html", "<b>hi</b>");

    let mut externals = BTreeMap::new();
    externals.insert(
        "xmlhttprequest".to_string(),
        "{XMLHttpRequest:XMLHttpRequest}".to_string(),
    );
    let options = BundleOptions::builder()
        .with_root(root)
        .with_entry("src/app.js")
        .with_output("www/app.js")
        .with_externals(externals)
        .build();

    let builder = BundleBuilder::new(options);
    let graph = builder.build_graph(&entry).unwrap();
    assert_eq!(graph.len(), 4);

    let external = graph
        .get(&ModuleId::External("xmlhttprequest".to_string()))
        .unwrap();
    assert_eq!(external.kind, ModuleKind::External);

    let text = builder.emit(&graph);
    assert!(text.contains(
        "[\"external:xmlhttprequest\", function (require, module, exports) {\nmodule.exports = {XMLHttpRequest:XMLHttpRequest};\n"
    ));
    assert!(text.contains("module.exports = {\"api\": \"/v1\"};"));
    assert!(text.contains("module.exports = \"<b>hi</b>\";"));
    assert!(text.ends_with("  __load(3);\n})();\n"));
}

#[test]
fn test_build_unresolved_specifier_names_module() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(root, "src/app.js", "require(\"./missing\");\n");

    let err = BundleBuilder::new(options(root)).build(&entry).unwrap_err();
    assert!(matches!(err, BundleError::Unresolved { ref specifier, .. } if specifier == "./missing"));
    assert_eq!(err.module(), entry);
    assert!(!root.join("www/app.js").exists());
}

#[test]
fn test_build_ignores_require_in_comment_and_string() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(
        root,
        "src/app.js",
        "var x = 1; // was: require('./old')\nconsole.log(\"call require('./gone') to load\");\n",
    );

    let artifact = BundleBuilder::new(options(root)).build(&entry).unwrap();
    assert_eq!(artifact.modules, 1);
}

#[test]
fn test_build_missing_entry_is_read_error() {
    let temp = TempDir::new().unwrap();
    let entry = temp.path().join("src/app.js");

    let err = BundleBuilder::new(options(temp.path()))
        .build(&entry)
        .unwrap_err();
    assert!(matches!(err, BundleError::Read { .. }));
    assert_eq!(err.module(), entry);
}

#[test]
fn test_build_failure_keeps_previous_artifact() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(root, "src/app.js", "require(\"./data.json\");\n");
    write(root, "src/data.json", "{\"ok\": true}");

    let builder = BundleBuilder::new(options(root));
    let artifact = builder.build(&entry).unwrap();
    let before = fs::read(&artifact.path).unwrap();

    let data = write(root, "src/data.json", "{\"ok\": ");
    let err = builder.build(&entry).unwrap_err();
    assert!(matches!(err, BundleError::Transform { .. }));
    assert_eq!(err.module(), data);
    assert_eq!(fs::read(&artifact.path).unwrap(), before);
}

#[test]
fn test_graph_prune_and_watch_dirs() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let entry = write(root, "src/app.js", "require(\"./lib/a\");\n");
    write(root, "src/lib/a.js", "module.exports = 1;\n");

    let builder = BundleBuilder::new(options(root));
    let mut graph = builder.build_graph(&entry).unwrap();
    insta::assert_debug_snapshot!(
        graph
            .watch_dirs()
            .iter()
            .map(|d| builder.options().relative(d))
            .collect::<Vec<_>>(),
        @r#"
    [
        "src",
        "src/lib",
    ]
    "#
    );

    write(root, "src/app.js", "module.exports = 0;\n");
    let reloaded = builder
        .load_module(&ModuleId::File(entry.clone()))
        .unwrap();
    graph.insert(reloaded);

    let pruned = graph.prune();
    assert_eq!(pruned, [ModuleId::File(root.join("src/lib/a.js"))]);
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_artifact_display() {
    let artifact = BundleArtifact {
        path: PathBuf::from("www/js/app.js"),
        size: 10,
        modules: 1,
        duration: Duration::from_millis(120),
    };
    insta::assert_snapshot!(artifact.to_string(), @"app.js built in 0.12s");
}

#[test]
fn test_options_from_config() {
    let options = BundleOptions::from_config(&Config::default());
    insta::assert_debug_snapshot!(
        (options.entry(), options.output(), options.externals()),
        @r#"
    (
        "src/js/app.js",
        "www/js/app.js",
        {
            "xmlhttprequest": "{XMLHttpRequest:XMLHttpRequest}",
        },
    )
    "#
    );
}
