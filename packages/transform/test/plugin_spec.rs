use std::fs;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use typescript_transform::{Options, Plugin, TypeScriptTransform};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn id(root: &Path, relative: &str) -> String {
    root.join(relative).to_string_lossy().replace('\\', "/")
}

#[test]
fn compiles_with_an_ancestor_configuration() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/tsconfig.json", r#"{"compilerOptions":{"target":"es5"}}"#);
    let plugin = TypeScriptTransform::new(Options::default()).unwrap();
    plugin.build_start();

    let output = plugin
        .transform("const f = () => 1;", &id(dir.path(), "src/a/x.ts"))
        .unwrap()
        .unwrap();

    assert!(!output.code.contains("=>"), "{}", output.code);
    assert!(output.code.contains("function"), "{}", output.code);
}

#[test]
fn missing_explicit_location_fails_every_module_until_the_next_build() {
    let dir = TempDir::new().unwrap();
    let location = id(dir.path(), "missing/tsconfig.json");
    let options = Options::from_value(json!({ "tsconfig": { "location": location } })).unwrap();
    let plugin = TypeScriptTransform::new(options).unwrap();
    plugin.build_start();

    for module in ["src/a.ts", "src/b.ts", "lib/c.ts"] {
        let module_id = id(dir.path(), module);
        let err = plugin.transform("let a = 1;", &module_id).unwrap_err();
        assert_eq!(err.message, format!("Cannot read file '{}'.", location));
        assert_eq!(err.id, module_id);
    }
    assert!(plugin.cache().is_empty());

    write(dir.path(), "missing/tsconfig.json", r#"{ "compilerOptions": {} }"#);
    plugin.build_start();
    assert!(plugin.transform("let a = 1;", &id(dir.path(), "src/a.ts")).unwrap().is_some());
}

#[test]
fn excluded_modules_need_no_configuration() {
    let dir = TempDir::new().unwrap();
    let options = Options::from_value(json!({
        "filter": { "files": { "exclude": "**/vendor/**" } }
    }))
    .unwrap();
    let plugin = TypeScriptTransform::new(options).unwrap();

    let outcome = plugin.transform("let a: number = 1;", &id(dir.path(), "vendor/lib.ts"));
    assert_eq!(outcome, Ok(None));
}

#[test]
fn overrides_reach_the_compiler() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tsconfig.json", r#"{ "compilerOptions": { "target": "es5" } }"#);
    let options = Options::from_value(json!({
        "tsconfig": { "override": { "target": "es2020", "sourceMap": true } }
    }))
    .unwrap();
    let plugin = TypeScriptTransform::new(options).unwrap();

    let output = plugin
        .transform("export const f = (a: number) => a * 2;", &id(dir.path(), "a.ts"))
        .unwrap()
        .unwrap();

    assert!(output.code.contains("=>"));
    assert!(!output.code.contains(": number"));
    assert!(output.map.is_some());
}

#[test]
fn syntax_errors_are_reported_for_the_module() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tsconfig.json", "{}");
    let plugin = TypeScriptTransform::new(Options::default()).unwrap();
    let module_id = id(dir.path(), "bad.ts");

    let err = plugin.transform("const = ;", &module_id).unwrap_err();

    assert_eq!(err.id, module_id);
    assert!(err.message.starts_with(&format!("Failed to compile {}", module_id)));
}

#[test]
fn parallel_transforms_share_one_resolution_per_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "tsconfig.json", r#"{ "compilerOptions": { "target": "es2015" } }"#);
    let plugin = Arc::new(TypeScriptTransform::new(Options::default()).unwrap());
    plugin.build_start();

    let modules: Vec<String> = (0..32)
        .map(|i| id(dir.path(), &format!("src/m{}.ts", i)))
        .collect();
    let outputs: Vec<_> = modules
        .par_iter()
        .map(|module| plugin.transform("export const x: number = 1;", module))
        .collect();

    assert!(outputs.iter().all(|output| matches!(output, Ok(Some(_)))));
    assert_eq!(plugin.cache().len(), 1);
}
