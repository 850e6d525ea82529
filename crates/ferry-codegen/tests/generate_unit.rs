// Integration tests for whole-unit generation from package manifests

use expect_test::expect;
use ferry_codegen::{generate_unit, CodegenConfig, CodegenError, GeneratedUnit, SymbolKind, Target};
use ferry_types::{Inventory, PrimitiveKind, TypeDescriptor};

const SHAPES: &str = r#"
[package]
name = "shapes"
namespace = "crate::shapes"

[[function]]
name = "area"
params = [{ name = "shape", type = "Circle" }]
results = ["f64"]

[[function]]
name = "grow"
params = [{ name = "shape", type = "*mut Circle" }, { name = "by", type = "f64" }]

[[function]]
name = "radii"
params = [{ name = "shapes", type = "Vec<Circle>" }]
results = ["Vec<f64>"]
"#;

fn shapes_unit() -> GeneratedUnit {
    let inventory = Inventory::from_toml_str(SHAPES).expect("manifest should load");
    let config = CodegenConfig::from_settings(&inventory.codegen).expect("default settings");
    generate_unit(&inventory, &config).expect("unit should generate")
}

fn listing(unit: &GeneratedUnit) -> String {
    unit.exports()
        .iter()
        .map(|signature| format!("{}\n", signature))
        .collect()
}

#[test]
fn test_export_listing() {
    let unit = shapes_unit();
    expect![[r#"
        ferry_initialize()
        ferry_acquire(handle: handle) -> handle
        ferry_release(handle: handle)
        ferry_text_free(text: text)
        ferry_fn_shapes__area(shape: handle) -> f64
        ferry_fn_shapes__grow(shape: handle, by: f64)
        ferry_fn_shapes__radii(shapes: handle) -> handle
        ferry_slice_of_shapes__Circle_new() -> handle
        ferry_slice_of_shapes__Circle_str(handle: handle) -> text
        ferry_slice_of_shapes__Circle_destroy(handle: handle)
        ferry_slice_of_shapes__Circle_item(handle: handle, index: usize) -> handle
        ferry_slice_of_shapes__Circle_item_set(handle: handle, index: usize, value: handle)
        ferry_slice_of_shapes__Circle_item_append(handle: handle, value: handle)
        ferry_slice_of_f64_new() -> handle
        ferry_slice_of_f64_str(handle: handle) -> text
        ferry_slice_of_f64_destroy(handle: handle)
        ferry_slice_of_f64_item(handle: handle, index: usize) -> f64
        ferry_slice_of_f64_item_set(handle: handle, index: usize, value: f64)
        ferry_slice_of_f64_item_append(handle: handle, value: f64)
    "#]]
    .assert_eq(&listing(&unit));
}

#[test]
fn test_unit_source_parses() {
    let unit = shapes_unit();
    let file = syn::parse_file(&unit.to_source()).expect("generated source should parse");

    let functions = file
        .items
        .iter()
        .filter(|item| matches!(item, syn::Item::Fn(_)))
        .count();
    assert_eq!(functions, unit.exports().len());
    let statics = file
        .items
        .iter()
        .filter(|item| matches!(item, syn::Item::Static(_)))
        .count();
    assert_eq!(statics, 1);
}

#[test]
fn test_formatted_source_parses() {
    // Falls back to the unformatted source when rustfmt is missing.
    let unit = shapes_unit();
    let formatted = unit.to_formatted_source();
    assert!(formatted.starts_with("// Generated by ferry for package `shapes`"));
    syn::parse_file(&formatted).expect("formatted source should parse");
}

#[test]
fn test_every_symbol_is_scalar_or_handle() {
    let unit = shapes_unit();
    for signature in unit.exports() {
        if signature.kind == SymbolKind::Function {
            assert!(signature.source.as_deref().unwrap_or("").starts_with("crate::shapes::"));
        }
    }
    assert_eq!(
        unit.element_types(),
        [
            TypeDescriptor::named("crate::shapes", "Circle"),
            TypeDescriptor::Primitive(PrimitiveKind::F64)
        ]
    );
}

#[test]
fn test_duplicate_element_types_share_one_bundle() {
    let manifest = r#"
[package]
name = "stats"

[[function]]
name = "sum"
params = [{ name = "values", type = "Vec<i64>" }]
results = ["i64"]

[[function]]
name = "range"
params = [{ name = "n", type = "i64" }]
results = ["[i64]"]
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    let unit = generate_unit(&inventory, &CodegenConfig::default()).unwrap();
    let new_count = unit
        .exports()
        .iter()
        .filter(|signature| signature.symbol == "ferry_slice_of_i64_new")
        .count();
    assert_eq!(new_count, 1);
    assert_eq!(unit.element_types().len(), 1);
}

#[test]
fn test_export_table_toml() {
    let unit = shapes_unit();
    let table = unit.export_table().unwrap();
    let parsed: toml::Value = toml::from_str(&table).expect("export table should be valid TOML");
    assert_eq!(parsed["package"].as_str(), Some("shapes"));
    assert_eq!(parsed["target"].as_str(), Some("c-abi"));

    let symbols = parsed["symbol"].as_array().unwrap();
    assert_eq!(symbols.len(), unit.exports().len());
    let area = &symbols[4];
    assert_eq!(area["symbol"].as_str(), Some("ferry_fn_shapes__area"));
    assert_eq!(area["kind"].as_str(), Some("function"));
    assert_eq!(area["source"].as_str(), Some("crate::shapes::area"));
    assert_eq!(area["results"][0].as_str(), Some("f64"));
}

#[test]
fn test_symbol_collision_aborts_unit() {
    let manifest = r#"
[package]
name = "clash"

[[function]]
name = "c"
namespace = "crate::a__b"

[[function]]
name = "b__c"
namespace = "crate::a"
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    match generate_unit(&inventory, &CodegenConfig::default()) {
        Err(CodegenError::SymbolCollision { symbol, .. }) => assert_eq!(symbol, "ferry_fn_a__b__c"),
        other => panic!("expected a symbol collision, got {:?}", other.map(|unit| unit.exports().len())),
    }
}

#[test]
fn test_unsupported_type_aborts_unit() {
    let manifest = r#"
[package]
name = "bad"

[[function]]
name = "ok"
results = ["i32"]

[[function]]
name = "deref"
results = ["*mut *mut u8"]
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    let err = generate_unit(&inventory, &CodegenConfig::default())
        .err()
        .expect("generation should fail");
    assert!(matches!(err, CodegenError::UnsupportedResult { ref function, .. } if function == "crate::deref"));
}

#[test]
fn test_unknown_target_from_manifest() {
    let manifest = r#"
[package]
name = "py"

[codegen]
target = "py3"
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    assert!(matches!(
        CodegenConfig::from_settings(&inventory.codegen),
        Err(CodegenError::UnknownTarget(name)) if name == "py3"
    ));
    assert!(Target::parse("c-abi").is_ok());
}

#[test]
fn test_prefix_from_manifest() {
    let manifest = r#"
[package]
name = "geo"
namespace = "crate::geo"

[[function]]
name = "norm"
params = [{ name = "v", type = "Vec<f32>" }]
results = ["f32"]

[codegen]
prefix = "geo"
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    let config = CodegenConfig::from_settings(&inventory.codegen).unwrap();
    let unit = generate_unit(&inventory, &config).unwrap();
    assert!(unit.exports().iter().all(|signature| signature.symbol.starts_with("geo_")));
    assert!(unit
        .exports()
        .iter()
        .any(|signature| signature.symbol == "geo_slice_of_f32_item_append"));
}

#[test]
fn test_param_shadowing_registry_aborts_unit() {
    let manifest = r#"
[package]
name = "shadow"

[[function]]
name = "f"
params = [{ name = "REGISTRY", type = "i64" }]
results = ["i64"]
"#;
    let inventory = Inventory::from_toml_str(manifest).unwrap();
    match generate_unit(&inventory, &CodegenConfig::default()) {
        Err(CodegenError::ParamShadowsRegistry { function, param, .. }) => {
            assert_eq!(function, "crate::f");
            assert_eq!(param, "REGISTRY");
        }
        other => panic!("expected a shadowing error, got {:?}", other.map(|unit| unit.exports().len())),
    }
}
