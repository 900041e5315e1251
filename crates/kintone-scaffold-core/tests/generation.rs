//! End-to-end generation: local schemas in, project files out

use kintone_scaffold_core::codegen::project::{
    field_code_file, field_type_file, generate_project, ProjectSpec,
};
use kintone_scaffold_core::codegen::{
    synthesize_event_types, synthesize_identifier_table, synthesize_record_type, Language,
    ScriptOptions,
};
use kintone_scaffold_core::kintone::{AppRef, FieldDescriptor, Schema, SchemaSource};
use kintone_scaffold_core::scaffold::write_project;
use std::path::Path;

const APPS_YAML: &str = r#"
apps:
  - appId: "12"
    name: Sales Orders
  - appId: "13"
    name: Customers
"#;

const ORDERS_JSON: &str = r#"{
  "properties": {
    "order_no": { "type": "RECORD_NUMBER", "code": "order_no", "label": "Order No" },
    "customer": { "type": "SINGLE_LINE_TEXT", "code": "customer", "label": "Customer" },
    "status": { "type": "STATUS", "code": "status", "label": "Status" },
    "lines": {
      "type": "SUBTABLE",
      "code": "lines",
      "label": "Lines",
      "fields": {
        "item": { "type": "SINGLE_LINE_TEXT", "code": "item", "label": "Item" },
        "qty": { "type": "NUMBER", "code": "qty", "label": "Qty" }
      }
    },
    "future": { "type": "UNKNOWN_FUTURE_TYPE", "code": "future", "label": "Future" }
  },
  "revision": "7"
}"#;

const CUSTOMERS_YAML: &str = r#"
properties:
  name:
    type: SINGLE_LINE_TEXT
    code: name
    label: Name
"#;

fn schema_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("apps.yaml"), APPS_YAML).unwrap();
    std::fs::write(dir.path().join("12.json"), ORDERS_JSON).unwrap();
    std::fs::write(dir.path().join("13.yaml"), CUSTOMERS_YAML).unwrap();
    dir
}

fn read(dir: &Path, path: &str) -> String {
    std::fs::read_to_string(dir.join(path)).unwrap()
}

#[test]
fn test_identifier_collision_scenario() {
    let schema = Schema::new(vec![
        FieldDescriptor::leaf("text_1", "SINGLE_LINE_TEXT", "Name"),
        FieldDescriptor::leaf("num_1", "NUMBER", "Name"),
    ]);
    let text = synthesize_identifier_table(&schema).render("Fields", Language::TypeScript);
    assert!(text.contains("Name: \"text_1\","));
    assert!(text.contains("Name_0: \"num_1\","));
}

#[test]
fn test_creation_record_drops_category_and_header() {
    let schema = Schema::new(vec![FieldDescriptor::leaf("cat", "CATEGORY", "Category")]);
    let body = synthesize_record_type(&schema, true);
    assert!(!body.contains("cat"));
    assert!(!body.contains("$id"));
    assert!(!body.contains("$revision"));
}

#[test]
fn test_shared_category_emits_one_wrapper() {
    let schema = Schema::new(vec![FieldDescriptor::leaf("t", "SINGLE_LINE_TEXT", "T")]);
    let text = synthesize_event_types(
        &["app.record.detail.show", "mobile.app.record.detail.show"],
        &schema,
    );
    assert_eq!(text.matches("export interface DefaultRecordEvent {").count(), 1);
}

#[test]
fn test_unknown_type_is_omitted() {
    let schema = Schema::new(vec![
        FieldDescriptor::leaf("future", "UNKNOWN_FUTURE_TYPE", "Future"),
        FieldDescriptor::leaf("t", "SINGLE_LINE_TEXT", "T"),
    ]);
    let body = synthesize_record_type(&schema, false);
    assert!(!body.contains("future"));
    assert!(body.contains("t: KintoneRecordField.SingleLineText;"));
}

#[tokio::test]
async fn test_local_source_to_typescript_project() {
    let schemas = schema_dir();
    let source = SchemaSource::local(schemas.path().to_path_buf());

    let apps = source.fetch_apps().await.unwrap();
    assert_eq!(apps.len(), 2);
    let app = apps[0].clone();
    let schema = source.fetch_form_fields(&app).await.unwrap();
    let related_app = apps[1].clone();
    let related_schema = source.fetch_form_fields(&related_app).await.unwrap();
    let related = vec![(related_app, related_schema)];

    let events = vec![
        "app.record.create.submit".to_string(),
        "app.record.index.show".to_string(),
    ];
    let spec = ProjectSpec {
        project_name: "Sales Orders",
        app: &app,
        schema: &schema,
        related: &related,
        events: &events,
        script: ScriptOptions::new(Language::TypeScript, false),
    };

    let out = tempfile::tempdir().unwrap();
    let target = out.path().join(app.dir_name());
    write_project(&target, &generate_project(&spec).unwrap()).await.unwrap();

    for path in [
        "package.json",
        "webpack.config.js",
        ".gitignore",
        "tsconfig.json",
        "src/ts/main.ts",
        "src/ts/lib/types.ts",
    ] {
        assert!(target.join(path).is_file(), "{} missing", path);
    }
    assert!(target.join("css").is_dir());
    assert!(target.join("common").is_dir());
    assert!(!target.join("src/ts/App.tsx").exists());

    let package: serde_json::Value = serde_json::from_str(&read(&target, "package.json")).unwrap();
    assert!(package["scripts"]["build:dev"].is_string());
    assert!(package["scripts"]["build:prod"].is_string());

    let main = read(&target, "src/ts/main.ts");
    assert!(main.contains("kintone.events.on('app.record.create.submit'"));
    assert!(main.contains("kintone.events.on('app.record.index.show'"));

    let types = read(&target, "src/ts/lib/types.ts");
    assert!(types.contains("export type SalesOrders = {"));
    assert!(types.contains("export type Customers = {"));
    assert!(types.contains("export interface CreateRecordEvent {"));
    assert!(types.contains("export interface ListShowEvent {"));
    assert!(types.contains("type: 'SUBTABLE';"));
    assert!(!types.contains("future"));
    // the create wrapper has no computed fields
    let create = types
        .split("export interface CreateRecordEvent {")
        .nth(1)
        .unwrap();
    let create = &create[..create.find("\n}").unwrap()];
    assert!(!create.contains("order_no"));
    assert!(!create.contains("status"));
    assert!(create.contains("customer: KintoneRecordField.SingleLineText;"));
}

#[tokio::test]
async fn test_javascript_react_project_without_events() {
    let app = AppRef::new("5", "Tasks");
    let schema = Schema::new(vec![FieldDescriptor::leaf("title", "SINGLE_LINE_TEXT", "Title")]);
    let spec = ProjectSpec {
        project_name: "tasks",
        app: &app,
        schema: &schema,
        related: &[],
        events: &[],
        script: ScriptOptions::new(Language::JavaScript, true),
    };

    let out = tempfile::tempdir().unwrap();
    write_project(out.path(), &generate_project(&spec).unwrap()).await.unwrap();

    assert!(out.path().join("src/js/main.jsx").is_file());
    assert!(out.path().join("src/js/App.jsx").is_file());
    assert!(!out.path().join("tsconfig.json").exists());
    assert!(!out.path().join("src/ts/lib/types.ts").exists());

    let main = read(out.path(), "src/js/main.jsx");
    assert!(main.contains("kintone.events.on('app.record.index.show'"));
    assert!(main.contains("kintone.events.on('mobile.app.record.index.show'"));
}

#[test]
fn test_tools_files() {
    let app = AppRef::new("12", "Sales Orders");
    let schema = Schema::new(vec![
        FieldDescriptor::leaf("customer", "SINGLE_LINE_TEXT", "Customer"),
        FieldDescriptor::leaf("amount", "NUMBER", "Amount"),
    ]);

    let fields = field_code_file(&app, &schema, Language::JavaScript);
    assert_eq!(fields.path, Path::new("Sales_Orders_fields.js"));
    assert!(fields.contents.starts_with("export const SalesOrdersFields = {"));
    assert!(!fields.contents.contains("as const"));

    let types = field_type_file(&app, &schema);
    assert_eq!(types.path, Path::new("Sales_Orders_types.ts"));
    assert!(types.contents.contains("export type SalesOrders = {"));
    assert!(types.contents.contains("amount: KintoneRecordField.Number;"));
}
