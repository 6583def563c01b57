use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use apidecl::{
    generate_go_bindings, generate_go_bindings_from_path, GenOptions, LiteralPolicy,
};

const ELECTRON_API: &str = include_str!("fixtures/electron-api.json");

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "apidecl_go_codegen_{}_{}_{}",
            prefix,
            std::process::id(),
            stamp
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn write(&self, file: &str, content: &str) {
        fs::write(self.path.join(file), content).expect("write temp file");
    }

    fn file_path(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

fn no_docs() -> GenOptions {
    GenOptions {
        docs: false,
        ..GenOptions::default()
    }
}

#[test]
fn generate_module_declarations() {
    let rendered = generate_go_bindings(ELECTRON_API, &no_docs()).unwrap().text;

    assert!(rendered.contains(concat!(
        "\nconst (\n",
        "\tEvtAppWillFinishLaunching = \"will-finish-launching\"\n",
        "\tEvtAppBeforeQuit = \"before-quit\"\n",
        "\tEvtAppOpenURL = \"open-url\"\n",
        ")\n"
    )));
    assert!(rendered.contains(concat!(
        "\ntype AppModule struct {\n",
        "\tHostHandle *js.Object\n",
        "\tCommandLine AppCommandLine `js:\"commandLine\"`\n",
        "\tDock AppDock `js:\"dock\"`\n",
        "\tQuit func() `js:\"quit\"`\n",
        "\tGetPath func(Name AppGetPathName,) (Obj string) `js:\"getPath\"`\n",
        "\tSetBadgeCount func(Count int64,) (Obj bool) `js:\"setBadgeCount\"`\n",
        "\tImportCertificate func(Options AppImportCertificateOptions, Callback AppImportCertificateCallback,) `js:\"importCertificate\"`\n",
        "}\n"
    )));
}

#[test]
fn nested_declarations_follow_in_discovery_order() {
    let rendered = generate_go_bindings(ELECTRON_API, &no_docs()).unwrap().text;

    let order = [
        "type AppModule struct",
        "type AppCommandLine struct",
        "type AppDock struct",
        "type AppGetPathName string",
        "type AppImportCertificateOptions struct",
        "type AppImportCertificateCallback func(Result int64,)",
        "type AppCommandLineAppendSwitch func()",
        "type BrowserWindow struct",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|needle| rendered.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

    assert!(rendered.contains(concat!(
        "\tAppGetPathNameHome AppGetPathName = \"home\"\n",
        "\tAppGetPathNameAppData AppGetPathName = \"appData\"\n",
        "\tAppGetPathNameTemp AppGetPathName = \"temp\"\n",
    )));
    assert!(rendered.contains("\tCertificate string `js:\"certificate\"`\n"));
}

#[test]
fn generate_class_declarations_from_instance_members() {
    let rendered = generate_go_bindings(ELECTRON_API, &no_docs()).unwrap().text;

    assert!(rendered.contains("\tEvtBrowserWindowClose = \"close\"\n"));
    assert!(rendered.contains("\tEvtBrowserWindowReadyToShow = \"ready-to-show\"\n"));
    assert!(rendered.contains(concat!(
        "\ntype BrowserWindow struct {\n",
        "\tHostHandle *js.Object\n",
        "\tId int64 `js:\"id\"`\n",
        "\tWebContents *js.Object `js:\"webContents\"`\n",
        "\tLoadURL func(URL string, Options BrowserWindowLoadURLOptions,) `js:\"loadURL\"`\n",
        "\tGetBounds func() (Obj *js.Object) `js:\"getBounds\"`\n",
        "}\n"
    )));
    assert!(rendered.contains("\tHttpReferrer string `js:\"httpReferrer\"`\n"));
    assert!(!rendered.contains("BrowserWindowStatic"));
}

#[test]
fn lower_statics_adds_constructor_struct() {
    let options = GenOptions {
        lower_statics: true,
        ..no_docs()
    };
    let rendered = generate_go_bindings(ELECTRON_API, &options).unwrap().text;

    assert!(rendered.contains(concat!(
        "type BrowserWindowStatic struct {\n",
        "\tHostHandle *js.Object\n",
        "\tNew func(Options BrowserWindowNewOptions,) (Obj *BrowserWindow)\n",
        "\tGetAllWindows func() (Obj *js.Object) `js:\"getAllWindows\"`\n",
        "}\n"
    )));
    assert!(rendered.contains("type BrowserWindowNewOptions struct"));
    assert!(rendered.contains("type BrowserWindowNewOptionsTitleBarStyle string"));
    assert!(rendered.contains("\tBackgroundColor string `js:\"backgroundColor\"`\n"));
}

#[test]
fn generate_structure_block() {
    let rendered = generate_go_bindings(ELECTRON_API, &no_docs()).unwrap().text;
    assert!(rendered.contains(concat!(
        "\ntype Rectangle struct {\n",
        "\tHostHandle *js.Object\n",
        "\tX float64 `js:\"x\"`\n",
        "\tY float64 `js:\"y\"`\n",
        "\tWidth float64 `js:\"width\"`\n",
        "\tHeight float64 `js:\"height\"`\n",
        "}\n"
    )));
}

#[test]
fn docs_render_descriptions_platforms_and_payloads() {
    let rendered = generate_go_bindings(ELECTRON_API, &GenOptions::default())
        .unwrap()
        .text;
    assert!(rendered.contains(
        "// Control your application's event lifecycle.\n// Process: main\ntype AppModule struct {\n"
    ));
    assert!(rendered.contains(concat!(
        "\t// Platforms: macOS\n",
        "\t// Returns:\n",
        "\t//   event Event\n",
        "\t//   url String\n",
        "\tEvtAppOpenURL = \"open-url\"\n"
    )));
    assert!(rendered.contains("\t// User's home directory.\n\tAppGetPathNameHome"));
}

#[test]
fn embed_handle_uses_anonymous_field() {
    let options = GenOptions {
        embed_handle: true,
        ..no_docs()
    };
    let rendered = generate_go_bindings(ELECTRON_API, &options).unwrap().text;
    assert!(rendered.contains("type Rectangle struct {\n\t*js.Object\n\tX float64"));
    assert!(!rendered.contains("HostHandle"));
}

#[test]
fn distinct_anonymous_objects_get_distinct_type_names() {
    let schema = r#"[
      {
        "name": "dialog",
        "type": "Module",
        "methods": [
          { "name": "show", "parameters": [
              { "type": "Object", "properties": [{ "name": "title", "type": "String" }] },
              { "type": "Object", "properties": [{ "name": "modal", "type": "Boolean" }] }
          ] }
        ]
      }
    ]"#;
    let rendered = generate_go_bindings(schema, &no_docs()).unwrap().text;

    assert!(rendered.contains("\tShow func(Obj DialogShowObj, Obj2 DialogShowObj2,) `js:\"show\"`\n"));
    assert!(rendered.contains("type DialogShowObj struct {\n\tHostHandle *js.Object\n\tTitle string"));
    assert!(rendered.contains("type DialogShowObj2 struct {\n\tHostHandle *js.Object\n\tModal bool"));
}

#[test]
fn repeated_identical_shape_is_declared_once() {
    let schema = r#"[
      {
        "name": "screen",
        "type": "Module",
        "methods": [
          { "name": "distance", "parameters": [
              { "name": "point", "type": "Object", "description": "Start.",
                "properties": [{ "name": "x", "type": "Integer" }] },
              { "name": "point", "type": "Object", "description": "End.",
                "properties": [{ "name": "x", "type": "Integer" }] }
          ] }
        ],
        "properties": [
          { "name": "cursor", "type": "Object", "properties": [{ "name": "point", "type": "Object",
              "properties": [{ "name": "x", "type": "Integer" }] }] }
        ]
      }
    ]"#;
    let rendered = generate_go_bindings(schema, &no_docs()).unwrap().text;
    assert!(rendered
        .contains("\tDistance func(Point ScreenDistancePoint, Point2 ScreenDistancePoint,) `js:\"distance\"`\n"));
    assert_eq!(rendered.matches("type ScreenDistancePoint struct").count(), 1);
    assert!(!rendered.contains("ScreenDistancePoint2"));
    assert!(rendered.contains("type ScreenCursorPoint struct"));
}

#[test]
fn blocks_sharing_a_scope_declare_each_name_once() {
    let schema = r#"[
      { "name": "app", "type": "Module",
        "events": [{ "name": "ready" }],
        "properties": [{ "name": "settings", "type": "Object",
                         "properties": [{ "name": "theme", "type": "String" }] }] },
      { "name": "App", "type": "Class",
        "instanceEvents": [{ "name": "ready" }],
        "instanceProperties": [{ "name": "settings", "type": "Object",
                                 "properties": [{ "name": "zoom", "type": "Number" }] }] },
      { "name": "Point", "type": "Structure", "properties": [{ "name": "x", "type": "Number" }] },
      { "name": "point", "type": "Structure", "properties": [{ "name": "y", "type": "Number" }] }
    ]"#;
    let rendered = generate_go_bindings(schema, &no_docs()).unwrap().text;

    for name in ["AppModule", "App", "AppSettings", "AppSettings2", "Point", "Point2"] {
        let decl = format!("type {name} struct {{");
        assert_eq!(rendered.matches(&decl).count(), 1, "{name}");
    }
    for name in ["EvtAppReady", "EvtAppReady2"] {
        assert_eq!(rendered.matches(&format!("\t{name} = ")).count(), 1, "{name}");
    }
    assert!(rendered.contains("type AppSettings2 struct {\n\tHostHandle *js.Object\n\tZoom float64"));
    assert!(rendered.contains("type Point2 struct {\n\tHostHandle *js.Object\n\tY float64"));
}

#[test]
fn malformed_type_falls_back_to_handle_type() {
    let schema = r#"[
      { "name": "Thing", "type": "Structure",
        "properties": [{ "name": "weird", "type": { "oops": true } },
                       { "name": "empty", "type": [] }] }
    ]"#;
    let generated = generate_go_bindings(schema, &no_docs()).unwrap();
    assert!(generated.text.contains("\tWeird *js.Object `js:\"weird\"`\n"));
    assert!(generated.text.contains("\tEmpty *js.Object `js:\"empty\"`\n"));
    assert_eq!(generated.report.warnings.len(), 2);
    assert!(generated.report.warnings[0].starts_with("Thing: property 'weird'"));
}

#[test]
fn suspicious_event_literal_is_passed_through_leniently() {
    let schema = r#"[
      { "name": "screen", "type": "Module",
        "events": [{ "name": "display-added" }, { "name": "display-remmetrics changedoved" }] }
    ]"#;
    let generated = generate_go_bindings(schema, &no_docs()).unwrap();
    assert!(generated
        .text
        .contains("\tEvtScreenDisplayRemmetricsChangedoved = \"display-remmetrics changedoved\"\n"));
    assert!(generated.report.is_clean());
    assert_eq!(generated.report.warnings.len(), 1);

    let strict = GenOptions {
        literal_policy: LiteralPolicy::Strict,
        ..no_docs()
    };
    let generated = generate_go_bindings(schema, &strict).unwrap();
    assert!(!generated.text.contains("ScreenModule"));
    assert_eq!(generated.report.failed.len(), 1);
    assert_eq!(generated.report.failed[0].block, "screen");
}

#[test]
fn generate_go_file_from_path() {
    let dir = TempDir::new("from_path");
    dir.write("electron-api.json", ELECTRON_API);
    let out_dir = dir.file_path("out");

    let (path, report) =
        generate_go_bindings_from_path(dir.file_path("electron-api.json"), &out_dir, &no_docs())
            .unwrap();

    assert_eq!(path, out_dir.join("electron-api.go"));
    assert_eq!(report.generated, vec!["app", "BrowserWindow", "Rectangle"]);
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("// Code generated by apidecl from "));
    assert!(written.contains("\npackage electronapi\n"));
    assert!(written.contains("type AppModule struct"));
    assert!(written.contains("type Rectangle struct"));
}

#[test]
fn unreadable_schema_is_an_error() {
    let dir = TempDir::new("bad");
    dir.write("broken.json", "{ not json");
    let err = generate_go_bindings_from_path(dir.file_path("broken.json"), dir.file_path("out"), &no_docs())
        .unwrap_err();
    assert!(err.to_string().contains("schema parse error"));
    assert!(!dir.file_path("out").join("broken.go").exists());
}
