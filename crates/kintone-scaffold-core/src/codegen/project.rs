//! Project files for a kintone customization
//!
//! Produces the full set of files for a new project (build configuration,
//! starter event handlers, type declarations) plus the standalone files
//! written by the tools mode.

use super::event::{event_categories, synthesize_event_types};
use super::field_type::RECORD_FIELD_NAMESPACE;
use super::identifier::synthesize_identifier_table;
use super::record::record_type_alias;
use super::{indent, render_key, Language, ScriptOptions};
use crate::kintone::app::AppRef;
use crate::kintone::events::{event_category, is_mobile_event, EventCategory, DEFAULT_EVENTS};
use crate::kintone::schema::Schema;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Empty directories every project starts with
pub const PROJECT_DIRECTORIES: &[&str] = &["css", "common"];

/// A file to be written, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Files and empty directories of a generated project
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    pub files: Vec<GeneratedFile>,
    pub directories: Vec<PathBuf>,
}

impl GeneratedProject {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == PathBuf::from(path))
    }
}

/// Packages to install into a generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependencies {
    pub runtime: Vec<&'static str>,
    pub dev: Vec<&'static str>,
}

/// Everything the project generator needs
#[derive(Debug, Clone)]
pub struct ProjectSpec<'a> {
    pub project_name: &'a str,
    pub app: &'a AppRef,
    pub schema: &'a Schema,
    pub related: &'a [(AppRef, Schema)],
    pub events: &'a [String],
    pub script: ScriptOptions,
}

impl ProjectSpec<'_> {
    /// Selected events, or the default list events when nothing was selected
    pub fn effective_events(&self) -> Vec<String> {
        if self.events.is_empty() {
            DEFAULT_EVENTS.iter().map(|e| e.to_string()).collect()
        } else {
            self.events.to_vec()
        }
    }
}

/// Generate every file of a new project
pub fn generate_project(spec: &ProjectSpec<'_>) -> serde_json::Result<GeneratedProject> {
    let script = spec.script;
    let events = spec.effective_events();
    let code_dir = script.code_dir();

    let mut files = vec![
        GeneratedFile::new("package.json", package_json(spec.project_name)?),
        GeneratedFile::new(
            "webpack.config.js",
            webpack_config(&spec.app.dir_name(), script),
        ),
        GeneratedFile::new(".gitignore", gitignore()),
        GeneratedFile::new(script.entry_path(), main_code(&events, script)),
    ];

    if script.react {
        let component = format!("{}/App.{}", code_dir, script.extension());
        files.push(GeneratedFile::new(component, app_component(spec.app)));
    }

    if script.language.is_typescript() {
        files.push(GeneratedFile::new("tsconfig.json", tsconfig(script.react)?));
        files.push(GeneratedFile::new(
            format!("{}/lib/types.ts", code_dir),
            types_file(spec.app, spec.schema, spec.related, &events),
        ));
    }

    tracing::debug!(files = files.len(), "generated project files");

    Ok(GeneratedProject {
        files,
        directories: PROJECT_DIRECTORIES.iter().map(PathBuf::from).collect(),
    })
}

/// npm only accepts lowercase, URL-safe package names
pub fn npm_package_name(project_name: &str) -> String {
    let name: String = project_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let name = name.trim_matches(|c| matches!(c, '-' | '.' | '_'));

    if name.is_empty() {
        "kintone-customization".to_string()
    } else {
        name.to_string()
    }
}

#[derive(Serialize)]
struct PackageJson<'a> {
    name: String,
    version: &'a str,
    description: &'a str,
    private: bool,
    scripts: Scripts<'a>,
}

#[derive(Serialize)]
struct Scripts<'a> {
    test: &'a str,
    #[serde(rename = "build:dev")]
    build_dev: &'a str,
    #[serde(rename = "build:prod")]
    build_prod: &'a str,
}

/// `package.json` with the webpack build scripts
pub fn package_json(project_name: &str) -> serde_json::Result<String> {
    let package = PackageJson {
        name: npm_package_name(project_name),
        version: "1.0.0",
        description: "",
        private: true,
        scripts: Scripts {
            test: "echo \"Error: no test specified\" && exit 1",
            build_dev: "webpack --mode=development --devtool eval-source-map --output-pathinfo --watch",
            build_prod: "webpack --mode=production",
        },
    };
    let mut json = serde_json::to_string_pretty(&package)?;
    json.push('\n');
    Ok(json)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    target: &'static str,
    module: &'static str,
    module_resolution: &'static str,
    lib: Vec<&'static str>,
    strict: bool,
    es_module_interop: bool,
    skip_lib_check: bool,
    no_emit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    jsx: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TsConfig {
    compiler_options: CompilerOptions,
    files: Vec<&'static str>,
    include: Vec<&'static str>,
}

/// `tsconfig.json`; pulls in the `kintone` global from `@kintone/dts-gen`
pub fn tsconfig(react: bool) -> serde_json::Result<String> {
    let config = TsConfig {
        compiler_options: CompilerOptions {
            target: "ES2020",
            module: "ESNext",
            module_resolution: "node",
            lib: vec!["DOM", "ES2020"],
            strict: true,
            es_module_interop: true,
            skip_lib_check: true,
            no_emit: true,
            jsx: react.then_some("react-jsx"),
        },
        files: vec!["node_modules/@kintone/dts-gen/kintone.d.ts"],
        include: vec!["src/**/*"],
    };
    let mut json = serde_json::to_string_pretty(&config)?;
    json.push('\n');
    Ok(json)
}

/// `webpack.config.js` bundling the entry file into `dist/<entry>_bundle.js`
pub fn webpack_config(entry_name: &str, script: ScriptOptions) -> String {
    let typescript = script.language.is_typescript();

    let mut out = String::from("const path = require('path');\n");
    if typescript {
        out.push_str(
            "const ForkTsCheckerWebpackPlugin = require('fork-ts-checker-webpack-plugin');\n",
        );
    }

    out.push_str(&format!(
        "
module.exports = {{
  entry: {{
    {}: './{}',
  }},
  output: {{
    path: __dirname + '/',
    filename: 'dist/[name]_bundle.js',
  }},
  resolve: {{
    alias: {{
      modules: path.join(__dirname, 'node_modules'),
      common: path.join(__dirname, 'common'),
    }},
    extensions: ['.tsx', '.ts', '.js', '.jsx'],
  }},
",
        render_key(entry_name),
        script.entry_path()
    ));

    if typescript {
        out.push_str("  plugins: [new ForkTsCheckerWebpackPlugin()],\n");
    }

    let mut presets = String::new();
    if typescript {
        presets.push_str("              '@babel/preset-typescript',\n");
    }
    if script.react {
        presets.push_str("              ['@babel/preset-react', { runtime: 'automatic' }],\n");
    }

    out.push_str(r#"  module: {
    rules: [
      {
        test: /\.css$/,
        use: [{ loader: 'style-loader' }, { loader: 'css-loader' }],
      },
      {
        test: /\.(png|jpg|jpeg|gif|svg|woff|woff2|eot|ttf)(\?v=\d+\.\d+\.\d+)?$/i,
        use: ['url-loader'],
      },
      {
        test: /\.(ts|js)x?$/,
        exclude: /(node_modules|bower_components)/,
        use: {
          loader: 'babel-loader',
          options: {
            presets: [
"#);
    out.push_str(&presets);
    out.push_str(
        r#"              [
                '@babel/preset-env',
                {
                  targets: {
                    browsers: ['last 4 versions'],
                  },
                  useBuiltIns: 'usage',
                  corejs: 3,
                },
              ],
            ],
          },
        },
      },
    ],
  },
};
"#,
    );
    out
}

/// `.gitignore` for a webpack project
pub fn gitignore() -> &'static str {
    ".DS_Store\nnode_modules\ndist\n"
}

/// Header space element for list views, where a React root can be mounted
fn list_header_space(event: &str) -> &'static str {
    if is_mobile_event(event) {
        "kintone.mobile.app.getHeaderSpaceElement()"
    } else {
        "kintone.app.getHeaderSpaceElement()"
    }
}

/// Starter entry file with one handler per event
pub fn main_code<S: AsRef<str>>(events: &[S], script: ScriptOptions) -> String {
    let typescript = script.language.is_typescript();
    let l1 = indent(1);
    let l2 = indent(2);

    let mut out =
        String::from("import { KintoneRestAPIClient } from '@kintone/rest-api-client';\n");
    if script.react {
        out.push_str("import { createRoot } from 'react-dom/client';\n");
        out.push_str("import App from './App';\n");
    }
    if typescript {
        let types: Vec<&str> = event_categories(events)
            .iter()
            .map(EventCategory::interface_name)
            .collect();
        if !types.is_empty() {
            out.push_str(&format!(
                "import type {{ {} }} from './lib/types';\n",
                types.join(", ")
            ));
        }
    }

    out.push_str("\nconst client = new KintoneRestAPIClient();\n");

    if script.react {
        let param = if typescript {
            "container: HTMLElement | null"
        } else {
            "container"
        };
        out.push_str(&format!(
            "\nconst renderApp = ({}) => {{\n{}if (!container) return;\n{}createRoot(container).render(<App />);\n}};\n",
            param, l1, l1
        ));
    }

    out.push_str("\n(() => {\n");
    let handlers: Vec<String> = events
        .iter()
        .map(|event| {
            let event = event.as_ref();
            let category = event_category(event);
            let param = match (typescript, category) {
                (true, Some(category)) => format!("event: {}", category.interface_name()),
                _ => "event".to_string(),
            };

            let mut handler = format!(
                "{}kintone.events.on('{}', ({}) => {{\n",
                l1, event, param
            );
            if script.react && category == Some(EventCategory::List) {
                handler.push_str(&format!("{}renderApp({});\n", l2, list_header_space(event)));
            }
            handler.push_str(&format!("{}return event;\n", l2));
            handler.push_str(&format!("{}}});\n", l1));
            handler
        })
        .collect();
    out.push_str(&handlers.join("\n"));
    out.push_str("})();\n");
    out
}

/// Starter React component
pub fn app_component(app: &AppRef) -> String {
    format!(
        "const App = () => {{
  return <div>{}</div>;
}};

export default App;
",
        app.name.replace(['<', '>', '{', '}'], "")
    )
}

/// Record type name of an app that is not yet in `taken`.
/// App names are not unique, so a clash falls back to `<TypeName><app id>`.
fn unique_type_name(app: &AppRef, taken: &mut HashSet<String>) -> String {
    let base = app.type_name();
    let mut name = base.clone();
    let mut attempt = 0;
    while !taken.insert(name.clone()) {
        name = match attempt {
            0 => format!("{}{}", base, app.app_id),
            n => format!("{}{}_{}", base, app.app_id, n),
        };
        attempt += 1;
    }
    name
}

/// `lib/types.ts`: record types of the selected and related apps, then the
/// event wrappers of the selected events
pub fn types_file<S: AsRef<str>>(
    app: &AppRef,
    schema: &Schema,
    related: &[(AppRef, Schema)],
    events: &[S],
) -> String {
    let mut sections =
        vec!["import { KintoneRecordField } from '@kintone/rest-api-client';".to_string()];

    let mut taken: HashSet<String> = event_categories(events)
        .iter()
        .map(|category| category.interface_name().to_string())
        .collect();
    taken.insert(RECORD_FIELD_NAMESPACE.to_string());

    sections.push(record_type_alias(&unique_type_name(app, &mut taken), schema));
    for (related_app, related_schema) in related {
        let type_name = unique_type_name(related_app, &mut taken);
        sections.push(record_type_alias(&type_name, related_schema));
    }

    let wrappers = synthesize_event_types(events, schema);
    if !wrappers.is_empty() {
        sections.push(wrappers);
    }

    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

/// Tools mode: standalone identifier table file for one app
pub fn field_code_file(app: &AppRef, schema: &Schema, language: Language) -> GeneratedFile {
    let const_name = format!("{}Fields", app.type_name());
    let contents = synthesize_identifier_table(schema).render(&const_name, language);
    GeneratedFile::new(
        format!("{}_fields.{}", app.dir_name(), language.short_name()),
        contents,
    )
}

/// Tools mode: standalone record type file for one app
pub fn field_type_file(app: &AppRef, schema: &Schema) -> GeneratedFile {
    let mut taken = HashSet::from([RECORD_FIELD_NAMESPACE.to_string()]);
    let contents = format!(
        "import {{ KintoneRecordField }} from '@kintone/rest-api-client';\n\n{}\n",
        record_type_alias(&unique_type_name(app, &mut taken), schema)
    );
    GeneratedFile::new(format!("{}_types.ts", app.dir_name()), contents)
}

/// Packages a project with these options depends on
pub fn dependencies(script: ScriptOptions) -> Dependencies {
    let mut runtime = vec!["@kintone/rest-api-client"];
    let mut dev = vec![
        "webpack",
        "webpack-cli",
        "babel-loader",
        "@babel/core",
        "@babel/preset-env",
        "core-js",
        "css-loader",
        "style-loader",
        "url-loader",
    ];

    if script.language.is_typescript() {
        dev.extend([
            "typescript",
            "@babel/preset-typescript",
            "fork-ts-checker-webpack-plugin",
            "@kintone/dts-gen",
        ]);
    }
    if script.react {
        runtime.extend(["react", "react-dom"]);
        dev.push("@babel/preset-react");
        if script.language.is_typescript() {
            dev.extend(["@types/react", "@types/react-dom"]);
        }
    }

    Dependencies { runtime, dev }
}
