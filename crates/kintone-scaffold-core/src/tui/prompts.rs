//! Charm-style CLI prompts using cliclack

use crate::codegen::project::{self, dependencies, field_code_file, field_type_file};
use crate::codegen::{Language, ProjectSpec, ScriptOptions};
use crate::config::{parse_base_url, ConnectionArgs, ConnectionConfig, Credentials, DomainKind};
use crate::kintone::{event_category, AppRef, KintoneError, Schema, SchemaSource, DEFAULT_EVENTS};
use crate::kintone::events::event_names;
use crate::runtime::{check_node, detect_package_manager};
use crate::scaffold::{existing_entries, write_files, write_project, DependencyInstaller};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Where to send users without Node.js
const NODE_DOWNLOAD_URL: &str = "https://nodejs.org/";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    pub connection: ConnectionArgs,

    /// npm package name of the new project
    pub project_name: Option<String>,

    /// App to scaffold for, by id or name
    pub app: Option<String>,

    /// Related apps whose record types are generated too, by id or name
    pub related: Option<Vec<String>>,

    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// Events to register handlers for
    pub events: Option<Vec<String>>,

    /// `typescript`/`ts` or `javascript`/`js`
    pub language: Option<String>,

    /// Generate a React entry component
    pub react: Option<bool>,

    /// Do not install npm dependencies
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// CLI arguments for the tools command
#[derive(Debug, Clone, Default)]
pub struct ToolsArgs {
    pub connection: ConnectionArgs,

    /// App to generate files for, by id or name
    pub app: Option<String>,

    /// Write the field code constant file
    pub add_app_fields: bool,

    /// Write the record type file
    pub add_app_types: bool,

    /// Language of the field code file
    pub language: Option<String>,

    /// Directory to write into (defaults to the current directory)
    pub directory: Option<PathBuf>,
}

/// Run the create flow with interactive prompts
pub async fn run(args: CreateArgs, user_agent: &str) -> Result<()> {
    cliclack::intro("kintone-create")?;

    // Step 1: Connect
    let source = setup_source(&args.connection, args.yes, user_agent)?;
    let apps = load_apps(&source).await?;

    // Step 2: Pick the app and the related apps
    let app = select_app(&apps, args.app.as_deref(), args.yes)?;
    let related = select_related(&apps, &app, &args)?;

    // Step 3: Project settings
    let project_name = select_project_name(&app, &args)?;
    let events = select_events(&args)?;
    let script = select_script(&args)?;
    let project_dir = select_directory(&app, &args)?;

    // Step 4: Fetch schemas
    let spinner = cliclack::spinner();
    spinner.start("Fetching form fields...");
    let schema = match source.fetch_form_fields(&app).await {
        Ok(schema) => schema,
        Err(e) => {
            spinner.stop("Failed to fetch form fields");
            return Err(e);
        }
    };
    let related_schemas = match source.fetch_all_form_fields(&related).await {
        Ok(schemas) => schemas,
        Err(e) => {
            spinner.stop("Failed to fetch form fields");
            return Err(e);
        }
    };
    spinner.stop(format!(
        "Loaded {} fields from {}",
        schema.len(),
        app
    ));
    let related: Vec<(AppRef, Schema)> = related.into_iter().zip(related_schemas).collect();

    // Step 5: Generate and write
    let spec = ProjectSpec {
        project_name: &project_name,
        app: &app,
        schema: &schema,
        related: &related,
        events: &events,
        script,
    };
    create_project(&spec, &project_dir).await?;

    // Step 6: Dependencies
    if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
    } else {
        install_dependencies(script, &project_dir, args.yes).await?;
    }

    // Step 7: Show next steps
    print_next_steps(&project_dir, args.skip_install)?;

    Ok(())
}

/// Run the tools flow: write field code / record type files for one app
pub async fn run_tools(args: ToolsArgs, user_agent: &str) -> Result<()> {
    cliclack::intro("kintone-create tools")?;

    if !args.add_app_fields && !args.add_app_types {
        anyhow::bail!("Nothing to do: pass --add-app-fields and/or --add-app-types");
    }

    let source = setup_source(&args.connection, false, user_agent)?;
    let apps = load_apps(&source).await?;
    let app = select_app(&apps, args.app.as_deref(), false)?;

    let spinner = cliclack::spinner();
    spinner.start("Fetching form fields...");
    let schema = match source.fetch_form_fields(&app).await {
        Ok(schema) => schema,
        Err(e) => {
            spinner.stop("Failed to fetch form fields");
            return Err(e);
        }
    };
    spinner.stop(format!("Loaded {} fields from {}", schema.len(), app));

    let mut files = Vec::new();
    if args.add_app_fields {
        let language = match &args.language {
            Some(value) => parse_language(value)?,
            None => prompt_language()?,
        };
        files.push(field_code_file(&app, &schema, language));
    }
    if args.add_app_types {
        files.push(field_type_file(&app, &schema));
    }

    let target_dir = match &args.directory {
        Some(dir) => absolutize(dir),
        None => current_dir(),
    };
    let written = write_files(&target_dir, &files).await?;
    for path in &written {
        cliclack::log::success(format!("Wrote {}", target_dir.join(path).display()))?;
    }

    cliclack::outro("Done!")?;
    Ok(())
}

fn setup_source(args: &ConnectionArgs, yes: bool, user_agent: &str) -> Result<SchemaSource> {
    let args = args.clone().with_env_fallback();

    if let Some(path) = args.schema_dir {
        cliclack::log::info(format!("Using local schemas from {}", path.display()))?;
        return Ok(SchemaSource::local(path));
    }

    let base_url = match &args.url {
        Some(url) => parse_base_url(url)?,
        None if yes => anyhow::bail!("--url is required in non-interactive mode"),
        None => prompt_base_url()?,
    };

    let username = match args.username {
        Some(username) => username,
        None if yes => anyhow::bail!("--username is required in non-interactive mode"),
        None => cliclack::input("Login name")
            .validate(|input: &String| {
                if input.trim().is_empty() {
                    Err("Please enter your login name")
                } else {
                    Ok(())
                }
            })
            .interact()?,
    };

    let password = match args.password {
        Some(password) => password,
        None if yes => anyhow::bail!("--password is required in non-interactive mode"),
        None => cliclack::password("Password").mask('▪').interact()?,
    };

    let config = ConnectionConfig {
        base_url,
        credentials: Credentials::new(username, password),
    };
    cliclack::log::info(format!("Connecting to {}", config.base_url))?;
    SchemaSource::remote(&config, user_agent)
}

fn prompt_base_url() -> Result<url::Url> {
    let mut select = cliclack::select("Which domain does your environment use?");
    for kind in DomainKind::ALL {
        select = select.item(kind, kind.to_string(), kind.example_url());
    }
    let kind: DomainKind = select.interact()?;

    let input: String = cliclack::input("Environment URL")
        .placeholder(kind.example_url())
        .validate(move |input: &String| match parse_base_url(input.trim()) {
            Ok(url) if url.host_str().is_some_and(|h| h.ends_with(kind.host_suffix())) => Ok(()),
            Ok(_) => Err(format!("Expected a URL like {}", kind.example_url())),
            Err(e) => Err(e.to_string()),
        })
        .interact()?;

    Ok(parse_base_url(input.trim())?)
}

async fn load_apps(source: &SchemaSource) -> Result<Vec<AppRef>> {
    let spinner = cliclack::spinner();
    spinner.start("Loading apps...");

    match source.fetch_apps().await {
        Ok(apps) if apps.is_empty() => {
            spinner.stop("No apps found");
            anyhow::bail!("No apps available in {}", source.describe());
        }
        Ok(apps) => {
            spinner.stop(format!("Found {} apps", apps.len()));
            Ok(apps)
        }
        Err(e) => {
            spinner.stop("Failed to load apps");
            if is_auth_failure(&e) {
                cliclack::log::error("Login failed. Check your login name and password.")?;
            }
            Err(e)
        }
    }
}

fn is_auth_failure(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<KintoneError>())
        .any(KintoneError::is_auth_failure)
}

/// Find an app by id or, failing that, by exact name
fn find_app<'a>(apps: &'a [AppRef], key: &str) -> Option<&'a AppRef> {
    apps.iter()
        .find(|app| app.app_id == key)
        .or_else(|| apps.iter().find(|app| app.name == key))
}

fn select_app(apps: &[AppRef], specified: Option<&str>, yes: bool) -> Result<AppRef> {
    if let Some(key) = specified {
        let app = find_app(apps, key)
            .ok_or_else(|| anyhow::anyhow!("App '{}' not found", key))?;
        cliclack::log::info(format!("Using app: {}", app))?;
        return Ok(app.clone());
    }

    if apps.len() == 1 {
        cliclack::log::info(format!("Using app: {}", apps[0]))?;
        return Ok(apps[0].clone());
    }

    if yes {
        anyhow::bail!("--app is required in non-interactive mode");
    }

    let mut select = cliclack::select("Select an app").filter_mode();
    for (idx, app) in apps.iter().enumerate() {
        select = select.item(idx, app.to_string(), "");
    }
    let selected: usize = select.interact()?;

    Ok(apps[selected].clone())
}

fn select_related(apps: &[AppRef], app: &AppRef, args: &CreateArgs) -> Result<Vec<AppRef>> {
    let candidates: Vec<&AppRef> = apps.iter().filter(|a| a.app_id != app.app_id).collect();

    if let Some(keys) = &args.related {
        let mut related = Vec::new();
        for key in keys {
            match find_app(apps, key) {
                Some(found) if found.app_id == app.app_id => {}
                Some(found) => related.push(found.clone()),
                None => cliclack::log::warning(format!("Unknown app: {}", key))?,
            }
        }
        return Ok(related);
    }

    if args.yes || candidates.is_empty() {
        return Ok(Vec::new());
    }

    let wanted: bool = cliclack::confirm("Generate record types for related apps too?")
        .initial_value(false)
        .interact()?;
    if !wanted {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Select related apps");
    for (idx, candidate) in candidates.iter().enumerate() {
        multi = multi.item(idx, candidate.to_string(), "");
    }
    let selected: Vec<usize> = multi.required(false).interact()?;

    Ok(selected.into_iter().map(|idx| candidates[idx].clone()).collect())
}

fn select_project_name(app: &AppRef, args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.project_name {
        return Ok(name.clone());
    }

    let default = app.dir_name();
    if args.yes {
        return Ok(default);
    }

    let input: String = cliclack::input("Project name")
        .placeholder(&default)
        .default_input(&default)
        .interact()?;
    Ok(input)
}

/// Split `--events` values into known events and unknown names
fn partition_events(values: &[String]) -> (Vec<String>, Vec<String>) {
    values
        .iter()
        .cloned()
        .partition(|event| event_category(event).is_some())
}

fn select_events(args: &CreateArgs) -> Result<Vec<String>> {
    if let Some(values) = &args.events {
        let (known, unknown) = partition_events(values);
        for event in unknown {
            cliclack::log::warning(format!("Unknown event: {}", event))?;
        }
        return Ok(known);
    }

    if args.yes {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Select events to handle");
    for name in event_names() {
        multi = multi.item(name, name, "");
    }
    let selected: Vec<&'static str> = multi
        .initial_values(DEFAULT_EVENTS.to_vec())
        .required(false)
        .interact()?;

    if selected.is_empty() {
        cliclack::log::info(format!("No events selected, using {}", DEFAULT_EVENTS.join(", ")))?;
    }

    Ok(selected.into_iter().map(str::to_string).collect())
}

fn parse_language(value: &str) -> Result<Language> {
    Language::parse(value).ok_or_else(|| {
        anyhow::anyhow!("Unknown language '{}'. Use typescript or javascript.", value)
    })
}

fn prompt_language() -> Result<Language> {
    let mut select = cliclack::select("Select a language");
    for language in Language::ALL {
        select = select.item(language, language.display_name(), "");
    }
    Ok(select.initial_value(Language::TypeScript).interact()?)
}

fn select_script(args: &CreateArgs) -> Result<ScriptOptions> {
    let language = match &args.language {
        Some(value) => parse_language(value)?,
        None if args.yes => Language::TypeScript,
        None => prompt_language()?,
    };

    let react = match args.react {
        Some(react) => react,
        None if args.yes => false,
        None => cliclack::confirm("Use React?")
            .initial_value(false)
            .interact()?,
    };

    let script = ScriptOptions::new(language, react);
    cliclack::log::success(format!(
        "Project language: {}{}",
        language.display_name(),
        if react { " + React" } else { "" }
    ))?;
    Ok(script)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    }
}

fn select_directory(app: &AppRef, args: &CreateArgs) -> Result<PathBuf> {
    let default = app.dir_name();

    let path = if let Some(dir) = &args.directory {
        let p = absolutize(dir);
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir().join(&default)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(&default)
            .default_input(&default)
            .interact()?;
        absolutize(Path::new(input.trim()))
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Warn if directory exists and has files
    if let Some(count) = existing_entries(&path).filter(|count| *count > 0) {
        cliclack::log::warning(format!("Directory has {} existing items", count))?;

        let confirm = if args.yes {
            true
        } else {
            cliclack::confirm("Continue anyway?")
                .initial_value(false)
                .interact()?
        };

        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    Ok(path)
}

async fn create_project(spec: &ProjectSpec<'_>, project_dir: &Path) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    let generated = match project::generate_project(spec) {
        Ok(generated) => generated,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(anyhow::Error::new(e).context("Failed to render project files"));
        }
    };
    let written = match write_project(project_dir, &generated).await {
        Ok(written) => written,
        Err(e) => {
            spinner.stop("Failed to create project");
            return Err(e);
        }
    };

    spinner.stop(format!(
        "Created {} files in {}",
        written.len(),
        project_dir.display()
    ));

    Ok(())
}

async fn install_dependencies(script: ScriptOptions, project_dir: &Path, yes: bool) -> Result<()> {
    let node = check_node();
    if !node.available {
        cliclack::log::warning("Node.js is not installed, skipping dependency installation")?;
        if !yes {
            let open_docs: bool = cliclack::confirm(format!("Open {}?", NODE_DOWNLOAD_URL))
                .initial_value(false)
                .interact()?;
            if open_docs {
                open::that(NODE_DOWNLOAD_URL)?;
            }
        }
        return Ok(());
    }
    cliclack::log::success(format!(
        "{} installed ({})",
        node.name,
        node.version.as_deref().unwrap_or("unknown")
    ))?;

    let Some(manager) = detect_package_manager() else {
        cliclack::log::warning("No package manager found (npm, pnpm, yarn or bun)")?;
        return Ok(());
    };

    let installer = DependencyInstaller::new(manager, project_dir);
    let deps = dependencies(script);

    let confirm = if yes {
        true
    } else {
        cliclack::confirm(format!("Install dependencies with {}?", manager))
            .initial_value(true)
            .interact()?
    };
    if !confirm {
        cliclack::log::info("Skipping dependency installation")?;
        return Ok(());
    }

    match installer.install(&deps).await {
        Ok(()) => cliclack::log::success("Dependencies installed")?,
        Err(e) => {
            cliclack::log::error(format!("{}", e))?;
            cliclack::log::warning(format!(
                "Run the install manually inside {}",
                installer.project_dir().display()
            ))?;
        }
    }

    Ok(())
}

fn print_next_steps(project_dir: &Path, skipped_install: bool) -> Result<()> {
    let manager = detect_package_manager().unwrap_or(crate::runtime::PackageManager::Npm);

    let mut steps = vec![format!("cd {}", project_dir.display())];
    if skipped_install {
        steps.push(format!("{} install", manager.binary()));
    }
    steps.push(manager.run_command("build:dev"));
    steps.push("Upload dist/*.js to your app's JavaScript customization".to_string());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
