//! kintone-create - Project scaffolding for kintone customizations

mod logging;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use kintone_scaffold_core::config::ConnectionArgs;
use kintone_scaffold_core::tui::{CreateArgs, ToolsArgs};
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "kintone-create")]
#[command(about = "CLI for scaffolding kintone customization projects")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new kintone customization project
    Create(CliCreateArgs),
    /// Write field code constants and record types for one app into the current directory
    Tools(CliToolsArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct CliConnectionArgs {
    /// kintone URL, e.g. https://example.kintone.com [env: KINTONE_BASE_URL]
    #[arg(long)]
    pub url: Option<String>,

    /// Login name [env: KINTONE_USERNAME]
    #[arg(short, long, requires = "password")]
    pub username: Option<String>,

    /// Password [env: KINTONE_PASSWORD]
    #[arg(short, long, requires = "username")]
    pub password: Option<String>,

    /// Local directory to read app schemas from instead of the REST API (for development use)
    #[arg(long = "schema-dir")]
    pub schema_dir: Option<PathBuf>,
}

impl From<CliConnectionArgs> for ConnectionArgs {
    fn from(args: CliConnectionArgs) -> Self {
        ConnectionArgs {
            url: args.url,
            username: args.username,
            password: args.password,
            schema_dir: args.schema_dir,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    #[command(flatten)]
    pub connection: CliConnectionArgs,

    /// Project (npm package) name
    #[arg(short, long)]
    pub name: Option<String>,

    /// App id or name
    #[arg(short, long)]
    pub app: Option<String>,

    /// Related app ids or names (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub related: Option<Vec<String>>,

    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Events to handle (comma-separated, e.g. app.record.detail.show,app.record.create.submit)
    #[arg(short, long, value_delimiter = ',')]
    pub events: Option<Vec<String>>,

    /// Language (ts or js)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Generate a React entry component
    #[arg(long, conflicts_with = "no_react")]
    pub react: bool,

    /// Do not generate a React entry component
    #[arg(long = "no-react")]
    pub no_react: bool,

    /// Skip npm dependency installation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        let react = match (args.react, args.no_react) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CreateArgs {
            connection: args.connection.into(),
            project_name: args.name,
            app: args.app,
            related: args.related,
            directory: args.directory,
            events: args.events,
            language: args.language,
            react,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(
    ArgGroup::new("output")
        .required(true)
        .multiple(true)
        .args(["add_app_fields", "add_app_types"])
))]
pub struct CliToolsArgs {
    #[command(flatten)]
    pub connection: CliConnectionArgs,

    /// App id or name
    #[arg(short, long)]
    pub app: Option<String>,

    /// Write <app>_fields.<ts|js> with field code constants
    #[arg(long = "add-app-fields")]
    pub add_app_fields: bool,

    /// Write <app>_types.ts with the app's record type
    #[arg(long = "add-app-types")]
    pub add_app_types: bool,

    /// Language of the field code file (ts or js)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Directory to write into (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

impl From<CliToolsArgs> for ToolsArgs {
    fn from(args: CliToolsArgs) -> Self {
        ToolsArgs {
            connection: args.connection.into(),
            app: args.app,
            add_app_fields: args.add_app_fields,
            add_app_types: args.add_app_types,
            language: args.language,
            directory: args.directory,
        }
    }
}

fn user_agent() -> String {
    format!("kintone-create/{}", CLI_VERSION)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.verbose, args.quiet)?;
    tracing::debug!(version = CLI_VERSION, "starting");

    let user_agent = user_agent();
    let result = match args.command {
        Some(Command::Create(create_args)) => {
            kintone_scaffold_core::run(create_args.into(), &user_agent).await
        }
        Some(Command::Tools(tools_args)) => {
            kintone_scaffold_core::run_tools(tools_args.into(), &user_agent).await
        }
        // No subcommand provided, default to create behavior (interactive mode)
        None => kintone_scaffold_core::run(CreateArgs::default(), &user_agent).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_username_requires_password() {
        assert!(Args::try_parse_from(["kintone-create", "create", "-u", "alice"]).is_err());
        assert!(
            Args::try_parse_from(["kintone-create", "create", "-u", "alice", "-p", "secret"])
                .is_ok()
        );
    }

    #[test]
    fn test_tools_requires_an_output() {
        assert!(Args::try_parse_from(["kintone-create", "tools"]).is_err());
        let args =
            Args::try_parse_from(["kintone-create", "tools", "--add-app-fields", "--add-app-types"])
                .unwrap();
        match args.command {
            Some(Command::Tools(tools)) => {
                assert!(tools.add_app_fields);
                assert!(tools.add_app_types);
            }
            other => panic!("expected tools, got {:?}", other),
        }
    }

    #[test]
    fn test_create_args_conversion() {
        let args = Args::try_parse_from([
            "kintone-create",
            "-vv",
            "create",
            "--url",
            "https://example.kintone.com",
            "--events",
            "app.record.detail.show,app.record.edit.show",
            "--no-react",
            "--yes",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);

        let Some(Command::Create(create)) = args.command else {
            panic!("expected create");
        };
        let converted: CreateArgs = create.into();
        assert_eq!(
            converted.connection.url.as_deref(),
            Some("https://example.kintone.com")
        );
        assert_eq!(
            converted.events,
            Some(vec![
                "app.record.detail.show".to_string(),
                "app.record.edit.show".to_string()
            ])
        );
        assert_eq!(converted.react, Some(false));
        assert!(converted.yes);
    }
}
