pub mod commands;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use catalog_admin_client::HttpCatalogService;
use catalog_admin_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use catalog_admin_core::errors::AdminError;
use catalog_admin_core::session::{FileSessionStore, SessionContext};
use clap::{Parser, Subcommand};
use commands::auth::LoginArgs;
use commands::owners::RegisterArgs;
use commands::products::{ListArgs, ProductArgs};
use commands::{CommandEnv, CommandResult, OutputMode, StdinConfirm};
use tracing::debug;

const PASSWORD_ENV: &str = "CATALOG_ADMIN_PASSWORD";

#[derive(Debug, Parser)]
#[command(
    name = "catalog-admin",
    about = "Catalog admin CLI",
    long_about = "Manage products, brands, categories, owners and product images through the Product Service.",
    after_help = "Examples:\n  catalog-admin login --email owner@example.com\n  catalog-admin products list --search 42\n  catalog-admin products list --brand Acme --json\n  catalog-admin products delete 7"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Config file (default: catalog-admin.toml)"
    )]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "URL", help = "Product Service base URL")]
    api_url: Option<String>,
    #[arg(long, global = true, value_name = "SECS", help = "Request timeout in seconds")]
    timeout_secs: Option<u64>,
    #[arg(long, global = true, value_name = "FILE", help = "Session file")]
    session: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[arg(long, global = true, value_name = "FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
    #[arg(long, global = true, help = "Emit machine-readable JSON output")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Sign in as a store owner and keep the session for later commands")]
    Login(LoginArgs),
    #[command(about = "Forget the stored session")]
    Logout,
    #[command(about = "Show the signed-in owner")]
    Whoami,
    #[command(subcommand, about = "List, search, create, update and delete products")]
    Products(ProductsCommand),
    #[command(about = "List brands")]
    Brands,
    #[command(about = "List categories")]
    Categories,
    #[command(subcommand, about = "Register and inspect store owners")]
    Owners(OwnersCommand),
    #[command(subcommand, about = "List, upload and replace product images")]
    Images(ImagesCommand),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, the session file and Product Service reachability")]
    Doctor,
}

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    #[command(about = "List products, optionally filtered by id/name, brand and category")]
    List(ListArgs),
    Show {
        id: u64,
    },
    Create(ProductArgs),
    #[command(about = "Update a product; omitted fields keep their current values")]
    Update {
        id: u64,
        #[command(flatten)]
        changes: ProductArgs,
    },
    Delete {
        id: u64,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum OwnersCommand {
    #[command(about = "Register a new store owner (no sign-in required)")]
    Register(RegisterArgs),
    List,
    Show { id: u64 },
}

#[derive(Debug, Subcommand)]
enum ImagesCommand {
    List {
        #[arg(long, help = "Only images of this product")]
        product: Option<u64>,
    },
    Upload {
        product_id: u64,
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    Replace {
        image_id: u64,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|error| error.to_string())
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match build_runtime() {
        Ok(runtime) => runtime.block_on(execute(cli)),
        Err(error) => CommandResult::failure("runtime", "runtime", format!("{error:#}"), 1),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

pub async fn execute(cli: Cli) -> CommandResult {
    let mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides {
            api_base_url: cli.api_url.clone(),
            api_timeout_secs: cli.timeout_secs,
            session_path: cli.session.clone(),
            log_level: cli.log_level.clone(),
            log_format: cli.log_format,
        },
    };

    match cli.command {
        Command::Config => return commands::config::run(&options),
        Command::Doctor => return commands::doctor::run(&options, cli.json).await,
        _ => {}
    }

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &AdminError::Config(error)),
    };
    init_logging(&config);

    let mut session = match SessionContext::open(FileSessionStore::new(&config.session.path)) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("session", &AdminError::Session(error)),
    };
    let mut service = match HttpCatalogService::new(&config.api) {
        Ok(service) => service,
        Err(error) => return CommandResult::from_error("client", &AdminError::Service(error)),
    };
    if let Some(authorization) = session.authorization() {
        service = service.with_authorization(authorization);
    }
    debug!(
        event_name = "catalog.cli.ready",
        base_url = %config.api.base_url,
        signed_in = session.is_signed_in(),
        "catalog admin ready"
    );

    let env = CommandEnv { api: &config.api, reset_delay: config.catalog.no_match_reset(), mode };

    match cli.command {
        Command::Login(mut args) => {
            args.password = args.password.or_else(password_from_env);
            commands::auth::login(&service, &mut session, &env, args).await
        }
        Command::Logout => commands::auth::logout(&mut session, &env),
        Command::Whoami => commands::auth::whoami(&session, &env),
        Command::Owners(OwnersCommand::Register(mut args)) => {
            args.password = args.password.or_else(password_from_env);
            commands::owners::register(&service, &env, args).await
        }
        command => {
            let name = command_name(&command);
            if let Err(result) = commands::require_session(name, &session) {
                return result;
            }
            run_catalog_command(command, service, &env).await
        }
    }
}

/// Commands behind the sign-in guard.
async fn run_catalog_command(
    command: Command,
    service: HttpCatalogService,
    env: &CommandEnv<'_>,
) -> CommandResult {
    match command {
        Command::Products(ProductsCommand::List(args)) => {
            commands::products::list(service, env, &args).await
        }
        Command::Products(ProductsCommand::Show { id }) => {
            commands::products::show(&service, env, id).await
        }
        Command::Products(ProductsCommand::Create(args)) => {
            commands::products::create(service, env, &args).await
        }
        Command::Products(ProductsCommand::Update { id, changes }) => {
            commands::products::update(service, env, id, &changes).await
        }
        Command::Products(ProductsCommand::Delete { id, yes: true }) => {
            commands::products::delete(service, env, id, &mut |_: &str| true).await
        }
        Command::Products(ProductsCommand::Delete { id, yes: false }) => {
            commands::products::delete(service, env, id, &mut StdinConfirm).await
        }
        Command::Brands => commands::lookups::brands(&service, env).await,
        Command::Categories => commands::lookups::categories(&service, env).await,
        Command::Owners(OwnersCommand::List) => commands::owners::list(&service, env).await,
        Command::Owners(OwnersCommand::Show { id }) => {
            commands::owners::show(&service, env, id).await
        }
        Command::Images(ImagesCommand::List { product }) => {
            commands::images::list(&service, env, product).await
        }
        Command::Images(ImagesCommand::Upload { product_id, files }) => {
            commands::images::upload(&service, env, product_id, &files).await
        }
        Command::Images(ImagesCommand::Replace { image_id, file }) => {
            commands::images::replace(&service, env, image_id, &file).await
        }
        other => CommandResult::failure(
            command_name(&other),
            "usage",
            "command does not require a catalog session",
            64,
        ),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Products(ProductsCommand::List(_)) => "products list",
        Command::Products(ProductsCommand::Show { .. }) => "products show",
        Command::Products(ProductsCommand::Create(_)) => "products create",
        Command::Products(ProductsCommand::Update { .. }) => "products update",
        Command::Products(ProductsCommand::Delete { .. }) => "products delete",
        Command::Brands => "brands",
        Command::Categories => "categories",
        Command::Owners(OwnersCommand::Register(_)) => "owners register",
        Command::Owners(OwnersCommand::List) => "owners list",
        Command::Owners(OwnersCommand::Show { .. }) => "owners show",
        Command::Images(ImagesCommand::List { .. }) => "images list",
        Command::Images(ImagesCommand::Upload { .. }) => "images upload",
        Command::Images(ImagesCommand::Replace { .. }) => "images replace",
        Command::Config => "config",
        Command::Doctor => "doctor",
    }
}

fn password_from_env() -> Option<String> {
    env::var(PASSWORD_ENV).ok().filter(|value| !value.is_empty())
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use catalog_admin_core::config::LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{command_name, Cli, Command, ProductsCommand};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_product_search_with_global_flags() {
        let cli = Cli::try_parse_from([
            "catalog-admin",
            "products",
            "list",
            "--search",
            "42",
            "--brand",
            "Acme",
            "--json",
        ])
        .expect("parse");

        assert!(cli.json);
        match &cli.command {
            Command::Products(ProductsCommand::List(args)) => {
                assert_eq!(args.search.as_deref(), Some("42"));
                assert_eq!(args.brand.as_deref(), Some("Acme"));
                assert_eq!(args.category, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(command_name(&cli.command), "products list");
    }

    #[test]
    fn update_accepts_partial_changes() {
        let cli = Cli::try_parse_from([
            "catalog-admin",
            "products",
            "update",
            "7",
            "--price",
            "99.5",
            "--image",
            "front.png",
        ])
        .expect("parse");

        match cli.command {
            Command::Products(ProductsCommand::Update { id, changes }) => {
                assert_eq!(id, 7);
                assert_eq!(changes.price.as_deref(), Some("99.5"));
                assert_eq!(changes.name, None);
                assert_eq!(changes.images.len(), 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn image_upload_requires_files() {
        assert!(Cli::try_parse_from(["catalog-admin", "images", "upload", "3"]).is_err());
    }
}
