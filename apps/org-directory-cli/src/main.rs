mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use org_directory::OrgDirectoryModule;
use org_directory::infra::storage::DirectorySnapshot;
use org_directory_sdk::{
    BkUsername, ChildrenOptions, LookupField, OrgDirectoryClient, PageRequest,
    TenantDepartmentId, UserListQuery,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LoggingConfig};

/// Query a tenant-scoped organization directory snapshot
#[derive(Parser)]
#[command(name = "org-directory")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory snapshot (overrides config)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct PageArgs {
    /// One-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Page size (defaults to the configured page size)
    #[arg(long)]
    page_size: Option<usize>,
}

impl PageArgs {
    fn request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and snapshot, then print the effective configuration
    Check,
    /// List tenants
    Tenants,
    /// Show a department
    Department {
        tenant: String,
        id: TenantDepartmentId,
        #[arg(long)]
        ancestors: bool,
    },
    /// List departments, optionally under a parent
    Departments {
        tenant: String,
        #[arg(long)]
        parent: Option<TenantDepartmentId>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List departments exactly `level` hops below a parent
    Children {
        tenant: String,
        parent: TenantDepartmentId,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        level: i32,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a user
    User { tenant: String, bk_username: String },
    /// List a user's departments
    UserDepartments {
        tenant: String,
        bk_username: String,
        #[arg(long)]
        ancestors: bool,
    },
    /// List a user's leaders
    Leaders { tenant: String, bk_username: String },
    /// List users, optionally filtered
    Users {
        tenant: String,
        /// bk_username, display_name, phone or email
        #[arg(long)]
        field: Option<String>,
        #[arg(long, value_delimiter = ',')]
        exact: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',')]
        fuzzy: Option<Vec<String>>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Look up display names for a batch of users
    DisplayNames {
        tenant: String,
        #[arg(required = true)]
        bk_usernames: Vec<BkUsername>,
    },
}

fn init_logging(logging: &LoggingConfig, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(snapshot) = cli.snapshot.clone() {
        config.snapshot = Some(snapshot);
    }
    init_logging(&config.logging, cli.verbose);

    let path = config
        .snapshot
        .clone()
        .context("no directory snapshot configured (use --snapshot or `snapshot:` in config)")?;
    let snapshot = DirectorySnapshot::load(&path)?;
    tracing::info!(
        snapshot = %path.display(),
        tenants = snapshot.tenants.len(),
        departments = snapshot.departments.len(),
        users = snapshot.users.len(),
        "Loaded directory snapshot"
    );

    let module = OrgDirectoryModule::init(config.directory.clone(), snapshot, None)?;
    let client = module.client();

    if matches!(cli.command, Commands::Check) {
        println!("Configuration is valid");
        return print_json(&config);
    }
    run(client, cli.command).await
}

async fn run(client: Arc<dyn OrgDirectoryClient>, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Check => Ok(()),
        Commands::Tenants => print_json(&client.list_tenants().await?),
        Commands::Department {
            tenant,
            id,
            ancestors,
        } => print_json(&client.get_department(&tenant, id, ancestors).await?),
        Commands::Departments {
            tenant,
            parent,
            page,
        } => print_json(
            &client
                .list_departments(&tenant, parent, page.request())
                .await?,
        ),
        Commands::Children {
            tenant,
            parent,
            level,
            page,
        } => print_json(
            &client
                .list_department_children(
                    &tenant,
                    parent,
                    ChildrenOptions::with_level(level),
                    page.request(),
                )
                .await?,
        ),
        Commands::User {
            tenant,
            bk_username,
        } => print_json(&client.get_user(&tenant, &bk_username).await?),
        Commands::UserDepartments {
            tenant,
            bk_username,
            ancestors,
        } => print_json(
            &client
                .list_user_departments(&tenant, &bk_username, ancestors)
                .await?,
        ),
        Commands::Leaders {
            tenant,
            bk_username,
        } => print_json(&client.list_user_leaders(&tenant, &bk_username).await?),
        Commands::Users {
            tenant,
            field,
            exact,
            fuzzy,
            page,
        } => {
            let query = UserListQuery {
                lookup_field: field.as_deref().map(str::parse::<LookupField>).transpose()?,
                exact_lookups: exact,
                fuzzy_lookups: fuzzy,
                page: page.request(),
            };
            print_json(&client.list_users(&tenant, &query).await?)
        }
        Commands::DisplayNames {
            tenant,
            bk_usernames,
        } => print_json(
            &client
                .list_user_display_names(&tenant, &bk_usernames)
                .await?,
        ),
    }
}
