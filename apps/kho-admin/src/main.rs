//! # Kho Admin CLI
//!
//! Back-office front end over `kho_admin::commands`.
//!
//! ```bash
//! kho-admin --actor 2b7e... import create --file phieu-nhap.json
//! kho-admin import status 6f1c... PENDING
//! kho-admin import process 6f1c...
//! kho-admin import bulk-cancel 6f1c... 91ad... c04e...
//! kho-admin inventory adjust AT-DO-M --delta -2 --reason "hàng lỗi"
//! ```
//!
//! Results are printed to stdout as pretty JSON. Failures print an
//! `ApiError` as JSON to stderr and exit with status 1.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::json;

use kho_admin::commands::{catalog, imports};
use kho_admin::error::ApiError;
use kho_admin::state::{AdminConfig, DbState};
use kho_admin::to_pretty_json;
use kho_core::{ImportFilter, ImportStatus, NewSupplier, NewUser, PaymentStatus, UserRole};

#[derive(Parser)]
#[command(name = "kho-admin", about = "Kho back-office: inventory imports and catalog", version)]
struct Cli {
    #[arg(long, global = true, help = "Path to kho.toml (default: platform config dir)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "SQLite database file (overrides config and KHO_DB_PATH)")]
    db: Option<PathBuf>,

    #[arg(long, global = true, help = "User id recorded in the audit trail")]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Import(ImportCommands),
    #[command(subcommand)]
    Supplier(SupplierCommands),
    #[command(subcommand)]
    User(UserCommands),
    #[command(subcommand)]
    Product(ProductCommands),
    #[command(subcommand)]
    Inventory(InventoryCommands),
    #[command(subcommand)]
    Audit(AuditCommands),
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Create an import from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Show an import with its items
    Show { id: String },
    /// Audit history of an import
    History { id: String },
    List(ImportListArgs),
    /// Add a PENDING import's items to stock and mark it COMPLETED
    Process { id: String },
    /// Move an import to another status
    Status { id: String, status: ImportStatus },
    /// Set the payment status
    Payment { id: String, status: PaymentStatus },
    /// Cancel a DRAFT or PENDING import
    Cancel { id: String },
    /// Edit reference and/or description of a DRAFT or PENDING import
    Update {
        id: String,
        #[arg(long)]
        reference: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a DRAFT or CANCELLED import
    Delete { id: String },
    BulkProcess {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    BulkCancel {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    BulkStatus {
        #[arg(long)]
        status: ImportStatus,
        #[arg(required = true)]
        ids: Vec<String>,
    },
    BulkPayment {
        #[arg(long)]
        status: PaymentStatus,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Args)]
struct ImportListArgs {
    #[arg(long)]
    status: Option<ImportStatus>,
    #[arg(long)]
    payment: Option<PaymentStatus>,
    #[arg(long)]
    supplier: Option<String>,
    #[arg(long)]
    limit: Option<i64>,
    #[arg(long)]
    offset: Option<i64>,
}

impl From<ImportListArgs> for ImportFilter {
    fn from(args: ImportListArgs) -> Self {
        ImportFilter {
            import_status: args.status,
            payment_status: args.payment,
            supplier_id: args.supplier,
            limit: args.limit,
            offset: args.offset,
        }
    }
}

#[derive(Subcommand)]
enum SupplierCommands {
    Add(SupplierArgs),
    List {
        #[arg(long, help = "Include deactivated suppliers")]
        all: bool,
    },
    Update {
        id: String,
        #[command(flatten)]
        fields: SupplierArgs,
    },
    Deactivate { id: String },
}

#[derive(Args)]
struct SupplierArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

impl From<SupplierArgs> for NewSupplier {
    fn from(args: SupplierArgs) -> Self {
        NewSupplier {
            name: args.name,
            contact_name: args.contact,
            phone: args.phone,
            email: args.email,
            address: args.address,
        }
    }
}

#[derive(Subcommand)]
enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "STAFF")]
        role: UserRole,
    },
    List,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// Create a product and its properties from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    Show { id: String },
    List,
}

#[derive(Subcommand)]
enum InventoryCommands {
    List,
    /// Stock of one property (id or SKU)
    Show { property: String },
    /// Add (or with a negative delta, remove) stock for one property
    Adjust {
        property: String,
        #[arg(long, allow_negative_numbers = true)]
        delta: i64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuditCommands {
    Recent {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return report(&err),
    };

    kho_admin::init_tracing(config.log_filter());

    match run(cli.command, &config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

fn load_config(cli: &Cli) -> Result<AdminConfig, ApiError> {
    let mut config = AdminConfig::load(cli.config.clone())?;

    if let Some(db) = &cli.db {
        config.database.path = Some(db.clone());
    }
    if let Some(actor) = &cli.actor {
        config.admin.actor_id = Some(actor.clone());
    }
    config.validate()?;

    Ok(config)
}

fn report(err: &ApiError) -> ExitCode {
    match serde_json::to_string_pretty(err) {
        Ok(body) => eprintln!("{}", body),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::FAILURE
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ApiError::validation(format!("Cannot read {}: {}", path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ApiError::validation(format!("Invalid JSON in {}: {}", path.display(), e)))
}

async fn run(command: Commands, config: &AdminConfig) -> Result<String, ApiError> {
    let db = DbState::open(config).await?;
    let actor = config.actor_id();

    let output = match command {
        Commands::Import(command) => run_import(&db, command, actor).await?,
        Commands::Supplier(command) => run_supplier(&db, command).await?,
        Commands::User(command) => run_user(&db, command).await?,
        Commands::Product(command) => run_product(&db, command).await?,
        Commands::Inventory(command) => run_inventory(&db, command, actor).await?,
        Commands::Audit(AuditCommands::Recent { limit }) => {
            to_pretty_json(&catalog::recent_activity(&db, limit).await?)?
        }
    };

    db.inner().close().await;
    Ok(output)
}

async fn run_import(
    db: &DbState,
    command: ImportCommands,
    actor: Option<&str>,
) -> Result<String, ApiError> {
    match command {
        ImportCommands::Create { file } => {
            to_pretty_json(&imports::create_import(db, &read_json(&file)?).await?)
        }
        ImportCommands::Show { id } => to_pretty_json(&imports::get_import(db, &id).await?),
        ImportCommands::History { id } => to_pretty_json(&imports::import_history(db, &id).await?),
        ImportCommands::List(args) => {
            to_pretty_json(&imports::list_imports(db, &args.into()).await?)
        }
        ImportCommands::Process { id } => {
            to_pretty_json(&imports::process_import(db, &id, actor).await?)
        }
        ImportCommands::Status { id, status } => {
            to_pretty_json(&imports::update_import_status(db, &id, status, actor).await?)
        }
        ImportCommands::Payment { id, status } => {
            to_pretty_json(&imports::update_payment_status(db, &id, status, actor).await?)
        }
        ImportCommands::Cancel { id } => {
            to_pretty_json(&imports::cancel_import(db, &id, actor).await?)
        }
        ImportCommands::Update {
            id,
            reference,
            description,
        } => to_pretty_json(
            &imports::update_import_details(
                db,
                &id,
                reference.as_deref(),
                description.as_deref(),
                actor,
            )
            .await?,
        ),
        ImportCommands::Delete { id } => {
            imports::delete_import(db, &id, actor).await?;
            to_pretty_json(&json!({ "deleted": id }))
        }
        ImportCommands::BulkProcess { ids } => {
            to_pretty_json(&imports::bulk_process_imports(db, &ids, actor).await?)
        }
        ImportCommands::BulkCancel { ids } => {
            to_pretty_json(&imports::bulk_cancel_imports(db, &ids, actor).await?)
        }
        ImportCommands::BulkStatus { status, ids } => {
            to_pretty_json(&imports::bulk_update_import_status(db, &ids, status, actor).await?)
        }
        ImportCommands::BulkPayment { status, ids } => {
            to_pretty_json(&imports::bulk_update_payment_status(db, &ids, status, actor).await?)
        }
    }
}

async fn run_supplier(db: &DbState, command: SupplierCommands) -> Result<String, ApiError> {
    match command {
        SupplierCommands::Add(args) => {
            to_pretty_json(&catalog::create_supplier(db, &args.into()).await?)
        }
        SupplierCommands::List { all } => to_pretty_json(&catalog::list_suppliers(db, all).await?),
        SupplierCommands::Update { id, fields } => {
            to_pretty_json(&catalog::update_supplier(db, &id, &fields.into()).await?)
        }
        SupplierCommands::Deactivate { id } => {
            catalog::deactivate_supplier(db, &id).await?;
            to_pretty_json(&json!({ "deactivated": id }))
        }
    }
}

async fn run_user(db: &DbState, command: UserCommands) -> Result<String, ApiError> {
    match command {
        UserCommands::Add { email, name, role } => {
            to_pretty_json(&catalog::create_user(db, &NewUser { email, name, role }).await?)
        }
        UserCommands::List => to_pretty_json(&catalog::list_users(db).await?),
    }
}

async fn run_product(db: &DbState, command: ProductCommands) -> Result<String, ApiError> {
    match command {
        ProductCommands::Create { file } => {
            to_pretty_json(&catalog::create_product(db, &read_json(&file)?).await?)
        }
        ProductCommands::Show { id } => to_pretty_json(&catalog::get_product(db, &id).await?),
        ProductCommands::List => to_pretty_json(&catalog::list_products(db).await?),
    }
}

async fn run_inventory(
    db: &DbState,
    command: InventoryCommands,
    actor: Option<&str>,
) -> Result<String, ApiError> {
    match command {
        InventoryCommands::List => to_pretty_json(&catalog::list_inventory(db).await?),
        InventoryCommands::Show { property } => {
            to_pretty_json(&catalog::get_inventory(db, &property).await?)
        }
        InventoryCommands::Adjust {
            property,
            delta,
            reason,
        } => to_pretty_json(
            &catalog::adjust_inventory(db, &property, delta, reason.as_deref(), actor).await?,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_status_case_insensitively() {
        let cli = Cli::parse_from(["kho-admin", "import", "status", "abc", "completed"]);
        match cli.command {
            Commands::Import(ImportCommands::Status { status, .. }) => {
                assert_eq!(status, ImportStatus::Completed)
            }
            _ => panic!("expected import status"),
        }
    }

    #[test]
    fn test_negative_adjustment_is_accepted() {
        let cli = Cli::parse_from([
            "kho-admin",
            "--actor",
            "2b7e1c1e-6c55-4d43-9a57-8f7a3c0e9f10",
            "inventory",
            "adjust",
            "AT-DO-M",
            "--delta",
            "-2",
        ]);
        match cli.command {
            Commands::Inventory(InventoryCommands::Adjust { delta, .. }) => assert_eq!(delta, -2),
            _ => panic!("expected inventory adjust"),
        }
    }

    #[test]
    fn test_bulk_requires_ids() {
        assert!(Cli::try_parse_from(["kho-admin", "import", "bulk-process"]).is_err());
    }
}
