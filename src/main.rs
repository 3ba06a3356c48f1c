#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::{error, info};

use catalog_console::config::{self, ApiConfig};
use catalog_console::error::SerializableError;
use catalog_console::shell::ConsoleNotifier;
use catalog_console::views::{FormMode, SubmitOutcome};
use catalog_console::{ConsoleApp, FormEdits, ProductApiClient, ProductId};

#[derive(Parser)]
#[command(name = "catalog-console")]
#[command(about = "Product catalog administration console")]
struct Cli {
    /// Print raw product records as JSON instead of screens
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Suppress success notifications
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    /// Backend base URL, overrides CATALOG_API_URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Request timeout in seconds, overrides CATALOG_API_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product table
    List,
    /// Show one product
    Show { id: String },
    /// Create a product
    Add {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Update every field of a product, starting from its stored values
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
        /// Position of a stored image to drop (repeatable)
        #[arg(long = "remove-image")]
        remove_images: Vec<usize>,
    },
    /// Delete a product without confirmation
    Delete { id: i64 },
    /// Render a console route such as /productDetails/3
    Open { path: String },
}

#[derive(clap::Args)]
struct FormArgs {
    /// Field assignment such as product_price=120 (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    fields: Vec<(String, String)>,
    /// Image file to upload (repeatable)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Existing image URL to keep on the product (repeatable)
    #[arg(long = "image-url")]
    image_urls: Vec<String>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))
}

impl FormArgs {
    fn into_edits(self, remove_images: Vec<usize>) -> FormEdits {
        FormEdits {
            fields: self.fields,
            image_urls: self.image_urls,
            image_files: self.images,
            remove_images,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();

    let mut settings = config::init_config().context("Failed to load application settings")?;
    if cli.base_url.is_some() || cli.timeout.is_some() {
        settings.api = ApiConfig::new(
            cli.base_url.as_deref().unwrap_or(&settings.api.base_url),
            cli.timeout.unwrap_or(settings.api.timeout_secs),
        )
        .context("Invalid command line API settings")?;
    }
    info!(
        "{} ({}) using backend {}",
        settings.app.name, settings.app.environment, settings.api.base_url
    );

    let client = ProductApiClient::new(&settings.api).context("Failed to create API client")?;
    let app = ConsoleApp::new(Arc::new(client), Arc::new(ConsoleNotifier::new(cli.quiet)));

    let succeeded = match cli.command {
        Commands::List if cli.json => match app.products().await {
            Some(products) => print_json(&products)?,
            None => false,
        },
        Commands::List => {
            print!("{}", app.open("/").await);
            true
        }
        Commands::Show { id } if cli.json => {
            let product = app.product(&id).await;
            print_json(&product)?;
            product.is_some()
        }
        Commands::Show { id } => {
            print!("{}", app.open(&format!("/productDetails/{}", id)).await);
            true
        }
        Commands::Add { form } => save(&app, FormMode::Create, form.into_edits(Vec::new())).await?,
        Commands::Edit {
            id,
            form,
            remove_images,
        } => save(&app, FormMode::Edit(id), form.into_edits(remove_images)).await?,
        Commands::Delete { id } => match app.delete(ProductId(id)).await {
            Some(table) => {
                if !cli.json {
                    print!("{}", table);
                }
                true
            }
            None => false,
        },
        Commands::Open { path } => {
            print!("{}", app.open(&path).await);
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn save(app: &ConsoleApp, mode: FormMode, edits: FormEdits) -> Result<bool> {
    let (outcome, screen) = match app.save(mode, &edits).await {
        Ok(result) => result,
        Err(e) => {
            error!("Could not prepare the form: {}", e);
            eprintln!("{}", serde_json::to_string(&SerializableError::from(&e))?);
            return Ok(false);
        }
    };

    if let Some(screen) = screen {
        print!("{}", screen);
    }
    follow(app).await;
    Ok(outcome == SubmitOutcome::Saved)
}

async fn follow(app: &ConsoleApp) {
    for screen in app.follow_navigation().await {
        print!("{}", screen);
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<bool> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(true)
}
