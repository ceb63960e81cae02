use anyhow::Context;
use attrx_api::RestApi;
use attrx_core::{AttributeRequest, AttributeSelector, Vocabulary};
use attrx_model::{ChatClient, VisionClient};
use attrx_storage::ProductDatabase;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Attribute-value resolution for e-commerce catalogs
#[derive(Parser, Debug)]
#[command(name = "attrx")]
#[command(about = "Select the best-fit attribute value for a product", long_about = None)]
struct Args {
    /// Vocabulary JSON file overriding the built-in tables
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// MySQL connection URL for the product database
    #[arg(long, env = "ATTRX_DATABASE_URL")]
    database_url: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 14736)]
        http_port: u16,
    },
    /// Resolve a single attribute and print the result as JSON
    Select {
        /// Product number
        product_number: String,
        /// Raw attribute name
        attribute_name: String,
        /// Candidate values as a JSON list
        values: String,
        /// Product image path
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List the distinct values of an attribute across the catalog
    Values {
        /// Canonical attribute name
        attribute_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting attrx v{}", env!("CARGO_PKG_VERSION"));

    let vocab = match &args.vocab {
        Some(path) => {
            info!("Loading vocabulary from {}", path.display());
            Vocabulary::from_json_file(path).context("failed to load vocabulary")?
        }
        None => Vocabulary::default(),
    };

    let database = Arc::new(
        ProductDatabase::connect_lazy(&args.database_url).context("invalid database URL")?,
    );

    if let Command::Values { attribute_name } = &args.command {
        let values = database.known_values(attribute_name).await?;
        println!("{}", serde_json::json!(values));
        return Ok(());
    }

    let chat = ChatClient::from_env().context("chat model configuration")?;
    let vision = VisionClient::from_env().context("vision model configuration")?;

    let selector = Arc::new(AttributeSelector::new(
        Arc::new(vocab),
        database,
        Arc::new(chat),
        Arc::new(vision),
    ));

    match args.command {
        Command::Serve { http_port } => {
            info!("HTTP API: http://localhost:{http_port}/attributes/select");
            RestApi::start(selector, http_port).await?;
        }
        Command::Select {
            product_number,
            attribute_name,
            values,
            image,
        } => {
            let candidates: Vec<String> =
                serde_json::from_str(&values).context("values must be a JSON list of strings")?;
            let request = AttributeRequest {
                product_id: product_number,
                attribute_name,
                candidates,
                image,
            };
            let result = selector.select_attribute_value(&request).await;
            println!(
                "{}",
                serde_json::json!([result.product_id, result.selected_value])
            );
        }
        Command::Values { .. } => unreachable!("handled before capability setup"),
    }

    Ok(())
}
