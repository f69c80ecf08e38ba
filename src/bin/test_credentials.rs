use acrewity_node::utils::{logger, validation::Validate};
use acrewity_node::{NodeConfig, ServiceNaming};
use clap::Parser;

#[derive(Parser)]
#[command(name = "test_credentials")]
#[command(about = "Check an Acrewity API key by generating a single UUID")]
struct Args {
    /// Path to the node TOML configuration
    #[arg(short, long, default_value = "acrewity.toml")]
    config: String,

    /// Override the service naming convention from config
    #[arg(long, value_enum)]
    service_naming: Option<ServiceNaming>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = NodeConfig::from_file(&args.config)?;
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let naming = args.service_naming.unwrap_or_else(|| config.service_naming());
    let client = config.build_client()?;

    println!("🔑 Testing Acrewity credentials against {}", client.endpoint());
    match client.test_credentials(naming).await {
        Ok(response) => {
            println!("✅ Credentials are valid");
            tracing::debug!("Response: {}", response);
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
