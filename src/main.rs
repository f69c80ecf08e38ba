use acrewity_node::utils::{logger, validation::Validate};
use acrewity_node::{AcrewityNode, CliConfig, LocalStorage, NodeConfig, NodeRunner};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置 (日誌格式可能由配置決定，先載入再初始化日誌)
    let loaded = NodeConfig::from_file(&cli.config);
    let json_logs = cli.json_logs || loaded.as_ref().map(|c| c.json_logs()).unwrap_or(false);
    if json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting acrewity-node");
    tracing::info!("📁 Loading configuration from: {}", cli.config);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證命令列與配置
    cli.apply_overrides(&mut config);
    if let Err(e) = cli.validate().and_then(|_| config.validate()) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Node '{}' configured: resource={}, operation={}, policy={:?}",
        config.node.name.as_deref().unwrap_or("Acrewity"),
        config.node.resource,
        config.node.operation.as_deref().unwrap_or("(default)"),
        config.error_policy()
    );

    let node = AcrewityNode::new(config.build_client()?, config.settings());
    let monitor_enabled = cli.monitor || config.monitoring_enabled();
    let runner = NodeRunner::new_with_monitoring(LocalStorage::new(".".to_string()), node, monitor_enabled);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no requests will be sent");
        let items = runner.load_items(&cli.input).await?;
        for (index, preview) in runner.node().preview(&items).into_iter().enumerate() {
            match preview {
                Ok(request) => println!("[{}] {}", index, serde_json::to_string(&request)?),
                Err(e) => println!("[{}] ❌ {}", index, e),
            }
        }
        return Ok(());
    }

    match runner.run(&cli.input, &cli.output).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Processed {} items ({} failed)",
                summary.items,
                summary.failed
            );
            println!("✅ Processed {} items ({} failed)", summary.items, summary.failed);
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!("❌ Node execution failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
