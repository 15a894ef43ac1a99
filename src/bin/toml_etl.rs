use clap::Parser;
use sauto_etl::core::ConfigProvider;
use sauto_etl::utils::error::ErrorSeverity;
use sauto_etl::utils::{logger, validation::Validate};
use sauto_etl::{EtlEngine, ListingPipeline, LocalStorage, ReqwestTransport, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Listing scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sauto-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the number of pages from config
    #[arg(long)]
    pages: Option<u32>,

    /// Dry run - show the plan and page URLs without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(pages) = args.pages {
        config.source.pages = Some(pages);
        tracing::info!("🔧 Page count overridden to: {}", pages);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let transport = ReqwestTransport::from_config(&config)?;
    let pipeline = ListingPipeline::new(storage, config, transport)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        perform_dry_run(&pipeline);
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report_path) => {
            tracing::info!("✅ Scrape run completed");
            println!("✅ Report saved to: {}", report_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {} ({:?})", config.pipeline.name, config.variant());
    if let Some(description) = &config.pipeline.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("🌐 Listing URL: {}", config.listing_url());
    tracing::info!(
        "📄 Pages: {}, listings per page: {}",
        config.pages(),
        config.max_items_per_page()
    );
    tracing::info!("🏷️ Brands: {}", config.brand_table().len());
    tracing::info!("💾 Output: {}", config.output_path());
}

fn perform_dry_run<S, T>(pipeline: &ListingPipeline<S, TomlConfig, T>)
where
    S: sauto_etl::core::Storage,
    T: sauto_etl::core::Transport,
{
    let config = pipeline.config();
    let pages = config.pages();

    println!("Would fetch {} pages:", pages);
    for page in 1..=pages.min(3) {
        println!("  {}", pipeline.page_url(page));
    }
    if pages > 3 {
        println!("  ... {}", pipeline.page_url(pages));
    }

    if config.variant().persists_snapshot() {
        println!("Snapshot: {}/{}", config.output_path(), config.snapshot_filename());
    }
    println!("Report:   {}/{}", config.output_path(), config.report_filename());
}
