use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use shorts_catalog::api::ApiServer;
use shorts_catalog::enrichment::{EnrichmentClient, EnrichmentPrompts, PacingPolicy, CALLS_PER_BATCH};
use shorts_catalog::{create_llm, CatalogBuilder, CatalogStore, Config, QueryService, YouTubeClient};

fn cli() -> Command {
    Command::new("shorts-catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build, enrich and search a catalog of short programming videos")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
                .global(true)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
                .global(true)
        )
        .subcommand(
            Command::new("build")
                .about("Harvest channel uploads and keep short videos in the raw catalog")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Raw catalog file (defaults to catalog.raw_path)")
                )
        )
        .subcommand(
            Command::new("enrich")
                .about("Assign categories and keywords to the raw catalog")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Raw catalog file (defaults to catalog.raw_path)")
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Enriched catalog file (defaults to catalog.enriched_path)")
                )
        )
        .subcommand(Command::new("run").about("Build then enrich"))
        .subcommand(
            Command::new("serve")
                .about("Serve search over the enriched catalog")
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Port to listen on")
                        .value_parser(clap::value_parser!(u16))
                )
        )
        .subcommand(Command::new("channels").about("List the configured source channels"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter_directive(matches.get_flag("verbose")))
        .init();

    info!("🚀 Shorts Catalog v{} starting...", env!("CARGO_PKG_VERSION"));

    match matches.subcommand() {
        Some(("build", sub)) => {
            if let Some(output) = sub.get_one::<String>("output") {
                config.catalog.raw_path = PathBuf::from(output);
            }
            build(&config).await
        }
        Some(("enrich", sub)) => {
            apply_enrich_paths(&mut config, sub);
            enrich(&config).await
        }
        Some(("run", _)) => {
            build(&config).await?;
            enrich(&config).await
        }
        Some(("serve", sub)) => {
            if let Some(port) = sub.get_one::<u16>("port") {
                config.server.port = *port;
            }
            serve(&config).await
        }
        Some(("channels", _)) => {
            for channel in &config.youtube.channels {
                println!("{}", channel);
            }
            Ok(())
        }
        _ => unreachable!("subcommand_required is set"),
    }
}

fn apply_enrich_paths(config: &mut Config, matches: &ArgMatches) {
    if let Some(input) = matches.get_one::<String>("input") {
        config.catalog.raw_path = PathBuf::from(input);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.catalog.enriched_path = PathBuf::from(output);
    }
}

async fn build(config: &Config) -> Result<()> {
    config.validate_for_build()?;
    info!("🔧 {}", config.summary());

    let platform = Arc::new(YouTubeClient::new(&config.youtube)?);
    let report = CatalogBuilder::new(platform)
        .build(&config.youtube.channels, &config.catalog.raw_path)
        .await?;

    info!("📺 Channels processed: {}", report.channels_processed);
    info!("⏭️  Channels skipped: {}", report.channels_skipped);
    info!("🎬 Shorts kept: {} of {}", report.shorts_kept, report.videos_seen);
    Ok(())
}

async fn enrich(config: &Config) -> Result<()> {
    config.validate_for_enrich()?;

    let llm = create_llm(&config.llm)?;
    let prompts = EnrichmentPrompts::load(&config.llm.prompts).await;
    let pacing = PacingPolicy::from_rate(config.enrichment.requests_per_minute, CALLS_PER_BATCH);
    let client = EnrichmentClient::new(llm, config.enrichment.batch_size, pacing, prompts);

    let start_time = std::time::Instant::now();
    let report = client
        .enrich_file(&config.catalog.raw_path, &config.catalog.enriched_path)
        .await?;

    info!("🎉 Enrichment completed in {:.2}s", start_time.elapsed().as_secs_f64());
    info!("✅ Videos enriched: {}", report.videos);
    info!("❌ Failed batches: {} categories, {} keywords",
        report.failed_category_batches,
        report.failed_keyword_batches
    );
    Ok(())
}

async fn serve(config: &Config) -> Result<()> {
    let store = Arc::new(CatalogStore::load(&config.catalog.enriched_path).await);
    let service = Arc::new(QueryService::new(store, config.search.clone()));

    ApiServer::new(service, config.server.clone()).start().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["shorts-catalog", "serve", "--port", "9000", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "serve");
        assert_eq!(sub.get_one::<u16>("port"), Some(&9000));
    }

    #[test]
    fn test_enrich_paths_override_config() {
        let matches = cli()
            .try_get_matches_from(["shorts-catalog", "enrich", "-i", "in.json", "-o", "out.json"])
            .unwrap();
        let mut config = Config::default();
        apply_enrich_paths(&mut config, matches.subcommand_matches("enrich").unwrap());

        assert_eq!(config.catalog.raw_path, PathBuf::from("in.json"));
        assert_eq!(config.catalog.enriched_path, PathBuf::from("out.json"));
    }
}
