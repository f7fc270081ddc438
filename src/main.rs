use atlas::api::SortOrder;
use atlas::core::config::{self, CliOverrides};
use atlas::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "atlas", about = "Search countries and browse their cities")]
struct Args {
    /// Initial city sort order
    #[arg(short, long, value_enum)]
    sort: Option<SortOrder>,

    /// Override the country list endpoint
    #[arg(long)]
    countries_url: Option<String>,

    /// Override the city population endpoint
    #[arg(long)]
    cities_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // A malformed config file must not stop the app; fall back to defaults
    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (config::AtlasConfig::default(), Some(e)),
    };

    let cli = CliOverrides {
        sort: args.sort,
        countries_url: args.countries_url,
        cities_url: args.cities_url,
        log_level: args.log_level,
    };
    let resolved = config::resolve(&file_config, &cli);

    // File logger - the terminal belongs to the TUI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "Atlas starting up: countries={}, cities={}, sort={:?}",
        resolved.countries_url,
        resolved.cities_url,
        resolved.sort_order
    );

    tui::run(resolved)
}
