use clap::Parser;
use finterm::cli::commands::{Cli, Commands};
use finterm::infrastructure::config::Config;
use finterm::infrastructure::csv::term_file::read_term_file;
use finterm::FinTerm;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let ft = match FinTerm::from_config(config) {
        Ok(ft) => ft,
        Err(e) => {
            eprintln!("Error initializing finterm: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(ft, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(ft: FinTerm, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Load { csv, limit } => {
            let limit = limit.unwrap_or(ft.config().row_limit);
            let records = read_term_file(&csv, limit)?;
            let total = records.len() as u64;

            let bars = MultiProgress::new();
            let style = ProgressStyle::with_template(
                "{msg:>9} [{bar:40}] {pos}/{len} ({eta})",
            )?
            .progress_chars("=>-");
            let embed_bar = bars.add(ProgressBar::new(total).with_style(style.clone()));
            embed_bar.set_message("embedding");
            let insert_bar = bars.add(ProgressBar::new(total).with_style(style));
            insert_bar.set_message("inserting");

            let embed_bar_cb = embed_bar.clone();
            let insert_bar_cb = insert_bar.clone();
            let summary = ft
                .import(
                    records,
                    Some(&move |done, _total| embed_bar_cb.set_position(done as u64)),
                    Some(&move |done, _total| insert_bar_cb.set_position(done as u64)),
                )
                .await?;
            embed_bar.finish();
            insert_bar.finish();

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Search { query, top_k } => {
            ft.warn_on_dimension_drift().await;
            let matches = ft.search(&query, top_k).await?;
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Commands::Stats => {
            let stats = ft.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Commands::Serve { host, port } => {
            ft.warn_on_dimension_drift().await;
            let host = host.unwrap_or_else(|| ft.config().http_host.clone());
            let port = port.unwrap_or(ft.config().http_port);
            finterm::web::serve(ft, &host, port).await?;
        }
    }
    Ok(())
}
