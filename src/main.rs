use kaitori_board::chart::write_svg;
use kaitori_board::client::ApiClient;
use kaitori_board::config::{load_config, AppConfig};
use kaitori_board::pipeline::{fetch_detail, refresh, ProductDetail, Snapshot};
use kaitori_board::render::{
    render_product_detail, render_rates, render_stats, render_view, PriceStyle, Sparklines, View,
};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::var("KAITORI_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({config_path}): {e}");
            return;
        }
    };

    let client = match ApiClient::new(&config.api_base_url, config.request_timeout_seconds) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build API client: {e}");
            return;
        }
    };

    print!("{}", render_rates(&config.rates));
    let style = PriceStyle::from_compact(config.compact_prices);
    print!("{}", render_view(&View::Loading, &Sparklines::new(), style));

    // Main processing loop
    loop {
        info!("Refreshing from {}...", config.api_base_url);
        let result = match config.detail_product_id {
            Some(product_id) => fetch_detail(&client, product_id, &config)
                .await
                .map(|detail| print_detail(&detail, &config)),
            None => refresh(&client, &config)
                .await
                .map(|snapshot| print_snapshot(&snapshot, style)),
        };
        // The last printed output stays the current one.
        if let Err(e) = result {
            warn!("Refresh failed: {e}");
        }

        info!(
            "Waiting {}s for the next refresh (Ctrl-C to quit)...",
            config.refresh_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.refresh_interval_seconds)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }
}

fn print_snapshot(snapshot: &Snapshot, style: PriceStyle) {
    if let Some(stats) = &snapshot.stats {
        print!("{}", render_stats(stats));
    }
    let view = View::from_board(snapshot.board.clone());
    print!("{}", render_view(&view, &snapshot.sparklines, style));
}

fn print_detail(detail: &ProductDetail, config: &AppConfig) {
    print!("{}", render_product_detail(detail));

    let Some(dir) = &config.svg_dir else {
        return;
    };
    if detail.kline.is_empty() {
        return;
    }
    match write_svg(dir, detail.product_id, &detail.kline) {
        Ok(path) => info!("Wrote candle chart to {}", path.display()),
        Err(e) => warn!("Failed to write candle chart into {}: {e}", dir.display()),
    }
}
