use std::sync::Arc;

use toban_bot::channels::{LineChannel, Notifier};
use toban_bot::config::BotConfig;
use toban_bot::controller::ReminderController;
use toban_bot::scheduler::{spawn_trigger_loop, TriggerSchedule};
use toban_bot::store::{LibSqlRosterStore, MemoryRosterStore, RosterStore};
use toban_bot::webhook::{webhook_routes, WebhookState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  Required: LINE_CHANNEL_SECRET, LINE_CHANNEL_ACCESS_TOKEN, LINE_GROUP_ID");
        std::process::exit(1);
    });

    eprintln!("📋 Toban Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Daily reminder: {:02}:{:02} (UTC{:+})",
        config.schedule.daily_hour, config.schedule.daily_minute, config.schedule.utc_offset_hours,
    );
    eprintln!(
        "   Weekly reset: {:?} {:02}:{:02}",
        config.schedule.reset_weekday, config.schedule.reset_hour, config.schedule.reset_minute,
    );
    eprintln!("   Webhook: http://0.0.0.0:{}/callback", config.port);

    // ── Store ────────────────────────────────────────────────────────────
    let store: Arc<dyn RosterStore> = match &config.db_path {
        Some(path) => {
            eprintln!("   Database: {path}");
            Arc::new(
                LibSqlRosterStore::new_local(std::path::Path::new(path))
                    .await
                    .unwrap_or_else(|e| {
                        eprintln!("Error: Failed to open database at {path}: {e}");
                        std::process::exit(1);
                    }),
            )
        }
        None => {
            eprintln!("   Database: none (in-memory roster, lost on restart)");
            Arc::new(MemoryRosterStore::new())
        }
    };

    // ── Channel + controller ─────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> =
        Arc::new(LineChannel::new(config.channel_access_token.clone()));

    let controller = Arc::new(ReminderController::new(
        Arc::clone(&store),
        Arc::clone(&notifier),
        config.group_id.clone(),
        config.residual_indexing,
    ));

    // ── Scheduler ────────────────────────────────────────────────────────
    let schedule = TriggerSchedule::new(&config.schedule)?;
    let _trigger_handle = spawn_trigger_loop(Arc::clone(&controller), schedule);

    // ── Webhook server ───────────────────────────────────────────────────
    let app = webhook_routes(WebhookState {
        controller,
        notifier,
        channel_secret: config.channel_secret.clone(),
        allowed_source: config.allowed_source.clone(),
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
