use tracing_subscriber::{fmt, EnvFilter};

/// Поставить глобальный subscriber: фильтр из `RUST_LOG`, по умолчанию `info`.
/// Повторный вызов ничего не делает.
pub fn init_tracing(service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_target(false)
        .with_env_filter(env_filter)
        .compact()
        .try_init();

    tracing::info!(service = service_name, "tracing initialized");
}
