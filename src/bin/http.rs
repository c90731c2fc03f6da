#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use critical_path_tool::{AnalyzerConfig, CriticalPathAnalyzer, JsonDirTaskStore, http_api, logging};

    let config = AnalyzerConfig::load_default()?;
    logging::init_tracing(config.log_filter.as_deref())?;

    let addr: SocketAddr = std::env::var("CRITICAL_PATH_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let analyzer = CriticalPathAnalyzer::from_config(&config);
    let state = match std::env::var("CRITICAL_PATH_STORE_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let store = JsonDirTaskStore::new(dir)?;
            http_api::AppState::with_store(analyzer, Arc::new(store))?
        }
        _ => http_api::AppState::new(analyzer),
    };

    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
