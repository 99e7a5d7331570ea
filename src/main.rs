use stworld::{config::AppConfig, observability, routes, server::Server, state::AppState};

#[tokio::main]
async fn main() -> stworld::Result<()> {
    let config = AppConfig::load()?;
    observability::init_tracing(&config)?;

    let state = AppState::new(config.clone())?;
    let app = routes::build_router(state);

    Server::new(config).serve(app).await
}
