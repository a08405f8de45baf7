use orderflow_engine::EnginePolicy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orderflow_observability::init();

    let allow_payments_on_voided = std::env::var("ALLOW_PAYMENTS_ON_VOIDED")
        .map(|v| !matches!(v.as_str(), "false" | "0"))
        .unwrap_or(true);
    let policy = EnginePolicy {
        allow_payments_on_voided,
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = orderflow_api::app::build_app(policy);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
