use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   dotenvy::dotenv().ok();
    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = chatproxy::ProxyConfig::from_env()?;
    if !config.has_api_key()
    {   warn!(
          "OPENAI_API_KEY is not set; every chat request will fail"
        );
    }

    let bind_addr = config.bind_addr.clone();
    let app = chatproxy::router(chatproxy::build_handler(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
      "chatproxy listening on {} (POST {})",
      listener.local_addr()?,
      chatproxy::CHAT_ROUTE
    );

    axum::serve(listener, app).await?;
    Ok(())
}
