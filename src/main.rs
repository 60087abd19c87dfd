#[tokio::main]
async fn main() -> anhbot::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("anhbot=info,serenity=warn"),
    )
    .init();

    log::info!("Starting anhbot Discord bot");

    match anhbot::run().await {
        Ok(()) => {
            log::info!("Bot shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Bot encountered an error: {e}");
            Err(e)
        }
    }
}
