use evnav::config::Config;
use evnav::engine::Engine;
use evnav::error::Error;
use evnav::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let engine = Engine::new(&config)?;

    serve(engine, config.listen_addr).await
}
