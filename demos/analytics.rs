use feedback_collector::{ClientBuilder, config::Config};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let client = ClientBuilder::from_config(&config.api).build()?;

    let analytics = client.analytics().await?;

    println!("{} ratings, {:.2} on average", analytics.total, analytics.average);

    for rating in (1..=5).rev() {
        println!("{rating} stars: {}", analytics.count_for(rating));
    }

    Ok(())
}
