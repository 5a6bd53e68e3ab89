//! Logs in as an administrator and prints the dashboard.
//!
//! ```sh
//! FEEDBACK_ADMIN_USERNAME=admin FEEDBACK_ADMIN_PASSWORD=change-me \
//!     cargo run --example dashboard -- admin change-me negative "slow"
//! ```

use anyhow::Context;
use feedback_collector::{
    ClientBuilder,
    config::Config,
    dashboard::{Dashboard, Filter},
    form::AdminLoginForm,
    session::{ConfiguredAdmin, SessionStore},
};
use tracing_subscriber::EnvFilter;

const BAR_WIDTH: usize = 40;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let username = args.next().context("missing admin username")?;
    let password = args.next().context("missing admin password")?;
    let filter: Filter = args.next().as_deref().unwrap_or("all").parse()?;
    let search = args.next().unwrap_or_default();

    let config = Config::load()?;
    let client = ClientBuilder::from_config(&config.api).build()?;
    let store = SessionStore::from_config(&config);

    let admin = match store.admin().await? {
        Some(admin) => admin,
        None => {
            let admin = AdminLoginForm::new(username, password)
                .submit(&ConfiguredAdmin::from_config(&config))
                .await?;
            store.save_admin(&admin).await?;
            admin
        }
    };

    let mut dashboard = Dashboard::open(&client, &admin).await?;
    dashboard.set_filter(filter);
    dashboard.set_search(search);

    let stats = dashboard.stats();
    println!("total feedback   {}", stats.total);
    println!("average rating   {:.1}", stats.average_rating);
    println!("positive         {} ({:.1}%)", stats.positive, stats.positive_percentage);
    println!("negative         {} ({:.1}%)", stats.negative, stats.negative_percentage);
    println!("neutral          {} ({:.1}%)", stats.neutral, stats.neutral_percentage);
    println!();

    let chart = dashboard.chart();
    let max = chart.iter().map(|bar| bar.count).max().unwrap_or(0).max(1);
    for bar in &chart {
        let width = bar.count * BAR_WIDTH / max;
        println!(
            "{:>10} {:<pad$} {}",
            bar.label(),
            "#".repeat(width),
            bar.count,
            pad = BAR_WIDTH
        );
    }
    println!();

    let visible = dashboard.visible();
    println!("showing {} of {} ({filter})", visible.len(), dashboard.reviews().len());
    for review in visible {
        println!(
            "{} {:<16} {:<10} {}",
            review.stars(),
            review.name(),
            review.sentiment_label(),
            review.comment_text()
        );
    }

    Ok(())
}
