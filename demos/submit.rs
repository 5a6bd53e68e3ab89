//! Signs in and leaves feedback.
//!
//! ```sh
//! cargo run --example submit -- ana@example.com hunter22 5 "Fast and friendly!"
//! ```

use anyhow::Context;
use feedback_collector::{
    ClientBuilder,
    config::Config,
    form::{FeedbackForm, SignInForm},
    session::SessionStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let email = args.next().context("missing email")?;
    let password = args.next().context("missing password")?;
    let rating: u8 = args.next().context("missing rating")?.parse()?;
    let comment = args.next().unwrap_or_default();

    let config = Config::load()?;
    let client = ClientBuilder::from_config(&config.api).build()?;
    let store = SessionStore::from_config(&config);

    let session = match store.user().await? {
        Some(session) if session.user().email == email => session,
        _ => {
            let session = SignInForm::new(email, password).submit(&client).await?;
            store.save_user(&session).await?;
            session
        }
    };

    let mut form = FeedbackForm::new();
    form.select_rating(rating)?;
    form.set_comment(comment);

    let feedback = form.submit(&client, &session).await?;

    println!("thanks, {}!", session.user().username);
    println!("feedback #{} filed as {}", feedback.id, feedback.sentiment());

    Ok(())
}
