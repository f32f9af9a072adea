/*
[INPUT]:  NOWPAYMENTS_* environment variables, NOWPAYMENTS_EMAIL/NOWPAYMENTS_PASSWORD
[OUTPUT]: A payout batch awaiting 2FA verification
[POS]:    Examples - payout creation (login + gated call)
[UPDATE]: When payout flow changes
*/

use nowpayments_adapter::*;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn env(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| NowPaymentsError::Config(format!("{key} is not set")))
}

/// Example: log in, check the balance, create a payout
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut client = NowPayments::from_settings(&Settings::from_env()?)?;
    if client.session_token().is_none() {
        client
            .login(&env("NOWPAYMENTS_EMAIL")?, &env("NOWPAYMENTS_PASSWORD")?)
            .await?;
        info!("logged in");
    }

    let balance = client.payout().balance().await?;
    info!(%balance, "custody balance");

    let withdrawal = Withdrawal::new(
        "TEmGwPeRTPiLFLVfBxXkSP91yc5GMNQhfS",
        "trx",
        Decimal::from(200),
        "https://nowpayments.io",
    );
    let payout = client
        .payout()
        .create_payout(&CreatePayoutRequest::new(vec![withdrawal]))
        .await?;
    info!(payout_id = %payout["id"], "payout created; run verify_payout with the emailed code");
    Ok(())
}
