/*
[INPUT]:  Payout id and 2FA code as arguments, NOWPAYMENTS_* environment variables
[OUTPUT]: Verification result and the payout status
[POS]:    Examples - payout verification
[UPDATE]: When payout verification flow changes
*/

use nowpayments_adapter::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Example: verify_payout <payout_id> <verification_code>
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(payout_id), Some(code)) = (args.next(), args.next()) else {
        return Err(NowPaymentsError::InvalidArgument(
            "usage: verify_payout <payout_id> <verification_code>".to_string(),
        ));
    };

    // NOWPAYMENTS_SESSION_TOKEN must hold a token from a recent login
    let client = NowPayments::from_settings(&Settings::from_env()?)?;
    let payouts = client.payout();

    let verified = payouts.verify_payout(&payout_id, &code).await?;
    info!(%verified, "payout verified");

    let status = payouts.payout_status(&payout_id).await?;
    info!(%status, "payout status");
    Ok(())
}
