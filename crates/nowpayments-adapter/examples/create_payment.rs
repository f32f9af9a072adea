/*
[INPUT]:  NOWPAYMENTS_* environment variables
[OUTPUT]: A new payment with its deposit address
[POS]:    Examples - payment creation
[UPDATE]: When payment creation flow changes
*/

use nowpayments_adapter::*;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Example: estimate, check the minimum, then create a payment
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::from_env()?;
    let client = NowPayments::from_settings(&settings)?;
    let payments = client.payment();

    let status = client.api_status().await?;
    info!(%status, "api status");

    let estimate = payments
        .estimated_price(&EstimateQuery::new(Decimal::from(10), "usd", "trx"))
        .await?;
    info!(%estimate, "estimated price");

    let minimum = payments
        .minimum_amount(&MinAmountQuery::new("trx", "usd"))
        .await?;
    info!(%minimum, "minimum amount");

    let request = CreatePaymentRequest::new(
        Decimal::from(10),
        "usd",
        "trx",
        "https://nowpayments.io",
        "74364712",
    );
    let payment = payments.create_payment(&request).await?;
    info!(
        payment_id = %payment["payment_id"],
        pay_address = %payment["pay_address"],
        "payment created"
    );
    Ok(())
}
