/*
[INPUT]:  NOWPAYMENTS_* environment variables
[OUTPUT]: Hosted invoice URL and a payment attached to it
[POS]:    Examples - invoice flow
[UPDATE]: When invoice flow changes
*/

use nowpayments_adapter::*;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Example: create an invoice, then pay it in BTC
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let client = NowPayments::from_settings(&Settings::from_env()?)?;
    let payments = client.payment();

    let mut invoice = CreateInvoiceRequest::new(Decimal::from(1000), "usd");
    invoice.order_id = Some("RGDBP-21314".to_string());
    invoice.order_description = Some("Apple Macbook Pro 2019 x 1".to_string());
    invoice.ipn_callback_url = Some("https://nowpayments.io".to_string());
    invoice.success_url = Some("https://nowpayments.io".to_string());
    invoice.cancel_url = Some("https://nowpayments.io".to_string());

    let created = payments.create_invoice(&invoice).await?;
    info!(invoice_url = %created["invoice_url"], "invoice created");

    let Some(invoice_id) = created["id"].as_str() else {
        return Err(NowPaymentsError::InvalidResponse(format!(
            "invoice response has no id: {created}"
        )));
    };
    let payment = payments
        .create_invoice_payment(&InvoicePaymentRequest::new(invoice_id, "btc"))
        .await?;
    info!(%payment, "invoice payment created");
    Ok(())
}
