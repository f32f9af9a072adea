/*
[INPUT]:  Raw IPN body file, x-nowpayments-sig value, NOWPAYMENTS_IPN_SECRET
[OUTPUT]: Parsed payment notification when the signature matches
[POS]:    Examples - IPN (webhook) signature check
[UPDATE]: When IPN signature rules change
*/

use nowpayments_adapter::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Example: verify_ipn <body.json> <signature>
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(body_path), Some(signature)) = (args.next(), args.next()) else {
        return Err(NowPaymentsError::InvalidArgument(format!(
            "usage: verify_ipn <body.json> <{IPN_SIGNATURE_HEADER} value>"
        )));
    };
    let body = std::fs::read(&body_path)
        .map_err(|e| NowPaymentsError::Config(format!("failed to read {body_path}: {e}")))?;

    let client = NowPayments::from_settings(&Settings::from_env()?)?;
    match client.verify_ipn(&body, &signature) {
        Ok(payload) => {
            let notification = PaymentNotification::from_value(payload)?;
            info!(
                payment_id = %notification.payment_id,
                status = notification.payment_status.as_str(),
                final_status = notification.payment_status.is_final(),
                "IPN accepted"
            );
            Ok(())
        }
        Err(NowPaymentsError::InvalidSignature) => {
            warn!("IPN rejected: signature mismatch");
            Err(NowPaymentsError::InvalidSignature)
        }
        Err(err) => Err(err),
    }
}
