//! Spreadsheet mirroring through a webhook.
//!
//! Reports are POSTed as JSON to the configured URL. The response body is never
//! read and failed deliveries are not retried; the caller reports the failure
//! and carries on.

use crate::{
    core::{export::PayslipRow, period::PayPeriod, settings::Settings},
    errors::{Error, Result},
};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(15);

/// Which table is being mirrored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WebhookReportType {
    /// Draft payslips from salary processing
    SalaryProcessingReport,
    /// Finalized payslips from the ledger
    SalaryReport,
}

/// Body POSTed to the webhook
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebhookPayload {
    /// Kind of report
    #[serde(rename = "type")]
    pub kind: WebhookReportType,
    /// Month name, e.g. "March"
    pub month: String,
    /// Year
    pub year: i32,
    /// Payslip rows
    pub data: Vec<PayslipRow>,
}

/// Builds the payload for `rows` filed under `period`.
#[must_use]
pub fn build_payload(
    kind: WebhookReportType,
    period: PayPeriod,
    rows: Vec<PayslipRow>,
) -> WebhookPayload {
    WebhookPayload {
        kind,
        month: period.month_name().to_string(),
        year: period.year,
        data: rows,
    }
}

/// HTTP client used for mirroring.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(WEBHOOK_TIMEOUT).build()?)
}

/// POSTs `payload` to the webhook configured in `settings`.
///
/// # Errors
/// * [`Error::WebhookNotConfigured`] when no URL is set
/// * [`Error::Webhook`] when the request cannot be delivered
pub async fn mirror(client: &Client, settings: &Settings, payload: &WebhookPayload) -> Result<()> {
    let url = settings
        .webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(Error::WebhookNotConfigured)?;

    client
        .post(url)
        .json(payload)
        .send()
        .await
        .inspect_err(|e| warn!("Webhook delivery to {url} failed: {e}"))?;

    info!(
        "Mirrored {:?} for {} {} ({} rows)",
        payload.kind,
        payload.month,
        payload.year,
        payload.data.len()
    );
    Ok(())
}
