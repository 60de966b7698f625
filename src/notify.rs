//! Notification content and the dispatch decision.
//!
//! Formatting is pure: the subject and both body variants are derived from a
//! [`LocationReport`] alone. [`dispatch`] evaluates the ordered decision
//! (recipient check, credentials check, then the actual send) and maps every
//! outcome to a response message. A transport failure is terminal for the
//! request's notification attempt; it is logged, not retried, and never
//! surfaces as an HTTP error.

use crate::config::Config;
use crate::mail::{Email, MailError, Mailer};
use crate::report::{LocationReport, NOT_AVAILABLE};

/// HTML shell for the rich body. Metadata rows are injected into `{{rows}}`.
const HTML_TEMPLATE: &str = include_str!("../templates/notification.html");

/// Outcome of a notification dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    NoRecipient,
    NoCredentials,
    Failed,
}

impl DispatchOutcome {
    /// Human-readable outcome for the HTTP response body.
    pub fn message(&self) -> &'static str {
        match self {
            DispatchOutcome::Sent => "Location received and email sent",
            DispatchOutcome::NoRecipient => {
                "Location received (no notification recipient configured)"
            }
            DispatchOutcome::NoCredentials => {
                "Location received (email not sent - missing credentials)"
            }
            DispatchOutcome::Failed => "Location received (email notification failed)",
        }
    }
}

/// Evaluate the dispatch decision and attempt delivery where configured.
///
/// Checks short-circuit in order: recipient, credentials, send. The transport
/// is only touched on the final arm.
pub async fn dispatch(
    config: &Config,
    mailer: Option<&dyn Mailer>,
    report: &LocationReport,
) -> DispatchOutcome {
    let Some(to) = config.email_to.as_deref() else {
        tracing::warn!("no notification recipient configured, skipping email");
        return DispatchOutcome::NoRecipient;
    };

    let (Some(mailer), Some((from, _))) = (mailer, config.smtp_credentials()) else {
        tracing::warn!("email credentials not set, skipping email");
        return DispatchOutcome::NoCredentials;
    };

    let email = match build_email(report, from, to) {
        Ok(email) => email,
        Err(e) => {
            tracing::error!(error = %e, "failed to build notification email");
            return DispatchOutcome::Failed;
        }
    };

    match mailer.send(&email).await {
        Ok(()) => {
            tracing::info!(to, "notification email sent");
            DispatchOutcome::Sent
        }
        Err(e) => {
            tracing::error!(error = %e, "notification email failed");
            DispatchOutcome::Failed
        }
    }
}

/// Build the multipart notification email for a report.
pub fn build_email(report: &LocationReport, from: &str, to: &str) -> Result<Email, MailError> {
    Email::builder()
        .from(from)
        .to(to)
        .subject(subject(report))
        .text(text_body(report))
        .html(html_body(report))
        .build()
}

/// Subject line; flags VPN detection when the client reported one.
pub fn subject(report: &LocationReport) -> String {
    if report.vpn_detected() {
        "New location captured (VPN detected)".to_string()
    } else {
        "New location captured".to_string()
    }
}

/// Label/value pairs for the metadata table, placeholder-substituted.
///
/// VPN provider and server location appear only when a VPN was detected.
fn metadata(report: &LocationReport) -> Vec<(&'static str, String)> {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut rows = vec![
        ("Device", or_na(&report.device)),
        (
            "Coordinates",
            format!("{:.6}, {:.6}", report.lat, report.lng),
        ),
        (
            "Accuracy",
            report
                .accuracy
                .map(|m| format!("~{} m", m.round() as i64))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Public IPv4", or_na(&report.public_ipv4)),
        ("Local IPv4", or_na(&report.local_ipv4)),
        ("Public IPv6", or_na(&report.public_ipv6)),
        ("Local IPv6", or_na(&report.local_ipv6)),
        (
            "VPN",
            match report.is_vpn {
                Some(true) => "Detected".to_string(),
                Some(false) => "Not detected".to_string(),
                None => NOT_AVAILABLE.to_string(),
            },
        ),
    ];

    if report.vpn_detected() {
        rows.push(("VPN provider", or_na(&report.vpn_provider)));
        rows.push(("VPN server location", or_na(&report.vpn_server_location)));
    }

    rows
}

/// Plain-text body variant.
pub fn text_body(report: &LocationReport) -> String {
    let mut body = format!("{}\n\nMap: {}\n", subject(report), report.map_link());
    for (label, value) in metadata(report) {
        body.push_str(&format!("{}: {}\n", label, value));
    }
    body.push_str(&format!("Captured: {}\n", report.formatted_time()));
    body
}

/// HTML body variant, rendered from the template asset.
pub fn html_body(report: &LocationReport) -> String {
    let rows: String = metadata(report)
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<tr style="border-bottom: 1px solid #dee2e6;">
                    <td style="padding: 0.5rem; color: #6c757d; white-space: nowrap;">{}</td>
                    <td style="padding: 0.5rem;">{}</td>
                </tr>"#,
                label,
                escape(value)
            )
        })
        .collect();

    HTML_TEMPLATE
        .replace("{{subject}}", &escape(&subject(report)))
        .replace("{{map_link}}", &report.map_link())
        .replace("{{rows}}", &rows)
        .replace("{{captured_at}}", &escape(&report.formatted_time()))
}

/// Minimal HTML escaping for client-supplied values.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
