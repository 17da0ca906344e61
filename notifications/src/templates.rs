//! HTML email templates
//!
//! Both templates are plain functions from a request (plus the footer year) to
//! a subject line and an HTML body. Every caller-supplied value goes through
//! [`escape_html`] before it is interpolated; subjects are plain text and are
//! left as is.

use crate::requests::{BookingConfirmationRequest, BookingNotificationRequest, NotificationStatus};

/// A rendered email, ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
}

/// Escape `& < > " '` for safe interpolation into HTML text and attributes
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// First eight characters of a booking id followed by `...`
#[must_use]
pub fn short_booking_id(booking_id: &str) -> String {
    let prefix: String = booking_id.chars().take(8).collect();
    format!("{prefix}...")
}

/// Presence nature tag with underscores replaced by spaces
#[must_use]
pub fn presence_label(presence_nature: &str) -> String {
    presence_nature.replace('_', " ")
}

/// Render a number the way a booking form shows it: `2`, not `2.0`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)] // guarded by the range check
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// `1 hour`, `2 hours`, `1.5 hours`; plural only above one
#[must_use]
pub fn duration_label(hours: f64) -> String {
    let suffix = if hours > 1.0 { "s" } else { "" };
    format!("{} hour{suffix}", format_number(hours))
}

/// `₹3000`
#[must_use]
pub fn amount_label(amount: f64) -> String {
    format!("₹{}", format_number(amount))
}

struct StatusCopy {
    subject: String,
    color: &'static str,
    text: &'static str,
    message: &'static str,
}

fn status_copy(status: NotificationStatus, companion_name: &str) -> StatusCopy {
    match status {
        NotificationStatus::Confirmed => StatusCopy {
            subject: "✅ Your Sathi Booking is Confirmed!".to_string(),
            color: "#22c55e",
            text: "Confirmed",
            message: "Great news! Your presence booking has been confirmed.",
        },
        NotificationStatus::Cancelled => StatusCopy {
            subject: format!("❌ Booking Update - {companion_name}"),
            color: "#ef4444",
            text: "Cancelled",
            message: "We regret to inform you that your booking has been cancelled.",
        },
    }
}

fn detail_row(label: &str, value: &str) -> String {
    format!(
        r#"
                  <div class="detail-row">
                    <span class="detail-label">{label}</span>
                    <span class="detail-value">{value}</span>
                  </div>"#
    )
}

const NEXT_STEPS_STYLE: &str = r"
              .next-steps { background: #e8f5e9; padding: 20px; border-radius: 8px; margin: 20px 0; }
              .next-steps h3 { color: #2e7d32; margin-bottom: 10px; }
              .next-steps ul { margin: 0; padding-left: 20px; }
              .next-steps li { margin: 8px 0; color: #1b5e20; }";

const NEXT_STEPS_BLOCK: &str = r#"
                <div class="next-steps">
                  <h3>📋 What's Next?</h3>
                  <ul>
                    <li>Your companion will meet you at the specified venue</li>
                    <li>Please arrive on time for the best experience</li>
                    <li>Remember: Travel and meal costs are covered by you</li>
                    <li>All meetings must be in public places only</li>
                  </ul>
                </div>"#;

const HELP_TEXT_BLOCK: &str = r#"
                <div class="help-text">
                  <p>If you have any questions about this cancellation, please reach out to our support team.</p>
                </div>"#;

/// Customer email announcing a confirmed or cancelled booking
#[must_use]
pub fn render_confirmation(request: &BookingConfirmationRequest, year: i32) -> RenderedEmail {
    let copy = status_copy(request.status, &request.companion_name);
    let is_confirmed = request.status == NotificationStatus::Confirmed;

    let details = [
        detail_row("Booking ID", &escape_html(&short_booking_id(&request.booking_id))),
        detail_row("Date", &escape_html(&request.booking_date)),
        detail_row("Time", &escape_html(&request.start_time)),
        detail_row("Duration", &duration_label(request.duration_hours)),
        detail_row("Venue", &escape_html(&request.venue_name)),
        detail_row("Address", &escape_html(&request.venue_address)),
        detail_row(
            "Presence Type",
            &escape_html(&presence_label(&request.presence_nature)),
        ),
    ]
    .concat();

    let next_steps_style = if is_confirmed { NEXT_STEPS_STYLE } else { "" };
    let closing_block = if is_confirmed {
        NEXT_STEPS_BLOCK
    } else {
        HELP_TEXT_BLOCK
    };

    let color = copy.color;
    let status_text = copy.text;
    let badge = copy.text.to_uppercase();
    let message = copy.message;
    let companion = escape_html(&request.companion_name);
    let amount = amount_label(request.total_amount);

    let html = format!(
        r#"<!DOCTYPE html>
          <html>
          <head>
            <meta charset="UTF-8">
            <style>
              body {{ font-family: 'Inter', Arial, sans-serif; line-height: 1.6; color: #1a1a2e; margin: 0; padding: 0; }}
              .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
              .header {{ background: linear-gradient(135deg, #3d5a80, #4a6fa5); color: white; padding: 30px; border-radius: 12px 12px 0 0; text-align: center; }}
              .status-badge {{ display: inline-block; background: {color}; color: white; padding: 8px 20px; border-radius: 20px; font-weight: 600; margin-top: 15px; }}
              .content {{ background: #f8f9fa; padding: 30px; border-radius: 0 0 12px 12px; }}
              .message {{ text-align: center; padding: 20px; font-size: 16px; }}
              .booking-details {{ background: white; padding: 20px; border-radius: 8px; margin: 20px 0; }}
              .detail-row {{ display: flex; justify-content: space-between; padding: 12px 0; border-bottom: 1px solid #eee; }}
              .detail-row:last-child {{ border-bottom: none; }}
              .detail-label {{ color: #666; font-weight: 500; }}
              .detail-value {{ color: #1a1a2e; font-weight: 600; text-align: right; }}
              .amount {{ font-size: 24px; color: #3d5a80; }}
              .companion-card {{ background: white; padding: 20px; border-radius: 8px; margin: 20px 0; text-align: center; }}
              .companion-name {{ font-size: 20px; font-weight: 600; color: #3d5a80; margin-bottom: 5px; }}{next_steps_style}
              .footer {{ text-align: center; padding: 20px; color: #666; font-size: 12px; }}
              .help-text {{ background: #fff3cd; padding: 15px; border-radius: 8px; margin: 20px 0; text-align: center; font-size: 14px; }}
            </style>
          </head>
          <body>
            <div class="container">
              <div class="header">
                <h1>Booking {status_text}</h1>
                <span class="status-badge">{badge}</span>
              </div>
              <div class="content">
                <div class="message">
                  <p>{message}</p>
                </div>

                <div class="companion-card">
                  <p style="color: #666; margin-bottom: 5px;">Your Companion</p>
                  <p class="companion-name">{companion}</p>
                </div>

                <div class="booking-details">{details}
                  <div class="detail-row">
                    <span class="detail-label">Total Amount</span>
                    <span class="detail-value amount">{amount}</span>
                  </div>
                </div>
{closing_block}
              </div>
              <div class="footer">
                <p>Thank you for choosing Sathi</p>
                <p>The Luxury of Quiet Presence</p>
                <p style="margin-top: 15px;">© {year} Sathi. All rights reserved.</p>
              </div>
            </div>
          </body>
          </html>"#
    );

    RenderedEmail {
        subject: copy.subject,
        html,
    }
}

/// Admin email announcing a new booking request
#[must_use]
pub fn render_admin_notification(request: &BookingNotificationRequest, year: i32) -> RenderedEmail {
    let mut details = [
        detail_row("Booking ID", &escape_html(&short_booking_id(&request.booking_id))),
        detail_row("Client Email", &escape_html(&request.user_name)),
        detail_row("Companion", &escape_html(&request.companion_name)),
        detail_row("Date", &escape_html(&request.booking_date)),
        detail_row("Time", &escape_html(&request.start_time)),
        detail_row("Venue", &escape_html(&request.venue_name)),
        detail_row("Address", &escape_html(&request.venue_address)),
        detail_row(
            "Presence Type",
            &escape_html(&presence_label(&request.presence_nature)),
        ),
    ]
    .concat();

    if let Some(notes) = request.special_notes.as_deref().filter(|n| !n.is_empty()) {
        details.push_str(&detail_row("Special Notes", &escape_html(notes)));
    }

    let amount = amount_label(request.total_amount);

    let html = format!(
        r#"<!DOCTYPE html>
          <html>
          <head>
            <meta charset="UTF-8">
            <style>
              body {{ font-family: 'Inter', Arial, sans-serif; line-height: 1.6; color: #1a1a2e; }}
              .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
              .header {{ background: linear-gradient(135deg, #3d5a80, #4a6fa5); color: white; padding: 30px; border-radius: 12px 12px 0 0; text-align: center; }}
              .content {{ background: #f8f9fa; padding: 30px; border-radius: 0 0 12px 12px; }}
              .booking-details {{ background: white; padding: 20px; border-radius: 8px; margin: 20px 0; }}
              .detail-row {{ display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #eee; }}
              .detail-label {{ color: #666; font-weight: 500; }}
              .detail-value {{ color: #1a1a2e; font-weight: 600; }}
              .amount {{ font-size: 24px; color: #3d5a80; }}
              .footer {{ text-align: center; padding: 20px; color: #666; font-size: 12px; }}
            </style>
          </head>
          <body>
            <div class="container">
              <div class="header">
                <h1>New Booking Request</h1>
                <p>A new presence booking needs your attention</p>
              </div>
              <div class="content">
                <div class="booking-details">{details}
                  <div class="detail-row" style="border-bottom: none;">
                    <span class="detail-label">Total Amount</span>
                    <span class="detail-value amount">{amount}</span>
                  </div>
                </div>
                <p style="text-align: center;">
                  Please review this booking request and confirm or decline it in the admin dashboard.
                </p>
              </div>
              <div class="footer">
                <p>This is an automated notification from Sathi</p>
                <p>© {year} Sathi - The Luxury of Quiet Presence</p>
              </div>
            </div>
          </body>
          </html>"#
    );

    RenderedEmail {
        subject: format!("🔔 New Booking Request - {}", request.companion_name),
        html,
    }
}
