//! Sathi admin console.
//!
//! ```text
//! sathi-admin list
//! sathi-admin set-status <booking-id> <pending|confirmed|completed|cancelled>
//! ```
//!
//! Signs in with `SATHI_ADMIN_EMAIL` / `SATHI_ADMIN_PASSWORD`, then talks to
//! the data store and the deployed confirmation endpoint as that admin.

use anyhow::{bail, Context};
use sathi_bookings::{
    load_bookings, run_status_change, AdminBooking, AdminEnvironment, AdminState, AuthClient,
    BookingId, BookingStatus, HttpConfirmationDispatcher, PostgrestRepository, SessionContext,
};
use sathi_server::{telemetry, AdminCredentials, Config};
use std::sync::Arc;

const USAGE: &str = "usage: sathi-admin list | sathi-admin set-status <booking-id> <status>";

enum Command {
    List,
    SetStatus { id: BookingId, status: BookingStatus },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [command] if command == "list" => Ok(Command::List),
        [command, id, status] if command == "set-status" => Ok(Command::SetStatus {
            id: BookingId::new(id.as_str()),
            status: status.parse().context("Unknown status")?,
        }),
        _ => bail!(USAGE),
    }
}

fn print_booking(booking: &AdminBooking) {
    let row = &booking.booking;
    println!(
        "{id}  {status:<9}  {date} {time}  {companion} <- {customer}  {venue}  ₹{amount}",
        id = row.id,
        status = row.status.as_str(),
        date = row.booking_date,
        time = row.start_time,
        companion = booking.companion_name.as_deref().unwrap_or("?"),
        customer = booking.user_email.as_deref().unwrap_or("?"),
        venue = row.venue_name,
        amount = row.total_amount,
    );
}

/// Toast for a finished status change; an error when nothing was written
fn status_change_report(state: &AdminState) -> anyhow::Result<String> {
    let Some(outcome) = &state.outcome else {
        bail!("Status change finished without an outcome");
    };
    if !outcome.is_written() {
        bail!(outcome.message());
    }
    Ok(outcome.message())
}

async fn run(command: Command, env: AdminEnvironment) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let state = load_bookings(env).await;
            if let Some(error) = state.fetch_error {
                bail!(error);
            }
            for booking in &state.bookings {
                print_booking(booking);
            }
        },
        Command::SetStatus { id, status } => {
            let listed = load_bookings(env.clone()).await;
            if let Some(error) = listed.fetch_error {
                bail!(error);
            }
            let Some(booking) = listed.booking(&id).cloned() else {
                bail!("Booking {id} not found");
            };

            let state = run_status_change(env, booking, status).await;
            println!("{}", status_change_report(&state)?);
            if let Some(error) = &state.fetch_error {
                eprintln!("{error}");
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("Failed to read .env");
        }
    }
    telemetry::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = Config::from_env().context("Invalid configuration")?;
    let Some(store) = config.store else {
        bail!("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
    };
    let credentials = AdminCredentials::from_env()?;

    let auth = AuthClient::new(&store.supabase_url, store.anon_key.clone());
    let sessions = SessionContext::new();
    let session = auth
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
        .context("Sign-in failed")?;
    sessions.publish(Some(session));

    let Some(token) = sessions.access_token() else {
        bail!("No session after sign-in");
    };
    let repository =
        PostgrestRepository::new(&store.supabase_url, store.anon_key.clone()).with_access_token(token.clone());
    let dispatcher =
        HttpConfirmationDispatcher::new(&store.functions_url, store.anon_key.clone()).with_access_token(token.clone());
    let env = AdminEnvironment::new(Arc::new(repository), Arc::new(dispatcher));

    let result = run(command, env).await;

    if let Err(e) = auth.sign_out(&token).await {
        tracing::warn!(error = %e, "Sign-out failed");
    }
    sessions.publish(None);
    result
}
