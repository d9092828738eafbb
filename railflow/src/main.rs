//! RailFlow demo binary.
//!
//! Drives one scripted booking end to end: sign-in, search, selection,
//! passengers, payment (with retry on a simulated decline), e-ticket, and
//! the analytics read-out.

use railflow::types::{Gender, Passenger, PaymentMode, User};
use railflow::{BookingApp, Config, PaymentOutcome};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.telemetry.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        assistant_enabled = config.assistant.api_key.is_some(),
        payment_failure_rate = config.payment.failure_rate,
        "Starting RailFlow demo"
    );

    let app = BookingApp::from_config(&config);

    println!("=== RailFlow: Railway Ticket Booking Demo ===\n");

    app.login(User {
        name: "Jane".to_string(),
        email: "jane@x.com".to_string(),
    })
    .await?;
    println!("Signed in as Jane");

    let results = app.search("Coimbatore", "Chennai").await?;
    println!("\nTrains from Coimbatore to Chennai:");
    for train in &results {
        println!(
            "  {} {}  {} -> {}  ({})",
            train.number, train.name, train.departure, train.arrival, train.duration
        );
    }

    let Some(train) = results.first() else {
        println!("No trains found, nothing to book.");
        return Ok(());
    };
    let class = train.classes[0].clone();
    println!(
        "\nSelecting {} in {} @ {}",
        train.name, class.class_type, class.price
    );
    app.select((*train).clone(), class).await?;

    if let Some(remaining) = app.lock_remaining().await {
        println!("Seat lock armed: {remaining}s to complete the booking");
    }

    let tips = app.concierge().route_tips(&train.origin, &train.destination).await;
    if !tips.is_empty() {
        println!("\nRoute tips: {tips}");
    }

    app.submit_passengers(vec![
        Passenger {
            name: "Jane Doe".to_string(),
            age: 34,
            gender: Gender::Female,
            seat_preference: Some("Window".to_string()),
        },
        Passenger {
            name: "Asha Rao".to_string(),
            age: 61,
            gender: Gender::Female,
            seat_preference: Some("Lower".to_string()),
        },
    ])
    .await?;
    println!("\nPassengers saved, proceeding to payment");

    // Retry a few times; the simulated gateway declines a fraction of charges
    let mut outcome = app.pay(PaymentMode::Upi).await?;
    for attempt in 2..=3 {
        match &outcome {
            PaymentOutcome::Confirmed { .. } => break,
            PaymentOutcome::Declined { reason } => {
                println!("Payment declined: {reason} (attempt {attempt})");
                outcome = app.pay(PaymentMode::Upi).await?;
            },
        }
    }

    match outcome {
        PaymentOutcome::Confirmed { pnr } => {
            println!("\nBooking confirmed! PNR {pnr}\n");
            if let Some(document) = app.eticket().await {
                println!("{}", document.as_text());
            }
        },
        PaymentOutcome::Declined { reason } => {
            println!("\nPayment did not go through: {reason}");
            println!("Returning to search.");
            app.reset().await?;
        },
    }

    let metrics = app.metrics().await;
    println!("Funnel:");
    for (step, count) in metrics.funnel() {
        println!("  {step:<16} {count}");
    }
    println!(
        "Conversion rate: {:.1}%",
        metrics.conversion_rate * 100.0
    );

    let recommendations = app.recommendations().await;
    if recommendations.is_empty() {
        println!("\nAI insights: waiting for more session data.");
    } else {
        println!("\nAI insights:");
        for rec in recommendations {
            println!("  [{}] {} - {}", rec.impact_level, rec.recommendation, rec.reason);
        }
    }

    app.shutdown(Duration::from_secs(5)).await.ok();
    Ok(())
}
