//! Scripted exchange session - lists books, queues requests, runs matching
//!
//! Usage:
//!   cargo run --example exchange_session
//!
//! Optional:
//!   BOOK_EXCHANGE_SNAPSHOT=books.txt  # Restore from / save to this file
//!   BOOK_EXCHANGE_AUTOSAVE=true       # Save after matching
//!   RUST_LOG=book_exchange=debug      # Per-request match logging

use book_exchange::{Config, Exchange, ListingForm, RequestForm};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("book_exchange=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let exchange = Exchange::open(config)?;

    let listings = [
        ("Intro to CS", "CS134", "49.99", "Alice"),
        ("Data Structures", "CS136", "39.99", "Bob"),
        ("Algorithms", "CS256", "59.00", "Carol"),
        ("algorithms", "CS256", "45.50", "Dmitri"),
        ("Linear Algebra", "MATH250", "30", "Eve"),
    ];
    for (title, course_code, price, seller) in listings {
        exchange.list_item(ListingForm {
            title,
            course_code,
            price,
            seller,
        })?;
    }

    // Rejected by validation: urgency outside the configured range
    let rejected = exchange.request_item(RequestForm {
        title: "Algorithms",
        requester: "Mallory",
        urgency: "42",
    });
    if let Err(err) = rejected {
        println!("Rejected request: {err}");
    }

    let requests = [
        ("ALGORITHMS", "Frank", "3"),
        ("Organic Chemistry", "Grace", "1"),
        ("algorithms", "Heidi", "3"),
        ("Algorithms", "Ivan", "7"),
        ("intro to cs", "Judy", "2"),
    ];
    for (title, requester, urgency) in requests {
        exchange.request_item(RequestForm {
            title,
            requester,
            urgency,
        })?;
    }

    println!("\nAvailable books:");
    for item in exchange.items() {
        println!("  {item}");
    }

    println!("\nPending requests:");
    for request in exchange.pending_requests() {
        println!("  {} {request}", request.submitted_at());
    }

    println!("\nProcessing requests:");
    for entry in exchange.process()? {
        println!("  {entry}");
    }

    println!("\nRemaining books:");
    for item in exchange.items() {
        println!("  {item}");
    }

    let stats = exchange.stats();
    println!(
        "\n{} processed, {} matched, {} unmatched",
        stats.processed, stats.matched, stats.unmatched
    );

    if exchange.config().snapshot_path().is_some() && !exchange.config().autosave() {
        let written = exchange.save()?;
        println!("Saved {written} listings");
    }

    Ok(())
}
