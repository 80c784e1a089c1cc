//! Walkthrough Example - one visit to the landing page
//!
//! This example drives the page the way a browser session would:
//! - Mounting the placeholder content
//! - Scrolling down so sections reveal
//! - Opening and closing the overlay menu
//! - Switching pricing packages and stepping the testimonial carousel
//!
//! Run with: RUST_LOG=spark_landing=debug cargo run --example walkthrough
//! Optional: pass a TOML config path as the first argument.

use spark_landing::{
    engine, mount_page, state::animate, Direction, MotionConfig, PageContent, Result,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spark_landing=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MotionConfig::load_or_default(path),
        None => MotionConfig::default(),
    };

    println!("=== spark-landing Walkthrough ===\n");

    let mut page = mount_page(PageContent::placeholder()?, config)?;
    println!("Document height: {:.0}px", page.document_height());
    page.advance(1_000);
    println!("Hero brand: {:?}", animate::phase(page.hero().brand()));

    // Scroll to the bottom in viewport-sized steps.
    let step = page.viewport().height * 0.75;
    let mut y = 0.0;
    while y < page.document_height() {
        y += step;
        page.scroll_to(y);
        page.advance(250);
    }
    page.advance(2_000);
    println!("Footer letters revealed: {:?}", page.footer().letters().iter().map(|id| animate::phase(*id)).last());

    // Menu.
    page.navbar().toggle_menu();
    println!("\nMenu: {:?}, scroll locked: {}", page.navbar().menu().state(), spark_landing::is_scroll_locked());
    println!("Scroll while locked accepted: {}", page.scroll_to(0.0));
    page.advance(400);
    let request = page.navbar().activate_link("#pricing");
    page.advance(300);
    println!("Navigate to {} (menu {:?})", request.href, page.navbar().menu().state());

    // Pricing.
    page.pricing().select_package("enterprise")?;
    page.advance(1_000);
    println!("\nPricing features: {:?}", page.pricing().feature_keys());

    // Carousel.
    let mut steps = 0;
    while page.testimonials().scroll(Direction::Right) {
        page.advance(300);
        steps += 1;
    }
    println!("Carousel reached the end after {steps} steps: {:?}", page.testimonials().buttons());

    // Newsletter.
    page.footer().set_email("visitor@example.com");
    println!("Newsletter signup: {:?}", page.footer().submit());

    println!("\n{}", page.render());

    page.unmount();
    println!("\nPending timers after unmount: {}", engine::pending_count());
    Ok(())
}
