//! Pre-market bias bot.
//!
//! One-shot application that gathers market signals (index, VIX, futures)
//! and news headlines, derives a forced directional bias, appends the
//! prediction to a CSV log, and emails a formatted report. Each invocation
//! serves the slots still due today, then exits.

mod bot;
mod config;
mod journal;
mod schedule;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bot::Bot;
use schedule::{due_slots, Scheduler, SystemClock};

/// Pre-market directional bias alerts
#[derive(Parser)]
#[command(name = "premarket-bot", about = "Pre-market directional bias alerts")]
struct Cli {
    /// Run one cycle immediately, skipping the slot schedule.
    #[arg(long)]
    now: bool,

    /// Slot label attached to an immediate run.
    #[arg(long, default_value = "Manual Run")]
    slot_label: String,

    /// Compute, log, and print the report without sending email.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "premarket_bot=info,market_data=info,news_feed=info,llm_client=info,notifier=info"
                    .into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let config = config::load_config()?;
    let scheduler = Scheduler::new(SystemClock, config.schedule.utc_offset_hours)?;
    let bot = Bot::new(config, cli.dry_run)?;

    let now = scheduler.local_now();
    info!(
        "Exchange-local time: {}",
        now.format("%Y-%m-%d %I:%M %p")
    );

    if cli.now {
        bot.run_slot(&cli.slot_label, scheduler.local_now()).await;
        return Ok(());
    }

    let slots = due_slots(now);
    if slots.is_empty() {
        info!("Outside expected schedule window. Exiting.");
        return Ok(());
    }

    for slot in slots {
        info!(
            "⏳ Waiting until {:02}:{:02} for slot '{}'...",
            slot.hour, slot.minute, slot.label
        );
        scheduler.wait_until(slot).await;
        bot.run_slot(slot.label, scheduler.local_now()).await;
    }

    Ok(())
}
