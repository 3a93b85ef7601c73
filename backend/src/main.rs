//! Engine entry-point: loads settings, wires the in-memory engine, and
//! optionally seeds the demo dataset.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use smart_mess::demo::seed_demo_data;
use smart_mess::settings::EngineSettings;
use smart_mess::state::EngineState;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        EngineSettings::load().map_err(|err| eyre!("failed to load engine settings: {err}"))?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build engine runtime")?;
    runtime.block_on(run(settings))
}

async fn run(settings: EngineSettings) -> Result<()> {
    if settings.payment_secret.is_none() {
        warn!("payment secret not configured; sandbox gateway uses the demo secret");
    }
    let state = EngineState::from_settings(&settings, Arc::new(DefaultClock))
        .wrap_err("invalid engine settings")?;
    info!(seed_demo_data = settings.seed_demo_data, "engine ready");

    if !settings.seed_demo_data {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(());
    }

    let seed = seed_demo_data(&state)
        .await
        .wrap_err("demo data seeding failed")?;
    let dashboard = state
        .dashboards
        .admin_dashboard(&seed.admin)
        .await
        .wrap_err("admin dashboard failed")?;
    info!(
        total_students = dashboard.total_students,
        total_owners = dashboard.total_owners,
        total_messes = dashboard.total_messes,
        unverified_messes = dashboard.unverified_messes,
        pending_complaints = dashboard.pending_complaints,
        active_subscriptions = dashboard.active_subscriptions,
        "admin dashboard"
    );
    Ok(())
}
