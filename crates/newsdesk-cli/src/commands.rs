//! Command handlers for the CLI.
//!
//! These are called from `main` once the environment config is loaded.

use std::sync::Arc;

use anyhow::Context;
use newsdesk_core::AppConfig;
use newsdesk_db::{
    collections, DocumentStore, MemoryDocumentStore, PgDocumentStore, PgPool, PoolConfig,
};

use crate::job::{CronJob, RunReport};
use crate::schedule;

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = PoolConfig::from_app_config(config);
    newsdesk_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")
}

/// Connect and bring the schema up to date.
async fn connect_migrated(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = connect(config).await?;
    let applied = newsdesk_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }
    Ok(pool)
}

fn build_job(config: &AppConfig, store: Arc<dyn DocumentStore>) -> anyhow::Result<CronJob> {
    let news = newsdesk_core::load_config(&config.config_path)?;
    if news.outlets.is_empty() {
        tracing::warn!(path = %config.config_path.display(), "no outlets configured");
    }
    tracing::info!(
        path = %config.config_path.display(),
        outlets = news.outlets.len(),
        categories = news.categories.len(),
        "loaded news config"
    );
    CronJob::new(config, news, store)
}

/// Run the pipeline once.
///
/// When `dry_run` is `true` results go to an in-memory store and the database
/// is never touched.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded, the database is
/// unreachable, or any non-suppressed pipeline step fails.
pub(crate) async fn run_once(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let store: Arc<dyn DocumentStore> = if dry_run {
        Arc::new(MemoryDocumentStore::new())
    } else {
        Arc::new(PgDocumentStore::new(connect_migrated(config).await?))
    };

    let report = build_job(config, store)?.run().await?;
    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "dry-run: " } else { "" };
    println!(
        "{prefix}{} headlines, {} categorised articles",
        report.headlines, report.categorised
    );
    for pair in &report.failed_pairs {
        let reason = pair.result.as_ref().err().map_or("", String::as_str);
        println!(
            "{prefix}skipped {} / {}: {reason}",
            pair.domain, pair.keyword
        );
    }
    if report.top_keywords.is_empty() {
        println!("{prefix}no keywords extracted");
    } else {
        println!("{prefix}top keywords:");
        for (keyword, count) in &report.top_keywords {
            println!("  {keyword}: {count}");
        }
    }
}

/// Run the pipeline on the configured schedule until ctrl-c or SIGTERM.
///
/// # Errors
///
/// Returns an error if setup fails. Failed runs are logged, not returned.
pub(crate) async fn run_scheduled(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect_migrated(config).await?;
    let job = Arc::new(build_job(config, Arc::new(PgDocumentStore::new(pool)))?);

    let mut scheduler = schedule::build_scheduler(job, &config.schedule).await?;
    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

/// Print the status document written by the last successful run.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub(crate) async fn print_status(config: &AppConfig) -> anyhow::Result<()> {
    let store = PgDocumentStore::new(connect(config).await?);
    let status = store.fetch_all(collections::STATUS).await?;

    match status.first() {
        Some(document) => println!("{}", serde_json::to_string_pretty(document)?),
        None => println!("no run recorded yet"),
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the database is unreachable.
pub(crate) async fn db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    newsdesk_db::ping(&pool).await?;
    println!("database reachable");
    Ok(())
}

/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub(crate) async fn db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = newsdesk_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
