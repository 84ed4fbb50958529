use anyhow::{Context, Result};
use group_loader::cli::commands::{GroupsCommand, LoadCommand, PostingsCommand};
use group_loader::cli::output::*;
use group_loader::cli::{Cli, Command};
use group_loader::core::LoaderConfig;
use group_loader::execution::{load_group_pipeline, LoaderServices};
use group_loader::persistence::{GroupStore, SqliteGroupStore};
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Load(cmd) => load_group(cmd, config).await?,
        Command::Groups(cmd) => list_groups(cmd, &config).await?,
        Command::Postings(cmd) => show_postings(cmd, &config).await?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<LoaderConfig> {
    let mut config = match &cli.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => LoaderConfig::default(),
    };

    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }

    debug!("Using database at {}", config.resolved_database_path().display());
    Ok(config)
}

async fn open_store(config: &LoaderConfig) -> Result<Arc<SqliteGroupStore>> {
    let store = SqliteGroupStore::at_path(&config.resolved_database_path())
        .await
        .context("Failed to open group database")?;
    Ok(Arc::new(store))
}

async fn load_group(cmd: &LoadCommand, mut config: LoaderConfig) -> Result<()> {
    cmd.apply_credentials(&mut config.graph_api);
    if config.graph_api.access_token().is_none() {
        println!(
            "{} No group API credentials configured; set FB_ACCESS_TOKEN or FB_CLIENT_ID/FB_CLIENT_SECRET",
            WARN
        );
    }

    let payload = cmd.payload()?;
    let store = open_store(&config).await?;
    let services = LoaderServices::from_config(&config, store.clone())?;
    let mut pipeline = load_group_pipeline(services, &config.deep_link_scheme)?;

    let spinner = create_spinner();
    let progress = spinner.clone();
    pipeline.add_event_handler(move |event| {
        if let Some(message) = format_execution_event(&event) {
            progress.set_message(message);
        }
    });

    let outcome = pipeline.run(payload).await;
    spinner.finish_and_clear();

    match outcome.context("Group load aborted")? {
        Ok(group) => {
            let postings = store.list_postings(group.id).await?;
            if cmd.json {
                let data = serde_json::json!({
                    "group": group,
                    "posting_count": postings.len(),
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{} Loaded group {}", CHECK, format_group(&group, postings.len()));
            }
            Ok(())
        }
        Err(failure) => {
            if cmd.json {
                let data = serde_json::json!({
                    "status": failure.status_code(),
                    "error": failure,
                });
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{}", format_failure(&failure));
            }
            std::process::exit(1);
        }
    }
}

async fn list_groups(cmd: &GroupsCommand, config: &LoaderConfig) -> Result<()> {
    let store = open_store(config).await?;
    let groups = store.list_groups().await?;

    let mut rows = Vec::with_capacity(groups.len());
    for group in groups {
        let count = store.list_postings(group.id).await?.len();
        rows.push((group, count));
    }

    if cmd.json {
        let data: Vec<_> = rows
            .iter()
            .map(|(group, count)| serde_json::json!({ "group": group, "posting_count": count }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "groups": data }))?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{} No groups loaded yet", INFO);
        return Ok(());
    }

    println!("{} Stored groups:", INFO);
    for (group, count) in &rows {
        println!("  {}", format_group(group, *count));
    }

    Ok(())
}

async fn show_postings(cmd: &PostingsCommand, config: &LoaderConfig) -> Result<()> {
    let store = open_store(config).await?;

    let Some(group) = store.find_group_by_fb_id(&cmd.fb_id).await? else {
        println!("{} Group {} not found", WARN, style(&cmd.fb_id).cyan());
        std::process::exit(1);
    };

    let mut shown = store.list_postings(group.id).await?;
    let total = shown.len();
    if let Some(limit) = cmd.limit {
        shown.truncate(limit);
    }

    if cmd.json {
        let data = serde_json::json!({
            "group": group,
            "posting_count": total,
            "postings": shown,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} {}", INFO, format_posting_header(&group, shown.len(), total));
    for posting in &shown {
        println!("  {}", format_posting(posting));
    }

    Ok(())
}

