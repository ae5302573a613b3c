//! Command-line surface of the preview tool.
//!
//! Each subcommand drives one controller against an in-memory page and the
//! real manifest endpoint, then prints what happened to the page.

use crate::config::AppConfig;
use anyhow::Context as _;
use backdrop_core::common::build_http_client;
use backdrop_core::document::DocumentMutation;
use backdrop_core::manifest::{BackgroundPaths, HttpManifestSource, ManifestLoader};
use backdrop_core::preload::{HttpImageLoader, PreloadCache};
use backdrop_core::selection::{FileStore, MemoryStore, SelectionStore};
use backdrop_core::{
    BackgroundController, Collaborators, EventOutcome, MemoryDocument, PageEvent, Resolution,
    ThemeVariant,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "backdrop", version, about = "Preview random page backgrounds")]
pub struct Cli {
    /// Configuration file (defaults to ./backdrop.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Theme the simulated page starts in.
    #[arg(long, global = true, default_value_t = ThemeVariant::Light)]
    pub theme: ThemeVariant,

    /// Storage domain, overriding configuration.
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// Seed for the random pick, for reproducible runs.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Print every change made to the simulated page.
    #[arg(long, global = true, default_value_t = false)]
    pub history: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch both background indexes and print the resolved image lists.
    Manifest,
    /// Simulate a first page load.
    Load,
    /// Load the page, then ask for a different background.
    Change,
    /// Load the page, then switch the theme.
    Theme {
        /// Theme to switch to.
        target: ThemeVariant,
    },
    /// Load the page, then perform a same-document navigation.
    Navigate,
}

/// Everything one run wires together.
struct Preview {
    document: Arc<MemoryDocument>,
    controller: BackgroundController,
}

impl Preview {
    fn new(config: &AppConfig, cli: &Cli) -> anyhow::Result<Self> {
        let http_client =
            build_http_client(config.request_timeout()).context("building HTTP client")?;
        let document = Arc::new(MemoryDocument::new());
        document.set_theme(cli.theme);

        let controller = BackgroundController::new(
            Collaborators {
                document: document.clone(),
                manifests: Arc::new(HttpManifestSource::new(
                    http_client.clone(),
                    config.origin(),
                )),
                images: Arc::new(HttpImageLoader::new(http_client, config.origin())),
                store: selection_store(config),
            },
            config.controller_settings(cli.seed),
        )
        .context("invalid transition timings")?;

        Ok(Self {
            document,
            controller,
        })
    }

    async fn load(&self) -> anyhow::Result<()> {
        let outcome = self.controller.handle(PageEvent::DomReady).await;
        report(PageEvent::DomReady, &outcome);
        match outcome {
            EventOutcome::Bootstrapped(_) => Ok(()),
            other => anyhow::bail!("page load did not bootstrap: {other:?}"),
        }
    }

    fn print_state(&self, with_history: bool) {
        match self.controller.current_rule() {
            Some(rule) => println!("managed rule: {rule}"),
            None => println!("managed rule: (none)"),
        }
        if with_history {
            for mutation in self.document.history() {
                println!("  {}", describe_mutation(&mutation));
            }
        }
    }
}

/// Durable file store, or a session-only store when no data directory
/// exists.
fn selection_store(config: &AppConfig) -> Arc<dyn SelectionStore> {
    match config.storage_path() {
        Some(path) => {
            log::debug!("Persisting selections to {}", path.display());
            Arc::new(FileStore::new(path))
        }
        None => {
            log::warn!("No data directory available, selections last for this run only");
            Arc::new(MemoryStore::new())
        }
    }
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    if let Command::Manifest = cli.cmd {
        return print_manifests(&config).await;
    }

    let preview = Preview::new(&config, &cli)?;
    preview.load().await?;

    match &cli.cmd {
        Command::Manifest | Command::Load => {}
        Command::Change => {
            let outcome = preview.controller.handle(PageEvent::ChangeRequested).await;
            report(PageEvent::ChangeRequested, &outcome);
        }
        Command::Theme { target } => {
            preview.document.set_theme(*target);
            let outcome = preview.controller.handle(PageEvent::ThemeChanged).await;
            report(PageEvent::ThemeChanged, &outcome);
        }
        Command::Navigate => {
            let carried = preview.controller.handle(PageEvent::BeforeSwap).await;
            report(PageEvent::BeforeSwap, &carried);

            preview.document.simulate_swap();
            let outcome = preview.controller.handle(PageEvent::PageLoad).await;
            report(PageEvent::PageLoad, &outcome);
        }
    }

    preview.print_state(cli.history);
    Ok(())
}

async fn print_manifests(config: &AppConfig) -> anyhow::Result<()> {
    let http_client =
        build_http_client(config.request_timeout()).context("building HTTP client")?;
    let preload = Arc::new(PreloadCache::new(Arc::new(HttpImageLoader::new(
        http_client.clone(),
        config.origin(),
    ))));
    let loader = ManifestLoader::new(
        Arc::new(HttpManifestSource::new(http_client, config.origin())),
        BackgroundPaths::new(config.domain()),
        preload,
    );

    let sets = loader.load_manifests().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&sets).context("serializing image lists")?
    );
    Ok(())
}

fn report(event: PageEvent, outcome: &EventOutcome) {
    println!("{event}: {}", describe_outcome(outcome));
}

pub fn describe_outcome(outcome: &EventOutcome) -> String {
    match outcome {
        EventOutcome::Bootstrapped(resolution) => {
            format!("bootstrapped, {}", describe_resolution(resolution))
        }
        EventOutcome::Dropped => "dropped".to_string(),
        EventOutcome::Resolved(resolution) => describe_resolution(resolution),
        EventOutcome::Reapplied(Some(url)) => format!("reapplied {url}"),
        EventOutcome::Reapplied(None) => "nothing to reapply".to_string(),
        EventOutcome::Carried(Some(rule)) => format!("carried rule `{rule}`"),
        EventOutcome::Carried(None) => "no rule to carry".to_string(),
    }
}

fn describe_resolution(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Restored(url) => format!("restored {url}"),
        Resolution::Picked(url) => format!("picked {url}"),
        Resolution::Empty => "no images available".to_string(),
    }
}

fn describe_mutation(mutation: &DocumentMutation) -> String {
    match mutation {
        DocumentMutation::BackdropOpacity(variant, opacity) => {
            format!("{variant} backdrop opacity -> {opacity}")
        }
        DocumentMutation::StyleInserted { id, css } => format!("insert style #{id}: {css}"),
        DocumentMutation::StyleUpdated { id, css } => format!("update style #{id}: {css}"),
        DocumentMutation::ElementCreated { id, mount } => format!("create #{id} under {mount:?}"),
        DocumentMutation::ElementMoved { id } => format!("move #{id} under Body"),
        DocumentMutation::ElementOpacity { id, opacity } => format!("#{id} opacity -> {opacity}"),
        DocumentMutation::ElementVisible { id, visible } => format!("#{id} visible -> {visible}"),
        DocumentMutation::ElementRemoved { id } => format!("remove #{id}"),
    }
}
