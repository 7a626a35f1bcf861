use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{open_store, parse_project_id, Command};
use crate::assets::{AssetKind, CoverAsset, CoverAssetStore, InMemoryCoverAssetStore};
use crate::channels::Channel;
use crate::config::PublishingDeskConfig;
use crate::delivery::{DeliveryManifest, DeliveryPhase};
use crate::events::ProjectEvent;
use crate::isbn::IsbnState;
use crate::persistence::{PersistenceError, ProjectStore};
use crate::project::Project;
use crate::spine::PaperStock;
use crate::wizard::{PublicationSettings, TrimSize, WizardEvent, WizardSession, WizardStep};

pub struct PublishCommand {
    pub id: String,
    pub channel: String,
    pub isbn: Option<String>,
    pub template: Option<String>,
    pub covers: Vec<String>,
    pub author: String,
    pub paper: Option<String>,
    pub config: PublishingDeskConfig,
}

/// Parse "kind=uri".
pub fn parse_cover(raw: &str) -> Result<CoverAsset> {
    let (kind, uri) = raw
        .split_once('=')
        .with_context(|| format!("cover '{raw}' must look like kind=uri"))?;
    let kind: AssetKind = kind.parse()?;
    Ok(CoverAsset {
        kind,
        uri: uri.trim().to_string(),
        width_px: None,
        height_px: None,
    })
}

/// Fold queued wizard events into the project and save it if anything changed.
pub async fn persist_events(
    project: &mut Project,
    events: &mut mpsc::UnboundedReceiver<ProjectEvent>,
    store: &dyn ProjectStore,
) -> Result<usize, PersistenceError> {
    let mut applied = 0;
    while let Ok(event) = events.try_recv() {
        if project.apply(&event) {
            applied += 1;
        }
    }
    if applied > 0 {
        store.save(project).await?;
    }
    Ok(applied)
}

fn print_manifest(manifest: &DeliveryManifest) {
    println!("📦 Deliverables for {}", manifest.channel.display_name());
    println!("   words: {}", manifest.word_count);
    for asset in &manifest.assets {
        println!("   ✅ {}: {}", asset.kind, asset.uri);
    }
    for kind in &manifest.missing_assets {
        println!("   ⚠️  missing {kind}");
    }
    if let Some(spine) = &manifest.spine {
        println!(
            "   📏 spine {:.4} in ({} pages, {} paper)",
            spine.inches, spine.page_count, spine.paper
        );
    }
    println!();
}

fn print_phase(phase: DeliveryPhase) {
    let position = DeliveryPhase::ALL
        .iter()
        .position(|p| *p == phase)
        .map(|i| i + 1)
        .unwrap_or_default();
    println!("   [{position}/{}] {phase}", DeliveryPhase::ALL.len());
}

impl PublishCommand {
    fn settings(&self, project: &Project, paper: PaperStock) -> PublicationSettings {
        PublicationSettings {
            title: project.name.clone(),
            subtitle: None,
            author: self.author.clone(),
            trim_size: TrimSize::default(),
            paper,
        }
    }
}

impl Command for PublishCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config);
        let id = parse_project_id(&self.id)?;
        let mut project = store
            .load(id)
            .await?
            .ok_or(PersistenceError::NotFound(id))?;
        let channel: Channel = self.channel.parse()?;
        let paper = match &self.paper {
            Some(name) => name.parse::<PaperStock>()?,
            None => self.config.print.default_paper,
        };

        let assets = InMemoryCoverAssetStore::new();
        for raw in &self.covers {
            assets.put(parse_cover(raw)?);
        }
        let assets: &dyn CoverAssetStore = &assets;

        match DeliveryManifest::assemble(
            &project,
            channel,
            assets,
            paper,
            self.config.print.words_per_page,
        ) {
            Ok(manifest) => print_manifest(&manifest),
            Err(e) => warn!(error = %e, "Could not assemble the deliverable manifest"),
        }

        let (mut session, mut events) =
            WizardSession::new(&project, self.config.delivery.phase_interval());
        info!(correlation.id = %session.correlation_id(), project_id = %project.id, "Publishing");

        session.dispatch(WizardEvent::Next);
        if let Some(template) = &self.template {
            session.dispatch(WizardEvent::SelectTemplate(template.clone()));
        }
        session.dispatch(WizardEvent::Next);
        session.dispatch(WizardEvent::Configure(self.settings(&project, paper)));
        session.dispatch(WizardEvent::Next);
        session.dispatch(WizardEvent::SelectChannel(channel));

        match session.dispatch(WizardEvent::Next) {
            WizardStep::Finalization => {
                if let Some(isbn) = &self.isbn {
                    session.dispatch(WizardEvent::SetIsbn(isbn.clone()));
                }
                if session.dispatch(WizardEvent::Next) != WizardStep::DeliverySequence {
                    persist_events(&mut project, &mut events, &store).await?;
                    println!("🔢 {} requires a valid ISBN-13.", channel.display_name());
                    if let Some(assist) = session.isbn_assist() {
                        if let Some(draft) = &assist.rejected_draft {
                            println!("   Rejected: {draft}");
                        }
                        if assist.platform_isbn_offered {
                            println!("   This channel can also assign a free platform ISBN.");
                        }
                    }
                    println!("   Re-run with --isbn <13 digits>.");
                    bail!("delivery blocked: ISBN required by {channel}");
                }
            }
            WizardStep::TraditionalSubmissionPrep => {
                println!("✉️  Preparing a submission package for {}", channel.display_name());
                session.dispatch(WizardEvent::Next);
            }
            other => bail!("wizard stopped unexpectedly at {other}"),
        }
        debug_assert_ne!(session.isbn_state(), IsbnState::RequiredUnset);
        persist_events(&mut project, &mut events, &store).await?;

        println!("🚚 Delivering '{}' to {}", project.name, channel.display_name());
        if let Some(phase) = session.delivery_phase() {
            print_phase(phase);
        }

        loop {
            tokio::select! {
                step = session.next_delivery_tick() => {
                    match step {
                        Some(WizardStep::DeliverySequence) => {
                            if let Some(phase) = session.delivery_phase() {
                                print_phase(phase);
                            }
                        }
                        _ => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    session.teardown();
                    println!();
                    println!("⏹️  Interrupted, delivery canceled");
                    break;
                }
            }
            persist_events(&mut project, &mut events, &store).await?;
        }
        persist_events(&mut project, &mut events, &store).await?;

        if session.step() != WizardStep::Success {
            bail!("delivery did not finish (stopped at {})", session.step());
        }
        println!();
        println!("🎉 Published '{}' to {}", project.name, channel.display_name());
        Ok(())
    }
}
