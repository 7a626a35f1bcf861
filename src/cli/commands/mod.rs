use anyhow::{Context, Result};
use uuid::Uuid;

use crate::config::PublishingDeskConfig;
use crate::persistence::JsonFileProjectStore;

pub mod channels;
pub mod isbn;
pub mod project;
pub mod publish;
pub mod spine;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub fn open_store(config: &PublishingDeskConfig) -> JsonFileProjectStore {
    JsonFileProjectStore::new(config.storage.projects_dir.clone())
}

pub fn parse_project_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("'{raw}' is not a project id"))
}

pub async fn show_how_to_get_started() -> Result<()> {
    println!("📚 Publishing Desk");
    println!();
    println!("To get started:");
    println!("  📝 publishing-desk project new \"My Novel\" --chapter \"One:3200\"");
    println!("  📋 publishing-desk project list");
    println!("  📏 publishing-desk spine --pages 320 --paper cream");
    println!("  🔢 publishing-desk isbn 978-0-306-40615-7");
    println!("  🏪 publishing-desk channels");
    println!("  🚀 publishing-desk publish <project-id> --channel amazon-kdp");
    Ok(())
}
