use anyhow::{Context, Result};

use super::{parse_project_id, Command};
use crate::config::PublishingDeskConfig;
use crate::isbn::is_valid_isbn13;
use crate::persistence::{PersistenceError, ProjectStore};
use crate::project::Project;
use crate::spine::NodeStatus;

pub enum ProjectCommand {
    New {
        name: String,
        chapters: Vec<String>,
        tags: Vec<String>,
    },
    List,
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
}

pub struct ProjectCommandRunner {
    pub command: ProjectCommand,
    pub config: PublishingDeskConfig,
}

/// Parse "Title:words". The title may itself contain colons.
pub fn parse_chapter(raw: &str) -> Result<(String, u32)> {
    let (title, words) = raw
        .rsplit_once(':')
        .with_context(|| format!("chapter '{raw}' must look like Title:words"))?;
    let words = words
        .trim()
        .parse::<u32>()
        .with_context(|| format!("chapter '{raw}' has a bad word count"))?;
    Ok((title.trim().to_string(), words))
}

fn status_icon(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::NotStarted => "⬜",
        NodeStatus::PendingReview => "🟨",
        NodeStatus::Completed => "✅",
    }
}

impl Command for ProjectCommandRunner {
    async fn execute(&self) -> Result<()> {
        let store = super::open_store(&self.config);
        match &self.command {
            ProjectCommand::New {
                name,
                chapters,
                tags,
            } => {
                let mut project = Project::new(name.clone());
                for raw in chapters {
                    let (title, words) = parse_chapter(raw)?;
                    project = project.with_chapter(title, words);
                }
                for tag in tags {
                    project = project.with_tag(tag.clone());
                }
                store.save(&project).await?;
                println!("📝 Created project '{}'", project.name);
                println!("   id: {}", project.id);
            }
            ProjectCommand::List => {
                let projects = store.list().await?;
                if projects.is_empty() {
                    println!("No projects yet. Create one with 'publishing-desk project new'.");
                }
                for project in projects {
                    let state = if project.is_published() {
                        "published"
                    } else {
                        "draft"
                    };
                    println!(
                        "{}  {:<32} {:>8} words  {}",
                        project.id,
                        project.name,
                        project.total_word_count(),
                        state
                    );
                }
            }
            ProjectCommand::Show { id } => {
                let id = parse_project_id(id)?;
                let project = store
                    .load(id)
                    .await?
                    .ok_or(PersistenceError::NotFound(id))?;
                println!("📘 {}", project.name);
                println!("   id:       {}", project.id);
                println!("   words:    {}", project.total_word_count());
                if let Ok(pages) = project.estimated_page_count(self.config.print.words_per_page) {
                    println!("   pages:    ~{pages}");
                }
                if !project.tags.is_empty() {
                    println!("   tags:     {}", project.tags.join(", "));
                }
                if !project.isbn.is_empty() {
                    let validity = if is_valid_isbn13(&project.isbn) {
                        "valid"
                    } else {
                        "invalid"
                    };
                    println!("   isbn:     {} ({validity})", project.isbn);
                }
                if let Some(channel) = project.channel {
                    println!("   channel:  {}", channel.display_name());
                }
                println!();
                println!("   Spine:");
                for node in project.spine.nodes() {
                    let when = node
                        .timestamp
                        .map(|t| t.format(" %Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!("   {} {}{}", status_icon(node.status), node.id, when);
                }
            }
            ProjectCommand::Delete { id } => {
                let id = parse_project_id(id)?;
                if store.delete(id).await? {
                    println!("🗑️  Deleted project {id}");
                } else {
                    return Err(PersistenceError::NotFound(id).into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chapter() {
        assert_eq!(
            parse_chapter("Part One: The Road:4200").unwrap(),
            ("Part One: The Road".to_string(), 4200)
        );
        assert!(parse_chapter("No count").is_err());
        assert!(parse_chapter("Bad:many").is_err());
    }
}
