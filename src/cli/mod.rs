use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "publishing-desk")]
#[command(about = "Project, print spine and publish-to-channel assistant for self-publishing authors")]
#[command(long_about = "Publishing Desk keeps track of writing projects, computes print spine widths, \
                       validates ISBN-13 identifiers against each channel's policy and walks a project \
                       through the publish wizard. Start with 'publishing-desk project new'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an ISBN-13
    Isbn {
        /// ISBN text; hyphens and spaces are ignored
        value: String,
    },
    /// List distribution channels and their ISBN policies
    Channels,
    /// Compute the print spine width
    Spine {
        /// Printed page count
        #[arg(long, conflicts_with = "words", help = "Exact printed page count")]
        pages: Option<u32>,
        /// Manuscript word count, converted to pages
        #[arg(long, help = "Estimate pages from a word count")]
        words: Option<u64>,
        /// Paper stock
        #[arg(long, help = "white, cream, standard-color or premium-color (default from config)")]
        paper: Option<String>,
    },
    /// Manage writing projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },
    /// Run the publish wizard for a project
    Publish {
        /// Project id
        id: String,
        /// Distribution channel name (see `channels`)
        #[arg(long)]
        channel: String,
        /// ISBN to assign during finalization
        #[arg(long)]
        isbn: Option<String>,
        /// Cover template to select
        #[arg(long)]
        template: Option<String>,
        /// Cover asset as kind=uri, e.g. full-wrap=covers/wrap.pdf
        #[arg(long = "cover", value_name = "KIND=URI")]
        covers: Vec<String>,
        /// Author name printed on the cover
        #[arg(long, default_value = "Anonymous")]
        author: String,
        /// Paper stock for print editions (default from config)
        #[arg(long)]
        paper: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    New {
        name: String,
        /// Chapter as "Title:words"; repeatable
        #[arg(long = "chapter", value_name = "TITLE:WORDS")]
        chapters: Vec<String>,
        /// Tag; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List projects
    List,
    /// Show one project with its spine progress
    Show { id: String },
    /// Delete a project and its whole spine
    Delete { id: String },
}
