use anyhow::{bail, Result};

use super::Command;
use crate::config::PrintConfig;
use crate::spine::{estimate_page_count, spine_width, PaperStock};

pub struct SpineCommand {
    pub pages: Option<u32>,
    pub words: Option<u64>,
    pub paper: Option<String>,
    pub print: PrintConfig,
}

impl Command for SpineCommand {
    async fn execute(&self) -> Result<()> {
        let paper = match &self.paper {
            Some(name) => name.parse::<PaperStock>()?,
            None => self.print.default_paper,
        };

        let pages = match (self.pages, self.words) {
            (Some(pages), _) => pages,
            (None, Some(words)) => {
                let pages = estimate_page_count(words, self.print.words_per_page)?;
                println!(
                    "📄 {words} words at {} words/page ≈ {pages} pages",
                    self.print.words_per_page
                );
                pages
            }
            (None, None) => bail!("pass --pages or --words"),
        };

        let dims = spine_width(pages, paper)?;
        println!("📏 Spine for {} pages on {} paper", dims.page_count, dims.paper);
        println!("   {:.4} in / {:.2} mm", dims.inches, dims.millimeters);
        if dims.supports_spine_text {
            println!("   ✅ Wide enough for spine text");
        } else {
            println!("   ⚠️  Too thin for spine text");
        }
        Ok(())
    }
}
