use anyhow::Result;

use super::Command;
use crate::channels::{Channel, ChannelFormat};

pub struct ChannelsCommand;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

impl Command for ChannelsCommand {
    async fn execute(&self) -> Result<()> {
        println!("🏪 Distribution channels");
        println!();
        println!(
            "{:<24} {:<8} {:<13} {:<10} {:<10} {}",
            "NAME", "ISBN", "PLATFORM ISBN", "EXCLUSIVE", "SUBMISSION", "FORMATS"
        );
        for channel in Channel::ALL {
            let rule = channel.rule();
            let formats = rule
                .formats
                .iter()
                .map(|f| match f {
                    ChannelFormat::Ebook => "ebook",
                    ChannelFormat::Print => "print",
                    ChannelFormat::Manuscript => "manuscript",
                })
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{:<24} {:<8} {:<13} {:<10} {:<10} {}",
                channel.name(),
                if rule.requires_isbn { "required" } else { "-" },
                yes_no(rule.allows_platform_isbn),
                yes_no(rule.exclusive_risk),
                yes_no(rule.is_non_publishing),
                formats
            );
        }
        println!();
        println!("💡 Channels not listed here are treated as not requiring an ISBN.");
        Ok(())
    }
}
