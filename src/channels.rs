//! Distribution channels and their ISBN policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Output formats a channel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelFormat {
    Ebook,
    Print,
    /// Manuscript submission only, nothing is published by the channel itself
    Manuscript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRule {
    pub requires_isbn: bool,
    pub allows_platform_isbn: bool,
    /// Enrollment restricts distribution elsewhere
    pub exclusive_risk: bool,
    /// Routes the wizard to traditional submission prep instead of finalization
    pub is_non_publishing: bool,
    pub formats: Vec<ChannelFormat>,
}

impl Default for ChannelRule {
    /// Most permissive rule, used for channels missing from the table.
    fn default() -> Self {
        Self {
            requires_isbn: false,
            allows_platform_isbn: false,
            exclusive_risk: false,
            is_non_publishing: false,
            formats: vec![ChannelFormat::Ebook],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    AmazonKdp,
    KdpSelect,
    IngramSpark,
    #[serde(rename = "draft2digital")]
    Draft2Digital,
    AppleBooks,
    Kobo,
    BarnesNoblePress,
    GooglePlayBooks,
    LiteraryAgent,
    TraditionalPublisher,
}

#[derive(Debug, Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl Channel {
    pub const ALL: [Channel; 10] = [
        Channel::AmazonKdp,
        Channel::KdpSelect,
        Channel::IngramSpark,
        Channel::Draft2Digital,
        Channel::AppleBooks,
        Channel::Kobo,
        Channel::BarnesNoblePress,
        Channel::GooglePlayBooks,
        Channel::LiteraryAgent,
        Channel::TraditionalPublisher,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::AmazonKdp => "amazon-kdp",
            Channel::KdpSelect => "kdp-select",
            Channel::IngramSpark => "ingram-spark",
            Channel::Draft2Digital => "draft2digital",
            Channel::AppleBooks => "apple-books",
            Channel::Kobo => "kobo",
            Channel::BarnesNoblePress => "barnes-noble-press",
            Channel::GooglePlayBooks => "google-play-books",
            Channel::LiteraryAgent => "literary-agent",
            Channel::TraditionalPublisher => "traditional-publisher",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Channel::AmazonKdp => "Amazon KDP",
            Channel::KdpSelect => "KDP Select",
            Channel::IngramSpark => "IngramSpark",
            Channel::Draft2Digital => "Draft2Digital",
            Channel::AppleBooks => "Apple Books",
            Channel::Kobo => "Kobo Writing Life",
            Channel::BarnesNoblePress => "Barnes & Noble Press",
            Channel::GooglePlayBooks => "Google Play Books",
            Channel::LiteraryAgent => "Literary agent query",
            Channel::TraditionalPublisher => "Traditional publisher submission",
        }
    }

    pub fn rule(self) -> ChannelRule {
        use ChannelFormat::*;
        let (requires_isbn, allows_platform_isbn, exclusive_risk, is_non_publishing, formats) =
            match self {
                Channel::AmazonKdp => (false, true, false, false, vec![Ebook, Print]),
                Channel::KdpSelect => (false, true, true, false, vec![Ebook]),
                Channel::IngramSpark => (true, false, false, false, vec![Ebook, Print]),
                Channel::Draft2Digital => (false, true, false, false, vec![Ebook, Print]),
                Channel::AppleBooks => (false, false, false, false, vec![Ebook]),
                Channel::Kobo => (false, false, false, false, vec![Ebook]),
                Channel::BarnesNoblePress => (false, true, false, false, vec![Ebook, Print]),
                Channel::GooglePlayBooks => (false, false, false, false, vec![Ebook]),
                Channel::LiteraryAgent => (false, false, false, true, vec![Manuscript]),
                Channel::TraditionalPublisher => (false, false, false, true, vec![Manuscript]),
            };
        ChannelRule {
            requires_isbn,
            allows_platform_isbn,
            exclusive_risk,
            is_non_publishing,
            formats,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Channel::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Total lookup by channel name. Unknown names get the permissive default.
pub fn channel_rule(name: &str) -> ChannelRule {
    match name.parse::<Channel>() {
        Ok(channel) => channel.rule(),
        Err(_) => {
            warn!(channel = %name, "Unknown channel, treating as unrestricted");
            ChannelRule::default()
        }
    }
}
