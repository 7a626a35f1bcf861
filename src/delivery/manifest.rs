use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assets::{AssetKind, CoverAsset, CoverAssetStore};
use crate::channels::{Channel, ChannelFormat};
use crate::isbn::{isbn_state, IsbnState};
use crate::project::Project;
use crate::spine::{spine_width, PaperStock, SpineDimensions, SpineError};

/// What gets packaged for a channel, and what is still missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryManifest {
    pub project_id: Uuid,
    pub channel: Channel,
    pub isbn_state: IsbnState,
    pub word_count: u64,
    pub assets: Vec<CoverAsset>,
    pub missing_assets: Vec<AssetKind>,
    /// Present only for channels that print
    pub spine: Option<SpineDimensions>,
}

pub fn required_assets(format: ChannelFormat) -> &'static [AssetKind] {
    match format {
        ChannelFormat::Ebook => &[AssetKind::EbookCover],
        ChannelFormat::Print => &[AssetKind::FullWrap],
        ChannelFormat::Manuscript => &[AssetKind::FrontCover],
    }
}

impl DeliveryManifest {
    pub fn assemble(
        project: &Project,
        channel: Channel,
        assets: &dyn CoverAssetStore,
        paper: PaperStock,
        words_per_page: u32,
    ) -> Result<Self, SpineError> {
        let rule = channel.rule();

        let mut wanted: Vec<AssetKind> = rule
            .formats
            .iter()
            .flat_map(|f| required_assets(*f).iter().copied())
            .collect();
        wanted.sort();
        wanted.dedup();

        let mut present = Vec::new();
        let mut missing_assets = Vec::new();
        for kind in wanted {
            match assets.get(kind) {
                Some(asset) => present.push(asset),
                None => missing_assets.push(kind),
            }
        }

        let spine = if rule.formats.contains(&ChannelFormat::Print) {
            let pages = project.estimated_page_count(words_per_page)?;
            Some(spine_width(pages, paper)?)
        } else {
            None
        };

        Ok(Self {
            project_id: project.id,
            channel,
            isbn_state: isbn_state(&rule, &project.isbn),
            word_count: project.total_word_count(),
            assets: present,
            missing_assets,
            spine,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.missing_assets.is_empty() && self.isbn_state != IsbnState::RequiredUnset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryCoverAssetStore;

    fn novel() -> Project {
        Project::new("Winter Orchard").with_chapter("All of it", 75_000)
    }

    #[test]
    fn test_print_channel_needs_full_wrap_and_spine() {
        let store = InMemoryCoverAssetStore::new();
        store.put(CoverAsset {
            kind: AssetKind::EbookCover,
            uri: "ebook.jpg".into(),
            width_px: Some(1600),
            height_px: Some(2560),
        });

        let manifest =
            DeliveryManifest::assemble(&novel(), Channel::AmazonKdp, &store, PaperStock::Cream, 250)
                .unwrap();

        assert_eq!(manifest.missing_assets, vec![AssetKind::FullWrap]);
        assert_eq!(manifest.assets.len(), 1);
        let spine = manifest.spine.unwrap();
        assert_eq!(spine.page_count, 300);
        assert!(!manifest.is_complete());
    }

    #[test]
    fn test_ebook_only_channel_has_no_spine() {
        let store = InMemoryCoverAssetStore::new();
        let manifest =
            DeliveryManifest::assemble(&novel(), Channel::Kobo, &store, PaperStock::White, 250)
                .unwrap();
        assert!(manifest.spine.is_none());
        assert_eq!(manifest.missing_assets, vec![AssetKind::EbookCover]);
        assert_eq!(manifest.isbn_state, IsbnState::NotRequired);
    }

    #[test]
    fn test_required_isbn_blocks_completion() {
        let store = InMemoryCoverAssetStore::new();
        for kind in [AssetKind::EbookCover, AssetKind::FullWrap] {
            store.put(CoverAsset {
                kind,
                uri: format!("{kind}.png"),
                width_px: Some(100),
                height_px: Some(100),
            });
        }

        let mut project = novel();
        let manifest = DeliveryManifest::assemble(
            &project,
            Channel::IngramSpark,
            &store,
            PaperStock::Cream,
            250,
        )
        .unwrap();
        assert_eq!(manifest.isbn_state, IsbnState::RequiredUnset);
        assert!(!manifest.is_complete());

        project.isbn = "9780306406157".into();
        let manifest = DeliveryManifest::assemble(
            &project,
            Channel::IngramSpark,
            &store,
            PaperStock::Cream,
            250,
        )
        .unwrap();
        assert!(manifest.is_complete());
    }
}
