//! Cover asset store consumed by the deliverable manifest.
//!
//! Rendering and cropping happen elsewhere; this only tracks where the
//! finished images live.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    FrontCover,
    BackCover,
    SpineArt,
    FullWrap,
    EbookCover,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetKind::FrontCover => "front cover",
            AssetKind::BackCover => "back cover",
            AssetKind::SpineArt => "spine art",
            AssetKind::FullWrap => "full wrap",
            AssetKind::EbookCover => "ebook cover",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
#[error("unknown asset kind: {0}")]
pub struct UnknownAssetKind(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAssetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front-cover" => Ok(AssetKind::FrontCover),
            "back-cover" => Ok(AssetKind::BackCover),
            "spine-art" => Ok(AssetKind::SpineArt),
            "full-wrap" => Ok(AssetKind::FullWrap),
            "ebook-cover" => Ok(AssetKind::EbookCover),
            other => Err(UnknownAssetKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverAsset {
    pub kind: AssetKind,
    pub uri: String,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

#[cfg_attr(feature = "testing", mockall::automock)]
pub trait CoverAssetStore: Send + Sync {
    fn get(&self, kind: AssetKind) -> Option<CoverAsset>;

    fn put(&self, asset: CoverAsset);

    fn kinds(&self) -> Vec<AssetKind>;
}

#[derive(Debug, Default)]
pub struct InMemoryCoverAssetStore {
    assets: RwLock<HashMap<AssetKind, CoverAsset>>,
}

impl InMemoryCoverAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CoverAssetStore for InMemoryCoverAssetStore {
    fn get(&self, kind: AssetKind) -> Option<CoverAsset> {
        // a poisoned lock still holds a consistent map; writers never panic mid-insert
        let assets = self.assets.read().unwrap_or_else(|e| e.into_inner());
        assets.get(&kind).cloned()
    }

    fn put(&self, asset: CoverAsset) {
        let mut assets = self.assets.write().unwrap_or_else(|e| e.into_inner());
        assets.insert(asset.kind, asset);
    }

    fn kinds(&self) -> Vec<AssetKind> {
        let assets = self.assets.read().unwrap_or_else(|e| e.into_inner());
        let mut kinds: Vec<_> = assets.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_replaces_same_kind() {
        let store = InMemoryCoverAssetStore::new();
        store.put(CoverAsset {
            kind: AssetKind::FrontCover,
            uri: "covers/v1.png".into(),
            width_px: Some(1600),
            height_px: Some(2560),
        });
        store.put(CoverAsset {
            kind: AssetKind::FrontCover,
            uri: "covers/v2.png".into(),
            width_px: Some(1600),
            height_px: Some(2560),
        });

        assert_eq!(store.get(AssetKind::FrontCover).unwrap().uri, "covers/v2.png");
        assert_eq!(store.kinds(), vec![AssetKind::FrontCover]);
        assert!(store.get(AssetKind::FullWrap).is_none());
    }

    #[test]
    fn test_kind_names_parse() {
        assert_eq!("full-wrap".parse::<AssetKind>().unwrap(), AssetKind::FullWrap);
        assert!("poster".parse::<AssetKind>().is_err());
    }
}
