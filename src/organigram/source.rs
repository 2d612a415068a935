//! Input boundary: where the flat member list comes from.
//!
//! The content provider is expected to hand over an already type-checked
//! JSON array of members in CMS order. Structural validation happens later
//! in the tree builder.

use super::error::SourceError;
use super::model::OrgNode;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait MemberSource {
    /// Cache key for the organigram built from this source.
    fn key(&self) -> String;

    async fn load_members(&self) -> Result<Vec<OrgNode>, SourceError>;
}

/// Reads the member list from a JSON file exported by the content provider.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MemberSource for JsonFileSource {
    fn key(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn load_members(&self) -> Result<Vec<OrgNode>, SourceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(SourceError::Io)?;
        let members: Vec<OrgNode> = serde_json::from_slice(&bytes).map_err(SourceError::Parse)?;
        log::info!(
            "Loaded {} organigram members from {}",
            members.len(),
            self.path.display()
        );
        Ok(members)
    }
}

/// Fixed in-memory member list.
pub struct StaticSource {
    members: Vec<OrgNode>,
}

impl StaticSource {
    pub fn new(members: Vec<OrgNode>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberSource for StaticSource {
    fn key(&self) -> String {
        "static".to_string()
    }

    async fn load_members(&self) -> Result<Vec<OrgNode>, SourceError> {
        Ok(self.members.clone())
    }
}
