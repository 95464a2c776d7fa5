use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, TrajectoryError};
use crate::segments::{Segment, SegmentKey};
use crate::source::{ArchiveBackend, MetadataRecord, MoleculeRecord};

/// Archive served over HTTP as JSON documents below `base_url`:
/// `metadata`, `metadata/{uid}`, `molecules`, `molecules/{uid}`,
/// `molecules/{uid}/tags`, `columns`, `molecules/{uid}/segments` and
/// `molecules/{uid}/segments/rows`.
#[derive(Debug)]
pub struct RemoteBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteBackend {
    pub fn connect(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TrajectoryError::Source(format!("http client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "remote_get");
        self.client
            .get(&url)
            .query(query)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<T>())
            .map_err(|e| TrajectoryError::Source(format!("GET {}: {}", url, e)))
    }
}

impl ArchiveBackend for RemoteBackend {
    fn name(&self) -> &str {
        self.base_url.rsplit('/').next().unwrap_or(&self.base_url)
    }

    fn metadata_uids(&self) -> Result<Vec<String>> {
        self.get("metadata", &[])
    }

    fn metadata(&self, uid: &str) -> Result<MetadataRecord> {
        self.get(&format!("metadata/{}", uid), &[])
    }

    fn molecule_uids(&self) -> Result<Vec<String>> {
        self.get("molecules", &[])
    }

    fn molecule(&self, uid: &str) -> Result<MoleculeRecord> {
        self.get(&format!("molecules/{}", uid), &[])
    }

    fn has_tag(&self, uid: &str, tag: &str) -> Result<bool> {
        let tags: Vec<String> = self.get(&format!("molecules/{}/tags", uid), &[])?;
        Ok(tags.iter().any(|t| t == tag))
    }

    fn accepted_uids(&self, tag: &str) -> Result<Vec<String>> {
        self.get("molecules", &[("tag", tag)])
    }

    fn column_set(&self) -> Result<BTreeSet<String>> {
        self.get("columns", &[])
    }

    fn segment_keys(&self, uid: &str) -> Result<Vec<SegmentKey>> {
        self.get(&format!("molecules/{}/segments", uid), &[])
    }

    fn segments(&self, uid: &str, key: &SegmentKey) -> Result<Vec<Segment>> {
        self.get(
            &format!("molecules/{}/segments/rows", uid),
            &[
                ("x", key.x_column.as_str()),
                ("y", key.y_column.as_str()),
                ("region", key.region.as_str()),
            ],
        )
    }
}
