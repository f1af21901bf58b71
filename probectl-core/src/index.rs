//! Snapshot of probe names already present remotely, used for duplicate detection.

use std::collections::HashSet;

use tracing::{debug, error, info};

use crate::contract::{Probe, ProbeApi};
use crate::error::PipelineError;

/// Page size used whenever the remote collection is listed.
pub const PAGE_SIZE: u32 = 100;

/// Names known to exist remotely at the start of a run, plus any created since.
#[derive(Debug, Clone, Default)]
pub struct ExistingNameIndex {
    names: HashSet<String>,
}

impl ExistingNameIndex {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Record a name; returns `false` if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// List every remote probe name. Any page failure aborts; a partial index is never returned.
pub async fn build_name_index<A>(api: &A) -> Result<ExistingNameIndex, PipelineError>
where
    A: ProbeApi + ?Sized,
{
    let mut index = ExistingNameIndex::default();
    for_each_page(api, |page| {
        for probe in page {
            index.insert(probe.name);
        }
    })
    .await?;
    info!(existing = index.len(), "Built existing probe name index");
    Ok(index)
}

/// Walk the remote collection page by page until a short page is returned.
pub(crate) async fn for_each_page<A, F>(api: &A, mut visit: F) -> Result<(), PipelineError>
where
    A: ProbeApi + ?Sized,
    F: FnMut(Vec<Probe>),
{
    let mut page = 1;
    loop {
        let probes = api.list_probes(page, PAGE_SIZE).await.map_err(|source| {
            error!(page, error = %source, "Failed to list probes");
            PipelineError::ListFailed { page, source }
        })?;
        let count = probes.len();
        debug!(page, count, "Fetched probe page");
        visit(probes);
        if count < PAGE_SIZE as usize {
            return Ok(());
        }
        page += 1;
    }
}
