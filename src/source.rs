//! Data source seam between the browser core and the remote API

use std::ops::ControlFlow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::state::Record;

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum SourceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response parse error: {0}")]
    Malformed(String),
}

/// Species descriptor; only the evolution-chain reference is consumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDescriptor {
    pub id: u32,
    pub name: String,
    pub evolution_chain_url: Option<String>,
}

/// One link of a remote evolution chain tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species_name: String,
    pub species_url: String,
    /// Raw transition metadata, passed through untouched.
    #[serde(default)]
    pub evolution_details: serde_json::Value,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainTree {
    pub id: u32,
    pub chain: ChainLink,
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_by_id(&self, id: u32) -> Result<Record, SourceError>;

    /// Exact, server-side name lookup. Callers lower-case the name first.
    async fn fetch_by_name(&self, name: &str) -> Result<Record, SourceError>;

    async fn fetch_species(&self, id: u32) -> Result<SpeciesDescriptor, SourceError>;

    async fn fetch_evolution_chain(&self, url: &str) -> Result<ChainTree, SourceError>;
}

/// Fetches the ids one at a time, in the given order, handing each result to
/// `visit`.
///
/// The next request is not issued until the previous one resolved, so
/// `visit` sees results in the order of `ids`. Returning
/// `ControlFlow::Break` stops before any further request is made. Page loads
/// and the fuzzy scan both go through here.
pub async fn fetch_in_order<S, F>(source: &S, ids: &[u32], mut visit: F) -> ControlFlow<()>
where
    S: DataSource + ?Sized,
    F: FnMut(u32, Result<Record, SourceError>) -> ControlFlow<()>,
{
    for &id in ids {
        visit(id, source.fetch_by_id(id).await)?;
    }
    ControlFlow::Continue(())
}

/// Extracts the trailing numeric id of a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon-species/4/`.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}
