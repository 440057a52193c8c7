//! Evolution tree resolver
//!
//! Walks the remote chain tree with an explicit stack and linearizes it in
//! pre-order: a link comes before its children, and each child subtree is
//! finished before its next sibling starts.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BrowseError;
use crate::source::{self, ChainLink, DataSource};
use crate::state::Record;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub record: Record,
    /// Raw transition metadata from the chain link.
    pub evolution_details: serde_json::Value,
    /// Distance from the root of the chain.
    pub depth: usize,
    pub is_current: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainStatus {
    NoData,
    DoesNotEvolve,
    Evolves,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionChain {
    pub nodes: Vec<EvolutionNode>,
}

impl EvolutionChain {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn status(&self) -> ChainStatus {
        match self.nodes.len() {
            0 => ChainStatus::NoData,
            1 => ChainStatus::DoesNotEvolve,
            _ => ChainStatus::Evolves,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.nodes.iter().position(|node| node.is_current)
    }
}

/// Builds the evolution chain of `record`.
///
/// Species or chain lookups failing is an error; a failing node only drops
/// its own subtree and the rest of the chain is still returned.
pub async fn resolve<S>(source: &S, record: &Record) -> Result<EvolutionChain, BrowseError>
where
    S: DataSource + ?Sized,
{
    let species = source
        .fetch_species(record.id)
        .await
        .map_err(|error| BrowseError::from_source(error, &record.name))?;
    let Some(url) = species.evolution_chain_url else {
        debug!(id = record.id, "species has no evolution chain");
        return Ok(EvolutionChain::default());
    };
    let tree = source
        .fetch_evolution_chain(&url)
        .await
        .map_err(|error| BrowseError::from_source(error, &record.name))?;

    let mut nodes = Vec::new();
    let mut stack: Vec<(&ChainLink, usize)> = vec![(&tree.chain, 0)];
    while let Some((link, depth)) = stack.pop() {
        let Some(id) = source::id_from_url(&link.species_url) else {
            warn!(url = %link.species_url, "chain link without species id");
            continue;
        };
        let node_record = match source.fetch_by_id(id).await {
            Ok(node_record) => node_record,
            Err(error) => {
                warn!(id, %error, "dropping evolution subtree");
                continue;
            }
        };
        nodes.push(EvolutionNode {
            is_current: node_record.id == record.id,
            record: node_record,
            evolution_details: link.evolution_details.clone(),
            depth,
        });
        for child in link.evolves_to.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    Ok(EvolutionChain { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::record;

    fn node(id: u32, current: bool) -> EvolutionNode {
        EvolutionNode {
            record: record(id, "mon"),
            evolution_details: serde_json::Value::Null,
            depth: 0,
            is_current: current,
        }
    }

    #[test]
    fn status_follows_length() {
        assert_eq!(EvolutionChain::default().status(), ChainStatus::NoData);
        let single = EvolutionChain {
            nodes: vec![node(1, true)],
        };
        assert_eq!(single.status(), ChainStatus::DoesNotEvolve);
        let pair = EvolutionChain {
            nodes: vec![node(1, false), node(2, true)],
        };
        assert_eq!(pair.status(), ChainStatus::Evolves);
        assert_eq!(pair.current_index(), Some(1));
    }
}
