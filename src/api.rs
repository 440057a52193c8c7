use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::source::{self, ChainLink, ChainTree, DataSource, SourceError, SpeciesDescriptor};
use crate::state::{AbilityEntry, BaseStat, MoveEntry, Record, Sprites};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    #[serde(default)]
    height: u16,
    #[serde(default)]
    weight: u16,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
    #[serde(default)]
    sprites: serde_json::Value,
    species: Option<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
    #[serde(default)]
    version_group_details: Vec<MoveVersionDetail>,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveVersionDetail {
    level_learned_at: u16,
    move_learn_method: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    id: u32,
    name: String,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    id: u32,
    chain: ChainLinkResponse,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLinkResponse {
    species: NamedResource,
    #[serde(default)]
    evolution_details: serde_json::Value,
    #[serde(default)]
    evolves_to: Vec<ChainLinkResponse>,
}

/// HTTP data source backed by PokeAPI.
#[derive(Clone, Debug)]
pub struct PokeApi {
    base_url: String,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl PokeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_pokemon(&self, key: &str) -> Result<Record, SourceError> {
        let url = format!("{}/pokemon/{key}", self.base_url);
        let response: PokemonResponse = fetch_json(&url).await?;
        Ok(record_from_response(response))
    }
}

#[async_trait]
impl DataSource for PokeApi {
    async fn fetch_by_id(&self, id: u32) -> Result<Record, SourceError> {
        self.fetch_pokemon(&id.to_string()).await
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Record, SourceError> {
        self.fetch_pokemon(&name.trim().to_lowercase()).await
    }

    async fn fetch_species(&self, id: u32) -> Result<SpeciesDescriptor, SourceError> {
        let url = format!("{}/pokemon-species/{id}", self.base_url);
        let response: PokemonSpeciesResponse = fetch_json(&url).await?;
        Ok(SpeciesDescriptor {
            id: response.id,
            name: response.name,
            evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
        })
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<ChainTree, SourceError> {
        let response: EvolutionChainResponse = fetch_json(url).await?;
        Ok(ChainTree {
            id: response.id,
            chain: chain_from_response(response.chain),
        })
    }
}

fn record_from_response(response: PokemonResponse) -> Record {
    let mut type_slots = response.types;
    type_slots.sort_by_key(|slot| slot.slot);
    let types = type_slots
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| BaseStat {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| AbilityEntry {
            name: slot.ability.name,
            hidden: slot.is_hidden,
        })
        .collect();
    let moves = response
        .moves
        .into_iter()
        .map(|slot| {
            // The latest version group is listed last.
            let detail = slot.version_group_details.last();
            MoveEntry {
                name: slot.move_info.name,
                learn_method: detail.map(|detail| detail.move_learn_method.name.clone()),
                level: detail
                    .map(|detail| detail.level_learned_at)
                    .filter(|level| *level > 0),
            }
        })
        .collect();

    Record {
        id: response.id,
        name: response.name,
        types,
        stats,
        abilities,
        moves,
        sprites: Sprites {
            front_default: pointer_string(&response.sprites, "/front_default"),
            front_shiny: pointer_string(&response.sprites, "/front_shiny"),
            animated: pointer_string(
                &response.sprites,
                "/versions/generation-v/black-white/animated/front_default",
            ),
        },
        species: response.species.map(|species| species.name),
        height: response.height,
        weight: response.weight,
    }
}

fn chain_from_response(link: ChainLinkResponse) -> ChainLink {
    ChainLink {
        species_name: link.species.name,
        species_url: link.species.url,
        evolution_details: link.evolution_details,
        evolves_to: link
            .evolves_to
            .into_iter()
            .map(chain_from_response)
            .collect(),
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, SourceError> {
    debug!(url, "GET");
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| SourceError::Transport(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        let resource = source::id_from_url(url)
            .map(|id| id.to_string())
            .unwrap_or_else(|| url.to_string());
        debug!(url, %status, "non-success status");
        return Err(SourceError::NotFound(format!("{resource} ({status})")));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| SourceError::Transport(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| SourceError::Malformed(err.to_string()))
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}
