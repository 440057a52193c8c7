//! In-memory data source shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use dexbrowser::source::{ChainLink, ChainTree, DataSource, SourceError, SpeciesDescriptor};
use dexbrowser::state::{BaseStat, Record, Sprites};

pub const SPECIES_URL: &str = "https://pokeapi.test/api/v2/pokemon-species";
pub const CHAIN_URL: &str = "https://pokeapi.test/api/v2/evolution-chain";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ById(u32),
    ByName(String),
    Species(u32),
    Chain(String),
}

#[derive(Default)]
pub struct StubSource {
    records: HashMap<u32, Record>,
    species: HashMap<u32, Option<String>>,
    chains: HashMap<String, ChainTree>,
    failing: HashSet<u32>,
    offline: HashSet<u32>,
    calls: Mutex<Vec<Call>>,
}

pub fn record(id: u32, name: &str) -> Record {
    Record {
        id,
        name: name.to_string(),
        types: vec!["normal".to_string()],
        stats: vec![BaseStat {
            name: "hp".to_string(),
            value: 40 + id as u16 % 60,
        }],
        abilities: Vec::new(),
        moves: Vec::new(),
        sprites: Sprites {
            front_default: Some(format!("https://sprites.test/{id}.png")),
            ..Sprites::default()
        },
        species: Some(name.to_string()),
        height: 10,
        weight: 100,
    }
}

pub fn link(id: u32, name: &str, evolves_to: Vec<ChainLink>) -> ChainLink {
    ChainLink {
        species_name: name.to_string(),
        species_url: format!("{SPECIES_URL}/{id}/"),
        evolution_details: serde_json::Value::Array(Vec::new()),
        evolves_to,
    }
}

impl StubSource {
    /// Every id of the three regions as `mon-{id}`, with a few real names.
    pub fn dex() -> Self {
        let mut stub = Self::default();
        for id in 1..=386 {
            stub.records.insert(id, record(id, &format!("mon-{id}")));
        }
        for (id, name) in [
            (1, "bulbasaur"),
            (2, "ivysaur"),
            (3, "venusaur"),
            (4, "charmander"),
            (5, "charmeleon"),
            (6, "charizard"),
            (25, "pikachu"),
            (122, "mr-mime"),
            (133, "eevee"),
            (134, "vaporeon"),
            (135, "jolteon"),
            (136, "flareon"),
            (151, "mew"),
            (250, "ho-oh"),
        ] {
            stub.records.insert(id, record(id, name));
        }
        stub
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.records.insert(record.id, record);
        self
    }

    /// Lookups of `id` answer not-found.
    pub fn failing(mut self, id: u32) -> Self {
        self.failing.insert(id);
        self
    }

    /// Lookups of `id` fail at the transport level.
    pub fn offline(mut self, id: u32) -> Self {
        self.offline.insert(id);
        self
    }

    pub fn with_species(mut self, id: u32, chain: Option<ChainTree>) -> Self {
        let url = chain.as_ref().map(|tree| format!("{CHAIN_URL}/{}/", tree.id));
        if let (Some(url), Some(tree)) = (url.clone(), chain) {
            self.chains.insert(url, tree);
        }
        self.species.insert(id, url);
        self
    }

    /// Registers `tree` as the chain of every species it contains.
    pub fn with_chain(mut self, tree: ChainTree) -> Self {
        let url = format!("{CHAIN_URL}/{}/", tree.id);
        let mut stack = vec![&tree.chain];
        let mut ids = Vec::new();
        while let Some(link) = stack.pop() {
            if let Some(id) = dexbrowser::source::id_from_url(&link.species_url) {
                ids.push(id);
            }
            stack.extend(link.evolves_to.iter());
        }
        for id in ids {
            self.species.insert(id, Some(url.clone()));
        }
        self.chains.insert(url, tree);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn by_id_calls(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ById(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn by_name_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ByName(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn lookup(&self, id: u32) -> Result<Record, SourceError> {
        if self.offline.contains(&id) {
            return Err(SourceError::Transport(format!("connection reset on {id}")));
        }
        if self.failing.contains(&id) {
            return Err(SourceError::NotFound(id.to_string()));
        }
        self.records
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl DataSource for StubSource {
    async fn fetch_by_id(&self, id: u32) -> Result<Record, SourceError> {
        self.log(Call::ById(id));
        self.lookup(id)
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Record, SourceError> {
        self.log(Call::ByName(name.to_string()));
        let id = self
            .records
            .values()
            .find(|record| record.name == name)
            .map(|record| record.id)
            .ok_or_else(|| SourceError::NotFound(name.to_string()))?;
        self.lookup(id)
    }

    async fn fetch_species(&self, id: u32) -> Result<SpeciesDescriptor, SourceError> {
        self.log(Call::Species(id));
        let url = self
            .species
            .get(&id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("species {id}")))?;
        Ok(SpeciesDescriptor {
            id,
            name: format!("species-{id}"),
            evolution_chain_url: url,
        })
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<ChainTree, SourceError> {
        self.log(Call::Chain(url.to_string()));
        self.chains
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(url.to_string()))
    }
}
