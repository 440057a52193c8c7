//! Evolution chain linearization

mod common;

use common::{link, record, StubSource};
use dexbrowser::error::BrowseError;
use dexbrowser::evolution::{self, ChainStatus, EvolutionChain};
use dexbrowser::source::ChainTree;
use pretty_assertions::assert_eq;

fn names(chain: &EvolutionChain) -> Vec<&str> {
    chain
        .nodes
        .iter()
        .map(|node| node.record.name.as_str())
        .collect()
}

fn depths(chain: &EvolutionChain) -> Vec<usize> {
    chain.nodes.iter().map(|node| node.depth).collect()
}

fn charmander_line() -> ChainTree {
    ChainTree {
        id: 2,
        chain: link(
            4,
            "charmander",
            vec![link(5, "charmeleon", vec![link(6, "charizard", vec![])])],
        ),
    }
}

#[tokio::test]
async fn species_without_chain_yields_no_data() {
    let source = StubSource::dex().with_species(151, None);

    let chain = evolution::resolve(&source, &record(151, "mew")).await.unwrap();

    assert!(chain.is_empty());
    assert_eq!(chain.status(), ChainStatus::NoData);
}

#[tokio::test]
async fn single_stage_does_not_evolve() {
    let tree = ChainTree {
        id: 151,
        chain: link(151, "mew", vec![]),
    };
    let source = StubSource::dex().with_chain(tree);

    let chain = evolution::resolve(&source, &record(151, "mew")).await.unwrap();

    assert_eq!(names(&chain), vec!["mew"]);
    assert_eq!(chain.status(), ChainStatus::DoesNotEvolve);
    assert!(chain.nodes[0].is_current);
}

#[tokio::test]
async fn linear_chain_runs_root_to_leaf() {
    let source = StubSource::dex().with_chain(charmander_line());

    let chain = evolution::resolve(&source, &record(5, "charmeleon"))
        .await
        .unwrap();

    assert_eq!(names(&chain), vec!["charmander", "charmeleon", "charizard"]);
    assert_eq!(depths(&chain), vec![0, 1, 2]);
    assert_eq!(chain.current_index(), Some(1));
    assert_eq!(chain.status(), ChainStatus::Evolves);
}

#[tokio::test]
async fn branches_keep_sibling_order() {
    let tree = ChainTree {
        id: 67,
        chain: link(
            133,
            "eevee",
            vec![
                link(134, "vaporeon", vec![]),
                link(135, "jolteon", vec![]),
                link(136, "flareon", vec![]),
            ],
        ),
    };
    let source = StubSource::dex().with_chain(tree);

    let chain = evolution::resolve(&source, &record(133, "eevee")).await.unwrap();

    assert_eq!(names(&chain), vec!["eevee", "vaporeon", "jolteon", "flareon"]);
    assert_eq!(depths(&chain), vec![0, 1, 1, 1]);
}

#[tokio::test]
async fn subtrees_finish_before_next_sibling() {
    let tree = ChainTree {
        id: 1,
        chain: link(
            1,
            "bulbasaur",
            vec![
                link(2, "ivysaur", vec![link(3, "venusaur", vec![])]),
                link(25, "pikachu", vec![]),
            ],
        ),
    };
    let source = StubSource::dex().with_chain(tree);

    let chain = evolution::resolve(&source, &record(3, "venusaur")).await.unwrap();

    assert_eq!(
        names(&chain),
        vec!["bulbasaur", "ivysaur", "venusaur", "pikachu"]
    );
    assert_eq!(depths(&chain), vec![0, 1, 2, 1]);
    assert_eq!(chain.current_index(), Some(2));
}

#[tokio::test]
async fn failing_node_drops_only_its_subtree() {
    let tree = ChainTree {
        id: 1,
        chain: link(
            1,
            "bulbasaur",
            vec![
                link(2, "ivysaur", vec![link(3, "venusaur", vec![])]),
                link(25, "pikachu", vec![]),
            ],
        ),
    };
    let source = StubSource::dex().with_chain(tree).failing(2);

    let chain = evolution::resolve(&source, &record(1, "bulbasaur")).await.unwrap();

    assert_eq!(names(&chain), vec!["bulbasaur", "pikachu"]);
}

#[tokio::test]
async fn missing_species_is_an_error() {
    let source = StubSource::dex();

    let error = evolution::resolve(&source, &record(4, "charmander"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        BrowseError::NotFound {
            query: "charmander".into()
        }
    );
}
