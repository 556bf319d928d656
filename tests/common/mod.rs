#![allow(dead_code)]

use esdf::{DataTree, Node, NodeId};
use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Installs a test-captured subscriber once per test binary.
pub fn init_test_logging() {
    TEST_SETUP.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("esdf=debug"));
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_filter(env_filter),
        );
        if !tracing::dispatcher::has_been_set() {
            subscriber
                .try_init()
                .unwrap_or_else(|e| eprintln!("Failed to set up logging: {}", e));
        }
    });
}

pub const DESCRIPTION: &str = "This Wardragon bears no resemblance to any actual ship in the game \
Endless Sky. It has no material existence, despite having mass and possibly explaining the \
existence of the dark matter in our universe.";

/// Adds the sample ship under `parent` and returns its id.
pub fn add_test_ship(tree: &mut DataTree, parent: NodeId) -> NodeId {
    let ship = tree
        .add_child(parent, Node::new("ship").with_arg("Much Confused Wardragon"))
        .unwrap();
    tree.add_child(ship, Node::new("mass").with_arg("35")).unwrap();
    tree.add_child(ship, Node::new("drag").with_arg("0.3")).unwrap();

    let weapon = tree.add_child(ship, Node::new("weapon")).unwrap();
    tree.add_child(weapon, Node::new("hit force").with_arg("308"))
        .unwrap();
    tree.add_child(weapon, Node::new("hull damage").with_arg("6100"))
        .unwrap();
    tree.add_child(weapon, Node::new("shield damage").with_arg("42"))
        .unwrap();

    tree.add_child(ship, Node::new("description").with_arg(DESCRIPTION))
        .unwrap();
    ship
}

/// A fresh tree holding only the sample ship.
pub fn test_tree() -> (DataTree, NodeId) {
    let mut tree = DataTree::new();
    let root = tree.root();
    let ship = add_test_ship(&mut tree, root);
    (tree, ship)
}
