use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::wizard::node::DecisionNode;
use crate::wizard::reference::QuickReference;

const GRAPPLER_TREE: &str = include_str!("../../data/grappler.json");
const GRAPPLED_TREE: &str = include_str!("../../data/grappled.json");
const OUTSIDE_TREE: &str = include_str!("../../data/outside.json");

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The three perspectives a player can take in a grapple. Each has its own tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Grappler,
    Grappled,
    Outside,
}

/// Display metadata for the role selector and the role badge.
#[derive(Debug, Clone, Copy)]
pub struct RoleInfo {
    pub title: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

impl Role {
    /// Selection order on the role screen.
    pub const ALL: [Role; 3] = [Role::Grappler, Role::Grappled, Role::Outside];

    pub fn info(self) -> RoleInfo {
        match self {
            Role::Grappler => RoleInfo {
                title: "Grappler",
                icon: "💪",
                description: "You're grabbing someone or already have them grappled",
            },
            Role::Grappled => RoleInfo {
                title: "Grappled Creature",
                icon: "🫴",
                description: "Someone has grabbed you and you want out",
            },
            Role::Outside => RoleInfo {
                title: "Outside the Grapple",
                icon: "👀",
                description: "You're watching the grapple and want to help or interfere",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Grappler => "grappler",
            Role::Grappled => "grappled",
            Role::Outside => "outside",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grappler" => Ok(Role::Grappler),
            "grappled" => Ok(Role::Grappled),
            "outside" => Ok(Role::Outside),
            other => Err(format!(
                "unknown role '{other}' (expected grappler, grappled or outside)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision tree
// ---------------------------------------------------------------------------

/// One complete flow for a role: a map of node-id -> DecisionNode.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub start_id: String,
    pub nodes: HashMap<String, DecisionNode>,
}

impl DecisionTree {
    pub fn get(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.get(id)
    }

    pub fn start_node(&self) -> Option<&DecisionNode> {
        self.get(&self.start_id)
    }

    fn from_json(raw: &str, role: Role) -> Result<Self> {
        serde_json::from_str(raw).with_context(|| format!("failed to parse the {role} tree"))
    }
}

// ---------------------------------------------------------------------------
// Tree store
// ---------------------------------------------------------------------------

/// Read-only collection of every tree plus the quick reference tables.
#[derive(Debug, Clone)]
pub struct TreeStore {
    grappler: DecisionTree,
    grappled: DecisionTree,
    outside: DecisionTree,
    reference: QuickReference,
}

impl TreeStore {
    /// Build the store from the data compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            grappler: DecisionTree::from_json(GRAPPLER_TREE, Role::Grappler)?,
            grappled: DecisionTree::from_json(GRAPPLED_TREE, Role::Grappled)?,
            outside: DecisionTree::from_json(OUTSIDE_TREE, Role::Outside)?,
            reference: QuickReference::embedded()?,
        })
    }

    pub fn tree(&self, role: Role) -> &DecisionTree {
        match role {
            Role::Grappler => &self.grappler,
            Role::Grappled => &self.grappled,
            Role::Outside => &self.outside,
        }
    }

    pub fn reference(&self) -> &QuickReference {
        &self.reference
    }

    #[cfg(test)]
    pub fn with_tree(mut self, role: Role, tree: DecisionTree) -> Self {
        match role {
            Role::Grappler => self.grappler = tree,
            Role::Grappled => self.grappled = tree,
            Role::Outside => self.outside = tree,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::node::NodeKind;
    use rstest::rstest;

    fn store() -> TreeStore {
        TreeStore::embedded().unwrap()
    }

    /// Every (node, choice, destination) whose destination is missing from the tree.
    fn dangling_choices(tree: &DecisionTree) -> Vec<(String, String, String)> {
        let mut dangling = Vec::new();
        for node in tree.nodes.values() {
            for choice in &node.choices {
                if let Some(dest) = &choice.destination {
                    if !tree.nodes.contains_key(dest) {
                        dangling.push((node.id.clone(), choice.id.clone(), dest.clone()));
                    }
                }
            }
        }
        dangling
    }

    #[rstest]
    #[case(Role::Grappler, "grappler-start")]
    #[case(Role::Grappled, "grappled-start")]
    #[case(Role::Outside, "outside-start")]
    fn test_start_node_exists(#[case] role: Role, #[case] start_id: &str) {
        let store = store();
        let tree = store.tree(role);
        assert_eq!(tree.start_id, start_id);
        assert_eq!(tree.start_node().map(|n| n.id.as_str()), Some(start_id));
    }

    #[rstest]
    #[case(Role::Grappler)]
    #[case(Role::Grappled)]
    #[case(Role::Outside)]
    fn test_no_dangling_destinations(#[case] role: Role) {
        let store = store();
        let dangling = dangling_choices(store.tree(role));
        assert!(dangling.is_empty(), "{role} tree has dangling choices: {dangling:?}");
    }

    #[rstest]
    #[case(Role::Grappler)]
    #[case(Role::Grappled)]
    #[case(Role::Outside)]
    fn test_node_keys_match_ids(#[case] role: Role) {
        let store = store();
        for (key, node) in &store.tree(role).nodes {
            assert_eq!(key, &node.id);
        }
    }

    #[rstest]
    #[case(Role::Grappler)]
    #[case(Role::Grappled)]
    #[case(Role::Outside)]
    fn test_result_nodes_are_terminal(#[case] role: Role) {
        let store = store();
        for node in store.tree(role).nodes.values() {
            if node.kind == NodeKind::Result {
                assert!(node.choices.is_empty(), "result node {} has choices", node.id);
            } else {
                assert!(!node.choices.is_empty(), "{} node {} is a dead end", node.kind, node.id);
            }
        }
    }

    #[rstest]
    #[case(Role::Grappler)]
    #[case(Role::Grappled)]
    #[case(Role::Outside)]
    fn test_choice_ids_unique_within_node(#[case] role: Role) {
        let store = store();
        for node in store.tree(role).nodes.values() {
            let mut ids: Vec<&str> = node.choices.iter().map(|c| c.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), node.choices.len(), "duplicate choice id in {}", node.id);
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(" Grappled ".parse::<Role>(), Ok(Role::Grappled));
        assert!("wrestler".parse::<Role>().is_err());
    }

    #[test]
    fn test_start_node_missing() {
        let tree: DecisionTree =
            serde_json::from_str(r#"{"start_id": "ghost", "nodes": {}}"#).unwrap();
        assert!(tree.start_node().is_none());
    }

    #[test]
    fn test_get_missing_node() {
        let store = store();
        assert!(store.tree(Role::Outside).get("grappler-start").is_none());
    }
}
