use log::{debug, info, warn};
use thiserror::Error;

use crate::wizard::node::DecisionNode;
use crate::wizard::tree::{Role, TreeStore};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no role selected")]
    NoRole,

    #[error("node '{node_id}' not found in the {role} tree")]
    NodeNotFound { role: Role, node_id: String },
}

/// One step of the path taken through a tree.
///
/// Entries are never edited in place. Leaving a node replaces its entry with
/// a copy that records the label of the choice taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    node_id: String,
    choice_label: Option<String>,
}

impl HistoryEntry {
    fn arrived(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            choice_label: None,
        }
    }

    fn left_by(self, label: impl Into<String>) -> Self {
        Self {
            choice_label: Some(label.into()),
            ..self
        }
    }

    fn reopened(self) -> Self {
        Self {
            choice_label: None,
            ..self
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Label of the choice used to leave this node. `None` on the current step.
    pub fn choice_label(&self) -> Option<&str> {
        self.choice_label.as_deref()
    }
}

/// What a call to [`Session::choose`] did. Everything but `Advanced` left the
/// session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooseOutcome {
    Advanced,
    NoRole,
    /// The current node id does not resolve in the active tree.
    NodeMissing,
    /// The current node has no choice with that id (or no choices at all).
    UnknownChoice,
    /// The choice exists but has no destination.
    Unwired,
    /// The choice points at a node the tree does not contain.
    Dangling,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Traversal state for one player: the selected role and the path taken.
///
/// `history` is non-empty exactly when a role is selected, its first entry is
/// always the tree's start node and its last entry is the current node.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    store: &'a TreeStore,
    role: Option<Role>,
    history: Vec<HistoryEntry>,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a TreeStore) -> Self {
        Self {
            store,
            role: None,
            history: Vec::new(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Start the role's tree from the top, discarding any previous session.
    pub fn select_role(&mut self, role: Role) {
        let tree = self.store.tree(role);
        let start_id = &tree.start_id;
        info!("Role selected: {role} (start node: {start_id})");
        if tree.start_node().is_none() {
            warn!("Start node '{start_id}' missing from the {role} tree");
        }
        self.role = Some(role);
        self.history = vec![HistoryEntry::arrived(start_id.as_str())];
    }

    pub fn current_node(&self) -> Result<&'a DecisionNode, SessionError> {
        let (Some(role), Some(entry)) = (self.role, self.history.last()) else {
            return Err(SessionError::NoRole);
        };
        self.store
            .tree(role)
            .get(&entry.node_id)
            .ok_or_else(|| SessionError::NodeNotFound {
                role,
                node_id: entry.node_id.clone(),
            })
    }

    /// Follow the current node's choice with id `choice_id`.
    ///
    /// Invalid or unwired choices are ignored: the returned outcome says why
    /// and the session is left exactly as it was.
    pub fn choose(&mut self, choice_id: &str) -> ChooseOutcome {
        let node = match self.current_node() {
            Ok(node) => node,
            Err(SessionError::NoRole) => {
                debug!("Ignoring choice '{choice_id}': no role selected");
                return ChooseOutcome::NoRole;
            }
            Err(err) => {
                warn!("Ignoring choice '{choice_id}': {err}");
                return ChooseOutcome::NodeMissing;
            }
        };

        let Some(choice) = node.choice(choice_id) else {
            debug!("Ignoring choice '{choice_id}': not offered by {}", node.id);
            return ChooseOutcome::UnknownChoice;
        };
        let Some(destination) = choice.destination.as_deref() else {
            debug!("Ignoring choice '{choice_id}' on {}: unwired", node.id);
            return ChooseOutcome::Unwired;
        };
        if let Some(role) = self.role {
            if self.store.tree(role).get(destination).is_none() {
                warn!(
                    "Ignoring choice '{choice_id}' on {}: destination '{destination}' missing from the {role} tree",
                    node.id
                );
                return ChooseOutcome::Dangling;
            }
        }

        if let Some(current) = self.history.pop() {
            self.history.push(current.left_by(choice.label.as_str()));
        }
        self.history.push(HistoryEntry::arrived(destination));
        info!(
            "Transition: {} -> {destination} (choice: {})",
            node.id, choice.label
        );
        ChooseOutcome::Advanced
    }

    /// Step back one node, or back to role selection from the start node.
    pub fn go_back(&mut self) {
        match self.history.len() {
            0 => debug!("Back ignored: no role selected"),
            1 => {
                info!("Back from start node: returning to role selection");
                self.reset();
            }
            _ => {
                self.history.pop();
                if let Some(previous) = self.history.pop() {
                    info!("Back to {}", previous.node_id());
                    self.history.push(previous.reopened());
                }
            }
        }
    }

    pub fn reset(&mut self) {
        info!("Session reset");
        self.role = None;
        self.history.clear();
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_at_result(&self) -> bool {
        self.current_node().is_ok_and(DecisionNode::is_result)
    }

    /// One label per history entry: the choice taken to leave it, else the
    /// node's title, else "Start".
    pub fn breadcrumbs(&self) -> Vec<&str> {
        let tree = self.role.map(|role| self.store.tree(role));
        self.history
            .iter()
            .map(|entry| {
                entry
                    .choice_label()
                    .or_else(|| tree.and_then(|t| t.get(entry.node_id())).map(|n| n.title.as_str()))
                    .unwrap_or("Start")
            })
            .collect()
    }
}
