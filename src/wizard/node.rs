use serde::Deserialize;

/// A single screen in a role's decision tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecisionNode {
    /// Unique identifier within the tree (e.g. "grappler-start", "pinned-verbal").
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    pub body: String,
    /// Preformatted rules text shown in a boxed panel.
    #[serde(default)]
    pub mechanics: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    /// Outgoing edges. Empty means the node is a dead end.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl DecisionNode {
    pub fn is_result(&self) -> bool {
        self.kind == NodeKind::Result
    }

    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Asks the player to pick one of several choices.
    Question,
    /// Explains a rule, usually with a single "continue" choice.
    Info,
    /// Terminal outcome. Offers back and start over only.
    Result,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Question => write!(f, "question"),
            NodeKind::Info => write!(f, "info"),
            NodeKind::Result => write!(f, "result"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    /// Unique within the owning node's choice list.
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Id of the next node. `None` leaves the choice unwired.
    #[serde(default)]
    pub destination: Option<String>,
}
