use anyhow::{Context, Result};
use serde::Deserialize;

const REFERENCE: &str = include_str!("../../data/reference.json");

/// Rules summary for a condition a grapple can inflict.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEffect {
    pub key: String,
    pub name: String,
    pub effects: Vec<String>,
}

/// A monster ability or feat that changes how grappling works.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecialAbility {
    pub key: String,
    pub name: String,
    pub description: String,
    pub effects: Vec<String>,
}

/// The two static tables behind the quick reference panel. Not part of traversal.
#[derive(Debug, Clone, Deserialize)]
pub struct QuickReference {
    pub conditions: Vec<ConditionEffect>,
    pub abilities: Vec<SpecialAbility>,
}

impl QuickReference {
    pub fn embedded() -> Result<Self> {
        serde_json::from_str(REFERENCE).context("failed to parse the quick reference tables")
    }

    pub fn condition(&self, key: &str) -> Option<&ConditionEffect> {
        self.conditions.iter().find(|c| c.key == key)
    }

    pub fn ability(&self, key: &str) -> Option<&SpecialAbility> {
        self.abilities.iter().find(|a| a.key == key)
    }
}
