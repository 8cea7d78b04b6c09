use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub image: String,
    pub description: String,
    pub category: String,
}

impl Product {
    /// Case-insensitive match on name or id.
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.id.to_lowercase().contains(&term)
    }
}
