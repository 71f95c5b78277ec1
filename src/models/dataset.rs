use serde::{Deserialize, Serialize};

use super::{Person, Union};

/// Normaliserad datamängd, redo att indexeras
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub people: Vec<Person>,
    pub unions: Vec<Union>,
    /// Personen som representerar användaren själv
    #[serde(rename = "selfId", default)]
    pub self_id: Option<String>,
    /// Antal personposter utan id som hoppades över
    #[serde(skip)]
    pub skipped_people: usize,
}

impl Dataset {
    pub fn new(people: Vec<Person>, unions: Vec<Union>) -> Self {
        Self {
            people,
            unions,
            self_id: None,
            skipped_people: 0,
        }
    }

    pub fn with_self_id(mut self, id: impl Into<String>) -> Self {
        self.self_id = Some(id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
