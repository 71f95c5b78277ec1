use serde::{Deserialize, Serialize};

/// Ett partnerskap mellan noll, en eller två personer, med eventuella barn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Union {
    pub id: Option<String>,
    pub partner1: Option<String>,
    pub partner2: Option<String>,
    /// Barn i ursprunglig ordning, utan dubbletter
    pub children: Vec<String>,
}

impl Union {
    pub fn new(
        id: impl Into<String>,
        partner1: Option<&str>,
        partner2: Option<&str>,
        children: &[&str],
    ) -> Self {
        let mut kids: Vec<String> = Vec::with_capacity(children.len());
        for child in children {
            if !child.is_empty() && !kids.iter().any(|k| k == child) {
                kids.push((*child).to_string());
            }
        }

        Self {
            id: Some(id.into()),
            partner1: partner1.map(str::to_string),
            partner2: partner2.map(str::to_string),
            children: kids,
        }
    }

    /// Föräldrar som faktiskt finns angivna (0, 1 eller 2)
    pub fn partners(&self) -> impl Iterator<Item = &str> {
        [self.partner1.as_deref(), self.partner2.as_deref()]
            .into_iter()
            .flatten()
    }

    /// Etikett för loggning
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("?")
    }
}
