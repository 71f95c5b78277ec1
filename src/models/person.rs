use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::date::{calculate_age, parse_date, parse_year};

/// Platshållare när namn saknas i källdata
pub const PLACEHOLDER_NAME: &str = "(Tanpa nama)";

/// Sorteringsnyckel för personer utan tolkningsbart födelseår
pub const NO_YEAR_SENTINEL: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// Tolka ett explicit könsfält. Endast `male`/`female` godtas.
    pub fn from_field(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// En normaliserad person. Skapas vid inläsning och ändras aldrig därefter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    /// Födelsedatum i fritext, behålls även om det inte går att tolka
    pub birth: Option<String>,
    pub death: Option<String>,
    /// Relationsetikett, t.ex. "cucu"
    pub relation: Option<String>,
    pub note: Option<String>,
    pub photo: Option<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: Gender::Unknown,
            birth: None,
            death: None,
            relation: None,
            note: None,
            photo: None,
        }
    }

    pub fn with_birth(mut self, birth: impl Into<String>) -> Self {
        self.birth = Some(birth.into());
        self
    }

    pub fn with_death(mut self, death: impl Into<String>) -> Self {
        self.death = Some(death.into());
        self
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth.as_deref().and_then(parse_date)
    }

    pub fn death_date(&self) -> Option<NaiveDate> {
        self.death.as_deref().and_then(parse_date)
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth.as_deref().and_then(parse_year)
    }

    /// Sorteringsnyckel: saknat eller otolkbart år sorteras sist
    pub fn birth_year_key(&self) -> i32 {
        self.birth_year().unwrap_or(NO_YEAR_SENTINEL)
    }

    /// En person utan dödsdatum räknas som levande
    pub fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Ålder vid död, annars vid `today`. `None` om något datum inte går att tolka.
    pub fn age(&self, today: NaiveDate) -> Option<i32> {
        let birth = self.birth_date()?;
        let end = match &self.death {
            Some(_) => self.death_date()?,
            None => today,
        };

        let age = calculate_age(birth, end);
        if !(0..=150).contains(&age) {
            return None;
        }
        Some(age)
    }

    /// Levnadsår för visning, t.ex. "1920-1980" eller "1950-"
    pub fn years_display(&self) -> String {
        match (self.birth_year(), self.death_year()) {
            (Some(b), Some(d)) => format!("{}-{}", b, d),
            (Some(b), None) => format!("{}-", b),
            (None, Some(d)) => format!("-{}", d),
            (None, None) => String::new(),
        }
    }

    fn death_year(&self) -> Option<i32> {
        self.death.as_deref().and_then(parse_year)
    }
}
