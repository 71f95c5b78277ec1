//! Statistik, namnsökning och visningstext för personer

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Gender, Person};
use crate::services::index::TreeIndex;
use crate::utils::date::{calculate_age, next_birthday};

/// Max antal träffar vid namnsökning
pub const SEARCH_LIMIT: usize = 8;

/// Relationsord som räknas som standard
pub const DEFAULT_RELATION_KEYWORDS: [&str; 2] = ["cucu", "cicit"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingBirthday {
    pub person_id: String,
    pub name: String,
    pub date: NaiveDate,
    /// Åldern personen fyller
    pub turns: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub people: usize,
    pub unions: usize,
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
    pub relation_counts: IndexMap<String, usize>,
    pub upcoming_birthday: Option<UpcomingBirthday>,
}

pub struct InsightsService<'a> {
    index: &'a TreeIndex,
    relation_keywords: Vec<String>,
}

impl<'a> InsightsService<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self {
            index,
            relation_keywords: DEFAULT_RELATION_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }

    pub fn with_relation_keywords(mut self, keywords: Vec<String>) -> Self {
        self.relation_keywords = keywords;
        self
    }

    pub fn stats(&self, today: NaiveDate) -> TreeStats {
        let mut stats = TreeStats {
            people: self.index.len(),
            unions: self.index.unions().len(),
            relation_counts: self
                .relation_keywords
                .iter()
                .map(|k| (k.clone(), 0))
                .collect(),
            ..Default::default()
        };

        for person in self.index.people() {
            match person.gender {
                Gender::Male => stats.male += 1,
                Gender::Female => stats.female += 1,
                Gender::Unknown => stats.unknown += 1,
            }

            let relation = person.relation.as_deref().unwrap_or("").to_lowercase();
            for (keyword, count) in stats.relation_counts.iter_mut() {
                if relation.contains(&keyword.to_lowercase()) {
                    *count += 1;
                }
            }
        }

        stats.upcoming_birthday = self.upcoming_birthday(today);
        stats
    }

    /// Närmaste födelsedag på eller efter `today`. Vid lika datum vinner
    /// personen som kommer först i datamängden.
    pub fn upcoming_birthday(&self, today: NaiveDate) -> Option<UpcomingBirthday> {
        let mut best: Option<UpcomingBirthday> = None;

        for person in self.index.people() {
            let Some(birth) = person.birth_date() else {
                continue;
            };
            let Some(date) = next_birthday(birth, today) else {
                continue;
            };
            if best.as_ref().is_some_and(|b| b.date <= date) {
                continue;
            }
            best = Some(UpcomingBirthday {
                person_id: person.id.clone(),
                name: person.name.clone(),
                date,
                turns: calculate_age(birth, date),
            });
        }

        best
    }

    /// Skiftlägesokänslig delsträngssökning på namn, i datamängdens ordning
    pub fn search(&self, query: &str, limit: usize) -> Vec<&'a Person> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.index
            .people()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .take(limit)
            .collect()
    }

    /// Födelseår och `@id` när namnet inte är unikt (eller i felsökningsläge)
    pub fn meta_text(&self, person: &Person, debug: bool) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(year) = person.birth_year() {
            parts.push(year.to_string());
        }
        if debug || self.index.name_count(&person.name) > 1 {
            parts.push(format!("@{}", person.id));
        }
        parts.join(" · ")
    }
}
