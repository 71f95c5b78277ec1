//! Normalisering av rå person- och relationsposter
//!
//! Källdata är otypad JSON. Varje post tvättas var för sig och en trasig post
//! stoppar aldrig inläsningen; bara fel på toppnivå (saknade listor) är fatala.

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{Dataset, Gender, Person, TreeSettings, Union, PLACEHOLDER_NAME};
use crate::utils::{AppError, AppResult};

/// Strategi för att gissa kön när explicit uppgift saknas.
///
/// Resultatet är en gissning och används aldrig för att skriva över ett
/// explicit könsfält.
pub trait GenderInference {
    fn infer(&self, name: &str, relation: Option<&str>) -> Option<Gender>;
}

/// Känner igen hedersinfix i namn, t.ex. "Ahmad bin Ali" / "Siti binti Ali"
#[derive(Debug, Clone)]
pub struct HonorificInfix {
    male: Vec<String>,
    female: Vec<String>,
}

impl HonorificInfix {
    pub fn new(male: Vec<String>, female: Vec<String>) -> Self {
        let clean = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            male: clean(male),
            female: clean(female),
        }
    }

    fn matches(text: &str, infixes: &[String]) -> bool {
        let text = text.to_lowercase();
        infixes
            .iter()
            .any(|infix| text.contains(&format!(" {} ", infix)))
    }

    fn infer_text(&self, text: &str) -> Option<Gender> {
        if Self::matches(text, &self.male) {
            Some(Gender::Male)
        } else if Self::matches(text, &self.female) {
            Some(Gender::Female)
        } else {
            None
        }
    }
}

impl Default for HonorificInfix {
    fn default() -> Self {
        Self::new(vec!["bin".into()], vec!["binti".into()])
    }
}

impl GenderInference for HonorificInfix {
    fn infer(&self, name: &str, relation: Option<&str>) -> Option<Gender> {
        self.infer_text(name)
            .or_else(|| relation.and_then(|r| self.infer_text(r)))
    }
}

/// Gissar aldrig
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInference;

impl GenderInference for NoInference {
    fn infer(&self, _name: &str, _relation: Option<&str>) -> Option<Gender> {
        None
    }
}

/// Tvättar rådata till [`Dataset`]
pub struct Normalizer {
    inference: Box<dyn GenderInference>,
    placeholder_name: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Box::new(HonorificInfix::default()))
    }
}

impl Normalizer {
    pub fn new(inference: Box<dyn GenderInference>) -> Self {
        Self {
            inference,
            placeholder_name: PLACEHOLDER_NAME.to_string(),
        }
    }

    /// Normaliserare enligt användarens inställningar
    pub fn from_settings(settings: &TreeSettings) -> Self {
        let inference: Box<dyn GenderInference> = if settings.infer_gender {
            Box::new(HonorificInfix::new(
                settings.male_infixes.clone(),
                settings.female_infixes.clone(),
            ))
        } else {
            Box::new(NoInference)
        };
        Self::new(inference).with_placeholder_name(settings.placeholder_name.clone())
    }

    pub fn with_placeholder_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_name = name.into();
        self
    }

    /// Parsa och normalisera en JSON-sträng
    pub fn load_str(&self, json: &str) -> AppResult<Dataset> {
        let raw: Value = serde_json::from_str(json)?;
        self.normalize(&raw)
    }

    /// Normalisera ett redan parsat JSON-dokument.
    ///
    /// Kräver `people[]` och `unions[]` på toppnivå; allt annat tolereras.
    pub fn normalize(&self, raw: &Value) -> AppResult<Dataset> {
        let people = raw
            .get("people")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::schema("förväntade people[] och unions[]"))?;
        let unions = raw
            .get("unions")
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::schema("förväntade people[] och unions[]"))?;

        let mut dataset = Dataset::default();
        for (pos, record) in people.iter().enumerate() {
            match self.normalize_person(record) {
                Some(person) => dataset.people.push(person),
                None => {
                    warn!("Personpost {} saknar id och hoppas över", pos);
                    dataset.skipped_people += 1;
                }
            }
        }

        dataset.unions = unions.iter().map(normalize_union).collect();
        dataset.self_id = raw.get("selfId").and_then(sanitize);

        debug!(
            "Normaliserade {} personer och {} relationer",
            dataset.people.len(),
            dataset.unions.len()
        );

        Ok(dataset)
    }

    /// `None` när posten saknar id
    pub fn normalize_person(&self, record: &Value) -> Option<Person> {
        let field = |key: &str| record.get(key).and_then(sanitize);

        let id = field("id")?;
        let name = field("name").unwrap_or_else(|| self.placeholder_name.clone());
        let relation = field("relation");

        let gender = field("gender")
            .and_then(|g| Gender::from_field(&g))
            .or_else(|| self.inference.infer(&name, relation.as_deref()))
            .unwrap_or_default();

        Some(Person {
            id,
            name,
            gender,
            birth: field("birth"),
            death: field("death"),
            relation,
            note: field("note"),
            photo: field("photo"),
        })
    }
}

/// Normalisera en relation. Misslyckas aldrig; okänd form ger en tom relation.
pub fn normalize_union(record: &Value) -> Union {
    let field = |key: &str| record.get(key).and_then(sanitize);

    let mut children: Vec<String> = Vec::new();
    if let Some(list) = record.get("children").and_then(Value::as_array) {
        for child in list.iter().filter_map(sanitize) {
            if !children.contains(&child) {
                children.push(child);
            }
        }
    }

    Union {
        id: field("id"),
        partner1: field("partner1"),
        partner2: field("partner2"),
        children,
    }
}

/// Trimma och gör tomma strängar till `None`. Tal och booleaner blir text.
fn sanitize(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_settings() {
        let settings = TreeSettings {
            infer_gender: false,
            placeholder_name: "(okänd)".into(),
            ..Default::default()
        };
        let person = Normalizer::from_settings(&settings)
            .normalize_person(&json!({ "id": "1", "name": "Ali bin Abu" }))
            .unwrap();
        assert_eq!(person.gender, Gender::Unknown);

        let unnamed = Normalizer::from_settings(&settings)
            .normalize_person(&json!({ "id": "2" }))
            .unwrap();
        assert_eq!(unnamed.name, "(okänd)");

        let settings = TreeSettings {
            male_infixes: vec!["anak lelaki".into()],
            ..Default::default()
        };
        let person = Normalizer::from_settings(&settings)
            .normalize_person(&json!({ "id": "3", "name": "Ali anak lelaki Abu" }))
            .unwrap();
        assert_eq!(person.gender, Gender::Male);
    }

    #[test]
    fn test_missing_lists_is_schema_error() {
        let normalizer = Normalizer::default();

        let err = normalizer.normalize(&json!({ "people": [] })).unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        let err = normalizer
            .normalize(&json!({ "people": {}, "unions": [] }))
            .unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        assert!(matches!(
            normalizer.load_str("not json").unwrap_err(),
            AppError::Json(_)
        ));
    }

    #[test]
    fn test_normalize_person_fields() {
        let normalizer = Normalizer::default();
        let data = normalizer
            .normalize(&json!({
                "selfId": " p1 ",
                "people": [
                    {
                        "id": " p1 ",
                        "name": "  Ali  ",
                        "gender": "MALE",
                        "birth": "",
                        "note": "  "
                    },
                    { "id": 7, "name": null, "gender": "other", "photo": "img/7.jpg" },
                    { "name": "Utan id" },
                    "inte ett objekt"
                ],
                "unions": []
            }))
            .unwrap();

        assert_eq!(data.people.len(), 2);
        assert_eq!(data.skipped_people, 2);
        assert_eq!(data.self_id.as_deref(), Some("p1"));

        let ali = &data.people[0];
        assert_eq!(ali.id, "p1");
        assert_eq!(ali.name, "Ali");
        assert_eq!(ali.gender, Gender::Male);
        assert_eq!(ali.birth, None);
        assert_eq!(ali.note, None);

        let seven = &data.people[1];
        assert_eq!(seven.id, "7");
        assert_eq!(seven.name, PLACEHOLDER_NAME);
        assert_eq!(seven.gender, Gender::Unknown);
        assert_eq!(seven.photo.as_deref(), Some("img/7.jpg"));
    }

    #[test]
    fn test_gender_inference() {
        let normalizer = Normalizer::default();
        let person = |v: Value| normalizer.normalize_person(&v).unwrap();

        assert_eq!(person(json!({ "id": "a", "name": "Ahmad Bin Ali" })).gender, Gender::Male);
        assert_eq!(person(json!({ "id": "b", "name": "Siti binti Ali" })).gender, Gender::Female);
        assert_eq!(person(json!({ "id": "c", "name": "Binti" })).gender, Gender::Unknown);

        // Explicit uppgift vinner över gissningen
        assert_eq!(
            person(json!({ "id": "d", "name": "Siti binti Ali", "gender": "male" })).gender,
            Gender::Male
        );
    }

    #[test]
    fn test_pluggable_inference() {
        let normalizer = Normalizer::new(Box::new(NoInference));
        let p = normalizer
            .normalize_person(&json!({ "id": "a", "name": "Ahmad bin Ali" }))
            .unwrap();
        assert_eq!(p.gender, Gender::Unknown);

        let swedish = HonorificInfix::new(vec!["son".into()], vec!["dotter".into()]);
        assert_eq!(swedish.infer("Erik son av Anders", None), Some(Gender::Male));
        assert_eq!(swedish.infer("Okänd", Some("dotter av X")), None);
        assert_eq!(swedish.infer("Okänd", Some("äldsta dotter av X")), Some(Gender::Female));
    }

    #[test]
    fn test_placeholder_name_override() {
        let normalizer = Normalizer::default().with_placeholder_name("Okänd");
        let p = normalizer.normalize_person(&json!({ "id": "x", "name": " " })).unwrap();
        assert_eq!(p.name, "Okänd");
    }

    #[test]
    fn test_normalize_union() {
        let u = normalize_union(&json!({
            "id": "u1",
            "partner1": " a ",
            "partner2": "",
            "children": ["c", "", null, "d", "c", 5]
        }));
        assert_eq!(u.id.as_deref(), Some("u1"));
        assert_eq!(u.partner1.as_deref(), Some("a"));
        assert_eq!(u.partner2, None);
        assert_eq!(u.children, vec!["c", "d", "5"]);

        let empty = normalize_union(&json!({ "id": "u2", "children": "c" }));
        assert!(empty.children.is_empty());
    }
}
