//! Gemensam testdata

use crate::models::{Dataset, Gender, Person, Union};
use crate::services::index::TreeIndex;

/// A+B → C, C (ensam) → D
pub fn abcd() -> TreeIndex {
    let people = vec![
        Person::new("A", "A"),
        Person::new("B", "B"),
        Person::new("C", "C"),
        Person::new("D", "D"),
    ];
    let unions = vec![
        Union::new("u1", Some("A"), Some("B"), &["C"]),
        Union::new("u2", Some("C"), None, &["D"]),
    ];
    TreeIndex::build(Dataset::new(people, unions))
}

/// Fyra generationer:
///
/// ```text
/// gp1 + gp2 ─┬─ f1 + m1 ─┬─ s1 + w1 ─┬─ g1
///            │           │           └─ g2
///            │           └─ s2 (död)
///            └─ a1 ───────── n1
/// ```
pub fn family() -> TreeIndex {
    let mut people = vec![
        Person::new("gp1", "Ahmad bin Yusof")
            .with_gender(Gender::Male)
            .with_birth("1920-03-01")
            .with_death("1990-07-12"),
        Person::new("gp2", "Fatimah binti Abu")
            .with_gender(Gender::Female)
            .with_birth("1925")
            .with_death("2001"),
        Person::new("f1", "Ali bin Ahmad")
            .with_gender(Gender::Male)
            .with_birth("1950-05-20")
            .with_relation("bapa"),
        Person::new("a1", "Aminah binti Ahmad")
            .with_gender(Gender::Female)
            .with_birth("1948-11-02")
            .with_relation("ibu saudara"),
        Person::new("m1", "Siti binti Hassan")
            .with_gender(Gender::Female)
            .with_birth("1955-01-09")
            .with_relation("ibu"),
        Person::new("s1", "Hakim bin Ali")
            .with_gender(Gender::Male)
            .with_birth("1980-08-30")
            .with_relation("abang"),
        Person::new("s2", "Nur binti Ali")
            .with_gender(Gender::Female)
            .with_birth("1983-02-14")
            .with_death("2015-06-01")
            .with_relation("kakak"),
        Person::new("w1", "Lina")
            .with_birth("1982")
            .with_relation("kakak ipar"),
        Person::new("g1", "Adam bin Hakim")
            .with_gender(Gender::Male)
            .with_birth("2010-04-04")
            .with_relation("cucu"),
        Person::new("g2", "Hawa binti Hakim")
            .with_gender(Gender::Female)
            .with_birth("2012-09-19")
            .with_relation("cucu"),
        Person::new("n1", "Zaid")
            .with_birth("tidak pasti")
            .with_relation("sepupu"),
    ];

    people[5].photo = Some("foto/hakim.jpg".into());
    people[9].note = Some("Lahir di Ipoh".into());

    let unions = vec![
        Union::new("u1", Some("gp1"), Some("gp2"), &["f1", "a1"]),
        Union::new("u2", Some("f1"), Some("m1"), &["s1", "s2"]),
        Union::new("u3", Some("s1"), Some("w1"), &["g1", "g2"]),
        Union::new("u4", Some("a1"), None, &["n1"]),
    ];

    TreeIndex::build(Dataset::new(people, unions).with_self_id("f1"))
}
