//! Plain-text rendering for menu and command output
//!
//! Pure functions returning `String` so they can be tested without a TTY.

use socialctl_core::{DedupeReport, Person, Statistics};

/// One person as an indented block, numbered from 1.
pub fn format_person(index: usize, person: &Person) -> String {
    let mut out = format!("{}. {} (ID: {})\n", index + 1, person.name, person.id);
    out.push_str(&format!(
        "   City: {}\n",
        person.city.as_deref().unwrap_or("-")
    ));
    if let Some(age) = person.age {
        out.push_str(&format!("   Age: {}\n", age));
    }
    if let Some(hobby) = &person.hobby {
        out.push_str(&format!("   Hobby: {}\n", hobby));
    }
    out
}

/// A titled list of people, or a notice when it is empty.
pub fn format_people(title: &str, people: &[Person]) -> String {
    if people.is_empty() {
        return format!("⚠️  {}: nobody found\n", title);
    }
    let mut out = format!("\n📋 {} ({}):\n", title, people.len());
    for (i, person) in people.iter().enumerate() {
        out.push_str(&format_person(i, person));
    }
    out
}

pub fn format_statistics(stats: &Statistics) -> String {
    let top = stats
        .most_connected
        .as_ref()
        .map(|p| format!("{} ({} friends)", p.name, p.friend_count))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "\n📊 Network statistics\n\
         👥 People: {}\n\
         🤝 Friendship edges: {}\n\
         🏙️  Distinct cities: {}\n\
         🎯 Distinct hobbies: {}\n\
         📈 Average friends per person: {:.1}\n\
         👑 Most connected: {}\n",
        stats.total_people,
        stats.total_relationships,
        stats.unique_cities,
        stats.unique_hobbies,
        stats.average_friends,
        top
    )
}

pub fn format_dedupe(report: &DedupeReport) -> String {
    if report.is_clean() {
        return "✓ No duplicate names found\n".to_string();
    }

    let verb = if report.dry_run { "Would remove" } else { "Removed" };
    let mut out = String::new();
    for group in &report.groups {
        out.push_str(&format!(
            "'{}': keeping {} (created {})\n",
            group.name,
            group.kept.id,
            group.kept.created_at.format("%Y-%m-%d %H:%M:%S")
        ));
        for removed in &group.removed {
            out.push_str(&format!("   - {} {}\n", verb.to_lowercase(), removed.id));
        }
    }
    out.push_str(&format!(
        "{} {} duplicate record(s) across {} name(s)\n",
        verb,
        report.removed_count(),
        report.groups.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use socialctl_core::{ConnectedPerson, DuplicateGroup, PersonId};

    fn person(id: &str, name: &str) -> Person {
        Person {
            id: PersonId::new(id).unwrap(),
            name: name.to_string(),
            city: None,
            age: None,
            hobby: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn person_block_skips_missing_optionals() {
        let mut p = person("a1", "Alice");
        p.city = Some("Lima".to_string());
        let text = format_person(0, &p);
        assert_eq!(text, "1. Alice (ID: a1)\n   City: Lima\n");

        p.age = Some(31);
        p.hobby = Some("chess".to_string());
        let text = format_person(2, &p);
        assert!(text.starts_with("3. Alice"));
        assert!(text.contains("   Age: 31\n"));
        assert!(text.contains("   Hobby: chess\n"));
    }

    #[test]
    fn empty_list_notice() {
        let text = format_people("Friends", &[]);
        assert!(text.contains("nobody found"));
    }

    #[test]
    fn list_is_counted_and_numbered() {
        let text = format_people("People", &[person("a", "Alice"), person("b", "Bob")]);
        assert!(text.contains("People (2)"));
        assert!(text.contains("1. Alice"));
        assert!(text.contains("2. Bob"));
    }

    #[test]
    fn statistics_render_average_and_top() {
        let stats = Statistics {
            total_people: 4,
            total_relationships: 4,
            unique_cities: 2,
            unique_hobbies: 2,
            average_friends: 1.0,
            most_connected: Some(ConnectedPerson {
                name: "Alice".to_string(),
                friend_count: 2,
            }),
        };
        let text = format_statistics(&stats);
        assert!(text.contains("Average friends per person: 1.0"));
        assert!(text.contains("Most connected: Alice (2 friends)"));

        let text = format_statistics(&Statistics::default());
        assert!(text.contains("Most connected: N/A"));
    }

    #[test]
    fn dedupe_report_wording_depends_on_mode() {
        let report = DedupeReport {
            groups: vec![DuplicateGroup {
                name: "alice".to_string(),
                kept: person("old", "Alice"),
                removed: vec![person("new", "alice")],
            }],
            dry_run: true,
        };
        let text = format_dedupe(&report);
        assert!(text.contains("keeping old"));
        assert!(text.contains("would remove new"));
        assert!(text.contains("Would remove 1 duplicate record(s) across 1 name(s)"));

        let clean = DedupeReport {
            groups: vec![],
            dry_run: false,
        };
        assert!(format_dedupe(&clean).contains("No duplicate names"));
    }
}
