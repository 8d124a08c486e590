//! Plain-text character sheet.

use ose_core::progression::{self, xp_for_level};
use ose_core::{Ability, CharacterClass, GeneratedCharacter};
use std::fmt::Write;

fn signed(modifier: i8) -> String {
    if modifier >= 0 {
        format!("+{modifier}")
    } else {
        modifier.to_string()
    }
}

pub fn render(character: &GeneratedCharacter) -> String {
    let mut out = String::new();
    let class = character.character_class;

    let _ = writeln!(out, "{} ({}, level {})", character.name, class, character.level);
    let _ = writeln!(out, "{}", "=".repeat(40));

    for ability in Ability::all() {
        let score = character.abilities.get(ability);
        let _ = writeln!(
            out,
            "  {:<4}{:>3}  ({})",
            ability.abbreviation(),
            score,
            signed(character.modifier(ability))
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "HP {}/{}   AC {}   Gold {}",
        character.current_hp, character.max_hp, character.armor_class, character.gold
    );
    let _ = writeln!(
        out,
        "THAC0 {}   XP {}{}",
        progression::thac0(class, character.level),
        character.experience,
        next_level(character)
    );
    if let Some(saves) = progression::saving_throws(class, character.level) {
        let _ = writeln!(out, "Saves {saves}");
    }

    write_list(&mut out, "Equipment", &character.equipment);
    write_list(&mut out, "Skills", &character.skills);
    if !character.spells.is_empty() {
        write_list(&mut out, "Spells", &character.spells);
    }

    out
}

/// ` (next level at N)`, or nothing at the class maximum.
fn next_level(character: &GeneratedCharacter) -> String {
    let class = character.character_class;
    if character.level >= class.data().max_level {
        return String::new();
    }
    match xp_for_level(character.level.saturating_add(1)) {
        Some(xp) => format!(" (next level at {xp})"),
        None => String::new(),
    }
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

/// One line per class: name, backend label, hit die, prime requisite, level cap.
pub fn render_classes() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}{:<10}{:<6}{:<14}{:<6}{}",
        "CLASS", "LABEL", "HD", "PRIME", "MAX", "LEVEL-1 SPELLS"
    );
    for class in CharacterClass::all() {
        let data = class.data();
        let _ = writeln!(
            out,
            "{:<10}{:<10}{:<6}{:<14}{:<6}{}",
            class.name(),
            class.french_label(),
            data.hit_die.to_string(),
            data.prime_requisite.name(),
            data.max_level,
            data.spell_pool.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ose_core::testing::ScriptedRoller;

    #[test]
    fn test_render_sheet() {
        let mut roller = ScriptedRoller::new([3; 18]);
        roller.push([4, 5, 1, 1, 1]);
        let wizard =
            ose_core::generate_with(&mut roller, "Merlin", CharacterClass::Wizard).unwrap();
        let sheet = render(&wizard);

        assert!(sheet.starts_with("Merlin (Wizard, level 1)"));
        assert!(sheet.contains("STR   9  (+0)"));
        assert!(sheet.contains("HP 4/4   AC 10   Gold 30"));
        assert!(sheet.contains("THAC0 19   XP 0 (next level at 2000)\n"));
        assert!(sheet.contains("Saves D13 W14 P13 B16 S15\n"));
        assert!(sheet.contains("  - Grimoire"));
        assert!(sheet.contains("Spells:\n  - Projectile magique"));
    }

    #[test]
    fn test_render_sheet_at_class_maximum() {
        let mut roller = ScriptedRoller::new([3; 18]);
        roller.push([4, 1, 1, 1]);
        let mut halfling =
            ose_core::generate_with(&mut roller, "Bilbo", CharacterClass::Halfling).unwrap();
        halfling.level = 8;
        halfling.experience = 120_000;
        let sheet = render(&halfling);

        assert!(sheet.contains("THAC0 14   XP 120000\n"));
        assert!(sheet.contains("Saves D4 W5 P6 B7 S8\n"));
    }

    #[test]
    fn test_render_classes() {
        let table = render_classes();
        assert_eq!(table.lines().count(), 8);
        assert!(table.contains("Dwarf"));
        assert!(table.contains("halfelin"));
    }
}
