//! Testing utilities for character generation.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedRoller` for replaying exact die faces
//! - Assertion helpers for verifying generated characters

use crate::character::{Ability, GeneratedCharacter};
use crate::dice::DiceRoller;
use crate::rules;
use std::collections::VecDeque;

/// A roller that returns scripted faces in order.
///
/// Use this for golden tests where every die must be pinned.
///
/// # Panics
///
/// `roll_die` panics when the script is exhausted or when the next face
/// does not fit on the die being rolled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: VecDeque<u32>,
    consumed: usize,
}

impl ScriptedRoller {
    /// Create a roller that will return `faces` in order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Append more faces to the script.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }

    /// Number of faces handed out so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn is_exhausted(&self) -> bool {
        self.faces.is_empty()
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = self.faces.pop_front().unwrap_or_else(|| {
            panic!(
                "scripted roller exhausted after {} faces (asked for a d{sides})",
                self.consumed
            )
        });
        assert!(
            (1..=sides).contains(&face),
            "scripted face {face} does not fit a d{sides} (roll #{})",
            self.consumed + 1
        );
        self.consumed += 1;
        face
    }
}

/// Assert the invariants every freshly generated character must hold.
pub fn assert_generation_invariants(character: &GeneratedCharacter) {
    for ability in Ability::all() {
        let score = character.abilities.get(ability) as i32;
        assert!(
            rules::is_valid_ability_score(score),
            "{} score {score} out of range for {}",
            ability.name(),
            character.name
        );
    }

    assert!(character.max_hp >= 1, "max_hp {} below 1", character.max_hp);
    assert_eq!(character.current_hp, character.max_hp);
    assert_eq!(
        character.armor_class,
        rules::armor_class(character.abilities.dexterity)
    );
    assert_eq!(character.level, 1);
    assert_eq!(character.experience, 0);
    assert!(character.inventory.is_empty());
    assert!(character.background.is_empty());
    assert!(character.appearance.is_empty());
    assert!(character.is_alive);

    let data = character.character_class.data();
    assert_eq!(character.equipment, data.starting_equipment());
    assert_eq!(character.skills, data.starting_skills());
    assert!(character.spells.len() <= 1);
    for spell in &character.spells {
        assert!(
            data.spell_pool.contains(&spell.as_str()),
            "{spell} is not in the {} spell pool",
            character.character_class
        );
    }
    assert!(
        (30..=180).contains(&character.gold) && character.gold % 10 == 0,
        "gold {} is not 3d6 x 10",
        character.gold
    );
}
