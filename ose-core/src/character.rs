//! Character data model: abilities, classes, and the generated sheet.

use crate::rules;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Abilities
// ============================================================================

/// The six OSE abilities, in canonical roll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Intelligence,
    Wisdom,
    Dexterity,
    Constitution,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Charisma => "Charisma",
        }
    }

    /// Field name used in character records and the backend API.
    pub fn field_name(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Charisma => "charisma",
        }
    }

    /// All abilities in roll order: STR, INT, WIS, DEX, CON, CHA.
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, int: u8, wis: u8, dex: u8, con: u8, cha: u8) -> Self {
        Self {
            strength: str,
            intelligence: int,
            wisdom: wis,
            dexterity: dex,
            constitution: con,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// OSE modifier for the given ability (-3..=+3).
    pub fn modifier(&self, ability: Ability) -> i8 {
        rules::ability_modifier(self.get(ability) as i32)
    }

    /// First ability, in roll order, whose score lies outside 3..=18.
    pub fn out_of_range(&self) -> Option<Ability> {
        Ability::all()
            .into_iter()
            .find(|&ability| !rules::is_valid_ability_score(self.get(ability) as i32))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Classes
// ============================================================================

/// Error returned when a class label matches none of the seven OSE classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown character class: {0}")]
pub struct UnknownClass(pub String);

/// The seven OSE classes.
///
/// Serialized with the backend's French labels (`guerrier`, `clerc`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    #[serde(rename = "guerrier")]
    Warrior,
    #[serde(rename = "clerc")]
    Cleric,
    #[serde(rename = "magicien")]
    Wizard,
    #[serde(rename = "voleur")]
    Thief,
    #[serde(rename = "nain")]
    Dwarf,
    #[serde(rename = "elfe")]
    Elf,
    #[serde(rename = "halfelin")]
    Halfling,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 7] {
        [
            CharacterClass::Warrior,
            CharacterClass::Cleric,
            CharacterClass::Wizard,
            CharacterClass::Thief,
            CharacterClass::Dwarf,
            CharacterClass::Elf,
            CharacterClass::Halfling,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Thief => "Thief",
            CharacterClass::Dwarf => "Dwarf",
            CharacterClass::Elf => "Elf",
            CharacterClass::Halfling => "Halfling",
        }
    }

    /// Lowercase French label, as stored by the backend.
    pub fn french_label(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "guerrier",
            CharacterClass::Cleric => "clerc",
            CharacterClass::Wizard => "magicien",
            CharacterClass::Thief => "voleur",
            CharacterClass::Dwarf => "nain",
            CharacterClass::Elf => "elfe",
            CharacterClass::Halfling => "halfelin",
        }
    }

    /// Whether the class draws a starting spell at level 1.
    pub fn is_spellcaster_at_level_1(&self) -> bool {
        !self.data().spell_pool.is_empty()
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = UnknownClass;

    /// Accepts English or French labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        CharacterClass::all()
            .into_iter()
            .find(|class| label == class.french_label() || label == class.name().to_lowercase())
            .ok_or_else(|| UnknownClass(s.to_string()))
    }
}

// ============================================================================
// Generated character
// ============================================================================

/// A freshly generated level-1 character sheet.
///
/// Serializes to the backend's flat field layout: ability scores sit at the
/// top level next to `max_hp`, `armor_class`, and so on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCharacter {
    pub name: String,
    pub character_class: CharacterClass,
    pub level: u8,
    pub experience: u32,
    #[serde(flatten)]
    pub abilities: AbilityScores,
    pub max_hp: i32,
    pub current_hp: i32,
    pub armor_class: i32,
    pub equipment: Vec<String>,
    pub inventory: Vec<String>,
    pub gold: u32,
    pub skills: Vec<String>,
    pub spells: Vec<String>,
    pub background: String,
    pub appearance: String,
    pub is_alive: bool,
}

impl GeneratedCharacter {
    pub fn modifier(&self, ability: Ability) -> i8 {
        self.abilities.modifier(ability)
    }
}
