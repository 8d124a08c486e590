//! OSE class data for character creation.
//!
//! Hit dice, starting equipment, class skills, level-1 spell pools, and
//! level limits for the seven classes. Item, skill, and spell names are the
//! French labels the backend stores.

use crate::character::{Ability, CharacterClass};
use crate::dice::DieType;

/// Equipment every class starts with, ahead of the class-specific kit.
pub const COMMON_EQUIPMENT: [&str; 4] = [
    "Sac à dos",
    "Torche (3)",
    "Silex et amorce",
    "Rations (3 jours)",
];

/// Class-specific data for character creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassData {
    /// Die rolled for hit points at each level up to `last_hit_die_level`.
    pub hit_die: DieType,
    /// Starting kit appended to [`COMMON_EQUIPMENT`].
    pub equipment: &'static [&'static str],
    pub skills: &'static [&'static str],
    /// Level-1 spells a starting character draws one from. Empty for
    /// classes with no spell at level 1, clerics included.
    pub spell_pool: &'static [&'static str],
    /// Ability raised by the prime requisite adjustment.
    pub prime_requisite: Ability,
    pub max_level: u8,
    /// Last level at which a hit die is rolled.
    pub last_hit_die_level: u8,
}

impl ClassData {
    /// Common equipment followed by the class kit.
    pub fn starting_equipment(&self) -> Vec<String> {
        COMMON_EQUIPMENT
            .iter()
            .chain(self.equipment)
            .map(|item| item.to_string())
            .collect()
    }

    pub fn starting_skills(&self) -> Vec<String> {
        self.skills.iter().map(|skill| skill.to_string()).collect()
    }
}

impl CharacterClass {
    /// Get class data for character creation.
    pub fn data(&self) -> ClassData {
        match self {
            CharacterClass::Warrior => ClassData {
                hit_die: DieType::D8,
                equipment: &["Épée longue", "Bouclier", "Cotte de mailles", "Dague"],
                skills: &["Combat à l'épée", "Tactique militaire"],
                spell_pool: &[],
                prime_requisite: Ability::Strength,
                max_level: 14,
                last_hit_die_level: 9,
            },
            CharacterClass::Cleric => ClassData {
                hit_die: DieType::D6,
                equipment: &["Masse", "Bouclier", "Cotte de mailles", "Symbole sacré"],
                skills: &["Connaissance religieuse", "Premiers soins"],
                // Clerics receive no spells until level 2
                spell_pool: &[],
                prime_requisite: Ability::Wisdom,
                max_level: 14,
                last_hit_die_level: 9,
            },
            CharacterClass::Wizard => ClassData {
                hit_die: DieType::D4,
                equipment: &["Dague", "Bâton", "Grimoire", "Composantes de sorts"],
                skills: &[
                    "Connaissance des arcanes",
                    "Identification des objets magiques",
                ],
                spell_pool: &[
                    "Charme-personne",
                    "Détection de la magie",
                    "Lecture de la magie",
                    "Lumière",
                    "Projectile magique",
                    "Protection contre le mal",
                    "Bouclier",
                    "Sommeil",
                ],
                prime_requisite: Ability::Intelligence,
                max_level: 14,
                last_hit_die_level: 9,
            },
            CharacterClass::Thief => ClassData {
                hit_die: DieType::D4,
                equipment: &[
                    "Épée courte",
                    "Armure de cuir",
                    "Outils de crochetage",
                    "Corde (15m)",
                ],
                skills: &[
                    "Crochetage",
                    "Désamorçage de pièges",
                    "Escalade",
                    "Déplacement silencieux",
                    "Pickpocket",
                ],
                spell_pool: &[],
                prime_requisite: Ability::Dexterity,
                max_level: 14,
                last_hit_die_level: 9,
            },
            CharacterClass::Dwarf => ClassData {
                hit_die: DieType::D8,
                equipment: &[
                    "Hache de bataille",
                    "Bouclier",
                    "Cotte de mailles",
                    "Pioche de mineur",
                ],
                skills: &[
                    "Détection des passages secrets",
                    "Évaluation des trésors",
                    "Résistance à la magie",
                ],
                spell_pool: &[],
                prime_requisite: Ability::Strength,
                max_level: 12,
                last_hit_die_level: 8,
            },
            CharacterClass::Elf => ClassData {
                hit_die: DieType::D6,
                equipment: &[
                    "Épée longue",
                    "Arc long",
                    "Flèches (20)",
                    "Cotte de mailles",
                    "Grimoire",
                ],
                skills: &[
                    "Détection des portes secrètes",
                    "Immunité au paralysie des goules",
                    "Vision dans le noir",
                ],
                spell_pool: &[
                    "Charme-personne",
                    "Détection de la magie",
                    "Lumière",
                    "Protection contre le mal",
                    "Sommeil",
                ],
                prime_requisite: Ability::Intelligence,
                max_level: 10,
                last_hit_die_level: 10,
            },
            CharacterClass::Halfling => ClassData {
                hit_die: DieType::D6,
                equipment: &[
                    "Épée courte",
                    "Fronde",
                    "Billes (20)",
                    "Armure de cuir",
                    "Pipe et tabac",
                ],
                skills: &["Discrétion", "Tir précis", "Initiative améliorée"],
                spell_pool: &[],
                prime_requisite: Ability::Dexterity,
                max_level: 8,
                last_hit_die_level: 8,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_dice() {
        assert_eq!(CharacterClass::Warrior.data().hit_die, DieType::D8);
        assert_eq!(CharacterClass::Dwarf.data().hit_die, DieType::D8);
        assert_eq!(CharacterClass::Cleric.data().hit_die, DieType::D6);
        assert_eq!(CharacterClass::Elf.data().hit_die, DieType::D6);
        assert_eq!(CharacterClass::Halfling.data().hit_die, DieType::D6);
        assert_eq!(CharacterClass::Wizard.data().hit_die, DieType::D4);
        assert_eq!(CharacterClass::Thief.data().hit_die, DieType::D4);
    }

    #[test]
    fn test_skill_counts() {
        let counts: Vec<usize> = CharacterClass::all()
            .iter()
            .map(|c| c.data().skills.len())
            .collect();
        // warrior, cleric, wizard, thief, dwarf, elf, halfling
        assert_eq!(counts, vec![2, 2, 2, 5, 3, 3, 3]);
    }

    #[test]
    fn test_spell_pools() {
        assert_eq!(CharacterClass::Wizard.data().spell_pool.len(), 8);
        assert_eq!(CharacterClass::Elf.data().spell_pool.len(), 5);
        assert!(CharacterClass::Cleric.data().spell_pool.is_empty());
        assert!(!CharacterClass::Cleric.is_spellcaster_at_level_1());

        let casters: Vec<CharacterClass> = CharacterClass::all()
            .into_iter()
            .filter(|c| c.is_spellcaster_at_level_1())
            .collect();
        assert_eq!(casters, vec![CharacterClass::Wizard, CharacterClass::Elf]);
    }

    #[test]
    fn test_starting_equipment_prefixes_common_kit() {
        for class in CharacterClass::all() {
            let data = class.data();
            let equipment = data.starting_equipment();
            assert_eq!(equipment.len(), COMMON_EQUIPMENT.len() + data.equipment.len());
            assert_eq!(&equipment[..4], &COMMON_EQUIPMENT);
        }
    }

    #[test]
    fn test_level_limits() {
        assert_eq!(CharacterClass::Dwarf.data().max_level, 12);
        assert_eq!(CharacterClass::Elf.data().max_level, 10);
        assert_eq!(CharacterClass::Halfling.data().max_level, 8);
        for class in CharacterClass::all() {
            let data = class.data();
            assert!(data.last_hit_die_level <= data.max_level);
        }
    }
}
