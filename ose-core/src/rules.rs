//! OSE derived-stat rules: ability modifiers, armor class, and hit points.

use crate::character::CharacterClass;
use crate::character_builder::GenerationError;
use crate::dice::DiceRoller;

/// Lowest legal ability score.
pub const ABILITY_MIN: i32 = 3;

/// Highest legal ability score.
pub const ABILITY_MAX: i32 = 18;

/// Armor class of an unarmored character with no dexterity modifier.
pub const BASE_ARMOR_CLASS: i32 = 10;

/// Upper score bound (inclusive) of each modifier bracket.
const MODIFIER_BRACKETS: [(i32, i8); 6] = [(3, -3), (5, -2), (8, -1), (12, 0), (15, 1), (17, 2)];

/// Modifier for an ability score.
///
/// | score | 3  | 4-5 | 6-8 | 9-12 | 13-15 | 16-17 | 18 |
/// |-------|----|-----|-----|------|-------|-------|----|
/// | mod   | -3 | -2  | -1  | 0    | +1    | +2    | +3 |
///
/// Total over all integers: anything below 3 maps to -3, anything above 17
/// to +3.
pub fn ability_modifier(score: i32) -> i8 {
    MODIFIER_BRACKETS
        .iter()
        .find(|(upper, _)| score <= *upper)
        .map(|&(_, modifier)| modifier)
        .unwrap_or(3)
}

pub fn is_valid_ability_score(score: i32) -> bool {
    (ABILITY_MIN..=ABILITY_MAX).contains(&score)
}

/// Armor class from dexterity alone: 10 + DEX modifier.
pub fn armor_class(dexterity: u8) -> i32 {
    BASE_ARMOR_CLASS + ability_modifier(dexterity as i32) as i32
}

/// Hit points from a hit-die face and constitution, never below 1.
pub fn hit_points(hit_die_roll: u32, constitution: u8) -> i32 {
    (hit_die_roll as i32 + ability_modifier(constitution as i32) as i32).max(1)
}

/// Hit points gained when a character reaches `new_level`.
///
/// Up to the class's last hit-die level a fresh hit die is rolled; past it
/// only the constitution modifier applies. Either way the gain is at least 1.
pub fn hp_gain_for_level(
    roller: &mut dyn DiceRoller,
    class: CharacterClass,
    new_level: u8,
    constitution: u8,
) -> Result<i32, GenerationError> {
    let data = class.data();
    if new_level < 2 || new_level > data.max_level {
        return Err(GenerationError::LevelOutOfRange {
            class,
            level: new_level,
            max: data.max_level,
        });
    }

    if new_level <= data.last_hit_die_level {
        Ok(hit_points(roller.roll(data.hit_die), constitution))
    } else {
        Ok((ability_modifier(constitution as i32) as i32).max(1))
    }
}
