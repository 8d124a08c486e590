//! Character generation following OSE rules.
//!
//! [`generate`] rolls a complete level-1 character from a name and class.
//! [`CharacterBuilder`] exposes the optional knobs: alternative ability
//! methods, the prime requisite adjustment, and forced ability scores.

use crate::character::{Ability, AbilityScores, CharacterClass, GeneratedCharacter, UnknownClass};
use crate::dice::{DiceRoller, DieType, RngRoller};
use crate::rules;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Method for rolling ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// 3d6 in order
    #[default]
    Classic,
    /// 4d6, drop the lowest die
    Heroic,
    /// 3d6, rerolling any total below 6
    RerollLow,
}

/// Totals below this are rerolled by [`AbilityMethod::RerollLow`].
const REROLL_BELOW: u32 = 6;

impl AbilityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityMethod::Classic => "Classic",
            AbilityMethod::Heroic => "Heroic",
            AbilityMethod::RerollLow => "Reroll Low",
        }
    }

    /// Command-line spelling, accepted back by `FromStr`.
    pub fn flag(&self) -> &'static str {
        match self {
            AbilityMethod::Classic => "classic",
            AbilityMethod::Heroic => "heroic",
            AbilityMethod::RerollLow => "reroll-low",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AbilityMethod::Classic => "Roll 3d6 for each ability, in order",
            AbilityMethod::Heroic => "Roll 4d6 and drop the lowest die, for each ability",
            AbilityMethod::RerollLow => "Roll 3d6 for each ability, rerolling totals below 6",
        }
    }

    pub fn all() -> &'static [AbilityMethod] {
        &[
            AbilityMethod::Classic,
            AbilityMethod::Heroic,
            AbilityMethod::RerollLow,
        ]
    }

    /// Roll a single ability score.
    pub fn roll_score(&self, roller: &mut dyn DiceRoller) -> u8 {
        let total = match self {
            AbilityMethod::Classic => roller.roll_3d6(),
            AbilityMethod::Heroic => {
                let mut rolls = roller.roll_many(4, DieType::D6);
                rolls.sort();
                rolls[1..].iter().sum()
            }
            AbilityMethod::RerollLow => {
                let mut total = roller.roll_3d6();
                while total < REROLL_BELOW {
                    total = roller.roll_3d6();
                }
                total
            }
        };
        total as u8
    }

    /// Roll all six scores in order: STR, INT, WIS, DEX, CON, CHA.
    pub fn roll_scores(&self, roller: &mut dyn DiceRoller) -> AbilityScores {
        let mut scores = AbilityScores::default();
        for ability in Ability::all() {
            scores.set(ability, self.roll_score(roller));
        }
        scores
    }
}

impl fmt::Display for AbilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AbilityMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" | "3d6" => Ok(AbilityMethod::Classic),
            "heroic" | "4d6" | "4d6-drop-lowest" => Ok(AbilityMethod::Heroic),
            "reroll-low" | "reroll_low" | "3d6-reroll-below-6" => Ok(AbilityMethod::RerollLow),
            other => Err(format!("Unknown ability method: {other}")),
        }
    }
}

/// Error from character generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Character name is required")]
    MissingName,
    #[error("Class selection is required")]
    MissingClass,
    #[error("Invalid character class: {0}")]
    InvalidClass(String),
    #[error("{ability} score {score} is out of range (3-18)")]
    AbilityOutOfRange { ability: &'static str, score: u8 },
    #[error("Level {level} is out of range for {class} (2-{max})")]
    LevelOutOfRange {
        class: CharacterClass,
        level: u8,
        max: u8,
    },
}

impl From<UnknownClass> for GenerationError {
    fn from(err: UnknownClass) -> Self {
        GenerationError::InvalidClass(err.0)
    }
}

/// Builder for generating OSE characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    name: Option<String>,
    class: Option<CharacterClass>,
    ability_method: AbilityMethod,
    prime_requisite_adjustment: bool,
    /// Forced scores; skips the ability rolls entirely
    abilities: Option<AbilityScores>,
}

impl CharacterBuilder {
    /// Create a new character builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the character's class.
    pub fn class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Set the ability score method.
    pub fn ability_method(mut self, method: AbilityMethod) -> Self {
        self.ability_method = method;
        self
    }

    /// Trade points from STR/INT/WIS into the class prime requisite.
    pub fn prime_requisite_adjustment(mut self, enabled: bool) -> Self {
        self.prime_requisite_adjustment = enabled;
        self
    }

    /// Use these ability scores instead of rolling them.
    pub fn abilities(mut self, scores: AbilityScores) -> Self {
        self.abilities = Some(scores);
        self
    }

    /// Generate the character on the thread RNG.
    pub fn build(self) -> Result<GeneratedCharacter, GenerationError> {
        self.build_with(&mut RngRoller::thread())
    }

    /// Generate the character, drawing every die from `roller`.
    ///
    /// Dice are consumed in a fixed order: the six ability scores, the hit
    /// die, the spell pick (spellcasting classes only), then 3d6 gold.
    pub fn build_with(
        self,
        roller: &mut dyn DiceRoller,
    ) -> Result<GeneratedCharacter, GenerationError> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or(GenerationError::MissingName)?;
        let class = self.class.ok_or(GenerationError::MissingClass)?;

        let mut abilities = match self.abilities {
            Some(scores) => {
                if let Some(ability) = scores.out_of_range() {
                    return Err(GenerationError::AbilityOutOfRange {
                        ability: ability.field_name(),
                        score: scores.get(ability),
                    });
                }
                scores
            }
            None => self.ability_method.roll_scores(roller),
        };

        if self.prime_requisite_adjustment {
            adjust_prime_requisite(&mut abilities, class);
        }

        let class_data = class.data();

        let max_hp = rules::hit_points(roller.roll(class_data.hit_die), abilities.constitution);
        let armor_class = rules::armor_class(abilities.dexterity);
        let spells = pick_starting_spell(roller, class_data.spell_pool);
        let gold = roller.roll_3d6() * 10;

        Ok(GeneratedCharacter {
            name,
            character_class: class,
            level: 1,
            experience: 0,
            abilities,
            max_hp,
            current_hp: max_hp,
            armor_class,
            equipment: class_data.starting_equipment(),
            inventory: Vec::new(),
            gold,
            skills: class_data.starting_skills(),
            spells,
            background: String::new(),
            appearance: String::new(),
            is_alive: true,
        })
    }
}

/// Generate a level-1 character with 3d6-in-order abilities.
pub fn generate(
    name: impl Into<String>,
    class: CharacterClass,
) -> Result<GeneratedCharacter, GenerationError> {
    CharacterBuilder::new().name(name).class(class).build()
}

/// Like [`generate`], drawing every die from `roller`.
pub fn generate_with(
    roller: &mut dyn DiceRoller,
    name: impl Into<String>,
    class: CharacterClass,
) -> Result<GeneratedCharacter, GenerationError> {
    CharacterBuilder::new().name(name).class(class).build_with(roller)
}

/// Pick one spell uniformly from the pool, or none if the pool is empty.
///
/// No die is rolled for an empty pool.
fn pick_starting_spell(roller: &mut dyn DiceRoller, pool: &[&str]) -> Vec<String> {
    if pool.is_empty() {
        return Vec::new();
    }
    let face = roller.roll_die(pool.len() as u32) as usize;
    let index = face.saturating_sub(1).min(pool.len() - 1);
    vec![pool[index].to_string()]
}

/// Abilities that may be lowered to raise the prime requisite.
const EXCHANGEABLE: [Ability; 3] = [Ability::Strength, Ability::Intelligence, Ability::Wisdom];

/// Scores are never lowered below this by the adjustment.
const ADJUSTMENT_FLOOR: u8 = 9;

/// Apply the OSE prime requisite adjustment.
///
/// Each exchangeable ability other than the prime requisite gives up 2
/// points for every 1 point the prime requisite gains, without dropping
/// below 9 or pushing the prime requisite above 18.
pub fn adjust_prime_requisite(scores: &mut AbilityScores, class: CharacterClass) {
    let prime = class.data().prime_requisite;
    let cap = rules::ABILITY_MAX as u8;

    for ability in EXCHANGEABLE {
        if ability == prime {
            continue;
        }
        while scores.get(ability) >= ADJUSTMENT_FLOOR + 2 && scores.get(prime) < cap {
            scores.set(ability, scores.get(ability) - 2);
            scores.set(prime, scores.get(prime) + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRoller;

    #[test]
    fn test_missing_name_error() {
        let result = CharacterBuilder::new()
            .class(CharacterClass::Warrior)
            .build();
        assert_eq!(result, Err(GenerationError::MissingName));

        let result = CharacterBuilder::new()
            .name("   ")
            .class(CharacterClass::Warrior)
            .build();
        assert_eq!(result, Err(GenerationError::MissingName));
    }

    #[test]
    fn test_missing_class_error() {
        let result = CharacterBuilder::new().name("Conan").build();
        assert_eq!(result, Err(GenerationError::MissingClass));
    }

    #[test]
    fn test_unknown_class_label_converts() {
        let err: GenerationError = "paladin"
            .parse::<CharacterClass>()
            .map_err(GenerationError::from)
            .unwrap_err();
        assert_eq!(err, GenerationError::InvalidClass("paladin".to_string()));
    }

    #[test]
    fn test_forced_abilities_skip_ability_rolls() {
        // Only hit die (d6) and gold (3d6) are rolled for a cleric
        let mut roller = ScriptedRoller::new([4, 2, 2, 2]);
        let character = CharacterBuilder::new()
            .name("Brother Ambrose")
            .class(CharacterClass::Cleric)
            .abilities(AbilityScores::new(10, 11, 16, 13, 13, 9))
            .build_with(&mut roller)
            .unwrap();

        assert!(roller.is_exhausted());
        assert_eq!(character.abilities.wisdom, 16);
        // d6 = 4, CON 13 (+1)
        assert_eq!(character.max_hp, 5);
        // DEX 13 (+1)
        assert_eq!(character.armor_class, 11);
        assert_eq!(character.gold, 60);
        assert!(character.spells.is_empty());
    }

    #[test]
    fn test_forced_abilities_are_range_checked() {
        let result = CharacterBuilder::new()
            .name("Goliath")
            .class(CharacterClass::Warrior)
            .abilities(AbilityScores::new(19, 10, 10, 10, 10, 10))
            .build();
        assert_eq!(
            result,
            Err(GenerationError::AbilityOutOfRange {
                ability: "strength",
                score: 19
            })
        );
    }

    #[test]
    fn test_heroic_drops_lowest_die() {
        let mut roller = ScriptedRoller::new([1, 6, 5, 4]);
        assert_eq!(AbilityMethod::Heroic.roll_score(&mut roller), 15);
    }

    #[test]
    fn test_reroll_low_rerolls_until_six() {
        let mut roller = ScriptedRoller::new([1, 1, 1, 2, 1, 2, 3, 3, 3]);
        assert_eq!(AbilityMethod::RerollLow.roll_score(&mut roller), 9);
        assert!(roller.is_exhausted());
    }

    #[test]
    fn test_method_ranges() {
        let mut roller = RngRoller::seeded(7);
        for _ in 0..500 {
            let heroic = AbilityMethod::Heroic.roll_score(&mut roller);
            assert!((3..=18).contains(&heroic));
            let reroll = AbilityMethod::RerollLow.roll_score(&mut roller);
            assert!((6..=18).contains(&reroll));
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("heroic".parse::<AbilityMethod>(), Ok(AbilityMethod::Heroic));
        assert_eq!("3d6".parse::<AbilityMethod>(), Ok(AbilityMethod::Classic));
        assert_eq!("reroll-low".parse::<AbilityMethod>(), Ok(AbilityMethod::RerollLow));
        assert!("point-buy".parse::<AbilityMethod>().is_err());

        for method in AbilityMethod::all() {
            assert_eq!(method.flag().parse::<AbilityMethod>().as_ref(), Ok(method));
        }
    }

    #[test]
    fn test_prime_requisite_adjustment() {
        // Wizard: INT is prime; STR 13 -> 9 (+2), WIS 12 -> 10 (+1)
        let mut scores = AbilityScores::new(13, 10, 12, 10, 10, 10);
        adjust_prime_requisite(&mut scores, CharacterClass::Wizard);
        assert_eq!(scores.strength, 9);
        assert_eq!(scores.wisdom, 10);
        assert_eq!(scores.intelligence, 13);
    }

    #[test]
    fn test_prime_requisite_adjustment_caps_at_18() {
        let mut scores = AbilityScores::new(17, 18, 18, 10, 10, 10);
        adjust_prime_requisite(&mut scores, CharacterClass::Warrior);
        assert_eq!(scores.strength, 18);
        assert_eq!(scores.intelligence, 16);
        assert_eq!(scores.wisdom, 18);
    }

    #[test]
    fn test_prime_requisite_adjustment_bounds() {
        let mut roller = RngRoller::seeded(3);
        for class in CharacterClass::all() {
            for _ in 0..200 {
                let mut scores = AbilityMethod::Classic.roll_scores(&mut roller);
                let before = scores;
                adjust_prime_requisite(&mut scores, class);
                for ability in Ability::all() {
                    let value = scores.get(ability);
                    assert!(value <= 18);
                    if value < before.get(ability) {
                        assert!(value >= ADJUSTMENT_FLOOR);
                    }
                }
            }
        }
    }
}
