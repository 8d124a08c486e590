//! Validation of character records before they are sent to the backend.
//!
//! Checks run in a fixed order and stop at the first failure, so a record
//! with several problems always reports the same one.

use crate::character::{Ability, CharacterClass, GeneratedCharacter};
use crate::rules;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Error from character validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The field {0} is required")]
    MissingField(&'static str),
    #[error("Invalid character class: {0}")]
    InvalidClass(String),
    #[error("The ability {0} must be between 3 and 18")]
    InvalidAbility(&'static str),
    #[error("Invalid {0} hit points")]
    InvalidHp(&'static str),
}

/// A candidate character record, possibly hand-built or partially edited.
///
/// Every field is optional; absent fields deserialize to `None` and
/// unknown fields in incoming JSON are ignored. Numbers may arrive as JSON
/// numbers or numeric strings (`"15"`), as form-encoded records carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterData {
    pub name: Option<String>,
    pub character_class: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub strength: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub intelligence: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub wisdom: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub dexterity: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub constitution: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub charisma: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max_hp: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current_hp: Option<i32>,
}

/// Integer from a JSON number or numeric string.
///
/// Null and blank strings read as absent. Values beyond `i32` saturate so
/// the range checks still reject them; fractions and other text are errors.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let saturate = |n: i64| n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawNumber::Integer(n)) => Ok(Some(saturate(n))),
        Some(RawNumber::Float(f)) if f.fract() == 0.0 => Ok(Some(f as i32)),
        Some(RawNumber::Float(f)) => Err(D::Error::custom(format!("{f} is not a whole number"))),
        Some(RawNumber::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(|n| Some(saturate(n)))
                .map_err(|_| D::Error::custom(format!("{text:?} is not a number")))
        }
    }
}

impl CharacterData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn score(&self, ability: Ability) -> Option<i32> {
        match ability {
            Ability::Strength => self.strength,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set_score(&mut self, ability: Ability, value: Option<i32>) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Required fields in check order, paired with whether each is filled.
    ///
    /// Empty text and zero both count as missing.
    fn required_fields(&self) -> [(&'static str, bool); 10] {
        let text = |value: &Option<String>| value.as_deref().is_some_and(|s| !s.is_empty());
        let number = |value: Option<i32>| value.is_some_and(|n| n != 0);

        [
            ("name", text(&self.name)),
            ("character_class", text(&self.character_class)),
            ("strength", number(self.strength)),
            ("intelligence", number(self.intelligence)),
            ("wisdom", number(self.wisdom)),
            ("dexterity", number(self.dexterity)),
            ("constitution", number(self.constitution)),
            ("charisma", number(self.charisma)),
            ("max_hp", number(self.max_hp)),
            ("current_hp", number(self.current_hp)),
        ]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(self)
    }

    /// The class named by `character_class`, in either language.
    pub fn class(&self) -> Result<CharacterClass, ValidationError> {
        let label = self.character_class.as_deref().unwrap_or_default();
        label
            .parse()
            .map_err(|_| ValidationError::InvalidClass(label.to_string()))
    }

    /// Validate, then return the record as the backend stores it.
    ///
    /// The backend only accepts the lowercase French class labels, so an
    /// English or oddly cased label is rewritten (`" Dwarf "` becomes `"nain"`).
    pub fn normalized(&self) -> Result<CharacterData, ValidationError> {
        validate(self)?;
        let class = self.class()?;
        Ok(CharacterData {
            character_class: Some(class.french_label().to_string()),
            ..self.clone()
        })
    }
}

impl From<&GeneratedCharacter> for CharacterData {
    fn from(character: &GeneratedCharacter) -> Self {
        let mut data = CharacterData {
            name: Some(character.name.clone()),
            character_class: Some(character.character_class.french_label().to_string()),
            max_hp: Some(character.max_hp),
            current_hp: Some(character.current_hp),
            ..Default::default()
        };
        for ability in Ability::all() {
            data.set_score(ability, Some(character.abilities.get(ability) as i32));
        }
        data
    }
}

/// Validate a candidate character record.
///
/// 1. required fields are present, non-empty and non-zero
/// 2. the class is one of the seven OSE classes (English or French label,
///    any case; see [`CharacterData::normalized`] for the backend form)
/// 3. every ability score lies in 3..=18
/// 4. maximum hit points are positive
/// 5. current hit points are not negative
pub fn validate(candidate: &CharacterData) -> Result<(), ValidationError> {
    if let Some((field, _)) = candidate
        .required_fields()
        .into_iter()
        .find(|(_, present)| !present)
    {
        return Err(ValidationError::MissingField(field));
    }

    candidate.class()?;

    for ability in Ability::all() {
        let in_range = candidate
            .score(ability)
            .is_some_and(rules::is_valid_ability_score);
        if !in_range {
            return Err(ValidationError::InvalidAbility(ability.field_name()));
        }
    }

    if candidate.max_hp.unwrap_or_default() <= 0 {
        return Err(ValidationError::InvalidHp("max"));
    }

    if candidate.current_hp.unwrap_or_default() < 0 {
        return Err(ValidationError::InvalidHp("current"));
    }

    Ok(())
}
