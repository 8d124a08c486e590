//! Old-School Essentials character engine.
//!
//! This crate provides:
//! - The OSE ability modifier table and derived-stat rules
//! - Static class data (hit dice, starting kit, skills, spell pools)
//! - Advancement tables (experience, THAC0, saving throws)
//! - Random level-1 character generation with pluggable dice
//! - Validation of character records before they reach the backend
//!
//! # Quick Start
//!
//! ```
//! use ose_core::{generate, CharacterClass};
//!
//! let thorin = generate("Thorin", CharacterClass::Dwarf).unwrap();
//! assert_eq!(thorin.level, 1);
//! assert_eq!(thorin.current_hp, thorin.max_hp);
//! assert!(thorin.spells.is_empty());
//! ```
//!
//! Pass a seeded [`dice::RngRoller`] to [`generate_with`] for reproducible
//! characters.

pub mod character;
pub mod character_builder;
pub mod class_data;
pub mod dice;
pub mod progression;
pub mod rules;
pub mod testing;
pub mod validation;

// Primary public API
pub use character::{Ability, AbilityScores, CharacterClass, GeneratedCharacter, UnknownClass};
pub use character_builder::{
    generate, generate_with, AbilityMethod, CharacterBuilder, GenerationError,
};
pub use class_data::ClassData;
pub use dice::{DiceRoller, DieType, RngRoller};
pub use progression::{saving_throws, thac0, xp_for_level, SavingThrow, SavingThrows};
pub use rules::ability_modifier;
pub use validation::{validate, CharacterData, ValidationError};
