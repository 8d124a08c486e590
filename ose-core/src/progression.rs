//! Advancement tables: experience per level, attack matrix (THAC0) and
//! saving throws.
//!
//! Attack and save tables are banded: each row holds the last level it
//! applies to. Lookups past a class's top row use that row.

use crate::character::CharacterClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Experience needed to reach each level, level 1 first.
pub const XP_TABLE: [u32; 14] = [
    0, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 120_000, 240_000, 360_000, 480_000,
    600_000, 720_000, 840_000,
];

/// Experience needed to reach `level`, or `None` outside 1..=14.
pub fn xp_for_level(level: u8) -> Option<u32> {
    let index = usize::from(level).checked_sub(1)?;
    XP_TABLE.get(index).copied()
}

/// Highest level `experience` reaches, capped at the class maximum.
pub fn level_for_experience(class: CharacterClass, experience: u32) -> u8 {
    let reached = XP_TABLE.iter().take_while(|&&xp| xp <= experience).count();
    (reached as u8).clamp(1, class.data().max_level)
}

/// The five OSE saving throw categories, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SavingThrow {
    /// Death ray or poison.
    Death,
    /// Magic wands.
    Wands,
    /// Paralysis or petrification.
    Paralysis,
    /// Breath attacks.
    Breath,
    /// Spells, rods and staves.
    Spells,
}

impl SavingThrow {
    pub fn all() -> [SavingThrow; 5] {
        [
            SavingThrow::Death,
            SavingThrow::Wands,
            SavingThrow::Paralysis,
            SavingThrow::Breath,
            SavingThrow::Spells,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SavingThrow::Death => "Death",
            SavingThrow::Wands => "Wands",
            SavingThrow::Paralysis => "Paralysis",
            SavingThrow::Breath => "Breath",
            SavingThrow::Spells => "Spells",
        }
    }

    /// Short code the backend uses (`MP`, `B`, `PP`, `S`, `SBB`).
    pub fn code(&self) -> &'static str {
        match self {
            SavingThrow::Death => "MP",
            SavingThrow::Wands => "B",
            SavingThrow::Paralysis => "PP",
            SavingThrow::Breath => "S",
            SavingThrow::Spells => "SBB",
        }
    }

    fn index(&self) -> usize {
        match self {
            SavingThrow::Death => 0,
            SavingThrow::Wands => 1,
            SavingThrow::Paralysis => 2,
            SavingThrow::Breath => 3,
            SavingThrow::Spells => 4,
        }
    }
}

impl fmt::Display for SavingThrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SavingThrow {
    type Err = String;

    /// Accepts the backend code or the English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        SavingThrow::all()
            .into_iter()
            .find(|save| {
                label.eq_ignore_ascii_case(save.code()) || label.eq_ignore_ascii_case(save.name())
            })
            .ok_or_else(|| format!("Unknown saving throw: {label}"))
    }
}

/// Target numbers for one class at one level, indexed by [`SavingThrow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrows([u8; 5]);

impl SavingThrows {
    pub fn get(&self, save: SavingThrow) -> u8 {
        self.0[save.index()]
    }
}

impl fmt::Display for SavingThrows {
    /// `D12 W13 P14 B15 S16`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = SavingThrow::all()
            .iter()
            .map(|save| format!("{}{}", &save.name()[..1], self.get(*save)))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

type Band<T> = (u8, T);

fn thac0_bands(class: CharacterClass) -> &'static [Band<u8>] {
    match class {
        CharacterClass::Warrior => &[(3, 19), (6, 17), (9, 14), (12, 12), (14, 10)],
        CharacterClass::Cleric | CharacterClass::Thief => &[(4, 19), (8, 17), (12, 14), (14, 12)],
        CharacterClass::Wizard => &[(5, 19), (10, 17), (14, 14)],
        CharacterClass::Dwarf => &[(3, 19), (6, 17), (9, 14), (12, 12)],
        CharacterClass::Elf => &[(3, 19), (6, 17), (9, 14), (10, 12)],
        CharacterClass::Halfling => &[(3, 19), (6, 17), (8, 14)],
    }
}

fn save_bands(class: CharacterClass) -> &'static [Band<[u8; 5]>] {
    match class {
        CharacterClass::Warrior => &[
            (3, [12, 13, 14, 15, 16]),
            (6, [10, 11, 12, 13, 14]),
            (9, [8, 9, 10, 10, 12]),
            (12, [6, 7, 8, 8, 10]),
            (14, [4, 5, 6, 5, 8]),
        ],
        CharacterClass::Cleric => &[
            (4, [11, 12, 14, 16, 15]),
            (8, [9, 10, 12, 14, 12]),
            (12, [6, 7, 9, 11, 9]),
            (14, [3, 5, 7, 8, 7]),
        ],
        CharacterClass::Wizard => &[
            (5, [13, 14, 13, 16, 15]),
            (10, [11, 12, 11, 14, 12]),
            (14, [8, 9, 8, 11, 8]),
        ],
        CharacterClass::Thief => &[
            (4, [13, 14, 13, 16, 15]),
            (8, [12, 13, 11, 14, 13]),
            (12, [10, 11, 9, 12, 10]),
            (14, [8, 9, 7, 10, 8]),
        ],
        CharacterClass::Dwarf => &[
            (3, [8, 9, 10, 13, 12]),
            (6, [6, 7, 8, 10, 10]),
            (9, [4, 5, 6, 7, 8]),
            (12, [2, 3, 4, 4, 6]),
        ],
        CharacterClass::Elf => &[
            (3, [12, 13, 13, 15, 15]),
            (6, [10, 11, 11, 13, 12]),
            (9, [8, 9, 9, 10, 10]),
            (10, [6, 7, 8, 8, 8]),
        ],
        CharacterClass::Halfling => &[
            (3, [8, 9, 10, 13, 12]),
            (6, [6, 7, 8, 10, 10]),
            (8, [4, 5, 6, 7, 8]),
        ],
    }
}

/// Row covering `level`, or the last row when `level` is past the table.
fn band_for<T: Copy>(bands: &[Band<T>], level: u8) -> Option<T> {
    bands
        .iter()
        .find(|(last, _)| level <= *last)
        .or_else(|| bands.last())
        .map(|&(_, value)| value)
}

/// Attack roll needed to hit armour class 0. Level is clamped into the
/// class's 1..=max range.
pub fn thac0(class: CharacterClass, level: u8) -> u8 {
    let level = level.clamp(1, class.data().max_level);
    band_for(thac0_bands(class), level).unwrap_or(19)
}

/// d20 roll needed to hit `armor_class` (descending AC).
pub fn attack_target(thac0: u8, armor_class: i32) -> i32 {
    i32::from(thac0) - armor_class
}

/// Saving throw targets, or `None` for level 0. Levels above the class
/// maximum use the top row.
pub fn saving_throws(class: CharacterClass, level: u8) -> Option<SavingThrows> {
    if level == 0 {
        return None;
    }
    band_for(save_bands(class), level).map(SavingThrows)
}

/// Target for a single save.
pub fn save_threshold(class: CharacterClass, level: u8, save: SavingThrow) -> Option<u8> {
    saving_throws(class, level).map(|saves| saves.get(save))
}
