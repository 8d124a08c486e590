//! OSE dice rolling system.
//!
//! Supports standard dice notation (XdY+Z, keep highest/lowest) and the
//! [`DiceRoller`] trait through which every random draw in the crate flows.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most dice a single expression may roll, across all of its terms.
pub const MAX_DICE: u32 = 100;

/// Largest flat modifier, in either direction, an expression may carry.
pub const MAX_MODIFIER: i32 = 10_000;

/// Error type for dice parsing.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
    #[error("Cannot keep {keep} dice when only rolling {count} (in {notation})")]
    InvalidKeepCount {
        keep: u32,
        count: u32,
        notation: String,
    },
    #[error("Too many dice: {count} (at most {max} per roll)")]
    TooManyDice { count: u64, max: u32 },
    #[error("Modifier out of range in {0}")]
    ModifierOutOfRange(String),
}

/// Standard polyhedral die types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Source of die faces.
///
/// Generation code never touches an RNG directly; it asks a roller for
/// faces. [`RngRoller`] is the production implementation and
/// [`crate::testing::ScriptedRoller`] replays fixed faces in tests.
pub trait DiceRoller {
    /// Roll one die with `sides` faces, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Roll one die of the given type.
    fn roll(&mut self, die: DieType) -> u32 {
        self.roll_die(die.sides())
    }

    /// Roll `count` dice of the given type and return each face.
    fn roll_many(&mut self, count: u32, die: DieType) -> Vec<u32> {
        (0..count).map(|_| self.roll(die)).collect()
    }

    /// Sum of three six-sided dice.
    fn roll_3d6(&mut self) -> u32 {
        self.roll_many(3, DieType::D6).iter().sum()
    }
}

/// A [`DiceRoller`] backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RngRoller<R> {
    rng: R,
}

impl<R: Rng> RngRoller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngRoller<ThreadRng> {
    /// Roller over the thread-local RNG.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RngRoller<StdRng> {
    /// Reproducible roller: the same seed always yields the same faces.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceRoller for RngRoller<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Which dice of a term count toward the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keep {
    All,
    Highest(u32),
    Lowest(u32),
}

/// `NdS` with an optional keep rule, e.g. `4d6kh3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub die: DieType,
    pub keep: Keep,
}

impl DiceTerm {
    /// Roll the term; dropped faces are flagged rather than removed.
    pub fn roll_with(&self, roller: &mut dyn DiceRoller) -> TermRoll {
        let faces = roller.roll_many(self.count, self.die);

        let mut order: Vec<usize> = (0..faces.len()).collect();
        let keep = match self.keep {
            Keep::All => faces.len(),
            Keep::Highest(n) => {
                order.sort_by_key(|&i| std::cmp::Reverse(faces[i]));
                n as usize
            }
            Keep::Lowest(n) => {
                order.sort_by_key(|&i| faces[i]);
                n as usize
            }
        };

        let mut dropped = vec![true; faces.len()];
        for &i in order.iter().take(keep) {
            dropped[i] = false;
        }

        TermRoll {
            die: self.die,
            faces,
            dropped,
        }
    }
}

/// A parsed expression: dice terms plus a flat modifier (e.g. `2d6+1d4-1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub terms: Vec<DiceTerm>,
    pub modifier: i32,
    pub notation: String,
}

impl DiceExpression {
    /// Parse dice notation. Whitespace and case are ignored; dice terms may
    /// only be added, constants may be added or subtracted.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let mut terms: Vec<DiceTerm> = Vec::new();
        let mut modifier = 0i32;
        let mut dice = 0u64;

        for (negative, term) in split_signed(&notation) {
            if term.is_empty() {
                return Err(DiceError::InvalidNotation(notation.clone()));
            }
            if term.contains('d') {
                if negative {
                    return Err(DiceError::InvalidNotation(format!("-{term}")));
                }
                let parsed = parse_term(term)?;
                dice += u64::from(parsed.count);
                if dice > u64::from(MAX_DICE) {
                    return Err(DiceError::TooManyDice {
                        count: dice,
                        max: MAX_DICE,
                    });
                }
                terms.push(parsed);
            } else {
                let out_of_range = || DiceError::ModifierOutOfRange(notation.clone());
                if !term.chars().all(|c| c.is_ascii_digit()) {
                    return Err(DiceError::InvalidNotation(term.to_string()));
                }
                let value: i32 = term.parse().map_err(|_| out_of_range())?;
                let value = if negative { -value } else { value };
                modifier = modifier
                    .checked_add(value)
                    .filter(|m| m.abs() <= MAX_MODIFIER)
                    .ok_or_else(out_of_range)?;
            }
        }

        if terms.is_empty() && modifier == 0 {
            return Err(DiceError::NoDice);
        }

        Ok(Self {
            terms,
            modifier,
            notation,
        })
    }

    /// Roll on the thread RNG.
    pub fn roll(&self) -> RollResult {
        self.roll_with(&mut RngRoller::thread())
    }

    pub fn roll_with(&self, roller: &mut dyn DiceRoller) -> RollResult {
        let terms: Vec<TermRoll> = self.terms.iter().map(|t| t.roll_with(roller)).collect();
        let dice = terms
            .iter()
            .map(|t| i32::try_from(t.subtotal()).unwrap_or(i32::MAX))
            .fold(0i32, i32::saturating_add);

        RollResult {
            notation: self.notation.clone(),
            terms,
            modifier: self.modifier,
            total: dice.saturating_add(self.modifier),
        }
    }
}

/// Split `a+b-c` into `(false, "a"), (false, "b"), (true, "c")`.
fn split_signed(notation: &str) -> Vec<(bool, &str)> {
    let mut parts = Vec::new();
    let mut negative = false;
    let mut start = 0;

    for (i, c) in notation.char_indices() {
        if c == '+' || c == '-' {
            // A leading sign belongs to the first term
            if i > 0 {
                parts.push((negative, &notation[start..i]));
            }
            negative = c == '-';
            start = i + 1;
        }
    }
    parts.push((negative, &notation[start..]));
    parts
}

fn parse_term(term: &str) -> Result<DiceTerm, DiceError> {
    let invalid = || DiceError::InvalidNotation(term.to_string());

    let (count, rest) = term.split_once('d').ok_or_else(invalid)?;
    let count: u64 = match count {
        "" => 1,
        n if n.chars().all(|c| c.is_ascii_digit()) => n.parse().unwrap_or(u64::MAX),
        _ => return Err(invalid()),
    };
    if count > u64::from(MAX_DICE) {
        return Err(DiceError::TooManyDice {
            count,
            max: MAX_DICE,
        });
    }
    let count = count as u32;

    let (sides, keep) = if let Some((sides, n)) = rest.split_once("kh") {
        (sides, Keep::Highest(n.parse().map_err(|_| invalid())?))
    } else if let Some((sides, n)) = rest.split_once("kl") {
        (sides, Keep::Lowest(n.parse().map_err(|_| invalid())?))
    } else {
        (rest, Keep::All)
    };

    let sides: u32 = sides.parse().map_err(|_| invalid())?;
    let die = DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?;

    if let Keep::Highest(keep) | Keep::Lowest(keep) = keep {
        if keep > count {
            return Err(DiceError::InvalidKeepCount {
                keep,
                count,
                notation: term.to_string(),
            });
        }
    }

    Ok(DiceTerm { count, die, keep })
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

/// Faces rolled for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRoll {
    pub die: DieType,
    pub faces: Vec<u32>,
    /// Parallel to `faces`; true where the keep rule discarded the face.
    pub dropped: Vec<bool>,
}

impl TermRoll {
    pub fn subtotal(&self) -> u32 {
        self.kept().sum()
    }

    pub fn kept(&self) -> impl Iterator<Item = u32> + '_ {
        self.faces
            .iter()
            .zip(&self.dropped)
            .filter(|(_, dropped)| !**dropped)
            .map(|(&face, _)| face)
    }
}

impl fmt::Display for TermRoll {
    /// `[(1), 6, 3, 4]`, dropped faces in parentheses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<String> = self
            .faces
            .iter()
            .zip(&self.dropped)
            .map(|(face, &dropped)| {
                if dropped {
                    format!("({face})")
                } else {
                    face.to_string()
                }
            })
            .collect();
        write!(f, "[{}]", shown.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub notation: String,
    pub terms: Vec<TermRoll>,
    pub modifier: i32,
    pub total: i32,
}

impl RollResult {
    /// Every term's faces joined with the modifier: `[(1), 6, 3, 4] + 1`.
    pub fn dice_display(&self) -> String {
        let mut out = self
            .terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        if self.modifier != 0 {
            let sign = if self.modifier > 0 { '+' } else { '-' };
            if out.is_empty() {
                out = self.modifier.to_string();
            } else {
                out = format!("{out} {sign} {}", self.modifier.abs());
            }
        }
        out
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}

/// Parse and roll in one step.
pub fn roll(notation: &str) -> Result<RollResult, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll())
}
