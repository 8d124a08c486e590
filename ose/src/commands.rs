//! Command execution.

use crate::cli::{Command, GenerateArgs, UploadArgs};
use crate::sheet;
use ose_api::{ApiError, CreateCharacterRequest, OseClient};
use ose_core::dice::{self, DiceRoller, RngRoller};
use ose_core::{
    AbilityMethod, CharacterBuilder, CharacterClass, CharacterData, GeneratedCharacter,
    GenerationError,
};
use std::error::Error;
use std::path::Path;
use tracing::{debug, info};

pub async fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Generate(args) => generate(args),
        Command::Validate { path } => {
            println!("{}", validate_file(&path)?);
            Ok(())
        }
        Command::Classes => {
            print!("{}", sheet::render_classes());
            Ok(())
        }
        Command::Roll { notation } => {
            let result = dice::roll(&notation)?;
            println!("{result}");
            Ok(())
        }
        Command::Upload(args) => upload(args).await,
        Command::Health => {
            let client = OseClient::from_env()?;
            let health = client.health().await?;
            println!(
                "{}: {} (version {})",
                client.config().base_url,
                health.status,
                health.version
            );
            Ok(())
        }
        Command::Help => {
            print!("{}", crate::help_text());
            Ok(())
        }
    }
}

/// Validate a character file, noting when its class label is not the
/// backend's form.
fn validate_file(path: &Path) -> Result<String, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)?;
    let record = CharacterData::from_json(&json)?;
    let normalized = record.normalized()?;

    let label = normalized.character_class.as_deref().unwrap_or_default();
    if record.character_class.as_deref() == Some(label) {
        Ok(format!("{}: valid", path.display()))
    } else {
        debug!(label, "class label normalized");
        Ok(format!(
            "{}: valid (class is sent to the backend as \"{label}\")",
            path.display()
        ))
    }
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let character = roll_character(
        args.name.as_deref(),
        args.class.as_deref(),
        args.method,
        args.adjust,
        args.seed,
    )?;

    let json = serde_json::to_string_pretty(&character)?;
    if let Some(path) = &args.out {
        std::fs::write(path, &json)?;
        info!(path = %path.display(), "character saved");
        eprintln!("Saved {} to {}", character.name, path.display());
    }

    if args.json {
        println!("{json}");
    } else {
        print!("{}", sheet::render(&character));
    }
    Ok(())
}

async fn upload(args: UploadArgs) -> Result<(), Box<dyn Error>> {
    let character = roll_character(
        args.name.as_deref(),
        args.class.as_deref(),
        AbilityMethod::Classic,
        false,
        args.seed,
    )?;

    let mut client = OseClient::from_env()?;
    let user_id = client
        .ensure_authenticated()
        .await?
        .user_id
        .ok_or_else(|| ApiError::InvalidToken("token carries no user_id".to_string()))?;

    let request = CreateCharacterRequest::new(character, user_id, args.session);
    let stored = client.create_character(&request).await?;
    info!(id = stored.id, user_id, session = args.session, "character uploaded");
    println!(
        "Created character #{} ({})",
        stored.id,
        stored.data.name.as_deref().unwrap_or(&request.character.name)
    );
    Ok(())
}

/// Generate a character and check it against the record validator.
fn roll_character(
    name: Option<&str>,
    class: Option<&str>,
    method: AbilityMethod,
    adjust: bool,
    seed: Option<u64>,
) -> Result<GeneratedCharacter, Box<dyn Error>> {
    let mut builder = CharacterBuilder::new()
        .ability_method(method)
        .prime_requisite_adjustment(adjust);
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(label) = class {
        let class = label
            .parse::<CharacterClass>()
            .map_err(GenerationError::from)?;
        builder = builder.class(class);
    }

    let mut roller: Box<dyn DiceRoller> = match seed {
        Some(seed) => {
            debug!(seed, "using seeded dice");
            Box::new(RngRoller::seeded(seed))
        }
        None => Box::new(RngRoller::thread()),
    };
    let character = builder.build_with(roller.as_mut())?;

    CharacterData::from(&character).validate()?;
    debug!(
        name = %character.name,
        class = %character.character_class,
        max_hp = character.max_hp,
        "character generated"
    );
    Ok(character)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_character_seeded() {
        let a = roll_character(Some("Thorin"), Some("nain"), AbilityMethod::Classic, false, Some(9))
            .unwrap();
        let b = roll_character(Some("Thorin"), Some("dwarf"), AbilityMethod::Classic, false, Some(9))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.character_class, CharacterClass::Dwarf);
    }

    #[test]
    fn test_roll_character_errors() {
        let err = roll_character(Some("X"), Some("paladin"), AbilityMethod::Classic, false, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid character class: paladin");

        let err = roll_character(None, Some("elf"), AbilityMethod::Classic, false, None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Character name is required");

        let err = roll_character(Some("X"), None, AbilityMethod::Classic, false, None).unwrap_err();
        assert_eq!(err.to_string(), "Class selection is required");
    }

    fn write_temp(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ose-{}-{name}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_validate_file_reports_backend_label() {
        let record = r#"{"name": "Gimli", "character_class": "%CLASS%", "strength": "15",
            "intelligence": 9, "wisdom": 6, "dexterity": 17, "constitution": 14,
            "charisma": 6, "max_hp": 8, "current_hp": 8}"#;

        let path = write_temp("french", &record.replace("%CLASS%", "nain"));
        let message = validate_file(&path).unwrap();
        assert_eq!(message, format!("{}: valid", path.display()));
        std::fs::remove_file(&path).unwrap();

        let path = write_temp("english", &record.replace("%CLASS%", " Dwarf "));
        let message = validate_file(&path).unwrap();
        assert!(message.ends_with("valid (class is sent to the backend as \"nain\")"));
        std::fs::remove_file(&path).unwrap();

        let path = write_temp("invalid", &record.replace("%CLASS%", "paladin"));
        let err = validate_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "Invalid character class: paladin");
        std::fs::remove_file(&path).unwrap();
    }
}
