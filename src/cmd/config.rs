use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path, parse_timeout};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring the triage notifier.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Prefer TRIAGE_API_KEY over storing the key on disk.");
    println!();

    edit_text(
        "Triage endpoint URL (e.g., https://triage.internal/triage)",
        &mut cfg.endpoint,
        false,
    )?;
    edit_text("Triage API key", &mut cfg.api_key, true)?;
    edit_field(
        "Request timeout in seconds",
        &mut cfg.timeout_secs,
        false,
        parse_timeout,
    )?;
    edit_text(
        "Origin tag for untagged requests ('30' trusted, 'unknown' safer)",
        &mut cfg.untagged_origin,
        false,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let config = AppConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Triage endpoint: {}", config.endpoint);
    println!("Triage API key: {}", mask_secret(config.api_key()));
    println!("Request timeout: {}s", config.timeout.as_secs());
    println!("Untagged origin: {}", config.untagged_origin);
    if let Err(err) = config.validate() {
        println!("Status: {err}");
    }

    Ok(())
}

fn edit_text(label: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    edit_field(label, target, secret, |raw| Ok(raw.to_string()))
}

/// Asks for one setting and stores the parsed answer. A value that does not
/// parse aborts the wizard before anything is saved.
fn edit_field<T, F>(label: &str, target: &mut Option<T>, secret: bool, parse: F) -> AppResult<()>
where
    T: ToString,
    F: Fn(&str) -> AppResult<T>,
{
    let shown = target
        .as_ref()
        .map(|value| if secret { "****".to_string() } else { value.to_string() });
    let answer = read_answer(&question(label, shown.as_deref()))?;

    match parse_prompt_input(&answer) {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(raw) => *target = Some(parse(&raw)?),
    }
    Ok(())
}

fn question(label: &str, shown: Option<&str>) -> String {
    match shown {
        Some(current) => format!("{label} [{current}] (Enter to keep, '-' to clear): "),
        None => format!("{label} (Enter to skip): "),
    }
}

fn read_answer(question: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{question}")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn parse_prompt_input(input: &str) -> PromptAction {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PromptAction::Keep
    } else if trimmed == "-" {
        PromptAction::Clear
    } else {
        PromptAction::Set(trimmed.to_string())
    }
}

fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret(Some("abcdefghij")), "abc***hij");
        assert_eq!(mask_secret(Some("short")), "***");
        assert_eq!(mask_secret(None), "<not set>");
    }

    #[test]
    fn shows_current_value_in_question() {
        assert_eq!(
            question("Request timeout in seconds", Some("5")),
            "Request timeout in seconds [5] (Enter to keep, '-' to clear): "
        );
        assert_eq!(question("Triage API key", None), "Triage API key (Enter to skip): ");
    }

    #[test]
    fn parses_prompt_input() {
        assert_eq!(parse_prompt_input("\n"), PromptAction::Keep);
        assert_eq!(parse_prompt_input(" - \n"), PromptAction::Clear);
        assert_eq!(
            parse_prompt_input("https://triage.internal\n"),
            PromptAction::Set("https://triage.internal".to_string())
        );
    }
}
