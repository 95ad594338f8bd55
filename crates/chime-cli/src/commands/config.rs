use clap::Subcommand;

use chime_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Get a single value by dotted key
    Get { key: String },
    /// Set a single value by dotted key
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", Config::path()?.display());
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match key.as_str() {
                "timer.default_minutes" => println!("{}", config.timer.default_minutes),
                "timer.warning_seconds" => println!("{}", config.timer.warning_seconds),
                "speech.enabled" => println!("{}", config.speech.enabled),
                "speech.rate" => println!("{}", config.speech.rate),
                "speech.pitch" => println!("{}", config.speech.pitch),
                _ => return Err(format!("unknown config key '{key}'").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "timer.default_minutes" => config.timer.default_minutes = value.parse()?,
                "timer.warning_seconds" => config.timer.warning_seconds = value.parse()?,
                "speech.enabled" => config.speech.enabled = value.parse()?,
                "speech.rate" => config.speech.rate = value.parse()?,
                "speech.pitch" => config.speech.pitch = value.parse()?,
                _ => return Err(format!("unknown config key '{key}'").into()),
            }
            config.save()?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
