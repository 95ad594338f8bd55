use std::rc::Rc;

use clap::Subcommand;
use url::Url;

use chime_core::{parse_url_time_token, share_path, Config, Database, NullAnnouncer};

use super::{load_engine, save_engine};

#[derive(Subcommand)]
pub enum ShareAction {
    /// Print the shareable path (or full URL) for the current timer
    Print {
        /// Base URL to prepend, e.g. https://chime.example
        #[arg(long)]
        base: Option<Url>,
    },
    /// Configure the timer from a shared link or path
    Link {
        /// Full URL or path like /school/730
        link: String,
    },
}

pub fn run(action: ShareAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Rc::new(Database::open()?);
    let announcer = Rc::new(NullAnnouncer);
    let mut engine = load_engine(db.clone(), announcer, &config);

    match action {
        ShareAction::Print { base } => {
            let snapshot = engine.snapshot();
            let path = share_path(&snapshot.timer_purpose, Some(&snapshot.end_time_string));
            match base {
                Some(base) => println!("{}{}", base.as_str().trim_end_matches('/'), path),
                None => println!("{path}"),
            }
        }
        ShareAction::Link { link } => {
            let (purpose, token) = split_link(&link)?;
            engine.set_purpose(&purpose)?;
            // An unparseable token leaves the current end time alone;
            // a parsed-but-out-of-range one is a hard error.
            let mut applied = None;
            if let Some(raw) = token {
                if let Some(time) = parse_url_time_token(&raw) {
                    engine.set_end_time_from_token(&time)?;
                    applied = Some(time);
                }
            }
            save_engine(&db, &engine)?;
            match applied {
                Some(time) => println!("timer '{}' targets {time}", engine.timer_purpose()),
                None => println!("timer '{}'", engine.timer_purpose()),
            }
        }
    }

    Ok(())
}

/// Split a shared link into its purpose and optional time token.
///
/// Accepts both full URLs and bare paths: `https://host/school/730`,
/// `/school/730`, `/school`.
fn split_link(link: &str) -> Result<(String, Option<String>), Box<dyn std::error::Error>> {
    let path = if link.contains("://") {
        Url::parse(link)?.path().to_string()
    } else {
        link.to_string()
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let purpose = segments
        .next()
        .ok_or_else(|| format!("no purpose in link '{link}'"))?
        .to_string();
    let token = segments.next().map(str::to_string);
    Ok((purpose, token))
}
