//! Line-oriented dungeon client.
//!
//! Composition root: loads `.env`, the content pack and the file store, then
//! reads one command or action per line from stdin.
//!
//! ```bash
//! DUNGEON_DATA_DIR=data DUNGEON_RNG_SEED=7 cargo run -p dungeon-cli
//! ```
mod command;
mod render;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use game_content::ContentFactory;
use game_core::CharacterId;
use runtime::{FileStore, RunService, RuntimeConfig, now_millis};
use tracing::info;

use command::{Command, HELP};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = RuntimeConfig::from_env()?;
    let factory = ContentFactory::new(&config.data_dir);
    let rules = factory.load_config()?;
    let content = factory
        .load_catalog()
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let store = FileStore::open(&config.save_dir)
        .with_context(|| format!("opening saves in {}", config.save_dir.display()))?;
    info!(saves = %store.path().display(), "store opened");

    let service = RunService::builder()
        .store(store)
        .content(content)
        .rules(rules)
        .config(config)
        .build()?;

    let recovered = service.recover_stale_runs(now_millis())?;
    if !recovered.is_empty() {
        info!(count = recovered.len(), "unlocked stale runs");
    }

    Session::new(service).run(io::stdin().lock(), io::stdout().lock())
}

struct Session {
    service: RunService<FileStore>,
    character: Option<CharacterId>,
}

impl Session {
    fn new(service: RunService<FileStore>) -> Self {
        Self {
            service,
            character: None,
        }
    }

    fn run(mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "Welcome, delver. Type /help for commands.")?;
        prompt(&mut output)?;
        for line in input.lines() {
            let line = line?;
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    let reply = self.handle(command);
                    if !reply.is_empty() {
                        writeln!(output, "{reply}")?;
                    }
                }
                Err(usage) => writeln!(output, "{usage}")?,
            }
            prompt(&mut output)?;
        }
        Ok(())
    }

    /// Text reply for one command. Request errors are shown, never fatal.
    fn handle(&mut self, command: Command) -> String {
        let content = self.service.content();
        let result: runtime::Result<String> = match command {
            Command::Help => Ok(HELP.to_string()),
            Command::Empty | Command::Quit => Ok(String::new()),
            Command::Dungeons => Ok(content
                .dungeons()
                .map(|d| {
                    format!(
                        "{:>3}  {} ({} floors, tier {}, entry {} gold)",
                        d.id.0, d.name, d.floors, d.tier, d.entry_cost
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")),
            Command::New(name) => self.service.create_character(&name, None).map(|hero| {
                self.character = Some(hero.id);
                format!("Created {} ({}).", hero.name, hero.id)
            }),
            Command::Play(id) => self.service.sheet(id).map(|sheet| {
                self.character = Some(id);
                render::sheet(&sheet, content)
            }),
            other => match self.character {
                None => Ok("Create a character first: /new <name>".to_string()),
                Some(hero) => self.with_character(hero, other),
            },
        };
        result.unwrap_or_else(|error| format!("! {error}"))
    }

    fn with_character(&self, hero: CharacterId, command: Command) -> runtime::Result<String> {
        let content = self.service.content();
        match command {
            Command::Sheet => Ok(render::sheet(&self.service.sheet(hero)?, content)),
            Command::Enter(dungeon) => self
                .service
                .enter_dungeon(hero, dungeon)
                .map(|run| format!("{} begins on floor {}, room {}.", run.id, run.floor, run.room)),
            Command::Context => Ok(self
                .service
                .context(hero)?
                .iter()
                .map(|entry| format!("[{}] f{} r{} {}", entry.turn, entry.floor, entry.room, entry.summary))
                .collect::<Vec<_>>()
                .join("\n")),
            Command::Abandon => self
                .service
                .abandon_run(hero)
                .map(|run| format!("{} abandoned.", run.id)),
            Command::Recover => self
                .service
                .recover_stale_runs(now_millis())
                .map(|runs| format!("unlocked {} run(s)", runs.len())),
            Command::Action(text) => self
                .service
                .process_action(hero, &text)
                .map(|summary| render::turn(&summary, content)),
            _ => Ok(String::new()),
        }
    }
}

fn prompt(output: &mut impl Write) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()
}
