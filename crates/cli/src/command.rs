//! Parsing of one input line.
//!
//! Lines starting with `/` are session commands; anything else is handed to
//! the rules as free-form action text.

use game_core::{CharacterId, DungeonId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Create a character with rolled stats and play as them.
    New(String),
    /// Switch to an existing character.
    Play(CharacterId),
    Dungeons,
    Enter(DungeonId),
    Sheet,
    Context,
    Abandon,
    /// Unlock runs left `processing` by a crash.
    Recover,
    Action(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Ok(if line.is_empty() {
                Self::Empty
            } else {
                Self::Action(line.to_string())
            });
        };

        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, rest)| (name, rest.trim()));
        match name.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "new" if !rest.is_empty() => Ok(Self::New(rest.to_string())),
            "new" => Err("usage: /new <name>".into()),
            "play" => parse_id(rest, "/play <character id>").map(|id| Self::Play(CharacterId(id))),
            "dungeons" => Ok(Self::Dungeons),
            "enter" => parse_id(rest, "/enter <dungeon id>")
                .and_then(|id| u32::try_from(id).map_err(|_| "dungeon id is too large".into()))
                .map(|id| Self::Enter(DungeonId(id))),
            "sheet" => Ok(Self::Sheet),
            "context" => Ok(Self::Context),
            "abandon" => Ok(Self::Abandon),
            "recover" => Ok(Self::Recover),
            other => Err(format!("unknown command /{other}; try /help")),
        }
    }
}

fn parse_id(text: &str, usage: &str) -> Result<u64, String> {
    text.parse().map_err(|_| format!("usage: {usage}"))
}

pub const HELP: &str = "\
/new <name>        create a character and play as them
/play <id>         switch to an existing character
/dungeons          list dungeons
/enter <id>        start a run
/sheet             character, inventory and run
/context           recent turns of the run
/abandon           give up the current run
/recover           unlock runs stuck in processing
/quit              leave
anything else      an action, e.g. `attack the rat` or `go to room 3`";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_an_action() {
        assert_eq!(
            Command::parse("  attack the rat "),
            Ok(Command::Action("attack the rat".into()))
        );
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn slash_commands_take_arguments() {
        assert_eq!(Command::parse("/new Ayla Stone"), Ok(Command::New("Ayla Stone".into())));
        assert_eq!(Command::parse("/ENTER 2"), Ok(Command::Enter(DungeonId(2))));
        assert_eq!(Command::parse("/play 7"), Ok(Command::Play(CharacterId(7))));
        assert_eq!(Command::parse("/quit"), Ok(Command::Quit));
    }

    #[test]
    fn bad_arguments_explain_usage() {
        assert_eq!(Command::parse("/enter crypt"), Err("usage: /enter <dungeon id>".into()));
        assert!(Command::parse("/new").is_err());
        assert!(Command::parse("/dance").unwrap_err().contains("/help"));
    }
}
