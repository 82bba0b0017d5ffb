use crate::{EventBus, GameError};
use std::fmt::Write as _;
use thiserror::Error;

pub const DANCE_BANNER: &str = "Taxonoman can DANCE!\n \
i am SOOO crushing it!\n  \
♫♪.ılılıll|̲̅̅●̲̅̅|̲̅̅=̲̅̅|̲̅̅●̲̅̅|llılılı.♫♪\n   \
The neck bone predicates the head bone!\n    \
The L bone predicates the foot bone!\n";

pub const HEAD_BOX: &str = "#########\n# Ouch! #\n#########\n";
pub const TAXONOMAN_BOX: &str = "#########\n#  :P   #\n#########\n";

const RULE: &str = "==========================";

/// The classic help screen lists these first, in this order.
const HELP_FIRST: [Command; 8] = [
    Command::Help,
    Command::Dance,
    Command::Stop,
    Command::Start,
    Command::Click,
    Command::Folksonomy,
    Command::Inspiration,
    Command::Draw,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    One,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Dance,
    Folksonomy,
    Draw,
    Stop,
    Start,
    Click,
    Inspiration,
    ClansOfPagoda,
    Banjo,
    Card,
    Jartron,
    Head,
    Taxonoman,
    Flip,
}

impl Command {
    pub const ALL: [Command; 15] = [
        Command::Help,
        Command::Dance,
        Command::Folksonomy,
        Command::Draw,
        Command::Stop,
        Command::Start,
        Command::Click,
        Command::Inspiration,
        Command::ClansOfPagoda,
        Command::Banjo,
        Command::Card,
        Command::Jartron,
        Command::Head,
        Command::Taxonoman,
        Command::Flip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Dance => "dance",
            Command::Folksonomy => "folksonomy",
            Command::Draw => "draw",
            Command::Stop => "stop",
            Command::Start => "start",
            Command::Click => "click",
            Command::Inspiration => "inspiration",
            Command::ClansOfPagoda => "clansOfPagoda",
            Command::Banjo => "banjo",
            Command::Card => "card",
            Command::Jartron => "jartron",
            Command::Head => "head",
            Command::Taxonoman => "taxonoman",
            Command::Flip => "flip",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Command::Click | Command::Flip => Arity::One,
            _ => Arity::None,
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Command::Help => "here we are!",
            Command::Dance => "make the taxonoman dance (:P)",
            Command::Folksonomy => "start the folksonomy tool",
            Command::Draw => "redraw the nodes",
            Command::Stop => "make it stop",
            Command::Start => "start randomly refocusing",
            Command::Click => "activate the click action",
            Command::Inspiration => "find it within",
            Command::ClansOfPagoda => "play clans of pagoda",
            Command::Banjo => "go play banjo",
            Command::Card => "show a banjo card",
            Command::Jartron => "meet jartron",
            Command::Head => "bonk",
            Command::Taxonoman => "summon (or smash) the taxonoman",
            Command::Flip => "flip a banjo card, dealing first if needed",
        }
    }

    fn placeholder(self) -> Option<&'static str> {
        match self {
            Command::Click => Some("[nodeid]"),
            Command::Flip => Some("[slot]"),
            _ => None,
        }
    }

    /// Page a navigation command opens, if any.
    pub fn url(self) -> Option<&'static str> {
        match self {
            Command::Inspiration => Some("https://youtu.be/VWU9sJ2879c"),
            Command::ClansOfPagoda => Some("./clansOfPagoda"),
            Command::Banjo => Some("/banjo"),
            Command::Card => {
                Some("https://raw.githubusercontent.com/antfriend/banjo/master/cards/banjo_01.png")
            }
            Command::Jartron => {
                Some("http://makezine.com/2010/05/10/jartron-the-robot-dances-shoots-las/")
            }
            _ => None,
        }
    }

    /// Fixed console reply for commands whose output does not depend on
    /// their argument or on the outcome.
    pub fn reply(self) -> Option<&'static str> {
        let reply = match self {
            Command::Dance => DANCE_BANNER,
            Command::Folksonomy => "folksonomy now!",
            Command::Draw => "redrawed now!",
            Command::Stop => "ok, i am done now",
            Command::Start => "yeah, start me up",
            Command::Inspiration => "are you inspired now?",
            Command::ClansOfPagoda => "Play Clans Of Pagoda!",
            Command::Banjo => "banjo!",
            Command::Card => "banjo card",
            Command::Jartron => "Jartron the explorer!",
            Command::Head => HEAD_BOX,
            Command::Taxonoman => TAXONOMAN_BOX,
            Command::Help | Command::Click | Command::Flip => return None,
        };
        Some(reply)
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("not a card slot: {0:?}")]
    InvalidSlot(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Whatever carries out commands on behalf of the console.
pub trait CommandHost {
    fn execute(
        &mut self,
        command: Command,
        arg: Option<&str>,
        events: &mut EventBus,
    ) -> Result<String, CommandError>;
}

#[derive(Debug, Clone, Copy)]
pub struct CommandRegistry {
    commands: &'static [Command],
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandRegistry {
    pub fn standard() -> Self {
        Self {
            commands: &Command::ALL,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.commands
            .iter()
            .copied()
            .find(|command| command.name() == name)
    }

    pub fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.iter().copied()
    }

    pub fn help_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let listed = HELP_FIRST
            .into_iter()
            .filter(|command| self.commands.contains(command))
            .chain(self.commands().filter(|command| !HELP_FIRST.contains(command)));
        for command in listed {
            match command.placeholder() {
                Some(arg) => {
                    let _ = writeln!(out, "{} {} = {}", command.name(), arg, command.summary());
                }
                None => {
                    let _ = writeln!(out, "{} = {}", command.name(), command.summary());
                }
            }
        }
        let _ = writeln!(out, "{RULE}");
        out
    }

    /// Runs console input against `host`.
    ///
    /// The first word (when followed by a space) is tried as a command taking
    /// the trimmed remainder; the whole input is then tried as a bare command
    /// and replaces any earlier reply. Failures come back as their message.
    /// Input naming no command yields `None`.
    pub fn interpret<H>(&self, host: &mut H, input: &str, events: &mut EventBus) -> Option<String>
    where
        H: CommandHost + ?Sized,
    {
        let mut reply = None;
        if let Some(split) = input.find(' ').filter(|split| *split > 0) {
            let (word, rest) = input.split_at(split);
            if let Some(command) = self.lookup(word) {
                let arg = match command.arity() {
                    Arity::None => None,
                    Arity::One => Some(rest.trim()),
                };
                match host.execute(command, arg, events) {
                    Ok(text) => reply = Some(text),
                    Err(err) => {
                        tracing::debug!(command = command.name(), %err, "command failed");
                        return Some(err.to_string());
                    }
                }
            }
        }
        if let Some(command) = self.lookup(input) {
            let text = host
                .execute(command, None, events)
                .unwrap_or_else(|err| err.to_string());
            reply = Some(text);
        }
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Command, Option<String>)>,
    }

    impl CommandHost for Recorder {
        fn execute(
            &mut self,
            command: Command,
            arg: Option<&str>,
            _events: &mut EventBus,
        ) -> Result<String, CommandError> {
            self.calls.push((command, arg.map(str::to_string)));
            match command {
                Command::Flip => Err(CommandError::MissingArgument("flip")),
                _ => Ok(command.name().to_string()),
            }
        }
    }

    #[test]
    fn names_are_unique_and_round_trip() {
        let registry = CommandRegistry::standard();
        for command in registry.commands() {
            assert_eq!(registry.lookup(command.name()), Some(command));
        }
        assert_eq!(registry.lookup("Dance"), None);
    }

    #[test]
    fn first_word_gets_trimmed_remainder() {
        let mut host = Recorder::default();
        let reply = CommandRegistry::standard().interpret(
            &mut host,
            "click   git.webbot  ",
            &mut EventBus::default(),
        );
        assert_eq!(reply.as_deref(), Some("click"));
        assert_eq!(
            host.calls,
            vec![(Command::Click, Some("git.webbot".to_string()))]
        );
    }

    #[test]
    fn zero_arity_commands_drop_their_argument() {
        let mut host = Recorder::default();
        CommandRegistry::standard().interpret(&mut host, "dance now", &mut EventBus::default());
        assert_eq!(host.calls, vec![(Command::Dance, None)]);
    }

    #[test]
    fn leading_space_is_not_a_first_word() {
        let mut host = Recorder::default();
        let reply =
            CommandRegistry::standard().interpret(&mut host, " dance", &mut EventBus::default());
        assert_eq!(reply, None);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn errors_become_replies() {
        let mut host = Recorder::default();
        let registry = CommandRegistry::standard();
        let reply = registry.interpret(&mut host, "flip", &mut EventBus::default());
        assert_eq!(reply.as_deref(), Some("flip needs an argument"));
        let reply = registry.interpret(&mut host, "flip 3", &mut EventBus::default());
        assert_eq!(reply.as_deref(), Some("flip needs an argument"));
    }

    #[test]
    fn help_lists_every_command() {
        let help = CommandRegistry::standard().help_text();
        assert!(help.starts_with(RULE));
        assert!(help.ends_with(&format!("{RULE}\n")));
        assert!(help.contains("click [nodeid] = activate the click action"));
        for command in Command::ALL {
            assert!(help.contains(command.name()));
        }
    }

    #[test]
    fn help_opens_with_the_classic_screen() {
        let help = CommandRegistry::standard().help_text();
        let lines: Vec<&str> = help.lines().take(9).collect();
        assert_eq!(
            lines,
            vec![
                RULE,
                "help = here we are!",
                "dance = make the taxonoman dance (:P)",
                "stop = make it stop",
                "start = start randomly refocusing",
                "click [nodeid] = activate the click action",
                "folksonomy = start the folksonomy tool",
                "inspiration = find it within",
                "draw = redraw the nodes",
            ]
        );
        let extras: Vec<&str> = help.lines().skip(9).collect();
        assert_eq!(extras.first(), Some(&"clansOfPagoda = play clans of pagoda"));
    }
}
