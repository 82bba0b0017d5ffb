use crate::{
    Card, Command, CommandError, CommandHost, CommandRegistry, Event, EventBus, GameConfig,
    GameError, GraphInput, GraphSource, Graphy, IgnoreReason, Location, MatchGame, NodeReaction,
    Phase, Player, Position, Selection,
};
use serde::Serialize;

/// Longest stretch of wall-clock time one catch-up will replay. Longer gaps
/// (a page left in the background, a prompt left waiting) count as this
/// much, so periodic timers fire a handful of times rather than once per
/// missed interval.
pub const MAX_CATCH_UP_MS: u64 = 5_000;

/// One site session: the banjo table, the graph and the console that drives
/// both. Front-ends own a `Site` each and feed it clicks, console lines and
/// elapsed time.
pub struct Site {
    registry: CommandRegistry,
    banjo: MatchGame,
    graphy: Graphy,
    source: Box<dyn GraphSource + Send>,
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("banjo", &self.banjo)
            .field("graphy", &self.graphy)
            .finish_non_exhaustive()
    }
}

impl Site {
    pub fn new(
        config: GameConfig,
        seed: u64,
        source: Box<dyn GraphSource + Send>,
    ) -> Result<Self, GameError> {
        Ok(Self {
            registry: CommandRegistry::standard(),
            banjo: MatchGame::new(config, seed)?,
            graphy: Graphy::new(seed.wrapping_add(1)),
            source,
        })
    }

    /// Draws the main graph, as on first page load.
    pub fn boot(&mut self, events: &mut EventBus) {
        self.graphy.draw(self.source.as_ref(), events);
    }

    pub fn registry(&self) -> CommandRegistry {
        self.registry
    }

    pub fn banjo(&self) -> &MatchGame {
        &self.banjo
    }

    pub fn graphy(&self) -> &Graphy {
        &self.graphy
    }

    pub fn interpret(&mut self, input: &str, events: &mut EventBus) -> Option<String> {
        let registry = self.registry;
        registry.interpret(self, input, events)
    }

    pub fn click_card(&mut self, slot: usize, events: &mut EventBus) -> Result<Selection, GameError> {
        self.banjo.click(slot, events)
    }

    pub fn graph_input(&mut self, input: GraphInput, events: &mut EventBus) {
        let reaction = self.graphy.input(input, self.source.as_ref(), events);
        self.fall_back_to_command(reaction, events);
    }

    pub fn advance(&mut self, elapsed_ms: u64, events: &mut EventBus) {
        self.banjo.advance(elapsed_ms, events);
        self.graphy.advance(elapsed_ms, events);
    }

    /// Advances by real time measured by a front-end, capped at
    /// [`MAX_CATCH_UP_MS`].
    pub fn catch_up(&mut self, elapsed_ms: u64, events: &mut EventBus) {
        self.advance(elapsed_ms.min(MAX_CATCH_UP_MS), events);
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        let attract = self.banjo.attract();
        SiteSnapshot {
            phase: self.banjo.phase(),
            generation: self.banjo.generation(),
            matches: self.banjo.matches(),
            pairs: self.banjo.config().pair_count(),
            player: self.banjo.turn().current(),
            two_player: self.banjo.turn().is_two_player(),
            cards: self
                .banjo
                .deck()
                .cards()
                .iter()
                .enumerate()
                .map(|(slot, card)| CardView::of(slot, card))
                .collect(),
            attract: AttractView {
                active: attract.active,
                phrase: attract.phrase.clone(),
                eye: attract.eye,
                font_size_em: attract.font_size_em(),
            },
            graph: GraphView {
                status: self.graphy.status().to_string(),
                selection: self.graphy.selection().to_string(),
                stabilization: self.graphy.stabilization().to_string(),
                nodes: self.graphy.network().ids().map(str::to_string).collect(),
                edges: self.graphy.network().edges().len(),
                editable: self.graphy.network().is_editable(),
                dancing: self.graphy.is_dancing(),
                touring: self.graphy.is_touring(),
            },
        }
    }

    fn click_node(&mut self, id: &str, events: &mut EventBus) {
        let reaction = self.graphy.click(id, self.source.as_ref(), events);
        self.fall_back_to_command(reaction, events);
    }

    /// A node with no graph action of its own runs the console command of
    /// the same name, echoed as if it had been typed.
    fn fall_back_to_command(&mut self, reaction: NodeReaction, events: &mut EventBus) {
        let NodeReaction::Unhandled(id) = reaction else {
            return;
        };
        if self.registry.lookup(&id).is_none() {
            return;
        }
        events.push(Event::Echo { text: id.clone() });
        if let Some(reply) = self.interpret(&id, events) {
            events.push(Event::Echo { text: reply });
        }
    }

    fn flip(&mut self, arg: Option<&str>, events: &mut EventBus) -> Result<String, CommandError> {
        let raw = arg
            .filter(|raw| !raw.is_empty())
            .ok_or(CommandError::MissingArgument("flip"))?;
        let slot = raw
            .parse::<usize>()
            .map_err(|_| CommandError::InvalidSlot(raw.to_string()))?;
        let selection = self.banjo.click(slot, events)?;
        Ok(describe_selection(selection))
    }
}

impl CommandHost for Site {
    fn execute(
        &mut self,
        command: Command,
        arg: Option<&str>,
        events: &mut EventBus,
    ) -> Result<String, CommandError> {
        let source = self.source.as_ref();
        match command {
            Command::Help => return Ok(self.registry.help_text()),
            Command::Dance => self.graphy.dance(events),
            Command::Folksonomy => self.graphy.draw_folksonomy(source, events),
            Command::Draw => self.graphy.draw(source, events),
            Command::Stop => self.graphy.stop(),
            Command::Start => self.graphy.start(events),
            Command::Taxonoman => self.graphy.taxonoman(source, events),
            Command::Click => {
                let id = arg.unwrap_or_default();
                if !id.is_empty() {
                    self.click_node(id, events);
                }
                return Ok(format!("clicking {id}"));
            }
            Command::Flip => return self.flip(arg, events),
            Command::Inspiration
            | Command::ClansOfPagoda
            | Command::Banjo
            | Command::Card
            | Command::Jartron
            | Command::Head => {}
        }
        if let Some(url) = command.url() {
            events.push(Event::Navigate {
                url: url.to_string(),
                new_context: url.starts_with("http"),
            });
        }
        Ok(command.reply().unwrap_or_default().to_string())
    }
}

/// Console wording for the outcome of a banjo click.
pub fn describe_selection(selection: Selection) -> String {
    match selection {
        Selection::Dealing { cards } => format!("dealing {cards} cards"),
        Selection::Ignored(IgnoreReason::AlreadyPending) => "that card is already up".to_string(),
        Selection::Ignored(IgnoreReason::Retired) => "that pair is gone".to_string(),
        Selection::Ignored(IgnoreReason::Resolving) => "hold on, still flipping".to_string(),
        Selection::FirstUp { slot, rank } => format!("card {slot} is a {rank}"),
        Selection::Matched {
            rank, complete, ..
        } => {
            if complete {
                format!("a pair of {rank}s! board cleared, flip any card to deal again")
            } else {
                format!("a pair of {rank}s!")
            }
        }
        Selection::Mismatched { first, second } => {
            format!("no match, {first} and {second} flip back")
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSnapshot {
    pub phase: Phase,
    pub generation: u32,
    pub matches: usize,
    pub pairs: usize,
    pub player: Player,
    pub two_player: bool,
    pub cards: Vec<CardView>,
    pub attract: AttractView,
    pub graph: GraphView,
}

/// A card as a viewer may see it: the rank is only shown face up.
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub slot: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    pub face_up: bool,
    pub tilted: bool,
    pub matched: bool,
    pub location: Location,
    pub origin: Position,
}

impl CardView {
    fn of(slot: usize, card: &Card) -> Self {
        Self {
            slot,
            rank: card.face_up.then(|| card.rank.code()),
            face_up: card.face_up,
            tilted: card.tilted,
            matched: card.matched,
            location: card.location,
            origin: card.origin,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttractView {
    pub active: bool,
    pub phrase: String,
    pub eye: (i32, i32),
    pub font_size_em: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub status: String,
    pub selection: String,
    pub stabilization: String,
    pub nodes: Vec<String>,
    pub edges: usize,
    pub editable: bool,
    pub dancing: bool,
    pub touring: bool,
}
