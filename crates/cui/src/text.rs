use antfriend_core::{CameraOp, CardView, Event, Location, Phase, SiteSnapshot};

pub const GREETING: &str = "@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@\n \
= Antfriend is your friend = \n\
@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@\n\
\"help\" to see a list of commands";

pub const PROMPT: &str = "ant> ";

pub fn format_event(event: &Event) -> String {
    match event {
        Event::GameStarted { generation, cards } => {
            format!("banjo game {generation}: dealing {cards} cards")
        }
        Event::CardDealt { slot } => format!("card {slot} dealt"),
        Event::CardRevealed { slot, rank } => format!("card {slot} turned up: {rank}"),
        Event::PairMatched {
            first,
            second,
            matches,
        } => format!("match! cards {first} and {second} ({matches} pairs)"),
        Event::PairMismatched { first, second } => {
            format!("no match: cards {first} and {second}")
        }
        Event::PairRetired { first, second } => {
            format!("cards {first} and {second} moved to the discard pile")
        }
        Event::PairConcealed { first, second } => {
            format!("cards {first} and {second} flipped back")
        }
        Event::TurnChanged { player } => format!("{}'s turn", player.label()),
        Event::GameCompleted { generation } => {
            format!("banjo game {generation} cleared, click to deal again")
        }
        Event::AttractLooked { x, y } => format!("eye looks at ({x}, {y})"),
        Event::AttractSaid { phrase } => format!("banjo says: {phrase}"),
        Event::AttractStopped { phrase } => format!("banjo says: {phrase}"),
        Event::GraphLoaded { doc, nodes, edges } => {
            format!("graph {} loaded: {nodes} nodes, {edges} edges", doc.path())
        }
        Event::GraphCleared => "graph cleared".to_string(),
        Event::Camera(op) => format_camera(op),
        Event::Status { text } => format!("status: {text}"),
        Event::Selection { text } | Event::Stabilization { text } => text.clone(),
        Event::Alert { message } => format!("alert: {message}"),
        Event::Navigate { url, new_context } => {
            if *new_context {
                format!("open {url} (new window)")
            } else {
                format!("open {url}")
            }
        }
        Event::Echo { text } => text.clone(),
    }
}

fn format_camera(op: &CameraOp) -> String {
    match op {
        CameraOp::Focus { node, scale, .. } => format!("camera focus {node} x{scale}"),
        CameraOp::MoveTo { scale, .. } => format!("camera zoom x{scale}"),
        CameraOp::MoveNode { node, x, y } => format!("node {node} -> ({x}, {y})"),
        CameraOp::Fit { .. } => "camera fit".to_string(),
    }
}

/// True for the chatty animation events a plain log would rather skip.
pub fn is_noise(event: &Event) -> bool {
    matches!(
        event,
        Event::CardDealt { .. } | Event::AttractLooked { .. } | Event::Camera(CameraOp::MoveNode { .. })
    )
}

pub fn phase_label(phase: Phase) -> String {
    match phase {
        Phase::Idle => "idle".to_string(),
        Phase::Dealt => "dealt".to_string(),
        Phase::OneUp(slot) => format!("card {slot} up"),
        Phase::Resolving => "resolving".to_string(),
    }
}

/// Short face for a card cell: rank when up, `##` face down, `..` retired,
/// blank while still in the stack.
pub fn card_face(card: &CardView) -> String {
    if card.matched || card.location == Location::Discard {
        return "..".to_string();
    }
    if card.location == Location::Stack {
        return "  ".to_string();
    }
    match &card.rank {
        Some(rank) if card.tilted => format!("{rank}/"),
        Some(rank) => rank.clone(),
        None => "##".to_string(),
    }
}

/// Plain-text banjo table, `columns` cards per row.
pub fn board_lines(snapshot: &SiteSnapshot, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    snapshot
        .cards
        .chunks(columns)
        .enumerate()
        .map(|(row, cards)| {
            let cells: Vec<String> = cards
                .iter()
                .map(|card| format!("{:>2}[{:<3}]", card.slot, card_face(card)))
                .collect();
            format!("{:>2}: {}", row, cells.join(" "))
        })
        .collect()
}
