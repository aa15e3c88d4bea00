//! Terminal presentation: prints what the scheduler reports and reads the
//! operator's commands and auction answers from a shared line reader.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bowlout_core::participant::{Participant, ParticipantId};
use bowlout_core::sink::{AuctionDecision, PresentationSink};
use bowlout_core::stage::Stage;
use bowlout_scheduler::application::query_handlers::ScoreboardView;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

/// Seats per grid row.
const GRID_COLUMNS: usize = 35;

type BoxedReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Line-oriented input shared by the command loop and the auction prompt.
pub struct LineInput {
    lines: tokio::sync::Mutex<Lines<BoxedReader>>,
}

impl LineInput {
    /// Reads from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    /// Reads from any buffered async reader.
    #[must_use]
    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: BoxedReader = Box::new(reader);
        Self {
            lines: tokio::sync::Mutex::new(reader.lines()),
        }
    }

    /// Returns the next line, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn read_line(&self) -> std::io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

impl std::fmt::Debug for LineInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineInput").finish_non_exhaustive()
    }
}

/// An operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the next round.
    Bowl,
    /// Replace the roster from a `name,number` file.
    Load(PathBuf),
    /// Leave the game.
    Quit,
}

/// Parses one line of operator input. An empty line bowls.
#[must_use]
pub fn parse_action(line: &str) -> Option<Action> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" | "b" | "bowl" => Some(Action::Bowl),
        "load" if !rest.is_empty() => Some(Action::Load(PathBuf::from(rest))),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

/// Lays out seat numbers in rows of `columns`; eliminated seats show as `--`.
#[must_use]
pub fn render_grid(participants: &[Participant], columns: usize) -> String {
    let width = participants
        .iter()
        .map(|p| p.id.to_string().len())
        .max()
        .unwrap_or(2);

    participants
        .chunks(columns.max(1))
        .map(|row| {
            row.iter()
                .map(|p| {
                    let label = if p.alive {
                        p.id.to_string()
                    } else {
                        "--".to_owned()
                    };
                    format!("{label:>width$}")
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One status line for the scoreboard.
#[must_use]
pub fn render_status(view: &ScoreboardView) -> String {
    format!(
        "[{}] Total: {}  Remaining: {}  Wickets: {}  |  {}",
        view.stage,
        view.total,
        view.remaining,
        view.wickets,
        view.advance_label()
    )
}

/// `PresentationSink` that writes to a terminal.
pub struct TerminalSink {
    out: Mutex<Box<dyn Write + Send>>,
    input: Arc<LineInput>,
    autoplay: bool,
    seats: Mutex<Vec<Participant>>,
}

impl TerminalSink {
    /// Writes to standard output and reads auction answers from `input`.
    #[must_use]
    pub fn stdout(input: Arc<LineInput>, autoplay: bool) -> Self {
        Self::new(Box::new(std::io::stdout()), input, autoplay)
    }

    /// Writes to `out` and reads auction answers from `input`. With
    /// `autoplay` the auction is always skipped.
    #[must_use]
    pub fn new(out: Box<dyn Write + Send>, input: Arc<LineInput>, autoplay: bool) -> Self {
        Self {
            out: Mutex::new(out),
            input,
            autoplay,
            seats: Mutex::new(Vec::new()),
        }
    }

    /// Prints one line.
    pub fn say(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            warn!("terminal writer poisoned");
            return;
        };
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write to terminal");
        }
    }

    /// Prints the scoreboard status line.
    pub fn status(&self, view: &ScoreboardView) {
        self.say(&render_status(view));
    }

    fn with_seats(&self, update: impl FnOnce(&mut Vec<Participant>)) {
        if let Ok(mut seats) = self.seats.lock() {
            update(&mut seats);
        }
    }

    fn alive_seats(&self) -> Vec<Participant> {
        self.seats
            .lock()
            .map(|seats| seats.iter().filter(|p| p.alive).cloned().collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for TerminalSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSink")
            .field("autoplay", &self.autoplay)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PresentationSink for TerminalSink {
    async fn on_roster_loaded(&self, participants: &[Participant]) {
        self.with_seats(|seats| *seats = participants.to_vec());
        self.say(&format!("Roster loaded: {} players", participants.len()));
        self.say(&render_grid(participants, GRID_COLUMNS));
    }

    async fn on_round_start(&self, batch_size: usize, delay_ms: u64) {
        self.say(&format!("-- Bowling: {batch_size} out, {delay_ms}ms per ball --"));
    }

    async fn on_eliminate(&self, participant: &Participant, message: &str, _display_ms: u64) {
        self.with_seats(|seats| {
            if let Some(seat) = seats.iter_mut().find(|p| p.id == participant.id) {
                seat.alive = false;
            }
        });
        self.say(&format!(
            "  OUT {} {}: {message}",
            participant.id, participant.display_name
        ));
    }

    async fn on_round_end(&self) {
        self.say("");
    }

    async fn on_stage_change(&self, stage: Stage) {
        match stage {
            Stage::FinalTen => {
                self.say("=== FINAL OVER ===");
                for seat in self.alive_seats() {
                    self.say(&format!("  {} {}", seat.id, seat.display_name));
                }
            }
            Stage::AuctionPending => self.say("=== AUCTION: ten remain ==="),
            Stage::FinalSingle => self.say("=== LAST ONE STANDING ==="),
            Stage::Complete => self.say("=== GAME OVER ==="),
            Stage::Bulk => {}
        }
    }

    async fn on_auction_checkpoint(&self, candidates: &[Participant]) -> AuctionDecision {
        for candidate in candidates {
            self.say(&format!("  {} {}", candidate.id, candidate.display_name));
        }
        if self.autoplay {
            info!("autoplay skips the auction");
            return AuctionDecision::Skip;
        }
        if !candidates.iter().any(|p| p.id.is_distinguished()) {
            self.say(&format!(
                "{} is not in the final ten; nothing to auction",
                ParticipantId::DISTINGUISHED
            ));
            return AuctionDecision::Skip;
        }

        self.say(&format!(
            "Auction winner for seat {} (blank to skip):",
            ParticipantId::DISTINGUISHED
        ));
        let answer = match self.input.read_line().await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read auction answer");
                None
            }
        };

        match answer.map(|line| line.trim().to_owned()) {
            Some(name) if !name.is_empty() => {
                self.with_seats(|seats| {
                    if let Some(seat) = seats.iter_mut().find(|p| p.id.is_distinguished()) {
                        seat.display_name.clone_from(&name);
                    }
                });
                AuctionDecision::Confirm(name)
            }
            _ => AuctionDecision::Skip,
        }
    }

    async fn on_winner(&self, participant: &Participant) {
        self.say("****************************************");
        self.say(&format!(
            "  WINNER: {} {}",
            participant.id, participant.display_name
        ));
        self.say("****************************************");
    }
}
