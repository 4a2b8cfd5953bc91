//! UCI line protocol: command builders and a parser for engine output.

use chess_core::Side;

/// Evaluation reported by an engine, relative to the side it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    /// Mate in N moves; negative when the side to move is getting mated.
    Mate(i32),
}

impl Score {
    pub fn centipawns(self) -> Option<i32> {
        match self {
            Score::Centipawns(cp) => Some(cp),
            Score::Mate(_) => None,
        }
    }

    /// Convert a score relative to `side_to_move` into white's point of view.
    pub fn white_relative(self, side_to_move: Side) -> Score {
        match (side_to_move, self) {
            (Side::White, score) => score,
            (Side::Black, Score::Centipawns(cp)) => Score::Centipawns(-cp),
            (Side::Black, Score::Mate(n)) => Score::Mate(-n),
        }
    }
}

/// One line of engine output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineLine {
    Id { key: String, value: String },
    Option(String),
    UciOk,
    ReadyOk,
    Info { depth: Option<u32>, score: Option<Score> },
    /// `mv` is `None` for `bestmove (none)` and `bestmove 0000`.
    BestMove { mv: Option<String>, ponder: Option<String> },
    Other(String),
}

pub fn parse_line(line: &str) -> EngineLine {
    let line = line.trim();
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("id") => match tokens.next() {
            Some(key) => EngineLine::Id {
                key: key.to_string(),
                value: tokens.collect::<Vec<_>>().join(" "),
            },
            None => EngineLine::Other(line.to_string()),
        },
        Some("option") => EngineLine::Option(line["option".len()..].trim().to_string()),
        Some("bestmove") => {
            let mv = tokens
                .next()
                .filter(|mv| *mv != "(none)" && *mv != "0000")
                .map(str::to_string);
            let ponder = match (tokens.next(), tokens.next()) {
                (Some("ponder"), Some(p)) => Some(p.to_string()),
                _ => None,
            };
            EngineLine::BestMove { mv, ponder }
        }
        Some("info") => parse_info(line, tokens.collect()),
        _ => EngineLine::Other(line.to_string()),
    }
}

fn parse_info(line: &str, tokens: Vec<&str>) -> EngineLine {
    if tokens.first() == Some(&"string") {
        return EngineLine::Other(line.to_string());
    }
    let mut depth = None;
    let mut score = None;
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                depth = tokens.get(i + 1).and_then(|t| t.parse().ok());
                i += 2;
            }
            "score" => {
                let value = tokens.get(i + 2).and_then(|t| t.parse::<i32>().ok());
                score = match (tokens.get(i + 1).copied(), value) {
                    (Some("cp"), Some(cp)) => Some(Score::Centipawns(cp)),
                    (Some("mate"), Some(n)) => Some(Score::Mate(n)),
                    _ => score,
                };
                i += 3;
            }
            // The principal variation runs to the end of the line
            "pv" => break,
            _ => i += 1,
        }
    }
    EngineLine::Info { depth, score }
}

pub fn set_position(fen: &str) -> String {
    format!("position fen {fen}")
}

pub fn go_movetime(millis: u128) -> String {
    format!("go movetime {}", millis.max(1))
}

pub fn go_depth(depth: u8) -> String {
    format!("go depth {}", depth.max(1))
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
