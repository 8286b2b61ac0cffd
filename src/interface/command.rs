use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Move {
        from: String,
        to: String,
        promotion: Option<char>,
    },
    Board,
    Moves,
    History,
    Status,
    Save(PathBuf),
    Load(PathBuf),
    NewGame,
    Help,
    Quit,
    Unknown(String),
}

/// Two characters shaped like a square: a letter followed by a digit. Range
/// checks are left to the engine so that it reports the invalid coordinate.
fn looks_like_square(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(file), Some(rank), None) if file.is_ascii_alphabetic() && rank.is_ascii_digit()
    )
}

/// Splits the compact `e2e4` / `e7e8q` form into squares and the promotion
/// selector.
fn parse_compact(token: &str) -> Option<Command> {
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        return None;
    }
    let (from, rest) = token.split_at(2);
    let (to, promotion) = rest.split_at(2);
    if !looks_like_square(from) || !looks_like_square(to) {
        return None;
    }
    Some(Command::Move {
        from: from.to_string(),
        to: to.to_string(),
        promotion: promotion.chars().next(),
    })
}

fn parse_move(input: &str, parts: &[&str]) -> Command {
    let unknown = || Command::Unknown(input.to_string());
    match parts {
        [compact] => parse_compact(compact).unwrap_or_else(unknown),
        [from, to, ..] if !looks_like_square(from) || !looks_like_square(to) => unknown(),
        [from, to] => Command::Move {
            from: (*from).to_string(),
            to: (*to).to_string(),
            promotion: None,
        },
        [from, to, promotion] if promotion.chars().count() == 1 => Command::Move {
            from: (*from).to_string(),
            to: (*to).to_string(),
            promotion: promotion.chars().next(),
        },
        _ => unknown(),
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            [] => Self::Unknown(String::new()),
            ["board"] => Self::Board,
            ["moves"] => Self::Moves,
            ["history"] => Self::History,
            ["status"] => Self::Status,
            ["save", path] => Self::Save(PathBuf::from(path)),
            ["load", path] => Self::Load(PathBuf::from(path)),
            ["new"] => Self::NewGame,
            ["help"] => Self::Help,
            ["quit" | "exit"] => Self::Quit,
            _ => parse_move(input, &parts),
        }
    }
}
