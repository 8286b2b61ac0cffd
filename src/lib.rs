//! Chess rules engine: a board model plus the logic that decides whether a
//! proposed move is legal, what effect it has on the position and whether a
//! side is in check, checkmate or stalemate. A line-oriented session in
//! [`interface`] drives a game over any text stream.
//!
//! ```
//! use chessrules::chess::game::{Game, Status};
//!
//! let mut game = Game::new();
//! for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
//!     game.play(from, to, None).unwrap();
//! }
//! assert_eq!(
//!     game.status(),
//!     Status::Checkmate {
//!         winner: chessrules::chess::core::Color::Black
//!     }
//! );
//! ```

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::bare_urls
)]

pub mod chess;
pub mod interface;
pub mod perft;

use shadow_rs::shadow;

shadow!(build);

/// Target triple the binary was built for. Produced by `build.rs`.
const TARGET: &str = include_str!(concat!(env!("OUT_DIR"), "/target"));

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the name and version on startup.
pub fn print_engine_info() {
    println!("{} {}", build::PROJECT_NAME, engine_version());
}

/// Prints the build type and target and whether the build is clean.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Target: {TARGET}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
