use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "chessrules";

#[test]
fn banner_and_board() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("quit\n")
            .assert()
            .success()
            .stdout(
                contains("chessrules")
                    .and(contains("8 r n b q k b n r"))
                    .and(contains("  a b c d e f g h")),
            ),
    );
}

#[test]
fn human_game() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");

    drop(
        cmd.write_stdin("f2 f3\ne7 e5\ng2 g4\ne2 e5\nd8h4\nhistory\nstatus\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("error: illegal move:")
                    .and(contains("black: Qd8h4#"))
                    .and(contains("1. f2f3 e7e5\n2. g2g4 Qd8h4#"))
                    .and(contains("checkmate, black wins; white to move")),
            ),
    );
}

#[test]
fn computer_opponent() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--black", "computer", "--seed", "42"]);

    drop(
        cmd.write_stdin("e2 e4\nhistory\n")
            .assert()
            .success()
            .stdout(contains("white: e2e4").and(contains("black: ")).and(contains("1. e2e4 "))),
    );
}

#[test]
fn custom_position() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--fen", "k7/8/1Q6/8/8/8/8/7K b - -"]);

    drop(
        cmd.write_stdin("status\nmoves\n")
            .assert()
            .success()
            .stdout(contains("stalemate, draw; black to move")),
    );
}

#[test]
fn invalid_configuration() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--fen", "not a position"]);
    drop(cmd.assert().failure().stderr(contains("invalid position")));

    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--white", "robot"]);
    drop(cmd.assert().failure());

    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args(["--load", "game.json", "--fen", "8/8/8/8/8/8/8/8"]);
    drop(cmd.assert().failure());
}
