use checkers_engine::notation::{parse_square, square_name};
use checkers_engine::*;
use std::io::{self, BufRead, Write};
use tracing::Level;

const WEB_ADDR: &str = "127.0.0.1:3000";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut serve_web = false;
    let mut settings_path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--web" => serve_web = true,
            path => settings_path = Some(path.to_string()),
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(if serve_web { Level::INFO } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let settings = match settings_path {
        Some(path) => GameSettings::load(path)?,
        None => GameSettings::default(),
    };

    if serve_web {
        println!("Checkers - Web Edition");
        println!("Open http://{} in a browser", WEB_ADDR);
        let runtime = tokio::runtime::Runtime::new()?;
        return runtime.block_on(web::run_server(WEB_ADDR, settings));
    }

    play_in_terminal(&settings)
}

fn play_in_terminal(settings: &GameSettings) -> Result<(), Box<dyn std::error::Error>> {
    let mut round = GameRound::from_settings(settings)?;
    let (width, height) = (round.board().width(), round.board().height());

    println!("Checkers - enter squares like A3, or 'quit'");
    print!("{}", round.board());
    if let Some(winner) = round.winner() {
        println!("Winner: {} {}", winner, PieceKind::King(winner).glyph());
        return Ok(());
    }
    prompt(&round)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_square(input, width, height) {
            Ok(square) => {
                if round.action(square) {
                    print!("{}", round.board());
                }
            }
            Err(e) => println!("{}", e),
        }

        if let Some(winner) = round.winner() {
            println!("Winner: {} {}", winner, PieceKind::King(winner).glyph());
            return Ok(());
        }
        prompt(&round)?;
    }

    Ok(())
}

fn prompt(round: &GameRound) -> io::Result<()> {
    let player = round.current_player();
    let glyph = PieceKind::Man(player).glyph();
    let height = round.board().height();

    match round.selected() {
        None => println!("{} ({}): select a piece", player, glyph),
        Some(selection) => {
            let targets: Vec<String> = round
                .selected_destinations()
                .into_iter()
                .map(|c| square_name(c, height))
                .collect();
            if round.must_continue_capture() {
                println!(
                    "{} ({}): keep capturing from {} [{}]",
                    player,
                    glyph,
                    square_name(selection.at, height),
                    targets.join(" ")
                );
            } else {
                println!(
                    "{} ({}): move {} to [{}] or select another piece",
                    player,
                    glyph,
                    square_name(selection.at, height),
                    targets.join(" ")
                );
            }
        }
    }
    io::stdout().flush()
}
