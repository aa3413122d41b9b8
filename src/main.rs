use hexed::events;
use hexed::session::Session;
use hexed::store::StoreError;
use hexed::theme::Theme;
use hexed::ui_state::UIState;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

enum CliCommand {
    Version,
    Help,
    Edit(String),
}

/// Exactly one file to edit; anything extra is an error, not silently the
/// last one to appear.
fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut file_to_edit = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--version" | "-v" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            arg if arg.starts_with('-') => {
                return Err(format!("Error: Invalid command line option: {}", arg));
            }
            arg => {
                if file_to_edit.is_some() {
                    return Err(format!("Error: Unexpected extra argument: {}", arg));
                }
                file_to_edit = Some(arg.to_string());
            }
        }
    }
    file_to_edit
        .map(CliCommand::Edit)
        .ok_or_else(|| format!("Usage: {} <FILE>", env!("CARGO_PKG_NAME")))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let path = match parse_args(&args) {
        Ok(CliCommand::Version) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(CliCommand::Help) => {
            println!("Usage: {} <FILE>", env!("CARGO_PKG_NAME"));
            println!();
            println!("Edit FILE in a hex/ascii split view.");
            println!();
            println!("Options:");
            println!("    --help, -h       Print this help message");
            println!("    --version, -v    Print version information");
            println!();
            println!("Set HEXED_LOG=1 to write a debug log to hexed.log.");
            return Ok(());
        }
        Ok(CliCommand::Edit(path)) => path,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    if std::env::var_os("HEXED_LOG").is_some() {
        let _ = simplelog::WriteLogger::init(
            log::LevelFilter::Debug,
            simplelog::Config::default(),
            std::fs::File::create("hexed.log")?,
        );
    }

    let session = match Session::open(&path) {
        Ok(session) => session,
        Err(StoreError::NotFound(_)) => {
            eprintln!("File does not exist: {}", path);
            std::process::exit(1);
        }
        Err(StoreError::Empty(_)) => {
            eprintln!("File is empty, nothing to edit: {}", path);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error opening file: {}", e);
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ui_state = UIState::new(Theme::default());

    let res = events::run_app(&mut terminal, session, ui_state);

    // Restore terminal before reporting any error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("hexed")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn a_single_file_argument_parses() {
        let result = parse_args(&args(&["data.bin"]));
        assert!(matches!(result, Ok(CliCommand::Edit(ref p)) if p == "data.bin"));
    }

    #[test]
    fn a_second_file_argument_is_rejected() {
        let result = parse_args(&args(&["a.bin", "b.bin"]));
        assert!(matches!(result, Err(ref m) if m.contains("b.bin")));
    }

    #[test]
    fn unknown_options_are_rejected() {
        let result = parse_args(&args(&["--frobnicate"]));
        assert!(matches!(result, Err(ref m) if m.contains("--frobnicate")));
    }

    #[test]
    fn no_file_argument_prints_usage() {
        let result = parse_args(&args(&[]));
        assert!(matches!(result, Err(ref m) if m.starts_with("Usage:")));
    }
}
