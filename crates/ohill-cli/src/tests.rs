use super::*;

use ohill_core::{Meal, MenuDocument, MenuItem, MenuStation};

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["ohill-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_menu_with_defaults() {
    let cli = Cli::try_parse_from(["ohill-cli", "menu"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Menu { output, no_write }) => {
            assert_eq!(output, PathBuf::from("ohill_menu.json"));
            assert!(!no_write);
        }
        other => panic!("expected menu command, got {other:?}"),
    }
}

#[test]
fn parses_menu_output_and_no_write() {
    let cli = Cli::try_parse_from(["ohill-cli", "menu", "--output", "out/today.json", "--no-write"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Menu { output, no_write }) => {
            assert_eq!(output, PathBuf::from("out/today.json"));
            assert!(no_write);
        }
        other => panic!("expected menu command, got {other:?}"),
    }
}

#[test]
fn parses_dump_defaults() {
    let cli = Cli::try_parse_from(["ohill-cli", "dump"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Dump {
            dir: None,
            split: false
        })
    ));
}

#[test]
fn parses_dump_dir_and_split() {
    let cli = Cli::try_parse_from(["ohill-cli", "dump", "--dir", "captures", "--split"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Dump { dir, split }) => {
            assert_eq!(dir, Some(PathBuf::from("captures")));
            assert!(split);
        }
        other => panic!("expected dump command, got {other:?}"),
    }
}

#[test]
fn rejects_unknown_command() {
    assert!(Cli::try_parse_from(["ohill-cli", "serve"]).is_err());
}

#[test]
fn render_and_write_menu_round_trip_to_disk() {
    let document = MenuDocument {
        venue: "O'Hill".to_string(),
        date: "2025-09-05".to_string(),
        generated_at: "2025-09-05T12:00:00Z".to_string(),
        meals: vec![Meal {
            name: "Breakfast".to_string(),
            stations: vec![MenuStation {
                name: "Hearth".to_string(),
                items: vec![MenuItem {
                    title: "Crêpes".to_string(),
                    tags: vec![],
                    allergens: vec!["Eggs".to_string()],
                    notes: None,
                }],
            }],
        }],
    };
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(menu::DEFAULT_OUTPUT);

    let text = menu::render(&document).expect("render");
    menu::write_menu(&text, &path).expect("write");

    let written = std::fs::read_to_string(&path).expect("read back");
    assert!(written.contains("\"title\": \"Crêpes\""), "non-ASCII kept unescaped");
    let back: MenuDocument = serde_json::from_str(&written).expect("parse");
    assert_eq!(back, document);
}

#[test]
fn write_menu_reports_missing_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = menu::write_menu("{}", &dir.path().join("nope/menu.json")).unwrap_err();
    assert!(err.to_string().contains("failed to write"), "got {err}");
}
