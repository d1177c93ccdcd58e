use clap::Parser;
use notehub::cli::args::{Args, Command};
use std::path::PathBuf;

#[test]
fn given_no_subcommand_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notehub"];

    // Act & Assert
    let result = Args::try_parse_from(args);
    assert!(result.is_err(), "Should fail without subcommand");
}

#[test]
fn given_list_without_options_when_parsing_then_first_page_unfiltered() {
    // Arrange
    let args = vec!["notehub", "list"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { page, search, json } => {
            assert_eq!(page, 1);
            assert_eq!(search, None);
            assert!(!json);
        }
        _ => panic!("Expected List command"),
    }
    assert_eq!(parsed.config, None);
    assert_eq!(parsed.verbose, 0);
}

#[test]
fn given_list_with_page_and_search_when_parsing_then_both_captured() {
    // Arrange
    let args = vec!["notehub", "list", "--page", "3", "-s", "milk", "--json"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::List { page, search, json } => {
            assert_eq!(page, 3);
            assert_eq!(search.as_deref(), Some("milk"));
            assert!(json);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn given_page_zero_when_parsing_then_rejected() {
    // Arrange
    let args = vec!["notehub", "list", "--page", "0"];

    // Act
    let result = Args::try_parse_from(args);

    // Assert
    assert!(result.is_err(), "Pages start at 1");
}

#[test]
fn given_create_with_title_only_when_parsing_then_defaults_apply() {
    // Arrange
    let args = vec!["notehub", "create", "--title", "Buy milk"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Create {
            title,
            content,
            tag,
            json,
        } => {
            assert_eq!(title, "Buy milk");
            assert_eq!(content, "");
            assert_eq!(tag, "Todo");
            assert!(!json);
        }
        _ => panic!("Expected Create command"),
    }
}

#[test]
fn given_create_without_title_when_parsing_then_fails() {
    // Arrange
    let args = vec!["notehub", "create", "--content", "2%"];

    // Act
    let result = Args::try_parse_from(args);

    // Assert
    assert!(result.is_err(), "Title is required");
}

#[test]
fn given_delete_command_when_parsing_then_id_kept_as_text() {
    // Arrange
    let args = vec!["notehub", "delete", "65f1c0ffee"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    match parsed.command {
        Command::Delete { note_id, json } => {
            assert_eq!(note_id, "65f1c0ffee");
            assert!(!json);
        }
        _ => panic!("Expected Delete command"),
    }
}

#[test]
fn given_global_flags_after_subcommand_when_parsing_then_applied() {
    // Arrange
    let args = vec!["notehub", "browse", "-c", "/tmp/notehub.toml", "-vv"];

    // Act
    let parsed = Args::try_parse_from(args).unwrap();

    // Assert
    assert!(matches!(parsed.command, Command::Browse));
    assert_eq!(parsed.config, Some(PathBuf::from("/tmp/notehub.toml")));
    assert_eq!(parsed.verbose, 2);
}
