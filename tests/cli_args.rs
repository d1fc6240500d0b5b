//! CLI argument parsing tests.

use capi::cli::{Cli, Command, TaskCommand};
use clap::Parser;

#[test]
fn test_cli_parses_processes_with_default_app() {
    let cli = Cli::parse_from(["capi", "processes"]);

    assert!(!cli.json);
    match cli.command {
        Command::Processes { app } => assert_eq!(app, None),
        _ => panic!("Expected Processes command"),
    }
}

#[test]
fn test_cli_parses_stats() {
    let cli = Cli::parse_from(["capi", "stats", "proc-web"]);

    match cli.command {
        Command::Stats { process } => assert_eq!(process, "proc-web"),
        _ => panic!("Expected Stats command"),
    }
}

#[test]
fn test_cli_parses_app_guid() {
    let cli = Cli::parse_from(["capi", "app-guid", "my-app"]);

    match cli.command {
        Command::AppGuid { name } => assert_eq!(name, "my-app"),
        _ => panic!("Expected AppGuid command"),
    }
}

#[test]
fn test_global_json_flag() {
    // --json before subcommand
    let cli = Cli::parse_from(["capi", "--json", "env"]);
    assert!(cli.json);

    // --json after subcommand (global flag)
    let cli = Cli::parse_from(["capi", "droplet", "app-1", "--json"]);
    assert!(cli.json);
}

#[test]
fn test_global_timeout_flag() {
    let cli = Cli::parse_from(["capi", "package", "--timeout", "30"]);
    assert_eq!(cli.timeout, Some(30));

    let cli = Cli::parse_from(["capi", "package"]);
    assert_eq!(cli.timeout, None);
}

#[test]
fn test_task_run_args() {
    let cli = Cli::parse_from([
        "capi",
        "task",
        "run",
        "rake db:migrate",
        "--name",
        "migrate",
        "--app",
        "app-1",
        "--wait",
    ]);

    match cli.command {
        Command::Task {
            action:
                TaskCommand::Run {
                    command,
                    name,
                    droplet,
                    app,
                    wait,
                },
        } => {
            assert_eq!(command, "rake db:migrate");
            assert_eq!(name, Some("migrate".to_string()));
            assert_eq!(droplet, None);
            assert_eq!(app, Some("app-1".to_string()));
            assert!(wait);
        }
        _ => panic!("Expected Task Run command"),
    }
}

#[test]
fn test_task_list_repeatable_filters() {
    let cli = Cli::parse_from([
        "capi", "task", "list", "--state", "FAILED", "--state", "RUNNING", "--name", "migrate",
    ]);

    match cli.command {
        Command::Task {
            action: TaskCommand::List { app, names, states },
        } => {
            assert_eq!(app, None);
            assert_eq!(names, vec!["migrate"]);
            assert_eq!(states, vec!["FAILED", "RUNNING"]);
        }
        _ => panic!("Expected Task List command"),
    }
}

#[test]
fn test_task_get_requires_guid() {
    let result = Cli::try_parse_from(["capi", "task", "get"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_subcommand_rejected() {
    let result = Cli::try_parse_from(["capi", "projects"]);
    assert!(result.is_err());
}
