use super::*;

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["newsdesk", "run"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Run { dry_run: false })
    ));
}

#[test]
fn parses_run_dry_run() {
    let cli = Cli::try_parse_from(["newsdesk", "run", "--dry-run"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Some(Commands::Run { dry_run: true })));
}

#[test]
fn parses_schedule_command() {
    let cli = Cli::try_parse_from(["newsdesk", "schedule"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Some(Commands::Schedule)));
}

#[test]
fn parses_status_command() {
    let cli = Cli::try_parse_from(["newsdesk", "status"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Some(Commands::Status)));
}

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["newsdesk", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli = Cli::try_parse_from(["newsdesk", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["newsdesk"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn db_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["newsdesk", "db"]).is_err());
}

#[test]
fn dry_run_is_not_a_global_flag() {
    assert!(Cli::try_parse_from(["newsdesk", "status", "--dry-run"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
