use clap::Parser;
use shortener_config::cli::{Cli, Commands};

#[test]
fn test_parse_check() {
    let cli = Cli::try_parse_from(["shortener-config", "check", "--init-logging"]).unwrap();
    assert!(!cli.json);
    match cli.command {
        Commands::Check(args) => assert!(args.init_logging),
        Commands::Show(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_show_with_filter_and_global_json() {
    let cli = Cli::try_parse_from(["shortener-config", "show", "--filter", "db_", "--json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Show(args) => assert_eq!(args.filter.as_deref(), Some("db_")),
        Commands::Check(_) => panic!("Wrong command"),
    }
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["shortener-config"]).is_err());
    assert!(Cli::try_parse_from(["shortener-config", "resolve"]).is_err());
}
