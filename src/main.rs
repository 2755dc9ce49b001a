//! Commander Tracker entry point
//!
//! Native builds run the command-line front-end. The web build starts from
//! `commander_tracker::web::start` instead.

#[cfg(not(target_arch = "wasm32"))]
mod cli_app {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, bail};
    use chrono::{Local, NaiveDate};
    use clap::{Parser, Subcommand};
    use inquire::Confirm;

    use commander_tracker::scoreboard::{leaders, standings};
    use commander_tracker::{
        FileBackend, LogLevel, Notice, Registration, Settings, Tracker, TrackerError, platform,
    };

    /// Score tracker for Commander game nights
    #[derive(Parser, Debug)]
    #[command(name = "commander-tracker")]
    #[command(about = "Score tracker for Commander game nights")]
    #[command(version)]
    pub struct Cli {
        /// Directory holding players.json, history.json, rules.json and seasons.json
        #[arg(long, global = true)]
        pub data_dir: Option<PathBuf>,

        /// Don't ask before resetting scores or archiving a season
        #[arg(short, long, global = true)]
        pub yes: bool,

        #[command(subcommand)]
        pub command: Option<Commands>,
    }

    #[derive(Subcommand, Debug)]
    pub enum Commands {
        /// Show the scoreboard
        Players,
        /// Register a new player
        Add { name: String },
        /// Remove a player
        Remove { name: String },
        /// Raise a player's score
        Inc {
            name: String,
            #[arg(long, default_value_t = 1)]
            by: i64,
        },
        /// Lower a player's score
        Dec {
            name: String,
            #[arg(long, default_value_t = 1)]
            by: i64,
        },
        /// Apply a rule to a player and log it
        Apply { player: String, rule: String },
        /// Set every score to 0
        Reset,
        /// Archive the scores as a new season, then reset scores and the log
        Archive,
        /// Show the game log, most recent first
        History,
        /// List the active rules
        Rules,
        /// List archived seasons
        Seasons,
        /// Show or change stored settings
        Config {
            /// Default data directory
            #[arg(long)]
            data_dir: Option<PathBuf>,
            /// Ask before destructive actions (true/false)
            #[arg(long)]
            confirm: Option<bool>,
            /// error, warn, info, debug or trace
            #[arg(long, value_parser = parse_log_level)]
            log_level: Option<LogLevel>,
        },
    }

    fn parse_log_level(s: &str) -> std::result::Result<LogLevel, String> {
        LogLevel::from_str(s).ok_or_else(|| format!("unknown log level: {}", s))
    }

    fn init_logging(level: LogLevel) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
            .init();
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let settings_path = platform::settings_path();
        let (settings, problem) = match Settings::read(&settings_path) {
            Ok(settings) => (settings.unwrap_or_default(), None),
            Err(reason) => (Settings::default(), Some(reason)),
        };
        init_logging(settings.log_level);
        if let Some(reason) = problem {
            log::warn!("Ignoring corrupt settings {}: {}", settings_path.display(), reason);
        }

        let Some(command) = cli.command else {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            return Ok(());
        };

        if let Commands::Config {
            data_dir,
            confirm,
            log_level,
        } = command
        {
            return configure(&settings_path, settings, data_dir, confirm, log_level);
        }

        let data_dir = cli
            .data_dir
            .unwrap_or_else(|| settings.resolved_data_dir());
        let backend = FileBackend::open(&data_dir)
            .with_context(|| format!("opening data directory {}", data_dir.display()))?;
        let mut tracker = Tracker::open(backend).context("writing rules")?;
        log::debug!("Using data directory {}", data_dir.display());

        let confirm = settings.confirm_destructive && !cli.yes;
        execute(&mut tracker, command, confirm)
    }

    /// Print a notice, or a refusal for actions the tracker declined.
    /// Storage failures are returned as errors.
    fn notify(result: std::result::Result<Notice, TrackerError>) -> Result<()> {
        match result {
            Ok(notice) => println!("{}", notice),
            Err(TrackerError::Storage(e)) => return Err(e).context("saving tracker data"),
            Err(refusal) => eprintln!("{}", refusal),
        }
        Ok(())
    }

    fn ask(question: &str) -> Result<bool> {
        Confirm::new(question)
            .with_default(false)
            .prompt()
            .context("reading confirmation")
    }

    pub fn execute(
        tracker: &mut Tracker<FileBackend>,
        command: Commands,
        confirm: bool,
    ) -> Result<()> {
        match command {
            Commands::Players => print_scoreboard(tracker),
            Commands::Add { name } => match tracker.add_player(&name)? {
                Registration::Added(name) => println!("{}", Notice::PlayerAdded(name)),
                Registration::Blank => eprintln!("Enter a player name."),
                Registration::Duplicate(name) => eprintln!("{} is already playing.", name),
            },
            Commands::Remove { name } => {
                if tracker.delete_player(&name)? {
                    println!("{} removed.", name);
                } else {
                    eprintln!("No player named {}.", name);
                }
            }
            Commands::Inc { name, by } => adjust(tracker, &name, by)?,
            Commands::Dec { name, by } => adjust(tracker, &name, by.saturating_neg())?,
            Commands::Apply { player, rule } => notify(tracker.apply_rule(&player, &rule))?,
            Commands::Reset => {
                if confirm && !ask("Set all scores to 0?")? {
                    println!("Cancelled.");
                    return Ok(());
                }
                notify(tracker.reset_all_scores())?;
            }
            Commands::Archive => archive(tracker, Local::now().date_naive(), confirm)?,
            Commands::History => {
                if tracker.history().is_empty() {
                    println!("No games logged yet.");
                }
                for entry in tracker.history() {
                    println!("{}", entry);
                }
            }
            Commands::Rules => {
                println!("Active rules:");
                for (rule, points) in tracker.rules().iter() {
                    println!("  • {}: {} pts", rule, points);
                }
            }
            Commands::Seasons => print_seasons(tracker),
            Commands::Config { .. } => bail!("config runs without opening the data directory"),
        }
        Ok(())
    }

    /// Archive under the label for `date`, the same one the confirmation shows
    fn archive(tracker: &mut Tracker<FileBackend>, date: NaiveDate, confirm: bool) -> Result<()> {
        if tracker.players().is_empty() {
            eprintln!("{}", TrackerError::NoPlayers);
            return Ok(());
        }
        let label = tracker.next_season_label_on(date);
        if confirm && !ask(&format!("Save season as '{}' and reset scores?", label))? {
            println!("Cancelled.");
            return Ok(());
        }
        notify(tracker.archive_current_season_on(date))
    }

    fn adjust(tracker: &mut Tracker<FileBackend>, name: &str, delta: i64) -> Result<()> {
        match tracker.adjust_score(name, delta)? {
            Some(score) => println!("{}: {} pts", name, score),
            None => eprintln!("No player named {}.", name),
        }
        Ok(())
    }

    fn print_scoreboard(tracker: &Tracker<FileBackend>) {
        let sorted = tracker.players_by_score();
        if sorted.is_empty() {
            println!("No players yet. Add one with `commander-tracker add <name>`.");
            return;
        }
        let rows = standings(&sorted);
        let top = leaders(&rows).len();
        for (i, row) in rows.iter().enumerate() {
            let marker = if i < top && row.score > 0 { "*" } else { " " };
            println!("{}{:>3}. {:<24} {:>5} pts", marker, row.rank, row.name, row.score);
        }
    }

    fn print_seasons(tracker: &Tracker<FileBackend>) {
        let seasons = tracker.seasons_by_label();
        if seasons.is_empty() {
            println!("No seasons archived yet.");
            return;
        }
        for (label, snapshot) in seasons {
            println!("{}", label);
            for row in standings(&snapshot.sorted_by_score()) {
                println!("  {:>3}. {}: {}", row.rank, row.name, row.score);
            }
        }
    }

    fn configure(
        path: &Path,
        mut settings: Settings,
        data_dir: Option<PathBuf>,
        confirm: Option<bool>,
        log_level: Option<LogLevel>,
    ) -> Result<()> {
        let changed = data_dir.is_some() || confirm.is_some() || log_level.is_some();
        if let Some(dir) = data_dir {
            settings.data_dir = Some(dir);
        }
        if let Some(confirm) = confirm {
            settings.confirm_destructive = confirm;
        }
        if let Some(level) = log_level {
            settings.log_level = level;
        }
        if changed {
            settings
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Settings saved to {}", path.display());
        }

        println!("data dir:            {}", settings.resolved_data_dir().display());
        println!("confirm destructive: {}", settings.confirm_destructive);
        println!("log level:           {}", settings.log_level.as_str());
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::TempDir;

        fn open(dir: &TempDir) -> Tracker<FileBackend> {
            Tracker::open(FileBackend::open(dir.path()).unwrap()).unwrap()
        }

        #[test]
        fn test_parse_apply() {
            let cli = Cli::try_parse_from([
                "commander-tracker",
                "--data-dir",
                "/tmp/x",
                "apply",
                "Alice",
                "Win a game",
            ])
            .unwrap();
            assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
            let Some(Commands::Apply { player, rule }) = cli.command else {
                panic!("expected the apply command");
            };
            assert_eq!(player, "Alice");
            assert_eq!(rule, "Win a game");
        }

        #[test]
        fn test_parse_dec_and_yes() {
            let args = ["commander-tracker", "dec", "Bob", "--by", "3", "-y"];
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(cli.yes);
            assert!(matches!(cli.command, Some(Commands::Dec { by: 3, .. })));
        }

        #[test]
        fn test_parse_config_log_level() {
            let parse = |level: &str| {
                Cli::try_parse_from(["commander-tracker", "config", "--log-level", level])
            };
            assert!(matches!(
                parse("debug").unwrap().command,
                Some(Commands::Config {
                    log_level: Some(LogLevel::Debug),
                    ..
                })
            ));
            assert!(parse("loud").is_err());
        }

        #[test]
        fn test_execute_round() {
            let dir = TempDir::new().unwrap();
            let mut tracker = open(&dir);
            for name in ["Alice", "Bob"] {
                execute(&mut tracker, Commands::Add { name: name.into() }, false).unwrap();
            }
            execute(
                &mut tracker,
                Commands::Apply {
                    player: "Alice".into(),
                    rule: "Win a game".into(),
                },
                false,
            )
            .unwrap();
            execute(&mut tracker, Commands::Dec { name: "Bob".into(), by: 2 }, false).unwrap();
            assert_eq!(tracker.players().score("Alice"), Some(1));
            assert_eq!(tracker.players().score("Bob"), Some(-2));

            execute(&mut tracker, Commands::Archive, false).unwrap();
            let reopened = open(&dir);
            assert_eq!(reopened.seasons().len(), 1);
            assert_eq!(reopened.players().score("Alice"), Some(0));
            assert!(reopened.history().is_empty());
        }

        #[test]
        fn test_execute_refusals_are_not_errors() {
            let dir = TempDir::new().unwrap();
            let mut tracker = open(&dir);
            execute(&mut tracker, Commands::Archive, false).unwrap();
            execute(
                &mut tracker,
                Commands::Apply {
                    player: "Nobody".into(),
                    rule: "Win a game".into(),
                },
                false,
            )
            .unwrap();
            execute(&mut tracker, Commands::Add { name: "  ".into() }, false).unwrap();
            assert!(tracker.seasons().is_empty());
            assert!(tracker.players().is_empty());
        }

        #[test]
        fn test_archive_stores_the_label_for_its_date() {
            let dir = TempDir::new().unwrap();
            let mut tracker = open(&dir);
            tracker.add_player("Alice").unwrap();
            let day = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
            let label = tracker.next_season_label_on(day);

            archive(&mut tracker, day, false).unwrap();
            assert!(open(&dir).seasons().get(&label).is_some());
        }

        #[test]
        fn test_execute_rejects_config() {
            let dir = TempDir::new().unwrap();
            let mut tracker = open(&dir);
            let config = Commands::Config {
                data_dir: None,
                confirm: None,
                log_level: None,
            };
            assert!(execute(&mut tracker, config, false).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is commander_tracker::web::start, this is just to satisfy the compiler
}
