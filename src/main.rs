use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bracket_core::{
    load_template, render, round_name, run_simulations, BracketConfig, Decision,
    InMemoryStatsProvider, SimulationSummary, TournamentResult, TournamentSimulator,
};

const LOG_PATTERN: &str = "{d(%H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

#[derive(Parser, Debug)]
#[clap(name = "bracket-sim", about = "Simulate a single-elimination tournament bracket", version, long_about = None)]
struct Args {
    #[clap(long, short = 'c', help = "Bracket config (TOML) with year, seeds and template")]
    config: PathBuf,
    #[clap(long, short = 's', help = "Season stats (TOML [[team]] tables)")]
    stats: PathBuf,
    #[clap(long, short = 't', help = "Template file, overrides the one named in the config")]
    template: Option<PathBuf>,
    #[clap(long, action = ArgAction::Set, help = "Random seed for coin flips")]
    seed: Option<u64>,
    #[clap(long, short = 'n', default_value_t = 1, help = "Number of simulations; more than one prints title odds")]
    runs: usize,
    #[clap(long, short = 'd', help = "Display template whose [R,Rd,I] cells are filled with team names")]
    display: Option<PathBuf>,
    #[clap(long, default_value = "info", help = "Log level (off, error, warn, info, debug, trace)")]
    log_level: LevelFilter,
    #[clap(long, help = "Also write the log to this file")]
    log_file: Option<PathBuf>,
}

fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> anyhow::Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = log_file {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        config = config.appender(Appender::builder().build("logfile", Box::new(logfile)));
        root = root.appender("logfile");
    }

    log4rs::init_config(config.build(root.build(level))?)?;
    Ok(())
}

fn print_result(result: &TournamentResult) {
    for (round, games) in result.rounds() {
        println!("{}", round_name(round));
        for game in games {
            let flag = if game.outcome.decision == Decision::CoinFlip {
                " (coin flip)"
            } else {
                ""
            };
            println!(
                "  {:<24} def. {:<24}{}",
                game.winner_name(),
                game.loser_name(),
                flag
            );
        }
    }
    println!();
    println!("Champion: {} {}", result.champion_name(), result.champion);
}

fn print_summary(summary: &SimulationSummary) {
    println!("Title odds over {} simulations", summary.runs);
    for (team, titles) in summary.ranked_champions() {
        println!(
            "  {:<24} {:>7} {:>6.2}%",
            team,
            titles,
            100.0 * summary.champion_probability(team)
        );
    }
    println!("Coin flips: {}", summary.tie_breaks);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level, args.log_file.as_deref())?;

    if args.runs == 0 {
        bail!("--runs must be at least 1");
    }

    let config = BracketConfig::from_path(&args.config)
        .with_context(|| format!("loading bracket config {}", args.config.display()))?;

    let template = match args.template.as_ref().or(config.template.as_ref()) {
        Some(path) => path.clone(),
        None => bail!(
            "no template: pass --template or set `template` in {}",
            args.config.display()
        ),
    };
    let games = load_template(&template)
        .with_context(|| format!("loading tournament template {}", template.display()))?;

    let provider = InMemoryStatsProvider::from_path(&args.stats)
        .with_context(|| format!("loading season stats {}", args.stats.display()))?;

    let mut simulator = TournamentSimulator::new(games, config.topology());
    simulator
        .seed(config.year, &config.seeds, &provider)
        .context("seeding bracket")?;

    let predictor = config.efficiency_predictor();

    if args.runs > 1 {
        let summary = run_simulations(&simulator, &predictor, args.runs, args.seed)
            .context("running simulations")?;
        print_summary(&summary);
        return Ok(());
    }

    let mut rng = match args.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let result = simulator
        .run(&predictor, &mut rng)
        .context("simulating tournament")?;
    print_result(&result);

    if let Some(display) = &args.display {
        let text = fs::read_to_string(display)
            .with_context(|| format!("reading display template {}", display.display()))?;
        println!();
        println!("{}", render(&text, &result.state)?);
    }

    Ok(())
}
