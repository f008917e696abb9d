// Command-line surface and command dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dugout_baseball::archetype::Archetype;
use dugout_baseball::evaluation::evaluate_pool;
use dugout_baseball::generation::{
    generate_alternates, generate_archetype_roster, ArchetypeGenerationOptions, Budget,
    Competitiveness, PhilosophyGenerationOptions,
};
use dugout_baseball::philosophy::PhilosophyProfile;
use dugout_baseball::player::Player;
use dugout_baseball::roster::{Roster, RosterExport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::{self, Config};
use crate::ingest;
use crate::report;

#[derive(Debug, Parser)]
#[command(name = "dugout", version, about = "Player evaluation and roster construction")]
pub struct Cli {
    /// Directory holding config/ (and defaults/). Defaults to the current
    /// directory, then the per-user config directory.
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Player files (CSV or JSON). Overrides [data_paths].
    #[arg(long = "players", global = true)]
    pub players: Vec<PathBuf>,

    /// Philosophy used for composite scores. Defaults to
    /// generation.default_philosophy.
    #[arg(long, global = true)]
    pub philosophy: Option<String>,

    /// Log to stderr instead of logs/dugout.log.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Philosophy,
    Archetype,
}

/// Team direction for archetype mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompetitivenessArg {
    Contend,
    Compete,
    Rebuild,
}

impl From<CompetitivenessArg> for Competitiveness {
    fn from(arg: CompetitivenessArg) -> Self {
        match arg {
            CompetitivenessArg::Contend => Competitiveness::Contend,
            CompetitivenessArg::Compete => Competitiveness::Compete,
            CompetitivenessArg::Rebuild => Competitiveness::Rebuild,
        }
    }
}

/// Payroll tier for archetype mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BudgetArg {
    Low,
    Medium,
    High,
}

impl From<BudgetArg> for Budget {
    fn from(arg: BudgetArg) -> Self {
        match arg {
            BudgetArg::Low => Budget::Low,
            BudgetArg::Medium => Budget::Medium,
            BudgetArg::High => Budget::High,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Trade value table for every player
    Value {
        #[arg(long)]
        json: bool,
        /// Only the best N rows
        #[arg(long)]
        top: Option<usize>,
    },
    /// Archetype fit counts, or players matching one archetype
    Archetypes {
        #[arg(long)]
        archetype: Option<String>,
        #[arg(long, default_value_t = 50.0)]
        min_score: f64,
    },
    /// Generate rosters from the player pool
    Generate {
        #[arg(long, value_enum, default_value_t = Mode::Philosophy)]
        mode: Mode,
        /// Archetype key for archetype mode
        #[arg(long)]
        archetype: Option<String>,
        #[arg(long, value_enum, default_value_t = CompetitivenessArg::Compete)]
        competitiveness: CompetitivenessArg,
        #[arg(long, value_enum, default_value_t = BudgetArg::Medium)]
        budget: BudgetArg,
        #[arg(long)]
        seed: Option<u64>,
        /// Number of rosters to generate. Defaults to generation.alternates.
        #[arg(long)]
        alternates: Option<usize>,
        /// Write the best roster's export here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summarize an exported roster against the player pool
    Summary {
        #[arg(long)]
        roster: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Load config and players, then run `cli.command`, writing to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let base_dir = cli
        .base_dir
        .clone()
        .unwrap_or_else(|| config::resolve_base_dir(&cwd));
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    let philosophy_key = cli
        .philosophy
        .clone()
        .unwrap_or_else(|| config.generation.default_philosophy.clone());
    let profile = config
        .registry
        .get(&philosophy_key)
        .ok_or_else(|| {
            anyhow!(
                "unknown philosophy '{}'; known: {}",
                philosophy_key,
                config.registry.keys().join(", ")
            )
        })?
        .clone();

    let files = if cli.players.is_empty() {
        config.player_files()
    } else {
        cli.players.clone()
    };
    let mut pool = ingest::load_players(&files, &config.conversion_options())
        .context("failed to load players")?;
    evaluate_pool(&mut pool, &profile, &config.scoring_context());

    match &cli.command {
        Commands::Value { json, top } => cmd_value(&config, &pool, *json, *top, out),
        Commands::Archetypes {
            archetype,
            min_score,
        } => cmd_archetypes(&config, &pool, archetype.as_deref(), *min_score, out),
        Commands::Generate {
            mode,
            archetype,
            competitiveness,
            budget,
            seed,
            alternates,
            out: out_path,
        } => {
            let request = GenerateRequest {
                mode: *mode,
                archetype: archetype.as_deref(),
                competitiveness: (*competitiveness).into(),
                budget: (*budget).into(),
                seed: *seed,
                alternates: alternates.unwrap_or(config.generation.alternates),
                out_path: out_path.as_deref(),
            };
            cmd_generate(&config, &profile, &pool, &request, out)
        }
        Commands::Summary { roster } => cmd_summary(&config, &pool, roster, out),
    }
}

fn cmd_value(
    config: &Config,
    pool: &[Player],
    json: bool,
    top: Option<usize>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut rows = report::value_rows(pool, &config.valuation);
    if let Some(n) = top {
        rows.truncate(n);
    }
    if json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report::format_value_table(&rows))?;
    }
    Ok(())
}

fn parse_archetype(key: &str) -> anyhow::Result<Archetype> {
    Archetype::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = Archetype::ALL.iter().map(|a| a.key()).collect();
        anyhow!("unknown archetype '{}'; known: {}", key, known.join(", "))
    })
}

fn cmd_archetypes(
    config: &Config,
    pool: &[Player],
    archetype: Option<&str>,
    min_score: f64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match archetype {
        Some(key) => {
            let a = parse_archetype(key)?;
            let matches = report::archetype_matches(pool, a, min_score, &config.sample);
            write!(out, "{}", report::format_archetype_matches(a, &matches))?;
        }
        None => {
            let counts = report::archetype_counts(pool, min_score, &config.sample);
            write!(out, "{}", report::format_archetype_counts(&counts, min_score))?;
        }
    }
    Ok(())
}

struct GenerateRequest<'a> {
    mode: Mode,
    archetype: Option<&'a str>,
    competitiveness: Competitiveness,
    budget: Budget,
    seed: Option<u64>,
    alternates: usize,
    out_path: Option<&'a Path>,
}

fn cmd_generate(
    config: &Config,
    profile: &PhilosophyProfile,
    pool: &[Player],
    req: &GenerateRequest<'_>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if req.alternates == 0 {
        bail!("--alternates must be at least 1");
    }
    let seed = req.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!("Generating with seed {}", seed);

    let (mode, strategy, generated) = match req.mode {
        Mode::Philosophy => {
            let options = PhilosophyGenerationOptions {
                randomness: config.generation.randomness,
            };
            let generated = generate_alternates(
                pool,
                config.roster,
                profile,
                &options,
                &config.scoring_context(),
                req.alternates,
                &mut rng,
            );
            ("philosophy", Some(profile.key.clone()), generated)
        }
        Mode::Archetype => {
            let archetype = req.archetype.map(parse_archetype).transpose()?;
            let options = ArchetypeGenerationOptions {
                archetype,
                competitiveness: req.competitiveness,
                budget: req.budget,
                candidate_pool_size: config.generation.candidate_pool_size,
                thresholds: config.sample,
            };
            let mut generated: Vec<_> = (0..req.alternates)
                .map(|_| generate_archetype_roster(pool, config.roster, &options, &mut rng))
                .collect();
            generated.sort_by(|a, b| b.mean_score.total_cmp(&a.mean_score));
            (
                "archetype",
                archetype.map(|a| a.key().to_string()),
                generated,
            )
        }
    };

    let report =
        report::GenerationReport::new(mode, strategy, seed, pool.len(), &generated, &config.sample);

    if let (Some(path), Some(best)) = (req.out_path, generated.first()) {
        let text = serde_json::to_string_pretty(&best.roster.export())?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write roster to {}", path.display()))?;
        info!("Wrote best roster to {}", path.display());
    }

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn cmd_summary(
    config: &Config,
    pool: &[Player],
    roster_path: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(roster_path)
        .with_context(|| format!("failed to read roster {}", roster_path.display()))?;
    let export: RosterExport = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse roster {}", roster_path.display()))?;

    let roster = Roster::import(&export, pool, config.roster);
    let listed = export.lineup.values().flatten().count()
        + export.bench.len()
        + export.rotation.len()
        + export.bullpen.len();
    if roster.filled_count() < listed {
        writeln!(
            out,
            "note: {} of {} listed players could not be placed",
            listed - roster.filled_count(),
            listed
        )?;
    }
    write!(out, "{}", report::format_summary(&roster.summary(&config.sample)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "dugout",
            "--philosophy",
            "moneyball",
            "generate",
            "--mode",
            "archetype",
            "--archetype",
            "mashers",
            "--seed",
            "7",
            "--budget",
            "low",
        ])
        .unwrap();
        assert_eq!(cli.philosophy.as_deref(), Some("moneyball"));
        match cli.command {
            Commands::Generate {
                mode,
                archetype,
                seed,
                budget,
                competitiveness,
                alternates,
                ..
            } => {
                assert_eq!(mode, Mode::Archetype);
                assert_eq!(archetype.as_deref(), Some("mashers"));
                assert_eq!(seed, Some(7));
                assert_eq!(budget, BudgetArg::Low);
                assert_eq!(competitiveness, CompetitivenessArg::Compete);
                assert_eq!(alternates, None);
            }
            other => panic!("expected Generate, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dugout",
            "value",
            "--json",
            "--players",
            "a.csv",
            "--players",
            "b.json",
            "--log-stderr",
        ])
        .unwrap();
        assert!(cli.log_stderr);
        assert_eq!(cli.players.len(), 2);
        assert!(matches!(cli.command, Commands::Value { json: true, top: None }));
    }

    #[test]
    fn tier_flags_reject_unknown_values() {
        let parse = |flag: &str, value: &str| {
            Cli::try_parse_from(["dugout", "generate", "--mode", "archetype", flag, value])
        };
        assert!(parse("--budget", "infinite").is_err());
        assert!(parse("--competitiveness", "tank").is_err());
        assert!(parse("--competitiveness", "rebuild").is_ok());
    }

    #[test]
    fn tier_args_map_onto_generation_options() {
        assert_eq!(Competitiveness::from(CompetitivenessArg::Rebuild), Competitiveness::Rebuild);
        assert_eq!(Budget::from(BudgetArg::High), Budget::High);
    }

    #[test]
    fn summary_requires_roster() {
        assert!(Cli::try_parse_from(["dugout", "summary"]).is_err());
    }

    #[test]
    fn unknown_archetype_key_is_reported() {
        let err = parse_archetype("sluggers").unwrap_err().to_string();
        assert!(err.contains("mashers"));
    }
}
