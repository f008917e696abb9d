// Configuration loading and parsing (dugout.toml, philosophies.toml).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use dugout_baseball::philosophy::{PhilosophyProfile, PhilosophyRegistry};
use dugout_baseball::player::ConversionOptions;
use dugout_baseball::ratings::{SampleThresholds, ScaleHint};
use dugout_baseball::roster::RosterLayout;
use dugout_baseball::scoring::ScoringContext;
use dugout_baseball::trade_value::ValuationSettings;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory the config was loaded from. Relative data paths resolve
    /// against it.
    pub base_dir: PathBuf,
    pub data_paths: DataPaths,
    pub scale: ScaleHint,
    pub sample: SampleThresholds,
    pub valuation: ValuationSettings,
    pub roster: RosterLayout,
    pub generation: GenerationConfig,
    /// Built-in profiles plus anything from philosophies.toml.
    pub registry: PhilosophyRegistry,
}

impl Config {
    pub fn scoring_context(&self) -> ScoringContext {
        ScoringContext {
            thresholds: self.sample,
            valuation: self.valuation,
        }
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions { scale: self.scale }
    }

    /// Player files named in `[data_paths]`, resolved against `base_dir`.
    pub fn player_files(&self) -> Vec<PathBuf> {
        [&self.data_paths.batters, &self.data_paths.pitchers]
            .into_iter()
            .map(|p| self.resolve(p))
            .collect()
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

// ---------------------------------------------------------------------------
// dugout.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dugout.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DugoutFile {
    data_paths: DataPaths,
    #[serde(default)]
    ratings: RatingsSection,
    #[serde(default)]
    sample: SampleThresholds,
    #[serde(default)]
    valuation: ValuationSettings,
    #[serde(default)]
    roster: RosterLayout,
    generation: GenerationConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RatingsSection {
    #[serde(default)]
    scale: ScaleHint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batters: String,
    pub pitchers: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub default_philosophy: String,
    pub randomness: f64,
    pub candidate_pool_size: usize,
    pub alternates: usize,
}

// ---------------------------------------------------------------------------
// philosophies.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
struct PhilosophiesFile {
    #[serde(default, rename = "profile")]
    profiles: Vec<PhilosophyProfile>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dugout.toml` and
/// (optionally) `config/philosophies.toml`, both relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- dugout.toml (required) ---
    let dugout_path = config_dir.join("dugout.toml");
    let dugout_text = read_file(&dugout_path)?;
    let file: DugoutFile = toml::from_str(&dugout_text).map_err(|e| ConfigError::ParseError {
        path: dugout_path.clone(),
        source: e,
    })?;

    // --- philosophies.toml (optional) ---
    let philosophies_path = config_dir.join("philosophies.toml");
    let custom = if philosophies_path.exists() {
        let text = read_file(&philosophies_path)?;
        let parsed: PhilosophiesFile =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: philosophies_path.clone(),
                source: e,
            })?;
        parsed.profiles
    } else {
        Vec::new()
    };

    let registry = build_registry(custom)?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        data_paths: file.data_paths,
        scale: file.ratings.scale,
        sample: file.sample,
        valuation: file.valuation,
        roster: file.roster,
        generation: file.generation,
        registry,
    };

    validate(&config)?;

    Ok(config)
}

/// Validate custom profiles and merge them over the built-ins. A custom
/// profile with a built-in key replaces it.
fn build_registry(custom: Vec<PhilosophyProfile>) -> Result<PhilosophyRegistry, ConfigError> {
    let mut registry = PhilosophyRegistry::default();
    for profile in custom {
        profile.validate().map_err(|e| ConfigError::ValidationError {
            field: format!("philosophies.{}", profile.key),
            message: e.to_string(),
        })?;
        info!("Registered custom philosophy '{}'", profile.key);
        registry = registry.with_profile(profile);
    }
    Ok(registry)
}

fn copy_error(action: &str, path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::DefaultsCopyError {
        message: format!("{action} {}: {err}", path.display()),
    }
}

/// Shipped files under `defaults/` that seed `config/`. `*.example` files
/// are reference only.
fn is_starter_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) != Some("example")
}

/// Copy `src` to `dst` unless `dst` is already there. Returns whether it
/// copied.
fn copy_if_missing(src: &Path, dst: &Path) -> Result<bool, ConfigError> {
    if dst.exists() {
        return Ok(false);
    }
    std::fs::copy(src, dst).map_err(|e| copy_error("cannot write", dst, e))?;
    Ok(true)
}

/// Seed `config/` from the shipped `defaults/`, never touching files the
/// user already has. Returns the files written, in name order.
///
/// A base dir with only `config/` needs nothing; one with neither is an
/// error.
pub fn seed_config_dir(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults = base_dir.join("defaults");
    let config = base_dir.join("config");

    match (defaults.is_dir(), config.is_dir()) {
        (false, false) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "{} has no defaults/ or config/ directory; pass --base-dir",
                    base_dir.display()
                ),
            })
        }
        (false, true) => return Ok(Vec::new()),
        _ => {}
    }
    std::fs::create_dir_all(&config).map_err(|e| copy_error("cannot create", &config, e))?;

    let mut starters = std::fs::read_dir(&defaults)
        .map_err(|e| copy_error("cannot list", &defaults, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, _>>()
        .map_err(|e| copy_error("cannot list", &defaults, e))?;
    starters.retain(|p| is_starter_file(p));
    starters.sort();

    let mut written = Vec::new();
    for src in starters {
        let Some(name) = src.file_name() else {
            continue;
        };
        let dst = config.join(name);
        if copy_if_missing(&src, &dst)? {
            written.push(dst);
        }
    }
    Ok(written)
}

/// Pick the directory to load from: `cwd` when it holds `config/` or
/// `defaults/`, else the per-user config directory if that has a `config/`,
/// else `cwd` (which then fails with a clear error).
pub fn resolve_base_dir(cwd: &Path) -> PathBuf {
    if cwd.join("config").exists() || cwd.join("defaults").exists() {
        return cwd.to_path_buf();
    }
    match ProjectDirs::from("", "", "dugout") {
        Some(dirs) if dirs.config_dir().join("config").exists() => dirs.config_dir().to_path_buf(),
        _ => cwd.to_path_buf(),
    }
}

/// Copy defaults if needed, then load from `base_dir`.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    for path in seed_config_dir(base_dir)? {
        info!("Initialized {} from defaults", path.display());
    }
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data_paths.batters.trim().is_empty() {
        return Err(invalid("data_paths.batters", "must not be empty"));
    }
    if config.data_paths.pitchers.trim().is_empty() {
        return Err(invalid("data_paths.pitchers", "must not be empty"));
    }

    let innings = config.sample.min_pitcher_innings;
    if !innings.is_finite() || innings < 0.0 {
        return Err(invalid(
            "sample.min_pitcher_innings",
            format!("must be >= 0, got {innings}"),
        ));
    }

    let dpw = config.valuation.dollars_per_war;
    if !dpw.is_finite() || dpw <= 0.0 {
        return Err(invalid(
            "valuation.dollars_per_war",
            format!("must be > 0, got {dpw}"),
        ));
    }

    let roster_fields: &[(&str, usize)] = &[
        ("roster.rotation", config.roster.rotation),
        ("roster.bullpen", config.roster.bullpen),
    ];
    for (name, val) in roster_fields {
        if *val == 0 {
            return Err(invalid(name, "must be > 0"));
        }
    }

    let gen = &config.generation;
    if !gen.randomness.is_finite() || gen.randomness < 0.0 {
        return Err(invalid(
            "generation.randomness",
            format!("must be >= 0, got {}", gen.randomness),
        ));
    }
    if gen.candidate_pool_size == 0 {
        return Err(invalid("generation.candidate_pool_size", "must be > 0"));
    }
    if gen.alternates == 0 {
        return Err(invalid("generation.alternates", "must be > 0"));
    }
    if config.registry.get(&gen.default_philosophy).is_none() {
        return Err(invalid(
            "generation.default_philosophy",
            format!(
                "unknown philosophy '{}'; known: {}",
                gen.default_philosophy,
                config.registry.keys().join(", ")
            ),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
