//! `nac-advisor`: recommend NAC templates from the command line

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use nac_engine::{CatalogSnapshot, RecommendationEngine};
use nac_model::{EngineConfig, RecommendationContext};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let catalog_arg = Arg::new("catalog")
        .long("catalog")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Template catalog (.json, .yaml or .yml)");

    Command::new("nac-advisor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Recommend NAC deployment templates for an organization")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format (filtered by RUST_LOG)"),
        )
        .subcommand(
            Command::new("recommend")
                .about("Score, rank and plan templates for a context")
                .arg(catalog_arg.clone())
                .arg(
                    Arg::new("context")
                        .long("context")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Recommendation context (.json, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Engine configuration (.toml, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Print single-line JSON"),
                ),
        )
        .subcommand(
            Command::new("check-catalog")
                .about("Validate a catalog and report unresolved dependencies")
                .arg(catalog_arg),
        )
        .subcommand(Command::new("print-config").about("Print the default engine configuration"))
}

fn init_logging(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing --{name}"))
}

fn load_context(path: &Path) -> Result<RecommendationContext> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading context {}", path.display()))?;

    let context = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&raw)?,
        Some("yaml" | "yml") => serde_yaml::from_str(&raw)?,
        other => bail!(
            "unsupported context format `{}`",
            other.unwrap_or("<none>")
        ),
    };
    Ok(context)
}

fn recommend(args: &ArgMatches) -> Result<()> {
    let catalog_path = path_arg(args, "catalog")?;
    let snapshot = CatalogSnapshot::load(catalog_path)
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;

    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let context = load_context(path_arg(args, "context")?)?;
    let engine = RecommendationEngine::new(Arc::new(snapshot), config)?;
    let result = engine.generate(&context)?;

    let output = if args.get_flag("compact") {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");
    Ok(())
}

fn check_catalog(args: &ArgMatches) -> Result<()> {
    let path = path_arg(args, "catalog")?;
    let snapshot = CatalogSnapshot::load(path)
        .with_context(|| format!("loading catalog {}", path.display()))?;

    println!("version:     {}", snapshot.version());
    println!("fingerprint: {}", snapshot.fingerprint());
    println!("templates:   {}", snapshot.len());

    let unresolved: BTreeSet<String> = snapshot
        .templates()
        .iter()
        .flat_map(|t| {
            t.metadata()
                .dependencies
                .iter()
                .filter(|d| !snapshot.contains(d))
                .map(move |d| format!("{} -> {d}", t.id()))
        })
        .collect();

    if unresolved.is_empty() {
        println!("dependencies: all resolved");
    } else {
        println!("unresolved dependencies:");
        for line in &unresolved {
            println!("  {line}");
        }
    }
    Ok(())
}

fn print_config() -> Result<()> {
    print!("{}", toml::to_string_pretty(&EngineConfig::default())?);
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    let log_format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_logging(log_format);

    match matches.subcommand() {
        Some(("recommend", args)) => recommend(args),
        Some(("check-catalog", args)) => check_catalog(args),
        Some(("print-config", _)) => print_config(),
        _ => bail!("unknown command"),
    }
}
