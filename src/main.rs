use autoindex::config::{self, IndexConfig};
use autoindex::index::{self, RunOptions};
use autoindex::render::ApacheRenderer;
use autoindex::{clean, output};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "autoindex")]
#[command(version)]
#[command(about = "Apache-style index.html generator for static file trees")]
#[command(long_about = "\
Apache-style index.html generator for static file trees

Writes an index.html listing into every directory below LOCATION, the way
Apache's mod_autoindex would show it: icon, name, last modified, size.
Pages are only rewritten when their content changes.

Hidden entries, existing index.html files and the icon folder are left out
of the listings by default. Settings are read from LOCATION/.autoindex.toml
when present; run with --gen-config to print a documented default file.")]
struct Cli {
    /// Directory to index
    #[arg(required_unless_present = "gen_config")]
    location: Option<PathBuf>,

    /// Delete every index.html below LOCATION and exit
    #[arg(long)]
    clean: bool,

    /// Only index LOCATION itself, without subdirectories
    #[arg(long)]
    no_recurse: bool,

    /// File extensions to leave out of the listings. A leading dot is
    /// added when missing, so `log` drops `run.log` but keeps `catalog`
    #[arg(long, num_args = 1.., value_name = "EXT")]
    ignore_exts: Vec<String>,

    /// Config file (default: LOCATION/.autoindex.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a documented default config and exit
    #[arg(long)]
    gen_config: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);
    log::debug!("CLI args parsed: {:?}", cli);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let Some(location) = cli.location.as_deref() else {
        return Err("missing LOCATION".into());
    };

    if cli.clean {
        let report = clean::clean_indexes(location)?;
        output::print_clean_output(&report, location);
        return Ok(());
    }

    let config = load_config(location, cli.config.as_deref())?;
    let options = RunOptions::new(!cli.no_recurse, &cli.ignore_exts);

    println!("==> Indexing {}", location.display());
    let report = index::create_indexes(location, &config, &options, &ApacheRenderer)?;
    output::print_index_output(&report);

    Ok(())
}

fn load_config(
    location: &Path,
    explicit: Option<&Path>,
) -> Result<IndexConfig, config::ConfigError> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(config::ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            config::load_config_file(path)
        }
        None => config::load_config(location),
    }
}

/// Warnings and errors by default; `RUST_LOG` still overrides per module.
fn init_logger(verbose: u8, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
