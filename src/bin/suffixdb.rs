//! suffixdb: CLI tool for splitting hostnames with the Public Suffix List.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use suffixdb::{
    AHash64, Database, DatabaseConfig, RemoteConfig, RemoteList, UnlistedPolicy, DEFAULT_LIST_URL,
};

#[derive(Parser)]
#[command(name = "suffixdb")]
#[command(version)]
#[command(about = "Split hostnames into TLD, eTLD and eTLD+1 using the Public Suffix List", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the public suffix components of hostnames
    ///
    /// Hostnames are read from the arguments, or one per line from stdin.
    /// Output is tab-separated: host, tld, etld, etld1, icann|private.
    Parse {
        /// Local list file (plain or gzip)
        #[arg(short, long, conflicts_with = "url")]
        list: Option<PathBuf>,

        /// Download the list from this URL
        #[arg(short, long)]
        url: Option<String>,

        /// Result for hostnames whose suffix is unlisted: "empty" or
        /// "whole_hostname" (report the whole hostname as eTLD+1)
        #[arg(long, default_value = "empty")]
        unlisted: UnlistedPolicy,

        /// Download timeout in seconds when refreshing the cached list
        #[arg(short, long, default_value_t = 60)]
        timeout: u64,

        /// Hostnames to parse
        hosts: Vec<String>,
    },

    /// Download the list to a local file
    Fetch {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// List URL
        #[arg(short, long, default_value = DEFAULT_LIST_URL)]
        url: String,

        /// Download timeout in seconds
        #[arg(short, long, default_value_t = 60)]
        timeout: u64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            list,
            url,
            unlisted,
            timeout,
            hosts,
        } => parse_hosts(
            list.as_deref(),
            url.as_deref(),
            unlisted,
            Duration::from_secs(timeout),
            &hosts,
        ),
        Commands::Fetch {
            output,
            url,
            timeout,
        } => fetch_list(&output, &url, Duration::from_secs(timeout)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn open_database(
    list: Option<&Path>,
    url: Option<&str>,
    unlisted: UnlistedPolicy,
    timeout: Duration,
) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::builder()
        .hasher(AHash64::new())
        .config(DatabaseConfig::with_unlisted(unlisted))
        .build()?;

    match (list, url) {
        (Some(path), _) => {
            db.load_file(path)?;
        }
        (None, Some(url)) => {
            db.fetch(url)?;
        }
        (None, None) => {
            let cache = cache_path();
            log::debug!("Using cached list at {}", cache.display());
            RemoteList::new(RemoteConfig::full(cache).with_timeout(timeout)).load_or_fetch(&db)?;
        }
    }
    Ok(db)
}

/// `$XDG_CACHE_HOME/suffixdb/public_suffix_list.dat`, falling back to
/// `~/.cache`, then the system temp directory.
fn cache_path() -> PathBuf {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
        .unwrap_or_else(std::env::temp_dir);
    base.join("suffixdb").join("public_suffix_list.dat")
}

fn parse_hosts(
    list: Option<&Path>,
    url: Option<&str>,
    unlisted: UnlistedPolicy,
    timeout: Duration,
    hosts: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_database(list, url, unlisted, timeout)?.freeze()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut print = |host: &str| -> io::Result<()> {
        let parts = db.parse_str(host);
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            host,
            parts.tld,
            parts.etld,
            parts.etld1,
            if parts.icann { "icann" } else { "private" }
        )
    };

    if hosts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let host = line.trim();
            if !host.is_empty() {
                print(host)?;
            }
        }
    } else {
        for host in hosts {
            print(host.trim())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn fetch_list(
    output: &Path,
    url: &str,
    timeout: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::builder().hasher(AHash64::new()).build()?;
    let mut list = RemoteList::new(RemoteConfig::new(url, output).with_timeout(timeout));
    let stats = list.fetch(&db)?;
    println!(
        "Saved {} rules ({} index entries) to {}",
        stats.lines,
        stats.entries,
        output.display()
    );
    Ok(())
}
