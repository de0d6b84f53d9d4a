//! FluxFS command-line tool: namespace preview, descriptor inspection and
//! virtual-file reads.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use fluxfs::config::{Settings, SETTINGS_FILE};
use fluxfs::parser::vf::load_vf;
use fluxfs::volume::{Options, Volume};

/// Chunk size used when streaming a virtual file to stdout.
const CAT_CHUNK: u32 = 64 * 1024;

#[derive(Parser)]
#[command(name = "fluxfs", about = "Read-only virtual filesystem over .vf descriptors")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the configured roots and print the virtual directory tree.
    Tree {
        /// Scan-root list (defaults to the settings-file value, then scan.conf).
        #[arg(long)]
        conf: Option<PathBuf>,
    },
    /// Print the contents of a single descriptor.
    Inspect {
        /// Descriptor to load.
        descriptor: PathBuf,
    },
    /// Write a byte range of a virtual file to stdout.
    Cat {
        /// Virtual path of the file within the namespace.
        vpath: String,
        /// Scan-root list (defaults to the settings-file value, then scan.conf).
        #[arg(long)]
        conf: Option<PathBuf>,
        /// First byte to read.
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Bytes to read (defaults to the rest of the file).
        #[arg(long)]
        size: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Tree { conf } => tree(conf),
        Command::Inspect { descriptor } => inspect(descriptor),
        Command::Cat { vpath, conf, offset, size } => cat(vpath, conf, offset, size).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Applies the settings file and CLI overrides, returning the scan-conf
/// location and mount options.
fn configure(conf: Option<PathBuf>) -> Result<(PathBuf, Options), String> {
    let settings = Settings::load(SETTINGS_FILE.as_ref())
        .map_err(|err| format!("cannot load {SETTINGS_FILE}: {err:?}"))?;
    let conf = conf.unwrap_or(settings.mount.conf);
    let options = Options { eager_load: settings.mount.eager_load, ..Options::default() };
    Ok((conf, options))
}

fn build(conf: Option<PathBuf>) -> Result<fluxfs::volume::FluxFs, String> {
    let (conf, options) = configure(conf)?;
    fluxfs::build_volume(&conf, options)
        .map_err(|err| format!("cannot read scan config {}: {err}", conf.display()))
}

fn tree(conf: Option<PathBuf>) -> Result<(), String> {
    let volume = build(conf)?;
    print!("{}", volume.namespace().render());
    Ok(())
}

fn inspect(descriptor: PathBuf) -> Result<(), String> {
    let vf = load_vf(&descriptor)
        .map_err(|err| format!("cannot load {}: {err:?}", descriptor.display()))?;
    print!("{vf}");
    Ok(())
}

async fn cat(
    vpath: String,
    conf: Option<PathBuf>,
    offset: u64,
    size: Option<u64>,
) -> Result<(), String> {
    let volume = build(conf)?;
    let stat = volume
        .get_attr(&vpath)
        .await
        .map_err(|err| format!("{vpath}: {err:?} ({})", err.errno()))?;

    let mut remaining = size.unwrap_or_else(|| stat.size.saturating_sub(offset));
    let mut offset = offset;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    while remaining > 0 {
        let chunk = remaining.min(CAT_CHUNK as u64) as u32;
        let bytes = volume
            .read(&vpath, offset, chunk)
            .await
            .map_err(|err| format!("{vpath}: {err:?} ({})", err.errno()))?;
        if bytes.is_empty() {
            break;
        }
        out.write_all(&bytes).map_err(|err| format!("stdout: {err}"))?;
        offset += bytes.len() as u64;
        remaining -= bytes.len() as u64;
    }
    out.flush().map_err(|err| format!("stdout: {err}"))?;
    Ok(())
}
