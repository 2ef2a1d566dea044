#![forbid(unsafe_code)]

//! permart CLI: verify UA permission artifacts and inspect their canonical form.

use clap::{Parser, Subcommand};
use permart::config::Config;
use permart::{Error, Handle};
use permart_artifact::{Fence, FlightParams, RawDateTime};
use permart_dsig::VerifyContext;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(
    name = "permart",
    about = "Verify signed drone permission artifacts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a permission artifact and print its geofence and flight window
    Verify {
        /// Artifact file
        file: PathBuf,

        /// Issuer public key (PEM or DER, auto-detected)
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,

        /// The file holds plain XML rather than base64
        #[arg(long)]
        raw: bool,

        /// Configuration file (default: ./permart.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the canonical bytes the verifier digests
    Canon {
        /// Artifact file (plain XML)
        file: PathBuf,

        /// Print canonical SignedInfo instead of the permission body
        #[arg(long = "signed-info")]
        signed_info: bool,

        /// Decode the file from base64 first
        #[arg(long)]
        base64: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List supported algorithms and key formats
    Info,
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Verify { verbose, .. } | Commands::Canon { verbose, .. } => *verbose,
        Commands::Info => false,
    };
    let log_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Verify {
            file,
            key,
            raw,
            config,
            verbose,
        } => cmd_verify(&file, key, raw, config.as_deref(), verbose),

        Commands::Canon {
            file,
            signed_info,
            base64,
            verbose: _,
        } => cmd_canon(&file, signed_info, base64),

        Commands::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e} (status {})", e.status_code());
        process::exit(1);
    }
}

fn cmd_verify(
    file: &Path,
    key: Option<PathBuf>,
    raw: bool,
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<(), Error> {
    let config = Config::resolve(config_path)?;
    let key_path = key.or(config.issuer_key).ok_or_else(|| {
        Error::Config("no issuer key: pass --key or set issuer_key in the config file".into())
    })?;
    let is_base64 = config.base64 && !raw;

    let key = permart_keys::load_key_file(&key_path)?;
    let data = read_file(file)?;

    if verbose {
        eprintln!("Verifying: {} (issuer key {})", file.display(), key_path.display());
    }

    let mut handle = Handle::new(VerifyContext::new(key).with_debug(verbose));
    handle.set(&data, is_base64)?;

    println!("OK");
    if let Some(fence) = handle.fence() {
        print_fence(fence);
    }
    if let Some(params) = handle.flight_params() {
        print_params(params, config.normalize_times);
    }
    Ok(())
}

fn cmd_canon(file: &Path, signed_info: bool, is_base64: bool) -> Result<(), Error> {
    let data = read_file(file)?;
    let data = if is_base64 {
        permart_dsig::decode_base64(&data)
            .map_err(|e| Error::ParseFailed(format!("base64: {e}")))?
    } else {
        data
    };

    let xml = permart_xml::XmlDocument::parse_bytes(&data)?;
    let doc = xml.parse_doc()?;
    let spans = permart_dsig::signed_spans(&doc)?;
    log::debug!(
        "SignedInfo {:?}, body {:?}, tail {:?}",
        spans.signed_info,
        spans.body,
        spans.tail
    );
    let canonical = if signed_info {
        permart_dsig::pre_digest_signed_info(&doc)?
    } else {
        permart_dsig::pre_digest_body(&doc)?
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&canonical)?;
    stdout.flush()?;
    Ok(())
}

fn cmd_info() -> Result<(), Error> {
    println!("permart: UA permission artifact verifier");
    println!();
    println!("Signature:");
    println!("  {}", permart_core::algorithm::RSA_SHA1);
    println!();
    println!("Digest:");
    println!("  {}", permart_core::algorithm::SHA1);
    println!();
    println!("Canonicalization:");
    println!("  {} (empty-element expansion only)", permart_core::algorithm::C14N);
    println!();
    println!("Issuer key formats:");
    println!("  RSA public key: PEM or DER, SubjectPublicKeyInfo or PKCS#1");
    Ok(())
}

fn print_fence(fence: &Fence) {
    println!("Fence: {} vertices, max altitude {}", fence.len(), fence.max_altitude);
    for vertex in &fence.vertices {
        println!("  {:.6}, {:.6}", vertex.latitude, vertex.longitude);
    }
}

fn print_params(params: &FlightParams, normalize: bool) {
    println!("UIN: {}", params.uin_number);
    println!("ADC: {}", params.adc_number);
    println!("FIC: {}", params.fic_number);
    println!("Start: {}", format_time(&params.flight_start_time, normalize));
    println!("End:   {}", format_time(&params.flight_end_time, normalize));
}

fn format_time(time: &RawDateTime, normalize: bool) -> String {
    if !normalize {
        return format!("{time} (raw UTC fields)");
    }
    match time.normalize() {
        Some(utc) => format!("{utc} UTC"),
        None => format!("{time} (not a calendar date)"),
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    })
}
