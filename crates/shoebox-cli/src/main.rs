//! shoebox: personal document archive backup CLI
//!
//! Commands:
//!   seal <input>     - encrypt a backup file into a .sbx container
//!   open <input>     - decrypt a container back to plaintext
//!   inspect <input>  - print public container header fields
//!   config show      - display current configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tracing::info;

use shoebox_codec::{read_header, BackupCipher, BackupPayload, EncryptionInfo};
use shoebox_core::config::EncryptionMode;
use shoebox_core::ShoeboxConfig;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "shoebox",
    version,
    about = "shoebox archive backup tool",
    long_about = "shoebox: seal archive backups into encrypted containers and open them again"
)]
struct Cli {
    /// Path to shoebox.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "SHOEBOX_CONFIG",
        default_value = "/etc/shoebox/config.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SHOEBOX_LOG", default_value = "info")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "SHOEBOX_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seal a backup file into an encrypted container
    ///
    /// The passphrase is read from SHOEBOX_PASSPHRASE or prompted for.
    /// With encryption = "none" in the config, the file passes through
    /// unchanged and no passphrase is needed.
    Seal {
        /// File to seal
        input: PathBuf,
        /// Output path (default: <input>.<extension> in the input's directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Skip the envelope JSON sidecar even if the config enables it
        #[arg(long)]
        no_envelope: bool,
    },

    /// Open a sealed container, restoring the original file
    Open {
        /// Container to open
        input: PathBuf,
        /// Output path (default: input with the container extension stripped)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the public header fields of a sealed container
    ///
    /// Salt and IV are stored in the clear by the format; showing them
    /// reveals nothing about the passphrase or contents.
    Inspect {
        /// Container to inspect
        input: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, &cli.log_format);

    let config = ShoeboxConfig::load(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    match cli.command {
        Commands::Seal { input, output, no_envelope } => {
            cmd_seal(&config, &input, output.as_deref(), no_envelope)
        }
        Commands::Open { input, output } => cmd_open(&config, &input, output.as_deref()),
        Commands::Inspect { input } => cmd_inspect(&input),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}

// ── Passphrase resolution ─────────────────────────────────────────────────────

/// Read the passphrase from SHOEBOX_PASSPHRASE, falling back to an
/// interactive prompt. The passthrough cipher never calls this.
fn resolve_passphrase(prompt: &str) -> Result<SecretString> {
    if let Ok(pw) = std::env::var("SHOEBOX_PASSPHRASE") {
        return Ok(SecretString::from(pw));
    }
    let pw = rpassword::prompt_password(prompt).context("reading passphrase")?;
    Ok(SecretString::from(pw))
}

// ── `shoebox seal` ────────────────────────────────────────────────────────────

fn cmd_seal(
    config: &ShoeboxConfig,
    input: &Path,
    output: Option<&Path>,
    no_envelope: bool,
) -> Result<()> {
    let cipher = BackupCipher::from_config(config.backup.encryption);

    let plaintext = std::fs::read(input)
        .with_context(|| format!("reading input: {}", input.display()))?;

    let passphrase = if cipher.is_encrypting() {
        resolve_passphrase("Passphrase: ")?
    } else {
        SecretString::from("")
    };

    let sealed = cipher.seal(&plaintext, &passphrase);

    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let mut p = input.as_os_str().to_owned();
        p.push(".");
        p.push(&config.backup.container_extension);
        PathBuf::from(p)
    });
    std::fs::write(&out_path, &sealed)
        .with_context(|| format!("writing container: {}", out_path.display()))?;

    info!(
        input = %input.display(),
        output = %out_path.display(),
        bytes = sealed.len(),
        encrypted = cipher.is_encrypting(),
        "sealed backup"
    );

    if config.backup.write_envelope && !no_envelope {
        let envelope_path = write_envelope_sidecar(config, &cipher, input, &out_path)?;
        println!("  envelope: {}", envelope_path.display());
    }

    println!(
        "Sealed {} → {} ({} bytes{})",
        input.display(),
        out_path.display(),
        sealed.len(),
        if cipher.is_encrypting() { "" } else { ", encryption disabled" },
    );

    Ok(())
}

/// Write the JSON envelope next to the sealed container.
///
/// Blob and archive-item ids are freshly generated here; in the full archive
/// system they come from the metadata store, but the standalone CLI is its
/// own caller.
fn write_envelope_sidecar(
    config: &ShoeboxConfig,
    cipher: &BackupCipher,
    input: &Path,
    container_path: &Path,
) -> Result<PathBuf> {
    let tenant = config.backup.tenant_id.as_deref().unwrap_or("default");
    let file_id = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string());
    let encryption = cipher.is_encrypting().then(EncryptionInfo::salted_cbc);

    let payload = BackupPayload::new(
        tenant,
        file_id,
        uuid::Uuid::new_v4().to_string(),
        uuid::Uuid::new_v4().to_string(),
        encryption,
    )
    .context("building envelope")?;

    let mut sidecar = container_path.as_os_str().to_owned();
    sidecar.push(".json");
    let sidecar = PathBuf::from(sidecar);
    std::fs::write(&sidecar, payload.to_bytes()?)
        .with_context(|| format!("writing envelope: {}", sidecar.display()))?;
    Ok(sidecar)
}

// ── `shoebox open` ────────────────────────────────────────────────────────────

fn cmd_open(config: &ShoeboxConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let cipher = BackupCipher::from_config(config.backup.encryption);

    let sealed = std::fs::read(input)
        .with_context(|| format!("reading container: {}", input.display()))?;

    let passphrase = if cipher.is_encrypting() {
        resolve_passphrase("Passphrase: ")?
    } else {
        SecretString::from("")
    };

    let plaintext = cipher
        .open(&sealed, &passphrase)
        .with_context(|| format!("opening container: {}", input.display()))?;

    let out_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_open_output(input, &config.backup.container_extension));
    std::fs::write(&out_path, &plaintext)
        .with_context(|| format!("writing output: {}", out_path.display()))?;

    info!(
        input = %input.display(),
        output = %out_path.display(),
        bytes = plaintext.len(),
        "opened backup"
    );
    println!(
        "Opened {} → {} ({} bytes)",
        input.display(),
        out_path.display(),
        plaintext.len()
    );

    Ok(())
}

/// Default restore path: strip the container extension if present, otherwise
/// append `.out` rather than overwrite the input.
fn default_open_output(input: &Path, container_extension: &str) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.to_string_lossy() == container_extension => {
            input.with_extension("")
        }
        _ => {
            let mut p = input.as_os_str().to_owned();
            p.push(".out");
            PathBuf::from(p)
        }
    }
}

// ── `shoebox inspect` ─────────────────────────────────────────────────────────

fn cmd_inspect(input: &Path) -> Result<()> {
    let sealed = std::fs::read(input)
        .with_context(|| format!("reading container: {}", input.display()))?;

    let header = read_header(&sealed)
        .with_context(|| format!("parsing container header: {}", input.display()))?;

    println!("Container: {}", input.display());
    println!("  format:      salted aes-256-cbc");
    println!("  salt:        {}", hex::encode(header.salt));
    println!("  iv:          {}", hex::encode(header.iv));
    println!("  ciphertext:  {} bytes", header.ciphertext_len);
    println!("  total:       {} bytes", sealed.len());

    Ok(())
}

// ── `shoebox config show` ─────────────────────────────────────────────────────

fn cmd_config_show(config: &ShoeboxConfig, path: &Path) -> Result<()> {
    println!("# config file: {}", path.display());
    if config.backup.encryption == EncryptionMode::None {
        println!("# NOTE: encryption is disabled; backups are sealed as plaintext");
    }
    print!("{}", toml::to_string_pretty(config).context("serializing config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_open_output_strips_extension() {
        assert_eq!(
            default_open_output(Path::new("receipts.tar.sbx"), "sbx"),
            PathBuf::from("receipts.tar")
        );
        assert_eq!(
            default_open_output(Path::new("receipts.bin"), "sbx"),
            PathBuf::from("receipts.bin.out")
        );
    }
}
