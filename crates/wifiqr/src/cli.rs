//! Clap derive structures for the `wifiqr` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// wifiqr -- Wi-Fi QR code generator
#[derive(Debug, Parser)]
#[command(
    name = "wifiqr",
    version,
    about = "Generate scannable Wi-Fi QR codes",
    long_about = "Turn Wi-Fi credentials into a QR code that phone cameras offer to join.\n\n\
        Codes use the standard WIFI:T:<type>;S:<ssid>;P:<password>;; payload.\n\
        Networks can be saved in the config file, with passwords kept in the\n\
        system keyring.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Saved network to start from
    #[arg(long, short = 'n', env = "WIFIQR_NETWORK", global = true)]
    pub network: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "WIFIQR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable (QR card in the terminal)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, payload only (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate credentials and show the QR code
    #[command(alias = "gen", alias = "g")]
    Generate(GenerateArgs),

    /// Save the QR card as a PNG or SVG image
    #[command(alias = "x")]
    Export(ExportArgs),

    /// Decode a Wi-Fi QR payload
    Parse(ParseArgs),

    /// Fill in the form interactively
    #[command(alias = "i")]
    Form,

    /// Manage configuration and saved networks
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Credential form ──────────────────────────────────────────────────

/// Form fields. Unset fields fall back to the saved network, then defaults.
#[derive(Default, Args)]
pub struct FormArgs {
    /// Network name (SSID)
    #[arg(long, short = 's')]
    pub ssid: Option<String>,

    /// Network password
    #[arg(long, short = 'p')]
    pub password: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long, conflicts_with = "password")]
    pub password_stdin: bool,

    /// Encryption type
    #[arg(long, short = 'e')]
    pub encryption: Option<EncryptionArg>,

    /// Brand label shown under the code
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Card background color (#RRGGBB)
    #[arg(long)]
    pub background: Option<String>,
}

impl std::fmt::Debug for FormArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormArgs")
            .field("ssid", &self.ssid)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_stdin", &self.password_stdin)
            .field("encryption", &self.encryption)
            .field("brand", &self.brand)
            .field("background", &self.background)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EncryptionArg {
    /// WPA/WPA2 personal
    #[value(name = "WPA", alias = "wpa", alias = "wpa2")]
    Wpa,
    /// WEP
    #[value(name = "WEP", alias = "wep")]
    Wep,
    /// Open network, no password
    #[value(name = "nopass", alias = "none", alias = "open")]
    Nopass,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Surround the terminal code with a quiet zone (easier to scan)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub margin: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Output file (defaults to the configured export file)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Image format (inferred from the file extension when omitted)
    #[arg(long)]
    pub format: Option<ImageFormatArg>,

    /// QR panel size in pixels
    #[arg(long)]
    pub size: Option<u32>,

    /// Error-correction level
    #[arg(long)]
    pub ec_level: Option<EcLevelArg>,

    /// Overwrite an existing file without asking
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Svg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EcLevelArg {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Payload to decode, e.g. "WIFI:T:WPA;S:HomeNet;P:secret;;"
    pub payload: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key, e.g. "brand_label" or "render.size"
        key: String,

        /// Value to set
        value: String,
    },

    /// List saved networks
    Networks,

    /// Save a network
    AddNetwork {
        /// Name to save the network under
        name: String,

        /// Network name (SSID); prompted when omitted
        #[arg(long, short = 's')]
        ssid: Option<String>,

        /// Encryption type
        #[arg(long, short = 'e')]
        encryption: Option<EncryptionArg>,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Store the password in plaintext instead of the keyring
        #[arg(long)]
        plaintext: bool,
    },

    /// Remove a saved network
    RemoveNetwork {
        /// Saved network name
        name: String,
    },

    /// Set the default network
    Use {
        /// Saved network name
        name: String,
    },

    /// Store a network password in the system keyring
    SetPassword {
        /// Saved network name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
