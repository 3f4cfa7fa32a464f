//! # CLI Interface
//!
//! Defines the command-line argument structure for `hd-did` using `clap`
//! derive. Secrets can come from flags or from the environment so they
//! stay out of shell history.

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Password-derived HD keys, did:key identities and JWE encryption.
#[derive(Parser, Debug)]
#[command(
    name = "hd-did",
    about = "Password-derived HD Ed25519 keys and did:key identities",
    version,
    propagate_version = true
)]
pub struct HdDidCli {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "HD_DID_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "HD_DID_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a keypair at a path and print its keys, DID and chain code.
    Derive(DeriveArgs),
    /// Derive a keypair by mixing the master key with a signed key.
    Mix(MixArgs),
    /// Encode, decode and validate DIDs.
    #[command(subcommand)]
    Did(DidCommand),
    /// Sign a message with the key at a path.
    Sign(SignArgs),
    /// Encrypt text to one or more DIDs.
    Encrypt(EncryptArgs),
    /// Decrypt a JWE addressed to this secret key.
    Decrypt(DecryptArgs),
}

/// The password that roots the key tree.
#[derive(Args, Debug)]
pub struct PasswordArg {
    /// Password the master key is derived from.
    #[arg(long, short = 'p', env = "HD_DID_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `derive` subcommand.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub password: PasswordArg,

    /// Derivation path, e.g. `m/44'/0'`.
    #[arg(long, default_value = "m")]
    pub path: String,

    /// Offset added to every path segment.
    #[arg(long, default_value_t = hd_did::config::HARDENED_OFFSET)]
    pub offset: u32,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `mix` subcommand.
#[derive(Args, Debug)]
pub struct MixArgs {
    #[command(flatten)]
    pub password: PasswordArg,

    /// The signed key (any text, typically a hex signature).
    #[arg(long)]
    pub signed_key: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// `did` subcommands.
#[derive(Subcommand, Debug)]
pub enum DidCommand {
    /// Encode a base64pad Ed25519 public key as did:key.
    Encode {
        /// Public key, base64 with padding.
        public_key: String,
    },
    /// Print the public key inside a did:key as base64pad.
    Decode {
        did: String,
    },
    /// Split a DID into method and identifier.
    Parse {
        did: String,
    },
    /// Exit with status 1 if the DID does not parse.
    Validate {
        did: String,
    },
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub password: PasswordArg,

    /// Derivation path of the signing key.
    #[arg(long)]
    pub path: String,

    /// Message to sign (UTF-8).
    pub message: String,
}

/// The holder's secret key for JWE operations.
#[derive(Args, Debug)]
pub struct SecretKeyArg {
    /// Secret key, base64 with padding (as printed by `derive`).
    #[arg(long, short = 's', env = "HD_DID_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

/// Arguments for the `encrypt` subcommand.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub secret_key: SecretKeyArg,

    /// Recipient encryption DID (the `enc did` line printed by `derive`,
    /// not the signing `did`); repeat for several recipients.
    #[arg(long = "to", required = true)]
    pub to: Vec<String>,

    /// Additional authenticated data (UTF-8).
    #[arg(long)]
    pub aad: Option<String>,

    /// Text to encrypt.
    pub text: String,
}

/// Arguments for the `decrypt` subcommand.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub secret_key: SecretKeyArg,

    /// JWE in General JSON serialization.
    pub jwe: String,
}
