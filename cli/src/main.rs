// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # hd-did
//!
//! Entry point for the `hd-did` binary. Parses CLI arguments, initializes
//! logging and dispatches to the library.
//!
//! - `derive`  — keypair, signing DID, encryption DID and chain code at a path
//! - `mix`     — keypair from the master key and a signed key
//! - `did`     — encode, decode, parse, validate
//! - `sign`    — base64url signature with the key at a path
//! - `encrypt` — JWE to one or more encryption DIDs
//! - `decrypt` — open a JWE with a secret key

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use hd_did::did::{self, CreateJweOptions, DidIdentity, Recipient};
use hd_did::{Encoding, HdKey, Jwe};

use cli::{Commands, DidCommand, HdDidCli};

/// Output of `derive` and `mix`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DerivedKey {
    path: Option<String>,
    public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_key: Option<String>,
    did: String,
    /// DID of the X25519 key for `encrypt --to`; absent when the secret
    /// is not printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    encryption_did: Option<String>,
    chain_code: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = HdDidCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Derive(args) => derive(args),
        Commands::Mix(args) => mix(args),
        Commands::Did(cmd) => did_command(cmd),
        Commands::Sign(args) => sign(args),
        Commands::Encrypt(args) => encrypt(args).await,
        Commands::Decrypt(args) => decrypt(args).await,
    }
}

fn derive(args: cli::DeriveArgs) -> Result<()> {
    let hd = HdKey::from_password(&args.password.password);
    let key = derived_key(&hd, &args.path, args.offset)?;
    tracing::info!(path = %args.path, offset = args.offset, "derived key");
    print_key(&key, args.json)
}

/// Keys, signing DID and encryption DID at `path`.
fn derived_key(hd: &HdKey, path: &str, offset: u32) -> Result<DerivedKey> {
    let exported = hd
        .export_key_path_with_offset(path, offset)
        .with_context(|| format!("failed to derive key at {path}"))?;
    let public_key = Encoding::Base64Pad
        .decode(&exported.public_key)
        .context("exported public key is not base64")?;
    let encryption_did = identity(&exported.secret_key)?.did();

    Ok(DerivedKey {
        path: Some(path.to_string()),
        did: did::encode_did_key(&public_key),
        encryption_did: Some(encryption_did),
        public_key: exported.public_key,
        secret_key: Some(exported.secret_key),
        chain_code: hd.chain_code().to_string(),
    })
}

fn mix(args: cli::MixArgs) -> Result<()> {
    let hd = HdKey::from_password(&args.password.password);
    let (_, keypair) = hd
        .create_ed_keypair(&args.signed_key)
        .context("failed to mix signed key")?;

    print_key(
        &DerivedKey {
            path: None,
            public_key: keypair.public_key_str(Encoding::Base64Pad)?,
            secret_key: None,
            did: keypair.did(),
            encryption_did: None,
            chain_code: hd.chain_code().to_string(),
        },
        args.json,
    )
}

fn print_key(key: &DerivedKey, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(key)?);
        return Ok(());
    }
    if let Some(path) = &key.path {
        println!("path:        {path}");
    }
    println!("public key:  {}", key.public_key);
    if let Some(secret) = &key.secret_key {
        println!("secret key:  {secret}");
    }
    println!("did:         {}", key.did);
    if let Some(encryption_did) = &key.encryption_did {
        println!("enc did:     {encryption_did}");
    }
    println!("chain code:  {}", key.chain_code);
    Ok(())
}

fn did_command(cmd: DidCommand) -> Result<()> {
    match cmd {
        DidCommand::Encode { public_key } => {
            let bytes = Encoding::Base64Pad
                .decode(&public_key)
                .context("public key must be base64 with padding")?;
            println!("{}", did::encode_did_key(&bytes));
        }
        DidCommand::Decode { did: input } => {
            let key = did::extract_did_key(&input)
                .with_context(|| format!("failed to decode {input}"))?;
            println!("{}", Encoding::Base64Pad.encode(&key)?);
        }
        DidCommand::Parse { did: input } => {
            let parsed = did::parse_did(&input)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        DidCommand::Validate { did: input } => {
            if !did::is_valid_did(&input) {
                bail!("invalid DID: {input}");
            }
            println!("valid");
        }
    }
    Ok(())
}

fn sign(args: cli::SignArgs) -> Result<()> {
    let hd = HdKey::from_password(&args.password.password);
    let (signer, _) = hd
        .derive_key_path(&args.path)
        .with_context(|| format!("failed to derive key at {}", args.path))?;
    println!("{}", signer.sign(&args.message));
    Ok(())
}

fn identity(secret_key: &str) -> Result<DidIdentity> {
    let bytes = Encoding::Base64Pad
        .decode(secret_key)
        .context("secret key must be base64 with padding")?;
    DidIdentity::new(&bytes).context("invalid secret key")
}

async fn encrypt(args: cli::EncryptArgs) -> Result<()> {
    let sender = identity(&args.secret_key.secret_key)?;

    let recipients = args
        .to
        .iter()
        .map(|to| {
            sender
                .extract_did_key(to)
                .map(Recipient::PublicKey)
                .with_context(|| format!("bad recipient {to}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let options = CreateJweOptions {
        protected_header: None,
        aad: args.aad.map(String::into_bytes),
    };
    let jwe = sender
        .create_jwe(&args.text, recipients, options)
        .await
        .context("encryption failed")?;

    tracing::info!(from = %sender.did(), recipients = args.to.len(), "encrypted");
    println!("{}", serde_json::to_string_pretty(&jwe)?);
    Ok(())
}

async fn decrypt(args: cli::DecryptArgs) -> Result<()> {
    let holder = identity(&args.secret_key.secret_key)?;
    let jwe: Jwe = serde_json::from_str(&args.jwe).context("input is not a JWE")?;
    let text = holder.decrypt_jwe(&jwe).await.context("decryption failed")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSWORD: &str = "bob's password";

    fn derived(path: &str) -> DerivedKey {
        derived_key(&HdKey::from_password(PASSWORD), path, hd_did::config::HARDENED_OFFSET)
            .unwrap()
    }

    #[test]
    fn derive_prints_both_dids() {
        let key = derived("m/0'");
        let encryption_did = key.encryption_did.as_deref().unwrap();
        assert!(encryption_did.starts_with("did:key:z6Mk"));
        assert_ne!(encryption_did, key.did);

        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["encryptionDid"], encryption_did);
    }

    #[tokio::test]
    async fn encryption_did_from_derive_opens_with_derived_secret() {
        let bob = derived("m/0'");
        let alice = identity(&derived("m/1'").secret_key.unwrap()).unwrap();

        let to = bob.encryption_did.unwrap();
        let recipient = alice.extract_did_key(&to).unwrap();
        let jwe = alice
            .create_jwe(
                "hello bob",
                vec![Recipient::PublicKey(recipient)],
                CreateJweOptions::default(),
            )
            .await
            .unwrap();

        let holder = identity(&bob.secret_key.unwrap()).unwrap();
        assert_eq!(holder.decrypt_jwe(&jwe).await.unwrap(), "hello bob");
    }
}
