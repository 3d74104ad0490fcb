//! attesta-seal: command-line tool for sealing and opening certificate
//! bundles without the HTTP service.
//!
//! Useful for recipients who hold their signing keypair as a local JSON
//! file (the Solana CLI layout: a JSON array of 64 bytes, seed ‖ public)
//! and want to decrypt a bundle offline.

use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use attesta_core::extract_metadata;
use attesta_crypto::{
    cipher, core_hash, hash_file, signing_priv_to_exchange_priv, signing_pub_to_exchange_pub,
    wrap, IdentityInput, SealedBundle,
};

#[derive(Parser)]
#[command(name = "attesta-seal")]
#[command(author, version, about = "Seal and open attesta certificate bundles")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new signing keypair (JSON byte-array file)
    Keygen {
        /// Output path for the keypair file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print file hash, metadata and core hash for a document
    CoreHash {
        /// Input document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Seal a document to a recipient signing public key
    Seal {
        /// Input document to seal
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the bundle JSON
        #[arg(short, long)]
        output: PathBuf,

        /// Recipient signing public key (base58 or hex)
        #[arg(short, long)]
        recipient: String,
    },

    /// Open a sealed bundle with your signing keypair file
    Unseal {
        /// Input bundle JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the decrypted document
        #[arg(short, long)]
        output: PathBuf,

        /// Path to your keypair file (JSON array of 32 or 64 bytes)
        #[arg(short, long)]
        keypair: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Keygen { output } => cmd_keygen(&output),
        Commands::CoreHash { input } => cmd_core_hash(&input),
        Commands::Seal {
            input,
            output,
            recipient,
        } => cmd_seal(&input, &output, &recipient),
        Commands::Unseal {
            input,
            output,
            keypair,
        } => cmd_unseal(&input, &output, &keypair),
    }
}

fn cmd_keygen(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let signing = SigningKey::generate(&mut OsRng);

    // Solana keypair layout: seed ‖ public key as a JSON byte array.
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(&signing.to_bytes());
    bytes.extend_from_slice(signing.verifying_key().as_bytes());
    std::fs::write(output, serde_json::to_string(&bytes)?)?;

    println!("Keypair written to: {}", output.display());
    println!(
        "Public key (base58): {}",
        bs58::encode(signing.verifying_key().as_bytes()).into_string()
    );
    Ok(())
}

fn cmd_core_hash(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file_bytes = std::fs::read(input)?;
    let metadata = extract_metadata(&file_bytes);
    let file_hash = hash_file(&file_bytes);
    let core = core_hash(&metadata, &file_hash);

    println!("file_hash: {}", file_hash);
    println!("core_hash: {}", core);
    println!("metadata:  {}", serde_json::to_string(&metadata)?);
    Ok(())
}

fn cmd_seal(input: &Path, output: &Path, recipient: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file_bytes = std::fs::read(input)?;

    let metadata = extract_metadata(&file_bytes);
    let file_hash = hash_file(&file_bytes);
    let core = core_hash(&metadata, &file_hash);

    let signing_pub = IdentityInput::Encoded(recipient.to_string()).resolve_public()?;
    let exchange_pub = signing_pub_to_exchange_pub(&signing_pub)?;

    let key = cipher::SymmetricKey::generate();
    let payload = cipher::encrypt(&file_bytes, &key)?;
    let wrapped = wrap::seal(&key, &exchange_pub)?;

    // Offline sealing has no object store; the storage reference stays
    // empty until the bundle is uploaded and anchored.
    let bundle = SealedBundle::assemble(
        metadata,
        file_hash,
        core.clone(),
        String::new(),
        recipient.to_string(),
        payload,
        wrapped,
    );

    std::fs::write(output, bundle.to_bytes()?)?;
    println!("Sealed bundle written to: {}", output.display());
    println!("core_hash: {}", core);
    Ok(())
}

fn cmd_unseal(input: &Path, output: &Path, keypair: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = SealedBundle::parse(&std::fs::read(input)?)?;
    let signing_priv = load_keypair_file(keypair)?;

    let exchange_priv = signing_priv_to_exchange_priv(&signing_priv)?;
    let key = wrap::open(&bundle.wrapped_key, &exchange_priv)?;
    let plaintext = cipher::decrypt(&bundle.ciphertext, &key, &bundle.nonce, &bundle.tag)?;

    std::fs::write(output, &plaintext)?;
    println!("Decrypted document written to: {}", output.display());
    Ok(())
}

/// Load a signing private key from a JSON byte-array keypair file.
///
/// Accepts the 64-byte layout (seed ‖ public) or a bare 32-byte seed.
fn load_keypair_file(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let bytes: Vec<u8> = serde_json::from_str(&contents)?;
    Ok(IdentityInput::Bytes(bytes).resolve_private()?)
}
