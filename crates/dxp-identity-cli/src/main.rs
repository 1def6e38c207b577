//! The `dxpid` command line tool.
//!
//! Generates mnemonics, derives identities, signs and verifies messages,
//! and manages DID documents and credentials in a local document store.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};

use dxp_identity::address::{did_to_address, verify_key_to_address, Address};
use dxp_identity::seed::{
    bytes_to_seed, generate_mnemonic, mnemonic_from_user_entropy, mnemonic_to_seed,
    validate_mnemonic, MnemonicStrength, Seed, MIN_USER_ENTROPY_CHARS,
};
use dxp_identity::storage::{load_identity, read_public_document, save_identity};
use dxp_identity::{
    derive_identity, sign, sign_credential, verify, Credential, Did, DidResolver, DocumentStore,
    Identity, IdentityError,
};

// ── Directory helpers ─────────────────────────────────────────────────────────

/// Data root: `$DXP_HOME`, or `~/.dxp`.
fn dxp_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("DXP_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home =
        std::env::var_os("HOME").ok_or_else(|| anyhow!("neither DXP_HOME nor HOME is set"))?;
    Ok(PathBuf::from(home).join(".dxp"))
}

fn identity_dir() -> Result<PathBuf> {
    Ok(dxp_dir()?.join("identity"))
}

fn documents_dir() -> Result<PathBuf> {
    Ok(dxp_dir()?.join("documents"))
}

fn identity_path(name: &str) -> Result<PathBuf> {
    Ok(identity_dir()?.join(format!("{name}.dxp")))
}

fn open_documents() -> Result<DocumentStore> {
    let dir = documents_dir()?;
    log::debug!("opening document store at {}", dir.display());
    DocumentStore::new(&dir)
        .with_context(|| format!("failed to open document store at {}", dir.display()))
}

// ── Prompt helpers ────────────────────────────────────────────────────────────

fn read_line(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// `$DXP_PASSPHRASE` if set, otherwise a line from stdin.
fn read_passphrase(prompt: &str) -> Result<String> {
    if let Ok(passphrase) = std::env::var("DXP_PASSPHRASE") {
        return Ok(passphrase);
    }
    Ok(read_line(prompt)?.trim().to_string())
}

fn load_saved_identity(name: &str) -> Result<Identity> {
    let path = identity_path(name)?;
    if !path.exists() {
        bail!(
            "identity '{}' not found (expected at {})",
            name,
            path.display()
        );
    }
    let passphrase = read_passphrase(&format!("Passphrase for '{name}': "))?;
    load_identity(&path, &passphrase).with_context(|| format!("failed to load identity '{name}'"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// dxp identity CLI: mnemonics, DIDs, signatures and credentials.
#[derive(Parser, Debug)]
#[command(
    name = "dxpid",
    about = "dxp identity CLI",
    version,
    long_about = "dxpid: dxp identity CLI\n\nGenerate mnemonics, derive DIDs, sign and verify messages,\nand manage DID documents and KYC credentials."
)]
struct Cli {
    /// Use specific saved identity (default: default)
    #[arg(long, global = true, default_value = "default")]
    identity: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new mnemonic and print the identity it derives
    Mnemonic {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(long, default_value_t = 24)]
        words: usize,

        /// Read entropy from stdin instead of the system random source
        #[arg(long, conflicts_with = "words")]
        unsafe_entropy: bool,
    },

    /// Derive an identity from a mnemonic or a raw seed
    #[command(group(
        ArgGroup::new("source")
            .required(true)
            .args(["mnemonic", "seed_hex", "seed_file"]),
    ))]
    Derive {
        /// Mnemonic phrase
        #[arg(long)]
        mnemonic: Option<String>,

        /// Seed as hex (at least 32 bytes; extra bytes are ignored)
        #[arg(long)]
        seed_hex: Option<String>,

        /// File holding raw seed bytes
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Save the identity, encrypted, under this name
        #[arg(long)]
        save: Option<String>,
    },

    /// Show the public document of a saved identity
    Show,

    /// Sign a message with a saved identity
    Sign {
        #[arg(long)]
        message: String,
    },

    /// Verify a hex signature against a Base58 verify key
    Verify {
        #[arg(long)]
        verify_key: String,

        #[arg(long)]
        signature: String,

        #[arg(long)]
        message: String,
    },

    /// Print the account address of a DID or verify key
    #[command(group(
        ArgGroup::new("target")
            .required(true)
            .args(["did", "verify_key"]),
    ))]
    Address {
        /// DID registered in the local document store
        #[arg(long)]
        did: Option<String>,

        /// Base58 verify key
        #[arg(long)]
        verify_key: Option<String>,

        /// Print bech32 under this prefix instead of hex
        #[arg(long)]
        bech32: Option<String>,
    },

    /// Register the saved identity's document in the local store
    Register,

    /// Issue a KYC credential for a subject and attach it in the local store
    Credential {
        /// DID of the subject
        #[arg(long)]
        subject: String,
    },

    /// Print the document registered for a DID
    Resolve { did: String },

    /// List DIDs registered in the local store
    List,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    let identity_name = cli.identity.clone();

    let result = match cli.command {
        Commands::Mnemonic {
            words,
            unsafe_entropy,
        } => cmd_mnemonic(words, unsafe_entropy, verbose),
        Commands::Derive {
            mnemonic,
            seed_hex,
            seed_file,
            save,
        } => cmd_derive(
            mnemonic.as_deref(),
            seed_hex.as_deref(),
            seed_file,
            save.as_deref(),
            verbose,
        ),
        Commands::Show => cmd_show(&identity_name, verbose),
        Commands::Sign { message } => cmd_sign(&identity_name, &message, verbose),
        Commands::Verify {
            verify_key,
            signature,
            message,
        } => cmd_verify(&verify_key, &signature, &message),
        Commands::Address {
            did,
            verify_key,
            bech32,
        } => cmd_address(did.as_deref(), verify_key.as_deref(), bech32.as_deref()),
        Commands::Register => cmd_register(&identity_name, verbose),
        Commands::Credential { subject } => cmd_credential(&identity_name, &subject, verbose),
        Commands::Resolve { did } => cmd_resolve(&did),
        Commands::List => cmd_list(verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `dxpid mnemonic [--words N] [--unsafe-entropy]`
fn cmd_mnemonic(words: usize, unsafe_entropy: bool, verbose: bool) -> Result<()> {
    let mnemonic = if unsafe_entropy {
        let input = read_line(&format!(
            "Enter at least {MIN_USER_ENTROPY_CHARS} characters of entropy: "
        ))?;
        let mnemonic = mnemonic_from_user_entropy(&input)?;
        eprintln!("Input length: {}", input.len());
        let answer = read_line("Use this entropy? [y/N] ")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            bail!("aborted");
        }
        mnemonic
    } else {
        generate_mnemonic(MnemonicStrength::from_word_count(words)?)?
    };

    let identity = derive_identity(&mnemonic_to_seed(&mnemonic))?;
    println!("{mnemonic}");
    println!("Address: {}", identity.address()?);
    if verbose {
        eprintln!("Words: {}", mnemonic.split_whitespace().count());
    }
    println!("{}", identity.to_json_pretty()?);
    Ok(())
}

/// `dxpid derive (--mnemonic M | --seed-hex H | --seed-file F) [--save NAME]`
fn cmd_derive(
    mnemonic: Option<&str>,
    seed_hex: Option<&str>,
    seed_file: Option<PathBuf>,
    save: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let seed = match (mnemonic, seed_hex, seed_file) {
        (Some(phrase), _, _) => {
            if let Err(e) = validate_mnemonic(phrase) {
                eprintln!("warning: not a standard mnemonic ({e}); deriving anyway");
            }
            mnemonic_to_seed(phrase)
        }
        (None, Some(hex_seed), _) => Seed::from_hex(hex_seed)?,
        (None, None, Some(path)) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read seed file {}", path.display()))?;
            bytes_to_seed(&bytes)?
        }
        (None, None, None) => bail!("one of --mnemonic, --seed-hex or --seed-file is required"),
    };

    let identity = derive_identity(&seed)?;
    println!("{}", identity.to_json_pretty()?);

    if let Some(name) = save {
        let path = identity_path(name)?;
        if path.exists() {
            bail!("identity '{}' already exists at {}", name, path.display());
        }
        let passphrase = read_passphrase("Enter passphrase for new identity: ")?;
        if passphrase.is_empty() {
            bail!("passphrase cannot be empty");
        }
        if std::env::var_os("DXP_PASSPHRASE").is_none() {
            let confirm = read_passphrase("Confirm passphrase: ")?;
            if passphrase != confirm {
                bail!("passphrases do not match");
            }
        }
        save_identity(&identity, &path, &passphrase).context("failed to save identity")?;
        eprintln!("Saved identity '{name}' to {}", path.display());
        if verbose {
            eprintln!("  DID:     {}", identity.did);
            eprintln!("  Address: {}", identity.address()?);
        }
    }
    Ok(())
}

/// `dxpid show [--identity NAME]`
fn cmd_show(name: &str, verbose: bool) -> Result<()> {
    let path = identity_path(name)?;
    if !path.exists() {
        bail!(
            "identity '{}' not found (expected at {})",
            name,
            path.display()
        );
    }
    let doc = read_public_document(&path).context("failed to read identity file")?;
    print_json(&doc)?;
    if verbose {
        eprintln!("Address: {}", doc.address()?);
        eprintln!("File:    {}", path.display());
    }
    Ok(())
}

/// `dxpid sign --message TEXT`
fn cmd_sign(name: &str, message: &str, verbose: bool) -> Result<()> {
    let identity = load_saved_identity(name)?;
    let signature = sign(message.as_bytes(), &identity)?;
    println!("{}", hex::encode(signature));
    if verbose {
        eprintln!("Signed by {} ({})", identity.did, identity.verify_key);
    }
    Ok(())
}

/// `dxpid verify --verify-key KEY --signature HEX --message TEXT`
fn cmd_verify(verify_key: &str, signature: &str, message: &str) -> Result<()> {
    let valid = hex::decode(signature)
        .map(|sig| verify(message.as_bytes(), &sig, verify_key))
        .unwrap_or(false);
    if valid {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        Err(IdentityError::SignatureInvalid.into())
    }
}

/// `dxpid address (--did DID | --verify-key KEY) [--bech32 HRP]`
fn cmd_address(did: Option<&str>, verify_key: Option<&str>, hrp: Option<&str>) -> Result<()> {
    let address: Address = match (did, verify_key) {
        (Some(did), _) => did_to_address(&open_documents()?, did)?,
        (None, Some(key)) => verify_key_to_address(key)?,
        (None, None) => bail!("one of --did or --verify-key is required"),
    };
    match hrp {
        Some(hrp) => println!("{}", address.to_bech32(hrp)?),
        None => println!("{address}"),
    }
    Ok(())
}

/// `dxpid register [--identity NAME]`
fn cmd_register(name: &str, verbose: bool) -> Result<()> {
    let path = identity_path(name)?;
    let doc = read_public_document(&path)
        .with_context(|| format!("failed to read identity '{name}' at {}", path.display()))?;
    let did = doc.did.clone();
    open_documents()?.register(doc)?;
    println!("Registered {did}");
    if verbose {
        eprintln!("Store: {}", documents_dir()?.display());
    }
    Ok(())
}

/// `dxpid credential --subject DID [--identity ISSUER]`
fn cmd_credential(name: &str, subject: &str, verbose: bool) -> Result<()> {
    let subject = Did::parse(subject)?;
    let issuer = load_saved_identity(name)?;
    let credential = Credential::kyc_now(&subject, &issuer.did);
    let signed = sign_credential(&issuer, credential)?;
    if verbose {
        eprintln!("Credential signature: {}", signed.signature);
    }
    let updated = open_documents()?.accept_credential(&signed)?;
    print_json(&updated)
}

/// `dxpid resolve DID`
fn cmd_resolve(did: &str) -> Result<()> {
    let did = Did::parse(did)?;
    let doc = open_documents()?
        .resolve(&did)?
        .ok_or_else(|| IdentityError::UnknownDid(did.to_string()))?;
    print_json(&doc)
}

/// `dxpid list`
fn cmd_list(verbose: bool) -> Result<()> {
    let documents = open_documents()?.list_documents()?;
    if documents.is_empty() {
        println!("No documents registered");
        return Ok(());
    }

    println!("{:<32} {:<5} ADDRESS", "DID", "KYC");
    println!("{}", "-".repeat(80));
    for doc in &documents {
        let kyc = if doc.is_kyc_validated() { "yes" } else { "no" };
        let address = doc
            .address()
            .map(|a| a.to_string())
            .unwrap_or_else(|e| format!("({e})"));
        println!("{:<32} {:<5} {}", doc.did, kyc, address);
        if verbose {
            println!("    credentials: {}", doc.credentials.len());
        }
    }
    Ok(())
}
