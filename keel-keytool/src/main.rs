// src/main.rs

//! Keel key tool binary entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use keel_crypto::settings;
use keel_keytool::commands::{self, require_password};
use keel_keytool::{KeytoolConfig, PASSWORD_ENV};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keel key tool - keys, addresses and key stores
#[derive(Parser)]
#[command(name = "keel-keytool")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Key store file, overriding the configuration
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    /// Key store password
    #[arg(long, global = true, env = PASSWORD_ENV, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair and print it without storing
    Generate {
        /// Also print the hex private key
        #[arg(long)]
        show_private: bool,
    },

    /// Print the secure hash of a text
    Hash {
        /// Text to hash
        text: String,
    },

    /// Derive the address of a public key
    Address {
        /// Base58 public key
        public_key: String,

        /// Chain id character, overriding the configuration
        #[arg(long)]
        chain_id: Option<char>,
    },

    /// Manage the key store
    Keystore {
        #[command(subcommand)]
        command: KeystoreCommands,
    },

    /// Sign a message with a stored key
    Sign {
        /// Entry alias
        alias: String,

        /// Message text
        message: String,

        /// Entry password, if the entry has one
        #[arg(long)]
        entry_password: Option<String>,
    },

    /// Verify a signature
    Verify {
        /// Base58 public key
        public_key: String,

        /// Message text
        message: String,

        /// Hex signature
        signature: String,
    },
}

#[derive(Subcommand)]
enum KeystoreCommands {
    /// Generate a key pair and store it under its public key
    New {
        /// Entry password; the store password protects the entry when omitted
        #[arg(long)]
        entry_password: Option<String>,
    },

    /// List aliases
    List,

    /// Show one entry
    Show {
        /// Entry alias
        alias: String,
    },

    /// Check whether an alias exists
    Contains {
        /// Entry alias
        alias: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let crypto = settings::init_from_env()?;
    tracing::debug!(algorithm = %crypto.algorithm, "Crypto settings resolved");

    let mut config = KeytoolConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.keystore {
        config.keystore_path = Some(path);
    }

    match cli.command {
        Commands::Generate { show_private } => {
            let key = commands::generate(&config.address_params())?;
            println!("{}", key.render(show_private));
        }
        Commands::Hash { text } => {
            println!("{}", commands::hash(&text));
        }
        Commands::Address { public_key, chain_id } => {
            if let Some(chain_id) = chain_id {
                config.chain_id = chain_id;
                config.validate()?;
            }
            println!("{}", commands::address(&public_key, &config.address_params())?);
        }
        Commands::Keystore { command } => {
            let password = require_password(cli.password.as_deref(), "Store")?;
            let store = commands::open_store(&config, password)?;

            match command {
                KeystoreCommands::New { entry_password } => {
                    println!("{}", commands::keystore_new(&store, entry_password.as_deref())?);
                }
                KeystoreCommands::List => {
                    for alias in store.aliases() {
                        println!("{}", alias);
                    }
                }
                KeystoreCommands::Show { alias } => {
                    let params = config.address_params();
                    println!("{}", commands::keystore_show(&store, &alias, &params)?);
                }
                KeystoreCommands::Contains { alias } => {
                    println!("{}", store.contains_alias(&alias)?);
                }
            }
        }
        Commands::Sign { alias, message, entry_password } => {
            let password = require_password(cli.password.as_deref(), "Store")?;
            let store = commands::open_store(&config, password)?;
            println!("{}", commands::sign(&store, &alias, entry_password.as_deref(), &message)?);
        }
        Commands::Verify { public_key, message, signature } => {
            let valid = commands::verify(&public_key, &message, &signature)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
