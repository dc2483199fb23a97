use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::client::{OrderType, WalletType};

#[derive(Parser)]
#[command(name = "jmrpc")]
#[command(about = "JoinMarket wallet daemon client", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Path to the configuration file",
        default_value = "config/config.toml"
    )]
    pub config: PathBuf,
    #[command(flatten)]
    pub connection: ConnectionArgs,
    #[arg(long, global = true, help = "Bearer token from an earlier unlock")]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the connection settings of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    #[arg(short, long, global = true, help = "Base URL of the daemon's RPC interface")]
    pub endpoint: Option<Url>,
    #[arg(short, long, global = true, help = "URL of the daemon's notification websocket")]
    pub ws_endpoint: Option<Url>,
    #[arg(long, global = true, help = "Directory holding the daemon's cert.pem")]
    pub ssl_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List wallet files known to the daemon
    ListWallets,
    /// Create a new wallet and print its seed phrase
    CreateWallet {
        #[arg(short = 'n', long, help = "Wallet file name, e.g. wallet.jmdat")]
        wallet_name: String,
        #[arg(short, long, help = "Password to encrypt the wallet file")]
        password: String,
        #[arg(long, value_enum, help = "Wallet type", default_value_t = WalletTypeArg::Sw)]
        wallet_type: WalletTypeArg,
    },
    /// Unlock a wallet and print the session token
    Unlock {
        #[arg(short = 'n', long, help = "Wallet file name")]
        wallet_name: String,
        #[arg(short, long, help = "Password to decrypt the wallet file")]
        password: String,
    },
    /// Lock a wallet
    Lock {
        #[command(flatten)]
        wallet: WalletArgs,
    },
    /// Show accounts, branches and balances
    Display {
        #[command(flatten)]
        wallet: WalletArgs,
    },
    /// Get a new deposit address
    GetAddress {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(short, long, help = "Mixdepth to receive into", default_value_t = 0)]
        mixdepth: u32,
    },
    /// List the wallet's UTXOs
    ListUtxos {
        #[command(flatten)]
        wallet: WalletArgs,
    },
    /// Send a payment without coinjoin
    DirectSend {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(short, long, help = "Mixdepth to spend from", default_value_t = 0)]
        mixdepth: u32,
        #[arg(short, long, help = "Amount in satoshis")]
        amount: u64,
        #[arg(short, long, help = "Destination address")]
        destination: String,
    },
    /// Start a coinjoin as taker
    Coinjoin {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(short, long, help = "Mixdepth to spend from", default_value_t = 0)]
        mixdepth: u32,
        #[arg(short, long, help = "Amount in satoshis")]
        amount: u64,
        #[arg(long, help = "Number of counterparties", default_value_t = 4)]
        counterparties: u32,
        #[arg(short, long, help = "Destination address")]
        destination: String,
    },
    /// Show session and service status
    Session,
    /// Start the yield generator
    MakerStart {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(long, help = "Contribution to the miner fee in satoshis", default_value = "0")]
        txfee: String,
        #[arg(long, help = "Absolute coinjoin fee in satoshis", default_value = "500")]
        cjfee_a: String,
        #[arg(long, help = "Relative coinjoin fee", default_value = "0.00002")]
        cjfee_r: String,
        #[arg(long, value_enum, help = "Offer type", default_value_t = OrderTypeArg::Reloffer)]
        ordertype: OrderTypeArg,
        #[arg(long, help = "Minimum coinjoin size in satoshis", default_value_t = 100_000)]
        minsize: u64,
    },
    /// Stop the yield generator
    MakerStop {
        #[command(flatten)]
        wallet: WalletArgs,
    },
    /// Read a daemon configuration value
    ConfigGet {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(short, long, help = "Configuration section, e.g. POLICY")]
        section: String,
        #[arg(short, long, help = "Configuration field")]
        field: String,
    },
    /// Change a daemon configuration value for this daemon run
    ConfigSet {
        #[command(flatten)]
        wallet: WalletArgs,
        #[arg(short, long, help = "Configuration section, e.g. POLICY")]
        section: String,
        #[arg(short, long, help = "Configuration field")]
        field: String,
        #[arg(short, long, help = "New value")]
        value: String,
    },
    /// Print notification events until interrupted
    Listen {
        #[command(flatten)]
        wallet: WalletArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WalletArgs {
    #[arg(short = 'n', long, help = "Wallet file name")]
    pub wallet_name: String,
    #[arg(short, long, help = "Unlock the wallet with this password first")]
    pub password: Option<String>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum WalletTypeArg {
    Sw,
    SwLegacy,
    SwFb,
}

impl From<WalletTypeArg> for WalletType {
    fn from(arg: WalletTypeArg) -> Self {
        match arg {
            WalletTypeArg::Sw => WalletType::Segwit,
            WalletTypeArg::SwLegacy => WalletType::SegwitLegacy,
            WalletTypeArg::SwFb => WalletType::SegwitFidelityBond,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum OrderTypeArg {
    Reloffer,
    Absoffer,
}

impl From<OrderTypeArg> for OrderType {
    fn from(arg: OrderTypeArg) -> Self {
        match arg {
            OrderTypeArg::Reloffer => OrderType::Relative,
            OrderTypeArg::Absoffer => OrderType::Absolute,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_wallet_command_with_overrides() {
        let cli = Cli::try_parse_from([
            "jmrpc",
            "get-address",
            "-n",
            "w.jmdat",
            "--mixdepth",
            "2",
            "--endpoint",
            "https://127.0.0.1:28183",
        ])
        .unwrap();
        assert_eq!(
            cli.connection.endpoint.as_ref().map(Url::as_str),
            Some("https://127.0.0.1:28183/")
        );
        match cli.command {
            Commands::GetAddress { wallet, mixdepth } => {
                assert_eq!(wallet.wallet_name, "w.jmdat");
                assert_eq!(wallet.password, None);
                assert_eq!(mixdepth, 2);
            },
            _ => panic!("unexpected command"),
        }
    }
}
