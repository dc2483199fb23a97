use anyhow::{Context, anyhow};
use clap::Parser;
use futures_util::StreamExt;
use log::{info, warn};
use serde::Serialize;

use jmrpc::{
    JmRpc,
    cli::{Cli, Commands, WalletArgs},
    client::MakerSettings,
    config::load_configuration,
    log::init_logging,
    ws::ChannelFrame,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logging()?;
    let cli = Cli::parse();

    let mut config = load_configuration(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.apply_connection(&cli.connection);
    config.validate()?;

    let client = JmRpc::new(&config).context("Failed to create daemon client")?;
    if let Some(token) = &cli.token {
        if let Err(e) = client.adopt_token(token).await {
            warn!(error:% = e; "Token adopted, notifications unavailable");
        }
    }

    let result = run(&client, cli.command).await;
    client.close().await;
    result
}

async fn run(client: &JmRpc, command: Commands) -> Result<(), anyhow::Error> {
    match command {
        Commands::ListWallets => print_json(&client.list_wallets().await?),
        Commands::CreateWallet {
            wallet_name,
            password,
            wallet_type,
        } => print_json(&client.create_wallet(&wallet_name, &password, wallet_type.into()).await?),
        Commands::Unlock { wallet_name, password } => {
            print_json(&client.unlock_wallet(&wallet_name, &password).await?)
        },
        Commands::Lock { wallet } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.lock_wallet(&wallet.wallet_name).await?)
        },
        Commands::Display { wallet } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.display_wallet(&wallet.wallet_name).await?)
        },
        Commands::GetAddress { wallet, mixdepth } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.get_address(&wallet.wallet_name, mixdepth).await?)
        },
        Commands::ListUtxos { wallet } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.list_utxos(&wallet.wallet_name).await?)
        },
        Commands::DirectSend {
            wallet,
            mixdepth,
            amount,
            destination,
        } => {
            unlock_first(client, &wallet).await?;
            print_json(
                &client
                    .direct_send(&wallet.wallet_name, mixdepth, amount, &destination)
                    .await?,
            )
        },
        Commands::Coinjoin {
            wallet,
            mixdepth,
            amount,
            counterparties,
            destination,
        } => {
            unlock_first(client, &wallet).await?;
            print_json(
                &client
                    .do_coinjoin(&wallet.wallet_name, mixdepth, amount, counterparties, &destination)
                    .await?,
            )
        },
        Commands::Session => print_json(&client.session().await?),
        Commands::MakerStart {
            wallet,
            txfee,
            cjfee_a,
            cjfee_r,
            ordertype,
            minsize,
        } => {
            unlock_first(client, &wallet).await?;
            let settings = MakerSettings {
                tx_fee: txfee,
                cjfee_a,
                cjfee_r,
                order_type: ordertype.into(),
                min_size: minsize,
            };
            print_json(&client.maker_start(&wallet.wallet_name, &settings).await?)
        },
        Commands::MakerStop { wallet } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.maker_stop(&wallet.wallet_name).await?)
        },
        Commands::ConfigGet { wallet, section, field } => {
            unlock_first(client, &wallet).await?;
            print_json(&client.config_get(&wallet.wallet_name, &section, &field).await?)
        },
        Commands::ConfigSet {
            wallet,
            section,
            field,
            value,
        } => {
            unlock_first(client, &wallet).await?;
            print_json(
                &client
                    .config_set(&wallet.wallet_name, &section, &field, &value)
                    .await?,
            )
        },
        Commands::Listen { wallet } => {
            unlock_first(client, &wallet).await?;
            listen(client).await
        },
    }
}

async fn unlock_first(client: &JmRpc, wallet: &WalletArgs) -> Result<(), anyhow::Error> {
    if let Some(password) = &wallet.password {
        client
            .unlock_wallet(&wallet.wallet_name, password)
            .await
            .with_context(|| format!("Failed to unlock {}", wallet.wallet_name))?;
    }
    Ok(())
}

async fn listen(client: &JmRpc) -> Result<(), anyhow::Error> {
    if !client.has_token().await {
        return Err(anyhow!("No session token: pass --password or --token"));
    }
    client.open_channel().await?;
    let mut events = client.receive().await?;
    info!("Listening for notifications, press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                return Ok(());
            }
            frame = events.next() => match frame {
                Some(Ok(ChannelFrame::Notification(event))) => print_json(&event)?,
                Some(Ok(ChannelFrame::Raw(message))) => info!(len = message.len(); "Ignoring non-text frame"),
                Some(Err(e)) => warn!(error:% = e; "Notification error"),
                None => {
                    info!("Notification channel closed");
                    return Ok(());
                }
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
