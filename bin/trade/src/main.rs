//! Memepad terminal front-end — browse, create and buy meme tokens.
//!
//! `buy` opens a purchase session for one token and reads commands from
//! stdin while the session's quote lookups run on the same task:
//! 1. Typing a number sets the amount (re-quoted after a short debounce)
//! 2. `s<N>` converts predefined shortcut N into a token amount
//! 3. `buy` submits once a quote for the current amount is in
//! 4. A confirmed purchase returns to the token gallery

use std::{sync::Arc, time::Duration};

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use eyre::Result;
use memepad_core::{Settings, telemetry};
use memepad_factory::{
    CreateTokenRequest, FactoryClient, SignerWallet,
    token::{self, CREATION_FEE_WEI, FUNDING_TARGET, INITIAL_MINT, MAX_SUPPLY},
};
use memepad_indexer::models::short_address;
use memepad_purchase::{
    ErrorKind, PurchaseSession, SessionConfig, SessionUpdate, View, units::format_base_units,
};
use tokio::io::{AsyncBufReadExt, BufReader};

type Session = PurchaseSession<FactoryClient, SignerWallet>;

#[derive(Parser, Debug)]
#[command(name = "trade")]
#[command(version)]
#[command(about = "Explore, create and buy bonding-curve meme tokens")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tokens created by the factory
    List {
        /// Only show tokens whose name or symbol contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show a token with its holders and recent transfers
    Show {
        #[arg(short, long)]
        token: Address,
    },
    /// Create a new meme token (pays the creation fee)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: String,
    },
    /// Buy tokens interactively
    Buy {
        #[arg(short, long)]
        token: Address,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_with_default("warn");
    let args = Args::parse();
    let settings = Settings::from_env()?;

    match args.command {
        Command::List { query } => list(&settings, query.as_deref().unwrap_or_default()).await,
        Command::Show { token } => show(&settings, token).await,
        Command::Create {
            name,
            symbol,
            description,
            image_url,
        } => {
            let request = CreateTokenRequest {
                name,
                symbol,
                description,
                image_url,
            };
            create(&settings, &request).await
        }
        Command::Buy { token } => buy(&settings, token).await,
    }
}

async fn list(settings: &Settings, query: &str) -> Result<()> {
    let factory = FactoryClient::connect(&settings.rpc_url, &settings.factory_address)?;
    let tokens = token::search(factory.list_tokens().await?, query);

    if tokens.is_empty() {
        println!("No tokens found.");
        return Ok(());
    }
    println!("Explore Community Tokens");
    for t in &tokens {
        println!(
            "  {:<8} {:<24} {}  raised {} ETH",
            t.symbol,
            t.name,
            t.token_address,
            t.funding_raised
        );
    }
    Ok(())
}

async fn show(settings: &Settings, token: Address) -> Result<()> {
    let factory = FactoryClient::connect(&settings.rpc_url, &settings.factory_address)?;
    let indexer = memepad_indexer::connect_with(settings)?;
    let details = factory.token_details(token).await?;
    let address = format!("{token:#x}");

    println!("{} ({})", details.name, details.symbol);
    println!("  {}", details.description);
    println!("  creator:  {}", details.creator_address);
    println!("  raised:   {} / {} ETH", details.funding_raised, FUNDING_TARGET);
    if !details.token_image_url.is_empty() {
        println!("  image:    {}", details.token_image_url);
    }

    // Holder and transfer lookups are display-only; a failing indexer should not hide the token.
    match indexer.get_owners(&address).await {
        Ok(owners) => {
            println!("Owners");
            for owner in owners {
                println!(
                    "  {}  {}%",
                    owner.owner_address, owner.percentage_relative_to_total_supply
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not load owners"),
    }
    match indexer.get_transfers(&address).await {
        Ok(transfers) => {
            println!("Transfers");
            for t in transfers {
                println!(
                    "  {} -> {}  {} {}  {}",
                    t.short_from(),
                    t.short_to(),
                    t.value_decimal,
                    details.symbol,
                    t.explorer_link(&settings.explorer_tx_url)
                );
            }
        }
        Err(e) => tracing::warn!(error = %e, "Could not load transfers"),
    }
    Ok(())
}

async fn create(settings: &Settings, request: &CreateTokenRequest) -> Result<()> {
    println!(
        "Creation fee: {} ETH. Max supply: {} tokens. Initial mint: {} tokens.",
        format_base_units(alloy::primitives::U256::from(CREATION_FEE_WEI)),
        MAX_SUPPLY,
        INITIAL_MINT
    );
    println!("If the funding target of {FUNDING_TARGET} ETH is met, a liquidity pool is created.");

    let Some(wallet) = SignerWallet::from_settings(settings)? else {
        println!("{}", ErrorKind::NoWallet.user_message());
        return Ok(());
    };
    match wallet.create_meme_token(request).await {
        Ok(tx_hash) => println!("Token created. Transaction hash: {tx_hash:#x}"),
        Err(e) => {
            tracing::warn!(kind = %e.kind, detail = %e.detail, "Token creation failed");
            println!("Error: {}", e.detail);
        }
    }
    Ok(())
}

// ─── Interactive purchase ───────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Amount(String),
    /// Zero-based shortcut index.
    Shortcut(usize),
    Buy,
    Clear,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "buy" | "purchase" => Input::Buy,
        "clear" => Input::Clear,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => match other.strip_prefix('s').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n >= 1 => Input::Shortcut(n - 1),
            _ => Input::Amount(line.to_string()),
        },
    }
}

async fn buy(settings: &Settings, token: Address) -> Result<()> {
    let factory = Arc::new(FactoryClient::connect(
        &settings.rpc_url,
        &settings.factory_address,
    )?);
    let details = factory.token_details(token).await?;
    let total_supply = factory.supply_snapshot(token).await?;
    if !settings.has_wallet() {
        tracing::info!("No wallet configured, quotes only");
    }
    let wallet = SignerWallet::from_settings(settings)?.map(Arc::new);

    let mut session = Session::new(
        SessionConfig {
            token,
            total_supply,
            default_amount: settings.default_purchase_amount.clone(),
            debounce: Duration::from_millis(settings.quote_debounce_ms),
        },
        factory,
        wallet,
    );

    println!(
        "Buy {} ({}) at {}, supply {} tokens",
        details.name,
        details.symbol,
        short_address(&format!("{:#x}", session.token())),
        session.total_supply()
    );
    print_help(&session);
    println!("Amount: {}  (calculating cost...)", session.amount());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(update) = session.next_update(), if session.is_loading() => {
                drain_notifications(&mut session);
                render_update(&update, &session);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => print_help(&session),
                    Input::Clear => {
                        session.set_amount("");
                        println!("Amount cleared.");
                    }
                    Input::Amount(amount) => {
                        session.set_amount(amount);
                        if session.is_loading() {
                            println!("Calculating cost...");
                        } else if let Some(quote) = session.cost() {
                            println!("Cost: {} ETH for {} tokens", quote.cost, quote.amount);
                        } else {
                            println!("Enter a whole number of tokens.");
                        }
                    }
                    Input::Shortcut(index) => match session.select_shortcut(index) {
                        Some(shortcut) => println!("Converting {}...", shortcut.label),
                        None => println!("No such shortcut."),
                    },
                    Input::Buy => {
                        if !session.can_submit() {
                            println!("Nothing to buy yet: enter an amount and wait for its cost.");
                        } else {
                            match session.submit().await {
                                Some(Ok(purchase)) => {
                                    drain_notifications(&mut session);
                                    if purchase.next_view == View::Landing {
                                        return list(settings, "").await;
                                    }
                                }
                                Some(Err(err)) => {
                                    drain_notifications(&mut session);
                                    print_retry_hint(err.kind, "type `buy` again");
                                }
                                None => {}
                            }
                        }
                    }
                }
            }
        }
        drain_notifications(&mut session);
    }
    Ok(())
}

fn render_update(update: &SessionUpdate, session: &Session) {
    match update {
        SessionUpdate::Quoted(quote) => println!(
            "Cost: {} ETH for {} tokens{}",
            quote.cost,
            quote.amount,
            if session.has_wallet() { "  (type `buy`)" } else { "" }
        ),
        SessionUpdate::AmountConverted { shortcut, amount } => {
            println!("{shortcut} buys {amount} tokens. Calculating cost...")
        }
        SessionUpdate::Failed(err) => print_retry_hint(err.kind, "enter the amount again"),
        SessionUpdate::Discarded => {}
    }
}

fn print_retry_hint(kind: ErrorKind, how: &str) {
    if kind.is_retryable() {
        println!("  ({how} to retry)");
    }
}

fn drain_notifications(session: &mut Session) {
    while let Some(notification) = session.dismiss(0) {
        println!("[{}] {}", notification.title, notification.message);
    }
}

fn print_help(session: &Session) {
    println!("Commands: <amount> | s<N> shortcut | buy | clear | quit");
    for (i, shortcut) in session.shortcuts().iter().enumerate() {
        println!("  s{}  {}", i + 1, shortcut.label);
    }
    if !session.has_wallet() {
        println!("  (no wallet configured: set WALLET_PRIVATE_KEY to make purchases)");
    }
}
