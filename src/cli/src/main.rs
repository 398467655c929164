//! CLI client for the millpond node.

use anyhow::Result;
use colored::Colorize;
use millpond_cli::commands::{
    approve, approve_reserve, balance, burn, deposit, grant_role, has_role, history, info, mint,
    mint_reserve, pause, reserve_balance, revoke_role, set_rate, sweep, transfer, unpause,
    withdraw,
};
use millpond_cli::config::CliConfig;
use millpond_core::format_amount;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the CLI client.
#[derive(Debug, StructOpt)]
#[structopt(name = "millpond", about = "Reserve-backed token ledger client")]
struct Opt {
    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Node to connect to
    #[structopt(short, long)]
    node: Option<String>,

    /// Subcommand to run
    #[structopt(subcommand)]
    cmd: Command,
}

/// Subcommands for the CLI client.
///
/// Accounts are given as labels or 32-byte hex addresses, and amounts as
/// human decimals ("1.5"). The pool answers to the label `millpond-pool`.
#[derive(Debug, StructOpt)]
enum Command {
    /// Get the token balance of an account
    #[structopt(name = "balance")]
    Balance {
        /// Account to query
        #[structopt(long)]
        account: String,
    },

    /// Get the reserve balance of an account
    #[structopt(name = "reserve-balance")]
    ReserveBalance {
        /// Account to query
        #[structopt(long)]
        account: String,
    },

    /// Show the pool and ledger summary
    #[structopt(name = "info")]
    Info,

    /// Show the pool deposit and withdrawal history
    #[structopt(name = "history")]
    History,

    /// Transfer tokens to another account
    #[structopt(name = "transfer")]
    Transfer {
        /// Sending account
        #[structopt(long)]
        from: String,

        /// Recipient account
        #[structopt(long)]
        to: String,

        /// Amount to transfer
        #[structopt(long)]
        amount: String,
    },

    /// Approve a spender on the token ledger
    #[structopt(name = "approve")]
    Approve {
        /// Owner account
        #[structopt(long)]
        from: String,

        /// Spender account
        #[structopt(long)]
        spender: String,

        /// Allowance amount
        #[structopt(long)]
        amount: String,
    },

    /// Approve a spender on the reserve ledger
    #[structopt(name = "approve-reserve")]
    ApproveReserve {
        /// Owner account
        #[structopt(long)]
        from: String,

        /// Spender account
        #[structopt(long)]
        spender: String,

        /// Allowance amount
        #[structopt(long)]
        amount: String,
    },

    /// Mint new tokens (minter only)
    #[structopt(name = "mint")]
    Mint {
        /// Minting account
        #[structopt(long)]
        from: String,

        /// Recipient account
        #[structopt(long)]
        to: String,

        /// Amount to mint
        #[structopt(long)]
        amount: String,
    },

    /// Mint new reserve units (reserve minter only)
    #[structopt(name = "mint-reserve")]
    MintReserve {
        /// Minting account
        #[structopt(long)]
        from: String,

        /// Recipient account
        #[structopt(long)]
        to: String,

        /// Amount to mint
        #[structopt(long)]
        amount: String,
    },

    /// Burn tokens from your own balance
    #[structopt(name = "burn")]
    Burn {
        /// Burning account
        #[structopt(long)]
        from: String,

        /// Amount to burn
        #[structopt(long)]
        amount: String,
    },

    /// Pause the token ledger (pauser only)
    #[structopt(name = "pause")]
    Pause {
        /// Pausing account
        #[structopt(long)]
        from: String,
    },

    /// Unpause the token ledger (pauser only)
    #[structopt(name = "unpause")]
    Unpause {
        /// Unpausing account
        #[structopt(long)]
        from: String,
    },

    /// Grant a role to an account (admin only)
    #[structopt(name = "grant-role")]
    GrantRole {
        /// Granting account
        #[structopt(long)]
        from: String,

        /// Role to grant (admin, minter or pauser)
        #[structopt(long)]
        role: String,

        /// Receiving account
        #[structopt(long)]
        to: String,
    },

    /// Revoke a role from an account (admin only)
    #[structopt(name = "revoke-role")]
    RevokeRole {
        /// Revoking account
        #[structopt(long)]
        from: String,

        /// Role to revoke (admin, minter or pauser)
        #[structopt(long)]
        role: String,

        /// Losing account
        #[structopt(long)]
        to: String,
    },

    /// Check whether an account holds a role
    #[structopt(name = "has-role")]
    HasRole {
        /// Role to check (admin, minter or pauser)
        #[structopt(long)]
        role: String,

        /// Account to query
        #[structopt(long)]
        account: String,
    },

    /// Deposit reserve into the pool and mint tokens at the exchange rate
    #[structopt(name = "deposit")]
    Deposit {
        /// Depositing account
        #[structopt(long)]
        from: String,

        /// Reserve amount to deposit
        #[structopt(long)]
        amount: String,
    },

    /// Burn tokens and withdraw reserve at the exchange rate
    #[structopt(name = "withdraw")]
    Withdraw {
        /// Withdrawing account
        #[structopt(long)]
        from: String,

        /// Token amount to redeem
        #[structopt(long)]
        amount: String,
    },

    /// Set the exchange rate (admin only)
    #[structopt(name = "set-rate")]
    SetRate {
        /// Updating account
        #[structopt(long)]
        from: String,

        /// New whole-number rate
        #[structopt(long)]
        rate: u64,
    },

    /// Sweep reserve out of pool custody (admin only)
    #[structopt(name = "sweep")]
    Sweep {
        /// Sweeping account
        #[structopt(long)]
        from: String,

        /// Recipient account
        #[structopt(long)]
        to: String,

        /// Reserve amount to sweep
        #[structopt(long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let opt = Opt::from_args();

    // Load configuration
    let mut config = match &opt.config {
        Some(path) => CliConfig::from_file(path)?,
        None => {
            let default_path = dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("millpond")
                .join("cli.json");
            if default_path.exists() {
                CliConfig::from_file(&default_path)?
            } else {
                CliConfig::default()
            }
        }
    };

    // Override node if specified
    if let Some(node) = opt.node {
        config.node = node;
    }

    // Run the appropriate command
    match opt.cmd {
        Command::Balance { account } => {
            let balance = balance::run(&config, &account).await?;
            println!("{} {}", "Balance:".green(), format_amount(balance));
        }
        Command::ReserveBalance { account } => {
            let balance = reserve_balance::run(&config, &account).await?;
            println!("{} {}", "Reserve balance:".green(), format_amount(balance));
        }
        Command::Info => {
            info::run(&config).await?;
        }
        Command::History => {
            history::run(&config).await?;
        }
        Command::Transfer { from, to, amount } => {
            let amount = transfer::run(&config, &from, &to, &amount).await?;
            println!("{} {}", "Transferred:".green(), format_amount(amount));
        }
        Command::Approve {
            from,
            spender,
            amount,
        } => {
            let amount = approve::run(&config, &from, &spender, &amount).await?;
            println!("{} {}", "Allowance set:".green(), format_amount(amount));
        }
        Command::ApproveReserve {
            from,
            spender,
            amount,
        } => {
            let amount = approve_reserve::run(&config, &from, &spender, &amount).await?;
            println!(
                "{} {}",
                "Reserve allowance set:".green(),
                format_amount(amount)
            );
        }
        Command::Mint { from, to, amount } => {
            let amount = mint::run(&config, &from, &to, &amount).await?;
            println!("{} {}", "Minted:".green(), format_amount(amount));
        }
        Command::MintReserve { from, to, amount } => {
            let amount = mint_reserve::run(&config, &from, &to, &amount).await?;
            println!("{} {}", "Reserve minted:".green(), format_amount(amount));
        }
        Command::Burn { from, amount } => {
            let amount = burn::run(&config, &from, &amount).await?;
            println!("{} {}", "Burned:".green(), format_amount(amount));
        }
        Command::Pause { from } => {
            pause::run(&config, &from).await?;
            println!("{}", "Token ledger paused".yellow());
        }
        Command::Unpause { from } => {
            unpause::run(&config, &from).await?;
            println!("{}", "Token ledger unpaused".green());
        }
        Command::GrantRole { from, role, to } => {
            grant_role::run(&config, &from, &role, &to).await?;
            println!("{} {}", "Role granted:".green(), role);
        }
        Command::RevokeRole { from, role, to } => {
            revoke_role::run(&config, &from, &role, &to).await?;
            println!("{} {}", "Role revoked:".green(), role);
        }
        Command::HasRole { role, account } => {
            let held = has_role::run(&config, &role, &account).await?;
            if held {
                println!("{} {}", "Role held:".green(), role);
            } else {
                println!("{} {}", "Role not held:".red(), role);
            }
        }
        Command::Deposit { from, amount } => {
            let minted = deposit::run(&config, &from, &amount).await?;
            println!("{} {}", "Minted:".green(), format_amount(minted));
        }
        Command::Withdraw { from, amount } => {
            let paid = withdraw::run(&config, &from, &amount).await?;
            println!("{} {}", "Reserve paid out:".green(), format_amount(paid));
        }
        Command::SetRate { from, rate } => {
            set_rate::run(&config, &from, rate).await?;
            println!("{} {}", "Exchange rate set:".green(), rate);
        }
        Command::Sweep { from, to, amount } => {
            let amount = sweep::run(&config, &from, &to, &amount).await?;
            println!("{} {}", "Reserve swept:".green(), format_amount(amount));
            println!(
                "{}",
                "WARNING: Swept reserve no longer backs circulating tokens!".red()
            );
        }
    }

    Ok(())
}
