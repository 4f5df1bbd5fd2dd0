//! Run the wrap or borrow-cycle procedure against Casper livenet/testnet.
//!
//! Usage:
//!   cargo run --bin lend_cycle --release -- wrap
//!   cargo run --bin lend_cycle --release -- borrow-cycle --json
//!
//! Requires .env file with:
//!   ODRA_CASPER_LIVENET_SECRET_KEY_PATH=/path/to/secret_key.pem
//!   ODRA_CASPER_LIVENET_NODE_ADDRESS=https://node.testnet.casper.network
//!   ODRA_CASPER_LIVENET_CHAIN_NAME=casper-test
//!   ODRA_CASPER_LIVENET_PAYMENT_AMOUNT=200000000000
//!   LEND_WRAPPED_TOKEN=hash-...
//!   LEND_REGISTRY=hash-...
//!   LEND_STABLECOIN=hash-...
//!   LEND_PRICE_FEED=hash-...

use clap::Parser;

use lend_cycle::config::{Args, Command, Config};
use lend_cycle::{run_borrow_cycle, run_wrap, OdraGateway, Result};

fn main() {
    // Load environment from .env file
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // The livenet host panics on bad .env values and RPC failures.
    std::panic::set_hook(Box::new(|info| {
        eprintln!("Error: {}", info);
        std::process::exit(1);
    }));

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_options(args.options)?;
    config.validate(args.command)?;
    config.log_configuration();

    let env = odra_casper_livenet_env::env();
    env.set_gas(config.payment_amount);

    let mut gateway = OdraGateway::livenet(env, &config.addresses);
    log::info!("Caller: {:?}", gateway.env().caller());

    match args.command {
        Command::Wrap => {
            let report = run_wrap(&mut gateway, &config)?;
            if config.json {
                println!("{}", report.to_json());
            }
        }
        Command::BorrowCycle => {
            let report = run_borrow_cycle(&mut gateway, &config)?;
            if config.json {
                println!("{}", report.to_json());
            }
        }
    }

    log::info!("Done.");
    Ok(())
}
