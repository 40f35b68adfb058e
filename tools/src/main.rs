//! pricer: headless marketplace price calculator.
//!
//! Usage:
//!   pricer --cost 42.90 --weight 650 --margin 30 --tax 7
//!   pricer --db tables.db --ipc-mode

use anyhow::Result;
use pricer_core::{
    calculator::{calculate_prices, PricingInput, PricingOutcome},
    config::PricerConfig,
    fee_table::{FeeTierRule, FeeTierTable},
    request::PricingRequest,
    store::FeeTableStore,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Price {
        #[serde(flatten)]
        request: PricingRequest,
    },
    GetTable {
        marketplace: String,
    },
    SetTable {
        marketplace: String,
        rules: Vec<FeeTierRule>,
    },
    ResetTable {
        marketplace: String,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let mut config = if Path::new(data_dir).exists() {
        PricerConfig::load(data_dir)?
    } else {
        log::warn!("data dir {data_dir} not found, using built-in tables");
        PricerConfig::default_test()
    };

    let store = if db == ":memory:" {
        FeeTableStore::in_memory()?
    } else {
        FeeTableStore::open(db)?
    };
    store.migrate()?;
    let applied = store.apply_overrides(&mut config.book)?;
    if applied > 0 {
        log::info!("applied {applied} stored fee table(s) from {db}");
    }

    if ipc_mode {
        return run_ipc_loop(&mut config, &store);
    }

    let input = PricingInput {
        product_cost:      parse_arg(&args, "--cost", 0.0),
        packaging_cost:    parse_arg(&args, "--packaging", config.defaults.packaging_cost),
        target_margin_pct: parse_arg(&args, "--margin", config.defaults.margin_pct),
        tax_pct:           parse_arg(&args, "--tax", config.defaults.tax_pct),
        weight_g:          parse_arg(&args, "--weight", 0.0),
        commissions:       config.commissions.clone(),
    };

    println!("Marketplace Pricer");
    println!("  cost:      {:.2}", input.product_cost);
    println!("  packaging: {:.2}", input.packaging_cost);
    println!("  margin:    {:.2}%", input.target_margin_pct);
    println!("  tax:       {:.2}%", input.tax_pct);
    println!("  weight:    {}g", input.weight_g);
    println!();

    print_summary(&calculate_prices(&input, &config.book));
    Ok(())
}

fn run_ipc_loop(config: &mut PricerConfig, store: &FeeTableStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let Some(reply) = handle_command(cmd, config, store) else {
            break;
        };

        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Answer one IPC command. None means the loop should stop.
fn handle_command(
    cmd: IpcCommand,
    config: &mut PricerConfig,
    store: &FeeTableStore,
) -> Option<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::Quit => return None,
        IpcCommand::Price { request } => match request.into_input(&config.commissions) {
            Ok(input) => calculate_prices(&input, &config.book).to_json(),
            Err(e) => PricingOutcome::Rejected(e).to_json(),
        },
        IpcCommand::GetTable { marketplace } => {
            serde_json::json!({
                "marketplace": marketplace,
                "rules": config.book.tier_table(&marketplace),
            })
        }
        IpcCommand::SetTable { marketplace, rules } => {
            let table = FeeTierTable::new(rules);
            match store.save_table(&marketplace, &table) {
                Ok(()) => serde_json::json!({
                    "marketplace": marketplace,
                    "applied": config.book.set_tier_table(&marketplace, table),
                }),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            }
        }
        IpcCommand::ResetTable { marketplace } => match store.reset_table(&marketplace) {
            Ok(removed) => serde_json::json!({
                "marketplace": marketplace,
                "removed": removed,
                "restored": config.book.reset_tier_table(&marketplace),
            }),
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        },
    };
    Some(reply)
}

fn print_summary(outcome: &PricingOutcome) {
    match outcome {
        PricingOutcome::Rejected(e) => println!("  error: {e}"),
        PricingOutcome::Priced(results) => {
            println!("=== PRICES ===");
            for (name, result) in results {
                match result {
                    Ok(q) => {
                        let note = if q.converged { "" } else { "  (not converged)" };
                        println!(
                            "  {name:<14} | Price: {:>9.2} | Profit: {:>8.2} | Margin: {:>6.2}% | Fee: {:.2} | Shipping: {:.2}{note}",
                            q.sale_price, q.real_profit, q.real_margin_pct, q.fixed_fee, q.shipping_cost
                        );
                    }
                    Err(e) => println!("  {name:<14} | error: {e}"),
                }
            }
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
