use clap::Parser;
use colored::*;
use header_primitives::{Head, Header, parse};
use header_store::config::{Args, Command};
use header_store::net::rpc::RpcClient;
use header_store::open_store;
use header_store::sync::sync_headers;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_header(header: &Header) {
    println!(
        "{} {}",
        format!("#{}", header.number).bright_cyan().bold(),
        parse::to_hex(&header.hash).bright_yellow()
    );
    println!("  parent     {}", parse::to_hex(&header.parent_hash));
    println!("  timestamp  {}", header.timestamp);
    println!("  miner      {}", parse::to_hex(&header.author));
    println!("  gas        {} / {}", header.gas_used, header.gas_limit);
    println!("  difficulty {}", header.difficulty);
    if let Some(base_fee) = header.base_fee_per_gas {
        println!("  base fee   {base_fee}");
    }
}

fn print_head(head: &Head) {
    println!(
        "{} {} (parent {})",
        format!("#{}", head.number).bright_cyan().bold(),
        parse::to_hex(&head.hash).bright_yellow(),
        parse::to_hex(&head.parent_hash)
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("sled=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let store = open_store(args.backend, &args.db_path)?;
    info!(backend = ?args.backend, path = %args.db_path.display(), "opened header store");

    match args.command {
        Command::Sync(sync) => {
            let client = RpcClient::new(&sync.rpc_url)?;
            let tip = client.get_block_number().await?;
            info!(tip, "connected to node");
            let report = sync_headers(&client, &store, &sync.options()).await?;
            println!(
                "{} stored {}, skipped {}, next height {}",
                "sync done:".bright_green().bold(),
                report.stored,
                report.skipped,
                report.next_height
            );
        }
        Command::Get { hash } => print_header(&store.get_by_hash(&hash)?),
        Command::Height { number, limit } => {
            let headers = store.list_by_height(number, limit)?;
            if headers.is_empty() {
                println!("{}", format!("no headers at height {number}").bright_red());
            }
            for header in &headers {
                print_header(header);
            }
        }
        Command::Head => match store.head()? {
            Some(head) => print_head(&head),
            None => println!("{}", "store is empty".bright_red()),
        },
    }

    Ok(())
}
