use clap::Parser;
use config::{Cli, Commands, Config};
use log::info;
use tn_stellar::ops::decode_envelope;
use tn_stellar::options::{encode, parse_assignments};
use tn_stellar::{Client, Ledger};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    info!("running drills on {}", config.network);

    let client = |label: &str| Client::from_label(&config.deriver, label, config.network);
    let address = |label: &str| client(label).map(|c| c.address());
    let cosigners = config
        .cosigners
        .iter()
        .map(|label| client(label))
        .collect::<Result<Vec<_>, _>>()?;
    let cosigners: Vec<&Client> = cosigners.iter().collect();

    match cli.command {
        Commands::Keys { labels } => {
            for label in labels {
                let c = client(&label)?;
                println!("{:<8} seed {} address {}", label, c.secret_seed(), c.address());
            }
        }
        Commands::Fund { label } => {
            let ledger = Ledger::new(config.network)?;
            ledger.fund(&address(&label)?).await?;
        }
        Commands::Balance { label } => {
            let ledger = Ledger::new(config.network)?;
            let addr = address(&label)?;
            let account = ledger.load_account(&addr).await?;
            for balance in &account.balances {
                println!("Addr {} {:?}", addr, balance);
            }
            for signer in ledger.signers(&addr).await? {
                println!("Signer {:?}", signer);
            }
        }
        Commands::Data { label, key } => {
            let ledger = Ledger::new(config.network)?;
            match ledger.data_entry(&address(&label)?, &key).await? {
                Some(value) => println!("{} = {}", key, value),
                None => println!("{} not set", key),
            }
        }
        Commands::Decode { xdr } => {
            let envelope = decode_envelope(&xdr)?;
            println!("{:#?}", envelope);
        }
        Commands::Pay {
            from,
            to,
            amount,
            asset,
            issuer,
        } => {
            let ledger = Ledger::new(config.network)?;
            let issuer = issuer.as_deref().map(address).transpose()?;
            ledger
                .pay(
                    &client(&from)?,
                    &cosigners,
                    &address(&to)?,
                    &asset,
                    &amount,
                    issuer.as_deref(),
                    config.check,
                )
                .await?;
        }
        Commands::Trust {
            holder,
            issuer,
            code,
            limit,
        } => {
            let ledger = Ledger::new(config.network)?;
            ledger
                .trust(
                    &client(&holder)?,
                    &cosigners,
                    &code,
                    &address(&issuer)?,
                    &limit,
                    config.check,
                )
                .await?;
        }
        Commands::AllowTrust {
            issuer,
            trustor,
            code,
            revoke,
        } => {
            let ledger = Ledger::new(config.network)?;
            ledger
                .allow_trust(
                    &client(&issuer)?,
                    &cosigners,
                    &code,
                    &address(&trustor)?,
                    !revoke,
                    config.check,
                )
                .await?;
        }
        Commands::SetOptions { label, options } => {
            let request = parse_assignments(&options)?;
            let so = encode(&request)?;
            let ledger = Ledger::new(config.network)?;
            ledger
                .set_options(&client(&label)?, &cosigners, &so)
                .await?;
        }
    }

    Ok(())
}
