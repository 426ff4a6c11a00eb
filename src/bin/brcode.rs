use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pix_brcode::config::Config;
use pix_brcode::encoder::{self, parse_fields};
use pix_brcode::{Amount, PixCharge};

#[derive(Parser)]
#[command(name = "brcode", about = "Gerador de payload PIX estático (BR Code)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Builds the copy-paste payload for a charge
    Encode {
        /// PIX key of the payee; falls back to PIX_KEY
        key: Option<String>,
        /// Merchant name; falls back to PIX_MERCHANT_NAME
        name: Option<String>,
        /// Merchant city; falls back to PIX_MERCHANT_CITY
        city: Option<String>,
        /// Amount in reais, e.g. 25.50; omit for an open-amount code
        #[arg(long)]
        amount: Option<String>,
        /// Merchant reference embedded in the payload
        #[arg(long)]
        txid: Option<String>,
        /// Rejects inputs that would corrupt the TLV stream
        #[arg(long)]
        strict: bool,
        /// Prints a JSON object instead of the bare payload
        #[arg(long)]
        json: bool,
        /// Renders the payload as a QR code on the terminal (needs the `qr` feature)
        #[arg(long)]
        qr: bool,
    },
    /// Parses a payload and verifies its checksum
    Check {
        payload: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            key,
            name,
            city,
            amount,
            txid,
            strict,
            json,
            qr,
        } => {
            let config = Config::from_env();
            let key = key
                .or(config.key)
                .context("pix key required (argument or PIX_KEY)")?;
            let name = name
                .or(config.merchant_name)
                .context("merchant name required (argument or PIX_MERCHANT_NAME)")?;
            let city = city
                .or(config.merchant_city)
                .context("merchant city required (argument or PIX_MERCHANT_CITY)")?;

            let mut charge = PixCharge::new(&key, &name, &city);
            charge.amount = amount
                .map(|raw| raw.parse::<Amount>())
                .transpose()
                .context("--amount must be a plain decimal like 25.50")?;
            charge.txid = txid;

            let payload = if strict {
                encoder::try_encode(&charge)?
            } else {
                encoder::encode(&charge)
            };

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "payload": payload,
                        "amount": charge.amount.map(|a| a.to_string()),
                        "txid": charge.clean_txid(),
                    })
                );
            } else {
                println!("{payload}");
            }

            if qr {
                render_qr(&payload)?;
            }
        }
        Command::Check { payload } => {
            let fields = parse_fields(&payload).context("payload is not a valid TLV stream")?;
            for field in &fields {
                println!("{}  {:>3}  {}", field.id, field.value.len(), field.value);
            }
            if !encoder::checksum_matches(&payload) {
                bail!("checksum mismatch");
            }
            info!("checksum verified");
            println!("checksum OK");
        }
    }

    Ok(())
}

#[cfg(feature = "qr")]
fn render_qr(payload: &str) -> Result<()> {
    use qrcode::QrCode;

    let code = QrCode::new(payload.as_bytes()).context("payload does not fit in a QR code")?;
    let art = code
        .render::<char>()
        .quiet_zone(true)
        .module_dimensions(2, 1)
        .build();
    println!("{art}");
    Ok(())
}

#[cfg(not(feature = "qr"))]
fn render_qr(_payload: &str) -> Result<()> {
    bail!("this binary was built without the `qr` feature")
}
