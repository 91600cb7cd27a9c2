//! send_test_email - check Mailtrap credentials by sending one message

use anyhow::{anyhow, Result};
use clap::Parser;

use offroad_watch::alert::{MailSettings, DEFAULT_MAILTRAP_API_URL};
use offroad_watch::{EmailAlert, MailtrapMailer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Send a test email through Mailtrap")]
struct Args {
    /// Mailtrap API token.
    #[arg(long, env = "MAILTRAP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Recipient address.
    #[arg(long, env = "EMAIL_TO")]
    to: Option<String>,

    /// Send API endpoint.
    #[arg(long, env = "MAILTRAP_API_URL", default_value = DEFAULT_MAILTRAP_API_URL)]
    api_url: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let token = args
        .token
        .ok_or_else(|| anyhow!("MAILTRAP_TOKEN must be set"))?;
    let settings = MailSettings {
        api_url: args.api_url,
        recipient: args.to,
        ..MailSettings::default()
    };
    let mailer = MailtrapMailer::new(settings, token)?;

    let response = mailer.send_with_response(&EmailAlert::test_message())?;
    println!("{}", response);
    Ok(())
}
