use anyhow::Result;
use clap::{Parser, Subcommand};
use skycast_core::{App, Config, ServiceId, TemperatureUnit};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather lookup with a matching animated image")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key for a backing service.
    Configure {
        /// Service short name, e.g. "visualcrossing" or "giphy".
        service: Option<String>,
    },

    /// Look up and print the forecast for a location.
    Show {
        /// Location free text, e.g. "Seattle" or "New York".
        location: String,

        /// Display unit, "f" or "c"; defaults to the configured unit.
        #[arg(long)]
        unit: Option<String>,
    },

    /// Search loop with a Fahrenheit/Celsius toggle.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { service } => configure(service),
            Command::Show { location, unit } => show(&location, unit).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(service: Option<String>) -> Result<()> {
    let id = match service {
        Some(name) => ServiceId::try_from(name.as_str())?,
        None => inquire::Select::new("Which service?", ServiceId::all().to_vec()).prompt()?,
    };

    let api_key =
        inquire::Password::new(&format!("API key for {id}:")).without_confirmation().prompt()?;

    let mut config = Config::load()?;
    config.upsert_service_api_key(id, api_key);
    config.save()?;

    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: &str, unit: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let app = App::from_config(&config)?;

    if let Some(unit) = unit {
        app.set_unit(TemperatureUnit::try_from(unit.as_str())?);
    }

    // One-shot output: let the illustration settle before the only print.
    if let Some(image_task) = app.search(location).await {
        let _ = image_task.await;
    }

    print!("{}", app.render());
    Ok(())
}

async fn interactive() -> Result<()> {
    let config = Config::load()?;
    let app = App::from_config(&config)?;

    loop {
        let choice =
            match inquire::Select::new("skycast", vec!["Search", "Toggle unit", "Show", "Quit"])
                .prompt()
            {
                Ok(choice) => choice,
                Err(
                    inquire::InquireError::OperationCanceled
                    | inquire::InquireError::OperationInterrupted,
                ) => break,
                Err(err) => return Err(err.into()),
            };

        match choice {
            "Search" => {
                let location = inquire::Text::new("Location:").prompt()?;
                if location.trim().is_empty() {
                    continue;
                }
                // The illustration task is dropped here; a later render
                // picks the URL up once it lands.
                let _ = app.search(location.trim()).await;
                print!("{}", app.render());
            }
            "Toggle unit" => {
                app.toggle_unit();
                print!("{}", app.render());
            }
            "Show" => print!("{}", app.render()),
            _ => break,
        }
    }

    Ok(())
}
