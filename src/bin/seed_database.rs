//! Confluency demo data seeder
//!
//! Fills a running confluency API with demo microplates and simulated growth
//! curves, going through the public endpoints so every reading is validated
//! exactly like a real client's.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:5000 --plates 3 --readings 5`

use anyhow::{Context, bail};
use clap::{Arg, Command, value_parser};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::time::Duration;

/// Standard plate formats as (rows, columns)
const PLATE_LAYOUTS: [(i32, i32); 3] = [(2, 3), (4, 6), (8, 12)];

#[derive(Debug, Default)]
pub struct SeedSummary {
    pub plates_created: usize,
    pub plates_skipped: usize,
    pub readings_created: usize,
}

pub struct DemoSeeder {
    client: Client,
    base_url: String,
    summary: SeedSummary,
}

/// Next point of a saturating growth curve: fast while sparse, slowing near full coverage
fn next_confluency(current: f64, rng: &mut impl Rng) -> f64 {
    let growth_rate = rng.random_range(0.25..0.6);
    let next = current + growth_rate * current * (1.0 - current / 100.0) + rng.random_range(0.0..2.0);
    (next * 10.0).round().clamp(0.0, 1000.0) / 10.0
}

impl DemoSeeder {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: format!("{}/api", base_url.trim_end_matches('/')),
            summary: SeedSummary::default(),
        })
    }

    async fn post(&self, endpoint: &str, payload: &Value) -> anyhow::Result<(StatusCode, Value)> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("POST {endpoint} failed"))?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn check_health(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .context("API is not reachable")?;
        if !response.status().is_success() {
            bail!("Health check returned {}", response.status());
        }
        Ok(())
    }

    /// Returns the new plate as JSON, or `None` when the name is already taken
    async fn create_plate(&mut self, name: &str) -> anyhow::Result<Option<Value>> {
        let (rows, columns) = PLATE_LAYOUTS[rand::rng().random_range(0..PLATE_LAYOUTS.len())];
        let (status, body) = self
            .post(
                "/microplates",
                &json!({"name": name, "rows": rows, "columns": columns}),
            )
            .await?;

        match status {
            StatusCode::CREATED => {
                self.summary.plates_created += 1;
                Ok(Some(body))
            }
            StatusCode::BAD_REQUEST => {
                println!(
                    "{} Skipping {}: {}",
                    style("!").yellow(),
                    style(name).bold(),
                    body["error"].as_str().unwrap_or("rejected")
                );
                self.summary.plates_skipped += 1;
                Ok(None)
            }
            other => bail!("Creating {name} failed with {other}: {body}"),
        }
    }

    async fn record_growth(&mut self, plate: &Value, readings: u32) -> anyhow::Result<()> {
        let id = plate["id"].as_i64().context("Plate response has no id")?;
        let rows = plate["rows"].as_i64().unwrap_or(0);
        let columns = plate["columns"].as_i64().unwrap_or(0);
        let name = plate["name"].as_str().unwrap_or("plate");

        let wells: Vec<(i64, i64)> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| (row, column)))
            .collect();

        let pb = ProgressBar::new(wells.len() as u64 * u64::from(readings));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")
                .context("Invalid progress template")?
                .progress_chars("##-"),
        );
        pb.set_message(format!("Seeding {name}"));

        let mut confluency: Vec<f64> = {
            let mut rng = rand::rng();
            wells.iter().map(|_| rng.random_range(3.0..15.0)).collect()
        };

        // One pass over the whole plate per time point, so timestamps interleave like a real run
        for _ in 0..readings {
            for (index, (row, column)) in wells.iter().enumerate() {
                let value = confluency[index];
                let (status, body) = self
                    .post(
                        &format!("/microplates/{id}/measurements"),
                        &json!({"row": row, "column": column, "confluency_percentage": value}),
                    )
                    .await?;
                if status != StatusCode::CREATED {
                    pb.abandon_with_message("Seeding aborted");
                    bail!("Measurement for well ({row}, {column}) rejected with {status}: {body}");
                }
                self.summary.readings_created += 1;
                confluency[index] = next_confluency(value, &mut rand::rng());
                pb.inc(1);
            }
        }

        pb.finish_with_message(format!("{name} seeded"));
        Ok(())
    }

    pub async fn seed(&mut self, prefix: &str, plates: u32, readings: u32) -> anyhow::Result<()> {
        println!("{} Checking API health...", style("[1/2]").bold().dim());
        self.check_health().await?;

        println!(
            "{} Creating {plates} microplates with {readings} readings per well...",
            style("[2/2]").bold().dim()
        );
        for n in 1..=plates {
            let name = format!("{prefix}-{n:03}");
            if let Some(plate) = self.create_plate(&name).await? {
                self.record_growth(&plate, readings).await?;
            }
        }

        println!(
            "{} Created {} plates ({} skipped) and {} readings",
            style("✓").green(),
            self.summary.plates_created,
            self.summary.plates_skipped,
            self.summary.readings_created
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("Confluency Demo Seeder")
        .version("0.1")
        .about("Seeds a running confluency API with demo microplates and growth curves")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:5000"),
        )
        .arg(
            Arg::new("plates")
                .short('p')
                .long("plates")
                .help("Number of microplates to create")
                .value_parser(value_parser!(u32))
                .default_value("3"),
        )
        .arg(
            Arg::new("readings")
                .short('r')
                .long("readings")
                .help("Readings per well")
                .value_parser(value_parser!(u32))
                .default_value("5"),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("Name prefix for the created microplates")
                .default_value("Demo-Plate"),
        )
        .get_matches();

    let base_url = matches
        .get_one::<String>("url")
        .context("missing --url")?;
    let plates = *matches.get_one::<u32>("plates").context("missing --plates")?;
    let readings = *matches
        .get_one::<u32>("readings")
        .context("missing --readings")?;
    let prefix = matches
        .get_one::<String>("prefix")
        .context("missing --prefix")?;

    println!("{}", style("Confluency Demo Seeder").bold());
    println!("{}", style("-".repeat(40)).dim());
    println!("API URL: {}", style(base_url).cyan());

    let mut seeder = DemoSeeder::new(base_url)?;
    seeder.seed(prefix, plates, readings).await
}
