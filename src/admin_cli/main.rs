use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::fs;

use locality::api::cities::{CityFilter, CityService, CreateCity};
use locality::api::countries::{CountryService, CreateCountry};
use locality::api::extract::InputSchema;
use locality::api::states::{CreateState, StateFilter, StateService};
use locality::config::DatabaseConfig;
use locality::database::{schema, ConnectionManager};
use locality::services::{CrudService, Pagination};

/// Administration utility for the locality database.
/// Creates or drops the schema, loads seed data and prints table contents.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Table management.
    Schema {
        #[command(subcommand)]
        schema_command: SchemaCommand,
    },
    /// Loads countries with their states and cities from a JSON file.
    Seed {
        /// Path to a JSON array of countries.
        #[arg(short, long)]
        file: String,
    },
    /// Prints one table as JSON, ordered by id.
    Query {
        #[arg(short, long, value_enum)]
        table: Table,

        #[arg(long, default_value_t = 0)]
        skip: u64,

        #[arg(long, default_value_t = 100)]
        limit: u64,
    },
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Creates the country, state and city tables if missing.
    Create,
    /// Drops every table. All data is lost.
    Drop,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Table {
    Country,
    State,
    City,
}

#[derive(Debug, Deserialize)]
struct SeedCountry {
    name: String,
    code: String,
    #[serde(default)]
    states: Vec<SeedState>,
}

#[derive(Debug, Deserialize)]
struct SeedState {
    name: String,
    code: String,
    #[serde(default)]
    cities: Vec<SeedCity>,
}

#[derive(Debug, Deserialize)]
struct SeedCity {
    name: String,
    code: Option<String>,
}

/// Inserts through the services so seed data obeys the same rules as the API.
async fn seed(db: &ConnectionManager, countries: Vec<SeedCountry>) -> Result<(), Box<dyn std::error::Error>> {
    let (mut states_total, mut cities_total) = (0usize, 0usize);

    for seed_country in &countries {
        let country = CountryService::new(db)
            .create(
                CreateCountry {
                    name: seed_country.name.clone(),
                    code: seed_country.code.clone(),
                }
                .prepare()?,
            )
            .await?;
        println!("Country {} ({}) -> id {}", country.name, country.code, country.id);

        for seed_state in &seed_country.states {
            let state = StateService::new(db)
                .create(
                    CreateState {
                        country_id: country.id,
                        name: seed_state.name.clone(),
                        code: seed_state.code.clone(),
                    }
                    .prepare()?,
                )
                .await?;
            states_total += 1;

            for seed_city in &seed_state.cities {
                CityService::new(db)
                    .create(
                        CreateCity {
                            state_id: state.id,
                            name: seed_city.name.clone(),
                            code: seed_city.code.clone(),
                        }
                        .prepare()?,
                    )
                    .await?;
                cities_total += 1;
            }
        }
    }

    println!(
        "Seeded {} countries, {} states, {} cities.",
        countries.len(),
        states_total,
        cities_total
    );
    Ok(())
}

async fn query(db: &ConnectionManager, table: Table, page: Pagination) -> Result<String, Box<dyn std::error::Error>> {
    let json = match table {
        Table::Country => serde_json::to_string_pretty(&CountryService::new(db).list((), page).await?)?,
        Table::State => serde_json::to_string_pretty(
            &StateService::new(db).list(StateFilter::default(), page).await?,
        )?,
        Table::City => serde_json::to_string_pretty(
            &CityService::new(db).list(CityFilter::default(), page).await?,
        )?,
    };
    Ok(json)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    let settings = DatabaseConfig::from_env()?;
    let db = ConnectionManager::connect(&settings).await?;

    match cli.command {
        Commands::Schema { schema_command } => match schema_command {
            SchemaCommand::Create => {
                schema::create_tables(db.connection()).await?;
                println!("Tables created.");
            }
            SchemaCommand::Drop => {
                schema::drop_tables(db.connection()).await?;
                println!("Tables dropped.");
            }
        },
        Commands::Seed { file } => {
            println!("Loading seed file: {}", file);
            let raw = fs::read_to_string(&file)?;
            let countries: Vec<SeedCountry> = serde_json::from_str(&raw)?;
            seed(&db, countries).await?;
        }
        Commands::Query { table, skip, limit } => {
            let output = query(&db, table, Pagination::new(skip, limit)).await?;
            println!("{}", output);
        }
    }

    db.close().await?;
    Ok(())
}
