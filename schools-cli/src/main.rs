use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// School registry and proximity CLI tool
#[derive(Parser)]
#[command(name = "schools")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(
        short,
        long,
        env = "SCHOOLS_DATABASE_URL",
        default_value = schools::database::DEFAULT_DATABASE_URL,
        global = true
    )]
    database_url: String,

    /// Maximum pooled database connections
    #[arg(long, env = "SCHOOLS_MAX_CONNECTIONS", default_value = "5", global = true)]
    max_connections: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a single school
    Add {
        /// School name
        #[arg(long)]
        name: String,

        /// Postal address
        #[arg(long)]
        address: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output the stored school as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Import schools from a CSV file
    Import {
        /// Input CSV file with a header row
        input: PathBuf,

        /// Column name for the school name
        #[arg(long, default_value = "name")]
        name_col: String,

        /// Column name for the address
        #[arg(long, default_value = "address")]
        address_col: String,

        /// Column name for latitude
        #[arg(long, default_value = "latitude")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "longitude")]
        lon_col: String,
    },

    /// List all schools ordered by distance from a point
    Nearby {
        /// Reference latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Reference longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long, conflicts_with = "geojson")]
        json: bool,

        /// Output result as a GeoJSON FeatureCollection
        #[arg(short, long)]
        geojson: bool,
    },

    /// Show a single school
    Get {
        /// School id
        id: i64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Great-circle distance between two points (no database needed)
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        from_lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        to_lon: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let db = commands::DbArgs {
        url: cli.database_url,
        max_connections: cli.max_connections,
    };

    match cli.command {
        Commands::Add {
            name,
            address,
            lat,
            lon,
            json,
        } => commands::add::run(&db, name, address, lat, lon, json).await,
        Commands::Import {
            input,
            name_col,
            address_col,
            lat_col,
            lon_col,
        } => {
            let columns = commands::import::Columns {
                name: name_col,
                address: address_col,
                latitude: lat_col,
                longitude: lon_col,
            };
            commands::import::run(&db, input, columns).await
        }
        Commands::Nearby {
            lat,
            lon,
            json,
            geojson,
        } => commands::nearby::run(&db, lat, lon, json, geojson).await,
        Commands::Get { id, json } => commands::get::run(&db, id, json).await,
        Commands::Distance {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
        } => commands::distance::run(from_lat, from_lon, to_lat, to_lon),
    }
}
