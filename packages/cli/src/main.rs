#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line access to the cadastre map core.
//!
//! Every subcommand prints JSON to stdout so results can be piped into
//! other tools. Logging goes to stderr and is controlled by `RUST_LOG`.
//! Endpoints come from `CADASTRE_MAP_*` environment variables (see
//! [`SessionConfig::from_env`]).

mod surface;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cadastre_map_cadastral::{CadastralId, ObjectType, SelectionQuery, normalize_cadastral_id};
use cadastre_map_projection::{build_viewport, convert, extent_from_pkk, square_extent};
use cadastre_map_projection_models::{Extent, PkkResponse};
use cadastre_map_session::{CameraBounds, MapSession, SessionConfig};
use cadastre_map_style::{StyleCatalogue, enrich, try_enrich};
use clap::{Args, Parser, Subcommand};
use geojson::FeatureCollection;

use crate::surface::LogSurface;

#[derive(Parser)]
#[command(name = "cadastre_map_cli", about = "Cadastre map viewport and enrichment tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a planar point to `[lat, lon]`
    Convert {
        /// Easting in meters
        #[arg(allow_hyphen_values = true)]
        x: f64,
        /// Northing in meters
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },
    /// Compute the square padding and bbox string of an extent
    Square {
        #[command(flatten)]
        extent: ExtentArgs,
    },
    /// Build renderer viewport bounds for an extent or a cadastre response
    Viewport {
        #[command(flatten)]
        extent: ExtentArgs,
        #[command(flatten)]
        pkk: PkkArgs,
    },
    /// Normalize a cadastral id (e.g. `50:41:0030401:1`)
    NormalizeId {
        /// Cadastral id to normalize
        cid: String,
        /// Fail on malformed ids instead of echoing them
        #[arg(long)]
        strict: bool,
    },
    /// Merge style catalogue attributes into a `GeoJSON` feature collection
    Enrich {
        /// `GeoJSON` `FeatureCollection` file
        #[arg(long)]
        features: PathBuf,
        /// Style catalogue (`.json` or `.toml`)
        #[arg(long)]
        catalogue: PathBuf,
        /// Fail on the first feature without a catalogue match
        #[arg(long)]
        strict: bool,
    },
    /// Print the layer selection parameters for an object
    Selection {
        /// Object type (zu, oks, tzone, zone, zouit)
        #[arg(long = "type", value_parser = parse_object_type)]
        object_type: ObjectType,
        /// Cadastral id; malformed ids are rejected
        #[arg(long)]
        cid: String,
    },
    /// Frame and highlight an object from a cadastre response
    Focus {
        /// Object type (zu, oks, tzone, zone, zouit)
        #[arg(long = "type", value_parser = parse_object_type)]
        object_type: ObjectType,
        /// Cadastral id
        #[arg(long)]
        cid: String,
        #[command(flatten)]
        pkk: PkkArgs,
    },
    /// Fetch, enrich, and print the features for a camera position
    Refresh {
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long)]
        zoom: f64,
        /// Style catalogue (`.json` or `.toml`)
        #[arg(long)]
        catalogue: PathBuf,
    },
}

#[derive(Args)]
struct ExtentArgs {
    #[arg(long, allow_hyphen_values = true)]
    xmin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymin: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    xmax: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ymax: Option<f64>,
}

impl ExtentArgs {
    /// The extent, if all four edges were given.
    fn extent(&self) -> Option<Extent> {
        Some(Extent::new(self.xmin?, self.ymin?, self.xmax?, self.ymax?))
    }
}

#[derive(Args)]
struct PkkArgs {
    /// Cadastre object response (JSON with a `pkk` block)
    #[arg(long)]
    pkk: Option<PathBuf>,
    /// Use `pkk.extent2` instead of `pkk.extent`
    #[arg(long, requires = "pkk")]
    extent2: bool,
}

impl PkkArgs {
    /// Reads the selected extent from the response file, if one was given.
    fn extent(&self) -> Result<Option<Extent>, Box<dyn std::error::Error>> {
        let Some(path) = &self.pkk else {
            return Ok(None);
        };
        let response = read_pkk(path)?;
        let pkk = if self.extent2 {
            response.extent2()
        } else {
            response.extent()
        };
        Ok(Some(extent_from_pkk(pkk)?))
    }
}

fn parse_object_type(s: &str) -> Result<ObjectType, String> {
    s.parse().map_err(|_| {
        let names: Vec<String> = ObjectType::all().iter().map(ToString::to_string).collect();
        format!("unknown object type {s:?}, expected one of: {}", names.join(", "))
    })
}

fn read_pkk(path: &Path) -> Result<PkkResponse, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { x, y } => print_json(&convert(x, y).to_array())?,
        Commands::Square { extent } => {
            let extent = extent
                .extent()
                .ok_or("square requires --xmin, --ymin, --xmax, and --ymax")?;
            print_json(&square_extent(&extent))?;
        }
        Commands::Viewport { extent, pkk } => {
            let extent = match pkk.extent()? {
                Some(extent) => Some(extent),
                None => extent.extent(),
            };
            print_json(&build_viewport(extent.as_ref())?)?;
        }
        Commands::NormalizeId { cid, strict } => {
            let normalized = if strict {
                cid.parse::<CadastralId>()?.to_string()
            } else {
                normalize_cadastral_id(&cid)
            };
            println!("{normalized}");
        }
        Commands::Enrich {
            features,
            catalogue,
            strict,
        } => {
            let catalogue = StyleCatalogue::load(&catalogue)?;
            let collection: FeatureCollection =
                serde_json::from_str(&std::fs::read_to_string(&features)?)?;

            let enriched = if strict {
                try_enrich(collection, &catalogue)?
            } else {
                let outcome = enrich(collection, &catalogue);
                log::info!(
                    "Enriched {} features; unknown style ids: {:?}; without feature_id: {}",
                    outcome.enriched,
                    outcome.unknown_ids,
                    outcome.missing_feature_id
                );
                outcome.collection
            };
            print_json(&enriched)?;
        }
        Commands::Selection { object_type, cid } => {
            let config = SessionConfig::from_env()?;
            let cid = cid.parse::<CadastralId>()?;
            print_json(&SelectionQuery::new(
                object_type,
                &cid,
                &config.layers_api_url,
            ))?;
        }
        Commands::Focus {
            object_type,
            cid,
            pkk,
        } => {
            let session = MapSession::with_http_source(
                SessionConfig::from_env()?,
                Arc::new(StyleCatalogue::default()),
                Box::new(LogSurface),
            )?;
            let extent = pkk.extent()?;
            print_json(&session.focus_object(&cid, object_type, extent.as_ref())?)?;
        }
        Commands::Refresh {
            west,
            south,
            east,
            north,
            zoom,
            catalogue,
        } => {
            let catalogue = Arc::new(StyleCatalogue::load(&catalogue)?);
            let session = MapSession::with_http_source(
                SessionConfig::from_env()?,
                catalogue,
                Box::new(LogSurface),
            )?;
            let camera = CameraBounds {
                west,
                south,
                east,
                north,
                zoom,
            };
            let outcome = session.refresh(&camera).await?;
            print_json(&outcome.collection)?;
        }
    }

    Ok(())
}
