// ABOUTME: Server binary for the recipebook nutrition API
// ABOUTME: Loads env configuration, opens the food cache, and serves lookups and keyword search
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipebook Nutrition Server Binary
//!
//! Serves cached USDA `FoodData` Central data over HTTP, calling upstream only
//! when the cache cannot answer and the quota allows it.

use anyhow::Result;
use clap::Parser;
use recipebook_nutrition::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    external::UsdaClient,
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "recipebook-nutrition-server")]
#[command(about = "Recipebook nutrition API - cached USDA FoodData Central lookups")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (e.g. sqlite:./data/nutrition.db)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return Err(e.into());
        }
    };

    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url)?;
    }

    info!("Starting recipebook nutrition server");
    info!("{}", config.summary());

    let database = Database::new(&config.database).await?;
    let client = UsdaClient::new(config.fdc.clone())?;
    let resources = Arc::new(ServerResources::new(config, database, Arc::new(client)));

    if let Err(e) = server::run(resources).await {
        error!(error = %e, "Server stopped with error");
        return Err(e.into());
    }

    info!("Server shut down cleanly");
    Ok(())
}
