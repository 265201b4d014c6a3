// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! orgsync REST API server binary

use clap::Parser;
use orgsync_rest_server::{Server, ServerArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    args.logging.init("orgsync-server")?;

    let config = args.into_config();
    config.log_startup();

    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
