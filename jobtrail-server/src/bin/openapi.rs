//! Prints the OpenAPI document of jobtrail-server as JSON.

use anyhow::Result;
use jobtrail_server::docs::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
