mod auth;
mod masked;
mod session;

pub use auth::*;
pub use masked::*;
pub use session::*;

use maskedemail::JmapClient;
use maskedemail::config::Settings;

async fn connect(settings: &Settings) -> anyhow::Result<JmapClient> {
    let mut client = JmapClient::new(settings.client_config()?)?;
    client.authenticate().await?;
    Ok(client)
}
