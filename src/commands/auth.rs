use maskedemail::JmapClient;
use maskedemail::config::{Config, Settings};
use maskedemail::models::Output;

pub async fn auth(settings: &Settings, token: &str) -> anyhow::Result<()> {
    let settings = settings.with_token(token);
    let mut client = JmapClient::new(settings.client_config()?)?;
    let session = client.authenticate().await?;

    let mut config = Config::load()?;
    config.set_token(token.to_string());
    config.save()?;

    Output::<()>::success_msg(format!("Authenticated as {}", session.username)).print();

    Ok(())
}
