use super::connect;
use maskedemail::config::Settings;
use maskedemail::jmap::MASKED_EMAIL_CAPABILITY;
use maskedemail::models::Output;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountSummary {
    id: String,
    name: String,
    masked_email: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSummary {
    username: String,
    api_url: String,
    default_account: Option<String>,
    accounts: Vec<AccountSummary>,
}

pub async fn show_session(settings: &Settings) -> anyhow::Result<()> {
    let client = connect(settings).await?;
    let session = client.session()?;

    let mut accounts: Vec<AccountSummary> = session
        .accounts
        .iter()
        .map(|(id, acc)| AccountSummary {
            id: id.clone(),
            name: acc.name.clone(),
            masked_email: session.account_has_capability(id, MASKED_EMAIL_CAPABILITY),
        })
        .collect();
    accounts.sort_by(|a, b| a.id.cmp(&b.id));

    Output::success(SessionSummary {
        username: session.username.clone(),
        api_url: session.api_endpoint()?.to_string(),
        default_account: session
            .default_account_for_capability(MASKED_EMAIL_CAPABILITY)
            .map(str::to_string),
        accounts,
    })
    .print();

    Ok(())
}
