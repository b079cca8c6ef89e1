use super::connect;
use maskedemail::config::Settings;
use maskedemail::models::Output;
use maskedemail::{MaskedEmailCreate, MaskedEmailUpdate};

pub async fn list_masked_emails(settings: &Settings, show_deleted: bool) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    let masked_emails = client
        .get_all_masked_emails(settings.account_id(), show_deleted)
        .await?;

    Output::success(masked_emails).print();
    Ok(())
}

pub async fn create_masked_email(
    settings: &Settings,
    for_domain: &str,
    description: Option<&str>,
    prefix: Option<&str>,
    pending: bool,
) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    let mut item = MaskedEmailCreate::new(for_domain)
        .description(description.unwrap_or_default())
        .enabled(!pending);
    if let Some(prefix) = prefix {
        item = item.email_prefix(prefix);
    }

    let masked_email = client
        .create_masked_email(settings.account_id(), item)
        .await?;

    Output::success(masked_email).print();
    Ok(())
}

pub async fn confirm_masked_email(settings: &Settings, id: &str) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    client
        .confirm_masked_email(settings.account_id(), id)
        .await?;

    Output::<()>::success_msg(format!("Masked email {} confirmed", id)).print();
    Ok(())
}

pub async fn enable_masked_email(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    client
        .enable_masked_email(settings.account_id(), email)
        .await?;

    Output::<()>::success_msg(format!("Masked email {} enabled", email)).print();
    Ok(())
}

pub async fn disable_masked_email(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    client
        .disable_masked_email(settings.account_id(), email)
        .await?;

    Output::<()>::success_msg(format!("Masked email {} disabled", email)).print();
    Ok(())
}

pub async fn delete_masked_email(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let client = connect(settings).await?;

    client
        .delete_masked_email(settings.account_id(), email)
        .await?;

    Output::<()>::success_msg(format!("Masked email {} deleted", email)).print();
    Ok(())
}

pub async fn update_masked_email(
    settings: &Settings,
    email: &str,
    for_domain: Option<&str>,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let mut patch = MaskedEmailUpdate::new();
    if let Some(domain) = for_domain {
        patch = patch.for_domain(domain);
    }
    if let Some(description) = description {
        patch = patch.description(description);
    }
    if patch.is_empty() {
        anyhow::bail!("Nothing to update. Pass --domain and/or --description.");
    }

    let client = connect(settings).await?;
    client
        .update_info(settings.account_id(), email, patch)
        .await?;

    Output::<()>::success_msg(format!("Masked email {} updated", email)).print();
    Ok(())
}
