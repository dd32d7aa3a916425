use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelfeed_config::{CredentialStore, PathManager};

pub async fn run_clear(credentials: bool, output: &Output) -> Result<()> {
    if !credentials {
        output.warn("No clear option specified. Use --credentials");
        output.println("\nExample: reelfeed clear --credentials");
        return Ok(());
    }

    clear_credentials(&PathManager::default(), output).await
}

async fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();
    if !credentials_file.exists() {
        output.info("No credentials file found to clear");
        return Ok(());
    }

    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .clear()
        .map_err(|e| eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e))?;
    output.success(format!("Cleared credentials: {}", credentials_file.display()));
    Ok(())
}
