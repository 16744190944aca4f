use crate::config::{AuthType, ConfigManager, TenantConfig};
use crate::error::Result;
use crate::graph::auth::GraphAuth;
use clap::Args;
use colored::Colorize;

/// Safely truncate a string to n characters (not bytes) to prevent panics on non-ASCII
fn truncate_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Tenant name (positional, if already configured)
    #[arg(index = 1)]
    name: Option<String>,

    /// Tenant name - alias for positional
    #[arg(short, long)]
    tenant: Option<String>,

    /// Tenant ID (Entra ID tenant ID), for quick setup
    #[arg(long)]
    tenant_id: Option<String>,

    /// Client ID (Application ID), for quick setup
    #[arg(long)]
    client_id: Option<String>,

    /// Client secret (for client credentials flow)
    #[arg(long)]
    client_secret: Option<String>,

    /// Use client credentials flow instead of device code
    #[arg(long)]
    client_credentials: bool,

    /// Tenant description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutArgs {
    /// Tenant name
    #[arg(short, long)]
    tenant: Option<String>,

    /// Logout from all tenants
    #[arg(long)]
    all: bool,
}

pub async fn login(args: LoginArgs) -> Result<()> {
    let config_manager = ConfigManager::new()?;
    let auth = GraphAuth::new(config_manager.clone());

    let tenant_name = args.name.as_ref().or(args.tenant.as_ref());

    let tenant_config = if let Some(name) = tenant_name {
        let tenant = config_manager.get_tenant(name)?;
        println!(
            "{} Loaded tenant: {} ({})",
            "✓".green(),
            name.bold(),
            tenant.description.as_deref().unwrap_or("")
        );
        println!("  Tenant ID: {}...", truncate_chars(&tenant.tenant_id, 8));
        println!("  Client ID: {}...", truncate_chars(&tenant.client_id, 8));
        if tenant.client_secret.is_some() {
            println!("  Auth: Client Credentials");
        } else {
            println!("  Auth: Device Code Flow");
        }

        tenant
    } else if let (Some(tenant_id), Some(client_id)) = (&args.tenant_id, &args.client_id) {
        // Quick setup: create a tenant config on the fly
        println!(
            "\n{} Quick setup mode: Creating tenant configuration...",
            "→".cyan()
        );

        let name = args.tenant.clone().unwrap_or_else(|| {
            let auto_name = tenant_id
                .split('-')
                .next()
                .unwrap_or("my-tenant")
                .to_string();
            println!(
                "\n{} Auto-generated tenant name: {}",
                "→".cyan(),
                auto_name.bold()
            );
            auto_name
        });

        let auth_type = if args.client_credentials || args.client_secret.is_some() {
            println!(
                "{} Using client credentials flow (automation mode)",
                "🔐".cyan()
            );
            AuthType::ClientCredentials
        } else {
            println!("{} Using device code flow (interactive mode)", "🔐".cyan());
            AuthType::DeviceCode
        };

        let tenant = TenantConfig {
            name: name.clone(),
            tenant_id: tenant_id.clone(),
            client_id: client_id.clone(),
            client_secret: args.client_secret.clone(),
            auth_type,
            description: args.description,
        };

        config_manager.add_tenant(tenant.clone())?;
        println!("{} Tenant '{}' configuration saved", "✓".green(), name);

        tenant
    } else {
        return Err(crate::error::Asg365Error::InvalidConfig(
            "Usage:\n  \
            asg365 login --tenant NAME  # Use existing config\n  \
            asg365 login --tenant-id ID --client-id ID  # Quick setup"
                .into(),
        ));
    };

    match tenant_config.auth_type {
        AuthType::DeviceCode => auth.login_device_code(&tenant_config).await?,
        AuthType::ClientCredentials => auth.login_client_credentials(&tenant_config).await?,
    };

    // Set as current tenant
    let mut config = config_manager.load_config()?;
    config.current_tenant = Some(tenant_config.name.clone());
    config_manager.save_config(&config)?;

    println!(
        "\n{} Active tenant: {}",
        "→".cyan(),
        tenant_config.name.bold()
    );
    Ok(())
}

pub async fn logout(args: LogoutArgs) -> Result<()> {
    let config_manager = ConfigManager::new()?;
    let auth = GraphAuth::new(config_manager.clone());

    if args.all {
        let tenants = config_manager.load_tenants()?;

        for tenant in &tenants {
            auth.logout(&tenant.name)?;
        }

        println!("{} Logged out from all tenants", "✓".green());
    } else if let Some(tenant_name) = &args.tenant {
        auth.logout(tenant_name)?;
    } else {
        let config = config_manager.load_config()?;

        if let Some(current_tenant) = config.current_tenant {
            auth.logout(&current_tenant)?;
        } else {
            println!("{} No active tenant", "!".yellow());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_handles_multibyte() {
        assert_eq!(truncate_chars("ab", 8), "ab");
        assert_eq!(truncate_chars("ålesund-tenant", 3), "åle");
    }
}
