//! Group assignment report
//!
//! Resolves a group, aggregates its assignments across the selected policy
//! categories, writes the HTML report, and opens it in the default viewer.

use crate::config::ConfigManager;
use crate::error::{Asg365Error, Result};
use crate::graph::{GraphClient, groups};
use crate::prompts;
use crate::report::categories::PolicyCategory;
use crate::report::{self, ReportRequest, html};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Output directory for the HTML report (defaults to the system temp directory)
    #[arg(index = 1)]
    pub output: Option<PathBuf>,

    /// Group display name (prompted for when omitted)
    #[arg(short, long)]
    pub group: Option<String>,

    /// Categories to inspect, comma-separated (e.g. applications,compliance).
    /// Use "all" for every category. Prompted for when omitted.
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Tenant to report against (defaults to the active tenant)
    #[arg(long)]
    pub tenant: Option<String>,

    /// Don't open the report in the default viewer
    #[arg(long)]
    pub no_open: bool,
}

/// Create a spinner for async operations
fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

pub async fn report(args: ReportArgs) -> Result<()> {
    println!("{} Intune assignment report", "asg365".cyan().bold());

    // Selection input: everything is collected and validated here, before
    // any token is loaded or network call is made.
    let request = collect_request(&args)?;

    let config = ConfigManager::load()?;
    let tenant = match &args.tenant {
        Some(name) => config.get_tenant(name)?,
        None => config.get_active_tenant()?.ok_or_else(|| {
            Asg365Error::ConfigError(
                "No active tenant. Run 'asg365 login' or pass --tenant".into(),
            )
        })?,
    };

    println!("→ Tenant: {}", tenant.name.cyan().bold());
    println!("→ Group: {}", request.group_name.cyan());
    println!("→ Categories: {}", request.categories.len());

    // The client handle is scoped to this invocation; it is dropped on
    // every exit path below, success or error.
    let graph = GraphClient::from_config(&config, &tenant.name).await?;

    let spinner = create_spinner(&format!("Resolving group '{}'...", request.group_name));
    let group = match groups::resolve_by_display_name(&graph, &request.group_name).await {
        Ok(group) => {
            spinner.finish_and_clear();
            group
        }
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    println!(
        "{} Resolved '{}' ({})",
        "✓".green(),
        group.display_name.bold(),
        group.id.dimmed()
    );

    let spinner = create_spinner("Collecting assignments...");
    let results = report::collect_categories(&graph, &group, &request.categories, |category| {
        spinner.set_message(format!("Collecting {}...", category));
    })
    .await;
    spinner.finish_and_clear();
    let results = results?;

    let found: usize = results
        .values()
        .flatten()
        .filter(|r| !r.is_sentinel)
        .count();
    println!(
        "{} {} assignment(s) across {} categories",
        "✓".green(),
        found,
        results.len()
    );

    // Write the report
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&output_dir)?;

    let report_path = output_dir.join(html::report_filename(&group));
    fs::write(&report_path, html::render(&group, &results))?;

    println!(
        "{} Report written to {}",
        "✓".green().bold(),
        report_path.display().to_string().cyan()
    );

    if !args.no_open {
        open_in_viewer(&report_path)?;
    }

    Ok(())
}

/// Build the ReportRequest from flags, falling back to interactive prompts.
/// Empty interactive answers re-prompt; they never propagate as errors.
fn collect_request(args: &ReportArgs) -> Result<ReportRequest> {
    let group_name = match &args.group {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        Some(_) => {
            return Err(Asg365Error::InvalidConfig(
                "--group must not be empty".into(),
            ));
        }
        None => prompts::input_required("Group display name")?,
    };

    let categories = if args.categories.is_empty() {
        let selected =
            prompts::multi_select_required("Policy categories to inspect", &PolicyCategory::ALL)?;
        selected
            .into_iter()
            .map(|i| PolicyCategory::ALL[i])
            .collect()
    } else {
        parse_categories(&args.categories)?
    };

    Ok(ReportRequest {
        group_name,
        categories,
    })
}

fn parse_categories(keys: &[String]) -> Result<Vec<PolicyCategory>> {
    if keys.iter().any(|k| k.eq_ignore_ascii_case("all")) {
        return Ok(PolicyCategory::ALL.to_vec());
    }

    keys.iter()
        .map(|key| {
            PolicyCategory::from_key(&key.to_lowercase()).ok_or_else(|| {
                let valid: Vec<&str> = PolicyCategory::ALL.iter().map(|c| c.key()).collect();
                Asg365Error::InvalidConfig(format!(
                    "Unknown category '{}'. Valid values: all, {}",
                    key,
                    valid.join(", ")
                ))
            })
        })
        .collect()
}

/// Open the report with the platform's default viewer
fn open_in_viewer(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    let spawned = std::process::Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn();

    #[cfg(target_os = "macos")]
    let spawned = std::process::Command::new("open").arg(path).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let spawned = std::process::Command::new("xdg-open").arg(path).spawn();

    match spawned {
        Ok(_) => Ok(()),
        Err(e) => {
            // The report exists either way; failing to launch a viewer
            // shouldn't fail the run.
            println!(
                "{} Could not open viewer ({}). Open the file manually.",
                "!".yellow(),
                e
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories_all_expands_to_eight() {
        let parsed = parse_categories(&["all".to_string()]).unwrap();
        assert_eq!(parsed.len(), 8);
    }

    #[test]
    fn test_parse_categories_all_wins_over_subset() {
        let parsed = parse_categories(&["applications".to_string(), "ALL".to_string()]).unwrap();
        assert_eq!(parsed.len(), 8);
    }

    #[test]
    fn test_parse_categories_subset() {
        let parsed =
            parse_categories(&["applications".to_string(), "compliance".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                PolicyCategory::Applications,
                PolicyCategory::DeviceCompliancePolicies
            ]
        );
    }

    #[test]
    fn test_parse_categories_rejects_unknown() {
        let err = parse_categories(&["firewall".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Unknown category 'firewall'"));
    }
}
