use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Print tenant ids and default-account status. Secrets are never printed.
pub fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let table = config.account_table();
    let default = table.default_account();

    match output_format {
        OutputFormat::Json => {
            let report = json!({
                "accounts": table.tenant_ids(),
                "default_account": default.map(|a| json!({
                    "tenant_id": a.tenant_id,
                    "usable": a.is_usable(),
                })),
                "api_base_url": config.media.api_base_url,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Media API: {}", config.media.api_base_url);
            if table.is_empty() {
                println!("No accounts configured");
            }
            for tenant_id in table.tenant_ids() {
                println!("  {}", tenant_id);
            }
            match default {
                Some(a) if a.is_usable() => println!("Default account: {}", a.tenant_id),
                Some(a) => println!("Default account: {} (incomplete credentials)", a.tenant_id),
                None => println!("Default account: none"),
            }
        }
    }

    Ok(())
}
