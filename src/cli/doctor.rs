use anyhow::Result;
use console::style;

use crate::core::config::BotConfig;
use crate::core::pin::PinFlag;
use crate::core::sheets::{Collection, DataSource, SheetsClient};
use crate::core::terminal::{print_error, print_info, print_status, print_success, print_warn};

/// Validates the configuration and reads every sheet once, bypassing the
/// cache so fetch errors are reported instead of showing up as empty lists.
pub async fn run_doctor(config: &BotConfig) -> Result<()> {
    println!("\n {}", style("Configuration").bold().underlined());
    if let Err(e) = config.validate() {
        print_error(&format!("{:#}", e));
        return Ok(());
    }
    print_success("Required settings present.");

    if config.sheets.api_key.trim().is_empty() {
        print_warn("sheets.api_key (GOOGLE_API_KEY) is empty; only public spreadsheets can be read.");
    }

    let pin = config.pin_settings()?;
    if pin.chat_id == 0 {
        print_warn("pin.chat_id (PIN_CHAT_ID) is 0; the daily digest has nowhere to go.");
    } else {
        print_status("Digest chat", &pin.chat_id.to_string());
    }
    print_status(
        "Digest time",
        &format!("{} UTC{}", pin.time.format("%H:%M"), pin.utc_offset),
    );

    let flag = PinFlag::load(config.pin.flag_file.clone(), config.pin.enabled_by_default);
    print_status(
        "Daily digest",
        &format!(
            "{} ({})",
            if flag.is_enabled() { "on" } else { "off" },
            flag.path().display()
        ),
    );

    println!("\n {}", style("Spreadsheet").bold().underlined());
    let client = SheetsClient::new(
        config.sheets.spreadsheet_id.clone(),
        config.sheets.api_key.clone(),
    )?;
    let names = config.sheet_names();
    let mut failures = 0;
    for collection in Collection::ALL {
        let sheet = names.name_of(collection);
        match client.fetch_collection(sheet).await {
            Ok(rows) if rows.is_empty() => {
                print_warn(&format!("'{}': missing or empty", sheet));
            }
            Ok(rows) => {
                print_success(&format!("'{}': {} rows", sheet, rows.len()));
            }
            Err(e) => {
                failures += 1;
                print_error(&format!("'{}': {:#}", sheet, e));
            }
        }
    }

    println!();
    if failures == 0 {
        print_info("All checks finished.");
    } else {
        print_error(&format!("{} sheet(s) could not be read.", failures));
    }
    Ok(())
}
