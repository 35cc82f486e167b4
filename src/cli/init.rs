use super::error::{Result, ResultExt};
use super::ui;
use phoning_report::config::write_default_config;

pub fn execute(config: String, force: bool) -> Result<()> {
    ui::section_header("Phoning Report Configuration Setup");

    let written = write_default_config(&config, force)
        .with_context(|| format!("Failed to write {config}"))?;

    if written {
        ui::success_message(&format!("Configuration written to {config}"));
        ui::info_message(&format!(
            "Edit {config} to change the actor marker, exception actors or reason table"
        ));
    } else {
        ui::warning_message(&format!(
            "{config} already exists, use --force to overwrite it"
        ));
    }

    Ok(())
}
