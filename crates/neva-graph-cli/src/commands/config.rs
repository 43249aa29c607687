//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Show the effective configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("ngraph configuration");
    println!("{:-<40}", "");
    match config.layout_timeout() {
        Some(timeout) => println!("Layout timeout:  {} ms", timeout.as_millis()),
        None => println!("Layout timeout:  (none)"),
    }
    let kinds: Vec<&str> = config.eligible_kinds.iter().map(|kind| kind.label()).collect();
    println!("Hoverable kinds: {}", kinds.join(", "));

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }
    Ok(())
}
