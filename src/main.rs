use anyhow::Result;

use halosat_window::ObsCfg;

/// Writes the default observation config, to be edited and passed with `--cfg`.
pub fn main() -> Result<()> {
    env_logger::init();
    let path = std::env::args().nth(1).unwrap_or_else(|| "obs.yaml".to_string());
    ObsCfg::default().to_file(&path)?;
    log::info!("default config written to {}", path);
    Ok(())
}
