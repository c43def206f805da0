use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{constants::DEFAULT_POINTING_RADIUS_DEG, error::Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsCfg {
    pub window: WindowCfg,
    pub pointings: PointingCfg,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowCfg {
    pub radius_deg: f64,
    /// Resolution of the map the window is drawn on.
    pub nside: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointingCfg {
    pub nside: usize,
    pub count: usize,
    pub radius_deg: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WindowCfg {
    fn default() -> Self {
        WindowCfg {
            radius_deg: 10.0,
            nside: 512,
        }
    }
}

impl Default for PointingCfg {
    fn default() -> Self {
        PointingCfg {
            nside: 128,
            count: 300,
            radius_deg: DEFAULT_POINTING_RADIUS_DEG,
            seed: None,
        }
    }
}

impl ObsCfg {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        Ok(serde_yaml::from_reader(&mut file)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        serde_yaml::to_writer(&mut file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.yaml");
        let mut cfg = ObsCfg::default();
        cfg.pointings.seed = Some(11);
        cfg.to_file(&path).unwrap();
        assert_eq!(ObsCfg::from_file(&path).unwrap(), cfg);
    }

    #[test]
    fn seed_is_optional() {
        let text = "window:\n  radius_deg: 12.5\n  nside: 64\npointings:\n  nside: 32\n  count: 10\n  radius_deg: 5.05\n";
        let cfg: ObsCfg = serde_yaml::from_str(text).unwrap();
        assert_eq!(cfg.window.radius_deg, 12.5);
        assert_eq!(cfg.pointings.seed, None);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            ObsCfg::from_file("/nonexistent/obs.yaml"),
            Err(crate::error::SkyError::Io(_))
        ));
    }
}
