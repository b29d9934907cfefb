use std::fs;
use std::path::PathBuf;
use config::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use perf_model::CalculatorConfig;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GlobalSettings {
    chart_width: u32,
    chart_height: u32,
    chart_output_path: String,
    #[serde(default)]
    calculator: CalculatorConfig
}

impl GlobalSettings {
    const CHART_WIDTH: &'static str = "chart_width";
    const CHART_HEIGHT: &'static str = "chart_height";
    const CHART_OUTPUT_PATH: &'static str = "chart_output_path";
    const CONFIG_FILENAME: &'static str = "launch-calc-conf";
    const ENV_PREFIX: &'static str = "LAUNCH_CALC";

    const DEFAULT_CHART_WIDTH: u32 = 800;
    const DEFAULT_CHART_HEIGHT: u32 = 600;
    const DEFAULT_CHART_OUTPUT_PATH: &'static str = "charts";

    pub fn default() -> Self {
        GlobalSettings {
            chart_width: GlobalSettings::DEFAULT_CHART_WIDTH,
            chart_height: GlobalSettings::DEFAULT_CHART_HEIGHT,
            chart_output_path: GlobalSettings::DEFAULT_CHART_OUTPUT_PATH.to_string(),
            calculator: CalculatorConfig::default()
        }
    }

    /// Defaults, then `launch-calc-conf.toml`, then `LAUNCH_CALC_*` environment variables.
    ///
    /// Nested keys are separated by a double underscore in the environment,
    /// e.g. `LAUNCH_CALC_CALCULATOR__STRATEGY=closed-form`
    pub fn load() -> Result<Self, ConfigError> {
        let builder = GlobalSettings::builder_with_defaults()?;
        return match builder
            .add_source(config::File::with_name(GlobalSettings::CONFIG_FILENAME))
            .add_source(config::Environment::with_prefix(GlobalSettings::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true))
            .build() {
            Ok(settings) => {
                settings.try_deserialize()
            }
            Err(e) => {
                warn!("Failed to load settings. {}", e.to_string());
                let settings = GlobalSettings::builder_with_defaults()?.build()?;
                let ret: GlobalSettings = settings.try_deserialize()?;
                ret.write().unwrap_or_else(|e| { error!("Failed to write settings. {}", e.to_string())});
                Ok(ret)
            }
        }
    }

    fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default(GlobalSettings::CHART_WIDTH, GlobalSettings::DEFAULT_CHART_WIDTH as i64)?
            .set_default(GlobalSettings::CHART_HEIGHT, GlobalSettings::DEFAULT_CHART_HEIGHT as i64)?
            .set_default(GlobalSettings::CHART_OUTPUT_PATH, GlobalSettings::DEFAULT_CHART_OUTPUT_PATH)
    }

    pub fn chart_size(&self) -> (u32, u32) {
        (self.chart_width, self.chart_height)
    }

    pub fn chart_output_path(&self) -> PathBuf {
        PathBuf::from(&self.chart_output_path)
    }

    pub fn calculator(&self) -> &CalculatorConfig {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut CalculatorConfig {
        &mut self.calculator
    }

    pub fn write(&self) -> std::io::Result<()> {
        fs::write(format!("{}.toml", GlobalSettings::CONFIG_FILENAME), toml::to_string(&self).map_err(|_e|{
            std::io::Error::new(std::io::ErrorKind::Other, "Failed to encode settings to toml")
        })?)
    }
}

#[cfg(test)]
mod tests {
    use perf_model::AccelerationStrategy;
    use crate::settings::GlobalSettings;

    #[test]
    fn defaults_survive_a_toml_round_trip() {
        let settings = GlobalSettings::default();
        let encoded = toml::to_string(&settings).unwrap();
        assert!(encoded.contains("strategy = \"simulation\""));
        let decoded: GlobalSettings = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn partial_file_keeps_model_defaults() {
        let decoded: GlobalSettings = toml::from_str(r#"
            chart_width = 1024
            chart_height = 768
            chart_output_path = "out"

            [calculator]
            strategy = "closed-form"
            sweep_max_kmh = 150
        "#).unwrap();
        assert_eq!(decoded.chart_size(), (1024, 768));
        assert_eq!(decoded.calculator().strategy, AccelerationStrategy::ClosedForm);
        assert_eq!(decoded.calculator().sweep_max_kmh, 150);
        assert_eq!(decoded.calculator().simulation, GlobalSettings::default().calculator().simulation);
    }
}
