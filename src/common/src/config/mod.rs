use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use once_cell::sync::OnceCell;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;

pub static CONFIG: OnceCell<Configuration> = OnceCell::new();

pub const CONFIG_FILE: &str = "nrmetrics.toml";
pub const ENV_PREFIX: &str = "NRMETRICS__";

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ExporterConfig {
    /// Value of the `service.name` attribute added to every metric.
    /// Empty means no service attribute is added.
    pub service_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Configuration {
    /// Exporter settings
    pub exporter: ExporterConfig,
    /// Static resource attributes describing this process
    #[serde(default)]
    pub resource: BTreeMap<String, String>,
}

impl Configuration {
    /// Builds the OpenTelemetry resource from the configured attributes.
    pub fn resource(&self) -> Resource {
        Resource::builder_empty()
            .with_attributes(
                self.resource
                    .iter()
                    .map(|(key, value)| KeyValue::new(key.clone(), value.clone())),
            )
            .build()
    }

    pub fn load() -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(CONFIG_FILE))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(Toml::file(path))
    }

    fn figment(file: figment::providers::Data<Toml>) -> Result<Self, Box<figment::Error>> {
        let config = Figment::from(Serialized::defaults(Configuration::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_configuration_has_no_service_name() {
        let config = Configuration::default();

        assert_eq!(config.exporter.service_name, "");
        assert!(config.resource.is_empty());
        assert_eq!(config.resource().len(), 0);
    }

    #[test]
    fn test_configless_operation() {
        Jail::expect_with(|_jail| {
            let config = Configuration::load().map_err(|e| *e)?;

            assert_eq!(config.exporter.service_name, "");
            assert!(config.resource.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [exporter]
                service_name = "checkout-api"

                [resource]
                "host.name" = "web-1"
                "deployment.environment" = "production"
                "#,
            )?;

            let config = Configuration::load().map_err(|e| *e)?;

            assert_eq!(config.exporter.service_name, "checkout-api");
            assert_eq!(config.resource["host.name"], "web-1");

            let resource = config.resource();
            assert_eq!(resource.len(), 2);
            assert!(
                resource
                    .iter()
                    .any(|(key, value)| key.as_str() == "host.name" && value.to_string() == "web-1")
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_var_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [exporter]
                service_name = "from-file"
                "#,
            )?;
            jail.set_env("NRMETRICS__EXPORTER__SERVICE_NAME", "from-env");

            let config = Configuration::load().map_err(|e| *e)?;

            assert_eq!(config.exporter.service_name, "from-env");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_path() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [exporter]
                service_name = "custom"
                "#,
            )?;

            let config =
                Configuration::load_from_path(Path::new("custom.toml")).map_err(|e| *e)?;

            assert_eq!(config.exporter.service_name, "custom");
            Ok(())
        });
    }
}
