//! Client configuration read from the environment.

use envconfig::Envconfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Envconfig, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the clinic REST service, including the `/api` prefix.
    #[envconfig(from = "VETCLINIC_API_BASE_URL", default = "http://localhost:8080/api")]
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn base_url_defaults_to_local_backend() {
        let config = ClientConfig::init_from_hashmap(&HashMap::new()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn base_url_is_read_from_environment_map() {
        let vars = HashMap::from([(
            "VETCLINIC_API_BASE_URL".to_string(),
            "https://clinic.example.com/api".to_string(),
        )]);
        let config = ClientConfig::init_from_hashmap(&vars).unwrap();
        assert_eq!(config.base_url, "https://clinic.example.com/api");
    }
}
