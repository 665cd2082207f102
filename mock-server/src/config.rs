use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct ServerConfig {
    #[envconfig(from = "HOST", default = "127.0.0.1")]
    pub host: String,

    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_backend_port() {
        let config = ServerConfig::init_from_hashmap(&HashMap::new()).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn port_is_parsed() {
        let vars = HashMap::from([("PORT".to_string(), "3001".to_string())]);
        let config = ServerConfig::init_from_hashmap(&vars).unwrap();
        assert_eq!(config.port, 3001);
    }
}
