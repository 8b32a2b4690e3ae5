use std::{env, fmt, fs};

use std::fmt::Debug;

use serde::Deserialize;

#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
pub enum ServiceMode {
    Product,
    Dev,
    Local,
    Test, //for testcase
}

impl std::str::FromStr for ServiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(ServiceMode::Product),
            "dev" => Ok(ServiceMode::Dev),
            "local" => Ok(ServiceMode::Local),
            "test" => Ok(ServiceMode::Test),
            _ => Err("Don't support this service mode".to_string()),
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ServiceMode::Product => "product",
            ServiceMode::Dev => "dev",
            ServiceMode::Local => "local",
            ServiceMode::Test => "test",
        };
        write!(f, "{}", description)
    }
}

#[derive(Deserialize, Debug)]
pub struct Database {
    pub host: String,
    pub port: u32,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl Database {
    pub fn db_uri(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

#[derive(Deserialize, Debug)]
pub struct Smtp {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
}

///read config data for env
#[derive(Deserialize, Debug)]
pub struct EnvConf {
    /// product, dev, local or test
    pub service_mode: ServiceMode,
    /// http service port
    pub api_port: usize,
    pub database: Database,
    pub smtp: Smtp,
    /// receives payment proof notifications
    pub admin_email: String,
    /// where uploaded payment images are written
    pub upload_dir: String,
    /// origins allowed to send the session cookie
    pub allowed_origins: Vec<String>,
}

pub fn load_conf(path: &str) -> Result<EnvConf, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("read {}: {}", path, e))?;
    toml::from_str(content.as_str()).map_err(|e| format!("parse {}: {}", path, e))
}

lazy_static! {
    pub static ref CONF: EnvConf = {
        let path = env::var("CONFIG").expect("CONFIG environment variable required");
        load_conf(&path).expect("contents of configuration file invalid")
    };

    pub static ref TOKEN_SECRET_KEY: String = {
        if let Ok(value) = env::var("TOKEN_SECRET_KEY") {
            value
        } else {
            "your_secret_key".to_string()
        }
    };
}
