use anyhow::Context as _;
use clap::Parser;
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use wavedock::{App, Config};

#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    /// Path to an alternative config file.
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match args.config.or_else(get_config_path) {
        Some(path) => {
            if path.exists() {
                load_config(path)?
            } else {
                let config = Config::default();
                save_config(path, &config)?;
                config
            }
        }
        _ => Config::default(),
    };
    SimpleLogger::new()
        .with_level(config.log_level.into())
        .init()
        .context("init logger")?;
    let mut app = App::new(config)?;
    app.run()?;
    Ok(())
}

fn get_config_path() -> Option<PathBuf> {
    env::var("XDG_CONFIG_HOME")
        .map(|config_dir| Path::new(&config_dir).to_path_buf())
        .or_else(|_| env::var("HOME").map(|home_dir| Path::new(&home_dir).join(".config")))
        .map(|config_dir| config_dir.join("wavedock").join("config.yaml"))
        .ok()
}

fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let yaml_string = fs::read_to_string(path).context("read config file")?;
    let config: Config = serde_yaml::from_str(&yaml_string).context("parse config file")?;
    Ok(config)
}

fn save_config(path: impl AsRef<Path>, config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent).context("create config directory")?;
    }
    let yaml_string = serde_yaml::to_string(config).context("serialize config")?;
    fs::write(path, yaml_string).context("write config file")?;
    Ok(())
}
