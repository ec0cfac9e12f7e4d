//! User configuration options.

use std::{
    fs::{File, OpenOptions, create_dir_all},
    io::{Read, Write},
    path::PathBuf,
};

use dirs::config_dir;
use log::{LevelFilter, error, info, warn};
use serde::{Deserialize, Serialize};
use xg::XgOptions;

use crate::{BASE_DIR, cli::CLIOptions};

const LOG_TAG: &str = "UserConfig";

fn get_cfg_file() -> Option<PathBuf> {
    let Some(mut dir) = config_dir() else {
        warn!(target: LOG_TAG, "Couldn't find the user config dir");
        return None;
    };
    dir.push(BASE_DIR);
    if !dir.exists() {
        if let Err(e) = create_dir_all(&dir) {
            warn!(target: LOG_TAG, "Couldn't create {:?}: {}", dir, e);
            return None;
        }
    }
    dir.push("user.toml");
    Some(dir)
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Definitions loaded when none are given on the command line
    pub defs: String,
    /// Compiled lump loaded when none is given on the command line
    pub lump: String,
    /// Log level name, as accepted by `--verbose`
    pub verbose: String,
    pub xg: XgOptions,
}

impl UserConfig {
    /// Read the config, creating a default one if there is none or it can't
    /// be understood
    pub fn load() -> Self {
        let Some(path) = get_cfg_file() else {
            return UserConfig::new_default();
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path);
        let mut file = match file {
            Ok(file) => file,
            Err(e) => {
                warn!(target: LOG_TAG, "Couldn't open {:?}: {}", path, e);
                return UserConfig::new_default();
            }
        };

        let mut buf = String::new();
        if let Ok(read_len) = file.read_to_string(&mut buf) {
            if read_len == 0 {
                return UserConfig::create_default(&mut file);
            }
            match toml::from_str(&buf) {
                Ok(data) => {
                    info!(target: LOG_TAG, "Loaded user config file");
                    return data;
                }
                Err(e) => warn!(target: LOG_TAG, "Could not deserialise {:?} ({}), recreating config", path, e),
            }
        }
        UserConfig::create_default(&mut file)
    }

    fn new_default() -> Self {
        UserConfig {
            verbose: LevelFilter::Warn.to_string(),
            ..UserConfig::default()
        }
    }

    fn create_default(file: &mut File) -> Self {
        let config = UserConfig::new_default();
        match toml::to_string(&config) {
            Ok(data) => match file.write_all(data.as_bytes()) {
                Ok(_) => info!(target: LOG_TAG, "Created default user config file"),
                Err(e) => error!(target: LOG_TAG, "Could not write config: {}", e),
            },
            Err(e) => error!(target: LOG_TAG, "Could not serialise config: {}", e),
        }
        config
    }

    pub fn write(&self) {
        let Some(path) = get_cfg_file() else {
            return;
        };
        let data = match toml::to_string_pretty(self) {
            Ok(data) => data,
            Err(e) => {
                error!(target: LOG_TAG, "Could not serialise config: {}", e);
                return;
            }
        };
        match File::create(&path) {
            Ok(mut file) => file
                .write_all(data.as_bytes())
                .unwrap_or_else(|err| error!(target: LOG_TAG, "Could not write config: {}", err)),
            Err(e) => error!(target: LOG_TAG, "Couldn't overwrite {:?}: {}", path, e),
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        match &cli.defs {
            Some(defs) if *defs != self.defs => {
                defs.clone_into(&mut self.defs);
                info!(target: LOG_TAG, "Definitions changed to: {}", defs);
            }
            Some(_) => {}
            None if !self.defs.is_empty() => cli.defs = Some(self.defs.clone()),
            None => {}
        }

        match &cli.lump {
            Some(lump) if *lump != self.lump => {
                lump.clone_into(&mut self.lump);
                info!(target: LOG_TAG, "Lump changed to: {}", lump);
            }
            Some(_) => {}
            None if !self.lump.is_empty() => cli.lump = Some(self.lump.clone()),
            None => {}
        }

        if let Some(level) = cli.verbose {
            self.verbose = level.to_string();
        } else {
            cli.verbose = self.verbose.parse().ok();
        }

        if cli.dev {
            self.xg.dev_messages = true;
        }
    }
}
