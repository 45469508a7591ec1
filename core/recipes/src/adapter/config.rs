//! `<home>/config.json` の読み込み
//!
//! 無ければ既定値のまま。壊れている場合は黙って無視せず `Error::Env` にする。

use crate::domain::SettingsFile;
use common::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub fn load_settings_file(home: &Path) -> Result<Option<SettingsFile>, Error> {
    let path = home.join(CONFIG_FILE_NAME);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io_msg(format!("{}: {}", path.display(), e))),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| Error::env(format!("Invalid config file {}: {}", path.display(), e)))
}
