use app_core::string_error::ErrorStringExt;
use std::{
    io::Read,
    path::{Path, PathBuf},
    time::Duration,
};

const CONFIG_FILE_NAME: &str = ".eeg-viewer";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: String,
    pub window_width: f32,
    pub window_height: f32,
    pub repaint_interval_ms: u64,
    pub read_timeout_ms: u64,
    /// Upper bound for TCP connect plus websocket handshake.
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8765".to_string(),
            window_width: 900.0,
            window_height: 700.0,
            repaint_interval_ms: 50,
            read_timeout_ms: 20,
            connect_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Default location of the config file, `~/.eeg-viewer`.
    pub fn default_path() -> Option<PathBuf> {
        #[allow(deprecated)]
        std::env::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    pub fn from_config_file(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()
                .ok_or("could not determine home directory to load config file")?,
        };
        let mut file = std::fs::File::open(&path)
            .err_to_string(&format!("could not open config file {path:?}"))?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)
            .err_to_string("could not load config file")?;
        Ok(Self::parse(&buf))
    }

    /// Parse `key=value` lines on top of the defaults. Unknown keys and
    /// values that do not parse are skipped.
    pub fn parse(config_raw: &str) -> Self {
        let mut config = Self::default();
        for line in config_raw.lines() {
            let line = line.trim();
            // Lines starting with "#" are considered comments.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("ignoring config line without '=': {line}");
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            match key {
                "url" => config.url = val.to_string(),
                "window_width" => parse_into(key, val, &mut config.window_width),
                "window_height" => parse_into(key, val, &mut config.window_height),
                "repaint_interval_ms" => parse_into(key, val, &mut config.repaint_interval_ms),
                "read_timeout_ms" => parse_into(key, val, &mut config.read_timeout_ms),
                "connect_timeout_ms" => parse_into(key, val, &mut config.connect_timeout_ms),
                _ => log::warn!("unknown config key '{key}'"),
            }
        }
        config
    }

    pub fn repaint_interval(&self) -> Duration {
        Duration::from_millis(self.repaint_interval_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn parse_into<T: std::str::FromStr>(key: &str, val: &str, target: &mut T) {
    match val.parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => log::warn!("could not parse '{key}' from '{val}', keeping default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides_defaults() {
        let config = Config::parse(
            "# viewer settings\n\
             url = ws://10.0.0.5:9000\n\
             repaint_interval_ms=16\n\
             connect_timeout_ms=750\n\
             \n\
             window_width=1280\n",
        );
        assert_eq!(config.url, "ws://10.0.0.5:9000");
        assert_eq!(config.repaint_interval_ms, 16);
        assert_eq!(config.connect_timeout(), Duration::from_millis(750));
        assert_eq!(config.window_width, 1280.0);
        assert_eq!(config.window_height, Config::default().window_height);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = Config::parse("read_timeout_ms=soon\nwhatever=1\nno equals sign\n");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let res = Config::from_config_file(Some(Path::new("/nonexistent/.eeg-viewer")));
        assert!(res.is_err());
    }

    #[test]
    fn test_read_from_file() {
        let path = std::env::temp_dir().join(format!("eeg-viewer-test-{}", std::process::id()));
        std::fs::write(&path, "url=ws://example.org:1234/eeg\n").unwrap();
        let config = Config::from_config_file(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.url, "ws://example.org:1234/eeg");
    }
}
