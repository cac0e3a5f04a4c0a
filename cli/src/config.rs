// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{env, error::Error, path::PathBuf, str::FromStr};

use davsync_dav::{AuthMethod, DavConfig};
use tokio::fs;

/// Name of the application, also the config directory name.
pub const APP_NAME: &str = "davsync";

const CONFIG_ENV: &str = "DAVSYNC_CONFIG";
const URL_ENV: &str = "DAVSYNC_URL";
const USERNAME_ENV: &str = "DAVSYNC_USERNAME";
const PASSWORD_ENV: &str = "DAVSYNC_PASSWORD";
const TOKEN_ENV: &str = "DAVSYNC_TOKEN";

/// Locate, read and resolve the configuration.
///
/// The file comes from `path`, then `DAVSYNC_CONFIG`, then the user config directory.
/// `DAVSYNC_*` variables override the `[server]` table; with `DAVSYNC_URL` set a missing
/// default file is not an error.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        Some(path)
    } else if let Ok(env_path) = env::var(CONFIG_ENV) {
        Some(PathBuf::from(env_path))
    } else {
        let config = get_config_dir()?.join(format!("{APP_NAME}/config.toml"));
        if config.exists() {
            Some(config)
        } else if env::var(URL_ENV).is_ok() {
            tracing::debug!(path = %config.display(), "no config file, using environment only");
            None
        } else {
            return Err(format!("No config found at: {}", config.display()).into());
        }
    };

    let mut config = match path {
        Some(path) => fs::read_to_string(&path)
            .await
            .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
            .parse::<ConfigRaw>()
            .map(Config::from)?,
        None => Config::default(),
    };

    apply_env(&mut config.server);
    Ok(config)
}

/// Configuration for the command-line client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Server connection
    pub server: DavConfig,
}

impl From<ConfigRaw> for Config {
    fn from(raw: ConfigRaw) -> Self {
        Self { server: raw.server }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ConfigRaw {
    server: DavConfig,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

fn apply_env(server: &mut DavConfig) {
    if let Ok(url) = env::var(URL_ENV) {
        server.base_url = url;
    }

    if let Ok(token) = env::var(TOKEN_ENV) {
        server.auth = AuthMethod::Bearer { token };
    } else if let Ok(username) = env::var(USERNAME_ENV) {
        let password = match (env::var(PASSWORD_ENV), &server.auth) {
            (Ok(password), _) => password,
            (Err(_), AuthMethod::Basic { password, .. }) => password.clone(),
            (Err(_), _) => String::new(),
        };
        server.auth = AuthMethod::Basic { username, password };
    } else if let Ok(password) = env::var(PASSWORD_ENV)
        && let AuthMethod::Basic { password: current, .. } = &mut server.auth
    {
        *current = password;
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::OnceLock;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_env() {
        unsafe {
            for key in [CONFIG_ENV, URL_ENV, USERNAME_ENV, PASSWORD_ENV, TOKEN_ENV] {
                env::remove_var(key);
            }
        }
    }

    fn write_config(path: &std::path::Path, url: &str) {
        let toml_content = format!(
            r#"
[server]
base_url = "{url}"
calendar_home = "/dav/calendars/jane/"

[server.auth]
type = "basic"
username = "jane"
password = "secret"
"#
        );
        fs::write(path, toml_content).unwrap();
    }

    #[test]
    fn parses_server_table() {
        let raw: ConfigRaw = r#"
[server]
base_url = "https://dav.example.com"
addressbook_home = "/dav/addressbooks/jane/"
timeout_secs = 10

[server.auth]
type = "bearer"
token = "abc"
"#
        .parse()
        .unwrap();

        let config = Config::from(raw);
        assert_eq!(config.server.base_url, "https://dav.example.com");
        assert_eq!(
            config.server.addressbook_home.as_deref(),
            Some("/dav/addressbooks/jane/")
        );
        assert_eq!(config.server.calendar_home, None);
        assert_eq!(config.server.timeout_secs, 10);
        assert_eq!(
            config.server.auth,
            AuthMethod::Bearer {
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn rejects_missing_server_table() {
        let result = "[other]\nkey = 1\n".parse::<ConfigRaw>();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        write_config(&config_path, "https://cli.example.com");
        let env_path = temp_dir.path().join("env_config.toml");
        write_config(&env_path, "https://env.example.com");

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe { env::set_var(CONFIG_ENV, env_path.to_str().unwrap()) };

        let config = parse_config(Some(config_path)).await.unwrap();
        assert_eq!(config.server.base_url, "https://cli.example.com");

        clear_env();
    }

    #[tokio::test]
    async fn env_var_selects_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let env_path = temp_dir.path().join("env_config.toml");
        write_config(&env_path, "https://env.example.com");

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe { env::set_var(CONFIG_ENV, env_path.to_str().unwrap()) };

        let config = parse_config(None).await.unwrap();
        assert_eq!(config.server.base_url, "https://env.example.com");
        assert_eq!(
            config.server.calendar_home.as_deref(),
            Some("/dav/calendars/jane/")
        );

        clear_env();
    }

    #[tokio::test]
    async fn env_overrides_server_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        write_config(&config_path, "https://file.example.com");

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe {
            env::set_var(URL_ENV, "https://override.example.com");
            env::set_var(PASSWORD_ENV, "rotated");
        }

        let config = parse_config(Some(config_path.clone())).await.unwrap();
        assert_eq!(config.server.base_url, "https://override.example.com");
        assert_eq!(
            config.server.auth,
            AuthMethod::Basic {
                username: "jane".to_string(),
                password: "rotated".to_string(),
            }
        );

        unsafe { env::set_var(TOKEN_ENV, "tok") };
        let config = parse_config(Some(config_path)).await.unwrap();
        assert_eq!(
            config.server.auth,
            AuthMethod::Bearer {
                token: "tok".to_string()
            }
        );

        clear_env();
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        let _guard = env_lock().lock().await;
        clear_env();

        let result = parse_config(Some(temp_dir.path().join("nope.toml"))).await;
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Failed to read config file"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn uses_default_when_no_cli_or_env() {
        let temp_dir = TempDir::new().unwrap();
        let default_config_dir = temp_dir.path().join(APP_NAME);
        fs::create_dir_all(&default_config_dir).unwrap();
        write_config(
            &default_config_dir.join("config.toml"),
            "https://default.example.com",
        );

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe { env::set_var("XDG_CONFIG_HOME", temp_dir.path().to_str().unwrap()) };

        let config = parse_config(None).await.unwrap();
        assert_eq!(config.server.base_url, "https://default.example.com");

        unsafe { env::remove_var("XDG_CONFIG_HOME") };
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn returns_error_when_no_config_found() {
        let temp_dir = TempDir::new().unwrap();

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe { env::set_var("XDG_CONFIG_HOME", temp_dir.path().to_str().unwrap()) };

        let result = parse_config(None).await;
        assert!(result.unwrap_err().to_string().contains("No config found"));

        unsafe { env::remove_var("XDG_CONFIG_HOME") };
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn environment_alone_is_enough() {
        let temp_dir = TempDir::new().unwrap();

        let _guard = env_lock().lock().await;
        clear_env();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_dir.path().to_str().unwrap());
            env::set_var(URL_ENV, "https://env-only.example.com");
            env::set_var(USERNAME_ENV, "joe");
        }

        let config = parse_config(None).await.unwrap();
        assert_eq!(config.server.base_url, "https://env-only.example.com");
        assert_eq!(
            config.server.auth,
            AuthMethod::Basic {
                username: "joe".to_string(),
                password: String::new(),
            }
        );
        assert_eq!(config.server.timeout_secs, 30);

        clear_env();
        unsafe { env::remove_var("XDG_CONFIG_HOME") };
    }
}
