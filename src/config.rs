use std::{
    env::VarError,
    fmt,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use log::debug;

use crate::services::errors::{Error, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// The three independent services this crate can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    /// Track search, `GET /search`
    Aggregator,
    /// Upload check, `POST /check`
    Fingerprint,
    /// Similar tracks, `GET /recommend`
    Recommender,
}

impl ServiceKind {
    /// Name used on the command line and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Aggregator => "aggregator",
            ServiceKind::Fingerprint => "fingerprint",
            ServiceKind::Recommender => "recommender",
        }
    }

    /// Port used when neither a flag nor `TRACKSVC_PORT` is given
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Aggregator => 8001,
            ServiceKind::Fingerprint => 8002,
            ServiceKind::Recommender => 8003,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where uploaded files go and how large they may be
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded files are written to
    pub dir: PathBuf,
    /// Largest accepted request body in bytes
    pub max_bytes: usize,
}

impl UploadConfig {
    /// Upload target for a client supplied filename. Only the last path
    /// component is kept so uploads stay inside `dir`.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let name = std::path::Path::new(filename).file_name()?;
        Some(self.dir.join(name))
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            dir: default_upload_dir(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn default_upload_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
        .join("tracksvc-uploads")
}

/// Runtime configuration for a single service process
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the listener binds
    pub addr: SocketAddr,
    /// Only used by the fingerprint service
    pub upload: UploadConfig,
}

/// Collects overrides for a [`Config`]; anything left unset comes from the environment
pub struct ConfigBuilder {
    kind: ServiceKind,
    host: Option<IpAddr>,
    port: Option<u16>,
    upload_dir: Option<PathBuf>,
    max_upload_bytes: Option<usize>,
}

impl ConfigBuilder {
    /// Builder with no overrides
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            host: None,
            port: None,
            upload_dir: None,
            max_upload_bytes: None,
        }
    }

    /// Override the bind address
    pub fn host(mut self, host: Option<IpAddr>) -> Self {
        self.host = host;
        self
    }

    /// Override the port
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Override the upload directory
    pub fn upload_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.upload_dir = dir;
        self
    }

    /// Override the upload size limit
    pub fn max_upload_bytes(mut self, max: Option<usize>) -> Self {
        self.max_upload_bytes = max;
        self
    }

    /// Fill every unset value from `TRACKSVC_*` environment variables, then defaults
    pub fn build(self) -> Result<Config> {
        self.build_with(|name| std::env::var(name))
    }

    /// Same as [`ConfigBuilder::build`], reading variables through `lookup`
    pub fn build_with<F>(self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let env = EnvSource { lookup };
        let host = match self.host {
            Some(h) => h,
            None => env
                .var("TRACKSVC_HOST")?
                .as_deref()
                .unwrap_or(DEFAULT_HOST)
                .parse()?,
        };
        let port = match self.port {
            Some(p) => p,
            None => env
                .parse("TRACKSVC_PORT")?
                .unwrap_or_else(|| self.kind.default_port()),
        };
        let dir = match self.upload_dir {
            Some(d) => d,
            None => env
                .var("TRACKSVC_UPLOAD_DIR")?
                .map_or_else(default_upload_dir, PathBuf::from),
        };
        let max_bytes = match self.max_upload_bytes {
            Some(m) => m,
            None => env
                .parse("TRACKSVC_MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let config = Config {
            addr: SocketAddr::new(host, port),
            upload: UploadConfig { dir, max_bytes },
        };
        debug!("Built {} config: {config:?}", self.kind);
        Ok(config)
    }
}

struct EnvSource<F> {
    lookup: F,
}

impl<F> EnvSource<F>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    // Unset variables are fine, non-unicode ones are not
    fn var(&self, name: &str) -> Result<Option<String>> {
        match (self.lookup)(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parse<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.var(name)?
            .map(|raw| {
                raw.trim().parse().map_err(|_| {
                    Error::ConfigurationError(format!("{name} has invalid value {raw:?}"))
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn explicit_values_win() {
        let config = ConfigBuilder::new(ServiceKind::Fingerprint)
            .host(Some("127.0.0.1".parse().unwrap()))
            .port(Some(9000))
            .upload_dir(Some(PathBuf::from("/srv/uploads")))
            .max_upload_bytes(Some(1024))
            .build()
            .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.upload.dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.upload.max_bytes, 1024);
    }

    #[test]
    fn each_service_has_its_own_port() {
        assert_eq!(ServiceKind::Aggregator.default_port(), 8001);
        assert_eq!(ServiceKind::Fingerprint.default_port(), 8002);
        assert_eq!(ServiceKind::Recommender.default_port(), 8003);
        assert_eq!(ServiceKind::Recommender.to_string(), "recommender");
    }

    #[test]
    fn upload_path_keeps_only_file_name() {
        let upload = UploadConfig {
            dir: PathBuf::from("/srv/uploads"),
            max_bytes: 10,
        };
        assert_eq!(
            upload.path_for("song.mp3"),
            Some(PathBuf::from("/srv/uploads/song.mp3"))
        );
        assert_eq!(
            upload.path_for("../../etc/passwd"),
            Some(PathBuf::from("/srv/uploads/passwd"))
        );
        assert_eq!(upload.path_for(".."), None);
        assert_eq!(upload.path_for(""), None);
    }

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, VarError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn unset_env_uses_defaults() {
        let config = ConfigBuilder::new(ServiceKind::Recommender)
            .build_with(env_from(&[]))
            .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8003".parse().unwrap());
        assert_eq!(config.upload.dir, default_upload_dir());
        assert_eq!(config.upload.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn env_fills_unset_values() {
        let config = ConfigBuilder::new(ServiceKind::Fingerprint)
            .port(Some(9100))
            .build_with(env_from(&[
                ("TRACKSVC_HOST", "127.0.0.1"),
                ("TRACKSVC_PORT", "9000"),
                ("TRACKSVC_UPLOAD_DIR", "/var/lib/tracksvc"),
                ("TRACKSVC_MAX_UPLOAD_BYTES", " 4096 "),
            ]))
            .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9100".parse().unwrap());
        assert_eq!(config.upload.dir, PathBuf::from("/var/lib/tracksvc"));
        assert_eq!(config.upload.max_bytes, 4096);
    }

    #[test]
    fn invalid_numbers_are_configuration_errors() {
        let err = ConfigBuilder::new(ServiceKind::Aggregator)
            .build_with(env_from(&[("TRACKSVC_PORT", "notaport")]))
            .unwrap_err();
        assert!(
            matches!(&err, Error::ConfigurationError(msg) if msg.contains("TRACKSVC_PORT")),
            "{err:?}"
        );

        let err = ConfigBuilder::new(ServiceKind::Fingerprint)
            .build_with(env_from(&[("TRACKSVC_MAX_UPLOAD_BYTES", "-1")]))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn invalid_host_is_configuration_error() {
        let err = ConfigBuilder::new(ServiceKind::Aggregator)
            .build_with(env_from(&[("TRACKSVC_HOST", "not a host")]))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
