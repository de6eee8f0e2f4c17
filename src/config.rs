use crate::distribuicao::DistribuicaoOptions;
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Service configuration as written in a TOML file.
///
/// Credential entries are file paths, resolved against the directory holding the
/// configuration file when relative. Either `pfx` (plus `passphrase`) or `cert` and
/// `key` should be set; the service itself decides whether what is there is enough.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Authorizing state code (`cUFAutor`), e.g. `"35"`
    pub c_uf_autor: String,
    /// Requester CNPJ
    pub cnpj: String,
    /// Environment: `"1"` production, `"2"` homologation
    pub tp_amb: String,
    /// Path to a PKCS#12 archive
    #[serde(default)]
    pub pfx: Option<PathBuf>,
    /// Passphrase for `pfx`
    #[serde(default)]
    pub passphrase: Option<String>,
    /// Path to a PEM certificate
    #[serde(default)]
    pub cert: Option<PathBuf>,
    /// Path to a PEM private key
    #[serde(default)]
    pub key: Option<PathBuf>,
    /// Passed to the transport untouched
    #[serde(default)]
    pub request_options: Option<toml::Table>,
    /// Passed to the transport untouched
    #[serde(default)]
    pub https_options: Option<toml::Table>,
    /// Directory relative credential paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ConfigFile {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, and `InvalidInput` if the TOML is
    /// malformed, a required key is missing or an unknown key is present.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parses configuration text; relative paths resolve against the working directory.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        toml::from_str(contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))
    }

    /// Reads the referenced credential files and produces construction options.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a referenced file cannot be read.
    pub fn into_options(self) -> AppResult<DistribuicaoOptions> {
        let pfx = match &self.pfx {
            Some(path) => Some(fs::read(self.resolve(path))?),
            None => None,
        };
        let cert = match &self.cert {
            Some(path) => Some(fs::read_to_string(self.resolve(path))?),
            None => None,
        };
        let key = match &self.key {
            Some(path) => Some(fs::read_to_string(self.resolve(path))?),
            None => None,
        };

        Ok(DistribuicaoOptions {
            pfx,
            passphrase: self.passphrase,
            cert,
            key,
            c_uf_autor: self.c_uf_autor,
            cnpj: self.cnpj,
            tp_amb: self.tp_amb,
            request_options: self.request_options,
            https_options: self.https_options,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
