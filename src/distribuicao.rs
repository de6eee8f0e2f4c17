use std::fmt;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::certificate::{CertificateDecoder, Pkcs12Decoder};
use crate::constants::{CHAVE_NFE_LEN, NSU_WIDTH, ZERO_NSU};
use crate::errors::{AppError, AppResult};
use crate::models::{NsuInput, Pesquisa, QueryKind};
use crate::sender::{DocumentSender, RequestDescriptor};
use crate::utils::{char_len, zero_pad};

/// Future returned by every query method: the sender's own result, untouched.
pub type SendFuture<'a, S> =
    BoxFuture<'a, Result<<S as DocumentSender>::Response, <S as DocumentSender>::Error>>;

/// Construction input for [`DistribuicaoDFe`].
///
/// Supply either `pfx` + `passphrase` or `cert` + `key`. When an archive is present
/// its decoded pair wins over any separate strings.
#[derive(Clone, Default)]
pub struct DistribuicaoOptions {
    /// PKCS#12 archive bytes
    pub pfx: Option<Vec<u8>>,
    pub passphrase: Option<String>,
    /// PEM certificate
    pub cert: Option<String>,
    /// PEM private key
    pub key: Option<String>,
    pub c_uf_autor: String,
    pub cnpj: String,
    pub tp_amb: String,
    pub request_options: Option<toml::Table>,
    pub https_options: Option<toml::Table>,
}

impl fmt::Debug for DistribuicaoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistribuicaoOptions")
            .field("pfx", &self.pfx.as_ref().map(|b| format!("<{} bytes>", b.len())))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("cert", &self.cert.as_ref().map(|c| format!("<{} bytes>", c.len())))
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("c_uf_autor", &self.c_uf_autor)
            .field("cnpj", &self.cnpj)
            .field("tp_amb", &self.tp_amb)
            .field("request_options", &self.request_options)
            .field("https_options", &self.https_options)
            .finish()
    }
}

/// Validated configuration snapshot reused by every query.
#[derive(Clone)]
struct Settings {
    c_uf_autor: String,
    cnpj: String,
    tp_amb: String,
    cert: String,
    key: String,
    request_options: toml::Table,
    https_options: toml::Table,
}

impl Settings {
    fn describe(&self, pesquisa: Pesquisa) -> RequestDescriptor {
        RequestDescriptor {
            c_uf_autor: self.c_uf_autor.clone(),
            cnpj: self.cnpj.clone(),
            tp_amb: self.tp_amb.clone(),
            cert: self.cert.clone(),
            key: self.key.clone(),
            pesquisa,
            request_options: self.request_options.clone(),
            https_options: self.https_options.clone(),
        }
    }
}

/// Query builder for the NF-e distribution service.
///
/// Construction validates credentials and identity once. Each query method then
/// validates and formats its own argument, builds a fresh [`RequestDescriptor`] and
/// returns the future produced by the injected [`DocumentSender`].
///
/// # Example
///
/// ```no_run
/// use distdfe::{DistribuicaoDFe, DistribuicaoOptions, DocumentSender, RequestDescriptor};
/// use futures::future::BoxFuture;
///
/// struct Echo;
///
/// impl DocumentSender for Echo {
///     type Response = String;
///     type Error = std::convert::Infallible;
///
///     fn send(&self, request: RequestDescriptor) -> BoxFuture<'_, Result<String, Self::Error>> {
///         Box::pin(async move { Ok(request.pesquisa.valor().to_string()) })
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = DistribuicaoDFe::new(
///     DistribuicaoOptions {
///         cert: Some(std::fs::read_to_string("client.crt")?),
///         key: Some(std::fs::read_to_string("client.key")?),
///         c_uf_autor: "35".into(),
///         cnpj: "12345678000195".into(),
///         tp_amb: "2".into(),
///         ..Default::default()
///     },
///     Echo,
/// )?;
///
/// let valor = service.consulta_por_nsu(42u64)?.await?;
/// assert_eq!(valor, "000000000000042");
/// # Ok(())
/// # }
/// ```
pub struct DistribuicaoDFe<S> {
    settings: Settings,
    sender: S,
}

impl<S> fmt::Debug for DistribuicaoDFe<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistribuicaoDFe")
            .field("c_uf_autor", &self.settings.c_uf_autor)
            .field("cnpj", &self.settings.cnpj)
            .field("tp_amb", &self.settings.tp_amb)
            .finish_non_exhaustive()
    }
}

impl<S: DocumentSender> DistribuicaoDFe<S> {
    /// Validates `opts` and builds the service, decoding archives with [`Pkcs12Decoder`].
    ///
    /// # Errors
    ///
    /// - `MissingCredential` when an archive comes without passphrase, or when no
    ///   certificate or key remains after decoding
    /// - `Certificate` when the archive cannot be decoded
    /// - `MissingField` when `c_uf_autor`, `cnpj` or `tp_amb` is empty
    pub fn new(opts: DistribuicaoOptions, sender: S) -> AppResult<Self> {
        Self::with_decoder(opts, sender, &Pkcs12Decoder)
    }

    /// Same as [`new`](Self::new) with a caller-supplied certificate decoder.
    pub fn with_decoder(
        opts: DistribuicaoOptions,
        sender: S,
        decoder: &dyn CertificateDecoder,
    ) -> AppResult<Self> {
        let DistribuicaoOptions {
            pfx,
            passphrase,
            cert,
            key,
            c_uf_autor,
            cnpj,
            tp_amb,
            request_options,
            https_options,
        } = opts;

        let mut cert = cert.unwrap_or_default();
        let mut key = key.unwrap_or_default();

        if let Some(archive) = pfx {
            let passphrase = passphrase.filter(|p| !p.is_empty()).ok_or_else(|| {
                AppError::MissingCredential("certificate password not provided".into())
            })?;

            let pair = decoder.decode(&archive, &passphrase)?;
            debug!(archive_bytes = archive.len(), "Certificate archive decoded");
            cert = pair.cert;
            key = pair.key;
        }

        if cert.is_empty() {
            return Err(AppError::MissingCredential("certificate not provided".into()));
        }
        if key.is_empty() {
            return Err(AppError::MissingCredential("key not provided".into()));
        }
        if c_uf_autor.is_empty() {
            return Err(AppError::MissingField("cUFAutor not provided".into()));
        }
        if cnpj.is_empty() {
            return Err(AppError::MissingField("cnpj not provided".into()));
        }
        if tp_amb.is_empty() {
            return Err(AppError::MissingField("tpAmb not provided".into()));
        }

        info!(
            c_uf_autor = c_uf_autor.as_str(),
            tp_amb = tp_amb.as_str(),
            "Distribution service configured"
        );

        Ok(Self {
            settings: Settings {
                c_uf_autor,
                cnpj,
                tp_amb,
                cert,
                key,
                request_options: request_options.unwrap_or_default(),
                https_options: https_options.unwrap_or_default(),
            },
            sender,
        })
    }

    /// Requests the documents after `ult_nsu`, the last sequence number already processed.
    ///
    /// A missing value, numeric zero or an empty string all start from the beginning
    /// of the feed (`"000000000000000"`).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the value is longer than 15 characters.
    pub fn consulta_por_ult_nsu(
        &self,
        ult_nsu: impl Into<NsuInput>,
    ) -> AppResult<SendFuture<'_, S>> {
        let input: NsuInput = ult_nsu.into();
        let valor = match input.non_empty() {
            Some(value) => padded_nsu(value)?,
            None => ZERO_NSU.to_string(),
        };

        Ok(self.dispatch(Pesquisa::new(QueryKind::DistNsu, valor)))
    }

    /// Requests a single document by its 44-character access key.
    ///
    /// # Errors
    ///
    /// - `MissingField` when the key is empty
    /// - `InvalidParameter` when it is not exactly 44 characters long
    pub fn consulta_por_chave_nfe(&self, ch_nfe: &str) -> AppResult<SendFuture<'_, S>> {
        if ch_nfe.is_empty() {
            return Err(AppError::MissingField("document key not provided".into()));
        }
        if char_len(ch_nfe) != CHAVE_NFE_LEN {
            return Err(AppError::InvalidParameter(
                "document key has incorrect length".into(),
            ));
        }

        Ok(self.dispatch(Pesquisa::new(QueryKind::ConsChNfe, ch_nfe)))
    }

    /// Requests a single document by its sequence number.
    ///
    /// Numeric zero is accepted and becomes `"000000000000000"`.
    ///
    /// # Errors
    ///
    /// - `MissingField` when the value is absent or empty
    /// - `InvalidParameter` when it is longer than 15 characters
    pub fn consulta_por_nsu(&self, nsu: impl Into<NsuInput>) -> AppResult<SendFuture<'_, S>> {
        let input: NsuInput = nsu.into();
        let valor = match input {
            NsuInput::Zero => ZERO_NSU.to_string(),
            input => match input.non_empty() {
                Some(value) => padded_nsu(value)?,
                None => {
                    return Err(AppError::MissingField(
                        "sequence number not provided".into(),
                    ))
                }
            },
        };

        Ok(self.dispatch(Pesquisa::new(QueryKind::ConsNsu, valor)))
    }

    fn dispatch(&self, pesquisa: Pesquisa) -> SendFuture<'_, S> {
        debug!(
            query = pesquisa.kind().display_name(),
            grupo = pesquisa.grupo(),
            valor = pesquisa.valor(),
            "Dispatching query"
        );
        self.sender.send(self.settings.describe(pesquisa))
    }
}

fn padded_nsu(value: &str) -> AppResult<String> {
    if char_len(value) > NSU_WIDTH {
        return Err(AppError::InvalidParameter(
            "sequence number has incorrect length".into(),
        ));
    }
    Ok(zero_pad(value, NSU_WIDTH))
}
