//! distdfe library
//!
//! Prepares and validates queries for the Brazilian NF-e distribution web service
//! (`NFeDistribuicaoDFe`) and hands them to a pluggable transport.
//!
//! ## Overview
//!
//! - [`distribuicao`] - The query builder: credential normalization, identity validation
//!   and the three query operations
//! - [`sender`] - The [`DocumentSender`] seam and the [`RequestDescriptor`] it receives
//! - [`certificate`] - PKCS#12 to PEM conversion
//! - [`config`] - TOML configuration loading
//! - [`cli`] - Command-line interface with a dry-run sender
//! - [`models`] - Query payload types
//! - [`errors`] - Error types used throughout the crate
//!
//! ## Example Usage
//!
//! ```no_run
//! use distdfe::{cli::DryRunSender, config::ConfigFile, DistribuicaoDFe, errors::AppResult};
//! use std::path::Path;
//!
//! # async fn example() -> AppResult<()> {
//! let opts = ConfigFile::from_toml_file(Path::new("distdfe.toml"))?.into_options()?;
//! let service = DistribuicaoDFe::new(opts, DryRunSender)?;
//!
//! // Everything since the start of the feed
//! let rendered = service.consulta_por_ult_nsu(None::<&str>)?.await?;
//! println!("{rendered}");
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod distribuicao;
pub mod errors;
pub mod models;
pub mod sender;
pub mod utils;

pub use distribuicao::{DistribuicaoDFe, DistribuicaoOptions, SendFuture};
pub use models::{NsuInput, Pesquisa, QueryKind};
pub use sender::{DocumentSender, RequestDescriptor};
