use crate::config::ConfigFile;
use crate::distribuicao::DistribuicaoDFe;
use crate::errors::{AppError, AppResult};
use crate::models::{NsuInput, Pesquisa};
use crate::sender::{DocumentSender, RequestDescriptor};
use clap::{Arg, ArgAction, ArgMatches, Command};
use futures::future::BoxFuture;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Sender that performs no network call and renders what would have been sent.
///
/// Certificate and key never appear in the rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSender;

#[derive(Serialize)]
struct Preview<'a> {
    #[serde(rename = "cUFAutor")]
    c_uf_autor: &'a str,
    cnpj: &'a str,
    #[serde(rename = "tpAmb")]
    tp_amb: &'a str,
    pesquisa: &'a Pesquisa,
    #[serde(rename = "requestOpt")]
    request_options: &'a toml::Table,
    #[serde(rename = "httpsOpt")]
    https_options: &'a toml::Table,
}

impl DocumentSender for DryRunSender {
    type Response = String;
    type Error = AppError;

    fn send(&self, request: RequestDescriptor) -> BoxFuture<'_, Result<String, AppError>> {
        Box::pin(async move {
            let preview = Preview {
                c_uf_autor: &request.c_uf_autor,
                cnpj: &request.cnpj,
                tp_amb: &request.tp_amb,
                pesquisa: &request.pesquisa,
                request_options: &request.request_options,
                https_options: &request.https_options,
            };
            toml::to_string(&preview)
                .map_err(|e| AppError::InvalidInput(format!("Failed to render request: {e}")))
        })
    }
}

/// Builds the command-line definition.
pub fn build_command() -> Command<'static> {
    let config_arg = || {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Path to the TOML config file")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set)
    };

    Command::new("distdfe")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("ult-nsu")
                .about("Query documents after the last processed NSU")
                .arg(config_arg())
                .arg(
                    Arg::new("nsu")
                        .short('n')
                        .long("nsu")
                        .help("Last processed NSU (defaults to the start of the feed)")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("chave")
                .about("Query a single document by its 44-character access key")
                .arg(config_arg())
                .arg(
                    Arg::new("chave")
                        .help("NF-e access key (chNFe)")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("nsu")
                .about("Query a single document by its NSU")
                .arg(config_arg())
                .arg(
                    Arg::new("nsu")
                        .help("Document NSU")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
}

/// Parses command-line arguments and runs the requested query against a
/// [`DryRunSender`], printing the rendered request.
///
/// Every subcommand loads the TOML file given with `--config`, builds the
/// service from it and issues one query.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded, the credentials or
/// identity fields are invalid, or the query argument fails validation.
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some((name, sub)) => {
            let rendered = run_query(name, sub).await?;
            println!("{rendered}");
        }
        None => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::Io(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

async fn run_query(name: &str, sub: &ArgMatches) -> AppResult<String> {
    let config_path = sub
        .get_one::<PathBuf>("config")
        .ok_or_else(|| AppError::InvalidInput("config path is required".into()))?;

    info!(config = %config_path.display(), "Loading configuration");
    let opts = ConfigFile::from_toml_file(config_path)?.into_options()?;
    let service = DistribuicaoDFe::new(opts, DryRunSender)?;

    let pending = match name {
        "ult-nsu" => {
            let nsu = sub.get_one::<String>("nsu").map(|s| nsu_from_arg(s));
            service.consulta_por_ult_nsu(nsu.unwrap_or(NsuInput::Absent))?
        }
        "chave" => {
            let chave = sub
                .get_one::<String>("chave")
                .map(String::as_str)
                .unwrap_or_default();
            service.consulta_por_chave_nfe(chave)?
        }
        "nsu" => {
            let nsu = sub
                .get_one::<String>("nsu")
                .map(|s| nsu_from_arg(s))
                .unwrap_or(NsuInput::Absent);
            service.consulta_por_nsu(nsu)?
        }
        other => {
            return Err(AppError::InvalidInput(format!("Unknown command: {other}")));
        }
    };

    pending.await
}

/// A bare `0` argument is the zero NSU; anything else is taken verbatim and goes
/// through the usual length checks.
fn nsu_from_arg(arg: &str) -> NsuInput {
    if arg == "0" {
        NsuInput::Zero
    } else {
        NsuInput::from(arg)
    }
}
