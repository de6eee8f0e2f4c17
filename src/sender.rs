//! The seam between query building and the transport that actually talks to the
//! web service.

use std::fmt;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::models::Pesquisa;

/// Everything a transport needs for one call: identity, credentials, pass-through
/// transport options and the query payload.
#[derive(Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    #[serde(rename = "cUFAutor")]
    pub c_uf_autor: String,
    pub cnpj: String,
    #[serde(rename = "tpAmb")]
    pub tp_amb: String,
    pub cert: String,
    pub key: String,
    pub pesquisa: Pesquisa,
    #[serde(rename = "requestOpt")]
    pub request_options: toml::Table,
    #[serde(rename = "httpsOpt")]
    pub https_options: toml::Table,
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("c_uf_autor", &self.c_uf_autor)
            .field("cnpj", &self.cnpj)
            .field("tp_amb", &self.tp_amb)
            .field("cert", &format_args!("<{} bytes>", self.cert.len()))
            .field("key", &"<redacted>")
            .field("pesquisa", &self.pesquisa)
            .field("request_options", &self.request_options)
            .field("https_options", &self.https_options)
            .finish()
    }
}

/// Sends a prepared request and resolves to whatever the transport produces.
///
/// Implementations own the protocol, the response shape and the error semantics;
/// [`DistribuicaoDFe`](crate::DistribuicaoDFe) hands the future back untouched.
pub trait DocumentSender {
    type Response;
    type Error;

    fn send(
        &self,
        request: RequestDescriptor,
    ) -> BoxFuture<'_, Result<Self::Response, Self::Error>>;
}

impl<S: DocumentSender + ?Sized> DocumentSender for &S {
    type Response = S::Response;
    type Error = S::Error;

    fn send(
        &self,
        request: RequestDescriptor,
    ) -> BoxFuture<'_, Result<Self::Response, Self::Error>> {
        (**self).send(request)
    }
}
