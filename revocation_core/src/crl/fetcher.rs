use crate::crl::certificate_parser::parse_crl;
use crate::crl::config::CrlConfig;
use crate::crl::error::{CrlError, HttpClientBuildSnafu};
use crate::crl::extensions::{OID_FRESHEST_CRL, find_extension_by_oid};
use crate::crl::types::{Bundle, RevocationList};
use async_trait::async_trait;
use der::Decode;
use snafu::{Location, ResultExt, Snafu};
use tokio_util::sync::CancellationToken;
use x509_cert::ext::pkix::FreshestCrl;
use x509_cert::ext::pkix::name::{DistributionPointName, GeneralName};

pub type FetchError = Box<dyn std::error::Error + Send + Sync>;

/// Source of decoded CRL bundles for distribution-point URLs.
///
/// Implementations own any caching or retry policy. They must stop work when
/// `cancel` fires.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, cancel: &CancellationToken, url: &str) -> Result<Bundle, FetchError>;
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum HttpFetchError {
    #[snafu(display("Failed to parse URL: {url}"))]
    InvalidUrl {
        url: String,
        source: url::ParseError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Unsupported CRL URL scheme: {url}"))]
    UnsupportedScheme {
        url: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("HTTP request for {url} failed"))]
    Request {
        url: String,
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("CRL at {url} exceeds the size limit of {limit} bytes"))]
    TooLarge {
        url: String,
        limit: usize,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Download of {url} was cancelled"))]
    DownloadCancelled {
        url: String,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to decode CRL from {url}"))]
    Decode {
        url: String,
        source: CrlError,
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("Failed to parse freshest CRL extension of base CRL"))]
    FreshestCrlParse {
        source: der::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// Fetches CRLs over HTTP(S), one request per CRL, without caching.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http_client: reqwest::Client,
    max_crl_size: usize,
    fetch_delta_crl: bool,
}

impl HttpFetcher {
    pub fn new(config: &CrlConfig) -> Result<Self, CrlError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .connect_timeout(config.connection_timeout)
            .build()
            .context(HttpClientBuildSnafu)?;
        Ok(Self {
            http_client,
            max_crl_size: config.max_crl_size,
            fetch_delta_crl: config.fetch_delta_crl,
        })
    }

    async fn download(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<Vec<u8>, HttpFetchError> {
        check_url(url)?;
        tracing::debug!(target: "revocation_core::crl", url, "Downloading CRL");

        let resp = tokio::select! {
            biased;
            _ = cancel.cancelled() => return DownloadCancelledSnafu { url }.fail(),
            resp = self.http_client.get(url).send() => resp.context(RequestSnafu { url })?,
        };
        let resp = resp.error_for_status().context(RequestSnafu { url })?;
        if let Some(len) = resp.content_length()
            && len > self.max_crl_size as u64
        {
            return TooLargeSnafu {
                url,
                limit: self.max_crl_size,
            }
            .fail();
        }

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return DownloadCancelledSnafu { url }.fail(),
            bytes = resp.bytes() => bytes.context(RequestSnafu { url })?,
        };
        if bytes.len() > self.max_crl_size {
            return TooLargeSnafu {
                url,
                limit: self.max_crl_size,
            }
            .fail();
        }
        Ok(bytes.to_vec())
    }

    async fn fetch_list(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<RevocationList, HttpFetchError> {
        let der = self.download(cancel, url).await?;
        parse_crl(&der).context(DecodeSnafu { url })
    }

    async fn fetch_bundle(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<Bundle, HttpFetchError> {
        let base_crl = self.fetch_list(cancel, url).await?;
        let delta_url = if self.fetch_delta_crl {
            self.delta_crl_url(&base_crl)?
        } else {
            None
        };
        let delta_crl = match delta_url {
            Some(delta_url) => Some(self.fetch_list(cancel, &delta_url).await?),
            None => None,
        };
        Ok(Bundle {
            base_crl,
            delta_crl,
        })
    }

    /// First HTTP(S) URL from the freshest CRL extension of a base CRL.
    fn delta_crl_url(&self, base_crl: &RevocationList) -> Result<Option<String>, HttpFetchError> {
        let Some(ext) = find_extension_by_oid(&base_crl.extensions, &OID_FRESHEST_CRL) else {
            return Ok(None);
        };
        let freshest = FreshestCrl::from_der(&ext.value).context(FreshestCrlParseSnafu)?;
        for point in freshest.0 {
            if let Some(DistributionPointName::FullName(names)) = point.distribution_point {
                for name in names {
                    if let GeneralName::UniformResourceIdentifier(uri) = name {
                        let uri = uri.to_string();
                        if is_http_url(&uri) {
                            return Ok(Some(uri));
                        }
                    }
                }
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, cancel: &CancellationToken, url: &str) -> Result<Bundle, FetchError> {
        Ok(self.fetch_bundle(cancel, url).await?)
    }
}

pub(crate) fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn check_url(url: &str) -> Result<(), HttpFetchError> {
    let parsed = url::Url::parse(url).context(InvalidUrlSnafu { url })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => UnsupportedSchemeSnafu { url }.fail(),
    }
}
