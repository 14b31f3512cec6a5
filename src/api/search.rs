//! Purpose: Query a Solr-style package search endpoint for Maven coordinates.
//! Exports: `SearchClient`, `Coordinate`, `Coordinates`, endpoint constants.
//! Role: Blocking HTTP client; one GET per keyword, no retries, no timeouts.
//! Invariants: Only a 200 response produces coordinates; other statuses yield none.
//! Invariants: The whole body is decoded before the first coordinate is yielded.
//! Invariants: Coordinates keep server order and are consumed once.
#![allow(clippy::result_large_err)]

use crate::core::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use url::Url;

pub const MAVEN_CENTRAL_ENDPOINT: &str = "https://search.maven.org/solrsearch/select";

/// Page size sent with every query. Results past the first page are never fetched.
pub const SEARCH_ROWS: u32 = 20;

type ApiResult<T> = Result<T, Error>;

#[derive(Clone)]
pub struct SearchClient {
    inner: Arc<SearchClientInner>,
}

struct SearchClientInner {
    endpoint: Url,
    agent: ureq::Agent,
}

/// A `(group, artifact, version)` triple identifying one published library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

/// Coordinates from one search, in the order the server returned them.
#[derive(Debug)]
pub struct Coordinates {
    docs: std::vec::IntoIter<SearchDoc>,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    response: SearchResponse,
}

#[derive(Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Deserialize, Debug)]
struct SearchDoc {
    g: String,
    a: String,
    v: String,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>) -> ApiResult<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            inner: Arc::new(SearchClientInner { endpoint, agent }),
        })
    }

    pub fn maven_central() -> ApiResult<Self> {
        Self::new(MAVEN_CENTRAL_ENDPOINT)
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn search(&self, keyword: &str) -> ApiResult<Coordinates> {
        let url = self.query_url(keyword);
        tracing::debug!(url = %url, "searching package index");

        let response = self
            .inner
            .agent
            .get(url.as_str())
            .set("Accept", "application/json")
            .call();

        match response {
            Ok(resp) if resp.status() == 200 => {
                let coordinates =
                    read_coordinates(resp).map_err(|err| err.with_url(url.as_str()))?;
                tracing::debug!(count = coordinates.len(), "search returned coordinates");
                Ok(coordinates)
            }
            Ok(resp) => {
                tracing::debug!(status = resp.status(), "search not successful; no coordinates");
                Ok(Coordinates::empty())
            }
            Err(ureq::Error::Status(status, _resp)) => {
                tracing::debug!(status, "search not successful; no coordinates");
                Ok(Coordinates::empty())
            }
            Err(ureq::Error::Transport(err)) => Err(Error::new(ErrorKind::Network)
                .with_message("search request failed")
                .with_url(url.as_str())
                .with_source(err)),
        }
    }

    fn query_url(&self, keyword: &str) -> Url {
        let mut url = self.inner.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("rows", &SEARCH_ROWS.to_string())
            .append_pair("wt", "json");
        url
    }
}

impl Coordinates {
    pub fn empty() -> Self {
        Self {
            docs: Vec::new().into_iter(),
        }
    }
}

impl Iterator for Coordinates {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        self.docs.next().map(|doc| Coordinate {
            group: doc.g,
            artifact: doc.a,
            version: doc.v,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.docs.size_hint()
    }
}

impl ExactSizeIterator for Coordinates {}

impl FromIterator<Coordinate> for Coordinates {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let docs: Vec<SearchDoc> = iter
            .into_iter()
            .map(|coordinate| SearchDoc {
                g: coordinate.group,
                a: coordinate.artifact,
                v: coordinate.version,
            })
            .collect();
        Self {
            docs: docs.into_iter(),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

fn normalize_endpoint(raw: String) -> ApiResult<Url> {
    let mut url = Url::parse(&raw).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid search endpoint url")
            .with_url(raw.clone())
            .with_source(err)
    })?;
    let scheme = url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("search endpoint must use http or https scheme")
            .with_url(raw));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn read_coordinates(response: ureq::Response) -> ApiResult<Coordinates> {
    let mut body = Vec::new();
    response.into_reader().read_to_end(&mut body).map_err(|err| {
        Error::new(ErrorKind::Network)
            .with_message("failed to read search response body")
            .with_source(err)
    })?;
    decode_coordinates(&body)
}

fn decode_coordinates(body: &[u8]) -> ApiResult<Coordinates> {
    let envelope: SearchEnvelope = serde_json::from_slice(body).map_err(|err| {
        Error::new(ErrorKind::Corrupt)
            .with_message("invalid search response json")
            .with_source(err)
    })?;
    Ok(Coordinates {
        docs: envelope.response.docs.into_iter(),
    })
}
