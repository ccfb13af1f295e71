use crate::codec::BodyProcess;
use serde::Serialize;
use strum_macros::Display;

/// A request body that has already been turned into wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl EncodedBody {
    /// Marshals `body` with `process`.
    ///
    /// # Errors
    /// Propagates the marshaler's [`RequestError::Encode`].
    pub fn encode<P, B>(process: &P, body: &B) -> Result<Self, RequestError>
    where
        P: BodyProcess + ?Sized,
        B: Serialize + ?Sized,
    {
        Ok(Self { bytes: process.marshal(body)?, content_type: process.content_type() })
    }

    /// Wraps pre-rendered text. It is sent verbatim under `content_type`.
    pub fn raw(text: impl Into<String>, content_type: &'static str) -> Self {
        Self { bytes: text.into().into_bytes(), content_type }
    }

    pub fn bytes(&self) -> &[u8] { &self.bytes }
    pub fn content_type(&self) -> &'static str { self.content_type }
    pub fn len(&self) -> usize { self.bytes.len() }
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }
}

/// Joins a scheme/host/port triple into a base URL.
///
/// Port `0` and the scheme default (80 for http, 443 for https) are left
/// out of the URL.
pub fn base_url(host: &str, port: u16, ssl: bool) -> String {
    let (scheme, default_port) = if ssl { ("https", 443) } else { ("http", 80) };
    if port == 0 || port == default_port {
        format!("{scheme}://{host}")
    } else {
        format!("{scheme}://{host}:{port}")
    }
}

/// Appends `uri` to `base`, inserting the separating slash when `uri`
/// lacks one.
pub fn join_uri(base: &str, uri: &str) -> String {
    if uri.is_empty() || uri.starts_with('/') {
        format!("{base}{uri}")
    } else {
        format!("{base}/{uri}")
    }
}

/// Expands positional `{}` placeholders in a URI template.
///
/// `{{` and `}}` produce literal braces.
///
/// # Errors
/// Returns [`RequestError::ArgumentMismatch`] if the number of placeholders
/// differs from `args.len()`, and [`RequestError::InvalidTemplate`] for an
/// unbalanced brace.
pub fn expand_template(template: &str, args: &[&dyn std::fmt::Display]) -> Result<String, RequestError> {
    let mut out = String::with_capacity(template.len());
    let mut used = 0;
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('{', Some('{')) | ('}', Some('}')) => {
                out.push(c);
                chars.next();
            }
            ('{', Some('}')) => {
                chars.next();
                let Some(arg) = args.get(used) else {
                    return Err(RequestError::ArgumentMismatch { expected: used + 1, given: args.len() });
                };
                out.push_str(&arg.to_string());
                used += 1;
            }
            ('{' | '}', _) => return Err(RequestError::InvalidTemplate(template.to_string())),
            _ => out.push(c),
        }
    }
    if used == args.len() {
        Ok(out)
    } else {
        Err(RequestError::ArgumentMismatch { expected: used, given: args.len() })
    }
}

#[derive(Debug, Display)]
pub enum RequestError {
    #[strum(to_string = "invalid url")]
    InvalidUrl(String),
    #[strum(to_string = "invalid uri template")]
    InvalidTemplate(String),
    #[strum(to_string = "invalid header value")]
    InvalidHeader(String),
    #[strum(to_string = "uri template argument count mismatch")]
    ArgumentMismatch { expected: usize, given: usize },
    #[strum(to_string = "request body encoding failed")]
    Encode(String),
    #[strum(to_string = "caller does not accept a request body")]
    UnexpectedBody,
    #[strum(to_string = "transport setup failed")]
    Transport(reqwest::Error),
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(value: reqwest::Error) -> Self {
        let invalid_url = value.is_builder().then(|| value.url().map(ToString::to_string)).flatten();
        match invalid_url {
            Some(url) => RequestError::InvalidUrl(url),
            None => RequestError::Transport(value),
        }
    }
}
