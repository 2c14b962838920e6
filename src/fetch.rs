//! Artifact retrieval over whichever transport tool the host carries.
//!
//! curl is preferred; wget is the fallback. Neither being present is its own
//! failure class so callers can tell "install curl or wget" apart from a
//! network problem. Retries are bounded and handled by the transport itself.

use std::path::PathBuf;

use thiserror::Error;

use crate::ui;

/// One artifact to retrieve.
#[derive(Debug, Clone)]
pub struct FetchSpec {
    pub url: String,
    pub dest: PathBuf,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no download tool available; install curl or wget and re-run")]
    NoTransport,
    #[error("download failed for {url}: {detail}")]
    Failed { url: String, detail: String },
}

pub trait Fetcher {
    fn fetch(&self, spec: &FetchSpec) -> Result<(), FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Curl,
    Wget,
}

/// Production fetcher shelling out to curl or wget.
pub struct TransportFetcher {
    transport: Option<Transport>,
}

impl TransportFetcher {
    pub fn detect() -> Self {
        let transport = if which::which("curl").is_ok() {
            Some(Transport::Curl)
        } else if which::which("wget").is_ok() {
            Some(Transport::Wget)
        } else {
            None
        };
        Self { transport }
    }
}

/// curl invocation: encrypted scheme pinned, TLS 1.2 minimum, three retries
/// with a short delay.
fn curl_args(spec: &FetchSpec) -> Vec<String> {
    vec![
        "--proto".into(),
        "=https".into(),
        "--tlsv1.2".into(),
        "-f".into(),
        "-sSL".into(),
        "--retry".into(),
        "3".into(),
        "--retry-delay".into(),
        "1".into(),
        "-o".into(),
        spec.dest.display().to_string(),
        spec.url.clone(),
    ]
}

fn wget_args(spec: &FetchSpec) -> Vec<String> {
    vec![
        "-q".into(),
        "--https-only".into(),
        "--tries=3".into(),
        "-O".into(),
        spec.dest.display().to_string(),
        spec.url.clone(),
    ]
}

impl Fetcher for TransportFetcher {
    fn fetch(&self, spec: &FetchSpec) -> Result<(), FetchError> {
        let transport = self.transport.ok_or(FetchError::NoTransport)?;
        let (program, args) = match transport {
            Transport::Curl => ("curl", curl_args(spec)),
            Transport::Wget => ("wget", wget_args(spec)),
        };

        // Cosmetic only: animates the blocking download, cannot change its result.
        let spinner = ui::create_spinner(format!("downloading {}", spec.url));
        let result = duct::cmd(program, &args)
            .unchecked()
            .stdout_capture()
            .stderr_capture()
            .run();
        ui::finish_spinner(spinner);

        match result {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(FetchError::Failed {
                url: spec.url.clone(),
                detail: {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let stderr = stderr.trim();
                    if stderr.is_empty() {
                        format!("{program} exited with failure")
                    } else {
                        stderr.to_string()
                    }
                },
            }),
            Err(err) => Err(FetchError::Failed {
                url: spec.url.clone(),
                detail: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> FetchSpec {
        FetchSpec {
            url: "https://example.invalid/pkg.deb".to_string(),
            dest: PathBuf::from("/tmp/pkg.deb"),
        }
    }

    #[test]
    fn curl_pins_transport_security_and_bounds_retries() {
        let args = curl_args(&spec());
        let joined = args.join(" ");
        assert!(joined.contains("--proto =https"));
        assert!(joined.contains("--tlsv1.2"));
        assert!(joined.contains("--retry 3"));
        assert!(joined.contains("--retry-delay 1"));
        assert!(args.last().unwrap().starts_with("https://"));
    }

    #[test]
    fn wget_stays_on_https_with_bounded_tries() {
        let args = wget_args(&spec());
        assert!(args.contains(&"--https-only".to_string()));
        assert!(args.contains(&"--tries=3".to_string()));
    }

    #[test]
    fn missing_transport_is_its_own_failure() {
        let fetcher = TransportFetcher { transport: None };
        let err = fetcher.fetch(&spec()).unwrap_err();
        assert!(matches!(err, FetchError::NoTransport));
        // Distinct from a network failure in rendering too.
        assert!(err.to_string().contains("curl or wget"));
    }
}
