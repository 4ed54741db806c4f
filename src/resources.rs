//! Provisioning of the sentiment lexicon.
//!
//! The lexicon is an external data file. It is resolved once per run, before
//! any document is analysed, through a [`LexiconSource`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::AnalysisError;
use crate::sentiment::Lexicon;

pub const DEFAULT_LEXICON_PATH: &str = ".distant_reading/vader_lexicon.txt";
pub const DEFAULT_LEXICON_URL: &str =
    "https://raw.githubusercontent.com/cjhutto/vaderSentiment/master/vaderSentiment/vader_lexicon.txt";

/// Somewhere a [`Lexicon`] can be loaded from.
pub trait LexiconSource {
    fn load(&self) -> Result<Lexicon, AnalysisError>;
}

/// Lexicon content supplied directly, e.g. by tests or an embedding program.
#[derive(Debug, Clone)]
pub struct InlineLexicon(pub String);

impl LexiconSource for InlineLexicon {
    fn load(&self) -> Result<Lexicon, AnalysisError> {
        Ok(Lexicon::parse(&self.0))
    }
}

/// A lexicon file on disk, downloaded once if it is missing.
#[derive(Debug, Clone)]
pub struct CachedLexicon {
    pub path: PathBuf,
    pub url: Option<String>,
}

impl CachedLexicon {
    pub fn new(path: impl Into<PathBuf>, url: Option<String>) -> Self {
        CachedLexicon {
            path: path.into(),
            url,
        }
    }

    /// Returns the local path, fetching the file first when it does not exist.
    pub fn ensure_local(&self) -> Result<&Path, AnalysisError> {
        if self.path.exists() {
            debug!("using cached lexicon {}", self.path.display());
            return Ok(&self.path);
        }
        let Some(url) = self.url.as_deref() else {
            return Err(AnalysisError::LexiconUnavailable {
                path: self.path.clone(),
                reason: "file missing and downloading is disabled".to_string(),
            });
        };
        info!("lexicon not found, fetching {url}");
        download_to_path(&self.path, url)?;
        Ok(&self.path)
    }
}

impl LexiconSource for CachedLexicon {
    fn load(&self) -> Result<Lexicon, AnalysisError> {
        let path = self.ensure_local()?;
        let content = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let lexicon = Lexicon::parse(&content);
        if lexicon.is_empty() {
            return Err(AnalysisError::LexiconUnavailable {
                path: path.to_path_buf(),
                reason: "no lexicon entries found".to_string(),
            });
        }
        info!("loaded {} lexicon entries", lexicon.len());
        Ok(lexicon)
    }
}

/// Downloads `url` into `target`, creating parent directories as needed.
///
/// `target` only appears once the whole body has been written.
fn download_to_path(target: &Path, url: &str) -> Result<(), AnalysisError> {
    let unavailable = |reason: String| AnalysisError::LexiconUnavailable {
        path: target.to_path_buf(),
        reason,
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| AnalysisError::io(dir, e))?;

    let response = ureq::get(url)
        .call()
        .map_err(|e| unavailable(format!("download from {url} failed: {e}")))?;
    if !(200..300).contains(&response.status()) {
        return Err(unavailable(format!(
            "unexpected status {} while fetching {url}",
            response.status()
        )));
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AnalysisError::io(dir, e))?;
    io::copy(&mut response.into_reader(), tmp.as_file_mut())
        .map_err(|e| unavailable(format!("download from {url} interrupted: {e}")))?;
    tmp.persist(target)
        .map_err(|e| AnalysisError::io(target, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    const FIXTURE: &str = "good\t1.9\t0.9\t[]\nbad\t-2.5\t0.8\t[]\n";

    /// Serve every request on 127.0.0.1 with `status` and `body`; returns the
    /// base URL and a counter of requests seen.
    fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/vader_lexicon.txt", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                counter.fetch_add(1, Ordering::SeqCst);
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap_or(0) > 0 && line != "\r\n" {
                    line.clear();
                }
                let _ = write!(
                    stream,
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
            }
        });
        (url, hits)
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn missing_file_is_fetched_once() {
        let (url, hits) = serve("200 OK", FIXTURE);
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache");
        let path = cache.join("vader_lexicon.txt");
        let source = CachedLexicon::new(&path, Some(url));

        let lexicon = source.load().unwrap();
        assert_eq!(lexicon.get("bad"), Some(-2.5));
        assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
        assert_eq!(dir_entries(&cache), vec!["vader_lexicon.txt"]);

        let again = source.load().unwrap();
        assert_eq!(again.len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_status_leaves_no_file() {
        let (url, hits) = serve("404 Not Found", "missing");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vader_lexicon.txt");

        let err = CachedLexicon::new(&path, Some(url)).load().unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconUnavailable { .. }), "{err}");
        assert!(err.to_string().contains("404"), "{err}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn unreachable_host_is_lexicon_unavailable() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vader_lexicon.txt");

        let url = format!("http://{addr}/vader_lexicon.txt");
        let err = CachedLexicon::new(&path, Some(url)).load().unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconUnavailable { .. }), "{err}");
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn cached_file_is_used_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.txt");
        fs::write(&path, "good\t1.9\t0.9\t[]\n").unwrap();

        let source = CachedLexicon::new(&path, None);
        let lexicon = source.load().unwrap();
        assert_eq!(lexicon.get("good"), Some(1.9));
    }

    #[test]
    fn missing_file_without_url_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = CachedLexicon::new(dir.path().join("absent.txt"), None);
        let err = source.load().unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconUnavailable { .. }));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.txt");
        fs::write(&path, "not a lexicon\n").unwrap();
        let err = CachedLexicon::new(&path, None).load().unwrap_err();
        assert!(err.to_string().contains("no lexicon entries"));
    }

    #[test]
    fn inline_source() {
        let lexicon = InlineLexicon("bad\t-2.5\n".to_string()).load().unwrap();
        assert_eq!(lexicon.get("bad"), Some(-2.5));
    }
}
