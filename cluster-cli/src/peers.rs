//! Peers-file loading: one address per line, blank lines skipped.

use cluster_core::ClusterError;
use std::fs;
use std::path::Path;

pub fn load_peers(path: impl AsRef<Path>) -> Result<Vec<String>, ClusterError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        ClusterError::Config(format!("failed to read peers file {}: {e}", path.display()))
    })?;

    let peers: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if peers.is_empty() {
        return Err(ClusterError::Config(format!(
            "no peers found in {}",
            path.display()
        )));
    }

    Ok(peers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn skips_blank_lines() {
        let file = tempfile_with_contents("a:1\n\nb:1\n  \nc:1\n");
        let peers = load_peers(file.path()).unwrap();
        assert_eq!(peers, vec!["a:1", "b:1", "c:1"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let file = tempfile_with_contents("");
        assert!(load_peers(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_peers("/nonexistent/path/peers.txt").is_err());
    }

    fn tempfile_with_contents(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create tempfile");
        file.write_all(contents.as_bytes()).unwrap();
        file
    }
}
