use crate::process::ProcessOutput;

/// Substrings the translation script prints while fetching a model
pub const DOWNLOAD_MARKERS: [&str; 2] = ["Downloading model", "downloaded successfully"];

/// Outcome of one translation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Download lines found on stdout, if any
    pub notice: Option<String>,
    /// Translated text, or the diagnostic text of a failed run
    pub result: Result<String, String>,
}

/// Decides from captured output whether a translation run succeeded
///
/// Lines on stdout containing one of the download markers are reported
/// as a notice and removed from the result. What remains, trimmed, is the
/// translation. The run failed only when nothing at all remains and stderr
/// is non-empty; stderr is then the failure message as given. Whitespace
/// counts as output on both channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputClassifier {
    markers: Vec<String>,
}

impl OutputClassifier {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn classify(&self, output: &ProcessOutput) -> Classification {
        let (notices, rest): (Vec<&str>, Vec<&str>) = output
            .stdout
            .lines()
            .partition(|line| self.is_marker(line));

        let notice = if notices.is_empty() {
            None
        } else {
            Some(notices.join("\n"))
        };

        let remaining = if notice.is_none() {
            output.stdout.clone()
        } else {
            rest.join("\n")
        };

        let result = if remaining.is_empty() && !output.stderr.is_empty() {
            Err(output.stderr.clone())
        } else {
            Ok(remaining.trim().to_string())
        };

        Classification { notice, result }
    }

    fn is_marker(&self, line: &str) -> bool {
        self.markers.iter().any(|marker| line.contains(marker.as_str()))
    }
}

impl Default for OutputClassifier {
    fn default() -> Self {
        Self::new(DOWNLOAD_MARKERS.iter().map(|m| m.to_string()).collect())
    }
}
