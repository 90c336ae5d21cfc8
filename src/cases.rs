use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum CaseError {
    #[error("failed to open cases file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse cases file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cases file {} does not define any case", .0.display())]
    Empty(PathBuf),
    #[error("case {index} has invalid delay {delay_ms}ms")]
    InvalidDelay { index: usize, delay_ms: f64 },
}

/// One filter setting: echo delay in milliseconds, feedback coefficient
/// and the file the filtered signal goes to.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Case {
    pub delay_ms: f64,
    pub alfa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Case {
    pub fn new(delay_ms: f64, alfa: f64) -> Self {
        Case {
            delay_ms,
            alfa,
            output: None,
        }
    }

    /// Output file name, `audio_filter{n}.wav` when none was given.
    /// `index` counts from zero.
    pub fn output_name(&self, index: usize) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("audio_filter{}.wav", index + 1)))
    }

    /// Status line printed once the case has been written.
    pub fn describe(&self, output: &Path) -> String {
        format!(
            "Signal filtered with k=Fsx{}ms and alfa={} in {}",
            self.delay_ms,
            self.alfa,
            output.display()
        )
    }

    /// Plot panel title.
    pub fn title(&self) -> String {
        format!("k={}msxFs and a={}", self.delay_ms, self.alfa)
    }
}

/// 50ms/0.6, 250ms/0.4 and 500ms/0.2.
pub fn default_cases() -> Vec<Case> {
    vec![
        Case::new(50.0, 0.6),
        Case::new(250.0, 0.4),
        Case::new(500.0, 0.2),
    ]
}

/// Reads a JSON array of cases.
pub fn load_cases<P: AsRef<Path>>(path: P) -> Result<Vec<Case>, CaseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CaseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cases: Vec<Case> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CaseError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if cases.is_empty() {
        return Err(CaseError::Empty(path.to_path_buf()));
    }
    validate(&cases)?;
    log::debug!("loaded {} cases from {}", cases.len(), path.display());
    Ok(cases)
}

pub fn validate(cases: &[Case]) -> Result<(), CaseError> {
    for (index, case) in cases.iter().enumerate() {
        if !case.delay_ms.is_finite() || case.delay_ms < 0.0 {
            return Err(CaseError::InvalidDelay {
                index,
                delay_ms: case.delay_ms,
            });
        }
    }
    Ok(())
}
