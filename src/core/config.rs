use crate::core::error::{ConfigError, FolioError, FolioResult, ResultExt};
use crate::release::DocType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Device label recorded in the ledger when none is configured
pub const DEFAULT_DEVICE: &str = "Unknown Device";

/// Default Notion-compatible API root
pub const DEFAULT_LEDGER_URL: &str = "https://api.notion.com/v1";

/// Default `Notion-Version` header
pub const DEFAULT_LEDGER_API_VERSION: &str = "2022-06-28";

/// Configuration for folio
/// Searched in order: folio.toml, .folio.toml, .config/folio.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
  pub output: OutputConfig,
  pub build: BuildConfig,
  #[serde(default)]
  pub ledger: Option<LedgerConfig>,
  #[serde(default)]
  pub device: Option<String>,
  #[serde(default)]
  pub documents: DocumentsConfig,
}

/// Canonical output location shared by every document type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
  pub dir: PathBuf,
}

/// External build collaborator
///
/// The document type is appended as the final argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  pub command: Vec<String>,
}

/// Ledger service credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
  pub token: String,
  #[serde(default = "default_ledger_url")]
  pub base_url: String,
  #[serde(default = "default_ledger_api_version")]
  pub api_version: String,
}

fn default_ledger_url() -> String {
  DEFAULT_LEDGER_URL.to_string()
}

fn default_ledger_api_version() -> String {
  DEFAULT_LEDGER_API_VERSION.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentsConfig {
  #[serde(default)]
  pub resume: Option<DocumentConfig>,
  #[serde(default)]
  pub cover_letter: Option<DocumentConfig>,
}

/// Per-document-type settings
///
/// # Example
///
/// ```toml
/// [documents.resume]
/// source_dir = "resume"
/// artifact = "Resume.pdf"
/// output_name = "resumev1"
/// archive_dir = "archive/resume"
/// ledger_database = "0f6c..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
  /// Working directory watched for changes (default: the doc type name)
  #[serde(default)]
  pub source_dir: Option<PathBuf>,

  /// File produced by the build, relative to `source_dir`
  pub artifact: PathBuf,

  /// Base name of the published file; also the version prefix
  #[serde(default)]
  pub output_name: Option<String>,

  /// Archive directory; archiving is skipped when unset
  #[serde(default)]
  pub archive_dir: Option<PathBuf>,

  /// Ledger database id; ledger recording is skipped when unset
  #[serde(default)]
  pub ledger_database: Option<String>,
}

/// Fully resolved paths and names for one document type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
  pub doc_type: DocType,
  /// Directory gated by the change detector and committed after release
  pub source_dir: PathBuf,
  /// Absolute path of the freshly built artifact
  pub artifact: PathBuf,
  pub output_dir: PathBuf,
  pub output_name: String,
  pub archive_dir: Option<PathBuf>,
}

impl DocumentTarget {
  /// Extension of the built artifact, without the dot
  pub fn extension(&self) -> &str {
    self.artifact.extension().and_then(|e| e.to_str()).unwrap_or("pdf")
  }

  /// Canonical output file: `<output_dir>/<output_name>.<ext>`
  pub fn output_path(&self) -> PathBuf {
    self
      .output_dir
      .join(format!("{}.{}", self.output_name, self.extension()))
  }
}

impl ReleaseConfig {
  /// Find config file in search order: folio.toml, .folio.toml, .config/folio.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("folio.toml"),
      path.join(".folio.toml"),
      path.join(".config").join("folio.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from folio.toml (searches multiple locations)
  pub fn load(path: &Path) -> FolioResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      FolioError::Config(ConfigError::NotFound {
        project_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> FolioResult<Self> {
    let config: ReleaseConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate required keys and shapes
  pub fn validate(&self) -> FolioResult<()> {
    if self.output.dir.as_os_str().is_empty() {
      return Err(FolioError::Config(ConfigError::MissingField {
        field: "output.dir".to_string(),
      }));
    }

    if self.build.command.first().is_none_or(|p| p.trim().is_empty()) {
      return Err(FolioError::Config(ConfigError::MissingField {
        field: "build.command".to_string(),
      }));
    }

    if let Some(ledger) = &self.ledger
      && ledger.base_url.trim().is_empty()
    {
      return Err(FolioError::Config(ConfigError::InvalidField {
        field: "ledger.base_url".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    for doc_type in DocType::ALL {
      let Some(doc) = self.document(doc_type) else {
        continue;
      };

      if doc.artifact.file_name().is_none() {
        return Err(FolioError::Config(ConfigError::InvalidField {
          field: format!("documents.{}.artifact", doc_type),
          reason: "must name a file".to_string(),
        }));
      }

      if let Some(name) = &doc.output_name
        && (name.trim().is_empty() || name.contains(['/', '\\']))
      {
        return Err(FolioError::Config(ConfigError::InvalidField {
          field: format!("documents.{}.output_name", doc_type),
          reason: "must be a non-empty file name without path separators".to_string(),
        }));
      }
    }

    Ok(())
  }

  /// Raw settings for a document type, if configured
  pub fn document(&self, doc_type: DocType) -> Option<&DocumentConfig> {
    match doc_type {
      DocType::Resume => self.documents.resume.as_ref(),
      DocType::CoverLetter => self.documents.cover_letter.as_ref(),
    }
  }

  /// Resolve a document type's paths against the project root
  pub fn target(&self, root: &Path, doc_type: DocType) -> FolioResult<DocumentTarget> {
    let doc = self.document(doc_type).ok_or_else(|| {
      FolioError::Config(ConfigError::DocumentNotConfigured {
        doc_type: doc_type.to_string(),
      })
    })?;

    let source_dir = root.join(
      doc
        .source_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(doc_type.as_str())),
    );

    Ok(DocumentTarget {
      doc_type,
      artifact: source_dir.join(&doc.artifact),
      source_dir,
      output_dir: root.join(&self.output.dir),
      output_name: doc
        .output_name
        .clone()
        .unwrap_or_else(|| doc_type.as_str().to_string()),
      archive_dir: doc.archive_dir.as_ref().map(|d| root.join(d)),
    })
  }

  /// Ledger database for a document type
  pub fn ledger_database(&self, doc_type: DocType) -> Option<&str> {
    self
      .document(doc_type)
      .and_then(|d| d.ledger_database.as_deref())
      .filter(|id| !id.trim().is_empty())
  }

  /// Device label written to ledger records
  pub fn device_label(&self) -> &str {
    self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
  }
}
