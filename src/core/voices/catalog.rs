use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::defaults::DEFAULT_VOICES;

/// File name of the persisted catalog inside the configuration directory
pub const VOICES_FILE_NAME: &str = "Voices.json";

/// Where the active catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    File,
    Default,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File => write!(f, "file"),
            CatalogSource::Default => write!(f, "default"),
        }
    }
}

/// A single voice entry as it appears on disk and in `/voices` responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceItem {
    pub name: String,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to access voices file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid voices json")]
    InvalidFormat,

    #[error("voices list is empty")]
    Empty,

    #[error("invalid voice entry: name={name:?} description={description:?}")]
    InvalidEntry { name: String, description: String },

    #[error("invalid generated_at: {0}")]
    InvalidTimestamp(String),

    #[error("failed to serialize voices: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no default voices available and {0} is missing or invalid")]
    NoDefaults(String),
}

/// Immutable snapshot of the voices the gateway accepts.
///
/// Keys are lowercase and trimmed, descriptions are trimmed, and neither is
/// ever empty. The map is ordered so listings come out sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: BTreeMap<String, String>,
    generated_at: Option<DateTime<Utc>>,
    source: CatalogSource,
}

/// Path of the catalog file for a configuration directory
pub fn voices_file_path(config_dir: &Path) -> PathBuf {
    let dir = config_dir.to_string_lossy();
    let dir = dir.trim();
    if dir.is_empty() || dir == "." {
        PathBuf::from(VOICES_FILE_NAME)
    } else {
        PathBuf::from(dir).join(VOICES_FILE_NAME)
    }
}

impl VoiceCatalog {
    /// Build a catalog from name/description pairs, normalizing every entry.
    pub fn from_pairs<I, N, D>(pairs: I, source: CatalogSource) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: AsRef<str>,
    {
        Ok(Self {
            voices: normalize_entries(pairs)?,
            generated_at: None,
            source,
        })
    }

    /// The built-in default catalog
    pub fn defaults() -> Result<Self, CatalogError> {
        Self::from_pairs(DEFAULT_VOICES.iter().copied(), CatalogSource::Default)
    }

    /// Parse catalog JSON in any of the accepted shapes.
    pub fn from_json(data: &[u8]) -> Result<Self, CatalogError> {
        let parsed = parse_catalog(data)?;
        Ok(Self {
            voices: parsed.voices,
            generated_at: parsed.generated_at,
            source: CatalogSource::File,
        })
    }

    /// Load the catalog stored at `path`.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read(path)?;
        Self::from_json(&data)
    }

    /// Load the catalog at `path`, falling back to the built-in defaults.
    ///
    /// When the defaults are used they are written to `path`; a failed write
    /// is logged and otherwise ignored. Only an unusable default set is fatal.
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        match Self::load(path) {
            Ok(catalog) => {
                info!(
                    path = %path.display(),
                    voices = catalog.len(),
                    "Loaded voice catalog from file"
                );
                return Ok(catalog);
            }
            Err(CatalogError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Voice catalog file not found");
            }
            Err(e) => {
                warn!(path = %path.display(), "Voices.json invalid: {}", e);
            }
        }

        if DEFAULT_VOICES.is_empty() {
            return Err(CatalogError::NoDefaults(path.display().to_string()));
        }
        let catalog = Self::defaults()?;

        if let Err(e) = catalog.persist(path) {
            warn!(path = %path.display(), "Failed to write Voices.json: {}", e);
        }

        Ok(catalog)
    }

    /// Write the catalog as a timestamped, name-sorted envelope.
    pub fn persist(&self, path: &Path) -> Result<(), CatalogError> {
        if self.voices.is_empty() {
            return Err(CatalogError::Empty);
        }

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let envelope = PersistedCatalog {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            voices: self.items(),
        };
        let mut data = serde_json::to_vec_pretty(&envelope)?;
        data.push(b'\n');
        fs::write(path, data)?;

        debug!(path = %path.display(), voices = self.len(), "Persisted voice catalog");
        Ok(())
    }

    /// Canonical (lowercase) key for `name`, if the voice exists
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let key = name.trim().to_lowercase();
        self.voices.get_key_value(&key).map(|(k, _)| k.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.voices
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Voice names in ascending order
    pub fn names(&self) -> Vec<&str> {
        self.voices.keys().map(String::as_str).collect()
    }

    /// Entries in ascending name order
    pub fn items(&self) -> Vec<VoiceItem> {
        self.voices
            .iter()
            .map(|(name, description)| VoiceItem {
                name: name.clone(),
                description: description.clone(),
            })
            .collect()
    }

    pub fn voices(&self) -> &BTreeMap<String, String> {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }
}

#[derive(Serialize)]
struct PersistedCatalog {
    generated_at: String,
    voices: Vec<VoiceItem>,
}

#[derive(Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    generated_at: Option<String>,
    #[serde(default)]
    voices: Vec<VoiceItem>,
}

#[derive(Deserialize)]
struct MapEnvelope {
    #[serde(default)]
    generated_at: Option<String>,
    #[serde(default)]
    voices: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct MapWrapper {
    #[serde(default)]
    voices: BTreeMap<String, String>,
}

struct ParsedCatalog {
    voices: BTreeMap<String, String>,
    generated_at: Option<DateTime<Utc>>,
}

/// A shape parser returns `None` when the document does not have its shape or
/// carries no entries, letting the next shape try.
type ShapeParser = fn(&[u8]) -> Option<Result<ParsedCatalog, CatalogError>>;

/// Accepted document shapes, in priority order
const SHAPES: &[(&str, ShapeParser)] = &[
    ("list envelope", parse_list_envelope),
    ("map envelope", parse_map_envelope),
    ("list", parse_list),
    ("map", parse_map),
    ("map wrapper", parse_map_wrapper),
];

fn parse_catalog(data: &[u8]) -> Result<ParsedCatalog, CatalogError> {
    for (shape, parser) in SHAPES {
        if let Some(result) = parser(data) {
            debug!(shape, "Voice catalog shape matched");
            return result;
        }
    }
    Err(CatalogError::InvalidFormat)
}

fn parse_list_envelope(data: &[u8]) -> Option<Result<ParsedCatalog, CatalogError>> {
    let envelope: ListEnvelope = serde_json::from_slice(data).ok()?;
    if envelope.voices.is_empty() {
        return None;
    }
    Some(with_timestamp(
        normalize_items(envelope.voices),
        envelope.generated_at.as_deref(),
    ))
}

fn parse_map_envelope(data: &[u8]) -> Option<Result<ParsedCatalog, CatalogError>> {
    let envelope: MapEnvelope = serde_json::from_slice(data).ok()?;
    if envelope.voices.is_empty() {
        return None;
    }
    Some(with_timestamp(
        normalize_entries(envelope.voices),
        envelope.generated_at.as_deref(),
    ))
}

fn parse_list(data: &[u8]) -> Option<Result<ParsedCatalog, CatalogError>> {
    let items: Vec<VoiceItem> = serde_json::from_slice(data).ok()?;
    if items.is_empty() {
        return None;
    }
    Some(with_timestamp(normalize_items(items), None))
}

fn parse_map(data: &[u8]) -> Option<Result<ParsedCatalog, CatalogError>> {
    let voices: BTreeMap<String, String> = serde_json::from_slice(data).ok()?;
    if voices.is_empty() {
        return None;
    }
    Some(with_timestamp(normalize_entries(voices), None))
}

fn parse_map_wrapper(data: &[u8]) -> Option<Result<ParsedCatalog, CatalogError>> {
    let wrapper: MapWrapper = serde_json::from_slice(data).ok()?;
    if wrapper.voices.is_empty() {
        return None;
    }
    Some(with_timestamp(normalize_entries(wrapper.voices), None))
}

fn with_timestamp(
    voices: Result<BTreeMap<String, String>, CatalogError>,
    generated_at: Option<&str>,
) -> Result<ParsedCatalog, CatalogError> {
    let voices = voices?;
    let generated_at = match generated_at {
        Some(value) if !value.trim().is_empty() => Some(
            DateTime::parse_from_rfc3339(value)
                .map_err(|e| CatalogError::InvalidTimestamp(format!("{value}: {e}")))?
                .with_timezone(&Utc),
        ),
        _ => None,
    };
    Ok(ParsedCatalog {
        voices,
        generated_at,
    })
}

fn normalize_items(items: Vec<VoiceItem>) -> Result<BTreeMap<String, String>, CatalogError> {
    normalize_entries(items.into_iter().map(|item| (item.name, item.description)))
}

fn normalize_entries<I, N, D>(entries: I) -> Result<BTreeMap<String, String>, CatalogError>
where
    I: IntoIterator<Item = (N, D)>,
    N: AsRef<str>,
    D: AsRef<str>,
{
    let mut voices = BTreeMap::new();
    for (name, description) in entries {
        let (name, description) = (name.as_ref(), description.as_ref());
        let key = name.trim().to_lowercase();
        let value = description.trim();
        if key.is_empty() || value.is_empty() {
            return Err(CatalogError::InvalidEntry {
                name: name.to_string(),
                description: description.to_string(),
            });
        }
        voices.insert(key, value.to_string());
    }
    if voices.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(voices)
}
