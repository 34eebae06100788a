//! Template catalog snapshots
//!
//! A [`CatalogSnapshot`] is an immutable, fingerprinted version of the
//! template catalog. Matching keys (lower-cased vendor, category, tags, use
//! cases and compliance frameworks) are computed once when the snapshot is
//! built, so scoring only reads shared data.
//!
//! [`SharedCatalog`] hands out `Arc<CatalogSnapshot>`s. Publishing a new
//! snapshot swaps the `Arc`; calls already holding the previous one keep it.

use crate::fingerprint::SnapshotFingerprint;
use crate::validation::{normalize_tag, normalize_tags};
use nac_model::{CatalogError, TemplateId, TemplateMetadata};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Vendor names that mark a template as vendor-agnostic
const AGNOSTIC_VENDORS: [&str; 6] = ["", "generic", "multi-vendor", "vendor-agnostic", "agnostic", "any"];

/// Version label for catalogs loaded without one
pub const UNVERSIONED: &str = "unversioned";

/// Template metadata plus precomputed matching keys
#[derive(Debug, Clone)]
pub struct IndexedTemplate {
    metadata: TemplateMetadata,
    vendor_key: String,
    vendor_agnostic: bool,
    match_tags: BTreeSet<String>,
    use_cases: BTreeSet<String>,
    compliance: BTreeSet<String>,
}

impl IndexedTemplate {
    /// Index a template
    #[must_use]
    pub fn new(metadata: TemplateMetadata) -> Self {
        let vendor_key = normalize_tag(&metadata.vendor).unwrap_or_default();
        let vendor_agnostic = AGNOSTIC_VENDORS.contains(&vendor_key.as_str());

        let mut match_tags = normalize_tags(&metadata.tags);
        if !vendor_key.is_empty() {
            match_tags.insert(vendor_key.clone());
        }
        if let Some(category) = normalize_tag(&metadata.category) {
            match_tags.insert(category);
        }

        Self {
            use_cases: normalize_tags(&metadata.supported_use_cases),
            compliance: normalize_tags(&metadata.compliance_coverage),
            metadata,
            vendor_key,
            vendor_agnostic,
            match_tags,
        }
    }

    /// Original catalog metadata
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &TemplateMetadata {
        &self.metadata
    }

    /// Template id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &TemplateId {
        &self.metadata.id
    }

    /// Normalized vendor
    #[inline]
    #[must_use]
    pub fn vendor_key(&self) -> &str {
        &self.vendor_key
    }

    /// True when the vendor field marks the template as vendor-agnostic
    #[inline]
    #[must_use]
    pub fn is_vendor_agnostic(&self) -> bool {
        self.vendor_agnostic
    }

    /// Normalized vendor, category and extra tags
    #[inline]
    #[must_use]
    pub fn match_tags(&self) -> &BTreeSet<String> {
        &self.match_tags
    }

    /// Normalized supported use cases
    #[inline]
    #[must_use]
    pub fn use_cases(&self) -> &BTreeSet<String> {
        &self.use_cases
    }

    /// Normalized compliance coverage
    #[inline]
    #[must_use]
    pub fn compliance(&self) -> &BTreeSet<String> {
        &self.compliance
    }
}

/// Versioned catalog document: either a bare list or `{ version, templates }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Versioned {
        version: String,
        templates: Vec<TemplateMetadata>,
    },
    Bare(Vec<TemplateMetadata>),
}

impl CatalogDocument {
    fn into_parts(self) -> (String, Vec<TemplateMetadata>) {
        match self {
            Self::Versioned { version, templates } => (version, templates),
            Self::Bare(templates) => (UNVERSIONED.to_string(), templates),
        }
    }
}

/// Immutable catalog version
#[derive(Debug)]
pub struct CatalogSnapshot {
    version: String,
    fingerprint: SnapshotFingerprint,
    templates: Vec<IndexedTemplate>,
    index: HashMap<TemplateId, usize>,
}

impl CatalogSnapshot {
    /// Build a snapshot, rejecting duplicate ids and invalid hours
    ///
    /// # Errors
    /// Returns `CatalogError` if a template id is blank or duplicated, or its
    /// deployment hours are negative or not finite
    pub fn new(
        version: impl Into<String>,
        templates: Vec<TemplateMetadata>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(templates.len());
        for (position, template) in templates.iter().enumerate() {
            if template.id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyTemplateId);
            }
            let hours = template.typical_deployment_hours;
            if !hours.is_finite() || hours < 0.0 {
                return Err(CatalogError::InvalidHours {
                    template: template.id.clone(),
                    hours,
                });
            }
            if index.insert(template.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateTemplate(template.id.clone()));
            }
        }

        let fingerprint = SnapshotFingerprint::compute_serializable(&templates)?;
        let templates = templates.into_iter().map(IndexedTemplate::new).collect();

        Ok(Self {
            version: version.into(),
            fingerprint,
            templates,
            index,
        })
    }

    /// Snapshot with no templates
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: UNVERSIONED.to_string(),
            fingerprint: SnapshotFingerprint::compute(b"[]"),
            templates: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Parse a JSON catalog document
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the templates are rejected
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let (version, templates) = serde_json::from_str::<CatalogDocument>(json)?.into_parts();
        Self::new(version, templates)
    }

    /// Parse a YAML catalog document
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the templates are rejected
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let (version, templates) = serde_yaml::from_str::<CatalogDocument>(yaml)?.into_parts();
        Self::new(version, templates)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has an unknown extension or is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let snapshot = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&raw)?,
            other => {
                return Err(CatalogError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        tracing::info!(
            path = %path.display(),
            version = %snapshot.version,
            fingerprint = %snapshot.fingerprint.short(),
            templates = snapshot.len(),
            "Loaded catalog snapshot"
        );
        Ok(snapshot)
    }

    /// Version label
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Content fingerprint
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> SnapshotFingerprint {
        self.fingerprint
    }

    /// Indexed templates in catalog order
    #[inline]
    #[must_use]
    pub fn templates(&self) -> &[IndexedTemplate] {
        &self.templates
    }

    /// Look up a template
    #[must_use]
    pub fn get(&self, id: &TemplateId) -> Option<&IndexedTemplate> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    /// Check whether an id exists in this snapshot
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &TemplateId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of templates
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// True when there are no templates
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Read-only access to the current catalog snapshot
///
/// Called once per engine invocation; the engine never caches the result
/// across calls.
pub trait CatalogSource: Send + Sync {
    /// Current snapshot
    ///
    /// # Errors
    /// Returns `CatalogError` if the snapshot cannot be produced
    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError>;
}

impl CatalogSource for Arc<CatalogSnapshot> {
    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(Arc::clone(self))
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        (**self).snapshot()
    }
}

/// Catalog whose snapshot can be replaced while calls are in flight
#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl SharedCatalog {
    /// Create with an initial snapshot
    #[must_use]
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Replace the current snapshot, returning the previous one
    pub fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let next = Arc::new(snapshot);
        tracing::info!(
            version = %next.version(),
            fingerprint = %next.fingerprint().short(),
            templates = next.len(),
            "Publishing catalog snapshot"
        );
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Snapshot currently served
    #[must_use]
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current.read())
    }
}

impl Default for SharedCatalog {
    fn default() -> Self {
        Self::new(CatalogSnapshot::empty())
    }
}

impl CatalogSource for SharedCatalog {
    fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(self.current())
    }
}
