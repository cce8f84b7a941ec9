//! Purpose: Request-shaping structs for the richer client operations.
//! Exports: ingest, prediction, deletion, and bootstrap option types.
//! Role: Keep the `Client` methods thin; all defaults live here.
//! Invariants: Optional fields that are `None` never reach the command line.
//! Invariants: `Some("")` fields are passed through as an empty quoted token.

use std::path::PathBuf;

/// One metadata key/value attached to an ingested element.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An auxiliary file registered alongside the main element during ingest.
///
/// `template` and `colorspace` are optional; absent fields still occupy
/// their slot on the command line as an empty quoted token so the receiving
/// parser keeps field alignment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdditionalFile {
    pub path: String,
    pub template: Option<String>,
    pub colorspace: Option<String>,
}

impl AdditionalFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: None,
            colorspace: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_colorspace(mut self, colorspace: impl Into<String>) -> Self {
        self.colorspace = Some(colorspace.into());
        self
    }
}

/// Everything needed to ingest a new element into a library.
///
/// Sequences use the fileseq notation the tool expects, e.g.
/// `/some/folder/files.1001-1099#.exr`.
#[derive(Clone, Debug)]
pub struct IngestRequest {
    pub library: String,
    pub mapping: String,
    pub path: String,
    pub category: String,
    pub tags: Vec<String>,
    /// `None` leaves colorspace detection to the tool; `Some("")` explicitly
    /// requests no colorspace override.
    pub colorspace: Option<String>,
    pub media_type: Option<String>,
    pub metadata: Vec<MetadataEntry>,
    pub additional_files: Vec<AdditionalFile>,
}

impl IngestRequest {
    pub fn new(
        library: impl Into<String>,
        mapping: impl Into<String>,
        path: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            library: library.into(),
            mapping: mapping.into(),
            path: path.into(),
            category: category.into(),
            tags: Vec::new(),
            colorspace: None,
            media_type: None,
            metadata: Vec::new(),
            additional_files: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_colorspace(mut self, colorspace: impl Into<String>) -> Self {
        self.colorspace = Some(colorspace.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_metadata(mut self, entry: MetadataEntry) -> Self {
        self.metadata.push(entry);
        self
    }

    pub fn with_additional_file(mut self, file: AdditionalFile) -> Self {
        self.additional_files.push(file);
        self
    }
}

/// Which stores a deletion touches. Database-only by default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DeleteScope {
    pub database: bool,
    pub disk: bool,
    pub proxies: bool,
}

impl Default for DeleteScope {
    fn default() -> Self {
        Self {
            database: true,
            disk: false,
            proxies: false,
        }
    }
}

impl DeleteScope {
    /// Remove the element everywhere: database record, files on disk, and
    /// rendered proxies.
    pub fn everywhere() -> Self {
        Self {
            database: true,
            disk: true,
            proxies: true,
        }
    }
}

/// Tuning knobs for category prediction.
#[derive(Clone, Debug)]
pub struct PredictOptions {
    /// Return the top N predictions.
    pub top: u32,
    /// Frames sampled from a movie or sequence; more frames, better result,
    /// longer runtime.
    pub filmstrip_frames: u32,
    /// Custom model file path (.wit).
    pub model: Option<PathBuf>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            top: 2,
            filmstrip_frames: 36,
            model: None,
        }
    }
}

/// Target operating system for config entries that differ per platform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Linux,
    Mac,
    Windows,
}

impl Platform {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Platform::Linux => "lin",
            Platform::Mac => "mac",
            Platform::Windows => "win",
        }
    }
}

/// Database backend selection for a new library.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DatabaseType {
    Sqlite,
    Postgresql,
    Mysql,
}

impl DatabaseType {
    pub(crate) fn token(self) -> &'static str {
        match self {
            DatabaseType::Sqlite => "sqlite",
            DatabaseType::Postgresql => "postgresql",
            DatabaseType::Mysql => "mysql",
        }
    }
}

/// SSL material for a networked database connection.
#[derive(Clone, Debug, Default)]
pub struct SslMaterial {
    pub ca: Option<String>,
    pub certificate: Option<String>,
    pub key: Option<String>,
}

/// Connection parameters for the database backing a new library.
///
/// Sqlite libraries use `path`; networked backends use the host block.
#[derive(Clone, Debug)]
pub struct DatabaseOptions {
    pub db_type: DatabaseType,
    pub path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl: Option<SslMaterial>,
}

impl DatabaseOptions {
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            path: Some(path.into()),
            host: None,
            port: None,
            user: None,
            password: None,
            ssl: None,
        }
    }

    pub fn networked(db_type: DatabaseType, host: impl Into<String>, port: u16) -> Self {
        Self {
            db_type,
            path: None,
            host: Some(host.into()),
            port: Some(port),
            user: None,
            password: None,
            ssl: None,
        }
    }

    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_ssl(mut self, ssl: SslMaterial) -> Self {
        self.ssl = Some(ssl);
        self
    }
}

/// Everything needed to bootstrap a new library and its database.
#[derive(Clone, Debug)]
pub struct CreateLibraryRequest {
    pub library: String,
    pub name: String,
    pub root: String,
    /// Naming-convention/transcoding preset, e.g. `preserve_structure`.
    pub preset_key: Option<String>,
    pub database: DatabaseOptions,
    /// Create the default tag and category set in the new library.
    pub create_defaults: bool,
}

impl CreateLibraryRequest {
    pub fn new(
        library: impl Into<String>,
        name: impl Into<String>,
        root: impl Into<String>,
        database: DatabaseOptions,
    ) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
            root: root.into(),
            preset_key: None,
            database,
            create_defaults: false,
        }
    }

    pub fn with_preset_key(mut self, preset_key: impl Into<String>) -> Self {
        self.preset_key = Some(preset_key.into());
        self
    }

    pub fn with_create_defaults(mut self, create_defaults: bool) -> Self {
        self.create_defaults = create_defaults;
        self
    }
}
