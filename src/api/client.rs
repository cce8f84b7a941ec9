//! Purpose: Public client surface for the das element CLI operations.
//! Exports: `Client` and the `ApiResult` alias.
//! Role: Thin operation layer; every method encodes tokens and delegates to
//! the toolchain invoker.
//! Invariants: Methods own argument shape only; operation semantics live in
//! the external tool.
//! Invariants: A configured `--config` override is prepended to every
//! command.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::requests::{
    CreateLibraryRequest, DeleteScope, IngestRequest, Platform, PredictOptions,
};
use crate::core::encode::{CommandLine, encode_mapping};
use crate::core::error::Error;
use crate::core::exec::{Toolchain, Variant};

pub type ApiResult<T> = Result<T, Error>;

/// Client for one das element installation.
///
/// Construction is cheap and the client is freely cloneable; executable
/// references are re-resolved on every call, so toolchain or environment
/// changes take effect immediately.
#[derive(Clone, Debug, Default)]
pub struct Client {
    toolchain: Toolchain,
    config: Option<PathBuf>,
}

impl Client {
    /// A client resolving both CLI variants from the environment
    /// (`DASELEMENT_CLI` / `DASELEMENT_CLI_FULL`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit toolchain instead of pure environment resolution.
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    /// Override the standard CLI executable (path or command name).
    pub fn with_standard_cli(mut self, reference: impl Into<String>) -> Self {
        self.toolchain = self.toolchain.with_standard(reference);
        self
    }

    /// Override the full-featured CLI executable (path or command name).
    pub fn with_full_cli(mut self, reference: impl Into<String>) -> Self {
        self.toolchain = self.toolchain.with_full(reference);
        self
    }

    /// Use a custom config file (.conf) instead of the workstation setup.
    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    fn base(&self) -> CommandLine {
        match &self.config {
            Some(config) => CommandLine::new()
                .push("--config")
                .push(config.display().to_string()),
            None => CommandLine::new(),
        }
    }

    /// All libraries of the current config, keyed by library file path.
    pub fn get_libraries(&self) -> ApiResult<Value> {
        self.toolchain
            .invoke(Variant::Standard, self.base().push("get-libraries"))
    }

    /// Template mappings defined for a library.
    pub fn get_library_template_mappings(&self, library: &str) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-library-template-mappings")
            .push_quoted(library);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// All categories in the library database.
    pub fn get_categories(&self, library: &str) -> ApiResult<Value> {
        let command = self.base().push("get-categories").push_quoted(library);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// One category, addressed by ID (`Q3196`) or name (`fire`).
    pub fn get_category(&self, library: &str, value: &str) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-category")
            .push_quoted(library)
            .push_quoted(value);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// All tags in the library database.
    pub fn get_tags(&self, library: &str) -> ApiResult<Value> {
        let command = self.base().push("get-tags").push_quoted(library);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// One tag, addressed by ID or name.
    pub fn get_tag(&self, library: &str, value: &str) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-tag")
            .push_quoted(library)
            .push_quoted(value);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// All elements in the library database.
    pub fn get_elements(&self, library: &str) -> ApiResult<Value> {
        let command = self.base().push("get-elements").push_quoted(library);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// One element by its database ID.
    pub fn get_element_by_id(&self, library: &str, element_id: i64) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-element-by-id")
            .push_quoted(library)
            .push(element_id.to_string());
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// One element by its UUID.
    ///
    /// Without a library path every library linked in the config is
    /// searched. The UUID is the positional argument; the library is the
    /// optional `--library` flag.
    pub fn get_element_by_uuid(&self, uuid: &str, library: Option<&str>) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-element-by-uuid")
            .push(uuid)
            .option("library", library);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// One element by its name in the database.
    pub fn get_element_by_name(&self, library: &str, name: &str) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-element-by-name")
            .push_quoted(library)
            .push(name);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// Update a database entity (`Category`, `Element`, or `Tag`) with a
    /// JSON patch payload. Returns the updated entity.
    pub fn update(
        &self,
        library: &str,
        entity_type: &str,
        entity_id: impl Display,
        data: &Map<String, Value>,
    ) -> ApiResult<Value> {
        let command = self
            .base()
            .push("update")
            .push_quoted(library)
            .push_quoted(entity_type)
            .push_quoted(entity_id)
            .push(encode_mapping(data));
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// Delete one element. See [`Client::delete_elements`].
    pub fn delete_element(
        &self,
        library: &str,
        uuid: &str,
        scope: DeleteScope,
    ) -> ApiResult<Value> {
        self.delete_elements(library, &[uuid], scope)
    }

    /// Delete elements in bulk; `scope` selects which stores the deletion
    /// touches (database record, files on disk, rendered proxies).
    pub fn delete_elements(
        &self,
        library: &str,
        uuids: &[&str],
        scope: DeleteScope,
    ) -> ApiResult<Value> {
        let command = self.delete_elements_command(library, uuids, scope);
        self.toolchain.invoke(Variant::Standard, command)
    }

    fn delete_elements_command(
        &self,
        library: &str,
        uuids: &[&str],
        scope: DeleteScope,
    ) -> CommandLine {
        self.base()
            .push("delete-elements")
            .push_quoted(library)
            .push_quoted(uuids.join(","))
            .flag("database", scope.database)
            .flag("disk", scope.disk)
            .flag("proxies", scope.proxies)
    }

    /// Recursively find files and sequences below a path. `as_sequence`
    /// controls whether sequentially named files are reported as one
    /// sequence or as individual files.
    pub fn get_paths_from_disk(&self, path: &str, as_sequence: bool) -> ApiResult<Value> {
        let command = self
            .base()
            .push("get-paths-from-disk")
            .flag("as_sequence", as_sequence)
            .flag("as_single_files", !as_sequence)
            .push(path);
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// Register an existing library in the current config. The platform is
    /// only needed when the config entry targets one specific OS.
    pub fn add_library(&self, library: &str, platform: Option<Platform>) -> ApiResult<Value> {
        let command = self
            .base()
            .push("add-library")
            .push_quoted(library)
            .option("platform", platform.map(Platform::token));
        self.toolchain.invoke(Variant::Standard, command)
    }

    /// Ingest a new element. Returns the element entity for the newly
    /// created element.
    ///
    /// Tags are always transmitted (as an empty payload when none are set);
    /// colorspace and media type are omitted entirely when absent. Metadata
    /// entries and additional files each emit one fixed-arity group run.
    pub fn ingest(&self, request: &IngestRequest) -> ApiResult<Value> {
        let command = self.ingest_command(request);
        self.toolchain.invoke(Variant::Full, command)
    }

    fn ingest_command(&self, request: &IngestRequest) -> CommandLine {
        let mut command = self
            .base()
            .push("ingest")
            .option("library", Some(&request.library))
            .option("mapping", Some(&request.mapping))
            .option("path", Some(&request.path))
            .option("category", Some(&request.category))
            .option("tags", Some(request.tags.join(",")))
            .option("colorspace", request.colorspace.as_deref())
            .option("media_type", request.media_type.as_deref());
        for entry in &request.metadata {
            command = command.group(
                "metadata",
                &[Some(entry.key.as_str()), Some(entry.value.as_str())],
            );
        }
        for file in &request.additional_files {
            command = command.group(
                "additional_file",
                &[
                    Some(file.path.as_str()),
                    file.template.as_deref(),
                    file.colorspace.as_deref(),
                ],
            );
        }
        command
    }

    /// Predict the category for a file, sequence, or directory tree.
    pub fn predict(&self, path: &str, options: &PredictOptions) -> ApiResult<Value> {
        let command = self.predict_command(path, options);
        self.toolchain.invoke(Variant::Full, command)
    }

    fn predict_command(&self, path: &str, options: &PredictOptions) -> CommandLine {
        self.base()
            .push("predict")
            .push("--top")
            .push(options.top.to_string())
            .push("--filmstrip_frames")
            .push(options.filmstrip_frames.to_string())
            .option(
                "model",
                options.model.as_deref().map(Path::display),
            )
            .push(path)
    }

    /// Pick the most meaningful frame of a movie or sequence for use as a
    /// thumbnail.
    pub fn get_thumbnail_frame(&self, path: &str) -> ApiResult<Value> {
        let command = self.base().push("get-thumbnail-frame").push(path);
        self.toolchain.invoke(Variant::Full, command)
    }

    /// Re-render proxies for elements, optionally against a specific
    /// transcoding template.
    pub fn render_proxies(
        &self,
        library: &str,
        uuids: &[&str],
        template: Option<&str>,
    ) -> ApiResult<Value> {
        let command = self
            .base()
            .push("render-proxies")
            .option("library", Some(library))
            .option("uuids", Some(uuids.join(",")))
            .option("template", template);
        self.toolchain.invoke(Variant::Full, command)
    }

    /// Create a new config file (.conf), optionally from a preset.
    pub fn create_config(&self, config: &str, preset_key: Option<&str>) -> ApiResult<Value> {
        let command = self
            .base()
            .push("create-config")
            .push_quoted(config)
            .option("preset", preset_key);
        self.toolchain.invoke(Variant::Full, command)
    }

    /// Create a new library and its backing database.
    pub fn create_library(&self, request: &CreateLibraryRequest) -> ApiResult<Value> {
        let command = self.create_library_command(request);
        self.toolchain.invoke(Variant::Full, command)
    }

    fn create_library_command(&self, request: &CreateLibraryRequest) -> CommandLine {
        let database = &request.database;
        let mut command = self
            .base()
            .push("create-library")
            .option("path", Some(&request.library))
            .option("name", Some(&request.name))
            .option("root", Some(&request.root))
            .option("preset", request.preset_key.as_deref())
            .option("db_type", Some(database.db_type.token()))
            .option("db_path", database.path.as_deref())
            .option("db_host", database.host.as_deref())
            .option("db_port", database.port)
            .option("db_user", database.user.as_deref())
            .option("db_password", database.password.as_deref());
        if let Some(ssl) = &database.ssl {
            command = command
                .option("db_ssl_ca", ssl.ca.as_deref())
                .option("db_ssl_cert", ssl.certificate.as_deref())
                .option("db_ssl_key", ssl.key.as_deref());
        }
        command.flag("create_defaults", request.create_defaults)
    }
}
