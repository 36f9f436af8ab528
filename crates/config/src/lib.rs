//! Layered settings for the content metadata generator.
//!
//! Built-in defaults are merged with any number of TOML, YAML or JSON
//! sources, later sources winning key by key. Environment variables are never
//! read.
//!
//! ```toml
//! style = "simple_book"
//! bundle = "dpg"
//! add_exif = true
//! special_dpg_folders = ["31", "44", "50", "60"]
//!
//! [file_attributes."image/jp2"]
//! preserve = "no"
//! publish = "yes"
//! shelve = "yes"
//! ```

pub mod error;
mod format;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cmeta_content::{BundleMode, Generator, ObjectFile, Options, Style, Tables};
use cmeta_objectfile::{FileAttributes, MimeRules};
use directories::ProjectDirs;
use figment::Figment;
use figment::error::Kind;
use figment::providers::{Format as _, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
pub use crate::format::Format;

/// Name of the settings file inside the user configuration directory.
pub const CONFIG_FILENAME: &str = "settings.toml";

/// Everything configurable about document generation.
///
/// Table and mime list fields left unset keep the built-in values;
/// `file_attributes` entries are layered over the built-in table one
/// mimetype at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub style: Style,
    pub bundle: BundleMode,
    pub add_exif: bool,
    pub add_file_attributes: bool,
    pub preserve_common_paths: bool,
    pub flatten_folder_structure: bool,
    pub auto_labels: bool,
    pub include_root_xml: bool,
    /// Mimetype (or `"default"`) → preserve/publish/shelve.
    pub file_attributes: BTreeMap<String, FileAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_dpg_folders: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_mimetypes: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_image_mimetypes: Option<BTreeSet<String>>,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            style: Style::default(),
            bundle: BundleMode::default(),
            add_exif: false,
            add_file_attributes: false,
            preserve_common_paths: false,
            flatten_folder_structure: false,
            auto_labels: true,
            include_root_xml: true,
            file_attributes: BTreeMap::new(),
            special_dpg_folders: None,
            trusted_mimetypes: None,
            valid_image_mimetypes: None,
        }
    }
}

impl Settings {
    /// Merges the given files, in order, over the built-in defaults.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::UnsupportedFormat`] for an unknown file extension.
    /// - [`ErrorKind::Load`] when a file is missing or can't be parsed.
    /// - [`ErrorKind::InvalidConfiguration`] for unknown keys or values.
    #[instrument(level = "debug", skip_all)]
    pub fn load<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut figment = defaults();
        for path in paths {
            let path = path.as_ref();
            let format = Format::from_path(path)?;
            if !path.is_file() {
                exn::bail!(ErrorKind::Load(format!("{} does not exist", path.display())));
            }
            tracing::debug!(path = %path.display(), %format, "Merging configuration file");
            figment = match format {
                Format::Toml => figment.merge(Toml::file_exact(path)),
                Format::Yaml => figment.merge(Yaml::file_exact(path)),
                Format::Json => figment.merge(Json::file_exact(path)),
            };
        }
        extract(&figment)
    }

    /// Merges an in-memory document over the built-in defaults.
    pub fn parse(format: Format, content: &str) -> Result<Self> {
        let figment = match format {
            Format::Toml => defaults().merge(Toml::string(content)),
            Format::Yaml => defaults().merge(Yaml::string(content)),
            Format::Json => defaults().merge(Json::string(content)),
        };
        extract(&figment)
    }

    /// Loads the user's settings file when there is one, otherwise the
    /// built-in defaults.
    pub fn load_user() -> Result<Self> {
        match user_config_path() {
            Some(path) if path.is_file() => {
                tracing::info!(path = %path.display(), "Loading user configuration");
                Self::load([path])
            },
            _ => Ok(Self::default()),
        }
    }

    /// The built-in tables with these settings layered over them.
    pub fn tables(&self) -> Tables {
        let mut tables = Tables::default();
        tables.file_attributes.extend(self.file_attributes.iter().map(|(mime, attrs)| (mime.clone(), *attrs)));
        if let Some(folders) = &self.special_dpg_folders {
            tables.special_dpg_folders = folders.clone();
        }
        tables
    }

    pub fn mime_rules(&self) -> MimeRules {
        let mut rules = MimeRules::default();
        if let Some(trusted) = &self.trusted_mimetypes {
            rules.trusted = trusted.clone();
        }
        if let Some(valid_image) = &self.valid_image_mimetypes {
            rules.valid_image = valid_image.clone();
        }
        rules
    }

    /// Options for one object, taking every flag from these settings.
    pub fn options(&self, druid: impl Into<String>) -> Options {
        Options::new(druid)
            .with_style(self.style)
            .with_bundle(self.bundle)
            .with_exif(self.add_exif)
            .with_file_attributes(self.add_file_attributes)
            .with_preserve_common_paths(self.preserve_common_paths)
            .with_flatten_folder_structure(self.flatten_folder_structure)
            .with_auto_labels(self.auto_labels)
            .with_root_xml(self.include_root_xml)
    }

    pub fn generator(&self) -> Generator {
        Generator::new(self.tables())
    }

    /// Builds file descriptors that share these settings' mime rules.
    pub fn object_files<I, P>(&self, paths: I) -> Vec<ObjectFile>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let rules = Arc::new(self.mime_rules());
        paths.into_iter().map(|path| ObjectFile::new(path).with_mime_rules(Arc::clone(&rules))).collect()
    }
}

/// Location of the user's settings file, when the platform has a
/// configuration directory.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cmeta").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
}

fn extract(figment: &Figment) -> Result<Settings> {
    let settings = figment.extract::<Settings>().map_err(|err| match (&err.kind, err.path.is_empty()) {
        // Source parse failures carry no key path; everything else is about a value.
        (Kind::Message(_), true) => ErrorKind::Load(err.to_string()),
        _ => ErrorKind::InvalidConfiguration(err.to_string()),
    })?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmeta_content::ContentFile;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_options() {
        let settings = Settings::parse(Format::Toml, "").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.options("druid:ab123cd4567"), Options::new("druid:ab123cd4567"));
        assert_eq!(settings.tables(), Tables::default());
        assert_eq!(settings.mime_rules(), MimeRules::default());
    }

    #[test]
    fn test_toml_settings() {
        let settings = Settings::parse(
            Format::Toml,
            r#"
            style = "book_as_image"
            bundle = "filename"
            add_exif = true
            auto_labels = false
            special_dpg_folders = ["60"]

            [file_attributes."image/jp2"]
            preserve = "yes"
            publish = "no"
            shelve = true

            [file_attributes.default]
            preserve = "no"
            publish = "no"
            shelve = "no"
            "#,
        )
        .unwrap();
        assert_eq!(settings.style, Style::BookAsImage);
        assert_eq!(settings.bundle, BundleMode::Filename);

        let options = settings.options("druid:x");
        assert!(options.add_exif);
        assert!(!options.auto_labels);
        assert!(options.include_root_xml);

        let tables = settings.tables();
        assert_eq!(tables.file_attributes.get("image/jp2"), Some(&FileAttributes::new(true, false, true)));
        assert_eq!(tables.file_attributes.fallback(), &FileAttributes::new(false, false, false));
        assert_eq!(tables.file_attributes.get("application/pdf"), Some(&FileAttributes::new(true, true, true)));
        assert!(tables.is_special_dpg_folder(Some("60")));
        assert!(!tables.is_special_dpg_folder(Some("31")));
    }

    #[rstest]
    #[case(Format::Yaml, "style: 3d\nvalid_image_mimetypes: [image/png]\n")]
    #[case(Format::Json, r#"{"style": "3d", "valid_image_mimetypes": ["image/png"]}"#)]
    fn test_other_formats(#[case] format: Format, #[case] content: &str) {
        let settings = Settings::parse(format, content).unwrap();
        assert_eq!(settings.style, Style::ThreeD);
        let rules = settings.mime_rules();
        assert!(rules.is_valid_image("image/png"));
        assert!(!rules.is_valid_image("image/jp2"));
        assert!(rules.is_trusted("application/pdf"));
    }

    #[rstest]
    #[case(r#"style = "scroll""#)]
    #[case(r#"bundle = "by_colour""#)]
    #[case("add_exif = 3")]
    #[case("colour = true")]
    #[case(r#"file_attributes.default = { preserve = "maybe", publish = "no", shelve = "no" }"#)]
    fn test_invalid_values(#[case] content: &str) {
        let err = Settings::parse(Format::Toml, content).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidConfiguration(_)), "{content}: {:?}", &*err);
    }

    #[test]
    fn test_unparseable_source() {
        let err = Settings::parse(Format::Toml, "style = ").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
    }

    #[test]
    fn test_files_are_layered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.toml");
        std::fs::write(&base, "style = \"map\"\nadd_exif = true\n").unwrap();
        let local = dir.path().join("local.yaml");
        std::fs::write(&local, "style: file\nfile_attributes:\n  text/plain:\n    preserve: no\n    publish: no\n    shelve: no\n").unwrap();

        let settings = Settings::load([&base, &local]).unwrap();
        assert_eq!(settings.style, Style::File);
        assert!(settings.add_exif);
        assert_eq!(settings.file_attributes["text/plain"], FileAttributes::new(false, false, false));
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load([dir.path().join("absent.toml")]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
        let ini = dir.path().join("settings.ini");
        std::fs::write(&ini, "style=file").unwrap();
        let err = Settings::load([ini]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[test]
    fn test_object_files_share_mime_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"not an image").unwrap();
        let settings = Settings::parse(Format::Json, r#"{"valid_image_mimetypes": []}"#).unwrap();
        let files = settings.object_files([path]);
        assert_eq!(files[0].mimetype().unwrap(), "image/png");
        assert!(!files[0].is_valid_image().unwrap());
    }

    #[test]
    fn test_generator_uses_settings_tables() {
        let settings = Settings::parse(Format::Toml, r#"special_dpg_folders = []"#).unwrap();
        assert!(settings.generator().tables().special_dpg_folders.is_empty());
    }

    #[test]
    fn test_user_config_path() {
        if let Some(path) = user_config_path() {
            assert!(path.ends_with(CONFIG_FILENAME));
        }
    }
}
