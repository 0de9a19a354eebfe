//! Configuration parsing and validation
//!
//! This module handles loading and validating the `pybake.yaml` project file.
//! Every path in the file is relative to the directory holding it; defaults
//! are derived from the project name so a minimal file only needs `name`.
//!
//! ```yaml
//! name: libertem
//! client:
//!   install: [npm, install]
//!   build: [npm, run-script, build]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "pybake.yaml";

/// Root project configuration from `pybake.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Distribution name
    pub name: String,

    /// Directory holding the package sources
    #[serde(default = "default_package_dir")]
    pub package_dir: String,

    /// Dotted package names to copy into the build (defaults to the project package)
    #[serde(default)]
    pub packages: Vec<String>,

    /// File carrying the `__version__` line
    #[serde(default)]
    pub version_file: Option<String>,

    /// Intermediate build output directory
    #[serde(default = "default_build_lib")]
    pub build_lib: String,

    /// Web client toolchain settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Revision stamping settings
    #[serde(default)]
    pub revision: RevisionConfig,

    /// Declarative package metadata, passed through untouched
    #[serde(default)]
    pub metadata: serde_yaml::Mapping,
}

fn default_package_dir() -> String {
    "src".to_string()
}

fn default_build_lib() -> String {
    "build/lib".to_string()
}

/// Web client toolchain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client project directory
    #[serde(default = "default_client_dir")]
    pub dir: String,

    /// Toolchain output directory, relative to `dir`
    #[serde(default = "default_build_output")]
    pub build_output: String,

    /// Where compiled assets land inside the package tree
    #[serde(default)]
    pub staging_dir: Option<String>,

    /// Dependency install command
    #[serde(default = "default_install")]
    pub install: Vec<String>,

    /// Build script command
    #[serde(default = "default_build")]
    pub build: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dir: default_client_dir(),
            build_output: default_build_output(),
            staging_dir: None,
            install: default_install(),
            build: default_build(),
        }
    }
}

fn default_client_dir() -> String {
    "client".to_string()
}

fn default_build_output() -> String {
    "build".to_string()
}

fn default_install() -> Vec<String> {
    vec!["npm".to_string(), "install".to_string()]
}

fn default_build() -> Vec<String> {
    vec![
        "npm".to_string(),
        "run-script".to_string(),
        "build".to_string(),
    ]
}

/// Revision stamping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionConfig {
    /// git executable, by name or path
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Generated module path, relative to the build output directory
    #[serde(default)]
    pub module: Option<String>,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            module: None,
        }
    }
}

fn default_tool() -> String {
    "git".to_string()
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: PathBuf,
}

impl Config {
    /// Load configuration from a directory or a `pybake.yaml` file
    ///
    /// The base path is canonicalized so later process invocations never
    /// depend on the caller's working directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE), path.to_path_buf())
        } else {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            (path.to_path_buf(), parent)
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        tracing::debug!("Reading configuration from {}", config_path.display());
        let contents = std::fs::read_to_string(&config_path)?;
        Self::from_yaml(&contents, base_path.canonicalize()?)
    }

    /// Parse configuration text rooted at `base_path`
    pub fn from_yaml(contents: &str, base_path: impl Into<PathBuf>) -> Result<Self> {
        let project: ProjectConfig = serde_yaml::from_str(contents)?;
        let config = Self {
            project,
            base_path: base_path.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot act on
    pub fn validate(&self) -> Result<()> {
        let project = &self.project;
        if project.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if project.client.install.is_empty() {
            return Err(invalid("client.install must name a program"));
        }
        if project.client.build.is_empty() {
            return Err(invalid("client.build must name a program"));
        }
        if project.revision.tool.trim().is_empty() {
            return Err(invalid("revision.tool must not be empty"));
        }

        let mut paths = vec![
            ("package_dir", project.package_dir.as_str()),
            ("build_lib", project.build_lib.as_str()),
            ("client.dir", project.client.dir.as_str()),
            ("client.build_output", project.client.build_output.as_str()),
        ];
        if let Some(p) = &project.version_file {
            paths.push(("version_file", p.as_str()));
        }
        if let Some(p) = &project.client.staging_dir {
            paths.push(("client.staging_dir", p.as_str()));
        }
        if let Some(p) = &project.revision.module {
            paths.push(("revision.module", p.as_str()));
        }
        for (field, value) in paths {
            check_relative(field, value)?;
        }

        for package in &project.packages {
            if package.is_empty() || package.split('.').any(str::is_empty) {
                return Err(invalid(format!("invalid package name '{package}'")));
            }
        }

        self.check_staging_dir()
    }

    /// Import name of the root package (`my-lib` becomes `my_lib`)
    pub fn package_name(&self) -> String {
        self.project.name.replace('-', "_")
    }

    /// Dotted package names to copy, defaulting to the root package
    pub fn packages(&self) -> Vec<String> {
        if self.project.packages.is_empty() {
            vec![self.package_name()]
        } else {
            self.project.packages.clone()
        }
    }

    /// Absolute directory holding the package sources
    pub fn package_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.package_dir)
    }

    /// Absolute path of the version-bearing source file
    pub fn version_file(&self) -> PathBuf {
        self.base_path.join(self.relative_version_file())
    }

    fn relative_version_file(&self) -> PathBuf {
        match &self.project.version_file {
            Some(p) => PathBuf::from(p),
            None => Path::new(&self.project.package_dir)
                .join(self.package_name())
                .join("__init__.py"),
        }
    }

    /// Absolute intermediate build output directory
    pub fn build_lib(&self) -> PathBuf {
        self.base_path.join(&self.project.build_lib)
    }

    /// Absolute client project directory
    pub fn client_dir(&self) -> PathBuf {
        self.base_path.join(&self.project.client.dir)
    }

    /// Absolute directory the client toolchain writes its bundle to
    pub fn client_build_output(&self) -> PathBuf {
        self.client_dir().join(&self.project.client.build_output)
    }

    /// Absolute staging directory inside the package tree
    pub fn staging_dir(&self) -> PathBuf {
        self.base_path.join(self.relative_staging_dir())
    }

    fn relative_staging_dir(&self) -> PathBuf {
        match &self.project.client.staging_dir {
            Some(p) => PathBuf::from(p),
            None => Path::new(&self.project.package_dir)
                .join(self.package_name())
                .join("web")
                .join("client"),
        }
    }

    /// The staging directory is wiped on every stage, so it must sit
    /// strictly inside `package_dir` and contain nothing else the build reads.
    fn check_staging_dir(&self) -> Result<()> {
        let project = &self.project;
        let staging = normalize(&self.relative_staging_dir());
        let package_dir = normalize(Path::new(&project.package_dir));
        let shown = self.relative_staging_dir().display().to_string();

        if staging.len() <= package_dir.len() || !is_within(&staging, &package_dir) {
            return Err(invalid(format!(
                "client.staging_dir '{shown}' must sit inside package_dir '{}'",
                project.package_dir
            )));
        }

        let client_dir = PathBuf::from(&project.client.dir);
        let mut owned = vec![
            ("client.dir".to_string(), client_dir.clone()),
            (
                "client.build_output".to_string(),
                client_dir.join(&project.client.build_output),
            ),
            ("build_lib".to_string(), PathBuf::from(&project.build_lib)),
            ("version_file".to_string(), self.relative_version_file()),
            (CONFIG_FILE.to_string(), PathBuf::from(CONFIG_FILE)),
        ];
        for package in self.packages() {
            owned.push((
                format!("package '{package}'"),
                Path::new(&project.package_dir).join(package.replace('.', "/")),
            ));
        }

        for (what, path) in owned {
            if is_within(&normalize(&path), &staging) {
                return Err(invalid(format!(
                    "client.staging_dir '{shown}' would wipe {what}"
                )));
            }
        }
        Ok(())
    }

    /// Generated revision module, relative to the build output directory
    pub fn revision_module(&self) -> PathBuf {
        match &self.project.revision.module {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(self.package_name()).join("_baked_revision.py"),
        }
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigInvalid {
        message: message.into(),
    }
}

fn check_relative(field: &str, value: &str) -> Result<()> {
    let path = Path::new(value);
    if value.is_empty() || path.is_absolute() {
        return Err(invalid(format!(
            "{field} must be a relative path, got '{value}'"
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(invalid(format!(
            "{field} must stay inside the project, got '{value}'"
        )));
    }
    Ok(())
}

/// Path components with `.` dropped
fn normalize(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Whether `inner` equals `outer` or lies below it
fn is_within(inner: &[String], outer: &[String]) -> bool {
    inner.len() >= outer.len() && inner[..outer.len()] == *outer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_yaml("name: libertem\n", "/work").unwrap();
        assert_eq!(config.project.package_dir, "src");
        assert_eq!(config.packages(), vec!["libertem".to_string()]);
        assert_eq!(
            config.version_file(),
            PathBuf::from("/work/src/libertem/__init__.py")
        );
        assert_eq!(
            config.staging_dir(),
            PathBuf::from("/work/src/libertem/web/client")
        );
        assert_eq!(
            config.revision_module(),
            PathBuf::from("libertem/_baked_revision.py")
        );
        assert_eq!(config.client_build_output(), PathBuf::from("/work/client/build"));
        assert_eq!(config.project.client.install, vec!["npm", "install"]);
        assert_eq!(config.project.revision.tool, "git");
    }

    #[test]
    fn test_package_name_from_dashed_name() {
        let config = Config::from_yaml("name: my-lib\n", "/work").unwrap();
        assert_eq!(config.package_name(), "my_lib");
        assert_eq!(
            config.revision_module(),
            PathBuf::from("my_lib/_baked_revision.py")
        );
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
name: libertem
package_dir: lib
packages: [libertem, libertem.web]
version_file: lib/libertem/version.py
build_lib: out/lib
client:
  dir: frontend
  build_output: dist
  staging_dir: lib/libertem/web/static
  install: [yarn, install]
  build: [yarn, build]
revision:
  tool: /opt/git/bin/git
  module: libertem/_rev.py
metadata:
  license: GPL v3
"#;
        let config = Config::from_yaml(yaml, "/work").unwrap();
        assert_eq!(config.packages().len(), 2);
        assert_eq!(
            config.version_file(),
            PathBuf::from("/work/lib/libertem/version.py")
        );
        assert_eq!(config.build_lib(), PathBuf::from("/work/out/lib"));
        assert_eq!(
            config.client_build_output(),
            PathBuf::from("/work/frontend/dist")
        );
        assert_eq!(
            config.staging_dir(),
            PathBuf::from("/work/lib/libertem/web/static")
        );
        assert_eq!(config.project.revision.tool, "/opt/git/bin/git");
        assert_eq!(config.revision_module(), PathBuf::from("libertem/_rev.py"));
        assert_eq!(config.project.metadata.len(), 1);
    }

    #[test]
    fn test_reject_empty_install_command() {
        let yaml = "name: x\nclient:\n  install: []\n";
        let err = Config::from_yaml(yaml, "/work").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_reject_escaping_staging_dir() {
        let yaml = "name: x\nclient:\n  staging_dir: ../elsewhere\n";
        let err = Config::from_yaml(yaml, "/work").unwrap_err();
        assert!(err.to_string().contains("client.staging_dir"));
    }

    #[rstest::rstest]
    #[case::project_root(".")]
    #[case::package_dir("src")]
    #[case::package_dir_dotted("./src/")]
    #[case::package_root("src/x")]
    #[case::outside_package_dir("client")]
    #[case::client_build_output("client/build")]
    #[case::build_lib("build")]
    fn test_reject_staging_dir_covering_project(#[case] staging: &str) {
        let yaml = format!("name: x\nclient:\n  staging_dir: \"{staging}\"\n");
        let err = Config::from_yaml(&yaml, "/work").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
        assert!(err.to_string().contains("client.staging_dir"));
    }

    #[test]
    fn test_reject_staging_dir_holding_version_file() {
        let yaml = "name: x\npackages: [x.web]\nversion_file: src/assets/version.py\n\
                    client:\n  staging_dir: src/assets\n";
        let err = Config::from_yaml(yaml, "/work").unwrap_err();
        assert!(err.to_string().contains("version_file"));
    }

    #[test]
    fn test_reject_staging_dir_over_client_when_package_dir_is_root() {
        let yaml = "name: x\npackage_dir: .\nclient:\n  dir: web\n  staging_dir: web\n";
        let err = Config::from_yaml(yaml, "/work").unwrap_err();
        assert!(err.to_string().contains("client.dir"));
    }

    #[test]
    fn test_accept_staging_dir_inside_package() {
        let yaml = "name: x\nclient:\n  staging_dir: ./src/x/web/static\n";
        let config = Config::from_yaml(yaml, "/work").unwrap();
        assert_eq!(
            config.staging_dir(),
            PathBuf::from("/work/./src/x/web/static")
        );
    }

    #[test]
    fn test_reject_absolute_build_lib() {
        let yaml = "name: x\nbuild_lib: /tmp/lib\n";
        assert!(Config::from_yaml(yaml, "/work").is_err());
    }

    #[test]
    fn test_reject_bad_package_name() {
        let yaml = "name: x\npackages: [\"x..y\"]\n";
        assert!(Config::from_yaml(yaml, "/work").is_err());
    }

    #[test]
    fn test_load_from_dir_and_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "name: demo\n").unwrap();

        let from_dir = Config::load(dir.path()).unwrap();
        let from_file = Config::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(from_dir.base_path, from_file.base_path);
        assert!(from_dir.base_path.is_absolute());
        assert_eq!(from_dir.project.name, "demo");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }
}
