//! Pipeline files
//!
//! A pipeline file is TOML:
//!
//! ```toml
//! name = "rename-project"
//! direction = "forward"
//!
//! [[pipeline]]
//! type = "replace"
//! before = "internal.pkg"
//! after = "public.pkg"
//!
//! [[pipeline]]
//! type = "move"
//! from = "BUILD"
//! to = "BUILD.bazel"
//! ```
//!
//! Tables with a `type` key become transformations. Any other element is
//! handed to the validator as a plain value, which rejects it with the
//! element's position.

use crate::error::ConfigError;
use crate::executor::Direction;
use crate::pipeline::Pipeline;
use crate::validator::{compose, transform};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use revmig_transform::{
    ArgumentError, DynTransformation, IntentionalNoop, MapLabel, MapMapper, Move, Replace,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const STEP_TYPES: &[&str] = &["replace", "move", "map_label", "noop", "transform"];

/// Parsed pipeline file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineFile {
    /// Pipeline name, used in logs
    #[serde(default = "default_name")]
    pub name: String,
    /// Default run direction
    #[serde(default)]
    pub direction: Direction,
    /// Abort when a step reports console errors
    #[serde(default = "default_true")]
    pub fail_on_console_errors: bool,
    /// Raw pipeline elements
    #[serde(default)]
    pub pipeline: Vec<toml::Value>,
}

fn default_name() -> String {
    "pipeline".to_string()
}

fn default_true() -> bool {
    true
}

impl PipelineFile {
    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns `Parse` if the text isn't a valid pipeline file
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse `path`
    ///
    /// # Errors
    /// Returns `Io` if the file can't be read, `Parse` if it is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded pipeline file");
        Self::from_toml(&text)
    }

    /// Convert every element to a configuration value
    ///
    /// # Errors
    /// Returns the first malformed transformation table
    pub fn values(&self) -> Result<Vec<ConfigValue>, ConfigError> {
        parse_list(&self.pipeline)
    }

    /// Build the pipeline
    ///
    /// Reversibility isn't checked here; see [`Pipeline::check_reversible`].
    ///
    /// # Errors
    /// Any error of [`Self::values`] or of [`compose`]
    pub fn to_pipeline(&self) -> Result<Pipeline, ConfigError> {
        let sequence = compose(self.values()?)?;
        Ok(Pipeline::new(self.name.clone(), sequence))
    }
}

/// Transformation table, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum StepSpec {
    Replace {
        before: String,
        after: String,
    },
    Move {
        from: PathBuf,
        to: PathBuf,
    },
    MapLabel {
        label: String,
        mapping: IndexMap<String, String>,
    },
    Noop,
    Transform {
        steps: Vec<toml::Value>,
        #[serde(default)]
        reversal: Option<Vec<toml::Value>>,
    },
}

impl StepSpec {
    fn build(self, index: usize) -> Result<DynTransformation, ConfigError> {
        let invalid = |err: ArgumentError| ConfigError::InvalidStep {
            index,
            message: err.to_string(),
        };

        Ok(match self {
            Self::Replace { before, after } => Arc::new(Replace::new(before, after).map_err(invalid)?),
            Self::Move { from, to } => Arc::new(Move::new(from, to).map_err(invalid)?),
            Self::MapLabel { label, mapping } => {
                Arc::new(MapLabel::new(label, Arc::new(MapMapper::new(mapping))))
            }
            Self::Noop => Arc::new(IntentionalNoop),
            Self::Transform { steps, reversal } => {
                let steps = parse_list(&steps).map_err(|e| e.nested(index))?;
                let reversal = reversal
                    .as_deref()
                    .map(parse_list)
                    .transpose()
                    .map_err(|e| e.nested(index))?;
                Arc::new(transform(steps, reversal).map_err(|e| e.nested(index))?)
            }
        })
    }
}

fn parse_list(values: &[toml::Value]) -> Result<Vec<ConfigValue>, ConfigError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_value(index, value))
        .collect()
}

/// Convert one raw element at `index`
///
/// # Errors
/// - `InvalidStep` for a table without a usable `type` or with bad fields
/// - `UnknownStep` for an unrecognised `type`
/// - Nested errors from `transform` tables
pub fn parse_value(index: usize, value: &toml::Value) -> Result<ConfigValue, ConfigError> {
    Ok(match value {
        toml::Value::Table(table) => ConfigValue::Transformation(parse_step(index, table)?),
        toml::Value::String(s) => ConfigValue::Str(s.clone()),
        toml::Value::Integer(i) => ConfigValue::Int(*i),
        toml::Value::Float(f) => ConfigValue::Float(*f),
        toml::Value::Boolean(b) => ConfigValue::Bool(*b),
        toml::Value::Datetime(d) => ConfigValue::Str(d.to_string()),
        toml::Value::Array(items) => {
            ConfigValue::List(parse_list(items).map_err(|e| e.nested(index))?)
        }
    })
}

fn parse_step(index: usize, table: &toml::Table) -> Result<DynTransformation, ConfigError> {
    let kind = match table.get("type") {
        Some(toml::Value::String(kind)) => kind,
        Some(other) => {
            return Err(ConfigError::InvalidStep {
                index,
                message: format!("'type' must be a string, found {}", other.type_str()),
            })
        }
        None => {
            return Err(ConfigError::InvalidStep {
                index,
                message: "missing 'type' key".to_string(),
            })
        }
    };

    if !STEP_TYPES.contains(&kind.as_str()) {
        return Err(ConfigError::UnknownStep {
            index,
            name: kind.clone(),
        });
    }

    let spec: StepSpec = toml::Value::Table(table.clone())
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::InvalidStep {
            index,
            message: e.message().to_string(),
        })?;
    spec.build(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
name = "sample"
direction = "reverse"

[[pipeline]]
type = "replace"
before = "foo"
after = "bar"

[[pipeline]]
type = "move"
from = "a.txt"
to = "b.txt"

[[pipeline]]
type = "noop"
"#;

    #[test]
    fn parses_sample() {
        let file = PipelineFile::from_toml(SAMPLE).unwrap();
        assert_eq!(file.name, "sample");
        assert_eq!(file.direction, Direction::Reverse);
        assert!(file.fail_on_console_errors);

        let pipeline = file.to_pipeline().unwrap();
        let described: Vec<String> = pipeline.forward().steps().iter().map(|s| s.describe()).collect();
        assert_eq!(
            described,
            vec!["replace 'foo' with 'bar'", "move 'a.txt' to 'b.txt'", "noop"]
        );
        assert!(pipeline.check_reversible().is_ok());
    }

    #[test]
    fn defaults() {
        let file = PipelineFile::from_toml("").unwrap();
        assert_eq!(file.name, "pipeline");
        assert_eq!(file.direction, Direction::Forward);
        assert!(file.pipeline.is_empty());
        assert!(file.to_pipeline().unwrap().forward().is_empty());
    }

    #[test]
    fn scalar_rejected_with_position() {
        let file = PipelineFile::from_toml(
            r#"
pipeline = [{ type = "noop" }, 42]
"#,
        )
        .unwrap();
        let err = file.to_pipeline().unwrap_err();
        assert_eq!(
            err.to_string(),
            "element 1: Expected type 'transformation' or function, but found: 42 (int)"
        );
    }

    fn table(text: &str) -> toml::Value {
        toml::Value::Table(text.parse::<toml::Table>().unwrap())
    }

    #[test]
    fn unknown_and_missing_type() {
        assert!(matches!(
            parse_value(0, &table(r#"type = "explode""#)),
            Err(ConfigError::UnknownStep { ref name, .. }) if name == "explode"
        ));
        assert!(matches!(
            parse_value(2, &table(r#"before = "x""#)),
            Err(ConfigError::InvalidStep { index: 2, .. })
        ));
        assert!(matches!(
            parse_value(0, &table("type = 3")),
            Err(ConfigError::InvalidStep { .. })
        ));
    }

    #[test]
    fn bad_arguments_are_invalid_step() {
        let same = table("type = \"replace\"\nbefore = \"x\"\nafter = \"x\"");
        assert!(matches!(
            parse_value(0, &same),
            Err(ConfigError::InvalidStep { index: 0, .. })
        ));

        let missing_field = table("type = \"move\"\nfrom = \"a\"");
        assert!(matches!(
            parse_value(0, &missing_field),
            Err(ConfigError::InvalidStep { .. })
        ));
    }

    #[test]
    fn scalars_map_to_values() {
        assert!(matches!(parse_value(0, &toml::Value::Boolean(true)), Ok(ConfigValue::Bool(true))));
        let list = parse_value(0, &toml::Value::Array(vec![toml::Value::Integer(1)])).unwrap();
        assert_eq!(list.to_string(), "[1]");
    }

    #[test]
    fn nested_transform_with_reversal() {
        let file = PipelineFile::from_toml(
            r#"
[[pipeline]]
type = "transform"
steps = [{ type = "replace", before = "a", after = "" }]
reversal = [{ type = "noop" }]
"#,
        )
        .unwrap();
        let pipeline = file.to_pipeline().unwrap();
        let inverse = pipeline.inverse().unwrap();
        assert_eq!(inverse.len(), 1);
        assert_eq!(inverse.steps()[0].describe(), "sequence");
    }

    #[test]
    fn nested_transform_without_reversal_checks_eagerly() {
        let file = PipelineFile::from_toml(
            r#"
[[pipeline]]
type = "noop"

[[pipeline]]
type = "transform"
steps = [{ type = "noop" }, { type = "replace", before = "a", after = "" }]
"#,
        )
        .unwrap();
        let err = file.to_pipeline().unwrap_err();
        assert_eq!(
            err.to_string(),
            "element 1: replace 'a' with '' is not reversible"
        );
        assert!(matches!(err.root_cause(), ConfigError::NonReversible(_)));
    }

    #[test]
    fn map_label_collision_not_reversible() {
        let file = PipelineFile::from_toml(
            r#"
[[pipeline]]
type = "map_label"
label = "Team"
mapping = { a = "x", b = "x" }
"#,
        )
        .unwrap();
        let pipeline = file.to_pipeline().unwrap();
        let err = pipeline.check_reversible().unwrap_err();
        assert_eq!(err.detail(), Some("'x' is mapped from both 'a' and 'b'"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineFile::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let path = dir.path().join("p.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(PipelineFile::load(&path).unwrap().name, "sample");
    }

    #[test]
    fn parse_error_surfaces() {
        let err = PipelineFile::from_toml("direction = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
