// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Executor configuration
//!
//! Configuration is a KDL document with a single `executor` node:
//!
//! ```kdl
//! executor name="azureud" lsscsi="/usr/bin/lsscsi" instance-id="vm-0001"
//! ```
//!
//! Every property is optional.

use std::{fs, path::Path, sync::Arc};

use kdl::{KdlDocument, KdlEntry, KdlNode};
use miette::NamedSource;

use crate::{Error, InvalidArguments, InvalidType, UnsupportedNode, UnsupportedProperty, NAME};

/// Runtime configuration of the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Driver name reported in results
    pub name: String,

    /// The SCSI listing utility to invoke
    pub lsscsi: String,

    /// Identity of this instance, if known up front
    pub instance_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: NAME.to_owned(),
            lsscsi: devices::lsscsi::COMMAND.to_owned(),
            instance_id: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn from_path<P>(file: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        let file = file.as_ref();
        let name = file.to_string_lossy();
        let txt = fs::read_to_string(file)?;
        Self::from_kdl(name.to_string(), txt)
    }

    /// Load configuration from a string
    pub fn from_kdl(name: String, contents: String) -> Result<Self, Error> {
        let source = Arc::new(contents);
        let ns = NamedSource::new(name, source).with_language("KDL");
        let d = KdlDocument::parse_v2(ns.inner())?;

        let mut config = Self::default();

        for node in d.nodes() {
            match node.name().value() {
                "executor" => config.apply_node(&ns, node)?,
                what => {
                    return Err(UnsupportedNode {
                        src: ns.clone(),
                        at: node.span(),
                        name: what.to_owned(),
                        advice: Some("only 'executor' nodes are supported".to_owned()),
                    }
                    .into());
                }
            }
        }

        Ok(config)
    }

    // Merge the properties of an executor node into this configuration
    fn apply_node(&mut self, ns: &NamedSource<Arc<String>>, node: &KdlNode) -> Result<(), Error> {
        if let Some(child) = node.iter_children().next() {
            return Err(UnsupportedNode {
                src: ns.clone(),
                at: child.span(),
                name: child.name().value().to_owned(),
                advice: Some("executor settings are properties, e.g. executor lsscsi=\"/usr/bin/lsscsi\"".to_owned()),
            }
            .into());
        }

        for entry in node.entries() {
            let Some(id) = entry.name() else {
                return Err(InvalidArguments {
                    src: ns.clone(),
                    at: entry.span(),
                    advice: Some("executor takes no positional arguments".to_owned()),
                }
                .into());
            };

            match id.value() {
                "name" => self.name = string_value(ns, "name", entry)?,
                "lsscsi" => self.lsscsi = string_value(ns, "lsscsi", entry)?,
                "instance-id" => self.instance_id = Some(string_value(ns, "instance-id", entry)?),
                what => {
                    return Err(UnsupportedProperty {
                        src: ns.clone(),
                        at: entry.span(),
                        name: what.to_owned(),
                        advice: Some("supported properties are 'name', 'lsscsi' and 'instance-id'".to_owned()),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

// Get the string value of a property entry
fn string_value(ns: &NamedSource<Arc<String>>, id: &str, entry: &KdlEntry) -> Result<String, Error> {
    let value = entry.value().as_string().ok_or_else(|| InvalidType {
        src: ns.clone(),
        at: entry.span(),
        id: id.to_owned(),
        advice: Some("try using a quoted string".to_owned()),
    })?;

    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn parse(contents: &str) -> Result<Config, Error> {
        Config::from_kdl("test.kdl".to_owned(), contents.to_owned())
    }

    #[test]
    fn test_default() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.name, "azureud");
        assert_eq!(config.lsscsi, "lsscsi");
        assert_eq!(config.instance_id, None);
    }

    #[test]
    fn test_full() {
        let config = parse(r#"executor name="azure" lsscsi="/usr/bin/lsscsi" instance-id="vm-0001""#).unwrap();
        assert_eq!(config.name, "azure");
        assert_eq!(config.lsscsi, "/usr/bin/lsscsi");
        assert_eq!(config.instance_id.as_deref(), Some("vm-0001"));
    }

    #[test]
    fn test_partial() {
        let config = parse("executor instance-id=\"vm-0002\"\n").unwrap();
        assert_eq!(config.name, "azureud");
        assert_eq!(config.lsscsi, "lsscsi");
        assert_eq!(config.instance_id.as_deref(), Some("vm-0002"));
    }

    #[test]
    fn test_unsupported_node() {
        let err = parse("driver name=\"azureud\"").unwrap_err();
        assert!(matches!(err, Error::UnsupportedNode(ref e) if e.name == "driver"));
    }

    #[test]
    fn test_unsupported_property() {
        let err = parse("executor prefix=\"/dev/xvd\"").unwrap_err();
        assert!(matches!(err, Error::UnsupportedProperty(ref e) if e.name == "prefix"));
    }

    #[test]
    fn test_invalid_type() {
        let err = parse("executor lsscsi=42").unwrap_err();
        assert!(matches!(err, Error::InvalidType(ref e) if e.id == "lsscsi"));
    }

    #[test]
    fn test_positional_argument() {
        let err = parse("executor \"azureud\"").unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn test_children() {
        let err = parse("executor {\n    lsscsi \"/usr/bin/lsscsi\"\n}").unwrap_err();
        assert!(matches!(err, Error::UnsupportedNode(ref e) if e.name == "lsscsi"));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse("executor name=\"unterminated").unwrap_err();
        assert!(matches!(err, Error::Kdl(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_path("/nonexistent/executor.kdl").unwrap_err();
        assert!(matches!(err, Error::IO(_)));
    }
}
