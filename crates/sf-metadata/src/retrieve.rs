//! Retrieve operations.


use fast_sfdc_client::security::xml::escape;
use fast_sfdc_client::xml;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, ErrorKind, Result};
use crate::types::FileProperties;

/// Package manifest (package.xml).
///
/// All values are XML-escaped when the manifest is written into a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    pub types: Vec<PackageTypeMembers>,
    pub version: Option<String>,
}

impl PackageManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a metadata type with its members.
    pub fn add_type(mut self, name: impl Into<String>, members: Vec<String>) -> Self {
        self.types.push(PackageTypeMembers {
            name: name.into(),
            members,
        });
        self
    }

    /// Parse a `package.xml` document.
    ///
    /// Only `types` (with `members` and `name`) and `version` are read;
    /// unknown elements are ignored.
    pub fn from_xml(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(true);

        let mut manifest = PackageManifest::default();
        let mut path: Vec<String> = Vec::new();
        let mut current: Option<PackageTypeMembers> = None;
        let mut saw_package = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    match (path.len(), name.as_str()) {
                        (0, "Package") => saw_package = true,
                        (1, "types") => {
                            current = Some(PackageTypeMembers {
                                name: String::new(),
                                members: Vec::new(),
                            })
                        }
                        _ => {}
                    }
                    path.push(name);
                }
                Event::End(_) => {
                    if path.len() == 2 && path[1] == "types" {
                        if let Some(types) = current.take() {
                            if types.name.is_empty() {
                                return Err(Error::new(ErrorKind::Manifest(
                                    "<types> without <name>".to_string(),
                                )));
                            }
                            manifest.types.push(types);
                        }
                    }
                    path.pop();
                }
                Event::Text(t) => {
                    let value = t
                        .unescape()
                        .map_err(|e| Error::with_source(ErrorKind::Manifest(e.to_string()), e))?
                        .into_owned();
                    let parents: Vec<&str> = path.iter().map(String::as_str).collect();
                    match parents.as_slice() {
                        ["Package", "types", "members"] => {
                            if let Some(types) = current.as_mut() {
                                types.members.push(value);
                            }
                        }
                        ["Package", "types", "name"] => {
                            if let Some(types) = current.as_mut() {
                                types.name = value;
                            }
                        }
                        ["Package", "version"] => manifest.version = Some(value),
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_package {
            return Err(Error::new(ErrorKind::Manifest(
                "root element is not <Package>".to_string(),
            )));
        }
        Ok(manifest)
    }

    /// Manifest as the content of an `<unpackaged>` element.
    pub(crate) fn to_xml(&self) -> String {
        let mut out = String::new();
        for types in &self.types {
            out.push_str("<types>");
            for member in &types.members {
                out.push_str(&format!("<members>{}</members>", escape(member)));
            }
            out.push_str(&format!("<name>{}</name></types>", escape(&types.name)));
        }
        if let Some(version) = &self.version {
            out.push_str(&format!("<version>{}</version>", escape(version)));
        }
        out
    }
}

/// Type members in a package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTypeMembers {
    pub name: String,
    pub members: Vec<String>,
}

/// Retrieve status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrieveStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Canceling,
    Canceled,
    /// A status this client does not know, kept as sent.
    Unknown(String),
}

impl std::str::FromStr for RetrieveStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RetrieveStatus::Pending),
            "InProgress" => Ok(RetrieveStatus::InProgress),
            "Succeeded" => Ok(RetrieveStatus::Succeeded),
            "Failed" => Ok(RetrieveStatus::Failed),
            "Canceling" => Ok(RetrieveStatus::Canceling),
            "Canceled" => Ok(RetrieveStatus::Canceled),
            _ => Err(format!("Unknown retrieve status: {}", s)),
        }
    }
}

/// Result of `checkRetrieveStatus`.
#[derive(Debug, Clone)]
pub struct RetrieveResult {
    pub id: String,
    pub done: bool,
    pub status: RetrieveStatus,
    pub success: bool,
    pub error_message: Option<String>,
    pub error_status_code: Option<String>,
    /// Base64-encoded zip, present once done when requested.
    pub zip_file: Option<String>,
    pub file_properties: Vec<FileProperties>,
    pub messages: Vec<RetrieveMessage>,
}

impl RetrieveResult {
    pub(crate) fn from_xml(response: &str) -> Result<Self> {
        let result = xml::element(response, "result")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing <result>".to_string())))?;
        let top = xml::without(&xml::without(result, "fileProperties"), "messages");

        Ok(Self {
            id: crate::soap::required(&top, "id")?,
            done: xml::flag(&top, "done"),
            status: xml::text(&top, "status")
                .map(|raw| {
                    raw.parse().unwrap_or_else(|_| {
                        warn!(status = %raw, "Unrecognised retrieve status");
                        RetrieveStatus::Unknown(raw)
                    })
                })
                .unwrap_or(RetrieveStatus::Pending),
            success: xml::flag(&top, "success"),
            error_message: xml::text(&top, "errorMessage").filter(|s| !s.is_empty()),
            error_status_code: xml::text(&top, "errorStatusCode").filter(|s| !s.is_empty()),
            zip_file: xml::text(&top, "zipFile").filter(|s| !s.is_empty()),
            file_properties: xml::elements(result, "fileProperties")
                .into_iter()
                .map(FileProperties::from_xml)
                .collect(),
            messages: xml::elements(result, "messages")
                .into_iter()
                .map(|block| RetrieveMessage {
                    file_name: xml::text(block, "fileName").unwrap_or_default(),
                    problem: xml::text(block, "problem").unwrap_or_default(),
                })
                .collect(),
        })
    }
}

/// A message from retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieveMessage {
    pub file_name: String,
    pub problem: String,
}
