//! Describe metadata operations.

use fast_sfdc_client::xml;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// Result of describe metadata.
#[derive(Debug, Clone)]
pub struct DescribeMetadataResult {
    pub metadata_objects: Vec<MetadataType>,
    pub organization_namespace: Option<String>,
    pub partial_save_allowed: bool,
    pub test_required: bool,
}

impl DescribeMetadataResult {
    /// Types whose files live in `directory` (e.g. `classes`).
    pub fn types_in_directory<'a>(&'a self, directory: &'a str) -> impl Iterator<Item = &'a MetadataType> {
        self.metadata_objects
            .iter()
            .filter(move |t| t.directory_name.as_deref() == Some(directory))
    }

    pub(crate) fn from_xml(response: &str) -> Result<Self> {
        let result = xml::element(response, "result")
            .ok_or_else(|| Error::new(ErrorKind::InvalidResponse("missing <result>".to_string())))?;
        let top = xml::without(result, "metadataObjects");

        Ok(Self {
            metadata_objects: xml::elements(result, "metadataObjects")
                .into_iter()
                .map(|block| MetadataType {
                    xml_name: xml::text(block, "xmlName").unwrap_or_default(),
                    directory_name: xml::text(block, "directoryName").filter(|s| !s.is_empty()),
                    suffix: xml::text(block, "suffix").filter(|s| !s.is_empty()),
                    meta_file: xml::flag(block, "metaFile"),
                    in_folder: xml::flag(block, "inFolder"),
                    child_xml_names: xml::texts(block, "childXmlNames"),
                })
                .collect(),
            organization_namespace: xml::text(&top, "organizationNamespace").filter(|s| !s.is_empty()),
            partial_save_allowed: xml::flag(&top, "partialSaveAllowed"),
            test_required: xml::flag(&top, "testRequired"),
        })
    }
}

/// A metadata type definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataType {
    pub xml_name: String,
    pub directory_name: Option<String>,
    pub suffix: Option<String>,
    pub meta_file: bool,
    pub in_folder: bool,
    pub child_xml_names: Vec<String>,
}
