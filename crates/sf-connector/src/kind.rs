//! Metadata kinds that can be created from scratch.
//!
//! One static table row per kind carries everything a creation needs:
//! names, on-disk layout, the starter source and its metadata, and how the
//! component reaches the org.

use serde::{Deserialize, Serialize};

/// A kind of component [`Connector::create_metadata`](crate::Connector::create_metadata)
/// can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    ApexClass,
    VisualforcePage,
    VisualforceComponent,
    ApexTrigger,
    AuraBundle,
    LwcBundle,
}

/// How a new component is sent to the org.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStrategy {
    /// A `<Type>Member` compiled through a metadata container.
    Compiled,
    /// An `AuraDefinitionBundle` plus its component definition.
    AuraBundle,
    /// A `LightningComponentBundle` plus its JavaScript resource.
    LwcBundle,
}

/// Metadata written next to a component's source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub api_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_in_touch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_token_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exposed: Option<bool>,
}

/// Table row for one [`MetadataKind`].
#[derive(Debug)]
pub struct KindSpec {
    pub kind: MetadataKind,
    pub label: &'static str,
    pub tooling_type: &'static str,
    pub folder: &'static str,
    pub extension: &'static str,
    pub strategy: CreationStrategy,
    /// Starter source from the component name and, for triggers, the sObject.
    pub template: fn(&str, &str) -> String,
    pub metadata: fn(&str, u32) -> ComponentMetadata,
}

static KINDS: [KindSpec; 6] = [
    KindSpec {
        kind: MetadataKind::ApexClass,
        label: "Apex class",
        tooling_type: "ApexClassMember",
        folder: "classes",
        extension: ".cls",
        strategy: CreationStrategy::Compiled,
        template: apex_class_source,
        metadata: active_metadata,
    },
    KindSpec {
        kind: MetadataKind::VisualforcePage,
        label: "Visualforce page",
        tooling_type: "ApexPageMember",
        folder: "pages",
        extension: ".page",
        strategy: CreationStrategy::Compiled,
        template: page_source,
        metadata: page_metadata,
    },
    KindSpec {
        kind: MetadataKind::VisualforceComponent,
        label: "Visualforce component",
        tooling_type: "ApexComponentMember",
        folder: "components",
        extension: ".component",
        strategy: CreationStrategy::Compiled,
        template: vf_component_source,
        metadata: vf_component_metadata,
    },
    KindSpec {
        kind: MetadataKind::ApexTrigger,
        label: "Apex trigger",
        tooling_type: "ApexTriggerMember",
        folder: "triggers",
        extension: ".trigger",
        strategy: CreationStrategy::Compiled,
        template: trigger_source,
        metadata: active_metadata,
    },
    KindSpec {
        kind: MetadataKind::AuraBundle,
        label: "Lightning component",
        tooling_type: "AuraDefinitionBundle",
        folder: "aura",
        extension: ".cmp",
        strategy: CreationStrategy::AuraBundle,
        template: aura_source,
        metadata: aura_metadata,
    },
    KindSpec {
        kind: MetadataKind::LwcBundle,
        label: "Lightning web component",
        tooling_type: "LightningComponentBundle",
        folder: "lwc",
        extension: ".js",
        strategy: CreationStrategy::LwcBundle,
        template: lwc_source,
        metadata: lwc_metadata,
    },
];

fn apex_class_source(name: &str, _: &str) -> String {
    format!("public class {name} {{\n\n}}")
}

fn page_source(_: &str, _: &str) -> String {
    "<apex:page>\nHello world!\n</apex:page>".to_string()
}

fn vf_component_source(_: &str, _: &str) -> String {
    "<apex:component>\nHello world!\n</apex:component>".to_string()
}

fn trigger_source(name: &str, sobject: &str) -> String {
    format!("trigger {name} on {sobject} (before insert) {{\n\n}}")
}

fn aura_source(_: &str, _: &str) -> String {
    "<aura:component implements=\"flexipage:availableForRecordHome,force:hasRecordId\" access=\"global\">\n\n</aura:component>"
        .to_string()
}

fn lwc_source(_: &str, _: &str) -> String {
    "import { LightningElement, track } from 'lwc';\nexport default class CmpCtrl extends LightningElement {\n\n}"
        .to_string()
}

fn active_metadata(_: &str, api_version: u32) -> ComponentMetadata {
    ComponentMetadata {
        api_version,
        status: Some("Active".to_string()),
        ..Default::default()
    }
}

fn page_metadata(name: &str, api_version: u32) -> ComponentMetadata {
    ComponentMetadata {
        api_version,
        available_in_touch: Some(true),
        confirmation_token_required: Some(false),
        label: Some(name.to_string()),
        ..Default::default()
    }
}

fn vf_component_metadata(name: &str, api_version: u32) -> ComponentMetadata {
    ComponentMetadata {
        api_version,
        description: Some(name.to_string()),
        label: Some(name.to_string()),
        ..Default::default()
    }
}

fn aura_metadata(name: &str, api_version: u32) -> ComponentMetadata {
    ComponentMetadata {
        api_version,
        description: Some(name.to_string()),
        ..Default::default()
    }
}

fn lwc_metadata(name: &str, api_version: u32) -> ComponentMetadata {
    ComponentMetadata {
        api_version,
        is_exposed: Some(true),
        description: Some(name.to_string()),
        ..Default::default()
    }
}

impl MetadataKind {
    pub const ALL: [MetadataKind; 6] = [
        MetadataKind::ApexClass,
        MetadataKind::VisualforcePage,
        MetadataKind::VisualforceComponent,
        MetadataKind::ApexTrigger,
        MetadataKind::AuraBundle,
        MetadataKind::LwcBundle,
    ];

    pub fn spec(self) -> &'static KindSpec {
        // Rows are in declaration order.
        &KINDS[self as usize]
    }

    /// Kind whose tooling type is `tooling_type`, e.g. `ApexPageMember`.
    pub fn from_tooling_type(tooling_type: &str) -> Option<Self> {
        KINDS
            .iter()
            .find(|row| row.tooling_type == tooling_type)
            .map(|row| row.kind)
    }

    pub fn tooling_type(self) -> &'static str {
        self.spec().tooling_type
    }

    pub fn strategy(self) -> CreationStrategy {
        self.spec().strategy
    }

    pub fn requires_sobject(self) -> bool {
        self == MetadataKind::ApexTrigger
    }

    /// Starter source for a component called `name`.
    pub fn template(self, name: &str, sobject: Option<&str>) -> String {
        (self.spec().template)(name, sobject.unwrap_or_default())
    }

    pub fn metadata(self, name: &str, api_version: u32) -> ComponentMetadata {
        (self.spec().metadata)(name, api_version)
    }

    /// Path of the source file below the project's `src` folder. Bundles
    /// get a directory of their own.
    pub fn relative_path(self, name: &str) -> String {
        let spec = self.spec();
        match spec.strategy {
            CreationStrategy::Compiled => format!("{}/{name}{}", spec.folder, spec.extension),
            CreationStrategy::AuraBundle | CreationStrategy::LwcBundle => {
                format!("{}/{name}/{name}{}", spec.folder, spec.extension)
            }
        }
    }
}

impl std::fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().label)
    }
}
