use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracing::trace;

use k8_manifest_schema::Attribute;
use k8_manifest_schema::Diagnostic;
use k8_manifest_schema::ElementKind;
use k8_manifest_schema::Schema;
use k8_manifest_schema::Validator;
use k8_manifest_types::Manifest;
use k8_manifest_types::ManifestMeta;
use k8_manifest_types::ManifestSpec;

use crate::DataSource;
use crate::ReadRequest;
use crate::ReadResponse;
use crate::YAML_ATTRIBUTE;

/// Spec with a schema declaration for its configuration
pub trait SpecSchema: ManifestSpec + 'static {
    fn spec_attribute() -> Attribute;
}

/// `{provider}_{group}_{kind}_{version}_manifest`
pub fn manifest_type_name<S: ManifestSpec>(provider_type_name: &str) -> String {
    let crd = S::metadata();
    format!(
        "{}_{}_{}_{}_manifest",
        provider_type_name,
        crd.group_ident(),
        crd.kind_ident(),
        crd.version
    )
}

pub fn metadata_attribute(name_spaced: bool) -> Attribute {
    let mut nested = vec![
        (
            "name",
            Attribute::required_string()
                .with_description("Unique name of the object within its scope.")
                .with_validator(Validator::DnsSubdomainName),
        ),
        (
            "labels",
            Attribute::optional_map(ElementKind::String)
                .with_description("Map of string keys and values used to organize and select objects.")
                .with_validator(Validator::LabelKeys)
                .with_validator(Validator::LabelValues),
        ),
        (
            "annotations",
            Attribute::optional_map(ElementKind::String)
                .with_description("Unstructured key value map stored with the object.")
                .with_validator(Validator::AnnotationKeys),
        ),
    ];
    if name_spaced {
        nested.push((
            "namespace",
            Attribute::required_string()
                .with_description("Namespace of the object.")
                .with_validator(Validator::DnsLabelName),
        ));
    }

    Attribute::required_object(nested)
        .with_description("Data that helps uniquely identify the object.")
}

pub fn manifest_schema<S: SpecSchema>() -> Schema {
    Schema::new(format!(
        "Creates a YAML manifest of a {} ({}).",
        S::kind(),
        S::api_version()
    ))
    .with_attribute(
        YAML_ATTRIBUTE,
        Attribute::computed_string().with_description("The generated manifest in YAML format."),
    )
    .with_attribute("metadata", metadata_attribute(S::NAME_SPACED))
    .with_attribute("spec", S::spec_attribute())
}

/// configuration as decoded for a manifest
#[derive(Deserialize)]
#[serde(bound(deserialize = "S: DeserializeOwned"))]
struct ManifestModel<S> {
    metadata: ManifestMeta,
    #[serde(default)]
    spec: Option<S>,
}

/// Data source rendering the manifest of custom resource `S`
pub struct ManifestDataSource<S> {
    data: PhantomData<fn() -> S>,
}

impl<S> Default for ManifestDataSource<S> {
    fn default() -> Self {
        Self { data: PhantomData }
    }
}

impl<S> ManifestDataSource<S>
where
    S: SpecSchema,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }
}

impl<S> DataSource for ManifestDataSource<S>
where
    S: SpecSchema,
{
    fn type_name(&self, provider_type_name: &str) -> String {
        manifest_type_name::<S>(provider_type_name)
    }

    fn group(&self) -> &'static str {
        S::metadata().group
    }

    fn schema(&self) -> Schema {
        manifest_schema::<S>()
    }

    fn read(&self, request: ReadRequest) -> ReadResponse {
        let schema = self.schema();
        let mut response = ReadResponse::default();

        response.diagnostics.append(schema.validate(&request.config));
        if response.diagnostics.has_error() {
            debug!(
                kind = S::label(),
                errors = response.diagnostics.errors().count(),
                "invalid configuration"
            );
            return response;
        }

        let model: ManifestModel<S> = match serde_json::from_value(request.config.clone()) {
            Ok(model) => model,
            Err(err) => {
                response.diagnostics.push(Diagnostic::error(
                    "Unable to decode configuration",
                    format!("configuration can't be decoded into {}: {}", S::label(), err),
                ));
                return response;
            }
        };

        debug!(kind = S::label(), name = %model.metadata, "rendering manifest");
        let manifest = Manifest::new(model.metadata, model.spec);
        let yaml = match serde_yaml::to_string(&manifest) {
            Ok(yaml) => yaml,
            Err(err) => {
                response.diagnostics.push(Diagnostic::error(
                    "Unable to marshal YAML",
                    format!("manifest can't be marshalled to YAML: {}", err),
                ));
                return response;
            }
        };
        trace!(%yaml, "rendered manifest");

        let mut state = schema.normalize(&request.config);
        if let Some(object) = state.as_object_mut() {
            object.insert(YAML_ATTRIBUTE.to_owned(), Value::String(yaml));
        }
        response.state = Some(state);
        response
    }
}
