use k8_manifest_schema::Attribute;
use k8_manifest_schema::ElementKind;
use k8_manifest_schema::Validator;
use k8_manifest_types::argoproj::ApplicationSpec;

use super::duration;
use crate::SpecSchema;

fn source() -> Attribute {
    Attribute::optional_object([
        (
            "repo_url",
            Attribute::required_string()
                .with_description("URL to the repository (Git or Helm) that contains the application manifests."),
        ),
        ("path", Attribute::optional_string()),
        ("target_revision", Attribute::optional_string()),
        ("chart", Attribute::optional_string()),
        (
            "helm",
            Attribute::optional_object([
                ("value_files", Attribute::optional_list(ElementKind::String)),
                ("values", Attribute::optional_string()),
                ("release_name", Attribute::optional_string()),
                (
                    "parameters",
                    Attribute::optional_list_of([
                        ("name", Attribute::optional_string()),
                        ("value", Attribute::optional_string()),
                        ("force_string", Attribute::optional_bool()),
                    ]),
                ),
            ]),
        ),
    ])
    .with_description("Location of the application's manifests or chart.")
}

fn sync_policy() -> Attribute {
    Attribute::optional_object([
        (
            "automated",
            Attribute::optional_object([
                ("prune", Attribute::optional_bool()),
                ("self_heal", Attribute::optional_bool()),
                ("allow_empty", Attribute::optional_bool()),
            ]),
        ),
        ("sync_options", Attribute::optional_list(ElementKind::String)),
        (
            "retry",
            Attribute::optional_object([
                ("limit", Attribute::optional_int64()),
                (
                    "backoff",
                    Attribute::optional_object([
                        ("duration", Attribute::optional_string().with_validator(duration())),
                        (
                            "factor",
                            Attribute::optional_int64()
                                .with_validator(Validator::Int64AtLeast { min: 1 }),
                        ),
                        (
                            "max_duration",
                            Attribute::optional_string().with_validator(duration()),
                        ),
                    ]),
                ),
            ]),
        ),
    ])
}

impl SpecSchema for ApplicationSpec {
    fn spec_attribute() -> Attribute {
        Attribute::required_object([
            (
                "project",
                Attribute::required_string()
                    .with_description("Reference to the project this application belongs to."),
            ),
            ("source", source()),
            (
                "destination",
                Attribute::required_object([
                    (
                        "server",
                        Attribute::optional_string()
                            .with_validator(Validator::conflicts_with(["name"])),
                    ),
                    ("name", Attribute::optional_string()),
                    ("namespace", Attribute::optional_string()),
                ])
                .with_description("Reference to the target Kubernetes server and namespace."),
            ),
            ("sync_policy", sync_policy()),
            (
                "revision_history_limit",
                Attribute::optional_int64().with_validator(Validator::Int64AtLeast { min: 0 }),
            ),
            (
                "ignore_differences",
                Attribute::optional_list_of([
                    ("group", Attribute::optional_string()),
                    ("kind", Attribute::required_string()),
                    ("name", Attribute::optional_string()),
                    ("namespace", Attribute::optional_string()),
                    ("json_pointers", Attribute::optional_list(ElementKind::String)),
                ]),
            ),
        ])
    }
}
