use k8_manifest_schema::Attribute;
use k8_manifest_schema::ElementKind;
use k8_manifest_schema::Validator;
use k8_manifest_types::monitoring::ServiceMonitorSpec;

use super::duration;
use crate::SpecSchema;

const RELABEL_ACTIONS: [&str; 22] = [
    "replace",
    "Replace",
    "keep",
    "Keep",
    "drop",
    "Drop",
    "hashmod",
    "HashMod",
    "labelmap",
    "LabelMap",
    "labeldrop",
    "LabelDrop",
    "labelkeep",
    "LabelKeep",
    "lowercase",
    "Lowercase",
    "uppercase",
    "Uppercase",
    "keepequal",
    "KeepEqual",
    "dropequal",
    "DropEqual",
];

fn relabelings() -> Attribute {
    Attribute::optional_list_of([
        (
            "source_labels",
            Attribute::optional_list(ElementKind::String),
        ),
        ("separator", Attribute::optional_string()),
        ("target_label", Attribute::optional_string()),
        ("regex", Attribute::optional_string()),
        ("replacement", Attribute::optional_string()),
        (
            "action",
            Attribute::optional_string().with_validator(Validator::one_of(RELABEL_ACTIONS)),
        ),
    ])
}

impl SpecSchema for ServiceMonitorSpec {
    fn spec_attribute() -> Attribute {
        Attribute::required_object([
            (
                "job_label",
                Attribute::optional_string()
                    .with_description("Label to use to retrieve the job name from."),
            ),
            (
                "target_labels",
                Attribute::optional_list(ElementKind::String),
            ),
            (
                "pod_target_labels",
                Attribute::optional_list(ElementKind::String),
            ),
            (
                "sample_limit",
                Attribute::optional_int64()
                    .with_description("Per-scrape limit on number of scraped samples that will be accepted.")
                    .with_validator(Validator::Int64AtLeast { min: 0 }),
            ),
            (
                "selector",
                Attribute::required_object([
                    ("match_labels", Attribute::optional_map(ElementKind::String)),
                    (
                        "match_expressions",
                        Attribute::optional_list_of([
                            ("key", Attribute::required_string()),
                            (
                                "operator",
                                Attribute::required_string().with_validator(Validator::one_of([
                                    "In",
                                    "NotIn",
                                    "Exists",
                                    "DoesNotExist",
                                ])),
                            ),
                            ("values", Attribute::optional_list(ElementKind::String)),
                        ]),
                    ),
                ])
                .with_description("Label selector to select the Kubernetes Endpoints objects."),
            ),
            (
                "namespace_selector",
                Attribute::optional_object([
                    ("any", Attribute::optional_bool()),
                    ("match_names", Attribute::optional_list(ElementKind::String)),
                ]),
            ),
            (
                "endpoints",
                Attribute::optional_list_of([
                    ("port", Attribute::optional_string()),
                    ("target_port", Attribute::optional_int_or_string()),
                    ("path", Attribute::optional_string()),
                    (
                        "scheme",
                        Attribute::optional_string()
                            .with_validator(Validator::one_of(["http", "https"])),
                    ),
                    ("interval", Attribute::optional_string().with_validator(duration())),
                    (
                        "scrape_timeout",
                        Attribute::optional_string().with_validator(duration()),
                    ),
                    ("honor_labels", Attribute::optional_bool()),
                    ("relabelings", relabelings()),
                ])
                .with_description("List of endpoints allowed as part of this ServiceMonitor."),
            ),
        ])
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_manifest_types::monitoring::ServiceMonitorSpec;

    use crate::DataSource;
    use crate::ManifestDataSource;
    use crate::ReadRequest;

    #[test]
    fn test_service_monitor_manifest() {
        //given
        let data_source = ManifestDataSource::<ServiceMonitorSpec>::new();
        let config = json!({
            "metadata": {
                "name": "web",
                "namespace": "monitoring",
                "labels": { "release": "prometheus" }
            },
            "spec": {
                "selector": {
                    "match_expressions": [{ "key": "app", "operator": "In", "values": ["web"] }]
                },
                "endpoints": [{
                    "port": "metrics",
                    "interval": "30s",
                    "relabelings": [{ "target_label": "cluster", "replacement": "prod", "action": "replace" }]
                }]
            }
        });

        //when
        let response = data_source.read(ReadRequest::new(config));

        //then
        assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);
        assert_eq!(
            response.yaml().expect("yaml"),
            r#"apiVersion: monitoring.coreos.com/v1
kind: ServiceMonitor
metadata:
  name: web
  namespace: monitoring
  labels:
    release: prometheus
spec:
  selector:
    matchExpressions:
    - key: app
      operator: In
      values:
      - web
  endpoints:
  - port: metrics
    interval: 30s
    relabelings:
    - targetLabel: cluster
      replacement: prod
      action: replace
"#
        );
    }

    #[test]
    fn test_service_monitor_invalid_endpoint() {
        let data_source = ManifestDataSource::<ServiceMonitorSpec>::new();
        let diags = data_source.validate_config(&json!({
            "metadata": { "name": "web", "namespace": "monitoring" },
            "spec": {
                "selector": {},
                "sample_limit": -1,
                "endpoints": [{ "scheme": "ftp", "target_port": 2.5 }]
            }
        }));

        let paths: Vec<String> = diags
            .iter()
            .filter_map(|d| d.path.as_ref().map(|p| p.to_string()))
            .collect();
        assert_eq!(
            paths,
            vec![
                "spec.endpoints[0].scheme",
                "spec.endpoints[0].target_port",
                "spec.sample_limit",
            ]
        );
    }
}
