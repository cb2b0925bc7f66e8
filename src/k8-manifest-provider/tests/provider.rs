use std::fs::read_to_string;

use k8_manifest_provider::config::ProviderConfig;
use k8_manifest_provider::parse_config;
use k8_manifest_provider::Provider;

#[test]
fn test_provider_from_config_file() {
    //given
    let config = ProviderConfig::from_file("../k8-manifest-config/data/config.yaml").expect("config");

    //when
    let provider = Provider::from_config(&config).expect("provider");

    //then
    assert_eq!(
        provider.data_source_names(),
        vec![
            "acme_cert_manager_io_certificate_v1_manifest",
            "acme_cert_manager_io_cluster_issuer_v1_manifest",
            "acme_monitoring_coreos_com_service_monitor_v1_manifest",
        ]
    );
    assert!(provider
        .data_source("acme_argoproj_io_application_v1alpha1_manifest")
        .is_none());
}

#[test]
fn test_render_service_monitor_from_json() {
    let provider = Provider::default();
    let input = read_to_string("data/service-monitor.json").expect("fixture");
    let config = parse_config(&input).expect("parse");

    let response = provider
        .read_data_source("k8s_monitoring_coreos_com_service_monitor_v1_manifest", config)
        .expect("read");

    assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);
    assert_eq!(
        response.yaml().expect("yaml"),
        r#"apiVersion: monitoring.coreos.com/v1
kind: ServiceMonitor
metadata:
  name: api
  namespace: monitoring
spec:
  jobLabel: app
  selector:
    matchLabels:
      app: api
  namespaceSelector:
    matchNames:
    - production
  endpoints:
  - port: http-metrics
    path: /metrics
    scrapeTimeout: 10s
  - targetPort: 9102
    scheme: https
"#
    );
}

#[test]
fn test_schema_serialization() {
    let provider = Provider::new("k8s");
    let yaml = provider.schema().to_yaml().expect("yaml");

    let decoded: serde_json::Value = serde_yaml::from_str(&yaml).expect("decode");
    let certificate = &decoded["data_sources"]["k8s_cert_manager_io_certificate_v1_manifest"];
    assert_eq!(certificate["attributes"]["yaml"]["mode"], "computed");
    assert_eq!(
        certificate["attributes"]["metadata"]["kind"]["type"],
        "single_nested"
    );
}
