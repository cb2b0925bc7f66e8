//! Built-in manifest data sources, one module per CRD and version
mod argoproj_io_application_v1alpha1;
mod cert_manager_io_certificate_v1;
mod cert_manager_io_cluster_issuer_v1;
mod monitoring_coreos_com_service_monitor_v1;

use k8_manifest_schema::Validator;
use k8_manifest_types::argoproj::ApplicationSpec;
use k8_manifest_types::cert_manager::CertificateSpec;
use k8_manifest_types::cert_manager::ClusterIssuerSpec;
use k8_manifest_types::monitoring::ServiceMonitorSpec;

use crate::DataSource;
use crate::ManifestDataSource;

/// go duration such as `2160h` or `1h30m`
const DURATION_PATTERN: &str = r"^([0-9]+(\.[0-9]+)?(ns|us|µs|ms|s|m|h))+$";

fn duration() -> Validator {
    Validator::regex_matches(DURATION_PATTERN, "value must be a duration such as 30s or 1h30m")
}

pub fn all() -> Vec<Box<dyn DataSource>> {
    vec![
        ManifestDataSource::<ApplicationSpec>::boxed(),
        ManifestDataSource::<CertificateSpec>::boxed(),
        ManifestDataSource::<ClusterIssuerSpec>::boxed(),
        ManifestDataSource::<ServiceMonitorSpec>::boxed(),
    ]
}
