//! cert-manager.io resources
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::Crd;
use crate::CrdNames;
use crate::ManifestSpec;
use crate::SecretKeySelector;

pub const GROUP: &str = "cert-manager.io";
pub const V1: &str = "v1";

const CERTIFICATE_API: Crd = Crd {
    group: GROUP,
    version: V1,
    names: CrdNames {
        kind: "Certificate",
        plural: "certificates",
        singular: "certificate",
    },
};

const CLUSTER_ISSUER_API: Crd = Crd {
    group: GROUP,
    version: V1,
    names: CrdNames {
        kind: "ClusterIssuer",
        plural: "clusterissuers",
        singular: "clusterissuer",
    },
};

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CertificateSpec {
    pub secret_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_before: Option<String>,
    #[serde(rename(serialize = "isCA"), skip_serializing_if = "Option::is_none")]
    pub is_ca: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usages: Option<Vec<String>>,
    pub issuer_ref: IssuerRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<CertificatePrivateKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_template: Option<SecretTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<X509Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_history_limit: Option<i64>,
}

impl ManifestSpec for CertificateSpec {
    fn metadata() -> &'static Crd {
        &CERTIFICATE_API
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct IssuerRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CertificatePrivateKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_policy: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct SecretTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct X509Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizational_units: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provinces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ClusterIssuerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acme: Option<AcmeIssuer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaIssuer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<SelfSignedIssuer>,
}

impl ManifestSpec for ClusterIssuerSpec {
    const NAME_SPACED: bool = false;

    fn metadata() -> &'static Crd {
        &CLUSTER_ISSUER_API
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct AcmeIssuer {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub private_key_secret_ref: SecretKeySelector,
    #[serde(rename(serialize = "skipTLSVerify"), skip_serializing_if = "Option::is_none")]
    pub skip_tls_verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solvers: Option<Vec<AcmeSolver>>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AcmeSolver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<SolverSelector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http01: Option<Http01Solver>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns01: Option<Dns01Solver>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SolverSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Http01Solver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress: Option<Http01Ingress>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Http01Ingress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Dns01Solver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloudflare: Option<CloudflareProvider>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CloudflareProvider {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token_secret_ref: Option<SecretKeySelector>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct CaIssuer {
    pub secret_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SelfSignedIssuer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::CertificateSpec;
    use super::ClusterIssuerSpec;
    use crate::ManifestSpec;

    #[test]
    fn test_certificate_type() {
        assert_eq!(CertificateSpec::api_version(), "cert-manager.io/v1");
        assert_eq!(CertificateSpec::kind(), "Certificate");
        assert!(CertificateSpec::NAME_SPACED);
        assert!(!ClusterIssuerSpec::NAME_SPACED);
    }

    #[test]
    fn test_certificate_keys() {
        //given
        let config = json!({
            "secret_name": "web-tls",
            "is_ca": false,
            "ip_addresses": ["10.0.0.1"],
            "issuer_ref": { "name": "letsencrypt", "kind": null, "group": null },
            "private_key": { "rotation_policy": "Always" }
        });

        //when
        let spec: CertificateSpec = serde_json::from_value(config).expect("decode");
        let encoded = serde_json::to_value(&spec).expect("encode");

        //then
        assert_eq!(
            encoded,
            json!({
                "secretName": "web-tls",
                "ipAddresses": ["10.0.0.1"],
                "isCA": false,
                "issuerRef": { "name": "letsencrypt" },
                "privateKey": { "rotationPolicy": "Always" }
            })
        );
    }

    #[test]
    fn test_self_signed_issuer() {
        let spec: ClusterIssuerSpec =
            serde_json::from_value(json!({ "self_signed": {} })).expect("decode");
        assert_eq!(
            serde_yaml::to_string(&spec).expect("yaml"),
            "selfSigned: {}\n"
        );
    }
}
