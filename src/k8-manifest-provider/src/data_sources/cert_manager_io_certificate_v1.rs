use k8_manifest_schema::Attribute;
use k8_manifest_schema::ElementKind;
use k8_manifest_schema::Validator;
use k8_manifest_types::cert_manager::CertificateSpec;

use super::duration;
use crate::SpecSchema;

const KEY_USAGES: [&str; 23] = [
    "signing",
    "digital signature",
    "content commitment",
    "key encipherment",
    "key agreement",
    "data encipherment",
    "cert sign",
    "crl sign",
    "encipher only",
    "decipher only",
    "any",
    "server auth",
    "client auth",
    "code signing",
    "email protection",
    "s/mime",
    "ipsec end system",
    "ipsec tunnel",
    "ipsec user",
    "timestamping",
    "ocsp signing",
    "microsoft sgc",
    "netscape sgc",
];

fn string_list(description: &str) -> Attribute {
    Attribute::optional_list(ElementKind::String).with_description(description)
}

impl SpecSchema for CertificateSpec {
    fn spec_attribute() -> Attribute {
        Attribute::required_object([
            (
                "secret_name",
                Attribute::required_string()
                    .with_description("Name of the Secret resource that will be automatically created and managed by this Certificate resource."),
            ),
            (
                "common_name",
                Attribute::optional_string()
                    .with_description("Requested common name X509 certificate subject attribute.")
                    .with_validator(Validator::LengthAtMost { max: 64 }),
            ),
            ("dns_names", string_list("Requested DNS subject alternative names.")),
            ("ip_addresses", string_list("Requested IP address subject alternative names.")),
            ("uris", string_list("Requested URI subject alternative names.")),
            ("email_addresses", string_list("Requested email subject alternative names.")),
            (
                "duration",
                Attribute::optional_string()
                    .with_description("Requested 'duration' (i.e. lifetime) of the Certificate.")
                    .with_validator(duration()),
            ),
            (
                "renew_before",
                Attribute::optional_string()
                    .with_description("How long before the currently issued certificate's expiry cert-manager should renew the certificate.")
                    .with_validator(duration()),
            ),
            (
                "is_ca",
                Attribute::optional_bool()
                    .with_description("Requested basic constraints isCA value."),
            ),
            (
                "usages",
                string_list("Requested key usages and extended key usages.")
                    .with_validator(Validator::values_one_of(KEY_USAGES)),
            ),
            (
                "issuer_ref",
                Attribute::required_object([
                    ("name", Attribute::required_string()),
                    ("kind", Attribute::optional_string()),
                    ("group", Attribute::optional_string()),
                ])
                .with_description("Reference to the issuer responsible for issuing the certificate."),
            ),
            (
                "private_key",
                Attribute::optional_object([
                    (
                        "algorithm",
                        Attribute::optional_string()
                            .with_validator(Validator::one_of(["RSA", "ECDSA", "Ed25519"])),
                    ),
                    (
                        "encoding",
                        Attribute::optional_string()
                            .with_validator(Validator::one_of(["PKCS1", "PKCS8"])),
                    ),
                    ("size", Attribute::optional_int64()),
                    (
                        "rotation_policy",
                        Attribute::optional_string()
                            .with_validator(Validator::one_of(["Never", "Always"])),
                    ),
                ])
                .with_description("Private key options."),
            ),
            (
                "secret_template",
                Attribute::optional_object([
                    (
                        "annotations",
                        Attribute::optional_map(ElementKind::String)
                            .with_validator(Validator::AnnotationKeys),
                    ),
                    (
                        "labels",
                        Attribute::optional_map(ElementKind::String)
                            .with_validator(Validator::LabelKeys)
                            .with_validator(Validator::LabelValues),
                    ),
                ])
                .with_description("Labels and annotations copied to the Certificate's Secret."),
            ),
            (
                "subject",
                Attribute::optional_object([
                    ("organizations", string_list("Organizations to be used on the Certificate.")),
                    ("countries", string_list("Countries to be used on the Certificate.")),
                    ("organizational_units", string_list("Organizational Units to be used on the Certificate.")),
                    ("localities", string_list("Cities to be used on the Certificate.")),
                    ("provinces", string_list("State/Provinces to be used on the Certificate.")),
                    ("street_addresses", string_list("Street addresses to be used on the Certificate.")),
                    ("postal_codes", string_list("Postal codes to be used on the Certificate.")),
                    ("serial_number", Attribute::optional_string()),
                ])
                .with_description("Requested set of X509 certificate subject attributes."),
            ),
            (
                "revision_history_limit",
                Attribute::optional_int64()
                    .with_description("Maximum number of CertificateRequest revisions that are maintained in the Certificate's history.")
                    .with_validator(Validator::Int64AtLeast { min: 1 }),
            ),
        ])
        .with_description("Desired state of the Certificate resource.")
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_manifest_types::cert_manager::CertificateSpec;

    use crate::DataSource;
    use crate::ManifestDataSource;
    use crate::ReadRequest;

    #[test]
    fn test_certificate_validation() {
        //given
        let data_source = ManifestDataSource::<CertificateSpec>::new();
        let config = json!({
            "metadata": { "name": "web", "namespace": "default" },
            "spec": {
                "secret_name": "web-tls",
                "duration": "90 days",
                "usages": ["server auth", "toaster"],
                "issuer_ref": { "name": "letsencrypt" },
                "private_key": { "algorithm": "DSA" },
                "revision_history_limit": 0
            }
        });

        //when
        let diags = data_source.validate_config(&config);

        //then
        let paths: Vec<String> = diags
            .iter()
            .filter_map(|d| d.path.as_ref().map(|p| p.to_string()))
            .collect();
        assert_eq!(
            paths,
            vec![
                "spec.duration",
                "spec.private_key.algorithm",
                "spec.revision_history_limit",
                "spec.usages[1]",
            ]
        );
    }

    #[test]
    fn test_certificate_requires_issuer() {
        let data_source = ManifestDataSource::<CertificateSpec>::new();
        let response = data_source.read(ReadRequest::new(json!({
            "metadata": { "name": "web", "namespace": "default" },
            "spec": { "secret_name": "web-tls" }
        })));

        assert!(response.state.is_none());
        let diag = response.diagnostics.iter().next().expect("diag");
        assert_eq!(diag.summary, "Missing required argument");
        assert_eq!(diag.path.as_ref().expect("path").to_string(), "spec.issuer_ref");
    }
}
