use k8_manifest_schema::Attribute;
use k8_manifest_schema::AttributeMode;
use k8_manifest_schema::ElementKind;
use k8_manifest_schema::Validator;
use k8_manifest_types::cert_manager::ClusterIssuerSpec;

use crate::SpecSchema;

fn secret_key_selector(mode: AttributeMode) -> Attribute {
    let mut selector = Attribute::required_object([
        (
            "name",
            Attribute::required_string().with_validator(Validator::DnsSubdomainName),
        ),
        ("key", Attribute::optional_string()),
    ]);
    selector.mode = mode;
    selector
}

fn acme_solver() -> Attribute {
    Attribute::optional_list_of([
        (
            "selector",
            Attribute::optional_object([
                ("dns_names", Attribute::optional_list(ElementKind::String)),
                ("dns_zones", Attribute::optional_list(ElementKind::String)),
                ("match_labels", Attribute::optional_map(ElementKind::String)),
            ]),
        ),
        (
            "http01",
            Attribute::optional_object([(
                "ingress",
                Attribute::optional_object([
                    ("class", Attribute::optional_string()),
                    ("ingress_class_name", Attribute::optional_string()),
                    ("name", Attribute::optional_string()),
                ]),
            )]),
        ),
        (
            "dns01",
            Attribute::optional_object([(
                "cloudflare",
                Attribute::optional_object([
                    ("email", Attribute::optional_string()),
                    (
                        "api_token_secret_ref",
                        secret_key_selector(AttributeMode::Optional)
                            .with_description("Secret containing the Cloudflare API token."),
                    ),
                ]),
            )]),
        ),
    ])
    .with_description("Solvers used to solve ACME challenges, selected by the most specific selector.")
}

impl SpecSchema for ClusterIssuerSpec {
    fn spec_attribute() -> Attribute {
        Attribute::required_object([
            (
                "acme",
                Attribute::optional_object([
                    ("server", Attribute::required_string()),
                    ("email", Attribute::optional_string()),
                    (
                        "private_key_secret_ref",
                        secret_key_selector(AttributeMode::Required),
                    ),
                    ("skip_tls_verify", Attribute::optional_bool()),
                    ("solvers", acme_solver()),
                ])
                .with_description("Configures this issuer to communicate with an ACME server.")
                .with_validator(Validator::conflicts_with(["ca", "self_signed"])),
            ),
            (
                "ca",
                Attribute::optional_object([
                    ("secret_name", Attribute::required_string()),
                    (
                        "crl_distribution_points",
                        Attribute::optional_list(ElementKind::String),
                    ),
                ])
                .with_description("Signs certificates using a signing key pair stored in a Secret.")
                .with_validator(Validator::conflicts_with(["self_signed"])),
            ),
            (
                "self_signed",
                Attribute::optional_object([(
                    "crl_distribution_points",
                    Attribute::optional_list(ElementKind::String),
                )]),
            ),
        ])
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_manifest_types::cert_manager::ClusterIssuerSpec;

    use crate::DataSource;
    use crate::ManifestDataSource;
    use crate::ReadRequest;

    #[test]
    fn test_acme_issuer() {
        //given
        let data_source = ManifestDataSource::<ClusterIssuerSpec>::new();
        let config = json!({
            "metadata": { "name": "letsencrypt" },
            "spec": {
                "acme": {
                    "server": "https://acme-v02.api.letsencrypt.org/directory",
                    "email": "ops@example.com",
                    "private_key_secret_ref": { "name": "letsencrypt-account" },
                    "solvers": [
                        { "http01": { "ingress": { "ingress_class_name": "nginx" } } }
                    ]
                }
            }
        });

        //when
        let response = data_source.read(ReadRequest::new(config));

        //then
        assert!(response.diagnostics.is_empty(), "{}", response.diagnostics);
        assert_eq!(
            response.yaml().expect("yaml"),
            r#"apiVersion: cert-manager.io/v1
kind: ClusterIssuer
metadata:
  name: letsencrypt
spec:
  acme:
    server: https://acme-v02.api.letsencrypt.org/directory
    email: ops@example.com
    privateKeySecretRef:
      name: letsencrypt-account
    solvers:
    - http01:
        ingress:
          ingressClassName: nginx
"#
        );
    }

    #[test]
    fn test_issuer_types_conflict() {
        let data_source = ManifestDataSource::<ClusterIssuerSpec>::new();
        let diags = data_source.validate_config(&json!({
            "metadata": { "name": "internal" },
            "spec": {
                "ca": { "secret_name": "root-ca" },
                "self_signed": {}
            }
        }));

        assert_eq!(diags.len(), 1);
        let diag = diags.iter().next().expect("diag");
        assert_eq!(diag.summary, "Invalid Attribute Combination");
        assert_eq!(diag.path.as_ref().expect("path").to_string(), "spec.ca");
    }

    #[test]
    fn test_self_signed_issuer() {
        let data_source = ManifestDataSource::<ClusterIssuerSpec>::new();
        let response = data_source.read(ReadRequest::new(json!({
            "metadata": { "name": "self-signed" },
            "spec": { "self_signed": {} }
        })));

        assert_eq!(
            response.yaml().expect("yaml"),
            "apiVersion: cert-manager.io/v1\nkind: ClusterIssuer\nmetadata:\n  name: self-signed\nspec:\n  selfSigned: {}\n"
        );
    }
}
