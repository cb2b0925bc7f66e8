//!
//! # CRD Definition
//!
//! Group, version and names of a custom resource
//!
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Crd {
    pub group: &'static str,
    pub version: &'static str,
    pub names: CrdNames,
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CrdNames {
    pub kind: &'static str,
    pub plural: &'static str,
    pub singular: &'static str,
}

impl Crd {
    /// group with separators replaced so it can be part of an identifier,
    /// `cert-manager.io` becomes `cert_manager_io`
    pub fn group_ident(&self) -> String {
        self.group.replace(['.', '-'], "_")
    }

    /// kind in snake case, `ServiceMonitor` becomes `service_monitor`
    /// and `HTTPRoute` becomes `http_route`
    pub fn kind_ident(&self) -> String {
        let chars: Vec<char> = self.names.kind.chars().collect();
        let mut ident = String::with_capacity(chars.len() + 4);
        for (i, ch) in chars.iter().enumerate() {
            if ch.is_ascii_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_lower = chars.get(i + 1).map_or(false, |c| c.is_ascii_lowercase());
                if prev.is_ascii_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_ascii_uppercase() && next_lower)
                {
                    ident.push('_');
                }
            }
            ident.push(ch.to_ascii_lowercase());
        }
        ident
    }
}

#[cfg(test)]
mod test {

    use super::Crd;
    use super::CrdNames;

    const TEST_API: Crd = Crd {
        group: "monitoring.coreos.com",
        version: "v1",
        names: CrdNames {
            kind: "ServiceMonitor",
            plural: "servicemonitors",
            singular: "servicemonitor",
        },
    };

    #[test]
    fn test_group_ident() {
        assert_eq!(TEST_API.group_ident(), "monitoring_coreos_com");
    }

    #[test]
    fn test_kind_ident() {
        assert_eq!(TEST_API.kind_ident(), "service_monitor");

        let api = Crd {
            group: "cert-manager.io",
            version: "v1",
            names: CrdNames {
                kind: "CertificateRequest",
                plural: "certificaterequests",
                singular: "certificaterequest",
            },
        };
        assert_eq!(api.group_ident(), "cert_manager_io");
        assert_eq!(api.kind_ident(), "certificate_request");
    }

    fn kind(kind: &'static str) -> Crd {
        Crd {
            group: "example.com",
            version: "v1",
            names: CrdNames {
                kind,
                plural: "",
                singular: "",
            },
        }
    }

    #[test]
    fn test_kind_ident_acronyms() {
        assert_eq!(kind("HTTPRoute").kind_ident(), "http_route");
        assert_eq!(kind("VMAgent").kind_ident(), "vm_agent");
        assert_eq!(kind("ClusterIP").kind_ident(), "cluster_ip");
        assert_eq!(kind("Pod").kind_ident(), "pod");
        assert_eq!(kind("V1Beta").kind_ident(), "v1_beta");
    }
}
