//! Compound resource identity packed into node ids.
//!
//! Ids are colon separated: `kind:namespace:name` for namespaced resources
//! and `kind:name` for cluster-scoped ones. Anything else decodes to the
//! `unknown` kind with the raw id as the name, never to an error.

pub const UNKNOWN_KIND: &str = "unknown";

const POD_KIND: &str = "pod";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceIdentity {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl ResourceIdentity {
    pub fn is_pod(&self) -> bool {
        self.kind.eq_ignore_ascii_case(POD_KIND)
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == UNKNOWN_KIND
    }

    pub fn namespace(&self) -> Option<&str> {
        (!self.namespace.is_empty()).then_some(self.namespace.as_str())
    }

    /// Kind name as the discovery service's manifest endpoint expects it.
    pub fn api_kind(&self) -> &str {
        match self.kind.to_ascii_lowercase().as_str() {
            "deploy" | "deployment" => "Deployment",
            "sts" | "statefulset" => "StatefulSet",
            "ds" | "daemonset" => "DaemonSet",
            "rs" | "replicaset" => "ReplicaSet",
            "pod" => "Pod",
            "svc" | "service" => "Service",
            "hpa" | "horizontalpodautoscaler" => "HorizontalPodAutoscaler",
            "node" => "Node",
            "ns" | "namespace" => "Namespace",
            _ => &self.kind,
        }
    }
}

pub fn encode(kind: &str, namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) if !namespace.is_empty() => format!("{kind}:{namespace}:{name}"),
        _ => format!("{kind}:{name}"),
    }
}

pub fn decode(token: &str) -> ResourceIdentity {
    let segments = token.split(':').collect::<Vec<_>>();
    match segments.as_slice() {
        [kind, namespace, name] => ResourceIdentity {
            kind: (*kind).to_owned(),
            namespace: (*namespace).to_owned(),
            name: (*name).to_owned(),
        },
        [kind, name] => ResourceIdentity {
            kind: (*kind).to_owned(),
            namespace: String::new(),
            name: (*name).to_owned(),
        },
        _ => ResourceIdentity {
            kind: UNKNOWN_KIND.to_owned(),
            namespace: String::new(),
            name: token.to_owned(),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn namespaced_ids_round_trip() {
        for (kind, namespace, name) in [
            ("pod", "default", "web-1"),
            ("deploy", "kube-system", "coredns"),
            ("svc", "team.a", "api_gateway"),
        ] {
            let identity = decode(&encode(kind, Some(namespace), name));
            assert_eq!(
                identity,
                ResourceIdentity {
                    kind: kind.to_owned(),
                    namespace: namespace.to_owned(),
                    name: name.to_owned(),
                }
            );
        }
    }

    #[test]
    fn cluster_scoped_ids_decode_with_empty_namespace() {
        assert_eq!(encode("node", None, "worker-1"), "node:worker-1");
        assert_eq!(encode("node", Some(""), "worker-1"), "node:worker-1");

        let identity = decode("node:worker-1");
        assert_eq!(identity.kind, "node");
        assert_eq!(identity.namespace, "");
        assert_eq!(identity.namespace(), None);
        assert_eq!(identity.name, "worker-1");
    }

    #[test]
    fn malformed_ids_become_unknown() {
        for token in ["", "orphan", "a:b:c:d", "pod:default:web:1"] {
            let identity = decode(token);
            assert!(identity.is_unknown(), "{token} should be unknown");
            assert_eq!(identity.namespace, "");
            assert_eq!(identity.name, token);
        }
    }

    #[test]
    fn pod_detection_ignores_case() {
        assert!(decode("pod:default:web-1").is_pod());
        assert!(decode("Pod:default:web-1").is_pod());
        assert!(decode("POD:web-1").is_pod());
        assert!(!decode("deploy:default:web").is_pod());
        assert!(!decode("garbage").is_pod());
    }

    #[test]
    fn short_kind_prefixes_map_to_api_kinds() {
        assert_eq!(decode("deploy:default:web").api_kind(), "Deployment");
        assert_eq!(decode("sts:db:pg").api_kind(), "StatefulSet");
        assert_eq!(decode("hpa:default:web").api_kind(), "HorizontalPodAutoscaler");
        assert_eq!(decode("node:worker-1").api_kind(), "Node");
        assert_eq!(decode("CronJob:batch:nightly").api_kind(), "CronJob");
    }
}
