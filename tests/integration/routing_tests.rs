//! Registry, credential and routing integration tests

#[cfg(test)]
mod tests {
    use crate::common::{ProviderDataFactory, RegistryFactory};
    use crate::{assert_err, assert_ok};
    use passthrough_gateway::core::credentials::{CredentialError, CredentialExtractor, extract};
    use passthrough_gateway::core::registry::{
        DuplicateError, ModelEntry, ModelRegistry, ModelType, NotFoundError, ProviderKind,
        ProviderRecord,
    };
    use passthrough_gateway::core::router::{RequestRouter, RouteError, route};
    use std::sync::Arc;

    /// A registered pair resolves to its provider record
    #[test]
    fn test_resolve_registered_model() {
        let registry = RegistryFactory::standard();
        let provider = assert_ok!(registry.resolve("openai", "gpt-4o"));
        assert_eq!(provider.provider_id, "openai");
        assert_eq!(provider.kind, ProviderKind::OpenAiCompatible);
    }

    /// Registering the same key twice fails and leaves the registry unchanged
    #[test]
    fn test_duplicate_registration_is_rejected() {
        let registry = RegistryFactory::standard();
        let before = registry.list_models();

        let err = assert_err!(registry.register(ModelEntry::new("openai", "gpt-4o", ModelType::Llm)));
        assert_eq!(
            err,
            DuplicateError::Model {
                provider_id: "openai".to_string(),
                model_id: "gpt-4o".to_string(),
            }
        );
        assert_eq!(registry.list_models(), before);
    }

    /// Credentials with both fields route to the caller's URL
    #[test]
    fn test_request_url_overrides_default() {
        let registry = RegistryFactory::standard();
        let creds = assert_ok!(extract(&ProviderDataFactory::full(
            "https://api.openai.com/custom"
        )));

        let effective = assert_ok!(route("openai/gpt-4o", creds, &registry));
        assert_eq!(effective.resolved_url.as_str(), "https://api.openai.com/custom");
        assert_eq!(
            effective.credentials.upstream_api_key.expose(),
            ProviderDataFactory::API_KEY
        );
    }

    /// Without a request URL the provider default applies
    #[test]
    fn test_default_url_when_request_has_none() {
        let registry = RegistryFactory::standard();
        let creds = assert_ok!(
            CredentialExtractor::with_url_optional().extract(&ProviderDataFactory::key_only())
        );

        let effective = assert_ok!(route("openai/gpt-4o", creds, &registry));
        assert_eq!(effective.resolved_url.as_str(), "https://api.openai.com/");
    }

    /// No URL anywhere is a routing error, not a panic
    #[test]
    fn test_no_upstream_anywhere() {
        let registry = RegistryFactory::standard();
        let creds = assert_ok!(
            CredentialExtractor::with_url_optional().extract(&ProviderDataFactory::key_only())
        );

        let err = assert_err!(route("bare/local-model", creds, &registry));
        assert!(matches!(err, RouteError::NoUpstream { provider_id } if provider_id == "bare"));
    }

    /// Strict extraction names every missing field
    #[test]
    fn test_incomplete_credentials_both_ways() {
        let err = assert_err!(extract(r#"{"upstream_url": "https://api.openai.com"}"#));
        assert_eq!(
            err,
            CredentialError::IncompleteCredentials {
                missing: vec!["upstream_api_key"],
            }
        );

        let err = assert_err!(extract(&ProviderDataFactory::key_only()));
        assert_eq!(
            err,
            CredentialError::IncompleteCredentials {
                missing: vec!["upstream_url"],
            }
        );

        let err = assert_err!(extract("{}"));
        assert_eq!(
            err,
            CredentialError::IncompleteCredentials {
                missing: vec!["upstream_api_key", "upstream_url"],
            }
        );
    }

    /// Unknown models surface as not-found through the router
    #[test]
    fn test_route_unregistered_model() {
        let registry = RegistryFactory::standard();
        let creds = assert_ok!(extract(&ProviderDataFactory::full("https://api.openai.com")));

        let err = assert_err!(route("openai/gpt-5", creds, &registry));
        assert!(matches!(
            err,
            RouteError::NotFound(NotFoundError::Model { .. })
        ));
    }

    /// Private hosts are refused only when the guard is on
    #[test]
    fn test_private_upstream_guard() {
        let registry = RegistryFactory::standard();
        let creds = assert_ok!(extract(&ProviderDataFactory::full("http://169.254.169.254")));

        let guarded = RequestRouter::new().with_private_upstreams_blocked(true);
        let err = assert_err!(guarded.route("openai/gpt-4o", creds.clone(), &registry));
        assert!(matches!(err, RouteError::BlockedUpstream(_)));

        assert_ok!(RequestRouter::new().route("openai/gpt-4o", creds, &registry));
    }

    /// Readers keep resolving while a writer adds models
    #[test]
    fn test_concurrent_resolve_during_registration() {
        let registry = Arc::new(ModelRegistry::new());
        registry
            .register_provider(ProviderRecord::new("p", ProviderKind::OpenAiCompatible))
            .unwrap();
        registry
            .register(ModelEntry::new("p", "base", ModelType::Llm))
            .unwrap();

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for i in 0..200 {
                    registry
                        .register(ModelEntry::new("p", format!("m-{}", i), ModelType::Llm))
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        assert!(registry.resolve("p", "base").is_ok());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(registry.len(), 201);
    }
}
