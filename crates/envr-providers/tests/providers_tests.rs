//! Tests for the standard providers wired into an engine

use std::collections::HashMap;
use std::sync::Arc;

use envr_core::{Engine, Settings, ValueError};
use envr_providers::{
    EnvironmentVariableProvider, InstanceProvider, PrecedenceHandler, Properties, PropertyProvider,
    QualifiersProvider, standard_builder,
};
use envr_test_utils::handler::{Decision, RecordingHandler};
use envr_test_utils::provider::FixedProvider;
use envr_test_utils::{int_value, qualifiers, read_i32, read_string};
use envr_types::TypeDescriptor;

fn fake_env(vars: &[(&str, &str)]) -> EnvironmentVariableProvider {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvironmentVariableProvider::new().with_lookup(move |name| vars.get(name).cloned())
}

mod property_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_and_converts() {
        let properties: Properties = [("port", "8080"), ("name", "svc"), ("debug", "true")]
            .into_iter()
            .collect();
        let root = Engine::builder().with_provider(PropertyProvider::new(properties)).build();

        assert_eq!(read_i32(&root.load_str("/port:int").unwrap()), 8080);
        assert_eq!(read_string(&root.load_str("/name:string").unwrap()), "svc");
        assert!(*root.load_str("/debug:bool").unwrap().get_as::<bool>().unwrap());
    }

    #[test]
    fn test_changes_are_visible() {
        let properties = Properties::new();
        let root = Engine::builder()
            .with_provider(PropertyProvider::new(properties.clone()))
            .build();

        let port = root.load_str("/port:int").unwrap();
        assert!(!port.is_deterministic());
        assert!(matches!(port.get_as::<i32>(), Err(ValueError::NoSuchElement { .. })));

        properties.set("port", "9090");
        assert_eq!(read_i32(&port), 9090);
    }

    #[test]
    fn test_unconvertible_value() {
        let properties: Properties = [("port", "eighty")].into_iter().collect();
        let root = Engine::builder().with_provider(PropertyProvider::new(properties)).build();

        let port = root.load_str("/port:int").unwrap();
        assert_eq!(
            port.get().unwrap_err(),
            ValueError::TypeMismatch {
                raw: "eighty".to_string(),
                ty: "int".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_paths_not_served() {
        let properties: Properties = [("port", "8080")].into_iter().collect();
        let root = Engine::builder().with_provider(PropertyProvider::new(properties)).build();

        let nested = root.load_str("/db/port:int").unwrap();
        assert!(matches!(nested.get(), Err(ValueError::NoSuchElement { .. })));
    }
}

mod env_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prefixed_lookup() {
        let env = fake_env(&[("APP_DB_PORT", "5432")]).with_prefix("app");
        let root = Engine::builder().with_provider(env).build();
        assert_eq!(read_i32(&root.load_str("/db.port:int").unwrap()), 5432);
    }

    #[test]
    fn test_property_wins_then_env_fills_in() {
        let properties: Properties = [("port", "8080")].into_iter().collect();
        let root = Engine::builder()
            .with_provider(PropertyProvider::new(properties.clone()))
            .with_provider(fake_env(&[("PORT", "1111"), ("HOST", "example.org")]))
            .with_ambiguity_handler(PrecedenceHandler)
            .build();

        assert_eq!(read_i32(&root.load_str("/port:int").unwrap()), 8080);
        assert_eq!(read_string(&root.load_str("/host:string").unwrap()), "example.org");
    }
}

mod qualifiers_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_root_qualifiers_from_properties() {
        let properties: Properties = [("qualifier.env", "prod"), ("qualifier.region", "eu"), ("port", "1")]
            .into_iter()
            .collect();
        let root = Engine::builder()
            .with_provider(QualifiersProvider::new(properties))
            .build();
        assert_eq!(root.qualifiers(), qualifiers("env=prod;region=eu"));
    }

    #[test]
    fn test_prefix_resolved_through_engine() {
        let properties: Properties = [("qualifierPrefix", "q."), ("q.env", "test"), ("qualifier.env", "prod")]
            .into_iter()
            .collect();
        let root = Engine::builder()
            .with_provider(QualifiersProvider::new(properties.clone()))
            .with_provider(PropertyProvider::new(properties))
            .build();
        assert_eq!(root.qualifiers(), qualifiers("env=test"));
    }

    #[test]
    fn test_default_prefix_override() {
        let properties: Properties = [("ctx.tier", "web")].into_iter().collect();
        let root = Engine::builder()
            .with_provider(QualifiersProvider::new(properties).with_default_prefix("ctx."))
            .build();
        assert_eq!(root.qualifiers(), qualifiers("tier=web"));
    }

    #[test]
    fn test_dropping_root_releases_engine() {
        let properties: Properties = [("qualifier.env", "prod")].into_iter().collect();
        let sentinel = Arc::new(FixedProvider::new("sentinel", TypeDescriptor::int(), int_value("", ":int", 1)));
        let root = standard_builder(Settings::default(), properties)
            .with_shared_provider(sentinel.clone())
            .build();
        assert_eq!(root.qualifiers(), qualifiers("env=prod"));
        assert_eq!(read_i32(&root.load_str("/releaseCheck:int").unwrap()), 1);
        assert!(Arc::strong_count(&sentinel) > 1);

        drop(root);
        assert_eq!(Arc::strong_count(&sentinel), 1);
    }

    #[test]
    fn test_qualified_value_preferred() {
        let root = Engine::builder()
            .with_provider(InstanceProvider::qualifiers(qualifiers("env=prod")))
            .with_provider(FixedProvider::new("any", TypeDescriptor::int(), int_value("", ":int", 1)))
            .with_provider(FixedProvider::new("prod", TypeDescriptor::int(), int_value("env=prod", ":int", 2)))
            .build();
        assert_eq!(read_i32(&root.load_str("/workers:int").unwrap()), 2);
    }
}

mod instance_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use envr_core::object;

    #[test]
    fn test_serves_exact_type_only() {
        let root = Engine::builder()
            .with_provider(InstanceProvider::new(TypeDescriptor::named("Clock"), object("utc".to_string())))
            .build();

        let clock = root.load_str("/clock:Clock").unwrap();
        assert_eq!(*clock.get_as::<String>().unwrap(), "utc");
        let other = root.load_str("/clock:Timer").unwrap();
        assert!(other.get().is_err());
    }

    #[test]
    fn test_qualified_instance() {
        let root = Engine::builder()
            .with_provider(InstanceProvider::qualifiers(qualifiers("env=prod")))
            .with_provider(
                InstanceProvider::new(TypeDescriptor::int(), object(7i32)).with_qualifiers(qualifiers("env=test")),
            )
            .build();
        assert!(root.load_str("/n:int").unwrap().get().is_err());
    }

    #[test]
    fn test_handler_instance_is_bootstrapped() {
        let handler = Arc::new(RecordingHandler::new(Decision::PromoteChallenger));
        let root = Engine::builder()
            .with_provider(InstanceProvider::ambiguity_handler(handler.clone()))
            .with_provider(FixedProvider::new("a", TypeDescriptor::int(), int_value("", "n:int", 1)))
            .with_provider(FixedProvider::new("b", TypeDescriptor::int(), int_value("", "n:int", 2)))
            .build();

        assert_eq!(read_i32(&root.load_str("/n:int").unwrap()), 2);
        assert_eq!(handler.disambiguations(), 1);
    }
}

mod standard_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_seed_properties() {
        let settings = Settings::default()
            .with_property("qualifier.env", "prod")
            .with_property("timeout", "30");
        let root = standard_builder(settings, Properties::new()).build();

        assert_eq!(root.qualifiers(), qualifiers("env=prod"));
        assert_eq!(read_i32(&root.load_str("/timeout:int").unwrap()), 30);
    }

    #[test]
    fn test_settings_reach_engine() {
        let settings = Settings::default().with_max_disambiguation_rounds(2);
        let root = standard_builder(settings, Properties::new()).build();
        assert_eq!(root.engine().settings().max_disambiguation_rounds, Some(2));
    }
}
