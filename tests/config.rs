// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, defaults, env-backed secrets, and discovery.

use slipway::config::*;
use slipway::error::Error;
use std::path::PathBuf;
use std::time::Duration;

const MINIMAL: &str = r#"
registry:
  host: gcr.io
  project: acme-prod
notify:
  admin: ops@acme.test
  sender: deploy@acme.test
  password: hunter2
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config_applies_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.registry.host, "gcr.io");
        assert_eq!(config.registry.project, "acme-prod");
        assert_eq!(config.notify.smtp_host, "smtp.gmail.com");
        assert_eq!(config.notify.smtp_port, 587);
        assert_eq!(config.notify.subject, "Deployment Status");
        assert_eq!(config.notify.timeout, Duration::from_secs(30));
        assert_eq!(config.layout.modules_dir, PathBuf::from("modules"));
        assert_eq!(config.layout.staging_dir, PathBuf::from("build"));
        assert_eq!(config.cluster.replicas, 2);
        assert_eq!(config.cluster.env_var, "MODULE_NUMBER");
        assert!(config.lint.is_none());
        assert!(config.runtime.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
version: "3"
registry:
  host: registry.acme.test
  project: platform
  auth:
    username: ci
    password:
      env: REGISTRY_TOKEN
notify:
  admin: ops@acme.test
  sender: deploy@acme.test
  password:
    env: SMTP_PASSWORD
    default: fallback
  smtp_host: mail.acme.test
  smtp_port: 2525
  timeout: 1m
layout:
  modules_dir: services
  staging_dir: .stage
  dockerfile: ops/Dockerfile
  base_files: [main.py]
  start_command: ["python3", "-m", "svc", "{module}"]
cluster:
  kubectl: /usr/local/bin/kubectl
  namespace: prod
  replicas: 3
  env_var: SERVICE_ID
lint:
  image: registry.acme.test/tools/pylint:2
runtime:
  socket: /run/user/1000/podman/podman.sock
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.version, "3");
        assert_eq!(config.notify.timeout, Duration::from_secs(60));
        assert_eq!(config.layout.base_files, vec!["main.py"]);
        assert_eq!(
            config.layout.start_command_for("12"),
            vec!["python3", "-m", "svc", "12"]
        );
        assert_eq!(config.cluster.namespace.as_deref(), Some("prod"));

        let lint = config.lint.unwrap();
        assert_eq!(lint.image.registry(), Some("registry.acme.test"));
        assert_eq!(lint.image.tag(), "2");

        let auth = config.registry.auth.unwrap();
        assert_eq!(auth.username, "ci");
        assert!(matches!(auth.password, EnvValue::FromEnv { .. }));
    }

    #[test]
    fn lint_section_defaults_image() {
        let yaml = format!("{MINIMAL}lint: {{}}\n");
        let config = Config::from_yaml(&yaml).unwrap();
        let lint = config.lint.unwrap();

        assert_eq!(lint.image.name(), "cozero/linter-python3-pylint");
        assert_eq!(lint.image.tag(), "latest");
    }

    #[test]
    fn empty_start_command_is_rejected() {
        let yaml = format!("{MINIMAL}layout:\n  start_command: []\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }
}

mod validation {
    use super::*;

    #[test]
    fn minimal_config_is_valid() {
        Config::from_yaml(MINIMAL).unwrap().validate().unwrap();
    }

    #[test]
    fn missing_recipient_names_the_field() {
        let yaml = MINIMAL.replace("admin: ops@acme.test", "admin: \"\"");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();

        assert!(matches!(err, Error::MissingSetting("notify.admin")));
        assert!(err.to_string().contains("notify.admin"));
    }

    #[test]
    fn password_from_unset_env_is_missing() {
        let yaml = MINIMAL.replace(
            "password: hunter2",
            "password:\n    env: SLIPWAY_TEST_UNSET_PASSWORD",
        );
        let config = Config::from_yaml(&yaml).unwrap();

        temp_env::with_var_unset("SLIPWAY_TEST_UNSET_PASSWORD", || {
            assert!(config.validate().is_err());
        });
    }

    #[test]
    fn password_from_env_is_resolved() {
        let yaml = MINIMAL.replace(
            "password: hunter2",
            "password:\n    env: SLIPWAY_TEST_SET_PASSWORD",
        );
        let config = Config::from_yaml(&yaml).unwrap();

        temp_env::with_var("SLIPWAY_TEST_SET_PASSWORD", Some("s3cret"), || {
            config.validate().unwrap();
            assert_eq!(config.notify.password.resolve().unwrap(), "s3cret");
        });
    }
}

mod discovery {
    use super::*;

    #[test]
    fn discovers_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slipway.yml"), MINIMAL).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.registry.project, "acme-prod");
    }

    #[test]
    fn discovers_dot_directory_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".slipway")).unwrap();
        std::fs::write(dir.path().join(".slipway/config.yml"), MINIMAL).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}
