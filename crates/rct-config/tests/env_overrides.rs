use figment::Jail;
use pretty_assertions::assert_eq;
use rct_config::{ConfigError, RctConfig};

#[test]
fn env_overrides_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("RCT_DATABASE__PATH", "/var/lib/rct/study.db");
        jail.set_env("RCT_SERVER__BIND", "0.0.0.0:9000");
        jail.set_env("RCT_SERVER__API_TOKENS", "[alpha, beta]");

        let config = RctConfig::load().expect("config loads");
        assert_eq!(config.database.path, "/var/lib/rct/study.db");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.api_tokens, vec!["alpha", "beta"]);
        Ok(())
    });
}

#[test]
fn project_toml_is_read_and_env_wins() {
    Jail::expect_with(|jail| {
        jail.create_dir(".rct")?;
        jail.create_file(
            ".rct/config.toml",
            r#"
                [database]
                path = "from-toml.db"

                [media]
                root = "uploads"
            "#,
        )?;
        jail.set_env("RCT_DATABASE__PATH", "from-env.db");

        let config = RctConfig::load().expect("config loads");
        assert_eq!(config.database.path, "from-env.db");
        assert_eq!(config.media.root, std::path::PathBuf::from("uploads"));
        Ok(())
    });
}

#[test]
fn invalid_offset_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("RCT_SERVER__TIME_ZONE_OFFSET_MINUTES", "5000");
        let err = RctConfig::load().expect_err("offset out of range");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
