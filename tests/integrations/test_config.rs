use std::convert::TryInto;
use std::path::PathBuf;

use devserve_core::proxy::http::config::Config;
use devserve_core::raw_config::RawConfig;

#[test]
fn test_yaml_round_trip() {
    let config: Config = serde_yaml::from_str::<RawConfig>(
        r#"
        root: /srv/app
        server:
          port: 3000
          allowed_hosts:
            - b17345212eb8.ngrok-free.app
            - localhost
        resolve:
          alias:
            "@": /srv/app/src
        plugins:
          - name: react
        proxy:
          - prefix: /api/public
            target: http://localhost:7860
            change_origin: true
            rewrite:
              from: /api/public
              to: /api/v1/public
          - prefix: /api
            target: http://localhost:7860
            change_origin: true
        "#,
    )
    .unwrap()
    .try_into()
    .unwrap();

    assert_eq!(config.server.port, 3000);
    assert!(config.server.allowed_hosts.permits("b17345212eb8.ngrok-free.app"));
    assert!(!config.server.allowed_hosts.permits("evil.example.com"));
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.fs.root, PathBuf::from("/srv/app"));
    assert_eq!(config.plugins.len(), 1);
}

#[test]
fn test_json_config_parses() {
    let config: Config = serde_json::from_str::<RawConfig>(
        r#"{
            "server": {"port": 4000},
            "proxy": [
                {"prefix": "/api", "target": "http://127.0.0.1:7860", "change_origin": true}
            ]
        }"#,
    )
    .unwrap()
    .try_into()
    .unwrap();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.rules[0].prefix, "/api");
    assert!(config.rules[0].change_origin);
}

#[test]
fn test_misconfiguration_is_rejected_at_build_time() {
    let cases = vec![
        // target with a path
        r#"{"proxy": [{"prefix": "/api", "target": "http://localhost:7860/api"}]}"#,
        // duplicate prefixes
        r#"{"proxy": [
            {"prefix": "/api", "target": "http://localhost:7860"},
            {"prefix": "/api", "target": "http://localhost:7861"}
        ]}"#,
        // unknown plugin name
        r#"{"plugins": [{"name": "svelte"}]}"#,
        // alias directory must be absolute
        r#"{"resolve": {"alias": {"@": "src"}}}"#,
    ];

    for case in cases {
        let raw: RawConfig = serde_json::from_str(case).unwrap();
        let converted: Result<Config, _> = raw.try_into();
        assert!(converted.is_err(), "expected rejection for {}", case);
    }
}
