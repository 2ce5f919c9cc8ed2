//! Integration tests for the ASM client using wiremock
//!
//! Each test stands up a mock device, logs in through the real login flow
//! and runs one host command end to end.

use f5asm::commands::{Command, Failure, HostCommand};
use f5asm::config::normalize_origin;
use f5asm::f5::auth::Credentials;
use f5asm::f5::client::ClientSettings;
use f5asm::f5::http::TransportSettings;
use f5asm::resource::{
    blocking_settings, hostnames, methods, policies, urls, whitelist_ips, BlockingEndpoint,
    ResolveMode,
};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-3f9a";
const POLICY_ID: &str = "ABC123";

fn settings(server: &MockServer, mode: ResolveMode) -> ClientSettings {
    ClientSettings {
        origin: normalize_origin(&server.uri()).unwrap(),
        credentials: Credentials::new("admin", "secret"),
        transport: TransportSettings::default(),
        resolve_mode: mode,
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/mgmt/shared/authn/login"))
        .and(body_json(json!({
            "username": "admin",
            "password": "secret",
            "loginProviderName": "tmos"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "admin",
            "token": {"token": TOKEN, "timeout": 1200}
        })))
        .mount(server)
        .await;
}

async fn mount_policy(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/mgmt/tm/asm/policies"))
        .and(query_param("$filter", format!("name eq {}", name)))
        .and(header("X-F5-Auth-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "name": name,
                "plainTextProfileReference": {
                    "link": format!("https://localhost/mgmt/tm/asm/policies/{}/plain-text-profiles?ver=15.1.0", POLICY_ID)
                }
            }]
        })))
        .mount(server)
        .await;
}

fn collection_path(collection: &str) -> String {
    format!("/mgmt/tm/asm/policies/{}/{}", POLICY_ID, collection)
}

mod policy_tests {
    use super::*;

    /// Test an empty policy listing renders the no-data marker
    #[tokio::test]
    async fn test_empty_policy_list_reports_no_data() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/asm/policies"))
            .and(header("X-F5-Auth-Token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::PolicyList)
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap();

        assert_eq!(output.readable, "No data to show.");
        assert!(output.context.is_empty());
        assert_eq!(output.raw, json!({"items": []}));
    }

    /// Test policies render as a table and a context list
    #[tokio::test]
    async fn test_policy_list_renders_table_and_context() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/asm/policies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{
                    "name": "api",
                    "id": POLICY_ID,
                    "active": true,
                    "enforcementMode": "blocking"
                }]
            })))
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::PolicyList)
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap();

        assert!(output.readable.starts_with("### "));
        assert!(output.readable.contains("api"));
        let (key, entries) = output.context.iter().next().unwrap();
        assert!(key.starts_with("f5.ListPolicies"));
        assert_eq!(entries[0]["name"], "api");
        assert_eq!(entries[0]["id"], POLICY_ID);
    }

    /// Test a 404 from the device reaches the failure text
    #[tokio::test]
    async fn test_delete_missing_policy_surfaces_server_error() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/asm/policies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/mgmt/tm/asm/policies/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": 404,
                "message": "Policy not found"
            })))
            .mount(&server)
            .await;

        let command = HostCommand::Asm(Command::PolicyDelete(policies::DeletePolicy {
            policy_name: "ghost".into(),
        }));
        let name = command.name();
        let failure = command
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap_err();

        let message = failure.message(name);
        assert!(matches!(failure, Failure::Command(_)));
        assert!(message.starts_with("Failed to execute f5-asm-policy-delete command. Error: "));
        assert!(message.contains("404"));
        assert!(message.contains("Policy not found"));
    }

    /// Test strict resolution stops before any DELETE is sent
    #[tokio::test]
    async fn test_strict_mode_fails_on_unknown_policy() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/asm/policies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let failure = HostCommand::Asm(Command::PolicyDelete(policies::DeletePolicy {
            policy_name: "ghost".into(),
        }))
        .run(&settings(&server, ResolveMode::Strict))
        .await
        .unwrap_err();

        assert!(failure
            .message("f5-asm-policy-delete")
            .contains("policy 'ghost' not found"));
    }
}

mod member_tests {
    use super::*;

    /// Test whitelist add sends only the fields supplied
    #[tokio::test]
    async fn test_whitelist_add_sends_only_address() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("POST"))
            .and(path(collection_path("whitelist-ips")))
            .and(header("X-F5-Auth-Token", TOKEN))
            .and(body_json(json!({"ipAddress": "10.1.2.3"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "wl-1",
                "ipAddress": "10.1.2.3",
                "ipMask": "255.255.255.255"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::WhitelistIpsAdd(whitelist_ips::AddWhitelistIp {
            policy_name: "api".into(),
            ip_address: "10.1.2.3".into(),
            ip_mask: None,
            options: Default::default(),
        }))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        let entry = output.context.values().next().unwrap();
        assert_eq!(entry["ip-address"], "10.1.2.3");
        assert_eq!(entry["id"], "wl-1");
    }

    /// Test an unresolved hostname is deleted by its literal name
    #[tokio::test]
    async fn test_hostname_delete_falls_back_to_name() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("GET"))
            .and(path(collection_path("host-names")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "other.example.com", "id": "h-9"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("DELETE"))
            .and(path(collection_path("host-names/www.example.com")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "www.example.com",
                "id": "www.example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::HostnamesDelete(hostnames::DeleteHostname {
            policy_name: "api".into(),
            name: "www.example.com".into(),
        }))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        assert!(output.readable.contains("www.example.com"));
    }

    /// Test duplicate names resolve to the last listed id
    #[tokio::test]
    async fn test_method_update_uses_last_matching_id() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("GET"))
            .and(path(collection_path("methods")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"name": "PURGE", "id": "m-old"},
                    {"name": "GET", "id": "m-get"},
                    {"name": "PURGE", "id": "m-new"}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(collection_path("methods/m-new")))
            .and(body_json(json!({"actAsMethod": "POST"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "PURGE",
                "id": "m-new",
                "actAsMethod": "POST"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::MethodsUpdate(methods::UpdateMethod {
            policy_name: "api".into(),
            method_name: "PURGE".into(),
            act_as_method: Some("POST".into()),
        }))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        assert_eq!(output.raw["actAsMethod"], "POST");
    }

    /// Test an empty hostname listing uses its own marker
    #[tokio::test]
    async fn test_empty_hostname_list_uses_nothing_marker() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("GET"))
            .and(path(collection_path("host-names")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::HostnamesList(hostnames::ListHostnames {
            policy_name: "api".into(),
        }))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        assert_eq!(output.readable, "Nothing to show");
        assert!(output.context.is_empty());
    }

    /// Test blocking settings resolve by description under the endpoint path
    #[tokio::test]
    async fn test_blocking_setting_update_resolves_description() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("GET"))
            .and(path(collection_path("blocking-settings/evasions")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"description": "Bad unescape", "id": "ev-1"},
                    {"description": "Directory traversals", "id": "ev-7"}
                ]
            })))
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(collection_path("blocking-settings/evasions/ev-7")))
            .and(header("X-F5-Auth-Token", TOKEN))
            .and(body_json(json!({"enabled": true, "learn": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "description": "Directory traversals",
                "id": "ev-7",
                "enabled": true,
                "learn": false,
                "evasionReference": {"link": "https://localhost/mgmt/tm/asm/evasions/dir"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::BlockingSettingsUpdate(
            blocking_settings::UpdateBlockingSetting {
                policy_name: "api".into(),
                endpoint: BlockingEndpoint::Evasions,
                description: "Directory traversals".into(),
                enabled: Some(true),
                learn: Some(false),
                alarm: None,
                block: None,
            },
        ))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        assert!(output.readable.starts_with("### Modified evasions\n"));
        let entry = output.context.values().next().unwrap();
        assert_eq!(entry["id"], "ev-7");
        assert_eq!(entry["reference"], "https://localhost/mgmt/tm/asm/evasions/dir");
    }

    /// Test URL add posts the defaults under their API names
    #[tokio::test]
    async fn test_url_add_posts_defaults() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        mount_policy(&server, "api").await;

        Mock::given(method("POST"))
            .and(path(collection_path("urls")))
            .and(body_json(json!({
                "name": "/login.php",
                "protocol": "http",
                "description": "",
                "method": "*",
                "type": "explicit",
                "isAllowed": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "/login.php",
                "id": "u-1",
                "protocol": "http"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = HostCommand::Asm(Command::UrlsAdd(urls::AddUrl {
            policy_name: "api".into(),
            name: "/login.php".into(),
            protocol: "http".into(),
            description: String::new(),
            method: "*".into(),
            url_type: "explicit".into(),
            is_allowed: true,
        }))
        .run(&settings(&server, ResolveMode::Lenient))
        .await
        .unwrap();

        assert!(output.readable.starts_with("### URL for selected policy\n"));
        assert_eq!(output.raw["id"], "u-1");
    }
}

mod session_tests {
    use super::*;

    /// Test a rejected login is reported before any command runs
    #[tokio::test]
    async fn test_rejected_login_is_initialization_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/mgmt/shared/authn/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "message": "Authentication failed."
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let failure = HostCommand::Asm(Command::PolicyList)
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap_err();

        assert!(matches!(failure, Failure::Initialization(_)));
        assert!(failure
            .message("f5-asm-policy-list")
            .starts_with("Initialization error: "));
    }

    /// Test credential check succeeds with basic auth
    #[tokio::test]
    async fn test_module_reports_ok() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/sys/version"))
            .and(basic_auth("admin", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": {}})))
            .mount(&server)
            .await;

        let output = HostCommand::TestModule
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap();

        assert_eq!(output.readable, "ok");
    }

    /// Test credential check reports a 401 as invalid credentials
    #[tokio::test]
    async fn test_module_reports_bad_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/mgmt/tm/sys/version"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let output = HostCommand::TestModule
            .run(&settings(&server, ResolveMode::Lenient))
            .await
            .unwrap();

        assert_eq!(
            output.readable,
            "Invalid credentials given.\nError: 401: Unauthorized"
        );
    }
}
