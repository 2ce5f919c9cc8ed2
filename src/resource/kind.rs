//! Policy sub-resource collections
//!
//! Each collection knows its path below `policies/{id}/`, the field that
//! carries its natural key, and a label used in logs and strict-mode errors.

use std::borrow::Cow;
use std::fmt;

use clap::ValueEnum;

/// Blocking-settings category
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockingEndpoint {
    Evasions,
    Violations,
    WebServicesSecurities,
    HttpProtocols,
}

impl BlockingEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Evasions => "evasions",
            Self::Violations => "violations",
            Self::WebServicesSecurities => "web-services-securities",
            Self::HttpProtocols => "http-protocols",
        }
    }

    /// Field linking an entry to the setting definition it configures
    pub fn reference_field(&self) -> &'static str {
        match self {
            Self::Evasions => "evasionReference",
            Self::Violations => "violationReference",
            Self::WebServicesSecurities => "webServicesSecurityReference",
            Self::HttpProtocols => "httpProtocolReference",
        }
    }

    /// Endpoint name with the first letter upper-cased
    pub fn title(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for BlockingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A collection scoped to one policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Methods,
    FileTypes,
    HostNames,
    Cookies,
    Urls,
    WhitelistIps,
    BlockingSettings(BlockingEndpoint),
}

impl Collection {
    /// Path below `policies/{id}/`
    pub fn path(&self) -> Cow<'static, str> {
        match self {
            Self::Methods => Cow::Borrowed("methods"),
            Self::FileTypes => Cow::Borrowed("filetypes"),
            Self::HostNames => Cow::Borrowed("host-names"),
            Self::Cookies => Cow::Borrowed("cookies"),
            Self::Urls => Cow::Borrowed("urls"),
            Self::WhitelistIps => Cow::Borrowed("whitelist-ips"),
            Self::BlockingSettings(endpoint) => {
                Cow::Owned(format!("blocking-settings/{}", endpoint.as_str()))
            }
        }
    }

    /// Field compared against the caller's natural key during resolution
    pub fn key_field(&self) -> &'static str {
        match self {
            Self::WhitelistIps => "ipAddress",
            Self::BlockingSettings(_) => "description",
            _ => "name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Methods => "method",
            Self::FileTypes => "file type",
            Self::HostNames => "hostname",
            Self::Cookies => "cookie",
            Self::Urls => "URL",
            Self::WhitelistIps => "whitelisted IP",
            Self::BlockingSettings(_) => "blocking setting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_paths() {
        assert_eq!(Collection::FileTypes.path(), "filetypes");
        assert_eq!(Collection::WhitelistIps.path(), "whitelist-ips");
        assert_eq!(
            Collection::BlockingSettings(BlockingEndpoint::HttpProtocols).path(),
            "blocking-settings/http-protocols"
        );
    }

    #[test]
    fn test_key_fields() {
        assert_eq!(Collection::Methods.key_field(), "name");
        assert_eq!(Collection::WhitelistIps.key_field(), "ipAddress");
        assert_eq!(
            Collection::BlockingSettings(BlockingEndpoint::Evasions).key_field(),
            "description"
        );
    }

    #[test]
    fn test_endpoint_title_capitalizes_first_letter_only() {
        assert_eq!(BlockingEndpoint::Evasions.title(), "Evasions");
        assert_eq!(
            BlockingEndpoint::WebServicesSecurities.title(),
            "Web-services-securities"
        );
    }

    #[test]
    fn test_endpoint_cli_names_match_api_paths() {
        for endpoint in BlockingEndpoint::value_variants() {
            let name = endpoint.to_possible_value().unwrap();
            assert_eq!(name.get_name(), endpoint.as_str());
        }
    }
}
