//! Command Dispatcher
//!
//! Closed table of host commands. Each variant carries the typed parameters
//! of the operation it runs.

use anyhow::Result;
use clap::Subcommand;

use crate::f5::auth;
use crate::f5::client::{AsmClient, ClientSettings};
use crate::f5::http::AsmHttpClient;
use crate::render::CommandOutput;
use crate::resource::{
    blocking_settings, cookies, file_types, hostnames, methods, policies, urls, whitelist_ips,
};

/// Every command the host can invoke
#[derive(Debug, Clone, Subcommand)]
pub enum HostCommand {
    /// Check the configured credentials against the server
    #[command(name = "test-module")]
    TestModule,
    #[command(flatten)]
    Asm(Command),
}

/// Commands that operate on ASM resources through a logged-in session
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all policies
    #[command(name = "f5-asm-policy-list")]
    PolicyList,
    /// Apply a policy
    #[command(name = "f5-asm-policy-apply")]
    PolicyApply(policies::ApplyPolicy),
    /// Export a policy to a file on the device
    #[command(name = "f5-asm-policy-export-file")]
    PolicyExportFile(policies::ExportPolicy),
    /// Delete a policy
    #[command(name = "f5-asm-policy-delete")]
    PolicyDelete(policies::DeletePolicy),

    /// List the allowed methods of a policy
    #[command(name = "f5-asm-policy-methods-list")]
    MethodsList(methods::ListMethods),
    /// Add an allowed method
    #[command(name = "f5-asm-policy-methods-add")]
    MethodsAdd(methods::AddMethod),
    /// Update an allowed method
    #[command(name = "f5-asm-policy-methods-update")]
    MethodsUpdate(methods::UpdateMethod),
    /// Delete an allowed method
    #[command(name = "f5-asm-policy-methods-delete")]
    MethodsDelete(methods::DeleteMethod),

    /// List the file types of a policy
    #[command(name = "f5-asm-policy-file-type-list")]
    FileTypeList(file_types::ListFileTypes),
    /// Add a file type
    #[command(name = "f5-asm-policy-file-type-add")]
    FileTypeAdd(file_types::AddFileType),
    /// Update a file type
    #[command(name = "f5-asm-policy-file-type-update")]
    FileTypeUpdate(file_types::UpdateFileType),
    /// Delete a file type
    #[command(name = "f5-asm-policy-file-type-delete")]
    FileTypeDelete(file_types::DeleteFileType),

    /// List the cookies of a policy
    #[command(name = "f5-asm-policy-cookies-list")]
    CookiesList(cookies::ListCookies),
    /// Add a cookie
    #[command(name = "f5-asm-policy-cookies-add")]
    CookiesAdd(cookies::AddCookie),
    /// Update a cookie
    #[command(name = "f5-asm-policy-cookies-update")]
    CookiesUpdate(cookies::UpdateCookie),
    /// Delete a cookie
    #[command(name = "f5-asm-policy-cookies-delete")]
    CookiesDelete(cookies::DeleteCookie),

    /// List the host names of a policy
    #[command(name = "f5-asm-policy-hostnames-list")]
    HostnamesList(hostnames::ListHostnames),
    /// Add a host name
    #[command(name = "f5-asm-policy-hostnames-add")]
    HostnamesAdd(hostnames::AddHostname),
    /// Update a host name
    #[command(name = "f5-asm-policy-hostnames-update")]
    HostnamesUpdate(hostnames::UpdateHostname),
    /// Delete a host name
    #[command(name = "f5-asm-policy-hostnames-delete")]
    HostnamesDelete(hostnames::DeleteHostname),

    /// List one blocking-settings category of a policy
    #[command(name = "f5-asm-policy-blocking-settings-list")]
    BlockingSettingsList(blocking_settings::ListBlockingSettings),
    /// Update a blocking-settings entry
    #[command(name = "f5-asm-policy-blocking-settings-update")]
    BlockingSettingsUpdate(blocking_settings::UpdateBlockingSetting),

    /// List the URLs of a policy
    #[command(name = "f5-asm-policy-urls-list")]
    UrlsList(urls::ListUrls),
    /// Add a URL
    #[command(name = "f5-asm-policy-urls-add")]
    UrlsAdd(urls::AddUrl),
    /// Update a URL
    #[command(name = "f5-asm-policy-urls-update")]
    UrlsUpdate(urls::UpdateUrl),
    /// Delete a URL
    #[command(name = "f5-asm-policy-urls-delete")]
    UrlsDelete(urls::DeleteUrl),

    /// List the whitelisted IPs of a policy
    #[command(name = "f5-asm-policy-whitelist-ips-list")]
    WhitelistIpsList(whitelist_ips::ListWhitelistIps),
    /// Whitelist an IP
    #[command(name = "f5-asm-policy-whitelist-ips-add")]
    WhitelistIpsAdd(whitelist_ips::AddWhitelistIp),
    /// Update a whitelisted IP
    #[command(name = "f5-asm-policy-whitelist-ips-update")]
    WhitelistIpsUpdate(whitelist_ips::UpdateWhitelistIp),
    /// Remove a whitelisted IP
    #[command(name = "f5-asm-policy-whitelist-ips-delete")]
    WhitelistIpsDelete(whitelist_ips::DeleteWhitelistIp),
}

impl Command {
    /// Host command name, as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::PolicyList => "f5-asm-policy-list",
            Self::PolicyApply(_) => "f5-asm-policy-apply",
            Self::PolicyExportFile(_) => "f5-asm-policy-export-file",
            Self::PolicyDelete(_) => "f5-asm-policy-delete",
            Self::MethodsList(_) => "f5-asm-policy-methods-list",
            Self::MethodsAdd(_) => "f5-asm-policy-methods-add",
            Self::MethodsUpdate(_) => "f5-asm-policy-methods-update",
            Self::MethodsDelete(_) => "f5-asm-policy-methods-delete",
            Self::FileTypeList(_) => "f5-asm-policy-file-type-list",
            Self::FileTypeAdd(_) => "f5-asm-policy-file-type-add",
            Self::FileTypeUpdate(_) => "f5-asm-policy-file-type-update",
            Self::FileTypeDelete(_) => "f5-asm-policy-file-type-delete",
            Self::CookiesList(_) => "f5-asm-policy-cookies-list",
            Self::CookiesAdd(_) => "f5-asm-policy-cookies-add",
            Self::CookiesUpdate(_) => "f5-asm-policy-cookies-update",
            Self::CookiesDelete(_) => "f5-asm-policy-cookies-delete",
            Self::HostnamesList(_) => "f5-asm-policy-hostnames-list",
            Self::HostnamesAdd(_) => "f5-asm-policy-hostnames-add",
            Self::HostnamesUpdate(_) => "f5-asm-policy-hostnames-update",
            Self::HostnamesDelete(_) => "f5-asm-policy-hostnames-delete",
            Self::BlockingSettingsList(_) => "f5-asm-policy-blocking-settings-list",
            Self::BlockingSettingsUpdate(_) => "f5-asm-policy-blocking-settings-update",
            Self::UrlsList(_) => "f5-asm-policy-urls-list",
            Self::UrlsAdd(_) => "f5-asm-policy-urls-add",
            Self::UrlsUpdate(_) => "f5-asm-policy-urls-update",
            Self::UrlsDelete(_) => "f5-asm-policy-urls-delete",
            Self::WhitelistIpsList(_) => "f5-asm-policy-whitelist-ips-list",
            Self::WhitelistIpsAdd(_) => "f5-asm-policy-whitelist-ips-add",
            Self::WhitelistIpsUpdate(_) => "f5-asm-policy-whitelist-ips-update",
            Self::WhitelistIpsDelete(_) => "f5-asm-policy-whitelist-ips-delete",
        }
    }

    /// Run the command against an authenticated client
    pub async fn execute(self, client: &AsmClient) -> Result<CommandOutput> {
        tracing::info!("Executing {}", self.name());

        match self {
            Self::PolicyList => policies::list(client).await,
            Self::PolicyApply(args) => policies::apply(client, args).await,
            Self::PolicyExportFile(args) => policies::export(client, args).await,
            Self::PolicyDelete(args) => policies::delete(client, args).await,
            Self::MethodsList(args) => methods::list(client, args).await,
            Self::MethodsAdd(args) => methods::add(client, args).await,
            Self::MethodsUpdate(args) => methods::update(client, args).await,
            Self::MethodsDelete(args) => methods::delete(client, args).await,
            Self::FileTypeList(args) => file_types::list(client, args).await,
            Self::FileTypeAdd(args) => file_types::add(client, args).await,
            Self::FileTypeUpdate(args) => file_types::update(client, args).await,
            Self::FileTypeDelete(args) => file_types::delete(client, args).await,
            Self::CookiesList(args) => cookies::list(client, args).await,
            Self::CookiesAdd(args) => cookies::add(client, args).await,
            Self::CookiesUpdate(args) => cookies::update(client, args).await,
            Self::CookiesDelete(args) => cookies::delete(client, args).await,
            Self::HostnamesList(args) => hostnames::list(client, args).await,
            Self::HostnamesAdd(args) => hostnames::add(client, args).await,
            Self::HostnamesUpdate(args) => hostnames::update(client, args).await,
            Self::HostnamesDelete(args) => hostnames::delete(client, args).await,
            Self::BlockingSettingsList(args) => blocking_settings::list(client, args).await,
            Self::BlockingSettingsUpdate(args) => blocking_settings::update(client, args).await,
            Self::UrlsList(args) => urls::list(client, args).await,
            Self::UrlsAdd(args) => urls::add(client, args).await,
            Self::UrlsUpdate(args) => urls::update(client, args).await,
            Self::UrlsDelete(args) => urls::delete(client, args).await,
            Self::WhitelistIpsList(args) => whitelist_ips::list(client, args).await,
            Self::WhitelistIpsAdd(args) => whitelist_ips::add(client, args).await,
            Self::WhitelistIpsUpdate(args) => whitelist_ips::update(client, args).await,
            Self::WhitelistIpsDelete(args) => whitelist_ips::delete(client, args).await,
        }
    }
}

/// Basic-auth credential check; independent of the token session
pub async fn test_module(settings: &ClientSettings) -> Result<CommandOutput> {
    let http = AsmHttpClient::new(settings.transport)?;
    let message = auth::check_credentials(&http, &settings.base_url()?, &settings.credentials).await?;
    Ok(CommandOutput::message(message))
}

/// Why a host command did not produce output
#[derive(Debug)]
pub enum Failure {
    /// Login did not succeed; no command was attempted
    Initialization(anyhow::Error),
    /// The command itself failed
    Command(anyhow::Error),
}

impl Failure {
    /// Text reported to the host
    pub fn message(&self, command: &str) -> String {
        match self {
            Self::Initialization(error) => format!("Initialization error: {:#}", error),
            Self::Command(error) => failure_message(command, error),
        }
    }
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TestModule => "test-module",
            Self::Asm(command) => command.name(),
        }
    }

    /// Log in when needed and run the command
    pub async fn run(self, settings: &ClientSettings) -> Result<CommandOutput, Failure> {
        let command = match self {
            Self::TestModule => return test_module(settings).await.map_err(Failure::Command),
            Self::Asm(command) => command,
        };

        let client = AsmClient::connect(settings)
            .await
            .map_err(Failure::Initialization)?;

        command.execute(&client).await.map_err(Failure::Command)
    }
}

/// Text reported when a command fails
pub fn failure_message(command: &str, error: &anyhow::Error) -> String {
    format!("Failed to execute {} command. Error: {:#}", command, error)
}
