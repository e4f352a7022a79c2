use crate::facts::sonarcloud::DEFAULT_BASE_URL;
use clap::Args;
use clap::builder::NonEmptyStringValueParser;
use core::fmt;
use url::Url;

/// Credentials and endpoints of the two services involved in a run.
///
/// Every value can come from the command line or from the environment variable
/// named next to it. Missing or empty required values stop the run before any
/// request is made.
#[derive(Args, Clone)]
pub struct Config {
    /// SonarCloud organization whose projects are reported
    #[arg(long, value_name = "ORG", env = "SONARCLOUD_ORG", value_parser = NonEmptyStringValueParser::new())]
    pub sonarcloud_org: String,

    /// SonarCloud user token
    #[arg(long, value_name = "TOKEN", env = "SONARCLOUD_TOKEN", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub sonarcloud_token: String,

    /// SonarCloud server
    #[arg(long, value_name = "URL", env = "SONARCLOUD_URL", default_value = DEFAULT_BASE_URL)]
    pub sonarcloud_url: Url,

    /// Identifier of the Confluence page receiving the report
    #[arg(long, value_name = "ID", env = "CONFLUENCE_PAGEID", value_parser = NonEmptyStringValueParser::new())]
    pub confluence_page_id: String,

    /// Confluence site, e.g. `https://acme.atlassian.net`
    #[arg(long, value_name = "URL", env = "CONFLUENCE_ORG_URL")]
    pub confluence_org_url: Url,

    /// Confluence API token
    #[arg(long, value_name = "KEY", env = "CONFLUENCE_API_KEY", hide_env_values = true, value_parser = NonEmptyStringValueParser::new())]
    pub confluence_api_key: String,

    /// Confluence account the API token belongs to
    #[arg(long, value_name = "USER", env = "CONFLUENCE_USERNAME", value_parser = NonEmptyStringValueParser::new())]
    pub confluence_username: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sonarcloud_org", &self.sonarcloud_org)
            .field("sonarcloud_token", &"<redacted>")
            .field("sonarcloud_url", &self.sonarcloud_url.as_str())
            .field("confluence_page_id", &self.confluence_page_id)
            .field("confluence_org_url", &self.confluence_org_url.as_str())
            .field("confluence_api_key", &"<redacted>")
            .field("confluence_username", &self.confluence_username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    const FULL: [&str; 13] = [
        "test",
        "--sonarcloud-org",
        "acme",
        "--sonarcloud-token",
        "s3cret",
        "--confluence-page-id",
        "123",
        "--confluence-org-url",
        "https://acme.atlassian.net",
        "--confluence-api-key",
        "k3y",
        "--confluence-username",
        "bot@acme.io",
    ];

    #[test]
    fn test_parse_full_config() {
        let cli = TestCli::try_parse_from(FULL).unwrap();
        assert_eq!(cli.config.sonarcloud_org, "acme");
        assert_eq!(cli.config.confluence_page_id, "123");
        assert_eq!(cli.config.confluence_org_url.as_str(), "https://acme.atlassian.net/");
    }

    #[test]
    fn test_sonarcloud_url_default() {
        let cli = TestCli::try_parse_from(FULL).unwrap();
        // An explicit SONARCLOUD_URL in the environment would override the default
        if std::env::var_os("SONARCLOUD_URL").is_none() {
            assert_eq!(cli.config.sonarcloud_url.as_str(), "https://sonarcloud.io/");
        }
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let mut args = FULL;
        args[2] = "";
        assert!(TestCli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_missing_value_is_named_in_error() {
        // The environment variable would fill the gap
        if std::env::var_os("SONARCLOUD_TOKEN").is_some() {
            return;
        }

        let args: Vec<_> = FULL.iter().copied().filter(|a| !matches!(*a, "--sonarcloud-token" | "s3cret")).collect();
        let err = TestCli::try_parse_from(args).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert!(err.to_string().contains("--sonarcloud-token"));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut args = FULL;
        args[8] = "not a url";
        assert!(TestCli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cli = TestCli::try_parse_from(FULL).unwrap();
        let debug = format!("{:?}", cli.config);
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("k3y"));
        assert!(debug.contains("acme"));
    }
}
