use crate::renderer::OmittedVariables;
use crate::selection::Range;

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

pub const DEFAULT_OUTPUT_PATH: &str = "graphql-response.html";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    #[clap(short = 'e', long, help = "endpoint to pre-fill the endpoint prompt with")]
    endpoint: Option<String>,
    #[clap(short = 'd', long, help = "document whose selection pre-fills the query prompt")]
    document: Option<String>,
    #[clap(
        short = 's',
        long,
        requires = "document",
        value_name = "LINE:COL-LINE:COL",
        help = "selection in the document, 1-based (default: whole document)"
    )]
    selection: Option<Range>,
    #[clap(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_PATH,
        help = "HTML file the response panel is written to"
    )]
    output: PathBuf,
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,
    #[clap(short = 'u', long, help = "username for basic authentication")]
    user: Option<String>,
    #[clap(short = 'w', long, help = "password for basic authentication")]
    password: Option<String>,
    #[clap(short = 'r', long, help = "CA certificate PEM file path")]
    ca_cert: Option<String>,
    #[clap(
        short = 'k',
        long,
        help = "Allow insecure server connections when using SSL"
    )]
    insecure: bool,
    #[clap(
        short = 'H',
        long = "header",
        value_name = "KEY: VALUE",
        help = "HTTP header to send with the request"
    )]
    headers: Vec<String>,
    #[clap(
        long,
        value_enum,
        help = "what to send when no variables are entered [default: absent]"
    )]
    omitted_variables: Option<OmittedVariables>,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug)]
pub struct CommandLineArgs {
    endpoint: Option<String>,
    document: Option<String>,
    selection: Option<Range>,
    output: PathBuf,
    profile: String,
    user: Option<String>,
    password: Option<String>,
    ca_cert: Option<String>,
    insecure: bool,
    headers: HashMap<String, String>,
    omitted_variables: Option<OmittedVariables>,
    verbose: bool,
}

fn vec_to_hashmap(vec: Vec<String>) -> Result<HashMap<String, String>> {
    vec.into_iter()
        .map(|s| match s.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(anyhow!("Invalid header format: {}", s)),
        })
        .collect()
}

impl CommandLineArgs {
    fn from_clap(args: ClapArgs) -> Result<Self> {
        Ok(Self {
            endpoint: args.endpoint,
            document: args.document,
            selection: args.selection,
            output: args.output,
            profile: args.profile,
            user: args.user,
            password: args.password,
            ca_cert: args.ca_cert,
            insecure: args.insecure,
            headers: vec_to_hashmap(args.headers)?,
            omitted_variables: args.omitted_variables,
            verbose: args.verbose,
        })
    }

    pub fn parse() -> Result<Self> {
        Self::from_clap(ClapArgs::parse())
    }

    #[allow(dead_code)]
    pub fn parse_from<I, T>(itr: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    pub fn endpoint(&self) -> Option<&String> {
        self.endpoint.as_ref()
    }

    pub fn document(&self) -> Option<&String> {
        self.document.as_ref()
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn user(&self) -> Option<&String> {
        self.user.as_ref()
    }

    pub fn password(&self) -> Option<&String> {
        self.password.as_ref()
    }

    pub fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn omitted_variables(&self) -> Option<OmittedVariables> {
        self.omitted_variables
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selection::Position;

    const TEST_ENDPOINT: &str = "https://swapi.example.com/graphql";
    const TEST_DOCUMENT: &str = "~/queries/hero.graphql";
    const TEST_SELECTION: &str = "2:1-4:2";
    const TEST_OUTPUT: &str = "/tmp/hero.html";
    const TEST_PROFILE: &str = "staging";
    const TEST_USER: &str = "user";
    const TEST_PASSWORD: &str = "password";
    const TEST_CA_CERT: &str = "/path/to/ca_cert.pem";
    const TEST_HEADER_AUTHORIZATION: &str = "Authorization: Bearer abc:123";
    const TEST_HEADER_USER_AGENT: &str = "User-Agent: gqlview/0.1.0";

    #[test]
    fn test_cli() {
        use clap::CommandFactory;
        ClapArgs::command().debug_assert()
    }

    #[test]
    fn test_parse_args() -> Result<()> {
        let params = vec![
            "gqlview",
            "-e",
            TEST_ENDPOINT,
            "-d",
            TEST_DOCUMENT,
            "-s",
            TEST_SELECTION,
            "-o",
            TEST_OUTPUT,
            "-p",
            TEST_PROFILE,
            "-u",
            TEST_USER,
            "-w",
            TEST_PASSWORD,
            "-r",
            TEST_CA_CERT,
            "-k",
            "-H",
            TEST_HEADER_AUTHORIZATION,
            "-H",
            TEST_HEADER_USER_AGENT,
            "--omitted-variables",
            "empty-object",
            "-v",
        ];
        let args = CommandLineArgs::parse_from(params.iter())?;

        assert_eq!(args.endpoint(), Some(&TEST_ENDPOINT.to_string()));
        assert_eq!(args.document(), Some(&TEST_DOCUMENT.to_string()));
        assert_eq!(
            args.selection().map(|r| (r.start(), r.end())),
            Some((Position::new(1, 0), Position::new(3, 1)))
        );
        assert_eq!(args.output(), &PathBuf::from(TEST_OUTPUT));
        assert_eq!(args.profile(), TEST_PROFILE);
        assert_eq!(args.user(), Some(&TEST_USER.to_string()));
        assert_eq!(args.password(), Some(&TEST_PASSWORD.to_string()));
        assert_eq!(args.ca_cert(), Some(&TEST_CA_CERT.to_string()));
        assert!(args.insecure());
        assert_eq!(args.omitted_variables(), Some(OmittedVariables::EmptyObject));
        assert!(args.verbose());

        assert_eq!(args.headers().len(), 2);
        assert_eq!(args.headers()["Authorization"], "Bearer abc:123");
        assert_eq!(args.headers()["User-Agent"], "gqlview/0.1.0");
        Ok(())
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let args = CommandLineArgs::parse_from(["gqlview"])?;

        assert_eq!(args.endpoint(), None);
        assert_eq!(args.document(), None);
        assert_eq!(args.selection(), None);
        assert_eq!(args.output(), &PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(args.profile(), "default");
        assert!(!args.insecure());
        assert_eq!(args.omitted_variables(), None);
        assert!(args.headers().is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_header() {
        let err = CommandLineArgs::parse_from(["gqlview", "-H", "NoColonHere"]).unwrap_err();
        assert!(err.to_string().contains("Invalid header format"));
    }

    #[test]
    fn test_selection_requires_document() {
        let res = ClapArgs::try_parse_from(["gqlview", "-s", "1:1-1:5"]);
        assert!(res.is_err());
    }
}
