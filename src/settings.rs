use crate::cmd::CommandLineArgs;
use crate::ini::IniProfile;
use crate::renderer::OmittedVariables;
use crate::transport::ConnectionProfile;

use std::collections::HashMap;

/// Connection and workflow settings after layering the command line over
/// the profile file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    endpoint: Option<String>,
    user: Option<String>,
    password: Option<String>,
    insecure: bool,
    ca_cert: Option<String>,
    omitted_variables: OmittedVariables,
    headers: HashMap<String, String>,
}

impl Settings {
    pub fn merge(args: &CommandLineArgs, profile: Option<&IniProfile>) -> Self {
        let mut headers = profile.map(|p| p.headers().clone()).unwrap_or_default();
        headers.extend(
            args.headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        Settings {
            endpoint: args
                .endpoint()
                .or_else(|| profile.and_then(|p| p.endpoint()))
                .cloned(),
            user: args
                .user()
                .or_else(|| profile.and_then(|p| p.user()))
                .cloned(),
            password: args
                .password()
                .or_else(|| profile.and_then(|p| p.password()))
                .cloned(),
            insecure: args.insecure() || profile.and_then(|p| p.insecure()).unwrap_or(false),
            ca_cert: args
                .ca_cert()
                .or_else(|| profile.and_then(|p| p.ca_cert()))
                .cloned(),
            omitted_variables: args
                .omitted_variables()
                .or_else(|| profile.and_then(|p| p.omitted_variables()))
                .unwrap_or_default(),
            headers,
        }
    }

    pub fn endpoint(&self) -> Option<&String> {
        self.endpoint.as_ref()
    }

    pub fn omitted_variables(&self) -> OmittedVariables {
        self.omitted_variables
    }
}

impl ConnectionProfile for Settings {
    fn user(&self) -> Option<&String> {
        self.user.as_ref()
    }

    fn password(&self) -> Option<&String> {
        self.password.as_ref()
    }

    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}
