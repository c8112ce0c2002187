use crate::renderer::OmittedVariables;

use anyhow::{Context, Result};
use ini::{Ini, Properties};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.gqlview";
pub const DEFAULT_INI_SECTION: &str = "default";

const INI_ENDPOINT: &str = "endpoint";
const INI_USER: &str = "user";
const INI_PASSWORD: &str = "password";
const INI_CA_CERT: &str = "ca_cert";
const INI_INSECURE: &str = "insecure";
const INI_OMITTED_VARIABLES: &str = "omitted_variables";

/// One `[section]` of the profile file. Keys starting with `@` are request
/// headers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IniProfile {
    endpoint: Option<String>,
    user: Option<String>,
    password: Option<String>,
    insecure: Option<bool>,
    ca_cert: Option<String>,
    omitted_variables: Option<OmittedVariables>,
    headers: HashMap<String, String>,
}

impl IniProfile {
    pub fn endpoint(&self) -> Option<&String> {
        self.endpoint.as_ref()
    }

    pub fn user(&self) -> Option<&String> {
        self.user.as_ref()
    }

    pub fn password(&self) -> Option<&String> {
        self.password.as_ref()
    }

    pub fn insecure(&self) -> Option<bool> {
        self.insecure
    }

    pub fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    pub fn omitted_variables(&self) -> Option<OmittedVariables> {
        self.omitted_variables
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

pub struct IniProfileStore;

impl IniProfileStore {
    /// Loads `name` from `file_path`. A missing file or section is not an
    /// error; a malformed value is.
    pub fn load_profile(file_path: &str, name: &str) -> Result<Option<IniProfile>> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            debug!(path = %extended_path, "profile file not found");
            return Ok(None);
        }
        let ini = Ini::load_from_file(&extended_path)
            .with_context(|| format!("Failed to read profile file {extended_path}"))?;
        let section = match ini.section(Some(name)) {
            Some(s) => s,
            None => {
                debug!(path = %extended_path, profile = name, "profile section not found");
                return Ok(None);
            }
        };

        fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
        where
            T: std::str::FromStr,
            T::Err: std::fmt::Display,
        {
            section
                .get(key)
                .map(|s| {
                    s.trim()
                        .parse::<T>()
                        .map_err(|e| anyhow::anyhow!("Invalid value for '{key}': {e}"))
                })
                .transpose()
        }

        let headers = section
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix('@')
                    .map(|k| (k.trim().to_string(), value.trim().to_string()))
            })
            .collect::<HashMap<String, String>>();

        Ok(Some(IniProfile {
            endpoint: try_get(section, INI_ENDPOINT)?,
            user: try_get(section, INI_USER)?,
            password: try_get(section, INI_PASSWORD)?,
            insecure: try_get::<bool>(section, INI_INSECURE)?,
            ca_cert: try_get(section, INI_CA_CERT)?,
            omitted_variables: try_get::<OmittedVariables>(section, INI_OMITTED_VARIABLES)?,
            headers,
        }))
    }
}
