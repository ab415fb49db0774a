// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::constants::*;
use crate::Endpoint;
use ini::Ini;
use log::debug;
use ovhsign_core::utils::Redact;
use ovhsign_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// Config for the OVH API.
///
/// Every field is optional; unset fields fall back to the config file or to
/// the defaults.
#[derive(Clone, Default)]
pub struct Config {
    /// Application key of the OVH application.
    pub application_key: Option<String>,
    /// Application secret of the OVH application.
    pub application_secret: Option<String>,
    /// Consumer key obtained through provisioning.
    pub consumer_key: Option<String>,
    /// Endpoint name such as `ovh-eu`.
    pub endpoint: Option<String>,
    /// Path of the `ovh.conf` file.
    pub config_file: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("application_key", &self.application_key)
            .field("application_secret", &Redact::from(&self.application_secret))
            .field("consumer_key", &Redact::from(&self.consumer_key))
            .field("endpoint", &self.endpoint)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl Config {
    /// Fill unset fields from environment variables.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        for (key, field) in [
            (OVH_APPLICATION_KEY, &mut self.application_key),
            (OVH_APPLICATION_SECRET, &mut self.application_secret),
            (OVH_CONSUMER_KEY, &mut self.consumer_key),
            (OVH_ENDPOINT, &mut self.endpoint),
            (OVH_CONFIG_FILE, &mut self.config_file),
        ] {
            if field.is_none() {
                *field = ctx.env_var(key);
            }
        }

        self
    }

    /// Fill an unset endpoint from `endpoint` in the `[default]` section of
    /// the `ovh.conf` file.
    ///
    /// Call it after [`Config::from_env`] so that `OVH_ENDPOINT` and
    /// `OVH_CONFIG_FILE` take precedence, the same order
    /// [`ConfigFileCredentialProvider`](crate::ConfigFileCredentialProvider)
    /// uses to pick its section.
    pub async fn from_config_file(mut self, ctx: &Context) -> Result<Self> {
        if self.endpoint.is_some() {
            return Ok(self);
        }

        if let Some((_, ini)) = load_config_file(ctx, self.config_file.as_deref()).await? {
            self.endpoint = default_endpoint(&ini);
        }
        Ok(self)
    }

    /// Resolve the configured endpoint, `ovh-eu` if none is set.
    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::from_name(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT_NAME))
    }
}

/// Load the `ovh.conf` file at `path`, `OVH_CONFIG_FILE` or `~/.ovh.conf`.
///
/// An unreadable file is `None`; a malformed one is `ConfigInvalid`.
pub(crate) async fn load_config_file(
    ctx: &Context,
    path: Option<&str>,
) -> Result<Option<(String, Ini)>> {
    let config_file = path
        .map(|v| v.to_string())
        .or_else(|| ctx.env_var(OVH_CONFIG_FILE))
        .unwrap_or_else(|| OVH_CONFIG_PATH.to_string());
    let Some(path) = ctx.expand_home_dir(&config_file) else {
        debug!("cannot expand {config_file}: home directory unknown");
        return Ok(None);
    };

    let content = match ctx.file_read_as_string(&path).await {
        Ok(content) => content,
        Err(err) => {
            debug!("OVH config file not readable at {path}: {err}");
            return Ok(None);
        }
    };

    let ini = Ini::load_from_str(&content).map_err(|e| {
        Error::config_invalid("failed to parse OVH config file")
            .with_source(e)
            .with_context(format!("path: {path}"))
    })?;
    Ok(Some((path, ini)))
}

/// `endpoint` of the `[default]` section.
pub(crate) fn default_endpoint(ini: &Ini) -> Option<String> {
    ini.section(Some("default"))
        .and_then(|s| s.get("endpoint"))
        .map(|s| s.to_string())
}
