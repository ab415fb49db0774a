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

use crate::{Config, Credential};
use async_trait::async_trait;
use log::debug;
use ovhsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the OVH credential from environment variables.
///
/// This provider looks for the following environment variables:
/// - `OVH_APPLICATION_KEY`: The application key
/// - `OVH_APPLICATION_SECRET`: The application secret
/// - `OVH_CONSUMER_KEY`: The consumer key (optional)
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider {}

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = Config::default().from_env(ctx);

        match (config.application_key, config.application_secret) {
            (Some(ak), Some(as_)) if !ak.is_empty() && !as_.is_empty() => {
                debug!("loading credential from environment variables");
                Ok(Some(Credential {
                    application_key: ak,
                    application_secret: as_,
                    consumer_key: config.consumer_key,
                }))
            }
            _ => Ok(None),
        }
    }
}
