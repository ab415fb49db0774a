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

// Headers used by the OVH API.
pub const X_OVH_APPLICATION: &str = "x-ovh-application";
pub const X_OVH_CONSUMER: &str = "x-ovh-consumer";
pub const X_OVH_SIGNATURE: &str = "x-ovh-signature";
pub const X_OVH_TIMESTAMP: &str = "x-ovh-timestamp";

/// Marker prepended to the hex digest of the string to sign.
pub const SIGNATURE_PREFIX: &str = "$1$";
/// Delimiter between the fields of the string to sign.
pub const SIGNATURE_DELIMITER: &str = "+";

/// Body sent and signed when the caller has nothing to send.
pub const EMPTY_JSON_BODY: &[u8] = b"{}";
pub const APPLICATION_JSON: &str = "application/json";

// Paths relative to the versioned base url.
pub const AUTH_TIME_PATH: &str = "auth/time";
pub const AUTH_CREDENTIAL_PATH: &str = "auth/credential";

// Env values used by the OVH credential providers.
pub const OVH_APPLICATION_KEY: &str = "OVH_APPLICATION_KEY";
pub const OVH_APPLICATION_SECRET: &str = "OVH_APPLICATION_SECRET";
pub const OVH_CONSUMER_KEY: &str = "OVH_CONSUMER_KEY";
pub const OVH_ENDPOINT: &str = "OVH_ENDPOINT";
pub const OVH_CONFIG_FILE: &str = "OVH_CONFIG_FILE";

/// Default config file path, in the format shared by the official OVH SDKs.
pub const OVH_CONFIG_PATH: &str = "~/.ovh.conf";

pub const DEFAULT_ENDPOINT_NAME: &str = "ovh-eu";
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Named API endpoints and their base urls.
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("ovh-eu", "https://eu.api.ovh.com"),
    ("ovh-ca", "https://ca.api.ovh.com"),
    ("ovh-us", "https://api.us.ovhcloud.com"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com"),
];
