//! Declared intent for one convergence run
//!
//! The [`Intent`] is the full parameter set an operator declares: which image
//! and network Tempest should target, which services exist in the cloud and
//! how the remaining options should be set. Nothing in here is resolved yet;
//! names are turned into ids later by the setter reconcilers.
//!
//! Every struct uses `#[serde(default)]` so that a sparse `[intent]` table in
//! the TOML config falls back to the same defaults the manifest used.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the materialized config file
pub const DEFAULT_TEMPEST_CONF_PATH: &str = "/var/lib/tempest/etc/tempest.conf";

/// Default Tempest workspace, used for lock and image directories
pub const DEFAULT_TEMPEST_WORKSPACE: &str = "/var/lib/tempest";

/// Full set of declared parameters for one convergence run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    /// Path of the config file to converge
    pub tempest_conf_path: PathBuf,

    /// Tempest workspace directory
    pub tempest_workspace: String,

    /// Resolve and configure the primary and alternate images
    pub configure_images: bool,

    /// Display name of the primary image
    pub image_name: Option<String>,

    /// Id of the primary image
    pub image_ref: Option<String>,

    /// Display name of the alternate image
    pub image_name_alt: Option<String>,

    /// Id of the alternate image
    pub image_ref_alt: Option<String>,

    /// Resolve and configure the public network
    pub configure_networks: bool,

    /// Whether the networking service is deployed
    pub neutron_available: bool,

    /// Display name of the public network
    pub public_network_name: Option<String>,

    /// Id of the public network
    pub public_network_id: Option<String>,

    /// Id of the public router (empty string means none)
    pub public_router_id: String,

    /// Roles granted to dynamically created test users, in order
    pub tempest_roles: Option<Vec<String>>,

    /// Data processing plugins to test, in order
    pub sahara_plugins: Option<Vec<String>>,

    /// Whether the EC2 API service is deployed
    pub ec2api_available: bool,

    /// EC2 test credential to provision when `ec2api_available` is set
    pub ec2_credentials: Ec2CredentialIntent,

    /// `[auth]` options
    pub auth: AuthIntent,

    /// `[identity]` and `[identity-feature-enabled]` options
    pub identity: IdentityIntent,

    /// `[compute]` and `[compute-feature-enabled]` options
    pub compute: ComputeIntent,

    /// `[validation]` options
    pub validation: ValidationIntent,

    /// Remaining network-related options
    pub network: NetworkIntent,

    /// `[dashboard]` options
    pub dashboard: DashboardIntent,

    /// `[service_available]` flags
    pub services: ServicesIntent,

    /// Tempest's own `[DEFAULT]` logging options
    pub logging: TempestLoggingIntent,

    /// `[scenario]` options
    pub scenario: ScenarioIntent,

    /// Flavor used by database tests
    pub db_flavor_ref: Option<String>,

    /// Database URI used by whitebox tests
    pub whitebox_db_uri: Option<SecretString>,

    /// Directory holding the service CLIs
    pub cli_dir: Option<String>,

    /// Whether volume backup tests run
    pub volume_backup: bool,

    /// Whether image API v1 is enabled
    pub image_api_v1: bool,

    /// Whether image API v2 is enabled
    pub image_api_v2: bool,

    /// Whether service broker tests run
    pub run_service_broker_tests: bool,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            tempest_conf_path: PathBuf::from(DEFAULT_TEMPEST_CONF_PATH),
            tempest_workspace: DEFAULT_TEMPEST_WORKSPACE.to_string(),
            configure_images: true,
            image_name: None,
            image_ref: None,
            image_name_alt: None,
            image_ref_alt: None,
            configure_networks: true,
            neutron_available: false,
            public_network_name: None,
            public_network_id: None,
            public_router_id: String::new(),
            tempest_roles: None,
            sahara_plugins: None,
            ec2api_available: false,
            ec2_credentials: Ec2CredentialIntent::default(),
            auth: AuthIntent::default(),
            identity: IdentityIntent::default(),
            compute: ComputeIntent::default(),
            validation: ValidationIntent::default(),
            network: NetworkIntent::default(),
            dashboard: DashboardIntent::default(),
            services: ServicesIntent::default(),
            logging: TempestLoggingIntent::default(),
            scenario: ScenarioIntent::default(),
            db_flavor_ref: None,
            whitebox_db_uri: None,
            cli_dir: None,
            volume_backup: false,
            image_api_v1: true,
            image_api_v2: true,
            run_service_broker_tests: false,
        }
    }
}

/// EC2 credential to provision for the EC2 API tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ec2CredentialIntent {
    /// Logical name of the credential resource
    pub name: String,

    /// Owning user
    pub user: String,

    /// Owning project
    pub project: String,
}

impl Default for Ec2CredentialIntent {
    fn default() -> Self {
        Self {
            name: "ec2_test_creds".to_string(),
            user: "ec2api-tester".to_string(),
            project: "openstack".to_string(),
        }
    }
}

/// `[auth]` options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthIntent {
    pub admin_domain_name: Option<String>,
    pub admin_password: Option<SecretString>,
    pub admin_project_name: Option<String>,
    pub admin_username: Option<String>,
    pub use_dynamic_credentials: Option<bool>,
}

/// `[identity]` options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityIntent {
    pub admin_role: Option<String>,
    pub auth_version: String,
    pub alt_password: Option<SecretString>,
    pub alt_project_name: Option<String>,
    pub alt_username: Option<String>,
    pub password: Option<SecretString>,
    pub project_name: Option<String>,
    pub uri: Option<String>,
    pub uri_v3: Option<String>,
    pub username: Option<String>,
    pub ca_certificates_file: Option<String>,
    pub disable_ssl_certificate_validation: Option<bool>,
    pub api_v2: bool,
    pub api_v3: bool,
}

impl Default for IdentityIntent {
    fn default() -> Self {
        Self {
            admin_role: None,
            auth_version: "v3".to_string(),
            alt_password: None,
            alt_project_name: None,
            alt_username: None,
            password: None,
            project_name: None,
            uri: None,
            uri_v3: None,
            username: None,
            ca_certificates_file: None,
            disable_ssl_certificate_validation: None,
            api_v2: false,
            api_v3: true,
        }
    }
}

/// `[compute]` options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeIntent {
    pub change_password_available: Option<bool>,
    pub flavor_ref: Option<String>,
    pub flavor_ref_alt: Option<String>,
    pub image_alt_ssh_user: Option<String>,
    pub build_interval: Option<u32>,
    pub resize_available: bool,
    pub attach_encrypted_volume: bool,
}

/// `[validation]` options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationIntent {
    pub image_ssh_user: Option<String>,
    pub run_validation: bool,
}

/// Network options other than the public network itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkIntent {
    pub api_extensions: Option<Vec<String>>,
    pub nameservers: Option<Vec<String>>,
    pub l2gw_switch: Option<String>,
}

/// `[dashboard]` options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardIntent {
    pub login_url: Option<String>,
    pub dashboard_url: Option<String>,
}

/// Which services the cloud under test provides
///
/// Neutron is driven by [`Intent::neutron_available`] because it also gates
/// network resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesIntent {
    pub cinder: bool,
    pub glance: bool,
    pub heat: bool,
    pub ceilometer: bool,
    pub aodh: bool,
    pub aodh_plugin: bool,
    pub bgpvpn: bool,
    pub gnocchi: bool,
    pub panko: bool,
    pub horizon: bool,
    pub l2gw: bool,
    pub magnum: bool,
    pub mistral: bool,
    pub vitrage: bool,
    pub nova: bool,
    pub sahara: bool,
    pub murano: bool,
    pub swift: bool,
    pub trove: bool,
    pub ironic: bool,
    pub watcher: bool,
    pub zaqar: bool,
    pub congress: bool,
    pub designate: bool,
    pub octavia: bool,
    pub barbican: bool,
}

impl Default for ServicesIntent {
    fn default() -> Self {
        Self {
            cinder: true,
            glance: true,
            heat: false,
            ceilometer: false,
            aodh: false,
            aodh_plugin: false,
            bgpvpn: false,
            gnocchi: false,
            panko: false,
            horizon: true,
            l2gw: false,
            magnum: false,
            mistral: false,
            vitrage: false,
            nova: true,
            sahara: false,
            murano: false,
            swift: false,
            trove: false,
            ironic: false,
            watcher: false,
            zaqar: false,
            congress: false,
            designate: false,
            octavia: false,
            barbican: false,
        }
    }
}

/// Tempest's own logging options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempestLoggingIntent {
    pub debug: bool,
    pub log_file: Option<String>,
    pub use_stderr: bool,
    pub use_syslog: bool,
    pub logging_context_format_string: Option<String>,
}

impl Default for TempestLoggingIntent {
    fn default() -> Self {
        Self {
            debug: false,
            log_file: None,
            use_stderr: true,
            use_syslog: false,
            logging_context_format_string: None,
        }
    }
}

/// `[scenario]` options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioIntent {
    /// Image directory; the workspace when unset
    pub img_dir: Option<String>,
    pub img_file: String,
}

impl Default for ScenarioIntent {
    fn default() -> Self {
        Self {
            img_dir: None,
            img_file: "cirros-0.3.5-x86_64-disk.img".to_string(),
        }
    }
}
