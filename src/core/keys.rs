//! Static key set derived from the intent
//!
//! [`build_plan`] maps a validated intent to every option the run owns other
//! than the setter-owned ones, each with the value it must hold or `None`
//! when it must be absent. The mapping is a pure function so the whole key
//! set can be inspected without touching the file.

use crate::config::SecretString;
use crate::core::validate::ValidatedIntent;
use crate::domain::ids::ConfigKey;
use crate::domain::value::ConfigValue;
use std::collections::BTreeSet;

/// `compute/image_ref`, filled by the image setter
pub fn image_ref_key() -> ConfigKey {
    ConfigKey::from_static("compute", "image_ref")
}

/// `compute/image_ref_alt`, filled by the alternate image setter
pub fn image_ref_alt_key() -> ConfigKey {
    ConfigKey::from_static("compute", "image_ref_alt")
}

/// `network/public_network_id`, filled by the network setter
pub fn public_network_id_key() -> ConfigKey {
    ConfigKey::from_static("network", "public_network_id")
}

/// `aws/aws_access`, filled by the credential provisioner
pub fn aws_access_key() -> ConfigKey {
    ConfigKey::from_static("aws", "aws_access")
}

/// `aws/aws_secret`, filled by the credential provisioner
pub fn aws_secret_key() -> ConfigKey {
    ConfigKey::from_static("aws", "aws_secret")
}

/// Keys owned by a setter; never part of the static plan
pub fn setter_keys() -> [ConfigKey; 3] {
    [image_ref_key(), image_ref_alt_key(), public_network_id_key()]
}

/// Desired state of one statically planned option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOption {
    pub key: ConfigKey,
    /// `None` means the option must be absent
    pub desired: Option<ConfigValue>,
}

#[derive(Default)]
struct PlanBuilder {
    entries: Vec<PlannedOption>,
}

impl PlanBuilder {
    fn push(&mut self, section: &'static str, option: &'static str, desired: Option<ConfigValue>) {
        self.entries.push(PlannedOption {
            key: ConfigKey::from_static(section, option),
            desired,
        });
    }

    fn set(&mut self, section: &'static str, option: &'static str, value: impl Into<ConfigValue>) {
        self.push(section, option, Some(value.into()));
    }

    fn opt_str(&mut self, section: &'static str, option: &'static str, value: &Option<String>) {
        self.push(section, option, value.as_deref().map(ConfigValue::from));
    }

    fn opt_secret(
        &mut self,
        section: &'static str,
        option: &'static str,
        value: &Option<SecretString>,
    ) {
        let desired = value.as_ref().map(|s| ConfigValue::Secret(s.clone()));
        self.push(section, option, desired);
    }

    fn opt_bool(&mut self, section: &'static str, option: &'static str, value: Option<bool>) {
        self.push(section, option, value.map(ConfigValue::Bool));
    }

    fn opt_num(&mut self, section: &'static str, option: &'static str, value: Option<u32>) {
        self.push(section, option, value.map(|n| ConfigValue::scalar(n.to_string())));
    }

    fn or_default(&mut self, section: &'static str, option: &'static str, value: &Option<String>) {
        let desired = value
            .as_deref()
            .map_or(ConfigValue::ServiceDefault, ConfigValue::from);
        self.push(section, option, Some(desired));
    }

    fn list_or_default(
        &mut self,
        section: &'static str,
        option: &'static str,
        value: &Option<Vec<String>>,
    ) {
        let desired = match value {
            Some(items) if !items.is_empty() => ConfigValue::list(items.iter().cloned()),
            _ => ConfigValue::ServiceDefault,
        };
        self.push(section, option, Some(desired));
    }

    fn opt_list(
        &mut self,
        section: &'static str,
        option: &'static str,
        value: &Option<Vec<String>>,
    ) {
        let desired = value
            .as_ref()
            .filter(|items| !items.is_empty())
            .map(|items| ConfigValue::list(items.iter().cloned()));
        self.push(section, option, desired);
    }
}

/// Build the static plan for `validated`
pub fn build_plan(validated: &ValidatedIntent) -> Vec<PlannedOption> {
    let intent = validated.intent();
    let mut plan = PlanBuilder::default();

    let auth = &intent.auth;
    plan.opt_str("auth", "admin_domain_name", &auth.admin_domain_name);
    plan.opt_secret("auth", "admin_password", &auth.admin_password);
    plan.opt_str("auth", "admin_project_name", &auth.admin_project_name);
    plan.opt_str("auth", "admin_username", &auth.admin_username);
    plan.list_or_default("auth", "tempest_roles", &intent.tempest_roles);
    plan.opt_bool("auth", "use_dynamic_credentials", auth.use_dynamic_credentials);

    plan.opt_list("dns", "nameservers", &intent.network.nameservers);

    let compute = &intent.compute;
    plan.opt_bool(
        "compute",
        "change_password_available",
        compute.change_password_available,
    );
    plan.opt_str("compute", "flavor_ref", &compute.flavor_ref);
    plan.opt_str("compute", "flavor_ref_alt", &compute.flavor_ref_alt);
    plan.opt_str("compute", "image_alt_ssh_user", &compute.image_alt_ssh_user);
    plan.opt_num("compute", "build_interval", compute.build_interval);
    plan.set(
        "compute-feature-enabled",
        "attach_encrypted_volume",
        compute.attach_encrypted_volume,
    );
    plan.set("compute-feature-enabled", "resize", compute.resize_available);

    plan.opt_str("validation", "image_ssh_user", &intent.validation.image_ssh_user);
    plan.set("validation", "run_validation", intent.validation.run_validation);

    let identity = &intent.identity;
    plan.opt_str("identity", "admin_role", &identity.admin_role);
    plan.set("identity", "auth_version", identity.auth_version.as_str());
    plan.opt_secret("identity", "alt_password", &identity.alt_password);
    plan.opt_str("identity", "alt_project_name", &identity.alt_project_name);
    plan.opt_str("identity", "alt_username", &identity.alt_username);
    plan.opt_secret("identity", "password", &identity.password);
    plan.opt_str("identity", "project_name", &identity.project_name);
    plan.opt_str("identity", "uri", &identity.uri);
    plan.opt_str("identity", "uri_v3", &identity.uri_v3);
    plan.opt_str("identity", "username", &identity.username);
    plan.opt_str("identity", "ca_certificates_file", &identity.ca_certificates_file);
    plan.opt_bool(
        "identity",
        "disable_ssl_certificate_validation",
        identity.disable_ssl_certificate_validation,
    );
    plan.set("identity-feature-enabled", "api_v2", identity.api_v2);
    plan.set("identity-feature-enabled", "api_v3", identity.api_v3);

    plan.set("image-feature-enabled", "api_v1", intent.image_api_v1);
    plan.set("image-feature-enabled", "api_v2", intent.image_api_v2);

    plan.opt_str("l2gw", "l2gw_switch", &intent.network.l2gw_switch);
    plan.opt_list(
        "network-feature-enabled",
        "api_extensions",
        &intent.network.api_extensions,
    );
    plan.set("network", "public_router_id", intent.public_router_id.as_str());

    plan.opt_str("dashboard", "login_url", &intent.dashboard.login_url);
    plan.opt_str("dashboard", "dashboard_url", &intent.dashboard.dashboard_url);

    plan.or_default("database", "db_flavor_ref", &intent.db_flavor_ref);
    plan.set("volume-feature-enabled", "backup", intent.volume_backup);

    let services = &intent.services;
    for (option, available) in [
        ("cinder", services.cinder),
        ("glance", services.glance),
        ("heat", services.heat),
        ("ceilometer", services.ceilometer),
        ("aodh", services.aodh),
        ("aodh_plugin", services.aodh_plugin),
        ("bgpvpn", services.bgpvpn),
        ("gnocchi", services.gnocchi),
        ("panko", services.panko),
        ("horizon", services.horizon),
        ("l2gw", services.l2gw),
        ("neutron", intent.neutron_available),
        ("mistral", services.mistral),
        ("vitrage", services.vitrage),
        ("nova", services.nova),
        ("sahara", services.sahara),
        ("murano", services.murano),
        ("swift", services.swift),
        ("trove", services.trove),
        ("ironic", services.ironic),
        ("watcher", services.watcher),
        ("zaqar", services.zaqar),
        ("congress", services.congress),
        ("designate", services.designate),
        ("octavia", services.octavia),
        ("barbican", services.barbican),
    ] {
        plan.set("service_available", option, available);
    }

    plan.opt_secret("whitebox", "db_uri", &intent.whitebox_db_uri);
    plan.opt_str("cli", "cli_dir", &intent.cli_dir);
    plan.set("oslo_concurrency", "lock_path", intent.tempest_workspace.as_str());

    let logging = &intent.logging;
    plan.set("DEFAULT", "debug", logging.debug);
    plan.or_default("DEFAULT", "log_file", &logging.log_file);
    plan.set("DEFAULT", "use_stderr", logging.use_stderr);
    plan.set("DEFAULT", "use_syslog", logging.use_syslog);
    plan.or_default(
        "DEFAULT",
        "logging_context_format_string",
        &logging.logging_context_format_string,
    );

    let img_dir = intent
        .scenario
        .img_dir
        .as_deref()
        .unwrap_or(&intent.tempest_workspace);
    plan.set("scenario", "img_dir", img_dir);
    plan.set("scenario", "img_file", intent.scenario.img_file.as_str());

    plan.set(
        "service_broker",
        "run_service_broker_tests",
        intent.run_service_broker_tests,
    );

    if services.sahara {
        plan.opt_list(
            "data-processing-feature-enabled",
            "plugins",
            &intent.sahara_plugins,
        );
    }

    if services.magnum {
        plan.set("magnum", "keypair_id", "default");
    }

    plan.entries
}

/// Every key a run with `validated` may touch, in key order
pub fn plan_keys(validated: &ValidatedIntent) -> BTreeSet<ConfigKey> {
    let mut keys: BTreeSet<ConfigKey> = build_plan(validated).into_iter().map(|p| p.key).collect();
    keys.extend(validated.targets().iter().map(|t| t.key.clone()));
    if validated.intent().ec2api_available {
        keys.insert(aws_access_key());
        keys.insert(aws_secret_key());
    }
    keys
}

/// Renders a plan entry for operators, with secrets redacted
pub fn describe(option: &PlannedOption) -> String {
    match &option.desired {
        Some(value) => format!("{} = {}", option.key, value),
        None => format!("{} (absent)", option.key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::core::validate::validate;
    use crate::domain::intent::Intent;
    use std::str::FromStr;

    fn base() -> Intent {
        Intent {
            image_name: Some("cirros".to_string()),
            image_name_alt: Some("cirros".to_string()),
            ..Intent::default()
        }
    }

    fn desired(intent: Intent, key: &str) -> Option<Option<ConfigValue>> {
        let key = ConfigKey::from_str(key).unwrap();
        build_plan(&validate(intent).unwrap())
            .into_iter()
            .find(|p| p.key == key)
            .map(|p| p.desired)
    }

    #[test]
    fn test_defaults() {
        let check = |key: &str, value: Option<ConfigValue>| {
            assert_eq!(desired(base(), key), Some(value), "{key}");
        };

        check("auth/tempest_roles", Some(ConfigValue::ServiceDefault));
        check("auth/admin_password", None);
        check("identity/auth_version", Some(ConfigValue::scalar("v3")));
        check("identity-feature-enabled/api_v2", Some(false.into()));
        check("identity-feature-enabled/api_v3", Some(true.into()));
        check("image-feature-enabled/api_v1", Some(true.into()));
        check("network/public_router_id", Some(ConfigValue::scalar("")));
        check("database/db_flavor_ref", Some(ConfigValue::ServiceDefault));
        check("service_available/neutron", Some(false.into()));
        check("service_available/cinder", Some(true.into()));
        check("oslo_concurrency/lock_path", Some(ConfigValue::scalar("/var/lib/tempest")));
        check("DEFAULT/log_file", Some(ConfigValue::ServiceDefault));
        check("DEFAULT/use_stderr", Some(true.into()));
        check("scenario/img_dir", Some(ConfigValue::scalar("/var/lib/tempest")));
        check(
            "scenario/img_file",
            Some(ConfigValue::scalar("cirros-0.3.5-x86_64-disk.img")),
        );
        check("dns/nameservers", None);
    }

    #[test]
    fn test_setter_keys_never_planned() {
        let plan = build_plan(&validate(base()).unwrap());
        for key in setter_keys() {
            assert!(plan.iter().all(|p| p.key != key), "{key}");
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let plan = build_plan(&validate(base()).unwrap());
        let unique: BTreeSet<_> = plan.iter().map(|p| p.key.clone()).collect();
        assert_eq!(unique.len(), plan.len());
    }

    #[test]
    fn test_roles_keep_order() {
        let intent = Intent {
            tempest_roles: Some(vec!["Member".to_string(), "creator".to_string()]),
            ..base()
        };
        assert_eq!(
            desired(intent, "auth/tempest_roles").unwrap().unwrap().render(),
            "Member,creator"
        );
    }

    #[test]
    fn test_sahara_plugins_only_with_sahara() {
        let mut intent = Intent {
            sahara_plugins: Some(vec!["vanilla".to_string()]),
            ..base()
        };
        assert_eq!(desired(intent.clone(), "data-processing-feature-enabled/plugins"), None);

        intent.services.sahara = true;
        assert_eq!(
            desired(intent, "data-processing-feature-enabled/plugins")
                .unwrap()
                .unwrap()
                .render(),
            "vanilla"
        );
    }

    #[test]
    fn test_magnum_keypair_only_with_magnum() {
        assert_eq!(desired(base(), "magnum/keypair_id"), None);

        let mut intent = base();
        intent.services.magnum = true;
        assert_eq!(
            desired(intent, "magnum/keypair_id"),
            Some(Some(ConfigValue::scalar("default")))
        );
    }

    #[test]
    fn test_secrets_stay_secret() {
        let mut intent = base();
        intent.auth.admin_password = Some(secret_string("hunter2".to_string()));
        intent.identity.password = Some(secret_string("p1".to_string()));
        intent.whitebox_db_uri = Some(secret_string("mysql://u:p@h/db".to_string()));

        let plan = build_plan(&validate(intent).unwrap());
        for key in ["auth/admin_password", "identity/password", "whitebox/db_uri"] {
            let key = ConfigKey::from_str(key).unwrap();
            let entry = plan.iter().find(|p| p.key == key).unwrap();
            assert!(entry.desired.as_ref().unwrap().is_secret());
            assert!(!describe(entry).contains("hunter2"));
        }
    }

    #[test]
    fn test_plan_keys_include_targets_and_credentials() {
        let mut intent = base();
        intent.ec2api_available = true;
        let keys = plan_keys(&validate(intent).unwrap());

        assert!(keys.contains(&image_ref_key()));
        assert!(keys.contains(&image_ref_alt_key()));
        assert!(!keys.contains(&public_network_id_key()));
        assert!(keys.contains(&aws_access_key()));
        assert!(keys.contains(&aws_secret_key()));
    }

    #[test]
    fn test_describe() {
        let entry = PlannedOption {
            key: ConfigKey::from_str("cli/cli_dir").unwrap(),
            desired: None,
        };
        assert_eq!(describe(&entry), "cli/cli_dir (absent)");
    }
}
