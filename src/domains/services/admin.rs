//! Admin service - CRUD over the config store plus tool refresh and test.
//!
//! Every operation reloads the store from disk before use and writes the
//! full list back after a mutation. There is no isolation between two
//! concurrent requests: the last writer wins.

use std::collections::HashSet;
use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::error::{ServiceError, ServiceResult};
use super::model::ServiceDefinition;
use super::store::ServiceStore;
use crate::domains::tools::{ApiTool, RequestExecutor, SharedTool, ToolError, ToolRegistry};

/// How a refresh reacts to a definition that cannot be synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Abort on the first failure and leave the registry untouched.
    #[default]
    AllOrNothing,

    /// Register everything that synthesizes and report the rest.
    BestEffort,
}

impl RefreshPolicy {
    /// Parse a policy name (`all_or_nothing` or `best_effort`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" => Some(Self::AllOrNothing),
            "best_effort" => Some(Self::BestEffort),
            _ => None,
        }
    }
}

/// Outcome of a successful refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshReport {
    /// Names of the tools now registered, in store order.
    pub registered: Vec<String>,

    /// Definitions skipped under [`RefreshPolicy::BestEffort`].
    pub failed: Vec<RefreshFailure>,
}

/// A definition that could not be turned into a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshFailure {
    pub name: String,
    pub error: String,
}

/// Admin operations over service definitions.
pub struct AdminService {
    store: ServiceStore,
    registry: Arc<ToolRegistry>,
    executor: RequestExecutor,
    policy: RefreshPolicy,
}

impl AdminService {
    /// Create a new admin service.
    pub fn new(
        store: ServiceStore,
        registry: Arc<ToolRegistry>,
        executor: RequestExecutor,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            store,
            registry,
            executor,
            policy,
        }
    }

    /// The registry refreshed by this service.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// List every stored definition.
    pub async fn list(&self) -> ServiceResult<Vec<ServiceDefinition>> {
        self.store.load().await
    }

    /// Get one definition by name.
    pub async fn get(&self, name: &str) -> ServiceResult<ServiceDefinition> {
        self.store
            .load()
            .await?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ServiceError::not_found(name))
    }

    /// Append a new definition.
    ///
    /// Rejects definitions missing a required field or whose name is
    /// already taken. The store is not touched on rejection.
    #[instrument(skip(self, service), fields(name = %service.name))]
    pub async fn create(&self, service: ServiceDefinition) -> ServiceResult<ServiceDefinition> {
        validate(&service)?;

        let mut services = self.store.load().await?;
        if services.iter().any(|s| s.name == service.name) {
            return Err(ServiceError::DuplicateName(service.name));
        }

        services.push(service.clone());
        self.store.save(&services).await?;

        info!("Created service '{}'", service.name);
        Ok(service)
    }

    /// Replace the definition stored under `name`.
    #[instrument(skip(self, service))]
    pub async fn update(&self, name: &str, service: ServiceDefinition) -> ServiceResult<ServiceDefinition> {
        validate(&service)?;

        let mut services = self.store.load().await?;
        let index = services
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ServiceError::not_found(name))?;

        if service.name != name && services.iter().any(|s| s.name == service.name) {
            return Err(ServiceError::DuplicateName(service.name));
        }

        services[index] = service.clone();
        self.store.save(&services).await?;

        info!("Updated service '{}'", name);
        Ok(service)
    }

    /// Remove the definition stored under `name`.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> ServiceResult<()> {
        let mut services = self.store.load().await?;
        let index = services
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ServiceError::not_found(name))?;

        services.remove(index);
        self.store.save(&services).await?;

        info!("Deleted service '{}'", name);
        Ok(())
    }

    /// Rebuild and re-register a tool for every active definition.
    ///
    /// Tools for inactive or deleted definitions are dropped from the
    /// registry. Failure handling follows the configured policy.
    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub async fn refresh(&self) -> ServiceResult<RefreshReport> {
        let services = self.store.load().await?;

        let mut tools: Vec<SharedTool> = Vec::new();
        let mut report = RefreshReport::default();
        let mut seen = HashSet::new();

        for service in services.into_iter().filter(|s| s.is_active) {
            let name = service.name.clone();
            // First definition wins a name; later ones are failures.
            let synthesized = if seen.contains(&name) {
                Err(ToolError::duplicate(&name))
            } else {
                ApiTool::synthesize(service, self.executor.clone())
            };

            match synthesized {
                Ok(tool) => {
                    seen.insert(name.clone());
                    report.registered.push(name);
                    tools.push(Arc::new(tool));
                }
                Err(e) => match self.policy {
                    RefreshPolicy::AllOrNothing => {
                        warn!("Refresh aborted at service '{}': {}", name, e);
                        return Err(ServiceError::synthesis(name, e));
                    }
                    RefreshPolicy::BestEffort => {
                        warn!("Skipping service '{}': {}", name, e);
                        report.failed.push(RefreshFailure {
                            name,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        self.registry.replace_all(tools);
        Ok(report)
    }

    /// Synthesize a tool for `name` and invoke it once with `params`.
    ///
    /// Nothing is persisted or registered. Works for inactive definitions.
    #[instrument(skip(self, params))]
    pub async fn test(&self, name: &str, params: &JsonObject) -> ServiceResult<Value> {
        let service = self.get(name).await?;
        let tool = ApiTool::synthesize(service, self.executor.clone()).map_err(|e| match e {
            ToolError::InvalidServiceDefinition { .. } => ServiceError::InvalidDefinition(e.to_string()),
            other => ServiceError::synthesis(name, other),
        })?;

        Ok(tool.invoke(params).await)
    }
}

fn validate(service: &ServiceDefinition) -> ServiceResult<()> {
    let missing = service.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::InvalidDefinition(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEED: &str = r#"
api_services:
  - name: alpha
    auth_type: none
    endpoint: http://127.0.0.1:1/alpha
    request:
      params:
        q: one
  - name: beta
    auth_type: none
    endpoint: http://127.0.0.1:1/beta
    is_active: false
"#;

    fn admin_with(seed: &str, policy: RefreshPolicy) -> (TempDir, AdminService) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, seed).unwrap();
        let admin = AdminService::new(
            ServiceStore::new(path),
            Arc::new(ToolRegistry::new()),
            RequestExecutor::new(),
            policy,
        );
        (dir, admin)
    }

    fn definition(name: &str, endpoint: &str) -> ServiceDefinition {
        serde_json::from_value(json!({
            "name": name,
            "auth_type": "none",
            "endpoint": endpoint
        }))
        .unwrap()
    }

    async fn names(admin: &AdminService) -> Vec<String> {
        admin.list().await.unwrap().into_iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(RefreshPolicy::parse("all_or_nothing"), Some(RefreshPolicy::AllOrNothing));
        assert_eq!(RefreshPolicy::parse("Best-Effort"), Some(RefreshPolicy::BestEffort));
        assert_eq!(RefreshPolicy::parse("sometimes"), None);
    }

    #[tokio::test]
    async fn test_get_and_not_found() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        assert_eq!(admin.get("beta").await.unwrap().name, "beta");
        assert!(matches!(
            admin.get("gamma").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_create_appends_and_persists() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        admin
            .create(definition("gamma", "http://localhost/gamma"))
            .await
            .unwrap();

        assert_eq!(names(&admin).await, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_create_duplicate_leaves_store_unchanged() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);
        let before = admin.list().await.unwrap();

        let err = admin
            .create(definition("alpha", "http://elsewhere"))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::DuplicateName(name) if name == "alpha"));
        assert_eq!(admin.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_create_missing_fields_rejected() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        let err = admin.create(definition("gamma", "")).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidDefinition(_)));
        assert_eq!(names(&admin).await, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        let mut replacement = definition("alpha", "http://localhost/new");
        replacement.description = "replaced".to_string();
        admin.update("alpha", replacement).await.unwrap();

        let alpha = admin.get("alpha").await.unwrap();
        assert_eq!(alpha.endpoint, "http://localhost/new");
        assert_eq!(alpha.description, "replaced");
        assert!(alpha.request.params.is_empty());
        assert_eq!(names(&admin).await, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        let err = admin
            .update("gamma", definition("gamma", "http://localhost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = admin
            .update("alpha", definition("beta", "http://localhost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_delete_then_reload() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        admin.delete("alpha").await.unwrap();
        assert_eq!(names(&admin).await, vec!["beta"]);

        assert!(matches!(
            admin.delete("alpha").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_refresh_registers_active_only() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);

        let report = admin.refresh().await.unwrap();

        assert_eq!(report.registered, vec!["alpha"]);
        assert!(report.failed.is_empty());
        assert_eq!(admin.registry().names(), vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_refresh_drops_deleted_tools() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);
        admin.refresh().await.unwrap();

        admin.delete("alpha").await.unwrap();
        assert_eq!(admin.registry().names(), vec!["alpha"]);

        admin.refresh().await.unwrap();
        assert!(admin.registry().is_empty());
    }

    const BROKEN: &str = r#"
api_services:
  - name: good
    auth_type: none
    endpoint: http://localhost/good
  - name: broken
    auth_type: none
  - name: later
    auth_type: basic
    endpoint: http://localhost/later
"#;

    #[tokio::test]
    async fn test_refresh_all_or_nothing_aborts() {
        let (_dir, admin) = admin_with(BROKEN, RefreshPolicy::AllOrNothing);
        admin.registry().register(Arc::new(
            ApiTool::synthesize(definition("previous", "http://localhost"), RequestExecutor::new())
                .unwrap(),
        ));

        let err = admin.refresh().await.unwrap_err();

        assert!(matches!(err, ServiceError::Synthesis { ref name, .. } if name == "broken"));
        assert_eq!(admin.registry().names(), vec!["previous"]);
    }

    #[tokio::test]
    async fn test_refresh_best_effort_reports_failures() {
        let (_dir, admin) = admin_with(BROKEN, RefreshPolicy::BestEffort);

        let report = admin.refresh().await.unwrap();

        assert_eq!(report.registered, vec!["good", "later"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "broken");
        assert_eq!(admin.registry().names(), vec!["good", "later"]);
    }

    const DUPLICATED: &str = r#"
api_services:
  - name: a
    auth_type: none
    endpoint: http://localhost/first
  - name: b
    auth_type: none
    endpoint: http://localhost/b
  - name: a
    auth_type: none
    endpoint: http://localhost/second
"#;

    #[tokio::test]
    async fn test_refresh_duplicate_name_aborts() {
        let (_dir, admin) = admin_with(DUPLICATED, RefreshPolicy::AllOrNothing);

        let err = admin.refresh().await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Synthesis { ref name, source: ToolError::DuplicateName(_) } if name == "a"
        ));
        assert!(admin.registry().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_best_effort_keeps_first_of_duplicates() {
        let (_dir, admin) = admin_with(DUPLICATED, RefreshPolicy::BestEffort);

        let report = admin.refresh().await.unwrap();

        assert_eq!(report.registered, vec!["a", "b"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "a");
        assert_eq!(admin.registry().names(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_test_invokes_without_registering() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "msg": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_string("echo: hello"))
            .expect(1)
            .mount(&server)
            .await;

        let seed = format!(
            "api_services:\n  - name: echo\n    auth_type: none\n    endpoint: {}\n    request:\n      method: post\n      params:\n        msg: default\n",
            server.uri()
        );
        let (_dir, admin) = admin_with(&seed, RefreshPolicy::AllOrNothing);

        let params = json!({ "msg": "hello" }).as_object().cloned().unwrap();
        let result = admin.test("echo", &params).await.unwrap();

        assert_eq!(result, json!({ "result": "echo: hello" }));
        assert!(admin.registry().is_empty());
    }

    #[tokio::test]
    async fn test_test_unknown_service() {
        let (_dir, admin) = admin_with(SEED, RefreshPolicy::AllOrNothing);
        let err = admin.test("gamma", &JsonObject::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
