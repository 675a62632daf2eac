//! Shared router state.

use std::sync::Arc;

use vigil_auth::TokenValidator;

/// State shared by every route.
///
/// Cheap to clone; everything lives behind `Arc`.
#[derive(Clone)]
pub struct ApiState {
    /// Realm echoed in `WWW-Authenticate` challenges.
    pub realm: Arc<str>,
    /// Validator behind every bearer-protected route.
    pub validator: Arc<dyn TokenValidator>,
    /// Scope required by `/v1/admin`.
    pub admin_scope: Arc<str>,
}

impl ApiState {
    /// Creates the state.
    pub fn new(
        realm: impl Into<Arc<str>>,
        validator: Arc<dyn TokenValidator>,
        admin_scope: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            realm: realm.into(),
            validator,
            admin_scope: admin_scope.into(),
        }
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("realm", &self.realm)
            .field("validator", &self.validator.name())
            .field("admin_scope", &self.admin_scope)
            .finish()
    }
}
