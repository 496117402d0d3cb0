//! Navigation projection for ClickConsultas
//!
//! Navigation is not stored anywhere: it is the chain of presented
//! destinations in the state tree. This module turns that chain into a
//! [`NavigationStack`] of [`Route`]s for the view layer, deep-link logging and
//! tests.

use serde::{Deserialize, Serialize};

// =============================================================================
// Route Definitions
// =============================================================================

/// Every screen of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route")]
pub enum Route {
    /// Login form
    Authentication,
    /// Sign-up: email
    CreateAccount,
    /// Sign-up: CPF
    Cpf,
    /// Sign-up: first and last name
    Documents,
    /// Sign-up: phone number
    Phone,
    /// New password (sign-up or recovery)
    NewPassword,
    /// Sign-up: terms of use
    Term,
    /// Confirmation at the end of a flow
    Success,
    /// Recovery: email
    ForgotPassword,
    /// Recovery: verification code
    OtpCode,
    /// Signed-in home
    Home,
}

impl Route {
    /// Path used for logging and deep links
    pub fn to_path(&self) -> &'static str {
        match self {
            Route::Authentication => "/login",
            Route::CreateAccount => "/signup",
            Route::Cpf => "/signup/cpf",
            Route::Documents => "/signup/documents",
            Route::Phone => "/signup/phone",
            Route::NewPassword => "/password/new",
            Route::Term => "/signup/terms",
            Route::Success => "/success",
            Route::ForgotPassword => "/password/forgot",
            Route::OtpCode => "/password/code",
            Route::Home => "/",
        }
    }

    /// Check if route requires a session
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Home)
    }

    /// Get the screen title
    pub fn title(&self) -> &'static str {
        match self {
            Route::Authentication => "Entrar",
            Route::CreateAccount => "Criar conta",
            Route::Cpf => "CPF",
            Route::Documents => "Dados pessoais",
            Route::Phone => "Telefone",
            Route::NewPassword => "Nova senha",
            Route::Term => "Termos de uso",
            Route::Success => "Tudo pronto!",
            Route::ForgotPassword => "Esqueci minha senha",
            Route::OtpCode => "Código de verificação",
            Route::Home => "Início",
        }
    }
}

// =============================================================================
// Screen Tree
// =============================================================================

/// A screen state that may present another screen
pub trait Screen {
    /// Route of this screen
    fn route(&self) -> Route;

    /// The presented child, if any
    fn presented(&self) -> Option<&dyn Screen>;
}

// =============================================================================
// Navigation Stack
// =============================================================================

/// Routes from the root screen to the deepest presented one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationStack {
    /// Root route
    root: Route,
    /// Presented routes above the root (bottom to top)
    entries: Vec<Route>,
}

impl NavigationStack {
    /// Create a new navigation stack with a root route
    pub fn new(root: Route) -> Self {
        Self {
            root,
            entries: Vec::new(),
        }
    }

    /// Follow the presentation chain starting at `screen`
    pub fn from_screen(screen: &dyn Screen) -> Self {
        let mut stack = Self::new(screen.route());
        let mut next = screen.presented();
        while let Some(child) = next {
            stack.push(child.route());
            next = child.presented();
        }
        stack
    }

    /// Push a route onto the stack
    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Root route
    pub fn root(&self) -> Route {
        self.root
    }

    /// Get the current (top) route
    pub fn current(&self) -> Route {
        self.entries.last().copied().unwrap_or(self.root)
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get stack depth, root included
    pub fn depth(&self) -> usize {
        self.entries.len() + 1
    }

    /// All routes, root first
    pub fn routes(&self) -> Vec<Route> {
        std::iter::once(self.root)
            .chain(self.entries.iter().copied())
            .collect()
    }

    /// Whether `route` is anywhere on the stack
    pub fn contains(&self, route: Route) -> bool {
        self.root == route || self.entries.contains(&route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(Route);

    impl Screen for Leaf {
        fn route(&self) -> Route {
            self.0
        }

        fn presented(&self) -> Option<&dyn Screen> {
            None
        }
    }

    struct Node(Route, Leaf);

    impl Screen for Node {
        fn route(&self) -> Route {
            self.0
        }

        fn presented(&self) -> Option<&dyn Screen> {
            Some(&self.1)
        }
    }

    #[test]
    fn test_route_to_path() {
        assert_eq!(Route::Home.to_path(), "/");
        assert_eq!(Route::Cpf.to_path(), "/signup/cpf");
        assert_eq!(Route::OtpCode.to_path(), "/password/code");
    }

    #[test]
    fn test_route_requires_auth() {
        assert!(Route::Home.requires_auth());
        assert!(!Route::Authentication.requires_auth());
        assert!(!Route::NewPassword.requires_auth());
    }

    #[test]
    fn test_route_title() {
        assert_eq!(Route::Authentication.title(), "Entrar");
        assert_eq!(Route::Term.title(), "Termos de uso");
    }

    #[test]
    fn test_navigation_stack_push() {
        let mut stack = NavigationStack::new(Route::Authentication);
        assert_eq!(stack.depth(), 1);
        assert!(!stack.can_go_back());
        assert_eq!(stack.current(), Route::Authentication);

        stack.push(Route::ForgotPassword);
        assert_eq!(stack.depth(), 2);
        assert!(stack.can_go_back());
        assert_eq!(stack.current(), Route::ForgotPassword);
        assert!(stack.contains(Route::Authentication));
    }

    #[test]
    fn test_from_screen_follows_chain() {
        let tree = Node(Route::CreateAccount, Leaf(Route::Cpf));
        let stack = NavigationStack::from_screen(&tree);
        assert_eq!(stack.routes(), vec![Route::CreateAccount, Route::Cpf]);
        assert_eq!(stack.root(), Route::CreateAccount);
    }

    #[test]
    fn test_route_serialization() {
        let json = serde_json::to_string(&Route::OtpCode).unwrap();
        assert_eq!(json, r#"{"route":"OtpCode"}"#);
    }
}
