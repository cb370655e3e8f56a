//! Screen navigation state machine.
//!
//! Navigation is driven by two inputs: session changes from the session
//! store and explicit user actions. The authenticated half of the state
//! carries the owner context captured when the session appeared, so no
//! product screen can exist without an owner identity.

use punguin_core::{Email, OwnerId, Product, Session};

/// The identity every authenticated screen operates under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerContext {
    /// Owner id used to scope every store operation.
    pub uid: OwnerId,
    /// Signed-in email, shown in the Home header.
    pub email: Email,
}

impl OwnerContext {
    fn from_session(session: &Session) -> Self {
        Self {
            uid: session.uid.clone(),
            email: session.email.clone(),
        }
    }
}

/// Which credential screen is showing while signed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    SignIn,
    SignUp,
}

/// Which screen is showing while signed in.
#[derive(Debug, Clone, PartialEq)]
pub enum AppScreen {
    Home,
    AddProduct,
    /// Edit screen, carrying the product it was opened for.
    EditProduct(Product),
}

/// The full navigation state.
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    Unauthenticated(AuthScreen),
    Authenticated {
        owner: OwnerContext,
        screen: AppScreen,
    },
}

/// The navigator. Starts signed out on the sign-in screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: NavState,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: NavState::Unauthenticated(AuthScreen::SignIn),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &NavState {
        &self.state
    }

    /// The owner context, if a session is active.
    #[must_use]
    pub const fn owner(&self) -> Option<&OwnerContext> {
        match &self.state {
            NavState::Authenticated { owner, .. } => Some(owner),
            NavState::Unauthenticated(_) => None,
        }
    }

    /// A session appeared: land on Home with the session's identity.
    pub fn session_appeared(&mut self, session: &Session) {
        self.state = NavState::Authenticated {
            owner: OwnerContext::from_session(session),
            screen: AppScreen::Home,
        };
    }

    /// The session ended: back to sign-in, owner context discarded.
    ///
    /// Always sign-in, regardless of which credential screen was showing
    /// before the session appeared.
    pub fn session_ended(&mut self) {
        self.state = NavState::Unauthenticated(AuthScreen::SignIn);
    }

    /// Flip between sign-in and sign-up. No-op while authenticated.
    pub fn toggle_auth(&mut self) {
        if let NavState::Unauthenticated(screen) = &mut self.state {
            *screen = match screen {
                AuthScreen::SignIn => AuthScreen::SignUp,
                AuthScreen::SignUp => AuthScreen::SignIn,
            };
        }
    }

    /// Home -> AddProduct. No-op elsewhere.
    pub fn open_add(&mut self) {
        if let NavState::Authenticated { screen, .. } = &mut self.state {
            if *screen == AppScreen::Home {
                *screen = AppScreen::AddProduct;
            }
        }
    }

    /// Home -> EditProduct for the given product. No-op elsewhere.
    pub fn open_edit(&mut self, product: Product) {
        if let NavState::Authenticated { screen, .. } = &mut self.state {
            if *screen == AppScreen::Home {
                *screen = AppScreen::EditProduct(product);
            }
        }
    }

    /// Return to Home from a product form.
    pub fn back_home(&mut self) {
        if let NavState::Authenticated { screen, .. } = &mut self.state {
            *screen = AppScreen::Home;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punguin_core::{Price, ProductFields, ProductKey};

    fn session() -> Session {
        Session::new(
            OwnerId::new("uid-1"),
            Email::parse("chu-cua-hang@example.com").unwrap(),
            "token".to_owned(),
        )
    }

    fn product() -> Product {
        Product {
            key: ProductKey::new("-N1"),
            fields: ProductFields {
                name: "Hoa hồng".to_owned(),
                category: "Hoa".to_owned(),
                price: Price::parse("20000").unwrap(),
                image: "file:///rose.png".to_owned(),
            },
        }
    }

    #[test]
    fn test_initial_state_is_sign_in() {
        let nav = Navigator::new();
        assert_eq!(
            *nav.state(),
            NavState::Unauthenticated(AuthScreen::SignIn)
        );
        assert!(nav.owner().is_none());
    }

    #[test]
    fn test_toggle_flips_between_credential_screens() {
        let mut nav = Navigator::new();
        nav.toggle_auth();
        assert_eq!(*nav.state(), NavState::Unauthenticated(AuthScreen::SignUp));
        nav.toggle_auth();
        assert_eq!(*nav.state(), NavState::Unauthenticated(AuthScreen::SignIn));
    }

    #[test]
    fn test_session_appearing_lands_on_home_with_context() {
        let mut nav = Navigator::new();
        nav.session_appeared(&session());

        let owner = nav.owner().unwrap();
        assert_eq!(owner.uid.as_str(), "uid-1");
        assert!(matches!(
            nav.state(),
            NavState::Authenticated {
                screen: AppScreen::Home,
                ..
            }
        ));
    }

    #[test]
    fn test_session_ending_returns_to_sign_in_despite_prior_toggle() {
        let mut nav = Navigator::new();
        nav.toggle_auth(); // was on sign-up before authenticating
        nav.session_appeared(&session());
        nav.session_ended();

        assert_eq!(*nav.state(), NavState::Unauthenticated(AuthScreen::SignIn));
        assert!(nav.owner().is_none());
    }

    #[test]
    fn test_product_screens_reachable_only_from_home() {
        let mut nav = Navigator::new();

        // Signed out: product navigation is inert.
        nav.open_add();
        assert!(matches!(nav.state(), NavState::Unauthenticated(_)));

        nav.session_appeared(&session());
        nav.open_add();
        assert!(matches!(
            nav.state(),
            NavState::Authenticated {
                screen: AppScreen::AddProduct,
                ..
            }
        ));

        // Already on a form: opening edit is a no-op.
        nav.open_edit(product());
        assert!(matches!(
            nav.state(),
            NavState::Authenticated {
                screen: AppScreen::AddProduct,
                ..
            }
        ));
    }

    #[test]
    fn test_edit_carries_the_product() {
        let mut nav = Navigator::new();
        nav.session_appeared(&session());
        nav.open_edit(product());

        match nav.state() {
            NavState::Authenticated {
                screen: AppScreen::EditProduct(p),
                ..
            } => assert_eq!(p.key.as_str(), "-N1"),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_back_returns_to_home() {
        let mut nav = Navigator::new();
        nav.session_appeared(&session());
        nav.open_add();
        nav.back_home();
        assert!(matches!(
            nav.state(),
            NavState::Authenticated {
                screen: AppScreen::Home,
                ..
            }
        ));
    }

    #[test]
    fn test_toggle_is_inert_while_authenticated() {
        let mut nav = Navigator::new();
        nav.session_appeared(&session());
        nav.toggle_auth();
        assert!(nav.owner().is_some());
    }
}
